use approx::assert_relative_eq;
use nalgebra::Point3;
use nurbs_fit::prelude::*;

fn track() -> Vec<Point3<f64>> {
    vec![
        Point3::new(11.6596806049334, 48.0291903018899, 0.),
        Point3::new(11.6590315103518, 48.0293619632669, 0.),
        Point3::new(11.6586077213275, 48.0295014381356, 0.),
        Point3::new(11.6582697629916, 48.0296194553323, 0.),
        Point3::new(11.657797694205, 48.0298393964715, 0.),
        Point3::new(11.6574704647051, 48.0300110578485, 0.),
        Point3::new(11.6571325063693, 48.0301988124795, 0.),
        Point3::new(11.6566926240908, 48.0305421352334, 0.),
        Point3::new(11.6563224792468, 48.0308800935693, 0.),
        Point3::new(11.6559898853289, 48.0312180519052, 0.),
        Point3::new(11.6555285453784, 48.0320227146096, 0.),
    ]
}

#[test]
fn track_samples_are_finite() {
    let curve = NurbsCurve::try_interpolate(&track(), 3).unwrap();
    assert_eq!(curve.control_points().len(), 11);
    assert_eq!(curve.knots().len(), 15);

    for count in [5, 11, 10, 30, 300] {
        let samples = curve.try_sample(count).unwrap();
        assert_eq!(samples.len(), count);
        assert!(samples
            .iter()
            .all(|p| p.iter().all(|c| c.is_finite())));
        assert!(samples.iter().all(|p| p.z == 0.));
    }
}

#[test]
fn track_is_interpolated() {
    let points = track();
    let (curve, params) = CurveBuilder::new(3)
        .build_with_parameters(&points)
        .unwrap();
    assert_eq!(params.len(), points.len());
    for (point, u) in points.iter().zip(params.iter()) {
        assert!((curve.point_at(*u) - point).norm() < 1e-6);
    }

    let samples = curve.try_sample(300).unwrap();
    assert_relative_eq!(samples[0], points[0], epsilon = 1e-9);
    assert_relative_eq!(samples[299], points[10], epsilon = 1e-9);
}

#[test]
fn parameters_match_the_builder() {
    let points = track();
    let builder = CurveBuilder::new(3);
    let params = builder.parameterize(&points).unwrap();
    let (_, built) = builder.build_with_parameters(&points).unwrap();
    assert_eq!(params, built);
    assert_eq!(params[0], 0.);
    assert_eq!(params[10], 1.);
    assert!(params.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn knots_are_averaged_parameters() {
    let points = track();
    let (curve, params) = CurveBuilder::new(3)
        .build_with_parameters(&points)
        .unwrap();
    let knots = curve.knots();
    assert!(knots.is_clamped());
    assert_eq!(knots.degree(), 3);
    for j in 1..=(points.len() - 3 - 1) {
        let mean = (params[j] + params[j + 1] + params[j + 2]) / 3.;
        assert_relative_eq!(knots[j + 3], mean, epsilon = 1e-12);
    }
}

#[test]
fn line_string_input() {
    let line = geo::LineString::from(vec![(30., 10.), (10., 30.), (40., 40.), (50., 55.), (20., 60.)]);
    let points = points_from_line_string(&line);
    let curve = NurbsCurve::try_interpolate(&points, 2).unwrap();
    let sampled = curve.try_sample_line_string(50).unwrap();
    assert_eq!(sampled.0.len(), 50);
    assert_relative_eq!(sampled.0[0].x, 30., epsilon = 1e-9);
    assert_relative_eq!(sampled.0[49].y, 60., epsilon = 1e-9);
}

#[test]
fn single_precision_interpolation() {
    let points: Vec<Point3<f32>> = vec![
        Point3::new(0., 0., 0.),
        Point3::new(1., 2., 0.),
        Point3::new(3., 3., 1.),
        Point3::new(5., 1., 1.),
        Point3::new(6., 4., 0.),
    ];
    let (curve, params) = CurveBuilder::new(3)
        .build_with_parameters(&points)
        .unwrap();
    for (point, u) in points.iter().zip(params) {
        assert!((curve.point_at(u) - point).norm() < 1e-4);
    }
}

#[test]
fn errors_surface_to_anyhow() -> anyhow::Result<()> {
    let curve = NurbsCurve::try_interpolate(&track(), 3)?;
    assert_eq!(curve.try_sample(5)?.len(), 5);

    let err: anyhow::Error = NurbsCurve::try_interpolate(&track()[..3], 3)
        .unwrap_err()
        .into();
    assert!(err.to_string().starts_with("Singular interpolation system"));
    Ok(())
}
