use nalgebra::Point3;
use nurbs_fit::prelude::*;

fn main() -> anyhow::Result<()> {
    let points = vec![
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
    ];

    let curve = CurveBuilder::new(3).build(&points)?;
    println!("knots: {:?}", curve.knots().as_slice());

    for count in [5, points.len(), 10, 30, 300] {
        let line = curve.try_sample_line_string(count)?;
        let wkt = line
            .coords()
            .map(|c| format!("{} {}", c.x, c.y))
            .collect::<Vec<_>>()
            .join(",");
        println!("LINESTRING({})", wkt);
    }

    Ok(())
}
