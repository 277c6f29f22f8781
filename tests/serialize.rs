#![cfg(feature = "serde")]

use intersurf::prelude::*;
use nalgebra::Point3;

#[test]
fn intersection_curve_round_trips_through_json() {
    let torus = Torus::new(Point3::origin(), 2., 0.5);
    let patch = BezierSurface::bilinear(
        Point3::new(-4., -4., 0.),
        Point3::new(4., -4., 0.),
        Point3::new(-4., 4., 0.),
        Point3::new(4., 4., 0.),
    );

    let curve = IntersectionCurveBuilder::new(&torus, &patch)
        .with_reference_point(Point3::new(2.5, 0., 0.))
        .build()
        .unwrap()
        .expect("the midplane cuts the torus");

    let json = serde_json::to_string(&curve).unwrap();
    let restored: IntersectionCurve<f64> = serde_json::from_str(&json).unwrap();

    assert_eq!(curve.points(), restored.points());
    assert_eq!(curve.is_closed(), restored.is_closed());
    assert_eq!(curve.centroid(), restored.centroid());
}
