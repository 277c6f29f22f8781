use argmin::core::{Executor, State};
use nalgebra::{Point3, Vector4};

use crate::prelude::*;

/// Square patch spanning `[-1,1]²` in the z = 0 plane.
fn horizontal_patch() -> BezierSurface<f64> {
    BezierSurface::bilinear(
        Point3::new(-1., -1., 0.),
        Point3::new(1., -1., 0.),
        Point3::new(-1., 1., 0.),
        Point3::new(1., 1., 0.),
    )
}

/// Square patch spanning `[-1,1]` in x, tilted so that z = y.
fn tilted_patch() -> BezierSurface<f64> {
    BezierSurface::bilinear(
        Point3::new(-1., -1., -1.),
        Point3::new(1., -1., -1.),
        Point3::new(-1., 1., 1.),
        Point3::new(1., 1., 1.),
    )
}

/// A cubic-in-u sheet whose xz cross section loops through itself at x = 0,
/// extruded linearly along y. The sheet crosses itself along a straight line
/// spanning the whole v domain.
fn folded_patch() -> BezierSurface<f64> {
    let profile = [(-1., 0.), (2., 2.), (-2., 2.), (1., 0.)];
    BezierSurface::try_new(
        profile
            .iter()
            .map(|&(x, z)| vec![Point3::new(x, -2., z), Point3::new(x, 2., z)])
            .collect(),
    )
    .unwrap()
}

#[test]
fn pair_seed_with_reference_picks_nearby_samples() {
    let a = horizontal_patch();
    let b = tilted_patch();
    let reference = Point3::new(0.5, 0., 0.);

    let search = ClosestSampleSearch::new(&a, &b, 30);
    let seed = search.find_seed(Some(&reference));

    assert!((a.point_at(seed.a().x, seed.a().y) - reference).norm() < 0.1);
    assert!((b.point_at(seed.b().x, seed.b().y) - reference).norm() < 0.1);
}

#[test]
fn pair_seed_without_reference_minimizes_surface_distance() {
    let a = horizontal_patch();
    let b = tilted_patch();

    let search = ClosestSampleSearch::new(&a, &b, 30);
    let seed = search.find_seed(None);

    let gap = (a.point_at(seed.a().x, seed.a().y) - b.point_at(seed.b().x, seed.b().y)).norm();
    assert!(gap < 0.1, "gap: {}", gap);
}

#[test]
fn self_seed_without_reference_rejects_adjacent_samples() {
    let patch = folded_patch();

    let search = ClosestSampleSearch::new(&patch, &patch, 30);
    let seed = search.find_seed(None);

    // The winning pair straddles the fold instead of sitting on trivially
    // coincident neighbors.
    assert!((seed.a().x - seed.b().x).abs() > 0.5);
    assert_eq!(seed.a().y, seed.b().y);
    let gap = (patch.point_at(seed.a().x, seed.a().y) - patch.point_at(seed.b().x, seed.b().y))
        .norm();
    assert!(gap < 0.5, "gap: {}", gap);
}

#[test]
fn self_seed_with_reference_returns_distinct_samples() {
    let patch = folded_patch();
    // Near the 3D crossing of the folded profile.
    let reference = Point3::new(0., 0., 0.857);

    let search = ClosestSampleSearch::new(&patch, &patch, 30);
    let seed = search.find_seed(Some(&reference));

    assert_ne!(seed.a(), seed.b());
    assert!((patch.point_at(seed.a().x, seed.a().y) - reference).norm() < 0.2);
    assert!((patch.point_at(seed.b().x, seed.b().y) - reference).norm() < 0.2);
}

#[test]
fn seed_parameters_stay_inside_the_unit_square() {
    let torus = Torus::new(Point3::origin(), 2., 0.5);
    let patch = horizontal_patch();

    let search = ClosestSampleSearch::new(&torus, &patch, 30);
    for seed in [
        search.find_seed(None),
        search.find_seed(Some(&Point3::new(10., -3., 2.))),
    ] {
        for value in [seed.a().x, seed.a().y, seed.b().x, seed.b().y] {
            assert!((0. ..=1.).contains(&value));
        }
    }
}

#[test]
fn gradient_descent_pulls_a_seed_onto_the_intersection() {
    let a = horizontal_patch();
    let b = tilted_patch();

    let problem = SurfaceIntersectionProblem::new(&a, &b);
    let solver = SurfaceIntersectionGradientDescent::new().with_step_size(1e-3);
    let res = Executor::new(problem, solver)
        .configure(|state| state.param(Vector4::new(0.4, 0.6, 0.6, 0.3)).max_iters(10_000))
        .run()
        .unwrap();

    assert!(res.state().get_best_cost() < 1e-6);
}

#[test]
fn gradient_descent_cannot_reach_disjoint_surfaces() {
    let a = horizontal_patch();
    let b = BezierSurface::bilinear(
        Point3::new(-1., -1., 5.),
        Point3::new(1., -1., 5.),
        Point3::new(-1., 1., 5.),
        Point3::new(1., 1., 5.),
    );

    let problem = SurfaceIntersectionProblem::new(&a, &b);
    let solver = SurfaceIntersectionGradientDescent::new();
    let res = Executor::new(problem, solver)
        .configure(|state| state.param(Vector4::new(0.5, 0.5, 0.5, 0.5)).max_iters(10_000))
        .run()
        .unwrap();

    // The patches stay five units apart, so the refinement budget runs out.
    assert!(res.state().get_best_cost() > 1.);
}
