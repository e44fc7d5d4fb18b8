use crate::{interval_mesh, unit_square_mesh};
use galerkin::basis::Derivative;
use galerkin::error::{estimate_L2_error_1d, estimate_L2_error_2d};
use galerkin::projection::{project_l2_1d, project_l2_2d};
use galerkin::space::{FiniteElementSpace, FiniteElementSpace1d, FiniteElementSpace2d};
use galerkin::{BoundaryCondition, Error};
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use util::assert_err_matches;

#[test]
fn projection_reproduces_polynomials_in_the_space() {
    let mesh = interval_mesh(0.0, 1.0, 3, BoundaryCondition::Natural, BoundaryCondition::Essential);
    let mut space = FiniteElementSpace1d::new(&mesh, 2).unwrap();
    let u = |x: f64| 3.0 * x * x - x + 0.5;
    project_l2_1d(&mut space, 0, u, 3).unwrap();
    let projected = space.component_values(0).unwrap();
    space.interpolate(0, u).unwrap();
    assert_matrix_eq!(projected, space.component_values(0).unwrap(), comp = abs, tol = 1e-11);

    let mesh = unit_square_mesh(2, BoundaryCondition::Essential);
    let mut space = FiniteElementSpace2d::with_components(&mesh, 2, 2).unwrap();
    project_l2_2d(&mut space, 1, |x, y| x * x - 2.0 * x * y, 7).unwrap();
    let error = estimate_L2_error_2d(&space, 1, |x, y| x * x - 2.0 * x * y, 7, Derivative::VALUE).unwrap();
    assert_scalar_eq!(error, 0.0, comp = abs, tol = 1e-11);
    // Other components are left alone
    assert_scalar_eq!(space.component_values(0).unwrap().norm(), 0.0);
}

#[test]
fn projection_beats_interpolation_in_l2() {
    let mesh = interval_mesh(0.0, 3.0, 4, BoundaryCondition::Essential, BoundaryCondition::Essential);
    let mut space = FiniteElementSpace1d::new(&mesh, 1).unwrap();
    let f = |x: f64| (2.0 * x).sin();

    space.interpolate(0, f).unwrap();
    let interpolation_error = estimate_L2_error_1d(&space, 0, f, 5, 0).unwrap();
    project_l2_1d(&mut space, 0, f, 5).unwrap();
    let projection_error = estimate_L2_error_1d(&space, 0, f, 5, 0).unwrap();
    assert!(projection_error <= interpolation_error);
}

#[test]
fn projection_errors() {
    let mesh = interval_mesh(0.0, 1.0, 2, BoundaryCondition::Essential, BoundaryCondition::Essential);
    let mut space = FiniteElementSpace1d::new(&mesh, 1).unwrap();
    assert_err_matches!(project_l2_1d(&mut space, 1, |x| x, 2), Error::IndexOutOfRange { .. });
    assert_err_matches!(project_l2_1d(&mut space, 0, |x| x, 1), Error::UnsupportedQuadratureOrder(1));
}
