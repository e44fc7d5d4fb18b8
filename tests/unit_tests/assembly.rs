use crate::{interval_mesh, skewed_mesh, unit_square_mesh};
use galerkin::assembly::{
    essential_boundary_vector, load_vector_1d, load_vector_2d, mass_matrix_1d, mass_matrix_2d, mixed_mass_matrix_2d,
    natural_boundary_vector_1d, natural_boundary_vector_2d, Derivative,
};
use galerkin::space::{FiniteElementSpace, FiniteElementSpace1d, FiniteElementSpace2d};
use galerkin::{BoundaryCondition, Error};
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::{dmatrix, dvector, DMatrix, DVector};
use util::assert_err_matches;

#[test]
fn mass_matrix_1d_sums_to_domain_length() {
    let mesh = interval_mesh(0.5, 3.0, 5, BoundaryCondition::Essential, BoundaryCondition::Essential);
    for p in 1..=4 {
        let space = FiniteElementSpace1d::new(&mesh, p).unwrap();
        let mass = mass_matrix_1d(&space, |_| 1.0, 4, 0, 0).unwrap();
        assert_scalar_eq!(mass.sum(), 2.5, comp = abs, tol = 1e-12);
        assert_matrix_eq!(mass, mass.transpose(), comp = abs, tol = 1e-14);

        // Constants lie in the kernel of the stiffness matrix
        let stiffness = mass_matrix_1d(&space, |_| 1.0, 4, 1, 1).unwrap();
        let ones = DVector::from_element(space.num_nodes(), 1.0);
        assert_matrix_eq!(&stiffness * ones, DVector::zeros(space.num_nodes()), comp = abs, tol = 1e-11);
    }
}

#[test]
fn linear_stiffness_matrix_1d() {
    let mesh = interval_mesh(0.0, 1.0, 2, BoundaryCondition::Essential, BoundaryCondition::Essential);
    let space = FiniteElementSpace1d::new(&mesh, 1).unwrap();
    let stiffness = mass_matrix_1d(&space, |_| 1.0, 2, 1, 1).unwrap();
    let expected = dmatrix![2.0, -2.0, 0.0;
                            -2.0, 4.0, -2.0;
                            0.0, -2.0, 2.0];
    assert_matrix_eq!(stiffness, expected, comp = abs, tol = 1e-12);

    // ∫ φ_i φ_j' on a single element of length h is [[-1, 1], [-1, 1]] / 2
    let convection = mass_matrix_1d(&space, |_| 1.0, 2, 0, 1).unwrap();
    let expected = dmatrix![-0.5, 0.5, 0.0;
                            -0.5, 0.0, 0.5;
                            0.0, -0.5, 0.5];
    assert_matrix_eq!(convection, expected, comp = abs, tol = 1e-12);
}

#[test]
fn load_vector_1d_integrates_the_source() {
    let mesh = interval_mesh(0.0, 2.0, 4, BoundaryCondition::Essential, BoundaryCondition::Essential);
    let space = FiniteElementSpace1d::new(&mesh, 2).unwrap();
    let load = load_vector_1d(&space, |x| 3.0 * x * x, 3, 0).unwrap();
    assert_scalar_eq!(load.sum(), 8.0, comp = abs, tol = 1e-12);

    // Derivatives of a partition of unity sum to zero
    let derivative_load = load_vector_1d(&space, |x| x.sin(), 3, 1).unwrap();
    assert_scalar_eq!(derivative_load.sum(), 0.0, comp = abs, tol = 1e-12);

    assert_err_matches!(load_vector_1d(&space, |x| x, 9, 0), Error::UnsupportedQuadratureOrder(9));
}

#[test]
fn natural_boundary_vector_1d_flips_the_left_sign() {
    let mesh = interval_mesh(1.0, 2.0, 2, BoundaryCondition::Natural, BoundaryCondition::Neumann);
    let space = FiniteElementSpace1d::new(&mesh, 1).unwrap();
    let b = natural_boundary_vector_1d(&space, |x| 10.0 * x);
    assert_matrix_eq!(b, dvector![-10.0, 0.0, 20.0]);

    let mesh = interval_mesh(1.0, 2.0, 2, BoundaryCondition::Essential, BoundaryCondition::Natural);
    let space = FiniteElementSpace1d::new(&mesh, 1).unwrap();
    let b = natural_boundary_vector_1d(&space, |x| 10.0 * x);
    assert_matrix_eq!(b, dvector![0.0, 0.0, 20.0]);
}

#[test]
fn mass_matrix_2d_sums_to_area() {
    let mesh = unit_square_mesh(3, BoundaryCondition::Essential);
    for p in [1, 2] {
        let space = FiniteElementSpace2d::new(&mesh, p).unwrap();
        let mass = mass_matrix_2d(&space, |_, _| 1.0, 7, Derivative::VALUE, Derivative::VALUE).unwrap();
        assert_scalar_eq!(mass.sum(), 1.0, comp = abs, tol = 1e-12);
        assert_matrix_eq!(mass, mass.transpose(), comp = abs, tol = 1e-14);

        let weighted = mass_matrix_2d(&space, |x, y| x + y, 7, Derivative::VALUE, Derivative::VALUE).unwrap();
        assert_scalar_eq!(weighted.sum(), 1.0, comp = abs, tol = 1e-12);

        let ones = DVector::from_element(space.num_nodes(), 1.0);
        for d in [Derivative::DX, Derivative::DY] {
            let stiffness = mass_matrix_2d(&space, |_, _| 1.0, 7, d, d).unwrap();
            assert_matrix_eq!(&stiffness * &ones, DVector::zeros(space.num_nodes()), comp = abs, tol = 1e-11);
        }
    }
}

#[test]
fn stiffness_matrix_2d_energy_of_linear_function() {
    // For u = 2x - y, ∫ |∇u|^2 over the unit square is 5
    let mesh = unit_square_mesh(2, BoundaryCondition::Essential);
    let mut space = FiniteElementSpace2d::new(&mesh, 2).unwrap();
    space.interpolate(0, |x, y| 2.0 * x - y).unwrap();
    let u = space.component_values(0).unwrap();
    let stiffness = mass_matrix_2d(&space, |_, _| 1.0, 7, Derivative::DX, Derivative::DX).unwrap()
        + mass_matrix_2d(&space, |_, _| 1.0, 7, Derivative::DY, Derivative::DY).unwrap();
    assert_scalar_eq!(u.dot(&(&stiffness * &u)), 5.0, comp = abs, tol = 1e-11);
}

#[test]
fn assembly_on_sheared_triangles() {
    let mesh = skewed_mesh(BoundaryCondition::Essential);
    let area = 1.33;
    let (gx, gy) = (2.0, -1.0);
    for p in [1, 2] {
        let mut space = FiniteElementSpace2d::new(&mesh, p).unwrap();
        let mass = mass_matrix_2d(&space, |_, _| 1.0, 7, Derivative::VALUE, Derivative::VALUE).unwrap();
        assert_scalar_eq!(mass.sum(), area, comp = abs, tol = 1e-12);

        // u^T K u = |∇u|^2 area for linear u
        space.interpolate(0, |x, y| gx * x + gy * y + 0.7).unwrap();
        let u = space.component_values(0).unwrap();
        let stiffness = mass_matrix_2d(&space, |_, _| 1.0, 7, Derivative::DX, Derivative::DX).unwrap()
            + mass_matrix_2d(&space, |_, _| 1.0, 7, Derivative::DY, Derivative::DY).unwrap();
        assert_scalar_eq!(u.dot(&(&stiffness * &u)), (gx * gx + gy * gy) * area, comp = abs, tol = 1e-11);

        // Convection of a linear field: ∫ φ_i ∂u/∂x = gx ∫ φ_i
        let load = load_vector_2d(&space, |_, _| 1.0, 7, Derivative::VALUE).unwrap();
        for (d, g) in [(Derivative::DX, gx), (Derivative::DY, gy)] {
            let convection = mass_matrix_2d(&space, |_, _| 1.0, 7, Derivative::VALUE, d).unwrap();
            assert_matrix_eq!(&convection * &u, &load * g, comp = abs, tol = 1e-12);
        }

        // ∫ ∂φ_i/∂x ∂u/∂y = gy ∫ ∂φ_i/∂x
        let mixed = mass_matrix_2d(&space, |_, _| 1.0, 7, Derivative::DX, Derivative::DY).unwrap();
        let dx_load = load_vector_2d(&space, |_, _| 1.0, 7, Derivative::DX).unwrap();
        assert_matrix_eq!(&mixed * &u, &dx_load * gy, comp = abs, tol = 1e-12);
    }
}

#[test]
fn mixed_mass_matrix_couples_two_spaces() {
    let mesh = unit_square_mesh(2, BoundaryCondition::Essential);
    let pressure = FiniteElementSpace2d::new(&mesh, 1).unwrap();
    let mut velocity = FiniteElementSpace2d::new(&mesh, 2).unwrap();
    velocity.interpolate(0, |x, _| x).unwrap();

    let b_x = mixed_mass_matrix_2d(&pressure, &velocity, |_, _| 1.0, 7, Derivative::VALUE, Derivative::DX).unwrap();
    assert_eq!(b_x.shape(), (pressure.num_nodes(), velocity.num_nodes()));

    // Applied to the interpolant of x, B_x integrates each test function
    let l = load_vector_2d(&pressure, |_, _| 1.0, 7, Derivative::VALUE).unwrap();
    let x = velocity.component_values(0).unwrap();
    assert_matrix_eq!(&b_x * x, l, comp = abs, tol = 1e-13);
    assert_scalar_eq!(l.sum(), 1.0, comp = abs, tol = 1e-13);

    let other_mesh = unit_square_mesh(3, BoundaryCondition::Essential);
    let other = FiniteElementSpace2d::new(&other_mesh, 1).unwrap();
    assert_err_matches!(
        mixed_mass_matrix_2d(&other, &velocity, |_, _| 1.0, 7, Derivative::VALUE, Derivative::DX),
        Error::Configuration(_)
    );
}

#[test]
fn assembly_2d_errors() {
    let mesh = unit_square_mesh(1, BoundaryCondition::Essential);
    let space = FiniteElementSpace2d::new(&mesh, 2).unwrap();
    assert_err_matches!(
        mass_matrix_2d(&space, |_, _| 1.0, 3, Derivative::VALUE, Derivative::VALUE),
        Error::UnsupportedQuadratureOrder(3)
    );
    assert_err_matches!(
        load_vector_2d(&space, |_, _| 1.0, 7, Derivative::new(2, 0)),
        Error::UnsupportedDerivative(2, 0)
    );

    let cubic = FiniteElementSpace2d::new(&mesh, 3).unwrap();
    assert_err_matches!(
        mass_matrix_2d(&cubic, |_, _| 1.0, 7, Derivative::VALUE, Derivative::VALUE),
        Error::UnsupportedPolynomialOrder(3)
    );
}

#[test]
fn natural_boundary_vector_2d_integrates_over_natural_edges() {
    let mesh = unit_square_mesh(3, BoundaryCondition::Natural);
    for p in [1, 2] {
        let space = FiniteElementSpace2d::new(&mesh, p).unwrap();
        let b = natural_boundary_vector_2d(&space, |_, _| 1.0, 3).unwrap();
        assert_scalar_eq!(b.sum(), 4.0, comp = abs, tol = 1e-12);

        // ∮ x ds over the boundary of the unit square is 2
        let b = natural_boundary_vector_2d(&space, |x, _| x, 3).unwrap();
        assert_scalar_eq!(b.sum(), 2.0, comp = abs, tol = 1e-12);
    }

    let mut mesh = unit_square_mesh(2, BoundaryCondition::Essential);
    mesh.set_boundary_conditions_with(|p, _| {
        if p.y == 0.0 && p.x > 0.0 && p.x < 1.0 {
            BoundaryCondition::Natural
        } else {
            BoundaryCondition::Essential
        }
    });
    // Only the two bottom edges touch the natural vertex (0.5, 0)
    let space = FiniteElementSpace2d::new(&mesh, 1).unwrap();
    let b = natural_boundary_vector_2d(&space, |_, _| 1.0, 2).unwrap();
    assert_matrix_eq!(b, dvector![0.25, 0.5, 0.25, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], comp = abs, tol = 1e-14);
}

#[test]
fn essential_boundary_vector_moves_known_values() {
    let mesh = interval_mesh(0.0, 1.0, 2, BoundaryCondition::Essential, BoundaryCondition::Natural);
    let mut space = FiniteElementSpace1d::new(&mesh, 1).unwrap();
    space.apply_essential(0, |_| 2.0).unwrap();
    let m = dmatrix![1.0, 2.0, 3.0;
                     4.0, 5.0, 6.0];
    let bc = essential_boundary_vector(&m, &space, 0).unwrap();
    assert_matrix_eq!(bc, dvector![-2.0, -8.0]);

    assert_err_matches!(
        essential_boundary_vector(&DMatrix::zeros(3, 2), &space, 0),
        Error::DimensionMismatch { .. }
    );
    assert_err_matches!(essential_boundary_vector(&m, &space, 1), Error::IndexOutOfRange { .. });
}
