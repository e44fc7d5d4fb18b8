use crate::{interval_mesh, unit_square_mesh};
use galerkin::basis::Derivative;
use galerkin::mesh::procedural::{create_uniform_interval_mesh, create_unit_square_uniform_tri_mesh_2d};
use galerkin::space::{FiniteElementSpace, FiniteElementSpace1d, FiniteElementSpace2d, EDGE_LOCAL_VERTICES};
use galerkin::{BoundaryCondition, Error};
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::{DVector, Point2};
use util::assert_err_matches;

#[test]
fn space_1d_numbering() {
    let mesh = interval_mesh(0.0, 1.0, 4, BoundaryCondition::Natural, BoundaryCondition::Essential);
    let space = FiniteElementSpace1d::new(&mesh, 3).unwrap();
    assert_eq!(space.num_nodes(), 13);
    assert_eq!(space.nodes_per_element(), 4);
    assert_eq!(space.element_nodes(1).unwrap(), &[3, 4, 5, 6]);
    assert_eq!(space.constrained_indices(), &[12]);
    assert_eq!(space.nodes()[0].boundary_condition, BoundaryCondition::Natural);
    assert_eq!(space.nodes()[5].boundary_condition, BoundaryCondition::Interior);
    assert_scalar_eq!(space.nodes()[5].x, 5.0 / 12.0, comp = abs, tol = 1e-15);
    assert_err_matches!(space.element_nodes(4), Error::IndexOutOfRange { index: 4, len: 4 });
    assert_err_matches!(space.node(13), Error::IndexOutOfRange { index: 13, len: 13 });
}

#[test]
fn space_construction_requires_configuration() {
    let mesh = create_uniform_interval_mesh(0.0, 1.0, 2).unwrap();
    assert_err_matches!(FiniteElementSpace1d::new(&mesh, 1), Error::Configuration(_));

    let configured = interval_mesh(0.0, 1.0, 2, BoundaryCondition::Essential, BoundaryCondition::Essential);
    assert_err_matches!(FiniteElementSpace1d::new(&configured, 0), Error::Configuration(_));
    assert_err_matches!(FiniteElementSpace1d::with_components(&configured, 1, 0), Error::Configuration(_));

    let mesh_2d = create_unit_square_uniform_tri_mesh_2d(2).unwrap();
    assert_err_matches!(FiniteElementSpace2d::new(&mesh_2d, 1), Error::Configuration(_));
}

#[test]
fn space_1d_reproduces_polynomials() {
    let mesh = interval_mesh(-1.0, 2.0, 3, BoundaryCondition::Essential, BoundaryCondition::Essential);
    let mut space = FiniteElementSpace1d::new(&mesh, 3).unwrap();
    let u = |x: f64| x * x * x - 2.0 * x + 1.0;
    let u_x = |x: f64| 3.0 * x * x - 2.0;
    space.interpolate(0, u).unwrap();

    for x in [-1.0, -0.3, 0.0, 0.77, 1.5, 2.0] {
        assert_scalar_eq!(space.evaluate(0, x, 0).unwrap(), u(x), comp = abs, tol = 1e-12);
        assert_scalar_eq!(space.evaluate(0, x, 1).unwrap(), u_x(x), comp = abs, tol = 1e-11);
        assert_scalar_eq!(space.evaluate(0, x, 2).unwrap(), 6.0 * x, comp = abs, tol = 1e-9);
    }
    // Integral of x^3 - 2x + 1 over [-1, 2]
    assert_scalar_eq!(space.integrate(0, 3).unwrap(), 15.0 / 4.0 - 3.0 + 3.0, comp = abs, tol = 1e-12);

    assert_err_matches!(space.evaluate(0, 2.5, 0), Error::Domain(_));
    assert_err_matches!(space.evaluate(1, 0.0, 0), Error::IndexOutOfRange { index: 1, len: 1 });
    assert_err_matches!(space.evaluate_in_element(0, 1.5, 0, 0), Error::Domain(_));
}

#[test]
fn space_1d_apply_essential_touches_only_constrained_nodes() {
    let mesh = interval_mesh(0.0, 1.0, 2, BoundaryCondition::Natural, BoundaryCondition::Dirichlet);
    let mut space = FiniteElementSpace1d::with_components(&mesh, 2, 2).unwrap();
    space.apply_essential(1, |x| 10.0 + x).unwrap();
    assert_matrix_eq!(space.component_values(1).unwrap(), DVector::from_vec(vec![0.0, 0.0, 0.0, 0.0, 11.0]));
    assert_matrix_eq!(space.component_values(0).unwrap(), DVector::<f64>::zeros(5));
}

#[test]
fn component_values_round_trip() {
    let mesh = unit_square_mesh(1, BoundaryCondition::Essential);
    let mut space = FiniteElementSpace2d::with_components(&mesh, 1, 3).unwrap();
    let values = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
    space.set_component_values(2, &values).unwrap();
    assert_matrix_eq!(space.component_values(2).unwrap(), values);
    assert_scalar_eq!(space.value(3, 2).unwrap(), 4.0);
    assert_scalar_eq!(space.value(3, 1).unwrap(), 0.0);
    space.set_value(0, 0, -1.0).unwrap();
    assert_scalar_eq!(space.value(0, 0).unwrap(), -1.0);

    assert_err_matches!(
        space.set_component_values(0, &DVector::zeros(3)),
        Error::DimensionMismatch { expected: (4, 1), actual: (3, 1) }
    );
    assert_err_matches!(space.component_values(3), Error::IndexOutOfRange { index: 3, len: 3 });
    assert_err_matches!(space.set_value(4, 0, 1.0), Error::IndexOutOfRange { index: 4, len: 4 });
}

#[test]
fn space_2d_dof_counts() {
    let mesh = unit_square_mesh(3, BoundaryCondition::Essential);
    let (v, e, f) = (mesh.num_vertices(), mesh.num_edges(), mesh.num_elements());
    assert_eq!((v, e, f), (16, 33, 18));

    let p1 = FiniteElementSpace2d::new(&mesh, 1).unwrap();
    assert_eq!(p1.num_nodes(), v);
    assert_eq!(p1.nodes_per_element(), 3);
    assert_eq!(p1.constrained_indices().len(), 12);

    let p2 = FiniteElementSpace2d::new(&mesh, 2).unwrap();
    assert_eq!(p2.num_nodes(), v + e);
    assert_eq!(p2.nodes_per_element(), 6);
    // Boundary vertices and boundary edge midpoints
    assert_eq!(p2.constrained_indices().len(), 12 + 12);
    assert!(p2.constrained_indices().windows(2).all(|pair| pair[0] < pair[1]));

    let p3 = FiniteElementSpace2d::new(&mesh, 3).unwrap();
    assert_eq!(p3.num_nodes(), v + 2 * e + f);
    assert_eq!(p3.nodes_per_element(), 10);
}

#[test]
fn space_2d_edge_nodes_are_shared_and_placed_on_edges() {
    let mesh = unit_square_mesh(2, BoundaryCondition::Essential);
    let space = FiniteElementSpace2d::new(&mesh, 3).unwrap();
    for (k, element) in mesh.elements().iter().enumerate() {
        let local = space.element_nodes(k).unwrap();
        for (edge_number, (first, second)) in EDGE_LOCAL_VERTICES.into_iter().enumerate() {
            let a = mesh.nodes()[element[first]].position;
            let b = mesh.nodes()[element[second]].position;
            for m in 0..2 {
                // Edge nodes run from the first towards the second local vertex
                let expected = a + (b - a) * ((m + 1) as f64 / 3.0);
                let node = local[3 + 2 * edge_number + m];
                let position = space.nodes()[node].position;
                assert_matrix_eq!(position.coords, expected.coords, comp = abs, tol = 1e-14);
            }
        }
        // One interior node at the centroid
        let centroid = mesh.triangle(k).unwrap().centroid();
        assert_matrix_eq!(space.nodes()[local[9]].position.coords, centroid.coords, comp = abs, tol = 1e-14);
        assert_eq!(space.nodes()[local[9]].boundary_condition, BoundaryCondition::Interior);
    }
}

#[test]
fn space_2d_edge_nodes_inherit_side_conditions() {
    let mut mesh = create_unit_square_uniform_tri_mesh_2d(2).unwrap();
    mesh.set_boundary_conditions_by_side(
        BoundaryCondition::Natural,
        BoundaryCondition::Natural,
        BoundaryCondition::Essential,
        BoundaryCondition::Essential,
    )
    .unwrap();
    let space = FiniteElementSpace2d::new(&mesh, 2).unwrap();
    let condition_at = |x: f64, y: f64| {
        let node = space
            .nodes()
            .iter()
            .find(|node| (node.position - Point2::new(x, y)).norm() < 1e-12)
            .expect("node exists");
        node.boundary_condition
    };
    // The corner (0, 0) is constrained, but the left edge next to it is natural
    assert_eq!(condition_at(0.0, 0.0), BoundaryCondition::Essential);
    assert_eq!(condition_at(0.0, 0.25), BoundaryCondition::Natural);
    assert_eq!(condition_at(0.25, 0.0), BoundaryCondition::Essential);
    assert_eq!(condition_at(1.0, 0.75), BoundaryCondition::Natural);
    assert_eq!(condition_at(0.75, 1.0), BoundaryCondition::Essential);
    assert_eq!(condition_at(0.25, 0.25), BoundaryCondition::Interior);
}

#[test]
fn space_2d_reproduces_quadratics() {
    let mesh = unit_square_mesh(2, BoundaryCondition::Essential);
    let mut space = FiniteElementSpace2d::new(&mesh, 2).unwrap();
    let u = |x: f64, y: f64| x * x - 3.0 * x * y + 2.0 * y + 1.0;
    space.interpolate(0, u).unwrap();

    for (x, y) in [(0.1, 0.2), (0.5, 0.5), (0.9, 0.33), (1.0, 1.0), (0.0, 0.7)] {
        let p = Point2::new(x, y);
        assert_scalar_eq!(space.evaluate(0, &p, Derivative::VALUE).unwrap(), u(x, y), comp = abs, tol = 1e-12);
        assert_scalar_eq!(space.evaluate(0, &p, Derivative::DX).unwrap(), 2.0 * x - 3.0 * y, comp = abs, tol = 1e-11);
        assert_scalar_eq!(space.evaluate(0, &p, Derivative::DY).unwrap(), -3.0 * x + 2.0, comp = abs, tol = 1e-11);
    }

    let outside = Point2::new(1.5, 0.5);
    assert_err_matches!(space.locate_element(&outside), Error::Domain(_));
    assert!(space.contains(0, &Point2::new(0.4, 0.1)).unwrap());
    assert!(!space.contains(0, &Point2::new(0.1, 0.4)).unwrap());
    assert_err_matches!(space.contains(8, &outside), Error::IndexOutOfRange { index: 8, len: 8 });
}

#[test]
fn space_2d_apply_essential() {
    let mesh = unit_square_mesh(2, BoundaryCondition::Dirichlet);
    let mut space = FiniteElementSpace2d::with_components(&mesh, 2, 2).unwrap();
    space.apply_essential(1, |x, y| x + y).unwrap();
    for (i, node) in space.nodes().iter().enumerate() {
        let expected = if node.boundary_condition.is_constrained() {
            node.position.x + node.position.y
        } else {
            0.0
        };
        assert_scalar_eq!(space.value(i, 1).unwrap(), expected);
        assert_scalar_eq!(space.value(i, 0).unwrap(), 0.0);
    }
}
