use galerkin::element::{Segment2d1Element, Segment2d2Element, Tri3d2Element};
use galerkin::mesh::procedural::create_unit_square_uniform_tri_mesh_2d;
use galerkin::quadrature::{
    edge_rule, element_rule_2d, map_edge_rule, map_segment_rule, map_triangle_rule, reference_segment_rule,
    reference_triangle_rule,
};
use galerkin::Error;
use matrixcompare::assert_scalar_eq;
use nalgebra::Point2;
use proptest::prelude::*;
use util::assert_err_matches;

fn integrate_2d((weights, points): &(Vec<f64>, Vec<Point2<f64>>), f: impl Fn(&Point2<f64>) -> f64) -> f64 {
    weights.iter().zip(points).map(|(w, x)| w * f(x)).sum()
}

#[test]
fn unavailable_rules_are_reported() {
    assert_err_matches!(reference_segment_rule(1), Error::UnsupportedQuadratureOrder(1));
    assert_err_matches!(reference_segment_rule(8), Error::UnsupportedQuadratureOrder(8));
    assert_err_matches!(reference_triangle_rule(3), Error::UnsupportedQuadratureOrder(3));
}

#[test]
fn segment_rules_integrate_up_to_degree_2n_minus_1() {
    for n in 2..=7 {
        let (weights, points) = reference_segment_rule(n).unwrap();
        for degree in 0..2 * n {
            let integral: f64 = weights.iter().zip(&points).map(|(w, t)| w * t.powi(degree as i32)).sum();
            let expected = if degree % 2 == 0 { 2.0 / (degree as f64 + 1.0) } else { 0.0 };
            assert_scalar_eq!(integral, expected, comp = abs, tol = 1e-13);
        }
    }
}

#[test]
fn mapped_segment_rule_integrates_polynomials() {
    let segment = Segment2d1Element::from_interval([1.0, 3.5]);
    let rule = map_segment_rule(&reference_segment_rule(3).unwrap(), &segment).unwrap();
    let (weights, points) = rule;
    let integral: f64 = weights.iter().zip(&points).map(|(w, x)| w * x.powi(5)).sum();
    let expected = (3.5f64.powi(6) - 1.0) / 6.0;
    assert_scalar_eq!(integral, expected, comp = abs, tol = 1e-10);
}

#[test]
fn degenerate_entities_are_rejected() {
    let rule = reference_triangle_rule(7).unwrap();
    let collinear = Tri3d2Element::from_vertices([Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), Point2::new(2.0, 2.0)]);
    assert_err_matches!(map_triangle_rule(&rule, &collinear), Error::SingularSystem(_));

    let segment_rule = reference_segment_rule(2).unwrap();
    let point = Segment2d2Element::from_vertices([Point2::new(1.0, 1.0), Point2::new(1.0, 1.0)]);
    assert_err_matches!(map_edge_rule(&segment_rule, &point), Error::SingularSystem(_));
}

#[test]
fn element_rules_cover_the_mesh() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(3).unwrap();
    let mut area = 0.0;
    for k in 0..mesh.num_elements() {
        area += integrate_2d(&element_rule_2d(&mesh, k, 7).unwrap(), |_| 1.0);
    }
    assert_scalar_eq!(area, 1.0, comp = abs, tol = 1e-13);

    let mut perimeter = 0.0;
    for (e, edge) in mesh.edges().iter().enumerate() {
        if edge.is_boundary() {
            perimeter += integrate_2d(&edge_rule(&mesh, e, 2).unwrap(), |_| 1.0);
        }
    }
    assert_scalar_eq!(perimeter, 4.0, comp = abs, tol = 1e-13);
}

fn point_strategy() -> impl Strategy<Value = Point2<f64>> {
    (-2.0..2.0f64, -2.0..2.0f64).prop_map(|(x, y)| Point2::new(x, y))
}

proptest! {
    #[test]
    fn triangle_rule_is_exact_for_quintics(a in point_strategy(), b in point_strategy(), c in point_strategy()) {
        let triangle = Tri3d2Element::from_vertices([a, b, c]);
        prop_assume!(triangle.area() > 1e-3);
        let rule = map_triangle_rule(&reference_triangle_rule(7).unwrap(), &triangle).unwrap();

        // Compare against the rule applied to sub-triangles: both are exact for degree 5,
        // so they must agree with each other
        let f = |x: &Point2<f64>| x.x.powi(3) * x.y.powi(2) - 2.0 * x.x * x.y.powi(4) + x.y + 1.0;
        let m_ab = Point2::from((a.coords + b.coords) / 2.0);
        let m_bc = Point2::from((b.coords + c.coords) / 2.0);
        let m_ca = Point2::from((c.coords + a.coords) / 2.0);
        let refined: f64 = [[a, m_ab, m_ca], [m_ab, b, m_bc], [m_ca, m_bc, c], [m_ab, m_bc, m_ca]]
            .into_iter()
            .map(|vertices| {
                let sub = Tri3d2Element::from_vertices(vertices);
                integrate_2d(&map_triangle_rule(&reference_triangle_rule(7).unwrap(), &sub).unwrap(), f)
            })
            .sum();
        let integral = integrate_2d(&rule, f);
        prop_assert!((integral - refined).abs() <= 1e-9 * (1.0 + refined.abs()));

        // Affine functions integrate to area times the value at the centroid
        let g = |x: &Point2<f64>| 3.0 * x.x - x.y + 0.5;
        let expected = triangle.area() * g(&triangle.centroid());
        prop_assert!((integrate_2d(&rule, g) - expected).abs() <= 1e-10 * (1.0 + expected.abs()));
    }

    #[test]
    fn edge_rule_is_exact_along_random_edges(a in point_strategy(), b in point_strategy()) {
        let segment = Segment2d2Element::from_vertices([a, b]);
        prop_assume!(segment.length() > 1e-3);
        let rule = map_edge_rule(&reference_segment_rule(3).unwrap(), &segment).unwrap();

        // Along the edge, s -> f(a + s (b - a)) is a polynomial of degree 5 in s
        let f = |x: &Point2<f64>| x.x.powi(2) * x.y.powi(3) + x.x;
        let fine: f64 = (0..8)
            .map(|i| {
                let s0 = i as f64 / 8.0;
                let s1 = (i + 1) as f64 / 8.0;
                let sub = Segment2d2Element::from_vertices([a + (b - a) * s0, a + (b - a) * s1]);
                integrate_2d(&map_edge_rule(&reference_segment_rule(3).unwrap(), &sub).unwrap(), f)
            })
            .sum();
        prop_assert!((integrate_2d(&rule, f) - fine).abs() <= 1e-9 * (1.0 + fine.abs()));
        prop_assert!((integrate_2d(&rule, |_| 1.0) - segment.length()).abs() <= 1e-12);
    }
}
