//! Quadrature rules on reference and physical elements.
//!
//! Reference rules come from `galerkin_quadrature`. The `element_*` and `edge_*` functions map them
//! onto a particular mesh entity, scaling the weights by the Jacobian determinant so that they sum
//! to the length or area of the entity.
use crate::element::{Segment2d1Element, Segment2d2Element, Tri3d2Element};
use crate::mesh::{Mesh1d, Mesh2d};
use crate::{Error, Result};
use nalgebra::Point2;

/// Weights and points of a one-dimensional rule.
pub type QuadraturePair1d = (Vec<f64>, Vec<f64>);

/// Weights and points of a rule in the plane.
pub type QuadraturePair2d = (Vec<f64>, Vec<Point2<f64>>);

/// The Gauss-Legendre rule with `num_points` points on `[-1, 1]`.
pub fn reference_segment_rule(num_points: usize) -> Result<QuadraturePair1d> {
    let (weights, points) = galerkin_quadrature::segment(num_points)?;
    Ok((weights, points.into_iter().map(|[t]| t).collect()))
}

/// The `num_points` rule on the reference triangle `(0, 0), (1, 0), (0, 1)`.
pub fn reference_triangle_rule(num_points: usize) -> Result<QuadraturePair2d> {
    let (weights, points) = galerkin_quadrature::triangle(num_points)?;
    Ok((weights, points.into_iter().map(Point2::from).collect()))
}

fn check_measure(measure: f64, what: impl FnOnce() -> String) -> Result<()> {
    if measure > 0.0 && measure.is_finite() {
        Ok(())
    } else {
        Err(Error::SingularSystem(format!("{} has zero measure", what())))
    }
}

/// Maps a reference rule on `[-1, 1]` onto a segment.
pub fn map_segment_rule(rule: &QuadraturePair1d, segment: &Segment2d1Element) -> Result<QuadraturePair1d> {
    let j = segment.reference_jacobian();
    check_measure(j.abs(), || format!("segment {:?}", segment.vertices()))?;
    let (weights, points) = rule;
    Ok((
        weights.iter().map(|w| w * j.abs()).collect(),
        points.iter().map(|&t| segment.map_reference_coords(t)).collect(),
    ))
}

/// Maps a reference rule on the reference triangle onto a triangle.
pub fn map_triangle_rule(rule: &QuadraturePair2d, triangle: &Tri3d2Element) -> Result<QuadraturePair2d> {
    let j_det = 2.0 * triangle.area();
    check_measure(j_det, || format!("triangle {:?}", triangle.vertices()))?;
    let (weights, points) = rule;
    Ok((
        weights.iter().map(|w| w * j_det).collect(),
        points.iter().map(|xi| triangle.map_reference_coords(xi)).collect(),
    ))
}

/// Maps a reference rule on `[-1, 1]` onto a straight segment in the plane.
pub fn map_edge_rule(rule: &QuadraturePair1d, segment: &Segment2d2Element) -> Result<QuadraturePair2d> {
    let half_length = 0.5 * segment.length();
    check_measure(half_length, || format!("edge {:?}", segment.vertices()))?;
    let (weights, points) = rule;
    Ok((
        weights.iter().map(|w| w * half_length).collect(),
        points.iter().map(|&t| segment.map_reference_coords(t)).collect(),
    ))
}

/// The `num_points` Gauss-Legendre rule on the given element of a 1D mesh.
pub fn element_rule_1d(mesh: &Mesh1d, element: usize, num_points: usize) -> Result<QuadraturePair1d> {
    map_segment_rule(&reference_segment_rule(num_points)?, &mesh.segment(element)?)
}

/// The `num_points` rule on the given triangle of a 2D mesh.
pub fn element_rule_2d(mesh: &Mesh2d, element: usize, num_points: usize) -> Result<QuadraturePair2d> {
    map_triangle_rule(&reference_triangle_rule(num_points)?, &mesh.triangle(element)?)
}

/// The `num_points` Gauss-Legendre rule along the given edge of a 2D mesh.
pub fn edge_rule(mesh: &Mesh2d, edge: usize, num_points: usize) -> Result<QuadraturePair2d> {
    map_edge_rule(&reference_segment_rule(num_points)?, &mesh.edge_segment(edge)?)
}
