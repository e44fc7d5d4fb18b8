//! Lagrange shape functions.
//!
//! In 1D, shape functions of any order are built from the equally spaced nodes
//! `t_m = -1 + 2m/p` on the reference interval `[-1, 1]`. In 2D, closed forms of order 1 and 2
//! are provided on the reference triangle `(0, 0), (1, 0), (0, 1)`, with local nodes ordered as
//! the three vertices followed by the midpoints of the edges `(0, 1)`, `(1, 2)` and `(2, 0)`.
use crate::element::{Segment2d1Element, Tri3d2Element};
use crate::space::{FiniteElementSpace, FiniteElementSpace1d, FiniteElementSpace2d};
use crate::{Error, Result};
use nalgebra::{Matrix2, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Order of a partial derivative in two dimensions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Derivative {
    pub dx: usize,
    pub dy: usize,
}

impl Derivative {
    pub const VALUE: Self = Self { dx: 0, dy: 0 };
    pub const DX: Self = Self { dx: 1, dy: 0 };
    pub const DY: Self = Self { dx: 0, dy: 1 };

    pub const fn new(dx: usize, dy: usize) -> Self {
        Self { dx, dy }
    }

    pub const fn total_order(&self) -> usize {
        self.dx + self.dy
    }
}

/// Evaluates the Lagrange polynomial through `t_j` and `others` (or one of its derivatives) at `t`.
///
/// The polynomial equals one at `t_j` and zero at every point in `others`. Derivatives follow
/// the recursion `L^(d)(t) = Σ_i L_i^(d - 1)(t) / (t_j - t_i)`, where `L_i` is the polynomial
/// through `t_j` and `others` with `t_i` removed.
pub fn lagrange_polynomial_1d(t: f64, t_j: f64, others: &[f64], derivative: usize) -> f64 {
    if derivative == 0 {
        return others.iter().map(|t_i| (t - t_i) / (t_j - t_i)).product();
    }

    let mut reduced = Vec::with_capacity(others.len().saturating_sub(1));
    let mut sum = 0.0;
    for (i, t_i) in others.iter().enumerate() {
        reduced.clear();
        reduced.extend_from_slice(&others[..i]);
        reduced.extend_from_slice(&others[i + 1..]);
        sum += lagrange_polynomial_1d(t, t_j, &reduced, derivative - 1) / (t_j - t_i);
    }
    sum
}

/// The `p + 1` equally spaced nodes on `[-1, 1]`.
pub fn reference_nodes_1d(polynomial_order: usize) -> Vec<f64> {
    let p = polynomial_order as f64;
    (0..=polynomial_order).map(|m| -1.0 + 2.0 * m as f64 / p).collect()
}

/// Evaluates all shape functions of order `polynomial_order` on the segment at `x`.
///
/// The point is not checked for containment.
pub(crate) fn populate_segment_basis(
    basis_values: &mut [f64],
    segment: &Segment2d1Element,
    polynomial_order: usize,
    x: f64,
    derivative: usize,
) -> Result<()> {
    assert_eq!(basis_values.len(), polynomial_order + 1);
    let t = segment.map_physical_coords(x)?;
    let multiplier = (1.0 / segment.reference_jacobian()).powi(derivative as i32);
    let nodes = reference_nodes_1d(polynomial_order);
    let mut others = Vec::with_capacity(polynomial_order);
    for (j, value) in basis_values.iter_mut().enumerate() {
        others.clear();
        others.extend(nodes.iter().enumerate().filter(|(m, _)| *m != j).map(|(_, t_m)| *t_m));
        *value = multiplier * lagrange_polynomial_1d(t, nodes[j], &others, derivative);
    }
    Ok(())
}

/// Evaluates shape function `local_node` of `element` in the space (or its derivative) at `x`.
///
/// The derivative is taken with respect to the physical coordinate.
pub fn lagrange_shape_function_1d(
    x: f64,
    space: &FiniteElementSpace1d,
    element: usize,
    local_node: usize,
    derivative: usize,
) -> Result<f64> {
    let segment = space.mesh().segment(element)?;
    let p = space.polynomial_order();
    if local_node > p {
        return Err(Error::IndexOutOfRange {
            index: local_node,
            len: p + 1,
        });
    }
    if !segment.contains(x) {
        return Err(Error::Domain(format!(
            "x = {x} is outside element {element} spanning {:?}",
            segment.vertices()
        )));
    }
    let mut values = vec![0.0; p + 1];
    populate_segment_basis(&mut values, &segment, p, x, derivative)?;
    Ok(values[local_node])
}

/// Number of local nodes of a Lagrange triangle of the given order.
pub const fn triangle_nodes_per_element(polynomial_order: usize) -> usize {
    (polynomial_order + 1) * (polynomial_order + 2) / 2
}

/// The defining nodes of the closed-form shape functions on the reference triangle.
pub fn reference_nodes_2d(polynomial_order: usize) -> Result<Vec<Point2<f64>>> {
    let vertices = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)];
    match polynomial_order {
        1 => Ok(vertices.to_vec()),
        2 => {
            let mut nodes = vertices.to_vec();
            nodes.extend([Point2::new(0.5, 0.0), Point2::new(0.5, 0.5), Point2::new(0.0, 0.5)]);
            Ok(nodes)
        }
        p => Err(Error::UnsupportedPolynomialOrder(p)),
    }
}

/// Evaluates a closed-form shape function (or a partial derivative) on the reference triangle.
///
/// Orders 1 and 2 are supported. Derivatives of total order greater than two vanish for these
/// polynomials and evaluate to zero.
pub fn reference_lagrange_2d(
    polynomial_order: usize,
    local_node: usize,
    xi: &Point2<f64>,
    derivative: Derivative,
) -> Result<f64> {
    let (x, y) = (xi.x, xi.y);
    let out_of_range = |len| Error::IndexOutOfRange { index: local_node, len };
    let value = match polynomial_order {
        1 => match (local_node, derivative.dx, derivative.dy) {
            (0, 0, 0) => 1.0 - x - y,
            (0, 1, 0) | (0, 0, 1) => -1.0,
            (1, 0, 0) => x,
            (1, 1, 0) => 1.0,
            (2, 0, 0) => y,
            (2, 0, 1) => 1.0,
            (0..=2, _, _) => 0.0,
            _ => return Err(out_of_range(3)),
        },
        2 => {
            let l0 = 1.0 - x - y;
            match (local_node, derivative.dx, derivative.dy) {
                (0, 0, 0) => l0 * (2.0 * l0 - 1.0),
                (0, 1, 0) | (0, 0, 1) => 1.0 - 4.0 * l0,
                (0, 2, 0) | (0, 1, 1) | (0, 0, 2) => 4.0,

                (1, 0, 0) => x * (2.0 * x - 1.0),
                (1, 1, 0) => 4.0 * x - 1.0,
                (1, 2, 0) => 4.0,

                (2, 0, 0) => y * (2.0 * y - 1.0),
                (2, 0, 1) => 4.0 * y - 1.0,
                (2, 0, 2) => 4.0,

                (3, 0, 0) => 4.0 * x * l0,
                (3, 1, 0) => 4.0 * (1.0 - 2.0 * x - y),
                (3, 0, 1) => -4.0 * x,
                (3, 2, 0) => -8.0,
                (3, 1, 1) => -4.0,

                (4, 0, 0) => 4.0 * x * y,
                (4, 1, 0) => 4.0 * y,
                (4, 0, 1) => 4.0 * x,
                (4, 1, 1) => 4.0,

                (5, 0, 0) => 4.0 * y * l0,
                (5, 1, 0) => -4.0 * y,
                (5, 0, 1) => 4.0 * (1.0 - x - 2.0 * y),
                (5, 1, 1) => -4.0,
                (5, 0, 2) => -8.0,

                (0..=5, _, _) => 0.0,
                _ => return Err(out_of_range(6)),
            }
        }
        p => return Err(Error::UnsupportedPolynomialOrder(p)),
    };
    Ok(value)
}

/// Shape functions of a single triangle, with the inverse Jacobian computed once.
#[derive(Debug, Clone)]
pub(crate) struct TriangleBasis {
    triangle: Tri3d2Element,
    polynomial_order: usize,
    inverse_jacobian: Matrix2<f64>,
}

impl TriangleBasis {
    pub fn new(triangle: Tri3d2Element, polynomial_order: usize) -> Result<Self> {
        if !(1..=2).contains(&polynomial_order) {
            return Err(Error::UnsupportedPolynomialOrder(polynomial_order));
        }
        let inverse_jacobian = triangle.inverse_reference_jacobian()?;
        Ok(Self {
            triangle,
            polynomial_order,
            inverse_jacobian,
        })
    }

    pub fn triangle(&self) -> &Tri3d2Element {
        &self.triangle
    }

    pub fn num_nodes(&self) -> usize {
        triangle_nodes_per_element(self.polynomial_order)
    }

    /// Evaluates every shape function at the physical point. The point is not checked for
    /// containment.
    pub fn populate(&self, basis_values: &mut [f64], x: &Point2<f64>, derivative: Derivative) -> Result<()> {
        assert_eq!(basis_values.len(), self.num_nodes());
        let xi = Point2::from(self.inverse_jacobian * (x - self.triangle.vertices()[0]));
        let p = self.polynomial_order;
        match derivative {
            Derivative::VALUE => {
                for (j, value) in basis_values.iter_mut().enumerate() {
                    *value = reference_lagrange_2d(p, j, &xi, Derivative::VALUE)?;
                }
            }
            Derivative::DX | Derivative::DY => {
                // The physical gradient is B^{-T} times the reference gradient
                let row = if derivative == Derivative::DX { 0 } else { 1 };
                let b_inv = &self.inverse_jacobian;
                for (j, value) in basis_values.iter_mut().enumerate() {
                    let grad_ref = Vector2::new(
                        reference_lagrange_2d(p, j, &xi, Derivative::DX)?,
                        reference_lagrange_2d(p, j, &xi, Derivative::DY)?,
                    );
                    *value = b_inv[(0, row)] * grad_ref.x + b_inv[(1, row)] * grad_ref.y;
                }
            }
            Derivative { dx, dy } => return Err(Error::UnsupportedDerivative(dx, dy)),
        }
        Ok(())
    }
}

/// Evaluates shape function `local_node` of `element` in the space (or a first derivative)
/// at a physical point.
///
/// Supported derivatives are [`Derivative::VALUE`], [`Derivative::DX`] and [`Derivative::DY`].
pub fn lagrange_shape_function_2d(
    x: &Point2<f64>,
    space: &FiniteElementSpace2d,
    element: usize,
    local_node: usize,
    derivative: Derivative,
) -> Result<f64> {
    let triangle = space.mesh().triangle(element)?;
    let n = space.nodes_per_element();
    if local_node >= n {
        return Err(Error::IndexOutOfRange {
            index: local_node,
            len: n,
        });
    }
    let basis = TriangleBasis::new(triangle, space.polynomial_order())?;
    if !basis.triangle().contains(x) {
        return Err(Error::Domain(format!("point {x} is outside element {element}")));
    }
    let mut values = vec![0.0; n];
    basis.populate(&mut values, x, derivative)?;
    Ok(values[local_node])
}
