//! Functionality for error estimation.
//!
//! All estimates compare a discrete field (or one of its derivatives) with a given function by
//! Gauss-Legendre quadrature over the elements of the space.
use crate::basis::{populate_segment_basis, Derivative, TriangleBasis};
use crate::quadrature::{map_segment_rule, map_triangle_rule, reference_segment_rule, reference_triangle_rule};
use crate::space::{FiniteElementSpace, FiniteElementSpace1d, FiniteElementSpace2d};
use crate::Result;
use itertools::izip;

/// Estimate the squared $L^2$ error $\norm{u_h^{(d)} - u}^2_{L^2(K)}$ on a single element of a 1D
/// space, where $u_h^{(d)}$ is the derivative of order `derivative` of the given component.
///
/// The function `u` is compared as is, so it should be the corresponding derivative of the exact
/// solution.
#[allow(non_snake_case)]
pub fn estimate_element_L2_error_squared_1d(
    space: &FiniteElementSpace1d,
    component: usize,
    u: impl Fn(f64) -> f64,
    element: usize,
    n_gq: usize,
    derivative: usize,
) -> Result<f64> {
    let reference_rule = reference_segment_rule(n_gq)?;
    let segment = space.segment(element)?;
    let (weights, points) = map_segment_rule(&reference_rule, &segment)?;
    let nodes = space.element_nodes(element)?;
    let u_h_element = nodes
        .iter()
        .map(|&i| space.value(i, component))
        .collect::<Result<Vec<_>>>()?;
    let mut phi = vec![0.0; nodes.len()];

    let mut result = 0.0;
    for (w, &x) in izip!(&weights, &points) {
        populate_segment_basis(&mut phi, &segment, space.polynomial_order(), x, derivative)?;
        let u_h: f64 = izip!(&u_h_element, &phi).map(|(u_j, phi_j)| u_j * phi_j).sum();
        let error = u_h - u(x);
        result += w * error * error;
    }
    Ok(result)
}

/// Estimate the $L^2$ error $\norm{u_h^{(d)} - u}_{L^2}$ over the whole domain of a 1D space.
#[allow(non_snake_case)]
pub fn estimate_L2_error_1d(
    space: &FiniteElementSpace1d,
    component: usize,
    u: impl Fn(f64) -> f64,
    n_gq: usize,
    derivative: usize,
) -> Result<f64> {
    let mut sum = 0.0;
    for k in 0..space.num_elements() {
        sum += estimate_element_L2_error_squared_1d(space, component, &u, k, n_gq, derivative)?;
    }
    Ok(sum.sqrt())
}

/// Estimate the squared $L^2$ error $\norm{\partial u_h - u}^2_{L^2(K)}$ on a single triangle of a
/// 2D space, where $\partial$ is the given partial derivative.
#[allow(non_snake_case)]
pub fn estimate_element_L2_error_squared_2d(
    space: &FiniteElementSpace2d,
    component: usize,
    u: impl Fn(f64, f64) -> f64,
    element: usize,
    n_gq: usize,
    derivative: Derivative,
) -> Result<f64> {
    let reference_rule = reference_triangle_rule(n_gq)?;
    let triangle = space.triangle(element)?;
    let basis = TriangleBasis::new(triangle, space.polynomial_order())?;
    let (weights, points) = map_triangle_rule(&reference_rule, &triangle)?;
    let nodes = space.element_nodes(element)?;
    let u_h_element = nodes
        .iter()
        .map(|&i| space.value(i, component))
        .collect::<Result<Vec<_>>>()?;
    let mut phi = vec![0.0; nodes.len()];

    let mut result = 0.0;
    for (w, x) in izip!(&weights, &points) {
        basis.populate(&mut phi, x, derivative)?;
        let u_h: f64 = izip!(&u_h_element, &phi).map(|(u_j, phi_j)| u_j * phi_j).sum();
        let error = u_h - u(x.x, x.y);
        result += w * error * error;
    }
    Ok(result)
}

/// Estimate the $L^2$ error $\norm{\partial u_h - u}_{L^2}$ over the whole mesh of a 2D space.
#[allow(non_snake_case)]
pub fn estimate_L2_error_2d(
    space: &FiniteElementSpace2d,
    component: usize,
    u: impl Fn(f64, f64) -> f64,
    n_gq: usize,
    derivative: Derivative,
) -> Result<f64> {
    let mut sum = 0.0;
    for k in 0..space.num_elements() {
        sum += estimate_element_L2_error_squared_2d(space, component, &u, k, n_gq, derivative)?;
    }
    Ok(sum.sqrt())
}

/// Estimate the $H^1$ seminorm error $\seminorm{u_h - u}_{H^1}$ over the whole mesh of a 2D
/// space, given the exact gradient as its two partial derivatives.
#[allow(non_snake_case)]
pub fn estimate_H1_seminorm_error_2d(
    space: &FiniteElementSpace2d,
    component: usize,
    u_x: impl Fn(f64, f64) -> f64,
    u_y: impl Fn(f64, f64) -> f64,
    n_gq: usize,
) -> Result<f64> {
    let mut sum = 0.0;
    for k in 0..space.num_elements() {
        sum += estimate_element_L2_error_squared_2d(space, component, &u_x, k, n_gq, Derivative::DX)?;
        sum += estimate_element_L2_error_squared_2d(space, component, &u_y, k, n_gq, Derivative::DY)?;
    }
    Ok(sum.sqrt())
}
