//! $L^2$ projection of functions onto finite element spaces.
//!
//! The projection `u_h` of `f` satisfies `∫ u_h φ_i = ∫ f φ_i` for every shape function, that is
//! `M u = b` with the mass matrix `M` and the load vector `b`. Boundary tags are ignored.
use crate::assembly::{load_vector_1d, load_vector_2d, mass_matrix_1d, mass_matrix_2d, Derivative};
use crate::linalg::lu_solve;
use crate::space::{FiniteElementSpace, FiniteElementSpace1d, FiniteElementSpace2d};
use crate::Result;
use log::debug;

/// Projects `f` onto the given component of a 1D space, overwriting its values.
pub fn project_l2_1d(
    space: &mut FiniteElementSpace1d,
    component: usize,
    f: impl Fn(f64) -> f64,
    n_gq: usize,
) -> Result<()> {
    let mut mass = mass_matrix_1d(space, |_| 1.0, n_gq, 0, 0)?;
    let rhs = load_vector_1d(space, f, n_gq, 0)?;
    let u = lu_solve(&mut mass, &rhs)?;
    debug!("Projected function onto {} nodes", u.len());
    space.set_component_values(component, &u)
}

/// Projects `f` onto the given component of a 2D space, overwriting its values.
pub fn project_l2_2d(
    space: &mut FiniteElementSpace2d,
    component: usize,
    f: impl Fn(f64, f64) -> f64,
    n_gq: usize,
) -> Result<()> {
    let mut mass = mass_matrix_2d(space, |_, _| 1.0, n_gq, Derivative::VALUE, Derivative::VALUE)?;
    let rhs = load_vector_2d(space, f, n_gq, Derivative::VALUE)?;
    let u = lu_solve(&mut mass, &rhs)?;
    debug!("Projected function onto {} nodes", u.len());
    space.set_component_values(component, &u)
}
