//! Equation systems composing assembly, elimination and the linear solve.
//!
//! Every system follows the same lifecycle, tracked by [`SystemState`]:
//!
//! - [`assemble`](EquationSystem::assemble) builds the reduced linear system, with the rows and
//!   columns of constrained nodes eliminated and their known values moved to the right-hand side,
//! - [`solve_system`](EquationSystem::solve_system) additionally solves it and returns the
//!   coefficients in the full numbering, with the stored values reinserted at constrained nodes,
//! - [`update`](EquationSystem::update) additionally writes the coefficients back into the
//!   fields of the spaces.
//!
//! Each call starts from scratch. Essential boundary values are taken from the stored fields at
//! the time of the call, so they should be set (for instance with
//! [`apply_essential`](crate::space::FiniteElementSpace2d::apply_essential)) before updating.
use crate::{Error, Result};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

mod elliptic;
mod stokes;

pub use elliptic::*;
pub use stokes::*;

/// A scalar coefficient on the real line.
pub type Coefficient1d<'a> = Box<dyn Fn(f64) -> f64 + Send + Sync + 'a>;

/// A scalar coefficient in the plane, called as `c(x, y)`.
pub type Coefficient2d<'a> = Box<dyn Fn(f64, f64) -> f64 + Send + Sync + 'a>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemState {
    Constructed,
    Assembled,
    Solved,
    Updated,
}

/// A reduced linear system `matrix * x = rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    pub matrix: DMatrix<f64>,
    pub rhs: DVector<f64>,
}

fn check_finite(solution: &DVector<f64>) -> Result<()> {
    match solution.iter().position(|x| !x.is_finite()) {
        Some(i) => Err(Error::NumericalInstability(format!(
            "solution entry {i} is {}",
            solution[i]
        ))),
        None => Ok(()),
    }
}

/// The equation systems supported by the library.
pub enum EquationSystem<'a, 'm> {
    Elliptic1d(Elliptic1d<'a, 'm>),
    Elliptic2d(Elliptic2d<'a, 'm>),
    Stokes(StokesFlow<'a, 'm>),
}

impl<'a, 'm> EquationSystem<'a, 'm> {
    /// Number of scalar fields solved for.
    pub fn num_equations(&self) -> usize {
        match self {
            Self::Elliptic1d(system) => system.num_equations(),
            Self::Elliptic2d(system) => system.num_equations(),
            Self::Stokes(system) => system.num_equations(),
        }
    }

    pub fn state(&self) -> SystemState {
        match self {
            Self::Elliptic1d(system) => system.state(),
            Self::Elliptic2d(system) => system.state(),
            Self::Stokes(system) => system.state(),
        }
    }

    pub fn assemble(&mut self, n_gq: usize) -> Result<LinearSystem> {
        match self {
            Self::Elliptic1d(system) => system.assemble(n_gq),
            Self::Elliptic2d(system) => system.assemble(n_gq),
            Self::Stokes(system) => system.assemble(n_gq),
        }
    }

    pub fn solve_system(&mut self, n_gq: usize) -> Result<DVector<f64>> {
        match self {
            Self::Elliptic1d(system) => system.solve_system(n_gq),
            Self::Elliptic2d(system) => system.solve_system(n_gq),
            Self::Stokes(system) => system.solve_system(n_gq),
        }
    }

    pub fn update(&mut self, n_gq: usize) -> Result<()> {
        match self {
            Self::Elliptic1d(system) => system.update(n_gq),
            Self::Elliptic2d(system) => system.update(n_gq),
            Self::Stokes(system) => system.update(n_gq),
        }
    }
}

impl<'a, 'm> From<Elliptic1d<'a, 'm>> for EquationSystem<'a, 'm> {
    fn from(system: Elliptic1d<'a, 'm>) -> Self {
        Self::Elliptic1d(system)
    }
}

impl<'a, 'm> From<Elliptic2d<'a, 'm>> for EquationSystem<'a, 'm> {
    fn from(system: Elliptic2d<'a, 'm>) -> Self {
        Self::Elliptic2d(system)
    }
}

impl<'a, 'm> From<StokesFlow<'a, 'm>> for EquationSystem<'a, 'm> {
    fn from(system: StokesFlow<'a, 'm>) -> Self {
        Self::Stokes(system)
    }
}
