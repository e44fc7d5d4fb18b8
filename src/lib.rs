//! Dense Lagrange finite elements on interval and triangle meshes.
//!
//! The typical workflow is:
//!
//! 1. build a mesh (see [`mesh::procedural`] or [`io::mesh_file`]) and configure its boundary
//!    conditions,
//! 2. construct one or more finite element spaces over it (see [`space`]),
//! 3. construct an equation system from coefficient functions (see [`system`]) and call
//!    [`update`](system::EquationSystem::update),
//! 4. evaluate the discrete solution anywhere in the domain.
//!
//! All matrices are dense `nalgebra` matrices. The library is intended for small and moderately
//! sized problems.

pub mod assembly;
pub mod basis;
pub mod boundary;
pub mod element;
pub mod error;
pub mod io;
pub mod linalg;
pub mod mesh;
pub mod projection;
pub mod quadrature;
pub mod space;
pub mod system;

pub extern crate nalgebra;

pub use mesh::BoundaryCondition;

/// Geometric tolerance used for containment tests.
pub const TOLERANCE: f64 = 1e-10;

/// Library-wide error type.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Invalid construction parameters, unconfigured boundary conditions or incompatible spaces.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// An element, node or removal index is outside the valid range.
    #[error("index {index} is out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
    /// Operands have incompatible shapes.
    #[error("dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("no {0}-point quadrature rule is available")]
    UnsupportedQuadratureOrder(usize),
    #[error("polynomial order {0} is not supported")]
    UnsupportedPolynomialOrder(usize),
    #[error("derivative of order ({0}, {1}) is not supported")]
    UnsupportedDerivative(usize, usize),
    /// A point lies outside the region where it is required to be.
    #[error("domain error: {0}")]
    Domain(String),
    /// Zero pivot in a factorization or a degenerate element.
    #[error("singular system: {0}")]
    SingularSystem(String),
    /// A solution contains non-finite entries.
    #[error("numerical instability: {0}")]
    NumericalInstability(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<galerkin_quadrature::Error> for Error {
    fn from(error: galerkin_quadrature::Error) -> Self {
        match error {
            galerkin_quadrature::Error::NoRuleAvailable { num_points, .. } => {
                Self::UnsupportedQuadratureOrder(num_points)
            }
            other => Self::Configuration(other.to_string()),
        }
    }
}
