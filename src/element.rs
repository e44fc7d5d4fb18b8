//! Affine geometric elements.
//!
//! An element maps a reference domain onto its physical shape by an affine map. For segments the
//! reference domain is `[-1, 1]`, for triangles it is the triangle with corners `(0, 0)`, `(1, 0)`
//! and `(0, 1)`, so that reference quadrature rules from `galerkin_quadrature` apply directly.

mod segment;
mod triangle;

pub use segment::*;
pub use triangle::*;
