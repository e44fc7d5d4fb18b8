//! Quadrature rules for the reference domains used by `galerkin`.
//!
//! Two reference domains are supported:
//!
//! - the interval `[-1, 1]`, for which Gauss-Legendre rules with 2 to 7 points are tabulated,
//! - the triangle with corners `(0, 0)`, `(1, 0)` and `(0, 1)`, for which a symmetric 7-point
//!   rule of polynomial degree 5 is tabulated.
//!
//! The tables are plain data and the crate can be used independently of `galerkin`. The weights
//! of a rule always sum to the measure of its reference domain, i.e. `2` for the interval
//! and `1/2` for the triangle.

use std::fmt;
use std::fmt::{Display, Formatter};

mod tables;

/// Library-wide error type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Indicates that no rule with the requested number of points is tabulated for the domain.
    NoRuleAvailable {
        domain: ReferenceDomain,
        num_points: usize,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRuleAvailable { domain, num_points } => {
                write!(f, "no {num_points}-point quadrature rule is available for the reference {domain}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// The reference domains for which rules are tabulated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceDomain {
    Segment,
    Triangle,
}

impl Display for ReferenceDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Segment => write!(f, "segment [-1, 1]"),
            Self::Triangle => write!(f, "triangle (0, 0), (1, 0), (0, 1)"),
        }
    }
}

/// A D-dimensional point.
pub type Point<const D: usize> = [f64; D];

/// A two-dimensional point.
pub type Point2 = Point<2>;

/// A D-dimensional rule, stored as `(weights, points)`.
pub type Rule<const D: usize> = (Vec<f64>, Vec<Point<D>>);

/// A one-dimensional quadrature rule.
pub type Rule1d = Rule<1>;

/// A two-dimensional quadrature rule.
pub type Rule2d = Rule<2>;

/// Number of points of the tabulated triangle rule.
pub const TRIANGLE_RULE_POINTS: usize = 7;

/// The range of tabulated segment rules (inclusive).
pub const SEGMENT_RULE_POINTS: std::ops::RangeInclusive<usize> = 2..=7;

/// Returns the tabulated Gauss-Legendre rule on `[-1, 1]` with the given number of points.
///
/// An `n`-point rule integrates polynomials of degree up to `2n - 1` exactly.
pub fn segment(num_points: usize) -> Result<Rule1d, Error> {
    let (weights, points) = tables::segment(num_points).ok_or(Error::NoRuleAvailable {
        domain: ReferenceDomain::Segment,
        num_points,
    })?;
    Ok((weights.to_vec(), points.iter().map(|&x| [x]).collect()))
}

/// Returns the tabulated rule on the reference triangle with the given number of points.
///
/// Only the 7-point rule is available. It integrates polynomials of degree up to 5 exactly.
pub fn triangle(num_points: usize) -> Result<Rule2d, Error> {
    let (weights, points) = tables::triangle(num_points).ok_or(Error::NoRuleAvailable {
        domain: ReferenceDomain::Triangle,
        num_points,
    })?;
    Ok((weights.to_vec(), points.to_vec()))
}

/// Approximates the integral of `f` with the given rule.
pub fn integrate<const D: usize>(rule: &Rule<D>, f: impl Fn(&Point<D>) -> f64) -> f64 {
    let (weights, points) = rule;
    weights.iter().zip(points).map(|(w, x)| w * f(x)).sum()
}
