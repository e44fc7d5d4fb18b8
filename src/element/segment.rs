use crate::{Error, Result, TOLERANCE};
use nalgebra::Point2;

/// A segment in one dimension.
///
/// The reference coordinate `t ∈ [-1, 1]` maps to `x = (a + b) / 2 + t (b - a) / 2`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Segment2d1Element {
    vertices: [f64; 2],
}

impl Segment2d1Element {
    pub fn from_interval(interval: [f64; 2]) -> Self {
        Self { vertices: interval }
    }

    pub fn vertices(&self) -> &[f64; 2] {
        &self.vertices
    }

    pub fn length(&self) -> f64 {
        self.vertices[1] - self.vertices[0]
    }

    pub fn midpoint(&self) -> f64 {
        0.5 * (self.vertices[0] + self.vertices[1])
    }

    /// The (constant) derivative `dx/dt` of the reference map.
    pub fn reference_jacobian(&self) -> f64 {
        0.5 * self.length()
    }

    pub fn map_reference_coords(&self, t: f64) -> f64 {
        self.midpoint() + t * self.reference_jacobian()
    }

    /// Maps a physical coordinate back to the reference interval.
    ///
    /// Fails with [`Error::SingularSystem`] for a segment of zero length.
    pub fn map_physical_coords(&self, x: f64) -> Result<f64> {
        let j = self.reference_jacobian();
        if j.abs() <= f64::EPSILON * self.vertices[0].abs().max(1.0) {
            return Err(Error::SingularSystem(format!(
                "segment {:?} has zero length",
                self.vertices
            )));
        }
        Ok((x - self.midpoint()) / j)
    }

    /// Whether `x` lies in the closed segment, up to [`TOLERANCE`].
    pub fn contains(&self, x: f64) -> bool {
        let [a, b] = self.vertices;
        x >= a.min(b) - TOLERANCE && x <= a.max(b) + TOLERANCE
    }
}

/// A straight segment embedded in two dimensions, used for boundary edges.
///
/// The reference coordinate `t ∈ [-1, 1]` maps to `(a + b) / 2 + t (b - a) / 2`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Segment2d2Element {
    vertices: [Point2<f64>; 2],
}

impl Segment2d2Element {
    pub fn from_vertices(vertices: [Point2<f64>; 2]) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point2<f64>; 2] {
        &self.vertices
    }

    pub fn length(&self) -> f64 {
        (self.vertices[1] - self.vertices[0]).norm()
    }

    pub fn map_reference_coords(&self, t: f64) -> Point2<f64> {
        let [a, b] = &self.vertices;
        a + (b - a) * (0.5 * (t + 1.0))
    }
}
