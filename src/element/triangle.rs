use crate::{Error, Result, TOLERANCE};
use nalgebra::{Matrix2, Point2, Vector2};

/// A triangle with straight edges in two dimensions.
///
/// The reference triangle has corners `(0, 0)`, `(1, 0)` and `(0, 1)`, mapped to the
/// first, second and third vertex respectively. The map is `x = x_0 + B ξ` with
/// `B = [x_1 - x_0, x_2 - x_0]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tri3d2Element {
    vertices: [Point2<f64>; 3],
}

impl Tri3d2Element {
    pub fn from_vertices(vertices: [Point2<f64>; 3]) -> Self {
        Self { vertices }
    }

    pub fn reference() -> Self {
        Self::from_vertices([Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)])
    }

    pub fn vertices(&self) -> &[Point2<f64>; 3] {
        &self.vertices
    }

    /// The (constant) Jacobian `B` of the reference map.
    pub fn reference_jacobian(&self) -> Matrix2<f64> {
        let [x0, x1, x2] = &self.vertices;
        Matrix2::from_columns(&[x1 - x0, x2 - x0])
    }

    pub fn area(&self) -> f64 {
        0.5 * self.reference_jacobian().determinant().abs()
    }

    pub fn map_reference_coords(&self, xi: &Point2<f64>) -> Point2<f64> {
        self.vertices[0] + self.reference_jacobian() * xi.coords
    }

    /// The inverse of the reference Jacobian.
    ///
    /// Fails with [`Error::SingularSystem`] if the triangle is degenerate.
    pub fn inverse_reference_jacobian(&self) -> Result<Matrix2<f64>> {
        let b = self.reference_jacobian();
        let scale = b.amax().max(f64::MIN_POSITIVE);
        if b.determinant().abs() <= f64::EPSILON * scale * scale {
            return Err(Error::SingularSystem(format!(
                "triangle {:?} has zero area",
                self.vertices
            )));
        }
        b.try_inverse()
            .ok_or_else(|| Error::SingularSystem(format!("triangle {:?} is not invertible", self.vertices)))
    }

    /// Maps a physical point to reference coordinates.
    pub fn map_physical_coords(&self, x: &Point2<f64>) -> Result<Point2<f64>> {
        let b_inv = self.inverse_reference_jacobian()?;
        Ok(Point2::from(b_inv * (x - self.vertices[0])))
    }

    /// Whether the point lies in the closed triangle, up to [`TOLERANCE`] in reference coordinates.
    ///
    /// A degenerate triangle contains no points.
    pub fn contains(&self, x: &Point2<f64>) -> bool {
        match self.map_physical_coords(x) {
            Ok(xi) => {
                let lambda: Vector2<f64> = xi.coords;
                lambda.x >= -TOLERANCE && lambda.y >= -TOLERANCE && lambda.x + lambda.y <= 1.0 + TOLERANCE
            }
            Err(_) => false,
        }
    }

    pub fn centroid(&self) -> Point2<f64> {
        let [a, b, c] = &self.vertices;
        Point2::from((a.coords + b.coords + c.coords) / 3.0)
    }
}
