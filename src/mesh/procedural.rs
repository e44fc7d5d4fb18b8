//! Basic procedural mesh generation routines.
use crate::mesh::{Mesh1d, Mesh2d};
use crate::{Error, Result};
use nalgebra::Point2;

/// Creates `num_elements` equally sized intervals covering `[x_min, x_max]`.
pub fn create_uniform_interval_mesh(x_min: f64, x_max: f64, num_elements: usize) -> Result<Mesh1d> {
    if num_elements == 0 {
        return Err(Error::Configuration("a mesh must have at least one element".to_string()));
    }
    if !(x_min < x_max) {
        return Err(Error::Configuration(format!(
            "invalid domain [{x_min}, {x_max}]: x_max must be greater than x_min"
        )));
    }

    let h = (x_max - x_min) / num_elements as f64;
    let mut coordinates: Vec<f64> = (0..num_elements).map(|i| x_min + i as f64 * h).collect();
    coordinates.push(x_max);
    Mesh1d::from_coordinates(coordinates)
}

/// Creates a uniform triangle mesh of the rectangle `[x_min, x_max] x [y_min, y_max]`.
///
/// The rectangle is divided into `nx * ny` cells, each of which is split along its
/// bottom-left to top-right diagonal into the triangles
/// `[bottom_left, bottom_right, top_right]` and `[bottom_left, top_left, top_right]`.
/// Vertices are numbered row by row from the bottom.
pub fn create_rectangular_uniform_tri_mesh_2d(
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    nx: usize,
    ny: usize,
) -> Result<Mesh2d> {
    if nx == 0 || ny == 0 {
        return Err(Error::Configuration(format!(
            "a mesh must have at least one cell in each direction, got {nx} x {ny}"
        )));
    }
    if !(x_min < x_max && y_min < y_max) {
        return Err(Error::Configuration(format!(
            "invalid rectangle [{x_min}, {x_max}] x [{y_min}, {y_max}]"
        )));
    }

    let dx = (x_max - x_min) / nx as f64;
    let dy = (y_max - y_min) / ny as f64;

    let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            vertices.push(Point2::new(x_min + i as f64 * dx, y_min + j as f64 * dy));
        }
    }

    let to_global_vertex_index = |i: usize, j: usize| (nx + 1) * j + i;

    let mut elements = Vec::with_capacity(2 * nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let bottom_left = to_global_vertex_index(i, j);
            let bottom_right = to_global_vertex_index(i + 1, j);
            let top_left = to_global_vertex_index(i, j + 1);
            let top_right = to_global_vertex_index(i + 1, j + 1);
            elements.push([bottom_left, bottom_right, top_right]);
            elements.push([bottom_left, top_left, top_right]);
        }
    }

    Mesh2d::from_vertices_and_elements(vertices, elements)
}

pub fn create_unit_square_uniform_tri_mesh_2d(cells_per_dim: usize) -> Result<Mesh2d> {
    create_rectangular_uniform_tri_mesh_2d(0.0, 1.0, 0.0, 1.0, cells_per_dim, cells_per_dim)
}
