//! A plain-text triangle mesh format.
//!
//! ```text
//! >StartNodes
//! 0.0 0.0
//! 1.0 0.0
//! 0.0 1.0
//! >EndNodes
//! >StartElements
//! 0 1 2
//! >EndElements
//! ```
//!
//! Node lines hold two coordinates and element lines hold three zero-based vertex indices, all
//! separated by whitespace. Lines outside the two sections are ignored.
use crate::mesh::Mesh2d;
use eyre::{eyre, Context};
use log::{debug, warn};
use nalgebra::Point2;
use rustc_hash::FxHashMap;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

const START_NODES: &str = ">StartNodes";
const END_NODES: &str = ">EndNodes";
const START_ELEMENTS: &str = ">StartElements";
const END_ELEMENTS: &str = ">EndElements";

/// Loads a [`Mesh2d`] from the file at the given path.
pub fn load_mesh_2d<P: AsRef<Path>>(file_path: P) -> eyre::Result<Mesh2d> {
    let file_path = file_path.as_ref();
    let contents = std::fs::read_to_string(file_path)
        .wrap_err_with(|| format!("failed to read mesh file {}", file_path.display()))?;
    parse_mesh_2d(&contents).wrap_err_with(|| format!("failed to load mesh from {}", file_path.display()))
}

/// Parses a [`Mesh2d`] from the contents of a mesh file.
///
/// The boundary conditions of the returned mesh are not configured.
pub fn parse_mesh_2d(contents: &str) -> eyre::Result<Mesh2d> {
    let mut vertices = Vec::new();
    let mut elements = Vec::new();

    let mut lines = contents.lines().enumerate();
    while let Some((_, line)) = lines.next() {
        match line.trim() {
            START_NODES => {
                let rows = read_section(&mut lines, END_NODES)?;
                for (line_number, row) in rows {
                    let [x, y] =
                        parse_row::<f64, 2>(row).wrap_err_with(|| format!("invalid node on line {line_number}"))?;
                    vertices.push(Point2::new(x, y));
                }
            }
            START_ELEMENTS => {
                let rows = read_section(&mut lines, END_ELEMENTS)?;
                for (line_number, row) in rows {
                    let element =
                        parse_row::<usize, 3>(row).wrap_err_with(|| format!("invalid element on line {line_number}"))?;
                    elements.push(element);
                }
            }
            _ => {}
        }
    }

    if vertices.is_empty() {
        return Err(eyre!("mesh file does not contain any nodes"));
    }
    if elements.is_empty() {
        return Err(eyre!("mesh file does not contain any elements"));
    }
    warn_duplicate_vertices(&vertices);
    debug!(
        "Parsed mesh file with {} nodes and {} elements",
        vertices.len(),
        elements.len()
    );

    Mesh2d::from_vertices_and_elements(vertices, elements).wrap_err("mesh file describes an invalid mesh")
}

/// Writes a mesh in the format read by [`parse_mesh_2d`].
pub fn write_mesh_2d<W: Write>(mut writer: W, mesh: &Mesh2d) -> eyre::Result<()> {
    writeln!(writer, "{START_NODES}")?;
    for node in mesh.nodes() {
        writeln!(writer, "{} {}", node.position.x, node.position.y)?;
    }
    writeln!(writer, "{END_NODES}")?;
    writeln!(writer, "{START_ELEMENTS}")?;
    for [a, b, c] in mesh.elements() {
        writeln!(writer, "{a} {b} {c}")?;
    }
    writeln!(writer, "{END_ELEMENTS}")?;
    Ok(())
}

/// Collects the non-empty lines (with their one-based line numbers) up to the end marker.
fn read_section<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    end_marker: &str,
) -> eyre::Result<Vec<(usize, &'a str)>> {
    let mut rows = Vec::new();
    for (index, line) in lines {
        let line = line.trim();
        if line == end_marker {
            return Ok(rows);
        }
        if !line.is_empty() {
            rows.push((index + 1, line));
        }
    }
    Err(eyre!("section has no {end_marker} marker"))
}

fn parse_row<T, const N: usize>(row: &str) -> eyre::Result<[T; N]>
where
    T: FromStr + Copy + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let mut values = [T::default(); N];
    let mut count = 0;
    for token in row.split_whitespace() {
        if count < N {
            values[count] = token
                .parse()
                .wrap_err_with(|| format!("failed to parse '{token}'"))?;
        }
        count += 1;
    }
    if count != N {
        return Err(eyre!("expected {N} columns, found {count}"));
    }
    Ok(values)
}

fn warn_duplicate_vertices(vertices: &[Point2<f64>]) {
    let mut seen = FxHashMap::default();
    for (i, v) in vertices.iter().enumerate() {
        if let Some(first) = seen.insert([v.x.to_bits(), v.y.to_bits()], i) {
            warn!("Vertices {first} and {i} coincide at ({}, {})", v.x, v.y);
        }
    }
}
