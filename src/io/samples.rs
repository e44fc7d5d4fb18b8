//! Comma-separated samples of discrete fields, for plotting.
//!
//! Every row holds the coordinates of a sample point followed by the sampled values. Points are
//! taken on a uniform grid in every element, so points on shared element boundaries appear once
//! per element.
use crate::basis::Derivative;
use crate::space::{FiniteElementSpace, FiniteElementSpace1d, FiniteElementSpace2d};
use eyre::{eyre, Context};
use nalgebra::Point2;
use std::io::Write;

/// Writes `x, u(x)` rows with `n` equally spaced points per element.
///
/// The points of an element are `x_L + i (x_R - x_L) / n` for `i = 0, ..., n - 1`; the right end
/// of the domain is added as the final row.
pub fn write_samples_1d<W: Write>(
    mut writer: W,
    space: &FiniteElementSpace1d,
    component: usize,
    n: usize,
    derivative: usize,
) -> eyre::Result<()> {
    if n == 0 {
        return Err(eyre!("at least one sample per element is required"));
    }
    let num_elements = space.num_elements();
    for k in 0..num_elements {
        let [x_l, x_r] = *space.segment(k)?.vertices();
        let last = if k + 1 == num_elements { n } else { n - 1 };
        for i in 0..=last {
            let x = x_l + i as f64 * (x_r - x_l) / n as f64;
            let u = space
                .evaluate_in_element(component, x, k, derivative)
                .wrap_err_with(|| format!("failed to sample element {k} at x = {x}"))?;
            writeln!(writer, "{x}, {u}")?;
        }
    }
    Ok(())
}

/// Writes `x, y, u(x, y)` rows for one component of a 2D field.
///
/// In every element, the sample points are the images of `(i / n, j / n)` with `i + j <= n` on the
/// reference triangle.
pub fn write_samples_2d<W: Write>(
    writer: W,
    space: &FiniteElementSpace2d,
    component: usize,
    n: usize,
    derivative: Derivative,
) -> eyre::Result<()> {
    write_rows_2d(writer, space, &[component], n, derivative)
}

/// Writes `x, y, u_c1(x, y), u_c2(x, y), ...` rows for several components of a 2D field, for
/// instance both velocity components of a flow.
pub fn write_field_samples_2d<W: Write>(
    writer: W,
    space: &FiniteElementSpace2d,
    components: &[usize],
    n: usize,
) -> eyre::Result<()> {
    if components.is_empty() {
        return Err(eyre!("at least one component must be sampled"));
    }
    write_rows_2d(writer, space, components, n, Derivative::VALUE)
}

fn write_rows_2d<W: Write>(
    mut writer: W,
    space: &FiniteElementSpace2d,
    components: &[usize],
    n: usize,
    derivative: Derivative,
) -> eyre::Result<()> {
    if n == 0 {
        return Err(eyre!("at least one subdivision per element is required"));
    }
    let reference_points: Vec<Point2<f64>> = (0..=n)
        .flat_map(|i| (0..=n - i).map(move |j| Point2::new(i as f64 / n as f64, j as f64 / n as f64)))
        .collect();

    for k in 0..space.num_elements() {
        let triangle = space.triangle(k)?;
        for xi in &reference_points {
            let x = triangle.map_reference_coords(xi);
            write!(writer, "{}, {}", x.x, x.y)?;
            for &c in components {
                let u = space
                    .evaluate_in_element(c, &x, k, derivative)
                    .wrap_err_with(|| format!("failed to sample element {k} at {x}"))?;
                write!(writer, ", {u}")?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}
