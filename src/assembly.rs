//! Assembly of dense global matrices and vectors.
//!
//! Every routine loops over the elements of a space, evaluates shape functions and the
//! user-supplied coefficient at the quadrature points of the element, accumulates a local
//! element matrix or vector and scatters it into the global system through the connectivity.
//!
//! For matrices, the first derivative argument applies to the test functions `φ_i` (rows) and the
//! second to the trial functions `φ_j` (columns):
//!
//! ```text
//! M[i][j] = Σ_K Σ_q w_q c(x_q) φ_i^(d1)(x_q) φ_j^(d2)(x_q).
//! ```
use crate::basis::{populate_segment_basis, TriangleBasis};
use crate::quadrature::{
    map_edge_rule, map_segment_rule, map_triangle_rule, reference_segment_rule, reference_triangle_rule,
};
use crate::space::{FiniteElementSpace, FiniteElementSpace1d, FiniteElementSpace2d};
use crate::{Error, Result};
use itertools::izip;
use log::debug;
use nalgebra::{DMatrix, DVector};

pub use crate::basis::Derivative;

fn add_element_matrix_to_global(
    global: &mut DMatrix<f64>,
    element_matrix: &DMatrix<f64>,
    row_nodes: &[usize],
    column_nodes: &[usize],
) {
    for (i_local, &i) in row_nodes.iter().enumerate() {
        for (j_local, &j) in column_nodes.iter().enumerate() {
            global[(i, j)] += element_matrix[(i_local, j_local)];
        }
    }
}

fn add_element_vector_to_global(global: &mut DVector<f64>, element_vector: &DVector<f64>, nodes: &[usize]) {
    for (i_local, &i) in nodes.iter().enumerate() {
        global[i] += element_vector[i_local];
    }
}

/// Assembles `∫ c φ_i^(d1) φ_j^(d2)` over a 1D space.
pub fn mass_matrix_1d(
    space: &FiniteElementSpace1d,
    coefficient: impl Fn(f64) -> f64,
    n_gq: usize,
    test_derivative: usize,
    trial_derivative: usize,
) -> Result<DMatrix<f64>> {
    let n = space.num_nodes();
    let p = space.polynomial_order();
    let n_local = space.nodes_per_element();
    let reference_rule = reference_segment_rule(n_gq)?;

    let mut global = DMatrix::zeros(n, n);
    let mut element_matrix = DMatrix::zeros(n_local, n_local);
    let mut phi_test = vec![0.0; n_local];
    let mut phi_trial = vec![0.0; n_local];

    for k in 0..space.num_elements() {
        let segment = space.segment(k)?;
        let (weights, points) = map_segment_rule(&reference_rule, &segment)?;
        element_matrix.fill(0.0);
        for (w, &x) in izip!(&weights, &points) {
            populate_segment_basis(&mut phi_test, &segment, p, x, test_derivative)?;
            populate_segment_basis(&mut phi_trial, &segment, p, x, trial_derivative)?;
            let c = w * coefficient(x);
            for (i, phi_i) in phi_test.iter().enumerate() {
                for (j, phi_j) in phi_trial.iter().enumerate() {
                    element_matrix[(i, j)] += c * phi_i * phi_j;
                }
            }
        }
        let nodes = space.element_nodes(k)?;
        add_element_matrix_to_global(&mut global, &element_matrix, nodes, nodes);
    }

    debug!(
        "Assembled {n}x{n} 1D matrix with derivatives ({test_derivative}, {trial_derivative})"
    );
    Ok(global)
}

/// Assembles `∫ f φ_i^(d)` over a 1D space.
///
/// Only the shape functions are differentiated, never `f`.
pub fn load_vector_1d(
    space: &FiniteElementSpace1d,
    f: impl Fn(f64) -> f64,
    n_gq: usize,
    derivative: usize,
) -> Result<DVector<f64>> {
    let p = space.polynomial_order();
    let n_local = space.nodes_per_element();
    let reference_rule = reference_segment_rule(n_gq)?;

    let mut global = DVector::zeros(space.num_nodes());
    let mut element_vector = DVector::zeros(n_local);
    let mut phi = vec![0.0; n_local];

    for k in 0..space.num_elements() {
        let segment = space.segment(k)?;
        let (weights, points) = map_segment_rule(&reference_rule, &segment)?;
        element_vector.fill(0.0);
        for (w, &x) in izip!(&weights, &points) {
            populate_segment_basis(&mut phi, &segment, p, x, derivative)?;
            let f_x = w * f(x);
            for (i, phi_i) in phi.iter().enumerate() {
                element_vector[i] += f_x * phi_i;
            }
        }
        add_element_vector_to_global(&mut global, &element_vector, space.element_nodes(k)?);
    }
    Ok(global)
}

/// Point contributions of the flux data `g` at natural boundary nodes of a 1D space.
///
/// The outward normal points to the left at the left end of the domain, so the contribution
/// there is `-g(x)`.
pub fn natural_boundary_vector_1d(space: &FiniteElementSpace1d, g: impl Fn(f64) -> f64) -> DVector<f64> {
    let mut b = DVector::zeros(space.num_nodes());
    for (i, node) in space.nodes().iter().enumerate() {
        if node.boundary_condition.is_natural() {
            let sign = if i == 0 { -1.0 } else { 1.0 };
            b[i] += sign * g(node.x);
        }
    }
    b
}

/// Assembles `∫ c φ_i^(d1) φ_j^(d2)` over a 2D space.
pub fn mass_matrix_2d(
    space: &FiniteElementSpace2d,
    coefficient: impl Fn(f64, f64) -> f64,
    n_gq: usize,
    test_derivative: Derivative,
    trial_derivative: Derivative,
) -> Result<DMatrix<f64>> {
    mixed_mass_matrix_2d(space, space, coefficient, n_gq, test_derivative, trial_derivative)
}

/// Assembles `∫ c ψ_i^(d1) φ_j^(d2)` with test functions `ψ_i` from one space and trial functions
/// `φ_j` from another.
///
/// The result has one row per node of the test space and one column per node of the trial space.
/// Both spaces must be built on the same triangulation, otherwise this fails with
/// [`Error::Configuration`].
pub fn mixed_mass_matrix_2d(
    test_space: &FiniteElementSpace2d,
    trial_space: &FiniteElementSpace2d,
    coefficient: impl Fn(f64, f64) -> f64,
    n_gq: usize,
    test_derivative: Derivative,
    trial_derivative: Derivative,
) -> Result<DMatrix<f64>> {
    if !test_space.shares_mesh_with(trial_space) {
        return Err(Error::Configuration(
            "test and trial spaces must be built on the same mesh".to_string(),
        ));
    }
    let reference_rule = reference_triangle_rule(n_gq)?;
    let n_test = test_space.nodes_per_element();
    let n_trial = trial_space.nodes_per_element();

    let mut global = DMatrix::zeros(test_space.num_nodes(), trial_space.num_nodes());
    let mut element_matrix = DMatrix::zeros(n_test, n_trial);
    let mut phi_test = vec![0.0; n_test];
    let mut phi_trial = vec![0.0; n_trial];

    for k in 0..test_space.num_elements() {
        let triangle = test_space.triangle(k)?;
        let test_basis = TriangleBasis::new(triangle, test_space.polynomial_order())?;
        let trial_basis = TriangleBasis::new(triangle, trial_space.polynomial_order())?;
        let (weights, points) = map_triangle_rule(&reference_rule, &triangle)?;

        element_matrix.fill(0.0);
        for (w, x) in izip!(&weights, &points) {
            test_basis.populate(&mut phi_test, x, test_derivative)?;
            trial_basis.populate(&mut phi_trial, x, trial_derivative)?;
            let c = w * coefficient(x.x, x.y);
            for (i, phi_i) in phi_test.iter().enumerate() {
                for (j, phi_j) in phi_trial.iter().enumerate() {
                    element_matrix[(i, j)] += c * phi_i * phi_j;
                }
            }
        }
        add_element_matrix_to_global(
            &mut global,
            &element_matrix,
            test_space.element_nodes(k)?,
            trial_space.element_nodes(k)?,
        );
    }

    debug!(
        "Assembled {}x{} 2D matrix with derivatives {:?}, {:?}",
        global.nrows(),
        global.ncols(),
        test_derivative,
        trial_derivative
    );
    Ok(global)
}

/// Assembles `∫ f φ_i^(d)` over a 2D space.
pub fn load_vector_2d(
    space: &FiniteElementSpace2d,
    f: impl Fn(f64, f64) -> f64,
    n_gq: usize,
    derivative: Derivative,
) -> Result<DVector<f64>> {
    let reference_rule = reference_triangle_rule(n_gq)?;
    let n_local = space.nodes_per_element();

    let mut global = DVector::zeros(space.num_nodes());
    let mut element_vector = DVector::zeros(n_local);
    let mut phi = vec![0.0; n_local];

    for k in 0..space.num_elements() {
        let triangle = space.triangle(k)?;
        let basis = TriangleBasis::new(triangle, space.polynomial_order())?;
        let (weights, points) = map_triangle_rule(&reference_rule, &triangle)?;
        element_vector.fill(0.0);
        for (w, x) in izip!(&weights, &points) {
            basis.populate(&mut phi, x, derivative)?;
            let f_x = w * f(x.x, x.y);
            for (i, phi_i) in phi.iter().enumerate() {
                element_vector[i] += f_x * phi_i;
            }
        }
        add_element_vector_to_global(&mut global, &element_vector, space.element_nodes(k)?);
    }
    Ok(global)
}

/// Integrates the flux data `g` against the shape functions along natural boundary edges.
///
/// A boundary edge takes part if at least one of its vertices carries a natural tag. The
/// shape functions are those of the triangle owning the edge, and an `n_gq`-point
/// Gauss-Legendre rule is used along the edge.
pub fn natural_boundary_vector_2d(
    space: &FiniteElementSpace2d,
    g: impl Fn(f64, f64) -> f64,
    n_gq: usize,
) -> Result<DVector<f64>> {
    let mesh = space.mesh();
    let reference_rule = reference_segment_rule(n_gq)?;
    let n_local = space.nodes_per_element();

    let mut global = DVector::zeros(space.num_nodes());
    let mut element_vector = DVector::zeros(n_local);
    let mut phi = vec![0.0; n_local];
    let mut num_natural_edges = 0;

    for (e, edge) in mesh.edges().iter().enumerate() {
        let is_natural = edge.is_boundary()
            && edge
                .vertices
                .iter()
                .any(|&v| mesh.nodes()[v].boundary_condition.is_natural());
        if !is_natural {
            continue;
        }
        num_natural_edges += 1;

        let k = edge.element;
        let basis = TriangleBasis::new(space.triangle(k)?, space.polynomial_order())?;
        let (weights, points) = map_edge_rule(&reference_rule, &mesh.edge_segment(e)?)?;
        element_vector.fill(0.0);
        for (w, x) in izip!(&weights, &points) {
            basis.populate(&mut phi, x, Derivative::VALUE)?;
            let g_x = w * g(x.x, x.y);
            for (j, phi_j) in phi.iter().enumerate() {
                element_vector[j] += g_x * phi_j;
            }
        }
        add_element_vector_to_global(&mut global, &element_vector, space.element_nodes(k)?);
    }

    debug!("Integrated natural boundary data over {num_natural_edges} edges");
    Ok(global)
}

/// Moves the contribution of known values to the right-hand side.
///
/// Returns `bc[i] = -Σ_j M[i][j] u_c(j)`, where `j` runs over the constrained nodes of the trial
/// space and `u_c` is the stored field of the given component. The matrix must have one column
/// per node of the trial space.
pub fn essential_boundary_vector(
    matrix: &DMatrix<f64>,
    trial_space: &impl FiniteElementSpace,
    component: usize,
) -> Result<DVector<f64>> {
    if matrix.ncols() != trial_space.num_nodes() {
        return Err(Error::DimensionMismatch {
            expected: (matrix.nrows(), trial_space.num_nodes()),
            actual: matrix.shape(),
        });
    }
    let mut bc = DVector::zeros(matrix.nrows());
    for &j in trial_space.constrained_indices() {
        let u_j = trial_space.value(j, component)?;
        if u_j != 0.0 {
            bc.axpy(-u_j, &matrix.column(j), 1.0);
        }
    }
    Ok(bc)
}
