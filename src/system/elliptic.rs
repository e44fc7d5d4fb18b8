use crate::assembly::{
    essential_boundary_vector, load_vector_1d, load_vector_2d, mass_matrix_1d, mass_matrix_2d,
    natural_boundary_vector_1d, natural_boundary_vector_2d, Derivative,
};
use crate::boundary::{eliminate_square, eliminate_vector, reinsert};
use crate::linalg::lu_solve;
use crate::space::{FiniteElementSpace, FiniteElementSpace1d, FiniteElementSpace2d};
use crate::system::{check_finite, Coefficient1d, Coefficient2d, LinearSystem, SystemState};
use crate::Result;
use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};

/// The field component an elliptic system solves for.
const COMPONENT: usize = 0;

/// Solves a reduced system and restores the full numbering with the stored constrained values.
fn solve_and_reinsert(system: LinearSystem, space: &impl FiniteElementSpace) -> Result<DVector<f64>> {
    let LinearSystem { mut matrix, rhs } = system;
    let reduced = lu_solve(&mut matrix, &rhs)?;
    let current = space.component_values(COMPONENT)?;
    reinsert(reduced, space.constrained_indices(), |i| current[i])
}

fn eliminate(matrix: DMatrix<f64>, rhs: DVector<f64>, space: &impl FiniteElementSpace) -> Result<LinearSystem> {
    let constrained = space.constrained_indices();
    if constrained.is_empty() {
        warn!("No constrained nodes: the problem is only well posed with a positive reaction coefficient");
    }
    let matrix = eliminate_square(matrix, constrained)?;
    let rhs = eliminate_vector(rhs, constrained)?;
    debug!(
        "Eliminated {} constrained nodes, {} unknowns remain",
        constrained.len(),
        rhs.len()
    );
    Ok(LinearSystem { matrix, rhs })
}

/// The problem `-(a u')' + b u' + c u = f` on an interval.
///
/// Nodes tagged natural receive the flux data `g = a u'`. Nodes tagged essential keep the value
/// stored in the space.
pub struct Elliptic1d<'a, 'm> {
    space: &'a mut FiniteElementSpace1d<'m>,
    a: Coefficient1d<'a>,
    b: Option<Coefficient1d<'a>>,
    c: Coefficient1d<'a>,
    f: Coefficient1d<'a>,
    g: Coefficient1d<'a>,
    state: SystemState,
}

impl<'a, 'm> Elliptic1d<'a, 'm> {
    pub fn new(
        space: &'a mut FiniteElementSpace1d<'m>,
        a: impl Fn(f64) -> f64 + Send + Sync + 'a,
        b: impl Fn(f64) -> f64 + Send + Sync + 'a,
        c: impl Fn(f64) -> f64 + Send + Sync + 'a,
        f: impl Fn(f64) -> f64 + Send + Sync + 'a,
        g: impl Fn(f64) -> f64 + Send + Sync + 'a,
    ) -> Self {
        Self {
            space,
            a: Box::new(a),
            b: Some(Box::new(b)),
            c: Box::new(c),
            f: Box::new(f),
            g: Box::new(g),
            state: SystemState::Constructed,
        }
    }

    /// The problem `-(a u')' + c u = f`.
    pub fn without_convection(
        space: &'a mut FiniteElementSpace1d<'m>,
        a: impl Fn(f64) -> f64 + Send + Sync + 'a,
        c: impl Fn(f64) -> f64 + Send + Sync + 'a,
        f: impl Fn(f64) -> f64 + Send + Sync + 'a,
        g: impl Fn(f64) -> f64 + Send + Sync + 'a,
    ) -> Self {
        Self {
            space,
            a: Box::new(a),
            b: None,
            c: Box::new(c),
            f: Box::new(f),
            g: Box::new(g),
            state: SystemState::Constructed,
        }
    }

    pub fn space(&self) -> &FiniteElementSpace1d<'m> {
        &*self.space
    }

    pub fn num_equations(&self) -> usize {
        1
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    pub fn assemble(&mut self, n_gq: usize) -> Result<LinearSystem> {
        let space = &*self.space;
        let mut matrix = mass_matrix_1d(space, &self.a, n_gq, 1, 1)?;
        if let Some(b) = &self.b {
            matrix += mass_matrix_1d(space, b, n_gq, 0, 1)?;
        }
        matrix += mass_matrix_1d(space, &self.c, n_gq, 0, 0)?;

        let mut rhs = load_vector_1d(space, &self.f, n_gq, 0)?;
        rhs += natural_boundary_vector_1d(space, &self.g);
        rhs += essential_boundary_vector(&matrix, space, COMPONENT)?;

        let system = eliminate(matrix, rhs, space)?;
        self.state = SystemState::Assembled;
        Ok(system)
    }

    pub fn solve_system(&mut self, n_gq: usize) -> Result<DVector<f64>> {
        let system = self.assemble(n_gq)?;
        let solution = solve_and_reinsert(system, &*self.space)?;
        self.state = SystemState::Solved;
        Ok(solution)
    }

    /// Solves the system and stores the result in the space.
    ///
    /// The stored field is left untouched if any step fails.
    pub fn update(&mut self, n_gq: usize) -> Result<()> {
        let solution = self.solve_system(n_gq)?;
        check_finite(&solution)?;
        self.space.set_component_values(COMPONENT, &solution)?;
        self.state = SystemState::Updated;
        info!("Updated 1D elliptic solution with {} nodes", solution.len());
        Ok(())
    }
}

/// The problem `-∇·(a ∇u) + (b_x, b_y)·∇u + c u = f` on a triangle mesh.
///
/// Boundary edges with a natural endpoint receive the flux data `g = a ∂u/∂n`. Nodes tagged
/// essential keep the value stored in the space.
pub struct Elliptic2d<'a, 'm> {
    space: &'a mut FiniteElementSpace2d<'m>,
    a: Coefficient2d<'a>,
    b: Option<[Coefficient2d<'a>; 2]>,
    c: Coefficient2d<'a>,
    f: Coefficient2d<'a>,
    g: Coefficient2d<'a>,
    state: SystemState,
}

impl<'a, 'm> Elliptic2d<'a, 'm> {
    pub fn new(
        space: &'a mut FiniteElementSpace2d<'m>,
        a: impl Fn(f64, f64) -> f64 + Send + Sync + 'a,
        b_x: impl Fn(f64, f64) -> f64 + Send + Sync + 'a,
        b_y: impl Fn(f64, f64) -> f64 + Send + Sync + 'a,
        c: impl Fn(f64, f64) -> f64 + Send + Sync + 'a,
        f: impl Fn(f64, f64) -> f64 + Send + Sync + 'a,
        g: impl Fn(f64, f64) -> f64 + Send + Sync + 'a,
    ) -> Self {
        Self {
            space,
            a: Box::new(a),
            b: Some([Box::new(b_x), Box::new(b_y)]),
            c: Box::new(c),
            f: Box::new(f),
            g: Box::new(g),
            state: SystemState::Constructed,
        }
    }

    /// The problem `-∇·(a ∇u) + c u = f`.
    pub fn without_convection(
        space: &'a mut FiniteElementSpace2d<'m>,
        a: impl Fn(f64, f64) -> f64 + Send + Sync + 'a,
        c: impl Fn(f64, f64) -> f64 + Send + Sync + 'a,
        f: impl Fn(f64, f64) -> f64 + Send + Sync + 'a,
        g: impl Fn(f64, f64) -> f64 + Send + Sync + 'a,
    ) -> Self {
        Self {
            space,
            a: Box::new(a),
            b: None,
            c: Box::new(c),
            f: Box::new(f),
            g: Box::new(g),
            state: SystemState::Constructed,
        }
    }

    pub fn space(&self) -> &FiniteElementSpace2d<'m> {
        &*self.space
    }

    pub fn num_equations(&self) -> usize {
        1
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    pub fn assemble(&mut self, n_gq: usize) -> Result<LinearSystem> {
        let space = &*self.space;
        let mut matrix = mass_matrix_2d(space, &self.a, n_gq, Derivative::DX, Derivative::DX)?;
        matrix += mass_matrix_2d(space, &self.a, n_gq, Derivative::DY, Derivative::DY)?;
        if let Some([b_x, b_y]) = &self.b {
            matrix += mass_matrix_2d(space, b_x, n_gq, Derivative::VALUE, Derivative::DX)?;
            matrix += mass_matrix_2d(space, b_y, n_gq, Derivative::VALUE, Derivative::DY)?;
        }
        matrix += mass_matrix_2d(space, &self.c, n_gq, Derivative::VALUE, Derivative::VALUE)?;

        let mut rhs = load_vector_2d(space, &self.f, n_gq, Derivative::VALUE)?;
        rhs += natural_boundary_vector_2d(space, &self.g, n_gq)?;
        rhs += essential_boundary_vector(&matrix, space, COMPONENT)?;

        let system = eliminate(matrix, rhs, space)?;
        self.state = SystemState::Assembled;
        Ok(system)
    }

    pub fn solve_system(&mut self, n_gq: usize) -> Result<DVector<f64>> {
        let system = self.assemble(n_gq)?;
        let solution = solve_and_reinsert(system, &*self.space)?;
        self.state = SystemState::Solved;
        Ok(solution)
    }

    /// Solves the system and stores the result in the space.
    ///
    /// The stored field is left untouched if any step fails.
    pub fn update(&mut self, n_gq: usize) -> Result<()> {
        let solution = self.solve_system(n_gq)?;
        check_finite(&solution)?;
        self.space.set_component_values(COMPONENT, &solution)?;
        self.state = SystemState::Updated;
        info!("Updated 2D elliptic solution with {} nodes", solution.len());
        Ok(())
    }
}
