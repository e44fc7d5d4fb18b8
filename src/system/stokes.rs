use crate::assembly::{
    essential_boundary_vector, load_vector_2d, mass_matrix_2d, mixed_mass_matrix_2d, Derivative,
};
use crate::boundary::{eliminate_rectangular, eliminate_square, eliminate_vector, reinsert};
use crate::linalg::lu_solve;
use crate::space::{FiniteElementSpace, FiniteElementSpace2d};
use crate::system::{check_finite, Coefficient2d, LinearSystem, SystemState};
use crate::{Error, Result};
use log::{debug, info};
use nalgebra::{DMatrix, DVector};

const U1: usize = 0;
const U2: usize = 1;
const P: usize = 0;

/// Incompressible Stokes flow `-∇·(nu ∇u) + ∇p / rho = f`, `∇·u = 0` on a triangle mesh.
///
/// The viscosity `nu` and density `rho` are functions of position and must be positive at every
/// velocity node. The velocity components are stored as components 0 and 1 of the velocity space and the pressure
/// as component 0 of the pressure space. Pressure is only determined up to a constant by the
/// equations, so the mean pressure is fixed to zero with a Lagrange multiplier. The reduced system
/// has `2 N_u + N_p + 1` unknowns, ordered as the unconstrained nodes of `u1`, `u2`, `p` and
/// finally the multiplier:
///
/// ```text
/// [  A     0    -B_xᵀ   0 ] [ u1 ]   [ f1 ]
/// [  0     A    -B_yᵀ   0 ] [ u2 ] = [ f2 ]
/// [ -B_x  -B_y   0      l ] [ p  ]   [ 0  ]
/// [  0     0     lᵀ     0 ] [ λ  ]   [ 0  ]
/// ```
///
/// with `A = ∫ nu ∇φ_i·∇φ_j`, `B_x[i][j] = ∫ (1/rho) ψ_i ∂φ_j/∂x`, `B_y` likewise
/// and `l_i = ∫ ψ_i`.
/// Known velocity and pressure values at constrained nodes are moved to the right-hand side.
pub struct StokesFlow<'a, 'm> {
    velocity: &'a mut FiniteElementSpace2d<'m>,
    pressure: &'a mut FiniteElementSpace2d<'m>,
    f1: Coefficient2d<'a>,
    f2: Coefficient2d<'a>,
    nu: Coefficient2d<'a>,
    rho: Coefficient2d<'a>,
    state: SystemState,
}

impl<'a, 'm> StokesFlow<'a, 'm> {
    pub fn new(
        velocity: &'a mut FiniteElementSpace2d<'m>,
        pressure: &'a mut FiniteElementSpace2d<'m>,
        f1: impl Fn(f64, f64) -> f64 + Send + Sync + 'a,
        f2: impl Fn(f64, f64) -> f64 + Send + Sync + 'a,
        nu: impl Fn(f64, f64) -> f64 + Send + Sync + 'a,
        rho: impl Fn(f64, f64) -> f64 + Send + Sync + 'a,
    ) -> Result<Self> {
        if velocity.num_components() < 2 {
            return Err(Error::Configuration(format!(
                "velocity space needs 2 components, got {}",
                velocity.num_components()
            )));
        }
        if pressure.num_components() < 1 {
            return Err(Error::Configuration("pressure space needs 1 component".to_string()));
        }
        if !velocity.shares_mesh_with(pressure) {
            return Err(Error::Configuration(
                "velocity and pressure spaces must be built on the same mesh".to_string(),
            ));
        }
        for node in velocity.nodes() {
            let (x, y) = (node.position.x, node.position.y);
            let (nu, rho) = (nu(x, y), rho(x, y));
            if !(nu.is_finite() && nu > 0.0 && rho.is_finite() && rho > 0.0) {
                return Err(Error::Configuration(format!(
                    "viscosity and density must be positive, got nu = {nu}, rho = {rho} at ({x}, {y})"
                )));
            }
        }
        Ok(Self {
            velocity,
            pressure,
            f1: Box::new(f1),
            f2: Box::new(f2),
            nu: Box::new(nu),
            rho: Box::new(rho),
            state: SystemState::Constructed,
        })
    }

    pub fn velocity_space(&self) -> &FiniteElementSpace2d<'m> {
        &*self.velocity
    }

    pub fn pressure_space(&self) -> &FiniteElementSpace2d<'m> {
        &*self.pressure
    }

    pub fn num_equations(&self) -> usize {
        3
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    pub fn assemble(&mut self, n_gq: usize) -> Result<LinearSystem> {
        let velocity = &*self.velocity;
        let pressure = &*self.pressure;
        let nu = &self.nu;
        let inverse_rho = |x: f64, y: f64| 1.0 / (self.rho)(x, y);
        let velocity_constrained = velocity.constrained_indices();
        let pressure_constrained = pressure.constrained_indices();

        let mut a = mass_matrix_2d(velocity, nu, n_gq, Derivative::DX, Derivative::DX)?;
        a += mass_matrix_2d(velocity, nu, n_gq, Derivative::DY, Derivative::DY)?;
        let b_x = -mixed_mass_matrix_2d(pressure, velocity, inverse_rho, n_gq, Derivative::VALUE, Derivative::DX)?;
        let b_y = -mixed_mass_matrix_2d(pressure, velocity, inverse_rho, n_gq, Derivative::VALUE, Derivative::DY)?;
        let b_x_t = b_x.transpose();
        let b_y_t = b_y.transpose();
        let l = load_vector_2d(pressure, |_, _| 1.0, n_gq, Derivative::VALUE)?;

        let mut rhs_u1 = load_vector_2d(velocity, &self.f1, n_gq, Derivative::VALUE)?;
        rhs_u1 += essential_boundary_vector(&a, velocity, U1)?;
        rhs_u1 += essential_boundary_vector(&b_x_t, pressure, P)?;
        let mut rhs_u2 = load_vector_2d(velocity, &self.f2, n_gq, Derivative::VALUE)?;
        rhs_u2 += essential_boundary_vector(&a, velocity, U2)?;
        rhs_u2 += essential_boundary_vector(&b_y_t, pressure, P)?;
        let mut rhs_p = essential_boundary_vector(&b_x, velocity, U1)?;
        rhs_p += essential_boundary_vector(&b_y, velocity, U2)?;
        let l_row = DMatrix::from_row_slice(1, l.len(), l.as_slice());
        let rhs_multiplier = essential_boundary_vector(&l_row, pressure, P)?;

        let a = eliminate_square(a, velocity_constrained)?;
        let b_x = eliminate_rectangular(b_x, pressure_constrained, velocity_constrained)?;
        let b_y = eliminate_rectangular(b_y, pressure_constrained, velocity_constrained)?;
        let l = eliminate_vector(l, pressure_constrained)?;
        let rhs_u1 = eliminate_vector(rhs_u1, velocity_constrained)?;
        let rhs_u2 = eliminate_vector(rhs_u2, velocity_constrained)?;
        let rhs_p = eliminate_vector(rhs_p, pressure_constrained)?;

        let n_u = a.nrows();
        let n_p = l.len();
        let n = 2 * n_u + n_p + 1;
        let mut matrix = DMatrix::zeros(n, n);
        matrix.view_mut((0, 0), (n_u, n_u)).copy_from(&a);
        matrix.view_mut((n_u, n_u), (n_u, n_u)).copy_from(&a);
        matrix.view_mut((0, 2 * n_u), (n_u, n_p)).copy_from(&b_x.transpose());
        matrix.view_mut((n_u, 2 * n_u), (n_u, n_p)).copy_from(&b_y.transpose());
        matrix.view_mut((2 * n_u, 0), (n_p, n_u)).copy_from(&b_x);
        matrix.view_mut((2 * n_u, n_u), (n_p, n_u)).copy_from(&b_y);
        matrix.view_mut((2 * n_u, n - 1), (n_p, 1)).copy_from(&l);
        matrix.view_mut((n - 1, 2 * n_u), (1, n_p)).copy_from(&l.transpose());

        let mut rhs = DVector::zeros(n);
        rhs.rows_mut(0, n_u).copy_from(&rhs_u1);
        rhs.rows_mut(n_u, n_u).copy_from(&rhs_u2);
        rhs.rows_mut(2 * n_u, n_p).copy_from(&rhs_p);
        rhs[n - 1] = rhs_multiplier[0];

        debug!(
            "Assembled {n}x{n} Stokes system ({n_u} velocity and {n_p} pressure unknowns per field)"
        );
        self.state = SystemState::Assembled;
        Ok(LinearSystem { matrix, rhs })
    }

    /// Solves the system, returning `u1`, `u2` and `p` in the full node numbering of their spaces,
    /// followed by the multiplier.
    pub fn solve_system(&mut self, n_gq: usize) -> Result<DVector<f64>> {
        let LinearSystem { mut matrix, mut rhs } = self.assemble(n_gq)?;
        let n = rhs.len();

        // The leading block ending just before the multiplier is singular (constant pressure),
        // so the multiplier is eliminated before the last pressure unknown
        let swap = self.pressure_unknowns() > 0;
        if swap {
            matrix.swap_rows(n - 2, n - 1);
            matrix.swap_columns(n - 2, n - 1);
            rhs.swap_rows(n - 2, n - 1);
        }
        let mut reduced = lu_solve(&mut matrix, &rhs)?;
        if swap {
            reduced.swap_rows(n - 2, n - 1);
        }

        let velocity = &*self.velocity;
        let pressure = &*self.pressure;
        let n_u = velocity.num_nodes();
        let indices: Vec<usize> = velocity
            .constrained_indices()
            .iter()
            .copied()
            .chain(velocity.constrained_indices().iter().map(|&i| n_u + i))
            .chain(pressure.constrained_indices().iter().map(|&i| 2 * n_u + i))
            .collect();
        let u1 = velocity.component_values(U1)?;
        let u2 = velocity.component_values(U2)?;
        let p = pressure.component_values(P)?;
        let solution = reinsert(reduced, &indices, |i| {
            if i < n_u {
                u1[i]
            } else if i < 2 * n_u {
                u2[i - n_u]
            } else {
                p[i - 2 * n_u]
            }
        })?;

        self.state = SystemState::Solved;
        Ok(solution)
    }

    /// Solves the system and stores velocity and pressure in their spaces.
    ///
    /// The stored fields are left untouched if any step fails.
    pub fn update(&mut self, n_gq: usize) -> Result<()> {
        let solution = self.solve_system(n_gq)?;
        check_finite(&solution)?;
        let n_u = self.velocity.num_nodes();
        let n_p = self.pressure.num_nodes();
        self.velocity.set_component_values(U1, &solution.rows(0, n_u).into_owned())?;
        self.velocity.set_component_values(U2, &solution.rows(n_u, n_u).into_owned())?;
        self.pressure.set_component_values(P, &solution.rows(2 * n_u, n_p).into_owned())?;
        self.state = SystemState::Updated;
        info!("Updated Stokes solution with {n_u} velocity and {n_p} pressure nodes");
        Ok(())
    }

    fn pressure_unknowns(&self) -> usize {
        self.pressure.num_nodes() - self.pressure.constrained_indices().len()
    }
}
