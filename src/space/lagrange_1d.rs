use crate::basis::populate_segment_basis;
use crate::element::Segment2d1Element;
use crate::mesh::{BoundaryCondition, Mesh1d};
use crate::quadrature::{map_segment_rule, reference_segment_rule};
use crate::space::{check_construction_parameters, DofTable, FiniteElementSpace};
use crate::{Error, Result};
use itertools::izip;
use serde::{Deserialize, Serialize};

/// A degree of freedom of a 1D space.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DofNode1d {
    pub x: f64,
    pub boundary_condition: BoundaryCondition,
}

/// Continuous Lagrange space of order `p` over an interval mesh.
///
/// Element `K` owns the nodes `K p, ..., K p + p`, equally spaced over the element, so
/// consecutive elements share their common endpoint and the space has `n p + 1` nodes.
#[derive(Debug, Clone)]
pub struct FiniteElementSpace1d<'a> {
    mesh: &'a Mesh1d,
    nodes: Vec<DofNode1d>,
    dofs: DofTable,
}

impl<'a> FiniteElementSpace1d<'a> {
    /// A space with a single field component.
    pub fn new(mesh: &'a Mesh1d, polynomial_order: usize) -> Result<Self> {
        Self::with_components(mesh, polynomial_order, 1)
    }

    pub fn with_components(mesh: &'a Mesh1d, polynomial_order: usize, num_components: usize) -> Result<Self> {
        check_construction_parameters(polynomial_order, num_components, mesh.boundary_conditions_set())?;
        let p = polynomial_order;
        let num_elements = mesh.num_elements();
        let num_nodes = num_elements * p + 1;

        let mut nodes = Vec::with_capacity(num_nodes);
        for (k, &[a, b]) in mesh.elements().iter().enumerate() {
            let segment = mesh.segment(k)?;
            let [x_a, x_b] = *segment.vertices();
            nodes.push(DofNode1d {
                x: x_a,
                boundary_condition: mesh.nodes()[a].boundary_condition,
            });
            for m in 1..p {
                nodes.push(DofNode1d {
                    x: x_a + (x_b - x_a) * m as f64 / p as f64,
                    boundary_condition: BoundaryCondition::Interior,
                });
            }
            if k + 1 == num_elements {
                nodes.push(DofNode1d {
                    x: x_b,
                    boundary_condition: mesh.nodes()[b].boundary_condition,
                });
            }
        }
        debug_assert_eq!(nodes.len(), num_nodes);

        let connectivity = (0..num_elements)
            .flat_map(|k| k * p..=k * p + p)
            .collect();
        let constrained = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.boundary_condition.is_constrained())
            .map(|(i, _)| i)
            .collect();

        Ok(Self {
            mesh,
            nodes,
            dofs: DofTable::new(p, p + 1, connectivity, constrained, num_nodes, num_components),
        })
    }

    pub fn mesh(&self) -> &'a Mesh1d {
        self.mesh
    }

    pub fn nodes(&self) -> &[DofNode1d] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Result<&DofNode1d> {
        self.nodes.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.nodes.len(),
        })
    }

    pub fn segment(&self, element: usize) -> Result<Segment2d1Element> {
        self.mesh.segment(element)
    }

    /// Finds the first element containing `x` by a linear scan.
    pub fn locate_element(&self, x: f64) -> Result<usize> {
        (0..self.mesh.num_elements())
            .find(|&k| self.mesh.segment(k).map_or(false, |segment| segment.contains(x)))
            .ok_or_else(|| {
                let [a, b] = self.mesh.domain();
                Error::Domain(format!("x = {x} is outside the domain [{a}, {b}]"))
            })
    }

    /// Evaluates the discrete field (or a derivative of it) at `x`.
    pub fn evaluate(&self, component: usize, x: f64, derivative: usize) -> Result<f64> {
        let element = self.locate_element(x)?;
        self.evaluate_in_element(component, x, element, derivative)
    }

    /// Evaluates the discrete field restricted to the given element.
    pub fn evaluate_in_element(&self, component: usize, x: f64, element: usize, derivative: usize) -> Result<f64> {
        let segment = self.segment(element)?;
        if !segment.contains(x) {
            return Err(Error::Domain(format!(
                "x = {x} is outside element {element} spanning {:?}",
                segment.vertices()
            )));
        }
        let mut phi = vec![0.0; self.nodes_per_element()];
        populate_segment_basis(&mut phi, &segment, self.polynomial_order(), x, derivative)?;
        let mut u = 0.0;
        for (&node, phi_j) in izip!(self.element_nodes(element)?, &phi) {
            u += self.value(node, component)? * phi_j;
        }
        Ok(u)
    }

    /// Sets the nodal values of a component to `f` evaluated at every node.
    pub fn interpolate(&mut self, component: usize, f: impl Fn(f64) -> f64) -> Result<()> {
        for i in 0..self.nodes.len() {
            let x = self.nodes[i].x;
            self.set_value(i, component, f(x))?;
        }
        Ok(())
    }

    /// Sets the nodal values of a component at every constrained node to `g`.
    pub fn apply_essential(&mut self, component: usize, g: impl Fn(f64) -> f64) -> Result<()> {
        for n in 0..self.dofs.constrained.len() {
            let i = self.dofs.constrained[n];
            let x = self.nodes[i].x;
            self.set_value(i, component, g(x))?;
        }
        Ok(())
    }

    /// Integrates the discrete field over the domain with an `n_gq`-point rule per element.
    pub fn integrate(&self, component: usize, n_gq: usize) -> Result<f64> {
        let reference_rule = reference_segment_rule(n_gq)?;
        let mut phi = vec![0.0; self.nodes_per_element()];
        let mut integral = 0.0;
        for k in 0..self.num_elements() {
            let segment = self.segment(k)?;
            let (weights, points) = map_segment_rule(&reference_rule, &segment)?;
            let element_nodes = self.element_nodes(k)?;
            for (w, &x) in izip!(&weights, &points) {
                populate_segment_basis(&mut phi, &segment, self.polynomial_order(), x, 0)?;
                for (&node, phi_j) in izip!(element_nodes, &phi) {
                    integral += w * self.value(node, component)? * phi_j;
                }
            }
        }
        Ok(integral)
    }
}

impl<'a> FiniteElementSpace for FiniteElementSpace1d<'a> {
    fn dofs(&self) -> &DofTable {
        &self.dofs
    }

    fn dofs_mut(&mut self) -> &mut DofTable {
        &mut self.dofs
    }
}
