use crate::basis::{triangle_nodes_per_element, Derivative, TriangleBasis};
use crate::element::Tri3d2Element;
use crate::mesh::{BoundaryCondition, Mesh2d};
use crate::space::{check_construction_parameters, DofTable, FiniteElementSpace};
use crate::{Error, Result};
use itertools::izip;
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A degree of freedom of a 2D space.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DofNode2d {
    pub position: Point2<f64>,
    pub boundary_condition: BoundaryCondition,
    pub is_corner: bool,
}

/// Local vertex pairs whose edges carry the edge nodes of an element, in local order.
pub const EDGE_LOCAL_VERTICES: [(usize, usize); 3] = [(1, 0), (2, 1), (2, 0)];

/// Continuous Lagrange space of order `p` over a triangle mesh.
///
/// Nodes are numbered as the mesh vertices first, then `p - 1` nodes per edge in edge order,
/// then `(p - 1)(p - 2) / 2` interior nodes per element in element order. Locally, an element
/// lists its three vertices, then the nodes of the edges [`EDGE_LOCAL_VERTICES`] (each running
/// from the first towards the second local vertex of the pair), then its interior nodes.
///
/// Evaluation of shape functions is available for `p = 1` and `p = 2`.
#[derive(Debug, Clone)]
pub struct FiniteElementSpace2d<'a> {
    mesh: &'a Mesh2d,
    nodes: Vec<DofNode2d>,
    dofs: DofTable,
}

impl<'a> FiniteElementSpace2d<'a> {
    /// A space with a single field component.
    pub fn new(mesh: &'a Mesh2d, polynomial_order: usize) -> Result<Self> {
        Self::with_components(mesh, polynomial_order, 1)
    }

    pub fn with_components(mesh: &'a Mesh2d, polynomial_order: usize, num_components: usize) -> Result<Self> {
        check_construction_parameters(polynomial_order, num_components, mesh.boundary_conditions_set())?;
        let p = polynomial_order;
        let nodes_per_edge = p - 1;
        let interior_per_element = (p - 1) * p.saturating_sub(2) / 2;
        let num_vertices = mesh.num_vertices();
        let first_edge_node = num_vertices;
        let first_interior_node = first_edge_node + nodes_per_edge * mesh.num_edges();
        let num_nodes = first_interior_node + interior_per_element * mesh.num_elements();

        let mut nodes = Vec::with_capacity(num_nodes);
        nodes.extend(mesh.nodes().iter().map(|node| DofNode2d {
            position: node.position,
            boundary_condition: node.boundary_condition,
            is_corner: node.is_corner,
        }));

        for edge in mesh.edges() {
            let [a, b] = edge.vertices.map(|v| &mesh.nodes()[v]);
            let boundary_condition = if edge.is_boundary() {
                // A corner takes its tag from the adjoining side, so the edge follows the other end
                if a.is_corner {
                    b.boundary_condition
                } else {
                    a.boundary_condition
                }
            } else {
                BoundaryCondition::Interior
            };
            for m in 1..p {
                let s = m as f64 / p as f64;
                nodes.push(DofNode2d {
                    position: a.position + (b.position - a.position) * s,
                    boundary_condition,
                    is_corner: false,
                });
            }
        }

        let interior_grid: Vec<Point2<f64>> = (0..p.saturating_sub(2))
            .flat_map(|i| (0..p - 2 - i).map(move |j| (i, j)))
            .map(|(i, j)| Point2::new((i + 1) as f64 / p as f64, (j + 1) as f64 / p as f64))
            .collect();
        debug_assert_eq!(interior_grid.len(), interior_per_element);
        for k in 0..mesh.num_elements() {
            let triangle = mesh.triangle(k)?;
            nodes.extend(interior_grid.iter().map(|xi| DofNode2d {
                position: triangle.map_reference_coords(xi),
                boundary_condition: BoundaryCondition::Interior,
                is_corner: false,
            }));
        }
        debug_assert_eq!(nodes.len(), num_nodes);

        let nodes_per_element = triangle_nodes_per_element(p);
        let mut connectivity = Vec::with_capacity(nodes_per_element * mesh.num_elements());
        for (k, element) in mesh.elements().iter().enumerate() {
            connectivity.extend_from_slice(element);
            for (first, second) in EDGE_LOCAL_VERTICES {
                let (a, b) = (element[first], element[second]);
                let e = mesh.edge_index(a, b).ok_or_else(|| {
                    Error::Configuration(format!("edge ({a}, {b}) of element {k} is missing from the edge table"))
                })?;
                let base = first_edge_node + e * nodes_per_edge;
                for m in 0..nodes_per_edge {
                    // Edge nodes are stored from the lower to the higher vertex index
                    let offset = if a < b { m } else { nodes_per_edge - 1 - m };
                    connectivity.push(base + offset);
                }
            }
            let base = first_interior_node + k * interior_per_element;
            connectivity.extend(base..base + interior_per_element);
        }

        let constrained: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.boundary_condition.is_constrained())
            .map(|(i, _)| i)
            .collect();

        debug!(
            "Constructed order {} space with {} nodes ({} constrained) and {} components",
            p,
            num_nodes,
            constrained.len(),
            num_components
        );

        Ok(Self {
            mesh,
            nodes,
            dofs: DofTable::new(p, nodes_per_element, connectivity, constrained, num_nodes, num_components),
        })
    }

    pub fn mesh(&self) -> &'a Mesh2d {
        self.mesh
    }

    pub fn nodes(&self) -> &[DofNode2d] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Result<&DofNode2d> {
        self.nodes.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.nodes.len(),
        })
    }

    pub fn triangle(&self, element: usize) -> Result<Tri3d2Element> {
        self.mesh.triangle(element)
    }

    /// Whether the element contains the point.
    pub fn contains(&self, element: usize, x: &Point2<f64>) -> Result<bool> {
        Ok(self.triangle(element)?.contains(x))
    }

    /// Finds the first element containing the point by a linear scan.
    pub fn locate_element(&self, x: &Point2<f64>) -> Result<usize> {
        (0..self.mesh.num_elements())
            .find(|&k| self.contains(k, x).unwrap_or(false))
            .ok_or_else(|| Error::Domain(format!("point {x} is not contained in any element")))
    }

    /// Evaluates the discrete field (or a first derivative of it) at a point.
    pub fn evaluate(&self, component: usize, x: &Point2<f64>, derivative: Derivative) -> Result<f64> {
        let element = self.locate_element(x)?;
        self.evaluate_in_element(component, x, element, derivative)
    }

    /// Evaluates the discrete field restricted to the given element.
    pub fn evaluate_in_element(
        &self,
        component: usize,
        x: &Point2<f64>,
        element: usize,
        derivative: Derivative,
    ) -> Result<f64> {
        let basis = TriangleBasis::new(self.triangle(element)?, self.polynomial_order())?;
        if !basis.triangle().contains(x) {
            return Err(Error::Domain(format!("point {x} is outside element {element}")));
        }
        let mut phi = vec![0.0; self.nodes_per_element()];
        basis.populate(&mut phi, x, derivative)?;
        let mut u = 0.0;
        for (&node, phi_j) in izip!(self.element_nodes(element)?, &phi) {
            u += self.value(node, component)? * phi_j;
        }
        Ok(u)
    }

    /// Sets the nodal values of a component to `f(x, y)` evaluated at every node.
    pub fn interpolate(&mut self, component: usize, f: impl Fn(f64, f64) -> f64) -> Result<()> {
        for i in 0..self.nodes.len() {
            let p = self.nodes[i].position;
            self.set_value(i, component, f(p.x, p.y))?;
        }
        Ok(())
    }

    /// Sets the nodal values of a component at every constrained node to `g(x, y)`.
    pub fn apply_essential(&mut self, component: usize, g: impl Fn(f64, f64) -> f64) -> Result<()> {
        for n in 0..self.dofs.constrained.len() {
            let i = self.dofs.constrained[n];
            let p = self.nodes[i].position;
            self.set_value(i, component, g(p.x, p.y))?;
        }
        Ok(())
    }

    /// Whether the other space is built on a mesh with the same topology.
    pub(crate) fn shares_mesh_with(&self, other: &FiniteElementSpace2d) -> bool {
        std::ptr::eq(self.mesh, other.mesh)
            || (self.mesh.num_vertices() == other.mesh.num_vertices()
                && self.mesh.num_edges() == other.mesh.num_edges()
                && self.mesh.elements() == other.mesh.elements())
    }
}

impl<'a> FiniteElementSpace for FiniteElementSpace2d<'a> {
    fn dofs(&self) -> &DofTable {
        &self.dofs
    }

    fn dofs_mut(&mut self) -> &mut DofTable {
        &mut self.dofs
    }
}
