//! Finite element spaces: degrees of freedom, connectivity and nodal field storage.
//!
//! A space is built once from a mesh with configured boundary conditions and a polynomial order.
//! Afterwards its node set and connectivity are immutable, while the nodal values of its fields
//! may be read and written freely.
use crate::{Error, Result};
use nalgebra::DVector;

mod lagrange_1d;
mod lagrange_2d;

pub use lagrange_1d::*;
pub use lagrange_2d::*;

/// Degree-of-freedom table shared by all spaces.
///
/// Holds the connectivity (global node indices for each element, in local node order),
/// the strictly increasing list of constrained nodes and the nodal values of every field
/// component.
#[derive(Debug, Clone, PartialEq)]
pub struct DofTable {
    polynomial_order: usize,
    nodes_per_element: usize,
    connectivity: Vec<usize>,
    constrained: Vec<usize>,
    num_nodes: usize,
    num_components: usize,
    values: Vec<f64>,
}

impl DofTable {
    fn new(
        polynomial_order: usize,
        nodes_per_element: usize,
        connectivity: Vec<usize>,
        constrained: Vec<usize>,
        num_nodes: usize,
        num_components: usize,
    ) -> Self {
        debug_assert_eq!(connectivity.len() % nodes_per_element, 0);
        debug_assert!(constrained.windows(2).all(|pair| pair[0] < pair[1]));
        Self {
            polynomial_order,
            nodes_per_element,
            connectivity,
            constrained,
            num_nodes,
            num_components,
            values: vec![0.0; num_nodes * num_components],
        }
    }

    fn check_node(&self, node: usize) -> Result<()> {
        if node < self.num_nodes {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index: node,
                len: self.num_nodes,
            })
        }
    }

    fn check_component(&self, component: usize) -> Result<()> {
        if component < self.num_components {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index: component,
                len: self.num_components,
            })
        }
    }
}

fn check_construction_parameters(polynomial_order: usize, num_components: usize, bcs_set: bool) -> Result<()> {
    if polynomial_order == 0 {
        return Err(Error::Configuration("polynomial order must be positive".to_string()));
    }
    if num_components == 0 {
        return Err(Error::Configuration("a space needs at least one field component".to_string()));
    }
    if !bcs_set {
        return Err(Error::Configuration(
            "boundary conditions must be set on the mesh before constructing a space".to_string(),
        ));
    }
    Ok(())
}

/// Common interface of the 1D and 2D Lagrange spaces.
pub trait FiniteElementSpace {
    fn dofs(&self) -> &DofTable;

    fn dofs_mut(&mut self) -> &mut DofTable;

    fn polynomial_order(&self) -> usize {
        self.dofs().polynomial_order
    }

    fn num_nodes(&self) -> usize {
        self.dofs().num_nodes
    }

    fn num_elements(&self) -> usize {
        self.dofs().connectivity.len() / self.dofs().nodes_per_element
    }

    fn num_components(&self) -> usize {
        self.dofs().num_components
    }

    fn nodes_per_element(&self) -> usize {
        self.dofs().nodes_per_element
    }

    /// Global node indices of the element, in local node order.
    fn element_nodes(&self, element: usize) -> Result<&[usize]> {
        let dofs = self.dofs();
        let n = dofs.nodes_per_element;
        dofs.connectivity
            .get(element * n..(element + 1) * n)
            .ok_or(Error::IndexOutOfRange {
                index: element,
                len: self.num_elements(),
            })
    }

    /// Nodes with a prescribed value, in increasing order.
    fn constrained_indices(&self) -> &[usize] {
        &self.dofs().constrained
    }

    fn value(&self, node: usize, component: usize) -> Result<f64> {
        let dofs = self.dofs();
        dofs.check_node(node)?;
        dofs.check_component(component)?;
        Ok(dofs.values[node * dofs.num_components + component])
    }

    fn set_value(&mut self, node: usize, component: usize, value: f64) -> Result<()> {
        let dofs = self.dofs_mut();
        dofs.check_node(node)?;
        dofs.check_component(component)?;
        dofs.values[node * dofs.num_components + component] = value;
        Ok(())
    }

    /// The nodal values of one field component.
    fn component_values(&self, component: usize) -> Result<DVector<f64>> {
        let dofs = self.dofs();
        dofs.check_component(component)?;
        Ok(DVector::from_fn(dofs.num_nodes, |i, _| {
            dofs.values[i * dofs.num_components + component]
        }))
    }

    fn set_component_values(&mut self, component: usize, values: &DVector<f64>) -> Result<()> {
        let dofs = self.dofs_mut();
        dofs.check_component(component)?;
        if values.len() != dofs.num_nodes {
            return Err(Error::DimensionMismatch {
                expected: (dofs.num_nodes, 1),
                actual: (values.len(), 1),
            });
        }
        for (i, v) in values.iter().enumerate() {
            dofs.values[i * dofs.num_components + component] = *v;
        }
        Ok(())
    }
}
