//! Interval and triangle meshes with boundary condition tags.
use crate::element::{Segment2d1Element, Segment2d2Element, Tri3d2Element};
use crate::{Error, Result, TOLERANCE};
use log::debug;
use nalgebra::Point2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub mod procedural;

/// Boundary condition tag carried by mesh nodes and degrees of freedom.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BoundaryCondition {
    #[default]
    Interior,
    Natural,
    Essential,
    Dirichlet,
    Neumann,
    Corner,
}

impl BoundaryCondition {
    /// Whether the value at a node with this tag is prescribed, and hence eliminated.
    pub fn is_constrained(&self) -> bool {
        matches!(self, Self::Essential | Self::Dirichlet | Self::Corner)
    }

    /// Whether a node with this tag receives flux data through the natural boundary vector.
    pub fn is_natural(&self) -> bool {
        matches!(self, Self::Natural | Self::Neumann)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshNode1d {
    pub x: f64,
    pub boundary_condition: BoundaryCondition,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshNode2d {
    pub position: Point2<f64>,
    pub boundary_condition: BoundaryCondition,
    pub is_corner: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Adjacent to exactly one triangle.
    Boundary,
    /// Shared by two triangles.
    Interior,
}

/// An edge of a triangle mesh, stored with its vertex indices in increasing order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub vertices: [usize; 2],
    pub kind: EdgeKind,
    /// The first triangle (in element order) adjacent to the edge.
    pub element: usize,
}

impl Edge {
    pub fn is_boundary(&self) -> bool {
        self.kind == EdgeKind::Boundary
    }
}

/// A mesh of consecutive intervals on the real line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh1d {
    nodes: Vec<MeshNode1d>,
    elements: Vec<[usize; 2]>,
    boundary_conditions_set: bool,
}

impl Mesh1d {
    /// Creates a mesh whose elements join consecutive coordinates.
    ///
    /// The coordinates must be strictly increasing and there must be at least two of them.
    pub fn from_coordinates(coordinates: Vec<f64>) -> Result<Self> {
        if coordinates.len() < 2 {
            return Err(Error::Configuration(
                "a 1D mesh needs at least two nodes".to_string(),
            ));
        }
        if let Some(pair) = coordinates.windows(2).find(|pair| !(pair[0] < pair[1])) {
            return Err(Error::Configuration(format!(
                "mesh coordinates must be strictly increasing, found {} followed by {}",
                pair[0], pair[1]
            )));
        }

        let elements = (0..coordinates.len() - 1).map(|k| [k, k + 1]).collect();
        let nodes = coordinates
            .into_iter()
            .map(|x| MeshNode1d {
                x,
                boundary_condition: BoundaryCondition::Interior,
            })
            .collect();

        Ok(Self {
            nodes,
            elements,
            boundary_conditions_set: false,
        })
    }

    pub fn nodes(&self) -> &[MeshNode1d] {
        &self.nodes
    }

    pub fn elements(&self) -> &[[usize; 2]] {
        &self.elements
    }

    pub fn num_vertices(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// The endpoints `[x_min, x_max]` of the domain.
    pub fn domain(&self) -> [f64; 2] {
        // A mesh always has at least two nodes
        [self.nodes[0].x, self.nodes[self.nodes.len() - 1].x]
    }

    pub fn segment(&self, element: usize) -> Result<Segment2d1Element> {
        let [a, b] = *self.elements.get(element).ok_or(Error::IndexOutOfRange {
            index: element,
            len: self.elements.len(),
        })?;
        Ok(Segment2d1Element::from_interval([self.nodes[a].x, self.nodes[b].x]))
    }

    pub fn set_boundary_conditions(&mut self, left: BoundaryCondition, right: BoundaryCondition) {
        let last = self.nodes.len() - 1;
        self.nodes[0].boundary_condition = left;
        self.nodes[last].boundary_condition = right;
        self.boundary_conditions_set = true;
    }

    pub fn boundary_conditions_set(&self) -> bool {
        self.boundary_conditions_set
    }
}

/// A conforming triangle mesh with its edge table.
///
/// Edges are numbered by sorting their vertex pairs lexicographically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh2d {
    nodes: Vec<MeshNode2d>,
    elements: Vec<[usize; 3]>,
    edges: Vec<Edge>,
    boundary_conditions_set: bool,
}

impl Mesh2d {
    /// Creates a mesh from vertex positions and triangles, and builds the edge table.
    ///
    /// Fails if an element references a vertex out of bounds, repeats a vertex, or if an edge
    /// is shared by more than two triangles.
    pub fn from_vertices_and_elements(vertices: Vec<Point2<f64>>, elements: Vec<[usize; 3]>) -> Result<Self> {
        if elements.is_empty() {
            return Err(Error::Configuration("a 2D mesh needs at least one element".to_string()));
        }

        let num_vertices = vertices.len();
        let mut edge_counts: FxHashMap<[usize; 2], (usize, usize)> = FxHashMap::default();
        for (k, element) in elements.iter().enumerate() {
            for &v in element {
                if v >= num_vertices {
                    return Err(Error::IndexOutOfRange {
                        index: v,
                        len: num_vertices,
                    });
                }
            }
            let [a, b, c] = *element;
            if a == b || b == c || a == c {
                return Err(Error::Configuration(format!("element {k} repeats a vertex: {element:?}")));
            }
            for (i, j) in [(a, b), (b, c), (a, c)] {
                let key = [i.min(j), i.max(j)];
                edge_counts.entry(key).or_insert((0, k)).0 += 1;
            }
        }

        let mut edges = Vec::with_capacity(edge_counts.len());
        for (vertices, (count, element)) in edge_counts {
            let kind = match count {
                1 => EdgeKind::Boundary,
                2 => EdgeKind::Interior,
                _ => {
                    return Err(Error::Configuration(format!(
                        "edge {vertices:?} is shared by {count} elements"
                    )))
                }
            };
            edges.push(Edge {
                vertices,
                kind,
                element,
            });
        }
        edges.sort_unstable_by_key(|edge| edge.vertices);

        let nodes = vertices
            .into_iter()
            .map(|position| MeshNode2d {
                position,
                boundary_condition: BoundaryCondition::Interior,
                is_corner: false,
            })
            .collect();

        debug!(
            "Built triangle mesh with {} elements and {} edges",
            elements.len(),
            edges.len()
        );

        Ok(Self {
            nodes,
            elements,
            edges,
            boundary_conditions_set: false,
        })
    }

    pub fn nodes(&self) -> &[MeshNode2d] {
        &self.nodes
    }

    pub fn elements(&self) -> &[[usize; 3]] {
        &self.elements
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn num_vertices(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// The index of the edge joining the two vertices, in either order.
    pub fn edge_index(&self, a: usize, b: usize) -> Option<usize> {
        let key = [a.min(b), a.max(b)];
        self.edges.binary_search_by_key(&key, |edge| edge.vertices).ok()
    }

    pub fn triangle(&self, element: usize) -> Result<Tri3d2Element> {
        let [a, b, c] = *self.elements.get(element).ok_or(Error::IndexOutOfRange {
            index: element,
            len: self.elements.len(),
        })?;
        Ok(Tri3d2Element::from_vertices([
            self.nodes[a].position,
            self.nodes[b].position,
            self.nodes[c].position,
        ]))
    }

    pub fn edge_segment(&self, edge: usize) -> Result<Segment2d2Element> {
        let edge = self.edges.get(edge).ok_or(Error::IndexOutOfRange {
            index: edge,
            len: self.edges.len(),
        })?;
        let [a, b] = edge.vertices;
        Ok(Segment2d2Element::from_vertices([self.nodes[a].position, self.nodes[b].position]))
    }

    /// The axis-aligned bounding box as `(min, max)`.
    pub fn bounding_box(&self) -> (Point2<f64>, Point2<f64>) {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for node in &self.nodes {
            min = min.inf(&node.position);
            max = max.sup(&node.position);
        }
        (min, max)
    }

    /// For each vertex, the boundary edges it belongs to (at most two for a manifold boundary).
    fn boundary_edges_per_vertex(&self) -> Vec<Vec<usize>> {
        let mut per_vertex = vec![Vec::new(); self.nodes.len()];
        for (e, edge) in self.edges.iter().enumerate().filter(|(_, edge)| edge.is_boundary()) {
            for &v in &edge.vertices {
                per_vertex[v].push(e);
            }
        }
        per_vertex
    }

    /// Assigns boundary conditions to all boundary vertices through the given function.
    ///
    /// The function receives the position of the vertex and whether it is a corner, i.e. a
    /// vertex where two non-parallel boundary edges meet. Vertices away from the boundary are
    /// tagged [`BoundaryCondition::Interior`].
    pub fn set_boundary_conditions_with(&mut self, condition: impl Fn(&Point2<f64>, bool) -> BoundaryCondition) {
        let per_vertex = self.boundary_edges_per_vertex();
        for (v, edges) in per_vertex.iter().enumerate() {
            if edges.is_empty() {
                self.nodes[v].boundary_condition = BoundaryCondition::Interior;
                self.nodes[v].is_corner = false;
                continue;
            }
            let is_corner = self.is_corner(v, edges);
            let node = &mut self.nodes[v];
            node.is_corner = is_corner;
            node.boundary_condition = condition(&node.position, is_corner);
        }
        self.boundary_conditions_set = true;
    }

    /// Tags every boundary vertex with the same condition.
    pub fn set_uniform_boundary_condition(&mut self, condition: BoundaryCondition) {
        self.set_boundary_conditions_with(|_, _| condition);
    }

    /// Tags the boundary vertices of a rectangular domain side by side.
    ///
    /// Sides are identified through the bounding box of the mesh. A corner takes the condition of
    /// an adjacent constrained side if there is one, and otherwise that of its left or right side.
    /// Fails if a boundary vertex does not lie on any side of the bounding box.
    pub fn set_boundary_conditions_by_side(
        &mut self,
        left: BoundaryCondition,
        right: BoundaryCondition,
        top: BoundaryCondition,
        bottom: BoundaryCondition,
    ) -> Result<()> {
        let (min, max) = self.bounding_box();
        let on_side = |a: f64, b: f64| (a - b).abs() <= TOLERANCE * (1.0 + b.abs());

        let per_vertex = self.boundary_edges_per_vertex();
        if let Some(v) = per_vertex.iter().enumerate().find_map(|(v, edges)| {
            let p = &self.nodes[v].position;
            let on_any_side = on_side(p.x, min.x) || on_side(p.x, max.x) || on_side(p.y, min.y) || on_side(p.y, max.y);
            (!edges.is_empty() && !on_any_side).then_some(v)
        }) {
            return Err(Error::Configuration(format!(
                "boundary vertex {v} at {:?} does not lie on a side of the rectangle",
                self.nodes[v].position
            )));
        }

        self.set_boundary_conditions_with(|p, _| {
            let vertical = if on_side(p.x, min.x) {
                Some(left)
            } else if on_side(p.x, max.x) {
                Some(right)
            } else {
                None
            };
            let horizontal = if on_side(p.y, max.y) {
                Some(top)
            } else if on_side(p.y, min.y) {
                Some(bottom)
            } else {
                None
            };
            match (vertical, horizontal) {
                (Some(v), Some(h)) if !v.is_constrained() && h.is_constrained() => h,
                (Some(v), _) => v,
                (None, Some(h)) => h,
                // Ruled out above
                (None, None) => BoundaryCondition::Interior,
            }
        });
        Ok(())
    }

    pub fn boundary_conditions_set(&self) -> bool {
        self.boundary_conditions_set
    }

    fn is_corner(&self, vertex: usize, boundary_edges: &[usize]) -> bool {
        if boundary_edges.len() != 2 {
            return boundary_edges.len() > 2;
        }
        let direction = |e: usize| {
            let [a, b] = self.edges[e].vertices;
            let other = if a == vertex { b } else { a };
            self.nodes[other].position - self.nodes[vertex].position
        };
        let d1 = direction(boundary_edges[0]);
        let d2 = direction(boundary_edges[1]);
        let cross = d1.x * d2.y - d1.y * d2.x;
        cross.abs() > TOLERANCE * d1.norm() * d2.norm()
    }
}
