//! Network containers: intersection edges and deduplicated vertices.

use crate::Point3;

/// Intersection segment between two fractures.
#[derive(Clone, Copy, Debug)]
pub struct Edge {
    pub a: Point3,
    pub b: Point3,
    /// Source fracture ids, lower id first.
    pub fractures: (u32, u32),
}

impl Edge {
    #[inline]
    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }
}

/// Singular intersection point with its insertion index.
#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub point: Point3,
    pub index: u32,
}

/// Outcome of a vertex insertion attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexOutcome {
    Inserted(u32),
    Duplicate(u32),
}

/// Growable intersection network. Append-only during a sweep; rebuilt from
/// scratch whenever the fracture configuration changes.
#[derive(Clone, Debug, Default)]
pub struct Network {
    pub edges: Vec<Edge>,
    pub vertices: Vec<Vertex>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Insert a singular point unless an existing vertex already sits
    /// within `eps` of it. Scans the whole list, not just the latest entry,
    /// so duplicates separated by other insertions cannot slip in.
    pub fn push_vertex(&mut self, point: Point3, eps: f64) -> VertexOutcome {
        for v in &self.vertices {
            if (v.point - point).norm() <= eps {
                return VertexOutcome::Duplicate(v.index);
            }
        }
        let index = self.vertices.len() as u32;
        self.vertices.push(Vertex { point, index });
        VertexOutcome::Inserted(index)
    }
}
