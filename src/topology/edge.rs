use super::face::FaceId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the mesh store.
    pub struct EdgeId;
}

/// Data associated with a mesh edge.
///
/// An edge is an undirected segment between two vertices. It records the
/// faces that use it so that interior, boundary and seam edges can be told
/// apart without a separate adjacency pass.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// First endpoint.
    pub start: VertexId,
    /// Second endpoint.
    pub end: VertexId,
    /// Marks an intentional break in the weave.
    pub seam: bool,
    /// Faces incident to this edge, in insertion order.
    pub(crate) link_faces: Vec<FaceId>,
}

impl EdgeData {
    /// Creates a new, unattached, non-seam edge.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId) -> Self {
        Self {
            start,
            end,
            seam: false,
            link_faces: Vec::new(),
        }
    }

    /// Faces incident to this edge.
    #[must_use]
    pub fn link_faces(&self) -> &[FaceId] {
        &self.link_faces
    }

    /// Returns `true` if the edge joins `a` and `b` in either direction.
    #[must_use]
    pub fn connects(&self, a: VertexId, b: VertexId) -> bool {
        (self.start == a && self.end == b) || (self.start == b && self.end == a)
    }

    /// Returns `true` if either endpoint is `v`.
    #[must_use]
    pub fn touches(&self, v: VertexId) -> bool {
        self.start == v || self.end == v
    }

    /// The endpoint opposite to `v`, if `v` is an endpoint.
    #[must_use]
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if self.start == v {
            Some(self.end)
        } else if self.end == v {
            Some(self.start)
        } else {
            None
        }
    }
}
