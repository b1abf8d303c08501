use crate::math::Vector3;

use super::edge::EdgeId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the mesh store.
    pub struct FaceId;
}

/// Data associated with a polygonal face.
///
/// `edges[i]` joins `vertices[i]` to `vertices[(i + 1) % n]`; together they
/// describe the face's cyclic boundary in traversal order.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// Corner vertices in winding order.
    pub vertices: Vec<VertexId>,
    /// Boundary edges in winding order.
    pub edges: Vec<EdgeId>,
    /// Unit normal following the right-hand rule over `vertices`.
    pub normal: Vector3,
}
