use tracing::trace;

use crate::error::Result;
use crate::topology::{EdgeId, FaceId, MeshStore, VertexId};

use super::{EdgeClassifier, SeamToggles};

/// Which strand layer a generated point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
}

/// A freshly created knot vertex, tagged with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedPoint {
    /// The new vertex in the working store.
    pub vertex: VertexId,
    /// Source edge whose classification produced the point.
    pub edge: EdgeId,
    /// Source face whose ring the point belongs to.
    pub face: FaceId,
    /// Whether the ring enters or leaves through this point.
    pub side: Side,
}

/// The closed strand built around one face.
#[derive(Debug, Clone)]
pub struct FaceRing {
    /// The face the ring was built for.
    pub face: FaceId,
    /// Entry points, one per boundary edge in traversal order.
    pub tops: Vec<GeneratedPoint>,
    /// Exit points, one per boundary edge in traversal order.
    pub bottoms: Vec<GeneratedPoint>,
    /// Connecting edges; `edges[i]` joins `bottoms[i - 1]` to `tops[i]`.
    pub edges: Vec<EdgeId>,
}

impl FaceRing {
    /// All generated vertices of the ring, tops first.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.tops.iter().chain(&self.bottoms).map(|g| g.vertex)
    }
}

/// Builds the strand ring for `face` inside `store`.
///
/// Every boundary edge is classified in the face's cyclic order and gets a
/// new top and bottom vertex, even where an adjacent face will later produce
/// the same coordinates. The ring then links each edge's exit point to the
/// next edge's entry point, giving `2n` vertices and `n` edges for a face of
/// degree `n`. Original geometry is not modified.
///
/// # Errors
///
/// Propagates classification errors; the store may then hold a partial ring
/// and should be discarded.
pub fn build_face_ring(
    store: &mut MeshStore,
    face: FaceId,
    classifier: &mut EdgeClassifier,
    toggles: &mut SeamToggles,
) -> Result<FaceRing> {
    let boundary = store.face(face)?.edges.clone();
    let points = boundary
        .iter()
        .map(|&edge| classifier.classify(store, face, edge, toggles))
        .collect::<Result<Vec<_>>>()?;

    let n = boundary.len();
    let mut tops = Vec::with_capacity(n);
    let mut bottoms = Vec::with_capacity(n);
    for (&edge, pts) in boundary.iter().zip(&points) {
        tops.push(GeneratedPoint {
            vertex: store.add_vertex(pts.top),
            edge,
            face,
            side: Side::Top,
        });
        bottoms.push(GeneratedPoint {
            vertex: store.add_vertex(pts.bottom),
            edge,
            face,
            side: Side::Bottom,
        });
    }

    let mut edges = Vec::with_capacity(n);
    for i in 0..n {
        let prev = (i + n - 1) % n;
        edges.push(store.add_edge(bottoms[prev].vertex, tops[i].vertex)?);
    }

    trace!(?face, degree = n, "built face ring");
    Ok(FaceRing {
        face,
        tops,
        bottoms,
        edges,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::creation::{MakeGrid, MakePolygonMesh};
    use crate::operations::knot::KnotParams;
    use approx::assert_relative_eq;

    #[test]
    fn interior_quad_ring_has_eight_points_and_four_edges() {
        let mut store = MeshStore::new();
        let faces = MakeGrid::new(Point3::origin(), 3.0, 3.0, 3, 3)
            .execute(&mut store)
            .unwrap();
        let center = faces[4];
        assert!(store
            .face(center)
            .unwrap()
            .edges
            .iter()
            .all(|&e| store.edge(e).unwrap().link_faces().len() == 2));
        let (verts_before, edges_before) = (store.vertex_count(), store.edge_count());

        let mut classifier = EdgeClassifier::new(KnotParams::default());
        let mut toggles = SeamToggles::new();
        let ring = build_face_ring(&mut store, center, &mut classifier, &mut toggles).unwrap();

        assert_eq!(ring.tops.len(), 4);
        assert_eq!(ring.bottoms.len(), 4);
        assert_eq!(ring.edges.len(), 4);
        assert_eq!(store.vertex_count(), verts_before + 8);
        assert_eq!(store.edge_count(), edges_before + 4);
        assert_eq!(store.face_count(), 9);
    }

    #[test]
    fn ring_links_exit_to_next_entry() {
        let mut store = MeshStore::new();
        let faces = MakeGrid::new(Point3::origin(), 3.0, 3.0, 3, 3)
            .execute(&mut store)
            .unwrap();
        let mut classifier = EdgeClassifier::new(KnotParams::default());
        let mut toggles = SeamToggles::new();
        let ring = build_face_ring(&mut store, faces[4], &mut classifier, &mut toggles).unwrap();

        for i in 0..4 {
            let prev = (i + 3) % 4;
            let edge = store.edge(ring.edges[i]).unwrap();
            assert!(edge.connects(ring.bottoms[prev].vertex, ring.tops[i].vertex));
            assert_eq!(ring.tops[i].side, Side::Top);
            assert_eq!(ring.bottoms[i].side, Side::Bottom);
            assert_eq!(ring.tops[i].edge, store.face(faces[4]).unwrap().edges[i]);
        }
        assert_eq!(ring.vertices().count(), 8);
    }

    #[test]
    fn lone_triangle_ring_is_medial_triangle() {
        let mut store = MeshStore::new();
        let faces = MakePolygonMesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2]],
        )
        .execute(&mut store)
        .unwrap();
        let mut classifier = EdgeClassifier::new(KnotParams::new(0.7, 0.9, 0.0));
        let mut toggles = SeamToggles::new();
        let ring = build_face_ring(&mut store, faces[0], &mut classifier, &mut toggles).unwrap();

        let expected = [
            Point3::new(0.5, 0.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
            Point3::new(0.0, 0.5, 0.0),
        ];
        for (i, want) in expected.iter().enumerate() {
            let top = store.vertex(ring.tops[i].vertex).unwrap().point;
            let bottom = store.vertex(ring.bottoms[i].vertex).unwrap().point;
            assert_relative_eq!(top, *want, epsilon = 1e-12);
            assert_eq!(top, bottom);
            assert_ne!(ring.tops[i].vertex, ring.bottoms[i].vertex);
        }
    }
}
