use crate::error::{OperationError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::topology::{FaceId, MeshStore};

use super::MakePolygonMesh;

/// Corner indices of the six box faces, wound so normals point outward.
const BOX_FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
    [1, 2, 6, 5],
];

/// Creates an axis-aligned box of six quads from two corner points.
pub struct MakeBox {
    min_corner: Point3,
    max_corner: Point3,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation.
    #[must_use]
    pub fn new(min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            min_corner,
            max_corner,
        }
    }

    /// Executes the operation, adding 8 vertices, 12 edges and 6 faces.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if any extent is not positive.
    pub fn execute(&self, store: &mut MeshStore) -> Result<Vec<FaceId>> {
        let (lo, hi) = (self.min_corner, self.max_corner);
        let extent = hi - lo;
        if extent.iter().any(|&d| d < TOLERANCE) {
            return Err(OperationError::InvalidInput("box extents must be positive".into()).into());
        }

        let points = vec![
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
        ];
        let polygons = BOX_FACES.iter().map(|f| f.to_vec()).collect();
        MakePolygonMesh::new(points, polygons).execute(store)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unit_cube_is_closed() {
        let mut store = MeshStore::new();
        let faces = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .execute(&mut store)
            .unwrap();

        assert_eq!(faces.len(), 6);
        assert_eq!(store.vertex_count(), 8);
        assert_eq!(store.edge_count(), 12);
        assert!(store.edges().all(|(_, e)| e.link_faces().len() == 2));
    }

    #[test]
    fn normals_point_outward() {
        let mut store = MeshStore::new();
        MakeBox::new(Point3::origin(), Point3::new(2.0, 2.0, 2.0))
            .execute(&mut store)
            .unwrap();
        let center = Point3::new(1.0, 1.0, 1.0);

        for (_, face) in store.faces() {
            let corner = store.vertex(face.vertices[0]).unwrap().point;
            assert!(face.normal.dot(&(corner - center)) > 0.0);
        }
    }

    #[test]
    fn flat_box_is_rejected() {
        let mut store = MeshStore::new();
        let result = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 0.0)).execute(&mut store);
        assert!(result.is_err());
    }
}
