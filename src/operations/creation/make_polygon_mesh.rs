use crate::error::{OperationError, Result};
use crate::math::Point3;
use crate::topology::{FaceId, MeshStore};

/// Builds faces from a point list and index polygons.
///
/// Shared edges are detected by vertex index, so adjacent polygons that
/// reference the same corner indices end up sharing one edge.
pub struct MakePolygonMesh {
    points: Vec<Point3>,
    polygons: Vec<Vec<usize>>,
}

impl MakePolygonMesh {
    /// Creates a new `MakePolygonMesh` operation.
    #[must_use]
    pub fn new(points: Vec<Point3>, polygons: Vec<Vec<usize>>) -> Self {
        Self { points, polygons }
    }

    /// Executes the operation, adding vertices and faces to the store.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if a polygon references a
    /// point index out of range, or any error from [`MeshStore::add_face`].
    pub fn execute(&self, store: &mut MeshStore) -> Result<Vec<FaceId>> {
        if let Some(bad) = self.polygons.iter().flatten().find(|&&i| i >= self.points.len()) {
            return Err(OperationError::InvalidInput(format!(
                "polygon index {bad} out of range for {} points",
                self.points.len()
            ))
            .into());
        }

        let vertices: Vec<_> = self.points.iter().map(|&p| store.add_vertex(p)).collect();
        self.polygons
            .iter()
            .map(|poly| {
                let corners: Vec<_> = poly.iter().map(|&i| vertices[i]).collect();
                store.add_face(&corners)
            })
            .collect()
    }
}
