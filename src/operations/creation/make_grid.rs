use crate::error::{OperationError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::topology::{FaceId, MeshStore};

use super::MakePolygonMesh;

/// Creates a flat grid of quads in the XY plane facing +Z.
pub struct MakeGrid {
    origin: Point3,
    size_x: f64,
    size_y: f64,
    cells_x: usize,
    cells_y: usize,
}

impl MakeGrid {
    /// Creates a new `MakeGrid` operation spanning `size_x` by `size_y`
    /// from `origin`, split into `cells_x` by `cells_y` quads.
    #[must_use]
    pub fn new(origin: Point3, size_x: f64, size_y: f64, cells_x: usize, cells_y: usize) -> Self {
        Self {
            origin,
            size_x,
            size_y,
            cells_x,
            cells_y,
        }
    }

    /// Executes the operation. Faces are emitted row by row.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if a size is not positive or
    /// a cell count is zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self, store: &mut MeshStore) -> Result<Vec<FaceId>> {
        if self.size_x < TOLERANCE || self.size_y < TOLERANCE {
            return Err(OperationError::InvalidInput("grid size must be positive".into()).into());
        }
        if self.cells_x == 0 || self.cells_y == 0 {
            return Err(OperationError::InvalidInput("grid needs at least one cell".into()).into());
        }

        let (nx, ny) = (self.cells_x, self.cells_y);
        let dx = self.size_x / nx as f64;
        let dy = self.size_y / ny as f64;

        let mut points = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..=ny {
            for i in 0..=nx {
                points.push(Point3::new(
                    self.origin.x + dx * i as f64,
                    self.origin.y + dy * j as f64,
                    self.origin.z,
                ));
            }
        }

        let index = |i: usize, j: usize| j * (nx + 1) + i;
        let mut polygons = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                polygons.push(vec![
                    index(i, j),
                    index(i + 1, j),
                    index(i + 1, j + 1),
                    index(i, j + 1),
                ]);
            }
        }
        MakePolygonMesh::new(points, polygons).execute(store)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn two_by_two_grid_counts() {
        let mut store = MeshStore::new();
        let faces = MakeGrid::new(Point3::origin(), 2.0, 2.0, 2, 2)
            .execute(&mut store)
            .unwrap();

        assert_eq!(faces.len(), 4);
        assert_eq!(store.vertex_count(), 9);
        assert_eq!(store.edge_count(), 12);
        let interior = store.edges().filter(|(_, e)| e.link_faces().len() == 2).count();
        assert_eq!(interior, 4);
    }

    #[test]
    fn zero_cells_is_rejected() {
        let mut store = MeshStore::new();
        assert!(MakeGrid::new(Point3::origin(), 1.0, 1.0, 0, 3).execute(&mut store).is_err());
    }
}
