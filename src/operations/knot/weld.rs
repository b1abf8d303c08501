use std::collections::HashMap;

use slotmap::SecondaryMap;
use tracing::debug;

use crate::error::{OperationError, Result};
use crate::math::{is_finite_point, Point3, WELD_TOLERANCE};
use crate::topology::{MeshStore, VertexId};

/// Outcome of a weld.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeldReport {
    /// Vertices considered for merging.
    pub input_vertices: usize,
    /// Vertices folded into another vertex and removed.
    pub merged_vertices: usize,
    /// Edges removed because they collapsed or duplicated another edge.
    pub removed_edges: usize,
}

impl WeldReport {
    /// Distinct vertices left after the weld.
    #[must_use]
    pub fn welded_vertices(&self) -> usize {
        self.input_vertices - self.merged_vertices
    }
}

/// Merges vertices that lie within a distance tolerance of each other.
///
/// Uses a spatial hash with cells at least as wide as the tolerance, so
/// each vertex is compared only against survivors in the 27 surrounding
/// cells. The first vertex of a cluster (in input order) survives and edges are
/// re-pointed to it. Two vertices merge iff their distance is `<= tolerance`.
pub struct WeldVertices {
    vertices: Vec<VertexId>,
    tolerance: f64,
}

impl WeldVertices {
    /// Creates a weld over `vertices` using [`WELD_TOLERANCE`].
    #[must_use]
    pub fn new(vertices: Vec<VertexId>) -> Self {
        Self {
            vertices,
            tolerance: WELD_TOLERANCE,
        }
    }

    /// Overrides the merge distance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the weld on `store`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] for a non-positive or
    /// non-finite tolerance or a vertex with a non-finite position, and
    /// propagates lookup errors for missing vertices or vertices that are
    /// face corners.
    pub fn execute(&self, store: &mut MeshStore) -> Result<WeldReport> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(OperationError::InvalidInput(format!(
                "weld tolerance must be positive, got {}",
                self.tolerance
            ))
            .into());
        }

        let points = self
            .vertices
            .iter()
            .map(|&v| store.vertex(v).map(|d| (v, d.point)))
            .collect::<Result<Vec<_>>>()?;
        if let Some((v, p)) = points.iter().find(|(_, p)| !is_finite_point(p)) {
            return Err(OperationError::InvalidInput(format!(
                "cannot weld vertex {v:?} at non-finite position {p}"
            ))
            .into());
        }
        let cell_size = cell_size_for(&points, self.tolerance);

        let mut grid: HashMap<CellKey, Vec<(VertexId, Point3)>> = HashMap::new();
        let mut remap = SecondaryMap::new();

        for &(v, point) in &points {
            let cell = CellKey::of(&point, cell_size);
            match find_survivor(&grid, cell, &point, self.tolerance) {
                Some(survivor) => {
                    remap.insert(v, survivor);
                }
                None => grid.entry(cell).or_default().push((v, point)),
            }
        }

        let removed_edges = store.remap_vertices(&remap)?;
        let report = WeldReport {
            input_vertices: self.vertices.len(),
            merged_vertices: remap.len(),
            removed_edges,
        };
        debug!(
            input = report.input_vertices,
            merged = report.merged_vertices,
            removed_edges,
            "welded vertices"
        );
        Ok(report)
    }
}

/// Largest cell index magnitude; keeps indices exact in `f64` and leaves
/// room for the neighbour offsets in `i64`.
const MAX_CELL_INDEX: f64 = 4_503_599_627_370_496.0; // 2^52

/// Cell width for the grid: the tolerance, widened when the point extent
/// would push cell indices past [`MAX_CELL_INDEX`]. A cell at least as wide
/// as the tolerance still puts every merge partner in a neighbouring cell.
fn cell_size_for(points: &[(VertexId, Point3)], tolerance: f64) -> f64 {
    let extent = points
        .iter()
        .flat_map(|(_, p)| p.coords.iter().map(|c| c.abs()))
        .fold(0.0_f64, f64::max);
    tolerance.max(extent / MAX_CELL_INDEX)
}

/// Integer cell coordinates of a point in the weld grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellKey(i64, i64, i64);

impl CellKey {
    #[allow(clippy::cast_possible_truncation)]
    fn of(point: &Point3, cell_size: f64) -> Self {
        let c = |x: f64| (x / cell_size).floor() as i64;
        Self(c(point.x), c(point.y), c(point.z))
    }
}

fn find_survivor(
    grid: &HashMap<CellKey, Vec<(VertexId, Point3)>>,
    CellKey(cx, cy, cz): CellKey,
    point: &Point3,
    tolerance: f64,
) -> Option<VertexId> {
    for dx in -1..=1 {
        for dy in -1..=1 {
            for dz in -1..=1 {
                let Some(bucket) = grid.get(&CellKey(cx + dx, cy + dy, cz + dz)) else {
                    continue;
                };
                let hit = bucket.iter().find(|(_, p)| (p - point).norm() <= tolerance);
                if let Some(&(id, _)) = hit {
                    return Some(id);
                }
            }
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    const TOL: f64 = 1e-5;

    fn pair_at_distance(d: f64) -> (MeshStore, Vec<VertexId>) {
        let mut store = MeshStore::new();
        let origin = Point3::new(0.25, -3.0, 7.5);
        let a = store.add_vertex(origin);
        let b = store.add_vertex(origin + Vector3::new(d, 0.0, 0.0));
        (store, vec![a, b])
    }

    #[test]
    fn merges_iff_within_tolerance() {
        for factor in [0.0, 0.25, 0.5, 0.9, 0.999, 1.001, 1.1, 1.5, 2.0, 10.0] {
            let d = TOL * factor;
            let (mut store, verts) = pair_at_distance(d);
            let point = |v: VertexId| store.vertex(v).unwrap().point;
            let actual = (point(verts[1]) - point(verts[0])).norm();
            let report = WeldVertices::new(verts)
                .with_tolerance(TOL)
                .execute(&mut store)
                .unwrap();

            let should_merge = actual <= TOL;
            assert_eq!(report.merged_vertices == 1, should_merge, "distance {actual}");
            assert_eq!(store.vertex_count(), if should_merge { 1 } else { 2 });
        }
    }

    #[test]
    fn exact_tolerance_distance_merges() {
        let mut store = MeshStore::new();
        let a = store.add_vertex(Point3::origin());
        let b = store.add_vertex(Point3::new(TOL, 0.0, 0.0));
        let report = WeldVertices::new(vec![a, b])
            .with_tolerance(TOL)
            .execute(&mut store)
            .unwrap();
        assert_eq!(report.merged_vertices, 1);
        assert_eq!(report.welded_vertices(), 1);
    }

    #[test]
    fn neighbours_across_cell_boundaries_merge() {
        let mut store = MeshStore::new();
        let a = store.add_vertex(Point3::new(-1e-7, -1e-7, -1e-7));
        let b = store.add_vertex(Point3::new(1e-7, 1e-7, 1e-7));
        let report = WeldVertices::new(vec![a, b]).execute(&mut store).unwrap();
        assert_eq!(report.merged_vertices, 1);
        assert!(store.vertex(a).is_ok());
        assert!(store.vertex(b).is_err());
    }

    #[test]
    fn edges_are_repointed_to_survivor() {
        let mut store = MeshStore::new();
        let a = store.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = store.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let b_dup = store.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = store.add_vertex(Point3::new(1.0, 1.0, 0.0));
        store.add_edge(a, b).unwrap();
        store.add_edge(b_dup, c).unwrap();

        let report = WeldVertices::new(vec![a, b, b_dup, c]).execute(&mut store).unwrap();

        assert_eq!(report.merged_vertices, 1);
        assert_eq!(report.removed_edges, 0);
        assert!(store.edge_between(b, c).is_some());
        assert_eq!(store.edge_count(), 2);
    }

    #[test]
    fn unlisted_vertices_are_left_alone() {
        let mut store = MeshStore::new();
        let a = store.add_vertex(Point3::origin());
        let b = store.add_vertex(Point3::origin());
        let report = WeldVertices::new(vec![a]).execute(&mut store).unwrap();
        assert_eq!(report.merged_vertices, 0);
        assert_eq!(store.vertex_count(), 2);
        assert!(store.vertex(b).is_ok());
    }

    #[test]
    fn bad_tolerance_is_rejected() {
        let mut store = MeshStore::new();
        assert!(WeldVertices::new(vec![]).with_tolerance(0.0).execute(&mut store).is_err());
        assert!(WeldVertices::new(vec![]).with_tolerance(f64::NAN).execute(&mut store).is_err());
    }

    /// Corners of a unit cube at `origin`, plus an exact copy of the first.
    fn cube_with_duplicate(origin: Point3) -> (MeshStore, Vec<VertexId>) {
        let mut store = MeshStore::new();
        let mut verts = Vec::new();
        for i in 0..8_u8 {
            let offset = Vector3::new(f64::from(i & 1), f64::from((i >> 1) & 1), f64::from(i >> 2));
            verts.push(store.add_vertex(origin + offset));
        }
        verts.push(store.add_vertex(origin));
        (store, verts)
    }

    #[test]
    fn tiny_tolerance_on_unit_cube_welds() {
        let (mut store, verts) = cube_with_duplicate(Point3::origin());
        let report = WeldVertices::new(verts)
            .with_tolerance(1e-300)
            .execute(&mut store)
            .unwrap();
        assert_eq!(report.merged_vertices, 1);
        assert_eq!(report.welded_vertices(), 8);
    }

    #[test]
    fn far_from_origin_cube_welds_with_default_tolerance() {
        let (mut store, verts) = cube_with_duplicate(Point3::new(1e14, -1e14, 1e14));
        let report = WeldVertices::new(verts).execute(&mut store).unwrap();
        assert_eq!(report.merged_vertices, 1);
        assert_eq!(store.vertex_count(), 8);
    }

    #[test]
    fn non_finite_position_is_rejected() {
        let mut store = MeshStore::new();
        let a = store.add_vertex(Point3::origin());
        let b = store.add_vertex(Point3::new(f64::INFINITY, 0.0, 0.0));
        let err = WeldVertices::new(vec![a, b]).execute(&mut store).unwrap_err();
        assert!(matches!(
            err,
            crate::KnotworkError::Operation(OperationError::InvalidInput(_))
        ));
        assert_eq!(store.vertex_count(), 2);
    }
}
