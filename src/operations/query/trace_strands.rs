use std::collections::HashSet;

use slotmap::SecondaryMap;

use crate::error::{Result, TopologyError};
use crate::math::Point3;
use crate::topology::{EdgeId, MeshStore, VertexId};

/// A chain of wireframe edges, ready to become one curve spline.
#[derive(Debug, Clone, PartialEq)]
pub struct Strand {
    /// Points along the chain. A closed strand does not repeat its first point;
    /// an open chain that leaves and re-enters the same junction does.
    pub points: Vec<Point3>,
    /// Whether the last point connects back to the first.
    pub closed: bool,
}

/// Splits a wireframe into strands.
///
/// Vertices with exactly two edges are passed through; any other degree
/// ends a chain. Open chains are traced first, then the remaining edges
/// form closed loops. Faces are ignored.
#[derive(Debug, Default)]
pub struct TraceStrands;

impl TraceStrands {
    /// Creates a new `TraceStrands` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge references a missing vertex.
    pub fn execute(&self, store: &MeshStore) -> Result<Vec<Strand>> {
        let mut adjacency: SecondaryMap<VertexId, Vec<EdgeId>> = SecondaryMap::new();
        for (id, edge) in store.edges() {
            for v in [edge.start, edge.end] {
                store.vertex(v)?;
                if let Some(entry) = adjacency.entry(v) {
                    entry.or_default().push(id);
                }
            }
        }

        let mut walker = Walker {
            store,
            adjacency: &adjacency,
            visited: HashSet::new(),
        };
        let mut strands = Vec::new();

        for (v, _) in store.vertices() {
            let incident = walker.incident(v).to_vec();
            if incident.len() == 2 {
                continue;
            }
            for edge in incident {
                if !walker.visited.contains(&edge) {
                    strands.push(walker.walk(v, edge)?);
                }
            }
        }

        for (id, edge) in store.edges() {
            if !walker.visited.contains(&id) {
                strands.push(walker.walk(edge.start, id)?);
            }
        }
        Ok(strands)
    }
}

struct Walker<'a> {
    store: &'a MeshStore,
    adjacency: &'a SecondaryMap<VertexId, Vec<EdgeId>>,
    visited: HashSet<EdgeId>,
}

impl Walker<'_> {
    fn incident(&self, v: VertexId) -> &[EdgeId] {
        self.adjacency.get(v).map_or(&[][..], Vec::as_slice)
    }

    fn walk(&mut self, start: VertexId, first: EdgeId) -> Result<Strand> {
        let mut points = vec![self.store.vertex(start)?.point];
        let (mut at, mut edge) = (start, first);
        let closed = loop {
            self.visited.insert(edge);
            let next = self
                .store
                .edge(edge)?
                .other(at)
                .ok_or_else(|| TopologyError::InvalidTopology("broken edge chain".into()))?;
            if next == start && self.incident(start).len() == 2 {
                break true;
            }
            points.push(self.store.vertex(next)?.point);
            if self.incident(next).len() != 2 {
                break false;
            }
            match self.incident(next).iter().find(|&&e| !self.visited.contains(&e)) {
                Some(&e) => (at, edge) = (next, e),
                None => break false,
            }
        };
        Ok(Strand { points, closed })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn square_loop_is_one_closed_strand() {
        let mut store = MeshStore::new();
        let corners = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)];
        let v: Vec<_> = corners
            .into_iter()
            .map(|pt| store.add_vertex(pt))
            .collect();
        for i in 0..4 {
            store.add_edge(v[i], v[(i + 1) % 4]).unwrap();
        }

        let strands = TraceStrands::new().execute(&store).unwrap();
        assert_eq!(strands.len(), 1);
        assert!(strands[0].closed);
        assert_eq!(strands[0].points.len(), 4);
    }

    #[test]
    fn polyline_is_one_open_strand() {
        let mut store = MeshStore::new();
        let a = store.add_vertex(p(0.0, 0.0, 0.0));
        let b = store.add_vertex(p(1.0, 0.0, 0.0));
        let c = store.add_vertex(p(2.0, 0.0, 0.0));
        store.add_edge(b, c).unwrap();
        store.add_edge(a, b).unwrap();

        let strands = TraceStrands::new().execute(&store).unwrap();
        assert_eq!(strands.len(), 1);
        assert!(!strands[0].closed);
        assert_eq!(
            strands[0].points,
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn junction_splits_chains() {
        let mut store = MeshStore::new();
        let hub = store.add_vertex(p(0.0, 0.0, 0.0));
        for dir in [p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 0.0, 1.0)] {
            let tip = store.add_vertex(dir);
            store.add_edge(hub, tip).unwrap();
        }

        let strands = TraceStrands::new().execute(&store).unwrap();
        assert_eq!(strands.len(), 3);
        assert!(strands.iter().all(|s| !s.closed && s.points.len() == 2));
    }

    #[test]
    fn loop_through_junction_is_open() {
        let mut store = MeshStore::new();
        let hub = store.add_vertex(p(0.0, 0.0, 0.0));
        let a = store.add_vertex(p(1.0, 0.0, 0.0));
        let b = store.add_vertex(p(1.0, 1.0, 0.0));
        let tip = store.add_vertex(p(-1.0, 0.0, 0.0));
        store.add_edge(hub, a).unwrap();
        store.add_edge(a, b).unwrap();
        store.add_edge(b, hub).unwrap();
        store.add_edge(hub, tip).unwrap();

        let strands = TraceStrands::new().execute(&store).unwrap();
        assert_eq!(strands.len(), 2);
        assert!(strands.iter().all(|s| !s.closed));
        let lap = strands.iter().find(|s| s.points.len() == 4).unwrap();
        assert_eq!(lap.points.first(), lap.points.last());
        assert_eq!(lap.points[0], p(0.0, 0.0, 0.0));
    }

    #[test]
    fn empty_store_has_no_strands() {
        assert!(TraceStrands::new().execute(&MeshStore::new()).unwrap().is_empty());
    }
}
