pub mod edge;
pub mod face;
pub mod vertex;

pub use edge::{EdgeData, EdgeId};
pub use face::{FaceData, FaceId};
pub use vertex::{VertexData, VertexId};

use std::collections::{HashMap, HashSet};

use slotmap::{SecondaryMap, SlotMap};

use crate::error::{GeometryError, Result, TopologyError};
use crate::math::polygon_3d::newell_normal;
use crate::math::{is_finite_point, midpoint, Point3};

/// Central arena that owns all mesh entities.
///
/// Entities reference each other via typed IDs (generational indices).
/// Cloning the store keeps every ID valid in the copy, which is what lets a
/// working copy report errors against the caller's own edges and faces.
#[derive(Debug, Default, Clone)]
pub struct MeshStore {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    edge_lookup: HashMap<(VertexId, VertexId), EdgeId>,
}

fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl MeshStore {
    /// Creates a new, empty mesh store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    // --- Vertex operations ---

    /// Inserts a vertex at `point` and returns its ID.
    pub fn add_vertex(&mut self, point: Point3) -> VertexId {
        self.vertices.insert(VertexData::new(point))
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()).into())
    }

    /// Iterates over all vertices in slot order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    // --- Edge operations ---

    /// Inserts a new edge between two existing, distinct vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is missing, the endpoints are the
    /// same vertex, or an edge between them already exists.
    pub fn add_edge(&mut self, start: VertexId, end: VertexId) -> Result<EdgeId> {
        self.vertex(start)?;
        self.vertex(end)?;
        if start == end {
            return Err(TopologyError::InvalidTopology("edge endpoints must differ".into()).into());
        }
        let key = edge_key(start, end);
        if self.edge_lookup.contains_key(&key) {
            return Err(TopologyError::InvalidTopology("edge already exists".into()).into());
        }
        let id = self.edges.insert(EdgeData::new(start, end));
        self.edge_lookup.insert(key, id);
        Ok(id)
    }

    /// Returns the edge joining `a` and `b`, creating it if necessary.
    ///
    /// # Errors
    ///
    /// See [`MeshStore::add_edge`].
    pub fn ensure_edge(&mut self, a: VertexId, b: VertexId) -> Result<EdgeId> {
        match self.edge_between(a, b) {
            Some(id) => Ok(id),
            None => self.add_edge(a, b),
        }
    }

    /// Looks up the edge joining `a` and `b` in either direction.
    #[must_use]
    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_lookup.get(&edge_key(a, b)).copied()
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()).into())
    }

    /// Iterates over all edges in slot order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    /// Flags or unflags an edge as a seam.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not found.
    pub fn set_seam(&mut self, id: EdgeId, seam: bool) -> Result<()> {
        self.edges
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))?
            .seam = seam;
        Ok(())
    }

    /// Endpoint positions of an edge, in `(start, end)` order.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or one of its vertices is missing.
    pub fn edge_points(&self, id: EdgeId) -> Result<(Point3, Point3)> {
        let edge = self.edge(id)?;
        Ok((self.vertex(edge.start)?.point, self.vertex(edge.end)?.point))
    }

    /// Midpoint of an edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or one of its vertices is missing.
    pub fn edge_midpoint(&self, id: EdgeId) -> Result<Point3> {
        let (a, b) = self.edge_points(id)?;
        Ok(midpoint(&a, &b))
    }

    /// Removes an edge that no face uses any more.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge does not exist or is still part of a face.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<EdgeData> {
        if !self.edge(id)?.link_faces.is_empty() {
            return Err(
                TopologyError::InvalidTopology("edge is still used by a face".into()).into(),
            );
        }
        let data = self
            .edges
            .remove(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))?;
        self.edge_lookup.remove(&edge_key(data.start, data.end));
        Ok(data)
    }

    // --- Face operations ---

    /// Adds a polygon through the given corner vertices.
    ///
    /// Boundary edges are found or created for each consecutive pair, and
    /// the face normal is computed with Newell's method.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 3 corners are given, a corner is
    /// missing or not finite, two consecutive corners coincide, or the polygon
    /// has no area.
    pub fn add_face(&mut self, corners: &[VertexId]) -> Result<FaceId> {
        if corners.len() < 3 {
            return Err(
                TopologyError::InvalidTopology("a face needs at least 3 corners".into()).into(),
            );
        }
        let n = corners.len();
        if (0..n).any(|i| corners[i] == corners[(i + 1) % n]) {
            return Err(TopologyError::InvalidTopology(
                "consecutive face corners must differ".into(),
            )
            .into());
        }
        let points = corners
            .iter()
            .map(|&v| self.vertex(v).map(|d| d.point))
            .collect::<Result<Vec<_>>>()?;
        if !points.iter().all(is_finite_point) {
            return Err(GeometryError::Degenerate("face corner is not finite".into()).into());
        }
        let normal = newell_normal(&points)
            .ok_or_else(|| GeometryError::Degenerate("polygon has zero area".into()))?;

        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            edges.push(self.ensure_edge(corners[i], corners[(i + 1) % n])?);
        }

        let id = self.faces.insert(FaceData {
            vertices: corners.to_vec(),
            edges: edges.clone(),
            normal,
        });
        for edge in edges {
            if let Some(data) = self.edges.get_mut(edge) {
                data.link_faces.push(id);
            }
        }
        Ok(id)
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceData> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()).into())
    }

    /// Iterates over all faces in slot order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &FaceData)> {
        self.faces.iter()
    }

    /// Removes a face and detaches it from its boundary edges.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist.
    pub fn remove_face(&mut self, id: FaceId) -> Result<FaceData> {
        let data = self
            .faces
            .remove(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))?;
        for &edge in &data.edges {
            if let Some(e) = self.edges.get_mut(edge) {
                e.link_faces.retain(|&f| f != id);
            }
        }
        Ok(data)
    }

    // --- Bulk operations ---

    /// Deletes vertices together with every face and edge that uses them.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the vertices does not exist.
    pub fn delete_vertices(&mut self, ids: &[VertexId]) -> Result<()> {
        for &id in ids {
            self.vertex(id)?;
        }
        let doomed: HashSet<VertexId> = ids.iter().copied().collect();

        let faces: Vec<FaceId> = self
            .faces
            .iter()
            .filter(|(_, f)| f.vertices.iter().any(|v| doomed.contains(v)))
            .map(|(id, _)| id)
            .collect();
        for face in faces {
            self.remove_face(face)?;
        }

        let edges: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|(_, e)| doomed.contains(&e.start) || doomed.contains(&e.end))
            .map(|(id, _)| id)
            .collect();
        for edge in edges {
            self.remove_edge(edge)?;
        }

        for id in doomed {
            self.vertices.remove(id);
        }
        Ok(())
    }

    /// Re-points edges according to `remap` and removes the mapped vertices.
    ///
    /// Edges whose endpoints collapse onto one vertex, and edges that
    /// duplicate an existing edge after re-pointing, are removed. Only
    /// face-free edges may be touched. Returns the number of removed edges.
    ///
    /// # Errors
    ///
    /// Returns an error if a mapped vertex is used by a face or a target
    /// vertex does not exist.
    pub fn remap_vertices(&mut self, remap: &SecondaryMap<VertexId, VertexId>) -> Result<usize> {
        let corners: HashSet<VertexId> = self
            .faces
            .values()
            .flat_map(|f| f.vertices.iter().copied())
            .collect();
        for (from, &to) in remap {
            self.vertex(to)?;
            if corners.contains(&from) {
                return Err(
                    TopologyError::InvalidTopology("cannot weld a face corner".into()).into(),
                );
            }
        }
        let resolve = |v: VertexId| remap.get(v).copied().unwrap_or(v);

        let ids: Vec<EdgeId> = self.edges.keys().collect();
        let mut removed = 0;
        self.edge_lookup.clear();
        for id in ids {
            let Some(edge) = self.edges.get_mut(id) else {
                continue;
            };
            let (start, end) = (resolve(edge.start), resolve(edge.end));
            let key = edge_key(start, end);
            if start == end || self.edge_lookup.contains_key(&key) {
                self.edges.remove(id);
                removed += 1;
                continue;
            }
            edge.start = start;
            edge.end = end;
            self.edge_lookup.insert(key, id);
        }

        for (from, _) in remap {
            self.vertices.remove(from);
        }
        Ok(removed)
    }
}
