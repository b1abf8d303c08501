use slotmap::SecondaryMap;

use crate::error::{GeometryError, Result, TopologyError};
use crate::math::{midpoint, try_normalize, Point3, Vector3, TOLERANCE};
use crate::topology::{EdgeData, EdgeId, FaceId, MeshStore};

use super::{KnotParams, SeamToggles};

/// Topological context of an edge as seen by the knot pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeClass {
    /// Two incident faces, not a seam. Carries an over and an under point.
    InteriorShared,
    /// Flagged seam, any face count. Points are inset into the visiting face.
    Seam,
    /// One incident face, not a seam. Top and bottom coincide.
    TrueBoundary,
}

impl EdgeClass {
    /// Classifies an edge. The seam flag wins over the face count.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::NonManifoldEdge`] when more than two faces
    /// share the edge, and [`TopologyError::InvalidTopology`] for an edge
    /// no face uses.
    pub fn of(id: EdgeId, edge: &EdgeData) -> Result<Self> {
        let face_count = edge.link_faces().len();
        if face_count > 2 {
            return Err(TopologyError::NonManifoldEdge { edge: id, face_count }.into());
        }
        if edge.seam {
            return Ok(Self::Seam);
        }
        match face_count {
            2 => Ok(Self::InteriorShared),
            1 => Ok(Self::TrueBoundary),
            _ => Err(TopologyError::InvalidTopology("edge has no incident face".into()).into()),
        }
    }
}

/// The two knot points produced for one (face, edge) visit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePoints {
    /// Entry point of the strand crossing this edge.
    pub top: Point3,
    /// Exit point of the strand crossing this edge.
    pub bottom: Point3,
}

impl EdgePoints {
    fn single(point: Point3) -> Self {
        Self {
            top: point,
            bottom: point,
        }
    }
}

/// Computes offset points for each (face, edge) visit.
///
/// Interior-shared results are cached per edge, so both faces around an
/// interior edge get bit-identical coordinates.
#[derive(Debug)]
pub struct EdgeClassifier {
    params: KnotParams,
    interior: SecondaryMap<EdgeId, EdgePoints>,
}

impl EdgeClassifier {
    /// Creates a classifier for one pass.
    #[must_use]
    pub fn new(params: KnotParams) -> Self {
        Self {
            params,
            interior: SecondaryMap::new(),
        }
    }

    /// Produces the top and bottom points for `edge` as seen from `face`.
    ///
    /// Seam edges consult and flip their entry in `toggles`; other classes
    /// leave it untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateEdge`] for a zero-length edge or a
    /// normal that cannot be normalized, plus the errors of [`EdgeClass::of`].
    pub fn classify(
        &mut self,
        store: &MeshStore,
        face: FaceId,
        edge: EdgeId,
        toggles: &mut SeamToggles,
    ) -> Result<EdgePoints> {
        let data = store.edge(edge)?;
        let class = EdgeClass::of(edge, data)?;
        let (a, b) = store.edge_points(edge)?;
        let degenerate =
            |reason: &'static str| GeometryError::DegenerateEdge { face, edge, reason };

        let vec = a - b;
        if vec.norm() < TOLERANCE {
            return Err(degenerate("zero-length edge").into());
        }
        let midpt = midpoint(&a, &b);
        let offset = self.params.offset_from_surface;

        match class {
            EdgeClass::InteriorShared => {
                if let Some(points) = self.interior.get(edge) {
                    return Ok(*points);
                }
                let z = try_normalize(&normal_sum(store, data)?)
                    .ok_or_else(|| degenerate("incident face normals cancel out"))?;
                let gap = self.params.layer_gap;
                let points = EdgePoints {
                    top: midpt + z * gap + z * offset,
                    bottom: midpt - z * gap + z * offset,
                };
                self.interior.insert(edge, points);
                Ok(points)
            }
            EdgeClass::Seam => {
                let normal = store.face(face)?.normal;
                let offset_to_face = try_normalize(&vec.cross(&normal))
                    .ok_or_else(|| degenerate("edge is parallel to the face normal"))?
                    * self.params.break_inset;
                let z = try_normalize(&normal).ok_or_else(|| degenerate("face has no normal"))?;
                let point = if toggles.visit(edge) {
                    midpt - offset_to_face + z * offset
                } else {
                    midpt + offset_to_face + z * offset
                };
                Ok(EdgePoints::single(point))
            }
            EdgeClass::TrueBoundary => {
                let z = try_normalize(&normal_sum(store, data)?)
                    .ok_or_else(|| degenerate("face has no normal"))?;
                Ok(EdgePoints::single(midpt + z * offset))
            }
        }
    }
}

fn normal_sum(store: &MeshStore, edge: &EdgeData) -> Result<Vector3> {
    edge.link_faces()
        .iter()
        .try_fold(Vector3::zeros(), |acc, &f| Ok(acc + store.face(f)?.normal))
}
