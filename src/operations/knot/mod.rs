//! Celtic knot generation.
//!
//! A pass runs three stages over a working copy of the input mesh:
//! classify every (face, edge) visit into offset points, link those points
//! into one ring per face, then weld coincident points so the rings join up
//! into a single wireframe. The original geometry is stripped from the
//! working copy, leaving only the knot.

mod classify;
mod params;
mod ring;
mod toggle;
mod weld;

pub use classify::{EdgeClass, EdgeClassifier, EdgePoints};
pub use params::KnotParams;
pub use ring::{build_face_ring, FaceRing, GeneratedPoint, Side};
pub use toggle::SeamToggles;
pub use weld::{WeldReport, WeldVertices};

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{OperationError, Result, TopologyError};
use crate::math::WELD_TOLERANCE;
use crate::scene::{MeshObject, ObjectId, Scene};
use crate::topology::{FaceId, MeshStore};

/// Mismatch between the welded vertex count and the count the mesh
/// topology predicts. Usually means the weld tolerance is too loose for
/// the mesh scale, or the geometry has near-coincident features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeldDiagnostic {
    /// Vertices the source topology predicts after welding.
    pub expected: usize,
    /// Vertices the weld actually left.
    pub actual: usize,
}

/// Statistics of one knot pass.
#[derive(Debug, Clone, Default)]
pub struct KnotReport {
    /// Faces that received a ring.
    pub rings: usize,
    /// Vertices created before welding.
    pub generated_vertices: usize,
    /// Ring edges created before welding.
    pub generated_edges: usize,
    pub weld: WeldReport,
    pub diagnostic: Option<WeldDiagnostic>,
}

/// A generated knot: an edge-only mesh plus pass statistics.
#[derive(Debug, Clone)]
pub struct Knot {
    pub mesh: MeshStore,
    pub report: KnotReport,
}

/// Result of running the knot pass against a scene.
#[derive(Debug, Clone)]
pub struct KnotOutcome {
    /// The new object holding the wireframe.
    pub object: ObjectId,
    pub report: KnotReport,
}

/// Generates a Celtic knot wireframe from a polygon mesh.
pub struct CelticKnot {
    params: KnotParams,
    weld_tolerance: f64,
    face_order: Option<Vec<FaceId>>,
}

impl CelticKnot {
    /// Creates a new `CelticKnot` operation.
    #[must_use]
    pub fn new(params: KnotParams) -> Self {
        Self {
            params,
            weld_tolerance: WELD_TOLERANCE,
            face_order: None,
        }
    }

    /// Overrides the weld distance (default [`WELD_TOLERANCE`]).
    #[must_use]
    pub fn with_weld_tolerance(mut self, tolerance: f64) -> Self {
        self.weld_tolerance = tolerance;
        self
    }

    /// Visits faces in the given order instead of store order.
    ///
    /// The order decides which face sees each seam edge first and so which
    /// side of the seam its inset point lands on. It must list every face
    /// exactly once.
    #[must_use]
    pub fn with_face_order(mut self, order: Vec<FaceId>) -> Self {
        self.face_order = Some(order);
        self
    }

    /// Runs the pass on the active object of `scene`.
    ///
    /// On success the knot is added as a new object named `<source>.knot`;
    /// the source object is left as it was and stays active. On failure the
    /// scene is not modified.
    ///
    /// This split is intentionally the reverse of the host's original flow,
    /// which moved the source geometry out and left the knot in the selected
    /// object. Callers that expect the knot under the source's name must
    /// look it up through [`KnotOutcome::object`].
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NoActiveSelection`] when there is no active
    /// object or it has no faces, plus every error of [`CelticKnot::generate`].
    pub fn execute(&self, scene: &mut Scene) -> Result<KnotOutcome> {
        let source = scene.active().ok_or(OperationError::NoActiveSelection)?;
        let object = scene.object(source)?;
        if object.mesh.face_count() == 0 {
            return Err(OperationError::NoActiveSelection.into());
        }

        let knot = self.generate(&object.mesh)?;
        let name = format!("{}.knot", object.name);
        let id = scene.add_object(MeshObject::new(name, knot.mesh));
        scene.set_active(Some(source))?;
        Ok(KnotOutcome {
            object: id,
            report: knot.report,
        })
    }

    /// Builds the knot for `source` without touching it.
    ///
    /// # Errors
    ///
    /// Returns parameter range errors, [`TopologyError::NonManifoldEdge`]
    /// for edges shared by more than two faces, degenerate geometry errors
    /// naming the face and edge at fault, and weld errors.
    pub fn generate(&self, source: &MeshStore) -> Result<Knot> {
        self.params.validate()?;
        let order = self.visit_order(source)?;
        if let Some((edge, data)) = source.edges().find(|(_, e)| e.link_faces().len() > 2) {
            return Err(TopologyError::NonManifoldEdge {
                edge,
                face_count: data.link_faces().len(),
            }
            .into());
        }
        debug!(faces = order.len(), edges = source.edge_count(), "generating knot");

        let mut work = source.clone();
        let original_vertices: Vec<_> = source.vertices().map(|(id, _)| id).collect();

        let mut classifier = EdgeClassifier::new(self.params);
        let mut toggles = SeamToggles::new();
        let mut generated = Vec::new();
        let mut generated_edges = 0;
        for &face in &order {
            let ring = build_face_ring(&mut work, face, &mut classifier, &mut toggles)?;
            generated.extend(ring.vertices());
            generated_edges += ring.edges.len();
        }

        let generated_vertices = generated.len();
        let weld = WeldVertices::new(generated)
            .with_tolerance(self.weld_tolerance)
            .execute(&mut work)?;
        work.delete_vertices(&original_vertices)?;

        let expected = expected_welded_vertices(source)?;
        let diagnostic = (weld.welded_vertices() != expected).then(|| {
            warn!(
                expected,
                actual = weld.welded_vertices(),
                "weld produced an unexpected vertex count"
            );
            WeldDiagnostic {
                expected,
                actual: weld.welded_vertices(),
            }
        });

        debug!(
            vertices = work.vertex_count(),
            edges = work.edge_count(),
            "knot generated"
        );
        Ok(Knot {
            mesh: work,
            report: KnotReport {
                rings: order.len(),
                generated_vertices,
                generated_edges,
                weld,
                diagnostic,
            },
        })
    }

    fn visit_order(&self, source: &MeshStore) -> Result<Vec<FaceId>> {
        let Some(order) = &self.face_order else {
            return Ok(source.faces().map(|(id, _)| id).collect());
        };
        let mut seen = HashSet::with_capacity(order.len());
        for &face in order {
            source.face(face)?;
            if !seen.insert(face) {
                return Err(
                    OperationError::InvalidInput("face order lists a face twice".into()).into(),
                );
            }
        }
        if seen.len() != source.face_count() {
            return Err(
                OperationError::InvalidInput("face order must list every face".into()).into(),
            );
        }
        Ok(order.clone())
    }
}

/// Distinct knot vertices a clean weld should leave: two per interior edge,
/// one per true-boundary edge, one per face visit of a seam edge.
fn expected_welded_vertices(source: &MeshStore) -> Result<usize> {
    let mut total = 0;
    for (id, edge) in source.edges() {
        let visits = edge.link_faces().len();
        if visits == 0 {
            continue;
        }
        total += match EdgeClass::of(id, edge)? {
            EdgeClass::InteriorShared => 2,
            EdgeClass::TrueBoundary => 1,
            EdgeClass::Seam => visits,
        };
    }
    Ok(total)
}
