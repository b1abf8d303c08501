//! Minimal host-side object model: named mesh objects and an active object.

use slotmap::SlotMap;

use crate::error::{Result, TopologyError};
use crate::topology::MeshStore;

slotmap::new_key_type! {
    /// Unique identifier for an object in a scene.
    pub struct ObjectId;
}

/// A named mesh object.
#[derive(Debug, Clone)]
pub struct MeshObject {
    pub name: String,
    pub mesh: MeshStore,
}

impl MeshObject {
    /// Creates a new object wrapping `mesh`.
    #[must_use]
    pub fn new(name: impl Into<String>, mesh: MeshStore) -> Self {
        Self {
            name: name.into(),
            mesh,
        }
    }
}

/// Arena of mesh objects with an optional active (selected) object.
#[derive(Debug, Default)]
pub struct Scene {
    objects: SlotMap<ObjectId, MeshObject>,
    active: Option<ObjectId>,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object and returns its ID. The active object is unchanged.
    pub fn add_object(&mut self, object: MeshObject) -> ObjectId {
        self.objects.insert(object)
    }

    /// Returns a reference to the object, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not in the scene.
    pub fn object(&self, id: ObjectId) -> Result<&MeshObject> {
        self.objects
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("object".into()).into())
    }

    /// Looks up an object by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find_map(|(id, obj)| (obj.name == name).then_some(id))
    }

    /// Number of objects in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the scene has no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The active object, if any.
    #[must_use]
    pub fn active(&self) -> Option<ObjectId> {
        self.active
    }

    /// Makes `id` the active object, or clears the selection with `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not in the scene.
    pub fn set_active(&mut self, id: Option<ObjectId>) -> Result<()> {
        if let Some(id) = id {
            self.object(id)?;
        }
        self.active = id;
        Ok(())
    }
}
