use glam::{Mat4, Quat, Vec3};
use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Simple entity storage using a flat Vec, plus world-space transform queries.
/// Designed for small entity counts (a solar system, two hands, a camera).
///
/// Every query returns `Option`: a missing entity means "feature disabled"
/// for whoever asked, never an error.
pub struct Scene {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(64),
            next_id: 1,
        }
    }

    /// Create a scene with a specific entity capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.next_id = self.next_id.max(id.0 + 1);
        self.entities.push(entity);
        id
    }

    /// Remove an entity by ID. Its children become roots.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        let removed = self.entities.swap_remove(idx);
        for child in self.entities.iter_mut().filter(|e| e.parent == Some(id)) {
            child.parent = None;
        }
        Some(removed)
    }

    /// Get a reference to an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over all entities.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Iterate over all entities mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    /// Find the first entity with the given tag (mutable).
    pub fn find_by_tag_mut(&mut self, tag: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.tag == tag)
    }

    /// ID of the first entity with the given tag.
    pub fn id_by_tag(&self, tag: &str) -> Option<EntityId> {
        self.find_by_tag(tag).map(|e| e.id)
    }

    /// Re-parent an entity. Pass `None` to make it a root.
    /// Refuses parents that would create a cycle.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) -> bool {
        if let Some(p) = parent {
            if !self.contains(p) || self.ancestors(p).any(|a| a == child) {
                return false;
            }
        }
        match self.get_mut(child) {
            Some(e) => {
                e.parent = parent;
                true
            }
            None => false,
        }
    }

    /// Walk up the parent chain, starting at `id` itself.
    fn ancestors(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        let mut next = self.get(id).map(|e| e.id);
        let mut remaining = self.entities.len();
        std::iter::from_fn(move || {
            let current = next?;
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            next = self.get(current).and_then(|e| e.parent);
            Some(current)
        })
    }

    // -- World-space queries --

    /// Matrix mapping the entity's local space to world space.
    pub fn world_matrix(&self, id: EntityId) -> Option<Mat4> {
        let entity = self.get(id)?;
        let mut matrix = entity.transform.matrix();
        for ancestor in self.ancestors(id).skip(1) {
            if let Some(a) = self.get(ancestor) {
                matrix = a.transform.matrix() * matrix;
            }
        }
        Some(matrix)
    }

    /// Matrix of the entity's parent space (identity for roots).
    pub fn parent_world_matrix(&self, id: EntityId) -> Option<Mat4> {
        match self.get(id)?.parent {
            Some(parent) => self.world_matrix(parent).or(Some(Mat4::IDENTITY)),
            None => Some(Mat4::IDENTITY),
        }
    }

    pub fn world_position(&self, id: EntityId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.w_axis.truncate())
    }

    pub fn world_rotation(&self, id: EntityId) -> Option<Quat> {
        self.world_matrix(id).map(|m| m.to_scale_rotation_translation().1)
    }

    pub fn world_scale(&self, id: EntityId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.to_scale_rotation_translation().0)
    }

    /// Convert a point in the entity's local space to world space.
    pub fn local_to_world(&self, id: EntityId, point: Vec3) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.transform_point3(point))
    }

    /// Convert a world-space point into the entity's local space.
    /// `None` if the entity is missing or its world matrix is degenerate.
    pub fn world_to_local(&self, id: EntityId, point: Vec3) -> Option<Vec3> {
        let m = self.world_matrix(id)?;
        let det = m.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(m.inverse().transform_point3(point))
    }

    // -- Local transform accessors --

    pub fn position(&self, id: EntityId) -> Option<Vec3> {
        self.get(id).map(|e| e.transform.translation)
    }

    pub fn set_position(&mut self, id: EntityId, pos: Vec3) {
        if let Some(e) = self.get_mut(id) {
            e.transform.translation = pos;
        }
    }

    pub fn scale(&self, id: EntityId) -> Option<Vec3> {
        self.get(id).map(|e| e.transform.scale)
    }

    pub fn set_scale(&mut self, id: EntityId, scale: Vec3) {
        if let Some(e) = self.get_mut(id) {
            e.transform.scale = scale;
        }
    }

    pub fn set_rotation(&mut self, id: EntityId, rotation: Quat) {
        if let Some(e) = self.get_mut(id) {
            e.transform.rotation = rotation;
        }
    }

    // -- Velocity capability --

    /// Whether the entity accepts injected velocities.
    pub fn supports_velocity(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.body.is_some())
    }

    /// Set the linear velocity of an entity's body. Returns false if it has none.
    pub fn set_velocity(&mut self, id: EntityId, velocity: Vec3) -> bool {
        match self.get_mut(id).and_then(|e| e.body.as_mut()) {
            Some(body) => {
                body.velocity = velocity;
                true
            }
            None => false,
        }
    }

    /// Get the linear velocity of an entity's body (zero without one).
    pub fn velocity(&self, id: EntityId) -> Vec3 {
        self.get(id)
            .and_then(|e| e.body.as_ref())
            .map(|b| b.velocity)
            .unwrap_or(Vec3::ZERO)
    }

    /// Advance every active entity that has a body.
    pub fn integrate_bodies(&mut self, dt_secs: f32) {
        if dt_secs <= 0.0 {
            return;
        }
        for entity in self.entities.iter_mut().filter(|e| e.active) {
            if let Some(body) = entity.body.as_mut() {
                entity.transform.translation += body.step(dt_secs);
            }
        }
    }

    /// Number of entities in the scene.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Clear all entities.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
