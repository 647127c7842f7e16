use glam::{Quat, Vec3};
use crate::api::types::EntityId;
use crate::components::body::KinematicBody;
use crate::components::label::LabelComponent;
use crate::components::mesh::{LineComponent, MeshComponent};
use crate::controller::profile::ControllerProfile;
use crate::core::transform::Transform;

/// Fat entity: one struct with optional components.
/// Transforms are local; world-space queries go through `Scene`.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Name used for lookups from configuration (`track` targets, home selection).
    pub tag: String,
    /// Whether this entity is active (inactive entities are skipped).
    pub active: bool,
    /// Whether this entity should be drawn by the host.
    pub visible: bool,
    /// Parent in the scene hierarchy, or `None` for a root.
    pub parent: Option<EntityId>,
    /// Transform relative to the parent.
    pub transform: Transform,
    /// Sphere mesh (optional).
    pub mesh: Option<MeshComponent>,
    /// Line segment (optional).
    pub line: Option<LineComponent>,
    /// Text label (optional).
    pub label: Option<LabelComponent>,
    /// Velocity capability. Entities without a body cannot receive release velocities.
    pub body: Option<KinematicBody>,
    /// Input-handling profiles currently attached to a controller entity.
    pub controllers: Vec<ControllerProfile>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            visible: true,
            parent: None,
            transform: Transform::IDENTITY,
            mesh: None,
            line: None,
            label: None,
            body: None,
            controllers: Vec::new(),
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.transform.translation = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_line(mut self, line: LineComponent) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_label(mut self, label: LabelComponent) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_body(mut self, body: KinematicBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Local position.
    pub fn pos(&self) -> Vec3 {
        self.transform.translation
    }
}
