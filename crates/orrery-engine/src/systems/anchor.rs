use crate::api::types::EntityId;
use crate::core::scene::Scene;

/// Keeps a chosen descendant at the world origin by moving the anchor entity.
///
/// Each tick the anchor's local position becomes the negation of the target's
/// position expressed in the anchor's own space. Rotation and scale are left
/// alone, so an anchor with a non-trivial local scale or rotation only centres
/// its target exactly when its parent space is unscaled and unrotated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameAnchor {
    pub anchor: EntityId,
    target: Option<EntityId>,
}

impl FrameAnchor {
    pub fn new(anchor: EntityId) -> Self {
        Self { anchor, target: None }
    }

    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<EntityId>) {
        self.target = target;
    }

    /// Point the anchor at the entity named `name`. Unknown names clear the
    /// target, which disables tracking until a valid one is set.
    pub fn retarget_by_tag(&mut self, scene: &Scene, name: &str) -> bool {
        self.target = scene.id_by_tag(name);
        if self.target.is_none() {
            log::warn!("track target {name:?} not found, tracking disabled");
        }
        self.target.is_some()
    }

    pub fn tick(&self, scene: &mut Scene) {
        let Some(target) = self.target else {
            return;
        };
        let Some(target_world) = scene.world_position(target) else {
            return;
        };
        let Some(local) = scene.world_to_local(self.anchor, target_world) else {
            return;
        };
        scene.set_position(self.anchor, -local);
    }
}
