use crate::core::scene::Scene;
use crate::renderer::instance::{TransformBuffer, TransformInstance};

/// Rebuild the transform buffer from every active entity, in scene order.
/// Entities whose world transform cannot be resolved are skipped.
pub fn build_transform_buffer(scene: &Scene, buffer: &mut TransformBuffer) {
    buffer.clear();

    for entity in scene.iter() {
        if !entity.active {
            continue;
        }
        let Some(world) = scene.world_matrix(entity.id) else {
            continue;
        };
        let (scale, rotation, position) = world.to_scale_rotation_translation();
        if !position.is_finite() {
            continue;
        }

        buffer.push(TransformInstance {
            id: entity.id.0 as f32,
            position: position.to_array(),
            rotation: rotation.to_array(),
            scale: scale.to_array(),
            visible: if entity.visible { 1.0 } else { 0.0 },
        });
    }
}
