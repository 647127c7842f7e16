// core/transform.rs
//
// Local TRS transform for scene entities.
// World transforms are composed by Scene from the parent chain; this type only
// knows about one level.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position, rotation and scale relative to the parent (or world if no parent).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation from Euler angles in degrees, applied X then Y then Z.
    pub fn with_euler_degrees(mut self, degrees: Vec3) -> Self {
        self.rotation = euler_degrees(degrees);
        self
    }

    /// Matrix mapping this entity's local space into its parent's space.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Quaternion from XYZ Euler angles given in degrees.
pub fn euler_degrees(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    )
}
