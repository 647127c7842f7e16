use glam::Vec3;

/// Minimal kinematic body: the "give this object a velocity" capability.
///
/// No forces, collisions or gravity. `Scene::integrate_bodies` advances the
/// owning entity by `velocity` and decays it by `damping` per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicBody {
    /// Linear velocity in units per second, in the parent's space.
    pub velocity: Vec3,
    /// Fraction of velocity lost per second (0.0 = coasts forever).
    pub damping: f32,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            damping: 0.5,
        }
    }
}

impl KinematicBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Displacement for a step of `dt_secs`, decaying the velocity afterwards.
    pub fn step(&mut self, dt_secs: f32) -> Vec3 {
        let delta = self.velocity * dt_secs;
        let keep = (1.0 - self.damping).clamp(0.0, 1.0).powf(dt_secs);
        self.velocity *= keep;
        delta
    }
}
