use glam::Vec3;
use crate::api::types::EntityId;

/// Below this inter-hand distance the pinch ratio is meaningless.
const MIN_HAND_DISTANCE: f32 = 1e-4;

/// Two-hand pinch state, captured when the second hand starts dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingSession {
    /// The hand that was already dragging.
    pub left_hand: EntityId,
    /// The hand whose drag started the session.
    pub right_hand: EntityId,
    /// World-space midpoint between the hands at session start.
    pub midpoint0: Vec3,
    /// World-space distance between the hands at session start.
    pub distance0: f32,
    /// Target scale at session start.
    pub scale0: Vec3,
    /// Target position at session start.
    pub position0: Vec3,
}

impl ScalingSession {
    pub fn begin(
        left_hand: EntityId,
        left_pos: Vec3,
        right_hand: EntityId,
        right_pos: Vec3,
        scale0: Vec3,
        position0: Vec3,
    ) -> Self {
        Self {
            left_hand,
            right_hand,
            midpoint0: (left_pos + right_pos) * 0.5,
            distance0: left_pos.distance(right_pos),
            scale0,
            position0,
        }
    }

    /// Whether `hand` is one of the two pinching hands.
    pub fn involves(&self, hand: EntityId) -> bool {
        self.left_hand == hand || self.right_hand == hand
    }

    /// Target `(scale, position)` for the current hand positions.
    ///
    /// Scale follows the change in inter-hand distance; position slides along
    /// the line from `position0` toward `midpoint0` by the same fraction so the
    /// point under the initial midpoint stays put.
    /// `None` when either distance is degenerate; the caller skips the frame.
    pub fn apply(&self, left_pos: Vec3, right_pos: Vec3) -> Option<(Vec3, Vec3)> {
        let distance = left_pos.distance(right_pos);
        if !(self.distance0 > MIN_HAND_DISTANCE) || !(distance > MIN_HAND_DISTANCE) {
            return None;
        }
        let scale = self.scale0 * (distance / self.distance0);
        let shift = (self.distance0 - distance) / self.distance0;
        let position = self.position0 + (self.midpoint0 - self.position0) * shift;
        if !scale.is_finite() || !position.is_finite() {
            return None;
        }
        Some((scale, position))
    }
}
