use glam::Vec3;
use crate::api::types::EntityId;

/// One hand's interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    None,
    Dragging,
    Flying,
}

/// Per-gesture data. Fields only exist while they are valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandState {
    Idle,
    Dragging {
        /// Target position minus hand position, captured at drag start.
        offset: Vec3,
        /// Last per-frame target velocity, units per second.
        velocity: Vec3,
    },
    Flying {
        /// Last per-frame target velocity, units per second.
        velocity: Vec3,
        /// Last reported vertical joystick value in [-1, 1].
        vertical_axis: f32,
    },
}

/// Record for a tracked hand. Replaced wholesale on every gesture change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandRecord {
    pub hand: EntityId,
    pub state: HandState,
}

impl HandRecord {
    pub fn idle(hand: EntityId) -> Self {
        Self { hand, state: HandState::Idle }
    }

    pub fn dragging(hand: EntityId, offset: Vec3) -> Self {
        Self {
            hand,
            state: HandState::Dragging { offset, velocity: Vec3::ZERO },
        }
    }

    pub fn flying(hand: EntityId) -> Self {
        Self {
            hand,
            state: HandState::Flying { velocity: Vec3::ZERO, vertical_axis: 0.0 },
        }
    }

    pub fn gesture(&self) -> Gesture {
        match self.state {
            HandState::Idle => Gesture::None,
            HandState::Dragging { .. } => Gesture::Dragging,
            HandState::Flying { .. } => Gesture::Flying,
        }
    }

    /// Velocity attributable to this hand (zero while idle).
    pub fn velocity(&self) -> Vec3 {
        match self.state {
            HandState::Idle => Vec3::ZERO,
            HandState::Dragging { velocity, .. } | HandState::Flying { velocity, .. } => velocity,
        }
    }

    pub fn offset(&self) -> Option<Vec3> {
        match self.state {
            HandState::Dragging { offset, .. } => Some(offset),
            _ => None,
        }
    }

    pub fn vertical_axis(&self) -> Option<f32> {
        match self.state {
            HandState::Flying { vertical_axis, .. } => Some(vertical_axis),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, HandState::Dragging { .. })
    }
}
