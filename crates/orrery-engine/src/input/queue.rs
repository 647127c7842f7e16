use crate::api::types::EntityId;

/// Controller buttons the navigation layer understands.
/// The numeric ids are what the tracked-controls layer reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Button {
    /// Starts flight.
    Fly = 0,
    /// Starts a drag (two drags escalate to scaling).
    Drag = 1,
}

impl Button {
    /// Map a raw button id; other buttons are not ours.
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Self::Fly),
            1 => Some(Self::Drag),
            _ => None,
        }
    }

    pub fn id(self) -> u32 {
        self as u32
    }
}

/// Input event types, one stream per hand entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A tracked hand appeared.
    HandConnected { hand: EntityId },
    /// A tracked hand went away.
    HandDisconnected { hand: EntityId },
    /// A button was pressed.
    ButtonDown { hand: EntityId, button: Button },
    /// A button was released.
    ButtonUp { hand: EntityId, button: Button },
    /// Joystick/touchpad moved. `axes[1]` is the vertical axis.
    AxisMove { hand: EntityId, axes: [f32; 2] },
}

impl InputEvent {
    /// The hand this event belongs to.
    pub fn hand(&self) -> EntityId {
        match *self {
            Self::HandConnected { hand }
            | Self::HandDisconnected { hand }
            | Self::ButtonDown { hand, .. }
            | Self::ButtonUp { hand, .. }
            | Self::AxisMove { hand, .. } => hand,
        }
    }
}

/// A queue of input events.
/// The host pushes events between frames; the runtime drains them at the start of each tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from the host bridge).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
