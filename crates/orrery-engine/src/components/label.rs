/// Horizontal text alignment for labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Text label attached to an entity (pins carry one with the body's name).
#[derive(Debug, Clone, PartialEq)]
pub struct LabelComponent {
    pub value: String,
    pub align: TextAlign,
    /// Horizontal offset from the entity origin in local units.
    pub x_offset: f32,
}

impl LabelComponent {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            align: TextAlign::Center,
            x_offset: 0.0,
        }
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_x_offset(mut self, x_offset: f32) -> Self {
        self.x_offset = x_offset;
        self
    }
}
