use glam::Vec3;
use serde::Deserialize;
use crate::error::ManifestError;

/// RGB color, components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb`.
    pub fn from_hex(hex: &str) -> Result<Self, ManifestError> {
        let invalid = || ManifestError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map(|v| v as f32 / 255.0);
        match digits.len() {
            6 => Ok(Self {
                r: channel(&digits[0..2]).map_err(|_| invalid())?,
                g: channel(&digits[2..4]).map_err(|_| invalid())?,
                b: channel(&digits[4..6]).map_err(|_| invalid())?,
            }),
            3 => {
                let mut rgb = [0.0; 3];
                for (i, c) in digits.chars().enumerate() {
                    rgb[i] = channel(&format!("{c}{c}")).map_err(|_| invalid())?;
                }
                Ok(Self { r: rgb[0], g: rgb[1], b: rgb[2] })
            }
            _ => Err(invalid()),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl TryFrom<String> for Color {
    type Error = ManifestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

/// Mesh primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
}

/// Mesh component: shape plus flat color. Tessellation is the host's job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshComponent {
    pub shape: Shape,
    pub color: Color,
}

impl MeshComponent {
    pub fn new(shape: Shape, color: Color) -> Self {
        Self { shape, color }
    }

    pub fn sphere(radius: f32, color: Color) -> Self {
        Self::new(Shape::Sphere { radius }, color)
    }
}

/// Single line segment in the entity's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineComponent {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Color,
}

impl LineComponent {
    pub fn new(start: Vec3, end: Vec3, color: Color) -> Self {
        Self { start, end, color }
    }
}
