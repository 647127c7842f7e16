pub mod anchor;
pub mod orbit;
pub mod render;
