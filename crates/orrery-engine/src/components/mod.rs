pub mod body;
pub mod entity;
pub mod label;
pub mod mesh;
