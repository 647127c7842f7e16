pub mod instance;

pub use instance::{TransformBuffer, TransformInstance};
