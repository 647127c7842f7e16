//! Error types for configuration and manifest loading.
//!
//! Per-frame code never fails; these only surface while building a scene.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("duplicate entity name: {0}")]
    DuplicateName(String),

    #[error("entity {entity:?} names unknown parent {parent:?}")]
    UnknownParent { entity: String, parent: String },

    #[error("entity {0:?} is its own ancestor")]
    ParentCycle(String),
}

pub type Result<T> = std::result::Result<T, ManifestError>;
