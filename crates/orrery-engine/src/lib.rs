pub mod api;
pub mod assets;
pub mod components;
pub mod controller;
pub mod core;
pub mod error;
pub mod input;
pub mod navigation;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::orrery::{Orrery, OrreryConfig};
pub use api::types::{EntityId, Handedness};
pub use assets::manifest::{EntityDescriptor, SceneManifest};
pub use components::body::KinematicBody;
pub use components::entity::Entity;
pub use components::label::{LabelComponent, TextAlign};
pub use components::mesh::{Color, LineComponent, MeshComponent, Shape};
pub use controller::profile::{ControllerProfile, ControllerProfileSelector, DeviceProbe};
pub use core::scene::Scene;
pub use core::time::IntervalTimer;
pub use core::transform::Transform;
pub use error::ManifestError;
pub use input::queue::{Button, InputEvent, InputQueue};
pub use navigation::{Gesture, HandRecord, ManipulationCoordinator, NavigationConfig, ScalingSession};
pub use renderer::instance::{TransformBuffer, TransformInstance};
pub use systems::anchor::FrameAnchor;
pub use systems::orbit::{OrbitConfig, OrbitEngine, SatelliteConfig};
