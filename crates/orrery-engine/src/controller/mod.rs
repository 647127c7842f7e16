pub mod profile;

pub use profile::{select_profile, ControllerProfile, ControllerProfileSelector, DeviceProbe, ModelOverride};
