// navigation/mod.rs
//
// Hand-controller navigation of the manipulation target.

pub mod coordinator;
pub mod hand;
pub mod scaling;

pub use coordinator::{ManipulationCoordinator, NavigationConfig};
pub use hand::{Gesture, HandRecord, HandState};
pub use scaling::ScalingSession;
