use crate::api::types::{EntityId, Handedness};
use crate::components::mesh::Color;
use crate::core::scene::Scene;

/// Device id prefix reported by SteamVR-backed controllers.
const OPENVR_MARKER: &str = "OpenVR";

/// Input-handling behavior attached to a controller entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerProfile {
    Vive,
    OculusTouch,
}

/// Replacement visual for a controller whose default model does not match the hardware.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOverride {
    pub model: &'static str,
    pub color: Color,
}

impl ControllerProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vive => "vive",
            Self::OculusTouch => "oculus-touch",
        }
    }

    pub fn model_override(&self) -> Option<ModelOverride> {
        match self {
            Self::Vive => Some(ModelOverride {
                model: "models/vive_controller_model.glb",
                // #202020
                color: Color::new(32.0 / 255.0, 32.0 / 255.0, 32.0 / 255.0),
            }),
            Self::OculusTouch => None,
        }
    }
}

/// Source of connected input device identifiers, in the host's slot order.
pub trait DeviceProbe {
    fn device_ids(&self) -> Vec<String>;
}

/// Pick a profile from the first connected device. `None` when nothing is connected.
pub fn select_profile(probe: &dyn DeviceProbe) -> Option<ControllerProfile> {
    let ids = probe.device_ids();
    let first = ids.first()?;
    if first.starts_with(OPENVR_MARKER) {
        Some(ControllerProfile::Vive)
    } else {
        Some(ControllerProfile::OculusTouch)
    }
}

/// One-shot chooser run when a hand's controller model finishes loading.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerProfileSelector {
    pub hand: EntityId,
    pub handedness: Handedness,
    model_override: Option<ModelOverride>,
    done: bool,
}

impl ControllerProfileSelector {
    pub fn new(hand: EntityId, handedness: Handedness) -> Self {
        Self {
            hand,
            handedness,
            model_override: None,
            done: false,
        }
    }

    /// Attach both candidate profiles until the hardware is known.
    pub fn attach(&self, scene: &mut Scene) {
        if let Some(e) = scene.get_mut(self.hand) {
            e.controllers = vec![ControllerProfile::Vive, ControllerProfile::OculusTouch];
        }
    }

    /// Keep exactly one profile, or none if no device is connected.
    /// Only the first call has an effect.
    pub fn on_model_loaded(&mut self, scene: &mut Scene, probe: &dyn DeviceProbe) -> Option<ControllerProfile> {
        if self.done {
            return self.selected(scene);
        }
        self.done = true;

        let profile = select_profile(probe);
        if let Some(e) = scene.get_mut(self.hand) {
            e.controllers = profile.into_iter().collect();
        }
        self.model_override = profile.and_then(|p| p.model_override());

        match profile {
            Some(p) => log::info!("{} hand: using {} controller profile", self.handedness.as_str(), p.as_str()),
            None => log::info!("{} hand: no input device, controller profiles removed", self.handedness.as_str()),
        }
        profile
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn model_override(&self) -> Option<&ModelOverride> {
        self.model_override.as_ref()
    }

    /// Profile currently attached to the hand, if exactly one is.
    pub fn selected(&self, scene: &Scene) -> Option<ControllerProfile> {
        match scene.get(self.hand)?.controllers.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}
