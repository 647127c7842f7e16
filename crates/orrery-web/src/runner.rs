use glam::{Quat, Vec3};
use orrery_engine::{
    Button, ControllerProfile, DeviceProbe, EntityId, InputEvent, ManifestError, Orrery,
    OrreryConfig, SatelliteConfig,
};
use wasm_bindgen::JsCast;
use web_sys::Gamepad;

/// Device probe over `navigator.getGamepads()`. Empty slots are skipped.
pub struct GamepadProbe;

impl DeviceProbe for GamepadProbe {
    fn device_ids(&self) -> Vec<String> {
        let Some(window) = web_sys::window() else {
            return Vec::new();
        };
        let Ok(pads): Result<js_sys::Array, _> = window.navigator().get_gamepads() else {
            return Vec::new();
        };
        pads.iter()
            .filter_map(|slot| slot.dyn_into::<Gamepad>().ok())
            .map(|pad| pad.id())
            .collect()
    }
}

/// Owns the runtime for the page. The host drives it through the free
/// functions exported from the crate root.
pub struct OrreryRunner {
    orrery: Orrery,
}

impl OrreryRunner {
    pub fn from_manifest(json: &str) -> Result<Self, ManifestError> {
        let orrery = Orrery::from_manifest(json, OrreryConfig::default())?;
        Ok(Self { orrery })
    }

    pub fn tick(&mut self, time_ms: f64, dt_ms: f32) {
        self.orrery.tick(time_ms, dt_ms);
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.orrery.push_input(event);
    }

    /// Raw button ids other than fly/drag are ignored.
    pub fn button(&mut self, hand: u32, button_id: u32, down: bool) {
        let Some(button) = Button::from_id(button_id) else {
            log::debug!("ignoring button {button_id} on hand {hand}");
            return;
        };
        let hand = EntityId(hand);
        self.push_input(if down {
            InputEvent::ButtonDown { hand, button }
        } else {
            InputEvent::ButtonUp { hand, button }
        });
    }

    pub fn set_pose(&mut self, id: u32, position: Vec3, rotation: Quat) {
        if !position.is_finite() || !rotation.is_finite() || rotation.length_squared() == 0.0 {
            return;
        }
        self.orrery.set_pose(EntityId(id), position, rotation.normalize());
    }

    pub fn set_home(&mut self, name: &str) -> bool {
        self.orrery.set_home(name)
    }

    pub fn set_track_target(&mut self, name: &str) -> bool {
        self.orrery.set_track_target(name)
    }

    pub fn configure_satellite(&mut self, name: &str, json: &str) -> bool {
        match SatelliteConfig::from_json(json) {
            Ok(config) => self.orrery.configure_satellite(name, config),
            Err(e) => {
                log::warn!("satellite {name:?}: {e}");
                false
            }
        }
    }

    pub fn controller_model_loaded(&mut self, hand: u32) -> Option<ControllerProfile> {
        self.orrery.on_controller_model_loaded(EntityId(hand), &GamepadProbe)
    }

    /// Entity id for `name`, or -1.
    pub fn entity_id(&self, name: &str) -> i32 {
        self.orrery.entity_id(name).map_or(-1, |id| id.0 as i32)
    }

    // ---- Pointer accessors for direct wasm memory reads ----

    pub fn transforms_ptr(&self) -> *const f32 {
        self.orrery.transforms().instances_ptr()
    }

    pub fn transform_count(&self) -> u32 {
        self.orrery.transforms().instance_count() as u32
    }

    pub fn orrery(&self) -> &Orrery {
        &self.orrery
    }
}
