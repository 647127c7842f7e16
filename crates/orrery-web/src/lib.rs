//! Browser bridge: one `thread_local!` runner plus free `#[wasm_bindgen]`
//! functions, since wasm-bindgen cannot export the runtime struct directly.
//!
//! Entity ids cross the boundary as `u32`; look them up with `entity_id`.

pub mod runner;

pub use runner::{GamepadProbe, OrreryRunner};

use std::cell::RefCell;
use glam::{Quat, Vec3};
use orrery_engine::{EntityId, InputEvent};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<OrreryRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the runner. Calls before `orrery_init` are logged and dropped.
fn with_runner<R>(f: impl FnOnce(&mut OrreryRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("orrery not initialized, call orrery_init() first");
                None
            }
        }
    })
}

/// Build the scene from manifest JSON. Returns false if the manifest is invalid.
#[wasm_bindgen]
pub fn orrery_init(manifest_json: &str) -> bool {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    match OrreryRunner::from_manifest(manifest_json) {
        Ok(runner) => {
            RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
            log::info!("orrery: initialized");
            true
        }
        Err(e) => {
            log::error!("orrery: bad manifest: {e}");
            false
        }
    }
}

#[wasm_bindgen]
pub fn orrery_tick(time_ms: f64, dt_ms: f32) {
    with_runner(|r| r.tick(time_ms, dt_ms));
}

// ---- Input ----

#[wasm_bindgen]
pub fn orrery_hand_connected(hand: u32) {
    with_runner(|r| r.push_input(InputEvent::HandConnected { hand: EntityId(hand) }));
}

#[wasm_bindgen]
pub fn orrery_hand_disconnected(hand: u32) {
    with_runner(|r| r.push_input(InputEvent::HandDisconnected { hand: EntityId(hand) }));
}

#[wasm_bindgen]
pub fn orrery_button_down(hand: u32, button_id: u32) {
    with_runner(|r| r.button(hand, button_id, true));
}

#[wasm_bindgen]
pub fn orrery_button_up(hand: u32, button_id: u32) {
    with_runner(|r| r.button(hand, button_id, false));
}

#[wasm_bindgen]
pub fn orrery_axis_move(hand: u32, x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::AxisMove { hand: EntityId(hand), axes: [x, y] }));
}

/// Local pose of a hand or the camera, as reported by the tracking layer.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn orrery_set_pose(id: u32, px: f32, py: f32, pz: f32, qx: f32, qy: f32, qz: f32, qw: f32) {
    with_runner(|r| r.set_pose(id, Vec3::new(px, py, pz), Quat::from_xyzw(qx, qy, qz, qw)));
}

// ---- Configuration ----

#[wasm_bindgen]
pub fn orrery_set_home(name: &str) -> bool {
    with_runner(|r| r.set_home(name)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn orrery_set_track_target(name: &str) -> bool {
    with_runner(|r| r.set_track_target(name)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn orrery_configure_satellite(name: &str, config_json: &str) -> bool {
    with_runner(|r| r.configure_satellite(name, config_json)).unwrap_or(false)
}

/// Pick the controller profile for a hand once its model has loaded.
/// Returns the profile name, or an empty string when no device is present.
#[wasm_bindgen]
pub fn orrery_controller_model_loaded(hand: u32) -> String {
    with_runner(|r| r.controller_model_loaded(hand))
        .flatten()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn orrery_entity_id(name: &str) -> i32 {
    with_runner(|r| r.entity_id(name)).unwrap_or(-1)
}

#[wasm_bindgen]
pub fn get_transforms_ptr() -> *const f32 {
    with_runner(|r| r.transforms_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_transform_count() -> u32 {
    with_runner(|r| r.transform_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_transform_floats() -> u32 {
    orrery_engine::TransformInstance::FLOATS as u32
}
