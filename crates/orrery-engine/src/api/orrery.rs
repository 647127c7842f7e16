use std::collections::HashMap;
use glam::{Quat, Vec3};
use crate::api::types::EntityId;
use crate::assets::manifest::SceneManifest;
use crate::components::body::KinematicBody;
use crate::components::entity::Entity;
use crate::controller::profile::{ControllerProfile, ControllerProfileSelector, DeviceProbe};
use crate::core::scene::Scene;
use crate::error::Result;
use crate::input::queue::{Button, InputEvent, InputQueue};
use crate::navigation::{Gesture, ManipulationCoordinator, NavigationConfig};
use crate::renderer::instance::TransformBuffer;
use crate::systems::anchor::FrameAnchor;
use crate::systems::orbit::{OrbitConfig, OrbitEngine, SatelliteConfig};
use crate::systems::render::build_transform_buffer;

/// Runtime configuration. Per-entity settings live in the scene manifest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrreryConfig {
    pub navigation: NavigationConfig,
    pub orbit: OrbitConfig,
    /// Damping of the manipulation target's kinematic body, per second.
    pub body_damping: f32,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            navigation: NavigationConfig::default(),
            orbit: OrbitConfig::default(),
            body_damping: 0.5,
        }
    }
}

/// Gesture a button starts.
fn gesture_for(button: Button) -> Gesture {
    match button {
        Button::Fly => Gesture::Flying,
        Button::Drag => Gesture::Dragging,
    }
}

/// The whole interactive scene: entities, navigation, orbits, tracking and
/// controller selection, advanced together once per frame.
pub struct Orrery {
    config: OrreryConfig,
    scene: Scene,
    input: InputQueue,
    coordinator: ManipulationCoordinator,
    orbits: OrbitEngine,
    anchor: Option<FrameAnchor>,
    selectors: Vec<ControllerProfileSelector>,
    camera: Option<EntityId>,
    transforms: TransformBuffer,
}

impl Orrery {
    /// Build a runtime from manifest JSON.
    pub fn from_manifest(json: &str, config: OrreryConfig) -> Result<Self> {
        let manifest = SceneManifest::from_json(json)?;
        Ok(Self::build(&manifest, config))
    }

    /// Build a runtime from an already validated manifest.
    pub fn build(manifest: &SceneManifest, config: OrreryConfig) -> Self {
        let mut scene = Scene::with_capacity(manifest.entities.len() * 2);
        let mut ids: HashMap<&str, EntityId> = HashMap::with_capacity(manifest.entities.len());

        for desc in &manifest.entities {
            let id = scene.next_id();
            let mut entity = Entity::new(id).with_tag(desc.name.clone()).with_transform(desc.transform());
            if desc.body {
                entity = entity.with_body(KinematicBody::new().with_damping(config.body_damping));
            }
            scene.spawn(entity);
            ids.insert(desc.name.as_str(), id);
        }

        for desc in &manifest.entities {
            let Some(parent) = desc.parent.as_deref() else { continue };
            match (ids.get(desc.name.as_str()), ids.get(parent)) {
                (Some(&child), Some(&parent_id)) => {
                    if !scene.set_parent(child, Some(parent_id)) {
                        log::warn!("could not parent {:?} to {:?}", desc.name, parent);
                    }
                }
                _ => log::warn!("{:?} names unknown parent {:?}", desc.name, parent),
            }
        }

        let mut coordinator = ManipulationCoordinator::new(config.navigation);
        let mut orbits = OrbitEngine::new(config.orbit);
        let mut anchor = None;
        let mut selectors = Vec::new();
        let mut camera = None;

        for desc in &manifest.entities {
            let Some(&id) = ids.get(desc.name.as_str()) else { continue };

            if desc.navigate.is_some() {
                match coordinator.target() {
                    None => coordinator.set_target(Some(id)),
                    Some(_) => log::warn!("ignoring extra navigate target {:?}", desc.name),
                }
            }
            if desc.camera {
                match camera {
                    None => camera = Some(id),
                    Some(_) => log::warn!("ignoring extra camera {:?}", desc.name),
                }
            }
            if let Some(track) = &desc.track {
                if anchor.is_some() {
                    log::warn!("ignoring extra frame anchor {:?}", desc.name);
                } else {
                    let mut a = FrameAnchor::new(id);
                    a.retarget_by_tag(&scene, &track.target);
                    anchor = Some(a);
                }
            }
            if let Some(satellite) = &desc.satellite {
                orbits.register_orbit_body(&mut scene, id, satellite.clone());
            }
            if let Some(controller) = &desc.controller {
                let selector = ControllerProfileSelector::new(id, controller.hand);
                selector.attach(&mut scene);
                coordinator.set_hand_state(&mut scene, id, Gesture::None);
                selectors.push(selector);
            }
        }
        orbits.set_camera(camera);

        log::info!(
            "orrery: {} entities, {} orbit bodies, {} hands",
            scene.len(),
            orbits.len(),
            selectors.len()
        );

        let mut transforms = TransformBuffer::with_capacity(scene.len());
        build_transform_buffer(&scene, &mut transforms);

        Self {
            config,
            scene,
            input: InputQueue::new(),
            coordinator,
            orbits,
            anchor,
            selectors,
            camera,
            transforms,
        }
    }

    /// Queue an input event for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Advance one frame. `time_ms` is the frame clock, `dt_ms` the frame delta.
    pub fn tick(&mut self, time_ms: f64, dt_ms: f32) {
        self.coordinator.set_clock(time_ms);
        for event in self.input.drain() {
            self.handle_event(event);
        }

        self.scene.integrate_bodies(dt_ms / 1000.0);
        self.coordinator.tick(&mut self.scene, time_ms, dt_ms);
        self.orbits.tick(&mut self.scene, dt_ms);
        if let Some(anchor) = &self.anchor {
            anchor.tick(&mut self.scene);
        }

        build_transform_buffer(&self.scene, &mut self.transforms);
    }

    fn handle_event(&mut self, event: InputEvent) {
        let hand = event.hand();
        // A disconnect must still evict the record after the hand entity is gone
        let disconnect = matches!(event, InputEvent::HandDisconnected { .. });
        if !disconnect && !self.scene.contains(hand) {
            log::debug!("input for unknown entity {:?} ignored", hand);
            return;
        }
        let scene = &mut self.scene;
        match event {
            InputEvent::HandConnected { .. } => {
                if self.coordinator.record(hand).is_none() {
                    self.coordinator.set_hand_state(scene, hand, Gesture::None);
                }
            }
            InputEvent::HandDisconnected { .. } => self.coordinator.remove_hand(scene, hand),
            InputEvent::ButtonDown { button, .. } => {
                self.coordinator.set_hand_state(scene, hand, gesture_for(button));
            }
            InputEvent::ButtonUp { button, .. } => {
                if self.coordinator.gesture(hand) == Some(gesture_for(button)) {
                    self.coordinator.set_hand_state(scene, hand, Gesture::None);
                }
            }
            InputEvent::AxisMove { axes, .. } => self.coordinator.axis_move(hand, axes),
        }
    }

    /// Set an entity's local position and rotation (hand and camera tracking).
    pub fn set_pose(&mut self, id: EntityId, position: Vec3, rotation: Quat) {
        if let Some(e) = self.scene.get_mut(id) {
            e.transform.translation = position;
            e.transform.rotation = rotation;
        }
    }

    /// Re-centre the universe on the named body. Unknown names keep the current home.
    pub fn set_home(&mut self, name: &str) -> bool {
        let Some(anchor) = self.anchor.as_mut() else {
            log::warn!("no frame anchor, cannot go home to {name:?}");
            return false;
        };
        match self.scene.id_by_tag(name) {
            Some(id) => {
                anchor.set_target(Some(id));
                log::info!("home: {name}");
                true
            }
            None => {
                log::warn!("home target {name:?} not found");
                false
            }
        }
    }

    /// Re-resolve the frame anchor's target. Unknown names disable tracking.
    pub fn set_track_target(&mut self, name: &str) -> bool {
        match self.anchor.as_mut() {
            Some(anchor) => anchor.retarget_by_tag(&self.scene, name),
            None => false,
        }
    }

    /// Apply new satellite settings to the named entity, registering it if needed.
    pub fn configure_satellite(&mut self, name: &str, config: SatelliteConfig) -> bool {
        let Some(id) = self.scene.id_by_tag(name) else {
            log::warn!("satellite {name:?} not found");
            return false;
        };
        if self.orbits.body(id).is_some() {
            self.orbits.configure(&mut self.scene, id, config)
        } else {
            self.orbits.register_orbit_body(&mut self.scene, id, config)
        }
    }

    /// Stop orbiting the named entity and remove its visuals.
    pub fn remove_satellite(&mut self, name: &str) -> bool {
        match self.scene.id_by_tag(name) {
            Some(id) => self.orbits.unregister_orbit_body(&mut self.scene, id),
            None => false,
        }
    }

    /// A hand's controller model finished loading; pick its profile once.
    pub fn on_controller_model_loaded(&mut self, hand: EntityId, probe: &dyn DeviceProbe) -> Option<ControllerProfile> {
        let selector = self.selectors.iter_mut().find(|s| s.hand == hand)?;
        selector.on_model_loaded(&mut self.scene, probe)
    }

    // -- Accessors --

    pub fn config(&self) -> &OrreryConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn coordinator(&self) -> &ManipulationCoordinator {
        &self.coordinator
    }

    pub fn orbits(&self) -> &OrbitEngine {
        &self.orbits
    }

    pub fn anchor(&self) -> Option<&FrameAnchor> {
        self.anchor.as_ref()
    }

    pub fn selector(&self, hand: EntityId) -> Option<&ControllerProfileSelector> {
        self.selectors.iter().find(|s| s.hand == hand)
    }

    pub fn camera(&self) -> Option<EntityId> {
        self.camera
    }

    pub fn entity_id(&self, name: &str) -> Option<EntityId> {
        self.scene.id_by_tag(name)
    }

    /// World transforms written by the last tick.
    pub fn transforms(&self) -> &TransformBuffer {
        &self.transforms
    }
}
