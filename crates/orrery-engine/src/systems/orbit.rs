//! Circular orbits and camera-facing label pins.
//!
//! Phase advances as `π·dt / (period·30000)` per frame (dt in ms), so `period`
//! is a tuned speed knob rather than literal minutes: one revolution takes
//! `period` wall-clock minutes.

use std::f64::consts::{PI, TAU};
use glam::Vec3;
use serde::Deserialize;
use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::components::label::{LabelComponent, TextAlign};
use crate::components::mesh::{Color, LineComponent, MeshComponent};
use crate::core::scene::Scene;
use crate::core::time::IntervalTimer;
use crate::error::Result;

/// Milliseconds per half revolution for `period = 1`.
const PERIOD_SCALE_MS: f64 = 30000.0;

/// Projection line from a body down toward the floor.
const PROJECT_LINE_END: Vec3 = Vec3::new(0.0, -0.5, 0.0);
/// Short tick drawn next to a pin's label.
const PIN_LINE_END: Vec3 = Vec3::new(0.1, 0.0, 0.0);
const PIN_TEXT_X_OFFSET: f32 = 0.2;

/// Per-body settings, re-applied whenever they change.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SatelliteConfig {
    pub color: Color,
    /// Sphere radius.
    pub radius: f32,
    /// Orbit radius around the parent.
    pub distance: f32,
    /// Orbit speed knob; negative values orbit backwards.
    pub period: f32,
    /// Whether the body gets a label pin.
    pub pin: bool,
    /// Whether to draw a line projecting the body toward the floor.
    pub project: bool,
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            radius: 1.0,
            distance: 0.0,
            period: 1.0,
            pin: true,
            project: true,
        }
    }
}

impl SatelliteConfig {
    /// Parse settings from a JSON object; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Engine-wide pin and label settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitConfig {
    /// How often pin labels are compared against body names.
    pub label_refresh_ms: f64,
    /// Lerp factor used while a pin is recovering from a tiny scale.
    pub pin_damping: f32,
    /// Pins smaller than this ease toward their target scale instead of snapping.
    pub pin_smoothing_below: f32,
    /// Pins at or below this scale are hidden.
    pub pin_visible_above: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            label_refresh_ms: 500.0,
            pin_damping: 0.1,
            pin_smoothing_below: 0.05,
            pin_visible_above: 0.005,
        }
    }
}

/// A body on a circular orbit around its parent.
#[derive(Debug, Clone)]
pub struct OrbitBody {
    pub entity: EntityId,
    pub config: SatelliteConfig,
    /// Accumulated orbit phase in radians, kept in [0, 2π).
    phase: f64,
    /// Label pin owned by this body.
    pin: Option<EntityId>,
    /// Name last written to the pin label.
    known_name: String,
}

impl OrbitBody {
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn pin(&self) -> Option<EntityId> {
        self.pin
    }

    /// Advance the phase by `dt_ms`.
    fn advance(&mut self, dt_ms: f64) {
        let period = self.config.period as f64;
        if period == 0.0 || !period.is_finite() || !dt_ms.is_finite() {
            return;
        }
        self.phase = (self.phase + PI * dt_ms / (period * PERIOD_SCALE_MS)).rem_euclid(TAU);
    }

    /// Position on the orbit for the current phase, in the parent's space.
    pub fn orbit_position(&self) -> Vec3 {
        let d = self.config.distance as f64;
        Vec3::new(
            (self.phase.sin() * d) as f32,
            0.0,
            (self.phase.cos() * d) as f32,
        )
    }
}

/// Owns every registered orbit body and updates them each frame.
pub struct OrbitEngine {
    config: OrbitConfig,
    camera: Option<EntityId>,
    bodies: Vec<OrbitBody>,
    label_timer: IntervalTimer,
}

impl OrbitEngine {
    pub fn new(config: OrbitConfig) -> Self {
        Self {
            config,
            camera: None,
            bodies: Vec::new(),
            label_timer: IntervalTimer::new(config.label_refresh_ms),
        }
    }

    pub fn with_camera(mut self, camera: EntityId) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn set_camera(&mut self, camera: Option<EntityId>) {
        self.camera = camera;
    }

    pub fn body(&self, entity: EntityId) -> Option<&OrbitBody> {
        self.bodies.iter().find(|b| b.entity == entity)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &OrbitBody> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Add `entity` to the managed set and apply `config`.
    /// Registering an already managed entity re-applies the config.
    /// Returns false if the entity is not in the scene.
    pub fn register_orbit_body(
        &mut self,
        scene: &mut Scene,
        entity: EntityId,
        config: SatelliteConfig,
    ) -> bool {
        let Some(name) = scene.get(entity).map(|e| e.tag.clone()) else {
            return false;
        };
        if self.body(entity).is_none() {
            self.bodies.push(OrbitBody {
                entity,
                config: config.clone(),
                phase: 0.0,
                pin: None,
                known_name: name,
            });
        }
        self.configure(scene, entity, config)
    }

    /// Re-apply configuration to a managed body: mesh, starting position,
    /// pin creation/removal and the projection line.
    pub fn configure(&mut self, scene: &mut Scene, entity: EntityId, config: SatelliteConfig) -> bool {
        let Some(body) = self.bodies.iter_mut().find(|b| b.entity == entity) else {
            return false;
        };
        let Some(e) = scene.get_mut(entity) else {
            return false;
        };
        e.mesh = Some(MeshComponent::sphere(config.radius, config.color));
        e.transform.translation = Vec3::ONE * config.distance;
        e.line = config
            .project
            .then(|| LineComponent::new(Vec3::ZERO, PROJECT_LINE_END, Color::WHITE));

        match (config.pin, body.pin) {
            (true, None) => {
                let id = scene.next_id();
                scene.spawn(
                    Entity::new(id)
                        .with_tag(format!("{}-pin", body.known_name))
                        .with_parent(entity)
                        .with_line(LineComponent::new(Vec3::ZERO, PIN_LINE_END, Color::WHITE))
                        .with_label(
                            LabelComponent::new(body.known_name.clone())
                                .with_align(TextAlign::Center)
                                .with_x_offset(PIN_TEXT_X_OFFSET),
                        ),
                );
                body.pin = Some(id);
            }
            (false, Some(pin)) => {
                scene.despawn(pin);
                body.pin = None;
            }
            _ => {}
        }

        body.config = config;
        true
    }

    /// Remove `entity` from the managed set, stripping its visuals and pin.
    pub fn unregister_orbit_body(&mut self, scene: &mut Scene, entity: EntityId) -> bool {
        let Some(idx) = self.bodies.iter().position(|b| b.entity == entity) else {
            return false;
        };
        let body = self.bodies.swap_remove(idx);
        if let Some(pin) = body.pin {
            scene.despawn(pin);
        }
        if let Some(e) = scene.get_mut(entity) {
            e.mesh = None;
            e.line = None;
            e.transform.translation = Vec3::ZERO;
        }
        true
    }

    /// Advance every orbit, then billboard pins toward the camera.
    pub fn tick(&mut self, scene: &mut Scene, dt_ms: f32) {
        let refresh_labels = self.label_timer.tick(dt_ms as f64);

        for body in &mut self.bodies {
            if !scene.contains(body.entity) {
                continue;
            }
            body.advance(dt_ms as f64);
            scene.set_position(body.entity, body.orbit_position());

            if refresh_labels {
                refresh_label(scene, body);
            }
            if let (Some(pin), Some(camera)) = (body.pin, self.camera) {
                billboard_pin(scene, &self.config, body.entity, pin, camera);
            }
        }
    }
}

impl Default for OrbitEngine {
    fn default() -> Self {
        Self::new(OrbitConfig::default())
    }
}

/// Rewrite the pin label if the body was renamed since the last check.
fn refresh_label(scene: &mut Scene, body: &mut OrbitBody) {
    let Some(name) = scene.get(body.entity).map(|e| e.tag.clone()) else {
        return;
    };
    if name == body.known_name {
        return;
    }
    log::debug!("pin label {:?} -> {:?}", body.known_name, name);
    if let Some(label) = body.pin.and_then(|p| scene.get_mut(p)).and_then(|p| p.label.as_mut()) {
        label.value = name.clone();
    }
    body.known_name = name;
}

/// Scale the pin by camera distance so it keeps a constant apparent size,
/// and turn it to face the camera.
fn billboard_pin(scene: &mut Scene, config: &OrbitConfig, body: EntityId, pin: EntityId, camera: EntityId) {
    let (Some(body_pos), Some(body_scale), Some(camera_pos), Some(camera_rot)) = (
        scene.world_position(body),
        scene.world_scale(body),
        scene.world_position(camera),
        scene.world_rotation(camera),
    ) else {
        return;
    };
    if body_scale.x.abs() <= f32::EPSILON {
        return;
    }
    let Some(parent_rot) = scene.world_rotation(body) else {
        return;
    };
    let Some(current) = scene.scale(pin).map(|s| s.x) else {
        return;
    };

    let wanted = body_pos.distance(camera_pos) / body_scale.x;
    let scale = if current < config.pin_smoothing_below {
        lerp(current, wanted, config.pin_damping)
    } else {
        wanted
    };

    if let Some(p) = scene.get_mut(pin) {
        p.transform.translation = Vec3::ZERO;
        p.transform.scale = Vec3::splat(scale);
        p.transform.rotation = parent_rot.inverse() * camera_rot;
        p.visible = scale > config.pin_visible_above;
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
