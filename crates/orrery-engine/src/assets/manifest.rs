use std::collections::HashMap;
use glam::Vec3;
use serde::Deserialize;
use crate::api::types::Handedness;
use crate::core::transform::Transform;
use crate::error::{ManifestError, Result};
use crate::systems::orbit::SatelliteConfig;

/// Scene description loaded from JSON at startup.
/// Entity order is spawn order; parents may be declared after their children.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneManifest {
    pub entities: Vec<EntityDescriptor>,
}

/// One scene entity and the behaviours attached to it.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityDescriptor {
    /// Unique name, used for parent references, track targets and home selection.
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub position: [f32; 3],
    /// Euler angles in degrees, XYZ order.
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    /// Orbiting body with optional pin and projection line.
    #[serde(default)]
    pub satellite: Option<SatelliteConfig>,
    /// Frame anchor keeping the named descendant at this entity's origin.
    #[serde(default)]
    pub track: Option<TrackDescriptor>,
    /// Marks the manipulation target.
    #[serde(default)]
    pub navigate: Option<NavigateDescriptor>,
    /// Gives the entity a kinematic body (the velocity capability).
    #[serde(default)]
    pub body: bool,
    /// Tracked hand controller.
    #[serde(default)]
    pub controller: Option<ControllerDescriptor>,
    /// Camera used for pin billboarding.
    #[serde(default)]
    pub camera: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackDescriptor {
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct NavigateDescriptor {}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ControllerDescriptor {
    #[serde(default)]
    pub hand: Handedness,
}

fn default_scale() -> [f32; 3] {
    [1.0; 3]
}

impl EntityDescriptor {
    /// Local transform described by position, rotation and scale.
    pub fn transform(&self) -> Transform {
        Transform::IDENTITY
            .with_translation(Vec3::from(self.position))
            .with_euler_degrees(Vec3::from(self.rotation))
            .with_scale(Vec3::from(self.scale))
    }
}

impl SceneManifest {
    /// Parse and validate a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Names must be unique and every parent must exist without forming a loop.
    pub fn validate(&self) -> Result<()> {
        let mut parents: HashMap<&str, Option<&str>> = HashMap::with_capacity(self.entities.len());
        for e in &self.entities {
            if parents.insert(e.name.as_str(), e.parent.as_deref()).is_some() {
                return Err(ManifestError::DuplicateName(e.name.clone()));
            }
        }

        for e in &self.entities {
            if let Some(parent) = e.parent.as_deref() {
                if !parents.contains_key(parent) {
                    return Err(ManifestError::UnknownParent {
                        entity: e.name.clone(),
                        parent: parent.to_string(),
                    });
                }
            }

            let mut next = e.parent.as_deref();
            for _ in 0..self.entities.len() {
                let Some(current) = next else { break };
                if current == e.name {
                    return Err(ManifestError::ParentCycle(e.name.clone()));
                }
                next = parents.get(current).copied().flatten();
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&EntityDescriptor> {
        self.entities.iter().find(|e| e.name == name)
    }
}
