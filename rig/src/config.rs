//! Rig, camera and projection configuration
//!
//! All sections deserialize from TOML and fall back to the defaults of the
//! reference scene for any missing field, so an empty table is valid.

use serde::{Deserialize, Serialize};

use crate::registry::part_name;

/// Walking rig configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    /// Object whose parts make up the rig (default: "person")
    #[serde(default = "default_object")]
    pub object: String,
    /// Group of the body (default: "off")
    #[serde(default = "default_body")]
    pub body: String,
    /// Group of the left arm (default: "left_hand")
    #[serde(default = "default_left_hand")]
    pub left_hand: String,
    /// Group of the right arm (default: "right_hand")
    #[serde(default = "default_right_hand")]
    pub right_hand: String,
    /// Group of the left leg (default: "left_leg")
    #[serde(default = "default_left_leg")]
    pub left_leg: String,
    /// Group of the right leg (default: "right_leg")
    #[serde(default = "default_right_leg")]
    pub right_leg: String,

    /// Camera height above the ground plane (default: 5.0)
    #[serde(default = "default_eye_height")]
    pub eye_height: f32,
    /// Camera distance behind the rig (default: 3.0)
    #[serde(default = "default_camera_back_distance")]
    pub camera_back_distance: f32,
    /// Camera pitch in radians, negative looks down (default: -0.6)
    #[serde(default = "default_camera_tilt")]
    pub camera_tilt: f32,

    /// Units per second at full forward/strafe input (default: 1.0)
    #[serde(default = "default_speed")]
    pub movement_speed: f32,
    /// Radians per second at full turn input (default: 1.0)
    #[serde(default = "default_speed")]
    pub turn_speed: f32,
    /// Limb swing decay toward rest, per second (default: 2.0)
    #[serde(default = "default_swing_decay_rate")]
    pub swing_decay_rate: f32,
}

/// Perspective projection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Vertical field of view in radians (default: 45 degrees)
    #[serde(default = "default_fov_y")]
    pub fov_y: f32,
    /// Near plane (default: 0.1)
    #[serde(default = "default_near")]
    pub near: f32,
    /// Far plane (default: 100.0)
    #[serde(default = "default_far")]
    pub far: f32,
}

/// Directional light passed through to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    /// RGBA light color (default: white)
    #[serde(default = "default_light_color")]
    pub color: [f32; 4],
    /// Light direction, w unused (default: [1, 1, 1, 0])
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 4],
}

fn default_object() -> String {
    "person".to_string()
}
fn default_body() -> String {
    "off".to_string()
}
fn default_left_hand() -> String {
    "left_hand".to_string()
}
fn default_right_hand() -> String {
    "right_hand".to_string()
}
fn default_left_leg() -> String {
    "left_leg".to_string()
}
fn default_right_leg() -> String {
    "right_leg".to_string()
}

fn default_eye_height() -> f32 {
    5.0
}
fn default_camera_back_distance() -> f32 {
    3.0
}
fn default_camera_tilt() -> f32 {
    -0.6
}
fn default_speed() -> f32 {
    1.0
}
fn default_swing_decay_rate() -> f32 {
    2.0
}

fn default_fov_y() -> f32 {
    45f32.to_radians()
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}

fn default_light_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}
fn default_light_direction() -> [f32; 4] {
    [1.0, 1.0, 1.0, 0.0]
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            object: default_object(),
            body: default_body(),
            left_hand: default_left_hand(),
            right_hand: default_right_hand(),
            left_leg: default_left_leg(),
            right_leg: default_right_leg(),
            eye_height: default_eye_height(),
            camera_back_distance: default_camera_back_distance(),
            camera_tilt: default_camera_tilt(),
            movement_speed: default_speed(),
            turn_speed: default_speed(),
            swing_decay_rate: default_swing_decay_rate(),
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y: default_fov_y(),
            near: default_near(),
            far: default_far(),
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: default_light_color(),
            direction: default_light_direction(),
        }
    }
}

impl RigConfig {
    /// Full part names in slot order: body, left hand, right hand, left leg, right leg
    pub fn part_names(&self) -> [String; 5] {
        [
            &self.body,
            &self.left_hand,
            &self.right_hand,
            &self.left_leg,
            &self.right_leg,
        ]
        .map(|group| part_name(&self.object, group))
    }
}
