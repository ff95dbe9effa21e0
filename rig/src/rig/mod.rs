//! Walking rig
//!
//! Owns the planar pose and limb phase of one articulated actor. Inputs set
//! control flags, [`Rig::update`] integrates one simulation tick and
//! [`Rig::compose`] writes the camera and the rig's part matrices into a
//! [`TransformTable`](crate::TransformTable).
//!
//! While the actor walks, the limb angle follows [`swing_wave`] of an
//! internal clock. Once it stops, the angle decays linearly to rest and the
//! clock is kept at [`swing_wave_inverse`] of the angle, so walking resumes
//! without a jump.

mod compose;
mod control;
mod wave;

pub use control::{Control, UnknownControl};
pub use wave::{swing_wave, swing_wave_inverse};

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::config::RigConfig;
use crate::error::SceneError;
use crate::mesh::PivotTable;
use crate::registry::{PartId, PartRegistry};
use crate::transform::TRANSFORM_TABLE_CAPACITY;
use control::ControlState;

/// A limb part and the point it swings about
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limb {
    pub id: PartId,
    /// `None` when the part shares no vertex with the body; the limb then
    /// follows the body without swinging
    pub pivot: Option<Vec3>,
}

/// Part ids (and limb pivots) the rig writes matrices for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigParts {
    pub body: PartId,
    pub left_hand: Limb,
    pub right_hand: Limb,
    pub left_leg: Limb,
    pub right_leg: Limb,
}

impl RigParts {
    /// Look up the configured part names and their pivots.
    ///
    /// Every part must already be registered by a loaded mesh and fit in
    /// the transform table.
    pub fn resolve(
        config: &RigConfig,
        registry: &PartRegistry,
        pivots: &PivotTable,
    ) -> Result<Self, SceneError> {
        let [body, left_hand, right_hand, left_leg, right_leg] = config.part_names();

        let find = |name: String| -> Result<PartId, SceneError> {
            let id = registry
                .lookup(&name)
                .ok_or(SceneError::MissingRigPart { name })?;
            if id.index() >= TRANSFORM_TABLE_CAPACITY {
                return Err(SceneError::CapacityExceeded {
                    parts: id.index() + 1,
                    capacity: TRANSFORM_TABLE_CAPACITY,
                });
            }
            Ok(id)
        };
        let limb = |name: String| -> Result<Limb, SceneError> {
            let id = find(name.clone())?;
            let pivot = pivots.pivot(id);
            if pivot.is_none() {
                tracing::warn!("rig limb '{}' has no pivot; it will not swing", name);
            }
            Ok(Limb { id, pivot })
        };

        Ok(Self {
            body: find(body)?,
            left_hand: limb(left_hand)?,
            right_hand: limb(right_hand)?,
            left_leg: limb(left_leg)?,
            right_leg: limb(right_leg)?,
        })
    }
}

/// Runtime state of the walking rig
#[derive(Debug, Clone)]
pub struct Rig {
    config: RigConfig,
    parts: RigParts,
    controls: ControlState,
    /// Ground-plane position (x, z)
    position: Vec2,
    /// Rotation about +Y in radians, kept inside (-2π, 2π)
    heading: f32,
    /// Swing in [-1, 1], used directly as a rotation angle in radians
    limb_angle: f32,
    limb_clock: f32,
    elapsed: f32,
}

impl Rig {
    pub fn new(config: RigConfig, parts: RigParts) -> Self {
        Self {
            config,
            parts,
            controls: ControlState::default(),
            position: Vec2::ZERO,
            heading: 0.0,
            limb_angle: 0.0,
            limb_clock: 0.0,
            elapsed: 0.0,
        }
    }

    /// Record a press or release of `control`
    pub fn apply_input(&mut self, control: Control, pressed: bool) {
        self.controls.set(control, pressed);
    }

    pub fn is_pressed(&self, control: Control) -> bool {
        self.controls.is_pressed(control)
    }

    /// Advance the rig by one simulation tick of `delta_time` seconds.
    pub fn update(&mut self, delta_time: f32) {
        let dt = if delta_time.is_finite() && delta_time > 0.0 {
            delta_time
        } else {
            0.0
        };
        self.elapsed += dt;

        let forward = self.controls.forward();
        let lateral = self.controls.lateral();
        let turn = self.controls.turn();

        // Move along the heading from the start of the tick
        let (sin, cos) = self.heading.sin_cos();
        let step = self.config.movement_speed * dt;
        self.position.x += (sin * forward + cos * lateral) * step;
        self.position.y += (cos * forward - sin * lateral) * step;

        self.heading = (self.heading + turn * self.config.turn_speed * dt) % TAU;

        if forward != 0.0 {
            self.limb_clock += dt;
            self.limb_angle = swing_wave(self.limb_clock);
        } else {
            let decay = self.config.swing_decay_rate * dt;
            self.limb_angle = if self.limb_angle > 0.0 {
                (self.limb_angle - decay).max(0.0)
            } else {
                (self.limb_angle + decay).min(0.0)
            };
            self.limb_clock = swing_wave_inverse(self.limb_angle);
        }
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    pub fn parts(&self) -> &RigParts {
        &self.parts
    }

    /// Ground-plane position as (x, z)
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn limb_angle(&self) -> f32 {
        self.limb_angle
    }

    pub fn limb_clock(&self) -> f32 {
        self.limb_clock
    }

    /// Total simulated time in seconds
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Unit vector the rig faces on the ground plane, as (x, z)
    pub fn forward_direction(&self) -> Vec2 {
        let (sin, cos) = self.heading.sin_cos();
        Vec2::new(sin, cos)
    }
}
