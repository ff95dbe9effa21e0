//! Camera and part matrices for the rig

use glam::{Mat4, Vec3};

use super::{Limb, Rig};
use crate::transform::TransformTable;

impl Rig {
    /// Camera view matrix: behind and above the rig, tilted down.
    pub fn view_matrix(&self) -> Mat4 {
        let config = &self.config;
        Mat4::from_rotation_x(config.camera_tilt)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, config.camera_back_distance))
            * Mat4::from_rotation_y(-self.heading)
            * Mat4::from_translation(Vec3::new(
                -self.position.x,
                -config.eye_height,
                -self.position.y,
            ))
    }

    /// World matrix of the body: heading rotation, then ground position.
    pub fn body_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.position.x, 0.0, self.position.y))
            * Mat4::from_rotation_y(self.heading)
    }

    /// Write the view matrix and the rig's five part matrices into `table`.
    ///
    /// Opposite limbs swing in opposite directions, and each arm swings
    /// against the leg on its side.
    pub fn compose(&self, table: &mut TransformTable) {
        let parts = &self.parts;
        let body = self.body_matrix();
        let angle = self.limb_angle;

        table.set_view(self.view_matrix());
        table.set_world(parts.body, body);
        table.set_world(parts.left_hand.id, limb_matrix(body, &parts.left_hand, angle));
        table.set_world(parts.right_hand.id, limb_matrix(body, &parts.right_hand, -angle));
        table.set_world(parts.left_leg.id, limb_matrix(body, &parts.left_leg, -angle));
        table.set_world(parts.right_leg.id, limb_matrix(body, &parts.right_leg, angle));
    }
}

/// World matrix of a limb swung by `angle` radians about its pivot.
fn limb_matrix(body: Mat4, limb: &Limb, angle: f32) -> Mat4 {
    match limb.pivot {
        Some(pivot) => {
            body * Mat4::from_translation(pivot)
                * Mat4::from_rotation_x(angle)
                * Mat4::from_translation(-pivot)
        }
        None => body,
    }
}
