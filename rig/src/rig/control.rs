//! Discrete rig controls

use std::str::FromStr;

/// The six logical inputs of the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
}

impl Control {
    pub const ALL: [Control; 6] = [
        Control::Forward,
        Control::Backward,
        Control::StrafeLeft,
        Control::StrafeRight,
        Control::TurnLeft,
        Control::TurnRight,
    ];

    /// Config/script name of the control
    pub fn name(self) -> &'static str {
        match self {
            Control::Forward => "forward",
            Control::Backward => "backward",
            Control::StrafeLeft => "strafe_left",
            Control::StrafeRight => "strafe_right",
            Control::TurnLeft => "turn_left",
            Control::TurnRight => "turn_right",
        }
    }
}

impl std::fmt::Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized control name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown control '{0}' (expected forward, backward, strafe_left, strafe_right, turn_left or turn_right)")]
pub struct UnknownControl(pub String);

impl FromStr for Control {
    type Err = UnknownControl;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Control::ALL
            .into_iter()
            .find(|control| control.name() == s)
            .ok_or_else(|| UnknownControl(s.to_string()))
    }
}

/// Pressed state of every control.
///
/// Setting a flag is idempotent, so repeated key-down events from
/// auto-repeat have no effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ControlState {
    pressed: [bool; 6],
}

impl ControlState {
    pub fn set(&mut self, control: Control, pressed: bool) {
        self.pressed[control as usize] = pressed;
    }

    pub fn is_pressed(&self, control: Control) -> bool {
        self.pressed[control as usize]
    }

    fn axis(&self, positive: Control, negative: Control) -> f32 {
        self.is_pressed(positive) as i32 as f32 - self.is_pressed(negative) as i32 as f32
    }

    /// Net forward velocity in {-1, 0, 1}
    pub fn forward(&self) -> f32 {
        self.axis(Control::Forward, Control::Backward)
    }

    /// Net rightward velocity in {-1, 0, 1}
    pub fn lateral(&self) -> f32 {
        self.axis(Control::StrafeRight, Control::StrafeLeft)
    }

    /// Net clockwise (rightward) turn rate in {-1, 0, 1}
    pub fn turn(&self) -> f32 {
        self.axis(Control::TurnRight, Control::TurnLeft)
    }
}
