//! Limb swing waveform
//!
//! A period-2 triangle wave in [-1, 1] and a right inverse for it. The
//! inverse lets an idle rig re-derive a clock value from its current limb
//! angle, so that walking resumes from exactly the angle the limbs are at.

/// Triangle wave with period 2 and range [-1, 1].
///
/// `swing_wave(0.0) == 0.0`, rising to 1 at `t = 0.5` and falling to -1 at
/// `t = 1.5`.
pub fn swing_wave(t: f32) -> f32 {
    let m = 2.0 * ((t + 1.5) / 2.0).fract();
    2.0 * (m - 1.0).abs() - 1.0
}

/// Clock value whose [`swing_wave`] is `angle`, for `angle` in [-1, 1].
///
/// Non-negative angles map into [0.5, 1] (the falling half approaching
/// zero from above), negative angles into (1.5, 2).
pub fn swing_wave_inverse(angle: f32) -> f32 {
    if angle >= 0.0 {
        1.0 - angle / 2.0
    } else {
        2.0 + angle / 2.0
    }
}
