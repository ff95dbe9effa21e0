//! `walkabout simulate`: drive the rig with a scripted input sequence

use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use walkabout_rig::{Control, Rig, Scene};

/// One scripted step: hold `control` for `seconds`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hold {
    pub control: Control,
    pub seconds: f32,
}

impl FromStr for Hold {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((control, seconds)) = s.split_once('=') else {
            bail!("expected CONTROL=SECONDS, got '{}'", s);
        };
        let control = control.trim().parse::<Control>()?;
        let seconds: f32 = seconds
            .trim()
            .parse()
            .with_context(|| format!("invalid duration in '{}'", s))?;
        if !seconds.is_finite() || seconds < 0.0 {
            bail!("duration must be a non-negative number of seconds, got '{}'", s);
        }
        Ok(Self { control, seconds })
    }
}

#[derive(Debug, Serialize)]
pub struct PartPose {
    pub name: String,
    pub id: u32,
    /// Row-major world matrix as stored in the transform table
    pub world: [[f32; 4]; 4],
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub ticks: u64,
    pub elapsed: f32,
    pub position: [f32; 2],
    pub heading: f32,
    pub limb_angle: f32,
    pub parts: Vec<PartPose>,
}

fn ticks_for(seconds: f32, tick_rate: f32) -> u64 {
    (seconds * tick_rate).round() as u64
}

fn rig_mut(scene: &mut Scene) -> Result<&mut Rig> {
    scene.rig_mut().context("scene has no rig")
}

/// Update the rig and compose a frame `count` times
fn advance(scene: &mut Scene, count: u64, dt: f32) -> Result<()> {
    for _ in 0..count {
        rig_mut(scene)?.update(dt);
        scene.compose_frame(1.0);
    }
    Ok(())
}

/// Play `holds` in order, then idle for `settle` seconds, composing a frame
/// every tick.
pub fn run(
    scene: &mut Scene,
    holds: &[Hold],
    settle: f32,
    tick_rate: f32,
) -> Result<SimulationReport> {
    if !tick_rate.is_finite() || tick_rate <= 0.0 {
        bail!("tick rate must be positive, got {}", tick_rate);
    }
    if !settle.is_finite() || settle < 0.0 {
        bail!("settle time must be non-negative, got {}", settle);
    }
    let dt = 1.0 / tick_rate;
    let mut ticks = 0u64;

    for hold in holds {
        tracing::debug!("holding {} for {}s", hold.control, hold.seconds);
        let count = ticks_for(hold.seconds, tick_rate);
        rig_mut(scene)?.apply_input(hold.control, true);
        advance(scene, count, dt)?;
        rig_mut(scene)?.apply_input(hold.control, false);
        ticks += count;
    }
    let count = ticks_for(settle, tick_rate);
    advance(scene, count, dt)?;
    ticks += count;
    // Make sure the table reflects the final pose even with no ticks
    scene.compose_frame(1.0);

    let rig = scene.rig().context("scene has no rig")?;
    let table = scene.transform_table();
    let rig_parts = rig.parts();
    let parts = [
        rig_parts.body,
        rig_parts.left_hand.id,
        rig_parts.right_hand.id,
        rig_parts.left_leg.id,
        rig_parts.right_leg.id,
    ]
    .into_iter()
    .map(|id| PartPose {
        name: scene.registry().name_of(id).unwrap_or_default().to_string(),
        id: id.raw(),
        world: table.slots()[id.index()].to_cols_array_2d(),
    })
    .collect();

    Ok(SimulationReport {
        ticks,
        elapsed: rig.elapsed(),
        position: rig.position().to_array(),
        heading: rig.heading(),
        limb_angle: rig.limb_angle(),
        parts,
    })
}

pub fn print_report(report: &SimulationReport) {
    println!("{} ticks, {:.3}s simulated", report.ticks, report.elapsed);
    println!(
        "position ({:.4}, {:.4})  heading {:.4}  limb angle {:.4}",
        report.position[0], report.position[1], report.heading, report.limb_angle
    );
    for part in &report.parts {
        println!("  #{:<3} {}", part.id, part.name);
        for row in &part.world {
            println!(
                "       [{:>9.4} {:>9.4} {:>9.4} {:>9.4}]",
                row[0], row[1], row[2], row[3]
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hold() {
        let hold: Hold = "forward=1.5".parse().unwrap();
        assert_eq!(
            hold,
            Hold {
                control: Control::Forward,
                seconds: 1.5
            }
        );
        let hold: Hold = " turn_left = 0 ".parse().unwrap();
        assert_eq!(hold.control, Control::TurnLeft);
    }

    #[test]
    fn test_parse_hold_errors() {
        assert!("forward".parse::<Hold>().is_err());
        assert!("jump=1".parse::<Hold>().is_err());
        assert!("forward=soon".parse::<Hold>().is_err());
        assert!("forward=-1".parse::<Hold>().is_err());
    }

    #[test]
    fn test_ticks_round_to_nearest() {
        assert_eq!(ticks_for(1.0, 60.0), 60);
        assert_eq!(ticks_for(0.5, 30.0), 15);
        assert_eq!(ticks_for(0.0, 60.0), 0);
    }
}
