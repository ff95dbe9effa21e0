//! walkabout - mesh segmentation and rig inspection tool
//!
//! Segments object-grouped OBJ meshes into rigid parts, validates scene
//! manifests and drives the walking rig offline.

mod assets;
mod inspect;
mod simulate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use walkabout_rig::{Scene, SceneManifest};

use assets::{FsAssets, RecordingBackend};
use simulate::Hold;

#[derive(Parser)]
#[command(name = "walkabout")]
#[command(about = "Mesh segmentation and rig inspection tool")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a single mesh and list its parts
    Inspect {
        /// Input OBJ file
        mesh: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a scene manifest and every mesh it names
    Check {
        /// Path to the scene manifest
        #[arg(default_value = "scene.toml")]
        manifest: PathBuf,
    },

    /// Drive the rig with held controls and print the final pose
    Simulate {
        /// Path to the scene manifest
        #[arg(default_value = "scene.toml")]
        manifest: PathBuf,

        /// Hold a control for some seconds, e.g. `forward=1.5` (repeatable, played in order)
        #[arg(long = "hold", value_name = "CONTROL=SECONDS")]
        holds: Vec<Hold>,

        /// Idle time after the last hold, in seconds
        #[arg(long, default_value_t = 1.0)]
        settle: f32,

        /// Simulation ticks per second
        #[arg(long, default_value_t = 60.0)]
        tick_rate: f32,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn load_scene(manifest: &Path) -> Result<(Scene, RecordingBackend)> {
    let text = std::fs::read_to_string(manifest)
        .with_context(|| format!("Failed to read manifest: {:?}", manifest))?;
    let parsed = SceneManifest::from_toml_str(&text)
        .with_context(|| format!("Failed to parse manifest: {:?}", manifest))?;

    let root = manifest.parent().unwrap_or(Path::new("."));
    let mut assets = FsAssets::new(root);
    let mut backend = RecordingBackend::new(root);
    let scene = Scene::load(&parsed, &mut assets, &mut backend)
        .with_context(|| format!("Failed to load scene: {:?}", manifest))?;
    Ok((scene, backend))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Inspect { mesh, json } => {
            let report = inspect::inspect_mesh(&mesh)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                inspect::print_report(&mesh, &report);
            }
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking scene {:?}", manifest);
            let (scene, backend) = load_scene(&manifest)?;
            for object in scene.objects() {
                println!(
                    "{}: {} vertices, {} parts",
                    object.name,
                    object.segmentation.mesh.len(),
                    object.segmentation.pivots.len()
                );
            }
            println!(
                "{} parts registered, {} textures, {} vertices uploaded",
                scene.registry().len(),
                backend.textures.len(),
                backend.uploaded_vertices
            );
            match scene.rig() {
                Some(rig) => {
                    let parts = rig.parts();
                    for limb in [
                        parts.left_hand,
                        parts.right_hand,
                        parts.left_leg,
                        parts.right_leg,
                    ] {
                        let name = scene.registry().name_of(limb.id).unwrap_or_default();
                        match limb.pivot {
                            Some(p) => {
                                println!("rig {name}: pivot ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z)
                            }
                            None => println!("rig {name}: no pivot"),
                        }
                    }
                }
                None => println!("no rig"),
            }
            tracing::info!("Scene is valid!");
        }

        Commands::Simulate {
            manifest,
            holds,
            settle,
            tick_rate,
            json,
        } => {
            let (mut scene, _) = load_scene(&manifest)?;
            if scene.rig().is_none() {
                anyhow::bail!("Scene {:?} has no [rig] section", manifest);
            }
            let report = simulate::run(&mut scene, &holds, settle, tick_rate)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                simulate::print_report(&report);
            }
        }
    }

    Ok(())
}
