//! Command-line argument parsing for the orrery.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "orrery", about = "Animated solar-system orrery")]
pub struct CliArgs {
    /// Seed for initial orbit angles and the starfield.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Ticks per second.
    #[arg(long)]
    pub tick_rate: Option<u32>,

    /// Stop after this many ticks.
    #[arg(long)]
    pub frames: Option<u64>,

    /// Directory containing body textures.
    #[arg(long)]
    pub textures: Option<PathBuf>,

    /// RON manifest replacing the built-in planet list.
    #[arg(long)]
    pub bodies: Option<PathBuf>,

    /// Control server port.
    #[arg(long)]
    pub port: Option<u16>,

    /// Disable the control server.
    #[arg(long)]
    pub no_control: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.simulation.seed = Some(seed);
        }
        if let Some(rate) = args.tick_rate {
            self.simulation.tick_rate_hz = rate;
        }
        if let Some(frames) = args.frames {
            self.simulation.max_frames = Some(frames);
        }
        if let Some(ref dir) = args.textures {
            self.assets.texture_dir = dir.clone();
        }
        if let Some(ref manifest) = args.bodies {
            self.assets.bodies_manifest = Some(manifest.clone());
        }
        if let Some(port) = args.port {
            self.control.port = port;
        }
        if args.no_control {
            self.control.enabled = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
