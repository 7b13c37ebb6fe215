//! Configuration system for the orrery.
//!
//! Settings persist to disk as RON files and can be overridden from the
//! command line. Unknown fields are ignored and missing fields fall back to
//! defaults, so older config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AssetsConfig, CameraConfig, Config, ControlConfig, DebugConfig, LightingConfig,
    SimulationConfig, SpeedPolicy, StarfieldConfig, StartPolicy, WindowConfig, default_config_dir,
};
pub use error::ConfigError;
