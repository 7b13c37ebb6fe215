//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level orrery configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings handed to the renderer.
    pub window: WindowConfig,
    /// Camera placement and projection.
    pub camera: CameraConfig,
    /// Scene lighting.
    pub lighting: LightingConfig,
    /// Orbit animation and control behavior.
    pub simulation: SimulationConfig,
    /// Background starfield.
    pub starfield: StarfieldConfig,
    /// Texture loading.
    pub assets: AssetsConfig,
    /// HTTP control surface.
    pub control: ControlConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Viewport width in logical pixels.
    pub width: u32,
    /// Viewport height in logical pixels.
    pub height: u32,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Initial camera position in scene units.
    pub position: [f32; 3],
    /// Orbit-controls damping factor, consumed by the renderer.
    pub damping: f32,
}

/// Lighting configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    /// Intensity of the point light placed at the sun.
    pub point_intensity: f32,
    /// Range of the point light in scene units.
    pub point_range: f32,
    /// Intensity of the white ambient light.
    pub ambient_intensity: f32,
}

/// How out-of-range or non-finite speed input is treated.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SpeedPolicy {
    /// Reject non-finite values, clamp finite values into the slider range.
    #[default]
    Clamp,
    /// Reject non-finite values and values outside the slider range.
    Reject,
    /// Apply every value unchanged, NaN included.
    Passthrough,
}

/// When the orbit animation starts advancing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum StartPolicy {
    /// Advance from the first tick, independent of texture loading.
    #[default]
    Immediate,
    /// Hold angles until every texture has loaded.
    AfterPreload,
}

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for initial orbit angles and the starfield. Random when unset.
    pub seed: Option<u64>,
    /// Ticks per second.
    pub tick_rate_hz: u32,
    /// Lower bound of the speed slider (radians per tick).
    pub speed_min: f64,
    /// Upper bound of the speed slider (radians per tick).
    pub speed_max: f64,
    /// Slider step (radians per tick).
    pub speed_step: f64,
    /// Treatment of invalid speed input.
    pub speed_policy: SpeedPolicy,
    /// Whether animation waits for textures.
    pub start_policy: StartPolicy,
    /// Stop after this many ticks. Runs until quit when unset.
    pub max_frames: Option<u64>,
}

/// Starfield configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Number of stars.
    pub count: u32,
    /// Edge length of the cube the stars are scattered in.
    pub extent: f32,
    /// Rendered point size.
    pub point_size: f32,
}

/// Asset configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory holding one texture per body, named after the body.
    pub texture_dir: PathBuf,
    /// Texture file extension.
    pub extension: String,
    /// Number of loader threads.
    pub loader_workers: usize,
    /// Optional RON manifest replacing the built-in planet list.
    pub bodies_manifest: Option<PathBuf>,
}

/// Control server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlConfig {
    /// Start the HTTP control server.
    pub enabled: bool,
    /// Port to bind on localhost (0 lets the OS choose).
    pub port: u16,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Directory for JSON log files in debug builds.
    pub log_dir: Option<PathBuf>,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 20.0, 40.0],
            damping: 0.05,
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            point_intensity: 2.0,
            point_range: 1000.0,
            ambient_intensity: 0.4,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_rate_hz: 60,
            speed_min: 0.0,
            speed_max: 0.05,
            speed_step: 0.001,
            speed_policy: SpeedPolicy::default(),
            start_policy: StartPolicy::default(),
            max_frames: None,
        }
    }
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            extent: 2000.0,
            point_size: 0.7,
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("textures"),
            extension: "jpg".to_string(),
            loader_workers: 4,
            bodies_manifest: None,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 9999,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Platform config directory for the orrery (`<config_dir>/orrery`).
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("orrery"))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
