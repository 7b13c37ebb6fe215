//! Orrery: an animated model of the solar system.
//!
//! Loads configuration, builds the planets and scene, starts the texture
//! loader and the HTTP control API, then ticks the simulation at a fixed
//! rate until asked to quit.
//!
//! Run with: `cargo run -p orrery-app -- --seed 42`

mod reload;
mod session;
mod setup;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use orrery_config::{CliArgs, Config, default_config_dir};
use orrery_control::{ControlServer, ControlServerError};
use orrery_sim::{AssetError, FileTextureSource, FrameClock};
use orrery_space::RegistryError;
use tracing::{error, info};

use crate::reload::{CONFIG_POLL_INTERVAL, ConfigWatcher};
use crate::session::Session;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("failed to load bodies: {0}")]
    Registry(#[from] RegistryError),
    #[error("failed to start texture loader: {0}")]
    Assets(#[from] AssetError),
    #[error("failed to start control server: {0}")]
    Control(#[from] ControlServerError),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let (config, watcher) = load_config(&args);

    orrery_log::init_logging(
        config.debug.log_dir.as_deref(),
        cfg!(debug_assertions),
        Some(&config),
    );

    match run(&config, watcher) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Config from disk (or defaults) with CLI overrides applied, plus a watcher
/// for the config file when one was loaded.
fn load_config(args: &CliArgs) -> (Config, Option<ConfigWatcher>) {
    let config_dir = match &args.config {
        Some(dir) => Ok(dir.clone()),
        None => default_config_dir(),
    };
    // Logging is not up yet, so problems go to stderr.
    let loaded = config_dir.and_then(|dir| Config::load_or_create(&dir).map(|c| (dir, c)));
    let (mut config, watcher) = match loaded {
        Ok((dir, config)) => {
            let watcher =
                ConfigWatcher::new(dir, config.clone(), args.clone(), CONFIG_POLL_INTERVAL);
            (config, Some(watcher))
        }
        Err(e) => {
            eprintln!("Using default config: {e}");
            (Config::default(), None)
        }
    };
    config.apply_cli_overrides(args);
    (config, watcher)
}

fn run(config: &Config, mut watcher: Option<ConfigWatcher>) -> Result<(), AppError> {
    let registry = setup::build_registry(config)?;
    let seed = setup::resolve_seed(config);
    info!("Orrery starting: {} bodies, seed {seed}", registry.len());

    let source = FileTextureSource::new(&config.assets.texture_dir, &config.assets.extension);
    info!("Textures from {}", source.dir().display());
    let mut session = Session::new(config, registry, seed, Arc::new(source))?;

    let mut server = None;
    if config.control.enabled {
        let mut control = ControlServer::new(orrery_control::port_from_env(config.control.port));
        control.start(session.snapshot(), session.sender())?;
        server = Some(control);
    } else {
        info!("Control server disabled");
    }

    let mut clock = FrameClock::new(config.simulation.tick_rate_hz);
    while !session.is_finished() {
        if let Some(w) = watcher.as_mut()
            && let Some(updated) = w.poll()
        {
            session.reconfigure(&updated);
        }
        clock.tick(|_| session.step());
        std::thread::sleep(clock.time_until_next_tick());
    }

    if session.context().quit_requested() {
        info!("Quit requested after {} ticks", session.context().tick_count());
    } else {
        info!("Frame limit reached after {} ticks", session.context().tick_count());
    }
    if let Some(mut control) = server {
        control.stop();
    }
    Ok(())
}
