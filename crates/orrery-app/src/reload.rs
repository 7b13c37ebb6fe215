//! Hot-reload of `config.ron` while the orrery runs.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use orrery_config::{CliArgs, Config};
use tracing::warn;

/// How often the config file is re-read.
pub const CONFIG_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Watches the config directory and yields the effective config (file plus
/// CLI overrides) whenever the file changes.
pub struct ConfigWatcher {
    dir: PathBuf,
    on_disk: Config,
    args: CliArgs,
    interval: Duration,
    last_check: Instant,
}

impl ConfigWatcher {
    /// `on_disk` is the config as loaded from `dir`, before CLI overrides.
    pub fn new(dir: PathBuf, on_disk: Config, args: CliArgs, interval: Duration) -> Self {
        Self {
            dir,
            on_disk,
            args,
            interval,
            last_check: Instant::now(),
        }
    }

    /// Re-read the file if the poll interval has elapsed.
    pub fn poll(&mut self) -> Option<Config> {
        if self.last_check.elapsed() < self.interval {
            return None;
        }
        self.check_now()
    }

    /// Re-read the file now. Returns the new effective config if it changed.
    /// A file that fails to read or parse is skipped and the current config kept.
    pub fn check_now(&mut self) -> Option<Config> {
        self.last_check = Instant::now();
        match self.on_disk.reload(&self.dir) {
            Ok(Some(updated)) => {
                let mut effective = updated.clone();
                effective.apply_cli_overrides(&self.args);
                self.on_disk = updated;
                Some(effective)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Keeping current config: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watcher(dir: &std::path::Path, args: CliArgs, interval: Duration) -> ConfigWatcher {
        let config = Config::load_or_create(dir).unwrap();
        ConfigWatcher::new(dir.to_path_buf(), config, args, interval)
    }

    #[test]
    fn test_change_is_picked_up_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = watcher(dir.path(), CliArgs::default(), Duration::ZERO);
        assert!(w.poll().is_none());

        let mut edited = Config::default();
        edited.simulation.speed_max = 0.1;
        edited.save(dir.path()).unwrap();

        let reloaded = w.poll().unwrap();
        assert_eq!(reloaded.simulation.speed_max, 0.1);
        assert!(w.poll().is_none());
    }

    #[test]
    fn test_cli_overrides_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs {
            seed: Some(9),
            tick_rate: Some(30),
            ..Default::default()
        };
        let mut w = watcher(dir.path(), args, Duration::ZERO);

        let mut edited = Config::default();
        edited.simulation.speed_policy = orrery_config::SpeedPolicy::Reject;
        edited.save(dir.path()).unwrap();

        let reloaded = w.check_now().unwrap();
        assert_eq!(reloaded.simulation.seed, Some(9));
        assert_eq!(reloaded.simulation.tick_rate_hz, 30);
        assert_eq!(
            reloaded.simulation.speed_policy,
            orrery_config::SpeedPolicy::Reject
        );
    }

    #[test]
    fn test_poll_waits_for_interval() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = watcher(dir.path(), CliArgs::default(), Duration::from_secs(3600));

        let mut edited = Config::default();
        edited.simulation.speed_min = 0.01;
        edited.save(dir.path()).unwrap();

        assert!(w.poll().is_none());
        assert_eq!(w.check_now().unwrap().simulation.speed_min, 0.01);
    }

    #[test]
    fn test_broken_file_keeps_current_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = watcher(dir.path(), CliArgs::default(), Duration::ZERO);
        std::fs::write(dir.path().join("config.ron"), "(simulation: (").unwrap();
        assert!(w.check_now().is_none());

        let mut edited = Config::default();
        edited.simulation.speed_max = 0.2;
        edited.save(dir.path()).unwrap();
        assert_eq!(w.check_now().unwrap().simulation.speed_max, 0.2);
    }
}
