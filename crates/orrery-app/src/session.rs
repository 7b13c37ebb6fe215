//! One running orrery: simulation, scene, texture loader and published snapshot.

use std::sync::{Arc, Mutex};

use orrery_config::Config;
use orrery_control::SharedSnapshot;
use orrery_sim::{
    AssetError, ControlSender, LoadTarget, LogIndicator, SimulationContext, TextureLoadResult,
    TextureLoader, TextureSource,
};
use orrery_space::{BodyRegistry, Scene};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::setup;

pub struct Session {
    ctx: SimulationContext,
    scene: Scene,
    loader: TextureLoader,
    snapshot: SharedSnapshot,
    max_frames: Option<u64>,
}

impl Session {
    /// Build the scene and simulation for `registry` and queue every texture
    /// load on a background pool reading from `source`.
    pub fn new(
        config: &Config,
        registry: BodyRegistry,
        seed: u64,
        source: Arc<dyn TextureSource>,
    ) -> Result<Self, AssetError> {
        let scene = setup::build_scene(config, &registry, seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let ctx = SimulationContext::new(
            registry,
            &config.simulation,
            &mut rng,
            Box::new(LogIndicator),
        );

        let loader = TextureLoader::new(config.assets.loader_workers, source)?;
        for (index, body) in ctx.registry().iter().enumerate() {
            loader.request(LoadTarget::Body(index), body.texture_key());
        }
        loader.request(LoadTarget::Sun, &scene.sun.texture);

        let snapshot = Arc::new(Mutex::new(ctx.snapshot()));
        Ok(Self {
            ctx,
            scene,
            loader,
            snapshot,
            max_frames: config.simulation.max_frames,
        })
    }

    /// Returns a handle for queueing control events.
    pub fn sender(&self) -> ControlSender {
        self.ctx.sender()
    }

    /// Returns the snapshot published after every step.
    pub fn snapshot(&self) -> SharedSnapshot {
        Arc::clone(&self.snapshot)
    }

    /// Returns the scene the orbits are written into.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns the simulation state.
    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    /// Fold in finished texture loads, run one simulation tick and publish
    /// the resulting snapshot.
    pub fn step(&mut self) {
        if self.is_finished() {
            return;
        }
        for loaded in self.loader.drain_results() {
            self.apply_load(loaded);
        }
        self.ctx.tick(&mut self.scene);
        self.publish();
    }

    /// Apply a reloaded config's simulation settings and republish the
    /// slider descriptions.
    pub fn reconfigure(&mut self, config: &Config) {
        self.ctx.reconfigure(&config.simulation);
        self.max_frames = config.simulation.max_frames;
        self.publish();
    }

    fn publish(&self) {
        match self.snapshot.lock() {
            Ok(mut shared) => *shared = self.ctx.snapshot(),
            Err(_) => warn!("Snapshot lock poisoned, control API will serve stale state"),
        }
    }

    fn apply_load(&mut self, loaded: TextureLoadResult) {
        let TextureLoadResult {
            target,
            key,
            result,
        } = loaded;
        match target {
            LoadTarget::Body(index) => {
                self.ctx.record_load(index, &key, &result);
                if result.is_ok() {
                    let attached = self.scene.attach_texture(&key);
                    debug!("Texture '{key}' attached to {attached} bodies");
                }
            }
            LoadTarget::Sun => match result {
                Ok(texture) => info!(
                    "Sun texture '{key}' loaded ({}x{})",
                    texture.width, texture.height
                ),
                Err(e) => warn!("Sun texture unavailable: {e}"),
            },
        }
    }

    /// Quit was requested or the frame limit was reached.
    pub fn is_finished(&self) -> bool {
        self.ctx.quit_requested()
            || self
                .max_frames
                .is_some_and(|max| self.ctx.tick_count() >= max)
    }
}
