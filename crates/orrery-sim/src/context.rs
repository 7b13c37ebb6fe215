//! The simulation context: all mutable orbit state for one session, passed
//! explicitly to the tick and to control handling.

use rand::Rng;
use tracing::{debug, info, trace, warn};

use orrery_config::{SimulationConfig, SpeedPolicy, StartPolicy};
use orrery_space::{BodyRegistry, PositionSink};

use crate::control::{
    ControlError, ControlEvent, ControlOutcome, ControlQueue, ControlSender, SliderDescriptor,
    SliderRange,
};
use crate::driver;
use crate::orbit::{self, OrbitState};
use crate::playback::PlaybackState;
use crate::preload::{GateStatus, LoadingIndicator, PreloadGate};
use crate::snapshot::{BodySnapshot, PreloadPhase, SimulationSnapshot};

pub struct SimulationContext {
    registry: BodyRegistry,
    states: Vec<OrbitState>,
    playback: PlaybackState,
    controls: ControlQueue,
    gate: PreloadGate,
    slider: SliderRange,
    speed_policy: SpeedPolicy,
    start_policy: StartPolicy,
    tick_count: u64,
    quit_requested: bool,
}

impl SimulationContext {
    /// Initialize one orbit per registered body and open a preload gate
    /// over their textures.
    pub fn new<R: Rng>(
        registry: BodyRegistry,
        config: &SimulationConfig,
        rng: &mut R,
        indicator: Box<dyn LoadingIndicator>,
    ) -> Self {
        let states = orbit::initialize(registry.bodies(), rng);
        let gate = PreloadGate::new(registry.len(), indicator);
        Self {
            registry,
            states,
            playback: PlaybackState::default(),
            controls: ControlQueue::new(),
            gate,
            slider: SliderRange::from_config(config),
            speed_policy: config.speed_policy,
            start_policy: config.start_policy,
            tick_count: 0,
            quit_requested: false,
        }
    }

    /// Handle for delivering control events from other threads.
    pub fn sender(&self) -> ControlSender {
        self.controls.sender()
    }

    /// Apply one control event immediately.
    pub fn apply(&mut self, event: ControlEvent) -> ControlOutcome {
        let outcome = match event {
            ControlEvent::SetSpeed { body, value } => self.set_speed(&body, value),
            ControlEvent::TogglePause => ControlOutcome::PauseToggled {
                paused: self.playback.toggle(),
            },
            ControlEvent::Quit => {
                self.quit_requested = true;
                ControlOutcome::QuitRequested
            }
        };
        match &outcome {
            ControlOutcome::Rejected(e) => warn!("Control input rejected: {e}"),
            other => debug!("Control applied: {other:?}"),
        }
        outcome
    }

    fn set_speed(&mut self, body: &str, value: f64) -> ControlOutcome {
        let Some(index) = self.registry.index_of(body) else {
            return ControlOutcome::Rejected(ControlError::UnknownBody(body.to_string()));
        };
        match self.slider.validate(value, self.speed_policy) {
            Ok(speed) => {
                self.states[index].set_speed(speed);
                ControlOutcome::SpeedSet { index, speed }
            }
            Err(e) => ControlOutcome::Rejected(e),
        }
    }

    /// Adopt new slider bounds and input policies. Stored speeds are kept;
    /// the new rules apply to the next control event.
    pub fn reconfigure(&mut self, config: &SimulationConfig) {
        self.slider = SliderRange::from_config(config);
        self.speed_policy = config.speed_policy;
        self.start_policy = config.start_policy;
        info!(
            "Simulation reconfigured: speed range [{}, {}], policy {:?}",
            self.slider.min, self.slider.max, self.speed_policy
        );
    }

    /// Record a finished texture load for body `index`.
    pub fn record_load<T, E: std::fmt::Display>(
        &mut self,
        index: usize,
        key: &str,
        outcome: &Result<T, E>,
    ) -> &GateStatus {
        self.gate.record(index, key, outcome)
    }

    /// Whether animation is held back waiting for textures.
    pub fn is_holding(&self) -> bool {
        self.start_policy == StartPolicy::AfterPreload && !self.gate.is_ready()
    }

    /// One tick: apply queued control events, advance orbits (unless paused
    /// or held), and place every body in `sink`.
    pub fn tick(&mut self, sink: &mut impl PositionSink) -> Vec<ControlOutcome> {
        let outcomes: Vec<ControlOutcome> = self
            .controls
            .drain()
            .into_iter()
            .map(|event| self.apply(event))
            .collect();

        if self.is_holding() {
            driver::emit_positions(&self.states, sink);
        } else {
            driver::advance(&mut self.states, &self.playback, sink);
        }
        self.tick_count += 1;
        trace!(tick = self.tick_count, paused = self.playback.paused, "tick");
        outcomes
    }

    /// Returns the registry the orbits were built from.
    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    /// Returns every orbit state, in registry order.
    pub fn states(&self) -> &[OrbitState] {
        &self.states
    }

    /// Returns the global pause state.
    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    /// Returns the texture preload gate.
    pub fn gate(&self) -> &PreloadGate {
        &self.gate
    }

    /// Returns the number of ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Returns true once a quit event has been applied.
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Current slider positions, one per body.
    pub fn sliders(&self) -> Vec<SliderDescriptor> {
        self.registry
            .iter()
            .zip(&self.states)
            .map(|(body, state)| SliderDescriptor {
                body: body.name.clone(),
                min: self.slider.min,
                max: self.slider.max,
                step: self.slider.step,
                value: state.angular_speed,
            })
            .collect()
    }

    /// Serializable view of the session.
    pub fn snapshot(&self) -> SimulationSnapshot {
        let preload = match self.gate.status() {
            GateStatus::Pending { remaining } => PreloadPhase::Pending {
                remaining: *remaining,
            },
            GateStatus::Ready => PreloadPhase::Ready,
            GateStatus::Failed { key, reason } => PreloadPhase::Failed {
                key: key.clone(),
                reason: reason.clone(),
            },
        };
        let bodies = self
            .registry
            .iter()
            .zip(&self.states)
            .map(|(body, state)| BodySnapshot {
                name: body.name.clone(),
                angle: state.angle,
                speed: state.angular_speed,
                position: state.position().to_array(),
            })
            .collect();

        SimulationSnapshot {
            tick: self.tick_count,
            paused: self.playback.paused,
            pause_label: self.playback.label().to_string(),
            holding: self.is_holding(),
            preload,
            bodies,
            sliders: self.sliders(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preload::LogIndicator;
    use glam::DVec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[derive(Default)]
    struct Recorder {
        last: Vec<DVec3>,
    }

    impl PositionSink for Recorder {
        fn place(&mut self, index: usize, position: DVec3) {
            if self.last.len() <= index {
                self.last.resize(index + 1, DVec3::ZERO);
            }
            self.last[index] = position;
        }
    }

    fn context_with(config: SimulationConfig) -> SimulationContext {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        SimulationContext::new(
            BodyRegistry::solar_system(),
            &config,
            &mut rng,
            Box::new(LogIndicator),
        )
    }

    fn context() -> SimulationContext {
        context_with(SimulationConfig::default())
    }

    fn earth_angle(ctx: &SimulationContext) -> f64 {
        ctx.states()[2].angle
    }

    #[test]
    fn test_tick_advances_every_body() {
        let mut ctx = context();
        let before: Vec<f64> = ctx.states().iter().map(|s| s.angle).collect();
        let mut sink = Recorder::default();
        ctx.tick(&mut sink);

        assert_eq!(ctx.tick_count(), 1);
        assert_eq!(sink.last.len(), 8);
        for (state, a0) in ctx.states().iter().zip(before) {
            assert!((state.angle - (a0 + state.angular_speed)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_queued_speed_change_visible_to_next_tick() {
        let mut ctx = context();
        let sender = ctx.sender();
        let mut sink = Recorder::default();
        ctx.tick(&mut sink);
        let before = earth_angle(&ctx);

        assert!(sender.set_speed("Earth", 0.03));
        // Queued, not yet applied.
        assert_eq!(ctx.states()[2].angular_speed, 0.01);

        let outcomes = ctx.tick(&mut sink);
        assert_eq!(
            outcomes,
            vec![ControlOutcome::SpeedSet {
                index: 2,
                speed: 0.03
            }]
        );
        assert!((earth_angle(&ctx) - (before + 0.03)).abs() < 1e-12);
    }

    #[test]
    fn test_last_write_wins() {
        let mut ctx = context();
        let sender = ctx.sender();
        sender.set_speed("Mars", 0.02);
        sender.set_speed("Mars", 0.04);
        ctx.tick(&mut Recorder::default());
        assert_eq!(ctx.states()[3].angular_speed, 0.04);
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let mut ctx = context();
        let sender = ctx.sender();
        let mut sink = Recorder::default();

        sender.toggle_pause();
        ctx.tick(&mut sink);
        let frozen = earth_angle(&ctx);
        for _ in 0..20 {
            ctx.tick(&mut sink);
        }
        assert_eq!(earth_angle(&ctx), frozen);
        assert_eq!(ctx.snapshot().pause_label, "Resume");

        sender.toggle_pause();
        ctx.tick(&mut sink);
        assert!((earth_angle(&ctx) - (frozen + 0.01)).abs() < 1e-12);
    }

    #[test]
    fn test_double_toggle_between_ticks_is_noop() {
        let mut ctx = context();
        let sender = ctx.sender();
        sender.toggle_pause();
        sender.toggle_pause();
        ctx.tick(&mut Recorder::default());
        assert!(!ctx.playback().paused);
    }

    #[test]
    fn test_zero_speed_is_stationary() {
        let mut ctx = context();
        ctx.apply(ControlEvent::SetSpeed {
            body: "Venus".to_string(),
            value: 0.0,
        });
        let angle = ctx.states()[1].angle;
        for _ in 0..50 {
            ctx.tick(&mut Recorder::default());
        }
        assert_eq!(ctx.states()[1].angle, angle);
    }

    #[test]
    fn test_unknown_body_rejected() {
        let mut ctx = context();
        let outcome = ctx.apply(ControlEvent::SetSpeed {
            body: "Pluto".to_string(),
            value: 0.01,
        });
        assert_eq!(
            outcome,
            ControlOutcome::Rejected(ControlError::UnknownBody("Pluto".to_string()))
        );
    }

    #[test]
    fn test_nan_rejected_under_default_policy() {
        let mut ctx = context();
        let outcome = ctx.apply(ControlEvent::SetSpeed {
            body: "Earth".to_string(),
            value: f64::NAN,
        });
        assert!(matches!(
            outcome,
            ControlOutcome::Rejected(ControlError::NonFinite(_))
        ));
        ctx.tick(&mut Recorder::default());
        assert!(earth_angle(&ctx).is_finite());
    }

    #[test]
    fn test_out_of_range_clamped_under_default_policy() {
        let mut ctx = context();
        let outcome = ctx.apply(ControlEvent::SetSpeed {
            body: "Earth".to_string(),
            value: 1.0,
        });
        assert_eq!(
            outcome,
            ControlOutcome::SpeedSet {
                index: 2,
                speed: 0.05
            }
        );
    }

    #[test]
    fn test_passthrough_policy_reproduces_nan_freeze() {
        let mut ctx = context_with(SimulationConfig {
            speed_policy: SpeedPolicy::Passthrough,
            ..Default::default()
        });
        ctx.apply(ControlEvent::SetSpeed {
            body: "Earth".to_string(),
            value: f64::NAN,
        });
        let mut sink = Recorder::default();
        for _ in 0..3 {
            ctx.tick(&mut sink);
        }
        assert!(earth_angle(&ctx).is_nan());
        assert!(sink.last[2].x.is_nan());
        // Other bodies keep moving.
        assert!(ctx.states()[0].angle.is_finite());
    }

    #[test]
    fn test_quit_event() {
        let mut ctx = context();
        ctx.sender().send(ControlEvent::Quit);
        assert!(!ctx.quit_requested());
        ctx.tick(&mut Recorder::default());
        assert!(ctx.quit_requested());
    }

    #[test]
    fn test_immediate_start_animates_before_textures() {
        let mut ctx = context();
        assert!(!ctx.gate().is_ready());
        assert!(!ctx.is_holding());
        let before = earth_angle(&ctx);
        ctx.tick(&mut Recorder::default());
        assert!(earth_angle(&ctx) > before);
    }

    #[test]
    fn test_after_preload_holds_until_ready() {
        let mut ctx = context_with(SimulationConfig {
            start_policy: StartPolicy::AfterPreload,
            ..Default::default()
        });
        let mut sink = Recorder::default();
        let before = earth_angle(&ctx);
        ctx.tick(&mut sink);
        assert!(ctx.is_holding());
        assert_eq!(earth_angle(&ctx), before);
        // Positions are still emitted while held.
        assert_eq!(sink.last.len(), 8);

        let names: Vec<String> = ctx.registry().iter().map(|b| b.name.clone()).collect();
        for (i, name) in names.iter().enumerate() {
            ctx.record_load(i, name, &Ok::<(), String>(()));
        }
        assert!(!ctx.is_holding());
        ctx.tick(&mut sink);
        assert!((earth_angle(&ctx) - (before + 0.01)).abs() < 1e-12);
    }

    #[test]
    fn test_after_preload_failure_holds_forever() {
        let mut ctx = context_with(SimulationConfig {
            start_policy: StartPolicy::AfterPreload,
            ..Default::default()
        });
        ctx.record_load(0, "Mercury", &Err::<(), _>("decode error"));
        assert!(ctx.gate().has_failed());
        let before = earth_angle(&ctx);
        for _ in 0..10 {
            ctx.tick(&mut Recorder::default());
        }
        assert!(ctx.is_holding());
        assert_eq!(earth_angle(&ctx), before);
    }

    #[test]
    fn test_reconfigure_changes_slider_and_policy() {
        let mut ctx = context();
        ctx.reconfigure(&SimulationConfig {
            speed_max: 0.1,
            speed_policy: SpeedPolicy::Reject,
            ..Default::default()
        });
        assert_eq!(ctx.sliders()[0].max, 0.1);

        let outcome = ctx.apply(ControlEvent::SetSpeed {
            body: "Earth".to_string(),
            value: 0.08,
        });
        assert_eq!(
            outcome,
            ControlOutcome::SpeedSet {
                index: 2,
                speed: 0.08
            }
        );
        let outcome = ctx.apply(ControlEvent::SetSpeed {
            body: "Earth".to_string(),
            value: 0.2,
        });
        assert!(matches!(
            outcome,
            ControlOutcome::Rejected(ControlError::OutOfRange { .. })
        ));
        assert_eq!(ctx.states()[2].angular_speed, 0.08);
    }

    #[test]
    fn test_snapshot_reports_state() {
        let mut ctx = context();
        ctx.record_load(0, "Mercury", &Ok::<(), String>(()));
        ctx.tick(&mut Recorder::default());
        let snapshot = ctx.snapshot();

        assert_eq!(snapshot.tick, 1);
        assert!(!snapshot.paused);
        assert_eq!(snapshot.pause_label, "Pause");
        assert_eq!(snapshot.preload, PreloadPhase::Pending { remaining: 7 });
        assert_eq!(snapshot.bodies.len(), 8);
        assert_eq!(snapshot.bodies[2].name, "Earth");
        assert_eq!(snapshot.sliders[2].value, 0.01);
        assert_eq!(snapshot.sliders[2].max, 0.05);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["bodies"][2]["name"], "Earth");
        assert_eq!(json["preload"]["Pending"]["remaining"], 7);
    }
}
