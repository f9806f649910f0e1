//! Simulated prediction session streaming realistic value updates

use std::sync::Arc;

use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use synapse_core::predictions::value_key;
use synapse_core::states::QaFailureType;
use synapse_core::{SdkListener, SessionInfo, SynapseError, SynapseResult};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

/// Resting levels the simulated value stream hovers around
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineLevels {
    pub zone_state: f32,
    pub focus: f32,
    pub enjoyment: f32,
    pub avg_motion: f32,
    pub heart_rate: f32,
}

impl Default for BaselineLevels {
    fn default() -> Self {
        Self {
            zone_state: 0.6,
            focus: 0.55,
            enjoyment: 0.5,
            avg_motion: 0.2,
            heart_rate: 64.0,
        }
    }
}

/// Configuration for a simulated prediction session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Value updates per second
    pub update_rate: f32,
    /// Session length in seconds before the session completes on its own
    pub session_duration: f32,
    /// Seconds between QA checks
    pub qa_interval: f32,
    /// Gaussian jitter applied to the 0..1 values
    pub jitter_std: f32,
    /// Gaussian jitter applied to heart rate, in bpm
    pub heart_rate_jitter: f32,
    pub baselines: BaselineLevels,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            update_rate: 5.0,
            session_duration: 10.0,
            qa_interval: 2.0,
            jitter_std: 0.05,
            heart_rate_jitter: 1.5,
            baselines: BaselineLevels::default(),
            seed: None,
        }
    }
}

/// Commands for controlling a running simulated session
#[derive(Debug, Clone)]
pub enum SimulatorCommand {
    Stop,
}

/// Drives one simulated prediction session against a registered listener
///
/// Mirrors what the real service does while a session runs: periodic
/// value-changed pushes for the well-known keys, interleaved QA checks, and
/// a final session-complete notification.
pub struct SessionSimulator {
    config: SimulationConfig,
    listener: Arc<dyn SdkListener>,
    session: SessionInfo,
    rng: rand::rngs::StdRng,
    value_noise: Normal<f32>,
    heart_noise: Normal<f32>,
    command_receiver: mpsc::Receiver<SimulatorCommand>,
    command_sender: mpsc::Sender<SimulatorCommand>,
}

impl SessionSimulator {
    pub fn new(
        config: SimulationConfig,
        listener: Arc<dyn SdkListener>,
        prediction: &str,
    ) -> SynapseResult<Self> {
        if config.update_rate <= 0.0 {
            return Err(SynapseError::Simulation {
                reason: format!("update rate must be positive, got {}", config.update_rate),
            });
        }
        if config.session_duration <= 0.0 {
            return Err(SynapseError::Simulation {
                reason: "session duration must be positive".to_string(),
            });
        }

        let value_noise = Normal::new(0.0, config.jitter_std).map_err(|e| {
            SynapseError::Simulation { reason: format!("bad value jitter: {}", e) }
        })?;
        let heart_noise = Normal::new(0.0, config.heart_rate_jitter).map_err(|e| {
            SynapseError::Simulation { reason: format!("bad heart rate jitter: {}", e) }
        })?;

        let rng = match config.seed {
            Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
            None => rand::rngs::StdRng::from_entropy(),
        };

        let (command_sender, command_receiver) = mpsc::channel(8);

        Ok(SessionSimulator {
            config,
            listener,
            session: SessionInfo::new(prediction),
            rng,
            value_noise,
            heart_noise,
            command_receiver,
            command_sender,
        })
    }

    /// Identity of the session this simulator drives
    pub fn session(&self) -> &SessionInfo {
        &self.session
    }

    /// Sender for controlling the running simulation
    pub fn control_handle(&self) -> mpsc::Sender<SimulatorCommand> {
        self.command_sender.clone()
    }

    fn bounded_sample(&mut self, baseline: f32) -> f32 {
        (baseline + self.value_noise.sample(&mut self.rng)).clamp(0.0, 1.0)
    }

    /// Run until the configured duration elapses or a stop command arrives
    pub async fn run(mut self) -> SynapseResult<()> {
        let period = Duration::from_secs_f32(1.0 / self.config.update_rate);
        let mut timer = interval(period);
        let mut elapsed = 0.0f32;
        let mut since_qa = 0.0f32;

        tracing::debug!(
            session = %self.session.id,
            prediction = %self.session.prediction,
            "session simulator started"
        );

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    elapsed += period.as_secs_f32();
                    since_qa += period.as_secs_f32();

                    let zone = self.bounded_sample(self.config.baselines.zone_state);
                    let focus = self.bounded_sample(self.config.baselines.focus);
                    let enjoyment = self.bounded_sample(self.config.baselines.enjoyment);
                    let motion = self.bounded_sample(self.config.baselines.avg_motion);
                    let heart_rate =
                        self.config.baselines.heart_rate + self.heart_noise.sample(&mut self.rng);

                    self.listener.on_value_changed(value_key::ZONE_STATE, zone);
                    self.listener.on_value_changed(value_key::FOCUS, focus);
                    self.listener.on_value_changed(value_key::ENJOYMENT, enjoyment);
                    self.listener.on_value_changed(value_key::AVG_MOTION, motion);
                    self.listener.on_value_changed(value_key::HEART_RATE, heart_rate);

                    if since_qa >= self.config.qa_interval {
                        since_qa = 0.0;
                        let passed = motion <= 0.8;
                        let failure_type = if passed {
                            0
                        } else {
                            QaFailureType::MotionTooHigh.code()
                        };
                        self.listener.on_qa_status(passed, failure_type);
                    }

                    if elapsed >= self.config.session_duration {
                        self.listener.on_session_complete();
                        tracing::debug!(session = %self.session.id, "session complete");
                        break;
                    }
                }

                command = self.command_receiver.recv() => {
                    match command {
                        Some(SimulatorCommand::Stop) | None => {
                            self.listener.on_session_complete();
                            tracing::debug!(session = %self.session.id, "session stopped");
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// Spawn a session simulator as a background task
pub fn start_session_simulator(
    config: SimulationConfig,
    listener: Arc<dyn SdkListener>,
    prediction: &str,
) -> SynapseResult<(SessionInfo, mpsc::Sender<SimulatorCommand>)> {
    let simulator = SessionSimulator::new(config, listener, prediction)?;
    let session = simulator.session().clone();
    let control = simulator.control_handle();

    tokio::spawn(async move {
        if let Err(e) = simulator.run().await {
            tracing::error!(error = %e, "session simulator error");
        }
    });

    Ok((session, control))
}
