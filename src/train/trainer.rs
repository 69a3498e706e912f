use std::time::{Duration, Instant};

use anyhow::Result;

use super::{Collector, Learner, Policy};
use crate::{
    config::TrainConfig,
    decay::Linear,
    exploration::EpsilonGreedy,
    logger::ExperimentLogger,
    memory::{ExperienceLog, ReplayMemory, Transition},
    milestone::{MetricTracker, MilestoneRecorder, RecordOutcome},
    render::Renderer,
};

/// Mutable state of a training run, threaded explicitly through the loop
#[derive(Debug, Clone, Default)]
pub struct TrainState {
    /// Best recorded score
    pub tracker: MetricTracker,
    /// Best score seen in replay memory, recorded or not
    pub best_score: u32,
    /// Frames collected
    pub total_count: u64,
    /// Episodes finished
    pub total_episodes: u64,
    /// Collector iterations completed
    pub iteration: u64,
}

/// What happened during one collector iteration
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    /// Highest snake length in replay memory
    pub max_score: u32,
    /// Highest episode step count in replay memory
    pub max_steps: u32,
    /// Outcome of a milestone recording attempt, if one was made and did not fail
    pub milestone: Option<RecordOutcome>,
    /// Loss of the last optimizer pass, if the learner ran
    pub loss: Option<f32>,
}

/// Totals at the end of [`Trainer::run`]
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSummary {
    pub total_count: u64,
    pub total_episodes: u64,
    pub iterations: u64,
    pub best_score: u32,
    pub elapsed: Duration,
    /// Whether the target score was reached
    pub solved: bool,
}

/// Drives training of a snake agent
///
/// ### Generics
/// - `R`: The [`Renderer`] used to record milestone episodes
/// - `G`: The [`ExperimentLogger`] receiving scalars and hyperparameters
pub struct Trainer<R: Renderer, G: ExperimentLogger> {
    config: TrainConfig,
    memory: ReplayMemory,
    exploration: EpsilonGreedy<Linear>,
    recorder: MilestoneRecorder<R>,
    logger: G,
    state: TrainState,
}

impl<R: Renderer, G: ExperimentLogger> Trainer<R, G> {
    /// Initialize a new `Trainer`
    ///
    /// Fails if `config` does not [validate](TrainConfig::validate).
    pub fn new(config: TrainConfig, renderer: R, logger: G) -> Result<Self> {
        config.validate()?;

        let recorder = MilestoneRecorder::new(renderer, &config.output_dir, &config.exp_name)
            .with_max_episode_steps(config.max_episode_steps);
        let exploration = EpsilonGreedy::annealed(
            config.epsilon_init(),
            config.epsilon_end(),
            config.annealing_steps(),
        );

        Ok(Self {
            memory: ReplayMemory::new(config.buffer_length),
            exploration,
            recorder,
            logger,
            state: TrainState {
                tracker: MetricTracker::new(config.min_milestone_score),
                ..Default::default()
            },
            config,
        })
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn state(&self) -> &TrainState {
        &self.state
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    pub fn exploration(&self) -> &EpsilonGreedy<Linear> {
        &self.exploration
    }

    pub fn logger(&self) -> &G {
        &self.logger
    }

    /// Policy the collector should follow for the next batch
    pub fn policy(&self) -> Policy<'_> {
        if self.state.total_count < self.config.init_rand_steps as u64 {
            Policy::Random
        } else {
            Policy::Explore(&self.exploration)
        }
    }

    /// Process one batch from the collector
    pub fn step<L: Learner>(
        &mut self,
        batch: Vec<Transition>,
        learner: &mut L,
    ) -> Result<IterationReport> {
        let frames = batch.len();
        self.state.total_count += frames as u64;
        self.state.total_episodes += batch.iter().filter(|t| t.done).count() as u64;
        self.memory.extend(batch);

        let max_score = self.memory.max_snake_length().unwrap_or_default();
        let max_steps = self.memory.max_step_count().unwrap_or_default();
        self.state.best_score = self.state.best_score.max(max_score);

        let milestone = if self.state.tracker.is_milestone(max_score) {
            self.record_milestone(max_score)
        } else {
            None
        };

        let mut loss = None;
        let ready = self.memory.len() > self.config.init_rand_steps;
        if ready && self.memory.len() < self.config.batch_size {
            log::debug!(
                "iteration {}: skipping optimization, replay memory holds {} of {} transitions for a batch",
                self.state.iteration,
                self.memory.len(),
                self.config.batch_size
            );
        } else if ready {
            for _ in 0..self.config.optim_steps {
                let Some(sample) = self.memory.sample_zipped(self.config.batch_size) else {
                    break;
                };
                loss = Some(learner.optimize(sample)?);
                self.exploration.step(frames);
                learner.update_target();
            }
            if let Some(loss) = loss {
                log::debug!("iteration {}: loss {loss:.5}", self.state.iteration);
            }
        }

        if self.state.iteration % self.config.log_interval == 0 {
            self.log_scalars(max_score, max_steps)?;
        }
        self.state.iteration += 1;

        Ok(IterationReport {
            max_score,
            max_steps,
            milestone,
            loss,
        })
    }

    /// Train until the collector is exhausted or the target score is reached
    pub fn run<C: Collector, L: Learner>(
        &mut self,
        collector: &mut C,
        learner: &mut L,
    ) -> Result<TrainSummary> {
        self.logger.log_hparams(&self.config.hparams()?)?;

        let t0 = Instant::now();
        let mut solved = false;
        loop {
            let policy = self.policy();
            let Some(batch) = collector.collect(self.config.steps_per_batch, policy)? else {
                break;
            };
            let report = self.step(batch, learner)?;
            if report.max_score >= self.config.target_score {
                solved = true;
                break;
            }
        }
        let elapsed = t0.elapsed();

        let TrainState {
            best_score,
            total_count,
            total_episodes,
            iteration,
            ..
        } = self.state;
        if solved {
            log::info!(
                "solved after {total_count} steps, {total_episodes} episodes and in {:.1}s",
                elapsed.as_secs_f64()
            );
        } else {
            log::info!(
                "collector exhausted after {total_count} steps and {total_episodes} episodes; best score {best_score}"
            );
        }

        Ok(TrainSummary {
            total_count,
            total_episodes,
            iterations: iteration,
            best_score,
            elapsed,
            solved,
        })
    }

    fn record_milestone(&mut self, score: u32) -> Option<RecordOutcome> {
        let i_max = self.memory.argmax_snake_length()?;
        match self
            .recorder
            .record(&mut self.state.tracker, &self.memory, i_max)
        {
            Ok(outcome) => {
                if let RecordOutcome::Recorded { path, .. } = &outcome {
                    log::info!(
                        "New max of {score}; rb = {}/{}; eps = {:.4}; recorded to {}",
                        self.memory.len(),
                        self.memory.capacity(),
                        self.exploration.epsilon(),
                        path.display()
                    );
                }
                Some(outcome)
            }
            Err(e) => {
                log::error!("failed to record milestone {score}: {e:#}");
                None
            }
        }
    }

    fn log_scalars(&mut self, max_score: u32, max_steps: u32) -> Result<()> {
        let step = self.state.total_count;
        let scalars = [
            ("max_score", max_score as f64),
            ("max_steps", max_steps as f64),
            ("total_count", self.state.total_count as f64),
            ("total_episodes", self.state.total_episodes as f64),
            ("epsilon", self.exploration.epsilon() as f64),
        ];
        for (name, value) in scalars {
            self.logger.log_scalar(name, value, step)?;
        }
        Ok(())
    }
}
