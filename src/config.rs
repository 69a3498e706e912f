use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::Value;

/// Train a DQN agent to play snake
#[derive(Debug, Clone, Parser, Serialize)]
#[command(version, about)]
pub struct TrainConfig {
    /// Name of the experiment; outputs are written under `<output-dir>/<exp-name>`
    pub exp_name: String,

    /// Stores the run locally with the option to sync it to a tracker after the fact
    #[arg(long, short = 'o')]
    pub offline: bool,

    /// Tags to add to the experiment
    #[arg(long, short = 't', num_args = 0..)]
    pub tags: Vec<String>,

    /// Discount factor to use in the return/value function calculations
    #[arg(long, short = 'g', default_value_t = 0.99)]
    pub gamma: f32,

    /// Playable board size
    #[arg(long, short = 's', default_value_t = 5)]
    pub board_size: usize,

    /// Maximum steps allowed in an episode before it is truncated
    #[arg(long, short = 'm', default_value_t = 5000)]
    pub max_episode_steps: u32,

    /// The learning rate to use in the Adam optimizer
    #[arg(long, short = 'L', default_value_t = 0.002)]
    pub adam_learning_rate: f64,

    /// Kernel sizes to use in the two CNN layers
    #[arg(long, short = 'k', num_args = 2, default_values_t = [3, 2])]
    pub kernel_sizes: Vec<usize>,

    /// Capacity of the replay memory
    #[arg(long, short = 'l', default_value_t = 1_000_000)]
    pub buffer_length: usize,

    /// Start and end values of epsilon for epsilon-greedy exploration, high value first
    #[arg(long, short = 'e', num_args = 2, default_values_t = [0.7, 0.0])]
    pub epsilon_bounds: Vec<f32>,

    /// How many random steps should be taken before engaging the exploration policy
    #[arg(long, short = 'r', default_value_t = 5000)]
    pub init_rand_steps: usize,

    /// How many steps to take in each batch from the data collector
    #[arg(long, short = 'b', default_value_t = 100)]
    pub steps_per_batch: usize,

    /// How many optimizer passes to make for each collected batch
    #[arg(long, short = 'S', default_value_t = 10)]
    pub optim_steps: usize,

    /// Transitions sampled from replay memory per optimizer pass
    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    /// Root directory for logs and recordings
    #[arg(long, default_value = "./output")]
    pub output_dir: PathBuf,

    /// Scores at or below this are never recorded as milestones
    #[arg(long, default_value_t = 5)]
    pub min_milestone_score: u32,

    /// Stop training once this snake length is reached
    #[arg(long, default_value_t = 100)]
    pub target_score: u32,

    /// Log scalars every this many collector iterations
    #[arg(long, default_value_t = 10)]
    pub log_interval: u64,
}

impl TrainConfig {
    /// Default configuration for the experiment `exp_name`
    pub fn new(exp_name: &str) -> Self {
        Self::parse_from(["rlsnakes", "--", exp_name])
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.exp_name.is_empty(), "experiment name must not be empty");
        ensure!(
            self.gamma > 0.0 && self.gamma <= 1.0,
            "gamma must be in (0, 1], got {}",
            self.gamma
        );
        ensure!(self.board_size > 0, "board size must be positive");
        ensure!(self.buffer_length > 0, "buffer length must be positive");
        ensure!(self.steps_per_batch > 0, "steps per batch must be positive");
        ensure!(self.optim_steps > 0, "optim steps must be positive");
        ensure!(self.batch_size > 0, "batch size must be positive");
        ensure!(self.log_interval > 0, "log interval must be positive");
        ensure!(
            self.kernel_sizes.len() == 2 && self.kernel_sizes.iter().all(|&k| k > 0),
            "expected two positive kernel sizes, got {:?}",
            self.kernel_sizes
        );

        let &[high, low] = self.epsilon_bounds.as_slice() else {
            anyhow::bail!(
                "expected two epsilon bounds, got {:?}",
                self.epsilon_bounds
            );
        };
        ensure!(
            (0.0..=1.0).contains(&high) && (0.0..=1.0).contains(&low),
            "epsilon bounds must be in [0, 1], got [{high}, {low}]"
        );
        ensure!(
            high >= low,
            "pass the high (starting) epsilon first, got [{high}, {low}]"
        );
        Ok(())
    }

    /// Starting epsilon
    pub fn epsilon_init(&self) -> f32 {
        self.epsilon_bounds.first().copied().unwrap_or(1.0)
    }

    /// Final epsilon
    pub fn epsilon_end(&self) -> f32 {
        self.epsilon_bounds.get(1).copied().unwrap_or(0.0)
    }

    /// Frames over which epsilon is annealed
    pub fn annealing_steps(&self) -> u64 {
        (self.buffer_length * self.optim_steps) as u64
    }

    /// The configuration as a JSON object, for experiment logging
    pub fn hparams(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
