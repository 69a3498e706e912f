//! The training loop: collect, remember, record milestones, optimize, log

use anyhow::Result;

use crate::{
    decay::Linear,
    exploration::EpsilonGreedy,
    memory::{Transition, TransitionBatch},
};

mod trainer;

pub use trainer::{IterationReport, TrainState, TrainSummary, Trainer};

/// How a [`Collector`] should act while gathering the next batch
#[derive(Debug, Clone, Copy)]
pub enum Policy<'a> {
    /// Uniformly random actions, used until enough initial frames are collected
    Random,
    /// The agent's greedy policy mixed with exploration
    Explore(&'a EpsilonGreedy<Linear>),
}

/// Steps the environment and hands over batches of transitions
pub trait Collector {
    /// Collect the next batch of `frames` transitions acting with `policy`
    ///
    /// **Returns** `None` once the collector is exhausted
    fn collect(&mut self, frames: usize, policy: Policy<'_>) -> Result<Option<Vec<Transition>>>;
}

/// Owns the value network and its optimizer
pub trait Learner {
    /// Perform one optimizer pass on a sampled batch
    ///
    /// **Returns** the loss
    fn optimize(&mut self, batch: TransitionBatch) -> Result<f32>;

    /// Soft update the target network towards the policy network
    fn update_target(&mut self);
}
