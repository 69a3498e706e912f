//! Milestone recording and training-loop plumbing for a Snake DQN agent

/// Training configuration
pub mod config;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Data structures
pub mod ds;

/// Exploration policies
pub mod exploration;

/// Experiment logging
pub mod logger;

/// Experience replay
pub mod memory;

/// Detecting new best scores and recording the episodes that reached them
pub mod milestone;

/// Terminal recordings of trajectories
pub mod render;

/// The training loop and its collector and learner seams
pub mod train;

/// Conversions to tensors
pub mod traits;

mod util;
