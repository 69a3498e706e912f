//! Detecting new best scores and recording the episodes that produced them

mod locator;
mod recorder;
mod tracker;

pub use locator::{locate_episode, EpisodeSpan, Located};
pub use recorder::{MilestoneRecorder, RecordOutcome};
pub use tracker::MetricTracker;
