use crate::memory::ExperienceLog;

/// An episode inside an experience log, `start..=end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeSpan {
    /// Index of the first transition of the episode
    pub start: usize,
    /// Index of the transition that ended the episode
    pub end: usize,
    /// Whether the episode was cut off by the step ceiling
    pub truncated: bool,
}

impl EpisodeSpan {
    /// Number of transitions in the episode
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Result of looking up the episode around a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Located {
    Complete(EpisodeSpan),
    /// The episode has not ended yet; look again once more transitions are logged
    Incomplete,
}

/// Find the episode containing the transition at `i_max`
///
/// The episode starts one past the nearest `done` transition before `i_max` (or at `0` when there
/// is none) and ends at the first `done` transition at or after `i_max`.
///
/// ### Panics
/// If `i_max` is not an index into `log`
pub fn locate_episode<L: ExperienceLog + ?Sized>(log: &L, i_max: usize) -> Located {
    assert!(
        i_max < log.len(),
        "index {i_max} is past the end of a log of length {}",
        log.len()
    );

    let is_done = |i: &usize| log.get(*i).is_some_and(|t| t.done);

    let start = (0..i_max).rev().find(is_done).map_or(0, |i| i + 1);
    let Some(end) = (i_max..log.len()).find(is_done) else {
        return Located::Incomplete;
    };

    let truncated = log.get(end).is_some_and(|t| t.truncated);
    Located::Complete(EpisodeSpan {
        start,
        end,
        truncated,
    })
}
