mod base;
mod board;
mod transition;

use std::ops::RangeInclusive;

pub use base::ReplayMemory;
pub use board::{Board, Cell};
pub use transition::{Transition, TransitionBatch};

/// An ordered record of environment transitions, indexed by insertion order
///
/// Index `0` is the oldest transition still held. Indices are only stable until the log is
/// appended to again, since a bounded log evicts its oldest records.
pub trait ExperienceLog {
    /// Number of transitions held
    fn len(&self) -> usize;

    /// The transition at `index`, if held
    fn get(&self, index: usize) -> Option<&Transition>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum of `key` over the log
    fn max_by<K: Ord>(&self, key: impl Fn(&Transition) -> K) -> Option<K> {
        (0..self.len()).filter_map(|i| self.get(i)).map(key).max()
    }

    /// Index of the first transition maximizing `key`
    fn argmax_by<K: Ord>(&self, key: impl Fn(&Transition) -> K) -> Option<usize> {
        let mut best: Option<(usize, K)> = None;
        for (i, t) in (0..self.len()).filter_map(|i| self.get(i).map(|t| (i, t))) {
            let k = key(t);
            if best.as_ref().map_or(true, |(_, b)| k > *b) {
                best = Some((i, k));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Owned copy of the transitions in `range`
    ///
    /// ### Panics
    /// If the range extends past the end of the log
    fn extract(&self, range: RangeInclusive<usize>) -> Vec<Transition> {
        range
            .map(|i| {
                self.get(i).cloned().unwrap_or_else(|| {
                    panic!("index {i} is past the end of a log of length {}", self.len())
                })
            })
            .collect()
    }
}

impl ExperienceLog for [Transition] {
    fn len(&self) -> usize {
        <[Transition]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&Transition> {
        <[Transition]>::get(self, index)
    }
}
