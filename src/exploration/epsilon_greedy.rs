use rand::{thread_rng, Rng};

use crate::{
    assert_interval,
    decay::{Decay, Linear},
};

use super::Choice;

/// Epsilon greedy exploration policy with an epsilon threshold that decays with collected frames
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
    frames: u64,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self {
            epsilon: decay,
            frames: 0,
        }
    }

    /// Advance the schedule by `frames` collected frames
    pub fn step(&mut self, frames: usize) {
        self.frames += frames as u64;
    }

    /// Frames seen by the schedule so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Current epsilon threshold
    pub fn epsilon(&self) -> f32 {
        self.epsilon.evaluate(self.frames as f32)
    }

    /// Invoke epsilon greedy policy at the current point of the schedule
    pub fn choose(&self) -> Choice {
        if thread_rng().gen::<f32>() >= self.epsilon() {
            Choice::Exploit
        } else {
            Choice::Explore
        }
    }
}

impl EpsilonGreedy<Linear> {
    /// Linearly anneal epsilon from `init` to `end` over `steps` frames
    ///
    /// ### Panics
    /// If either bound is outside `[0, 1]` or `init < end`
    pub fn annealed(init: f32, end: f32, steps: u64) -> Self {
        assert_interval!(init, 0.0, 1.0);
        assert_interval!(end, 0.0, 1.0);
        assert!(
            init >= end,
            "Invalid epsilon bounds [{init}, {end}]: epsilon must not increase"
        );
        let decay = Linear::annealing(init, end, steps.max(1))
            .unwrap_or_else(|e| panic!("Invalid epsilon bounds [{init}, {end}]: {e}"));
        Self::new(decay)
    }
}
