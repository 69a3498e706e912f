use rand::{seq::IteratorRandom, thread_rng};

use crate::ds::RingBuffer;

use super::{ExperienceLog, Transition, TransitionBatch};

/// A fixed-size memory storage for snake transitions
///
/// This structure uses a ring buffer to store transitions in the order they were collected.
/// It automatically overwrites the oldest transitions once it reaches its capacity, so an index
/// into the memory is only meaningful until the next push.
#[derive(Debug, Clone)]
pub struct ReplayMemory {
    memory: RingBuffer<Transition>,
}

impl ReplayMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            memory: RingBuffer::new(capacity),
        }
    }

    /// Add a new transition to the memory
    pub fn push(&mut self, transition: Transition) {
        self.memory.push(transition);
    }

    /// Add a batch of transitions to the memory, in order
    pub fn extend(&mut self, transitions: impl IntoIterator<Item = Transition>) {
        for transition in transitions {
            self.push(transition);
        }
    }

    pub fn capacity(&self) -> usize {
        self.memory.capacity()
    }

    /// Highest snake length held in memory
    pub fn max_snake_length(&self) -> Option<u32> {
        self.max_by(|t| t.snake_length)
    }

    /// Highest episode step count held in memory
    pub fn max_step_count(&self) -> Option<u32> {
        self.max_by(|t| t.step_count)
    }

    /// Index of the first transition holding the highest snake length
    pub fn argmax_snake_length(&self) -> Option<usize> {
        self.argmax_by(|t| t.snake_length)
    }

    /// Sample a random batch of transitions from the memory
    ///
    /// ### Returns
    /// - `Some(transitions)` if `batch_size` is less than or equal to the memory length
    /// - `None` otherwise
    pub fn sample(&self, batch_size: usize) -> Option<Vec<&Transition>> {
        if batch_size <= self.memory.len() {
            Some(
                self.memory
                    .iter()
                    .choose_multiple(&mut thread_rng(), batch_size),
            )
        } else {
            None
        }
    }

    /// Sample a random batch of transitions from the memory and zip them into column vectors
    ///
    /// ### Returns
    /// - `Some(batch)` if `batch_size` is less than or equal to the memory length
    /// - `None` otherwise
    pub fn sample_zipped(&self, batch_size: usize) -> Option<TransitionBatch> {
        self.sample(batch_size)
            .map(|transitions| TransitionBatch::from_iter(transitions, batch_size))
    }
}

impl ExperienceLog for ReplayMemory {
    fn len(&self) -> usize {
        self.memory.len()
    }

    fn get(&self, index: usize) -> Option<&Transition> {
        self.memory.get(index)
    }
}
