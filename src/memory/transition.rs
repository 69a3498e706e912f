use burn::tensor::{backend::Backend, Bool, Int, Tensor};

use super::Board;
use crate::traits::ToTensor;

/// A single step of the snake environment as stored in replay memory
///
/// Every field describes the environment *after* the action was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Steps taken in the current episode, including this one
    pub step_count: u32,
    /// Index of the action taken
    pub action: u8,
    /// Reward received for the action
    pub reward: f32,
    /// Whether the episode ended with this step, naturally or by truncation
    pub done: bool,
    /// Whether the episode was cut off by the step ceiling rather than ending naturally
    ///
    /// A truncated transition is always `done` as well.
    pub truncated: bool,
    /// Length of the snake after the step; the score being tracked
    pub snake_length: u32,
    /// The board after the step
    pub board: Board,
}

impl Transition {
    /// A mid-episode transition
    pub fn new(step_count: u32, action: u8, reward: f32, snake_length: u32, board: Board) -> Self {
        Self {
            step_count,
            action,
            reward,
            done: false,
            truncated: false,
            snake_length,
            board,
        }
    }

    /// Mark this transition as the natural end of its episode
    pub fn end_episode(mut self) -> Self {
        self.done = true;
        self
    }

    /// Mark this transition as the end of an episode cut off by the step ceiling
    pub fn truncate(mut self) -> Self {
        self.done = true;
        self.truncated = true;
        self
    }
}

/// A zipped batch of [transitions](Transition)
#[derive(Debug, Clone, Default)]
pub struct TransitionBatch {
    pub boards: Vec<Board>,
    pub actions: Vec<u8>,
    pub rewards: Vec<f32>,
    pub dones: Vec<bool>,
}

impl TransitionBatch {
    /// Construct a `TransitionBatch` from an iterator of transition references and a specified batch size
    pub fn from_iter<'a>(
        iter: impl IntoIterator<Item = &'a Transition>,
        batch_size: usize,
    ) -> Self {
        let batch = Self {
            boards: Vec::with_capacity(batch_size),
            actions: Vec::with_capacity(batch_size),
            rewards: Vec::with_capacity(batch_size),
            dones: Vec::with_capacity(batch_size),
        };

        iter.into_iter().fold(batch, |mut b, t| {
            b.boards.push(t.board.clone());
            b.actions.push(t.action);
            b.rewards.push(t.reward);
            b.dones.push(t.done);
            b
        })
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Boards as network input, shape `[n, 1, size, size]`
    pub fn observations<B: Backend>(&self, device: &B::Device) -> Tensor<B, 4> {
        self.boards.as_slice().to_tensor(device)
    }

    /// Action indices, shape `[n, 1]`, ready for `gather` on Q values
    pub fn action_indices<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2, Int> {
        self.actions.clone().to_tensor(device)
    }

    /// Shape `[n]`
    pub fn reward_values<B: Backend>(&self, device: &B::Device) -> Tensor<B, 1> {
        self.rewards.clone().to_tensor(device)
    }

    /// Shape `[n]`
    pub fn done_mask<B: Backend>(&self, device: &B::Device) -> Tensor<B, 1, Bool> {
        self.dones.clone().to_tensor(device)
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    use super::*;
    use crate::memory::Cell;

    fn transitions() -> Vec<Transition> {
        let mut board = Board::new(3);
        board.set(0, 1, Cell::Head);
        vec![
            Transition::new(1, 2, 0.0, 1, board.clone()),
            Transition::new(2, 3, 1.0, 2, board).end_episode(),
        ]
    }

    #[test]
    fn batch_from_iter() {
        let transitions = transitions();
        let batch = TransitionBatch::from_iter(&transitions, 2);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.actions, [2, 3], "actions zipped");
        assert_eq!(batch.rewards, [0.0, 1.0], "rewards zipped");
        assert_eq!(batch.dones, [false, true], "dones zipped");
    }

    #[test]
    fn batch_to_tensors() {
        let device = NdArrayDevice::default();
        let transitions = transitions();
        let batch = TransitionBatch::from_iter(&transitions, 2);

        let observations = batch.observations::<NdArray>(&device);
        assert_eq!(observations.dims(), [2, 1, 3, 3], "channel dim inserted");
        let values = observations.into_data().value;
        assert_eq!(values[1], 2.0, "head encoded");
        assert_eq!(values[0], 0.0, "empty encoded");

        assert_eq!(batch.action_indices::<NdArray>(&device).dims(), [2, 1]);
        assert_eq!(batch.reward_values::<NdArray>(&device).into_data().value, [0.0, 1.0]);
        assert_eq!(
            batch.done_mask::<NdArray>(&device).into_data().value,
            [false, true]
        );
    }

    #[test]
    fn truncation_implies_done() {
        let t = Transition::new(9, 0, 0.0, 3, Board::new(2)).truncate();
        assert!(t.done && t.truncated);
    }
}
