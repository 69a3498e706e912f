use burn::tensor::{backend::Backend, BasicOps, Bool, Data, Float, Int, Shape, Tensor};

use crate::memory::Board;

/// A trait for converting items to tensors
///
/// Implemented for the column vectors of a [`TransitionBatch`](crate::memory::TransitionBatch)
/// to convert batches of transitions to tensors of dimension `D`
pub trait ToTensor<B: Backend, const D: usize, K: BasicOps<B>> {
    fn to_tensor(self, device: &B::Device) -> Tensor<B, D, K>;
}

impl<B: Backend> ToTensor<B, 1, Float> for Vec<f32> {
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 1> {
        let len = self.len();
        Tensor::from_floats(Data::new(self, Shape::new([len])), device)
    }
}

impl<B: Backend> ToTensor<B, 2, Int> for Vec<u8> {
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 2, Int> {
        let len = self.len();
        let ints = self.into_iter().map(i32::from).collect::<Vec<_>>();
        Tensor::<B, 1, Int>::from_ints(Data::new(ints, Shape::new([len])), device).unsqueeze_dim(1)
    }
}

impl<B: Backend> ToTensor<B, 1, Bool> for Vec<bool> {
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 1, Bool> {
        let len = self.len();
        Tensor::from_bool(Data::new(self, Shape::new([len])), device)
    }
}

impl<B: Backend> ToTensor<B, 4, Float> for &[Board] {
    /// Stacks boards into `[n, 1, size, size]`
    ///
    /// ### Panics
    /// If the boards differ in size
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 4> {
        let size = self.first().map_or(0, Board::size);
        assert!(
            self.iter().all(|b| b.size() == size),
            "cannot stack boards of different sizes"
        );
        let values = self.iter().flat_map(|b| b.encode()).collect::<Vec<_>>();
        Tensor::from_floats(
            Data::new(values, Shape::new([self.len(), 1, size, size])),
            device,
        )
    }
}
