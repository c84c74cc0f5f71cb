//! Owned contiguous tensor buffer.

use crate::tensor::{lane_range, required_len, TensorView};
use crate::util::{DetPostError, DetPostResult};

/// Owned row-major `f32` tensor.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    data: Vec<f32>,
    shape: Vec<usize>,
}

impl Tensor {
    /// Allocates a zero-filled tensor.
    pub fn zeros(shape: &[usize]) -> DetPostResult<Self> {
        let len = required_len(shape)?;
        Ok(Self {
            data: vec![0.0; len],
            shape: shape.to_vec(),
        })
    }

    /// Wraps an existing buffer; its length must match the shape exactly.
    pub fn from_vec(data: Vec<f32>, shape: Vec<usize>) -> DetPostResult<Self> {
        let needed = required_len(&shape)?;
        if data.len() != needed {
            return Err(DetPostError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Copies a borrowed view into a new owned tensor.
    pub fn from_view(view: TensorView<'_>) -> Self {
        Self {
            data: view.as_slice().to_vec(),
            shape: view.shape().to_vec(),
        }
    }

    /// Returns a borrowed view of the tensor.
    pub fn view(&self) -> TensorView<'_> {
        TensorView {
            data: &self.data,
            shape: &self.shape,
        }
    }

    /// Returns the tensor dimensions, outermost first.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` when any dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the row-major element buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns the row-major element buffer for in-place edits.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Mutable counterpart of [`TensorView::lane`].
    pub fn lane_mut(&mut self, prefix: &[usize]) -> Option<&mut [f32]> {
        let range = lane_range(&self.shape, prefix)?;
        self.data.get_mut(range)
    }

    /// Consumes the tensor and returns its buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}
