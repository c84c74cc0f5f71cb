//! Tensor views and owned tensor buffers.
//!
//! `TensorView` is a borrowed N-dimensional view into a contiguous row-major
//! `f32` buffer. Elements are addressed by index tuples rather than raw
//! offsets; `lane` returns the contiguous run that starts at a partially
//! specified index, which is how per-cell channel vectors and per-record rows
//! are read without pointer arithmetic.

use crate::util::{DetPostError, DetPostResult};
use std::ops::Range;

#[cfg(feature = "image-io")]
pub mod io;
mod owned;
pub mod preprocess;

pub use owned::Tensor;

/// Borrowed tensor view over a contiguous row-major buffer.
#[derive(Copy, Clone, Debug)]
pub struct TensorView<'a> {
    data: &'a [f32],
    shape: &'a [usize],
}

impl<'a> TensorView<'a> {
    /// Creates a view, checking that `data` holds exactly `shape`'s elements.
    pub fn from_slice(data: &'a [f32], shape: &'a [usize]) -> DetPostResult<Self> {
        let needed = required_len(shape)?;
        if data.len() != needed {
            return Err(DetPostError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Returns the tensor shape.
    pub fn shape(&self) -> &'a [usize] {
        self.shape
    }

    /// Returns the number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total element count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the tensor holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the backing slice.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns the flat offset of a (possibly partial) index.
    ///
    /// Missing trailing coordinates are treated as zero.
    pub fn offset(&self, index: &[usize]) -> Option<usize> {
        offset_of(self.shape, index)
    }

    /// Returns the element at a full index if it is within bounds.
    pub fn get(&self, index: &[usize]) -> Option<&'a f32> {
        if index.len() != self.shape.len() {
            return None;
        }
        self.data.get(self.offset(index)?)
    }

    /// Returns the contiguous run addressed by `prefix`.
    ///
    /// For a `[1, H, W, C]` tensor, `lane(&[0, y, x])` is the `C` channel
    /// values of cell `(y, x)`.
    pub fn lane(&self, prefix: &[usize]) -> Option<&'a [f32]> {
        self.data.get(lane_range(self.shape, prefix)?)
    }
}

pub(crate) fn required_len(shape: &[usize]) -> DetPostResult<usize> {
    if shape.is_empty() {
        return Err(DetPostError::InvalidShape {
            shape: shape.to_vec(),
            reason: "rank must be at least 1",
        });
    }
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| DetPostError::InvalidShape {
            shape: shape.to_vec(),
            reason: "element count overflows",
        })
}

fn offset_of(shape: &[usize], index: &[usize]) -> Option<usize> {
    if index.len() > shape.len() {
        return None;
    }
    let mut offset = 0usize;
    for (axis, &dim) in shape.iter().enumerate() {
        let i = index.get(axis).copied().unwrap_or(0);
        if i >= dim {
            return None;
        }
        offset = offset.checked_mul(dim)?.checked_add(i)?;
    }
    Some(offset)
}

fn lane_range(shape: &[usize], prefix: &[usize]) -> Option<Range<usize>> {
    let start = offset_of(shape, prefix)?;
    let run: usize = shape[prefix.len()..].iter().product();
    Some(start..start.checked_add(run)?)
}
