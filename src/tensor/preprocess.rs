//! Image pre-processing on `HWC` tensors.
//!
//! Inputs are `[H, W, C]` or `[1, H, W, C]`; outputs keep the input rank.
//! Resizing is nearest-neighbour with source index
//! `floor(dst * src_dim / dst_dim)`, which keeps it deterministic and free of
//! interpolation filters.

use crate::tensor::{Tensor, TensorView};
use crate::util::{DetPostError, DetPostResult};

struct HwcDims {
    batched: bool,
    height: usize,
    width: usize,
    channels: usize,
}

fn hwc_dims(view: TensorView<'_>) -> DetPostResult<HwcDims> {
    let shape = view.shape();
    let (batched, dims) = match shape {
        [h, w, c] => (false, (*h, *w, *c)),
        [1, h, w, c] => (true, (*h, *w, *c)),
        [_, _, _, _] => {
            return Err(DetPostError::BatchSize { batch: shape[0] });
        }
        _ => {
            return Err(DetPostError::InvalidShape {
                shape: shape.to_vec(),
                reason: "expected HWC or NHWC layout",
            })
        }
    };
    let (height, width, channels) = dims;
    if height == 0 || width == 0 || channels == 0 {
        return Err(DetPostError::InvalidShape {
            shape: shape.to_vec(),
            reason: "zero-sized image",
        });
    }
    Ok(HwcDims {
        batched,
        height,
        width,
        channels,
    })
}

fn output_shape(batched: bool, height: usize, width: usize, channels: usize) -> Vec<usize> {
    if batched {
        vec![1, height, width, channels]
    } else {
        vec![height, width, channels]
    }
}

/// Resizes an image tensor to `width` x `height` with nearest-neighbour sampling.
pub fn resize_nearest(
    view: TensorView<'_>,
    width: usize,
    height: usize,
) -> DetPostResult<Tensor> {
    if width == 0 || height == 0 {
        return Err(DetPostError::InvalidDimensions { width, height });
    }
    let dims = hwc_dims(view)?;
    let src = view.as_slice();
    let c = dims.channels;

    let len = width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(c))
        .ok_or(DetPostError::InvalidDimensions { width, height })?;
    let mut dst = Vec::with_capacity(len);

    for y in 0..height {
        let sy = y * dims.height / height;
        for x in 0..width {
            let sx = x * dims.width / width;
            let start = (sy * dims.width + sx) * c;
            dst.extend_from_slice(&src[start..start + c]);
        }
    }

    Tensor::from_vec(dst, output_shape(dims.batched, height, width, c))
}

/// Scales every element by `1/255`.
pub fn divide_by_255(view: TensorView<'_>) -> Tensor {
    let data = view.as_slice().iter().map(|&v| v / 255.0).collect();
    Tensor::from_vec(data, view.shape().to_vec()).expect("shape copied from a valid view")
}

/// Standardizes a tensor to zero mean and unit variance.
///
/// The standard deviation is floored at `1/sqrt(N)` so uniform images do not
/// divide by zero. Sums are accumulated in `f64`.
pub fn per_image_standardization(view: TensorView<'_>) -> DetPostResult<Tensor> {
    let data = view.as_slice();
    if data.is_empty() {
        return Err(DetPostError::InvalidShape {
            shape: view.shape().to_vec(),
            reason: "cannot standardize an empty tensor",
        });
    }

    let n = data.len() as f64;
    let (sum, sum2) = data.iter().fold((0.0f64, 0.0f64), |(s, s2), &v| {
        let v = f64::from(v);
        (s + v, s2 + v * v)
    });
    let mean = sum / n;
    let var = (sum2 / n - mean * mean).max(0.0);
    let adjusted_sd = var.sqrt().max(1.0 / n.sqrt());

    let out = data
        .iter()
        .map(|&v| ((f64::from(v) - mean) / adjusted_sd) as f32)
        .collect();
    Tensor::from_vec(out, view.shape().to_vec())
}
