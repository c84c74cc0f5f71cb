//! Conversions between tensors and `image` crate buffers.
//!
//! Available when the `image-io` feature is enabled. The numeric core never
//! depends on this module; it only exists to feed pre-processing and to
//! visualize inputs.

use crate::tensor::{Tensor, TensorView};
use crate::util::{DetPostError, DetPostResult};
use image::{GrayImage, ImageBuffer, Luma, Pixel, Rgb, RgbImage};
use std::path::Path;

/// An external image type that can be exchanged with `[H, W, C]` tensors.
///
/// Pixel values stay in the `0..=255` range; conversion back to the image
/// rounds and clamps each element.
pub trait ExternalImage: Sized {
    /// Converts the image into an `[H, W, C]` tensor.
    fn to_tensor(&self) -> DetPostResult<Tensor>;

    /// Builds an image from an `[H, W, C]` or `[1, H, W, C]` tensor.
    fn from_tensor(view: TensorView<'_>) -> DetPostResult<Self>;
}

fn buffer_to_tensor<P>(img: &ImageBuffer<P, Vec<u8>>) -> DetPostResult<Tensor>
where
    P: Pixel<Subpixel = u8>,
{
    let width = img.width() as usize;
    let height = img.height() as usize;
    let channels = usize::from(P::CHANNEL_COUNT);
    let data = img.as_raw().iter().map(|&v| f32::from(v)).collect();
    Tensor::from_vec(data, vec![height, width, channels])
}

fn tensor_to_buffer<P>(view: TensorView<'_>) -> DetPostResult<ImageBuffer<P, Vec<u8>>>
where
    P: Pixel<Subpixel = u8>,
{
    let channels = usize::from(P::CHANNEL_COUNT);
    let (height, width) = match view.shape() {
        [h, w, c] | [1, h, w, c] if *c == channels => (*h, *w),
        shape => {
            return Err(DetPostError::InvalidShape {
                shape: shape.to_vec(),
                reason: "channel count does not match the pixel type",
            })
        }
    };
    let to_u32 = |v: usize| {
        u32::try_from(v).map_err(|_| DetPostError::InvalidDimensions { width, height })
    };
    let (w, h) = (to_u32(width)?, to_u32(height)?);

    let raw: Vec<u8> = view
        .as_slice()
        .iter()
        .map(|&v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    ImageBuffer::from_raw(w, h, raw).ok_or(DetPostError::ImageIo {
        reason: "buffer does not match image dimensions".to_string(),
    })
}

impl ExternalImage for RgbImage {
    fn to_tensor(&self) -> DetPostResult<Tensor> {
        buffer_to_tensor::<Rgb<u8>>(self)
    }

    fn from_tensor(view: TensorView<'_>) -> DetPostResult<Self> {
        tensor_to_buffer::<Rgb<u8>>(view)
    }
}

impl ExternalImage for GrayImage {
    fn to_tensor(&self) -> DetPostResult<Tensor> {
        buffer_to_tensor::<Luma<u8>>(self)
    }

    fn from_tensor(view: TensorView<'_>) -> DetPostResult<Self> {
        tensor_to_buffer::<Luma<u8>>(view)
    }
}

/// Loads an image from disk into an `[H, W, 3]` tensor.
pub fn load_rgb_tensor<P: AsRef<Path>>(path: P) -> DetPostResult<Tensor> {
    let img = image::open(path).map_err(|err| DetPostError::ImageIo {
        reason: err.to_string(),
    })?;
    img.to_rgb8().to_tensor()
}
