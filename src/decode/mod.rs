//! Decoding of raw YOLOv2-style grid activations.
//!
//! Each anchor slot of a grid cell packs `num_classes` class logits followed
//! by objectness, x offset, y offset, width log-scale and height log-scale.
//! Decoded boxes stay in normalized grid coordinates; mapping them back to
//! source image pixels is left to the caller.

use crate::geometry::BBox;
use crate::util::math::{sigmoid, softmax};
use crate::util::{DetPostError, DetPostResult};

mod format;
#[cfg(feature = "rayon")]
pub mod rayon;

pub use format::{format_yolo_v2, FormatParams};

/// Number of box values that follow the class logits in each anchor slot.
pub const BOX_FIELDS: usize = 5;

/// Prior box size shared by one anchor slot across all cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    /// Prior width in grid cells.
    pub width: f32,
    /// Prior height in grid cells.
    pub height: f32,
}

impl Anchor {
    /// Creates an anchor from its width and height in grid cells.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<(f32, f32)> for Anchor {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

/// Location of a cell within the output grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    /// Number of cell rows in the grid.
    pub num_rows: usize,
    /// Number of cell columns in the grid.
    pub num_cols: usize,
}

/// One anchor slot decoded into a box and per-class scores.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedBox {
    pub bbox: BBox,
    /// `class_probability[c] * objectness` for each class `c`.
    pub scores: Vec<f32>,
}

/// Decodes one anchor slot of raw predictions.
///
/// `predictions` must hold the `num_classes + 5` values of a single anchor;
/// the class count is inferred from its length.
pub fn decode_anchor(
    predictions: &[f32],
    anchor: Anchor,
    cell: GridCell,
) -> DetPostResult<DecodedBox> {
    if predictions.len() <= BOX_FIELDS {
        return Err(DetPostError::InvalidShape {
            shape: vec![predictions.len()],
            reason: "anchor slot must hold at least one class logit and 5 box values",
        });
    }
    let num_classes = predictions.len() - BOX_FIELDS;
    let (logits, raw_box) = predictions.split_at(num_classes);

    let probs = softmax(logits);
    let conf = sigmoid(raw_box[0]);
    let tx = sigmoid(raw_box[1]);
    let ty = sigmoid(raw_box[2]);
    let tw = raw_box[3];
    let th = raw_box[4];

    let num_cell_y = cell.num_rows as f32;
    let num_cell_x = cell.num_cols as f32;

    // Offsets are added to the cell origin as-is, not scaled by the cell size.
    let cy = ty + cell.row as f32 / num_cell_y;
    let cx = tx + cell.col as f32 / num_cell_x;
    let h = th.exp() * anchor.height / num_cell_y;
    let w = tw.exp() * anchor.width / num_cell_x;

    let scores = probs.into_iter().map(|p| p * conf).collect();
    Ok(DecodedBox {
        bbox: BBox::from_center(cx, cy, w, h),
        scores,
    })
}
