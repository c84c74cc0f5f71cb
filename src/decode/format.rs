//! Conversion of a full YOLOv2 output tensor into detection records.

use crate::candidate::{Detection, Detections};
use crate::decode::{decode_anchor, Anchor, GridCell, BOX_FIELDS};
use crate::tensor::TensorView;
use crate::trace::{trace_event, trace_span};
use crate::util::{DetPostError, DetPostResult};

/// Parameters describing how the detector packs its output channels.
#[derive(Clone, Debug, PartialEq)]
pub struct FormatParams {
    /// Anchor priors, one per box slot.
    pub anchors: Vec<Anchor>,
    /// Declared number of box slots per cell; must equal `anchors.len()`.
    pub boxes_per_cell: usize,
    /// Number of class logits per box slot.
    pub num_classes: usize,
}

/// Validated grid dimensions of a detection tensor.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GridLayout {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
}

impl GridLayout {
    pub(crate) fn from_view(view: TensorView<'_>, params: &FormatParams) -> DetPostResult<Self> {
        let shape = view.shape();
        let &[batch, rows, cols, channels] = shape else {
            return Err(DetPostError::InvalidShape {
                shape: shape.to_vec(),
                reason: "detection tensor must be NHWC",
            });
        };
        if batch != 1 {
            return Err(DetPostError::BatchSize { batch });
        }
        if rows == 0 || cols == 0 {
            return Err(DetPostError::InvalidShape {
                shape: shape.to_vec(),
                reason: "empty grid",
            });
        }
        let anchors = params.anchors.len();
        if anchors == 0 {
            return Err(DetPostError::InvalidConfig("at least one anchor is required"));
        }
        if anchors != params.boxes_per_cell {
            return Err(DetPostError::AnchorCountMismatch {
                anchors,
                boxes_per_cell: params.boxes_per_cell,
            });
        }
        if params.num_classes == 0 {
            return Err(DetPostError::InvalidConfig("num_classes must be at least 1"));
        }
        let per_anchor = params.num_classes + BOX_FIELDS;
        if channels != anchors * per_anchor {
            return Err(DetPostError::ChannelMismatch {
                channels,
                anchors,
                per_anchor,
            });
        }
        Ok(Self { rows, cols })
    }

    pub(crate) fn num_records(&self, params: &FormatParams) -> usize {
        self.rows * self.cols * params.anchors.len() * params.num_classes
    }
}

/// Decodes every cell of grid row `row`, in column then anchor then class order.
pub(crate) fn decode_row(
    view: TensorView<'_>,
    layout: GridLayout,
    params: &FormatParams,
    row: usize,
) -> DetPostResult<Vec<Detection>> {
    let per_anchor = params.num_classes + BOX_FIELDS;
    let mut out = Vec::with_capacity(layout.cols * params.anchors.len() * params.num_classes);

    for col in 0..layout.cols {
        let channels = view
            .lane(&[0, row, col])
            .ok_or(DetPostError::InvalidShape {
                shape: view.shape().to_vec(),
                reason: "cell index out of bounds",
            })?;
        let cell = GridCell {
            row,
            col,
            num_rows: layout.rows,
            num_cols: layout.cols,
        };
        for (slot, &anchor) in channels.chunks_exact(per_anchor).zip(params.anchors.iter()) {
            let decoded = decode_anchor(slot, anchor, cell)?;
            for (class_id, &score) in decoded.scores.iter().enumerate() {
                out.push(Detection {
                    bbox: decoded.bbox,
                    class_id,
                    score,
                });
            }
        }
    }

    Ok(out)
}

/// Decodes a `[1, rows, cols, anchors * (num_classes + 5)]` tensor.
///
/// Produces `rows * cols * anchors * num_classes` records, one per
/// cell/anchor/class, ordered by row, column, anchor and class. All records
/// start out active with their decoded score.
pub fn format_yolo_v2(view: TensorView<'_>, params: &FormatParams) -> DetPostResult<Detections> {
    let layout = GridLayout::from_view(view, params)?;
    let _span = trace_span!(
        "format_yolo_v2",
        rows = layout.rows,
        cols = layout.cols,
        anchors = params.anchors.len()
    )
    .entered();

    let mut records = Vec::with_capacity(layout.num_records(params));
    for row in 0..layout.rows {
        records.extend(decode_row(view, layout, params, row)?);
    }

    trace_event!("decoded", count = records.len());
    Ok(Detections::from_records(records))
}
