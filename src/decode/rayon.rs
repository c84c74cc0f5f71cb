//! Rayon-parallel formatter (feature-gated).
//!
//! Grid rows are decoded independently and concatenated in row order, so the
//! result is identical to [`format_yolo_v2`](crate::decode::format_yolo_v2).

use crate::candidate::Detections;
use crate::decode::format::{decode_row, FormatParams, GridLayout};
use crate::tensor::TensorView;
use crate::trace::{trace_event, trace_span};
use crate::util::DetPostResult;
use rayon::prelude::*;

/// Row-parallel variant of [`format_yolo_v2`](crate::decode::format_yolo_v2).
pub fn format_yolo_v2_par(
    view: TensorView<'_>,
    params: &FormatParams,
) -> DetPostResult<Detections> {
    let layout = GridLayout::from_view(view, params)?;
    let _span = trace_span!(
        "format_yolo_v2",
        rows = layout.rows,
        cols = layout.cols,
        anchors = params.anchors.len(),
        parallel = true
    )
    .entered();

    let row_results: Vec<_> = (0..layout.rows)
        .into_par_iter()
        .map(|row| decode_row(view, layout, params, row))
        .collect();

    let mut records = Vec::with_capacity(layout.num_records(params));
    for rows in row_results {
        records.extend(rows?);
    }

    trace_event!("decoded", count = records.len());
    Ok(Detections::from_records(records))
}
