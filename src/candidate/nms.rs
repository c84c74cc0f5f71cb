//! Greedy IoU-based non-maximum suppression.

use crate::candidate::order::candidates_desc;
use crate::candidate::{Detection, Detections, RecordState};
use crate::geometry::iou;
use crate::trace::{trace_event, trace_span};

/// Suppression parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NmsParams {
    /// Boxes overlapping a kept box by strictly more than this IoU are suppressed.
    ///
    /// Not range-checked here; [`crate::DetectionConfig::validate`] restricts it
    /// to `[0, 1]`. Values of 1 or more disable suppression.
    pub iou_threshold: f32,
    /// Maximum number of detections returned; `None` keeps every survivor.
    pub max_output_size: Option<usize>,
    /// Only compare boxes that share a class id.
    pub per_class: bool,
}

impl Default for NmsParams {
    fn default() -> Self {
        Self {
            iou_threshold: 0.5,
            max_output_size: None,
            per_class: false,
        }
    }
}

/// Runs suppression and returns the index-aligned states plus kept indices.
///
/// A candidate that is still active when the walk reaches it can no longer be
/// suppressed (only earlier, higher-scoring boxes suppress), so it is kept at
/// that point and the walk stops once `max_output_size` boxes are kept.
fn suppress(detections: &Detections, params: &NmsParams) -> (Vec<RecordState>, Vec<usize>) {
    let records = detections.records();
    let mut states = detections.states().to_vec();
    let order = candidates_desc(&states);
    let cap = params.max_output_size.unwrap_or(usize::MAX);

    let mut kept = Vec::new();
    for (pos, &(i, _)) in order.iter().enumerate() {
        if kept.len() >= cap {
            break;
        }
        if !matches!(states[i], RecordState::Active(_)) {
            continue;
        }
        kept.push(i);

        let outer = &records[i];
        for &(j, _) in &order[pos + 1..] {
            if !matches!(states[j], RecordState::Active(_)) {
                continue;
            }
            if params.per_class && records[j].class_id != outer.class_id {
                continue;
            }
            if iou(&outer.bbox, &records[j].bbox) > params.iou_threshold {
                states[j] = RecordState::Suppressed;
            }
        }
    }

    (states, kept)
}

/// Applies greedy NMS and returns surviving detections by descending score.
///
/// Only active records with a positive score take part. Ties keep the input
/// record order. The output holds at most `max_output_size` detections.
pub fn nms(detections: &Detections, params: &NmsParams) -> Vec<Detection> {
    let _span = trace_span!(
        "nms",
        records = detections.len(),
        per_class = params.per_class
    )
    .entered();

    let (states, kept) = suppress(detections, params);
    let records = detections.records();
    let out: Vec<Detection> = kept
        .into_iter()
        .filter_map(|i| {
            states[i].score().map(|score| Detection {
                score,
                ..records[i]
            })
        })
        .collect();

    trace_event!("kept", count = out.len());
    out
}

/// Applies greedy NMS and returns the index-aligned record states.
///
/// Useful when downstream code expects the formatter's full row layout; the
/// surviving records are exactly those returned by [`nms`] when no output cap
/// is set.
pub fn nms_states(detections: &Detections, params: &NmsParams) -> Detections {
    let _span = trace_span!("nms_states", records = detections.len()).entered();
    let uncapped = NmsParams {
        max_output_size: None,
        ..*params
    };
    let (states, _) = suppress(detections, &uncapped);
    detections.with_states(states)
}
