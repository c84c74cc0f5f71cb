//! Score-threshold filtering.

use crate::candidate::{Detections, RecordState};
use crate::trace::{trace_event, trace_span};

/// Marks every active record scoring below `threshold` as filtered out.
///
/// Records are flagged, not removed, so the result stays index-aligned with
/// the input. Applying the same threshold twice is a no-op.
pub fn exclude_low_score_box(detections: &Detections, threshold: f32) -> Detections {
    let _span = trace_span!("exclude_low_score_box", records = detections.len()).entered();

    let states: Vec<RecordState> = detections
        .states()
        .iter()
        .map(|&state| match state {
            RecordState::Active(score) if score < threshold => RecordState::FilteredOut,
            other => other,
        })
        .collect();

    let filtered = states
        .iter()
        .filter(|s| matches!(s, RecordState::FilteredOut))
        .count();
    trace_event!("filtered", count = filtered);
    detections.with_states(states)
}
