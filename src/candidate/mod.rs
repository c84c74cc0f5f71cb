//! Detection records, their removal state, and the stages that prune them.
//!
//! Records are never mutated in place. Filtering and suppression produce new
//! state sequences aligned index-for-index with the formatter's records, so a
//! record's position keeps identifying the cell, anchor and class it came from.

pub(crate) mod filter;
pub(crate) mod nms;
pub(crate) mod order;

use crate::geometry::BBox;
use crate::tensor::{Tensor, TensorView};
use crate::util::{DetPostError, DetPostResult};

/// Number of values in a detection row: `x, y, w, h, class_id, score`.
pub const ROW_LEN: usize = 6;

/// A single box/class/score record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Box in normalized image coordinates.
    pub bbox: BBox,
    /// Zero-based index into the detector's class list.
    pub class_id: usize,
    /// Decoded confidence: class probability times objectness.
    pub score: f32,
}

impl Detection {
    /// Returns the record as `[x, y, w, h, class_id, score]`.
    pub fn to_row(&self) -> [f32; ROW_LEN] {
        [
            self.bbox.x,
            self.bbox.y,
            self.bbox.w,
            self.bbox.h,
            self.class_id as f32,
            self.score,
        ]
    }

    fn from_row(row: &[f32]) -> Self {
        Self {
            bbox: BBox::new(row[0], row[1], row[2], row[3]),
            class_id: row[4].max(0.0) as usize,
            score: row[5],
        }
    }
}

/// Pipeline state of a record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordState {
    /// Still a candidate with the given score.
    Active(f32),
    /// Removed by NMS in favour of a higher-scoring overlapping box.
    Suppressed,
    /// Removed by the score threshold.
    FilteredOut,
}

impl RecordState {
    /// Returns the score if the record is still active.
    pub fn score(self) -> Option<f32> {
        match self {
            RecordState::Active(score) => Some(score),
            RecordState::Suppressed | RecordState::FilteredOut => None,
        }
    }

    /// Encodes the state in the flat row format: `0` for suppressed and `-1`
    /// for filtered records.
    pub fn legacy_score(self) -> f32 {
        match self {
            RecordState::Active(score) => score,
            RecordState::Suppressed => 0.0,
            RecordState::FilteredOut => -1.0,
        }
    }
}

/// Detection records together with their per-record state.
#[derive(Clone, Debug, PartialEq)]
pub struct Detections {
    records: Vec<Detection>,
    states: Vec<RecordState>,
}

impl Detections {
    /// Wraps records, marking each one active with its own score.
    pub fn from_records(records: Vec<Detection>) -> Self {
        let states = records
            .iter()
            .map(|r| RecordState::Active(r.score))
            .collect();
        Self { records, states }
    }

    pub(crate) fn with_states(&self, states: Vec<RecordState>) -> Self {
        debug_assert_eq!(states.len(), self.records.len());
        Self {
            records: self.records.clone(),
            states,
        }
    }

    /// Parses a `[1, N, 6]` tensor of `[x, y, w, h, class_id, score]` rows.
    ///
    /// Inverse of [`Detections::to_tensor`]: negative scores are read as
    /// filtered-out records, zero scores as suppressed ones, and every
    /// positive score as active.
    pub fn from_tensor(view: TensorView<'_>) -> DetPostResult<Self> {
        let shape = view.shape();
        let &[batch, n, ROW_LEN] = shape else {
            return Err(DetPostError::InvalidShape {
                shape: shape.to_vec(),
                reason: "detection rows must be [1, N, 6]",
            });
        };
        if batch != 1 {
            return Err(DetPostError::BatchSize { batch });
        }

        let mut records = Vec::with_capacity(n);
        let mut states = Vec::with_capacity(n);
        for row in view.as_slice().chunks_exact(ROW_LEN) {
            let record = Detection::from_row(row);
            states.push(if record.score < 0.0 {
                RecordState::FilteredOut
            } else if record.score == 0.0 {
                RecordState::Suppressed
            } else {
                RecordState::Active(record.score)
            });
            records.push(record);
        }
        Ok(Self { records, states })
    }

    /// Exports all records as a `[1, N, 6]` tensor using legacy scores.
    pub fn to_tensor(&self) -> Tensor {
        let mut data = Vec::with_capacity(self.records.len() * ROW_LEN);
        for (record, state) in self.iter() {
            let mut row = record.to_row();
            row[5] = state.legacy_score();
            data.extend_from_slice(&row);
        }
        Tensor::from_vec(data, vec![1, self.records.len(), ROW_LEN])
            .expect("row count matches buffer length")
    }

    /// Returns the number of records, whatever their state.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records as decoded, ignoring state.
    pub fn records(&self) -> &[Detection] {
        &self.records
    }

    /// Returns the per-record states, index-aligned with [`Self::records`].
    pub fn states(&self) -> &[RecordState] {
        &self.states
    }

    /// Iterates records alongside their state.
    pub fn iter(&self) -> impl Iterator<Item = (&Detection, RecordState)> + '_ {
        self.records.iter().zip(self.states.iter().copied())
    }

    /// Returns active records with their current score, in record order.
    pub fn active(&self) -> Vec<Detection> {
        self.iter()
            .filter_map(|(record, state)| {
                state.score().map(|score| Detection { score, ..*record })
            })
            .collect()
    }
}

/// Packs final detections into a `[1, K, 6]` tensor.
pub fn detections_to_tensor(detections: &[Detection]) -> Tensor {
    let mut data = Vec::with_capacity(detections.len() * ROW_LEN);
    for det in detections {
        data.extend_from_slice(&det.to_row());
    }
    Tensor::from_vec(data, vec![1, detections.len(), ROW_LEN])
        .expect("row count matches buffer length")
}
