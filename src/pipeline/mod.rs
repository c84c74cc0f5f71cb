//! End-to-end post-processing: decode, filter, suppress.
//!
//! `PostProcessor` owns a validated [`DetectionConfig`] and runs the three
//! stages in order over a borrowed detector output. Each stage is also
//! available on its own from the crate root.

use crate::candidate::filter::exclude_low_score_box;
use crate::candidate::nms::{nms, NmsParams};
use crate::candidate::{detections_to_tensor, Detection, Detections};
use crate::decode::{format_yolo_v2, Anchor, FormatParams};
use crate::tensor::{Tensor, TensorView};
use crate::trace::{trace_event, trace_span};
use crate::util::{DetPostError, DetPostResult};

/// Configuration bundle for the full post-processing chain.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionConfig {
    /// Anchor priors in grid-cell units.
    pub anchors: Vec<Anchor>,
    /// Box slots per cell; must equal `anchors.len()`.
    pub boxes_per_cell: usize,
    /// Number of classes predicted per box slot.
    pub num_classes: usize,
    /// Network input size `(width, height)`. Informational only: decoded
    /// coordinates stay normalized.
    pub image_size: (usize, usize),
    /// IoU above which a lower-scoring box is suppressed.
    pub iou_threshold: f32,
    /// Records scoring below this value are dropped before suppression.
    pub score_threshold: f32,
    /// Cap on the number of returned detections.
    pub max_output_size: Option<usize>,
    /// Restrict suppression to boxes of the same class.
    pub per_class: bool,
    /// Decode grid rows in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            anchors: vec![
                Anchor::new(1.3221, 1.73145),
                Anchor::new(3.19275, 4.00944),
                Anchor::new(5.05587, 8.09892),
                Anchor::new(9.47112, 4.84053),
                Anchor::new(11.2364, 10.0071),
            ],
            boxes_per_cell: 5,
            num_classes: 1,
            image_size: (160, 160),
            iou_threshold: 0.5,
            score_threshold: 0.05,
            max_output_size: Some(100),
            per_class: false,
            parallel: false,
        }
    }
}

impl DetectionConfig {
    /// Checks value ranges that do not depend on the input tensor.
    pub fn validate(&self) -> DetPostResult<()> {
        if self.anchors.is_empty() {
            return Err(DetPostError::InvalidConfig("at least one anchor is required"));
        }
        if self.anchors.len() != self.boxes_per_cell {
            return Err(DetPostError::AnchorCountMismatch {
                anchors: self.anchors.len(),
                boxes_per_cell: self.boxes_per_cell,
            });
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !self
            .anchors
            .iter()
            .all(|a| positive(a.width) && positive(a.height))
        {
            return Err(DetPostError::InvalidConfig(
                "anchor sizes must be finite and positive",
            ));
        }
        if self.num_classes == 0 {
            return Err(DetPostError::InvalidConfig("num_classes must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(DetPostError::InvalidConfig("iou_threshold must be within [0, 1]"));
        }
        if !self.score_threshold.is_finite() {
            return Err(DetPostError::InvalidConfig("score_threshold must be finite"));
        }
        Ok(())
    }

    /// Formatter parameters derived from this config.
    pub fn format_params(&self) -> FormatParams {
        FormatParams {
            anchors: self.anchors.clone(),
            boxes_per_cell: self.boxes_per_cell,
            num_classes: self.num_classes,
        }
    }

    /// Suppression parameters derived from this config.
    pub fn nms_params(&self) -> NmsParams {
        NmsParams {
            iou_threshold: self.iou_threshold,
            max_output_size: self.max_output_size,
            per_class: self.per_class,
        }
    }
}

/// Runs decode, score filtering and NMS with a fixed configuration.
#[derive(Clone, Debug)]
pub struct PostProcessor {
    config: DetectionConfig,
    format: FormatParams,
    nms: NmsParams,
}

impl PostProcessor {
    /// Validates `config` and builds a processor.
    pub fn new(config: DetectionConfig) -> DetPostResult<Self> {
        config.validate()?;
        Ok(Self {
            format: config.format_params(),
            nms: config.nms_params(),
            config,
        })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Decodes the detector output into index-aligned records.
    pub fn decode(&self, output: TensorView<'_>) -> DetPostResult<Detections> {
        #[cfg(feature = "rayon")]
        if self.config.parallel {
            return crate::decode::rayon::format_yolo_v2_par(output, &self.format);
        }
        format_yolo_v2(output, &self.format)
    }

    /// Runs the full chain and returns final detections by descending score.
    pub fn run(&self, output: TensorView<'_>) -> DetPostResult<Vec<Detection>> {
        let _span = trace_span!("postprocess", shape = ?output.shape()).entered();

        let decoded = self.decode(output)?;
        let filtered = exclude_low_score_box(&decoded, self.config.score_threshold);
        let kept = nms(&filtered, &self.nms);

        trace_event!("postprocess_done", decoded = decoded.len(), kept = kept.len());
        Ok(kept)
    }

    /// Runs the full chain and packs the result as a `[1, K, 6]` tensor.
    pub fn run_tensor(&self, output: TensorView<'_>) -> DetPostResult<Tensor> {
        Ok(detections_to_tensor(&self.run(output)?))
    }
}
