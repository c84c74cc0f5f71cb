//! detpost turns raw grid-detector output into ranked, de-duplicated boxes.
//!
//! The pipeline decodes a YOLOv2-style `[1, H, W, anchors * (classes + 5)]`
//! tensor into one record per cell, anchor and class, flags records below a
//! score threshold, and runs greedy IoU non-maximum suppression. Every stage is
//! a pure function over borrowed inputs. Optional features add row-parallel
//! decoding (`rayon`), `image` crate interop (`image-io`) and stage spans
//! (`tracing`).

mod trace;

pub mod candidate;
pub mod decode;
pub mod geometry;
pub mod lowlevel;
pub mod pipeline;
pub mod tensor;
pub mod util;

pub use candidate::filter::exclude_low_score_box;
pub use candidate::nms::{nms, nms_states, NmsParams};
pub use candidate::{detections_to_tensor, Detection, Detections, RecordState};
pub use decode::{format_yolo_v2, Anchor, FormatParams};
pub use geometry::{iou, BBox};
pub use pipeline::{DetectionConfig, PostProcessor};
pub use tensor::{Tensor, TensorView};
pub use util::{DetPostError, DetPostResult};

#[cfg(feature = "rayon")]
pub use decode::rayon::format_yolo_v2_par;
#[cfg(feature = "image-io")]
pub use tensor::io;
