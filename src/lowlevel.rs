//! Low-level building blocks for custom decoding pipelines.
//!
//! These expose the per-anchor decoder and numeric primitives used by the
//! formatter. Most users should prefer [`PostProcessor`](crate::PostProcessor)
//! or the stage functions re-exported at the crate root.

pub use crate::candidate::ROW_LEN;
pub use crate::decode::{decode_anchor, DecodedBox, GridCell, BOX_FIELDS};
pub use crate::tensor::preprocess::{divide_by_255, per_image_standardization, resize_nearest};
pub use crate::util::math::{sigmoid, softmax};
