//! Frame analysis pipeline.
//!
//! Internal glue that wires the stages together:
//! ROI -> endpoints -> midline/sides -> landmarks -> kinematics -> record.
//!
//! Algorithmic work lives in `crate::endpoints`, `crate::midline`,
//! `crate::landmarks` and `crate::kinematics`. This layer owns stage order,
//! error scoping (every failure carries its frame index) and the cross-frame
//! threading of body angles and endpoint hints.
//!
//! Entry points:
//! - `analyze_frame`: one frame, previous body angle passed in
//! - `analyze_sequence`: many frames, parallel unless endpoints propagate

mod batch;
mod frame;

pub(crate) use batch::analyze_sequence;
pub(crate) use frame::analyze_frame;

/// Options for [`crate::Analyzer::analyze_sequence`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Use the previous frame's endpoints as snap hints for frames in
    /// automatic mode. A failed frame passes no hint on. Forces sequential
    /// processing.
    pub propagate_endpoints: bool,
}
