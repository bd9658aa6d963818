//! High-level analysis API.
//!
//! [`Analyzer`] is the primary entry point. It wraps a validated
//! [`AnalysisConfig`] and runs single frames, frame sequences, or in-place
//! re-analysis of one frame of a [`SessionTimeline`].

use std::path::Path;

use crate::config::AnalysisConfig;
use crate::error::{ConfigError, FrameError};
use crate::pipeline::{self, BatchOptions};
use crate::record::{FrameInput, FrameRecord};
use crate::timeline::{BatchReport, SessionTimeline};

/// Primary analysis interface.
///
/// Holds no per-session state. Create once, analyze many frames.
///
/// # Examples
///
/// ```
/// use larvakin::{Analyzer, EndpointMode, FrameInput};
///
/// let outline: Vec<[f64; 2]> = (0..120)
///     .map(|k| {
///         let t = std::f64::consts::TAU * k as f64 / 120.0;
///         [100.0 + 100.0 * t.cos(), 30.0 + 30.0 * t.sin()]
///     })
///     .collect();
/// let input = FrameInput::new(0, outline).with_mode(EndpointMode::Manual {
///     head: [0.0, 30.0],
///     tail: [200.0, 30.0],
/// });
/// let record = Analyzer::default().analyze_frame(&input, None).unwrap();
/// assert!(record.body_angle_deg().unwrap().abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    /// Validate `config` and wrap it.
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Load a JSON config and create an analyzer in one step.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            config: AnalysisConfig::from_json_file(path)?,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one frame. `previous_angle` is the body angle of the previous
    /// analyzed frame, or `None` for the first frame of a session.
    pub fn analyze_frame(
        &self,
        input: &FrameInput,
        previous_angle: Option<f64>,
    ) -> Result<FrameRecord, FrameError> {
        pipeline::analyze_frame(input, previous_angle, &self.config)
    }

    /// Analyze a sequence of frames in any input order.
    pub fn analyze_sequence(&self, inputs: &[FrameInput], options: &BatchOptions) -> BatchReport {
        pipeline::analyze_sequence(inputs, &self.config, options)
    }

    /// Re-analyze one frame of `timeline` (e.g. after its endpoints were
    /// corrected) and replace its record.
    ///
    /// The previous angle comes from the closest earlier record. The next
    /// record, if any, is replaced by a copy with its turning angle
    /// recomputed. Returns the record that was replaced. On error the
    /// timeline is unchanged.
    pub fn reanalyze_into(
        &self,
        timeline: &mut SessionTimeline,
        input: &FrameInput,
    ) -> Result<Option<FrameRecord>, FrameError> {
        let previous = timeline.previous_body_angle(input.frame);
        let record = self.analyze_frame(input, previous)?;
        let angle = record.body_angle_deg();
        let replaced = timeline.insert(record);

        let next = timeline
            .iter()
            .find(|r| r.frame() > input.frame)
            .map(|r| r.with_previous_angle(angle.or(previous)));
        if let Some(next) = next {
            timeline.insert(next);
        }
        Ok(replaced)
    }
}
