//! Multi-frame orchestration.

use std::collections::BTreeMap;

use rayon::prelude::*;

use super::frame::{resolve_geometry, seal, FrameGeometry};
use super::BatchOptions;
use crate::config::AnalysisConfig;
use crate::endpoints::{EndpointMode, Endpoints};
use crate::error::FrameError;
use crate::record::{FrameInput, FrameRecord};
use crate::timeline::BatchReport;

/// Inputs in ascending frame order; of repeated frames the last one wins.
fn latest_per_frame(inputs: &[FrameInput]) -> Vec<&FrameInput> {
    let mut by_frame: BTreeMap<u64, &FrameInput> = BTreeMap::new();
    for input in inputs {
        by_frame.insert(input.frame, input);
    }
    by_frame.into_values().collect()
}

pub(crate) fn analyze_sequence(
    inputs: &[FrameInput],
    config: &AnalysisConfig,
    options: &BatchOptions,
) -> BatchReport {
    let ordered = latest_per_frame(inputs);
    if ordered.len() < inputs.len() {
        tracing::debug!(
            dropped = inputs.len() - ordered.len(),
            "repeated frame indices, keeping the last input of each"
        );
    }

    let results = if options.propagate_endpoints {
        run_sequential(&ordered, config)
    } else {
        run_parallel(&ordered, config)
    };

    let mut report = BatchReport::default();
    for result in results {
        match result {
            Ok(record) => {
                report.timeline.insert(record);
            }
            Err(err) => {
                tracing::warn!(frame = err.frame, error = %err.kind, "frame analysis failed");
                report.failures.push(err);
            }
        }
    }
    tracing::info!(
        frames = ordered.len(),
        analyzed = report.timeline.len(),
        failed = report.failures.len(),
        propagate_endpoints = options.propagate_endpoints,
        "batch analysis finished"
    );
    report
}

// ---------------------------------------------------------------------------
// Parallel: geometry per frame, then angles threaded in frame order
// ---------------------------------------------------------------------------

fn run_parallel(
    ordered: &[&FrameInput],
    config: &AnalysisConfig,
) -> Vec<Result<FrameRecord, FrameError>> {
    let geometries: Vec<Result<FrameGeometry, FrameError>> = ordered
        .par_iter()
        .map(|input| resolve_geometry(input, &input.translated_mode(), config))
        .collect();

    // Each frame's previous angle is the body angle of the closest earlier
    // frame whose geometry succeeded.
    let mut previous = None;
    let threaded: Vec<(Result<FrameGeometry, FrameError>, Option<f64>)> = geometries
        .into_iter()
        .map(|g| {
            let prev = previous;
            if let Ok(geom) = &g {
                if let Some(angle) = geom.body_angle_deg() {
                    previous = Some(angle);
                }
            }
            (g, prev)
        })
        .collect();

    threaded
        .into_par_iter()
        .map(|(g, prev)| g.and_then(|geom| seal(geom, prev, config)))
        .collect()
}

// ---------------------------------------------------------------------------
// Sequential: endpoints of the previous frame seed the next automatic frame
// ---------------------------------------------------------------------------

fn run_sequential(
    ordered: &[&FrameInput],
    config: &AnalysisConfig,
) -> Vec<Result<FrameRecord, FrameError>> {
    let mut last_endpoints: Option<Endpoints> = None;
    let mut previous_angle: Option<f64> = None;
    let mut out = Vec::with_capacity(ordered.len());

    for input in ordered {
        let mode = match (&input.mode, &last_endpoints) {
            (EndpointMode::Auto, Some(prev)) => EndpointMode::snap_from(prev),
            _ => input.translated_mode(),
        };
        let result = resolve_geometry(input, &mode, config).and_then(|geom| {
            let endpoints = geom.endpoints;
            let angle = geom.body_angle_deg();
            let record = seal(geom, previous_angle, config)?;
            last_endpoints = Some(endpoints);
            if angle.is_some() {
                previous_angle = angle;
            }
            Ok(record)
        });
        if result.is_err() {
            // A failed frame leaves no hint; the next automatic frame starts fresh.
            last_endpoints = None;
        }
        out.push(result);
    }
    out
}
