//! Session timeline: frame records keyed by frame index.

use std::collections::BTreeMap;

use crate::error::FrameError;
use crate::record::FrameRecord;

/// Records of a session in frame order. Gaps are allowed.
///
/// Owned by the caller. The engine never holds on to it; prior-frame data is
/// read out of it explicitly (see [`SessionTimeline::previous_body_angle`]).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<FrameRecord>", into = "Vec<FrameRecord>")]
pub struct SessionTimeline {
    records: BTreeMap<u64, FrameRecord>,
}

impl SessionTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any earlier record of the same frame
    /// wholesale. Returns the replaced record.
    pub fn insert(&mut self, record: FrameRecord) -> Option<FrameRecord> {
        self.records.insert(record.frame(), record)
    }

    pub fn get(&self, frame: u64) -> Option<&FrameRecord> {
        self.records.get(&frame)
    }

    pub fn remove(&mut self, frame: u64) -> Option<FrameRecord> {
        self.records.remove(&frame)
    }

    /// Records in ascending frame order.
    pub fn iter(&self) -> impl Iterator<Item = &FrameRecord> + '_ {
        self.records.values()
    }

    pub fn frames(&self) -> impl Iterator<Item = u64> + '_ {
        self.records.keys().copied()
    }

    /// Body angle of the closest analyzed frame before `frame` that has one.
    pub fn previous_body_angle(&self, frame: u64) -> Option<f64> {
        self.records
            .range(..frame)
            .rev()
            .find_map(|(_, r)| r.body_angle_deg())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<FrameRecord>> for SessionTimeline {
    fn from(records: Vec<FrameRecord>) -> Self {
        let mut timeline = Self::new();
        for r in records {
            timeline.insert(r);
        }
        timeline
    }
}

impl From<SessionTimeline> for Vec<FrameRecord> {
    fn from(timeline: SessionTimeline) -> Self {
        timeline.records.into_values().collect()
    }
}

impl<'a> IntoIterator for &'a SessionTimeline {
    type Item = &'a FrameRecord;
    type IntoIter = std::collections::btree_map::Values<'a, u64, FrameRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}

/// Outcome of a batch run: sealed records plus per-frame failures.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub timeline: SessionTimeline,
    /// Failed frames in ascending frame order.
    pub failures: Vec<FrameError>,
}
