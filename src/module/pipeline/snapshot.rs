///! Immutable per-stage snapshots of the observing table.

use serde::{Deserialize, Serialize};

use super::stage::PipelineStage;
use crate::module::ephemeris::EventRecord;
use crate::module::targets::TargetRecord;
use crate::module::twilight::{TwilightCategory, TwilightWindow};

/// One row of the observing table. Before the scrape stage only the
/// target half is populated; afterwards each row carries at most one
/// event (a target with several events appears on several rows).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservingRow {
    pub target: TargetRecord,
    /// Absent when the star had no usable ephemeris (left-join semantics)
    pub event: Option<EventRecord>,
    /// Twilight windows attached so far, at most one per category
    pub twilight: Vec<TwilightWindow>,
}

impl ObservingRow {
    pub fn from_target(target: TargetRecord) -> Self {
        Self {
            target,
            event: None,
            twilight: Vec::new(),
        }
    }

    pub fn twilight_for(&self, category: TwilightCategory) -> Option<&TwilightWindow> {
        self.twilight.iter().find(|w| w.category == category)
    }

    /// Attach one category's window, replacing any earlier one.
    pub fn set_twilight(&mut self, window: TwilightWindow) {
        match self
            .twilight
            .iter_mut()
            .find(|w| w.category == window.category)
        {
            Some(slot) => *slot = window,
            None => self.twilight.push(window),
        }
    }
}

/// The output of one pipeline stage: its stage marker plus the rows it
/// produced. A snapshot is never mutated in place; every operation
/// derives a new one, so earlier snapshots stay valid for re-filtering
/// without re-fetching or re-scraping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    stage: PipelineStage,
    rows: Vec<ObservingRow>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            stage: PipelineStage::Empty,
            rows: Vec::new(),
        }
    }

    pub(crate) fn new(stage: PipelineStage, rows: Vec<ObservingRow>) -> Self {
        Self { stage, rows }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn rows(&self) -> &[ObservingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
