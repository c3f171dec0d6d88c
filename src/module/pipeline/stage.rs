///! Pipeline stage marker and the call-order gate.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// How far the pipeline has advanced. The order of the variants is the
/// order of the stages; a snapshot's stage never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PipelineStage {
    Empty,
    TargetsFetched,
    EventsScraped,
}

impl PipelineStage {
    /// Gate `operation` on the stage it requires. Calling out of order is
    /// always an error, never a silent no-op.
    pub fn require(self, operation: &'static str, expected: PipelineStage) -> Result<()> {
        if self >= expected {
            Ok(())
        } else {
            Err(Error::Sequence {
                operation,
                expected,
                actual: self,
            })
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelineStage::Empty => "Empty",
            PipelineStage::TargetsFetched => "TargetsFetched",
            PipelineStage::EventsScraped => "EventsScraped",
        })
    }
}
