///! Observing pipeline module
///!
///! Orchestrates the whole run: fetch the target catalogue, filter it,
///! scrape and merge per-star ephemeris events, attach twilight windows,
///! and filter the merged rows. Operations are gated by a strictly
///! ordered stage marker and every operation returns a fresh immutable
///! snapshot.

pub mod manager;
pub mod snapshot;
pub mod stage;

pub use manager::{EventFilter, ObservingPipeline, TargetFilter};
pub use snapshot::{ObservingRow, Snapshot};
pub use stage::PipelineStage;
