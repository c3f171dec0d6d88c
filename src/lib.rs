///! Variable-star observing window finder
///!
///! Fetches the AAVSO target catalogue, scrapes per-star VSX ephemeris
///! tables, merges them into observing rows and narrows the result by
///! date, time, duration and twilight windows.

pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod logging;
pub mod module;
pub mod ranges;

pub use config::ObservingConfig;
pub use error::{Error, Result};
pub use module::pipeline::{EventFilter, ObservingPipeline, Snapshot, TargetFilter};
