///! AAVSO target catalogue module
///!
///! Fetches the observable-target list from the AAVSO target tool API
///! and exposes the records for downstream filtering and scraping.

pub mod client;
pub mod types;

pub use client::{AavsoClient, TargetSource};
pub use types::TargetRecord;
