///! VSX ephemeris module
///!
///! Turns a star's ephemeris page on the AAVSO Variable Star Index into
///! structured predicted-event records: URL extraction from catalogue
///! notes, raw cell scraping, and the reshape into typed rows.

pub mod parser;
pub mod scraper;
pub mod types;

pub use parser::{extract_ephemeris_url, reshape_event_cells};
pub use scraper::{EventTableSource, VsxScraper};
pub use types::EventRecord;
