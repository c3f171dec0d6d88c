///! Domain modules
///!
///! Each module owns one stage of the observing workflow: catalogue
///! retrieval, ephemeris scraping, twilight computation, the staged
///! pipeline itself, and staralt plot export.

pub mod ephemeris;
pub mod pipeline;
pub mod staralt;
pub mod targets;
pub mod twilight;
