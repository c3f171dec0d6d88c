///! Crate-wide error taxonomy
///!
///! Fatal failures carry enough context (stage, star, offending input) to
///! diagnose without re-running. Recoverable conditions are logged as
///! warnings at the call site instead of being raised.

use thiserror::Error;

use crate::module::pipeline::PipelineStage;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A pipeline operation was invoked before its precondition stage
    /// completed. Never silently skipped; the caller must re-invoke the
    /// stages in order.
    #[error("{operation} called out of order: requires stage {expected}, pipeline is at {actual}")]
    Sequence {
        operation: &'static str,
        expected: PipelineStage,
        actual: PipelineStage,
    },

    /// An upstream collaborator failed: the catalogue request, a page
    /// fetch, or the plot browser. Not retried internally.
    #[error("upstream request failed")]
    Upstream {
        #[source]
        source: anyhow::Error,
    },

    /// A date string matched none of the recognized formats. The value is
    /// surfaced verbatim rather than coerced into a guessed timestamp.
    #[error("unrecognized date format: {input:?}")]
    Format { input: String },

    /// A scraped ephemeris page did not reshape into a rectangular table.
    #[error("malformed ephemeris table for {star_name}: {reason}")]
    ScrapeShape { star_name: String, reason: String },

    /// A stage export could not be written.
    #[error("failed to export records to {path}")]
    Export {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    pub fn upstream(source: impl Into<anyhow::Error>) -> Self {
        Error::Upstream {
            source: source.into(),
        }
    }

    pub fn scrape_shape(star_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ScrapeShape {
            star_name: star_name.into(),
            reason: reason.into(),
        }
    }
}
