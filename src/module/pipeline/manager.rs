///! The observing pipeline
///!
///! Owns the collaborators (catalogue client, page scraper, twilight
///! calculator) and drives the staged flow. Every operation checks the
///! snapshot's stage first, produces a new snapshot, and optionally
///! exports it; snapshots already produced are never touched.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::ObservingConfig;
use crate::error::{Error, Result};
use crate::export;
use crate::module::ephemeris::{
    extract_ephemeris_url, reshape_event_cells, EventRecord, EventTableSource, VsxScraper,
};
use crate::module::staralt::{self, GroupColumn, StaraltBrowser};
use crate::module::targets::{AavsoClient, TargetRecord, TargetSource};
use crate::module::twilight::{TwilightCalculator, TwilightCategory};
use crate::ranges::{self, DateRange, TimeRange};

use super::snapshot::{ObservingRow, Snapshot};
use super::stage::PipelineStage;

/// Row predicate for the catalogue stage. All set criteria must hold;
/// unset criteria are ignored.
#[derive(Debug, Clone, Default)]
pub struct TargetFilter {
    pub star_names: Option<Vec<String>>,
    /// Declination range in degrees, inclusive
    pub dec_range: Option<(f64, f64)>,
    /// Right-ascension range in degrees, inclusive
    pub ra_range: Option<(f64, f64)>,
}

/// Row predicate for the merged stage. Date and time bounds are textual
/// (`%Y-%m-%d` and `%H:%M`) and evaluated against the mid-event
/// timestamp; the duration bound is in hours.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub date_range: Option<(String, String)>,
    pub time_range: Option<(String, String)>,
    pub duration_range: Option<(f64, f64)>,
}

pub struct ObservingPipeline {
    config: ObservingConfig,
    targets: Box<dyn TargetSource>,
    events: Box<dyn EventTableSource>,
    twilight: TwilightCalculator,
}

impl ObservingPipeline {
    pub fn new(config: ObservingConfig) -> Self {
        let targets = Box::new(AavsoClient::new(config.api_key.clone()));
        let events = Box::new(VsxScraper::new());
        let twilight = TwilightCalculator::new(config.position());
        Self::with_sources(config, targets, events, twilight)
    }

    /// Construct with caller-supplied collaborators (tests use this).
    pub fn with_sources(
        config: ObservingConfig,
        targets: Box<dyn TargetSource>,
        events: Box<dyn EventTableSource>,
        twilight: TwilightCalculator,
    ) -> Self {
        Self {
            config,
            targets,
            events,
            twilight,
        }
    }

    /// Fetch the target catalogue. No precondition; this is the entry
    /// stage of every run.
    pub async fn fetch_targets(&self, export: Option<&Path>) -> Result<Snapshot> {
        let params = self.config.query_params();
        let targets = self.targets.fetch(&params).await?;

        let rows = targets.into_iter().map(ObservingRow::from_target).collect();
        let next = Snapshot::new(PipelineStage::TargetsFetched, rows);
        self.maybe_export(&next, export)?;
        Ok(next)
    }

    /// Keep only the targets matching `filter`. Does not advance the
    /// stage, so it can be re-applied to any fetched or merged snapshot.
    pub fn filter_targets(
        &self,
        snapshot: &Snapshot,
        filter: &TargetFilter,
        export: Option<&Path>,
    ) -> Result<Snapshot> {
        snapshot
            .stage()
            .require("filter_targets", PipelineStage::TargetsFetched)?;

        let rows: Vec<ObservingRow> = snapshot
            .rows()
            .iter()
            .filter(|row| {
                if let Some(names) = &filter.star_names {
                    if !names.contains(&row.target.star_name) {
                        return false;
                    }
                }
                if let Some(range) = filter.dec_range {
                    if !ranges::in_value_range(row.target.dec, range) {
                        return false;
                    }
                }
                if let Some(range) = filter.ra_range {
                    if !ranges::in_value_range(row.target.ra, range) {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        tracing::info!(
            "Target filter kept {} of {} rows",
            rows.len(),
            snapshot.len()
        );

        let next = Snapshot::new(snapshot.stage(), rows);
        self.maybe_export(&next, export)?;
        Ok(next)
    }

    /// Scrape each star's ephemeris page and left-merge the events onto
    /// the targets. A star whose notes carry no ephemeris URL, or whose
    /// page yields no events, still appears in the result with the event
    /// half absent. A star whose scrape fails is skipped with a warning
    /// rather than aborting the batch.
    pub async fn scrape_events(
        &self,
        snapshot: &Snapshot,
        export: Option<&Path>,
    ) -> Result<Snapshot> {
        snapshot
            .stage()
            .require("scrape_events", PipelineStage::TargetsFetched)?;

        // Unique targets in first-seen order; re-scraping a merged
        // snapshot must not scrape a star once per event row.
        let mut seen = HashSet::new();
        let targets: Vec<&TargetRecord> = snapshot
            .rows()
            .iter()
            .map(|row| &row.target)
            .filter(|t| seen.insert(t.star_name.clone()))
            .collect();

        tracing::info!("Scraping ephemeris tables for {} targets", targets.len());

        let mut events: Vec<EventRecord> = Vec::new();
        let mut skipped = 0usize;
        for target in &targets {
            let Some(url) = target
                .other_info
                .as_deref()
                .and_then(extract_ephemeris_url)
            else {
                tracing::debug!("No ephemeris URL for {}", target.star_name);
                continue;
            };

            match self.scrape_star(&target.star_name, &url).await {
                Ok(mut records) => events.append(&mut records),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!("Skipping {}: {}", target.star_name, e);
                }
            }
        }

        for event in &mut events {
            event.apply_offset(self.config.ut_offset);
            event.derive_duration();
        }

        let mut rows = Vec::new();
        for target in targets {
            let matched: Vec<&EventRecord> = events
                .iter()
                .filter(|e| e.star_name == target.star_name)
                .collect();
            if matched.is_empty() {
                rows.push(ObservingRow::from_target(target.clone()));
            } else {
                for event in matched {
                    rows.push(ObservingRow {
                        target: target.clone(),
                        event: Some(event.clone()),
                        twilight: Vec::new(),
                    });
                }
            }
        }

        tracing::info!(
            "Merged {} events into {} rows ({} stars skipped)",
            events.len(),
            rows.len(),
            skipped
        );

        let next = Snapshot::new(PipelineStage::EventsScraped, rows);
        self.maybe_export(&next, export)?;
        Ok(next)
    }

    /// Attach one twilight category's window to every row that has an
    /// event, using the mid-event timestamp as the reference. Can be
    /// called once per category; re-attaching a category replaces it.
    pub fn attach_twilight(
        &self,
        snapshot: &Snapshot,
        category: TwilightCategory,
        export: Option<&Path>,
    ) -> Result<Snapshot> {
        snapshot
            .stage()
            .require("attach_twilight", PipelineStage::EventsScraped)?;

        let mut rows = snapshot.rows().to_vec();
        for row in &mut rows {
            if let Some(mid) = row.event.as_ref().and_then(|e| e.mid) {
                row.set_twilight(self.twilight.window(category, mid));
            }
        }

        tracing::info!("Attached {} twilight windows", category.name());

        let next = Snapshot::new(snapshot.stage(), rows);
        self.maybe_export(&next, export)?;
        Ok(next)
    }

    /// Keep only the merged rows matching `filter`. Rows without an
    /// event are excluded whenever any criterion is active. Range bounds
    /// are parsed once up front; a malformed bound fails the whole call.
    pub fn filter_events(
        &self,
        snapshot: &Snapshot,
        filter: &EventFilter,
        export: Option<&Path>,
    ) -> Result<Snapshot> {
        snapshot
            .stage()
            .require("filter_events", PipelineStage::EventsScraped)?;

        let date_range = match &filter.date_range {
            Some((low, high)) => Some(DateRange::parse(low, high)?),
            None => None,
        };
        let time_range = match &filter.time_range {
            Some((low, high)) => Some(TimeRange::parse(low, high)?),
            None => None,
        };

        let rows: Vec<ObservingRow> = snapshot
            .rows()
            .iter()
            .filter(|row| {
                let mid = row.event.as_ref().and_then(|e| e.mid);
                if let Some(range) = &date_range {
                    if !range.contains(mid) {
                        return false;
                    }
                }
                if let Some(range) = &time_range {
                    if !range.contains(mid) {
                        return false;
                    }
                }
                if let Some(range) = filter.duration_range {
                    let duration = row.event.as_ref().and_then(|e| e.ecliptic_period);
                    if !ranges::in_value_range(duration, range) {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        tracing::info!(
            "Event filter kept {} of {} rows",
            rows.len(),
            snapshot.len()
        );

        let next = Snapshot::new(snapshot.stage(), rows);
        self.maybe_export(&next, export)?;
        Ok(next)
    }

    /// Capture one staralt altitude plot per observing date into
    /// `export_dir`. Dates come from the chosen event timestamp;
    /// rows without it are left out of the plots.
    pub async fn export_staralt_plots(
        &self,
        snapshot: &Snapshot,
        group: GroupColumn,
        export_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        snapshot
            .stage()
            .require("export_staralt_plots", PipelineStage::EventsScraped)?;

        let inputs = staralt::plot_inputs(snapshot.rows(), group);
        let observatory = staralt::observatory_string(&self.config);

        let browser = StaraltBrowser::new(Some(export_dir.to_path_buf()));
        browser
            .capture_plots(&observatory, &inputs)
            .await
            .map_err(Error::upstream)
    }

    async fn scrape_star(&self, star_name: &str, url: &str) -> Result<Vec<EventRecord>> {
        let cells = self.events.scrape_cells(url).await?;
        reshape_event_cells(star_name, &cells)
    }

    fn maybe_export(&self, snapshot: &Snapshot, export: Option<&Path>) -> Result<()> {
        if let Some(path) = export {
            export::write_stage_csv(snapshot, path)?;
            tracing::info!("Exported {} rows to {}", snapshot.len(), path.display());
        }
        Ok(())
    }
}
