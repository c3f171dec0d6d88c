use varstar_finder::config::ObservingConfig;
use varstar_finder::export;
use varstar_finder::module::pipeline::ObservingPipeline;
use varstar_finder::module::staralt::GroupColumn;
use varstar_finder::module::twilight::TwilightCategory;

use std::path::Path;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = ObservingConfig::from_file("config.toml")?;

    // Initialize logging
    let _logging_guard =
        varstar_finder::logging::init_logging("logs", "varstar-finder", &config.log_level);

    tracing::info!("Varstar finder starting...");
    tracing::info!(
        "Observing site: lat {}, lon {}, elevation {} m, UT offset {} h",
        config.latitude,
        config.longitude,
        config.elevation,
        config.ut_offset
    );

    let pipeline = ObservingPipeline::new(config);
    let data_dir = Path::new("data");

    // Fetch the target catalogue
    tracing::info!("Fetching target catalogue...");
    let targets = pipeline
        .fetch_targets(Some(&data_dir.join("targets.csv")))
        .await?;
    export::write_rows_json(&targets, &data_dir.join("targets.json"))?;
    tracing::info!("Fetched {} catalogue targets", targets.len());

    // Scrape each target's ephemeris table and merge
    tracing::info!("Scraping ephemeris tables...");
    let merged = pipeline
        .scrape_events(&targets, Some(&data_dir.join("events.csv")))
        .await?;
    tracing::info!("Merged snapshot holds {} observing rows", merged.len());

    // Annotate every row with the three twilight windows
    let mut annotated = merged;
    for category in TwilightCategory::ALL {
        annotated = pipeline.attach_twilight(&annotated, category, None)?;
    }
    export::write_stage_csv(&annotated, &data_dir.join("observing_windows.csv"))?;
    tracing::info!("Exported observing windows for {} rows", annotated.len());

    // Capture one altitude plot per observing date
    tracing::info!("Capturing staralt plots...");
    let plots = pipeline
        .export_staralt_plots(&annotated, GroupColumn::Start, &data_dir.join("staralt"))
        .await?;
    tracing::info!("Saved {} staralt plots", plots.len());

    tracing::info!("Varstar finder finished");
    Ok(())
}
