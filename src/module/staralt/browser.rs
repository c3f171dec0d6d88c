///! Headless-browser capture of staralt plots
///!
///! Drives the ING staralt form once per observing date and saves the
///! rendered plot page as a PNG screenshot. All grouping and
///! formatting decisions happen in `inputs`; this module only fills
///! the form and captures what comes back.

use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tracing::{info, warn};

use super::inputs::PlotInput;

const STARALT_URL: &str = "http://catserver.ing.iac.es/staralt/";
const DEFAULT_SAVE_DIR: &str = "data/staralt";

/// Staralt plot scraper
pub struct StaraltBrowser {
    plot_save_dir: PathBuf,
}

impl StaraltBrowser {
    /// Create a new scraper instance
    pub fn new(save_dir: Option<PathBuf>) -> Self {
        let plot_save_dir = save_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_DIR));

        Self { plot_save_dir }
    }

    /// Ensure the save directory exists
    async fn ensure_save_dir(&self) -> Result<()> {
        if !self.plot_save_dir.exists() {
            fs::create_dir_all(&self.plot_save_dir)
                .await
                .with_context(|| format!("Failed to create directory: {:?}", self.plot_save_dir))?;
            info!("Created plot directory: {:?}", self.plot_save_dir);
        }
        Ok(())
    }

    /// Submit the staralt form for each date and save one screenshot
    /// per date, named `{date}.png`.
    ///
    /// # Returns
    /// Returns the saved screenshot paths on success, Error on failure
    pub async fn capture_plots(
        &self,
        observatory: &str,
        inputs: &[PlotInput],
    ) -> Result<Vec<PathBuf>> {
        self.ensure_save_dir().await?;

        if inputs.is_empty() {
            info!("No observing dates to plot");
            return Ok(Vec::new());
        }

        info!(
            "Capturing staralt plots for {} dates from: {}",
            inputs.len(),
            STARALT_URL
        );

        // Configure headless Chrome launch options
        let launch_options = LaunchOptions {
            headless: true,
            sandbox: false,
            ..Default::default()
        };

        // Launch the browser once and reuse the tab across dates
        let browser = Browser::new(launch_options).context("Failed to launch headless browser")?;

        let tab = browser.new_tab().context("Failed to create new tab")?;

        let mut saved = Vec::with_capacity(inputs.len());

        for input in inputs {
            info!("Requesting staralt plot for {}", input.date);

            tab.navigate_to(STARALT_URL)
                .context("Failed to navigate to staralt form")?;
            tab.wait_until_navigated()
                .context("Failed to wait for form page")?;

            tab.evaluate(&fill_form_script(observatory, input), false)
                .with_context(|| format!("Failed to submit staralt form for {}", input.date))?;

            // The submit click navigates to the rendered plot page
            tab.wait_until_navigated()
                .context("Failed to wait for plot page")?;

            // Additional wait to ensure the plot image is loaded
            tokio::time::sleep(Duration::from_secs(2)).await;

            let screenshot_path = self.plot_save_dir.join(format!("{}.png", input.date));

            match tab.capture_screenshot(
                headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption::Png,
                None,
                None,
                true,
            ) {
                Ok(screenshot_data) => {
                    fs::write(&screenshot_path, &screenshot_data)
                        .await
                        .with_context(|| {
                            format!("Failed to write screenshot to: {:?}", screenshot_path)
                        })?;
                    info!(
                        "Saved plot to: {:?} ({} bytes)",
                        screenshot_path,
                        screenshot_data.len()
                    );
                    saved.push(screenshot_path);
                }
                Err(e) => {
                    warn!("Failed to capture plot for {}: {}", input.date, e);
                }
            };
        }

        Ok(saved)
    }
}

/// Build the script that fills and submits the staralt form. The
/// date selects only accept their listed option texts, so options are
/// matched by visible text the way a user would pick them.
fn fill_form_script(observatory: &str, input: &PlotInput) -> String {
    format!(
        r#"(function () {{
    var byName = function (name) {{ return document.getElementsByName(name)[0]; }};
    var selectText = function (el, text) {{
        for (var i = 0; i < el.options.length; i++) {{
            if (el.options[i].text.trim() === text) {{ el.selectedIndex = i; return; }}
        }}
    }};
    selectText(byName('form[day]'), {day});
    selectText(byName('form[month]'), {month});
    selectText(byName('form[year]'), {year});
    byName('form[sitecoord]').value = {observatory};
    byName('form[coordlist]').value = {coords};
    byName('submit').click();
}})();"#,
        day = js_string(&input.date.format("%d").to_string()),
        month = js_string(&input.date.format("%B").to_string()),
        year = js_string(&input.date.format("%Y").to_string()),
        observatory = js_string(observatory),
        coords = js_string(&input.coordinates),
    )
}

/// Quote a string as a JavaScript literal. JSON string syntax is a
/// subset of JavaScript's, so the serde encoding is safe to inline.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
