///! Ephemeris page scraper
///!
///! Fetches one star's VSX ephemeris page and flattens it to the raw
///! `<td>` cell stream that [`super::parser::reshape_event_cells`]
///! consumes. The trait seam lets tests feed canned cell streams instead
///! of hitting the network.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

use crate::error::{Error, Result};

const REQUEST_TIMEOUT_SECONDS: u64 = 60;

/// Source of raw ephemeris-table cells for one page URL.
#[async_trait]
pub trait EventTableSource: Send + Sync {
    async fn scrape_cells(&self, url: &str) -> Result<Vec<String>>;
}

pub struct VsxScraper {
    client: Client,
}

impl VsxScraper {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
                .user_agent("Mozilla/5.0 varstar-finder/0.1")
                .build()
                .expect("Failed to build reqwest client"),
        }
    }

    async fn fetch_page(&self, url: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to GET ephemeris page {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error {} for ephemeris page {}", response.status(), url);
        }

        response
            .text()
            .await
            .context("Failed to read ephemeris page body")
    }
}

impl Default for VsxScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventTableSource for VsxScraper {
    async fn scrape_cells(&self, url: &str) -> Result<Vec<String>> {
        let html = self.fetch_page(url).await.map_err(Error::upstream)?;
        Ok(collect_table_cells(&html))
    }
}

/// Text of every `<td>` in document order. Empty cells are kept; the
/// reshape uses them as header/row separators.
pub fn collect_table_cells(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let td_sel = Selector::parse("td").expect("static td selector");

    document
        .select(&td_sel)
        .map(|td| td.text().collect::<String>())
        .collect()
}
