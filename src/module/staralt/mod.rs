///! Staralt plot export
///!
///! Turns merged observing rows into per-date staralt form inputs and
///! captures the rendered altitude plots with a headless browser.

pub mod browser;
pub mod inputs;

pub use browser::StaraltBrowser;
pub use inputs::{observatory_string, plot_inputs, GroupColumn, PlotInput};
