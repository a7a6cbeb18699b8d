//! The filtering and trend-analysis engine.
//!
//! Every function here is a pure computation over in-memory data: no I/O,
//! no shared state, and the caller's series is never modified. Separate
//! item series can be analyzed in parallel freely.

pub mod filter;
pub mod insights;
pub mod trend;

pub use filter::filter;
pub use insights::compute_insights;
pub use trend::fit_trend;

pub use crate::models::TimeEncoding;

use crate::error::Result;
use crate::models::{DateWindow, ItemReport, PriceSeries};

/// Run the full pipeline for one series: window it, then compute insights
/// and the trend line over the windowed records.
///
/// Stages run in order and the first failure is returned.
pub fn analyze(
    series: &PriceSeries,
    window: &DateWindow,
    encoding: TimeEncoding,
) -> Result<ItemReport> {
    let filtered = filter(series, window)?;
    let insights = compute_insights(&filtered)?;
    let trend = fit_trend(&filtered, encoding)?;

    Ok(ItemReport {
        item: series.item,
        window: *window,
        series: filtered,
        insights,
        trend,
    })
}
