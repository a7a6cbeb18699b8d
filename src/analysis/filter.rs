//! Date-window filtering of price series.

use crate::error::Result;
use crate::models::{DateWindow, PriceSeries};

/// Keep the records of `series` whose date falls inside `window` (both ends
/// inclusive), in their original order.
///
/// Always returns a fresh series; `series` is left untouched. A window that
/// matches nothing yields an empty series.
///
/// # Errors
///
/// [`TrendError::InvalidWindow`](crate::TrendError::InvalidWindow) if both
/// bounds are set and `start > end`.
pub fn filter(series: &PriceSeries, window: &DateWindow) -> Result<PriceSeries> {
    window.validate()?;

    let records = series
        .records
        .iter()
        .filter(|r| window.contains(r.date))
        .copied()
        .collect();

    Ok(PriceSeries::new(series.item, records))
}
