//! Price series queries against the per-item DuckDB tables.

use crate::analysis;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{DateWindow, Item, PriceSeries};

// ---------------------------------------------------------------------------
// PriceQuery
// ---------------------------------------------------------------------------

/// Query interface for item price series backed by the registered CSV tables.
pub struct PriceQuery<'a> {
    conn: &'a Connection,
}

impl<'a> PriceQuery<'a> {
    /// Create a new `PriceQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// The full series for an item, in file order.
    pub fn series(&self, item: Item) -> Result<PriceSeries> {
        self.conn.load_series(item)
    }

    /// The series for an item restricted to `window`.
    pub fn history(&self, item: Item, window: &DateWindow) -> Result<PriceSeries> {
        window.validate()?;
        let series = self.series(item)?;
        analysis::filter(&series, window)
    }

    /// Earliest and latest dates on file for an item, as a closed window.
    ///
    /// Returns `None` when the item has no usable rows.
    pub fn date_bounds(&self, item: Item) -> Result<Option<DateWindow>> {
        let series = self.series(item)?;
        Ok(series.date_range().map(|(start, end)| DateWindow {
            start: Some(start),
            end: Some(end),
        }))
    }

    /// Windowed series for several items at once, for a combined chart.
    ///
    /// Output follows the order of `items`; duplicates are skipped.
    pub fn combined(&self, items: &[Item], window: &DateWindow) -> Result<Vec<PriceSeries>> {
        window.validate()?;
        let mut seen = Vec::with_capacity(items.len());
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            if seen.contains(item) {
                continue;
            }
            seen.push(*item);
            out.push(self.history(*item, window)?);
        }
        Ok(out)
    }
}
