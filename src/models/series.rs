use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrendError};
use crate::models::Item;

// ---------------------------------------------------------------------------
// PriceRecord — Single price observation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub price: f64,
}

impl PriceRecord {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }

    /// Prices must be finite and non-negative.
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0
    }
}

// ---------------------------------------------------------------------------
// PriceSeries — Ordered observations for one item
// ---------------------------------------------------------------------------

/// Price observations for a single item.
///
/// Records are expected in ascending date order. The order is a precondition
/// owned by the caller: nothing in this crate re-sorts a series, because
/// "first" and "latest" (used by insights and trend fitting) are positional.
/// Use [`is_chronological`](Self::is_chronological) to check it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub item: Item,
    pub records: Vec<PriceRecord>,
}

impl PriceSeries {
    pub fn new(item: Item, records: Vec<PriceRecord>) -> Self {
        Self { item, records }
    }

    /// An empty series for `item`.
    pub fn empty(item: Item) -> Self {
        Self {
            item,
            records: Vec::new(),
        }
    }

    /// Build a series from `(date, price)` pairs, keeping their order.
    pub fn from_pairs<I>(item: Item, pairs: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self {
            item,
            records: pairs
                .into_iter()
                .map(|(date, price)| PriceRecord::new(date, price))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&PriceRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&PriceRecord> {
        self.records.last()
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.price)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.records.iter().map(|r| r.date)
    }

    /// `true` if dates never decrease (duplicates allowed).
    pub fn is_chronological(&self) -> bool {
        self.records.windows(2).all(|w| w[0].date <= w[1].date)
    }

    /// Earliest and latest dates present, regardless of record order.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.dates().min()?;
        let max = self.dates().max()?;
        Some((min, max))
    }

    /// Reject prices that are negative or not finite.
    pub fn validate(&self) -> Result<()> {
        for (i, record) in self.records.iter().enumerate() {
            if !record.has_valid_price() {
                return Err(TrendError::InvalidArgument(format!(
                    "{} record {} ({}) has invalid price {}",
                    self.item, i, record.date, record.price
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DateWindow — Inclusive date range, either bound optional
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` range. A `None` bound is unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    /// Build a window, failing with [`TrendError::InvalidWindow`] if both
    /// bounds are set and `start > end`.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Self::new(Some(start), Some(end))
    }

    /// A window with no bounds; keeps every record.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn since(start: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub fn until(end: NaiveDate) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => {
                Err(TrendError::InvalidWindow { start, end })
            }
            _ => Ok(()),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| start <= date) && self.end.map_or(true, |end| date <= end)
    }
}
