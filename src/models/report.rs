use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{DateWindow, Item, PriceSeries};

const SECONDS_PER_DAY: i64 = 86_400;

// ---------------------------------------------------------------------------
// Insights — Descriptive statistics over a (filtered) series
// ---------------------------------------------------------------------------

/// Latest price, mean price and percent change over a series.
///
/// `change_pct` is measured against the first record of the series it was
/// computed from, so narrowing the window moves the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Insights {
    pub latest_price: f64,
    pub average_price: f64,
    pub change_pct: f64,
}

impl fmt::Display for Insights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Latest Price: ${:.2}, Average Price: ${:.2}, Change: {:.2}%",
            self.latest_price, self.average_price, self.change_pct
        )
    }
}

// ---------------------------------------------------------------------------
// TimeEncoding — Date -> regression ordinate
// ---------------------------------------------------------------------------

/// How dates are turned into the numeric x-axis of a trend fit.
///
/// The slope of a [`TrendResult`] is expressed per unit of this encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeEncoding {
    /// Unix timestamp of the date's UTC midnight.
    #[default]
    Seconds,
    /// Whole days since 1970-01-01.
    Days,
}

impl TimeEncoding {
    pub fn ordinate(&self, date: NaiveDate) -> f64 {
        let seconds = date.and_time(NaiveTime::MIN).and_utc().timestamp();
        match self {
            TimeEncoding::Seconds => seconds as f64,
            TimeEncoding::Days => seconds.div_euclid(SECONDS_PER_DAY) as f64,
        }
    }

    /// Length of one day in this encoding's units.
    pub fn units_per_day(&self) -> f64 {
        match self {
            TimeEncoding::Seconds => SECONDS_PER_DAY as f64,
            TimeEncoding::Days => 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// TrendResult — Fitted least-squares line plus the augmented series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub fitted_value: f64,
}

impl TrendPoint {
    pub fn residual(&self) -> f64 {
        self.price - self.fitted_value
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub item: Item,
    /// Price change per unit of `encoding`.
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination; `1.0` for a perfectly flat series.
    pub r_squared: f64,
    pub encoding: TimeEncoding,
    /// Centre of the fit, `(mean ordinate, mean price)`. The line passes
    /// through it.
    pub mean_ordinate: f64,
    pub mean_price: f64,
    /// One point per input record, in input order.
    pub points: Vec<TrendPoint>,
}

impl TrendResult {
    pub fn slope_per_day(&self) -> f64 {
        self.slope * self.encoding.units_per_day()
    }

    pub fn fitted_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.fitted_value)
    }

    /// Evaluate the fitted line at an arbitrary date.
    ///
    /// Agrees exactly with [`TrendPoint::fitted_value`] at the fitted dates.
    pub fn predict(&self, date: NaiveDate) -> f64 {
        self.mean_price + self.slope * (self.encoding.ordinate(date) - self.mean_ordinate)
    }
}

// ---------------------------------------------------------------------------
// ItemReport — One item's full filter -> insights -> trend result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemReport {
    pub item: Item,
    pub window: DateWindow,
    /// The series after windowing.
    pub series: PriceSeries,
    pub insights: Insights,
    pub trend: TrendResult,
}
