//! Descriptive statistics: latest price, mean price, percent change.

use crate::error::{Result, TrendError};
use crate::models::{Insights, PriceSeries};

/// Compute [`Insights`] for an already filtered series.
///
/// "Latest" and "first" are positional (last and first record), so the
/// series must be in ascending date order. The mean is unweighted: irregular
/// gaps between observations are not corrected for.
///
/// # Errors
///
/// * [`TrendError::EmptySeries`] if the series has no records.
/// * [`TrendError::DivisionByZero`] if the first price is exactly zero.
pub fn compute_insights(series: &PriceSeries) -> Result<Insights> {
    let (first, latest) = match (series.first(), series.last()) {
        (Some(first), Some(latest)) => (first.price, latest.price),
        _ => return Err(TrendError::EmptySeries),
    };

    if first == 0.0 {
        return Err(TrendError::DivisionByZero);
    }

    let average_price = series.prices().sum::<f64>() / series.len() as f64;
    let change_pct = (latest - first) / first * 100.0;

    Ok(Insights {
        latest_price: latest,
        average_price,
        change_pct,
    })
}
