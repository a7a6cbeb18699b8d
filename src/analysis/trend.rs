//! Ordinary least-squares trend line of price against time.

use crate::error::{Result, TrendError};
use crate::models::{PriceSeries, TimeEncoding, TrendPoint, TrendResult};

/// Fit `price ≈ intercept + slope * ordinate` over every record of `series`.
///
/// Dates become ordinates through `encoding`; the returned slope is in price
/// units per encoding unit. The result carries a new augmented series (each
/// record's price plus the line evaluated at its date) in input order.
///
/// # Errors
///
/// * [`TrendError::EmptySeries`] for zero records.
/// * [`TrendError::InsufficientData`] for a single record.
/// * [`TrendError::DegenerateInput`] if every record has the same date.
pub fn fit_trend(series: &PriceSeries, encoding: TimeEncoding) -> Result<TrendResult> {
    let n = series.len();
    match n {
        0 => return Err(TrendError::EmptySeries),
        1 => return Err(TrendError::InsufficientData { found: 1 }),
        _ => {}
    }

    let first_date = series.records[0].date;
    if series.dates().all(|d| d == first_date) {
        return Err(TrendError::DegenerateInput);
    }

    let xs: Vec<f64> = series.dates().map(|d| encoding.ordinate(d)).collect();
    let ys: Vec<f64> = series.prices().collect();

    // A flat series is decided on the raw prices; summing then dividing
    // leaves a rounding residue for values like 0.1.
    let flat = ys.iter().all(|&y| y == ys[0]);

    let count = n as f64;
    let mean_x = xs.iter().sum::<f64>() / count;
    let mean_y = if flat {
        ys[0]
    } else {
        ys.iter().sum::<f64>() / count
    };

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in xs.iter().zip(&ys) {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    if sxx == 0.0 {
        return Err(TrendError::DegenerateInput);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    // Evaluate around the mean: raw Unix-second ordinates are ~1e9 and would
    // cost precision through the intercept. `TrendResult::predict` does the same.
    let points: Vec<TrendPoint> = series
        .records
        .iter()
        .zip(&xs)
        .map(|(record, x)| TrendPoint {
            date: record.date,
            price: record.price,
            fitted_value: mean_y + slope * (x - mean_x),
        })
        .collect();

    let ss_tot: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = points.iter().map(|p| p.residual().powi(2)).sum();
    let r_squared = if flat || ss_tot == 0.0 {
        1.0
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(TrendResult {
        item: series.item,
        slope,
        intercept,
        r_squared,
        encoding,
        mean_ordinate: mean_x,
        mean_price: mean_y,
        points,
    })
}
