//! Shared test fixtures for the grocery-trends integration tests.
//!
//! Provides `setup_sample_dir()`, which writes small item CSV files into a
//! temporary directory, plus helpers for building series by hand.

#![allow(dead_code)]

use chrono::NaiveDate;
use grocery_trends::{Connection, GroceryTrends, Item, PriceSeries, TimeEncoding};
use std::fs;
use std::path::Path;

/// Parse a `YYYY-MM-DD` literal.
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Build a series from `(date, price)` literals, keeping their order.
pub fn series(item: Item, rows: &[(&str, f64)]) -> PriceSeries {
    PriceSeries::from_pairs(item, rows.iter().map(|(d, p)| (date(d), *p)))
}

/// Write sample CSV files for every item into a fresh temp directory.
///
/// * milk  — three clean monthly rows, 10 → 12 → 14.
/// * bread — an extra column plus one bad date and one empty price.
/// * flour — first price is zero.
/// * eggs  — six rows, rising then falling.
///
/// The caller must keep the `TempDir` alive for the duration of the test.
pub fn setup_sample_dir() -> tempfile::TempDir {
    let tmp_dir = tempfile::tempdir().unwrap();
    let dir = tmp_dir.path();

    write_csv(
        dir,
        Item::Milk,
        "Date,Milk_Price\n\
         2020-01-01,10.0\n\
         2020-02-01,12.0\n\
         2020-03-01,14.0\n",
    );

    write_csv(
        dir,
        Item::Bread,
        "Date,Bread_Price,Store\n\
         2021-01-01,2.50,north\n\
         2021-06-01,2.75,north\n\
         not-a-date,3.10,south\n\
         2021-12-01,3.00,north\n\
         2022-06-01,,north\n",
    );

    write_csv(
        dir,
        Item::Flour,
        "Date,Flour_Price\n\
         2020-01-01,0.0\n\
         2020-02-01,1.0\n\
         2020-03-01,1.5\n",
    );

    write_csv(
        dir,
        Item::Eggs,
        "Date,Egg_Price\n\
         2020-01-01,2.00\n\
         2020-04-01,2.40\n\
         2020-07-01,2.80\n\
         2020-10-01,3.60\n\
         2021-01-01,3.20\n\
         2021-04-01,3.00\n",
    );

    tmp_dir
}

/// Write `contents` as the CSV file for `item` inside `dir`.
pub fn write_csv(dir: &Path, item: Item, contents: &str) {
    fs::write(dir.join(item.file_name()), contents).unwrap();
}

/// A `Connection` over the sample directory.
pub fn setup_sample_connection() -> (Connection, tempfile::TempDir) {
    let tmp_dir = setup_sample_dir();
    let conn = Connection::new(tmp_dir.path()).unwrap();
    (conn, tmp_dir)
}

/// A `GroceryTrends` facade over the sample directory, fitting in days.
pub fn setup_sample_trends() -> (GroceryTrends, tempfile::TempDir) {
    let tmp_dir = setup_sample_dir();
    let trends = GroceryTrends::builder()
        .data_dir(tmp_dir.path())
        .time_encoding(TimeEncoding::Days)
        .build()
        .unwrap();
    (trends, tmp_dir)
}

pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {} within {} of {}",
        actual,
        tol,
        expected
    );
}
