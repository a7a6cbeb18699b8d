use std::collections::HashMap;
use std::path::PathBuf;

use crate::analysis::TimeEncoding;
use crate::models::Item;

/// Name of the date column every item file carries.
pub const DATE_COLUMN: &str = "Date";

pub const DEFAULT_TIME_ENCODING: TimeEncoding = TimeEncoding::Seconds;

/// Table name -> CSV file name, relative to the data directory.
pub fn item_files() -> HashMap<&'static str, &'static str> {
    Item::ALL
        .iter()
        .map(|item| (item.table_name(), item.file_name()))
        .collect()
}

/// Table name -> price column inside that item's CSV.
pub fn price_columns() -> HashMap<&'static str, &'static str> {
    Item::ALL
        .iter()
        .map(|item| (item.table_name(), item.price_column()))
        .collect()
}

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("grocery-trends")
    } else {
        PathBuf::from(".grocery-trends-data")
    }
}
