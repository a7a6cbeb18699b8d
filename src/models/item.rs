use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrendError;

// ---------------------------------------------------------------------------
// Item — which grocery series (and therefore which price column) to analyze
// ---------------------------------------------------------------------------

/// A tracked grocery item.
///
/// Doubles as the price-field selector: each item owns exactly one price
/// column in its source file, resolved when the series is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Item {
    Milk,
    Bread,
    Flour,
    Eggs,
}

/// Selector naming the price column to analyze.
pub type PriceFieldSelector = Item;

impl Item {
    /// Every tracked item, in dashboard order.
    pub const ALL: [Item; 4] = [Item::Milk, Item::Bread, Item::Flour, Item::Eggs];

    /// Display label, e.g. `"Milk"`.
    pub fn label(&self) -> &'static str {
        match self {
            Item::Milk => "Milk",
            Item::Bread => "Bread",
            Item::Flour => "Flour",
            Item::Eggs => "Eggs",
        }
    }

    /// DuckDB table the item's CSV is registered under.
    pub fn table_name(&self) -> &'static str {
        match self {
            Item::Milk => "milk",
            Item::Bread => "bread",
            Item::Flour => "flour",
            Item::Eggs => "eggs",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Item::Milk => "milk_data_cleaned.csv",
            Item::Bread => "bread_data_cleaned.csv",
            Item::Flour => "flour_data_cleaned.csv",
            Item::Eggs => "eggs_data_cleaned.csv",
        }
    }

    /// Price column inside the item's CSV. Note eggs use the singular `Egg_Price`.
    pub fn price_column(&self) -> &'static str {
        match self {
            Item::Milk => "Milk_Price",
            Item::Bread => "Bread_Price",
            Item::Flour => "Flour_Price",
            Item::Eggs => "Egg_Price",
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Item {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "milk" => Ok(Item::Milk),
            "bread" => Ok(Item::Bread),
            "flour" => Ok(Item::Flour),
            "eggs" | "egg" => Ok(Item::Eggs),
            other => Err(TrendError::InvalidArgument(format!("Unknown item: {}", other))),
        }
    }
}
