//! Grocery price trends for Rust.
//!
//! Loads per-item price histories (milk, bread, flour, eggs) from CSV files
//! into an in-process DuckDB database, restricts them to a date window, and
//! computes descriptive insights plus an ordinary least-squares trend line.
//!
//! The analysis engine in [`analysis`] is pure and can be used on its own with
//! any [`PriceSeries`]; [`GroceryTrends`] adds file loading and memoization
//! on top for presentation layers.
//!
//! # Quick start
//!
//! ```no_run
//! use grocery_trends::{GroceryTrends, Item};
//!
//! let trends = GroceryTrends::builder().data_dir("data").build().unwrap();
//!
//! let window = trends.default_window().unwrap();
//! let report = trends.report(Item::Milk, &window).unwrap();
//! println!("{}", report.insights);
//! println!("slope per day: {}", report.trend.slope_per_day());
//! ```

pub mod analysis;
#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod queries;

#[cfg(feature = "async")]
pub use async_client::AsyncGroceryTrends;
pub use cache::{CacheStats, ReportKey, ResultCache};
pub use connection::Connection;
pub use error::{Result, TrendError};
pub use models::{
    DateWindow, Insights, Item, ItemReport, PriceFieldSelector, PriceRecord, PriceSeries,
    TimeEncoding, TrendPoint, TrendResult,
};

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// GroceryTrendsBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`GroceryTrends`] instance.
///
/// Use [`GroceryTrends::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](GroceryTrendsBuilder::build).
pub struct GroceryTrendsBuilder {
    data_dir: Option<PathBuf>,
    time_encoding: TimeEncoding,
    cache_results: bool,
}

impl Default for GroceryTrendsBuilder {
    fn default() -> Self {
        Self {
            data_dir: None,
            time_encoding: config::DEFAULT_TIME_ENCODING,
            cache_results: true,
        }
    }
}

impl GroceryTrendsBuilder {
    /// Set the directory holding the item CSV files.
    ///
    /// If not set, the platform data directory is used (e.g.
    /// `~/.local/share/grocery-trends` on Linux).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set how dates are encoded for trend fitting. Defaults to
    /// [`TimeEncoding::Seconds`].
    pub fn time_encoding(mut self, encoding: TimeEncoding) -> Self {
        self.time_encoding = encoding;
        self
    }

    /// Enable or disable memoization of item reports. Defaults to `true`.
    pub fn cache_results(mut self, enabled: bool) -> Self {
        self.cache_results = enabled;
        self
    }

    /// Build the instance and open the DuckDB connection.
    ///
    /// Item files are not read until first queried.
    pub fn build(self) -> Result<GroceryTrends> {
        let data_dir = self.data_dir.unwrap_or_else(config::default_data_dir);
        let conn = Connection::new(data_dir)?;
        Ok(GroceryTrends {
            conn,
            encoding: self.time_encoding,
            cache_results: self.cache_results,
            reports: RefCell::new(ResultCache::new()),
        })
    }
}

// ---------------------------------------------------------------------------
// GroceryTrends
// ---------------------------------------------------------------------------

/// The main entry point: item loading, windowing and trend analysis.
///
/// Every analysis method takes the item and window as explicit arguments;
/// the instance holds no "current selection". Created via
/// [`GroceryTrends::builder()`].
pub struct GroceryTrends {
    conn: Connection,
    encoding: TimeEncoding,
    cache_results: bool,
    reports: RefCell<ResultCache<ReportKey, ItemReport>>,
}

impl GroceryTrends {
    /// Create a new builder.
    pub fn builder() -> GroceryTrendsBuilder {
        GroceryTrendsBuilder::default()
    }

    /// Access the price query interface.
    pub fn prices(&self) -> queries::prices::PriceQuery<'_> {
        queries::prices::PriceQuery::new(&self.conn)
    }

    /// The time encoding used for trend fits.
    pub fn time_encoding(&self) -> TimeEncoding {
        self.encoding
    }

    /// The full series for an item, in file order.
    pub fn series(&self, item: Item) -> Result<PriceSeries> {
        self.prices().series(item)
    }

    /// The window spanning the first to the last milk observation.
    ///
    /// Milk is the reference item for the default date range. Falls back to
    /// an unbounded window if it has no usable rows.
    pub fn default_window(&self) -> Result<DateWindow> {
        Ok(self
            .prices()
            .date_bounds(Item::Milk)?
            .unwrap_or_else(DateWindow::unbounded))
    }

    /// Insights for an item over `window`.
    pub fn insights(&self, item: Item, window: &DateWindow) -> Result<Insights> {
        let filtered = self.prices().history(item, window)?;
        analysis::compute_insights(&filtered)
    }

    /// Trend line for an item over `window`.
    pub fn trend(&self, item: Item, window: &DateWindow) -> Result<TrendResult> {
        let filtered = self.prices().history(item, window)?;
        analysis::fit_trend(&filtered, self.encoding)
    }

    /// Windowed series, insights and trend for one item.
    ///
    /// Successful reports are memoized per `(item, window, encoding)` unless
    /// caching was disabled on the builder.
    pub fn report(&self, item: Item, window: &DateWindow) -> Result<ItemReport> {
        let compute = || {
            let series = self.series(item)?;
            analysis::analyze(&series, window, self.encoding)
        };

        if !self.cache_results {
            return compute();
        }

        let key = ReportKey {
            item,
            window: *window,
            encoding: self.encoding,
        };
        self.reports.borrow_mut().get_or_try_insert_with(key, compute)
    }

    /// Windowed series for each selected item, for a combined chart.
    pub fn overview(&self, items: &[Item], window: &DateWindow) -> Result<Vec<PriceSeries>> {
        self.prices().combined(items, window)
    }

    /// Hit/miss counters of the report cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.reports.borrow().stats()
    }

    /// Drop every memoized report.
    pub fn clear_cache(&self) {
        self.reports.borrow_mut().clear();
    }

    /// Re-read item files on next access and drop memoized reports.
    ///
    /// Call after the CSV files on disk have changed.
    pub fn reload(&self) -> Result<()> {
        self.conn.reset_tables()?;
        let dropped = self.reports.borrow().len();
        self.clear_cache();
        tracing::info!(dropped_reports = dropped, "item tables reset; reports cleared");
        Ok(())
    }

    /// Names of the item tables currently loaded into DuckDB.
    pub fn tables(&self) -> Vec<String> {
        self.conn.tables()
    }

    /// Execute a raw SQL query against the DuckDB database.
    ///
    /// Item tables are only present once loaded (see [`tables()`](Self::tables)).
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Return a reference to the underlying [`Connection`].
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for GroceryTrends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.cache_stats();
        write!(
            f,
            "GroceryTrends(data_dir={}, tables=[{}], encoding={:?}, cached_reports={})",
            self.conn.data_dir().display(),
            self.conn.tables().join(", "),
            self.encoding,
            stats.entries
        )
    }
}
