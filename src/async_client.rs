//! Async wrapper around [`GroceryTrends`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every operation on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! DuckDB reads CSV files and the engine crunches numbers.
//!
//! # Example
//!
//! ```no_run
//! use grocery_trends::{AsyncGroceryTrends, DateWindow, Item};
//!
//! #[tokio::main]
//! async fn main() {
//!     let trends = AsyncGroceryTrends::builder().data_dir("data").build().await.unwrap();
//!
//!     let report = trends.report(Item::Eggs, DateWindow::unbounded()).await.unwrap();
//!
//!     // Any sync method via closure
//!     let tables = trends.run(|t| Ok(t.tables())).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Result, TrendError};
use crate::models::{DateWindow, Insights, Item, ItemReport, PriceSeries, TimeEncoding, TrendResult};
use crate::{config, GroceryTrends};

// ---------------------------------------------------------------------------
// AsyncGroceryTrendsBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncGroceryTrends`] instance.
pub struct AsyncGroceryTrendsBuilder {
    data_dir: Option<PathBuf>,
    time_encoding: TimeEncoding,
    cache_results: bool,
}

impl Default for AsyncGroceryTrendsBuilder {
    fn default() -> Self {
        Self {
            data_dir: None,
            time_encoding: config::DEFAULT_TIME_ENCODING,
            cache_results: true,
        }
    }
}

impl AsyncGroceryTrendsBuilder {
    /// Set the directory holding the item CSV files.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set how dates are encoded for trend fitting.
    pub fn time_encoding(mut self, encoding: TimeEncoding) -> Self {
        self.time_encoding = encoding;
        self
    }

    /// Enable or disable memoization of item reports.
    pub fn cache_results(mut self, enabled: bool) -> Self {
        self.cache_results = enabled;
        self
    }

    /// Build the async wrapper; initialization runs on the blocking pool.
    pub async fn build(self) -> Result<AsyncGroceryTrends> {
        tokio::task::spawn_blocking(move || {
            let mut builder = GroceryTrends::builder()
                .time_encoding(self.time_encoding)
                .cache_results(self.cache_results);
            if let Some(dir) = self.data_dir {
                builder = builder.data_dir(dir);
            }
            let trends = builder.build()?;
            Ok(AsyncGroceryTrends {
                inner: Arc::new(Mutex::new(trends)),
            })
        })
        .await
        .map_err(|e| TrendError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncGroceryTrends
// ---------------------------------------------------------------------------

/// Async wrapper around [`GroceryTrends`].
///
/// The inner instance uses `RefCell` internally, so it sits behind a
/// [`Mutex`] and operations are serialized. Cloning shares the same instance.
#[derive(Clone)]
pub struct AsyncGroceryTrends {
    inner: Arc<Mutex<GroceryTrends>>,
}

impl AsyncGroceryTrends {
    /// Create a new builder.
    pub fn builder() -> AsyncGroceryTrendsBuilder {
        AsyncGroceryTrendsBuilder::default()
    }

    /// Run a sync operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&GroceryTrends) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let trends = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = trends
                .lock()
                .map_err(|_| TrendError::InvalidArgument("GroceryTrends lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| TrendError::InvalidArgument(format!("Task join error: {e}")))?
    }

    pub async fn series(&self, item: Item) -> Result<PriceSeries> {
        self.run(move |t| t.series(item)).await
    }

    pub async fn default_window(&self) -> Result<DateWindow> {
        self.run(|t| t.default_window()).await
    }

    pub async fn insights(&self, item: Item, window: DateWindow) -> Result<Insights> {
        self.run(move |t| t.insights(item, &window)).await
    }

    pub async fn trend(&self, item: Item, window: DateWindow) -> Result<TrendResult> {
        self.run(move |t| t.trend(item, &window)).await
    }

    pub async fn report(&self, item: Item, window: DateWindow) -> Result<ItemReport> {
        self.run(move |t| t.report(item, &window)).await
    }

    pub async fn overview(&self, items: Vec<Item>, window: DateWindow) -> Result<Vec<PriceSeries>> {
        self.run(move |t| t.overview(&items, &window)).await
    }

    pub async fn reload(&self) -> Result<()> {
        self.run(|t| t.reload()).await
    }
}
