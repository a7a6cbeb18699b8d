//! DuckDB connection wrapper: registers item CSV files as tables and
//! extracts price series from them.
//!
//! Tables are registered lazily on first access. Schema introspection checks
//! that the expected date and price columns exist before anything is read.

use crate::config;
use crate::error::{Result, TrendError};
use crate::models::{Item, PriceRecord, PriceSeries};
use chrono::NaiveDate;
use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Days between 0001-01-01 (CE day 1) and 1970-01-01.
const UNIX_EPOCH_CE_DAYS: i32 = 719_163;

/// A raw row as extracted from an item table, before validation.
#[derive(Debug, Deserialize)]
struct RawPriceRow {
    date: Option<String>,
    price: Option<f64>,
}

/// Wraps an in-memory DuckDB database holding one table per item CSV.
pub struct Connection {
    conn: DuckDbConnection,
    data_dir: PathBuf,
    registered_tables: RefCell<HashSet<String>>,
}

impl Connection {
    /// Create a connection that reads item files from `data_dir`.
    ///
    /// Opens an in-memory DuckDB database. No file is read until a table is
    /// first needed.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            conn,
            data_dir: data_dir.as_ref().to_path_buf(),
            registered_tables: RefCell::new(HashSet::new()),
        })
    }

    /// Directory item CSV files are read from.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Ensure the tables for one or more items are registered.
    pub fn ensure_tables(&self, items: &[Item]) -> Result<()> {
        for item in items {
            if !self.registered_tables.borrow().contains(item.table_name()) {
                self.ensure_table(*item)?;
            }
        }
        Ok(())
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the statement has run
        let column_names: Vec<String> = rows
            .as_ref()
            .map(|s| s.column_names().into_iter().map(|c| c.to_string()).collect())
            .unwrap_or_default();

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, col_name) in column_names.iter().enumerate() {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Create a DuckDB table from a CSV file with a header row.
    ///
    /// Column types are sniffed by DuckDB. Replaces any existing table of the
    /// same name.
    pub fn register_table_from_csv<P: AsRef<Path>>(&self, table_name: &str, csv_path: P) -> Result<()> {
        let path_fwd = csv_path.as_ref().to_string_lossy().replace('\\', "/");
        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {}; \
             CREATE TABLE {} AS SELECT * FROM read_csv_auto('{}', header = true)",
            table_name,
            table_name,
            path_fwd.replace('\'', "''")
        ))?;
        self.registered_tables
            .borrow_mut()
            .insert(table_name.to_string());
        tracing::debug!(table = table_name, path = %path_fwd, "registered table");
        Ok(())
    }

    /// Column names of a registered table, in declaration order.
    pub fn table_columns(&self, table_name: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT column_name FROM (DESCRIBE {})", table_name))?;
        let mut rows = stmt.query([])?;
        let mut columns = Vec::new();
        while let Some(row) = rows.next()? {
            columns.push(row.get::<_, String>(0)?);
        }
        Ok(columns)
    }

    /// Read an item's price series in file order.
    ///
    /// Rows whose date or price cannot be parsed, or whose price is negative
    /// or not finite, are dropped (and counted in a `warn` event); the
    /// remaining order is kept as-is, never re-sorted.
    pub fn load_series(&self, item: Item) -> Result<PriceSeries> {
        self.ensure_tables(&[item])?;

        let table = item.table_name();
        let price_col = item.price_column();
        let columns = self.table_columns(table)?;
        for required in [config::DATE_COLUMN, price_col] {
            if !columns.iter().any(|c| c == required) {
                return Err(TrendError::NotFound(format!(
                    "Column '{}' missing from {} data (found: {})",
                    required,
                    item,
                    columns.join(", ")
                )));
            }
        }

        let sql = format!(
            "SELECT CAST(TRY_CAST(\"{}\" AS DATE) AS VARCHAR) AS date, \
             TRY_CAST(\"{}\" AS DOUBLE) AS price \
             FROM {} ORDER BY rowid",
            config::DATE_COLUMN,
            price_col,
            table
        );
        let raw: Vec<RawPriceRow> = self.execute_into(&sql, &[])?;
        let total = raw.len();

        let records: Vec<PriceRecord> = raw
            .into_iter()
            .filter_map(|row| {
                let date = NaiveDate::parse_from_str(row.date.as_deref()?, "%Y-%m-%d").ok()?;
                Some(PriceRecord::new(date, row.price?))
            })
            .filter(PriceRecord::has_valid_price)
            .collect();

        let dropped = total - records.len();
        if dropped > 0 {
            tracing::warn!(item = %item, dropped, total, "dropped rows with unparseable date or invalid price");
        }

        Ok(PriceSeries::new(item, records))
    }

    /// Check whether a table has been registered.
    pub fn has_table(&self, name: &str) -> bool {
        self.registered_tables.borrow().contains(name)
    }

    /// Return a list of all registered table names.
    pub fn tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registered_tables.borrow().iter().cloned().collect();
        names.sort();
        names
    }

    /// Forget all registered tables so item files are re-read on next access.
    pub fn reset_tables(&self) -> Result<()> {
        let names: Vec<String> = self.registered_tables.borrow_mut().drain().collect();
        for name in names {
            self.conn
                .execute_batch(&format!("DROP TABLE IF EXISTS {}", name))?;
        }
        Ok(())
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }

    fn ensure_table(&self, item: Item) -> Result<()> {
        let path = self.data_dir.join(item.file_name());
        if !path.exists() {
            return Err(TrendError::NotFound(format!(
                "{} data file {} not found",
                item,
                path.display()
            )));
        }
        self.register_table_from_csv(item.table_name(), &path)
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).to_string()),
        ValueRef::Date32(days) => NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_CE_DAYS)
            .map(|d| serde_json::Value::String(d.to_string()))
            .unwrap_or(serde_json::Value::Null),
        // Timestamps, lists, structs etc. are expected to be cast in SQL
        _ => serde_json::Value::Null,
    }
}
