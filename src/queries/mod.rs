//! Query modules.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and returns typed results.

pub mod prices;

pub use prices::PriceQuery;
