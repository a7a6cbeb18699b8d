pub mod item;
pub mod report;
pub mod series;

pub use item::*;
pub use report::*;
pub use series::*;
