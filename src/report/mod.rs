//! Report module - summarizing importance results

pub mod importance_report;
pub mod summary;

pub use importance_report::*;
pub use summary::*;
