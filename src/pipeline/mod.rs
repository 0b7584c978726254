//! Pipeline module - redundancy pruning, R² fitting and importance scoring

pub mod config;
pub mod correlation;
pub mod dataset;
pub mod error;
pub mod fit;
pub mod importance;
pub mod isolation;
pub mod regression;

pub use config::*;
pub use correlation::*;
pub use dataset::*;
pub use error::*;
pub use fit::*;
pub use importance::*;
pub use isolation::*;
pub use regression::*;
