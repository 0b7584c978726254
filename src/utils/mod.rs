//! Utility helpers shared by the pipeline and reports

pub mod progress;

pub use progress::*;
