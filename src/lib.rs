//! rsquared: Feature Importance Library
//!
//! Scores the features of a numeric dataset by how much R² a linear fit loses
//! when each feature is withheld, with correlation-based redundancy pruning
//! and model-free target correlations alongside.

pub mod pipeline;
pub mod report;
pub mod utils;
