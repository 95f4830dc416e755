//! Core building blocks shared by every model: series container,
//! configuration types, differencing, metrics, and defaults.

pub mod config;
pub mod defaults;
pub mod difference;
pub mod metrics;
pub mod series;
