//! # vigil-core
//!
//! Foundation crate for the Vigil alerting engine.
//! Defines series identity, samples, the repository port, errors, config,
//! and tracing setup. Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod model;
pub mod repository;
pub mod traits;
pub mod tracing_setup;

// Re-export the most commonly used types at the crate root.
pub use config::VigilConfig;
pub use errors::{InvalidMetricError, InvalidSeriesError, RepositoryError, WatchError};
pub use model::{Metric, Sample, Series, SeriesAnnotation, SeriesDataset, Unit};
pub use traits::SeriesRepository;
