//! Ports consumed by the engine.

pub mod cancellation;
pub mod series_repository;

pub use cancellation::{Cancellable, CancellationToken};
pub use series_repository::SeriesRepository;
