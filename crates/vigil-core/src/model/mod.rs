//! Data model: series identity, metrics, samples, datasets, annotations.

pub mod annotation;
pub mod dataset;
pub mod metric;
pub mod sample;
pub mod series;
pub mod unit;

pub use annotation::SeriesAnnotation;
pub use dataset::SeriesDataset;
pub use metric::Metric;
pub use sample::Sample;
pub use series::Series;
pub use unit::Unit;
