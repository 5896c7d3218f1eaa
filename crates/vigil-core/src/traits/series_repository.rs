use crate::errors::RepositoryError;
use crate::model::{Series, SeriesAnnotation, SeriesDataset};

/// Pull interface onto the time-series store.
///
/// `series` may be a wildcard pattern; implementations return one dataset per
/// matching series and instance, each with time-ordered samples. An empty
/// `instances` filter selects all instances.
pub trait SeriesRepository: Send + Sync {
    /// Datasets for the series (or pattern), restricted to `instances`.
    fn select_series(
        &self,
        series: &Series,
        instances: &[String],
    ) -> Result<Vec<SeriesDataset>, RepositoryError>;

    /// Annotations for the series (or pattern), restricted to `instances`.
    fn select_annotations(
        &self,
        series: &Series,
        instances: &[String],
    ) -> Result<Vec<SeriesAnnotation>, RepositoryError>;

    /// Every known series, one dataset per series and instance.
    fn select_all_series(&self) -> Result<Vec<SeriesDataset>, RepositoryError>;

    /// Names of all instances that reported data.
    fn instances(&self) -> Result<Vec<String>, RepositoryError>;
}
