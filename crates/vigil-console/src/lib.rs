//! # vigil-console
//!
//! The operations a monitoring console needs: series queries that bundle
//! data, annotations, watches and alerts, optionally grouped by series, plus
//! alert acknowledgement and watch management. Transport is left to the
//! embedder; every request and response type is serde-ready.

pub mod console;
pub mod errors;
pub mod grouping;
pub mod requests;
pub mod responses;

pub use console::Console;
pub use errors::ConsoleError;
pub use grouping::group_by_series;
pub use requests::{DataType, SeriesQuery, SeriesRequest};
pub use responses::{
    AlertData, AlertsResponse, AnnotationData, CircumstanceData, ConditionData, SeriesData,
    SeriesMatch, SeriesResponse, WatchData, WatchesResponse,
};
