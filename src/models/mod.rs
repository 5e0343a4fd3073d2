//! Core data models for operations, requests and normalized records.

mod operation;
mod options;
mod record;

pub use operation::{ExecutionMode, Operation, QueryInput, ResponseShape};
pub use options::{
    AppReviewSort, AppReviewsOptions, DirectionsOptions, NewsSearchOptions, OperationRequest,
    PlacePhotosOptions, PlaceReviewSort, PlaceReviewsOptions, PlaceSearchOptions,
    TravelMode, WebSearchOptions,
};
pub use record::NormalizedRecord;
