//! Dispatch planning: execution mode selection and outbound parameters.
//!
//! [`plan`] turns an [`OperationRequest`] into a [`DispatchPlan`] without
//! performing any I/O. The plan carries the endpoint path, the execution mode
//! and the exact parameter mapping to send as the GET query string.
//!
//! # Mode selection
//!
//! - `google_maps_search` runs asynchronously when more than 10 queries are
//!   submitted and more than one place per query is requested.
//! - `google_maps_reviews` runs asynchronously when `reviews_limit` exceeds
//!   499, when it is `0` (unlimited), or when more than 10 queries are
//!   submitted.
//! - Every other operation is synchronous.
//!
//! ```rust
//! use outscraper_mcp::dispatch::plan;
//! use outscraper_mcp::models::{ExecutionMode, OperationRequest, PlaceSearchOptions};
//!
//! let request = OperationRequest::PlaceSearch {
//!     query: "coffee shops san francisco".into(),
//!     options: PlaceSearchOptions::default(),
//! };
//! let plan = plan(&request).unwrap();
//! assert_eq!(plan.mode, ExecutionMode::Sync);
//! assert!(!plan.contains("region"));
//! ```

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::OutscraperError;
use crate::models::{ExecutionMode, Operation, OperationRequest, ResponseShape};

/// Queries above which batch calls switch to async jobs
const MAX_SYNC_QUERIES: usize = 10;

/// Reviews-per-place above which review extraction switches to async jobs
const MAX_SYNC_REVIEWS: u32 = 499;

/// A single outbound parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl ParamValue {
    /// Wire encodings of this value; lists expand to one entry per element
    fn encode(&self) -> Vec<String> {
        match self {
            ParamValue::Bool(b) => vec![b.to_string()],
            ParamValue::Int(i) => vec![i.to_string()],
            ParamValue::Str(s) => vec![s.clone()],
            ParamValue::List(items) => items.clone(),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

/// The outcome of planning one call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchPlan {
    pub operation: Operation,
    pub mode: ExecutionMode,
    pub path: &'static str,
    /// Outbound parameters keyed by wire name; absent options have no key
    pub params: BTreeMap<&'static str, ParamValue>,
    /// Cap applied to each per-query group of normalized records
    pub result_limit: Option<usize>,
}

impl DispatchPlan {
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// How the synchronous payload of this operation nests its entities
    pub fn shape(&self) -> ResponseShape {
        self.operation.response_shape()
    }

    /// Key/value pairs for the query string, lists repeated per element
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.params
            .iter()
            .flat_map(|(key, value)| value.encode().into_iter().map(move |v| (*key, v)))
            .collect()
    }

    /// Percent-encoded query string, e.g. `async=false&query=a&query=b`
    pub fn query_string(&self) -> String {
        self.query_pairs()
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Mode for `google_maps_search`
pub fn place_search_mode(query_count: usize, limit: u32) -> ExecutionMode {
    if query_count > MAX_SYNC_QUERIES && limit > 1 {
        ExecutionMode::Async
    } else {
        ExecutionMode::Sync
    }
}

/// Mode for `google_maps_reviews`; a `reviews_limit` of 0 means unlimited
pub fn place_reviews_mode(query_count: usize, reviews_limit: u32) -> ExecutionMode {
    if reviews_limit > MAX_SYNC_REVIEWS || reviews_limit == 0 || query_count > MAX_SYNC_QUERIES {
        ExecutionMode::Async
    } else {
        ExecutionMode::Sync
    }
}

/// Accumulates outbound parameters, dropping absent optional values
#[derive(Debug, Default)]
struct Params(BTreeMap<&'static str, ParamValue>);

impl Params {
    fn set(&mut self, key: &'static str, value: impl Into<ParamValue>) -> &mut Self {
        self.0.insert(key, value.into());
        self
    }

    fn set_text(&mut self, key: &'static str, value: Option<&String>) -> &mut Self {
        if let Some(value) = value.map(|v| v.trim()).filter(|v| !v.is_empty()) {
            self.0.insert(key, ParamValue::from(value));
        }
        self
    }

    /// Zero counts as absent
    fn set_timestamp(&mut self, key: &'static str, value: Option<i64>) -> &mut Self {
        if let Some(value) = value.filter(|v| *v != 0) {
            self.0.insert(key, ParamValue::Int(value));
        }
        self
    }

    fn set_list(&mut self, key: &'static str, value: Option<&Vec<String>>) -> &mut Self {
        if let Some(items) = value.filter(|items| !items.is_empty()) {
            self.0.insert(key, ParamValue::List(items.clone()));
        }
        self
    }

    fn into_inner(self) -> BTreeMap<&'static str, ParamValue> {
        self.0
    }
}

/// Plan one call: pick the execution mode and build the outbound parameters
///
/// Rejects an empty query input; every other malformation is expected to be
/// caught when the request is built.
pub fn plan(request: &OperationRequest) -> Result<DispatchPlan, OutscraperError> {
    let operation = request.operation();
    let query = request.query();
    query.validate()?;

    let queries = query.to_vec();
    let query_count = queries.len();

    let mut params = Params::default();
    params.set("query", queries);

    let mut mode = ExecutionMode::Sync;
    let mut result_limit = None;

    match request {
        OperationRequest::PlaceSearch { options, .. } => {
            mode = place_search_mode(query_count, options.limit);
            result_limit = Some(options.limit as usize);
            params
                .set("language", options.language.as_str())
                .set("organizationsPerQueryLimit", options.limit)
                .set("async", mode.is_async())
                .set("dropDuplicates", options.drop_duplicates)
                .set_text("region", options.region.as_ref())
                .set_list("enrichment", options.enrichment.as_ref());
        }
        OperationRequest::PlaceReviews { options, .. } => {
            mode = place_reviews_mode(query_count, options.reviews_limit);
            params
                .set("reviewsLimit", options.reviews_limit)
                .set("limit", options.limit)
                .set("sort", options.sort.as_str())
                .set("language", options.language.as_str())
                .set("async", mode.is_async())
                .set_text("region", options.region.as_ref())
                .set_timestamp("cutoff", options.cutoff);
        }
        OperationRequest::PlacePhotos { options, .. } => {
            params
                .set("photosLimit", options.photos_limit)
                .set("limit", options.limit)
                .set("language", options.language.as_str())
                .set_text("region", options.region.as_ref());
        }
        OperationRequest::Directions { options, .. } => {
            params
                .set("travelMode", options.travel_mode.as_str())
                .set("language", options.language.as_str())
                .set_timestamp("departureTime", options.departure_time);
        }
        OperationRequest::WebSearch { options, .. } => {
            params
                .set("pagesPerQuery", options.pages_per_query)
                .set("language", options.language.as_str())
                .set_text("region", options.region.as_ref());
        }
        OperationRequest::NewsSearch { options, .. } => {
            params
                .set("pagesPerQuery", options.pages_per_query)
                .set("language", options.language.as_str())
                .set_text("region", options.region.as_ref())
                .set_text("tbs", options.tbs.as_ref());
        }
        OperationRequest::AppReviews { options, .. } => {
            params
                .set("reviewsLimit", options.reviews_limit)
                .set("sort", options.sort.as_str())
                .set("language", options.language.as_str());
        }
        OperationRequest::ContactExtraction { .. } => {}
    }

    tracing::debug!(
        operation = %operation,
        mode = %mode,
        queries = query_count,
        "planned dispatch"
    );

    Ok(DispatchPlan {
        operation,
        mode,
        path: operation.path(),
        params: params.into_inner(),
        result_limit,
    })
}
