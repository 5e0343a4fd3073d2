//! Operation catalogue, query input and execution mode.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::OutscraperError;

/// One of the eight remote query types exposed as tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    PlaceSearch,
    PlaceReviews,
    PlacePhotos,
    Directions,
    WebSearch,
    NewsSearch,
    AppReviews,
    ContactExtraction,
}

impl Operation {
    /// Every operation, in tool listing order
    pub const ALL: [Operation; 8] = [
        Operation::PlaceSearch,
        Operation::PlaceReviews,
        Operation::PlacePhotos,
        Operation::Directions,
        Operation::WebSearch,
        Operation::NewsSearch,
        Operation::AppReviews,
        Operation::ContactExtraction,
    ];

    /// MCP tool name for this operation
    pub fn tool_name(&self) -> &'static str {
        match self {
            Operation::PlaceSearch => "google_maps_search",
            Operation::PlaceReviews => "google_maps_reviews",
            Operation::PlacePhotos => "google_maps_photos",
            Operation::Directions => "google_maps_directions",
            Operation::WebSearch => "google_search",
            Operation::NewsSearch => "google_search_news",
            Operation::AppReviews => "google_play_reviews",
            Operation::ContactExtraction => "emails_and_contacts",
        }
    }

    /// Look up an operation by its tool name
    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.tool_name() == name)
    }

    /// Remote endpoint path, relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Operation::PlaceSearch => "/maps/search-v3",
            Operation::PlaceReviews => "/maps/reviews-v3",
            Operation::PlacePhotos => "/maps/photos",
            Operation::Directions => "/maps/directions",
            Operation::WebSearch => "/google-search-v3",
            Operation::NewsSearch => "/google-search-news",
            Operation::AppReviews => "/google-play-reviews",
            Operation::ContactExtraction => "/emails-and-contacts",
        }
    }

    /// Field that identifies one entity in this operation's records
    pub fn identity_field(&self) -> Option<&'static str> {
        match self {
            Operation::PlaceSearch | Operation::PlaceReviews | Operation::PlacePhotos => {
                Some("place_id")
            }
            Operation::Directions => None,
            Operation::WebSearch | Operation::NewsSearch => Some("link"),
            Operation::AppReviews => Some("review_id"),
            Operation::ContactExtraction => Some("domain"),
        }
    }

    /// Documented nesting of the synchronous `data` payload
    pub fn response_shape(&self) -> ResponseShape {
        match self {
            Operation::PlaceSearch
            | Operation::WebSearch
            | Operation::NewsSearch
            | Operation::AppReviews => ResponseShape::GroupedPerQuery,
            Operation::PlaceReviews
            | Operation::PlacePhotos
            | Operation::Directions
            | Operation::ContactExtraction => ResponseShape::Detect,
        }
    }

    /// Short human-readable description, used for tool listings
    pub fn description(&self) -> &'static str {
        match self {
            Operation::PlaceSearch => "Search for businesses and places on Google Maps",
            Operation::PlaceReviews => "Extract reviews from Google Maps places",
            Operation::PlacePhotos => "Extract photos from Google Maps places",
            Operation::Directions => "Get directions between locations",
            Operation::WebSearch => "Perform Google web search",
            Operation::NewsSearch => "Search Google News",
            Operation::AppReviews => "Extract Google Play Store app reviews",
            Operation::ContactExtraction => "Extract emails and contacts from domains",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}

/// Calling convention used for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Results come back in the response body under `data`
    Sync,
    /// The response is a job/status envelope
    Async,
}

impl ExecutionMode {
    pub fn is_async(&self) -> bool {
        matches!(self, ExecutionMode::Async)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Sync => f.write_str("sync"),
            ExecutionMode::Async => f.write_str("async"),
        }
    }
}

/// How a synchronous payload nests its entities
///
/// Endpoints that answer one result group per submitted query wrap their
/// entities in one extra array level. Where that is documented the shape is
/// fixed per operation; elsewhere the normalizer sniffs the first element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `data` is a list of per-query groups, each a list of entities
    GroupedPerQuery,
    /// Unwrap one level only if the first element is itself a list
    Detect,
}

/// A single free-text query or an ordered list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryInput {
    Single(String),
    Many(Vec<String>),
}

impl QueryInput {
    /// Number of queries submitted
    pub fn len(&self) -> usize {
        match self {
            QueryInput::Single(_) => 1,
            QueryInput::Many(queries) => queries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The queries as an ordered list; a single string becomes a one-element list
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            QueryInput::Single(query) => vec![query.clone()],
            QueryInput::Many(queries) => queries.clone(),
        }
    }

    /// Reject empty lists and blank query strings
    pub fn validate(&self) -> Result<(), OutscraperError> {
        match self {
            QueryInput::Single(query) if query.trim().is_empty() => Err(
                OutscraperError::InvalidInput("query must not be empty".to_string()),
            ),
            QueryInput::Many(queries) if queries.is_empty() => Err(
                OutscraperError::InvalidInput("query list must not be empty".to_string()),
            ),
            QueryInput::Many(queries) => match queries.iter().position(|q| q.trim().is_empty()) {
                Some(idx) => Err(OutscraperError::InvalidInput(format!(
                    "query at position {} is empty",
                    idx
                ))),
                None => Ok(()),
            },
            QueryInput::Single(_) => Ok(()),
        }
    }
}

impl From<&str> for QueryInput {
    fn from(query: &str) -> Self {
        QueryInput::Single(query.to_string())
    }
}

impl From<String> for QueryInput {
    fn from(query: String) -> Self {
        QueryInput::Single(query)
    }
}

impl From<Vec<String>> for QueryInput {
    fn from(queries: Vec<String>) -> Self {
        QueryInput::Many(queries)
    }
}

impl From<Vec<&str>> for QueryInput {
    fn from(queries: Vec<&str>) -> Self {
        QueryInput::Many(queries.into_iter().map(String::from).collect())
    }
}
