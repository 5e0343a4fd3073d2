//! Typed per-operation options and the request union handed to the planner.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::operation::{Operation, QueryInput};
use crate::error::OutscraperError;

fn default_language() -> String {
    "en".to_string()
}

fn default_search_limit() -> u32 {
    20
}

fn default_one() -> u32 {
    1
}

fn default_place_reviews_limit() -> u32 {
    10
}

fn default_photos_limit() -> u32 {
    20
}

fn default_app_reviews_limit() -> u32 {
    100
}

/// Review ordering for Google Maps places
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceReviewSort {
    #[default]
    MostRelevant,
    Newest,
    HighestRating,
    LowestRating,
}

impl PlaceReviewSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceReviewSort::MostRelevant => "most_relevant",
            PlaceReviewSort::Newest => "newest",
            PlaceReviewSort::HighestRating => "highest_rating",
            PlaceReviewSort::LowestRating => "lowest_rating",
        }
    }
}

/// Review ordering for Google Play apps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppReviewSort {
    #[default]
    MostRelevant,
    Newest,
    Rating,
}

impl AppReviewSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppReviewSort::MostRelevant => "most_relevant",
            AppReviewSort::Newest => "newest",
            AppReviewSort::Rating => "rating",
        }
    }
}

/// Travel mode for directions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}

/// Options for `google_maps_search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSearchOptions {
    /// Places per query; also caps the normalized result list
    #[serde(default = "default_search_limit")]
    pub limit: u32,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub drop_duplicates: bool,

    /// Extra services to run, e.g. `domains_service`
    #[serde(default)]
    pub enrichment: Option<Vec<String>>,
}

impl Default for PlaceSearchOptions {
    fn default() -> Self {
        Self {
            limit: default_search_limit(),
            language: default_language(),
            region: None,
            drop_duplicates: false,
            enrichment: None,
        }
    }
}

/// Options for `google_maps_reviews`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceReviewsOptions {
    /// Reviews per place; `0` means unlimited
    #[serde(default = "default_place_reviews_limit")]
    pub reviews_limit: u32,

    /// Places per query
    #[serde(default = "default_one")]
    pub limit: u32,

    #[serde(default)]
    pub sort: PlaceReviewSort,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub region: Option<String>,

    /// Unix timestamp; only reviews after it are returned
    #[serde(default)]
    pub cutoff: Option<i64>,
}

impl Default for PlaceReviewsOptions {
    fn default() -> Self {
        Self {
            reviews_limit: default_place_reviews_limit(),
            limit: 1,
            sort: PlaceReviewSort::default(),
            language: default_language(),
            region: None,
            cutoff: None,
        }
    }
}

/// Options for `google_maps_photos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacePhotosOptions {
    #[serde(default = "default_photos_limit")]
    pub photos_limit: u32,

    #[serde(default = "default_one")]
    pub limit: u32,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub region: Option<String>,
}

impl Default for PlacePhotosOptions {
    fn default() -> Self {
        Self {
            photos_limit: default_photos_limit(),
            limit: 1,
            language: default_language(),
            region: None,
        }
    }
}

/// Options for `google_maps_directions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsOptions {
    #[serde(default)]
    pub travel_mode: TravelMode,

    /// Unix timestamp of departure
    #[serde(default)]
    pub departure_time: Option<i64>,

    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for DirectionsOptions {
    fn default() -> Self {
        Self {
            travel_mode: TravelMode::default(),
            departure_time: None,
            language: default_language(),
        }
    }
}

/// Options for `google_search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchOptions {
    #[serde(default = "default_one")]
    pub pages_per_query: u32,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub region: Option<String>,
}

impl Default for WebSearchOptions {
    fn default() -> Self {
        Self {
            pages_per_query: 1,
            language: default_language(),
            region: None,
        }
    }
}

/// Options for `google_search_news`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSearchOptions {
    #[serde(default = "default_one")]
    pub pages_per_query: u32,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub region: Option<String>,

    /// Time filter such as `qdr:d` or `qdr:w`
    #[serde(default)]
    pub tbs: Option<String>,
}

impl Default for NewsSearchOptions {
    fn default() -> Self {
        Self {
            pages_per_query: 1,
            language: default_language(),
            region: None,
            tbs: None,
        }
    }
}

/// Options for `google_play_reviews`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppReviewsOptions {
    #[serde(default = "default_app_reviews_limit")]
    pub reviews_limit: u32,

    #[serde(default)]
    pub sort: AppReviewSort,

    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for AppReviewsOptions {
    fn default() -> Self {
        Self {
            reviews_limit: default_app_reviews_limit(),
            sort: AppReviewSort::default(),
            language: default_language(),
        }
    }
}

/// A typed operation request: the operation tag, its queries and its options
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRequest {
    PlaceSearch {
        query: QueryInput,
        options: PlaceSearchOptions,
    },
    PlaceReviews {
        query: QueryInput,
        options: PlaceReviewsOptions,
    },
    PlacePhotos {
        query: QueryInput,
        options: PlacePhotosOptions,
    },
    Directions {
        query: QueryInput,
        options: DirectionsOptions,
    },
    WebSearch {
        query: QueryInput,
        options: WebSearchOptions,
    },
    NewsSearch {
        query: QueryInput,
        options: NewsSearchOptions,
    },
    AppReviews {
        query: QueryInput,
        options: AppReviewsOptions,
    },
    ContactExtraction {
        query: QueryInput,
    },
}

impl OperationRequest {
    /// The operation this request targets
    pub fn operation(&self) -> Operation {
        match self {
            OperationRequest::PlaceSearch { .. } => Operation::PlaceSearch,
            OperationRequest::PlaceReviews { .. } => Operation::PlaceReviews,
            OperationRequest::PlacePhotos { .. } => Operation::PlacePhotos,
            OperationRequest::Directions { .. } => Operation::Directions,
            OperationRequest::WebSearch { .. } => Operation::WebSearch,
            OperationRequest::NewsSearch { .. } => Operation::NewsSearch,
            OperationRequest::AppReviews { .. } => Operation::AppReviews,
            OperationRequest::ContactExtraction { .. } => Operation::ContactExtraction,
        }
    }

    /// The submitted queries
    pub fn query(&self) -> &QueryInput {
        match self {
            OperationRequest::PlaceSearch { query, .. }
            | OperationRequest::PlaceReviews { query, .. }
            | OperationRequest::PlacePhotos { query, .. }
            | OperationRequest::Directions { query, .. }
            | OperationRequest::WebSearch { query, .. }
            | OperationRequest::NewsSearch { query, .. }
            | OperationRequest::AppReviews { query, .. }
            | OperationRequest::ContactExtraction { query } => query,
        }
    }

    /// Build a request from tool-call arguments
    ///
    /// `args` must be a JSON object carrying `query` (string or list of
    /// strings) plus any of the operation's recognized options. Unknown keys
    /// are ignored.
    pub fn from_args(operation: Operation, args: &Value) -> Result<Self, OutscraperError> {
        let empty = Value::Object(serde_json::Map::new());
        let args = if args.is_null() { &empty } else { args };

        if !args.is_object() {
            return Err(OutscraperError::InvalidInput(
                "arguments must be a JSON object".to_string(),
            ));
        }

        let query = args
            .get("query")
            .ok_or_else(|| OutscraperError::InvalidInput("Missing 'query' parameter".to_string()))?;
        let query: QueryInput = serde_json::from_value(query.clone()).map_err(|_| {
            OutscraperError::InvalidInput(
                "'query' must be a string or an array of strings".to_string(),
            )
        })?;
        query.validate()?;

        let request = match operation {
            Operation::PlaceSearch => OperationRequest::PlaceSearch {
                query,
                options: parse_options(operation, args)?,
            },
            Operation::PlaceReviews => OperationRequest::PlaceReviews {
                query,
                options: parse_options(operation, args)?,
            },
            Operation::PlacePhotos => OperationRequest::PlacePhotos {
                query,
                options: parse_options(operation, args)?,
            },
            Operation::Directions => OperationRequest::Directions {
                query,
                options: parse_options(operation, args)?,
            },
            Operation::WebSearch => OperationRequest::WebSearch {
                query,
                options: parse_options(operation, args)?,
            },
            Operation::NewsSearch => OperationRequest::NewsSearch {
                query,
                options: parse_options(operation, args)?,
            },
            Operation::AppReviews => OperationRequest::AppReviews {
                query,
                options: parse_options(operation, args)?,
            },
            Operation::ContactExtraction => OperationRequest::ContactExtraction { query },
        };

        Ok(request)
    }
}

fn parse_options<T: serde::de::DeserializeOwned>(
    operation: Operation,
    args: &Value,
) -> Result<T, OutscraperError> {
    serde_json::from_value(args.clone()).map_err(|e| {
        OutscraperError::InvalidInput(format!("invalid options for {}: {}", operation, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_match_tool_schema() {
        let request =
            OperationRequest::from_args(Operation::PlaceReviews, &json!({"query": "x"})).unwrap();
        match request {
            OperationRequest::PlaceReviews { options, .. } => {
                assert_eq!(options, PlaceReviewsOptions::default());
                assert_eq!(options.reviews_limit, 10);
                assert_eq!(options.sort.as_str(), "most_relevant");
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let request = OperationRequest::from_args(
            Operation::PlaceSearch,
            &json!({"query": ["a", "b"], "limit": 5, "colour": "blue"}),
        )
        .unwrap();
        assert_eq!(request.operation(), Operation::PlaceSearch);
        assert_eq!(request.query().len(), 2);
        match request {
            OperationRequest::PlaceSearch { options, .. } => assert_eq!(options.limit, 5),
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_missing_query_rejected() {
        let err = OperationRequest::from_args(Operation::WebSearch, &json!({})).unwrap_err();
        assert!(matches!(err, OutscraperError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_query_list_rejected() {
        let err =
            OperationRequest::from_args(Operation::WebSearch, &json!({"query": []})).unwrap_err();
        assert!(matches!(err, OutscraperError::InvalidInput(_)));
    }

    #[test]
    fn test_malformed_options_rejected() {
        let err = OperationRequest::from_args(
            Operation::Directions,
            &json!({"query": "a to b", "travel_mode": "teleport"}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("google_maps_directions"));

        let err = OperationRequest::from_args(
            Operation::PlaceSearch,
            &json!({"query": "a", "limit": -1}),
        )
        .unwrap_err();
        assert!(matches!(err, OutscraperError::InvalidInput(_)));
    }

    #[test]
    fn test_non_object_arguments_rejected() {
        let err = OperationRequest::from_args(Operation::ContactExtraction, &json!("example.com"))
            .unwrap_err();
        assert!(matches!(err, OutscraperError::InvalidInput(_)));
    }
}
