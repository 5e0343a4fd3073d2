//! Tool registry for MCP tools.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use super::handlers::OperationHandler;
use crate::client::OutscraperClient;
use crate::models::Operation;

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "google_maps_search")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: serde_json::Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// Registry for all MCP tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create a registry with one tool per operation, all sharing `client`
    pub fn new(client: Arc<OutscraperClient>, deadline: Option<Duration>) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };

        for operation in Operation::ALL {
            registry.register(Tool {
                name: operation.tool_name().to_string(),
                description: format!("{} using Outscraper", operation.description()),
                input_schema: input_schema(operation),
                handler: Arc::new(OperationHandler {
                    operation,
                    client: client.clone(),
                    deadline,
                }),
            });
        }

        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get all tools, in operation order
    pub fn all(&self) -> Vec<&Tool> {
        let mut tools: Vec<&Tool> = self.tools.values().collect();
        tools.sort_by_key(|tool| {
            Operation::from_tool_name(&tool.name)
                .and_then(|op| Operation::ALL.iter().position(|o| *o == op))
                .unwrap_or(usize::MAX)
        });
        tools
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, String> {
        let tool = self
            .get(name)
            .ok_or_else(|| format!("Tool '{}' not found", name))?;

        tool.handler.execute(args).await
    }
}

fn query_property(description: &str) -> Value {
    json!({
        "description": description,
        "oneOf": [
            { "type": "string" },
            { "type": "array", "items": { "type": "string" }, "minItems": 1 }
        ]
    })
}

fn language_property() -> Value {
    json!({
        "type": "string",
        "description": "Language code",
        "default": "en"
    })
}

fn region_property() -> Value {
    json!({
        "type": "string",
        "description": "Country/region code (e.g., 'US', 'GB', 'DE')"
    })
}

/// JSON Schema for an operation's tool arguments
pub fn input_schema(operation: Operation) -> Value {
    let properties = match operation {
        Operation::PlaceSearch => json!({
            "query": query_property("Search query (e.g., 'restaurants brooklyn usa', 'hotels paris france')"),
            "limit": {
                "type": "integer",
                "description": "Number of results to return per query (max: 400)",
                "default": 20,
                "minimum": 0
            },
            "language": language_property(),
            "region": region_property(),
            "drop_duplicates": {
                "type": "boolean",
                "description": "Remove duplicate results",
                "default": false
            },
            "enrichment": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Additional services to run (e.g., ['domains_service', 'emails_validator_service'])"
            }
        }),
        Operation::PlaceReviews => json!({
            "query": query_property("Place query, place ID, or business name (e.g., 'ChIJrc9T9fpYwokRdvjYRHT8nI4', 'Memphis Seoul brooklyn usa')"),
            "reviews_limit": {
                "type": "integer",
                "description": "Number of reviews to extract per place (0 for unlimited)",
                "default": 10,
                "minimum": 0
            },
            "limit": {
                "type": "integer",
                "description": "Number of places to process per query",
                "default": 1,
                "minimum": 0
            },
            "sort": {
                "type": "string",
                "enum": ["most_relevant", "newest", "highest_rating", "lowest_rating"],
                "default": "most_relevant"
            },
            "language": language_property(),
            "region": region_property(),
            "cutoff": {
                "type": "integer",
                "description": "Unix timestamp; only reviews after this date are returned"
            }
        }),
        Operation::PlacePhotos => json!({
            "query": query_property("Place query, place ID, or business name"),
            "photos_limit": {
                "type": "integer",
                "description": "Number of photos to extract per place",
                "default": 20,
                "minimum": 0
            },
            "limit": {
                "type": "integer",
                "description": "Number of places to process per query",
                "default": 1,
                "minimum": 0
            },
            "language": language_property(),
            "region": region_property()
        }),
        Operation::Directions => json!({
            "query": query_property("Route query (e.g., 'from Times Square to Central Park', or coordinates)"),
            "travel_mode": {
                "type": "string",
                "enum": ["driving", "walking", "bicycling", "transit"],
                "default": "driving"
            },
            "departure_time": {
                "type": "integer",
                "description": "Unix timestamp for departure time (for transit/traffic)"
            },
            "language": language_property()
        }),
        Operation::WebSearch => json!({
            "query": query_property("Search query (e.g., 'python programming tutorial')"),
            "pages_per_query": {
                "type": "integer",
                "description": "Number of result pages to fetch",
                "default": 1,
                "minimum": 1
            },
            "language": language_property(),
            "region": region_property()
        }),
        Operation::NewsSearch => json!({
            "query": query_property("News search query (e.g., 'AI technology news')"),
            "pages_per_query": {
                "type": "integer",
                "description": "Number of result pages to fetch",
                "default": 1,
                "minimum": 1
            },
            "language": language_property(),
            "region": region_property(),
            "tbs": {
                "type": "string",
                "description": "Time-based search filter (e.g., 'qdr:d' for past day, 'qdr:w' for past week)"
            }
        }),
        Operation::AppReviews => json!({
            "query": query_property("App package name or ID (e.g., 'com.facebook.katana')"),
            "reviews_limit": {
                "type": "integer",
                "description": "Number of reviews to extract",
                "default": 100,
                "minimum": 0
            },
            "sort": {
                "type": "string",
                "enum": ["most_relevant", "newest", "rating"],
                "default": "most_relevant"
            },
            "language": language_property()
        }),
        Operation::ContactExtraction => json!({
            "query": query_property("Domain name (e.g., 'outscraper.com', 'example.org')")
        }),
    };

    json!({
        "type": "object",
        "properties": properties,
        "required": ["query"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiCredentials;

    fn registry() -> ToolRegistry {
        let client = OutscraperClient::with_base_url(
            ApiCredentials::new("test"),
            "http://127.0.0.1:9",
            Duration::from_secs(1),
        )
        .unwrap();
        ToolRegistry::new(Arc::new(client), None)
    }

    #[test]
    fn test_registers_every_operation() {
        let registry = registry();
        assert_eq!(registry.len(), 8);
        let names: Vec<&str> = registry.all().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names[0], "google_maps_search");
        assert_eq!(names[7], "emails_and_contacts");
        for op in Operation::ALL {
            assert!(registry.get(op.tool_name()).is_some());
        }
    }

    #[test]
    fn test_schemas_require_query() {
        for op in Operation::ALL {
            let schema = input_schema(op);
            assert_eq!(schema["required"], json!(["query"]));
            assert!(schema["properties"]["query"].is_object());
        }
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let err = registry().execute("google_images_search", json!({})).await.unwrap_err();
        assert!(err.contains("not found"));
    }

    #[tokio::test]
    async fn test_invalid_arguments_fail_before_network() {
        let err = registry()
            .execute("google_search", json!({"query": []}))
            .await
            .unwrap_err();
        assert!(err.starts_with("Invalid input"));
    }
}
