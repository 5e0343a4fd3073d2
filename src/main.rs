use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use outscraper_mcp::config::{default_config_path, find_config_file, load_config, Config};
use outscraper_mcp::dispatch;
use outscraper_mcp::mcp::{McpServer, ToolRegistry};
use outscraper_mcp::models::{Operation, OperationRequest};
use outscraper_mcp::OutscraperClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Outscraper MCP - Google Maps, search, news, app reviews and contact extraction tools
#[derive(Parser, Debug)]
#[command(name = "outscraper-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server for Outscraper data-extraction services", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request deadline in seconds (overrides the configuration file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server (stdio by default)
    Serve {
        /// Use stdio transport
        #[arg(long, conflicts_with = "http")]
        stdio: bool,

        /// Use streamable HTTP transport
        #[arg(long)]
        http: bool,

        /// Port for HTTP mode
        #[arg(long, default_value_t = 8000)]
        port: u16,

        /// Host for HTTP mode
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// List available tools
    Tools,

    /// Show the execution mode and outbound parameters for a tool call without sending it
    Plan {
        /// Tool name (e.g., google_maps_search)
        tool: String,

        /// Tool arguments as a JSON object
        args: String,
    },

    /// Call a tool once and print the normalized records as JSON
    #[command(alias = "c")]
    Call {
        /// Tool name (e.g., google_maps_reviews)
        tool: String,

        /// Tool arguments as a JSON object
        args: String,

        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Destination (default: <config dir>/outscraper-mcp/config.toml)
        path: Option<PathBuf>,
    },
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Outscraper MCP - Environment Variables");
    println!();
    println!("API:");
    println!("  OUTSCRAPER_API_KEY                  Outscraper API key");
    println!("  OUTSCRAPER_MCP_API__BASE_URL        API base URL (default: https://api.app.outscraper.com)");
    println!("  OUTSCRAPER_MCP_API__CLIENT_TAG      Value of the 'client' header (default: MCP Server)");
    println!("  OUTSCRAPER_MCP_API__TIMEOUT_SECS    Request deadline in seconds (default: 30)");
    println!();
    println!("Logging:");
    println!("  OUTSCRAPER_MCP_LOGGING__LEVEL       Log level when RUST_LOG is unset (default: info)");
    println!("  RUST_LOG                            Rust logging filter (e.g., debug, outscraper_mcp=trace)");
    println!();
    println!("Example:");
    println!("  export OUTSCRAPER_API_KEY=\"your-key-here\"");
    std::process::exit(0);
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => config.logging.level.as_str(),
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    // stdout carries MCP traffic in stdio mode, so logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("outscraper_mcp={}", level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load(cli: &Cli) -> Result<Config> {
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("failed to load {}", path.display()),
        None => "failed to load configuration from the environment".to_string(),
    })?;

    if let Some(timeout) = cli.timeout {
        config.api.timeout_secs = timeout;
    }

    Ok(config)
}

fn parse_call(tool: &str, args: &str) -> Result<OperationRequest> {
    let operation = Operation::from_tool_name(tool).with_context(|| {
        let known: Vec<&str> = Operation::ALL.iter().map(|op| op.tool_name()).collect();
        format!("unknown tool '{}' (available: {})", tool, known.join(", "))
    })?;
    let args: serde_json::Value =
        serde_json::from_str(args).context("arguments must be a JSON object")?;

    Ok(OperationRequest::from_args(operation, &args)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
    }

    let config = load(&cli)?;
    init_tracing(&cli, &config);

    if let Some(config_path) = &cli.config {
        tracing::info!("Using config file: {}", config_path.display());
    }

    if config.api.has_placeholder_key() {
        tracing::warn!(
            "Using placeholder API key. Please set OUTSCRAPER_API_KEY environment variable."
        );
    }

    let deadline = Some(Duration::from_secs(config.api.timeout_secs));

    match cli.command {
        None => {
            let client = Arc::new(OutscraperClient::from_config(&config.api)?);
            McpServer::new(client, deadline)?.run().await?;
        }

        Some(Commands::Serve {
            stdio: _,
            http,
            port,
            host,
        }) => {
            let client = Arc::new(OutscraperClient::from_config(&config.api)?);
            let server = McpServer::new(client, deadline)?;

            if http {
                let addr = format!("{}:{}", host, port);
                let (bound_addr, handle) = server.run_http(&addr).await?;
                tracing::info!("MCP server listening on {}", bound_addr);

                handle
                    .await
                    .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
            } else {
                server.run().await?;
            }
        }

        Some(Commands::Tools) => {
            let client = Arc::new(OutscraperClient::from_config(&config.api)?);
            let registry = ToolRegistry::new(client, deadline);
            for tool in registry.all() {
                println!("{:<24} {}", tool.name, tool.description);
            }
        }

        Some(Commands::Plan { tool, args }) => {
            let request = parse_call(&tool, &args)?;
            let plan = dispatch::plan(&request)?;
            println!("mode:  {}", plan.mode);
            println!("path:  {}", plan.path);
            println!("query: {}", plan.query_string());
            if let Some(limit) = plan.result_limit {
                println!("limit: {}", limit);
            }
        }

        Some(Commands::Call {
            tool,
            args,
            compact,
        }) => {
            let request = parse_call(&tool, &args)?;
            let client = OutscraperClient::from_config(&config.api)?;
            let outcome = client.call(&request, deadline).await?;

            let json = outcome.to_json();
            if compact {
                println!("{}", serde_json::to_string(&json)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        }

        Some(Commands::Config {
            command: ConfigCommands::Init { path },
        }) => {
            let path = path
                .or_else(default_config_path)
                .context("could not determine a config directory; pass a path")?;
            Config::default().save(&path)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["outscraper-mcp"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(cli.timeout.is_none());
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["outscraper-mcp", "-v"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["outscraper-mcp", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_timeout_and_config() {
        let cli = Cli::parse_from([
            "outscraper-mcp",
            "--timeout",
            "60",
            "--config",
            "/path/to/config.toml",
        ]);
        assert_eq!(cli.timeout, Some(60));
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
    }

    #[test]
    fn test_cli_serve_command() {
        let cli = Cli::parse_from(["outscraper-mcp", "serve", "--http", "--port", "9000"]);
        match cli.command {
            Some(Commands::Serve {
                http, port, host, ..
            }) => {
                assert!(http);
                assert_eq!(port, 9000);
                assert_eq!(host, "127.0.0.1");
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_serve_conflicting_transports() {
        assert!(Cli::try_parse_from(["outscraper-mcp", "serve", "--stdio", "--http"]).is_err());
    }

    #[test]
    fn test_cli_call_command() {
        let cli = Cli::parse_from([
            "outscraper-mcp",
            "call",
            "google_search",
            r#"{"query": "rust"}"#,
            "--compact",
        ]);
        match cli.command {
            Some(Commands::Call {
                tool,
                args,
                compact,
            }) => {
                assert_eq!(tool, "google_search");
                assert_eq!(args, r#"{"query": "rust"}"#);
                assert!(compact);
            }
            _ => panic!("Expected Call command"),
        }
    }

    #[test]
    fn test_parse_call() {
        let request = parse_call("google_maps_reviews", r#"{"query": "x", "reviews_limit": 0}"#)
            .unwrap();
        assert_eq!(request.operation(), Operation::PlaceReviews);

        let err = parse_call("google_images_search", r#"{"query": "x"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown tool"));

        assert!(parse_call("google_search", "not json").is_err());
    }
}
