//! authfront client management CLI tool
//!
//! Registers clients with a running authfront server and checks how the
//! server decides on an authorization request.
//!
//! ## Usage Examples
//!
//! ### Register a new client
//! ```bash
//! authfront-client-management --base-url http://localhost:8080 register \
//!   --redirect-url "https://app.example/callback" \
//!   --secret "s3cret"
//! ```
//!
//! ### Check an authorization request
//! ```bash
//! authfront-client-management --base-url http://localhost:8080 check \
//!   --client-id "client_id_here" \
//!   --redirect-url "https://app.example/callback" \
//!   --scopes "openid profile"
//! ```
//!
//! ## Environment Variables
//!
//! - `AUTHFRONT_BASE_URL`: Base URL of the authfront server (alternative to --base-url)
//! - `AUTHFRONT_CLIENT_SECRET`: Client secret for registration (alternative to --secret)
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error (network, parsing, etc.)
//! - 2: Registration refused
//! - 3: Authorization request rejected

use clap::{Args, Parser, Subcommand, ValueEnum};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::process;
use thiserror::Error;

/// Client registration request body
#[derive(Debug, Serialize)]
struct ClientRegistrationRequest<'a> {
    client_secret: &'a str,
    redirect_url: &'a str,
}

/// Client registration response body
#[derive(Debug, Deserialize, Serialize)]
struct ClientRegistrationResponse {
    client_id: String,
}

/// Main CLI application structure
#[derive(Parser)]
#[command(
    name = "authfront-client-management",
    about = "authfront client management CLI tool",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Base URL of the authfront server
    #[arg(long, env = "AUTHFRONT_BASE_URL", default_value = "http://localhost:8080")]
    base_url: String,

    /// Enable verbose output
    #[arg(short, long, help = "Enable verbose output for debugging")]
    verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// JSON formatted output
    Json,
    /// Pretty-printed JSON output
    JsonPretty,
    /// Human-readable key/value lines
    Table,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Register a new client
    Register(RegisterArgs),
    /// Ask the server to validate an authorization request
    Check(CheckArgs),
}

/// Arguments for client registration
#[derive(Args)]
struct RegisterArgs {
    /// The one URL the client may receive results at
    #[arg(long)]
    redirect_url: String,

    /// Client secret
    #[arg(long, env = "AUTHFRONT_CLIENT_SECRET", hide_env_values = true)]
    secret: String,
}

/// Arguments for authorization checks
#[derive(Args)]
struct CheckArgs {
    /// Client ID returned at registration
    #[arg(long)]
    client_id: String,

    /// Redirect URL to present
    #[arg(long)]
    redirect_url: String,

    /// Response type to request
    #[arg(long, default_value = "code")]
    response_type: String,

    /// Space-separated scopes to request
    #[arg(long, default_value = "openid")]
    scopes: String,
}

/// Application errors
#[derive(Debug, Error)]
enum AppError {
    /// Network or HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// JSON parsing or serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The server refused the registration
    #[error("Registration refused: {0}")]
    Registration(String),
    /// The server rejected the authorization request
    #[error("Authorization rejected: {0}")]
    Rejected(String),
    /// General application errors
    #[error("Error: {0}")]
    General(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::Network(_) | AppError::Json(_) | AppError::General(_) => 1,
            AppError::Registration(_) => 2,
            AppError::Rejected(_) => 3,
        }
    }
}

/// Main application entry point
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Register(args) => register_client(&cli, args).await,
        Commands::Check(args) => check_authorization(&cli, args).await,
    };

    if let Err(err) = result {
        eprintln!("{}", err);
        process::exit(err.exit_code());
    }
}

/// Register a new client
async fn register_client(cli: &Cli, args: &RegisterArgs) -> Result<(), AppError> {
    if cli.verbose {
        eprintln!("Registering new client with authfront server: {}", cli.base_url);
    }

    let request = ClientRegistrationRequest {
        client_secret: &args.secret,
        redirect_url: &args.redirect_url,
    };

    let client = Client::new();
    let url = format!("{}/clients", cli.base_url.trim_end_matches('/'));

    let response = client.put(&url).json(&request).send().await?;

    if cli.verbose {
        eprintln!("Response status: {}", response.status());
    }

    match response.status() {
        StatusCode::CREATED => {
            let registration_response: ClientRegistrationResponse = response.json().await?;
            output_response(&cli.format, &registration_response)?;
            Ok(())
        }
        StatusCode::CONFLICT => Err(AppError::Registration(format!(
            "redirect URL '{}' is already registered",
            args.redirect_url
        ))),
        status => {
            let error_text = response.text().await?;
            Err(AppError::Registration(format!(
                "status {}: {}",
                status, error_text
            )))
        }
    }
}

/// Validate an authorization request against the server
async fn check_authorization(cli: &Cli, args: &CheckArgs) -> Result<(), AppError> {
    let mut url = reqwest::Url::parse(&format!(
        "{}/authorize",
        cli.base_url.trim_end_matches('/')
    ))
    .map_err(|e| AppError::General(format!("Invalid base URL: {}", e)))?;
    url.query_pairs_mut()
        .append_pair("client_id", &args.client_id)
        .append_pair("redirect_url", &args.redirect_url)
        .append_pair("response_type", &args.response_type)
        .append_pair("scopes", &args.scopes);

    if cli.verbose {
        eprintln!("Checking authorization request: {}", url);
    }

    let response = Client::new().get(url).send().await?;

    if cli.verbose {
        eprintln!("Response status: {}", response.status());
    }

    match response.status() {
        StatusCode::OK => {
            output_response(&cli.format, &json!({ "decision": "accepted" }))?;
            Ok(())
        }
        StatusCode::BAD_REQUEST => {
            let reason = response.text().await?;
            output_response(
                &cli.format,
                &json!({ "decision": "rejected", "reason": reason }),
            )?;
            Err(AppError::Rejected(reason))
        }
        status => {
            let error_text = response.text().await?;
            Err(AppError::General(format!(
                "Authorization check failed with status {}: {}",
                status, error_text
            )))
        }
    }
}

/// Output response data in the requested format
fn output_response<T: Serialize>(format: &OutputFormat, data: &T) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(data)?);
        }
        OutputFormat::JsonPretty => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Table => {
            if let Value::Object(map) = serde_json::to_value(data)? {
                for (key, value) in map {
                    println!("{}: {}", key, format_value(&value));
                }
            }
        }
    }
    Ok(())
}

/// Format a JSON value for display
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_else(|_| "invalid".to_string()),
    }
}
