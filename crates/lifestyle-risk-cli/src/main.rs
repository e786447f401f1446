// crates/lifestyle-risk-cli/src/main.rs
// ============================================================================
// Module: Lifestyle Risk CLI Entry Point
// Description: Command dispatcher for the webhook server and offline tools.
// Purpose: Serve the webhook and inspect encodings, predictions, and records.
// Dependencies: clap, lifestyle-risk-*, serde_json, thiserror, time, tokio.
// ============================================================================

//! ## Overview
//! The `lifestyle-risk` binary starts the webhook server and offers offline
//! helpers: config validation, request encoding, one-shot predictions, and
//! prediction store listings. Inputs are untrusted and size-limited; results
//! go to stdout and diagnostics to stderr.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use lifestyle_risk_config::RiskConfig;
use lifestyle_risk_core::EncodeError;
use lifestyle_risk_core::MessageVariant;
use lifestyle_risk_core::PredictionPipeline;
use lifestyle_risk_core::RequestParameters;
use lifestyle_risk_core::runtime::QUERY_RESULT_KEY;
use lifestyle_risk_core::runtime::encode;
use lifestyle_risk_core::runtime::extract_parameters;
use lifestyle_risk_core::runtime::format_error;
use lifestyle_risk_model::ForestModel;
use lifestyle_risk_server::RiskServer;
use lifestyle_risk_server::SystemClock;
use lifestyle_risk_server::init_tracing;
use lifestyle_risk_store_sqlite::SqlitePredictionStore;
use lifestyle_risk_store_sqlite::StoredPrediction;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a request payload read from disk.
const MAX_INPUT_BYTES: usize = 1024 * 1024;
/// Default number of rows printed by `store list`.
const DEFAULT_LIST_LIMIT: usize = 20;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "lifestyle-risk", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Encode a webhook payload into a feature vector.
    Encode(EncodeCommand),
    /// Run a single prediction offline (no persistence).
    Predict(PredictCommand),
    /// Prediction store utilities.
    Store {
        /// Selected store subcommand.
        #[command(subcommand)]
        command: StoreCommand,
    },
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to lifestyle-risk.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the configured bind address.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `encode`.
#[derive(Args, Debug)]
struct EncodeCommand {
    /// Webhook payload (or bare parameters object) as JSON.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
}

/// Arguments for `predict`.
#[derive(Args, Debug)]
struct PredictCommand {
    /// Webhook payload (or bare parameters object) as JSON.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
    /// Optional config file path (model path and default wording).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the configured message wording.
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,
}

/// Message wording selector.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum VariantArg {
    /// Friendly guidance paragraph.
    Informational,
    /// Single-line result.
    Terse,
}

impl From<VariantArg> for MessageVariant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Informational => Self::Informational,
            VariantArg::Terse => Self::Terse,
        }
    }
}

/// Store subcommands.
#[derive(Subcommand, Debug)]
enum StoreCommand {
    /// List recent predictions.
    List(StoreListCommand),
}

/// Output formats for structured CLI commands.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Pretty JSON output.
    Json,
    /// Human-readable text output.
    Text,
}

/// Arguments for `store list`.
#[derive(Args, Debug)]
struct StoreListCommand {
    /// `SQLite` database path.
    #[arg(long, value_name = "PATH")]
    path: PathBuf,
    /// Maximum number of rows to print.
    #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
    limit: usize,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("lifestyle-risk {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        let help = Cli::command().render_help().to_string();
        write_stdout_line(help.trim_end())
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command,
        } => command_config(&command),
        Commands::Encode(command) => command_encode(&command),
        Commands::Predict(command) => command_predict(&command).await,
        Commands::Store {
            command,
        } => command_store(&command),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let mut config = load_config(command.config.as_deref())?;
    if let Some(bind) = command.bind {
        config.server.bind = bind;
        config
            .validate()
            .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    }
    init_tracing(&config.logging).map_err(|err| CliError::new(err.to_string()))?;

    let server = tokio::task::spawn_blocking(move || RiskServer::from_config(config))
        .await
        .map_err(|err| CliError::new(format!("server init failed: init join failed: {err}")))?
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;

    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = load_config(command.config.as_deref())?;
    write_stdout_line("config valid").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads and validates configuration.
fn load_config(path: Option<&Path>) -> CliResult<RiskConfig> {
    RiskConfig::load(path).map_err(|err| CliError::new(format!("config load failed: {err}")))
}

// ============================================================================
// SECTION: Offline Commands
// ============================================================================

/// Executes `encode`.
fn command_encode(command: &EncodeCommand) -> CliResult<ExitCode> {
    let payload = read_input_json(&command.input)?;
    let encoded = parameters_from_input(&payload).and_then(|params| encode(&params));
    match encoded {
        Ok(vector) => {
            let json = serde_json::to_string(&vector)
                .map_err(|err| CliError::new(format!("failed to render output: {err}")))?;
            write_stdout_line(&json).map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Ok(emit_error(format_error(err.field_name()).text())),
    }
}

/// Executes `predict`.
async fn command_predict(command: &PredictCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let variant = command.variant.map_or(config.responder.variant, MessageVariant::from);
    let model_path = config.model.path.clone();
    let model = tokio::task::spawn_blocking(move || ForestModel::load(&model_path))
        .await
        .map_err(|err| CliError::new(format!("model load failed: join failed: {err}")))?
        .map_err(|err| CliError::new(format!("model load failed: {err}")))?;
    let payload = read_input_json(&command.input)?;
    let pipeline =
        PredictionPipeline::new(Arc::new(model), Arc::new(SystemClock)).with_variant(variant);
    let report = match bare_parameters(&payload) {
        Some(params) => pipeline.respond(&params),
        None => pipeline.respond_payload(&payload),
    };
    let json = serde_json::to_string(&report.message)
        .map_err(|err| CliError::new(format!("failed to render output: {err}")))?;
    write_stdout_line(&json).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Extracts parameters from a webhook envelope or a bare parameters object.
fn parameters_from_input(payload: &Value) -> Result<RequestParameters, EncodeError> {
    bare_parameters(payload).map_or_else(|| extract_parameters(payload), Ok)
}

/// Treats a top-level object without an envelope key as the parameters bag.
fn bare_parameters(payload: &Value) -> Option<RequestParameters> {
    match payload {
        Value::Object(map) if !map.contains_key(QUERY_RESULT_KEY) => {
            Some(RequestParameters::from_map(map.clone()))
        }
        _ => None,
    }
}

// ============================================================================
// SECTION: Store Commands
// ============================================================================

/// Dispatches store subcommands.
fn command_store(command: &StoreCommand) -> CliResult<ExitCode> {
    match command {
        StoreCommand::List(command) => command_store_list(command),
    }
}

/// Executes `store list`.
fn command_store_list(command: &StoreListCommand) -> CliResult<ExitCode> {
    if !command.path.is_file() {
        return Err(CliError::new(format!(
            "store list failed: no database at {}",
            command.path.display()
        )));
    }
    let store = SqlitePredictionStore::open_read_only(&command.path)
        .map_err(|err| CliError::new(format!("store open failed: {err}")))?;
    let rows = store
        .list_recent(command.limit)
        .map_err(|err| CliError::new(format!("store list failed: {err}")))?;
    let output = match command.format {
        OutputFormat::Json => serde_json::to_string_pretty(&rows)
            .map_err(|err| CliError::new(format!("failed to render output: {err}")))?,
        OutputFormat::Text => render_store_list_text(&rows),
    };
    write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Renders store rows as one line per prediction.
fn render_store_list_text(rows: &[StoredPrediction]) -> String {
    if rows.is_empty() {
        return "no predictions stored".to_string();
    }
    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            let fields: Vec<String> = row
                .fields
                .iter()
                .map(|stored| format!("{}={}", stored.field.wire_name(), stored.value))
                .collect();
            format!(
                "{}\t{}\t{}\t{}",
                row.id,
                format_timestamp(row.created_at.as_unix_millis()),
                row.disease_name,
                fields.join(" ")
            )
        })
        .collect();
    lines.join("\n")
}

/// Formats unix milliseconds as RFC 3339, falling back to the raw value.
fn format_timestamp(millis: i64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .ok()
        .and_then(|value| value.format(&Rfc3339).ok())
        .unwrap_or_else(|| millis.to_string())
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads and parses a JSON input file.
fn read_input_json(path: &Path) -> CliResult<Value> {
    let bytes = read_bytes_with_limit(path, MAX_INPUT_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(format!("failed to read input {}: {err}", path.display()))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!(
            "input {} exceeds size limit: {size} bytes (max {limit})",
            path.display()
        )),
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(format!("input {} is not valid JSON: {err}", path.display())))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
