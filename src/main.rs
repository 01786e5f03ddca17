//! vault_offload - one signed transfer out of a Coinbase account
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │ Credentials │───▶│   Session   │───▶│  Transfer   │───▶│   Outcome   │
//! │   (JSON)    │    │ (JWT sign)  │    │ (1 request) │    │  (stdout)   │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//! ```
//!
//! Logs go to stderr and the rolling log file; stdout carries only the
//! report. The process always ends at the same prompt and exits 0.

use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::fmt::Display;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use vault_offload::accounts::{Account, PaymentMethod, list_accounts, list_payment_methods};
use vault_offload::config::{AppConfig, TransferDefaults};
use vault_offload::logging::init_logging;
use vault_offload::outcome::TransferOutcome;
use vault_offload::pipeline::{PipelineError, TransferPipeline, open_session};
use vault_offload::session::{DryRunTransport, HttpTransport, SessionInitError, Transport};
use vault_offload::transfer::{IdempotencyKey, TransferCommand, TransferRequest};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");
const CLOSE_PROMPT: &str = "✅ Press Enter to close...";

/// Send funds out of a Coinbase account with a locally stored API key
#[derive(Parser)]
#[command(name = "vault_offload")]
#[command(version = VERSION)]
#[command(about = "One signed transfer per run, authenticated with a CDP API key", long_about = None)]
struct Cli {
    /// Configuration environment, loads config/{env}.yaml
    #[arg(short, long, global = true, default_value = "dev")]
    env: String,

    /// Explicit config file (overrides --env)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Credential file (overrides credentials.path)
    #[arg(long, global = true)]
    credentials: Option<PathBuf>,

    /// Exit without waiting for Enter
    #[arg(long, global = true)]
    no_prompt: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send funds to a recipient (default)
    Send(SendArgs),

    /// List brokerage accounts with their IDs and available balances
    Accounts,

    /// List linked payment methods
    PaymentMethods,
}

#[derive(Args, Default)]
struct SendArgs {
    /// Recipient address or email
    #[arg(long)]
    to: Option<String>,

    /// Amount in units of the currency, e.g. 500.00
    #[arg(long)]
    amount: Option<Decimal>,

    /// Currency code, e.g. USDC
    #[arg(long)]
    currency: Option<String>,

    /// Note attached to the transfer
    #[arg(long)]
    description: Option<String>,

    /// Source account ID
    #[arg(long)]
    account: Option<String>,

    /// Reuse the key of an earlier run so the transfer cannot happen twice
    #[arg(long)]
    idempotency_key: Option<String>,

    /// Sign the request but do not send it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let mut stdout = io::stdout();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(&cli.env),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            TransferOutcome::Failure(e.to_string()).report(&mut stdout);
            close_prompt(cli.no_prompt);
            return;
        }
    };

    let _log_guard = init_logging(&config);
    info!(env = %cli.env, version = VERSION, "Starting vault_offload");

    let credentials_path = cli
        .credentials
        .clone()
        .unwrap_or_else(|| config.credentials.path.clone());

    match cli.command.unwrap_or(Commands::Send(SendArgs::default())) {
        Commands::Send(args) => {
            let outcome = run_send(&config, &credentials_path, args).await;
            outcome.report(&mut stdout);
        }
        Commands::Accounts => {
            let result = fetch_accounts(&config, &credentials_path).await;
            report_listing(&mut stdout, "Accounts", result);
        }
        Commands::PaymentMethods => {
            let result = fetch_payment_methods(&config, &credentials_path).await;
            report_listing(&mut stdout, "Payment methods", result);
        }
    }

    close_prompt(cli.no_prompt);
}

async fn run_send(config: &AppConfig, credentials_path: &Path, args: SendArgs) -> TransferOutcome {
    let dry_run = args.dry_run;
    let command = match build_command(args, &config.transfer) {
        Ok(command) => command,
        Err(e) => return TransferOutcome::Failure(format!("{:#}", e)),
    };

    let request = command.request();
    println!(
        "[VAULT] Initiating {} {} transfer to {}{}...",
        request.amount(),
        request.currency(),
        request.recipient(),
        if dry_run { " (dry run)" } else { "" }
    );
    println!("[VAULT] Idempotency key: {}", request.idempotency_key());

    let transport: Arc<dyn Transport> = if dry_run {
        Arc::new(DryRunTransport)
    } else {
        match http_transport(config) {
            Ok(transport) => transport,
            Err(e) => return TransferOutcome::Failure(e.to_string()),
        }
    };

    let mut pipeline = TransferPipeline::new(config.api.clone(), transport);
    let outcome = pipeline.run(credentials_path, &command).await;
    pipeline.finish();
    outcome
}

/// Command-line flags first, then the environment's configured defaults
fn build_command(args: SendArgs, defaults: &TransferDefaults) -> anyhow::Result<TransferCommand> {
    let recipient = args
        .to
        .or_else(|| defaults.recipient.clone())
        .ok_or_else(|| anyhow!("No recipient: pass --to or set transfer.recipient"))?;
    let amount = args
        .amount
        .or(defaults.amount)
        .ok_or_else(|| anyhow!("No amount: pass --amount or set transfer.amount"))?;
    let currency = args
        .currency
        .or_else(|| defaults.currency.clone())
        .ok_or_else(|| anyhow!("No currency: pass --currency or set transfer.currency"))?;
    let description = args
        .description
        .or_else(|| defaults.description.clone())
        .unwrap_or_default();
    let account_id = args.account.unwrap_or_else(|| defaults.account_id.clone());

    let idempotency_key = match args.idempotency_key {
        Some(raw) => IdempotencyKey::parse(&raw)?,
        None => IdempotencyKey::generate(),
    };

    let request = TransferRequest::new(recipient, amount, &currency, description, idempotency_key)
        .context("Invalid transfer request")?;
    TransferCommand::new(account_id, request).context("Invalid transfer request")
}

async fn fetch_accounts(config: &AppConfig, credentials_path: &Path) -> Result<Vec<Account>, PipelineError> {
    let session = open_session(credentials_path, &config.api, http_transport(config)?)?;
    Ok(list_accounts(&session).await?)
}

async fn fetch_payment_methods(
    config: &AppConfig,
    credentials_path: &Path,
) -> Result<Vec<PaymentMethod>, PipelineError> {
    let session = open_session(credentials_path, &config.api, http_transport(config)?)?;
    Ok(list_payment_methods(&session).await?)
}

fn http_transport(config: &AppConfig) -> Result<Arc<dyn Transport>, SessionInitError> {
    let timeout = config.api.request_timeout_secs.map(Duration::from_secs);
    Ok(Arc::new(HttpTransport::new(timeout)?))
}

fn report_listing<T: Display>(
    out: &mut impl Write,
    title: &str,
    result: Result<Vec<T>, PipelineError>,
) {
    let text = match result {
        Ok(items) if items.is_empty() => format!("[VAULT] {}: none", title),
        Ok(items) => {
            let lines: Vec<String> = items.iter().map(|item| format!("💼 {}", item)).collect();
            format!("[VAULT] {}:\n{}", title, lines.join("\n"))
        }
        Err(e) => {
            warn!(code = e.code(), error = %e, "Listing failed");
            format!("[VAULT] {} lookup failed ❌\n{}", title, e)
        }
    };
    if let Err(e) = writeln!(out, "{}", text) {
        warn!(error = %e, "Failed to write listing");
    }
}

fn close_prompt(no_prompt: bool) {
    if no_prompt {
        return;
    }
    print!("{}", CLOSE_PROMPT);
    if let Err(e) = io::stdout().flush() {
        warn!(error = %e, "Failed to flush prompt");
    }
    let mut line = String::new();
    if let Err(e) = io::stdin().read_line(&mut line) {
        warn!(error = %e, "Failed to read from stdin");
    }
}
