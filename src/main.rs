//! drive_copy CLI - Copy files between Google Drive folders.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use drive_copy::ledger::DEFAULT_STATE_FILE;
use drive_copy::token::DEFAULT_TOKEN_FILE;
use drive_copy::{
    run_and_flush, Authenticator, CallbackListener, CopyRequest, DriveClient, Env, OAuthFlow,
    ProgressLedger, TargetSet, TokenStore, VirtualPath,
};

/// CLI tool for copying files between Google Drive folders.
#[derive(Parser)]
#[command(name = "drive_copy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authorize with Google and save the token.
    Auth {
        /// Where to write the token.
        #[arg(long, default_value = DEFAULT_TOKEN_FILE)]
        token: PathBuf,

        /// Seconds to wait for the browser redirect.
        #[arg(long, default_value_t = 300)]
        timeout: u64,
    },

    /// Copy files into a folder, skipping those already copied.
    Copy {
        /// Destination folder path in My Drive, e.g. /backups/2024.
        target: String,

        /// File or folder IDs (or Drive URLs) to copy.
        #[arg(required = true)]
        ids: Vec<String>,

        /// Progress ledger file.
        #[arg(long, default_value = DEFAULT_STATE_FILE)]
        state: PathBuf,

        /// Token file written by `auth`.
        #[arg(long, default_value = DEFAULT_TOKEN_FILE)]
        token: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let env = Env::from_env().context("Failed to start because env is missing")?;

    match cli.command {
        Commands::Auth { token, timeout } => {
            run_auth(&env, &token, Duration::from_secs(timeout)).await?;
        }

        Commands::Copy {
            target,
            ids,
            state,
            token,
        } => {
            run_copy(&target, &ids, &state, &token).await?;
        }
    }

    Ok(())
}

async fn run_auth(env: &Env, token_path: &Path, wait: Duration) -> Result<()> {
    let flow = OAuthFlow::new(env);
    let state = flow.new_state()?;
    let url = flow.authorization_url(&state)?;

    let mut listener = CallbackListener::bind(env.listen_port)
        .await
        .with_context(|| format!("Failed to set up auth server on port {}", env.listen_port))?;

    println!("Open {} ", url);

    let code = listener.wait_for_code(&flow, &state, wait).await;
    listener.shutdown().await;
    let code = code.context("Failed to receive authorization")?;

    let token = flow
        .exchange(&code)
        .await
        .context("Failed to exchange token")?;
    TokenStore::new(token_path)
        .save(&token)
        .with_context(|| format!("Failed to save token to {:?}", token_path))?;

    println!("ALL OK, token saved to {}", token_path.display());
    Ok(())
}

async fn run_copy(target: &str, ids: &[String], state: &Path, token: &Path) -> Result<()> {
    let request = CopyRequest {
        target_path: VirtualPath::parse(target)?,
        seeds: TargetSet::from_args(ids)?,
    };

    let auth = Authenticator::from_file(token)
        .with_context(|| format!("Please authorize with `drive_copy auth` before copying ({:?})", token))?;
    let client = DriveClient::new(auth);

    let mut ledger = ProgressLedger::load(state)
        .with_context(|| format!("Failed to load progress from {:?}", state))?;
    info!(entries = ledger.len(), "loaded progress ledger");

    let cancel = CancellationToken::new();
    spawn_signal_listener(cancel.clone());

    let summary = run_and_flush(&client, &request, &mut ledger, cancel)
        .await
        .with_context(|| format!("Copy into {} failed", target))?;
    println!(
        "Done. {} copied, {} skipped, {} total{}",
        summary.copied,
        summary.skipped,
        summary.total,
        if summary.cancelled { " (interrupted)" } else { "" }
    );
    Ok(())
}

/// Cancel `cancel` on SIGINT or SIGTERM.
fn spawn_signal_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("shutdown signal received");
        cancel.cancel();
    });
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            warn!(error = %e, "cannot listen for SIGTERM");
            ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    ctrl_c().await;
}
