//! drive_copy - copy files between Google Drive folders, resumably.
//!
//! This library provides functionality to:
//! - Authorize against Google Drive with a local OAuth2 redirect listener
//! - Resolve `/slash/delimited` paths in My Drive to folder ids
//! - Expand seed folders into the files they contain
//! - Copy those files into a destination folder, recording progress in a
//!   ledger file so an interrupted run picks up where it stopped
//!
//! # Example
//!
//! ```no_run
//! use drive_copy::{
//!     Authenticator, CopyRequest, CopyRun, DriveClient, ProgressLedger, TargetSet, VirtualPath,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = DriveClient::new(Authenticator::from_file("token.json")?);
//!     let mut ledger = ProgressLedger::load("state.json")?;
//!
//!     let request = CopyRequest {
//!         target_path: VirtualPath::parse("/backups/2024")?,
//!         seeds: TargetSet::from_args(&["1abcFolderId"])?,
//!     };
//!     let result = CopyRun::new(&client, CancellationToken::new())
//!         .execute(&request, &mut ledger)
//!         .await;
//!     ledger.flush()?;
//!
//!     println!("{:?}", result?);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod callback;
pub mod client;
pub mod config;
pub mod copier;
pub mod error;
pub mod expander;
pub mod ledger;
pub mod models;
pub mod orchestrator;
pub mod resolver;
pub mod target;
pub mod token;

// Re-exports for convenience
pub use api::DriveApi;
pub use auth::{Authenticator, OAuthFlow};
pub use callback::CallbackListener;
pub use client::DriveClient;
pub use config::Env;
pub use error::{DriveError, Result};
pub use ledger::ProgressLedger;
pub use models::FileMetadata;
pub use orchestrator::{run_and_flush, CopyRequest, CopyRun, RunSummary};
pub use resolver::VirtualPath;
pub use target::TargetSet;
pub use token::TokenStore;
