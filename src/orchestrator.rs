//! The copy run: resolve the destination, expand seeds, copy what is left.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::api::DriveApi;
use crate::copier::copy_into_folder;
use crate::error::{DriveError, Result};
use crate::expander::expand;
use crate::ledger::ProgressLedger;
use crate::models::MIME_FOLDER;
use crate::resolver::{resolve_file, VirtualPath};
use crate::target::TargetSet;

/// What to copy and where.
#[derive(Debug, Clone)]
pub struct CopyRequest {
    pub target_path: VirtualPath,
    pub seeds: TargetSet,
}

/// Outcome of a run that did not fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub copied: usize,
    pub skipped: usize,
    /// The run stopped early on a shutdown signal.
    pub cancelled: bool,
}

/// Runs one copy request against a Drive backend.
pub struct CopyRun<'a, A: DriveApi + ?Sized> {
    api: &'a A,
    cancel: CancellationToken,
}

impl<'a, A: DriveApi + ?Sized> CopyRun<'a, A> {
    pub fn new(api: &'a A, cancel: CancellationToken) -> Self {
        Self { api, cancel }
    }

    /// Execute the request, recording each copied id in `ledger`.
    ///
    /// The ledger is updated in memory only; see [`run_and_flush`] for the
    /// variant that persists it afterwards. The cancellation token is checked
    /// between files, never during a copy.
    pub async fn execute(
        &self,
        request: &CopyRequest,
        ledger: &mut ProgressLedger,
    ) -> Result<RunSummary> {
        let folder = resolve_file(self.api, &request.target_path).await?;
        if folder.mime_type.as_deref() != Some(MIME_FOLDER) {
            return Err(DriveError::NotAFolder(request.target_path.to_string()));
        }
        info!(path = %request.target_path, id = %folder.id, "resolved target folder");

        let targets = expand(self.api, &request.seeds).await?;
        let total = targets.len();
        let mut summary = RunSummary {
            total,
            ..Default::default()
        };

        for (i, id) in targets.iter().enumerate() {
            if self.cancel.is_cancelled() {
                debug!(remaining = total - i, "exiting by signal");
                eprintln!("exiting by signal");
                summary.cancelled = true;
                break;
            }

            if ledger.contains(id) {
                println!("[SKIP] {} / {} ({})", i + 1, total, id);
                summary.skipped += 1;
                continue;
            }

            println!("[COPYING] {} / {} ({})", i + 1, total, id);
            copy_into_folder(self.api, id, &folder.id)
                .await
                .map_err(|e| DriveError::CopyFailed {
                    id: id.to_string(),
                    source: Box::new(e),
                })?;
            ledger.mark_done(id);
            summary.copied += 1;
        }

        info!(
            total = summary.total,
            copied = summary.copied,
            skipped = summary.skipped,
            cancelled = summary.cancelled,
            "copy run finished"
        );
        Ok(summary)
    }
}

/// Execute `request` and then flush `ledger`, whatever the run returned.
///
/// A failed flush is reported but never replaces the run's own result.
pub async fn run_and_flush<A: DriveApi + ?Sized>(
    api: &A,
    request: &CopyRequest,
    ledger: &mut ProgressLedger,
    cancel: CancellationToken,
) -> Result<RunSummary> {
    let result = CopyRun::new(api, cancel).execute(request, ledger).await;

    if let Err(e) = ledger.flush() {
        error!(path = ?ledger.path(), error = %e, "failed to save state");
        eprintln!("failed to save state to {:?}: {}", ledger.path(), e);
    }

    result
}
