//! Flatten seed folders into the files they directly contain.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::api::DriveApi;
use crate::error::Result;
use crate::resolver::escape_query_value;
use crate::target::TargetSet;

/// Query for the untrashed direct children of `parent_id`.
pub fn children_query(parent_id: &str) -> String {
    format!(
        "'{}' in parents and trashed = false",
        escape_query_value(parent_id)
    )
}

/// Replace every seed folder by its direct child files.
///
/// Each seed is listed with its own query. Google-native children (folders,
/// shortcuts, Docs, ...) are skipped because the copy endpoint refuses them.
/// Any id seen as the parent of a child is dropped, so seed folders vanish
/// and plain file seeds, which have no children, pass through unchanged.
/// Only one level is expanded.
pub async fn expand<A: DriveApi + ?Sized>(api: &A, seeds: &TargetSet) -> Result<TargetSet> {
    let mut targets = seeds.clone();
    let mut parents: HashSet<String> = HashSet::new();

    for seed in seeds.iter() {
        let children = api.query_files(&children_query(seed)).await?;
        debug!(seed, count = children.len(), "listed seed children");

        for child in children {
            parents.extend(child.parents.iter().cloned());
            if child.is_native() {
                debug!(name = %child.name, id = %child.id, "skipping native object, it cannot be copied");
                println!("skip {}, id: {} (cannot copy it)", child.name, child.id);
                continue;
            }
            targets.insert(child.id);
        }
    }

    for parent in &parents {
        targets.remove(parent);
    }

    info!(seeds = seeds.len(), files = targets.len(), "expanded targets");
    Ok(targets)
}
