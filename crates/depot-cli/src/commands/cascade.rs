// plan-cascade subcommand. Planning only; nothing is deleted.

use super::Session;
use depot_core::effects::{FileStore, GrantStore};
use depot_core::DirectoryId;
use serde_json::{json, Value};

pub async fn plan(session: &Session, directory: &str) -> anyhow::Result<Value> {
    let root = DirectoryId::from(directory);
    let plan = session.depot.planner.plan(&root).await?;

    let mut files = 0;
    let mut grants = 0;
    for id in &plan.directories {
        files += session.backend.files.list_by_directory(id).await?.len();
        grants += session.backend.grants.list_by_directory(id).await?.len();
    }

    Ok(json!({
        "root": plan.root,
        "directories": plan.directories,
        "files": files,
        "grants": grants,
    }))
}
