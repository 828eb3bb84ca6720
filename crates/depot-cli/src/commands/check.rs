// check and permissions subcommands

use super::Session;
use depot_core::{DirectoryId, Permission};
use serde_json::{json, Value};

pub async fn decide(
    session: &Session,
    user: &str,
    directory: &str,
    action: Permission,
) -> anyhow::Result<Value> {
    let principal = session.principal(user).await?;
    let directory = DirectoryId::from(directory);
    let decision = session
        .depot
        .resolver
        .check(&principal, &directory, action)
        .await?;
    Ok(json!({
        "user": principal.id,
        "role": principal.role,
        "directory": directory,
        "action": action,
        "allowed": decision.is_allowed(),
        "decision": decision,
    }))
}

pub async fn effective(session: &Session, user: &str, directory: &str) -> anyhow::Result<Value> {
    let principal = session.principal(user).await?;
    let directory = DirectoryId::from(directory);
    let permissions = session
        .depot
        .resolver
        .effective_permissions(&principal, &directory)
        .await?;
    let chain = session.depot.resolver.ancestor_chain(&directory).await?;
    Ok(json!({
        "user": principal.id,
        "directory": directory,
        "permissions": permissions,
        "ancestors": chain,
    }))
}
