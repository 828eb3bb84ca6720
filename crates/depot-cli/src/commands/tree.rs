// tree subcommand

use super::Session;
use serde_json::{json, Value};

pub async fn show(session: &Session, user: &str) -> anyhow::Result<Value> {
    let principal = session.principal(user).await?;
    let forest = session.depot.tree.build_tree(&principal).await?;
    Ok(json!({
        "user": principal.id,
        "roots": forest,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixture;

    #[tokio::test]
    async fn shared_subtree_nests_under_granted_root() {
        let session = fixture::session().await;
        let out = show(&session, "bob").await.unwrap();
        let roots = out["roots"].as_array().unwrap();
        let ids: Vec<_> = roots.iter().map(|r| r["id"].as_str().unwrap()).collect();
        // Owned first, then public, then shared.
        assert_eq!(ids, vec!["bob-home", "public", "projects"]);
        let projects = &roots[2];
        // reports is not visible to bob on its own: the grant is on projects.
        assert_eq!(projects["children"], json!([]));
    }

    #[tokio::test]
    async fn super_admin_sees_everything() {
        let session = fixture::session().await;
        let out = show(&session, "root").await.unwrap();
        let count: usize = out["roots"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| 1 + r["children"].as_array().unwrap().len())
            .sum();
        assert_eq!(count, 4);
    }
}
