//! JSON seed files: `{ "articles": [...], "comments": [...] }`.

use std::path::Path;

use anyhow::Context;
use domains::{Article, CommentRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
}

/// Reads and parses a seed file.
pub async fn load_seed(path: impl AsRef<Path>) -> anyhow::Result<SeedData> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading seed file {}", path.display()))?;
    let seed = serde_json::from_str(&raw)
        .with_context(|| format!("parsing seed file {}", path.display()))?;
    Ok(seed)
}
