//! Shared fixtures for the integration tests.

use std::path::PathBuf;

use chrono::{DateTime, Duration, TimeZone, Utc};
use domains::{Article, ArticleId, CommentId, CommentRecord, UserAccount};
use services::CommentNode;

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn uno() -> UserAccount {
    UserAccount {
        user_id: "uno".into(),
        email: "uno@mail.com".into(),
        nickname: Some("Uno".into()),
    }
}

pub fn article(id: i64) -> Article {
    Article {
        id: ArticleId(id),
        title: "title".into(),
        content: "content".into(),
        hashtags: ["java".to_string()].into_iter().collect(),
        created_at: base_time(),
        author: uno(),
    }
}

/// A comment on article 1 created `offset` after [`base_time`].
pub fn comment(id: i64, parent: Option<i64>, offset: Duration) -> CommentRecord {
    CommentRecord {
        id: CommentId(id),
        article_id: ArticleId(1),
        parent_id: parent.map(CommentId),
        content: format!("test comment {id}"),
        created_at: base_time() + offset,
        author: uno(),
    }
}

pub fn ids(nodes: &[CommentNode]) -> Vec<i64> {
    nodes.iter().map(|node| node.id().0).collect()
}

/// The sample seed shipped in `config/seed.json`.
pub fn sample_seed_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/seed.json")
}
