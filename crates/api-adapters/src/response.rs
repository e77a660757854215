//! # Response projection
//!
//! Field renaming only. Sibling order is whatever the tree builder produced;
//! nothing here sorts.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use domains::CommentId;
use serde::{Deserialize, Serialize};
use services::{ArticleWithComments, CommentForest, CommentNode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: CommentId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub email: String,
    pub display_name: String,
    pub parent_id: Option<CommentId>,
    pub children: Vec<CommentResponse>,
}

impl CommentResponse {
    pub fn from_forest(forest: &CommentForest) -> Vec<Self> {
        forest.roots().iter().map(Self::from).collect()
    }
}

impl From<&CommentNode> for CommentResponse {
    fn from(node: &CommentNode) -> Self {
        let record = node.record();
        Self {
            id: record.id,
            content: record.content.clone(),
            created_at: record.created_at,
            email: record.author_email().to_string(),
            display_name: record.author_display_name().to_string(),
            parent_id: record.parent_id,
            children: node.children().iter().map(Self::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleWithCommentsResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub hashtags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub email: String,
    /// Display name; the login id when the nickname is blank
    pub nickname: String,
    pub user_id: String,
    pub comments: Vec<CommentResponse>,
}

impl From<&ArticleWithComments> for ArticleWithCommentsResponse {
    fn from(value: &ArticleWithComments) -> Self {
        let article = &value.article;
        Self {
            id: article.id.0,
            title: article.title.clone(),
            content: article.content.clone(),
            hashtags: article.hashtags.clone(),
            created_at: article.created_at,
            email: article.author.email.clone(),
            nickname: article.author.display_name().to_string(),
            user_id: article.author.user_id.clone(),
            comments: CommentResponse::from_forest(&value.comments),
        }
    }
}
