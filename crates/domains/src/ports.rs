//! # Core Traits (Ports)
//!
//! Any storage adapter must implement these traits to be used by the services.

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{Article, ArticleId, CommentRecord};

/// Read contract for articles and their flat comment batches.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn find_article(&self, id: ArticleId) -> Result<Option<Article>>;

    /// Every comment of the article, in no particular order.
    async fn list_comments(&self, article_id: ArticleId) -> Result<Vec<CommentRecord>>;
}
