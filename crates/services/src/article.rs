//! # Article Service
//!
//! Loads an article and its flat comment batch through the repository port
//! and hands back the article with its assembled comment forest.

use std::sync::Arc;

use domains::{Article, ArticleId, ArticleRepository, AssemblyPolicy, DomainError, Result};
use tracing::{info, instrument};

use crate::comments::{CommentForest, CommentTreeBuilder};

/// An article together with its ordered comment forest.
#[derive(Debug)]
pub struct ArticleWithComments {
    pub article: Article,
    pub comments: CommentForest,
}

#[derive(Clone)]
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
    builder: CommentTreeBuilder,
}

impl ArticleService {
    pub fn new(repo: Arc<dyn ArticleRepository>, policy: AssemblyPolicy) -> Self {
        Self {
            repo,
            builder: CommentTreeBuilder::new(policy),
        }
    }

    #[instrument(skip(self))]
    pub async fn article_with_comments(&self, article_id: ArticleId) -> Result<ArticleWithComments> {
        let article = self.require_article(article_id).await?;
        let comments = self.assemble_comments(article_id).await?;
        Ok(ArticleWithComments { article, comments })
    }

    /// Only the comment forest; still fails with `NotFound` for unknown articles.
    #[instrument(skip(self))]
    pub async fn comments(&self, article_id: ArticleId) -> Result<CommentForest> {
        self.require_article(article_id).await?;
        self.assemble_comments(article_id).await
    }

    async fn require_article(&self, article_id: ArticleId) -> Result<Article> {
        self.repo
            .find_article(article_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Article".into(), article_id.to_string()))
    }

    async fn assemble_comments(&self, article_id: ArticleId) -> Result<CommentForest> {
        let records = self.repo.list_comments(article_id).await?;
        let forest = self.builder.assemble(records)?;
        if !forest.report().is_clean() {
            info!(
                orphans = forest.report().orphans.len(),
                dropped = forest.report().dropped.len(),
                duplicates = forest.report().duplicates.len(),
                "comment batch needed repair"
            );
        }
        Ok(forest)
    }
}
