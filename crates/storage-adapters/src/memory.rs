//! # In-memory repository
//!
//! `DashMap`-backed implementation of `ArticleRepository`. Comments are kept
//! per article in insertion order; callers must not rely on that order.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{Article, ArticleId, ArticleRepository, CommentRecord, DomainError, Result};
use tracing::debug;

use crate::seed::SeedData;

#[derive(Debug, Default)]
pub struct InMemoryArticleRepository {
    articles: DashMap<ArticleId, Article>,
    comments: DashMap<ArticleId, Vec<CommentRecord>>,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository from seed data. Fails if a comment belongs to an
    /// article the seed does not contain.
    pub fn from_seed(seed: SeedData) -> Result<Self> {
        let repo = Self::new();
        for article in seed.articles {
            repo.insert_article(article);
        }
        for comment in seed.comments {
            repo.insert_comment(comment)?;
        }
        debug!(
            articles = repo.articles.len(),
            comments = repo.comments.iter().map(|entry| entry.len()).sum::<usize>(),
            "seeded in-memory repository"
        );
        Ok(repo)
    }

    /// Inserts or replaces an article.
    pub fn insert_article(&self, article: Article) {
        self.articles.insert(article.id, article);
    }

    pub fn insert_comment(&self, comment: CommentRecord) -> Result<()> {
        if !self.articles.contains_key(&comment.article_id) {
            return Err(DomainError::NotFound(
                "Article".into(),
                comment.article_id.to_string(),
            ));
        }
        self.comments
            .entry(comment.article_id)
            .or_default()
            .push(comment);
        Ok(())
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn find_article(&self, id: ArticleId) -> Result<Option<Article>> {
        Ok(self.articles.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_comments(&self, article_id: ArticleId) -> Result<Vec<CommentRecord>> {
        Ok(self
            .comments
            .get(&article_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
