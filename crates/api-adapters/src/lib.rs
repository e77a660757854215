//! # api-adapters
//!
//! External-facing shapes for articles and comment trees, and (behind the
//! `web-axum` feature) the HTTP routes that serve them.

pub mod error;
pub mod response;
#[cfg(feature = "web-axum")]
pub mod routes;

pub use error::ApiError;
pub use response::{ArticleWithCommentsResponse, CommentResponse};
#[cfg(feature = "web-axum")]
pub use routes::{router, AppState};
