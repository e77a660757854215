//! rusty-board/crates/services/src/lib.rs
//!
//! Business logic for the comment board: turning flat comment batches into
//! ordered reply trees, and the use cases that serve them.

pub mod article;
pub mod comments;

pub use article::{ArticleService, ArticleWithComments};
pub use comments::{
    assemble, AssemblyReport, CommentForest, CommentNode, CommentTreeBuilder, SiblingOrder,
};
