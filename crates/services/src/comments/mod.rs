//! # Comment trees
//!
//! Root comments read newest first, replies read oldest first.

pub mod assembly;
pub mod node;
pub mod ordering;

pub use assembly::{assemble, AssemblyReport, CommentForest, CommentTreeBuilder};
pub use node::CommentNode;
pub use ordering::{child_order, root_order, SiblingOrder};
