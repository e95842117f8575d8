//! # pr-review-tree
//!
//! Presentation trees built from parsed review records.
//!
//! - [`FileTree`] groups a flat list of changed files into folders,
//!   compressing single-child folder chains into one `a.b.c` node.
//! - [`count_all_replies`] and [`CommentDepthIndex`] answer questions about
//!   the reply structure of a [`CommentThread`].
//! - [`TreeContent`] is the node contract a tree widget renders from; both
//!   trees implement it, and [`flatten`] turns any implementation into rows
//!   with guide-line prefixes.
//!
//! Everything here is a pure function of its input. Nothing is mutated after
//! construction, so trees can be built on any thread and shared freely.
//!
//! ## Usage
//!
//! ```rust
//! use pr_review_json::parse_changed_files;
//! use pr_review_tree::FileTree;
//!
//! let body = r#"{"values":[{"type":"ADD","path":{"toString":"a/b/c/file.txt"}}]}"#;
//! let tree = FileTree::build(&parse_changed_files(body));
//!
//! let root = tree.roots()[0];
//! assert_eq!(tree.label(root), "a.b.c");
//! ```

pub mod model;
pub mod traits;

pub use model::{
    count_all_replies, depth_of, flatten, CommentDepthIndex, FileTree, FileTreeCache,
    FileTreeItem, FileTreeNode, FlatEntry, FolderEntry, NodeId,
};
pub use pr_review_json::{CommentIdx, CommentThread};
pub use traits::TreeContent;
