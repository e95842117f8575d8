//! Tree models built from review records.

mod comment_tree;
mod file_tree;
mod flat_entry;

pub use comment_tree::{count_all_replies, depth_of, CommentDepthIndex};
pub use file_tree::{FileTree, FileTreeCache, FileTreeItem, FileTreeNode, FolderEntry, NodeId};
pub use flat_entry::{flatten, FlatEntry};
