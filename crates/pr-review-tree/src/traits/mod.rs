//! Extension traits for tree rendering.

mod tree_content;

pub use tree_content::TreeContent;
