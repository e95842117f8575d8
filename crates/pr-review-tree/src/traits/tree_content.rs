//! Node contract consumed by tree widgets.

use crate::model::{FileTree, NodeId};
use pr_review_json::{CommentIdx, CommentThread};
use std::borrow::Cow;

/// Read-only hierarchical content a tree widget can render.
///
/// Implement this trait to expose a model to a tree view: the widget asks
/// for the roots, expands nodes through [`children`](TreeContent::children)
/// and labels each row with [`label`](TreeContent::label).
pub trait TreeContent {
    /// Handle of a node; cheap to copy and only meaningful for this tree.
    type Node: Copy + Eq;

    /// Top-level nodes in display order.
    fn roots(&self) -> &[Self::Node];

    /// Children of `node` in display order; empty for leaves.
    fn children(&self, node: Self::Node) -> &[Self::Node];

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    fn has_children(&self, node: Self::Node) -> bool {
        !self.children(node).is_empty()
    }

    /// Display text of `node`.
    fn label(&self, node: Self::Node) -> Cow<'_, str>;
}

impl TreeContent for FileTree {
    type Node = NodeId;

    fn roots(&self) -> &[NodeId] {
        FileTree::roots(self)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        FileTree::children(self, node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        FileTree::parent(self, node)
    }

    fn label(&self, node: NodeId) -> Cow<'_, str> {
        Cow::Borrowed(FileTree::label(self, node))
    }
}

impl TreeContent for CommentThread {
    type Node = CommentIdx;

    fn roots(&self) -> &[CommentIdx] {
        CommentThread::roots(self)
    }

    fn children(&self, node: CommentIdx) -> &[CommentIdx] {
        self.replies(node)
    }

    fn parent(&self, node: CommentIdx) -> Option<CommentIdx> {
        CommentThread::parent(self, node)
    }

    /// `author: first line of text`
    fn label(&self, node: CommentIdx) -> Cow<'_, str> {
        let comment = self.comment(node);
        let first_line = comment.text.lines().next().unwrap_or("");
        Cow::Owned(format!("{}: {}", comment.author_label(), first_line))
    }
}
