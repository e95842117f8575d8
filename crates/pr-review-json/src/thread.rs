//! Arena storage for comment reply trees
//!
//! Replies are unbounded in depth, so comments are kept in a flat node table
//! with index lists instead of nested ownership. Traversals over the table
//! use explicit work stacks.

use crate::types::Comment;

/// Index of a comment inside its [`CommentThread`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentIdx(usize);

impl CommentIdx {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A comment plus its position in the reply tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    pub comment: Comment,
    /// Comment this one replies to; `None` for top-level comments
    pub parent: Option<CommentIdx>,
    /// Direct replies in server order
    pub replies: Vec<CommentIdx>,
}

/// All comments of one activities response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentThread {
    nodes: Vec<CommentNode>,
    roots: Vec<CommentIdx>,
}

impl CommentThread {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a comment, as a root when `parent` is `None`, otherwise as the
    /// last reply of `parent`.
    pub fn push(&mut self, comment: Comment, parent: Option<CommentIdx>) -> CommentIdx {
        let idx = CommentIdx(self.nodes.len());
        self.nodes.push(CommentNode {
            comment,
            parent,
            replies: Vec::new(),
        });

        match parent {
            Some(parent) => self.nodes[parent.0].replies.push(idx),
            None => self.roots.push(idx),
        }
        idx
    }

    /// Top-level comments in server order
    pub fn roots(&self) -> &[CommentIdx] {
        &self.roots
    }

    pub fn node(&self, idx: CommentIdx) -> &CommentNode {
        &self.nodes[idx.0]
    }

    pub fn comment(&self, idx: CommentIdx) -> &Comment {
        &self.nodes[idx.0].comment
    }

    pub fn replies(&self, idx: CommentIdx) -> &[CommentIdx] {
        &self.nodes[idx.0].replies
    }

    pub fn parent(&self, idx: CommentIdx) -> Option<CommentIdx> {
        self.nodes[idx.0].parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All comments in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (CommentIdx, &Comment)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (CommentIdx(i), &node.comment))
    }

    /// First comment with the given server id
    pub fn find(&self, id: i64) -> Option<CommentIdx> {
        self.nodes
            .iter()
            .position(|node| node.comment.id == id)
            .map(CommentIdx)
    }

    /// Root comments anchored to `path` (file-level and inline)
    pub fn roots_for_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = CommentIdx> + 'a {
        self.roots
            .iter()
            .copied()
            .filter(move |idx| self.comment(*idx).path.as_deref() == Some(path))
    }

    /// Root comments without a file anchor
    pub fn general_roots(&self) -> impl Iterator<Item = CommentIdx> + '_ {
        self.roots
            .iter()
            .copied()
            .filter(|idx| self.comment(*idx).path.is_none())
    }

    /// Move every root (with its replies) of `other` behind the roots of `self`.
    pub fn append(&mut self, other: CommentThread) {
        let offset = self.nodes.len();
        let shift = |idx: CommentIdx| CommentIdx(idx.0 + offset);

        self.nodes.extend(other.nodes.into_iter().map(|node| CommentNode {
            comment: node.comment,
            parent: node.parent.map(shift),
            replies: node.replies.into_iter().map(shift).collect(),
        }));
        self.roots.extend(other.roots.into_iter().map(shift));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn comment(id: i64, path: Option<&str>) -> Comment {
        Comment {
            id,
            path: path.map(str::to_string),
            ..Comment::default()
        }
    }

    #[test]
    fn test_push_links_parent_and_replies() {
        let mut thread = CommentThread::new();
        let root = thread.push(comment(1, None), None);
        let a = thread.push(comment(2, None), Some(root));
        let b = thread.push(comment(3, None), Some(root));
        let nested = thread.push(comment(4, None), Some(a));

        assert_eq!(thread.roots(), &[root]);
        assert_eq!(thread.replies(root), &[a, b]);
        assert_eq!(thread.parent(nested), Some(a));
        assert_eq!(thread.parent(root), None);
        assert_eq!(thread.len(), 4);
        assert_eq!(thread.find(4), Some(nested));
        assert_eq!(thread.find(99), None);
    }

    #[test]
    fn test_roots_by_anchor() {
        let mut thread = CommentThread::new();
        let general = thread.push(comment(1, None), None);
        let on_file = thread.push(comment(2, Some("src/lib.rs")), None);
        thread.push(comment(3, Some("src/lib.rs")), Some(general));

        assert_eq!(thread.general_roots().collect::<Vec<_>>(), vec![general]);
        assert_eq!(
            thread.roots_for_path("src/lib.rs").collect::<Vec<_>>(),
            vec![on_file]
        );
    }

    #[test]
    fn test_append_shifts_indices() {
        let mut first = CommentThread::new();
        first.push(comment(1, None), None);

        let mut second = CommentThread::new();
        let root = second.push(comment(2, None), None);
        second.push(comment(3, None), Some(root));

        first.append(second);
        assert_eq!(first.len(), 3);
        assert_eq!(first.roots().len(), 2);
        let appended_root = first.roots()[1];
        assert_eq!(first.comment(appended_root).id, 2);
        let reply = first.replies(appended_root)[0];
        assert_eq!(first.comment(reply).id, 3);
        assert_eq!(first.parent(reply), Some(appended_root));
    }
}
