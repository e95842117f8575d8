//! Reply counting and depth lookup over a [`CommentThread`].

use pr_review_json::{CommentIdx, CommentThread};
use std::collections::HashMap;

/// Number of descendants of `idx`: direct replies plus all of their replies.
pub fn count_all_replies(thread: &CommentThread, idx: CommentIdx) -> usize {
    let mut count = 0;
    let mut stack = thread.replies(idx).to_vec();
    while let Some(next) = stack.pop() {
        count += 1;
        stack.extend_from_slice(thread.replies(next));
    }
    count
}

/// Pre-order walk of every root's reply tree with the depth of each comment.
fn walk(thread: &CommentThread) -> impl Iterator<Item = (CommentIdx, usize)> + '_ {
    let mut stack: Vec<(CommentIdx, usize)> =
        thread.roots().iter().rev().map(|root| (*root, 0)).collect();

    std::iter::from_fn(move || {
        let (idx, depth) = stack.pop()?;
        stack.extend(
            thread
                .replies(idx)
                .iter()
                .rev()
                .map(|reply| (*reply, depth + 1)),
        );
        Some((idx, depth))
    })
}

/// Number of reply edges between the first comment with server id `id` and
/// its root.
///
/// Walks the whole thread on every call; use [`CommentDepthIndex`] for
/// repeated lookups. Returns `None` when no comment has that id.
pub fn depth_of(thread: &CommentThread, id: i64) -> Option<usize> {
    walk(thread)
        .find(|(idx, _)| thread.comment(*idx).id == id)
        .map(|(_, depth)| depth)
}

/// Precomputed id → depth map for one thread.
///
/// Build it once per parsed activities response; the thread is immutable,
/// so the index never goes stale for it.
#[derive(Debug, Clone, Default)]
pub struct CommentDepthIndex {
    depths: HashMap<i64, usize>,
}

impl CommentDepthIndex {
    pub fn build(thread: &CommentThread) -> Self {
        let mut depths = HashMap::with_capacity(thread.len());
        for (idx, depth) in walk(thread) {
            depths.entry(thread.comment(idx).id).or_insert(depth);
        }
        Self { depths }
    }

    /// Depth of the comment with server id `id`; `None` if it is not in the
    /// thread.
    pub fn depth_of(&self, id: i64) -> Option<usize> {
        self.depths.get(&id).copied()
    }

    /// Depth, treating unknown comments as top-level.
    pub fn depth_or_top_level(&self, id: i64) -> usize {
        self.depth_of(id).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}
