//! Flattening of any [`TreeContent`] into rows for line-based rendering.

use crate::traits::TreeContent;

/// A flattened tree row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry<N> {
    pub node: N,
    /// Nesting depth (0 = root entry).
    pub depth: usize,
    pub label: String,
    pub has_children: bool,
    /// Whether the children of this row follow it.
    pub is_expanded: bool,
    /// Whether this is the last item in its parent.
    pub is_last: bool,
    /// For each ancestor between the root entry and this row, whether that
    /// ancestor has more siblings below. Drives the vertical guide lines (│).
    pub ancestor_has_next: Vec<bool>,
}

impl<N> FlatEntry<N> {
    /// Expand/collapse marker for this row.
    pub fn icon(&self) -> &'static str {
        if self.has_children {
            if self.is_expanded {
                "▼ "
            } else {
                "▶ "
            }
        } else {
            "  "
        }
    }

    /// Tree prefix with guide lines.
    ///
    /// - Root entry: ""
    /// - First child of a root entry: "├─ "
    /// - Last child of a root entry: "└─ "
    /// - Nested, ancestor has siblings below: "│  ├─ "
    pub fn tree_prefix(&self) -> String {
        if self.depth == 0 {
            return String::new();
        }

        let mut prefix = String::new();
        for &has_next in &self.ancestor_has_next {
            prefix.push_str(if has_next { "│  " } else { "   " });
        }
        prefix.push_str(if self.is_last { "└─ " } else { "├─ " });
        prefix
    }
}

struct Frame<N> {
    node: N,
    depth: usize,
    is_last: bool,
    ancestor_has_next: Vec<bool>,
}

/// Flatten `tree` in display order, descending only into nodes for which
/// `is_expanded` returns true.
pub fn flatten<T: TreeContent>(
    tree: &T,
    is_expanded: impl Fn(T::Node) -> bool,
) -> Vec<FlatEntry<T::Node>> {
    let mut rows = Vec::new();
    let mut stack = frames(tree.roots(), 0, &[]);

    while let Some(frame) = stack.pop() {
        let has_children = tree.has_children(frame.node);
        let expanded = has_children && is_expanded(frame.node);

        if expanded {
            let mut ancestors = frame.ancestor_has_next.clone();
            if frame.depth > 0 {
                ancestors.push(!frame.is_last);
            }
            stack.extend(frames(tree.children(frame.node), frame.depth + 1, &ancestors));
        }

        rows.push(FlatEntry {
            node: frame.node,
            depth: frame.depth,
            label: tree.label(frame.node).into_owned(),
            has_children,
            is_expanded: expanded,
            is_last: frame.is_last,
            ancestor_has_next: frame.ancestor_has_next,
        });
    }

    rows
}

/// Frames for `siblings`, reversed so they pop in display order.
fn frames<N: Copy>(siblings: &[N], depth: usize, ancestors: &[bool]) -> Vec<Frame<N>> {
    let count = siblings.len();
    siblings
        .iter()
        .enumerate()
        .rev()
        .map(|(i, node)| Frame {
            node: *node,
            depth,
            is_last: i + 1 == count,
            ancestor_has_next: ancestors.to_vec(),
        })
        .collect()
}
