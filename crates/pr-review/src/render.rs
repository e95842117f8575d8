//! Plain-text rendering of trees and pull request lists

use pr_review_json::{CommentThread, PullRequest};
use pr_review_tree::{count_all_replies, flatten, FileTree, TreeContent};

/// One line per visible node: guide lines, label and a per-node suffix
pub fn tree_lines<T: TreeContent>(tree: &T, suffix: impl Fn(T::Node) -> String) -> Vec<String> {
    flatten(tree, |_| true)
        .into_iter()
        .map(|row| format!("{}{}{}", row.tree_prefix(), row.label, suffix(row.node)))
        .collect()
}

pub fn file_tree_lines(tree: &FileTree) -> Vec<String> {
    tree_lines(tree, |node| match tree.file(node) {
        Some(file) => format!("  [{}]", file.change_type.marker()),
        None => String::new(),
    })
}

pub fn comment_lines(thread: &CommentThread) -> Vec<String> {
    tree_lines(thread, |idx| {
        if thread.parent(idx).is_some() {
            return String::new();
        }
        let comment = thread.comment(idx);
        let location = match (&comment.path, comment.line) {
            (Some(path), Some(line)) => format!(" @ {}:{}", path, line),
            (Some(path), None) => format!(" @ {}", path),
            _ => String::new(),
        };
        match count_all_replies(thread, idx) {
            0 => location,
            1 => format!("{} (1 reply)", location),
            n => format!("{} ({} replies)", location, n),
        }
    })
}

pub fn pull_request_lines(prs: &[PullRequest]) -> Vec<String> {
    prs.iter()
        .map(|pr| {
            format!(
                "#{:<5} {:<9} {} ({} -> {}, {})",
                pr.id,
                pr.state.as_str(),
                pr.title,
                pr.from_ref.display_id,
                pr.to_ref.display_id,
                pr.author.user.label()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pr_review_json::{parse_activities, parse_changed_files, parse_pull_requests};

    #[test]
    fn test_file_tree_lines() {
        let files = parse_changed_files(
            r#"{"values":[
                {"type":"ADD","path":{"toString":"src/app/main.rs"}},
                {"type":"DELETE","path":{"toString":"src/app/old.rs"}},
                {"type":"MODIFY","path":{"toString":"Cargo.toml"}}
            ]}"#,
        );
        let tree = FileTree::build(&files);
        assert_eq!(
            file_tree_lines(&tree),
            vec![
                "src.app",
                "├─ main.rs  [A]",
                "└─ old.rs  [D]",
                "Cargo.toml  [M]",
            ]
        );
    }

    #[test]
    fn test_comment_lines() {
        let thread = parse_activities(
            r#"{"values":[{"action":"COMMENTED",
                "commentAnchor":{"path":"src/lib.rs","line":3},
                "comment":{"id":1,"text":"Why?","author":{"name":"ana"},
                    "comments":[{"id":2,"text":"Because","author":{"name":"bo"}}]}}]}"#,
        );
        assert_eq!(
            comment_lines(&thread),
            vec!["ana: Why? @ src/lib.rs:3 (1 reply)", "└─ bo: Because"]
        );
    }

    #[test]
    fn test_pull_request_lines() {
        let prs = parse_pull_requests(
            r#"{"values":[{"id":7,"title":"Add lexer","state":"OPEN",
                "fromRef":{"displayId":"feature/lexer"},"toRef":{"displayId":"main"},
                "author":{"user":{"name":"ana","displayName":"Ana"}}}]}"#,
        );
        assert_eq!(
            pull_request_lines(&prs),
            vec!["#7     OPEN      Add lexer (feature/lexer -> main, Ana)"]
        );
    }
}
