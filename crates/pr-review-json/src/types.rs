//! Typed review records
//!
//! These types are value snapshots of one REST response. They are created
//! once per fetch and replaced wholesale on the next one. Absent wire fields
//! stay at their type default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Convert an epoch-millisecond wire timestamp.
///
/// Returns `None` for the zero default (field absent) and out-of-range values.
pub fn timestamp(millis: i64) -> Option<DateTime<Utc>> {
    if millis == 0 {
        return None;
    }
    DateTime::from_timestamp_millis(millis)
}

/// Deserialize a field, reading an explicit `null` as the type default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A server-side user account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    /// Login name
    pub name: Option<String>,
    pub email_address: Option<String>,
    /// Human readable name
    pub display_name: Option<String>,
}

impl User {
    /// Best available name for display: display name, then login name.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("unknown")
    }
}

/// A user taking part in a pull request (author or reviewer)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Participant {
    #[serde(deserialize_with = "null_as_default")]
    pub user: User,
    /// Role string, e.g. "AUTHOR" or "REVIEWER"
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(deserialize_with = "null_as_default")]
    pub approved: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Repository {
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub project: Project,
}

/// A branch or tag reference on one side of a pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ref {
    /// Fully qualified ref, e.g. `refs/heads/feature/foo`
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Short name, e.g. `feature/foo`
    #[serde(deserialize_with = "null_as_default")]
    pub display_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub repository: Repository,
}

/// Lifecycle state of a pull request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestState {
    #[default]
    Open,
    Merged,
    Declined,
    /// Any state string not known to this client
    #[serde(other)]
    Unknown,
}

impl PullRequestState {
    /// Wire name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            PullRequestState::Open => "OPEN",
            PullRequestState::Merged => "MERGED",
            PullRequestState::Declined => "DECLINED",
            PullRequestState::Unknown => "UNKNOWN",
        }
    }
}

/// A pull request as listed by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Server-side id, never negative
    pub id: i64,
    /// Optimistic-locking version
    pub version: i32,
    pub title: String,
    pub description: String,
    pub state: PullRequestState,
    pub open: bool,
    pub closed: bool,
    /// Epoch milliseconds
    pub created_date: i64,
    /// Epoch milliseconds
    pub updated_date: i64,
    /// Source branch
    pub from_ref: Ref,
    /// Target branch
    pub to_ref: Ref,
    pub author: Participant,
    pub reviewers: Vec<Participant>,
    /// Number of comments, from `properties.commentCount`
    pub comment_count: i32,
}

impl PullRequest {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created_date)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.updated_date)
    }

    /// Whether the pull request can still receive changes
    pub fn is_active(&self) -> bool {
        self.open && !self.closed && self.state == PullRequestState::Open
    }

    /// Number of reviewers that approved
    pub fn approvals(&self) -> usize {
        self.reviewers.iter().filter(|r| r.approved).count()
    }
}

/// A repository path as reported by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Path {
    /// Full path text
    #[serde(rename = "toString", deserialize_with = "null_as_default")]
    pub full: String,
    /// Leaf name
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub extension: Option<String>,
    /// Ordered path segments
    #[serde(deserialize_with = "null_as_default")]
    pub components: Vec<String>,
}

impl Path {
    /// Path segments, falling back to splitting the full text on `/`.
    pub fn segments(&self) -> Vec<&str> {
        if !self.components.is_empty() {
            return self.components.iter().map(String::as_str).collect();
        }
        self.full.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Leaf name, falling back to the last segment.
    pub fn leaf(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        self.segments().last().copied().unwrap_or("")
    }
}

/// Kind of change as presented to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    Added,
    #[default]
    Modified,
    Deleted,
    Renamed,
}

impl ChangeType {
    /// Map a wire change type.
    ///
    /// `ADD`, `DELETE` and `MOVE` have their own kinds; everything else,
    /// including `COPY` and `MODIFY`, is a modification.
    pub fn from_wire(kind: &str) -> Self {
        match kind {
            "ADD" => ChangeType::Added,
            "DELETE" => ChangeType::Deleted,
            "MOVE" => ChangeType::Renamed,
            _ => ChangeType::Modified,
        }
    }

    /// One-letter status marker
    pub fn marker(&self) -> char {
        match self {
            ChangeType::Added => 'A',
            ChangeType::Modified => 'M',
            ChangeType::Deleted => 'D',
            ChangeType::Renamed => 'R',
        }
    }
}

/// A file touched by a pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Wire change type (ADD, MODIFY, DELETE, MOVE, COPY, ...)
    pub kind: String,
    pub change_type: ChangeType,
    pub path: Path,
    /// Source path, sent for moves and copies
    pub src_path: Option<Path>,
}

impl ChangedFile {
    pub fn name(&self) -> &str {
        self.path.leaf()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentState {
    #[default]
    Open,
    Resolved,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentSeverity {
    #[default]
    Normal,
    /// A task that blocks merging
    Blocker,
    #[serde(other)]
    Unknown,
}

/// Kind of diff line a comment is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineType {
    Context,
    Added,
    Removed,
    #[serde(other)]
    Unknown,
}

/// Which side of a two-pane comparison a comment is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileType {
    /// Source branch side
    From,
    /// Target branch side
    To,
    #[serde(other)]
    Unknown,
}

/// Classification of a comment by its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// Pull-request level, no path
    General,
    /// Attached to a file but no line
    FileLevel,
    /// Attached to a line of a file
    Inline,
}

/// A review comment; replies live in [`crate::CommentThread`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub version: i32,
    pub text: String,
    pub author_name: Option<String>,
    pub author_display_name: Option<String>,
    pub author_email: Option<String>,
    /// Epoch milliseconds
    pub created_date: i64,
    /// Epoch milliseconds
    pub updated_date: i64,
    pub state: CommentState,
    pub severity: CommentSeverity,
    /// 1-based line number of the anchor
    pub line: Option<u32>,
    pub line_type: Option<LineType>,
    pub file_type: Option<FileType>,
    pub path: Option<String>,
    pub src_path: Option<String>,
}

impl Comment {
    pub fn kind(&self) -> CommentKind {
        match (&self.path, self.line) {
            (None, _) => CommentKind::General,
            (Some(_), None) => CommentKind::FileLevel,
            (Some(_), Some(_)) => CommentKind::Inline,
        }
    }

    /// Display name, then login name
    pub fn author_label(&self) -> &str {
        self.author_display_name
            .as_deref()
            .or(self.author_name.as_deref())
            .unwrap_or("unknown")
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created_date)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.updated_date)
    }

    pub fn is_resolved(&self) -> bool {
        self.state == CommentState::Resolved
    }
}

/// Paging metadata of a list response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub limit: Option<i32>,
    pub is_last_page: Option<bool>,
    pub next_page_start: Option<i64>,
}

impl PageInfo {
    /// Whether the server reported more pages after this one
    pub fn has_more(&self) -> bool {
        self.is_last_page == Some(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_change_type_mapping() {
        assert_eq!(ChangeType::from_wire("ADD"), ChangeType::Added);
        assert_eq!(ChangeType::from_wire("DELETE"), ChangeType::Deleted);
        assert_eq!(ChangeType::from_wire("MOVE"), ChangeType::Renamed);
        assert_eq!(ChangeType::from_wire("MODIFY"), ChangeType::Modified);
        assert_eq!(ChangeType::from_wire("COPY"), ChangeType::Modified);
        assert_eq!(ChangeType::from_wire("UNKNOWN_KIND"), ChangeType::Modified);
    }

    #[test]
    fn test_comment_kind() {
        let general = Comment::default();
        assert_eq!(general.kind(), CommentKind::General);

        let file_level = Comment {
            path: Some("src/lib.rs".to_string()),
            ..Comment::default()
        };
        assert_eq!(file_level.kind(), CommentKind::FileLevel);

        let inline = Comment {
            line: Some(12),
            ..file_level.clone()
        };
        assert_eq!(inline.kind(), CommentKind::Inline);

        // A line without a path is still a general comment
        let stray_line = Comment {
            line: Some(3),
            ..Comment::default()
        };
        assert_eq!(stray_line.kind(), CommentKind::General);
    }

    #[test]
    fn test_path_segments_fallback() {
        let path = Path {
            full: "src/model/mod.rs".to_string(),
            ..Path::default()
        };
        assert_eq!(path.segments(), vec!["src", "model", "mod.rs"]);
        assert_eq!(path.leaf(), "mod.rs");

        let with_components = Path {
            full: "ignored".to_string(),
            name: "b.txt".to_string(),
            components: vec!["a".to_string(), "b.txt".to_string()],
            ..Path::default()
        };
        assert_eq!(with_components.segments(), vec!["a", "b.txt"]);
        assert_eq!(with_components.leaf(), "b.txt");
    }

    #[test]
    fn test_enum_unknown_fallback() {
        let state: PullRequestState = serde_json::from_str("\"SUPERSEDED\"").unwrap();
        assert_eq!(state, PullRequestState::Unknown);
        let state: PullRequestState = serde_json::from_str("\"MERGED\"").unwrap();
        assert_eq!(state, PullRequestState::Merged);
        let side: FileType = serde_json::from_str("\"TO\"").unwrap();
        assert_eq!(side, FileType::To);
    }

    #[test]
    fn test_pull_request_state_wire_name() {
        for wire in ["OPEN", "MERGED", "DECLINED"] {
            let state: PullRequestState = serde_json::from_str(&format!("\"{}\"", wire)).unwrap();
            assert_eq!(state.as_str(), wire);
        }
        assert_eq!(PullRequestState::Unknown.as_str(), "UNKNOWN");
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(timestamp(0), None);
        let ts = timestamp(1_700_000_000_000).unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_author_label_fallback() {
        let comment = Comment {
            author_name: Some("jdoe".to_string()),
            ..Comment::default()
        };
        assert_eq!(comment.author_label(), "jdoe");
        assert_eq!(Comment::default().author_label(), "unknown");
        assert_eq!(User::default().label(), "unknown");
    }
}
