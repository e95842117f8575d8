//! Domain parsing of pull request list, changes and activities responses
//!
//! The raw scanner locates the `"values"` array and slices out each element;
//! every element is then decoded with `serde_json` into a wire struct and
//! mapped onto the typed records. An element that fails to decode is logged
//! and skipped, the rest of the list is still returned.

use crate::raw::{
    extract_boolean, extract_int, extract_long, extract_string, find_array_span, iterate_objects,
};
use crate::thread::{CommentIdx, CommentThread};
use crate::types::{
    null_as_default, ChangeType, ChangedFile, Comment, CommentSeverity, CommentState, FileType,
    LineType, PageInfo, Participant, Path, PullRequest, PullRequestState, Ref, User,
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

const VALUES_KEY: &str = "\"values\":";
const ACTION_KEY: &str = "\"action\":";
const COMMENTED: &str = "COMMENTED";

/// Why a single list element was rejected
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid JSON element: {0}")]
    Json(#[from] serde_json::Error),

    #[error("element is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has invalid value {value}")]
    InvalidValue { field: &'static str, value: i64 },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PullRequestWire {
    id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    version: i32,
    #[serde(deserialize_with = "null_as_default")]
    title: String,
    description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    state: PullRequestState,
    #[serde(deserialize_with = "null_as_default")]
    open: bool,
    #[serde(deserialize_with = "null_as_default")]
    closed: bool,
    #[serde(deserialize_with = "null_as_default")]
    created_date: i64,
    #[serde(deserialize_with = "null_as_default")]
    updated_date: i64,
    #[serde(deserialize_with = "null_as_default")]
    from_ref: Ref,
    #[serde(deserialize_with = "null_as_default")]
    to_ref: Ref,
    #[serde(deserialize_with = "null_as_default")]
    author: Participant,
    #[serde(deserialize_with = "null_as_default")]
    reviewers: Vec<Participant>,
    #[serde(deserialize_with = "null_as_default")]
    properties: PropertiesWire,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PropertiesWire {
    #[serde(deserialize_with = "null_as_default")]
    comment_count: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ChangedFileWire {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    kind: String,
    path: Option<Path>,
    src_path: Option<Path>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ActivityWire {
    #[serde(deserialize_with = "null_as_default")]
    action: String,
    comment: Option<Value>,
    comment_anchor: Option<AnchorWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AnchorWire {
    line: Option<u32>,
    line_type: Option<LineType>,
    file_type: Option<FileType>,
    path: Option<String>,
    src_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CommentWire {
    id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    version: i32,
    #[serde(deserialize_with = "null_as_default")]
    text: String,
    author: Option<User>,
    #[serde(deserialize_with = "null_as_default")]
    created_date: i64,
    #[serde(deserialize_with = "null_as_default")]
    updated_date: i64,
    #[serde(deserialize_with = "null_as_default")]
    state: CommentState,
    #[serde(deserialize_with = "null_as_default")]
    severity: CommentSeverity,
    comments: Option<Value>,
}

/// Parse every element of a list response's `"values"` array with `parse`,
/// skipping the ones it rejects.
fn parse_values<T>(
    json: &str,
    what: &str,
    parse: impl Fn(&str) -> Result<T, ParseError>,
) -> Vec<T> {
    let Some(span) = find_array_span(json, VALUES_KEY) else {
        log::debug!("No values array in {} response", what);
        return Vec::new();
    };

    iterate_objects(json, span)
        .enumerate()
        .filter_map(|(index, element)| match parse(element) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping {} at index {}: {}", what, index, e);
                None
            }
        })
        .collect()
}

fn non_negative_id(id: Option<i64>) -> Result<i64, ParseError> {
    match id {
        Some(id) if id >= 0 => Ok(id),
        Some(id) => Err(ParseError::InvalidValue {
            field: "id",
            value: id,
        }),
        None => Err(ParseError::MissingField("id")),
    }
}

/// Parse a pull request list response.
pub fn parse_pull_requests(json: &str) -> Vec<PullRequest> {
    let prs = parse_values(json, "pull request", try_parse_pull_request);
    log::debug!("Parsed {} pull requests", prs.len());
    prs
}

/// Parse one pull request object; `None` if it is malformed.
pub fn parse_pull_request(obj: &str) -> Option<PullRequest> {
    try_parse_pull_request(obj)
        .map_err(|e| log::warn!("Failed to parse pull request: {}", e))
        .ok()
}

fn try_parse_pull_request(obj: &str) -> Result<PullRequest, ParseError> {
    let wire: PullRequestWire = serde_json::from_str(obj)?;

    Ok(PullRequest {
        id: non_negative_id(wire.id)?,
        version: wire.version,
        title: wire.title,
        description: wire.description.unwrap_or_default(),
        state: wire.state,
        open: wire.open,
        closed: wire.closed,
        created_date: wire.created_date,
        updated_date: wire.updated_date,
        from_ref: wire.from_ref,
        to_ref: wire.to_ref,
        author: wire.author,
        reviewers: wire.reviewers,
        comment_count: wire.properties.comment_count,
    })
}

/// Parse a changes response into changed files, in server order.
pub fn parse_changed_files(json: &str) -> Vec<ChangedFile> {
    let files = parse_values(json, "changed file", try_parse_changed_file);
    log::debug!("Parsed {} changed files", files.len());
    files
}

/// Parse one change object; `None` if it is malformed.
pub fn parse_changed_file(obj: &str) -> Option<ChangedFile> {
    try_parse_changed_file(obj)
        .map_err(|e| log::warn!("Failed to parse changed file: {}", e))
        .ok()
}

fn try_parse_changed_file(obj: &str) -> Result<ChangedFile, ParseError> {
    let wire: ChangedFileWire = serde_json::from_str(obj)?;
    let path = wire.path.ok_or(ParseError::MissingField("path"))?;

    Ok(ChangedFile {
        change_type: ChangeType::from_wire(&wire.kind),
        kind: wire.kind,
        path,
        src_path: wire.src_path,
    })
}

/// Parse an activities response into a comment thread.
///
/// Only `COMMENTED` activities contribute. Each one adds its comment as a
/// root, with the activity's anchor merged in, followed by the comment's
/// nested replies.
pub fn parse_activities(json: &str) -> CommentThread {
    let threads = parse_values(json, "comment activity", try_parse_activity);

    let mut thread = CommentThread::new();
    for activity in threads.into_iter().flatten() {
        thread.append(activity);
    }
    log::debug!(
        "Parsed {} comments in {} threads",
        thread.len(),
        thread.roots().len()
    );
    thread
}

/// `Ok(None)` for activities that are not comments.
fn try_parse_activity(obj: &str) -> Result<Option<CommentThread>, ParseError> {
    // Cheap textual pre-check, most activities are not comments
    if let Some(action) = extract_string(obj, ACTION_KEY) {
        if action != COMMENTED {
            log::trace!("Ignoring {} activity", action);
            return Ok(None);
        }
    }

    let wire: ActivityWire = serde_json::from_str(obj)?;
    if wire.action != COMMENTED {
        return Ok(None);
    }
    let comment = wire.comment.ok_or(ParseError::MissingField("comment"))?;

    let mut thread = CommentThread::new();
    build_comment_tree(comment, wire.comment_anchor.as_ref(), &mut thread)?;
    Ok(Some(thread))
}

/// Parse one comment object with its replies; `None` if the comment itself
/// is malformed.
pub fn parse_comment(obj: &str) -> Option<CommentThread> {
    let parsed = serde_json::from_str::<Value>(obj)
        .map_err(ParseError::from)
        .and_then(|value| {
            let mut thread = CommentThread::new();
            build_comment_tree(value, None, &mut thread).map(|_| thread)
        });

    parsed
        .map_err(|e| log::warn!("Failed to parse comment: {}", e))
        .ok()
}

/// Decode `root` and all of its nested replies into `thread`.
///
/// A malformed root fails the whole tree; a malformed reply is skipped along
/// with its own replies.
fn build_comment_tree(
    root: Value,
    anchor: Option<&AnchorWire>,
    thread: &mut CommentThread,
) -> Result<CommentIdx, ParseError> {
    let (mut comment, replies) = decode_comment(root)?;
    if let Some(anchor) = anchor {
        apply_anchor(&mut comment, anchor);
    }
    let root_idx = thread.push(comment, None);

    let mut pending: Vec<(Value, CommentIdx)> = Vec::new();
    push_replies(&mut pending, replies, root_idx);

    while let Some((value, parent)) = pending.pop() {
        match decode_comment(value) {
            Ok((comment, replies)) => {
                let idx = thread.push(comment, Some(parent));
                push_replies(&mut pending, replies, idx);
            }
            Err(e) => {
                log::warn!(
                    "Skipping reply to comment {}: {}",
                    thread.comment(parent).id,
                    e
                );
            }
        }
    }

    Ok(root_idx)
}

/// Queue replies so they pop in server order.
fn push_replies(pending: &mut Vec<(Value, CommentIdx)>, replies: Vec<Value>, parent: CommentIdx) {
    pending.extend(replies.into_iter().rev().map(|reply| (reply, parent)));
}

fn decode_comment(value: Value) -> Result<(Comment, Vec<Value>), ParseError> {
    let wire: CommentWire = serde_json::from_value(value)?;
    let id = non_negative_id(wire.id)?;

    let replies = match wire.comments {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            log::debug!("Comment {} has non-array replies: {}", id, other);
            Vec::new()
        }
    };

    let author = wire.author.unwrap_or_default();
    let comment = Comment {
        id,
        version: wire.version,
        text: wire.text,
        author_name: author.name,
        author_display_name: author.display_name,
        author_email: author.email_address,
        created_date: wire.created_date,
        updated_date: wire.updated_date,
        state: wire.state,
        severity: wire.severity,
        ..Comment::default()
    };
    Ok((comment, replies))
}

fn apply_anchor(comment: &mut Comment, anchor: &AnchorWire) {
    comment.line = anchor.line;
    comment.line_type = anchor.line_type;
    comment.file_type = anchor.file_type;
    comment.path = anchor.path.clone();
    comment.src_path = anchor.src_path.clone();
}

/// Read the paging fields of a list response.
pub fn parse_page_info(json: &str) -> PageInfo {
    PageInfo {
        limit: extract_int(json, "\"limit\":"),
        is_last_page: extract_boolean(json, "\"isLastPage\":"),
        next_page_start: extract_long(json, "\"nextPageStart\":"),
    }
}
