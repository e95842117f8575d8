//! Pull request payload ingestion
//!
//! Turns raw REST response bodies (pull request lists, changed files and
//! activity feeds) into typed review records.
//!
//! Parsing never fails as a whole: a missing key gives an empty result or a
//! defaulted field, and a malformed list element is skipped with a warning.
//!
//! # Example
//!
//! ```
//! use pr_review_json::{parse_changed_files, ChangeType};
//!
//! let body = r#"{"values":[{"type":"ADD","path":{"toString":"src/main.rs","name":"main.rs"}}]}"#;
//! let files = parse_changed_files(body);
//!
//! assert_eq!(files.len(), 1);
//! assert_eq!(files[0].change_type, ChangeType::Added);
//! ```

mod parser;
pub mod raw;
mod thread;
mod types;

pub use parser::{
    parse_activities, parse_changed_file, parse_changed_files, parse_comment, parse_page_info,
    parse_pull_request, parse_pull_requests, ParseError,
};
pub use thread::{CommentIdx, CommentNode, CommentThread};
pub use types::*;
