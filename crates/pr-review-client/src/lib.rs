//! Pull request review data client
//!
//! This crate connects raw REST transports to the parsers in
//! `pr-review-json` and supervises background loads per view.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │          ReviewTransport trait            │
//! │  - fetch_pull_requests()                  │
//! │  - fetch_changes()                        │
//! │  - fetch_activities()                     │
//! └───────────────────────────────────────────┘
//!          │                         ▲
//!          ▼                         │
//! ┌──────────────────┐     ┌──────────────────────┐
//! │ ReviewClient     │     │ RecordedTransport    │
//! │ (fetch + parse)  │     │ (offline recordings) │
//! └──────────────────┘     └──────────────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ ViewLoader       │  one in-flight load per view,
//! │                  │  stale results discarded
//! └──────────────────┘
//! ```
//!
//! Authentication, HTTP and retries belong to the transport implementation.
//!
//! # Example
//!
//! ```rust,no_run
//! use pr_review_client::{RecordedTransport, ReviewClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = ReviewClient::new(RecordedTransport::new("recordings"));
//! let files = client.changed_files("PRJ", "core", 42).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod endpoints;
pub mod loader;
pub mod recorded_client;
pub mod review_client;

pub use client::ReviewTransport;
pub use endpoints::Endpoints;
pub use loader::{LoadOutcome, ViewLoader, ViewState};
pub use recorded_client::{RecordedTransport, TransportError};
pub use review_client::ReviewClient;
