//! Transport trait for the review REST endpoints
//!
//! A transport returns the raw response body of each endpoint. Parsing is
//! done by the caller, so transports stay free of domain types.

use async_trait::async_trait;

/// Source of raw review REST responses
///
/// Implementations can hit a server, replay recordings or serve fixtures.
/// Errors are caller-level failures (network, authentication, missing data);
/// they are reported as-is and never mixed into parsed results.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across async tasks.
#[async_trait]
pub trait ReviewTransport: Send + Sync {
    /// Fetch the pull request list of a repository
    ///
    /// # Arguments
    ///
    /// * `project` - Project key
    /// * `repo` - Repository slug
    async fn fetch_pull_requests(&self, project: &str, repo: &str) -> anyhow::Result<String>;

    /// Fetch the changed files of a pull request
    async fn fetch_changes(&self, project: &str, repo: &str, pr_id: i64)
        -> anyhow::Result<String>;

    /// Fetch the activity feed (comments included) of a pull request
    async fn fetch_activities(
        &self,
        project: &str,
        repo: &str,
        pr_id: i64,
    ) -> anyhow::Result<String>;
}

#[async_trait]
impl<T: ReviewTransport + ?Sized> ReviewTransport for std::sync::Arc<T> {
    async fn fetch_pull_requests(&self, project: &str, repo: &str) -> anyhow::Result<String> {
        (**self).fetch_pull_requests(project, repo).await
    }

    async fn fetch_changes(
        &self,
        project: &str,
        repo: &str,
        pr_id: i64,
    ) -> anyhow::Result<String> {
        (**self).fetch_changes(project, repo, pr_id).await
    }

    async fn fetch_activities(
        &self,
        project: &str,
        repo: &str,
        pr_id: i64,
    ) -> anyhow::Result<String> {
        (**self).fetch_activities(project, repo, pr_id).await
    }
}
