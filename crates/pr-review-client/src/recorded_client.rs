//! Offline transport replaying recorded responses
//!
//! Recordings are plain response bodies laid out per repository:
//!
//! ```text
//! <dir>/<project>/<repo>/pull-requests.json
//! <dir>/<project>/<repo>/pr-<id>-changes.json
//! <dir>/<project>/<repo>/pr-<id>-activities.json
//! ```

use crate::client::ReviewTransport;
use crate::endpoints::Endpoints;
use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by [`RecordedTransport`]
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("no recorded response for {url} at {}", path.display())]
    MissingRecording {
        url: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Transport serving recorded response bodies from a directory
#[derive(Debug, Clone)]
pub struct RecordedTransport {
    dir: PathBuf,
    endpoints: Endpoints,
}

impl RecordedTransport {
    /// Create a transport reading from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            endpoints: Endpoints::default(),
        }
    }

    /// Endpoints the recordings stand in for (used in logs and errors)
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Root directory of the recordings
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the recording for `file_name` in a repository
    pub fn recording_path(&self, project: &str, repo: &str, file_name: &str) -> PathBuf {
        self.dir.join(project).join(repo).join(file_name)
    }

    async fn replay(&self, path: PathBuf, url: String) -> anyhow::Result<String> {
        debug!("Replaying {} from {}", url, path.display());
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(body),
            Err(source) => Err(TransportError::MissingRecording { url, path, source }.into()),
        }
    }
}

#[async_trait]
impl ReviewTransport for RecordedTransport {
    async fn fetch_pull_requests(&self, project: &str, repo: &str) -> anyhow::Result<String> {
        let path = self.recording_path(project, repo, "pull-requests.json");
        let url = self.endpoints.pull_requests(project, repo);
        self.replay(path, url).await
    }

    async fn fetch_changes(
        &self,
        project: &str,
        repo: &str,
        pr_id: i64,
    ) -> anyhow::Result<String> {
        let path = self.recording_path(project, repo, &format!("pr-{}-changes.json", pr_id));
        let url = self.endpoints.changes(project, repo, pr_id);
        self.replay(path, url).await
    }

    async fn fetch_activities(
        &self,
        project: &str,
        repo: &str,
        pr_id: i64,
    ) -> anyhow::Result<String> {
        let path = self.recording_path(project, repo, &format!("pr-{}-activities.json", pr_id));
        let url = self.endpoints.activities(project, repo, pr_id);
        self.replay(path, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(dir: &Path, file_name: &str, body: &str) {
        let repo_dir = dir.join("PRJ").join("core");
        std::fs::create_dir_all(&repo_dir).unwrap();
        std::fs::write(repo_dir.join(file_name), body).unwrap();
    }

    #[tokio::test]
    async fn test_replays_recorded_bodies() {
        let dir = tempfile::tempdir().unwrap();
        record(dir.path(), "pull-requests.json", r#"{"values":[]}"#);
        record(dir.path(), "pr-7-changes.json", "changes");
        record(dir.path(), "pr-7-activities.json", "activities");

        let transport = RecordedTransport::new(dir.path());
        assert_eq!(
            transport.fetch_pull_requests("PRJ", "core").await.unwrap(),
            r#"{"values":[]}"#
        );
        assert_eq!(transport.fetch_changes("PRJ", "core", 7).await.unwrap(), "changes");
        assert_eq!(
            transport.fetch_activities("PRJ", "core", 7).await.unwrap(),
            "activities"
        );
    }

    #[tokio::test]
    async fn test_missing_recording_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let transport = RecordedTransport::new(dir.path())
            .with_endpoints(Endpoints::new("https://git.example.com"));

        let err = transport.fetch_changes("PRJ", "core", 9).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("pull-requests/9/changes"), "{}", message);
        assert!(matches!(
            err.downcast_ref::<TransportError>(),
            Some(TransportError::MissingRecording { .. })
        ));
    }
}
