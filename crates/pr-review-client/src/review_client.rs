//! Typed access to review data over any [`ReviewTransport`]

use crate::client::ReviewTransport;
use log::{debug, warn};
use pr_review_json::{
    parse_activities, parse_changed_files, parse_page_info, parse_pull_requests, ChangedFile,
    CommentThread, PullRequest,
};

/// Fetches raw responses through a transport and parses them into records
#[derive(Debug, Clone)]
pub struct ReviewClient<T> {
    transport: T,
}

impl<T: ReviewTransport> ReviewClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Pull requests of a repository
    pub async fn pull_requests(&self, project: &str, repo: &str) -> anyhow::Result<Vec<PullRequest>> {
        debug!("Loading pull requests for {}/{}", project, repo);
        let body = self.transport.fetch_pull_requests(project, repo).await?;
        warn_if_truncated(&body, "pull request list");
        Ok(parse_pull_requests(&body))
    }

    /// Changed files of a pull request, in server order
    pub async fn changed_files(
        &self,
        project: &str,
        repo: &str,
        pr_id: i64,
    ) -> anyhow::Result<Vec<ChangedFile>> {
        debug!("Loading changes of {}/{}#{}", project, repo, pr_id);
        let body = self.transport.fetch_changes(project, repo, pr_id).await?;
        warn_if_truncated(&body, "change list");
        Ok(parse_changed_files(&body))
    }

    /// Comment threads of a pull request
    pub async fn comment_thread(
        &self,
        project: &str,
        repo: &str,
        pr_id: i64,
    ) -> anyhow::Result<CommentThread> {
        debug!("Loading activities of {}/{}#{}", project, repo, pr_id);
        let body = self.transport.fetch_activities(project, repo, pr_id).await?;
        warn_if_truncated(&body, "activity feed");
        Ok(parse_activities(&body))
    }
}

fn warn_if_truncated(body: &str, what: &str) {
    let page = parse_page_info(body);
    if page.has_more() {
        warn!(
            "Only the first page of the {} was loaded (limit {:?}, next page at {:?})",
            what, page.limit, page.next_page_start
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct FixtureTransport;

    #[async_trait]
    impl ReviewTransport for FixtureTransport {
        async fn fetch_pull_requests(&self, project: &str, _repo: &str) -> anyhow::Result<String> {
            if project == "DOWN" {
                anyhow::bail!("connection refused");
            }
            Ok(r#"{"values":[{"id":1,"title":"One"},{"id":-1},{"id":2,"title":"Two"}],
                "isLastPage":false,"nextPageStart":3,"limit":3}"#
                .to_string())
        }

        async fn fetch_changes(&self, _: &str, _: &str, _: i64) -> anyhow::Result<String> {
            Ok(r#"{"values":[{"type":"ADD","path":{"toString":"a/b.txt"}}]}"#.to_string())
        }

        async fn fetch_activities(&self, _: &str, _: &str, _: i64) -> anyhow::Result<String> {
            Ok(r#"{"values":[{"action":"COMMENTED","comment":{"id":1,"text":"hi"}}]}"#
                .to_string())
        }
    }

    #[tokio::test]
    async fn test_pull_requests_skip_malformed() {
        let client = ReviewClient::new(FixtureTransport);
        let prs = client.pull_requests("PRJ", "core").await.unwrap();
        let titles: Vec<&str> = prs.iter().map(|pr| pr.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[tokio::test]
    async fn test_transport_error_is_propagated() {
        let client = ReviewClient::new(FixtureTransport);
        let err = client.pull_requests("DOWN", "core").await.unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn test_changes_and_comments() {
        let client = ReviewClient::new(FixtureTransport);
        let files = client.changed_files("PRJ", "core", 1).await.unwrap();
        assert_eq!(files[0].path.full, "a/b.txt");

        let thread = client.comment_thread("PRJ", "core", 1).await.unwrap();
        assert_eq!(thread.len(), 1);
        assert_eq!(thread.comment(thread.roots()[0]).text, "hi");
    }
}
