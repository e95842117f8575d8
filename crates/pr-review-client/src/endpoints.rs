//! REST endpoint paths for pull request review data
//!
//! Paths follow the `rest/api/1.0` layout:
//! `projects/{key}/repos/{slug}/pull-requests[/{id}/changes|activities]`.

/// Prefix of every REST path
pub const API_PREFIX: &str = "rest/api/1.0";

/// Default page size requested from list endpoints
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Builder for the endpoint URLs of one server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
    page_limit: u32,
    state: String,
}

impl Endpoints {
    /// Create endpoints for `base_url` (trailing slashes are ignored)
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            page_limit: DEFAULT_PAGE_LIMIT,
            state: "OPEN".to_string(),
        }
    }

    /// Page size for list requests
    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit;
        self
    }

    /// Pull request state filter (OPEN, MERGED, DECLINED or ALL)
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    fn repo_url(&self, project: &str, repo: &str) -> String {
        format!(
            "{}/{}/projects/{}/repos/{}",
            self.base_url, API_PREFIX, project, repo
        )
    }

    pub fn pull_requests(&self, project: &str, repo: &str) -> String {
        format!(
            "{}/pull-requests?state={}&limit={}",
            self.repo_url(project, repo),
            self.state,
            self.page_limit
        )
    }

    pub fn changes(&self, project: &str, repo: &str, pr_id: i64) -> String {
        format!(
            "{}/pull-requests/{}/changes?limit={}",
            self.repo_url(project, repo),
            pr_id,
            self.page_limit
        )
    }

    pub fn activities(&self, project: &str, repo: &str, pr_id: i64) -> String {
        format!(
            "{}/pull-requests/{}/activities?limit={}",
            self.repo_url(project, repo),
            pr_id,
            self.page_limit
        )
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pull_requests_url() {
        let endpoints = Endpoints::new("https://git.example.com/")
            .with_page_limit(25)
            .with_state("MERGED");
        assert_eq!(
            endpoints.pull_requests("PRJ", "core"),
            "https://git.example.com/rest/api/1.0/projects/PRJ/repos/core/pull-requests?state=MERGED&limit=25"
        );
    }

    #[test]
    fn test_pull_request_detail_urls() {
        let endpoints = Endpoints::new("https://git.example.com");
        assert_eq!(
            endpoints.changes("PRJ", "core", 7),
            "https://git.example.com/rest/api/1.0/projects/PRJ/repos/core/pull-requests/7/changes?limit=100"
        );
        assert_eq!(
            endpoints.activities("PRJ", "core", 7),
            "https://git.example.com/rest/api/1.0/projects/PRJ/repos/core/pull-requests/7/activities?limit=100"
        );
    }

    #[test]
    fn test_default_is_relative() {
        assert_eq!(
            Endpoints::default().changes("P", "r", 1),
            "/rest/api/1.0/projects/P/repos/r/pull-requests/1/changes?limit=100"
        );
    }
}
