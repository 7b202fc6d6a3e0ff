//! GitHub REST API client.
//!
//! API Documentation: <https://docs.github.com/en/rest/repos/repos#list-repository-tags>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Commit, Tag};
use crate::error::{AutotagError, Result};
use crate::repository::{TagRepository, TAGS_PER_PAGE};

/// Public GitHub API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const API_VERSION: &str = "2022-11-28";

/// Commits requested per compare page
const COMMITS_PER_PAGE: usize = 100;

/// Upper bound on compare pages fetched for one range
const MAX_COMPARE_PAGES: u32 = 100;

const USER_AGENT: &str = concat!("git-autotag/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct TagResponse {
    name: String,
    commit: TagCommitResponse,
}

#[derive(Debug, Deserialize)]
struct TagCommitResponse {
    sha: String,
    #[serde(default)]
    url: String,
}

impl From<TagResponse> for Tag {
    fn from(response: TagResponse) -> Self {
        Tag::new(response.name, response.commit.sha).with_commit_url(response.commit.url)
    }
}

#[derive(Debug, Serialize)]
struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    reference: String,
    sha: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompareResponse {
    /// Size of the whole range; `commits` only holds the requested page
    #[serde(default)]
    total_commits: usize,
    #[serde(default)]
    commits: Vec<CompareCommit>,
}

#[derive(Debug, Deserialize)]
struct CompareCommit {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
}

/// GitHub-backed tag repository.
#[derive(Clone)]
pub struct GitHubClient {
    /// HTTP client.
    client: Client,
    /// API base URL, without trailing slash.
    api_url: String,
    owner: String,
    repo: String,
    /// Token sent as bearer credential; empty for anonymous access.
    token: String,
}

impl GitHubClient {
    /// Create a client for `repository` given as `owner/repo`.
    ///
    /// # Errors
    /// Returns a configuration error if `repository` is malformed, or an HTTP
    /// error if the client cannot be built.
    pub fn new(
        api_url: impl Into<String>,
        repository: &str,
        token: impl Into<String>,
    ) -> Result<Self> {
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'))
            .ok_or_else(|| {
                AutotagError::config(format!(
                    "Invalid repository '{}': expected owner/repo",
                    repository
                ))
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: token.into(),
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.api_url, self.owner, self.repo, path
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!(%method, url = %url, "GitHub request");

        let builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);

        if self.token.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.token)
        }
    }

    /// Turn non-2xx responses into upstream errors carrying status and body.
    async fn check_status(response: Response, action: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AutotagError::upstream(format!(
            "{} failed with status {}: {}",
            action,
            status.as_u16(),
            body.trim()
        )))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, action: &str) -> Result<T> {
        let response = self.request(Method::GET, url).send().await?;
        let response = Self::check_status(response, action).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl TagRepository for GitHubClient {
    async fn list_tags(&self, page: u32) -> Result<Vec<Tag>> {
        let url = format!(
            "{}?per_page={}&page={}",
            self.repo_url("/tags"),
            TAGS_PER_PAGE,
            page
        );

        let tags: Vec<TagResponse> = self.get_json(&url, "Listing tags").await?;
        Ok(tags.into_iter().map(Tag::from).collect())
    }

    async fn create_tag_ref(&self, tag_name: &str, commit_sha: &str) -> Result<()> {
        let body = CreateRefRequest {
            reference: format!("refs/tags/{}", tag_name),
            sha: commit_sha,
        };

        let response = self
            .request(Method::POST, &self.repo_url("/git/refs"))
            .json(&body)
            .send()
            .await?;

        Self::check_status(response, &format!("Creating tag '{}'", tag_name)).await?;
        Ok(())
    }

    async fn compare_commits(&self, base_sha: &str, head_sha: &str) -> Result<Vec<Commit>> {
        let base_url = self.repo_url(&format!("/compare/{}...{}", base_sha, head_sha));
        let mut commits = Vec::new();

        for page in 1..=MAX_COMPARE_PAGES {
            let url = format!("{}?per_page={}&page={}", base_url, COMMITS_PER_PAGE, page);
            let comparison: CompareResponse = self.get_json(&url, "Comparing commits").await?;
            let count = comparison.commits.len();

            commits.extend(
                comparison
                    .commits
                    .into_iter()
                    .map(|c| Commit::new(c.sha, c.commit.message)),
            );
            debug!(page, count, total = comparison.total_commits, "Fetched compare page");

            if count < COMMITS_PER_PAGE || commits.len() >= comparison.total_commits {
                return Ok(commits);
            }
        }

        Err(AutotagError::upstream(format!(
            "Comparing commits stopped after {} pages ({} commits)",
            MAX_COMPARE_PAGES,
            commits.len()
        )))
    }
}
