//! GitHub REST client backing `/gh_issues`.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::command_errors::ServiceError;
use crate::command_services::{IssueLister, ServiceResult};
use crate::issue_filter::IssueQuery;
use crate::issue_types::GithubIssue;
use crate::repo_identifier::RepoIdentifier;

pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
const ISSUES_PAGE_SIZE: &str = "100";

pub fn truncate_for_error(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated = text.chars().take(max_chars).collect::<String>();
    format!("{truncated}...")
}

#[derive(Clone)]
pub struct GithubApiClient {
    http: reqwest::Client,
    api_base: String,
}

impl GithubApiClient {
    pub fn new(api_base: &str, token: Option<&str>, request_timeout_ms: u64) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("Tau-github-commands"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        if let Some(token) = token.map(str::trim).filter(|token| !token.is_empty()) {
            let auth_header = format!("Bearer {token}");
            headers.insert(
                reqwest::header::AUTHORIZATION,
                reqwest::header::HeaderValue::from_str(&auth_header)
                    .context("invalid github authorization header")?,
            );
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create github api client")?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub async fn list_recent_issues(
        &self,
        repo: &RepoIdentifier,
        query: &IssueQuery,
    ) -> Result<Vec<GithubIssue>> {
        let mut request = self
            .http
            .get(format!(
                "{}/repos/{}/{}/issues",
                self.api_base, repo.owner, repo.name
            ))
            .query(&[
                ("state", query.state.as_str()),
                ("sort", "created"),
                ("direction", "desc"),
                ("per_page", ISSUES_PAGE_SIZE),
            ]);
        if let Some(creator) = query.creator.as_deref() {
            request = request.query(&[("creator", creator)]);
        }

        let rows: Vec<GithubIssue> = self.request_json("list issues", request).await?;
        let fetched = rows.len();
        let issues = rows
            .into_iter()
            .filter(|issue| !issue.is_pull_request())
            .take(usize::from(query.count))
            .collect::<Vec<_>>();
        debug!(
            repo = %repo,
            fetched,
            returned = issues.len(),
            "github issues listed"
        );
        Ok(issues)
    }

    async fn request_json<T>(&self, operation: &str, request: reqwest::RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .with_context(|| format!("github api {operation} request failed"))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!(
                "github api {operation} failed with status {}: {}",
                status.as_u16(),
                truncate_for_error(&body, 800)
            );
        }
        response
            .json::<T>()
            .await
            .with_context(|| format!("failed to decode github {operation}"))
    }
}

#[async_trait]
impl IssueLister for GithubApiClient {
    async fn list_issues(
        &self,
        repo: &RepoIdentifier,
        query: &IssueQuery,
    ) -> ServiceResult<Vec<GithubIssue>> {
        self.list_recent_issues(repo, query)
            .await
            .map_err(ServiceError::from)
    }
}
