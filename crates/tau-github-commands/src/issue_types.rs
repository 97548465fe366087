use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Public struct `GithubUser` used across Tau components.
pub struct GithubUser {
    pub login: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
/// Enumerates supported `IssueState` values.
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Issue row as returned by the GitHub REST `issues` endpoint.
pub struct GithubIssue {
    pub number: u64,
    pub html_url: String,
    pub state: IssueState,
    pub title: String,
    #[serde(default)]
    pub user: Option<GithubUser>,
    #[serde(default)]
    pub pull_request: Option<Value>,
}

impl GithubIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

pub const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Read-only view of one issue used by the presenter.
pub struct IssueSummary {
    pub number: u64,
    pub url: String,
    pub state: IssueState,
    pub title: String,
    pub author: String,
}

impl From<&GithubIssue> for IssueSummary {
    fn from(issue: &GithubIssue) -> Self {
        let author = issue
            .user
            .as_ref()
            .map(|user| user.login.trim())
            .filter(|login| !login.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR)
            .to_string();
        Self {
            number: issue.number,
            url: issue.html_url.clone(),
            state: issue.state,
            title: issue.title.clone(),
            author,
        }
    }
}
