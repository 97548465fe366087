//! Chat rendering for `/gh_issues` results.

use crate::issue_types::{IssueState, IssueSummary};
use crate::repo_identifier::RepoIdentifier;

pub const OPEN_ISSUE_GLYPH: &str = "🟢";
pub const CLOSED_ISSUE_GLYPH: &str = "🔴";

pub fn issue_state_glyph(state: IssueState) -> &'static str {
    match state {
        IssueState::Open => OPEN_ISSUE_GLYPH,
        IssueState::Closed => CLOSED_ISSUE_GLYPH,
    }
}

pub fn render_issue_line(issue: &IssueSummary) -> String {
    format!(
        "{} [#{}]({}) {} - by {}",
        issue_state_glyph(issue.state),
        issue.number,
        issue.url,
        issue.title.trim(),
        issue.author
    )
}

/// Inputs are expected to be issues only; pull requests are dropped by the lister.
pub fn render_issue_list(repo: &RepoIdentifier, issues: &[IssueSummary]) -> String {
    if issues.is_empty() {
        return format!("No issues found for **{repo}**.");
    }
    let mut lines = Vec::with_capacity(issues.len() + 2);
    lines.push(format!("**Recent Issues - {repo}** ({})", issues.len()));
    lines.push(String::new());
    lines.extend(issues.iter().map(render_issue_line));
    lines.join("\n")
}
