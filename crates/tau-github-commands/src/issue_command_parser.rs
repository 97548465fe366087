use tracing::debug;

use crate::command_args::CommandArgs;

pub const GH_ISSUES_USAGE: &str =
    "Usage: `/gh_issues owner/repo [count] [--state=open|closed|all] [--creator=username]`";
pub const DEFAULT_ISSUE_COUNT: i64 = 5;
pub const STATE_FILTER: &str = "state";
pub const CREATOR_FILTER: &str = "creator";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Count argument as typed. `Malformed` is left for the caller to reject.
pub enum IssueCountArg {
    Number(i64),
    Malformed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Raw, unvalidated `/gh_issues` filters keyed by the closed filter set.
pub struct IssueFilters {
    pub state: Option<String>,
    pub creator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Public struct `ParsedIssueCommand` used across Tau components.
pub struct ParsedIssueCommand {
    pub repo: String,
    pub count: IssueCountArg,
    pub filters: IssueFilters,
}

fn parse_count_token(raw: &str) -> IssueCountArg {
    match raw.trim().parse::<i64>() {
        Ok(value) => IssueCountArg::Number(value),
        Err(_) => IssueCountArg::Malformed(raw.to_string()),
    }
}

/// Parses `/gh_issues` arguments. Returns `None` when no repository token is present.
pub fn parse_issue_command<S: AsRef<str>>(args: &[S]) -> Option<ParsedIssueCommand> {
    parse_issue_command_args(&CommandArgs::parse(args))
}

pub fn parse_issue_command_args(args: &CommandArgs) -> Option<ParsedIssueCommand> {
    let repo = args.positional(0)?.to_string();
    let count = args
        .positional(1)
        .map(parse_count_token)
        .unwrap_or(IssueCountArg::Number(DEFAULT_ISSUE_COUNT));

    let mut filters = IssueFilters::default();
    for (name, value) in args.flags() {
        let slot = match name {
            STATE_FILTER => &mut filters.state,
            CREATOR_FILTER => &mut filters.creator,
            other => {
                debug!(flag = other, "ignoring unsupported /gh_issues flag");
                continue;
            }
        };
        if slot.is_none() {
            *slot = Some(value.unwrap_or_default().to_string());
        }
    }

    Some(ParsedIssueCommand {
        repo,
        count,
        filters,
    })
}
