#![no_main]

use libfuzzer_sys::fuzz_target;
use tau_github_commands::command_args::split_command_line;
use tau_github_commands::issue_command_parser::parse_issue_command;
use tau_github_commands::issue_filter::{build_issue_query, MAX_ISSUE_COUNT, MIN_ISSUE_COUNT};
use tau_github_commands::repo_identifier::RepoIdentifier;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let tokens = split_command_line(&raw);

    let Some(parsed) = parse_issue_command(&tokens) else {
        return;
    };
    if let Ok(repo) = RepoIdentifier::parse(&parsed.repo) {
        assert!(!repo.owner.is_empty() && !repo.name.is_empty());
        assert!(!repo.full_name().chars().any(char::is_whitespace));
    }
    if let Ok(query) = build_issue_query(&parsed.count, &parsed.filters) {
        assert!((MIN_ISSUE_COUNT..=MAX_ISSUE_COUNT).contains(&query.count));
    }
});
