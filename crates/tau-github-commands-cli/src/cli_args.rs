use std::path::PathBuf;

use clap::Parser;
use tau_github_commands::command_config::DEFAULT_POLLING_INTERVAL_MINUTES;
use tau_github_commands::github_api_client::DEFAULT_GITHUB_API_BASE;
use tau_github_commands::EventTypeSet;

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_u32(value: &str) -> Result<u32, String> {
    let parsed = value
        .parse::<u32>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_event_type_list(value: &str) -> Result<EventTypeSet, String> {
    let parsed = EventTypeSet::parse_list(value).map_err(|error| error.to_string())?;
    if parsed.is_empty() {
        return Err("at least one event type is required".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "tau-github-commands",
    about = "Run one /gh_issues or /github chat command and print its reply",
    version
)]
/// Public struct `Cli` used across Tau components.
pub struct Cli {
    #[arg(
        long = "channel-id",
        env = "TAU_GITHUB_CHANNEL_ID",
        default_value = "local",
        help = "Channel the command is issued in; subscriptions are scoped to it."
    )]
    pub channel_id: String,

    #[arg(
        long = "user-id",
        env = "TAU_GITHUB_USER_ID",
        default_value = "local-user",
        help = "Acting chat user; must be linked before subscribing."
    )]
    pub user_id: String,

    #[arg(
        long = "state-file",
        env = "TAU_GITHUB_STATE_FILE",
        default_value = ".tau/github-commands/subscriptions.json",
        help = "JSON state file holding subscriptions, linked users, and app installations."
    )]
    pub state_file: PathBuf,

    #[arg(
        long = "github-api-base",
        env = "TAU_GITHUB_API_BASE",
        default_value = DEFAULT_GITHUB_API_BASE,
        help = "GitHub REST API base URL."
    )]
    pub github_api_base: String,

    #[arg(
        long = "github-token",
        env = "TAU_GITHUB_TOKEN",
        hide_env_values = true,
        help = "Optional GitHub token used for issue listing."
    )]
    pub github_token: Option<String>,

    #[arg(
        long = "request-timeout-ms",
        env = "TAU_GITHUB_REQUEST_TIMEOUT_MS",
        default_value_t = 10_000,
        value_parser = parse_positive_u64,
        help = "HTTP timeout for GitHub API requests in milliseconds."
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long = "oauth-authorize-url",
        env = "TAU_GITHUB_OAUTH_AUTHORIZE_URL",
        default_value = "https://github.com/login/oauth/authorize",
        help = "Base URL of the account-linking flow offered to unlinked users."
    )]
    pub oauth_authorize_url: String,

    #[arg(
        long = "app-install-url",
        env = "TAU_GITHUB_APP_INSTALL_URL",
        help = "GitHub App installation URL shown for polling upsell and installation prompts."
    )]
    pub app_install_url: Option<String>,

    #[arg(
        long = "require-app-installation",
        env = "TAU_GITHUB_REQUIRE_APP_INSTALLATION",
        help = "Refuse subscriptions for owners without the GitHub App instead of polling."
    )]
    pub require_app_installation: bool,

    #[arg(
        long = "default-events",
        env = "TAU_GITHUB_DEFAULT_EVENTS",
        value_parser = parse_event_type_list,
        help = "Event types used when /github subscribe omits --events."
    )]
    pub default_events: Option<EventTypeSet>,

    #[arg(
        long = "polling-interval-minutes",
        env = "TAU_GITHUB_POLLING_INTERVAL_MINUTES",
        default_value_t = DEFAULT_POLLING_INTERVAL_MINUTES,
        value_parser = parse_positive_u32,
        help = "Polling interval reported for subscriptions without webhook delivery."
    )]
    pub polling_interval_minutes: u32,

    #[arg(
        long = "link-user",
        value_delimiter = ',',
        help = "Mark chat users as having a linked GitHub account before running."
    )]
    pub link_user: Vec<String>,

    #[arg(
        long = "installed-owner",
        value_delimiter = ',',
        help = "Record GitHub owners with the app installed before running."
    )]
    pub installed_owner: Vec<String>,

    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 1..,
        help = "Chat command line, e.g. `/github subscribe owner/repo --events pr,issues`."
    )]
    pub command: Vec<String>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn unit_cli_defaults_and_trailing_command_tokens() {
        let cli = Cli::try_parse_from([
            "tau-github-commands",
            "/gh_issues",
            "owner/repo",
            "10",
            "--state=closed",
        ])
        .expect("parse cli");
        assert_eq!(cli.channel_id, "local");
        assert_eq!(cli.polling_interval_minutes, 5);
        assert!(cli.default_events.is_none());
        assert_eq!(
            cli.command,
            vec!["/gh_issues", "owner/repo", "10", "--state=closed"]
        );
    }

    #[test]
    fn functional_cli_parses_default_events_and_seed_lists() {
        let cli = Cli::try_parse_from([
            "tau-github-commands",
            "--default-events",
            "issues,pr",
            "--link-user",
            "U1,U2",
            "--installed-owner=acme",
            "/github",
            "subscribe",
            "acme/widgets",
            "--events",
            "all",
        ])
        .expect("parse cli");
        assert_eq!(
            cli.default_events.map(|events| events.to_string()),
            Some("pr,issues".to_string())
        );
        assert_eq!(cli.link_user, vec!["U1", "U2"]);
        assert_eq!(cli.installed_owner, vec!["acme"]);
        assert_eq!(cli.command.last().map(String::as_str), Some("all"));
    }

    #[test]
    fn regression_cli_rejects_invalid_default_events_and_zero_timeout() {
        assert!(Cli::try_parse_from([
            "tau-github-commands",
            "--default-events",
            "pr,bogus",
            "/github",
            "status",
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "tau-github-commands",
            "--request-timeout-ms",
            "0",
            "/github",
            "status",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["tau-github-commands"]).is_err());
    }
}
