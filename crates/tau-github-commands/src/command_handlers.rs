//! Outermost `/gh_issues` and `/github` handlers.
//!
//! Every invocation produces exactly one outbound message: validation runs
//! before any collaborator call, and collaborator failures are converted to a
//! single reply at this boundary.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::command_args::{split_command_line, CommandArgs};
use crate::command_config::CommandConfig;
use crate::command_errors::CommandError;
use crate::command_services::{
    AccountLinker, ChannelMessenger, CommandContext, IssueLister, ServiceResult,
    SubscriptionService,
};
use crate::issue_command_parser::{parse_issue_command_args, GH_ISSUES_USAGE};
use crate::issue_filter::build_issue_query;
use crate::issue_render::render_issue_list;
use crate::issue_types::IssueSummary;
use crate::repo_identifier::RepoIdentifier;
use crate::subscription_command_parser::parse_subscription_command;
use crate::subscription_router::SubscriptionCommandRouter;

pub const GH_ISSUES_COMMAND: &str = "gh_issues";
pub const GITHUB_COMMAND: &str = "github";

pub fn supported_commands_help() -> String {
    [
        "Supported commands:",
        "- `/gh_issues owner/repo [count] [--state=open|closed|all] [--creator=username]`",
        "- `/github subscribe owner/repo [--events pr,issues,...|all]`",
        "- `/github unsubscribe owner/repo`",
        "- `/github status`",
    ]
    .join("\n")
}

#[derive(Clone)]
/// Command handlers wired to their collaborators.
pub struct GithubCommandHandlers {
    pub issues: Arc<dyn IssueLister>,
    pub linker: Arc<dyn AccountLinker>,
    pub subscriptions: Arc<dyn SubscriptionService>,
    pub messenger: Arc<dyn ChannelMessenger>,
    pub config: CommandConfig,
}

fn reply_from_result(command: &str, result: Result<String, CommandError>) -> String {
    match result {
        Ok(reply) => reply,
        Err(error) => {
            match &error {
                CommandError::External { source, .. } => warn!(
                    command,
                    error = %source,
                    "external collaborator failed"
                ),
                other => debug!(command, kind = other.kind(), "command rejected"),
            }
            error.user_message()
        }
    }
}

impl GithubCommandHandlers {
    pub async fn reply_gh_issues<S: AsRef<str>>(&self, ctx: &CommandContext, args: &[S]) -> String {
        let result = self.run_gh_issues(ctx, &CommandArgs::parse(args)).await;
        reply_from_result(GH_ISSUES_COMMAND, result)
    }

    async fn run_gh_issues(
        &self,
        ctx: &CommandContext,
        args: &CommandArgs,
    ) -> Result<String, CommandError> {
        let parsed = parse_issue_command_args(args).ok_or(CommandError::Usage(GH_ISSUES_USAGE))?;
        let repo = RepoIdentifier::parse(&parsed.repo)?;
        let query = build_issue_query(&parsed.count, &parsed.filters)?;
        info!(
            channel_id = %ctx.channel_id,
            repo = %repo,
            count = query.count,
            state = query.state.as_str(),
            "listing github issues"
        );

        let issues = self
            .issues
            .list_issues(&repo, &query)
            .await
            .map_err(|error| CommandError::external("Error fetching issues", error))?;
        let summaries = issues.iter().map(IssueSummary::from).collect::<Vec<_>>();
        Ok(render_issue_list(&repo, &summaries))
    }

    pub async fn reply_github<S: AsRef<str>>(&self, ctx: &CommandContext, args: &[S]) -> String {
        let result = match parse_subscription_command(args, &self.config.default_event_types) {
            Ok(intent) => {
                let router = SubscriptionCommandRouter {
                    linker: self.linker.as_ref(),
                    subscriptions: self.subscriptions.as_ref(),
                    config: &self.config,
                };
                router.route(ctx, intent).await
            }
            Err(error) => Err(error),
        };
        reply_from_result(GITHUB_COMMAND, result)
    }

    pub async fn handle_gh_issues<S: AsRef<str>>(
        &self,
        ctx: &CommandContext,
        args: &[S],
    ) -> ServiceResult<()> {
        let reply = self.reply_gh_issues(ctx, args).await;
        self.send_reply(ctx, &reply).await
    }

    pub async fn handle_github<S: AsRef<str>>(
        &self,
        ctx: &CommandContext,
        args: &[S],
    ) -> ServiceResult<()> {
        let reply = self.reply_github(ctx, args).await;
        self.send_reply(ctx, &reply).await
    }

    /// Routes a raw chat line such as `/github status`.
    pub async fn reply_line(&self, ctx: &CommandContext, line: &str) -> String {
        let tokens = split_command_line(line);
        let Some((command, args)) = tokens.split_first() else {
            return supported_commands_help();
        };
        match command.trim_start_matches('/').to_ascii_lowercase().as_str() {
            GH_ISSUES_COMMAND => self.reply_gh_issues(ctx, args).await,
            GITHUB_COMMAND => self.reply_github(ctx, args).await,
            other => {
                debug!(command = other, "unsupported chat command");
                format!("Unknown command `{command}`.\n\n{}", supported_commands_help())
            }
        }
    }

    pub async fn dispatch(&self, ctx: &CommandContext, line: &str) -> ServiceResult<()> {
        let reply = self.reply_line(ctx, line).await;
        self.send_reply(ctx, &reply).await
    }

    async fn send_reply(&self, ctx: &CommandContext, reply: &str) -> ServiceResult<()> {
        if let Err(error) = self.messenger.send_message(&ctx.channel_id, reply).await {
            warn!(channel_id = %ctx.channel_id, error = %error, "failed to send command reply");
            return Err(error);
        }
        Ok(())
    }
}
