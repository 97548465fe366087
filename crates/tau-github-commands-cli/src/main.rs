mod bootstrap_helpers;
mod cli_args;

use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use clap::Parser;
use tau_github_commands::{
    ChannelMessenger, CommandConfig, CommandContext, FileSubscriptionService,
    FileSubscriptionServiceConfig, GithubApiClient, GithubCommandHandlers, ServiceError,
    ServiceResult,
};
use tracing::info;

use crate::bootstrap_helpers::init_tracing;
use crate::cli_args::Cli;

/// Prints the single reply of an invocation to stdout.
struct StdoutMessenger;

#[async_trait]
impl ChannelMessenger for StdoutMessenger {
    async fn send_message(&self, _channel_id: &str, text: &str) -> ServiceResult<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{text}")
            .and_then(|()| stdout.flush())
            .map_err(|error| ServiceError::new(format!("failed to write reply: {error}")))
    }
}

fn command_config(cli: &Cli) -> CommandConfig {
    let mut config = CommandConfig {
        polling_interval_minutes: cli.polling_interval_minutes,
        ..CommandConfig::default()
    };
    if let Some(default_events) = cli.default_events.clone() {
        config.default_event_types = default_events;
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let store = Arc::new(
        FileSubscriptionService::load(FileSubscriptionServiceConfig {
            state_path: cli.state_file.clone(),
            oauth_authorize_url: cli.oauth_authorize_url.clone(),
            app_install_url: cli.app_install_url.clone(),
            require_app_installation: cli.require_app_installation,
        })
        .context("failed to load subscription state")?,
    );
    for user_id in cli.link_user.iter().filter(|user| !user.trim().is_empty()) {
        store.link_user(user_id).await?;
    }
    for owner in cli
        .installed_owner
        .iter()
        .filter(|owner| !owner.trim().is_empty())
    {
        store.record_installation(owner).await?;
    }

    let github = GithubApiClient::new(
        &cli.github_api_base,
        cli.github_token.as_deref(),
        cli.request_timeout_ms,
    )?;
    let handlers = GithubCommandHandlers {
        issues: Arc::new(github),
        linker: store.clone(),
        subscriptions: store,
        messenger: Arc::new(StdoutMessenger),
        config: command_config(&cli),
    };

    let ctx = CommandContext::new(cli.channel_id.clone(), cli.user_id.clone());
    let line = cli.command.join(" ");
    info!(channel_id = %ctx.channel_id, user_id = %ctx.user_id, "running chat command");
    handlers
        .dispatch(&ctx, &line)
        .await
        .map_err(|error| anyhow!("failed to deliver command reply: {error}"))
}
