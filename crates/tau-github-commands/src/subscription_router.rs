//! Executes a validated `/github` intent against the subscription collaborators.

use tracing::{debug, info};

use crate::command_config::CommandConfig;
use crate::command_errors::{CommandError, ERROR_GLYPH, UNKNOWN_ERROR_MESSAGE};
use crate::command_services::{
    AccountLinker, ChannelSubscription, CommandContext, CreateSubscriptionRequest,
    CreateSubscriptionResult, DeliveryMode, SubscriptionService,
};
use crate::repo_identifier::RepoIdentifier;
use crate::subscription_command_parser::SubscriptionIntent;
use crate::subscription_event_types::EventTypeSet;

pub const WEBHOOK_INDICATOR: &str = "⚡";
pub const POLLING_INDICATOR: &str = "⏱️";

pub fn delivery_mode_indicator(mode: DeliveryMode) -> &'static str {
    match mode {
        DeliveryMode::Webhook => WEBHOOK_INDICATOR,
        DeliveryMode::Polling => POLLING_INDICATOR,
    }
}

fn render_event_list(event_types: &EventTypeSet) -> String {
    event_types
        .iter()
        .map(|event_type| event_type.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_link_account_prompt(authorization_url: &str) -> String {
    format!(
        "🔐 **GitHub account not linked**\n\n\
         Link your GitHub account before subscribing to repositories:\n\
         [Connect GitHub]({authorization_url})"
    )
}

pub fn render_installation_required(repo: &RepoIdentifier, install_url: Option<&str>) -> String {
    let mut message = format!(
        "📦 **GitHub App installation required**\n\n\
         The GitHub App must be installed on **{}** before subscribing to **{repo}**.",
        repo.owner
    );
    match install_url {
        Some(url) => message.push_str(&format!("\n[Install GitHub App]({url})")),
        None => message.push_str("\nAsk an owner of the account to install the app."),
    }
    message
}

pub fn render_subscription_created(
    repo_full_name: &str,
    event_types: &EventTypeSet,
    delivery_mode: DeliveryMode,
    install_url: Option<&str>,
    polling_interval_minutes: u32,
) -> String {
    let events = render_event_list(event_types);
    match delivery_mode {
        DeliveryMode::Webhook => format!(
            "✅ **Subscribed to {repo_full_name}**\n\n\
             {WEBHOOK_INDICATOR} Real-time delivery via webhooks\n\
             Events: {events}"
        ),
        DeliveryMode::Polling => {
            let mut message = format!(
                "✅ **Subscribed to {repo_full_name}**\n\n\
                 {POLLING_INDICATOR} Checking for updates every {polling_interval_minutes} minutes\n\
                 Events: {events}\n\n\
                 💡 Install the GitHub App for real-time webhook delivery"
            );
            if let Some(url) = install_url {
                message.push_str(&format!(": [Install GitHub App]({url})"));
            }
            message
        }
    }
}

pub fn render_subscription_status(subscriptions: &[ChannelSubscription]) -> String {
    if subscriptions.is_empty() {
        return "📭 **No subscriptions**\n\n\
                Use `/github subscribe owner/repo` to start receiving updates."
            .to_string();
    }
    let mut lines = vec![
        format!("📬 **Subscriptions ({})**", subscriptions.len()),
        String::new(),
    ];
    lines.extend(subscriptions.iter().map(|subscription| {
        format!(
            "{} **{}** - {}",
            delivery_mode_indicator(subscription.delivery_mode),
            subscription.repo_full_name,
            render_event_list(&subscription.event_types)
        )
    }));
    lines.push(String::new());
    lines.push(format!(
        "{WEBHOOK_INDICATOR} webhook · {POLLING_INDICATOR} polling"
    ));
    lines.join("\n")
}

/// Finds the stored identifier matching `repo` regardless of casing.
pub fn find_canonical_subscription<'a>(
    subscriptions: &'a [ChannelSubscription],
    repo: &RepoIdentifier,
) -> Option<&'a ChannelSubscription> {
    subscriptions
        .iter()
        .find(|subscription| repo.eq_ignore_case(&subscription.repo_full_name))
}

/// Per-invocation router over the account-link and subscription collaborators.
pub struct SubscriptionCommandRouter<'a> {
    pub linker: &'a dyn AccountLinker,
    pub subscriptions: &'a dyn SubscriptionService,
    pub config: &'a CommandConfig,
}

impl SubscriptionCommandRouter<'_> {
    pub async fn route(
        &self,
        ctx: &CommandContext,
        intent: SubscriptionIntent,
    ) -> Result<String, CommandError> {
        debug!(
            channel_id = %ctx.channel_id,
            action = intent.action().as_str(),
            "routing subscription command"
        );
        match intent {
            SubscriptionIntent::Subscribe { repo, event_types } => {
                self.subscribe(ctx, repo, event_types).await
            }
            SubscriptionIntent::Unsubscribe { repo } => self.unsubscribe(ctx, &repo).await,
            SubscriptionIntent::Status => self.status(ctx).await,
        }
    }

    async fn subscribe(
        &self,
        ctx: &CommandContext,
        repo: RepoIdentifier,
        event_types: EventTypeSet,
    ) -> Result<String, CommandError> {
        let linked = self
            .linker
            .is_linked(&ctx.user_id)
            .await
            .map_err(|error| {
                CommandError::external("Failed to check GitHub account link", error)
            })?;
        if !linked {
            let url = self
                .linker
                .authorization_url(&ctx.user_id, &ctx.channel_id)
                .await
                .map_err(|error| {
                    CommandError::external("Failed to start GitHub account linking", error)
                })?;
            info!(user_id = %ctx.user_id, "github account not linked; prompting for oauth");
            return Ok(render_link_account_prompt(&url));
        }

        let request = CreateSubscriptionRequest {
            channel_id: ctx.channel_id.clone(),
            user_id: ctx.user_id.clone(),
            repo: repo.clone(),
            event_types: event_types.clone(),
        };
        let result = self
            .subscriptions
            .create_subscription(request)
            .await
            .map_err(|error| CommandError::external("Failed to create subscription", error))?;
        Ok(self.render_create_result(&repo, &event_types, result))
    }

    fn render_create_result(
        &self,
        repo: &RepoIdentifier,
        event_types: &EventTypeSet,
        result: CreateSubscriptionResult,
    ) -> String {
        if result.requires_installation {
            return render_installation_required(repo, result.install_url.as_deref());
        }
        if !result.success {
            let error = result
                .error
                .filter(|error| !error.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string());
            return format!("{ERROR_GLYPH} {error}");
        }
        let repo_full_name = result.repo_full_name.unwrap_or_else(|| repo.full_name());
        render_subscription_created(
            &repo_full_name,
            event_types,
            result.delivery_mode.unwrap_or(DeliveryMode::Polling),
            result.install_url.as_deref(),
            self.config.polling_interval_minutes,
        )
    }

    async fn unsubscribe(
        &self,
        ctx: &CommandContext,
        repo: &RepoIdentifier,
    ) -> Result<String, CommandError> {
        let subscriptions = self
            .subscriptions
            .list_subscriptions(&ctx.channel_id)
            .await
            .map_err(|error| CommandError::external("Failed to fetch subscriptions", error))?;
        if subscriptions.is_empty() {
            return Ok(format!(
                "{ERROR_GLYPH} This channel has no GitHub subscriptions."
            ));
        }
        let Some(matched) = find_canonical_subscription(&subscriptions, repo) else {
            return Ok(format!(
                "{ERROR_GLYPH} This channel is not subscribed to **{repo}**."
            ));
        };

        let canonical = matched.repo_full_name.as_str();
        let removed = self
            .subscriptions
            .remove_subscription(&ctx.channel_id, canonical)
            .await
            .map_err(|error| CommandError::external("Failed to unsubscribe", error))?;
        if !removed {
            return Ok(format!(
                "{ERROR_GLYPH} Failed to unsubscribe from **{canonical}**."
            ));
        }
        info!(channel_id = %ctx.channel_id, repo = canonical, "subscription removed");
        Ok(format!("✅ **Unsubscribed from {canonical}**"))
    }

    async fn status(&self, ctx: &CommandContext) -> Result<String, CommandError> {
        let subscriptions = self
            .subscriptions
            .list_subscriptions(&ctx.channel_id)
            .await
            .map_err(|error| CommandError::external("Failed to fetch subscriptions", error))?;
        Ok(render_subscription_status(&subscriptions))
    }
}
