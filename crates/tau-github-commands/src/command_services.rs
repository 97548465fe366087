//! Capability traits for the collaborators the command handlers depend on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::command_errors::ServiceError;
use crate::issue_filter::IssueQuery;
use crate::issue_types::GithubIssue;
use crate::repo_identifier::RepoIdentifier;
use crate::subscription_event_types::EventTypeSet;

/// Result type for external collaborator calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Identifies the channel and acting user of one command invocation.
pub struct CommandContext {
    pub channel_id: String,
    pub user_id: String,
}

impl CommandContext {
    pub fn new(channel_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            user_id: user_id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Enumerates supported `DeliveryMode` values.
pub enum DeliveryMode {
    Webhook,
    Polling,
}

impl DeliveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Webhook => "webhook",
            Self::Polling => "polling",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Public struct `CreateSubscriptionRequest` used across Tau components.
pub struct CreateSubscriptionRequest {
    pub channel_id: String,
    pub user_id: String,
    pub repo: RepoIdentifier,
    pub event_types: EventTypeSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Outcome reported by the subscription service for a create request.
pub struct CreateSubscriptionResult {
    pub success: bool,
    pub requires_installation: bool,
    pub install_url: Option<String>,
    pub error: Option<String>,
    pub delivery_mode: Option<DeliveryMode>,
    /// Canonical `owner/name` stored by the service.
    pub repo_full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One stored channel subscription. `repo_full_name` keeps the stored casing.
pub struct ChannelSubscription {
    pub repo_full_name: String,
    pub event_types: EventTypeSet,
    pub delivery_mode: DeliveryMode,
}

#[async_trait]
pub trait IssueLister: Send + Sync {
    /// Lists recent issues, excluding pull requests, capped at `query.count`.
    async fn list_issues(
        &self,
        repo: &RepoIdentifier,
        query: &IssueQuery,
    ) -> ServiceResult<Vec<GithubIssue>>;
}

#[async_trait]
pub trait AccountLinker: Send + Sync {
    async fn is_linked(&self, user_id: &str) -> ServiceResult<bool>;
    async fn authorization_url(&self, user_id: &str, channel_id: &str) -> ServiceResult<String>;
}

#[async_trait]
pub trait SubscriptionService: Send + Sync {
    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> ServiceResult<CreateSubscriptionResult>;
    async fn list_subscriptions(&self, channel_id: &str)
        -> ServiceResult<Vec<ChannelSubscription>>;
    /// Removes the subscription stored under the exact `repo_full_name`.
    async fn remove_subscription(
        &self,
        channel_id: &str,
        repo_full_name: &str,
    ) -> ServiceResult<bool>;
}

#[async_trait]
pub trait ChannelMessenger: Send + Sync {
    async fn send_message(&self, channel_id: &str, text: &str) -> ServiceResult<()>;
}
