//! JSON-file subscription store used by the local command driver.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::command_errors::ServiceError;
use crate::command_services::{
    AccountLinker, ChannelSubscription, CreateSubscriptionRequest, CreateSubscriptionResult,
    DeliveryMode, ServiceResult, SubscriptionService,
};

const SUBSCRIPTION_STATE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SubscriptionState {
    schema_version: u32,
    #[serde(default)]
    channels: BTreeMap<String, Vec<ChannelSubscription>>,
    #[serde(default)]
    linked_users: BTreeSet<String>,
    #[serde(default)]
    installed_owners: BTreeSet<String>,
}

impl Default for SubscriptionState {
    fn default() -> Self {
        Self {
            schema_version: SUBSCRIPTION_STATE_SCHEMA_VERSION,
            channels: BTreeMap::new(),
            linked_users: BTreeSet::new(),
            installed_owners: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
/// Public struct `FileSubscriptionServiceConfig` used across Tau components.
pub struct FileSubscriptionServiceConfig {
    pub state_path: PathBuf,
    pub oauth_authorize_url: String,
    pub app_install_url: Option<String>,
    /// Refuse subscriptions for owners without the app instead of polling.
    pub require_app_installation: bool,
}

fn write_text_atomic(path: &Path, content: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        bail!("destination path cannot be empty");
    }
    let parent_dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent_dir)
        .with_context(|| format!("failed to create {}", parent_dir.display()))?;

    let temp_path = parent_dir.join(format!(
        ".{}.tmp-{}",
        path.file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("subscriptions"),
        std::process::id()
    ));
    std::fs::write(&temp_path, content)
        .with_context(|| format!("failed to write {}", temp_path.display()))?;
    std::fs::rename(&temp_path, path).with_context(|| {
        format!(
            "failed to rename {} to {}",
            temp_path.display(),
            path.display()
        )
    })?;
    Ok(())
}

pub struct FileSubscriptionService {
    config: FileSubscriptionServiceConfig,
    state: Mutex<SubscriptionState>,
}

impl FileSubscriptionService {
    pub fn load(config: FileSubscriptionServiceConfig) -> Result<Self> {
        let path = &config.state_path;
        let state = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read state file {}", path.display()))?;
            serde_json::from_str::<SubscriptionState>(&raw).with_context(|| {
                format!("failed to parse subscription state file {}", path.display())
            })?
        } else {
            SubscriptionState::default()
        };

        if state.schema_version != SUBSCRIPTION_STATE_SCHEMA_VERSION {
            bail!(
                "unsupported subscription state schema: expected {}, found {}",
                SUBSCRIPTION_STATE_SCHEMA_VERSION,
                state.schema_version
            );
        }

        Ok(Self {
            config,
            state: Mutex::new(state),
        })
    }

    /// Writes `next` to disk, then swaps it into `state`. A failed write
    /// leaves the in-memory state untouched.
    async fn commit(&self, state: &mut SubscriptionState, next: SubscriptionState) -> Result<()> {
        let mut payload =
            serde_json::to_string_pretty(&next).context("failed to serialize state")?;
        payload.push('\n');
        let path = self.config.state_path.clone();
        tokio::task::spawn_blocking(move || {
            write_text_atomic(&path, &payload)
                .with_context(|| format!("failed to write state file {}", path.display()))
        })
        .await
        .context("state file writer task failed")??;
        *state = next;
        Ok(())
    }

    pub async fn link_user(&self, user_id: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        let user_id = user_id.trim();
        if state.linked_users.contains(user_id) {
            return Ok(false);
        }
        let mut next = state.clone();
        next.linked_users.insert(user_id.to_string());
        self.commit(&mut state, next).await?;
        Ok(true)
    }

    /// Owner names are matched case-insensitively, as GitHub does for accounts.
    pub async fn record_installation(&self, owner: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        let owner = owner.trim().to_ascii_lowercase();
        if state.installed_owners.contains(&owner) {
            return Ok(false);
        }
        let mut next = state.clone();
        next.installed_owners.insert(owner);
        self.commit(&mut state, next).await?;
        Ok(true)
    }
}

#[async_trait]
impl SubscriptionService for FileSubscriptionService {
    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> ServiceResult<CreateSubscriptionResult> {
        let mut state = self.state.lock().await;
        let installed = state
            .installed_owners
            .contains(&request.repo.owner.to_ascii_lowercase());
        if !installed && self.config.require_app_installation {
            return Ok(CreateSubscriptionResult {
                requires_installation: true,
                install_url: self.config.app_install_url.clone(),
                ..CreateSubscriptionResult::default()
            });
        }

        let delivery_mode = if installed {
            DeliveryMode::Webhook
        } else {
            DeliveryMode::Polling
        };
        let repo_full_name = request.repo.full_name();
        let mut next = state.clone();
        let channel = next
            .channels
            .entry(request.channel_id.clone())
            .or_default();
        match channel
            .iter_mut()
            .find(|subscription| subscription.repo_full_name == repo_full_name)
        {
            Some(existing) => {
                existing.event_types = request.event_types.clone();
                existing.delivery_mode = delivery_mode;
            }
            None => channel.push(ChannelSubscription {
                repo_full_name: repo_full_name.clone(),
                event_types: request.event_types.clone(),
                delivery_mode,
            }),
        }
        self.commit(&mut state, next)
            .await
            .map_err(ServiceError::from)?;
        debug!(
            channel_id = %request.channel_id,
            repo = %repo_full_name,
            delivery_mode = delivery_mode.as_str(),
            "subscription stored"
        );

        Ok(CreateSubscriptionResult {
            success: true,
            install_url: self.config.app_install_url.clone(),
            delivery_mode: Some(delivery_mode),
            repo_full_name: Some(repo_full_name),
            ..CreateSubscriptionResult::default()
        })
    }

    async fn list_subscriptions(
        &self,
        channel_id: &str,
    ) -> ServiceResult<Vec<ChannelSubscription>> {
        let state = self.state.lock().await;
        Ok(state.channels.get(channel_id).cloned().unwrap_or_default())
    }

    async fn remove_subscription(
        &self,
        channel_id: &str,
        repo_full_name: &str,
    ) -> ServiceResult<bool> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let Some(channel) = next.channels.get_mut(channel_id) else {
            return Ok(false);
        };
        let before = channel.len();
        channel.retain(|subscription| subscription.repo_full_name != repo_full_name);
        let removed = channel.len() != before;
        if !removed {
            return Ok(false);
        }
        if channel.is_empty() {
            next.channels.remove(channel_id);
        }
        self.commit(&mut state, next)
            .await
            .map_err(ServiceError::from)?;
        Ok(removed)
    }
}

#[async_trait]
impl AccountLinker for FileSubscriptionService {
    async fn is_linked(&self, user_id: &str) -> ServiceResult<bool> {
        Ok(self.state.lock().await.linked_users.contains(user_id.trim()))
    }

    async fn authorization_url(&self, user_id: &str, channel_id: &str) -> ServiceResult<String> {
        let url = reqwest::Url::parse_with_params(
            &self.config.oauth_authorize_url,
            &[("user_id", user_id), ("channel_id", channel_id)],
        )
        .map_err(|error| ServiceError::new(format!("invalid oauth authorize url: {error}")))?;
        Ok(url.to_string())
    }
}
