//! `/github <subscribe|unsubscribe|status>` parsing into a subscription intent.

use crate::command_args::CommandArgs;
use crate::command_errors::CommandError;
use crate::repo_identifier::RepoIdentifier;
use crate::subscription_event_types::{resolve_event_types, EventTypeSet};

pub const GITHUB_USAGE: &str = "**Usage:**\n\
- `/github subscribe owner/repo [--events pr,issues,...|all]`\n\
- `/github unsubscribe owner/repo`\n\
- `/github status`";
pub const GITHUB_SUBSCRIBE_USAGE: &str =
    "Usage: `/github subscribe owner/repo [--events pr,issues,...|all]`";
pub const GITHUB_UNSUBSCRIBE_USAGE: &str = "Usage: `/github unsubscribe owner/repo`";
pub const VALID_SUBSCRIPTION_ACTIONS: &str = "subscribe, unsubscribe, status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates supported `SubscriptionAction` values.
pub enum SubscriptionAction {
    Subscribe,
    Unsubscribe,
    Status,
}

impl SubscriptionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
            Self::Status => "status",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "subscribe" => Some(Self::Subscribe),
            "unsubscribe" => Some(Self::Unsubscribe),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Validated, request-scoped `/github` invocation.
pub enum SubscriptionIntent {
    Subscribe {
        repo: RepoIdentifier,
        event_types: EventTypeSet,
    },
    Unsubscribe {
        repo: RepoIdentifier,
    },
    Status,
}

impl SubscriptionIntent {
    pub fn action(&self) -> SubscriptionAction {
        match self {
            Self::Subscribe { .. } => SubscriptionAction::Subscribe,
            Self::Unsubscribe { .. } => SubscriptionAction::Unsubscribe,
            Self::Status => SubscriptionAction::Status,
        }
    }

    pub fn repo(&self) -> Option<&RepoIdentifier> {
        match self {
            Self::Subscribe { repo, .. } | Self::Unsubscribe { repo } => Some(repo),
            Self::Status => None,
        }
    }
}

/// Validates everything that can be checked without calling a collaborator.
pub fn parse_subscription_command<S: AsRef<str>>(
    args: &[S],
    default_event_types: &EventTypeSet,
) -> Result<SubscriptionIntent, CommandError> {
    let args = CommandArgs::parse(args);
    let Some(raw_action) = args.positional(0) else {
        return Err(CommandError::Usage(GITHUB_USAGE));
    };
    let Some(action) = SubscriptionAction::parse(raw_action) else {
        return Err(CommandError::UnknownAction {
            action: raw_action.to_string(),
            valid: VALID_SUBSCRIPTION_ACTIONS,
        });
    };

    match action {
        SubscriptionAction::Subscribe => {
            let raw_repo = args
                .positional(1)
                .ok_or(CommandError::Usage(GITHUB_SUBSCRIBE_USAGE))?;
            let repo = RepoIdentifier::parse(raw_repo)?;
            let event_types = resolve_event_types(&args, default_event_types)
                .map_err(|error| CommandError::Validation(error.into()))?;
            Ok(SubscriptionIntent::Subscribe { repo, event_types })
        }
        SubscriptionAction::Unsubscribe => {
            let raw_repo = args
                .positional(1)
                .ok_or(CommandError::Usage(GITHUB_UNSUBSCRIBE_USAGE))?;
            let repo = RepoIdentifier::parse(raw_repo)?;
            Ok(SubscriptionIntent::Unsubscribe { repo })
        }
        SubscriptionAction::Status => Ok(SubscriptionIntent::Status),
    }
}
