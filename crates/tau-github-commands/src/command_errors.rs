//! Error taxonomy for chat command handling.

use std::fmt;

use thiserror::Error;

use crate::subscription_event_types::InvalidEventTypeError;

/// Prefix attached to every validation and external-failure reply.
pub const ERROR_GLYPH: &str = "❌";

pub(crate) const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Failure reported by an external collaborator (GitHub, OAuth, subscriptions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub message: Option<String>,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn without_message() -> Self {
        Self { message: None }
    }

    pub fn message_or_fallback(&self) -> &str {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .unwrap_or(UNKNOWN_ERROR_MESSAGE)
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message_or_fallback())
    }
}

impl std::error::Error for ServiceError {}

impl From<anyhow::Error> for ServiceError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(format!("{error:#}"))
    }
}

/// Locally detected input problems. Always raised before any external call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid repository format: `{0}`. Use `owner/repo`.")]
    InvalidRepo(String),
    #[error("Count must be a number between {min} and {max}.")]
    CountOutOfRange { min: u8, max: u8 },
    #[error("Invalid state: `{value}`. Must be one of: {allowed}.")]
    InvalidState { value: String, allowed: String },
    #[error("Creator must not be empty.")]
    EmptyCreator,
    #[error(transparent)]
    InvalidEventTypes(#[from] InvalidEventTypeError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates supported `CommandError` values.
pub enum CommandError {
    #[error("{0}")]
    Usage(&'static str),
    #[error("Unknown action: `{action}`. Valid actions: {valid}")]
    UnknownAction { action: String, valid: &'static str },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{context}: {source}")]
    External {
        context: &'static str,
        source: ServiceError,
    },
}

impl CommandError {
    pub fn external(context: &'static str, source: ServiceError) -> Self {
        Self::External { context, source }
    }

    /// Renders the single outbound chat message for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Usage(usage) => (*usage).to_string(),
            Self::UnknownAction { .. } => format!("{ERROR_GLYPH} {self}"),
            Self::Validation(error) => format!("{ERROR_GLYPH} {error}"),
            Self::External { context, source } => {
                format!("{ERROR_GLYPH} {context}: {}", source.message_or_fallback())
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Usage(_) | Self::UnknownAction { .. } => "usage",
            Self::Validation(_) => "validation",
            Self::External { .. } => "external",
        }
    }
}
