//! Chat command core for the Tau GitHub integration.
//! This crate parses and validates `/gh_issues` and `/github` arguments,
//! routes subscription intents to injected collaborators, and renders the
//! single reply each invocation sends back to its channel.

pub mod command_args;
pub mod command_config;
pub mod command_errors;
pub mod command_handlers;
pub mod command_services;
pub mod github_api_client;
pub mod issue_command_parser;
pub mod issue_filter;
pub mod issue_render;
pub mod issue_types;
pub mod repo_identifier;
pub mod subscription_command_parser;
pub mod subscription_event_types;
pub mod subscription_router;
pub mod subscription_state_store;

pub use command_config::CommandConfig;
pub use command_errors::{CommandError, ServiceError, ValidationError};
pub use command_handlers::GithubCommandHandlers;
pub use command_services::{
    AccountLinker, ChannelMessenger, ChannelSubscription, CommandContext,
    CreateSubscriptionRequest, CreateSubscriptionResult, DeliveryMode, IssueLister,
    ServiceResult, SubscriptionService,
};
pub use github_api_client::GithubApiClient;
pub use subscription_event_types::{
    parse_event_types, EventType, EventTypeSet, InvalidEventTypeError, ALL_EVENT_TYPES,
    DEFAULT_EVENT_TYPES,
};
pub use subscription_state_store::{FileSubscriptionService, FileSubscriptionServiceConfig};
