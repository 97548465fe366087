//! Event-type vocabulary and `--events` flag resolution for subscriptions.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::command_args::CommandArgs;

pub const EVENTS_FLAG: &str = "events";
pub const ALL_EVENT_TYPES_TOKEN: &str = "all";

/// Variant order is the canonical serialization order of an [`EventTypeSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventType {
    PullRequests,
    Issues,
    Commits,
    Releases,
    Ci,
    Comments,
    Reviews,
    Branches,
    ReviewComments,
    Stars,
    Forks,
}

pub const ALL_EVENT_TYPES: [EventType; 11] = [
    EventType::PullRequests,
    EventType::Issues,
    EventType::Commits,
    EventType::Releases,
    EventType::Ci,
    EventType::Comments,
    EventType::Reviews,
    EventType::Branches,
    EventType::ReviewComments,
    EventType::Stars,
    EventType::Forks,
];

pub const DEFAULT_EVENT_TYPES: [EventType; 4] = [
    EventType::PullRequests,
    EventType::Issues,
    EventType::Commits,
    EventType::Releases,
];

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PullRequests => "pr",
            Self::Issues => "issues",
            Self::Commits => "commits",
            Self::Releases => "releases",
            Self::Ci => "ci",
            Self::Comments => "comments",
            Self::Reviews => "reviews",
            Self::Branches => "branches",
            Self::ReviewComments => "review_comments",
            Self::Stars => "stars",
            Self::Forks => "forks",
        }
    }

    /// Matches an already-normalized (trimmed, lowercase) token.
    pub fn from_token(token: &str) -> Option<Self> {
        ALL_EVENT_TYPES
            .iter()
            .copied()
            .find(|event_type| event_type.as_str() == token)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// De-duplicated event types, rendered in vocabulary order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct EventTypeSet {
    types: BTreeSet<EventType>,
}

impl EventTypeSet {
    pub fn all() -> Self {
        Self::from_iter(ALL_EVENT_TYPES)
    }

    pub fn defaults() -> Self {
        Self::from_iter(DEFAULT_EVENT_TYPES)
    }

    pub fn contains(&self, event_type: EventType) -> bool {
        self.types.contains(&event_type)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EventType> + '_ {
        self.types.iter().copied()
    }

    /// Parses a comma-separated list such as `pr, Issues,all`.
    pub fn parse_list(raw: &str) -> Result<Self, InvalidEventTypeError> {
        let tokens = normalize_event_tokens(raw);
        resolve_event_tokens(&tokens)
    }
}

impl FromIterator<EventType> for EventTypeSet {
    fn from_iter<I: IntoIterator<Item = EventType>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for EventTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .types
            .iter()
            .map(EventType::as_str)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

impl Serialize for EventTypeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EventTypeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_list(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Invalid event type(s): {}\n\nValid options: {}",
    quoted_list(.invalid),
    valid_event_type_options()
)]
/// Raised when `--events` names tokens outside the vocabulary.
pub struct InvalidEventTypeError {
    pub invalid: Vec<String>,
}

fn quoted_list(values: &[String]) -> String {
    values
        .iter()
        .map(|value| format!("\"{value}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn valid_event_type_options() -> String {
    let mut options = ALL_EVENT_TYPES
        .iter()
        .map(EventType::as_str)
        .collect::<Vec<_>>();
    options.push(ALL_EVENT_TYPES_TOKEN);
    options.join(", ")
}

fn normalize_event_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

fn resolve_event_tokens(tokens: &[String]) -> Result<EventTypeSet, InvalidEventTypeError> {
    if tokens.iter().any(|token| token == ALL_EVENT_TYPES_TOKEN) {
        return Ok(EventTypeSet::all());
    }

    let mut resolved = BTreeSet::new();
    let mut invalid = Vec::new();
    let mut seen_invalid = HashSet::new();
    for token in tokens {
        match EventType::from_token(token) {
            Some(event_type) => {
                resolved.insert(event_type);
            }
            None => {
                if seen_invalid.insert(token.as_str()) {
                    invalid.push(token.clone());
                }
            }
        }
    }

    if !invalid.is_empty() {
        return Err(InvalidEventTypeError { invalid });
    }
    Ok(EventTypeSet { types: resolved })
}

/// Resolves the `--events` flag of an already tokenized command.
pub fn resolve_event_types(
    args: &CommandArgs,
    default_types: &EventTypeSet,
) -> Result<EventTypeSet, InvalidEventTypeError> {
    let Some(Some(raw)) = args.flag(EVENTS_FLAG) else {
        return Ok(default_types.clone());
    };
    let tokens = normalize_event_tokens(raw);
    if tokens.is_empty() {
        return Ok(default_types.clone());
    }
    resolve_event_tokens(&tokens)
}

/// Parses `--events` out of raw arguments and returns the canonical
/// comma-joined list, falling back to [`DEFAULT_EVENT_TYPES`].
pub fn parse_event_types<S: AsRef<str>>(args: &[S]) -> Result<String, InvalidEventTypeError> {
    let args = CommandArgs::parse(args);
    resolve_event_types(&args, &EventTypeSet::defaults()).map(|set| set.to_string())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{
        parse_event_types, EventType, EventTypeSet, InvalidEventTypeError, ALL_EVENT_TYPES,
    };

    const ALL_JOINED: &str =
        "pr,issues,commits,releases,ci,comments,reviews,branches,review_comments,stars,forks";

    #[test]
    fn unit_parse_event_types_defaults_without_flag() {
        let empty: [&str; 0] = [];
        assert_eq!(
            parse_event_types(&empty).expect("defaults"),
            "pr,issues,commits,releases"
        );
        assert_eq!(
            parse_event_types(&["subscribe", "owner/repo"]).expect("defaults"),
            "pr,issues,commits,releases"
        );
    }

    #[test]
    fn unit_parse_event_types_defaults_for_empty_or_dangling_flag() {
        assert_eq!(
            parse_event_types(&["--events="]).expect("empty value"),
            "pr,issues,commits,releases"
        );
        assert_eq!(
            parse_event_types(&["owner/repo", "--events"]).expect("dangling flag"),
            "pr,issues,commits,releases"
        );
        assert_eq!(
            parse_event_types(&["--events= , ,"]).expect("blank tokens"),
            "pr,issues,commits,releases"
        );
    }

    #[test]
    fn functional_parse_event_types_supports_both_flag_forms() {
        assert_eq!(
            parse_event_types(&["--events=issues,pr"]).expect("inline form"),
            "pr,issues"
        );
        assert_eq!(
            parse_event_types(&["--events", "issues,pr"]).expect("separated form"),
            "pr,issues"
        );
    }

    #[test]
    fn functional_parse_event_types_normalizes_case_whitespace_and_duplicates() {
        assert_eq!(
            parse_event_types(&["--events= PR ,Issues,pr,,STARS"]).expect("normalized"),
            "pr,issues,stars"
        );
    }

    #[test]
    fn functional_parse_event_types_expands_all_and_ignores_siblings() {
        assert_eq!(
            parse_event_types(&["--events=all"]).expect("all"),
            ALL_JOINED
        );
        assert_eq!(
            parse_event_types(&["--events=pr,ALL,bogus"]).expect("all wins"),
            ALL_JOINED
        );
    }

    #[test]
    fn integration_parse_event_types_reports_every_invalid_token() {
        let error = parse_event_types(&["--events=foo,pr,bar,foo"]).expect_err("invalid");
        assert_eq!(
            error,
            InvalidEventTypeError {
                invalid: vec!["foo".to_string(), "bar".to_string()],
            }
        );
        let message = error.to_string();
        assert!(message.contains("\"foo\", \"bar\""));
        assert!(message.contains("Valid options: pr, issues, commits"));
        assert!(message.ends_with("forks, all"));
    }

    #[test]
    fn regression_event_type_set_round_trips_through_serde_as_string() {
        let set = EventTypeSet::parse_list("reviews,ci").expect("parse");
        let encoded = serde_json::to_string(&set).expect("encode");
        assert_eq!(encoded, "\"ci,reviews\"");
        let decoded: EventTypeSet = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(decoded, set);
        assert!(serde_json::from_str::<EventTypeSet>("\"ci,nope\"").is_err());
    }

    #[test]
    fn regression_event_type_tokens_match_vocabulary() {
        for event_type in ALL_EVENT_TYPES {
            assert_eq!(EventType::from_token(event_type.as_str()), Some(event_type));
        }
        assert_eq!(EventType::from_token("PR"), None);
    }

    proptest! {
        #[test]
        fn functional_parse_event_types_is_order_insensitive(
            tokens in proptest::collection::vec(proptest::sample::select(ALL_EVENT_TYPES.to_vec()), 1..12),
            seed in any::<u64>(),
        ) {
            let forward = tokens.iter().map(EventType::as_str).collect::<Vec<_>>();
            let mut shuffled = forward.clone();
            let len = shuffled.len();
            for index in 0..len {
                let swap_with = ((seed as usize).wrapping_add(index * 7)) % len;
                shuffled.swap(index, swap_with);
            }

            let forward_flag = format!("--events={}", forward.join(","));
            let shuffled_flag = format!("--events={}", shuffled.join(","));
            let forward_result = parse_event_types(&[forward_flag]).expect("forward");
            let shuffled_result = parse_event_types(&[shuffled_flag]).expect("shuffled");
            prop_assert_eq!(&forward_result, &shuffled_result);
            prop_assert_eq!(
                parse_event_types(&[format!("--events={}", forward.join(","))]).expect("repeat"),
                forward_result
            );
        }
    }
}
