use crate::subscription_event_types::EventTypeSet;

pub const DEFAULT_POLLING_INTERVAL_MINUTES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Runtime knobs for the chat command handlers.
pub struct CommandConfig {
    /// Event types used when `/github subscribe` omits `--events`.
    pub default_event_types: EventTypeSet,
    pub polling_interval_minutes: u32,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            default_event_types: EventTypeSet::defaults(),
            polling_interval_minutes: DEFAULT_POLLING_INTERVAL_MINUTES,
        }
    }
}
