#![no_main]

use libfuzzer_sys::fuzz_target;
use tau_github_commands::command_args::split_command_line;
use tau_github_commands::{parse_event_types, EventTypeSet};

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let tokens = split_command_line(&raw);

    match parse_event_types(&tokens) {
        Ok(resolved) => {
            let reparsed = EventTypeSet::parse_list(&resolved).expect("resolved list reparses");
            assert_eq!(reparsed.to_string(), resolved);
            assert!(!reparsed.is_empty());
        }
        Err(error) => {
            assert!(!error.invalid.is_empty());
            assert!(error.to_string().contains("Valid options:"));
        }
    }
});
