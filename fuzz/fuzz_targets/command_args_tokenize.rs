#![no_main]

use libfuzzer_sys::fuzz_target;
use tau_github_commands::command_args::{split_command_line, CommandArgToken, CommandArgs};

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let tokens = split_command_line(&raw);
    assert!(tokens.iter().all(|token| !token.is_empty()));

    let args = CommandArgs::parse(&tokens);
    assert!(args.tokens().len() <= tokens.len());
    for token in args.tokens() {
        if let CommandArgToken::Flag { name, .. } = token {
            assert_eq!(name.to_ascii_lowercase(), *name);
            assert!(args.flag(name).is_some());
        }
    }
});
