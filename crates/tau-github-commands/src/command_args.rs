//! Small-grammar tokenizer shared by the `/gh_issues` and `/github` parsers.

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enumerates supported `CommandArgToken` values.
pub enum CommandArgToken {
    Positional(String),
    Flag { name: String, value: Option<String> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Tokenized command arguments in their original order.
pub struct CommandArgs {
    tokens: Vec<CommandArgToken>,
}

impl CommandArgs {
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Self {
        Self {
            tokens: tokenize_command_args(args),
        }
    }

    pub fn tokens(&self) -> &[CommandArgToken] {
        &self.tokens
    }

    pub fn positionals(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|token| match token {
            CommandArgToken::Positional(value) => Some(value.as_str()),
            CommandArgToken::Flag { .. } => None,
        })
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positionals().nth(index)
    }

    /// Returns the first occurrence of `--name`. The outer `Option` reports
    /// presence, the inner one whether a value followed the flag.
    pub fn flag(&self, name: &str) -> Option<Option<&str>> {
        self.tokens.iter().find_map(|token| match token {
            CommandArgToken::Flag {
                name: flag_name,
                value,
            } if flag_name == name => Some(value.as_deref()),
            _ => None,
        })
    }

    pub fn flags(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.tokens.iter().filter_map(|token| match token {
            CommandArgToken::Flag { name, value } => Some((name.as_str(), value.as_deref())),
            CommandArgToken::Positional(_) => None,
        })
    }
}

fn is_flag_token(token: &str) -> bool {
    token.len() > 2 && token.starts_with("--")
}

pub fn tokenize_command_args<S: AsRef<str>>(args: &[S]) -> Vec<CommandArgToken> {
    let mut tokens = Vec::with_capacity(args.len());
    let mut index = 0_usize;
    while index < args.len() {
        let raw = args[index].as_ref().trim();
        index += 1;
        if raw.is_empty() {
            continue;
        }
        if !is_flag_token(raw) {
            tokens.push(CommandArgToken::Positional(raw.to_string()));
            continue;
        }

        let body = &raw[2..];
        if let Some((name, value)) = body.split_once('=') {
            tokens.push(CommandArgToken::Flag {
                name: name.trim().to_ascii_lowercase(),
                value: Some(value.to_string()),
            });
            continue;
        }

        let value = match args.get(index).map(|next| next.as_ref().trim()) {
            Some(next) if !is_flag_token(next) => {
                index += 1;
                Some(next.to_string())
            }
            _ => None,
        };
        tokens.push(CommandArgToken::Flag {
            name: body.to_ascii_lowercase(),
            value,
        });
    }
    tokens
}

/// Splits a raw chat message body into whitespace-separated argument tokens.
pub fn split_command_line(line: &str) -> Vec<String> {
    line.split_whitespace().map(ToOwned::to_owned).collect()
}
