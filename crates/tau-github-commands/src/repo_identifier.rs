use std::fmt;

use crate::command_errors::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// `owner/name` repository reference as typed by the user.
pub struct RepoIdentifier {
    pub owner: String,
    pub name: String,
}

/// Removes emphasis that chat clients leave around a pasted repository name,
/// e.g. `**owner/repo**` or `` `owner/repo` ``.
pub fn strip_markdown_emphasis(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|ch| !matches!(ch, '*' | '`'))
        .collect::<String>()
        .trim_matches(|ch| matches!(ch, '_' | '~'))
        .trim()
        .to_string()
}

impl RepoIdentifier {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = strip_markdown_emphasis(raw);
        let invalid = || ValidationError::InvalidRepo(raw.trim().to_string());
        if normalized.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        let mut parts = normalized.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(invalid()),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.full_name().eq_ignore_ascii_case(other.trim())
    }
}

impl fmt::Display for RepoIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
