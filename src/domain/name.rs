//! Validated node names.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Longest accepted name, in characters.
pub const MAX_NAME_LEN: usize = 255;

pub const MSG_EMPTY: &str = "Please provide a non-empty name.";
pub const MSG_TOO_LONG: &str = "Name length cannot exceed 255 characters.";
pub const MSG_PATTERN: &str =
    "Name must only include letters, numbers, dashes, underscores, and parentheses.";

fn name_regex() -> &'static Regex {
    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    NAME_REGEX.get_or_init(|| Regex::new(r"^[a-zA-Z0-9\-_() ]+$").expect("valid name regex"))
}

/// A directory or deck name that passed validation.
///
/// Rules are checked in order and the first failing one is reported:
/// non-empty, at most [`MAX_NAME_LEN`] characters, `[a-zA-Z0-9\-_() ]+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeName(String);

impl NodeName {
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let failure = if raw.is_empty() {
            Some(MSG_EMPTY)
        } else if raw.chars().count() > MAX_NAME_LEN {
            Some(MSG_TOO_LONG)
        } else if !name_regex().is_match(&raw) {
            Some(MSG_PATTERN)
        } else {
            None
        };

        match failure {
            Some(message) => Err(DomainError::InvalidName {
                name: raw,
                message: message.to_string(),
            }),
            None => Ok(Self(raw)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NodeName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<NodeName> for String {
    fn from(name: NodeName) -> Self {
        name.0
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
