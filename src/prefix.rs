//! IRC message prefix (origin) types.
//!
//! A prefix identifies who a message came from: either a bare server name or
//! a `nick!username@host` user triple.

use std::fmt;

use crate::error::MessageParseError;

/// The origin of an IRC message, parsed from the leading `:prefix`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prefix {
    /// A server name, or any prefix that is not a well-formed user triple.
    ServerName(String),
    /// A user origin: nickname, username, host.
    Nickname(String, String, String),
}

impl Prefix {
    /// Parse a raw prefix string, retaining it as [`Prefix::ServerName`]
    /// when the `nick!username@host` triple does not hold.
    pub fn parse(raw: &str) -> Prefix {
        Prefix::parse_nickname(raw).unwrap_or_else(|_| Prefix::ServerName(raw.to_string()))
    }

    /// Strictly parse a `nick!username@host` user triple.
    ///
    /// Unlike [`Prefix::parse`], any deviation from the exact two-separator
    /// shape is a hard failure.
    pub fn parse_nickname(raw: &str) -> Result<Prefix, MessageParseError> {
        let (nick, rest) = raw
            .split_once('!')
            .ok_or_else(|| MessageParseError::InvalidUserPrefix(raw.to_string()))?;
        let (username, host) = rest
            .split_once('@')
            .ok_or_else(|| MessageParseError::InvalidUserPrefix(raw.to_string()))?;
        if nick.is_empty() || username.is_empty() || host.is_empty() {
            return Err(MessageParseError::InvalidUserPrefix(raw.to_string()));
        }
        Ok(Prefix::Nickname(
            nick.to_string(),
            username.to_string(),
            host.to_string(),
        ))
    }

    /// The nickname, when this is a user origin.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(nick, _, _) => Some(nick),
            Prefix::ServerName(_) => None,
        }
    }

    /// A display label for the sender: the nickname for user origins, the
    /// raw name otherwise.
    pub fn label(&self) -> &str {
        match self {
            Prefix::Nickname(nick, _, _) => nick,
            Prefix::ServerName(name) => name,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::ServerName(name) => write!(f, "{}", name),
            Prefix::Nickname(nick, username, host) => {
                write!(f, "{}!{}@{}", nick, username, host)
            }
        }
    }
}
