//! IRC wire message type and line codec.
//!
//! A [`Message`] is the unit of protocol traffic: an optional origin prefix,
//! a command (verb or 3-digit numeric as text), and the raw parameter
//! remainder of the line. Parameters stay unsplit here; each dispatch
//! handler tokenizes them according to that command's own grammar.

use std::fmt;
use std::str::FromStr;

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::opt,
    error::{context, VerboseError},
    sequence::preceded,
    IResult,
};

use crate::error::{EngineError, MessageParseError, Result};
use crate::prefix::Prefix;

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Parse the message prefix (the part after `:` and before the first space).
fn parse_prefix(input: &str) -> ParseResult<'_, &str> {
    context(
        "parsing message prefix",
        preceded(char(':'), take_while1(|c| c != ' ')),
    )(input)
}

/// Parse the command name (a verb or 3-digit numeric).
fn parse_command(input: &str) -> ParseResult<'_, &str> {
    context(
        "parsing IRC command",
        take_while1(|c: char| c.is_alphanumeric()),
    )(input)
}

/// Split a CR/LF-stripped line into `(prefix, command, params)`.
///
/// `params` is the raw remainder after the single space following the
/// command, which may be empty.
fn parse_line(input: &str) -> ParseResult<'_, (Option<&str>, &str, &str)> {
    let (input, prefix) = context("parsing optional prefix", opt(parse_prefix))(input)?;
    let (input, _) = space0(input)?;
    let (input, command) = parse_command(input)?;
    let params = input.strip_prefix(' ').unwrap_or(input);
    Ok(("", (prefix, command, params)))
}

/// Strip the leading `:` of a trailing free-text field, if present.
pub(crate) fn trailing(field: &str) -> &str {
    field.strip_prefix(':').unwrap_or(field)
}

/// The parameter remainder after the leading target-nick token that every
/// numeric reply carries.
pub(crate) fn after_target(params: &str) -> &str {
    params.split_once(' ').map_or("", |(_, rest)| rest)
}

/// Render a numeric's informational payload as display text: strip the
/// trailing marker, keeping any middle fields (e.g. LUSER counts).
pub(crate) fn info_text(params: &str) -> String {
    if params.starts_with(':') {
        return trailing(params).to_string();
    }
    match params.split_once(" :") {
        Some((head, tail)) => format!("{} {}", head, tail),
        None => params.to_string(),
    }
}

/// A single IRC protocol message.
///
/// Constructed fresh per received or sent line; immutable after
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Message origin, absent for client-originated messages.
    pub prefix: Option<Prefix>,
    /// Command verb or numeric reply code as text.
    pub command: String,
    /// Raw parameter remainder, unsplit.
    pub params: String,
}

impl Message {
    fn cmd(command: &str, params: String) -> Message {
        Message {
            prefix: None,
            command: command.to_string(),
            params,
        }
    }

    /// Decode one wire line into a [`Message`].
    ///
    /// Trailing CR/LF is stripped first. Lines carrying IRCv3 message tags
    /// (leading `@`) fail closed with
    /// [`EngineError::UnsupportedFeature`]; anything else that cannot
    /// produce a command token fails with
    /// [`EngineError::MalformedMessage`] carrying the raw text.
    pub fn parse(line: &str) -> Result<Message> {
        let stripped = line.trim_end_matches(['\r', '\n']);
        if stripped.is_empty() {
            return Err(EngineError::MalformedMessage {
                string: line.to_string(),
                cause: MessageParseError::EmptyMessage,
            });
        }
        if stripped.starts_with('@') {
            return Err(EngineError::UnsupportedFeature {
                feature: "message tags",
                string: line.to_string(),
            });
        }

        match parse_line(stripped) {
            Ok((_, (prefix, command, params))) => Ok(Message {
                prefix: prefix.map(Prefix::parse),
                command: command.to_string(),
                params: params.to_string(),
            }),
            Err(_) => {
                let cause = if stripped.starts_with(':') {
                    MessageParseError::PrefixOnly
                } else {
                    MessageParseError::MissingCommand
                };
                Err(EngineError::MalformedMessage {
                    string: line.to_string(),
                    cause,
                })
            }
        }
    }

    /// Encode this message into its exact wire form, CRLF included.
    ///
    /// Parameter content is never validated here; keeping a single command
    /// within the server's line limit is the caller's responsibility.
    pub fn to_wire(&self) -> String {
        let mut line = String::with_capacity(self.params.len() + self.command.len() + 16);
        if let Some(prefix) = &self.prefix {
            line.push(':');
            line.push_str(&prefix.to_string());
            line.push(' ');
        }
        line.push_str(&self.command);
        line.push(' ');
        line.push_str(&self.params);
        line.push_str("\r\n");
        line
    }

    // Outbound command constructors. Each is a thin params formatter over
    // the command's wire grammar.

    pub fn pass(password: &str) -> Message {
        Message::cmd("PASS", password.to_string())
    }

    pub fn nick(nickname: &str) -> Message {
        Message::cmd("NICK", nickname.to_string())
    }

    pub fn user(username: &str) -> Message {
        Message::cmd("USER", format!("{} 0 * :{}", username, username))
    }

    pub fn join(channel: &str) -> Message {
        Message::cmd("JOIN", channel.to_string())
    }

    pub fn part(channel: &str, reason: &str) -> Message {
        Message::cmd("PART", format!("{} :{}", channel, reason))
    }

    pub fn privmsg(target: &str, text: &str) -> Message {
        Message::cmd("PRIVMSG", format!("{} :{}", target, text))
    }

    pub fn notice(target: &str, text: &str) -> Message {
        Message::cmd("NOTICE", format!("{} :{}", target, text))
    }

    pub fn names(channel: &str) -> Message {
        Message::cmd("NAMES", channel.to_string())
    }

    pub fn pong(token: &str) -> Message {
        Message::cmd("PONG", format!(":{}", token))
    }

    pub fn query_topic(channel: &str) -> Message {
        Message::cmd("TOPIC", channel.to_string())
    }

    pub fn topic(channel: &str, text: &str) -> Message {
        Message::cmd("TOPIC", format!("{} :{}", channel, text))
    }

    pub fn invite(nickname: &str, channel: &str) -> Message {
        Message::cmd("INVITE", format!("{} {}", nickname, channel))
    }

    pub fn kick(channel: &str, nickname: &str, comment: &str) -> Message {
        Message::cmd("KICK", format!("{} {} :{}", channel, nickname, comment))
    }

    pub fn motd() -> Message {
        Message::cmd("MOTD", String::new())
    }

    pub fn version() -> Message {
        Message::cmd("VERSION", String::new())
    }

    pub fn oper(name: &str, password: &str) -> Message {
        Message::cmd("OPER", format!("{} {}", name, password))
    }

    pub fn quit(reason: &str) -> Message {
        Message::cmd("QUIT", format!(":{}", reason))
    }
}

impl fmt::Display for Message {
    /// The wire form without the trailing CRLF, for logging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wire = self.to_wire();
        write!(f, "{}", wire.trim_end_matches(['\r', '\n']))
    }
}

impl FromStr for Message {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Message> {
        Message::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_command() {
        let msg = Message::parse("PING :irc.example.com\r\n").unwrap();
        assert_eq!(msg.prefix, None);
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.params, ":irc.example.com");
    }

    #[test]
    fn test_parse_with_user_prefix() {
        let msg = Message::parse(":alice!ali@host PRIVMSG #room :hello there\r\n").unwrap();
        assert_eq!(
            msg.prefix,
            Some(Prefix::Nickname(
                "alice".to_string(),
                "ali".to_string(),
                "host".to_string()
            ))
        );
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params, "#room :hello there");
    }

    #[test]
    fn test_parse_with_server_prefix() {
        let msg = Message::parse(":irc.example.com 001 bob :Welcome\r\n").unwrap();
        assert_eq!(
            msg.prefix,
            Some(Prefix::ServerName("irc.example.com".to_string()))
        );
        assert_eq!(msg.command, "001");
        assert_eq!(msg.params, "bob :Welcome");
    }

    #[test]
    fn test_parse_no_params() {
        let msg = Message::parse("AWAY\r\n").unwrap();
        assert_eq!(msg.command, "AWAY");
        assert_eq!(msg.params, "");
    }

    #[test]
    fn test_parse_tags_fail_closed() {
        let err = Message::parse("@time=2023-01-01 :n!u@h PRIVMSG #a :b\r\n").unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFeature { .. }));
    }

    #[test]
    fn test_parse_empty_line() {
        let err = Message::parse("\r\n").unwrap_err();
        match err {
            EngineError::MalformedMessage { cause, .. } => {
                assert_eq!(cause, MessageParseError::EmptyMessage);
            }
            other => panic!("expected MalformedMessage, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_prefix_only() {
        let err = Message::parse(":irc.example.com\r\n").unwrap_err();
        match err {
            EngineError::MalformedMessage { string, cause } => {
                assert_eq!(string, ":irc.example.com\r\n");
                assert_eq!(cause, MessageParseError::PrefixOnly);
            }
            other => panic!("expected MalformedMessage, got {:?}", other),
        }
    }

    #[test]
    fn test_to_wire() {
        assert_eq!(
            Message::privmsg("#room", "hello").to_wire(),
            "PRIVMSG #room :hello\r\n"
        );
        assert_eq!(Message::motd().to_wire(), "MOTD \r\n");

        let msg = Message {
            prefix: Some(Prefix::parse("alice!ali@host")),
            command: "QUIT".to_string(),
            params: ":gone".to_string(),
        };
        assert_eq!(msg.to_wire(), ":alice!ali@host QUIT :gone\r\n");
    }

    #[test]
    fn test_round_trip() {
        for raw in [
            "PRIVMSG #room :hello world\r\n",
            ":irc.example.com 433 bob bob2 :Nickname is already in use.\r\n",
            ":alice!ali@host JOIN :#room\r\n",
            "USER guest 0 * :guest\r\n",
        ] {
            let msg = Message::parse(raw).unwrap();
            assert_eq!(msg.to_wire(), raw);
        }
    }

    #[test]
    fn test_user_constructor() {
        assert_eq!(Message::user("guest").to_wire(), "USER guest 0 * :guest\r\n");
    }

    #[test]
    fn test_trailing() {
        assert_eq!(trailing(":hello there"), "hello there");
        assert_eq!(trailing("hello"), "hello");
    }

    #[test]
    fn test_info_text_preserves_middle_fields() {
        assert_eq!(after_target("bob 42 :channels formed"), "42 :channels formed");
        assert_eq!(after_target("bob"), "");
        assert_eq!(info_text("42 :channels formed"), "42 channels formed");
        assert_eq!(info_text(":Welcome to the network"), "Welcome to the network");
    }
}
