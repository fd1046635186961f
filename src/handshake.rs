//! Sans-IO registration state machine.
//!
//! Drives the post-connect handshake (PASS/NICK/USER through the welcome
//! numeric) as pure state transitions: the machine consumes parsed messages
//! and produces actions, and never touches the socket itself. The owning
//! [`Client`](crate::client::Client) performs the I/O, which keeps collision
//! recovery and failure paths unit-testable without a network.

use rand::Rng;

use crate::message::{after_target, info_text, trailing, Message};
use crate::response::Response;

/// How many nickname-collision retries are attempted before giving up.
const NICK_RETRY_LIMIT: u32 = 9;

/// Lifecycle of the server connection.
///
/// Owned exclusively by the engine; the UI reads it through
/// [`EventSink::state_change`](crate::client::EventSink::state_change) and
/// never mutates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connection.
    #[default]
    Disconnected,
    /// TCP connect in flight.
    Connecting,
    /// PASS/NICK/USER sent, waiting for the welcome numeric.
    AwaitingWelcome,
    /// Handshake complete, session usable.
    Registered,
    /// Terminal: transport failure or fatal server ERROR.
    Failed,
}

/// Actions produced by the registration machine.
///
/// The caller is responsible for sending the messages to the server.
#[derive(Clone, Debug)]
pub enum RegistrationAction {
    /// Send this message to the server.
    Send(Box<Message>),
    /// Display text for the server buffer: a pre-welcome numeric (wrong
    /// password, lookup notices) the machine does not act on itself.
    Info(String),
    /// Registration is complete; proceed to normal operation.
    Complete,
    /// Registration failed; the connection is unusable.
    Fail(RegistrationError),
}

/// Reasons registration can fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistrationError {
    /// The nickname collided on every retry.
    NickRetriesExhausted(String),
    /// The server sent a fatal ERROR during the handshake.
    ServerError(String),
}

impl std::fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NickRetriesExhausted(nick) => {
                write!(f, "nickname {} in use, retries exhausted", nick)
            }
            Self::ServerError(reason) => write!(f, "server error: {}", reason),
        }
    }
}

impl std::error::Error for RegistrationError {}

/// State machine for the registration handshake.
///
/// Registration ends on `001` (RPL_WELCOME); the welcome-family numerics
/// `002`-`005` are informational and do not end the phase.
#[derive(Clone, Debug)]
pub struct HandshakeMachine {
    state: ConnectionState,
    /// The nickname as originally requested; collision suffixes build on it.
    base_nick: String,
    /// The nickname currently claimed on the wire.
    nick: String,
    username: String,
    password: Option<String>,
    retries: u32,
}

impl HandshakeMachine {
    /// Create a machine for the given identity.
    #[must_use]
    pub fn new(nick: &str, username: &str, password: Option<&str>) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            base_nick: nick.to_string(),
            nick: nick.to_string(),
            username: username.to_string(),
            password: password.map(str::to_string),
            retries: 0,
        }
    }

    /// Current handshake state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The nickname currently claimed, including any collision suffix.
    #[must_use]
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Begin the handshake. Returns the opening messages to send
    /// (optional PASS, then NICK, then USER).
    #[must_use]
    pub fn start(&mut self) -> Vec<RegistrationAction> {
        self.state = ConnectionState::AwaitingWelcome;
        let mut actions = Vec::new();
        if let Some(ref password) = self.password {
            actions.push(RegistrationAction::Send(Box::new(Message::pass(password))));
        }
        actions.push(RegistrationAction::Send(Box::new(Message::nick(&self.nick))));
        actions.push(RegistrationAction::Send(Box::new(Message::user(
            &self.username,
        ))));
        actions
    }

    /// Feed one server message to the machine.
    #[must_use]
    pub fn feed(&mut self, msg: &Message) -> Vec<RegistrationAction> {
        if self.state != ConnectionState::AwaitingWelcome {
            return vec![];
        }

        if msg.command == "PING" {
            // Keepalive is answered in every state and is never
            // user-visible.
            return vec![RegistrationAction::Send(Box::new(Message::pong(trailing(
                &msg.params,
            ))))];
        }

        if msg.command == "ERROR" {
            let reason = trailing(&msg.params).to_string();
            self.state = ConnectionState::Failed;
            return vec![RegistrationAction::Fail(RegistrationError::ServerError(
                reason,
            ))];
        }

        match msg.command.parse::<Response>() {
            Ok(Response::RPL_WELCOME) => {
                self.state = ConnectionState::Registered;
                vec![RegistrationAction::Complete]
            }
            Ok(Response::ERR_NICKNAMEINUSE) => self.retry_nick(),
            // 002-005, pre-welcome notices, and rejections like 464 do not
            // move the machine, but they must still reach the server buffer.
            _ => vec![RegistrationAction::Info(info_text(after_target(
                &msg.params,
            )))],
        }
    }

    fn retry_nick(&mut self) -> Vec<RegistrationAction> {
        if self.retries >= NICK_RETRY_LIMIT {
            self.state = ConnectionState::Failed;
            return vec![RegistrationAction::Fail(
                RegistrationError::NickRetriesExhausted(self.base_nick.clone()),
            )];
        }
        self.retries += 1;
        let suffix = rand::thread_rng().gen_range(10..100);
        self.nick = format!("{}_{}", self.base_nick, suffix);
        tracing::debug!(nick = %self.nick, retry = self.retries, "nickname in use, retrying");
        vec![RegistrationAction::Send(Box::new(Message::nick(&self.nick)))]
    }
}
