//! # lizirc
//!
//! The IRC protocol engine behind the Lizardchat client: a single-server
//! connection with line framing, the registration handshake (including
//! nickname-collision recovery and keepalive), and routing of incoming
//! traffic to per-conversation buffers.
//!
//! ## What lives here
//!
//! - Wire codec: [`Message`] decoding/encoding of CRLF-terminated lines
//! - [`Connection`]: blocking sends, non-blocking best-effort receives
//! - [`HandshakeMachine`]: sans-IO registration state machine
//! - [`Router`]: command/numeric dispatch into the [`BufferStore`]
//! - [`Client`]: the owning aggregate and its poll-process cycle
//!
//! Rendering, history persistence, TLS/SASL, and IRCv3 message tags are out
//! of scope; tagged lines fail closed rather than being silently stripped.
//!
//! ## Parsing wire lines
//!
//! ```rust
//! use lizirc::{Message, Prefix};
//!
//! let msg = Message::parse(":alice!ali@host PRIVMSG #rust :hello\r\n").unwrap();
//! assert_eq!(msg.prefix.as_ref().and_then(Prefix::nick), Some("alice"));
//! assert_eq!(msg.command, "PRIVMSG");
//! assert_eq!(msg.params, "#rust :hello");
//! assert_eq!(msg.to_wire(), ":alice!ali@host PRIVMSG #rust :hello\r\n");
//! ```
//!
//! ## Driving a session
//!
//! ```rust,no_run
//! use std::sync::atomic::AtomicBool;
//! use lizirc::{Client, ConnectionState, EventSink, Identity, RoutedEvent, DEFAULT_PORT};
//!
//! struct Printer;
//!
//! impl EventSink for Printer {
//!     fn routed_event(&mut self, event: &RoutedEvent) {
//!         println!("[{}] <{}> {}", event.buffer, event.from, event.text);
//!     }
//!     fn state_change(&mut self, state: ConnectionState) {
//!         println!("connection: {:?}", state);
//!     }
//!     fn fatal_error(&mut self, reason: &str) {
//!         eprintln!("fatal: {}", reason);
//!     }
//! }
//!
//! let mut sink = Printer;
//! let mut client = Client::new(Identity::new("bob", "bob", None));
//! client.connect("irc.lizard.fun", DEFAULT_PORT, &mut sink).unwrap();
//! client.join("#main_chat").unwrap();
//!
//! let cancel = AtomicBool::new(false);
//! client.run(&mut sink, &cancel);
//! ```

#![deny(clippy::all)]

pub mod buffer;
pub mod casemap;
pub mod client;
pub mod conn;
pub mod error;
pub mod handshake;
pub mod message;
pub mod prefix;
pub mod response;
pub mod router;

pub use self::buffer::{Buffer, BufferStore, LogEntry, NOTICE_LABEL, SERVER_BUFFER};
pub use self::casemap::{irc_eq, irc_to_lower};
pub use self::client::{Client, EventSink, Identity, POLL_INTERVAL};
pub use self::conn::{Connection, DEFAULT_PORT, IO_TIMEOUT};
pub use self::error::{EngineError, MessageParseError, Result};
pub use self::handshake::{
    ConnectionState, HandshakeMachine, RegistrationAction, RegistrationError,
};
pub use self::message::Message;
pub use self::prefix::Prefix;
pub use self::response::Response;
pub use self::router::{RoutedEvent, Router, RouterAction};
