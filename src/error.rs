//! Error types for the IRC engine.
//!
//! The taxonomy mirrors how the engine reacts: wire-level parse failures are
//! per-message and recoverable (the offending line is dropped and the poll
//! cycle continues), transport failures are fatal to the connection.

use thiserror::Error;

/// Convenience type alias for Results using [`EngineError`].
pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// Top-level engine errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// I/O error on the underlying socket. Fatal to the connection.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The peer closed the connection.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// UTF-8 decoding error on a received line.
    #[error("decode error: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// A received line could not be parsed as an IRC message.
    #[error("malformed message: {string}")]
    MalformedMessage {
        /// The raw line, retained for diagnostics.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },

    /// A received line uses a protocol feature this engine does not support.
    ///
    /// Currently this is only IRCv3 message tags, which fail closed rather
    /// than being silently stripped.
    #[error("unsupported feature ({feature}): {string}")]
    UnsupportedFeature {
        /// Name of the unsupported feature.
        feature: &'static str,
        /// The raw line that used it.
        string: String,
    },

    /// Registration did not reach the welcome numeric.
    #[error("registration failed: {0}")]
    RegistrationFailed(String),

    /// An operation that needs a live connection was called without one.
    #[error("not connected")]
    NotConnected,
}

/// Errors encountered when parsing IRC messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Message was empty after CR/LF stripping.
    #[error("empty message")]
    EmptyMessage,

    /// Command token was missing or empty.
    #[error("missing command")]
    MissingCommand,

    /// A prefix was present but nothing followed it.
    #[error("prefix without command")]
    PrefixOnly,

    /// The `nick!username@host` triple did not hold.
    ///
    /// Only surfaced by the strict parser; message decoding falls back to
    /// retaining the raw prefix string instead.
    #[error("invalid user prefix: {0}")]
    InvalidUserPrefix(String),
}
