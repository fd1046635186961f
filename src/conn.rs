//! The server connection: a TCP stream with blocking sends and
//! non-blocking, best-effort receives of complete messages.
//!
//! Receiving is framed byte-at-a-time: a readiness probe either yields the
//! first byte of a line or nothing, and once a line has started the rest is
//! read to the terminating `\n` under the I/O timeout. One call yields at
//! most one message even when more are buffered; [`Connection::poll_all`]
//! drains what is immediately available.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use crate::error::{EngineError, Result};
use crate::message::Message;

/// Default IRC plaintext port.
pub const DEFAULT_PORT: u16 = 6667;

/// Timeout applied to all blocking socket operations. A blocked read or
/// write fails rather than hanging the poll cycle.
pub const IO_TIMEOUT: Duration = Duration::from_secs(10);

/// An open connection to the IRC server.
///
/// The socket is released when the value drops, whichever path it leaves
/// scope by.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
}

impl Connection {
    /// Establish a TCP connection and apply the I/O timeout.
    pub fn open(host: &str, port: u16) -> Result<Connection> {
        let stream = TcpStream::connect((host, port))?;
        stream.set_read_timeout(Some(IO_TIMEOUT))?;
        stream.set_write_timeout(Some(IO_TIMEOUT))?;
        Ok(Connection { stream })
    }

    /// Encode and synchronously write one message.
    pub fn send(&mut self, msg: &Message) -> Result<()> {
        tracing::debug!(%msg, "send");
        self.stream.write_all(msg.to_wire().as_bytes())?;
        Ok(())
    }

    /// Receive at most one complete message without blocking.
    ///
    /// Returns `Ok(None)` immediately when the socket has no data ready.
    /// When a line has started arriving, reads to the terminating `\n`
    /// (bounded by [`IO_TIMEOUT`]) and decodes it. Decode failures surface
    /// per-message; the connection remains usable for the next call.
    pub fn poll_message(&mut self) -> Result<Option<Message>> {
        let mut byte = [0u8; 1];

        // Readiness probe: momentarily non-blocking for the first byte.
        self.stream.set_nonblocking(true)?;
        let probe = self.stream.read(&mut byte);
        self.stream.set_nonblocking(false)?;
        match probe {
            Ok(0) => return Err(EngineError::ConnectionClosed),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let mut line = vec![byte[0]];
        while line.last() != Some(&b'\n') {
            match self.stream.read(&mut byte)? {
                0 => return Err(EngineError::ConnectionClosed),
                _ => line.push(byte[0]),
            }
        }

        let text = String::from_utf8(line)?;
        Message::parse(&text).map(Some)
    }

    /// Lazily drain every message the socket has immediately available.
    ///
    /// The iterator ends as soon as a poll finds no ready data; it never
    /// waits for more. Per-message decode errors are yielded and iteration
    /// continues; transport errors end it.
    pub fn poll_all(&mut self) -> PollAll<'_> {
        PollAll {
            conn: self,
            done: false,
        }
    }

    /// Send a best-effort QUIT and shut the socket down in both directions.
    pub fn close(mut self, reason: &str) {
        let _ = self.send(&Message::quit(reason));
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            tracing::debug!(error = %e, "shutdown after QUIT failed");
        }
    }
}

/// Iterator over the messages currently buffered on the socket.
/// See [`Connection::poll_all`].
#[derive(Debug)]
pub struct PollAll<'a> {
    conn: &'a mut Connection,
    done: bool,
}

impl Iterator for PollAll<'_> {
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.conn.poll_message() {
            Ok(Some(msg)) => Some(Ok(msg)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                if matches!(
                    e,
                    EngineError::Transport(_) | EngineError::ConnectionClosed
                ) {
                    self.done = true;
                }
                Some(Err(e))
            }
        }
    }
}
