//! The client aggregate: one server connection, its identity, buffers, and
//! the poll-process cycle that drives everything.
//!
//! There is no ambient global state; everything the engine knows lives in a
//! [`Client`] value the caller owns. The concurrency model is a
//! single-threaded cooperative cycle: poll once, process what arrived,
//! yield. The only blocking points are `connect` and sends, both bounded by
//! the connection's I/O timeout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::buffer::{BufferStore, NOTICE_LABEL, SERVER_BUFFER};
use crate::conn::Connection;
use crate::error::{EngineError, Result};
use crate::handshake::{ConnectionState, HandshakeMachine, RegistrationAction};
use crate::message::Message;
use crate::router::{RoutedEvent, Router, RouterAction};

/// How long the cycle sleeps between polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long `connect` waits for the welcome numeric before giving up. A
/// silent server must not hang the caller.
const REGISTRATION_DEADLINE: Duration = Duration::from_secs(30);

/// Who we are on this server.
///
/// `nick` is mutable for the life of the session (self-rename, collision
/// recovery); `username` and `password` are fixed at construction.
#[derive(Clone, Debug)]
pub struct Identity {
    pub nick: String,
    pub username: String,
    pub password: Option<String>,
}

impl Identity {
    pub fn new(nick: &str, username: &str, password: Option<&str>) -> Identity {
        Identity {
            nick: nick.to_string(),
            username: username.to_string(),
            password: password.map(str::to_string),
        }
    }
}

/// Callback surface the UI layer subscribes to.
///
/// The engine has no inbound dependency on rendering; these are the only
/// paths anything user-visible leaves through.
pub trait EventSink {
    /// A routed notification for a buffer.
    fn routed_event(&mut self, event: &RoutedEvent);
    /// The connection lifecycle moved to a new state.
    fn state_change(&mut self, state: ConnectionState);
    /// The connection died: transport failure, fatal server ERROR, or
    /// failed registration.
    fn fatal_error(&mut self, reason: &str);
}

/// A single-server IRC client engine.
pub struct Client {
    identity: Identity,
    state: ConnectionState,
    conn: Option<Connection>,
    buffers: BufferStore,
    router: Router,
}

impl Client {
    /// Create a disconnected client for the given identity.
    pub fn new(identity: Identity) -> Client {
        Client {
            identity,
            state: ConnectionState::Disconnected,
            conn: None,
            buffers: BufferStore::new(),
            router: Router::new(),
        }
    }

    /// Current lifecycle state. Owned by the engine; callers only read it.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The session identity, including any collision-suffixed nick.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The per-conversation state the router maintains.
    pub fn buffers(&self) -> &BufferStore {
        &self.buffers
    }

    fn set_state(&mut self, state: ConnectionState, sink: &mut dyn EventSink) {
        if self.state != state {
            self.state = state;
            sink.state_change(state);
        }
    }

    fn fail(&mut self, reason: &str, sink: &mut dyn EventSink) {
        self.conn = None;
        self.set_state(ConnectionState::Failed, sink);
        sink.fatal_error(reason);
    }

    /// Connect to the server and drive the registration handshake until the
    /// session is usable.
    ///
    /// Returns once the state is [`ConnectionState::Registered`]; any other
    /// outcome (transport failure, fatal ERROR, exhausted nick retries, or
    /// a server that never sends the welcome numeric) is an error, also
    /// surfaced through the sink.
    pub fn connect(&mut self, host: &str, port: u16, sink: &mut dyn EventSink) -> Result<()> {
        // A live connection gets its best-effort QUIT before the replacement
        // is opened.
        if self.conn.is_some() {
            self.disconnect("Reconnecting");
        }
        self.set_state(ConnectionState::Connecting, sink);
        let mut conn = match Connection::open(host, port) {
            Ok(conn) => conn,
            Err(e) => {
                self.fail(&e.to_string(), sink);
                return Err(e);
            }
        };

        let mut machine = HandshakeMachine::new(
            &self.identity.nick,
            &self.identity.username,
            self.identity.password.as_deref(),
        );
        let opening = machine.start();
        self.set_state(ConnectionState::AwaitingWelcome, sink);
        if let Err(reason) = drive_handshake(&mut conn, &mut machine, opening, &mut self.buffers, sink)
        {
            self.fail(&reason, sink);
            return Err(EngineError::RegistrationFailed(reason));
        }

        // The server may have accepted a collision-suffixed nick.
        self.identity.nick = machine.nick().to_string();
        self.conn = Some(conn);
        self.set_state(ConnectionState::Registered, sink);
        Ok(())
    }

    /// Poll once and process everything that was immediately available.
    ///
    /// Per-message decode failures are logged and skipped; the rest of the
    /// batch still routes. Transport failures (and a fatal server ERROR)
    /// end the session: the state moves to [`ConnectionState::Failed`] and
    /// the reason reaches the sink through `fatal_error`. Never blocks.
    pub fn poll_once(&mut self, sink: &mut dyn EventSink) {
        let mut shutdown: Option<String> = None;

        if let Some(conn) = self.conn.as_mut() {
            'drain: loop {
                let msg = match conn.poll_message() {
                    Ok(Some(msg)) => msg,
                    Ok(None) => break,
                    Err(e @ (EngineError::Transport(_) | EngineError::ConnectionClosed)) => {
                        shutdown = Some(e.to_string());
                        break;
                    }
                    Err(e) => {
                        // One bad line never aborts the rest of the batch.
                        tracing::warn!(error = %e, "dropping undecodable line");
                        continue;
                    }
                };
                for action in self.router.route(&msg, &mut self.identity, &mut self.buffers) {
                    match action {
                        RouterAction::Send(reply) => {
                            if let Err(e) = conn.send(&reply) {
                                shutdown = Some(e.to_string());
                                break 'drain;
                            }
                        }
                        RouterAction::Emit(event) => sink.routed_event(&event),
                        RouterAction::Fatal(reason) => {
                            shutdown = Some(reason);
                            break 'drain;
                        }
                    }
                }
            }
        }

        if let Some(reason) = shutdown {
            self.fail(&reason, sink);
        }
    }

    /// The cooperative scheduler loop: poll, process, yield, until the
    /// cancel flag is set or the connection dies.
    ///
    /// On cancellation the connection is closed with a best-effort QUIT and
    /// no further polls are attempted.
    pub fn run(&mut self, sink: &mut dyn EventSink, cancel: &AtomicBool) {
        loop {
            if cancel.load(Ordering::Relaxed) {
                self.disconnect("Quitting");
                return;
            }
            self.poll_once(sink);
            if self.state != ConnectionState::Registered {
                return;
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Close the connection with a QUIT carrying `reason`.
    pub fn disconnect(&mut self, reason: &str) {
        if let Some(conn) = self.conn.take() {
            conn.close(reason);
        }
        self.state = ConnectionState::Disconnected;
    }

    fn send(&mut self, msg: &Message) -> Result<()> {
        match self.conn.as_mut() {
            Some(conn) => conn.send(msg),
            None => Err(EngineError::NotConnected),
        }
    }

    // The outbound command surface: thin encode+send wrappers. Buffers for
    // channels and query targets are created on first outbound reference.

    pub fn join(&mut self, channel: &str) -> Result<()> {
        self.buffers.ensure(channel);
        self.send(&Message::join(channel))
    }

    pub fn part(&mut self, channel: &str, reason: &str) -> Result<()> {
        self.send(&Message::part(channel, reason))
    }

    pub fn send_private_message(&mut self, target: &str, text: &str) -> Result<()> {
        self.buffers.ensure(target);
        self.send(&Message::privmsg(target, text))
    }

    pub fn send_notice(&mut self, target: &str, text: &str) -> Result<()> {
        self.send(&Message::notice(target, text))
    }

    pub fn set_topic(&mut self, channel: &str, topic: &str) -> Result<()> {
        self.send(&Message::topic(channel, topic))
    }

    pub fn query_topic(&mut self, channel: &str) -> Result<()> {
        self.send(&Message::query_topic(channel))
    }

    pub fn invite(&mut self, nick: &str, channel: &str) -> Result<()> {
        self.send(&Message::invite(nick, channel))
    }

    pub fn kick(&mut self, channel: &str, nick: &str, comment: &str) -> Result<()> {
        self.send(&Message::kick(channel, nick, comment))
    }

    pub fn request_names(&mut self, channel: &str) -> Result<()> {
        self.send(&Message::names(channel))
    }

    pub fn request_motd(&mut self) -> Result<()> {
        self.send(&Message::motd())
    }

    pub fn request_version(&mut self) -> Result<()> {
        self.send(&Message::version())
    }

    pub fn oper_login(&mut self, name: &str, password: &str) -> Result<()> {
        self.send(&Message::oper(name, password))
    }

    pub fn set_nick(&mut self, nick: &str) -> Result<()> {
        self.send(&Message::nick(nick))
    }
}

/// Pump the handshake machine against the connection until it settles.
///
/// Returns the failure reason on any terminal outcome other than
/// registration.
fn drive_handshake(
    conn: &mut Connection,
    machine: &mut HandshakeMachine,
    opening: Vec<RegistrationAction>,
    buffers: &mut BufferStore,
    sink: &mut dyn EventSink,
) -> std::result::Result<(), String> {
    let deadline = Instant::now() + REGISTRATION_DEADLINE;

    let mut pending = opening;
    loop {
        for action in pending.drain(..) {
            match action {
                RegistrationAction::Send(msg) => {
                    conn.send(&msg).map_err(|e| e.to_string())?;
                }
                RegistrationAction::Info(text) => {
                    // Pre-welcome traffic still lands in the server buffer.
                    buffers.append(SERVER_BUFFER, NOTICE_LABEL, &text);
                    sink.routed_event(&RoutedEvent {
                        buffer: SERVER_BUFFER.to_string(),
                        from: NOTICE_LABEL.to_string(),
                        text,
                    });
                }
                RegistrationAction::Complete => return Ok(()),
                RegistrationAction::Fail(err) => return Err(err.to_string()),
            }
        }

        match conn.poll_message() {
            Ok(Some(msg)) => pending = machine.feed(&msg),
            Ok(None) => {
                if Instant::now() >= deadline {
                    return Err("no welcome from server".to_string());
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e @ (EngineError::Transport(_) | EngineError::ConnectionClosed)) => {
                return Err(e.to_string());
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping undecodable line during handshake");
            }
        }
    }
}
