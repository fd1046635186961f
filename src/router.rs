//! Dispatch router: classifies incoming messages, updates the buffer store,
//! and produces routed notifications for the UI.
//!
//! Routing is a closed match over known verbs and numerics with an explicit
//! default arm, so adding a [`Response`] variant forces a handler decision
//! here. Handlers are synchronous and never perform I/O themselves;
//! follow-up protocol traffic (NAMES refresh, PONG) comes back to the caller
//! as [`RouterAction::Send`] values.

use std::collections::HashMap;

use chrono::{Local, TimeZone};

use crate::buffer::{BufferStore, NOTICE_LABEL, SERVER_BUFFER};
use crate::casemap::irc_eq;
use crate::client::Identity;
use crate::message::{after_target, info_text, trailing, Message};
use crate::prefix::Prefix;
use crate::response::Response;

/// The normalized notification the engine emits for UI consumption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutedEvent {
    /// Name of the buffer the event belongs to. Guaranteed to exist in the
    /// store at the moment of emission.
    pub buffer: String,
    /// Sender label.
    pub from: String,
    /// Event text.
    pub text: String,
}

/// Actions produced by routing one message.
#[derive(Clone, Debug)]
pub enum RouterAction {
    /// Follow-up protocol traffic for the caller to send.
    Send(Box<Message>),
    /// A user-visible notification.
    Emit(RoutedEvent),
    /// The server declared the connection dead (fatal ERROR).
    Fatal(String),
}

/// Dispatch key: a known verb, a known numeric, or neither.
enum Key {
    Verb(Verb),
    Reply(Response),
    Unknown,
}

enum Verb {
    Privmsg,
    Notice,
    Join,
    Part,
    Quit,
    Nick,
    Topic,
    Ping,
    Error,
}

fn dispatch_key(command: &str) -> Key {
    match command {
        "PRIVMSG" => Key::Verb(Verb::Privmsg),
        "NOTICE" => Key::Verb(Verb::Notice),
        "JOIN" => Key::Verb(Verb::Join),
        "PART" => Key::Verb(Verb::Part),
        "QUIT" => Key::Verb(Verb::Quit),
        "NICK" => Key::Verb(Verb::Nick),
        "TOPIC" => Key::Verb(Verb::Topic),
        "PING" => Key::Verb(Verb::Ping),
        "ERROR" => Key::Verb(Verb::Error),
        other => match other.parse::<Response>() {
            Ok(reply) => Key::Reply(reply),
            Err(_) => Key::Unknown,
        },
    }
}

/// Maps a message's command or numeric reply code to its handler.
///
/// Holds the in-flight NAMES accumulation between a 353 burst and its
/// committing 366.
#[derive(Debug, Default)]
pub struct Router {
    pending_names: HashMap<String, Vec<String>>,
}

impl Router {
    pub fn new() -> Router {
        Router::default()
    }

    /// Route one incoming message.
    ///
    /// Updates `buffers` (and `identity`, on a self-rename) and returns the
    /// resulting actions. Every emitted event's buffer has been created in
    /// the store before the event is returned.
    pub fn route(
        &mut self,
        msg: &Message,
        identity: &mut Identity,
        buffers: &mut BufferStore,
    ) -> Vec<RouterAction> {
        match dispatch_key(&msg.command) {
            Key::Verb(Verb::Privmsg) | Key::Verb(Verb::Notice) => {
                self.handle_chat(msg, identity, buffers)
            }
            Key::Verb(Verb::Join) => self.handle_join(msg, buffers),
            Key::Verb(Verb::Part) => self.handle_part(msg, buffers),
            Key::Verb(Verb::Quit) => self.handle_quit(msg, buffers),
            Key::Verb(Verb::Nick) => self.handle_nick(msg, identity, buffers),
            Key::Verb(Verb::Topic) => self.handle_topic(msg, buffers),
            Key::Verb(Verb::Ping) => {
                // Answered immediately, never user-visible.
                vec![RouterAction::Send(Box::new(Message::pong(trailing(
                    &msg.params,
                ))))]
            }
            Key::Verb(Verb::Error) => {
                let reason = trailing(&msg.params).to_string();
                vec![
                    emit(
                        buffers,
                        SERVER_BUFFER,
                        NOTICE_LABEL,
                        &format!("ERROR: {}", reason),
                    ),
                    RouterAction::Fatal(reason),
                ]
            }
            Key::Reply(reply) => self.handle_reply(reply, msg, buffers),
            Key::Unknown => {
                // Fall through to a diagnostic so no protocol traffic is
                // silently dropped.
                tracing::debug!(command = %msg.command, "unhandled command");
                vec![emit(buffers, SERVER_BUFFER, &msg.command, &msg.params)]
            }
        }
    }

    /// PRIVMSG/NOTICE. Messages addressed to our own nick are a private
    /// message: they route to a buffer named after the sender, not after
    /// ourselves.
    fn handle_chat(
        &mut self,
        msg: &Message,
        identity: &Identity,
        buffers: &mut BufferStore,
    ) -> Vec<RouterAction> {
        let (target, text) = msg.params.split_once(' ').unwrap_or((&msg.params[..], ""));
        let text = trailing(text);
        let from = sender_label(msg).to_string();
        let buffer: &str = if irc_eq(target, &identity.nick) {
            from.as_str()
        } else {
            target
        };
        vec![emit(buffers, buffer, &from, text)]
    }

    fn handle_join(&mut self, msg: &Message, buffers: &mut BufferStore) -> Vec<RouterAction> {
        let channel = trailing(first_token(&msg.params));
        let nick = sender_label(msg);
        vec![
            RouterAction::Send(Box::new(Message::names(channel))),
            emit(
                buffers,
                channel,
                NOTICE_LABEL,
                &format!("{} joined {}", nick, channel),
            ),
        ]
    }

    fn handle_part(&mut self, msg: &Message, buffers: &mut BufferStore) -> Vec<RouterAction> {
        let (channel, reason) = msg.params.split_once(' ').unwrap_or((&msg.params[..], ""));
        let channel = trailing(channel);
        let reason = trailing(reason);
        let nick = sender_label(msg);
        let text = if reason.is_empty() {
            format!("{} left {}", nick, channel)
        } else {
            format!("{} left {} ({})", nick, channel, reason)
        };
        vec![
            RouterAction::Send(Box::new(Message::names(channel))),
            emit(buffers, channel, NOTICE_LABEL, &text),
        ]
    }

    fn handle_quit(&mut self, msg: &Message, buffers: &mut BufferStore) -> Vec<RouterAction> {
        let nick = sender_label(msg).to_string();
        let reason = trailing(&msg.params);
        buffers.remove_participant(&nick);
        let text = if reason.is_empty() {
            format!("{} quit", nick)
        } else {
            format!("{} quit ({})", nick, reason)
        };
        vec![emit(buffers, SERVER_BUFFER, NOTICE_LABEL, &text)]
    }

    fn handle_nick(
        &mut self,
        msg: &Message,
        identity: &mut Identity,
        buffers: &mut BufferStore,
    ) -> Vec<RouterAction> {
        let new = trailing(&msg.params).to_string();
        let old = sender_label(msg).to_string();
        if irc_eq(&old, &identity.nick) {
            identity.nick = new.clone();
            buffers.rename_participant(&old, &new);
            vec![emit(
                buffers,
                SERVER_BUFFER,
                NOTICE_LABEL,
                &format!("You are now known as {}", new),
            )]
        } else {
            vec![emit(
                buffers,
                SERVER_BUFFER,
                NOTICE_LABEL,
                &format!("{} is now known as {}", old, new),
            )]
        }
    }

    fn handle_topic(&mut self, msg: &Message, buffers: &mut BufferStore) -> Vec<RouterAction> {
        let (channel, topic) = msg.params.split_once(' ').unwrap_or((&msg.params[..], ""));
        let topic = trailing(topic);
        let nick = sender_label(msg);
        buffers.set_topic(channel, topic);
        vec![emit(
            buffers,
            channel,
            NOTICE_LABEL,
            &format!("{} changed the topic to: {}", nick, topic),
        )]
    }

    fn handle_reply(
        &mut self,
        reply: Response,
        msg: &Message,
        buffers: &mut BufferStore,
    ) -> Vec<RouterAction> {
        let rest = after_target(&msg.params);
        match reply {
            // Welcome family, server stats, and MOTD lines all land in the
            // server buffer as informational traffic.
            Response::RPL_WELCOME
            | Response::RPL_YOURHOST
            | Response::RPL_CREATED
            | Response::RPL_MYINFO
            | Response::RPL_ISUPPORT
            | Response::RPL_BOUNCE
            | Response::RPL_LUSERCLIENT
            | Response::RPL_LUSEROP
            | Response::RPL_LUSERUNKNOWN
            | Response::RPL_LUSERCHANNELS
            | Response::RPL_LUSERME
            | Response::RPL_LOCALUSERS
            | Response::RPL_GLOBALUSERS
            | Response::RPL_MOTD
            | Response::RPL_MOTDSTART
            | Response::RPL_ENDOFMOTD => {
                vec![emit(buffers, SERVER_BUFFER, NOTICE_LABEL, &info_text(rest))]
            }

            Response::RPL_NOTOPIC => {
                let channel = first_token(rest);
                if channel.is_empty() {
                    return truncated_reply(msg, buffers);
                }
                buffers.set_topic(channel, "");
                vec![]
            }
            Response::RPL_TOPIC => {
                let (channel, topic) = rest.split_once(' ').unwrap_or((rest, ""));
                if channel.is_empty() {
                    return truncated_reply(msg, buffers);
                }
                let topic = trailing(topic);
                buffers.set_topic(channel, topic);
                vec![emit(
                    buffers,
                    channel,
                    NOTICE_LABEL,
                    &format!("Topic: {}", topic),
                )]
            }
            Response::RPL_TOPICWHOTIME => {
                let mut fields = rest.splitn(3, ' ');
                let channel = fields.next().unwrap_or("");
                if channel.is_empty() {
                    return truncated_reply(msg, buffers);
                }
                let setter = fields.next().unwrap_or("");
                let stamp = trailing(fields.next().unwrap_or(""));
                let when = stamp
                    .parse::<i64>()
                    .ok()
                    .and_then(|secs| Local.timestamp_opt(secs, 0).single())
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| stamp.to_string());
                vec![emit(
                    buffers,
                    channel,
                    NOTICE_LABEL,
                    &format!("Topic set by {} on {}", setter, when),
                )]
            }

            Response::RPL_NAMREPLY => {
                // `<symbol> <channel> :name name ...` — accumulate until the
                // committing 366. Yields no event.
                let mut fields = rest.splitn(3, ' ');
                let _symbol = fields.next();
                let channel = fields.next().unwrap_or("");
                if channel.is_empty() {
                    return truncated_reply(msg, buffers);
                }
                let names = trailing(fields.next().unwrap_or(""));
                self.pending_names
                    .entry(channel.to_string())
                    .or_default()
                    .extend(names.split_whitespace().map(str::to_string));
                vec![]
            }
            Response::RPL_ENDOFNAMES => {
                let (channel, tail) = rest.split_once(' ').unwrap_or((rest, ""));
                if channel.is_empty() {
                    return truncated_reply(msg, buffers);
                }
                let names = self.pending_names.remove(channel).unwrap_or_default();
                buffers.set_participants(channel, names.iter().map(String::as_str));
                vec![emit(buffers, SERVER_BUFFER, NOTICE_LABEL, trailing(tail))]
            }

            Response::ERR_NOSUCHNICK
            | Response::ERR_NOSUCHSERVER
            | Response::ERR_NOSUCHCHANNEL
            | Response::ERR_NORECIPIENT
            | Response::ERR_UNKNOWNCOMMAND
            | Response::ERR_NICKNAMEINUSE
            | Response::ERR_NOTONCHANNEL
            | Response::ERR_USERONCHANNEL
            | Response::ERR_NEEDMOREPARAMS
            | Response::ERR_PASSWDMISMATCH
            | Response::ERR_KEYSET
            | Response::ERR_CHANNELISFULL
            | Response::ERR_UNKNOWNMODE
            | Response::ERR_INVITEONLYCHAN
            | Response::ERR_CHANOPRIVSNEEDED => {
                // Diagnostics only; no buffer state changes. Collisions
                // during registration are the handshake machine's concern.
                let text = format!("{}: {}", error_description(reply), info_text(rest));
                vec![emit(buffers, SERVER_BUFFER, NOTICE_LABEL, &text)]
            }
        }
    }
}

/// One description per error numeric.
fn error_description(reply: Response) -> &'static str {
    match reply {
        Response::ERR_NOSUCHNICK => "No such nick",
        Response::ERR_NOSUCHSERVER => "No such server",
        Response::ERR_NOSUCHCHANNEL => "No such channel",
        Response::ERR_NORECIPIENT => "No recipient given",
        Response::ERR_UNKNOWNCOMMAND => "Unknown command",
        Response::ERR_NICKNAMEINUSE => "Nickname is already in use",
        Response::ERR_NOTONCHANNEL => "You're not on that channel",
        Response::ERR_USERONCHANNEL => "User is already on channel",
        Response::ERR_NEEDMOREPARAMS => "Not enough parameters",
        Response::ERR_PASSWDMISMATCH => "Password incorrect",
        Response::ERR_KEYSET => "Channel key already set",
        Response::ERR_CHANNELISFULL => "Channel is full",
        Response::ERR_UNKNOWNMODE => "Unknown mode character",
        Response::ERR_INVITEONLYCHAN => "Invite-only channel",
        Response::ERR_CHANOPRIVSNEEDED => "Channel operator privileges needed",
        _ => "Server error",
    }
}

/// A known numeric missing its channel field: surface it as a server-buffer
/// diagnostic rather than keying buffer state on an empty name.
fn truncated_reply(msg: &Message, buffers: &mut BufferStore) -> Vec<RouterAction> {
    vec![emit(buffers, SERVER_BUFFER, &msg.command, &msg.params)]
}

fn sender_label(msg: &Message) -> &str {
    msg.prefix.as_ref().map_or("server", Prefix::label)
}

fn first_token(params: &str) -> &str {
    params.split(' ').next().unwrap_or(params)
}

/// Append to the buffer (creating it on first reference) and build the
/// matching event, keeping the store and the emission in lockstep.
fn emit(buffers: &mut BufferStore, buffer: &str, from: &str, text: &str) -> RouterAction {
    buffers.append(buffer, from, text);
    RouterAction::Emit(RoutedEvent {
        buffer: buffer.to_string(),
        from: from.to_string(),
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            nick: "bob".to_string(),
            username: "bob".to_string(),
            password: None,
        }
    }

    fn route_one(
        raw: &str,
        identity: &mut Identity,
        buffers: &mut BufferStore,
        router: &mut Router,
    ) -> Vec<RouterAction> {
        router.route(&Message::parse(raw).unwrap(), identity, buffers)
    }

    fn events(actions: &[RouterAction]) -> Vec<&RoutedEvent> {
        actions
            .iter()
            .filter_map(|a| match a {
                RouterAction::Emit(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    fn sends(actions: &[RouterAction]) -> Vec<&Message> {
        actions
            .iter()
            .filter_map(|a| match a {
                RouterAction::Send(msg) => Some(msg.as_ref()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_privmsg_to_channel() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        let actions = route_one(
            ":alice!a@h PRIVMSG #room :hello\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        let events = events(&actions);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].buffer, "#room");
        assert_eq!(events[0].from, "alice");
        assert_eq!(events[0].text, "hello");
        // The target buffer exists and holds the line.
        assert_eq!(buffers.get("#room").unwrap().log().len(), 1);
    }

    #[test]
    fn test_privmsg_to_self_routes_to_sender_buffer() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        let actions = route_one(
            ":alice!a@h PRIVMSG bob :hi\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        let events = events(&actions);
        assert_eq!(events[0].buffer, "alice");
        assert_eq!(events[0].from, "alice");
        assert_eq!(events[0].text, "hi");
        assert!(buffers.get("alice").is_some());
        assert!(buffers.get("bob").is_none());
    }

    #[test]
    fn test_join_triggers_names_query() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        let actions = route_one(
            ":carol!c@h JOIN :#room\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        let sends = sends(&actions);
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].command, "NAMES");
        assert_eq!(sends[0].params, "#room");
        let events = events(&actions);
        assert_eq!(events[0].buffer, "#room");
        assert!(events[0].text.contains("carol joined"));
    }

    #[test]
    fn test_part_with_reason() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        let actions = route_one(
            ":carol!c@h PART #room :off to lunch\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        assert_eq!(sends(&actions)[0].command, "NAMES");
        let events = events(&actions);
        assert_eq!(events[0].buffer, "#room");
        assert_eq!(events[0].text, "carol left #room (off to lunch)");
    }

    #[test]
    fn test_quit_removes_participant_everywhere() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        buffers.set_participants("#a", ["carol", "bob"]);
        buffers.set_participants("#b", ["carol"]);
        let actions = route_one(
            ":carol!c@h QUIT :bye\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        assert!(!buffers.get("#a").unwrap().has_participant("carol"));
        assert!(!buffers.get("#b").unwrap().has_participant("carol"));
        let events = events(&actions);
        assert_eq!(events[0].buffer, SERVER_BUFFER);
        assert_eq!(events[0].text, "carol quit (bye)");
    }

    #[test]
    fn test_nick_self_rename_updates_identity() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        buffers.set_participants("#room", ["bob", "alice"]);
        let actions = route_one(
            ":bob!b@h NICK :bob2\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        assert_eq!(id.nick, "bob2");
        assert!(buffers.get("#room").unwrap().has_participant("bob2"));
        assert!(!buffers.get("#room").unwrap().has_participant("bob"));
        assert!(events(&actions)[0].text.contains("now known as bob2"));
    }

    #[test]
    fn test_nick_other_rename_notifies_only() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        buffers.set_participants("#room", ["alice"]);
        let actions = route_one(
            ":alice!a@h NICK :alicia\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        assert_eq!(id.nick, "bob");
        assert!(buffers.get("#room").unwrap().has_participant("alice"));
        assert_eq!(events(&actions)[0].text, "alice is now known as alicia");
    }

    #[test]
    fn test_ping_pong_no_event() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        let actions = route_one("PING :abc\r\n", &mut id, &mut buffers, &mut router);
        assert!(events(&actions).is_empty());
        let sends = sends(&actions);
        assert_eq!(sends[0].command, "PONG");
        assert_eq!(sends[0].params, ":abc");
    }

    #[test]
    fn test_names_accumulate_and_commit() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        let actions = route_one(
            ":server 353 bob = #room :alice bob\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        assert!(actions.is_empty());

        let actions = route_one(
            ":server 366 bob #room :End of NAMES\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        let events = events(&actions);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].buffer, SERVER_BUFFER);
        let buffer = buffers.get("#room").unwrap();
        assert_eq!(buffer.participant_count(), 2);
        assert!(buffer.has_participant("alice"));
        assert!(buffer.has_participant("bob"));
    }

    #[test]
    fn test_names_chunks_merge() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        route_one(
            ":server 353 bob = #room :alice\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        route_one(
            ":server 353 bob = #room :carol dave\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        route_one(
            ":server 366 bob #room :End of NAMES\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        assert_eq!(buffers.get("#room").unwrap().participant_count(), 3);
    }

    #[test]
    fn test_topic_numerics() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        route_one(
            ":server 332 bob #room :stay hydrated\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        assert_eq!(buffers.get("#room").unwrap().topic(), "stay hydrated");

        // 331 clears the topic without emitting.
        let actions = route_one(
            ":server 331 bob #room :No topic is set\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        assert!(actions.is_empty());
        assert_eq!(buffers.get("#room").unwrap().topic(), "");
    }

    #[test]
    fn test_topic_who_time_renders_timestamp() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        let actions = route_one(
            ":server 333 bob #room alice 1690000000\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        let events = events(&actions);
        assert_eq!(events[0].buffer, "#room");
        assert!(events[0].text.starts_with("Topic set by alice on 20"));
    }

    #[test]
    fn test_topic_command_sets_topic() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        let actions = route_one(
            ":alice!a@h TOPIC #room :fresh topic\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        assert_eq!(buffers.get("#room").unwrap().topic(), "fresh topic");
        assert_eq!(
            events(&actions)[0].text,
            "alice changed the topic to: fresh topic"
        );
    }

    #[test]
    fn test_error_numeric_diagnostic() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        let actions = route_one(
            ":server 403 bob #nope :No such channel\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        let events = events(&actions);
        assert_eq!(events[0].buffer, SERVER_BUFFER);
        assert!(events[0].text.starts_with("No such channel:"));
        // Error numerics never create or mutate conversation buffers.
        assert!(buffers.get("#nope").is_none());
    }

    #[test]
    fn test_truncated_topic_numerics_do_not_create_unnamed_buffer() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        for raw in [
            ":s 331 bob\r\n",
            ":s 332 bob\r\n",
            ":s 333 bob\r\n",
            ":s 353 bob\r\n",
            ":s 366 bob\r\n",
        ] {
            let actions = route_one(raw, &mut id, &mut buffers, &mut router);
            let events = events(&actions);
            assert_eq!(events.len(), 1, "no diagnostic for {:?}", raw);
            assert_eq!(events[0].buffer, SERVER_BUFFER);
        }
        assert!(buffers.get("").is_none());
        // Only the seeded server buffer exists.
        assert_eq!(buffers.names().count(), 1);
    }

    #[test]
    fn test_unknown_command_default_diagnostic() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        let actions = route_one("FOO bar baz\r\n", &mut id, &mut buffers, &mut router);
        let events = events(&actions);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].buffer, SERVER_BUFFER);
        assert_eq!(events[0].from, "FOO");
        assert_eq!(events[0].text, "bar baz");
    }

    #[test]
    fn test_fatal_error_command() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        let actions = route_one(
            "ERROR :Closing Link\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        assert!(actions
            .iter()
            .any(|a| matches!(a, RouterAction::Fatal(reason) if reason == "Closing Link")));
        assert!(events(&actions)[0].text.contains("Closing Link"));
    }

    #[test]
    fn test_luser_info_keeps_counts() {
        let (mut id, mut buffers, mut router) =
            (identity(), BufferStore::new(), Router::new());
        let actions = route_one(
            ":server 254 bob 42 :channels formed\r\n",
            &mut id,
            &mut buffers,
            &mut router,
        );
        assert_eq!(events(&actions)[0].text, "42 channels formed");
    }
}
