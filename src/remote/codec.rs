//! Wire format of the bot API: update batches in, command menu out.
//!
//! ```json
//! {"ok":true,"result":[{"update_id":42,"message":{"text":"/medir"}}]}
//! ```
//!
//! Unknown fields are ignored.  Updates without a text message (stickers,
//! edits, channel posts) are kept so they still advance the cursor.

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

#[derive(Debug, Deserialize)]
struct UpdateBatch {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

/// One entry of a long-poll reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub text: Option<String>,
}

impl Update {
    /// Message text, if this update carries one.
    pub fn text(&self) -> Option<&str> {
        self.message.as_ref()?.text.as_deref()
    }
}

/// Parse a reply body.  Invalid JSON and `"ok": false` are both malformed.
pub fn decode_updates(body: &str) -> Result<Vec<Update>, TransportError> {
    let batch: UpdateBatch =
        serde_json::from_str(body).map_err(|_| TransportError::MalformedReply)?;
    if !batch.ok {
        return Err(TransportError::MalformedReply);
    }
    Ok(batch.result)
}

#[derive(Debug, Deserialize)]
struct Ack {
    ok: bool,
}

/// Check the `ok` flag of a reply to a write call (`sendMessage`,
/// `setMyCommands`).
pub fn decode_ack(body: &str) -> Result<(), TransportError> {
    let ack: Ack = serde_json::from_str(body).map_err(|_| TransportError::MalformedReply)?;
    if ack.ok { Ok(()) } else { Err(TransportError::MalformedReply) }
}

/// Highest identifier in the batch.
pub fn highest_update_id(updates: &[Update]) -> Option<i64> {
    updates.iter().map(|u| u.update_id).max()
}

// ── Command menu ──────────────────────────────────────────────

/// One entry of the bot's command menu.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BotCommand {
    pub command: &'static str,
    pub description: &'static str,
}

#[derive(Serialize)]
struct CommandMenu<'a> {
    commands: &'a [BotCommand],
}

/// `{"commands":[{"command":..,"description":..},..]}`
pub fn encode_command_menu(commands: &[BotCommand]) -> String {
    // Static strings only; serialization cannot fail.
    serde_json::to_string(&CommandMenu { commands }).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_text_and_non_text_updates() {
        let body = r#"{"ok":true,"result":[
            {"update_id":10,"message":{"message_id":1,"chat":{"id":5},"text":"/medir"}},
            {"update_id":11,"edited_message":{"text":"/help"}},
            {"update_id":12,"message":{"sticker":{}}}
        ]}"#;
        let updates = decode_updates(body).unwrap();
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].text(), Some("/medir"));
        assert_eq!(updates[1].text(), None);
        assert_eq!(updates[2].text(), None);
        assert_eq!(highest_update_id(&updates), Some(12));
    }

    #[test]
    fn empty_batch_has_no_highest_id() {
        let updates = decode_updates(r#"{"ok":true,"result":[]}"#).unwrap();
        assert!(updates.is_empty());
        assert_eq!(highest_update_id(&updates), None);
    }

    #[test]
    fn not_ok_is_malformed() {
        let body = r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#;
        assert_eq!(decode_updates(body), Err(TransportError::MalformedReply));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(decode_updates("<html>"), Err(TransportError::MalformedReply));
        assert_eq!(
            decode_updates(r#"{"ok":true,"result":[{"update_id":"x"}]}"#),
            Err(TransportError::MalformedReply)
        );
    }

    #[test]
    fn ack_follows_ok_flag() {
        assert_eq!(decode_ack(r#"{"ok":true,"result":{"message_id":3}}"#), Ok(()));
        assert_eq!(
            decode_ack(r#"{"ok":false,"description":"Bad Request: can't parse entities"}"#),
            Err(TransportError::MalformedReply)
        );
        assert_eq!(decode_ack(""), Err(TransportError::MalformedReply));
    }

    #[test]
    fn highest_id_ignores_order() {
        let body = r#"{"ok":true,"result":[{"update_id":7},{"update_id":9},{"update_id":8}]}"#;
        let updates = decode_updates(body).unwrap();
        assert_eq!(highest_update_id(&updates), Some(9));
    }

    #[test]
    fn command_menu_encodes() {
        let json = encode_command_menu(&[BotCommand {
            command: "medir",
            description: "Take a measurement now",
        }]);
        assert_eq!(
            json,
            r#"{"commands":[{"command":"medir","description":"Take a measurement now"}]}"#
        );
    }
}
