//! Long-poll command engine.
//!
//! Owns the update cursor and turns one poll into a [`CommandBatch`].  It
//! does not touch the application state: the caller hands each command to
//! [`AppService::handle_command`](crate::app::service::AppService::handle_command),
//! which replies exactly once per action.
//!
//! Each poll runs a fixed pipeline:
//!
//! 1. **Fetch**: one request with `offset = last_seen_id + 1`.
//! 2. **Decode**: invalid JSON or `ok: false` aborts the pass.
//! 3. **Advance**: the cursor moves to the highest `update_id` in the batch
//!    and never moves back.
//! 4. **Select**: per-category command rules over the message texts.
//!
//! A failed fetch or decode leaves the cursor untouched, so the same
//! updates are requested again on the next pass.

use log::{debug, info, warn};

use crate::error::TransportError;

use super::codec::{decode_updates, encode_command_menu, highest_update_id};
use super::commands::{BOT_COMMANDS, CommandBatch, select};
use super::transport::UpdateTransport;

/// Stateful consumer of the chat update stream.
#[derive(Debug, Default)]
pub struct RemoteCommandProcessor {
    last_seen_id: i64,
}

impl RemoteCommandProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest update identifier consumed so far (0 before the first).
    pub fn last_seen_id(&self) -> i64 {
        self.last_seen_id
    }

    /// Publish the command menu.  Failure is logged and otherwise ignored.
    pub fn register(&self, transport: &mut impl UpdateTransport) {
        let body = encode_command_menu(&BOT_COMMANDS);
        match transport.register_commands(&body) {
            Ok(()) => info!("Remote: command menu registered ({} entries)", BOT_COMMANDS.len()),
            Err(e) => warn!("Remote: command menu registration failed: {e}"),
        }
    }

    /// Run one poll.  On error the pass is aborted and the cursor is
    /// unchanged.
    pub fn poll(&mut self, transport: &mut impl UpdateTransport) -> Result<CommandBatch, TransportError> {
        let body = transport.fetch_updates(self.last_seen_id + 1)?;
        let updates = decode_updates(&body)?;

        if let Some(highest) = highest_update_id(&updates) {
            self.last_seen_id = self.last_seen_id.max(highest);
        }

        let batch = select(updates.iter().filter_map(|u| u.text()));
        if !updates.is_empty() {
            debug!(
                "Remote: {} updates, {} commands, cursor={}",
                updates.len(),
                batch.len(),
                self.last_seen_id
            );
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::commands::AppCommand;

    struct Scripted {
        replies: Vec<Result<String, TransportError>>,
        offsets: Vec<i64>,
        menus: Vec<String>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<&str, TransportError>>) -> Self {
            Self {
                replies: replies.into_iter().rev().map(|r| r.map(String::from)).collect(),
                offsets: Vec::new(),
                menus: Vec::new(),
            }
        }
    }

    impl UpdateTransport for Scripted {
        fn fetch_updates(&mut self, offset: i64) -> Result<String, TransportError> {
            self.offsets.push(offset);
            self.replies.pop().unwrap_or(Ok(r#"{"ok":true,"result":[]}"#.into()))
        }

        fn register_commands(&mut self, body: &str) -> Result<(), TransportError> {
            self.menus.push(body.into());
            Ok(())
        }
    }

    #[test]
    fn cursor_advances_to_highest_id() {
        let mut t = Scripted::new(vec![
            Ok(r#"{"ok":true,"result":[{"update_id":5,"message":{"text":"/medir"}},{"update_id":7}]}"#),
            Ok(r#"{"ok":true,"result":[]}"#),
        ]);
        let mut engine = RemoteCommandProcessor::new();

        let batch = engine.poll(&mut t).unwrap();
        assert_eq!(batch.as_slice(), &[AppCommand::MeasureNow]);
        assert_eq!(engine.last_seen_id(), 7);

        engine.poll(&mut t).unwrap();
        assert_eq!(t.offsets, [1, 8]);
        assert_eq!(engine.last_seen_id(), 7);
    }

    #[test]
    fn cursor_never_moves_back() {
        let mut t = Scripted::new(vec![
            Ok(r#"{"ok":true,"result":[{"update_id":20}]}"#),
            Ok(r#"{"ok":true,"result":[{"update_id":3}]}"#),
        ]);
        let mut engine = RemoteCommandProcessor::new();
        engine.poll(&mut t).unwrap();
        engine.poll(&mut t).unwrap();
        assert_eq!(engine.last_seen_id(), 20);
    }

    #[test]
    fn failures_leave_cursor_unchanged() {
        let mut t = Scripted::new(vec![
            Ok(r#"{"ok":true,"result":[{"update_id":4}]}"#),
            Err(TransportError::Timeout),
            Ok("not json"),
            Ok(r#"{"ok":false}"#),
        ]);
        let mut engine = RemoteCommandProcessor::new();
        engine.poll(&mut t).unwrap();
        assert_eq!(engine.poll(&mut t), Err(TransportError::Timeout));
        assert_eq!(engine.poll(&mut t), Err(TransportError::MalformedReply));
        assert_eq!(engine.poll(&mut t), Err(TransportError::MalformedReply));
        assert_eq!(engine.last_seen_id(), 4);
        assert_eq!(t.offsets, [1, 5, 5, 5]);
    }

    #[test]
    fn register_publishes_menu() {
        let mut t = Scripted::new(Vec::new());
        RemoteCommandProcessor::new().register(&mut t);
        assert_eq!(t.menus.len(), 1);
        assert!(t.menus[0].contains(r#""command":"alertaumidade""#));
    }
}
