//! Telegram Bot API adapter.
//!
//! Implements [`Notifier`] (`sendMessage`) and [`UpdateTransport`]
//! (`getUpdates`, `setMyCommands`) over an [`HttpClient`].  Message text is
//! escaped for its parse mode and then made safe for the query string;
//! the reply's `ok` flag decides success.
//!
//! `getUpdates` is a long poll: the server holds the request for up to
//! `timeout` seconds when nothing is pending, and returns at most
//! [`UPDATE_BATCH_LIMIT`] chat messages per call so a backlog never
//! overflows the reply buffer.

use log::debug;

use crate::app::ports::Notifier;
use crate::error::TransportError;
use crate::escape::{self, EscapingMode};
use crate::remote::codec::decode_ack;
use crate::remote::transport::UpdateTransport;

use super::http::{HttpClient, require_success};

pub const API_BASE: &str = "https://api.telegram.org";

/// Updates requested per `getUpdates` call.  Ten message updates stay well
/// inside [`MAX_REPLY_BYTES`](super::http::MAX_REPLY_BYTES).
pub const UPDATE_BATCH_LIMIT: u8 = 10;

/// `allowed_updates=["message"]`, query-encoded.
const MESSAGE_UPDATES_ONLY: &str = "%5B%22message%22%5D";

/// `sendMessage` request URL for `text` in `mode`.
pub fn send_message_url(token: &str, chat_id: &str, text: &str, mode: EscapingMode) -> String {
    let escaped = escape::apply(text, mode);
    let mut url = format!(
        "{API_BASE}/bot{token}/sendMessage?chat_id={chat_id}&text={}",
        escape::encode_request_text(&escaped, mode)
    );
    if let Some(parse_mode) = mode.parse_mode() {
        url.push_str("&parse_mode=");
        url.push_str(parse_mode);
    }
    url
}

/// `getUpdates` request URL; `long_poll_s` of 0 makes it a short poll.
pub fn get_updates_url(token: &str, offset: i64, long_poll_s: u32) -> String {
    format!(
        "{API_BASE}/bot{token}/getUpdates?offset={offset}&limit={UPDATE_BATCH_LIMIT}\
         &timeout={long_poll_s}&allowed_updates={MESSAGE_UPDATES_ONLY}"
    )
}

pub fn set_commands_url(token: &str) -> String {
    format!("{API_BASE}/bot{token}/setMyCommands")
}

/// One bot bound to one chat.
pub struct TelegramBot<C: HttpClient> {
    http: C,
    token: &'static str,
    chat_id: &'static str,
    long_poll_s: u32,
}

impl<C: HttpClient> TelegramBot<C> {
    /// A short-polling bot; see [`with_long_poll`](Self::with_long_poll).
    pub fn new(http: C, token: &'static str, chat_id: &'static str) -> Self {
        Self {
            http,
            token,
            chat_id,
            long_poll_s: 0,
        }
    }

    /// Hold each `getUpdates` for up to `secs` when nothing is pending.
    /// Must stay below the HTTP client's own timeout.
    pub fn with_long_poll(mut self, secs: u32) -> Self {
        self.long_poll_s = secs;
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.token.is_empty() && !self.chat_id.is_empty()
    }

    fn ensure_configured(&self) -> Result<(), TransportError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(TransportError::NotConfigured)
        }
    }
}

impl<C: HttpClient> Notifier for TelegramBot<C> {
    fn send(&mut self, text: &str, mode: EscapingMode) -> Result<(), TransportError> {
        self.ensure_configured()?;
        let url = send_message_url(self.token, self.chat_id, text, mode);
        // Error replies still carry a JSON body with `ok: false`.
        let reply = self.http.get(&url)?;
        debug!("Telegram: sendMessage -> {}", reply.status);
        decode_ack(&reply.body)
    }
}

impl<C: HttpClient> UpdateTransport for TelegramBot<C> {
    fn fetch_updates(&mut self, offset: i64) -> Result<String, TransportError> {
        self.ensure_configured()?;
        let url = get_updates_url(self.token, offset, self.long_poll_s);
        let reply = require_success(self.http.get(&url)?)?;
        Ok(reply.body)
    }

    fn register_commands(&mut self, body: &str) -> Result<(), TransportError> {
        self.ensure_configured()?;
        let reply = self.http.post_json(&set_commands_url(self.token), body)?;
        decode_ack(&reply.body)
    }
}
