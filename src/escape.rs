//! Text escaping for outbound chat replies.
//!
//! Replies travel in the query string of a GET request, so every message
//! goes through two steps:
//!
//! 1. [`apply`]: the mode-specific transform (markup escaping, full URL
//!    encoding, or nothing).
//! 2. [`encode_request_text`]: makes a non-URL-encoded body safe to splice
//!    into the request line.

use core::fmt::Write;

/// How a reply body is prepared before it is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapingMode {
    /// Plain text, no markup.
    None,
    /// Markup-escaped text (rendered with the chat's markdown dialect).
    EscapedMarkup,
    /// Fully percent-encoded (used for HTML replies such as chart links).
    UrlEncoded,
}

impl EscapingMode {
    /// `parse_mode` query value the bot API expects for this mode.
    pub const fn parse_mode(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::EscapedMarkup => Some("MarkdownV2"),
            Self::UrlEncoded => Some("HTML"),
        }
    }
}

const MARKUP_RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Backslash-escape every markup-reserved character.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        if MARKUP_RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~')
}

/// Percent-encode every byte outside `[A-Za-z0-9-_.~]` (uppercase hex).
pub fn url_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3);
    for &b in text.as_bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}

/// Mode-specific transform.
pub fn apply(text: &str, mode: EscapingMode) -> String {
    match mode {
        EscapingMode::None => String::from(text),
        EscapingMode::EscapedMarkup => escape_markup(text),
        EscapingMode::UrlEncoded => url_encode(text),
    }
}

/// Prepare an already-transformed body for the request line.
///
/// URL-encoded bodies pass through.  Anything else has spaces and newlines
/// replaced with `%20` / `%0A`, plus the few bytes that would otherwise
/// end or split the query value (`%`, `&`, `#`, `+`).
pub fn encode_request_text(body: &str, mode: EscapingMode) -> String {
    if mode == EscapingMode::UrlEncoded {
        return String::from(body);
    }
    let mut out = String::with_capacity(body.len() + body.len() / 2);
    for c in body.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '\n' => out.push_str("%0A"),
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '#' => out.push_str("%23"),
            '+' => out.push_str("%2B"),
            _ => out.push(c),
        }
    }
    out
}
