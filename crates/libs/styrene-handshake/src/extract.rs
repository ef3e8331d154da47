//! Field extraction from received messages.
//!
//! Lookup is a search for the field's key token followed by a small scanner
//! that walks the value according to its shape:
//!
//! ```text
//! quoted:   "key":  '"'  value-chars  '"'  (',' | '}')
//! numeric:  "key":  ['"']  digit+  ...          parse stops at the first non-digit
//! fragment: "key":  ...  '}'                    returned raw, '}' included
//! ```
//!
//! Values never legally contain `"`, `,` or `}`; meeting one of those inside a
//! quoted value means the field is malformed, not that the value continues.

use crate::error::MalformedField;
use crate::field::{FieldId, FieldKind, FieldValue};
use crate::mac::{MacAddress, MAC_STRING_LEN};

/// Largest value a mesh message count may take.
pub const MAX_MESH_MESSAGE_COUNT: u32 = u16::MAX as u32;

/// Outcome of looking up one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldResult<T> {
    NotFound,
    Malformed(MalformedField),
    Value(T),
}

impl<T> FieldResult<T> {
    pub fn value(self) -> Option<T> {
        match self {
            FieldResult::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, FieldResult::Malformed(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldResult<U> {
        match self {
            FieldResult::NotFound => FieldResult::NotFound,
            FieldResult::Malformed(err) => FieldResult::Malformed(err),
            FieldResult::Value(value) => FieldResult::Value(f(value)),
        }
    }

    fn and_then<U>(self, f: impl FnOnce(T) -> FieldResult<U>) -> FieldResult<U> {
        match self {
            FieldResult::NotFound => FieldResult::NotFound,
            FieldResult::Malformed(err) => FieldResult::Malformed(err),
            FieldResult::Value(value) => f(value),
        }
    }
}

// Byte range of a value inside a message.
#[derive(Debug, Clone, Copy)]
struct ValueSpan {
    start: usize,
    end: usize,
}

impl ValueSpan {
    fn slice<'a>(&self, message: &'a str) -> &'a str {
        &message[self.start..self.end]
    }
}

/// Offset of the first key token for `id` at or after `from`.
pub fn find_key(message: &str, id: FieldId, from: usize) -> Option<usize> {
    let tail = message.get(from..)?;
    tail.find(id.key()).map(|at| from + at)
}

enum QuotedScan {
    Open,
    Value { start: usize },
    Close { start: usize, end: usize },
}

fn locate_quoted(message: &str, id: FieldId, from: usize) -> FieldResult<ValueSpan> {
    let Some(key_start) = find_key(message, id, from) else {
        return FieldResult::NotFound;
    };
    let value_start = key_start + id.key().len();

    let mut state = QuotedScan::Open;
    for (pos, ch) in message[value_start..].char_indices() {
        let pos = value_start + pos;
        state = match state {
            QuotedScan::Open if ch == '"' => QuotedScan::Value { start: pos + 1 },
            QuotedScan::Open => {
                return FieldResult::Malformed(MalformedField::MissingOpeningQuote(id));
            }
            QuotedScan::Value { start } => match ch {
                '"' => QuotedScan::Close { start, end: pos },
                ',' | '}' => return FieldResult::Malformed(MalformedField::Unterminated(id)),
                _ => QuotedScan::Value { start },
            },
            QuotedScan::Close { start, end } => {
                return match ch {
                    ',' | '}' => FieldResult::Value(ValueSpan { start, end }),
                    other => FieldResult::Malformed(MalformedField::TrailingGarbage(id, other)),
                };
            }
        };
    }
    FieldResult::Malformed(MalformedField::Unterminated(id))
}

// Numeric values may be quoted or bare.
fn locate_numeric(message: &str, id: FieldId, from: usize) -> FieldResult<ValueSpan> {
    let Some(key_start) = find_key(message, id, from) else {
        return FieldResult::NotFound;
    };
    let bytes = message.as_bytes();
    let mut start = key_start + id.key().len();
    if bytes.get(start) == Some(&b'"') {
        start += 1;
    }
    let digits = bytes[start..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return FieldResult::Malformed(MalformedField::NotNumeric(id));
    }
    FieldResult::Value(ValueSpan { start, end: start + digits })
}

fn locate_fragment(message: &str, id: FieldId, from: usize) -> FieldResult<ValueSpan> {
    let Some(key_start) = find_key(message, id, from) else {
        return FieldResult::NotFound;
    };
    match message[key_start..].find('}') {
        Some(close) => FieldResult::Value(ValueSpan { start: key_start, end: key_start + close + 1 }),
        None => FieldResult::Malformed(MalformedField::Unterminated(id)),
    }
}

fn parse_digits<T: core::str::FromStr>(digits: &str, id: FieldId) -> FieldResult<T> {
    // Callers only pass non-empty ASCII digit runs, so the only failure left is overflow.
    match digits.parse() {
        Ok(value) => FieldResult::Value(value),
        Err(_) => FieldResult::Malformed(MalformedField::Overflow(id)),
    }
}

/// A quoted value returned verbatim.
pub fn text_field(message: &str, id: FieldId, from: usize) -> FieldResult<&str> {
    locate_quoted(message, id, from).map(|span| span.slice(message))
}

/// A quoted decimal `u64`.
pub fn session_key_field(message: &str, id: FieldId, from: usize) -> FieldResult<u64> {
    text_field(message, id, from).and_then(|digits| {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return FieldResult::Malformed(MalformedField::NotNumeric(id));
        }
        parse_digits(digits, id)
    })
}

/// Leading digit run as `u32`.
pub fn counter_field(message: &str, id: FieldId, from: usize) -> FieldResult<u32> {
    locate_numeric(message, id, from).and_then(|span| parse_digits(span.slice(message), id))
}

/// Leading digit run narrowed to `u16`.
///
/// # Panics
///
/// Panics when the value exceeds [`MAX_MESH_MESSAGE_COUNT`], including digit
/// runs too long for a `u32`.
pub fn message_count_field(message: &str, id: FieldId, from: usize) -> FieldResult<u16> {
    locate_numeric(message, id, from).map(|span| {
        let digits = span.slice(message);
        match digits.parse::<u32>() {
            Ok(count) if count <= MAX_MESH_MESSAGE_COUNT => count as u16,
            _ => panic!("{id} {digits} exceeds {MAX_MESH_MESSAGE_COUNT}"),
        }
    })
}

/// Leading digit run as a flag; any nonzero value is `true`.
pub fn flag_field(message: &str, id: FieldId, from: usize) -> FieldResult<bool> {
    locate_numeric(message, id, from)
        .map(|span| span.slice(message).bytes().any(|b| b != b'0'))
}

/// A quoted 12-character hex address.
pub fn mac_field(message: &str, id: FieldId, from: usize) -> FieldResult<MacAddress> {
    text_field(message, id, from).and_then(|text| {
        if text.len() != MAC_STRING_LEN {
            return FieldResult::Malformed(MalformedField::BadLength {
                field: id,
                expected: MAC_STRING_LEN,
                actual: text.len(),
            });
        }
        match text.parse() {
            Ok(mac) => FieldResult::Value(mac),
            Err(_) => FieldResult::Malformed(MalformedField::InvalidHex(id)),
        }
    })
}

/// The raw fragment from the key token through the first `}` after it.
pub fn fragment_field(message: &str, id: FieldId, from: usize) -> FieldResult<&str> {
    locate_fragment(message, id, from).map(|span| span.slice(message))
}

/// Decodes `id` from `message` using the rule for its [`FieldKind`].
pub fn extract_field(message: &str, id: FieldId) -> FieldResult<FieldValue<'_>> {
    extract_field_from(message, id, 0)
}

/// Like [`extract_field`], searching only at or after byte offset `from`.
pub fn extract_field_from(message: &str, id: FieldId, from: usize) -> FieldResult<FieldValue<'_>> {
    let result = match id.kind() {
        FieldKind::Text => text_field(message, id, from).map(FieldValue::Text),
        FieldKind::SessionKey => session_key_field(message, id, from).map(FieldValue::SessionKey),
        FieldKind::Counter => counter_field(message, id, from).map(FieldValue::Counter),
        FieldKind::MessageCount => {
            message_count_field(message, id, from).map(FieldValue::MessageCount)
        }
        FieldKind::Flag => flag_field(message, id, from).map(FieldValue::Flag),
        FieldKind::Mac => mac_field(message, id, from).map(FieldValue::Mac),
        FieldKind::Fragment => fragment_field(message, id, from).map(FieldValue::Fragment),
    };
    if let FieldResult::Malformed(err) = &result {
        log::trace!("extract: {err}");
    }
    result
}

/// Typed read access to a received message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireMessage<'a> {
    raw: &'a str,
}

impl<'a> WireMessage<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    /// Header text preceding the argument envelope, if there is an envelope.
    pub fn header(&self) -> Option<&'a str> {
        crate::header::split_header(self.raw).map(|(header, _)| header)
    }

    /// Offset of the key token for `id`, if present.
    pub fn key_offset(&self, id: FieldId) -> Option<usize> {
        find_key(self.raw, id, 0)
    }

    pub fn nonce(&self) -> FieldResult<&'a str> {
        text_field(self.raw, FieldId::Nonce, 0)
    }

    pub fn password(&self) -> FieldResult<&'a str> {
        text_field(self.raw, FieldId::Password, 0)
    }

    pub fn hmac(&self) -> FieldResult<&'a str> {
        text_field(self.raw, FieldId::Hmac, 0)
    }

    pub fn own_session_key(&self) -> FieldResult<u64> {
        session_key_field(self.raw, FieldId::OwnSessionKey, 0)
    }

    pub fn peer_session_key(&self) -> FieldResult<u64> {
        session_key_field(self.raw, FieldId::PeerSessionKey, 0)
    }

    pub fn duration(&self) -> FieldResult<u32> {
        counter_field(self.raw, FieldId::Duration, 0)
    }

    pub fn unsynchronized_message_id(&self) -> FieldResult<u32> {
        counter_field(self.raw, FieldId::UnsynchronizedMessageId, 0)
    }

    /// # Panics
    ///
    /// See [`message_count_field`].
    pub fn mesh_message_count(&self) -> FieldResult<u16> {
        message_count_field(self.raw, FieldId::MeshMessageCount, 0)
    }

    pub fn desync(&self) -> FieldResult<bool> {
        flag_field(self.raw, FieldId::Desync, 0)
    }

    pub fn peer_sta_mac(&self) -> FieldResult<MacAddress> {
        mac_field(self.raw, FieldId::PeerStaMac, 0)
    }

    pub fn peer_ap_mac(&self) -> FieldResult<MacAddress> {
        mac_field(self.raw, FieldId::PeerApMac, 0)
    }

    pub fn connection_state(&self) -> FieldResult<&'a str> {
        fragment_field(self.raw, FieldId::ConnectionState, 0)
    }
}
