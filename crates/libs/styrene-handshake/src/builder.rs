//! Outgoing message construction.
//!
//! Every message has the shape
//! `<header>{"arguments":{"<id>":"<value>",...,"<id>":"<value>"}}`. Values are
//! always written quoted, numbers included.
//!
//! The format has no escaping. Builders that take caller-chosen text (nonces,
//! passwords) check it with [`is_wire_safe`] and return
//! [`BuildError::UnsafeValue`] instead of emitting a broken envelope.

use core::fmt::{self, Write};

use crate::error::BuildError;
use crate::field::FieldId;
use crate::header::{ARGUMENTS_CLOSE, ARGUMENTS_OPEN, TEMPORARY_ENCRYPTION_REQUEST_HEADER};
use crate::mac::DeviceAddresses;

/// Whether `value` can be carried in a field without breaking the envelope.
///
/// The format has no escaping, so `"`, `,` and `}` can never appear in a value.
pub fn is_wire_safe(value: &str) -> bool {
    !value.contains(['"', ',', '}'])
}

fn checked(id: FieldId, value: &str) -> Result<&str, BuildError> {
    if is_wire_safe(value) {
        Ok(value)
    } else {
        Err(BuildError::UnsafeValue(id))
    }
}

fn push_pair(out: &mut String, id: FieldId, value: impl fmt::Display) {
    let start = out.len();
    // Writing into a String cannot fail.
    let _ = write!(out, "{}\"{}\"", id.key(), value);
    debug_assert!(
        is_wire_safe(&out[start + id.key().len() + 1..out.len() - 1]),
        "{id} value contains a delimiter"
    );
}

/// `"<id>":"<value>",`
pub fn field_pair(id: FieldId, value: impl fmt::Display) -> String {
    let mut out = String::new();
    push_pair(&mut out, id, value);
    out.push(',');
    out
}

/// `"<id>":"<value>"}}`, closing the envelope.
pub fn end_field_pair(id: FieldId, value: impl fmt::Display) -> String {
    let mut out = String::new();
    push_pair(&mut out, id, value);
    out.push_str(ARGUMENTS_CLOSE);
    out
}

/// Appends fields to an open envelope in the order they are given.
///
/// Values are written as given; text values must satisfy [`is_wire_safe`].
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    buf: String,
}

impl MessageBuilder {
    pub fn new(header: &str) -> Self {
        let mut buf = String::with_capacity(header.len() + 96);
        buf.push_str(header);
        buf.push_str(ARGUMENTS_OPEN);
        Self { buf }
    }

    pub fn field(mut self, id: FieldId, value: impl fmt::Display) -> Self {
        push_pair(&mut self.buf, id, value);
        self.buf.push(',');
        self
    }

    /// Appends a prebuilt `"<id>":<value>` fragment such as a connection state.
    pub fn fragment(mut self, fragment: &str) -> Self {
        self.buf.push_str(fragment);
        self.buf.push(',');
        self
    }

    /// Appends `id` as the terminal field and closes the envelope.
    pub fn end_field(mut self, id: FieldId, value: impl fmt::Display) -> String {
        push_pair(&mut self.buf, id, value);
        self.buf.push_str(ARGUMENTS_CLOSE);
        self.buf
    }

    /// Closes the envelope after the last appended field.
    pub fn finish(mut self) -> String {
        if self.buf.ends_with(',') {
            self.buf.pop();
        }
        self.buf.push_str(ARGUMENTS_CLOSE);
        self.buf
    }

    pub fn into_unterminated(self) -> String {
        self.buf
    }
}

/// Connection info reply carrying the session keys.
///
/// The keys are written from the receiver's point of view: the receiver's own
/// key is the one this node knows as the peer key, and the other way round.
///
/// Fails if `nonce` or `password` contains `"`, `,` or `}`.
pub fn encrypted_connection_info(
    header: &str,
    nonce: &str,
    password: &str,
    own_session_key: u64,
    peer_session_key: u64,
) -> Result<String, BuildError> {
    let nonce = checked(FieldId::Nonce, nonce)?;
    let password = checked(FieldId::Password, password)?;
    Ok(MessageBuilder::new(header)
        .field(FieldId::Nonce, nonce)
        .field(FieldId::Password, password)
        .field(FieldId::OwnSessionKey, peer_session_key)
        .end_field(FieldId::PeerSessionKey, own_session_key))
}

fn request_intro(header: &str, duration: u32) -> MessageBuilder {
    let builder = MessageBuilder::new(header);
    if header == TEMPORARY_ENCRYPTION_REQUEST_HEADER {
        builder.field(FieldId::Duration, duration)
    } else {
        builder
    }
}

/// Envelope opening for an encryption request.
///
/// `duration` is only written for [`TEMPORARY_ENCRYPTION_REQUEST_HEADER`];
/// every other header ignores it.
pub fn encryption_request_intro(header: &str, duration: u32) -> String {
    request_intro(header, duration).into_unterminated()
}

/// Terminal nonce field of an encryption request.
pub fn encryption_request_ending(nonce: &str) -> Result<String, BuildError> {
    Ok(end_field_pair(FieldId::Nonce, checked(FieldId::Nonce, nonce)?))
}

/// Unauthenticated encryption request: intro followed by the nonce.
///
/// Fails if `nonce` contains `"`, `,` or `}`.
pub fn encryption_request_message(
    header: &str,
    nonce: &str,
    duration: u32,
) -> Result<String, BuildError> {
    let nonce = checked(FieldId::Nonce, nonce)?;
    Ok(request_intro(header, duration).end_field(FieldId::Nonce, nonce))
}

/// Intro plus a non-terminal nonce; the body an hmac is computed over.
pub(crate) fn encryption_request_body(
    header: &str,
    nonce: &str,
    duration: u32,
) -> Result<String, BuildError> {
    let nonce = checked(FieldId::Nonce, nonce)?;
    Ok(request_intro(header, duration).field(FieldId::Nonce, nonce).into_unterminated())
}

/// `"connectionState":{"unsyncMsgID":"<id>","meshMsgCount":"<count>"}`
pub fn connection_state_fragment(unsynchronized_message_id: u32, mesh_message_count: u16) -> String {
    let mut out = String::from(FieldId::ConnectionState.key());
    out.push('{');
    push_pair(&mut out, FieldId::UnsynchronizedMessageId, unsynchronized_message_id);
    out.push(',');
    push_pair(&mut out, FieldId::MeshMessageCount, mesh_message_count);
    out.push('}');
    out
}

/// `"peerSTA":"<mac>","peerAP":"<mac>",`
pub fn peer_address_fields(addresses: &DeviceAddresses) -> String {
    let mut out = field_pair(FieldId::PeerStaMac, addresses.station);
    out.push_str(&field_pair(FieldId::PeerApMac, addresses.access_point));
    out
}
