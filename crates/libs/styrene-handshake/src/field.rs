//! Field identifiers and their decode rules.
//!
//! The set of fields is closed: both ends compile in the same identifiers and
//! must agree on them byte for byte.

use core::fmt;

use crate::mac::MacAddress;

/// Every field that may appear inside a message's `"arguments"` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Nonce,
    Password,
    OwnSessionKey,
    PeerSessionKey,
    Duration,
    PeerStaMac,
    PeerApMac,
    Hmac,
    Desync,
    UnsynchronizedMessageId,
    MeshMessageCount,
    ConnectionState,
}

/// Shape of a field's value on the wire and the type it decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Quoted string returned verbatim.
    Text,
    /// Quoted decimal `u64`.
    SessionKey,
    /// Leading digit run decoded as `u32`.
    Counter,
    /// Leading digit run that must fit in `u16`; a larger value panics.
    MessageCount,
    /// Leading digit run; nonzero is `true`.
    Flag,
    /// Quoted 12-character hex hardware address.
    Mac,
    /// Raw fragment from the key through the next `}`.
    Fragment,
}

impl FieldId {
    pub const ALL: [FieldId; 12] = [
        FieldId::Nonce,
        FieldId::Password,
        FieldId::OwnSessionKey,
        FieldId::PeerSessionKey,
        FieldId::Duration,
        FieldId::PeerStaMac,
        FieldId::PeerApMac,
        FieldId::Hmac,
        FieldId::Desync,
        FieldId::UnsynchronizedMessageId,
        FieldId::MeshMessageCount,
        FieldId::ConnectionState,
    ];

    /// Identifier as spelled on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            FieldId::Nonce => "nonce",
            FieldId::Password => "password",
            FieldId::OwnSessionKey => "ownSK",
            FieldId::PeerSessionKey => "peerSK",
            FieldId::Duration => "duration",
            FieldId::PeerStaMac => "peerSTA",
            FieldId::PeerApMac => "peerAP",
            FieldId::Hmac => "hmac",
            FieldId::Desync => "desync",
            FieldId::UnsynchronizedMessageId => "unsyncMsgID",
            FieldId::MeshMessageCount => "meshMsgCount",
            FieldId::ConnectionState => "connectionState",
        }
    }

    /// Full key token, quotes and colon included: `"nonce":`.
    pub const fn key(self) -> &'static str {
        match self {
            FieldId::Nonce => "\"nonce\":",
            FieldId::Password => "\"password\":",
            FieldId::OwnSessionKey => "\"ownSK\":",
            FieldId::PeerSessionKey => "\"peerSK\":",
            FieldId::Duration => "\"duration\":",
            FieldId::PeerStaMac => "\"peerSTA\":",
            FieldId::PeerApMac => "\"peerAP\":",
            FieldId::Hmac => "\"hmac\":",
            FieldId::Desync => "\"desync\":",
            FieldId::UnsynchronizedMessageId => "\"unsyncMsgID\":",
            FieldId::MeshMessageCount => "\"meshMsgCount\":",
            FieldId::ConnectionState => "\"connectionState\":",
        }
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            FieldId::Nonce | FieldId::Password | FieldId::Hmac => FieldKind::Text,
            FieldId::OwnSessionKey | FieldId::PeerSessionKey => FieldKind::SessionKey,
            FieldId::Duration | FieldId::UnsynchronizedMessageId => FieldKind::Counter,
            FieldId::MeshMessageCount => FieldKind::MessageCount,
            FieldId::Desync => FieldKind::Flag,
            FieldId::PeerStaMac | FieldId::PeerApMac => FieldKind::Mac,
            FieldId::ConnectionState => FieldKind::Fragment,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded field value, one variant per [`FieldKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    SessionKey(u64),
    Counter(u32),
    MessageCount(u16),
    Flag(bool),
    Mac(MacAddress),
    Fragment(&'a str),
}

impl FieldValue<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::SessionKey(_) => FieldKind::SessionKey,
            FieldValue::Counter(_) => FieldKind::Counter,
            FieldValue::MessageCount(_) => FieldKind::MessageCount,
            FieldValue::Flag(_) => FieldKind::Flag,
            FieldValue::Mac(_) => FieldKind::Mac,
            FieldValue::Fragment(_) => FieldKind::Fragment,
        }
    }
}
