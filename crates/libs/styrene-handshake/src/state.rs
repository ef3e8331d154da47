//! Mesh connection state carried as a nested fragment.

use crate::builder::connection_state_fragment;
use crate::error::MalformedField;
use crate::extract::{counter_field, fragment_field, message_count_field, FieldResult};
use crate::field::FieldId;

/// Message counters a node reports so a peer can detect desynchronisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionState {
    pub unsynchronized_message_id: u32,
    pub mesh_message_count: u16,
}

impl ConnectionState {
    pub fn new(unsynchronized_message_id: u32, mesh_message_count: u16) -> Self {
        Self { unsynchronized_message_id, mesh_message_count }
    }

    /// `"connectionState":{"unsyncMsgID":"<id>","meshMsgCount":"<count>"}`
    pub fn to_fragment(&self) -> String {
        connection_state_fragment(self.unsynchronized_message_id, self.mesh_message_count)
    }

    /// Reads the connection state fragment of `message`.
    ///
    /// Only members inside the fragment are considered; counters elsewhere in
    /// the message are ignored.
    ///
    /// # Panics
    ///
    /// Panics if the fragment's mesh message count exceeds `u16::MAX`.
    pub fn from_message(message: &str) -> FieldResult<Self> {
        let fragment = match fragment_field(message, FieldId::ConnectionState, 0) {
            FieldResult::Value(fragment) => fragment,
            FieldResult::NotFound => return FieldResult::NotFound,
            FieldResult::Malformed(err) => return FieldResult::Malformed(err),
        };
        let id = FieldId::UnsynchronizedMessageId;
        let unsynchronized_message_id = match member(counter_field(fragment, id, 0), id) {
            Ok(value) => value,
            Err(err) => return FieldResult::Malformed(err),
        };
        let id = FieldId::MeshMessageCount;
        let mesh_message_count = match member(message_count_field(fragment, id, 0), id) {
            Ok(value) => value,
            Err(err) => return FieldResult::Malformed(err),
        };
        FieldResult::Value(Self { unsynchronized_message_id, mesh_message_count })
    }
}

fn member<T>(result: FieldResult<T>, id: FieldId) -> Result<T, MalformedField> {
    match result {
        FieldResult::Value(value) => Ok(value),
        FieldResult::Malformed(err) => Err(err),
        FieldResult::NotFound => Err(MalformedField::MissingMember(FieldId::ConnectionState, id)),
    }
}
