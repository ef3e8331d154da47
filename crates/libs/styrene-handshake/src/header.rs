//! Message headers that prefix the `{"arguments":{...}}` envelope.

pub const BASIC_CONNECTION_INFO_HEADER: &str = "BasicCI:";
pub const ENCRYPTED_CONNECTION_INFO_HEADER: &str = "EncryptedCI:";
pub const SOFT_LIMIT_ENCRYPTED_CONNECTION_INFO_HEADER: &str = "SLEncryptedCI:";
pub const MAX_CONNECTIONS_REACHED_HEADER: &str = "MAX_CONNECTIONS_REACHED_PEER:";
pub const ENCRYPTED_CONNECTION_VERIFICATION_HEADER: &str = "ECVerified:";
pub const ENCRYPTED_CONNECTION_REMOVAL_REQUEST_HEADER: &str = "ECRemove:";
pub const ENCRYPTION_REQUEST_HEADER: &str = "AddEC:";
/// The only request header whose intro carries a `duration` field.
pub const TEMPORARY_ENCRYPTION_REQUEST_HEADER: &str = "AddTEC:";

/// Opening of the argument envelope that follows every header.
pub const ARGUMENTS_OPEN: &str = "{\"arguments\":{";
/// Closing of the argument envelope.
pub const ARGUMENTS_CLOSE: &str = "}}";

/// Splits a message into its header and the envelope that follows.
pub fn split_header(message: &str) -> Option<(&str, &str)> {
    let at = message.find(ARGUMENTS_OPEN)?;
    Some(message.split_at(at))
}
