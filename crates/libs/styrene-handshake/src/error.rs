use crate::field::FieldId;

/// Why a field that is present in a message could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MalformedField {
    #[error("{0} value is missing its opening quote")]
    MissingOpeningQuote(FieldId),

    #[error("{0} value is not terminated")]
    Unterminated(FieldId),

    #[error("{0} value is followed by {1:?} instead of a field separator")]
    TrailingGarbage(FieldId, char),

    #[error("{0} value has no leading digits")]
    NotNumeric(FieldId),

    #[error("{0} value does not fit its integer width")]
    Overflow(FieldId),

    #[error("{field} value is {actual} characters long (expected {expected})")]
    BadLength { field: FieldId, expected: usize, actual: usize },

    #[error("{0} value is not valid hex")]
    InvalidHex(FieldId),

    #[error("{0} fragment is missing {1}")]
    MissingMember(FieldId, FieldId),
}

/// Errors from parsing a 12-character hardware address string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MacParseError {
    #[error("mac string is {0} characters long (expected 12)")]
    BadLength(usize),

    #[error("mac string is not valid hex")]
    InvalidHex,
}

/// Errors from building an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("{0} value contains '\"', ',' or '}}'")]
    UnsafeValue(FieldId),
}

/// Reasons an authenticated encryption request is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("hash key rejected by keyed hash")]
    InvalidKey,

    #[error("message carries no hmac field")]
    MissingTag,

    #[error("hmac field is malformed: {0}")]
    MalformedTag(MalformedField),

    #[error("hmac is {actual} characters long (expected {expected})")]
    TagLength { expected: usize, actual: usize },

    #[error("hmac does not match message contents")]
    TagMismatch,

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Errors from loading handshake configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("hash_key is not valid hex: {0}")]
    HashKeyHex(#[from] hex::FromHexError),

    #[error("hash_key is {0} bytes long (expected 1 to {})", crate::config::MAX_HASH_KEY_LEN)]
    HashKeyLength(usize),
}
