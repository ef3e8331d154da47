use serde::Deserialize;
use std::fs;
use std::path::Path;
use zeroize::{Zeroize, Zeroizing};

use crate::auth::{HmacSha256, RequestAuthenticator};
use crate::error::ConfigError;

/// Longest accepted mesh hash key, in bytes.
pub const MAX_HASH_KEY_LEN: usize = 64;

/// Default lifetime of a temporary encrypted connection, in milliseconds.
pub const DEFAULT_TEMPORARY_DURATION_MS: u32 = 30_000;

#[derive(Debug, Deserialize)]
pub struct HandshakeConfig {
    pub handshake: HandshakeSection,
}

#[derive(Deserialize)]
pub struct HandshakeSection {
    /// Hex-encoded key shared by every node in the mesh.
    hash_key: String,
    #[serde(default = "default_temporary_duration")]
    pub temporary_duration_ms: u32,
}

fn default_temporary_duration() -> u32 {
    DEFAULT_TEMPORARY_DURATION_MS
}

impl Drop for HandshakeSection {
    fn drop(&mut self) {
        self.hash_key.zeroize();
    }
}

impl core::fmt::Debug for HandshakeSection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandshakeSection")
            .field("hash_key", &"<redacted>")
            .field("temporary_duration_ms", &self.temporary_duration_ms)
            .finish()
    }
}

impl HandshakeConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.hash_key()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = Zeroizing::new(fs::read_to_string(path)?);
        Self::from_toml(&contents)
    }

    /// Decoded mesh hash key.
    pub fn hash_key(&self) -> Result<Zeroizing<Vec<u8>>, ConfigError> {
        let key = Zeroizing::new(hex::decode(self.handshake.hash_key.trim())?);
        if key.is_empty() || key.len() > MAX_HASH_KEY_LEN {
            return Err(ConfigError::HashKeyLength(key.len()));
        }
        Ok(key)
    }

    pub fn temporary_duration_ms(&self) -> u32 {
        self.handshake.temporary_duration_ms
    }

    pub fn authenticator(&self) -> Result<RequestAuthenticator<HmacSha256>, ConfigError> {
        let key = self.hash_key()?;
        Ok(RequestAuthenticator::new(HmacSha256, key.to_vec()))
    }
}
