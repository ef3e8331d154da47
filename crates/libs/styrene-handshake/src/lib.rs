//! # styrene-handshake
//!
//! Handshake and control message codec for Styrene nodes meshing over a
//! connectionless broadcast radio link, plus the keyed-hash authentication
//! that binds an encryption request to the requester's hardware addresses.
//!
//! ## Wire Format
//!
//! ```text
//! <header>{"arguments":{"<id>":"<value>",...,"<id>":"<value>"}}
//! ```
//!
//! This is not general JSON. The field set is closed ([`FieldId`]), values are
//! never escaped, and lookup is by key token rather than by parsing the whole
//! object. Text formats are fixed:
//!
//! - session keys, durations and counters: decimal
//! - hardware addresses: 12 hex characters, uppercase on output
//! - hmac tags: lowercase hex, `2 * DIGEST_LEN` characters
//!
//! ## Example
//!
//! ```rust
//! use styrene_handshake::{
//!     auth, header, DeviceAddresses, FieldResult, HmacSha256, WireMessage,
//! };
//!
//! let me = DeviceAddresses::new([0x02, 0, 0, 0, 0, 0x01], [0x02, 0, 0, 0, 0, 0x02]);
//! let key = b"shared mesh key";
//!
//! let request = auth::encryption_request_hmac_message(
//!     &HmacSha256,
//!     header::TEMPORARY_ENCRYPTION_REQUEST_HEADER,
//!     "3F9A",
//!     key,
//!     30_000,
//!     &me,
//! )
//! .unwrap();
//!
//! let received = WireMessage::new(&request);
//! assert_eq!(received.nonce(), FieldResult::Value("3F9A"));
//! assert_eq!(received.duration(), FieldResult::Value(30_000));
//! assert!(auth::verify_encryption_request_hmac(
//!     &HmacSha256,
//!     &request,
//!     me.station,
//!     me.access_point,
//!     key,
//! ));
//! ```

pub mod auth;
pub mod builder;
pub mod config;
pub mod error;
pub mod extract;
pub mod field;
pub mod header;
pub mod mac;
pub mod state;

pub use auth::{HmacSha256, KeyedHash, RequestAuthenticator};
pub use config::HandshakeConfig;
pub use error::{AuthError, BuildError, ConfigError, MacParseError, MalformedField};
pub use extract::{extract_field, FieldResult, WireMessage};
pub use field::{FieldId, FieldKind, FieldValue};
pub use mac::{AddressProvider, DeviceAddresses, MacAddress};
pub use state::ConnectionState;
