//! Encryption request authentication.
//!
//! A request is bound to the requester's station and AP interface addresses:
//!
//! ```text
//! tag = H(key, sta_mac_hex || ap_mac_hex || body)
//! body = <header>{"arguments":{["duration":"<d>",]"nonce":"<nonce>",
//! sent = body || "hmac":"<tag>"}}
//! ```
//!
//! The addresses themselves are not sent. The receiver supplies the addresses
//! it expects the requester to have, so a request replayed from another
//! device fails verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::builder::{self, end_field_pair};
use crate::error::AuthError;
use crate::extract::{find_key, text_field, FieldResult};
use crate::field::FieldId;
use crate::mac::{AddressProvider, DeviceAddresses, MacAddress};

/// Keyed hash used to tag handshake messages.
pub trait KeyedHash {
    /// Digest length in bytes. Tags are hex, so twice this many characters.
    const DIGEST_LEN: usize;

    fn compute_tag(&self, key: &[u8], message: &[u8]) -> Result<String, AuthError>;

    /// Compares `claimed` against the tag of `message` in constant time.
    fn verify_tag(&self, key: &[u8], message: &[u8], claimed: &str) -> bool;

    fn tag_hex_len(&self) -> usize {
        2 * Self::DIGEST_LEN
    }
}

/// HMAC-SHA256 with lowercase hex tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha256;

type HmacSha256Impl = Hmac<Sha256>;

impl KeyedHash for HmacSha256 {
    const DIGEST_LEN: usize = 32;

    fn compute_tag(&self, key: &[u8], message: &[u8]) -> Result<String, AuthError> {
        let mut mac =
            <HmacSha256Impl as Mac>::new_from_slice(key).map_err(|_| AuthError::InvalidKey)?;
        mac.update(message);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn verify_tag(&self, key: &[u8], message: &[u8], claimed: &str) -> bool {
        let Ok(claimed) = hex::decode(claimed) else {
            return false;
        };
        let Ok(mut mac) = <HmacSha256Impl as Mac>::new_from_slice(key) else {
            return false;
        };
        mac.update(message);
        mac.verify_slice(&claimed).is_ok()
    }
}

fn signed_input(station: MacAddress, access_point: MacAddress, body: &str) -> Vec<u8> {
    let prefix = DeviceAddresses::new(station, access_point).binding_prefix();
    let mut input = Vec::with_capacity(prefix.len() + body.len());
    input.extend_from_slice(prefix.as_bytes());
    input.extend_from_slice(body.as_bytes());
    input
}

/// Builds an encryption request tagged for this device's addresses.
pub fn encryption_request_hmac_message<H: KeyedHash>(
    hasher: &H,
    header: &str,
    nonce: &str,
    hash_key: &[u8],
    duration: u32,
    local: &impl AddressProvider,
) -> Result<String, AuthError> {
    let mut message = builder::encryption_request_body(header, nonce, duration)?;
    let input = signed_input(local.station_mac(), local.access_point_mac(), &message);
    let tag = hasher.compute_tag(hash_key, &input)?;
    message.push_str(&end_field_pair(FieldId::Hmac, tag));
    Ok(message)
}

/// Checks the hmac of a received encryption request, reporting why it failed.
pub fn check_encryption_request_hmac<H: KeyedHash>(
    hasher: &H,
    message: &str,
    requester_sta_mac: MacAddress,
    requester_ap_mac: MacAddress,
    hash_key: &[u8],
) -> Result<(), AuthError> {
    let tag = match text_field(message, FieldId::Hmac, 0) {
        FieldResult::Value(tag) => tag,
        FieldResult::NotFound => return Err(AuthError::MissingTag),
        FieldResult::Malformed(err) => return Err(AuthError::MalformedTag(err)),
    };
    let body_end = find_key(message, FieldId::Hmac, 0).ok_or(AuthError::MissingTag)?;

    let expected = hasher.tag_hex_len();
    if tag.len() != expected {
        return Err(AuthError::TagLength { expected, actual: tag.len() });
    }

    let input = signed_input(requester_sta_mac, requester_ap_mac, &message[..body_end]);
    if hasher.verify_tag(hash_key, &input, tag) {
        Ok(())
    } else {
        Err(AuthError::TagMismatch)
    }
}

/// Boolean form of [`check_encryption_request_hmac`].
pub fn verify_encryption_request_hmac<H: KeyedHash>(
    hasher: &H,
    message: &str,
    requester_sta_mac: MacAddress,
    requester_ap_mac: MacAddress,
    hash_key: &[u8],
) -> bool {
    match check_encryption_request_hmac(
        hasher,
        message,
        requester_sta_mac,
        requester_ap_mac,
        hash_key,
    ) {
        Ok(()) => true,
        Err(err) => {
            log::debug!("auth: rejected encryption request from {requester_sta_mac}: {err}");
            false
        }
    }
}

/// A keyed hash together with the mesh hash key.
pub struct RequestAuthenticator<H: KeyedHash = HmacSha256> {
    hasher: H,
    hash_key: Zeroizing<Vec<u8>>,
}

impl<H: KeyedHash> RequestAuthenticator<H> {
    pub fn new(hasher: H, hash_key: impl Into<Vec<u8>>) -> Self {
        Self { hasher, hash_key: Zeroizing::new(hash_key.into()) }
    }

    pub fn sign_request(
        &self,
        header: &str,
        nonce: &str,
        duration: u32,
        local: &impl AddressProvider,
    ) -> Result<String, AuthError> {
        encryption_request_hmac_message(&self.hasher, header, nonce, &self.hash_key, duration, local)
    }

    pub fn check_request(&self, message: &str, requester: &DeviceAddresses) -> Result<(), AuthError> {
        check_encryption_request_hmac(
            &self.hasher,
            message,
            requester.station,
            requester.access_point,
            &self.hash_key,
        )
    }

    pub fn verify_request(&self, message: &str, requester: &DeviceAddresses) -> bool {
        verify_encryption_request_hmac(
            &self.hasher,
            message,
            requester.station,
            requester.access_point,
            &self.hash_key,
        )
    }
}

impl<H: KeyedHash> core::fmt::Debug for RequestAuthenticator<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RequestAuthenticator").field("hash_key", &"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use crate::header::{ENCRYPTION_REQUEST_HEADER, TEMPORARY_ENCRYPTION_REQUEST_HEADER};
    use sha2::Digest;

    const KEY: &[u8] = b"mesh hash key";

    fn local() -> DeviceAddresses {
        DeviceAddresses::new([0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC], [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBD])
    }

    #[test]
    fn digest_len_matches_sha256() {
        assert_eq!(HmacSha256::DIGEST_LEN, Sha256::output_size());
        assert_eq!(HmacSha256.tag_hex_len(), 64);
    }

    #[test]
    fn tag_is_lowercase_hex() {
        let tag = HmacSha256.compute_tag(KEY, b"hello").expect("tag");
        assert_eq!(tag.len(), 64);
        assert!(tag.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        assert!(HmacSha256.verify_tag(KEY, b"hello", &tag));
        assert!(HmacSha256.verify_tag(KEY, b"hello", &tag.to_uppercase()));
        assert!(!HmacSha256.verify_tag(KEY, b"hellp", &tag));
        assert!(!HmacSha256.verify_tag(KEY, b"hello", "zz"));
    }

    #[test]
    fn signed_message_layout() {
        let msg =
            encryption_request_hmac_message(&HmacSha256, ENCRYPTION_REQUEST_HEADER, "abc", KEY, 0, &local())
                .expect("sign");
        let prefix = "AddEC:{\"arguments\":{\"nonce\":\"abc\",\"hmac\":\"";
        assert!(msg.starts_with(prefix), "{msg}");
        assert!(msg.ends_with("\"}}"));
        assert_eq!(msg.len(), prefix.len() + 64 + 3);
    }

    #[test]
    fn tag_covers_addresses_and_body() {
        let msg =
            encryption_request_hmac_message(&HmacSha256, ENCRYPTION_REQUEST_HEADER, "abc", KEY, 0, &local())
                .expect("sign");
        let body = "AddEC:{\"arguments\":{\"nonce\":\"abc\",";
        let expected = HmacSha256
            .compute_tag(KEY, format!("123456789ABC123456789ABD{body}").as_bytes())
            .expect("tag");
        assert!(msg.contains(&expected));
    }

    #[test]
    fn verifies_own_request() {
        let addrs = local();
        let msg = encryption_request_hmac_message(
            &HmacSha256,
            TEMPORARY_ENCRYPTION_REQUEST_HEADER,
            "n0nce",
            KEY,
            3000,
            &addrs,
        )
        .expect("sign");
        assert_eq!(
            check_encryption_request_hmac(&HmacSha256, &msg, addrs.station, addrs.access_point, KEY),
            Ok(())
        );
    }

    #[test]
    fn swapped_addresses_fail() {
        let addrs = local();
        let msg =
            encryption_request_hmac_message(&HmacSha256, ENCRYPTION_REQUEST_HEADER, "abc", KEY, 0, &addrs)
                .expect("sign");
        assert!(!verify_encryption_request_hmac(
            &HmacSha256,
            &msg,
            addrs.access_point,
            addrs.station,
            KEY
        ));
    }

    #[test]
    fn unsafe_nonce_is_not_signed() {
        assert_eq!(
            RequestAuthenticator::new(HmacSha256, KEY.to_vec())
                .sign_request(ENCRYPTION_REQUEST_HEADER, "a,\"hmac\":\"x", 0, &local()),
            Err(AuthError::Build(BuildError::UnsafeValue(FieldId::Nonce)))
        );
    }

    #[test]
    fn missing_tag_is_reported() {
        let msg =
            builder::encryption_request_message(ENCRYPTION_REQUEST_HEADER, "abc", 0).expect("message");
        let addrs = local();
        assert_eq!(
            check_encryption_request_hmac(&HmacSha256, &msg, addrs.station, addrs.access_point, KEY),
            Err(AuthError::MissingTag)
        );
    }

    #[test]
    fn authenticator_round_trip() {
        let auth = RequestAuthenticator::new(HmacSha256, KEY.to_vec());
        let addrs = local();
        let msg = auth.sign_request(ENCRYPTION_REQUEST_HEADER, "abc", 0, &addrs).expect("sign");
        assert!(auth.verify_request(&msg, &addrs));
        let other = RequestAuthenticator::new(HmacSha256, b"other key".to_vec());
        assert_eq!(other.check_request(&msg, &addrs), Err(AuthError::TagMismatch));
        assert!(!format!("{auth:?}").contains("mesh hash key"));
    }
}
