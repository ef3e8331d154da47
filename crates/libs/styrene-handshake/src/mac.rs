//! Hardware addresses and their fixed text form.
//!
//! On the wire an address is always 12 hex characters with no separators.
//! Output is uppercase; input is accepted in either case.

use core::fmt;
use core::str::FromStr;

use crate::error::MacParseError;

/// Length of an encoded address.
pub const MAC_STRING_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// 12-character uppercase hex form.
    pub fn to_wire(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != MAC_STRING_LEN {
            return Err(MacParseError::BadLength(s.len()));
        }
        let mut bytes = [0u8; 6];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| MacParseError::InvalidHex)?;
        Ok(Self(bytes))
    }
}

/// Supplies the local interface addresses that an authenticated request is
/// bound to.
pub trait AddressProvider {
    fn station_mac(&self) -> MacAddress;
    fn access_point_mac(&self) -> MacAddress;
}

/// A device's station and soft-AP interface addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceAddresses {
    pub station: MacAddress,
    pub access_point: MacAddress,
}

impl DeviceAddresses {
    pub fn new(station: impl Into<MacAddress>, access_point: impl Into<MacAddress>) -> Self {
        Self { station: station.into(), access_point: access_point.into() }
    }

    /// Station address followed by AP address, as fed to the keyed hash.
    pub fn binding_prefix(&self) -> String {
        let mut out = String::with_capacity(2 * MAC_STRING_LEN);
        out.push_str(&self.station.to_wire());
        out.push_str(&self.access_point.to_wire());
        out
    }
}

impl AddressProvider for DeviceAddresses {
    fn station_mac(&self) -> MacAddress {
        self.station
    }

    fn access_point_mac(&self) -> MacAddress {
        self.access_point
    }
}
