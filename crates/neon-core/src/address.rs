// SPDX-License-Identifier: AGPL-3.0-only
//! 20-byte account and contract identifiers.
//!
//! Addresses render as `0x`-prefixed lowercase hex and parse case-insensitively,
//! so checksummed forms such as `0x000000000000000000000000000000000000dEaD`
//! are accepted.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

/// Burn sink: tokens sent here are out of circulation but still counted in
/// total supply.
pub const BURN_ADDRESS: Address = Address([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xde, 0xad,
]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    #[error("address must start with 0x")]
    MissingPrefix,
    #[error("address must be {expected} hex chars, got {got}")]
    BadLength { expected: usize, got: usize },
    #[error("invalid hex in address: {0}")]
    BadHex(String),
}

impl Address {
    /// The null address.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Address::ZERO
    }

    /// Deterministic contract address: blake3(deployer || ":" || nonce), first 20 bytes.
    ///
    /// Same scheme for every contract kind, so a deployer's N-th deployment
    /// always lands on the same address regardless of what it deploys.
    pub fn derive_contract(deployer: &Address, nonce: u64) -> Self {
        let input = format!("{}:{}", deployer, nonce);
        Self::truncate_hash(blake3::hash(input.as_bytes()))
    }

    /// Address derived from a human-readable seed (test accounts, CLI scenarios).
    pub fn from_seed(seed: &str) -> Self {
        Self::truncate_hash(blake3::hash(seed.as_bytes()))
    }

    fn truncate_hash(hash: blake3::Hash) -> Self {
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(&hash.as_bytes()[..ADDRESS_LEN]);
        Address(out)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(AddressParseError::MissingPrefix)?;
        if body.len() != ADDRESS_LEN * 2 {
            return Err(AddressParseError::BadLength {
                expected: ADDRESS_LEN * 2,
                got: body.len(),
            });
        }
        let mut out = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(body, &mut out)
            .map_err(|e| AddressParseError::BadHex(e.to_string()))?;
        Ok(Address(out))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
