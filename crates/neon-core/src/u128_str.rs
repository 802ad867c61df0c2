// SPDX-License-Identifier: AGPL-3.0-only
//! Serde adapter for `u128`: serialize as a decimal string, deserialize from a
//! string or an integer. JSON and TOML have no native 128-bit integers.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;

pub fn serialize<S: Serializer>(val: &u128, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&val.to_string())
}

pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
    struct U128Visitor;

    impl<'de> Visitor<'de> for U128Visitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a u128 as a decimal string or integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
            v.trim().parse().map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
            Ok(u128::from(v))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
            u128::try_from(v).map_err(|_| E::custom("negative value for u128"))
        }
    }

    d.deserialize_any(U128Visitor)
}
