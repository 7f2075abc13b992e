// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Wire encoding for the integer fields of [Output](crate::vdf::Output) and
//! [Proof](crate::vdf::Proof). The tuple (x, h, t, n, pi, l) must
//! deserialize to the same integers on every platform, and a value must
//! have exactly one encoding: two byte strings for the same x would let a
//! relayed proof change bytes without changing meaning. Fields are
//! therefore serialized as minimal big-endian bytes (the same convention
//! the challenge transcript uses), and deserialization rejects any
//! non-minimal encoding instead of silently normalizing it.

use num_bigint::BigUint;
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};

pub(crate) fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_bytes(&value.to_bytes_be())
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
where
    D: Deserializer<'de>,
{
    let bytes = <Vec<u8>>::deserialize(deserializer)?;
    if bytes.is_empty() {
        return Err(D::Error::custom("empty integer encoding"));
    }
    // Minimal form: only the encoding of zero may start with a zero byte.
    if bytes.len() > 1 && bytes[0] == 0 {
        return Err(D::Error::custom("integer encoding has leading zeros"));
    }
    Ok(BigUint::from_bytes_be(&bytes))
}
