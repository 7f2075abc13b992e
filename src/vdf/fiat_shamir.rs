// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fiat-Shamir challenge derivation. The challenge prime is derived from a
//! canonical byte transcript of the full computation, so any party can
//! recompute it and any change to the input, output, iteration count,
//! modulus or nonce yields a different challenge. The transcript layout is
//! consensus-critical and must not change:
//!
//! ```text
//! "wesolowski-v1" || X || H || T || N || NONCE
//! ```
//!
//! where X, H and N are big-endian and zero-padded to the byte length of
//! the modulus, T is the iteration count as an 8-byte big-endian integer
//! and NONCE is exactly 32 bytes.

use num_bigint::BigUint;
use sha2::{Digest, Sha512};

use crate::error::VdfResult;
use crate::math::bigint_utils::{byte_length, to_fixed_bytes_be};
use crate::math::prime::next_prime;
use crate::vdf::Output;

/// Domain separation tag, hashed without a length prefix or terminator.
pub const CHALLENGE_TAG: &[u8; 13] = b"wesolowski-v1";

/// Length of the challenge nonce in bytes.
pub const NONCE_LENGTH: usize = 32;

/// A challenge nonce. The fixed-size type guarantees the transcript layout
/// at compile time.
pub type Nonce = [u8; NONCE_LENGTH];

/// Serialize the challenge transcript for the given output and nonce.
pub(crate) fn encode_transcript(output: &Output, nonce: &Nonce) -> VdfResult<Vec<u8>> {
    let field_length = byte_length(output.modulus());
    let mut payload =
        Vec::with_capacity(CHALLENGE_TAG.len() + 3 * field_length + 8 + NONCE_LENGTH);
    payload.extend_from_slice(CHALLENGE_TAG);
    payload.extend_from_slice(&to_fixed_bytes_be(output.input(), field_length)?);
    payload.extend_from_slice(&to_fixed_bytes_be(output.output(), field_length)?);
    payload.extend_from_slice(&output.iterations().to_be_bytes());
    payload.extend_from_slice(&to_fixed_bytes_be(output.modulus(), field_length)?);
    payload.extend_from_slice(nonce);
    Ok(payload)
}

/// Derive the challenge prime: the smallest prime at or above the SHA-512
/// digest of the transcript, read as a big-endian integer. The digest is
/// far above 2, so the challenge is always an odd prime.
pub fn derive_challenge(output: &Output, nonce: &Nonce) -> VdfResult<BigUint> {
    let payload = encode_transcript(output, nonce)?;
    let digest = Sha512::digest(&payload);
    Ok(next_prime(&BigUint::from_bytes_be(&digest)))
}
