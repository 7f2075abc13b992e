// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Montgomery reduction for odd moduli. A [MontgomeryReducer] precomputes
//! R = 2^rBits (the smallest such power exceeding the modulus) and
//! n' = (-n^-1) mod R, after which modular multiplication only needs
//! masking and shifting instead of trial division.
//!
//! Reducers are immutable once constructed, so repeated computations with
//! the same modulus share a single instance through a small process-wide
//! cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;

use crate::error::{VdfError, VdfResult};

/// Below this modulus size the conversion overhead of Montgomery form
/// outweighs the cheaper multiplications.
pub(crate) const MONTGOMERY_MIN_MODULUS_BITS: u64 = 1024;

/// Minimum number of sequential squarings before evaluation and proving
/// switch to Montgomery arithmetic.
pub(crate) const MONTGOMERY_MIN_SQUARINGS: u64 = 5000;

/// Minimum exponent size in bits before modular exponentiation switches to
/// Montgomery arithmetic.
pub(crate) const MONTGOMERY_MIN_EXPONENT_BITS: u64 = 128;

/// Number of reducers kept in the process-wide cache. Once full, new
/// reducers are constructed on demand but no longer cached.
const REDUCER_CACHE_SIZE: usize = 10;

lazy_static! {
    static ref REDUCER_CACHE: Mutex<HashMap<BigUint, Arc<MontgomeryReducer>>> =
        Mutex::new(HashMap::new());
}

/// Precomputed constants for Montgomery reduction modulo a fixed odd
/// modulus n: the number of bits in R, the mask R - 1 and the negated
/// inverse n' = (-n^-1) mod R.
#[derive(Debug, Eq, PartialEq)]
pub struct MontgomeryReducer {
    modulus: BigUint,
    r_bits: u64,
    r_mask: BigUint,
    n_prime: BigUint,
}

impl MontgomeryReducer {
    /// Create a reducer for the given modulus. Fails with
    /// [VdfError::EvenModulus] if the modulus is even and
    /// [VdfError::InvalidInput] if it is not greater than one.
    pub fn new(modulus: BigUint) -> VdfResult<Self> {
        if modulus <= BigUint::one() {
            return Err(VdfError::InvalidInput);
        }
        if modulus.is_even() {
            return Err(VdfError::EvenModulus);
        }

        // The smallest k with 2^k > n.
        let r_bits = modulus.bits();
        let r = BigUint::one() << r_bits;
        let r_mask = &r - 1u32;

        // Hensel lifting: each step doubles the number of correct low bits
        // of n^-1 mod R, starting from n^-1 = 1 (mod 2).
        let mut n_inv = BigUint::one();
        for _ in 0..r_bits {
            let product = (&modulus * &n_inv) & &r_mask;
            let correction = (&r + 2u32 - product) & &r_mask;
            n_inv = (n_inv * correction) & &r_mask;
        }
        let n_prime = (&r - &n_inv) & &r_mask;

        Ok(Self {
            modulus,
            r_bits,
            r_mask,
            n_prime,
        })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Map a residue into Montgomery form: (a * R) mod n.
    pub fn to_montgomery(&self, a: &BigUint) -> BigUint {
        (a << self.r_bits) % &self.modulus
    }

    /// The multiplicative identity in Montgomery form, R mod n.
    pub fn one(&self) -> BigUint {
        self.to_montgomery(&BigUint::one())
    }

    /// Montgomery reduction: returns x * R^-1 mod n for 0 <= x < n * R.
    pub fn reduce(&self, x: BigUint) -> BigUint {
        debug_assert!(x < (&self.modulus << self.r_bits));
        let m = ((&x & &self.r_mask) * &self.n_prime) & &self.r_mask;
        let t = (x + m * &self.modulus) >> self.r_bits;
        if t >= self.modulus {
            t - &self.modulus
        } else {
            t
        }
    }

    /// Map a value out of Montgomery form.
    pub fn from_montgomery(&self, a: &BigUint) -> BigUint {
        self.reduce(a.clone())
    }

    /// Multiply two values in Montgomery form.
    pub fn multiply(&self, a: &BigUint, b: &BigUint) -> BigUint {
        self.reduce(a * b)
    }

    /// Square a value in Montgomery form.
    pub fn square(&self, a: &BigUint) -> BigUint {
        self.reduce(a * a)
    }
}

/// Return the shared reducer for the given modulus, constructing and
/// caching it on first use. When the cache is at capacity the reducer is
/// constructed but not retained. Concurrent first calls with the same
/// modulus may construct duplicate reducers, which is harmless since
/// reducers are immutable.
pub fn cached_reducer(modulus: &BigUint) -> VdfResult<Arc<MontgomeryReducer>> {
    let mut cache = REDUCER_CACHE.lock().expect("reducer cache mutex poisoned");
    if let Some(reducer) = cache.get(modulus) {
        return Ok(Arc::clone(reducer));
    }
    let reducer = Arc::new(MontgomeryReducer::new(modulus.clone())?);
    if cache.len() < REDUCER_CACHE_SIZE {
        cache.insert(modulus.clone(), Arc::clone(&reducer));
    }
    Ok(reducer)
}

/// Whether a chain of `iterations` sequential squarings modulo `modulus`
/// should run in Montgomery form.
pub(crate) fn prefer_montgomery_for_squarings(modulus: &BigUint, iterations: u64) -> bool {
    modulus.is_odd()
        && modulus.bits() >= MONTGOMERY_MIN_MODULUS_BITS
        && iterations >= MONTGOMERY_MIN_SQUARINGS
}

/// Whether an exponentiation with the given exponent modulo `modulus`
/// should run in Montgomery form.
pub(crate) fn prefer_montgomery_for_exponent(modulus: &BigUint, exponent: &BigUint) -> bool {
    modulus.is_odd()
        && modulus.bits() >= MONTGOMERY_MIN_MODULUS_BITS
        && exponent.bits() >= MONTGOMERY_MIN_EXPONENT_BITS
}
