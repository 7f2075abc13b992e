// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Modular exponentiation with a sliding window over the exponent bits and
//! optional Montgomery arithmetic for large odd moduli. Also provides a
//! simultaneous two-base exponentiation a^e * b^f mod m (Shamir's trick)
//! which verification uses to check the proof equation with a single scan
//! of both exponents.

use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::math::montgomery::{cached_reducer, prefer_montgomery_for_exponent, MontgomeryReducer};

/// Multiplication strategy shared by the exponentiation loops. Values are
/// kept in the strategy's internal representation; callers convert in and
/// out at the boundary.
trait ModMul {
    fn one(&self) -> BigUint;
    fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint;
    fn square(&self, a: &BigUint) -> BigUint;
}

struct PlainMul<'a> {
    modulus: &'a BigUint,
}

impl ModMul for PlainMul<'_> {
    fn one(&self) -> BigUint {
        BigUint::one() % self.modulus
    }

    fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        a * b % self.modulus
    }

    fn square(&self, a: &BigUint) -> BigUint {
        a * a % self.modulus
    }
}

struct MontgomeryMul {
    reducer: Arc<MontgomeryReducer>,
}

impl ModMul for MontgomeryMul {
    fn one(&self) -> BigUint {
        self.reducer.one()
    }

    fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        self.reducer.multiply(a, b)
    }

    fn square(&self, a: &BigUint) -> BigUint {
        self.reducer.square(a)
    }
}

/// Sliding window width for a given exponent size. The first entry is only
/// reachable through the windowed path if the plain binary cutoff changes.
fn window_width(exponent_bits: u64) -> usize {
    if exponent_bits <= 32 {
        1
    } else if exponent_bits <= 96 {
        3
    } else if exponent_bits <= 384 {
        4
    } else if exponent_bits <= 1024 {
        5
    } else {
        6
    }
}

/// Exponents at most this many bits use plain binary square-and-multiply;
/// the window bookkeeping does not pay off below it.
const PLAIN_BINARY_MAX_BITS: u64 = 64;

/// Compute base^exponent mod modulus.
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    if modulus.is_one() {
        return BigUint::zero();
    }
    if exponent.is_zero() {
        return BigUint::one() % modulus;
    }
    let base = base % modulus;
    if exponent.is_one() {
        return base;
    }
    if *exponent == BigUint::from(2u8) {
        return &base * &base % modulus;
    }
    if exponent.bits() <= PLAIN_BINARY_MAX_BITS {
        return binary_pow(&base, exponent, &PlainMul { modulus });
    }
    mod_pow_windowed(&base, exponent, modulus, prefer_montgomery_for_exponent(modulus, exponent))
}

/// Compute a^e * b^f mod modulus with a single interleaved scan of both
/// exponents.
pub fn mod_pow_product(
    a: &BigUint,
    e: &BigUint,
    b: &BigUint,
    f: &BigUint,
    modulus: &BigUint,
) -> BigUint {
    if modulus.is_one() {
        return BigUint::zero();
    }
    let bits = e.bits().max(f.bits());
    if bits == 0 {
        return BigUint::one() % modulus;
    }
    let a = a % modulus;
    let b = b % modulus;
    let longer = if e.bits() >= f.bits() { e } else { f };
    if prefer_montgomery_for_exponent(modulus, longer) {
        let reducer = cached_reducer(modulus).expect("modulus is odd and greater than one");
        let mul = MontgomeryMul {
            reducer: Arc::clone(&reducer),
        };
        let result = interleaved_pow(
            &reducer.to_montgomery(&a),
            e,
            &reducer.to_montgomery(&b),
            f,
            &mul,
        );
        reducer.from_montgomery(&result)
    } else {
        interleaved_pow(&a, e, &b, f, &PlainMul { modulus })
    }
}

pub(crate) fn mod_pow_windowed(
    base: &BigUint,
    exponent: &BigUint,
    modulus: &BigUint,
    use_montgomery: bool,
) -> BigUint {
    if use_montgomery {
        let reducer = cached_reducer(modulus).expect("modulus is odd and greater than one");
        let mul = MontgomeryMul {
            reducer: Arc::clone(&reducer),
        };
        let result = windowed_pow(&reducer.to_montgomery(base), exponent, &mul);
        reducer.from_montgomery(&result)
    } else {
        windowed_pow(base, exponent, &PlainMul { modulus })
    }
}

/// Plain left-to-right square-and-multiply, scanning from the bit below the
/// most significant one.
fn binary_pow(base: &BigUint, exponent: &BigUint, mul: &impl ModMul) -> BigUint {
    let mut result = base.clone();
    for i in (0..exponent.bits() - 1).rev() {
        result = mul.square(&result);
        if exponent.bit(i) {
            result = mul.mul(&result, base);
        }
    }
    result
}

/// Sliding-window exponentiation. Precomputes the odd powers base^1,
/// base^3, ..., base^(2^w - 1); on a zero bit squares once, on a one bit
/// consumes a window of up to w bits trimmed to end in a one, squaring once
/// per bit covered and multiplying by the matching table entry.
fn windowed_pow(base: &BigUint, exponent: &BigUint, mul: &impl ModMul) -> BigUint {
    let width = window_width(exponent.bits());
    let base_squared = mul.square(base);
    let mut odd_powers = Vec::with_capacity(1 << (width - 1));
    odd_powers.push(base.clone());
    for k in 1..(1 << (width - 1)) {
        let next = mul.mul(&odd_powers[k - 1], &base_squared);
        odd_powers.push(next);
    }

    let mut result = mul.one();
    let mut i = exponent.bits() as i64 - 1;
    while i >= 0 {
        if !exponent.bit(i as u64) {
            result = mul.square(&result);
            i -= 1;
            continue;
        }
        let mut j = (i - width as i64 + 1).max(0);
        while !exponent.bit(j as u64) {
            j += 1;
        }
        let mut window_value = 0usize;
        for k in (j..=i).rev() {
            window_value = (window_value << 1) | usize::from(exponent.bit(k as u64));
        }
        for _ in j..=i {
            result = mul.square(&result);
        }
        result = mul.mul(&result, &odd_powers[window_value >> 1]);
        i = j - 1;
    }
    result
}

/// Shamir's trick: one squaring chain serves both exponents, multiplying by
/// a, b or ab depending on the current bit pair.
fn interleaved_pow(
    a: &BigUint,
    e: &BigUint,
    b: &BigUint,
    f: &BigUint,
    mul: &impl ModMul,
) -> BigUint {
    let ab = mul.mul(a, b);
    let mut result = mul.one();
    for i in (0..e.bits().max(f.bits())).rev() {
        result = mul.square(&result);
        match (e.bit(i), f.bit(i)) {
            (true, true) => result = mul.mul(&result, &ab),
            (true, false) => result = mul.mul(&result, a),
            (false, true) => result = mul.mul(&result, b),
            (false, false) => {}
        }
    }
    result
}
