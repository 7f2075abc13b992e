// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Primality testing and prime search. Candidates are first sieved by
//! trial division against all primes below 1000 and then subjected to
//! Miller-Rabin: below a known bound the first twelve primes form a
//! deterministic witness set, above it witnesses are drawn uniformly at
//! random. Prime walks (`next_prime`, `get_prime`) step through a mod-210
//! wheel so only candidates coprime to 2*3*5*7 are ever tested.

use lazy_static::lazy_static;
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{Num, One, ToPrimitive, Zero};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{VdfError, VdfResult};
use crate::math::modpow::mod_pow;

/// Default number of Miller-Rabin rounds in the probabilistic regime.
pub const MILLER_RABIN_ROUNDS: usize = 32;

/// Default bit length for [get_prime].
pub const DEFAULT_PRIME_BITS: u64 = 256;

/// The wheel modulus 2 * 3 * 5 * 7.
const WHEEL_MODULUS: u64 = 210;

/// Witnesses which make a single Miller-Rabin pass deterministic for all
/// n below [DETERMINISTIC_WITNESS_BOUND].
const DETERMINISTIC_WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

lazy_static! {
    /// All primes below 1000, used for trial division.
    static ref SMALL_PRIMES: Vec<u64> = small_primes_below(1000);

    /// The 48 residues modulo 210 which are coprime to 210, sorted.
    static ref WHEEL_RESIDUES: Vec<u64> = (1..WHEEL_MODULUS)
        .filter(|r| r % 2 != 0 && r % 3 != 0 && r % 5 != 0 && r % 7 != 0)
        .collect();

    /// Circular differences between consecutive wheel residues.
    static ref WHEEL_INCREMENTS: Vec<u64> = (0..WHEEL_RESIDUES.len())
        .map(|i| {
            (WHEEL_RESIDUES[(i + 1) % WHEEL_RESIDUES.len()] + WHEEL_MODULUS - WHEEL_RESIDUES[i])
                % WHEEL_MODULUS
        })
        .collect();

    /// Largest known bound below which the twelve-prime witness set is
    /// deterministic (Sorenson & Webster).
    static ref DETERMINISTIC_WITNESS_BOUND: BigUint =
        BigUint::from_str_radix("318665857834031151167461", 10).unwrap();
}

fn small_primes_below(limit: usize) -> Vec<u64> {
    let mut is_composite = vec![false; limit];
    let mut primes = Vec::new();
    for n in 2..limit {
        if is_composite[n] {
            continue;
        }
        primes.push(n as u64);
        for multiple in (n * n..limit).step_by(n) {
            is_composite[multiple] = true;
        }
    }
    primes
}

/// The smallest q >= n with q coprime to 210, together with the index of
/// its residue in the wheel. Callers must ensure n is at least 1.
pub fn align_to_wheel(n: &BigUint) -> (BigUint, usize) {
    let remainder = (n % WHEEL_MODULUS)
        .to_u64()
        .expect("remainder fits in u64");
    match WHEEL_RESIDUES.binary_search(&remainder) {
        Ok(index) => (n.clone(), index),
        // The insertion point is always in range: the largest wheel residue
        // is 209, so no remainder can sort past the end of the table.
        Err(index) => (n + (WHEEL_RESIDUES[index] - remainder), index),
    }
}

/// A single Miller-Rabin round for odd n > 2 with n - 1 = 2^s * d, d odd.
/// Returns true if n passes for the given witness.
pub fn miller_rabin_round(n: &BigUint, d: &BigUint, s: u64, witness: &BigUint) -> bool {
    let n_minus_one = n - 1u32;
    let mut x = mod_pow(witness, d, n);
    if x.is_one() || x == n_minus_one {
        return true;
    }
    for _ in 1..s {
        x = &x * &x % n;
        if x == n_minus_one {
            return true;
        }
        if x.is_one() {
            return false;
        }
    }
    false
}

/// Primality test with the default number of rounds.
pub fn is_prime(n: &BigUint) -> bool {
    is_prime_with_rounds(n, MILLER_RABIN_ROUNDS)
}

/// Primality test: trial division below 1000, then Miller-Rabin. Below
/// [DETERMINISTIC_WITNESS_BOUND] the answer is exact; above it, a composite
/// survives all `rounds` random witnesses with probability at most 4^-rounds.
pub fn is_prime_with_rounds(n: &BigUint, rounds: usize) -> bool {
    let two = BigUint::from(2u8);
    if *n < two {
        return false;
    }
    if *n == two || *n == BigUint::from(3u8) {
        return true;
    }
    if n.is_even() {
        return false;
    }
    for &p in SMALL_PRIMES.iter() {
        if (n % p).is_zero() {
            return *n == BigUint::from(p);
        }
    }

    let n_minus_one = n - 1u32;
    let s = n_minus_one
        .trailing_zeros()
        .expect("n - 1 is positive and even");
    let d = &n_minus_one >> s;

    if *n < *DETERMINISTIC_WITNESS_BOUND {
        for &a in DETERMINISTIC_WITNESSES.iter() {
            let witness = BigUint::from(a);
            if witness >= n_minus_one {
                break;
            }
            if !miller_rabin_round(n, &d, s, &witness) {
                return false;
            }
        }
        return true;
    }

    let mut rng = OsRng;
    for _ in 0..rounds {
        let witness = rng.gen_biguint_range(&two, &n_minus_one);
        if !miller_rabin_round(n, &d, s, &witness) {
            return false;
        }
    }
    true
}

/// The smallest prime >= n, with the default number of rounds.
pub fn next_prime(n: &BigUint) -> BigUint {
    next_prime_with_rounds(n, MILLER_RABIN_ROUNDS)
}

/// The smallest prime >= n. Walks the mod-210 wheel from the aligned
/// candidate; since every prime above 7 is coprime to 210, the walk cannot
/// skip one.
pub fn next_prime_with_rounds(n: &BigUint, rounds: usize) -> BigUint {
    if *n <= BigUint::from(2u8) {
        return BigUint::from(2u8);
    }
    if *n == BigUint::from(3u8) {
        return BigUint::from(3u8);
    }
    if *n <= BigUint::from(5u8) {
        return BigUint::from(5u8);
    }
    if *n <= BigUint::from(7u8) {
        return BigUint::from(7u8);
    }
    let (mut candidate, mut index) = align_to_wheel(n);
    // With n > 7 the alignment lands on 11 or beyond.
    debug_assert!(candidate > BigUint::from(7u8));
    loop {
        if is_prime_with_rounds(&candidate, rounds) {
            return candidate;
        }
        candidate += WHEEL_INCREMENTS[index];
        index = (index + 1) % WHEEL_INCREMENTS.len();
    }
}

/// A random prime of exactly `bits` bits, with the default number of
/// rounds.
pub fn get_prime(bits: u64) -> VdfResult<BigUint> {
    get_prime_with_rounds(bits, MILLER_RABIN_ROUNDS)
}

/// A random prime of exactly `bits` bits (`bits` must be at least 8).
/// Samples bytes from the system RNG, forces the top bit for length and the
/// low bit for oddness, and walks the wheel until a prime is found,
/// resampling whenever the walk would exceed 2^bits - 1.
pub fn get_prime_with_rounds(bits: u64, rounds: usize) -> VdfResult<BigUint> {
    if bits < 8 {
        return Err(VdfError::InvalidInput);
    }
    let byte_length = ((bits + 7) / 8) as usize;
    let limit = (BigUint::one() << bits) - 1u32;
    let mut rng = OsRng;
    loop {
        let mut bytes = vec![0u8; byte_length];
        rng.fill_bytes(&mut bytes);
        bytes[0] |= 0x80;
        bytes[byte_length - 1] |= 0x01;
        let (mut candidate, mut index) = align_to_wheel(&BigUint::from_bytes_be(&bytes));
        while candidate <= limit {
            if is_prime_with_rounds(&candidate, rounds) {
                return Ok(candidate);
            }
            candidate += WHEEL_INCREMENTS[index];
            index = (index + 1) % WHEEL_INCREMENTS.len();
        }
    }
}
