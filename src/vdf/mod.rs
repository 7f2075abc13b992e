// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Wesolowski's VDF construction (<https://eprint.iacr.org/2018/623>) over
//! an RSA group of unknown order. Evaluation computes h = x^(2^t) mod n by
//! t sequential squarings; the proof pi = x^(2^t div l) for a Fiat-Shamir
//! challenge prime l lets a verifier check the result with two small
//! exponentiations via pi^l * x^(2^t mod l) == h (mod n).

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::biguint_serde;
use crate::error::{VdfError, VdfResult};
use crate::math::modpow::{mod_pow, mod_pow_product};
use crate::math::montgomery::{cached_reducer, prefer_montgomery_for_squarings};
use crate::math::prime::is_prime;

pub mod fiat_shamir;

pub use fiat_shamir::{derive_challenge, Nonce, NONCE_LENGTH};

/// A VDF instance over the group Z/nZ, evaluating inputs with a fixed
/// number of sequential squarings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WesolowskiVdf {
    modulus: BigUint,
    iterations: u64,
}

impl WesolowskiVdf {
    /// Create a VDF for the given modulus and delay parameter. Fails if the
    /// modulus is not greater than one or the iteration count is zero.
    pub fn new(modulus: BigUint, iterations: u64) -> VdfResult<Self> {
        if modulus <= BigUint::one() || iterations == 0 {
            return Err(VdfError::InvalidInput);
        }
        Ok(Self {
            modulus,
            iterations,
        })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Evaluate the VDF: t sequential squarings of the input. Fails on an
    /// input outside (0, n) or one sharing a factor with the modulus.
    pub fn evaluate(&self, input: &BigUint) -> VdfResult<Output> {
        self.evaluate_with(
            input,
            prefer_montgomery_for_squarings(&self.modulus, self.iterations),
        )
    }

    pub(crate) fn evaluate_with(&self, input: &BigUint, use_montgomery: bool) -> VdfResult<Output> {
        if input.is_zero() || *input >= self.modulus || !input.gcd(&self.modulus).is_one() {
            return Err(VdfError::InvalidInput);
        }
        let output = if use_montgomery {
            let reducer = cached_reducer(&self.modulus)?;
            let mut h = reducer.to_montgomery(input);
            for _ in 0..self.iterations {
                h = reducer.square(&h);
            }
            reducer.from_montgomery(&h)
        } else {
            let mut h = input.clone();
            for _ in 0..self.iterations {
                h = &h * &h % &self.modulus;
            }
            h
        };
        Ok(Output {
            input: input.clone(),
            output,
            iterations: self.iterations,
            modulus: self.modulus.clone(),
        })
    }
}

/// The result of evaluating a VDF: the tuple (x, h, t, n) with
/// h = x^(2^t) mod n. Self-contained, so it can be relayed to verifiers
/// without the originating [WesolowskiVdf] instance.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Output {
    #[serde(with = "biguint_serde")]
    input: BigUint,
    #[serde(with = "biguint_serde")]
    output: BigUint,
    iterations: u64,
    #[serde(with = "biguint_serde")]
    modulus: BigUint,
}

impl Output {
    /// Assemble an output received from a prover. No validation is
    /// performed here; [Proof::verify] checks all bounds.
    pub fn new(input: BigUint, output: BigUint, iterations: u64, modulus: BigUint) -> Self {
        Self {
            input,
            output,
            iterations,
            modulus,
        }
    }

    pub fn input(&self) -> &BigUint {
        &self.input
    }

    pub fn output(&self) -> &BigUint {
        &self.output
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Derive the Fiat-Shamir challenge prime for this output under the
    /// given nonce.
    pub fn derive_challenge(&self, nonce: &Nonce) -> VdfResult<BigUint> {
        fiat_shamir::derive_challenge(self, nonce)
    }

    /// Compute the proof pi = x^(2^t div l) mod n by long division in the
    /// exponent: the quotient bits of 2^t / l are recovered one per
    /// squaring from the remainder stream, so no multi-precision division
    /// is needed. After iteration i the invariant pi = x^(2^i div l) and
    /// r = 2^i mod l holds; since r < l, the doubled remainder is below 2l
    /// and a single conditional subtraction extracts the quotient bit.
    pub fn prove(&self, challenge: &BigUint) -> BigUint {
        if prefer_montgomery_for_squarings(&self.modulus, self.iterations) {
            self.prove_montgomery(challenge)
        } else {
            self.prove_plain(challenge)
        }
    }

    fn prove_plain(&self, challenge: &BigUint) -> BigUint {
        let mut proof = BigUint::one();
        let mut remainder = BigUint::one();
        for _ in 0..self.iterations {
            proof = &proof * &proof % &self.modulus;
            remainder <<= 1;
            if remainder >= *challenge {
                remainder -= challenge;
                proof = proof * &self.input % &self.modulus;
            }
        }
        proof
    }

    /// Same loop with the proof accumulator and base kept in Montgomery
    /// form throughout; the remainder stream is plain integer arithmetic
    /// either way.
    fn prove_montgomery(&self, challenge: &BigUint) -> BigUint {
        let reducer = cached_reducer(&self.modulus).expect("modulus is odd and greater than one");
        let input = reducer.to_montgomery(&self.input);
        let mut proof = reducer.one();
        let mut remainder = BigUint::one();
        for _ in 0..self.iterations {
            proof = reducer.square(&proof);
            remainder <<= 1;
            if remainder >= *challenge {
                remainder -= challenge;
                proof = reducer.multiply(&proof, &input);
            }
        }
        reducer.from_montgomery(&proof)
    }

    /// Produce a full proof under a fresh random nonce.
    pub fn generate_proof(&self) -> VdfResult<Proof> {
        let mut nonce = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce);
        self.generate_proof_with_nonce(nonce)
    }

    /// Produce a full proof under the given nonce.
    pub fn generate_proof_with_nonce(&self, nonce: Nonce) -> VdfResult<Proof> {
        let challenge = fiat_shamir::derive_challenge(self, &nonce)?;
        let proof = self.prove(&challenge);
        Ok(Proof {
            output: self.clone(),
            proof,
            challenge,
            nonce,
        })
    }
}

/// An output together with its Wesolowski proof (pi, l, nonce).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    output: Output,
    #[serde(with = "biguint_serde")]
    proof: BigUint,
    #[serde(with = "biguint_serde")]
    challenge: BigUint,
    nonce: Nonce,
}

impl Proof {
    /// Assemble a proof received from a prover. No validation is performed
    /// here; [Proof::verify] checks all bounds.
    pub fn new(output: Output, proof: BigUint, challenge: BigUint, nonce: Nonce) -> Self {
        Self {
            output,
            proof,
            challenge,
            nonce,
        }
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn proof(&self) -> &BigUint {
        &self.proof
    }

    pub fn challenge(&self) -> &BigUint {
        &self.challenge
    }

    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// Check the proof equation pi^l * x^(2^t mod l) == h (mod n). Returns
    /// false for any failure, whether the proof is malformed or forged.
    pub fn verify(&self) -> bool {
        let modulus = &self.output.modulus;
        let input = &self.output.input;
        if self.proof.is_zero() || self.proof >= *modulus {
            return false;
        }
        if input.is_zero() || *input >= *modulus {
            return false;
        }
        if !input.gcd(modulus).is_one() {
            return false;
        }
        if self.challenge <= BigUint::from(2u8) || !is_prime(&self.challenge) {
            return false;
        }
        let remainder = mod_pow(
            &BigUint::from(2u8),
            &BigUint::from(self.output.iterations),
            &self.challenge,
        );
        mod_pow_product(&self.proof, &self.challenge, input, &remainder, modulus)
            == self.output.output
    }

    /// Re-derive the challenge from the transcript and reject the proof if
    /// it does not match the one supplied, then verify. This binds the
    /// proof to the exact (x, h, t, n, nonce) tuple.
    pub fn verify_with_challenge(&self) -> bool {
        match fiat_shamir::derive_challenge(&self.output, &self.nonce) {
            Ok(expected) if expected == self.challenge => self.verify(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modulus::RSA_2048;
    use num_traits::Num;

    fn test_modulus() -> BigUint {
        BigUint::from(1000000007u64) * BigUint::from(1000000009u64)
    }

    #[test]
    fn test_new_rejects_bad_parameters() {
        assert_eq!(
            WesolowskiVdf::new(BigUint::one(), 100),
            Err(VdfError::InvalidInput)
        );
        assert_eq!(
            WesolowskiVdf::new(test_modulus(), 0),
            Err(VdfError::InvalidInput)
        );
    }

    #[test]
    fn test_evaluate_rejects_bad_inputs() {
        let vdf = WesolowskiVdf::new(test_modulus(), 10).unwrap();
        assert_eq!(vdf.evaluate(&BigUint::zero()), Err(VdfError::InvalidInput));
        assert_eq!(vdf.evaluate(&test_modulus()), Err(VdfError::InvalidInput));
        assert_eq!(
            vdf.evaluate(&(test_modulus() + 1u32)),
            Err(VdfError::InvalidInput)
        );
        // Shares the factor 1000000007 with the modulus.
        assert_eq!(
            vdf.evaluate(&BigUint::from(2000000014u64)),
            Err(VdfError::InvalidInput)
        );
    }

    #[test]
    fn test_evaluate_matches_nested_squaring() {
        let vdf = WesolowskiVdf::new(test_modulus(), 1).unwrap();
        let x = BigUint::from(123456791u64);
        assert_eq!(
            *vdf.evaluate(&x).unwrap().output(),
            &x * &x % test_modulus()
        );

        for iterations in [2u64, 5, 20] {
            let vdf = WesolowskiVdf::new(test_modulus(), iterations).unwrap();
            let mut expected = x.clone();
            for _ in 0..iterations {
                expected = &expected * &expected % test_modulus();
            }
            assert_eq!(*vdf.evaluate(&x).unwrap().output(), expected);
        }
    }

    #[test]
    fn test_small_modulus_roundtrip() {
        let vdf = WesolowskiVdf::new(test_modulus(), 100).unwrap();
        let output = vdf.evaluate(&BigUint::from(123456791u64)).unwrap();
        assert_eq!(*output.output(), BigUint::from(88277232044572677u64));

        let proof = output.generate_proof().unwrap();
        assert!(proof.verify());
        assert!(proof.verify_with_challenge());
    }

    #[test]
    fn test_fixed_nonce_regression() {
        let vdf = WesolowskiVdf::new(test_modulus(), 600).unwrap();
        let output = vdf.evaluate(&BigUint::from(123456791u64)).unwrap();
        assert_eq!(*output.output(), BigUint::from(144931457302542105u64));

        let proof = output.generate_proof_with_nonce([0u8; NONCE_LENGTH]).unwrap();
        assert_eq!(
            *proof.challenge(),
            BigUint::from_str_radix(
                concat!(
                    "99338048050269071401869268249666350450304292148555187450482394110440325861279",
                    "9291276661088253495260773343627480142293148278660418998803376592111096401977"
                ),
                10
            )
            .unwrap()
        );
        assert_eq!(*proof.proof(), BigUint::from(251834083316364245u64));
        assert!(proof.verify());
        assert!(proof.verify_with_challenge());
    }

    #[test]
    fn test_tampered_proof_is_rejected() {
        let vdf = WesolowskiVdf::new(test_modulus(), 100).unwrap();
        let output = vdf.evaluate(&BigUint::from(123456791u64)).unwrap();
        let proof = output.generate_proof().unwrap();

        let tampered = Proof::new(
            proof.output().clone(),
            proof.proof() + 1u32,
            proof.challenge().clone(),
            *proof.nonce(),
        );
        assert!(!tampered.verify());
    }

    #[test]
    fn test_tampered_output_is_rejected() {
        let vdf = WesolowskiVdf::new(test_modulus(), 100).unwrap();
        let output = vdf.evaluate(&BigUint::from(123456791u64)).unwrap();
        let proof = output.generate_proof().unwrap();

        let tampered_output = Output::new(
            output.input().clone(),
            output.output() + 1u32,
            output.iterations(),
            output.modulus().clone(),
        );
        let tampered = Proof::new(
            tampered_output,
            proof.proof().clone(),
            proof.challenge().clone(),
            *proof.nonce(),
        );
        assert!(!tampered.verify());
    }

    #[test]
    fn test_tampered_challenge_is_rejected() {
        let vdf = WesolowskiVdf::new(test_modulus(), 100).unwrap();
        let output = vdf.evaluate(&BigUint::from(123456791u64)).unwrap();
        let proof = output.generate_proof().unwrap();

        // A nearby (likely prime) challenge passes the primality check but
        // no longer matches the transcript.
        let tampered = Proof::new(
            proof.output().clone(),
            proof.proof().clone(),
            proof.challenge() + 2u32,
            *proof.nonce(),
        );
        assert!(!tampered.verify_with_challenge());
    }

    #[test]
    fn test_tampered_nonce_is_rejected() {
        let vdf = WesolowskiVdf::new(test_modulus(), 100).unwrap();
        let output = vdf.evaluate(&BigUint::from(123456791u64)).unwrap();
        let proof = output.generate_proof_with_nonce([7u8; NONCE_LENGTH]).unwrap();

        let tampered = Proof::new(
            proof.output().clone(),
            proof.proof().clone(),
            proof.challenge().clone(),
            [8u8; NONCE_LENGTH],
        );
        assert!(!tampered.verify_with_challenge());
    }

    #[test]
    fn test_proof_equation_identity() {
        let vdf = WesolowskiVdf::new(test_modulus(), 50).unwrap();
        let output = vdf.evaluate(&BigUint::from(7u8)).unwrap();
        let nonce = [42u8; NONCE_LENGTH];
        let challenge = output.derive_challenge(&nonce).unwrap();
        let proof = output.prove(&challenge);

        let remainder = mod_pow(
            &BigUint::from(2u8),
            &BigUint::from(50u8),
            &challenge,
        );
        let lhs = mod_pow(&proof, &challenge, &test_modulus())
            * mod_pow(&BigUint::from(7u8), &remainder, &test_modulus())
            % test_modulus();
        assert_eq!(lhs, *output.output());
    }

    #[test]
    fn test_rsa_2048_smoke() {
        let vdf = WesolowskiVdf::new(RSA_2048.value.clone(), 300).unwrap();
        let output = vdf.evaluate(&BigUint::from(2u8)).unwrap();
        assert_eq!(
            *output.output(),
            BigUint::from_str_radix(
                concat!(
                    "c73c1b5d7600f8728d1afd4a0389395c57665fc95f62dfcbe71306382857aed1d3f2c8546210",
                    "a504f6d7eccbbbca3be9f751b682ff986292c6e2f96dcac12c293c8627825c7f7e1f51f4f418",
                    "1149508b0e2d72d7370232d8ed9675a4355d2a43d42d09b957cd02bf0fa6f0f362b9f729bb24",
                    "3c2fa7673c98691b12a38afb696b6e55874e02e76b534c6f3f85c9b34c802cf37448570fca3f",
                    "243b4522f65e9143a72bd0cccbb710bddddfd65c33927663ce16449cf490a4604aee8192da88",
                    "cfd60aac89837dbdfbf945f03584b26ddd89e50a19266ecdd3016940f1d6b7e2e8f086c92406",
                    "bd556856a581c76a2272d9173901e9f8a23821cb4c19b13230970436"
                ),
                16
            )
            .unwrap()
        );

        let proof = output.generate_proof().unwrap();
        assert!(proof.verify());
        assert!(proof.verify_with_challenge());
    }

    #[test]
    fn test_montgomery_and_plain_evaluation_agree() {
        // Below the routing thresholds, force both paths explicitly.
        let vdf = WesolowskiVdf::new(RSA_2048.value.clone(), 50).unwrap();
        let x = BigUint::from(123456789u64);
        let plain = vdf.evaluate_with(&x, false).unwrap();
        let montgomery = vdf.evaluate_with(&x, true).unwrap();
        assert_eq!(plain, montgomery);
    }

    #[test]
    fn test_montgomery_and_plain_proofs_agree() {
        let vdf = WesolowskiVdf::new(RSA_2048.value.clone(), 50).unwrap();
        let output = vdf.evaluate(&BigUint::from(123456789u64)).unwrap();
        let challenge = output.derive_challenge(&[0u8; NONCE_LENGTH]).unwrap();
        assert_eq!(
            output.prove_plain(&challenge),
            output.prove_montgomery(&challenge)
        );
    }

    #[test]
    fn test_proof_serialization_roundtrip() {
        let vdf = WesolowskiVdf::new(test_modulus(), 100).unwrap();
        let output = vdf.evaluate(&BigUint::from(123456791u64)).unwrap();
        let proof = output.generate_proof_with_nonce([3u8; NONCE_LENGTH]).unwrap();

        let bytes = bcs::to_bytes(&proof).unwrap();
        let restored: Proof = bcs::from_bytes(&bytes).unwrap();
        assert_eq!(proof, restored);
        assert!(restored.verify_with_challenge());
    }
}
