// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! An implementation of Wesolowski's verifiable delay function (VDF)
//! (<https://eprint.iacr.org/2018/623>) over RSA groups of unknown order.
//!
//! A VDF takes an input x and a delay parameter t and produces an output
//! h = x^(2^t) mod n which provably required t sequential squarings to
//! compute, along with a proof that can be checked in O(log t) work. The
//! challenge prime binding prover and verifier is derived from a SHA-512
//! transcript of the full computation (Fiat-Shamir).

pub mod error;
pub mod math;
pub mod modulus;
pub mod vdf;

mod biguint_serde;
