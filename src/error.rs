// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

// Caller errors (out-of-range arguments, malformed parameters) surface as
// explicit variants and are never caught internally. Failed proof
// verification is NOT an error: `Proof::verify` returns a plain boolean so
// that a malformed proof and a forged proof are indistinguishable to the
// caller.

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VdfError {
    #[error("Invalid value was given to the function")]
    InvalidInput,

    #[error("Value does not fit in {0} bytes")]
    ValueTooLarge(usize),

    #[error("Montgomery reduction requires an odd modulus")]
    EvenModulus,
}

pub type VdfResult<T> = Result<T, VdfError>;
