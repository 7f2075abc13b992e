// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use num_bigint::BigUint;

use crate::error::{VdfError, VdfResult};

/// Encode `value` as exactly `length` big-endian bytes, left-padded with
/// zeros. Fails with [VdfError::ValueTooLarge] if the minimal encoding of
/// `value` is longer than `length`. Note that the minimal encoding of zero
/// is a single zero byte, so zero fits in any `length >= 1`.
pub fn to_fixed_bytes_be(value: &BigUint, length: usize) -> VdfResult<Vec<u8>> {
    let bytes = value.to_bytes_be();
    if bytes.len() > length {
        return Err(VdfError::ValueTooLarge(length));
    }
    let mut padded = vec![0u8; length];
    padded[length - bytes.len()..].copy_from_slice(&bytes);
    Ok(padded)
}

/// The length of the minimal big-endian encoding of `value`, i.e.
/// ceil(bits / 8) with a minimum of one byte.
pub fn byte_length(value: &BigUint) -> usize {
    value.to_bytes_be().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use num_traits::Zero;

    #[test]
    fn test_fixed_length_encoding() {
        let value = BigUint::from(0x0102u32);
        assert_eq!(
            to_fixed_bytes_be(&value, 4).unwrap(),
            vec![0x00, 0x00, 0x01, 0x02]
        );
        assert_eq!(to_fixed_bytes_be(&value, 2).unwrap(), vec![0x01, 0x02]);
        assert_eq!(
            to_fixed_bytes_be(&value, 1),
            Err(VdfError::ValueTooLarge(1))
        );
    }

    #[test]
    fn test_zero_encoding() {
        let zero = BigUint::zero();
        assert_eq!(zero.to_bytes_be(), vec![0x00]);
        assert_eq!(to_fixed_bytes_be(&zero, 3).unwrap(), vec![0, 0, 0]);
        assert_eq!(byte_length(&zero), 1);
    }

    #[test]
    fn test_byte_length() {
        assert_eq!(byte_length(&BigUint::from(0xffu32)), 1);
        assert_eq!(byte_length(&BigUint::from(0x100u32)), 2);
        assert_eq!(byte_length(&(&BigUint::from(1u8) << 2047u32)), 256);
    }
}
