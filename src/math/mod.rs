// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

pub mod bigint_utils;
pub mod modpow;
pub mod montgomery;
pub mod prime;
