// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Newtype wrappers with a fixed wire representation.

pub mod hash;

pub use hash::{BlockHash, BlockHashParseError};
