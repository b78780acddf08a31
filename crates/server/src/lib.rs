// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod app;
pub mod blocks;
pub mod gateway;
pub mod handlers;
pub mod logging;
pub mod routes;
pub mod state;
pub mod types;
