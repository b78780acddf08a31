// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::gateway::{GatewayError, NodeGateway};
use config::{ChainFeeConfigs, ConfigError, SidecarConfig};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to connect to node: {0}")]
    Connect(#[from] GatewayError),

    #[error("Failed to load fee tables: {0}")]
    FeeTables(#[from] ConfigError),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SidecarConfig>,
    pub api: Arc<NodeGateway>,
    pub fee_tables: Arc<ChainFeeConfigs>,
}

impl AppState {
    /// Connect to the configured node and load the fee tables
    pub async fn new(config: SidecarConfig) -> Result<Self, StateError> {
        let fee_tables = config.fee.load_tables()?;
        let api = NodeGateway::connect(&config.substrate.url).await?;
        Ok(Self::with_gateway(config, api, fee_tables))
    }

    pub fn with_gateway(
        config: SidecarConfig,
        api: NodeGateway,
        fee_tables: ChainFeeConfigs,
    ) -> Self {
        Self {
            config: Arc::new(config),
            api: Arc::new(api),
            fee_tables: Arc::new(fee_tables),
        }
    }
}
