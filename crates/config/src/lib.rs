mod args;
mod error;
mod express;
mod fee;
mod log;
mod substrate;

pub use args::Args;
pub use error::ConfigError;
pub use express::ExpressConfig;
pub use fee::{
    ChainFeeConfig, ChainFeeConfigs, FeeConfigError, MultiplierFormat, MultiplierRange,
    PerByteFeeOverride,
};
pub use log::LogConfig;
pub use substrate::SubstrateConfig;

use serde::Deserialize;

/// Fee table settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeeConfig {
    /// JSON file with additional per-byte fee overrides
    ///
    /// Env: SAS_FEE_OVERRIDES_FILE
    /// Default: unset
    #[serde(default)]
    pub overrides_file: Option<String>,
}

impl FeeConfig {
    /// Embedded chain fee tables, extended with the overrides file when one is configured
    pub fn load_tables(&self) -> Result<ChainFeeConfigs, ConfigError> {
        let mut tables = ChainFeeConfigs::load()?;
        if let Some(path) = &self.overrides_file {
            tables.merge_overrides_file(path)?;
        }
        Ok(tables)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SidecarConfig {
    pub express: ExpressConfig,
    pub log: LogConfig,
    pub substrate: SubstrateConfig,
    pub fee: FeeConfig,
}

impl SidecarConfig {
    /// Read every section from `SAS_<SECTION>_<FIELD>` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            express: envy::prefixed("SAS_EXPRESS_").from_env::<ExpressConfig>()?,
            log: envy::prefixed("SAS_LOG_").from_env::<LogConfig>()?,
            substrate: envy::prefixed("SAS_SUBSTRATE_").from_env::<SubstrateConfig>()?,
            fee: envy::prefixed("SAS_FEE_").from_env::<FeeConfig>()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load the env file named by `args` (when present), then read the environment
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        dotenv::from_path(&args.env_file).ok();
        Self::from_env()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.express.validate()?;
        self.log.validate()?;
        self.substrate.validate()?;
        Ok(())
    }
}
