//! Per-chain fee tables.
//!
//! Two chain-specific facts cannot be discovered from a node and live here instead:
//! - the fixed-point encoding of `TransactionPayment.NextFeeMultiplier` for historical runtimes
//! - per-byte fee values that differ from the `TransactionByteFee` constant for a range of
//!   historical blocks
//!
//! Multiplier encodings are embedded at compile time. No per-byte overrides are embedded: no
//! supported chain is known to need one, so they come only from a JSON file supplied by the
//! operator (see [`ChainFeeConfigs::merge_overrides_file`]).

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Error type for fee configuration operations
#[derive(Debug, Error)]
pub enum FeeConfigError {
    #[error("Failed to parse fee config JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Failed to read fee overrides file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid per-byte fee override for '{chain}': block range {from}..{to} is empty")]
    EmptyRange { chain: String, from: u64, to: u64 },
}

/// Fixed-point encoding used by a runtime for its fee multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum MultiplierFormat {
    /// Signed, 10^9 precision, applied as `fee + fee * m`
    Fixed64,
    /// Signed, 10^18 precision, applied as `fee + fee * m`
    Fixed128,
    /// Unsigned, 10^18 precision, applied as `fee * m`
    FixedU128,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiplierRange {
    pub from_spec_version: u32,
    /// Exclusive upper bound, `None` means open ended
    #[serde(default)]
    pub to_spec_version: Option<u32>,
    pub format: MultiplierFormat,
}

impl MultiplierRange {
    fn contains(&self, spec_version: u32) -> bool {
        spec_version >= self.from_spec_version
            && self.to_spec_version.is_none_or(|to| spec_version < to)
    }
}

/// A per-byte fee that must be used instead of the queried constant for blocks in
/// `from_block..to_block`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerByteFeeOverride {
    pub from_block: u64,
    pub to_block: u64,
    #[serde(deserialize_with = "deserialize_u128")]
    pub per_byte_fee: u128,
}

impl PerByteFeeOverride {
    fn contains(&self, block_number: u64) -> bool {
        block_number >= self.from_block && block_number < self.to_block
    }
}

/// Accept balances both as JSON numbers and as decimal strings
fn deserialize_u128<'de, D>(deserializer: D) -> Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        String(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n as u128),
        Raw::String(s) => s.parse::<u128>().map_err(serde::de::Error::custom),
    }
}

/// Fee configuration for a single chain
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainFeeConfig {
    #[serde(default)]
    pub multiplier_formats: Vec<MultiplierRange>,

    #[serde(default)]
    pub per_byte_fee_overrides: Vec<PerByteFeeOverride>,
}

impl ChainFeeConfig {
    /// Multiplier encoding in force at `spec_version`, unlisted versions use `FixedU128`
    pub fn multiplier_format(&self, spec_version: u32) -> MultiplierFormat {
        self.multiplier_formats
            .iter()
            .find(|range| range.contains(spec_version))
            .map(|range| range.format)
            .unwrap_or(MultiplierFormat::FixedU128)
    }

    pub fn per_byte_fee_override(&self, block_number: u64) -> Option<u128> {
        self.per_byte_fee_overrides
            .iter()
            .find(|o| o.contains(block_number))
            .map(|o| o.per_byte_fee)
    }
}

/// Collection of fee configurations for all known chains, keyed by spec name
#[derive(Debug, Clone)]
pub struct ChainFeeConfigs {
    configs: HashMap<String, ChainFeeConfig>,
}

impl ChainFeeConfigs {
    /// Load fee configurations from the embedded JSON
    pub fn load() -> Result<Self, FeeConfigError> {
        const CONFIG_JSON: &str = include_str!("chain_fee_config.json");
        Self::from_json(CONFIG_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, FeeConfigError> {
        let configs: HashMap<String, ChainFeeConfig> = serde_json::from_str(json)?;
        let configs = Self { configs };
        configs.validate()?;
        Ok(configs)
    }

    /// An empty table: every chain uses `FixedU128` and no overrides
    pub fn empty() -> Self {
        Self {
            configs: HashMap::new(),
        }
    }

    /// Merge per-byte fee overrides from a JSON file of the form
    /// `{ "<specName>": [{ "fromBlock", "toBlock", "perByteFee" }] }`.
    /// File entries take precedence over embedded ones.
    pub fn merge_overrides_file(&mut self, path: impl AsRef<Path>) -> Result<(), FeeConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| FeeConfigError::ReadError {
            path: path.display().to_string(),
            source,
        })?;
        self.merge_overrides_json(&contents)
    }

    pub fn merge_overrides_json(&mut self, json: &str) -> Result<(), FeeConfigError> {
        let overrides: HashMap<String, Vec<PerByteFeeOverride>> = serde_json::from_str(json)?;

        for (chain, mut entries) in overrides {
            let config = self.configs.entry(chain.to_lowercase()).or_default();
            entries.append(&mut config.per_byte_fee_overrides);
            config.per_byte_fee_overrides = entries;
        }

        self.validate()
    }

    fn validate(&self) -> Result<(), FeeConfigError> {
        for (chain, config) in &self.configs {
            if let Some(o) = config
                .per_byte_fee_overrides
                .iter()
                .find(|o| o.from_block >= o.to_block)
            {
                return Err(FeeConfigError::EmptyRange {
                    chain: chain.clone(),
                    from: o.from_block,
                    to: o.to_block,
                });
            }
        }
        Ok(())
    }

    /// Get the fee configuration for a specific chain by spec_name
    pub fn get(&self, spec_name: &str) -> Option<&ChainFeeConfig> {
        self.configs
            .get(spec_name)
            .or_else(|| self.configs.get(&spec_name.to_lowercase()))
    }

    pub fn multiplier_format(&self, spec_name: &str, spec_version: u32) -> MultiplierFormat {
        self.get(spec_name)
            .map(|c| c.multiplier_format(spec_version))
            .unwrap_or(MultiplierFormat::FixedU128)
    }

    pub fn per_byte_fee_override(&self, spec_name: &str, block_number: u64) -> Option<u128> {
        self.get(spec_name)?.per_byte_fee_override(block_number)
    }

    /// List all configured chain names
    pub fn chain_names(&self) -> Vec<&str> {
        self.configs.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config() {
        let configs = ChainFeeConfigs::load().unwrap();
        assert!(configs.get("polkadot").is_some());
        assert!(configs.get("kusama").is_some());
        assert!(configs.get("westend").is_some());
    }

    #[test]
    fn test_embedded_config_has_no_byte_fee_overrides() {
        let configs = ChainFeeConfigs::load().unwrap();
        for chain in configs.chain_names() {
            let config = configs.get(chain).unwrap();
            assert!(config.per_byte_fee_overrides.is_empty(), "{chain}");
        }
        assert_eq!(configs.per_byte_fee_override("kusama", 0), None);
    }

    #[test]
    fn test_multiplier_format_ranges() {
        let configs = ChainFeeConfigs::load().unwrap();

        assert_eq!(configs.multiplier_format("kusama", 1055), MultiplierFormat::Fixed64);
        assert_eq!(configs.multiplier_format("kusama", 1062), MultiplierFormat::Fixed128);
        assert_eq!(configs.multiplier_format("kusama", 2011), MultiplierFormat::FixedU128);
        assert_eq!(configs.multiplier_format("polkadot", 10), MultiplierFormat::Fixed128);
        assert_eq!(configs.multiplier_format("polkadot", 9430), MultiplierFormat::FixedU128);
    }

    #[test]
    fn test_unknown_chain_defaults() {
        let configs = ChainFeeConfigs::load().unwrap();
        assert!(configs.get("unknown-chain").is_none());
        assert_eq!(configs.multiplier_format("unknown-chain", 1), MultiplierFormat::FixedU128);
        assert_eq!(configs.per_byte_fee_override("unknown-chain", 1), None);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let configs = ChainFeeConfigs::load().unwrap();
        assert!(configs.get("Kusama").is_some());
    }

    #[test]
    fn test_merge_overrides_json() {
        let mut configs = ChainFeeConfigs::load().unwrap();
        configs
            .merge_overrides_json(
                r#"{ "kusama": [{ "fromBlock": 0, "toBlock": 1000, "perByteFee": "1000000" }] }"#,
            )
            .unwrap();

        assert_eq!(configs.per_byte_fee_override("kusama", 0), Some(1_000_000));
        assert_eq!(configs.per_byte_fee_override("kusama", 999), Some(1_000_000));
        assert_eq!(configs.per_byte_fee_override("kusama", 1000), None);
        // Multiplier table is untouched by the merge
        assert_eq!(configs.multiplier_format("kusama", 1055), MultiplierFormat::Fixed64);
    }

    #[test]
    fn test_merge_overrides_new_chain_numeric_fee() {
        let mut configs = ChainFeeConfigs::empty();
        configs
            .merge_overrides_json(r#"{ "mychain": [{ "fromBlock": 5, "toBlock": 10, "perByteFee": 42 }] }"#)
            .unwrap();

        assert_eq!(configs.per_byte_fee_override("mychain", 4), None);
        assert_eq!(configs.per_byte_fee_override("mychain", 5), Some(42));
    }

    #[test]
    fn test_merge_rejects_empty_range() {
        let mut configs = ChainFeeConfigs::empty();
        let result = configs
            .merge_overrides_json(r#"{ "kusama": [{ "fromBlock": 10, "toBlock": 10, "perByteFee": "1" }] }"#);
        assert!(matches!(result, Err(FeeConfigError::EmptyRange { .. })));
    }

    #[test]
    fn test_merge_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "polkadot": [{{ "fromBlock": 0, "toBlock": 20, "perByteFee": "10000000" }}] }}"#
        )
        .unwrap();

        let mut configs = ChainFeeConfigs::load().unwrap();
        configs.merge_overrides_file(file.path()).unwrap();
        assert_eq!(configs.per_byte_fee_override("polkadot", 19), Some(10_000_000));
    }

    #[test]
    fn test_merge_missing_file() {
        let mut configs = ChainFeeConfigs::empty();
        let result = configs.merge_overrides_file("/definitely/not/here.json");
        assert!(matches!(result, Err(FeeConfigError::ReadError { .. })));
    }
}
