//! Dashboard configuration.
//!
//! Values default to the demo token and deposit amount, so an empty TOML
//! document is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use ledgerdash_transaction::{AssetName, CIP25_LABEL};

use crate::error::ConfigError;

/// Parameters of the mint and burn actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MintConfig {
    /// Asset name, UTF-8, at most 32 bytes.
    pub asset_name: String,
    /// Quantity minted, and burned, per action.
    pub quantity: i64,
    /// Image URI placed in the token metadata.
    pub image: String,
    /// Metadata label for the token metadata.
    pub metadata_label: u64,
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            asset_name: "42 Token".to_string(),
            quantity: 42,
            image: "https://avatars.githubusercontent.com/u/1".to_string(),
            metadata_label: CIP25_LABEL,
        }
    }
}

impl MintConfig {
    /// The asset name as ledger bytes.
    pub fn asset_name(&self) -> Result<AssetName, ConfigError> {
        AssetName::from_text(&self.asset_name).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

/// Parameters of the deposit action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepositConfig {
    /// Lovelace locked at the contract address per deposit.
    pub lovelace: u64,
}

impl Default for DepositConfig {
    fn default() -> Self {
        Self { lovelace: 42_000_000 }
    }
}

/// Configuration for a [`Dashboard`](crate::Dashboard).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Mint and burn parameters.
    pub mint: MintConfig,
    /// Deposit parameters.
    pub deposit: DepositConfig,
}

impl DashboardConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values no action could be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mint.quantity <= 0 {
            return Err(ConfigError::Invalid(format!(
                "mint.quantity must be positive, got {}",
                self.mint.quantity
            )));
        }
        if self.mint.asset_name.is_empty() {
            return Err(ConfigError::Invalid("mint.asset_name is empty".to_string()));
        }
        self.mint.asset_name()?;
        if self.deposit.lovelace == 0 {
            return Err(ConfigError::Invalid("deposit.lovelace must be non-zero".to_string()));
        }
        Ok(())
    }
}
