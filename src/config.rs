//! Configuration management for the swap quote executor
//!
//! Loads configuration from TOML files with environment variable substitution.

use crate::chain::Route;
use crate::types::ContractAddresses;

use anyhow::{Context, Result};
use ethers::types::Address;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

lazy_static! {
    static ref ENV_VAR_RE: Regex = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub consumer: ConsumerConfig,
    pub contracts: ContractsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsumerConfig {
    pub chain_id: u64,
    pub rpc_url: String,
    /// Name of the env var holding the taker's private key
    #[serde(default)]
    pub private_key_env: Option<String>,
    #[serde(default)]
    pub use_coordinator: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractsConfig {
    pub exchange: String,
    pub coordinator: String,
    pub erc20_proxy: String,
}

impl Settings {
    /// Load settings from the configured file
    pub fn load() -> Result<Self> {
        let config_path = env::var("SWAP_EXECUTOR_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/default.toml"));

        Self::load_from(&config_path)
    }

    /// Load settings from a specific file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::from_toml(&config_str)
    }

    /// Parse settings from TOML text, substituting `${VAR}` references
    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config_str = substitute_env_vars(config_str);

        let settings: Settings =
            toml::from_str(&config_str).with_context(|| "Failed to parse configuration")?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration
    ///
    /// The RPC url is only needed to execute, so it is checked by `rpc_url()`.
    fn validate(&self) -> Result<()> {
        self.contract_addresses()?;

        if self.consumer.use_coordinator {
            tracing::debug!("Coordinator settlement enabled for chain {}", self.consumer.chain_id);
        }

        Ok(())
    }

    /// RPC endpoint for execution
    pub fn rpc_url(&self) -> Result<&str> {
        let url = self.consumer.rpc_url.trim();
        if url.is_empty() {
            anyhow::bail!("consumer.rpc_url must not be empty");
        }
        Ok(url)
    }

    /// Settlement route selected by `use_coordinator`
    pub fn route(&self) -> Route {
        if self.consumer.use_coordinator {
            Route::Coordinator
        } else {
            Route::Direct
        }
    }

    /// Typed contract addresses
    pub fn contract_addresses(&self) -> Result<ContractAddresses> {
        Ok(ContractAddresses {
            exchange: parse_contract("exchange", &self.contracts.exchange)?,
            coordinator: parse_contract("coordinator", &self.contracts.coordinator)?,
            erc20_proxy: parse_contract("erc20_proxy", &self.contracts.erc20_proxy)?,
        })
    }
}

fn parse_contract(name: &str, value: &str) -> Result<Address> {
    Address::from_str(value)
        .with_context(|| format!("Invalid {} contract address: {:?}", name, value))
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> String {
    let mut result = input.to_string();

    for cap in ENV_VAR_RE.captures_iter(input) {
        let var_name = &cap[1];
        let var_value = env::var(var_name).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    result
}
