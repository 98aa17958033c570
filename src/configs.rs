/// Runtime configuration loaded from configs.json
use serde::{ Deserialize, Serialize };
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Represents the runtime configuration loaded from configs.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configs {
    /// Governance principal allowed to mutate aliases, routes and the resolver
    pub governor: String,
    /// Account whose intents this engine authors (requester for swaps/sends)
    pub account: String,
    /// Static name-resolution entries: human name -> account hex
    #[serde(default)]
    pub names: HashMap<String, String>,
    /// Seed state for the in-memory simulation ledger
    #[serde(default)]
    pub simulation: SimulationSeed,
}

/// Seed state applied to the in-memory ledger in simulate mode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationSeed {
    #[serde(default)]
    pub accounts: Vec<AccountSeed>,
    #[serde(default)]
    pub pools: Vec<PoolSeed>,
}

/// One seeded account: native balance plus token balances in display units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSeed {
    pub address: String,
    #[serde(default)]
    pub native: String,
    #[serde(default)]
    pub tokens: HashMap<String, String>,
}

/// One seeded venue: asset pair, fee tier and reserves in display units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSeed {
    pub asset_a: String,
    pub asset_b: String,
    pub fee: u32,
    pub reserve_a: String,
    pub reserve_b: String,
}

/// Reads the configs file and returns a Configs object
pub fn read_configs<P: AsRef<Path>>(path: P) -> Result<Configs, Box<dyn std::error::Error>> {
    let data = fs::read_to_string(path)?;
    let configs: Configs = serde_json::from_str(&data)?;
    Ok(configs)
}
