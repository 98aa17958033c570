/// Name-resolution service seam
///
/// Mapping a human account name to an account identifier is an external
/// collaborator: consulted, never reimplemented. The active resolver
/// reference is replaceable by governance.
use alloy_primitives::Address;
use std::collections::HashMap;

use crate::amount::{ bytes_to_address, hex_to_bytes };
use crate::configs::Configs;
use crate::errors::EngineError;

/// A resolved account name with resolution metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub account: Address,
    /// Which resolver produced the answer
    pub source: String,
}

pub trait NameResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<ResolvedName>;

    /// Short human description, used in the ResolverReplaced event
    fn describe(&self) -> String;
}

/// Resolver backed by the static name table in configs.json
pub struct StaticNameResolver {
    entries: HashMap<String, Address>,
}

impl StaticNameResolver {
    pub fn new(entries: HashMap<String, Address>) -> Self {
        Self { entries }
    }

    pub fn from_configs(configs: &Configs) -> Result<Self, EngineError> {
        let mut entries = HashMap::new();
        for (name, hex) in &configs.names {
            let bytes = hex_to_bytes(hex)?;
            let account = bytes_to_address(&bytes)?;
            entries.insert(name.to_lowercase(), account);
        }
        Ok(Self { entries })
    }
}

impl NameResolver for StaticNameResolver {
    fn resolve(&self, name: &str) -> Option<ResolvedName> {
        self.entries
            .get(&name.to_lowercase())
            .map(|account| ResolvedName {
                account: *account,
                source: "static table".to_string(),
            })
    }

    fn describe(&self) -> String {
        format!("static table ({} entries)", self.entries.len())
    }
}
