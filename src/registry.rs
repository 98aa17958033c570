/// Governance-maintained state: asset aliases and pool routes
///
/// Both tables are readable by every invocation and writable only by the
/// governance principal. Forward and reverse alias mappings live inside one
/// lock so a registration mutates both atomically and no reader ever
/// observes a half-written pair. State is persisted as pretty JSON under the
/// data directory and reloaded at startup.
use alloy_primitives::Address;
use serde::{ Deserialize, Serialize };
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{ Mutex, RwLock };

use crate::amount::{ address_to_hex, bytes_to_address, hex_to_bytes };
use crate::errors::EngineError;
use crate::events::{ Event, Notification };
use crate::logger::{ self, LogTag };

/// Single-responsibility authorization check for governance mutations
#[derive(Debug, Clone, Copy)]
pub struct AuthorityGuard {
    governor: Address,
}

impl AuthorityGuard {
    pub fn new(governor: Address) -> Self {
        Self { governor }
    }

    pub fn ensure(&self, caller: Address) -> Result<(), EngineError> {
        if caller != self.governor {
            return Err(EngineError::Unauthorized);
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
struct Tables {
    aliases: HashMap<String, Address>,
    reverse: HashMap<Address, String>,
    routes: HashMap<(Address, Address), (Address, u32)>,
}

/// Serialized form of the governance tables
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    aliases: HashMap<String, String>,
    routes: Vec<RouteRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RouteRecord {
    token0: String,
    token1: String,
    venue: String,
    fee: u32,
}

pub struct Registry {
    guard: AuthorityGuard,
    tables: RwLock<Tables>,
    notifications: Mutex<Vec<Notification>>,
    storage_path: Option<PathBuf>,
}

impl Registry {
    /// In-memory registry without persistence (tests, previews)
    pub fn new(governor: Address) -> Self {
        Self {
            guard: AuthorityGuard::new(governor),
            tables: RwLock::new(Tables::default()),
            notifications: Mutex::new(Vec::new()),
            storage_path: None,
        }
    }

    /// Registry backed by a JSON snapshot, loading existing state if present
    pub fn with_storage(governor: Address, path: PathBuf) -> Self {
        let tables = load_tables(&path).unwrap_or_default();
        Self {
            guard: AuthorityGuard::new(governor),
            tables: RwLock::new(tables),
            notifications: Mutex::new(Vec::new()),
            storage_path: Some(path),
        }
    }

    /// Check a caller against the governance principal
    pub fn ensure_governor(&self, caller: Address) -> Result<(), EngineError> {
        self.guard.ensure(caller)
    }

    pub fn alias(&self, name: &str) -> Option<Address> {
        match self.tables.read() {
            Ok(tables) => tables.aliases.get(name).copied(),
            Err(_) => None,
        }
    }

    pub fn reverse_alias(&self, asset: Address) -> Option<String> {
        match self.tables.read() {
            Ok(tables) => tables.reverse.get(&asset).cloned(),
            Err(_) => None,
        }
    }

    /// Route entry for a canonically-ordered pair
    pub fn route(&self, token0: Address, token1: Address) -> Option<(Address, u32)> {
        match self.tables.read() {
            Ok(tables) => tables.routes.get(&(token0, token1)).copied(),
            Err(_) => None,
        }
    }

    /// Register or overwrite an alias; writes forward and reverse mappings
    /// atomically and emits a notification event
    pub fn register_alias(
        &self,
        caller: Address,
        name: &str,
        asset: Address
    ) -> Result<(), EngineError> {
        self.guard.ensure(caller)?;
        let key = name.to_lowercase();
        {
            let mut tables = self.tables
                .write()
                .map_err(|_| EngineError::Ledger("registry lock poisoned".to_string()))?;
            if let Some(previous) = tables.aliases.insert(key.clone(), asset) {
                // Drop the stale reverse entry when the alias moves to a new asset
                if tables.reverse.get(&previous) == Some(&key) {
                    tables.reverse.remove(&previous);
                }
            }
            tables.reverse.insert(asset, key.clone());
            self.persist(&tables);
        }
        self.notify(Event::AliasRegistered { name: key.clone(), asset: address_to_hex(asset) });
        logger::info(
            LogTag::Registry,
            &format!("alias '{}' -> {}", key, address_to_hex(asset))
        );
        Ok(())
    }

    /// Register or overwrite a pool route; the pair key is stored with the
    /// numerically-lower identifier first regardless of argument order
    pub fn register_route(
        &self,
        caller: Address,
        asset_a: Address,
        asset_b: Address,
        venue: Address,
        fee: u32
    ) -> Result<(), EngineError> {
        self.guard.ensure(caller)?;
        let (token0, token1) = if asset_a < asset_b { (asset_a, asset_b) } else { (asset_b, asset_a) };
        {
            let mut tables = self.tables
                .write()
                .map_err(|_| EngineError::Ledger("registry lock poisoned".to_string()))?;
            tables.routes.insert((token0, token1), (venue, fee));
            self.persist(&tables);
        }
        self.notify(Event::RouteRegistered {
            token0: address_to_hex(token0),
            token1: address_to_hex(token1),
            venue: address_to_hex(venue),
            fee,
        });
        logger::info(
            LogTag::Registry,
            &format!(
                "route {} / {} -> {} (fee {})",
                address_to_hex(token0),
                address_to_hex(token1),
                address_to_hex(venue),
                fee
            )
        );
        Ok(())
    }

    /// Record a notification event
    pub fn notify(&self, event: Event) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(Notification::now(event));
        }
    }

    /// Copy of the notification log
    pub fn notifications(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(notifications) => notifications.clone(),
            Err(_) => Vec::new(),
        }
    }

    fn persist(&self, tables: &Tables) {
        let Some(path) = &self.storage_path else {
            return;
        };
        let file = RegistryFile {
            aliases: tables.aliases
                .iter()
                .map(|(name, asset)| (name.clone(), address_to_hex(*asset)))
                .collect(),
            routes: tables.routes
                .iter()
                .map(|((token0, token1), (venue, fee))| RouteRecord {
                    token0: address_to_hex(*token0),
                    token1: address_to_hex(*token1),
                    venue: address_to_hex(*venue),
                    fee: *fee,
                })
                .collect(),
        };
        match serde_json::to_string_pretty(&file) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    logger::error(
                        LogTag::Registry,
                        &format!("failed to write {}: {}", path.display(), e)
                    );
                }
            }
            Err(e) => {
                logger::error(LogTag::Registry, &format!("failed to serialize registry: {}", e));
            }
        }
    }
}

fn parse_address(text: &str) -> Option<Address> {
    let bytes = hex_to_bytes(text).ok()?;
    bytes_to_address(&bytes).ok()
}

fn load_tables(path: &PathBuf) -> Option<Tables> {
    let content = fs::read_to_string(path).ok()?;
    let file: RegistryFile = match serde_json::from_str(&content) {
        Ok(file) => file,
        Err(e) => {
            logger::error(LogTag::Registry, &format!("failed to parse {}: {}", path.display(), e));
            return None;
        }
    };
    let mut tables = Tables::default();
    for (name, asset_hex) in file.aliases {
        if let Some(asset) = parse_address(&asset_hex) {
            tables.reverse.insert(asset, name.clone());
            tables.aliases.insert(name, asset);
        }
    }
    for record in file.routes {
        match (
            parse_address(&record.token0),
            parse_address(&record.token1),
            parse_address(&record.venue),
        ) {
            (Some(token0), Some(token1), Some(venue)) => {
                tables.routes.insert((token0, token1), (venue, record.fee));
            }
            _ => {
                logger::error(LogTag::Registry, "skipping malformed route record");
            }
        }
    }
    Some(tables)
}
