/// Asset alias and decimal-precision resolution
///
/// Lookup order: the fixed compiled synonym table first, then the
/// governance-maintained alias table. Decimal precision unknown to either
/// table is queried live from the asset and cached.
use alloy_primitives::{ Address, U256 };
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::constants::{ DAI, NATIVE_ASSET, NATIVE_DECIMALS, RETH, USDC, USDT, WBTC, WETH, WSTETH };
use crate::errors::EngineError;
use crate::ledger::Ledger;
use crate::registry::Registry;

/// A resolved asset: canonical identifier plus table-known precision, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub address: Address,
    /// None when only the governance table knew the name; precision then
    /// comes from the asset's live metadata
    pub decimals: Option<u8>,
}

/// Fixed compiled table of common asset symbols and synonyms
pub static BUILTIN_ASSETS: Lazy<HashMap<&'static str, (Address, u8)>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert("eth", (NATIVE_ASSET, NATIVE_DECIMALS));
    table.insert("ether", (NATIVE_ASSET, NATIVE_DECIMALS));
    table.insert("weth", (WETH, 18));
    table.insert("usdc", (USDC, 6));
    table.insert("usdt", (USDT, 6));
    table.insert("dai", (DAI, 18));
    table.insert("wbtc", (WBTC, 8));
    table.insert("btc", (WBTC, 8));
    table.insert("bitcoin", (WBTC, 8));
    table.insert("wsteth", (WSTETH, 18));
    table.insert("steth", (WSTETH, 18));
    table.insert("lido", (WSTETH, 18));
    table.insert("reth", (RETH, 18));
    table
});

/// Primary display name per built-in identifier (reverse of the synonyms)
static BUILTIN_DISPLAY: Lazy<HashMap<Address, (&'static str, u8)>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(NATIVE_ASSET, ("eth", NATIVE_DECIMALS));
    table.insert(WETH, ("weth", 18));
    table.insert(USDC, ("usdc", 6));
    table.insert(USDT, ("usdt", 6));
    table.insert(DAI, ("dai", 18));
    table.insert(WBTC, ("wbtc", 8));
    table.insert(WSTETH, ("wsteth", 18));
    table.insert(RETH, ("reth", 18));
    table
});

// Cache for live-queried decimals to avoid repeated metadata calls
static DECIMAL_CACHE: Lazy<Mutex<HashMap<Address, u8>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Resolve an asset name to its identifier
///
/// Unknown names resolve to None; callers surface this as `UnknownAsset`
/// instead of continuing with a sentinel identifier.
pub fn resolve_asset(registry: &Registry, name: &str) -> Option<ResolvedAsset> {
    let key = name.to_lowercase();
    if let Some((address, decimals)) = BUILTIN_ASSETS.get(key.as_str()) {
        return Some(ResolvedAsset { address: *address, decimals: Some(*decimals) });
    }
    registry.alias(&key).map(|address| ResolvedAsset { address, decimals: None })
}

/// Decimal precision of a resolved asset, querying live metadata when needed
pub fn asset_decimals(ledger: &dyn Ledger, asset: &ResolvedAsset) -> Result<u8, EngineError> {
    if let Some(decimals) = asset.decimals {
        return Ok(decimals);
    }
    decimals_for(ledger, asset.address)
}

/// Decimal precision for a bare identifier: built-in table, cache, then live
pub fn decimals_for(ledger: &dyn Ledger, address: Address) -> Result<u8, EngineError> {
    if address == NATIVE_ASSET {
        return Ok(NATIVE_DECIMALS);
    }
    if let Some((_, decimals)) = BUILTIN_DISPLAY.get(&address) {
        return Ok(*decimals);
    }
    if let Ok(cache) = DECIMAL_CACHE.lock() {
        if let Some(&decimals) = cache.get(&address) {
            return Ok(decimals);
        }
    }
    let decimals = ledger.token_decimals(address)?;
    if let Ok(mut cache) = DECIMAL_CACHE.lock() {
        cache.insert(address, decimals);
    }
    Ok(decimals)
}

/// Display alias for an identifier: built-in, governance reverse table, then
/// live symbol metadata
pub fn display_name(
    registry: &Registry,
    ledger: &dyn Ledger,
    address: Address
) -> Result<String, EngineError> {
    if let Some((name, _)) = BUILTIN_DISPLAY.get(&address) {
        return Ok(name.to_string());
    }
    if let Some(name) = registry.reverse_alias(address) {
        return Ok(name);
    }
    Ok(ledger.token_symbol(address)?.to_lowercase())
}

/// Total circulating amount of a named asset through the ledger
pub fn total_supply(ledger: &dyn Ledger, address: Address) -> Result<U256, EngineError> {
    if address == NATIVE_ASSET {
        return Err(EngineError::Ledger("native asset supply is not tracked".to_string()));
    }
    ledger.token_total_supply(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{ MemoryLedger, TokenMeta };

    #[test]
    fn test_builtin_synonyms_share_identifier() {
        let registry = Registry::new(Address::repeat_byte(0x01));
        let btc = resolve_asset(&registry, "btc").unwrap();
        let wbtc = resolve_asset(&registry, "wbtc").unwrap();
        let bitcoin = resolve_asset(&registry, "BITCOIN").unwrap();
        assert_eq!(btc.address, WBTC);
        assert_eq!(wbtc.address, WBTC);
        assert_eq!(bitcoin.address, WBTC);
        assert_eq!(btc.decimals, Some(8));
    }

    #[test]
    fn test_native_asset_resolution() {
        let registry = Registry::new(Address::repeat_byte(0x01));
        let eth = resolve_asset(&registry, "eth").unwrap();
        let ether = resolve_asset(&registry, "ether").unwrap();
        assert_eq!(eth.address, NATIVE_ASSET);
        assert_eq!(ether.address, NATIVE_ASSET);
        assert_eq!(eth.decimals, Some(18));
    }

    #[test]
    fn test_unknown_asset_is_none() {
        let registry = Registry::new(Address::repeat_byte(0x01));
        assert!(resolve_asset(&registry, "dogecoin").is_none());
    }

    #[test]
    fn test_governance_alias_falls_back_to_live_decimals() {
        let governor = Address::repeat_byte(0x01);
        let registry = Registry::new(governor);
        let token = Address::repeat_byte(0x42);
        registry.register_alias(governor, "mytoken", token).unwrap();

        let resolved = resolve_asset(&registry, "mytoken").unwrap();
        assert_eq!(resolved.address, token);
        assert_eq!(resolved.decimals, None);

        let mut ledger = MemoryLedger::new();
        ledger.register_token(token, TokenMeta {
            symbol: "MYT".to_string(),
            name: "My Token".to_string(),
            decimals: 12,
            total_supply: U256::from(1u64),
        });
        assert_eq!(asset_decimals(&ledger, &resolved).unwrap(), 12);
    }

    #[test]
    fn test_display_name_prefers_builtin() {
        let registry = Registry::new(Address::repeat_byte(0x01));
        let ledger = MemoryLedger::new();
        assert_eq!(display_name(&registry, &ledger, DAI).unwrap(), "dai");
        assert_eq!(display_name(&registry, &ledger, NATIVE_ASSET).unwrap(), "eth");
    }
}
