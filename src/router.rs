/// Pool routing and deterministic venue derivation
///
/// Resolution order for a pair: the curated compiled table, the governance
/// route table, then dynamic derivation across the standard fee tiers ranked
/// by observed counter-asset liquidity. Liquidity is a plain balance read,
/// never venue-internal state, so routing costs O(1) hashing plus four
/// balance reads and needs no price oracle.
use alloy_primitives::{ keccak256, Address, U256 };
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::amount::address_to_hex;
use crate::constants::{ DAI, FACTORY, FEE_TIERS, POOL_INIT_CODE_HASH, USDC, USDT, WBTC, WETH, WSTETH };
use crate::ledger::Ledger;
use crate::logger::{ self, LogTag };
use crate::registry::Registry;

/// A routed venue for a pair, with the trade direction flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub venue: Address,
    pub fee: u32,
    /// True when the input asset is the numerically-lower one
    pub zero_for_one: bool,
}

/// Curated table of pre-vetted high-traffic pairs, keyed canonically
static CURATED_VENUES: Lazy<HashMap<(Address, Address), (Address, u32)>> = Lazy::new(|| {
    use alloy_primitives::address;
    let mut table = HashMap::new();
    table.insert(
        (USDC, WETH),
        (address!("88e6a0c2ddd26feeb64f039a2c41296fcb3f5640"), 500u32),
    );
    table.insert(
        (DAI, WETH),
        (address!("c2e9f25be6257c210d7adf0d4cd6e3e881ba25f8"), 3000u32),
    );
    table.insert(
        (WBTC, WETH),
        (address!("cbcdf9626bc03e24f779434178a73a0b4bad62ed"), 3000u32),
    );
    table.insert(
        (DAI, USDC),
        (address!("5777d92f208679db4b9778590fa3cab3ac9e2168"), 100u32),
    );
    table.insert(
        (USDC, USDT),
        (address!("3416cf6c708da44db2624d63ea0aaef7113527c6"), 100u32),
    );
    table.insert(
        (WSTETH, WETH),
        (address!("109830a1aaad605bbf02a9dfa7b0b92ec2fb7daa"), 100u32),
    );
    table
});

/// Canonicalize a pair by numeric identifier order
///
/// Returns (token0, token1, zero_for_one) where zero_for_one records whether
/// the first argument sorts lower.
pub fn canonical_pair(asset_a: Address, asset_b: Address) -> (Address, Address, bool) {
    if asset_a < asset_b {
        (asset_a, asset_b, true)
    } else {
        (asset_b, asset_a, false)
    }
}

/// Deterministically derive a venue's account identifier
///
/// Content-address hash of (factory, canonical pair, fee tier) combined with
/// the venue implementation's code-identity hash. Pure function, reproducible
/// bit-for-bit with no network lookup.
pub fn derive_venue(factory: Address, token0: Address, token1: Address, fee: u32) -> Address {
    let mut salt_input = [0u8; 96];
    salt_input[12..32].copy_from_slice(token0.as_slice());
    salt_input[44..64].copy_from_slice(token1.as_slice());
    salt_input[92..96].copy_from_slice(&fee.to_be_bytes());
    let salt = keccak256(salt_input);

    let mut preimage = [0u8; 85];
    preimage[0] = 0xff;
    preimage[1..21].copy_from_slice(factory.as_slice());
    preimage[21..53].copy_from_slice(salt.as_slice());
    preimage[53..85].copy_from_slice(POOL_INIT_CODE_HASH.as_slice());
    Address::from_slice(&keccak256(preimage)[12..])
}

/// Resolve the venue to use for a pair
///
/// None means no curated, governed or deployed-derived venue exists; callers
/// treat this as "no route available".
pub fn route(
    ledger: &dyn Ledger,
    registry: &Registry,
    asset_in: Address,
    asset_out: Address
) -> Option<Route> {
    let (token0, token1, zero_for_one) = canonical_pair(asset_in, asset_out);

    if let Some((venue, fee)) = CURATED_VENUES.get(&(token0, token1)) {
        return Some(Route { venue: *venue, fee: *fee, zero_for_one });
    }

    if let Some((venue, fee)) = registry.route(token0, token1) {
        return Some(Route { venue, fee, zero_for_one });
    }

    // Dynamic derivation: rank the fee-tier candidates by the venue's held
    // balance of the lower-sorted asset. A tier with no deployed code counts
    // as zero liquidity and is never selected.
    let mut best: Option<(Address, u32, U256)> = None;
    for fee in FEE_TIERS {
        let venue = derive_venue(FACTORY, token0, token1, fee);
        if !ledger.has_code(venue) {
            continue;
        }
        let liquidity = ledger.token_balance(token0, venue);
        logger::debug(
            LogTag::Router,
            &format!(
                "candidate {} (fee {}) liquidity {}",
                address_to_hex(venue),
                fee,
                liquidity
            )
        );
        match &best {
            Some((_, _, current)) if liquidity <= *current => {}
            _ => {
                best = Some((venue, fee, liquidity));
            }
        }
    }

    best.map(|(venue, fee, _)| Route { venue, fee, zero_for_one })
}
