/// Global constants used across intentbot
///
/// Chain-level constants that are not configurable: canonical asset
/// identifiers, the venue factory, derivation inputs and call selectors.
use alloy_primitives::{ address, b256, keccak256, Address, B256, U256 };
use once_cell::sync::Lazy;

// ============================================================================
// ASSET CONSTANTS
// ============================================================================

/// Sentinel identifier for the chain's native asset
pub const NATIVE_ASSET: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

/// Number of decimal places for the native asset
pub const NATIVE_DECIMALS: u8 = 18;

/// Wrapped form of the native asset (venues only speak this form)
pub const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");

pub const USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
pub const USDT: Address = address!("dac17f958d2ee523a2206206994597c13d831ec7");
pub const DAI: Address = address!("6b175474e89094c44da98b954eedeac495271d0f");
pub const WBTC: Address = address!("2260fac5e5542a773aa44fbcfedf7c193bc2c599");
pub const WSTETH: Address = address!("7f39c581f595b53c5cb19bd0b3f8da6c935e2ca0");
pub const RETH: Address = address!("ae78736cd615f374d3085123a210448e74fc6393");

// ============================================================================
// VENUE DERIVATION CONSTANTS
// ============================================================================

/// Venue factory identifier
pub const FACTORY: Address = address!("1f98431c8ad98523631ae4a59f267346ea31f984");

/// Code-identity template hash of the venue implementation
pub const POOL_INIT_CODE_HASH: B256 =
    b256!("e34f199b19b2b4f47f68442619d555527d244f78a3297ea89325f843f87b8b54");

/// Standard fee tiers, in millionths
pub const FEE_TIERS: [u32; 4] = [100, 500, 3000, 10000];

/// Lowest representable venue price bound
pub static MIN_SQRT_RATIO: Lazy<U256> = Lazy::new(|| U256::from(4295128739u64));

/// Highest representable venue price bound
pub static MAX_SQRT_RATIO: Lazy<U256> = Lazy::new(|| {
    U256::from_str_radix("1461446703485210103287273052203988822378723970342", 10).expect(
        "valid price bound constant"
    )
});

/// Smallest amount that no longer fits the signed settlement magnitude (2^255)
pub static SIGNED_MAGNITUDE_BOUND: Lazy<U256> = Lazy::new(|| U256::from(1u8) << 255);

// ============================================================================
// CALL SELECTORS
// ============================================================================

/// First four bytes of the keccak hash of a canonical call signature
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Outer payload selector: the substrate's atomic call primitive
pub static CALL_SELECTOR: Lazy<[u8; 4]> = Lazy::new(|| selector("call(address,uint256,bytes)"));

/// Nested asset-transfer selector
pub static TRANSFER_SELECTOR: Lazy<[u8; 4]> = Lazy::new(|| selector("transfer(address,uint256)"));

/// Venue settlement selector
pub static VENUE_SWAP_SELECTOR: Lazy<[u8; 4]> = Lazy::new(||
    selector("swap(address,bool,int256,uint160,bytes)")
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_selectors() {
        // Canonical selectors are fixed by the signature hashes
        assert_eq!(*TRANSFER_SELECTOR, [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(*VENUE_SWAP_SELECTOR, [0x12, 0x8a, 0xcb, 0x08]);
    }

    #[test]
    fn test_price_bounds_ordering() {
        assert!(*MIN_SQRT_RATIO < *MAX_SQRT_RATIO);
    }
}
