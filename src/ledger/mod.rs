/// Ledger substrate abstraction
///
/// The engine never touches balance storage or call execution directly; it
/// speaks to the surrounding ledger through this trait. The substrate owns
/// atomicity: a failed invocation discards every effect, never part of them.
pub mod memory;

pub use memory::{ MemoryLedger, TokenMeta };

use alloy_primitives::{ Address, I256, U256 };

use crate::errors::EngineError;

/// Continuation invoked by a venue mid-settlement to request funding
///
/// The venue calls back synchronously before `venue_swap` returns; the
/// handler must authenticate the caller and move funds before returning.
pub trait SettlementCallback {
    fn funding_requested(
        &self,
        ledger: &mut dyn Ledger,
        caller: Address,
        amount0_delta: I256,
        amount1_delta: I256,
        data: &[u8]
    ) -> Result<(), EngineError>;
}

/// Execution substrate: balances, transfers, asset metadata and settlement
pub trait Ledger {
    /// Whether an account has deployed code
    fn has_code(&self, account: Address) -> bool;

    fn native_balance(&self, account: Address) -> U256;

    fn token_balance(&self, token: Address, holder: Address) -> U256;

    /// Live asset metadata, queried when no table knows the asset
    fn token_decimals(&self, token: Address) -> Result<u8, EngineError>;
    fn token_symbol(&self, token: Address) -> Result<String, EngineError>;
    fn token_name(&self, token: Address) -> Result<String, EngineError>;
    fn token_total_supply(&self, token: Address) -> Result<U256, EngineError>;

    fn native_transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: U256
    ) -> Result<(), EngineError>;

    fn token_transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256
    ) -> Result<(), EngineError>;

    /// Convert native funds into the wrapped fungible form in place
    fn wrap_native(&mut self, account: Address, amount: U256) -> Result<(), EngineError>;

    /// Convert wrapped funds back into native form in place
    fn unwrap_native(&mut self, account: Address, amount: U256) -> Result<(), EngineError>;

    /// Invoke a venue's settlement primitive
    ///
    /// The venue pays the output leg to `recipient`, then synchronously
    /// invokes `callback` to collect the input leg, and finally reports the
    /// signed balance deltas (negative meaning asset left the venue).
    #[allow(clippy::too_many_arguments)]
    fn venue_swap(
        &mut self,
        venue: Address,
        recipient: Address,
        zero_for_one: bool,
        amount_specified: I256,
        sqrt_price_limit_x96: U256,
        data: &[u8],
        callback: &dyn SettlementCallback
    ) -> Result<(I256, I256), EngineError>;
}
