/// In-memory reference ledger
///
/// Reference implementation of the ledger substrate used by simulate mode and
/// the test suite. Venues settle with constant-product math and the real
/// callback protocol: output is paid first, then the callback must fund the
/// input leg before settlement returns.
use alloy_primitives::{ Address, I256, U256 };
use std::collections::{ HashMap, HashSet };

use crate::amount::address_to_hex;
use crate::errors::EngineError;
use crate::logger::{ self, LogTag };
use crate::router::derive_venue;
use crate::constants::FACTORY;

use super::{ Ledger, SettlementCallback };

/// Self-reported metadata of a fungible asset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMeta {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub total_supply: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VenueAccount {
    token0: Address,
    token1: Address,
    fee: u32,
}

/// In-memory ledger state: balances, asset metadata and deployed venues
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    native: HashMap<Address, U256>,
    tokens: HashMap<Address, TokenMeta>,
    balances: HashMap<(Address, Address), U256>,
    venues: HashMap<Address, VenueAccount>,
    contracts: HashSet<Address>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fungible asset and its metadata
    pub fn register_token(&mut self, address: Address, meta: TokenMeta) {
        self.contracts.insert(address);
        self.tokens.insert(address, meta);
    }

    pub fn set_native_balance(&mut self, account: Address, amount: U256) {
        self.native.insert(account, amount);
    }

    pub fn set_token_balance(&mut self, token: Address, holder: Address, amount: U256) {
        self.balances.insert((token, holder), amount);
    }

    /// Deploy a venue for a pair at a fee tier; the account is derived the
    /// same way routing derives it, so the two always agree
    pub fn register_venue(&mut self, token_a: Address, token_b: Address, fee: u32) -> Address {
        let (token0, token1) = if token_a < token_b { (token_a, token_b) } else { (token_b, token_a) };
        let venue = derive_venue(FACTORY, token0, token1, fee);
        self.contracts.insert(venue);
        self.venues.insert(venue, VenueAccount { token0, token1, fee });
        venue
    }

    /// Copy of the full ledger state, for all-or-nothing simulation
    pub fn snapshot(&self) -> MemoryLedger {
        self.clone()
    }

    /// Discard every effect since `snapshot` was taken
    pub fn restore(&mut self, snapshot: MemoryLedger) {
        *self = snapshot;
    }

    fn debit_token(
        &mut self,
        token: Address,
        holder: Address,
        amount: U256
    ) -> Result<(), EngineError> {
        let balance = self.token_balance(token, holder);
        if balance < amount {
            return Err(
                EngineError::Ledger(
                    format!("insufficient token balance of {}", address_to_hex(holder))
                )
            );
        }
        self.balances.insert((token, holder), balance - amount);
        Ok(())
    }

    fn credit_token(&mut self, token: Address, holder: Address, amount: U256) {
        let balance = self.token_balance(token, holder);
        self.balances.insert((token, holder), balance + amount);
    }

    fn wrapped_native_token(&self) -> Address {
        crate::constants::WETH
    }

    fn meta(&self, token: Address) -> Result<&TokenMeta, EngineError> {
        self.tokens
            .get(&token)
            .ok_or_else(|| {
                EngineError::Ledger(format!("no asset deployed at {}", address_to_hex(token)))
            })
    }
}

impl Ledger for MemoryLedger {
    fn has_code(&self, account: Address) -> bool {
        self.contracts.contains(&account)
    }

    fn native_balance(&self, account: Address) -> U256 {
        self.native.get(&account).copied().unwrap_or(U256::ZERO)
    }

    fn token_balance(&self, token: Address, holder: Address) -> U256 {
        self.balances.get(&(token, holder)).copied().unwrap_or(U256::ZERO)
    }

    fn token_decimals(&self, token: Address) -> Result<u8, EngineError> {
        Ok(self.meta(token)?.decimals)
    }

    fn token_symbol(&self, token: Address) -> Result<String, EngineError> {
        Ok(self.meta(token)?.symbol.clone())
    }

    fn token_name(&self, token: Address) -> Result<String, EngineError> {
        Ok(self.meta(token)?.name.clone())
    }

    fn token_total_supply(&self, token: Address) -> Result<U256, EngineError> {
        Ok(self.meta(token)?.total_supply)
    }

    fn native_transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: U256
    ) -> Result<(), EngineError> {
        let balance = self.native_balance(from);
        if balance < amount {
            return Err(
                EngineError::Ledger(
                    format!("insufficient native balance of {}", address_to_hex(from))
                )
            );
        }
        self.native.insert(from, balance - amount);
        let to_balance = self.native_balance(to);
        self.native.insert(to, to_balance + amount);
        Ok(())
    }

    fn token_transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256
    ) -> Result<(), EngineError> {
        self.debit_token(token, from, amount)?;
        self.credit_token(token, to, amount);
        Ok(())
    }

    fn wrap_native(&mut self, account: Address, amount: U256) -> Result<(), EngineError> {
        let balance = self.native_balance(account);
        if balance < amount {
            return Err(
                EngineError::Ledger(
                    format!("insufficient native balance of {} to wrap", address_to_hex(account))
                )
            );
        }
        self.native.insert(account, balance - amount);
        let wrapped = self.wrapped_native_token();
        self.credit_token(wrapped, account, amount);
        if let Some(meta) = self.tokens.get_mut(&wrapped) {
            meta.total_supply += amount;
        }
        Ok(())
    }

    fn unwrap_native(&mut self, account: Address, amount: U256) -> Result<(), EngineError> {
        let wrapped = self.wrapped_native_token();
        self.debit_token(wrapped, account, amount)?;
        let balance = self.native_balance(account);
        self.native.insert(account, balance + amount);
        if let Some(meta) = self.tokens.get_mut(&wrapped) {
            meta.total_supply = meta.total_supply.saturating_sub(amount);
        }
        Ok(())
    }

    fn venue_swap(
        &mut self,
        venue: Address,
        recipient: Address,
        zero_for_one: bool,
        amount_specified: I256,
        _sqrt_price_limit_x96: U256,
        data: &[u8],
        callback: &dyn SettlementCallback
    ) -> Result<(I256, I256), EngineError> {
        let account = self.venues
            .get(&venue)
            .copied()
            .ok_or_else(|| {
                EngineError::Ledger(format!("no venue deployed at {}", address_to_hex(venue)))
            })?;
        if amount_specified.is_negative() {
            return Err(EngineError::Ledger("exact-output settlement not supported".to_string()));
        }
        let amount_in = amount_specified.unsigned_abs();
        let (token_in, token_out) = if zero_for_one {
            (account.token0, account.token1)
        } else {
            (account.token1, account.token0)
        };

        let reserve_in = self.token_balance(token_in, venue);
        let reserve_out = self.token_balance(token_out, venue);

        // Constant-product quote with the fee taken from the input leg
        let fee_kept = U256::from(1_000_000u64 - (account.fee as u64));
        let in_after_fee = amount_in
            .checked_mul(fee_kept)
            .ok_or(EngineError::Overflow)? / U256::from(1_000_000u64);
        let denominator = reserve_in + in_after_fee;
        let amount_out = if denominator.is_zero() {
            U256::ZERO
        } else {
            reserve_out.checked_mul(in_after_fee).ok_or(EngineError::Overflow)? / denominator
        };

        let in_delta = I256::try_from(amount_in).map_err(|_| EngineError::Overflow)?;
        let out_delta = -I256::try_from(amount_out).map_err(|_| EngineError::Overflow)?;
        let (delta0, delta1) = if zero_for_one {
            (in_delta, out_delta)
        } else {
            (out_delta, in_delta)
        };

        // Pay the output leg first, then demand funding through the callback
        if !amount_out.is_zero() {
            self.token_transfer(token_out, venue, recipient, amount_out)?;
        }
        let owed_before = self.token_balance(token_in, venue);
        callback.funding_requested(self, venue, delta0, delta1, data)?;
        let owed_after = self.token_balance(token_in, venue);
        if owed_after < owed_before + amount_in {
            return Err(EngineError::Ledger("venue input leg was not funded".to_string()));
        }

        logger::debug(
            LogTag::Ledger,
            &format!(
                "venue {} settled: delta0={} delta1={}",
                address_to_hex(venue),
                delta0,
                delta1
            )
        );
        Ok((delta0, delta1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ DAI, WETH };

    fn test_ledger() -> MemoryLedger {
        let mut ledger = MemoryLedger::new();
        ledger.register_token(WETH, TokenMeta {
            symbol: "WETH".to_string(),
            name: "Wrapped Ether".to_string(),
            decimals: 18,
            total_supply: U256::ZERO,
        });
        ledger.register_token(DAI, TokenMeta {
            symbol: "DAI".to_string(),
            name: "Dai Stablecoin".to_string(),
            decimals: 18,
            total_supply: U256::from(1_000_000u64),
        });
        ledger
    }

    #[test]
    fn test_wrap_unwrap_round_trip() {
        let mut ledger = test_ledger();
        let account = Address::repeat_byte(0xaa);
        ledger.set_native_balance(account, U256::from(100u64));

        ledger.wrap_native(account, U256::from(40u64)).unwrap();
        assert_eq!(ledger.native_balance(account), U256::from(60u64));
        assert_eq!(ledger.token_balance(WETH, account), U256::from(40u64));

        ledger.unwrap_native(account, U256::from(40u64)).unwrap();
        assert_eq!(ledger.native_balance(account), U256::from(100u64));
        assert_eq!(ledger.token_balance(WETH, account), U256::ZERO);
    }

    #[test]
    fn test_transfer_rejects_insufficient_balance() {
        let mut ledger = test_ledger();
        let from = Address::repeat_byte(0x01);
        let to = Address::repeat_byte(0x02);
        let result = ledger.token_transfer(DAI, from, to, U256::from(1u64));
        assert!(matches!(result, Err(EngineError::Ledger(_))));
    }

    #[test]
    fn test_snapshot_restore_discards_effects() {
        let mut ledger = test_ledger();
        let account = Address::repeat_byte(0xbb);
        ledger.set_native_balance(account, U256::from(10u64));
        let checkpoint = ledger.snapshot();

        ledger.wrap_native(account, U256::from(10u64)).unwrap();
        assert_eq!(ledger.native_balance(account), U256::ZERO);

        ledger.restore(checkpoint);
        assert_eq!(ledger.native_balance(account), U256::from(10u64));
        assert_eq!(ledger.token_balance(WETH, account), U256::ZERO);
    }
}
