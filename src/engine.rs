/// Top-level text-to-transaction engine
///
/// Ties the grammar, asset resolution, routing, settlement and translation
/// together behind one dispatch surface: preview (encode only), execute,
/// decode, verify, the read-only query surface and the governance surface.
use alloy_primitives::{ Address, U256 };

use crate::amount::{ bytes_to_address, format_units, hex_to_bytes, parse_amount };
use crate::assets::{ self, ResolvedAsset };
use crate::commands::{ self, RawCommand };
use crate::configs::Configs;
use crate::constants::NATIVE_ASSET;
use crate::errors::EngineError;
use crate::events::Event;
use crate::ledger::Ledger;
use crate::logger::{ self, LogTag };
use crate::names::{ NameResolver, ResolvedName };
use crate::payload::{ encode_native_send, encode_token_send, encode_venue_swap };
use crate::registry::Registry;
use crate::router;
use crate::swap::{ self, CallbackData, SwapContext, SwapOutcome };
use crate::translator;

/// A fully-resolved command, ready to encode or execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Send {
        to: Address,
        amount: U256,
        asset: Address,
    },
    Swap {
        amount_in: U256,
        min_amount_out: U256,
        asset_in: Address,
        asset_out: Address,
    },
}

/// What a simulated execution did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionReceipt {
    Sent {
        to: Address,
        amount: U256,
        asset: Address,
    },
    Swapped(SwapOutcome),
}

/// Raw and decimal-adjusted balance of a named asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceView {
    pub asset: Address,
    pub decimals: u8,
    pub raw: U256,
    pub adjusted: String,
}

pub struct Engine<L: Ledger> {
    registry: Registry,
    resolver: Box<dyn NameResolver>,
    ledger: L,
    /// Account whose intents this engine authors
    requester: Address,
}

impl<L: Ledger> Engine<L> {
    pub fn new(
        registry: Registry,
        resolver: Box<dyn NameResolver>,
        ledger: L,
        requester: Address
    ) -> Self {
        Self { registry, resolver, ledger, requester }
    }

    /// Build an engine from runtime configuration
    pub fn from_configs(
        configs: &Configs,
        registry: Registry,
        resolver: Box<dyn NameResolver>,
        ledger: L
    ) -> Result<Self, EngineError> {
        let requester = parse_account(&configs.account)?;
        Ok(Self::new(registry, resolver, ledger, requester))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn requester(&self) -> Address {
        self.requester
    }

    // =========================================================================
    // FORWARD PATH: text -> command -> payload/effects
    // =========================================================================

    /// Grammar-match a command and resolve every argument
    pub fn parse(&self, text: &str) -> Result<Command, EngineError> {
        match commands::parse(text)? {
            RawCommand::Send(args) => {
                let asset = self.resolve_asset_name(&args.asset)?;
                let decimals = assets::asset_decimals(&self.ledger, &asset)?;
                let amount = parse_amount(&args.amount, decimals)?;
                let to = self.resolve_account(&args.to)?;
                Ok(Command::Send { to, amount, asset: asset.address })
            }
            RawCommand::Swap(args) => {
                let asset_in = self.resolve_asset_name(&args.asset_in)?;
                let asset_out = self.resolve_asset_name(&args.asset_out)?;
                let decimals_in = assets::asset_decimals(&self.ledger, &asset_in)?;
                let decimals_out = assets::asset_decimals(&self.ledger, &asset_out)?;
                let amount_in = parse_amount(&args.amount_in, decimals_in)?;
                let min_amount_out = parse_amount(&args.min_amount_out, decimals_out)?;
                Ok(Command::Swap {
                    amount_in,
                    min_amount_out,
                    asset_in: asset_in.address,
                    asset_out: asset_out.address,
                })
            }
        }
    }

    /// Derive the exact call payload a command would execute, touching nothing
    pub fn preview(&self, text: &str) -> Result<Vec<u8>, EngineError> {
        let command = self.parse(text)?;
        self.encode_command(&command)
    }

    /// Execute a parsed command against the ledger
    pub fn execute(&mut self, text: &str) -> Result<ExecutionReceipt, EngineError> {
        let command = self.parse(text)?;
        logger::info(LogTag::Command, &format!("executing: {:?}", command));
        match command {
            Command::Send { to, amount, asset } => {
                if asset == NATIVE_ASSET {
                    self.ledger.native_transfer(self.requester, to, amount)?;
                } else {
                    self.ledger.token_transfer(asset, self.requester, to, amount)?;
                }
                Ok(ExecutionReceipt::Sent { to, amount, asset })
            }
            Command::Swap { amount_in, min_amount_out, asset_in, asset_out } => {
                let context = SwapContext::build(
                    self.requester,
                    asset_in,
                    asset_out,
                    amount_in,
                    min_amount_out
                )?;
                let outcome = swap::settle(&mut self.ledger, &self.registry, &context)?;
                Ok(ExecutionReceipt::Swapped(outcome))
            }
        }
    }

    fn encode_command(&self, command: &Command) -> Result<Vec<u8>, EngineError> {
        match command {
            Command::Send { to, amount, asset } => {
                if *asset == NATIVE_ASSET {
                    Ok(encode_native_send(*to, *amount))
                } else {
                    Ok(encode_token_send(*asset, *to, *amount))
                }
            }
            Command::Swap { amount_in, min_amount_out, asset_in, asset_out } => {
                let context = SwapContext::build(
                    self.requester,
                    *asset_in,
                    *asset_out,
                    *amount_in,
                    *min_amount_out
                )?;
                let route = router
                    ::route(&self.ledger, &self.registry, context.token_in, context.token_out)
                    .ok_or(EngineError::NoRoute)?;
                let sqrt_price_limit = if route.zero_for_one {
                    *crate::constants::MIN_SQRT_RATIO + U256::from(1u8)
                } else {
                    *crate::constants::MAX_SQRT_RATIO - U256::from(1u8)
                };
                let data = (CallbackData {
                    token_in: context.token_in,
                    token_out: context.token_out,
                    fee: route.fee,
                    payer: context.requester,
                    wrap_in: context.wrap_in,
                    unwrap_out: context.unwrap_out,
                }).encode();
                let amount_specified = alloy_primitives::I256
                    ::try_from(*amount_in)
                    .map_err(|_| EngineError::Overflow)?;
                Ok(
                    encode_venue_swap(
                        route.venue,
                        self.requester,
                        route.zero_for_one,
                        amount_specified,
                        sqrt_price_limit,
                        &data
                    )
                )
            }
        }
    }

    // =========================================================================
    // REVERSE PATH: payload -> text, intent-vs-operation verification
    // =========================================================================

    /// Reconstruct the command phrase a transfer payload implements
    pub fn decode_payload(&self, payload: &[u8]) -> Result<String, EngineError> {
        translator::decode(&self.registry, &self.ledger, payload)
    }

    /// Prove a stated intent and a supplied operation payload identical
    pub fn verify(&self, intent: &str, operation: &[u8]) -> Result<bool, EngineError> {
        let expected = self.preview(intent)?;
        let matched = translator::payloads_match(&expected, operation);
        if !matched {
            logger::warn(
                LogTag::Translate,
                &format!("operation does not match intent '{}'", intent)
            );
        }
        Ok(matched)
    }

    // =========================================================================
    // READ-ONLY QUERY SURFACE
    // =========================================================================

    /// Resolve a human account name with resolution metadata
    pub fn resolve_name(&self, name: &str) -> Option<ResolvedName> {
        self.resolver.resolve(name)
    }

    /// Account balance in a named asset, raw and decimal-adjusted
    pub fn balance_of(&self, account: &str, asset_name: &str) -> Result<BalanceView, EngineError> {
        let asset = self.resolve_asset_name(asset_name)?;
        let decimals = assets::asset_decimals(&self.ledger, &asset)?;
        let holder = self.resolve_account(account)?;
        let raw = if asset.address == NATIVE_ASSET {
            self.ledger.native_balance(holder)
        } else {
            self.ledger.token_balance(asset.address, holder)
        };
        Ok(BalanceView {
            asset: asset.address,
            decimals,
            raw,
            adjusted: format_units(raw, decimals),
        })
    }

    /// Total circulating amount of a named asset, raw and decimal-adjusted
    pub fn total_supply_of(&self, asset_name: &str) -> Result<BalanceView, EngineError> {
        let asset = self.resolve_asset_name(asset_name)?;
        let decimals = assets::asset_decimals(&self.ledger, &asset)?;
        let raw = assets::total_supply(&self.ledger, asset.address)?;
        Ok(BalanceView {
            asset: asset.address,
            decimals,
            raw,
            adjusted: format_units(raw, decimals),
        })
    }

    // =========================================================================
    // GOVERNANCE SURFACE
    // =========================================================================

    pub fn register_alias(
        &self,
        caller: Address,
        name: &str,
        asset: Address
    ) -> Result<(), EngineError> {
        self.registry.register_alias(caller, name, asset)
    }

    /// Derive a full-name alias and a ticker alias from the asset's
    /// self-reported metadata
    pub fn register_alias_from_metadata(
        &self,
        caller: Address,
        asset: Address
    ) -> Result<(), EngineError> {
        let name = self.ledger.token_name(asset)?.to_lowercase();
        let ticker = self.ledger.token_symbol(asset)?.to_lowercase();
        self.registry.register_alias(caller, &name, asset)?;
        self.registry.register_alias(caller, &ticker, asset)?;
        Ok(())
    }

    pub fn register_route(
        &self,
        caller: Address,
        asset_a: Address,
        asset_b: Address,
        venue: Address,
        fee: u32
    ) -> Result<(), EngineError> {
        self.registry.register_route(caller, asset_a, asset_b, venue, fee)
    }

    /// Replace the name-resolution service reference
    pub fn set_resolver(
        &mut self,
        caller: Address,
        resolver: Box<dyn NameResolver>
    ) -> Result<(), EngineError> {
        self.registry.ensure_governor(caller)?;
        let description = resolver.describe();
        self.resolver = resolver;
        self.registry.notify(Event::ResolverReplaced { resolver: description.clone() });
        logger::info(LogTag::Registry, &format!("resolver replaced: {}", description));
        Ok(())
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn resolve_asset_name(&self, name: &str) -> Result<ResolvedAsset, EngineError> {
        assets
            ::resolve_asset(&self.registry, name)
            .ok_or_else(|| EngineError::UnknownAsset(name.to_string()))
    }

    /// An object word is either a literal hex account or a resolvable name
    fn resolve_account(&self, word: &str) -> Result<Address, EngineError> {
        if word.starts_with("0x") {
            let bytes = hex_to_bytes(word)?;
            return bytes_to_address(&bytes);
        }
        self.resolver
            .resolve(word)
            .map(|resolved| resolved.account)
            .ok_or_else(|| EngineError::UnknownName(word.to_string()))
    }
}

fn parse_account(text: &str) -> Result<Address, EngineError> {
    let bytes = hex_to_bytes(text).map_err(|_| {
        EngineError::Config(format!("invalid account '{}'", text))
    })?;
    bytes_to_address(&bytes).map_err(|_| EngineError::Config(format!("invalid account '{}'", text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::constants::{ DAI, WETH };
    use crate::ledger::{ MemoryLedger, TokenMeta };
    use crate::names::StaticNameResolver;

    const GOVERNOR: Address = Address::repeat_byte(0x99);
    const REQUESTER: Address = Address::repeat_byte(0xaa);
    const VITALIK: Address = Address::repeat_byte(0xd8);

    fn eth(amount: u64) -> U256 {
        U256::from(amount) * U256::from(10u64).pow(U256::from(18u64))
    }

    fn test_engine() -> Engine<MemoryLedger> {
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
            total_supply: eth(10_000_000),
        });
        let venue = ledger.register_venue(WETH, DAI, 3000);
        ledger.set_token_balance(WETH, venue, eth(1_000));
        ledger.set_token_balance(DAI, venue, eth(2_500_000));
        ledger.set_native_balance(REQUESTER, eth(100));
        ledger.set_token_balance(DAI, REQUESTER, eth(50_000));

        let mut names = HashMap::new();
        names.insert("vitalik".to_string(), VITALIK);
        Engine::new(
            Registry::new(GOVERNOR),
            Box::new(StaticNameResolver::new(names)),
            ledger,
            REQUESTER
        )
    }

    #[test]
    fn test_parse_send_resolves_name_and_scales_amount() {
        let engine = test_engine();
        let command = engine.parse("send vitalik 20 DAI").unwrap();
        assert_eq!(command, Command::Send { to: VITALIK, amount: eth(20), asset: DAI });
    }

    #[test]
    fn test_parse_swap_defaults_and_explicit_floor() {
        let engine = test_engine();
        let command = engine.parse("swap 1 ETH to DAI").unwrap();
        assert_eq!(command, Command::Swap {
            amount_in: eth(1),
            min_amount_out: U256::ZERO,
            asset_in: NATIVE_ASSET,
            asset_out: DAI,
        });

        let command = engine.parse("swap 1 ETH to 2500 DAI").unwrap();
        match command {
            Command::Swap { min_amount_out, .. } => assert_eq!(min_amount_out, eth(2_500)),
            other => panic!("expected swap, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_asset() {
        let engine = test_engine();
        assert_eq!(
            engine.parse("send vitalik 20 dogecoin"),
            Err(EngineError::UnknownAsset("dogecoin".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_unknown_name() {
        let engine = test_engine();
        assert_eq!(
            engine.parse("send satoshi 20 dai"),
            Err(EngineError::UnknownName("satoshi".to_string()))
        );
    }

    #[test]
    fn test_decode_is_left_inverse_of_preview_for_sends() {
        let engine = test_engine();
        let intent = "send 1 eth to 0x1c0aa8ccccccccccccccccccccccccccccccca20";
        let payload = engine.preview(intent).unwrap();
        assert_eq!(engine.decode_payload(&payload).unwrap(), intent);

        let token_intent = format!("send 20.5 dai to {}", crate::amount::address_to_hex(VITALIK));
        let payload = engine.preview(&token_intent).unwrap();
        assert_eq!(engine.decode_payload(&payload).unwrap(), token_intent);
    }

    #[test]
    fn test_verify_accepts_exact_and_rejects_mutation() {
        let engine = test_engine();
        let intent = "send vitalik 20 dai";
        let payload = engine.preview(intent).unwrap();
        assert!(engine.verify(intent, &payload).unwrap());

        let mut mutated = payload.clone();
        mutated[10] ^= 0x01;
        assert!(!engine.verify(intent, &mutated).unwrap());
    }

    #[test]
    fn test_verify_covers_swap_intents() {
        let engine = test_engine();
        let intent = "swap 1 eth to 2500 dai";
        let payload = engine.preview(intent).unwrap();
        assert!(engine.verify(intent, &payload).unwrap());
    }

    #[test]
    fn test_execute_send_moves_funds() {
        let mut engine = test_engine();
        engine.execute("send vitalik 20 dai").unwrap();
        assert_eq!(engine.ledger().token_balance(DAI, VITALIK), eth(20));

        engine.execute("send 1 eth to vitalik").unwrap();
        assert_eq!(engine.ledger().native_balance(VITALIK), eth(1));
    }

    #[test]
    fn test_execute_swap_end_to_end() {
        let mut engine = test_engine();
        let receipt = engine.execute("swap 1 eth to 2400 dai").unwrap();
        match receipt {
            ExecutionReceipt::Swapped(outcome) => {
                assert!(outcome.amount_out >= eth(2_400));
                assert_eq!(
                    engine.ledger().token_balance(DAI, REQUESTER),
                    eth(50_000) + outcome.amount_out
                );
            }
            other => panic!("expected swap receipt, got {:?}", other),
        }
    }

    #[test]
    fn test_three_word_command_fails() {
        let engine = test_engine();
        assert!(matches!(engine.parse("send 20 dai"), Err(EngineError::InvalidSyntax(_))));
    }

    #[test]
    fn test_balance_query_adjusts_decimals() {
        let engine = test_engine();
        let view = engine
            .balance_of(&crate::amount::address_to_hex(REQUESTER), "dai")
            .unwrap();
        assert_eq!(view.raw, eth(50_000));
        assert_eq!(view.adjusted, "50000");
    }

    #[test]
    fn test_total_supply_query() {
        let engine = test_engine();
        let view = engine.total_supply_of("dai").unwrap();
        assert_eq!(view.raw, eth(10_000_000));
        assert_eq!(view.adjusted, "10000000");
    }

    #[test]
    fn test_metadata_alias_registration() {
        let mut engine = test_engine();
        let token = Address::repeat_byte(0x42);
        engine.ledger_mut().register_token(token, TokenMeta {
            symbol: "MYT".to_string(),
            name: "My Token".to_string(),
            decimals: 9,
            total_supply: U256::from(1u64),
        });
        engine.register_alias_from_metadata(GOVERNOR, token).unwrap();
        assert_eq!(engine.registry().alias("my token"), Some(token));
        assert_eq!(engine.registry().alias("myt"), Some(token));
    }

    #[test]
    fn test_set_resolver_is_governance_gated() {
        let mut engine = test_engine();
        let empty = Box::new(StaticNameResolver::new(HashMap::new()));
        assert_eq!(
            engine.set_resolver(REQUESTER, empty),
            Err(EngineError::Unauthorized)
        );

        let replacement = Box::new(StaticNameResolver::new(HashMap::new()));
        engine.set_resolver(GOVERNOR, replacement).unwrap();
        assert!(engine.resolve_name("vitalik").is_none());
    }
}
