/// Swap settlement and the venue funding callback
///
/// Settlement invokes the routed venue's exchange primitive; mid-call the
/// venue synchronously requests funding through `CallbackHandler`, which
/// authenticates the caller by re-deriving the expected venue identifier
/// before any fund movement. True slippage protection is the post-settlement
/// minimum-output check, not the price-limit bound.
use alloy_primitives::{ Address, I256, U256 };

use crate::amount::{ address_to_hex, to_decimal_string };
use crate::constants::{
    FACTORY,
    MAX_SQRT_RATIO,
    MIN_SQRT_RATIO,
    NATIVE_ASSET,
    SIGNED_MAGNITUDE_BOUND,
    WETH,
};
use crate::errors::EngineError;
use crate::ledger::{ Ledger, SettlementCallback };
use crate::logger::{ self, LogTag };
use crate::registry::Registry;
use crate::router::{ self, canonical_pair, derive_venue };

/// Resolved state for one swap invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapContext {
    pub requester: Address,
    /// Input asset in its venue-tradable (wrapped) form
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    pub min_amount_out: U256,
    /// The input leg was stated as the native asset
    pub wrap_in: bool,
    /// The output leg should be returned in native form
    pub unwrap_out: bool,
}

impl SwapContext {
    /// Build a context from stated assets, translating native legs to the
    /// wrapped form and rejecting amounts past the signed magnitude bound
    pub fn build(
        requester: Address,
        asset_in: Address,
        asset_out: Address,
        amount_in: U256,
        min_amount_out: U256
    ) -> Result<Self, EngineError> {
        if amount_in >= *SIGNED_MAGNITUDE_BOUND {
            return Err(EngineError::Overflow);
        }
        let wrap_in = asset_in == NATIVE_ASSET;
        let unwrap_out = asset_out == NATIVE_ASSET;
        Ok(Self {
            requester,
            token_in: if wrap_in { WETH } else { asset_in },
            token_out: if unwrap_out { WETH } else { asset_out },
            amount_in,
            min_amount_out,
            wrap_in,
            unwrap_out,
        })
    }
}

/// Outcome of a settled swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutcome {
    pub amount_in: U256,
    pub amount_out: U256,
    pub venue: Address,
    pub fee: u32,
}

/// Opaque side-channel payload attached to a settlement request so the
/// callback can recover the pair, fee, payer and bridging flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackData {
    pub token_in: Address,
    pub token_out: Address,
    pub fee: u32,
    pub payer: Address,
    pub wrap_in: bool,
    pub unwrap_out: bool,
}

/// Fixed side-channel layout: token_in(20) token_out(20) fee(4) payer(20)
/// wrap_in(1) unwrap_out(1)
pub const CALLBACK_DATA_LEN: usize = 66;

impl CallbackData {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(CALLBACK_DATA_LEN);
        out.extend_from_slice(self.token_in.as_slice());
        out.extend_from_slice(self.token_out.as_slice());
        out.extend_from_slice(&self.fee.to_be_bytes());
        out.extend_from_slice(self.payer.as_slice());
        out.push(self.wrap_in as u8);
        out.push(self.unwrap_out as u8);
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, EngineError> {
        if bytes.len() != CALLBACK_DATA_LEN {
            return Err(EngineError::InvalidSyntax("malformed settlement side-channel".to_string()));
        }
        let mut fee_bytes = [0u8; 4];
        fee_bytes.copy_from_slice(&bytes[40..44]);
        Ok(Self {
            token_in: Address::from_slice(&bytes[0..20]),
            token_out: Address::from_slice(&bytes[20..40]),
            fee: u32::from_be_bytes(fee_bytes),
            payer: Address::from_slice(&bytes[44..64]),
            wrap_in: bytes[64] != 0,
            unwrap_out: bytes[65] != 0,
        })
    }
}

/// Handles the venue's synchronous funding callback
pub struct CallbackHandler;

impl SettlementCallback for CallbackHandler {
    fn funding_requested(
        &self,
        ledger: &mut dyn Ledger,
        caller: Address,
        amount0_delta: I256,
        amount1_delta: I256,
        data: &[u8]
    ) -> Result<(), EngineError> {
        // Nothing actually traded: reject before looking at the caller
        if amount0_delta <= I256::ZERO && amount1_delta <= I256::ZERO {
            return Err(EngineError::InvalidSwap);
        }

        let context = CallbackData::decode(data)?;
        let (token0, token1, _) = canonical_pair(context.token_in, context.token_out);
        let expected = derive_venue(FACTORY, token0, token1, context.fee);
        if caller != expected {
            return Err(EngineError::UnauthorizedCallback {
                expected: address_to_hex(expected),
                actual: address_to_hex(caller),
            });
        }

        // Authenticated: fund the input leg
        let owed_delta = if context.token_in == token0 { amount0_delta } else { amount1_delta };
        if owed_delta <= I256::ZERO {
            return Err(EngineError::InvalidSwap);
        }
        let owed = owed_delta.unsigned_abs();
        if context.wrap_in {
            ledger.wrap_native(context.payer, owed)?;
        }
        ledger.token_transfer(context.token_in, context.payer, caller, owed)?;

        // Return the realized output in native form when requested
        if context.unwrap_out {
            let out_delta = if context.token_in == token0 { amount1_delta } else { amount0_delta };
            if out_delta.is_negative() {
                ledger.unwrap_native(context.payer, out_delta.unsigned_abs())?;
            }
        }
        Ok(())
    }
}

/// Settle a swap through the routed venue and enforce the output floor
pub fn settle(
    ledger: &mut dyn Ledger,
    registry: &Registry,
    context: &SwapContext
) -> Result<SwapOutcome, EngineError> {
    if context.amount_in >= *SIGNED_MAGNITUDE_BOUND {
        return Err(EngineError::Overflow);
    }

    let route = router
        ::route(ledger, registry, context.token_in, context.token_out)
        .ok_or(EngineError::NoRoute)?;

    // Conservative worst-price bound for the trade direction
    let sqrt_price_limit = if route.zero_for_one {
        *MIN_SQRT_RATIO + U256::from(1u8)
    } else {
        *MAX_SQRT_RATIO - U256::from(1u8)
    };

    let data = (CallbackData {
        token_in: context.token_in,
        token_out: context.token_out,
        fee: route.fee,
        payer: context.requester,
        wrap_in: context.wrap_in,
        unwrap_out: context.unwrap_out,
    }).encode();

    let amount_specified = I256::try_from(context.amount_in).map_err(|_| EngineError::Overflow)?;

    logger::debug(
        LogTag::Swap,
        &format!(
            "settling {} of {} via {} (fee {})",
            to_decimal_string(context.amount_in),
            address_to_hex(context.token_in),
            address_to_hex(route.venue),
            route.fee
        )
    );

    let (delta0, delta1) = ledger.venue_swap(
        route.venue,
        context.requester,
        route.zero_for_one,
        amount_specified,
        sqrt_price_limit,
        &data,
        &CallbackHandler
    )?;

    // Realized output is the negative delta on the output side
    let out_delta = if route.zero_for_one { delta1 } else { delta0 };
    let realized = if out_delta.is_negative() { out_delta.unsigned_abs() } else { U256::ZERO };

    if realized < context.min_amount_out {
        return Err(EngineError::InsufficientSwap {
            minimum: to_decimal_string(context.min_amount_out),
            actual: to_decimal_string(realized),
        });
    }

    logger::info(
        LogTag::Swap,
        &format!(
            "settled: {} in, {} out via {}",
            to_decimal_string(context.amount_in),
            to_decimal_string(realized),
            address_to_hex(route.venue)
        )
    );

    Ok(SwapOutcome {
        amount_in: context.amount_in,
        amount_out: realized,
        venue: route.venue,
        fee: route.fee,
    })
}
