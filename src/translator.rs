/// Payload-to-command translation and operation verification
///
/// The decoder is the signer's safety net: it re-renders a raw transfer
/// payload as the command phrase it implements. The verifier proves a
/// caller-supplied operation identical to the payload its stated intent
/// parses into, byte for byte.
use alloy_primitives::Address;

use crate::amount::{ address_to_hex, format_units };
use crate::assets;
use crate::constants::NATIVE_DECIMALS;
use crate::errors::EngineError;
use crate::ledger::Ledger;
use crate::logger::{ self, LogTag };
use crate::payload::{ decode_call, decode_transfer };
use crate::registry::Registry;

/// Reconstruct the command phrase a transfer payload implements
///
/// A non-zero native value renders directly as a native send. A zero value
/// requires the nested call to be exactly an asset transfer.
pub fn decode(
    registry: &Registry,
    ledger: &dyn Ledger,
    payload: &[u8]
) -> Result<String, EngineError> {
    let call = decode_call(payload)?;

    if !call.value.is_zero() {
        let phrase = format!(
            "send {} eth to {}",
            format_units(call.value, NATIVE_DECIMALS),
            address_to_hex(call.target)
        );
        logger::debug(LogTag::Translate, &format!("decoded native send: {}", phrase));
        return Ok(phrase);
    }

    let transfer = decode_transfer(&call.nested)?;
    let alias = assets::display_name(registry, ledger, call.target)?;
    let decimals = assets::decimals_for(ledger, call.target)?;
    let phrase = format!(
        "send {} {} to {}",
        format_units(transfer.amount, decimals),
        alias,
        address_to_hex(transfer.recipient)
    );
    logger::debug(LogTag::Translate, &format!("decoded token send: {}", phrase));
    Ok(phrase)
}

/// Exact-match comparison between the expected and supplied payloads
///
/// Length first, then content; any byte-level mismatch is a verification
/// failure, never "probably fine".
pub fn payloads_match(expected: &[u8], operation: &[u8]) -> bool {
    if expected.len() != operation.len() {
        return false;
    }
    expected == operation
}

/// Render an account identifier for phrases and logs
pub fn render_account(account: Address) -> String {
    address_to_hex(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use crate::amount::parse_amount;
    use crate::constants::{ DAI, TRANSFER_SELECTOR };
    use crate::ledger::MemoryLedger;
    use crate::payload::{ encode_native_send, encode_token_send };

    fn recipient() -> Address {
        Address::repeat_byte(0x1c)
    }

    #[test]
    fn test_decode_native_send() {
        let registry = Registry::new(Address::repeat_byte(0x01));
        let ledger = MemoryLedger::new();
        let amount = parse_amount("1", 18).unwrap();
        let payload = encode_native_send(recipient(), amount);

        let phrase = decode(&registry, &ledger, &payload).unwrap();
        assert_eq!(phrase, format!("send 1 eth to {}", address_to_hex(recipient())));
    }

    #[test]
    fn test_decode_token_send_uses_alias() {
        let registry = Registry::new(Address::repeat_byte(0x01));
        let ledger = MemoryLedger::new();
        let amount = parse_amount("20.5", 18).unwrap();
        let payload = encode_token_send(DAI, recipient(), amount);

        let phrase = decode(&registry, &ledger, &payload).unwrap();
        assert_eq!(phrase, format!("send 20.5 dai to {}", address_to_hex(recipient())));
    }

    #[test]
    fn test_decode_rejects_foreign_nested_selector() {
        let registry = Registry::new(Address::repeat_byte(0x01));
        let ledger = MemoryLedger::new();
        let mut payload = encode_token_send(DAI, recipient(), U256::from(1u64));
        // Flip the nested selector into something that is not a transfer
        let selector_offset = 68;
        payload[selector_offset] ^= 0x01;
        assert_ne!(&payload[selector_offset..selector_offset + 4], &*TRANSFER_SELECTOR);

        let result = decode(&registry, &ledger, &payload);
        assert!(matches!(result, Err(EngineError::InvalidSelector(_))));
    }

    #[test]
    fn test_payloads_match_is_exact() {
        let payload = encode_native_send(recipient(), U256::from(5u64));
        assert!(payloads_match(&payload, &payload.clone()));

        // Any single-byte mutation fails verification
        for index in 0..payload.len() {
            let mut mutated = payload.clone();
            mutated[index] ^= 0x01;
            assert!(!payloads_match(&payload, &mutated), "byte {} accepted", index);
        }

        // Length mismatch fails even when the prefix agrees
        let mut padded = payload.clone();
        padded.push(0);
        assert!(!payloads_match(&payload, &padded));
    }
}
