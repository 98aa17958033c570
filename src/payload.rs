/// Call payload byte layout
///
/// Outer payload: selector(4) | target word(32) | native-value word(32),
/// optionally followed by nested calldata. The nested asset-transfer layout
/// is selector(4) | recipient word(32) | amount word(32). Offsets are fixed;
/// decoding slices positionally.
use alloy_primitives::{ Address, I256, U256 };

use crate::amount::bytes_to_address;
use crate::constants::{ CALL_SELECTOR, TRANSFER_SELECTOR, VENUE_SWAP_SELECTOR };
use crate::errors::EngineError;

const WORD: usize = 32;

/// Outer header length: selector + target word + value word
pub const CALL_HEADER_LEN: usize = 4 + 2 * WORD;

/// Exact length of a nested asset-transfer call
pub const TRANSFER_CALL_LEN: usize = 4 + 2 * WORD;

/// An account identifier left-padded into a 32-byte word
fn address_word(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    word
}

fn bool_word(value: bool) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[31] = value as u8;
    word
}

/// Encode the outer call payload
pub fn encode_call(target: Address, value: U256, nested: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(CALL_HEADER_LEN + nested.len());
    out.extend_from_slice(&*CALL_SELECTOR);
    out.extend_from_slice(&address_word(target));
    out.extend_from_slice(&value.to_be_bytes::<32>());
    out.extend_from_slice(nested);
    out
}

/// Encode a nested asset-transfer call
pub fn encode_transfer(recipient: Address, amount: U256) -> Vec<u8> {
    let mut out = Vec::with_capacity(TRANSFER_CALL_LEN);
    out.extend_from_slice(&*TRANSFER_SELECTOR);
    out.extend_from_slice(&address_word(recipient));
    out.extend_from_slice(&amount.to_be_bytes::<32>());
    out
}

/// Payload for a native-asset send: value carried in the header, no nested call
pub fn encode_native_send(to: Address, amount: U256) -> Vec<u8> {
    encode_call(to, amount, &[])
}

/// Payload for a token send: zero native value, nested transfer call
pub fn encode_token_send(token: Address, recipient: Address, amount: U256) -> Vec<u8> {
    encode_call(token, U256::ZERO, &encode_transfer(recipient, amount))
}

/// Payload for a venue settlement call, with the opaque side-channel bytes
/// appended as a length-prefixed tail padded to word width
pub fn encode_venue_swap(
    venue: Address,
    recipient: Address,
    zero_for_one: bool,
    amount_specified: I256,
    sqrt_price_limit_x96: U256,
    data: &[u8]
) -> Vec<u8> {
    let mut nested = Vec::with_capacity(4 + 7 * WORD + data.len());
    nested.extend_from_slice(&*VENUE_SWAP_SELECTOR);
    nested.extend_from_slice(&address_word(recipient));
    nested.extend_from_slice(&bool_word(zero_for_one));
    nested.extend_from_slice(&amount_specified.to_be_bytes::<32>());
    nested.extend_from_slice(&sqrt_price_limit_x96.to_be_bytes::<32>());
    // Dynamic tail: offset to the bytes argument, then length, then payload
    nested.extend_from_slice(&U256::from(5 * WORD).to_be_bytes::<32>());
    nested.extend_from_slice(&U256::from(data.len()).to_be_bytes::<32>());
    nested.extend_from_slice(data);
    let padding = (WORD - (data.len() % WORD)) % WORD;
    nested.extend(std::iter::repeat(0u8).take(padding));

    encode_call(venue, U256::ZERO, &nested)
}

/// Fixed-offset view of the outer call payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCall {
    pub target: Address,
    pub value: U256,
    pub nested: Vec<u8>,
}

/// Read the target-account and native-value header off a payload
pub fn decode_call(payload: &[u8]) -> Result<DecodedCall, EngineError> {
    if payload.len() < CALL_HEADER_LEN {
        return Err(
            EngineError::InvalidSyntax(
                format!("payload of {} bytes is shorter than the call header", payload.len())
            )
        );
    }
    let target = bytes_to_address(&payload[4..36])?;
    let value = U256::from_be_slice(&payload[36..68]);
    Ok(DecodedCall {
        target,
        value,
        nested: payload[CALL_HEADER_LEN..].to_vec(),
    })
}

/// Decoded nested asset-transfer call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedTransfer {
    pub recipient: Address,
    pub amount: U256,
}

/// Decode a nested call that must be exactly an asset transfer
pub fn decode_transfer(nested: &[u8]) -> Result<DecodedTransfer, EngineError> {
    if nested.len() < 4 || nested[..4] != *TRANSFER_SELECTOR {
        let found: String = nested
            .iter()
            .take(4)
            .map(|b| format!("{:02x}", b))
            .collect();
        return Err(EngineError::InvalidSelector(found));
    }
    if nested.len() < TRANSFER_CALL_LEN {
        return Err(EngineError::InvalidSyntax("transfer calldata truncated".to_string()));
    }
    let recipient = bytes_to_address(&nested[4..36])?;
    let amount = U256::from_be_slice(&nested[36..68]);
    Ok(DecodedTransfer { recipient, amount })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_send_layout() {
        let to = Address::repeat_byte(0xab);
        let amount = U256::from(1_000_000u64);
        let payload = encode_native_send(to, amount);

        assert_eq!(payload.len(), CALL_HEADER_LEN);
        assert_eq!(&payload[..4], &*CALL_SELECTOR);
        let decoded = decode_call(&payload).unwrap();
        assert_eq!(decoded.target, to);
        assert_eq!(decoded.value, amount);
        assert!(decoded.nested.is_empty());
    }

    #[test]
    fn test_token_send_round_trip() {
        let token = Address::repeat_byte(0x6b);
        let recipient = Address::repeat_byte(0xcd);
        let amount = U256::from(42u64);
        let payload = encode_token_send(token, recipient, amount);

        let call = decode_call(&payload).unwrap();
        assert_eq!(call.target, token);
        assert_eq!(call.value, U256::ZERO);
        let transfer = decode_transfer(&call.nested).unwrap();
        assert_eq!(transfer.recipient, recipient);
        assert_eq!(transfer.amount, amount);
    }

    #[test]
    fn test_decode_rejects_short_payload() {
        assert!(matches!(decode_call(&[0u8; 10]), Err(EngineError::InvalidSyntax(_))));
    }

    #[test]
    fn test_decode_rejects_foreign_nested_selector() {
        let mut nested = encode_transfer(Address::repeat_byte(0x01), U256::from(1u64));
        nested[0] ^= 0xff;
        assert!(matches!(decode_transfer(&nested), Err(EngineError::InvalidSelector(_))));
    }

    #[test]
    fn test_venue_swap_payload_is_word_aligned() {
        let payload = encode_venue_swap(
            Address::repeat_byte(0x01),
            Address::repeat_byte(0x02),
            true,
            I256::try_from(U256::from(10u64)).unwrap(),
            U256::from(1u64),
            &[0xaa; 66]
        );
        assert_eq!((payload.len() - CALL_HEADER_LEN - 4) % 32, 0);
    }
}
