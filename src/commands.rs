/// Command grammar and dispatch
///
/// Commands are whitespace-delimited, case-insensitive, and keyed entirely by
/// word count: arity alone disambiguates the two shapes each intent accepts.
/// There is no tokenizer state machine, only positional slicing.
use crate::errors::EngineError;

/// Canonical intents behind the action synonyms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Send,
    Swap,
}

/// Positional arguments of a matched send command (still raw text)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendArgs {
    pub to: String,
    pub amount: String,
    pub asset: String,
}

/// Positional arguments of a matched swap command (still raw text)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapArgs {
    pub amount_in: String,
    pub asset_in: String,
    /// Empty string means no stated floor (interpreted as zero)
    pub min_amount_out: String,
    pub asset_out: String,
}

/// A grammar-matched command before asset/name/amount resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCommand {
    Send(SendArgs),
    Swap(SwapArgs),
}

/// Lowercase the input and split it into ordered words
pub fn normalize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Map the first word onto a canonical intent via the fixed synonym table
pub fn classify(words: &[String]) -> Result<Action, EngineError> {
    let action = words
        .first()
        .ok_or_else(|| EngineError::InvalidSyntax("empty command".to_string()))?;
    match action.as_str() {
        "send" | "transfer" | "pay" | "grant" => Ok(Action::Send),
        "swap" | "exchange" | "stake" | "deposit" | "unstake" | "withdraw" => Ok(Action::Swap),
        other => Err(EngineError::InvalidSyntax(format!("unknown action '{}'", other))),
    }
}

/// Match a send command against its two fixed word-count shapes
///
/// 4 words: [action] [object] [value] [asset]
/// 5 words: [action] [value] [asset] [filler] [object]
/// The filler word is skipped positionally, not validated.
pub fn match_send(words: &[String]) -> Result<SendArgs, EngineError> {
    match words.len() {
        4 =>
            Ok(SendArgs {
                to: words[1].clone(),
                amount: words[2].clone(),
                asset: words[3].clone(),
            }),
        5 =>
            Ok(SendArgs {
                amount: words[1].clone(),
                asset: words[2].clone(),
                to: words[4].clone(),
            }),
        n => Err(EngineError::InvalidSyntax(format!("send takes 4 or 5 words, got {}", n))),
    }
}

/// Match a swap command against its two fixed word-count shapes
///
/// 5 words: [action] [value] [asset] [filler] [object], no stated floor
/// 6 words: [action] [value] [asset] [filler] [minOutputValue] [object]
pub fn match_swap(words: &[String]) -> Result<SwapArgs, EngineError> {
    match words.len() {
        5 =>
            Ok(SwapArgs {
                amount_in: words[1].clone(),
                asset_in: words[2].clone(),
                min_amount_out: String::new(),
                asset_out: words[4].clone(),
            }),
        6 =>
            Ok(SwapArgs {
                amount_in: words[1].clone(),
                asset_in: words[2].clone(),
                min_amount_out: words[4].clone(),
                asset_out: words[5].clone(),
            }),
        n => Err(EngineError::InvalidSyntax(format!("swap takes 5 or 6 words, got {}", n))),
    }
}

/// Normalize, classify and grammar-match a command in one step
pub fn parse(text: &str) -> Result<RawCommand, EngineError> {
    let words = normalize(text);
    match classify(&words)? {
        Action::Send => match_send(&words).map(RawCommand::Send),
        Action::Swap => match_swap(&words).map(RawCommand::Swap),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_synonyms() {
        for action in ["send", "transfer", "pay", "grant"] {
            let words = normalize(&format!("{} x 1 dai", action));
            assert_eq!(classify(&words).unwrap(), Action::Send);
        }
        for action in ["swap", "exchange", "stake", "deposit", "unstake", "withdraw"] {
            let words = normalize(&format!("{} 1 eth to dai", action));
            assert_eq!(classify(&words).unwrap(), Action::Swap);
        }
    }

    #[test]
    fn test_classify_rejects_unknown_action() {
        let words = normalize("teleport 1 eth to dai");
        assert!(matches!(classify(&words), Err(EngineError::InvalidSyntax(_))));
    }

    #[test]
    fn test_send_four_words() {
        let args = match_send(&normalize("send vitalik 20 dai")).unwrap();
        assert_eq!(args.to, "vitalik");
        assert_eq!(args.amount, "20");
        assert_eq!(args.asset, "dai");
    }

    #[test]
    fn test_send_five_words_any_filler() {
        for filler in ["to", "for"] {
            let args = match_send(&normalize(&format!("send 20 dai {} vitalik", filler))).unwrap();
            assert_eq!(args.to, "vitalik");
            assert_eq!(args.amount, "20");
            assert_eq!(args.asset, "dai");
        }
        // Filler position is skipped, not validated
        let args = match_send(&normalize("send 20 dai banana vitalik")).unwrap();
        assert_eq!(args.to, "vitalik");
    }

    #[test]
    fn test_send_wrong_arity() {
        assert!(matches!(parse("send 20 dai"), Err(EngineError::InvalidSyntax(_))));
        assert!(
            matches!(parse("send 20 dai to vitalik now"), Err(EngineError::InvalidSyntax(_)))
        );
    }

    #[test]
    fn test_swap_five_words_defaults_floor() {
        let args = match_swap(&normalize("swap 1 eth to dai")).unwrap();
        assert_eq!(args.amount_in, "1");
        assert_eq!(args.asset_in, "eth");
        assert_eq!(args.min_amount_out, "");
        assert_eq!(args.asset_out, "dai");
    }

    #[test]
    fn test_swap_six_words_with_floor() {
        let args = match_swap(&normalize("swap 1 eth to 2500 dai")).unwrap();
        assert_eq!(args.min_amount_out, "2500");
        assert_eq!(args.asset_out, "dai");
    }

    #[test]
    fn test_swap_wrong_arity() {
        assert!(matches!(parse("swap 1 eth"), Err(EngineError::InvalidSyntax(_))));
        assert!(
            matches!(parse("swap 1 eth to 2500 dai fast"), Err(EngineError::InvalidSyntax(_)))
        );
    }

    #[test]
    fn test_case_normalization() {
        let parsed = parse("SEND Vitalik 20 DAI").unwrap();
        match parsed {
            RawCommand::Send(args) => {
                assert_eq!(args.to, "vitalik");
                assert_eq!(args.asset, "dai");
            }
            other => panic!("expected send, got {:?}", other),
        }
    }
}
