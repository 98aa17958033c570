/// Structured error handling for intentbot
///
/// Every failure aborts the whole invocation; nothing is retried internally.
/// Retry, if any, is a caller-level decision outside this engine.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Unknown action, wrong word count, malformed hex/account text
    #[error("invalid syntax: {0}")]
    InvalidSyntax(String),

    /// Non-digit/non-point character in an amount string
    #[error("invalid character '{0}' in amount")]
    InvalidCharacter(char),

    /// Decoded payload's nested call is not an asset transfer
    #[error("nested call selector 0x{0} is not an asset transfer")]
    InvalidSelector(String),

    /// Settlement produced no positive delta
    #[error("swap settled with no positive delta")]
    InvalidSwap,

    /// Realized output below the command's stated minimum
    #[error("swap output {actual} below stated minimum {minimum}")]
    InsufficientSwap {
        minimum: String,
        actual: String,
    },

    /// Input amount at/above the representable signed magnitude
    #[error("amount exceeds the representable signed magnitude")]
    Overflow,

    /// Asset name resolved by neither the built-in nor the governance table
    #[error("unknown asset '{0}'")]
    UnknownAsset(String),

    /// Name-resolution service has no entry for this account name
    #[error("unresolvable account name '{0}'")]
    UnknownName(String),

    /// No curated, governed or derived venue exists for the pair
    #[error("no route available for pair")]
    NoRoute,

    /// Settlement callback arrived from a caller other than the derived venue
    #[error("settlement callback from {actual}, expected venue {expected}")]
    UnauthorizedCallback {
        expected: String,
        actual: String,
    },

    /// Caller is not the governance principal
    #[error("caller is not the governance principal")]
    Unauthorized,

    /// Failure reported by the ledger substrate
    #[error("ledger: {0}")]
    Ledger(String),

    /// Invalid or missing configuration
    #[error("configuration: {0}")]
    Config(String),
}
