//! Error types for swap quote consumption

use lazy_static::lazy_static;
use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Failures raised by a settlement path (direct exchange or coordinator relay)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("signature request denied by signer")]
    SignatureDenied,

    #[error("exchange reverted with IncompleteFillError")]
    IncompleteFill,

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),
}

lazy_static! {
    /// Hex form of `IncompleteFillError(uint8,uint256,uint256)`'s selector, no 0x prefix
    static ref INCOMPLETE_FILL_SELECTOR: String = {
        let digest = Keccak256::digest(b"IncompleteFillError(uint8,uint256,uint256)");
        hex::encode(&digest[..4])
    };
}

const SIGNATURE_DENIED_PHRASES: &[&str] = &[
    "user denied",
    "user rejected",
    "denied transaction signature",
    "denied message signature",
];

impl SubmissionError {
    /// Map a raw provider/relay error message onto a variant
    pub fn classify(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();

        if SIGNATURE_DENIED_PHRASES.iter().any(|p| lower.contains(p)) {
            return SubmissionError::SignatureDenied;
        }
        if lower.contains(INCOMPLETE_FILL_SELECTOR.as_str()) || lower.contains("incompletefillerror") {
            return SubmissionError::IncompleteFill;
        }
        if lower.contains("execution reverted")
            || lower.contains("rejected")
            || lower.contains("insufficient funds")
        {
            return SubmissionError::Rejected(message.to_string());
        }

        SubmissionError::Transport(message.to_string())
    }

    /// Label used for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            SubmissionError::SignatureDenied => "signature_denied",
            SubmissionError::IncompleteFill => "incomplete_fill",
            SubmissionError::Rejected(_) => "rejected",
            SubmissionError::Transport(_) => "transport",
        }
    }
}

/// Main error type for quote consumption
#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Invalid swap quote: {0}")]
    InvalidQuote(String),

    #[error("Invalid taker address: {0}")]
    InvalidAddress(String),

    #[error("Invalid gas limit: {0}")]
    InvalidGasLimit(String),

    #[error("Invalid eth amount: {0}")]
    InvalidValue(String),

    #[error("No taker address supplied and provider has no default sender")]
    NoSenderAvailable,

    #[error("Swap submission failed: {0}")]
    SubmissionFailed(#[from] SubmissionError),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SwapError {
    /// Check if the error was raised by local validation, before any I/O
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SwapError::InvalidQuote(_)
                | SwapError::InvalidAddress(_)
                | SwapError::InvalidGasLimit(_)
                | SwapError::InvalidValue(_)
        )
    }

    /// Label used for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            SwapError::InvalidQuote(_) => "invalid_quote",
            SwapError::InvalidAddress(_) => "invalid_address",
            SwapError::InvalidGasLimit(_) => "invalid_gas_limit",
            SwapError::InvalidValue(_) => "invalid_value",
            SwapError::NoSenderAvailable => "no_sender",
            SwapError::SubmissionFailed(inner) => inner.reason(),
            SwapError::Provider(_) => "provider",
            SwapError::Config(_) => "config",
        }
    }
}

/// Result type for quote consumption
pub type SwapResult<T> = Result<T, SwapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_denied_signature() {
        assert_eq!(
            SubmissionError::classify("MetaMask Tx Signature: User denied transaction signature."),
            SubmissionError::SignatureDenied
        );
    }

    #[test]
    fn classifies_incomplete_fill_revert_data() {
        let msg = format!(
            "execution reverted: 0x{}0000000000000000000000000000000000000000000000000000000000000001",
            *INCOMPLETE_FILL_SELECTOR
        );
        assert_eq!(SubmissionError::classify(&msg), SubmissionError::IncompleteFill);
    }

    #[test]
    fn classifies_other_reverts_as_rejected() {
        let err = SubmissionError::classify("execution reverted: ORDER_EXPIRED");
        assert!(matches!(err, SubmissionError::Rejected(_)));
    }

    #[test]
    fn unknown_messages_are_transport_errors() {
        let err = SubmissionError::classify("connection reset by peer");
        assert_eq!(err, SubmissionError::Transport("connection reset by peer".to_string()));
    }

    #[test]
    fn submission_errors_convert_into_swap_errors() {
        let err: SwapError = SubmissionError::IncompleteFill.into();
        assert!(matches!(err, SwapError::SubmissionFailed(SubmissionError::IncompleteFill)));
        assert!(!err.is_validation());
        assert_eq!(err.reason(), "incomplete_fill");
    }

    #[test]
    fn validation_errors_are_flagged() {
        assert!(SwapError::InvalidAddress("0x12".into()).is_validation());
        assert!(!SwapError::NoSenderAvailable.is_validation());
    }
}
