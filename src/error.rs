//! Errors reported by the scan-chain programmer.
use thiserror::Error;

use crate::chain::ScanChain;

/// Why a programming request was rejected before touching the FIFO.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("unknown IO scan chain {0}")]
    UnknownChain(u32),
    #[error("table for {chain:?} holds {provided_words} words, {required_words} needed")]
    TableTooShort {
        chain: ScanChain,
        required_words: usize,
        provided_words: usize,
    },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// The engine stayed active, or its write FIFO non-empty, for the whole polling budget.
    /// The chain being programmed is left in an undefined state.
    #[error("scan engine still active after {iterations} status polls")]
    EngineTimeout { iterations: u32 },
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

pub type Result<T> = core::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages() {
        assert_eq!(
            ScanError::EngineTimeout { iterations: 100 }.to_string(),
            "scan engine still active after 100 status polls"
        );
        let err: ScanError = InvalidInput::UnknownChain(4).into();
        assert_eq!(err.to_string(), "invalid input: unknown IO scan chain 4");
        let err: ScanError = InvalidInput::TableTooShort {
            chain: ScanChain::Chain1,
            required_words: 4,
            provided_words: 3,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "invalid input: table for Chain1 holds 3 words, 4 needed"
        );
    }
}
