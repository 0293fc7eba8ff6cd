use std::io;
use thiserror::Error;

/// The primary error type for the `accesskey-lib` library.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid hex in test packet: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Insufficient data: expected at least {expected} bytes, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    #[error("Options overrun: header declares {options_size} option bytes, only {available} available")]
    OptionsOverrun { options_size: usize, available: usize },

    #[error("HMAC key rejected: {0}")]
    MacKey(#[from] hmac::digest::InvalidLength),
}

impl KeyError {
    /// True for the errors that mean the test packet itself is unusable.
    pub fn is_malformed_packet(&self) -> bool {
        matches!(
            self,
            KeyError::InsufficientData { .. } | KeyError::OptionsOverrun { .. }
        )
    }
}
