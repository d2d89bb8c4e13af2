//! Error type shared by every component.

use thiserror::Error;

/// Everything that can go wrong while configuring or installing the override.
///
/// Only [`Error::FaceNameTooLong`] can happen on the drawing path, and it is
/// logged and swallowed there. The rest surface once, from init.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The configured face name does not fit the 32-unit face-name buffer.
    #[error("face name \"{name}\" is too long ({len} UTF-16 units, max {max})")]
    FaceNameTooLong {
        name: String,
        len: usize,
        max: usize,
    },

    /// The function to intercept could not be located in the host process.
    #[error("could not resolve {symbol} in {module}")]
    SymbolNotFound {
        module: &'static str,
        symbol: &'static str,
    },

    /// The hooking facility refused to register the replacement.
    #[error("failed to install hook for {symbol}: {reason}")]
    HookInstall { symbol: &'static str, reason: String },

    /// The hooking facility accepted the hook but handed back no original.
    #[error("hook for {symbol} returned a null original")]
    NullOriginal { symbol: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
