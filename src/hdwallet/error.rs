use thiserror::Error;

use hmac::digest::InvalidLength;

use crate::encoding::Base58Error;

/**
    Errors returned while creating, deriving, or decoding extended keys
*/
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HDWError {
    #[error("seed must be 16 to 64 bytes, found {0}")]
    InvalidSeedLength(usize),
    #[error("invalid derivation path: {0:?}")]
    InvalidPath(String),
    #[error("absolute path applied to a non-master key")]
    ExpectedMasterNode,
    #[error("private key required for hardened derivation or signing")]
    MissingPrivateKey,
    #[error("index {0} does not fit below the hardened offset")]
    IndexOverflow(u32),
    #[error("cannot derive below depth 255")]
    MaxDepthExceeded,
    #[error("extended key must be 78 bytes, found {0}")]
    InvalidLength(usize),
    #[error("unknown extended key version {0:#010x}")]
    InvalidVersion(u32),
    #[error("expected an extended {expected} key, found version {found:#010x}")]
    WrongKeyKind { expected: &'static str, found: u32 },
    #[error("depth 0 key with a parent fingerprint or child index")]
    InvalidMasterNode,
    #[error("private key field starts with {0:#04x}, expected 0x00")]
    InvalidPrivateKeyMarker(u8),
    #[error("public key is not a valid curve point")]
    InvalidPublicKey,
    #[error("no valid public child found from index {0}")]
    DerivationExhausted(u32),
    #[error("failed to read entropy from the OS: {0}")]
    Entropy(String),
    #[error("hmac key rejected: {0}")]
    HmacKey(#[from] InvalidLength),
    #[error(transparent)]
    Base58(#[from] Base58Error)
}
