/*
    Base58Check encoding.

    The payload is followed by a four byte checksum, the first four
    bytes of the double BLAKE2b-256 digest of the payload.
*/

use thiserror::Error;

use crate::hash;

pub const CHECKSUM_LEN: usize = 4;

#[derive(Debug)]
pub struct Base58 {
    payload: Vec<u8>
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Base58Error {
    #[error("invalid base58 string: {0}")]
    BadChar(#[from] bs58::decode::Error),
    #[error("decoded data is {0} bytes, too short to carry a checksum")]
    TooShort(usize),
    #[error("checksum mismatch")]
    BadChecksum
}

impl Base58 {
    pub fn new(payload: &[u8]) -> Base58 {
        Base58 {
            payload: payload.to_vec()
        }
    }

    /// Encode the payload in base58 without a checksum.
    pub fn encode(&self) -> String {
        bs58::encode(&self.payload).into_string()
    }

    /// Check encode the payload by appending the checksum and then encoding it.
    pub fn check_encode(&self) -> String {
        let mut bytes = self.payload.clone();
        bytes.extend_from_slice(&checksum(&self.payload));

        bs58::encode(bytes).into_string()
    }

    /// Decodes a base58 string into a byte vector.
    /// DOES NOT remove the checksum if present.
    pub fn decode(encoded: &str) -> Result<Vec<u8>, Base58Error> {
        Ok(bs58::decode(encoded).into_vec()?)
    }

    /// Returns the decoded payload with the checksum validated and removed.
    pub fn check_decode(encoded: &str) -> Result<Vec<u8>, Base58Error> {
        let mut bytes = Self::decode(encoded)?;
        if bytes.len() < CHECKSUM_LEN {
            return Err(Base58Error::TooShort(bytes.len()))
        }

        let split = bytes.len() - CHECKSUM_LEN;
        if checksum(&bytes[..split])[..] != bytes[split..] {
            return Err(Base58Error::BadChecksum)
        }
        bytes.truncate(split);

        Ok(bytes)
    }
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&hash::blake2b_256d(payload)[..CHECKSUM_LEN]);
    out
}
