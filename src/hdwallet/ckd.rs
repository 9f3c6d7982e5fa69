/*
    This module implements child key derivation from parent
    extended private and public keys.

    Private derivation always hashes the parent private key, so the
    same function serves normal and hardened indexes. Public
    derivation adds the point of the left half of the hash to the
    parent point and only works for normal indexes.

    Reference:
        https://github.com/satoshilabs/slips/blob/master/slip-0010.md
*/

use tracing::{trace, warn};
use zeroize::Zeroizing;

use crate::{
    hash::hmac_sha512,
    hdwallet::{
        ExtendedKey, HDWError, Xprv, Xpub
    },
    key::{
        Key,
        PrivKey,
        PubKey
    }
};

/// Indexes at or above this value are hardened.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Upper bound on identity point retries in public derivation.
pub const MAX_CKD_PUB_ATTEMPTS: u32 = 16;

/**
    Enum to pattern match child key derivation options.
    Hardened holds the index below the hardened offset.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOptions {
    Normal(u32),
    Hardened(u32)
}

pub fn is_hardened(index: u32) -> bool {
    index >= HARDENED_OFFSET
}

fn split(hash: &[u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&hash[0..32]);
    right.copy_from_slice(&hash[32..64]);
    (left, right)
}

fn child_depth(depth: u8) -> Result<u8, HDWError> {
    depth.checked_add(1).ok_or(HDWError::MaxDepthExceeded)
}

/**
    Derives the child xprv at index.
    Data is [0x00 || parent private key || index] keyed with the parent chaincode.
*/
pub fn derive_xprv(parent: &Xprv, index: u32) -> Result<Xprv, HDWError> {
    let depth = child_depth(parent.depth())?;

    let mut data: Zeroizing<Vec<u8>> = Zeroizing::new(Vec::with_capacity(37));
    data.push(0x00);
    data.extend_from_slice(&parent.private_key().as_bytes());
    data.extend_from_slice(&index.to_be_bytes());

    let hash = Zeroizing::new(hmac_sha512(&parent.chaincode(), &data)?);
    let (left, right) = split(&hash);

    let fingerprint = parent.fingerprint();
    trace!(depth, index, parent_fingerprint = fingerprint, "derived private child");

    Xprv::construct(
        PrivKey::from_bytes(left),
        right,
        parent.network(),
        depth,
        fingerprint,
        index
    )
}

/**
    Derives the child xpub at a normal index.
    Data is [parent public key || index] keyed with the parent chaincode.
*/
pub fn derive_xpub(parent: &Xpub, index: u32) -> Result<Xpub, HDWError> {
    derive_xpub_with(parent, index, |point, seed| point.add_seed(seed))
}

/**
    Public derivation with the point addition passed in.
    When the sum is the identity point the next index is tried.
*/
fn derive_xpub_with<F>(parent: &Xpub, index: u32, add: F) -> Result<Xpub, HDWError>
where F: Fn(&PubKey, &[u8; 32]) -> Option<PubKey>
{
    if is_hardened(index) {
        return Err(HDWError::MissingPrivateKey)
    }
    let depth = child_depth(parent.depth())?;
    let parent_key = parent.public_key();

    let mut index = index;
    for _ in 0..MAX_CKD_PUB_ATTEMPTS {
        let mut data: Vec<u8> = Vec::with_capacity(36);
        data.extend_from_slice(&parent_key.as_bytes());
        data.extend_from_slice(&index.to_be_bytes());

        let (left, right) = split(&hmac_sha512(&parent.chaincode(), &data)?);
        match add(&parent_key, &left) {
            Some(key) => {
                let fingerprint = parent.fingerprint();
                trace!(depth, index, parent_fingerprint = fingerprint, "derived public child");
                return Xpub::construct(key, right, parent.network(), depth, fingerprint, index)
            },
            None => {
                warn!(index, "public child is the identity point, trying next index");
                index = index.checked_add(1)
                    .filter(|i| !is_hardened(*i))
                    .ok_or(HDWError::IndexOverflow(index))?;
            }
        }
    }

    Err(HDWError::DerivationExhausted(index))
}
