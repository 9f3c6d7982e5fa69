/*
    Hash module includes the hash functions used to derive
    child keys, fingerprint public keys and checksum extended keys.

    The domain hash is BLAKE2b, used at 32 bytes for fingerprints
    and checksums and at 64 bytes for key expansion and signing.
*/

use blake2::{
    digest::consts::U32,
    Blake2b, Blake2b512, Digest
};
use hmac::{digest::InvalidLength, Hmac, Mac};
use ripemd::Ripemd160;
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;
type Blake2b256 = Blake2b<U32>;

/**
    HMAC-SHA512 of data keyed with key
*/
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<[u8; 64], InvalidLength> {
    let mut mac = <HmacSha512 as Mac>::new_from_slice(key)?;
    mac.update(data);
    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/**
    32 byte BLAKE2b digest of input
*/
pub fn blake2b_256<T>(input: T) -> [u8; 32]
where T: AsRef<[u8]>
{
    let mut h = Blake2b256::new();
    h.update(input);
    h.finalize().into()
}

/**
    64 byte BLAKE2b digest of input
*/
pub fn blake2b_512<T>(input: T) -> [u8; 64]
where T: AsRef<[u8]>
{
    let mut h = Blake2b512::new();
    h.update(input);
    let mut out = [0u8; 64];
    out.copy_from_slice(&h.finalize());
    out
}

pub fn ripemd160<T>(input: T) -> [u8; 20]
where T: AsRef<[u8]>
{
    let mut r = Ripemd160::new();
    r.update(input);
    r.finalize().into()
}

/**
    RIPEMD160(BLAKE2b-256(input)). Identifies a public key.
*/
pub fn hash160<T>(input: T) -> [u8; 20]
where T: AsRef<[u8]>
{
    ripemd160(blake2b_256(input))
}

/**
    Double BLAKE2b-256 of input. The first four bytes are the
    base58check checksum.
*/
pub fn blake2b_256d<T>(input: T) -> [u8; 32]
where T: AsRef<[u8]>
{
    blake2b_256(blake2b_256(input))
}
