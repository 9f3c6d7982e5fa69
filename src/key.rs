/*
    Ed25519 keys with BLAKE2b-512 as the expansion and signing hash.

    A private key is a 32 byte seed. Its scalar is the clamped lower
    half of BLAKE2b-512(seed) and the upper half is the nonce prefix
    used when signing. Public keys are compressed Edwards points.
*/

use curve25519_dalek::{
    edwards::{CompressedEdwardsY, EdwardsPoint},
    traits::IsIdentity
};
use ed25519_dalek::{
    hazmat::{self, ExpandedSecretKey},
    Signature as DalekSignature, VerifyingKey
};
use blake2::Blake2b512;
use zeroize::Zeroizing;
use std::fmt;

use crate::hash;

pub const KEY_SIZE: usize = 32;
pub const SIGNATURE_SIZE: usize = 64;

pub trait Key {
    /**
        Returns the raw key bytes
    */
    fn as_bytes(&self) -> [u8; KEY_SIZE];

    fn hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

#[derive(Clone)]
pub struct PrivKey(Zeroizing<[u8; KEY_SIZE]>);

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PubKey([u8; KEY_SIZE]);

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; SIGNATURE_SIZE]);

impl PrivKey {
    /**
        Use a predefined byte array as the private key seed.
        Every 32 byte value is a valid seed.
    */
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /**
        Expands the seed into the signing scalar and nonce prefix
    */
    fn expand(&self) -> ExpandedSecretKey {
        let h = Zeroizing::new(hash::blake2b_512(&self.0[..]));
        ExpandedSecretKey::from_bytes(&h)
    }

    /**
        Signs message. The nonce and challenge hashes are BLAKE2b-512.
    */
    pub fn sign(&self, message: &[u8]) -> Signature {
        let esk = self.expand();
        let vk = VerifyingKey::from(&esk);
        let sig = hazmat::raw_sign::<Blake2b512>(&esk, message, &vk);

        Signature(sig.to_bytes())
    }
}

impl PubKey {
    /**
        Finds the public key of a private key seed.
    */
    pub fn from_priv_key(k: &PrivKey) -> Self {
        Self(VerifyingKey::from(&k.expand()).to_bytes())
    }

    /**
        Use a predefined byte array as a public key.
        Returns None if the bytes are not a point on the curve.
    */
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Option<Self> {
        CompressedEdwardsY(bytes).decompress()?;
        Some(Self(bytes))
    }

    fn point(&self) -> Option<EdwardsPoint> {
        CompressedEdwardsY(self.0).decompress()
    }

    /**
        Adds the public point of seed to self.
        Returns None if the sum is the identity point.
    */
    pub fn add_seed(&self, seed: &[u8; KEY_SIZE]) -> Option<PubKey> {
        let tweak = PubKey::from_priv_key(&PrivKey::from_bytes(*seed)).point()?;
        let sum = self.point()? + tweak;
        if sum.is_identity() {
            return None
        }

        Some(Self(sum.compress().to_bytes()))
    }

    /**
        Checks signature over message against self
    */
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let vk = match VerifyingKey::from_bytes(&self.0) {
            Ok(x) => x,
            Err(_) => return false
        };
        let sig = DalekSignature::from_bytes(&signature.0);

        hazmat::raw_verify::<Blake2b512>(&vk, message, &sig).is_ok()
    }
}

impl Key for PrivKey {
    fn as_bytes(&self) -> [u8; KEY_SIZE] {
        *self.0
    }
}

impl Key for PubKey {
    fn as_bytes(&self) -> [u8; KEY_SIZE] {
        self.0
    }
}

impl Signature {
    pub fn as_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        self.0
    }
}

impl PartialEq for PrivKey {
    fn eq(&self, other: &Self) -> bool {
        self.0[..] == other.0[..]
    }
}

impl Eq for PrivKey {}

impl fmt::Debug for PrivKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("PrivKey(..)")
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PubKey({})", self.hex())
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //Master key of the all zero 32 byte seed
    const ZERO_SEED_PRIV: &str = "71cfe9d91a9be244b0fca6c580228a3e908aeda95f6909f331cde71e0f91d7f7";
    const ZERO_SEED_PUB: &str = "0dd668213a31aeeae7a1f1ce218d5fdb19e060bedb76907624e9c15b25f17ba9";
    const SIGNED_MESSAGE: &[u8] = b"derivation engine";
    const SIGNATURE: &str = "b059e273f09062d3ed59094679c692382fbe4b0cf5d63e1bbab00aa1f4abff940b79596171b25d9971e95f5273a8ea7bbd4c10dedf5879c0c6d25f094a99350b";

    fn priv_key() -> PrivKey {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hex::decode(ZERO_SEED_PRIV).unwrap());
        PrivKey::from_bytes(bytes)
    }

    #[test]
    fn public_key_from_private() {
        let pk = PubKey::from_priv_key(&priv_key());
        assert_eq!(pk.hex(), ZERO_SEED_PUB);
    }

    #[test]
    fn sign_matches_vector() {
        let sig = priv_key().sign(SIGNED_MESSAGE);
        assert_eq!(hex::encode(sig.as_bytes()), SIGNATURE);
        assert_eq!(format!("{:?}", sig), format!("Signature({})", SIGNATURE));
    }

    #[test]
    fn sign_and_verify() {
        let k = priv_key();
        let pk = PubKey::from_priv_key(&k);
        let sig = k.sign(b"hello");
        assert!(pk.verify(b"hello", &sig));
        assert!(!pk.verify(b"hellp", &sig));

        let mut bad = sig;
        bad.0[63] ^= 0x01;
        assert!(!pk.verify(b"hello", &bad));

        let other = PubKey::from_priv_key(&PrivKey::from_bytes([1u8; 32]));
        assert!(!other.verify(b"hello", &sig));
    }

    #[test]
    fn add_seed_is_point_addition() {
        let a = PrivKey::from_bytes([3u8; 32]);
        let pa = PubKey::from_priv_key(&a);
        let pb = PubKey::from_priv_key(&PrivKey::from_bytes([4u8; 32]));
        let sum = pa.add_seed(&[4u8; 32]).unwrap();
        let expected = (pa.point().unwrap() + pb.point().unwrap()).compress().to_bytes();
        assert_eq!(sum.as_bytes(), expected);
    }

    #[test]
    fn rejects_non_curve_bytes() {
        //y = 2 has no matching x on ed25519
        let mut bytes = [0u8; 32];
        bytes[0] = 2;
        assert!(PubKey::from_bytes(bytes).is_none());
        assert!(PubKey::from_bytes(PubKey::from_priv_key(&priv_key()).as_bytes()).is_some());
    }

    #[test]
    fn debug_hides_private_key() {
        assert_eq!(format!("{:?}", priv_key()), "PrivKey(..)");
    }
}
