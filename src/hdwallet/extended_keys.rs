/*
    This module implements extended keys that are
    used in hierarchical deterministic key trees.

    An extended key is a key and a 32 byte chaincode plus its
    position in the tree. Serialized it is 78 bytes:
    version(4) | depth(1) | parent fingerprint(4) | index(4) | chaincode(32) | 0x00 | key(32)
*/

use once_cell::sync::OnceCell;
use std::{fmt, str::FromStr};
use tracing::debug;
use zeroize::Zeroizing;

use crate::{
    encoding::{
        Base58,
        Network
    },
    hash,
    hdwallet::{
        ckd::{
            derive_xprv,
            derive_xpub,
            HARDENED_OFFSET
        },
        ChildOptions,
        HDWError,
        Node,
        Path
    },
    key::{
        Key,
        PrivKey,
        PubKey,
        Signature
    }
};

pub const EXTENDED_KEY_SIZE: usize = 78;
pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;

/// HMAC key used to turn a seed into the master key
const MASTER_SECRET: &[u8] = b"ed25519 seed";

#[derive(Clone)]
pub struct Xprv {
    key: PrivKey,
    //Filled on first use of public_key()
    pubkey: OnceCell<PubKey>,
    chaincode: Zeroizing<[u8; 32]>,
    network: Network,
    depth: u8,
    parent_fingerprint: u32,
    index: u32
}

#[derive(Clone)]
pub struct Xpub {
    key: PubKey,
    chaincode: Zeroizing<[u8; 32]>,
    network: Network,
    depth: u8,
    parent_fingerprint: u32,
    index: u32
}

pub trait ExtendedKey: Sized + Clone {
    fn public_key(&self) -> PubKey;

    fn chaincode(&self) -> [u8; 32];

    fn network(&self) -> Network;

    fn depth(&self) -> u8;

    fn child_index(&self) -> u32;

    fn parent_fingerprint(&self) -> u32;

    /**
        True if the key holds no private key
    */
    fn is_neutered(&self) -> bool;

    /**
        Derives the child at index. Indexes at or above 2^31 are hardened
        and need the private key.
    */
    fn derive(&self, index: u32) -> Result<Self, HDWError>;

    /**
        Returns the public version of self
    */
    fn neutered(&self) -> Xpub;

    /**
        Serializes self into the 78 byte extended key layout
    */
    fn serialize(&self) -> [u8; EXTENDED_KEY_SIZE];

    /**
        Derives the hardened child at index + 2^31
    */
    fn derive_hardened(&self, index: u32) -> Result<Self, HDWError> {
        if index >= HARDENED_OFFSET {
            return Err(HDWError::IndexOverflow(index))
        }
        self.derive(index + HARDENED_OFFSET)
    }

    /**
        Parses path and derives the key at it.
        eg. "m/44'/43'/0'" from a master key or "0'/1" from any key.
    */
    fn derive_path(&self, path: &str) -> Result<Self, HDWError> {
        let path: Path = path.parse()?;
        self.derive_from_path(&path)
    }

    /**
        Derives the key at the given path, one child at a time
    */
    fn derive_from_path(&self, path: &Path) -> Result<Self, HDWError> {
        if path.root && !self.is_master() {
            return Err(HDWError::ExpectedMasterNode)
        }
        debug!(path = %path, depth = self.depth(), "resolving path");

        path.children.iter().try_fold(self.clone(), |key, child| match child {
            ChildOptions::Normal(x) => key.derive(*x),
            ChildOptions::Hardened(x) => key.derive_hardened(*x)
        })
    }

    /**
        RIPEMD160(BLAKE2b-256(public key))
    */
    fn identifier(&self) -> [u8; 20] {
        hash::hash160(self.public_key().as_bytes())
    }

    /**
        First four bytes of the identifier
    */
    fn fingerprint(&self) -> u32 {
        let id = self.identifier();
        u32::from_be_bytes([id[0], id[1], id[2], id[3]])
    }

    fn is_master(&self) -> bool {
        self.parent_fingerprint() == 0
    }

    fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.public_key().verify(message, signature)
    }

    /**
        Base58Check encoding of the serialized key
    */
    fn encode(&self) -> String {
        Base58::new(&self.serialize()).check_encode()
    }
}

/**
    Rejects tree positions that claim depth 0 but carry a parent
*/
pub(crate) fn check_master(depth: u8, parent_fingerprint: u32, index: u32) -> Result<(), HDWError> {
    if depth == 0 && (parent_fingerprint != 0 || index != 0) {
        return Err(HDWError::InvalidMasterNode)
    }
    Ok(())
}

pub(crate) fn write_payload(
    version: u32,
    depth: u8,
    parent_fingerprint: u32,
    index: u32,
    chaincode: &[u8; 32],
    key: &[u8; 32]
) -> [u8; EXTENDED_KEY_SIZE] {
    let mut payload = [0u8; EXTENDED_KEY_SIZE];
    payload[0..4].copy_from_slice(&version.to_be_bytes());
    payload[4] = depth;
    payload[5..9].copy_from_slice(&parent_fingerprint.to_be_bytes());
    payload[9..13].copy_from_slice(&index.to_be_bytes());
    payload[13..45].copy_from_slice(chaincode);
    payload[45] = 0x00; //key marker
    payload[46..78].copy_from_slice(key);
    payload
}

impl Xprv {
    /**
        Constructs the extended private key.
    */
    pub fn construct(
        key: PrivKey,
        chaincode: [u8; 32],
        network: Network,
        depth: u8,
        parent_fingerprint: u32,
        index: u32
    ) -> Result<Self, HDWError> {
        check_master(depth, parent_fingerprint, index)?;
        Ok(Self {
            key,
            pubkey: OnceCell::new(),
            chaincode: Zeroizing::new(chaincode),
            network,
            depth,
            parent_fingerprint,
            index
        })
    }

    /**
        Creates the master key from a 16 to 64 byte seed.
    */
    pub fn from_seed(seed: &[u8], network: Network) -> Result<Self, HDWError> {
        if seed.len() < MIN_SEED_LEN || seed.len() > MAX_SEED_LEN {
            return Err(HDWError::InvalidSeedLength(seed.len()))
        }

        let hash = Zeroizing::new(hash::hmac_sha512(MASTER_SECRET, seed)?);
        let mut key = [0u8; 32];
        let mut chaincode = [0u8; 32];
        key.copy_from_slice(&hash[0..32]);
        chaincode.copy_from_slice(&hash[32..64]);

        let master = Self::construct(PrivKey::from_bytes(key), chaincode, network, 0, 0, 0)?;
        debug!(fingerprint = master.fingerprint(), "created master key");
        Ok(master)
    }

    pub fn private_key(&self) -> &PrivKey {
        &self.key
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        self.key.sign(message)
    }

    /**
        Decodes a Base58Check extended private key of the given network
    */
    pub fn decode(encoded: &str, network: &Network) -> Result<Self, HDWError> {
        match Node::decode(encoded, network)? {
            Node::Private(x) => Ok(x),
            Node::Public(_) => Err(HDWError::WrongKeyKind { expected: "private", found: network.public })
        }
    }
}

impl ExtendedKey for Xprv {
    fn public_key(&self) -> PubKey {
        *self.pubkey.get_or_init(|| PubKey::from_priv_key(&self.key))
    }

    fn chaincode(&self) -> [u8; 32] {
        *self.chaincode
    }

    fn network(&self) -> Network {
        self.network
    }

    fn depth(&self) -> u8 {
        self.depth
    }

    fn child_index(&self) -> u32 {
        self.index
    }

    fn parent_fingerprint(&self) -> u32 {
        self.parent_fingerprint
    }

    fn is_neutered(&self) -> bool {
        false
    }

    fn derive(&self, index: u32) -> Result<Self, HDWError> {
        derive_xprv(self, index)
    }

    fn neutered(&self) -> Xpub {
        Xpub {
            key: self.public_key(),
            chaincode: self.chaincode.clone(),
            network: self.network,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            index: self.index
        }
    }

    fn serialize(&self) -> [u8; EXTENDED_KEY_SIZE] {
        write_payload(
            self.network.version(false),
            self.depth,
            self.parent_fingerprint,
            self.index,
            &self.chaincode,
            &self.key.as_bytes()
        )
    }
}

impl Xpub {
    /**
        Constructs the extended public key.
    */
    pub fn construct(
        key: PubKey,
        chaincode: [u8; 32],
        network: Network,
        depth: u8,
        parent_fingerprint: u32,
        index: u32
    ) -> Result<Self, HDWError> {
        check_master(depth, parent_fingerprint, index)?;
        Ok(Self {
            key,
            chaincode: Zeroizing::new(chaincode),
            network,
            depth,
            parent_fingerprint,
            index
        })
    }

    /**
        Decodes a Base58Check extended public key of the given network
    */
    pub fn decode(encoded: &str, network: &Network) -> Result<Self, HDWError> {
        match Node::decode(encoded, network)? {
            Node::Public(x) => Ok(x),
            Node::Private(_) => Err(HDWError::WrongKeyKind { expected: "public", found: network.private })
        }
    }
}

impl ExtendedKey for Xpub {
    fn public_key(&self) -> PubKey {
        self.key
    }

    fn chaincode(&self) -> [u8; 32] {
        *self.chaincode
    }

    fn network(&self) -> Network {
        self.network
    }

    fn depth(&self) -> u8 {
        self.depth
    }

    fn child_index(&self) -> u32 {
        self.index
    }

    fn parent_fingerprint(&self) -> u32 {
        self.parent_fingerprint
    }

    fn is_neutered(&self) -> bool {
        true
    }

    fn derive(&self, index: u32) -> Result<Self, HDWError> {
        derive_xpub(self, index)
    }

    fn neutered(&self) -> Xpub {
        self.clone()
    }

    fn serialize(&self) -> [u8; EXTENDED_KEY_SIZE] {
        write_payload(
            self.network.version(true),
            self.depth,
            self.parent_fingerprint,
            self.index,
            &self.chaincode,
            &self.key.as_bytes()
        )
    }
}

//The cached public key is derived from the private key so it is left out
impl PartialEq for Xprv {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.chaincode[..] == other.chaincode[..]
            && self.network == other.network
            && self.depth == other.depth
            && self.parent_fingerprint == other.parent_fingerprint
            && self.index == other.index
    }
}

impl Eq for Xprv {}

impl PartialEq for Xpub {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.chaincode[..] == other.chaincode[..]
            && self.network == other.network
            && self.depth == other.depth
            && self.parent_fingerprint == other.parent_fingerprint
            && self.index == other.index
    }
}

impl Eq for Xpub {}

impl fmt::Debug for Xprv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Xprv")
            .field("public_key", &self.public_key())
            .field("depth", &self.depth)
            .field("parent_fingerprint", &format_args!("{:08x}", self.parent_fingerprint))
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Xpub {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Xpub")
            .field("public_key", &self.key)
            .field("depth", &self.depth)
            .field("parent_fingerprint", &format_args!("{:08x}", self.parent_fingerprint))
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Xprv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Display for Xpub {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Xprv {
    type Err = HDWError;

    fn from_str(key: &str) -> Result<Self, HDWError> {
        Self::decode(key, &Network::default())
    }
}

impl FromStr for Xpub {
    type Err = HDWError;

    fn from_str(key: &str) -> Result<Self, HDWError> {
        Self::decode(key, &Network::default())
    }
}
