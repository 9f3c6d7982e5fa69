/*
    Node is an extended key whose kind is only known at runtime,
    such as one decoded from a string.

    Decoding checks the payload in this order:
    base58 and checksum, length, version, master invariant, key field.
*/

use std::{fmt, str::FromStr};
use tracing::debug;

use crate::{
    encoding::{
        Base58,
        Network
    },
    entropy,
    hdwallet::{
        extended_keys::check_master,
        HDWError,
        ExtendedKey,
        Xprv,
        Xpub,
        EXTENDED_KEY_SIZE
    },
    key::{
        PrivKey,
        PubKey,
        Signature
    }
};

/// Length of the seed drawn for a random master node
pub const RANDOM_SEED_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Private(Xprv),
    Public(Xpub)
}

impl Node {
    /**
        Creates a master node from seed bytes
    */
    pub fn from_seed(seed: &[u8], network: Network) -> Result<Self, HDWError> {
        Ok(Node::Private(Xprv::from_seed(seed, network)?))
    }

    /**
        Creates a master node from a random seed drawn from the OS
    */
    pub fn new_random(network: Network) -> Result<Self, HDWError> {
        let seed = entropy::random_seed(RANDOM_SEED_LEN)?;
        Self::from_seed(&seed, network)
    }

    /**
        Decodes a Base58Check extended key whose version belongs to network
    */
    pub fn decode(encoded: &str, network: &Network) -> Result<Self, HDWError> {
        let bytes = Base58::check_decode(encoded)?;
        let node = Self::from_bytes(&bytes, network)?;
        debug!(depth = node.depth(), neutered = node.is_neutered(), "decoded extended key");

        Ok(node)
    }

    /**
        Parses the 78 byte extended key layout
    */
    pub fn from_bytes(bytes: &[u8], network: &Network) -> Result<Self, HDWError> {
        if bytes.len() != EXTENDED_KEY_SIZE {
            return Err(HDWError::InvalidLength(bytes.len()))
        }

        let version = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let private = match network.is_private_version(version) {
            Some(x) => x,
            None => return Err(HDWError::InvalidVersion(version))
        };

        let depth = bytes[4];
        let parent_fingerprint = u32::from_be_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]);
        let index = u32::from_be_bytes([bytes[9], bytes[10], bytes[11], bytes[12]]);
        check_master(depth, parent_fingerprint, index)?;

        let mut chaincode = [0u8; 32];
        chaincode.copy_from_slice(&bytes[13..45]);
        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes[46..78]);

        if private {
            if bytes[45] != 0x00 {
                return Err(HDWError::InvalidPrivateKeyMarker(bytes[45]))
            }
            let xprv = Xprv::construct(
                PrivKey::from_bytes(key),
                chaincode,
                *network,
                depth,
                parent_fingerprint,
                index
            )?;
            Ok(Node::Private(xprv))
        } else {
            if bytes[45] != 0x00 {
                return Err(HDWError::InvalidPublicKey)
            }
            let pubkey = match PubKey::from_bytes(key) {
                Some(x) => x,
                None => return Err(HDWError::InvalidPublicKey)
            };
            let xpub = Xpub::construct(
                pubkey,
                chaincode,
                *network,
                depth,
                parent_fingerprint,
                index
            )?;
            Ok(Node::Public(xpub))
        }
    }

    /**
        Signs message with the private key.
        Fails on a neutered node.
    */
    pub fn sign(&self, message: &[u8]) -> Result<Signature, HDWError> {
        match self {
            Node::Private(x) => Ok(x.sign(message)),
            Node::Public(_) => Err(HDWError::MissingPrivateKey)
        }
    }

    pub fn private_key(&self) -> Option<&PrivKey> {
        match self {
            Node::Private(x) => Some(x.private_key()),
            Node::Public(_) => None
        }
    }

    /**
        Returns the public version of self as a Node
    */
    pub fn neutered_node(&self) -> Node {
        Node::Public(self.neutered())
    }
}

impl ExtendedKey for Node {
    fn public_key(&self) -> PubKey {
        match self {
            Node::Private(x) => x.public_key(),
            Node::Public(x) => x.public_key()
        }
    }

    fn chaincode(&self) -> [u8; 32] {
        match self {
            Node::Private(x) => x.chaincode(),
            Node::Public(x) => x.chaincode()
        }
    }

    fn network(&self) -> Network {
        match self {
            Node::Private(x) => x.network(),
            Node::Public(x) => x.network()
        }
    }

    fn depth(&self) -> u8 {
        match self {
            Node::Private(x) => x.depth(),
            Node::Public(x) => x.depth()
        }
    }

    fn child_index(&self) -> u32 {
        match self {
            Node::Private(x) => x.child_index(),
            Node::Public(x) => x.child_index()
        }
    }

    fn parent_fingerprint(&self) -> u32 {
        match self {
            Node::Private(x) => x.parent_fingerprint(),
            Node::Public(x) => x.parent_fingerprint()
        }
    }

    fn is_neutered(&self) -> bool {
        matches!(self, Node::Public(_))
    }

    fn derive(&self, index: u32) -> Result<Self, HDWError> {
        match self {
            Node::Private(x) => Ok(Node::Private(x.derive(index)?)),
            Node::Public(x) => Ok(Node::Public(x.derive(index)?))
        }
    }

    fn neutered(&self) -> Xpub {
        match self {
            Node::Private(x) => x.neutered(),
            Node::Public(x) => x.clone()
        }
    }

    fn serialize(&self) -> [u8; EXTENDED_KEY_SIZE] {
        match self {
            Node::Private(x) => x.serialize(),
            Node::Public(x) => x.serialize()
        }
    }
}

impl From<Xprv> for Node {
    fn from(x: Xprv) -> Self {
        Node::Private(x)
    }
}

impl From<Xpub> for Node {
    fn from(x: Xpub) -> Self {
        Node::Public(x)
    }
}

impl FromStr for Node {
    type Err = HDWError;

    fn from_str(key: &str) -> Result<Self, HDWError> {
        Self::decode(key, &Network::default())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        encoding::Base58Error,
        hdwallet::{extended_keys::write_payload, HARDENED_OFFSET},
        key::Key
    };

    const SEED: &str = "000102030405060708090a0b0c0d0e0f";
    const ZERO_SEED_XPRV: &str = "xprv9s21ZrQH143K27QAUzcuHdiTcEoVfB7EmcmLZNLXV58dWGQh6wAMh2dxCw5h49XnmLkJ5sb8RFwt4iAB5ruLNUwmkpYDHa7xfHWbJTSiqoQ";
    const ZERO_SEED_XPUB: &str = "xpub661MyMwAqRbcEbUdb29uemfCAGdz4dq68qgwMkk93QfcP4jqeUUcEpxS47TwRgiC8K1D53gL6Z2UDJnka4J5SziFfttSETBLMD8bqgfQBfX";

    fn master() -> Node {
        Node::from_seed(&hex::decode(SEED).unwrap(), Network::MAINNET).unwrap()
    }

    fn encode_bytes(bytes: &[u8]) -> String {
        Base58::new(bytes).check_encode()
    }

    #[test]
    fn decode_both_kinds() {
        let node: Node = ZERO_SEED_XPRV.parse().unwrap();
        assert!(!node.is_neutered());
        assert_eq!(node.to_string(), ZERO_SEED_XPRV);

        let node: Node = ZERO_SEED_XPUB.parse().unwrap();
        assert!(node.is_neutered());
        assert!(node.private_key().is_none());
        assert_eq!(node.to_string(), ZERO_SEED_XPUB);
    }

    #[test]
    fn round_trip() {
        let m = master();
        for path in ["m", "m/0'", "m/0'/1", "m/44'/43'/0'/0'/7'"] {
            let node = m.derive_path(path).unwrap();
            let decoded: Node = node.encode().parse().unwrap();
            assert_eq!(decoded, node);
            assert_eq!(decoded.chaincode(), node.chaincode());
            assert_eq!(decoded.private_key(), node.private_key());

            let public = node.neutered_node();
            let decoded: Node = public.encode().parse().unwrap();
            assert_eq!(decoded, public);
            assert_eq!(decoded.public_key(), node.public_key());
        }
    }

    #[test]
    fn custom_network() {
        let network = Network::TESTNET;
        let m = Node::from_seed(&[0u8; 32], network).unwrap();
        let encoded = m.encode();
        assert!(encoded.starts_with("tprv"));
        assert!(m.neutered().encode().starts_with("tpub"));

        assert_eq!(Node::decode(&encoded, &network).unwrap(), m);
        assert_eq!(
            Node::decode(&encoded, &Network::MAINNET),
            Err(HDWError::InvalidVersion(network.private))
        );
    }

    #[test]
    fn decode_base58_errors() {
        assert!(matches!(
            "xprv0OIl".parse::<Node>(),
            Err(HDWError::Base58(Base58Error::BadChar(_)))
        ));

        let mut bad = ZERO_SEED_XPRV.to_string();
        bad.pop();
        bad.push('R');
        assert_eq!(bad.parse::<Node>(), Err(HDWError::Base58(Base58Error::BadChecksum)));
    }

    #[test]
    fn decode_invalid_length() {
        let bytes = master().serialize();
        assert_eq!(encode_bytes(&bytes[..77]).parse::<Node>(), Err(HDWError::InvalidLength(77)));

        let mut long = bytes.to_vec();
        long.push(0);
        assert_eq!(encode_bytes(&long).parse::<Node>(), Err(HDWError::InvalidLength(79)));
    }

    #[test]
    fn decode_invalid_version() {
        let mut bytes = master().serialize();
        bytes[0..4].copy_from_slice(&0xdeadbeefu32.to_be_bytes());
        assert_eq!(encode_bytes(&bytes).parse::<Node>(), Err(HDWError::InvalidVersion(0xdeadbeef)));
    }

    #[test]
    fn decode_invalid_master() {
        let m = master();
        for (pf, index) in [(1u32, 0u32), (0, 1), (0, HARDENED_OFFSET)] {
            let bytes = write_payload(Network::MAINNET.private, 0, pf, index, &m.chaincode(), &[1u8; 32]);
            assert_eq!(encode_bytes(&bytes).parse::<Node>(), Err(HDWError::InvalidMasterNode));
        }

        //Checked before the key field
        let mut bytes = write_payload(Network::MAINNET.private, 0, 1, 0, &m.chaincode(), &[1u8; 32]);
        bytes[45] = 0x02;
        assert_eq!(encode_bytes(&bytes).parse::<Node>(), Err(HDWError::InvalidMasterNode));
    }

    #[test]
    fn decode_invalid_key_field() {
        let mut bytes = master().serialize();
        bytes[45] = 0x01;
        assert_eq!(encode_bytes(&bytes).parse::<Node>(), Err(HDWError::InvalidPrivateKeyMarker(0x01)));

        let mut bytes = master().neutered().serialize();
        bytes[45] = 0x02;
        assert_eq!(encode_bytes(&bytes).parse::<Node>(), Err(HDWError::InvalidPublicKey));

        //y = 2 is not on the curve
        let mut point = [0u8; 32];
        point[0] = 2;
        let bytes = write_payload(Network::MAINNET.public, 0, 0, 0, &[0u8; 32], &point);
        assert_eq!(encode_bytes(&bytes).parse::<Node>(), Err(HDWError::InvalidPublicKey));
    }

    #[test]
    fn hardened_gating() {
        let public = master().neutered_node();
        assert_eq!(public.derive(HARDENED_OFFSET), Err(HDWError::MissingPrivateKey));
        assert_eq!(public.derive(u32::MAX), Err(HDWError::MissingPrivateKey));
        assert_eq!(public.derive_hardened(0), Err(HDWError::MissingPrivateKey));
        assert_eq!(public.derive_path("m/1'"), Err(HDWError::MissingPrivateKey));

        //Private derivation hashes the private key even for normal
        //indexes, so the two trees differ
        let from_private = master().derive(1).unwrap().neutered();
        match public.derive(1).unwrap() {
            Node::Public(x) => {
                assert_eq!(x.child_index(), 1);
                assert_ne!(x.public_key(), from_private.public_key());
            },
            Node::Private(_) => panic!("public node derived a private child")
        }
    }

    #[test]
    fn sign_needs_private_key() {
        let m = master();
        let sig = m.sign(b"message").unwrap();
        assert!(m.verify(b"message", &sig));

        let public = m.neutered_node();
        assert!(public.verify(b"message", &sig));
        assert_eq!(public.sign(b"message"), Err(HDWError::MissingPrivateKey));
    }

    #[test]
    fn neutering() {
        let m = master();
        for path in ["m", "m/0'", "m/0'/1/2"] {
            let node = m.derive_path(path).unwrap();
            assert!(node.neutered().is_neutered());
            assert!(node.neutered_node().is_neutered());
            assert_eq!(node.neutered_node(), Node::Public(node.neutered()));
            assert_eq!(node.neutered_node().neutered_node(), node.neutered_node());
            assert_eq!(node.neutered().public_key(), node.public_key());
            assert_eq!(node.neutered().public_key().as_bytes(), node.public_key().as_bytes());
        }
    }

    #[test]
    fn random_master() {
        let a = Node::new_random(Network::MAINNET).unwrap();
        let b = Node::new_random(Network::MAINNET).unwrap();
        assert!(a.is_master());
        assert_eq!(a.depth(), 0);
        assert_ne!(a, b);
    }
}
