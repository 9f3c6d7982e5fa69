/*
    Version prefixes that mark an extended key as private or public
    for a given network.
*/

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Network {
    /// Version of serialized private keys
    pub private: u32,
    /// Version of serialized public keys
    pub public: u32
}

impl Network {
    /// "xprv" / "xpub"
    pub const MAINNET: Network = Network { private: 0x0488ADE4, public: 0x0488B21E };
    /// "tprv" / "tpub"
    pub const TESTNET: Network = Network { private: 0x04358394, public: 0x043587CF };

    pub fn new(private: u32, public: u32) -> Self {
        Self { private, public }
    }

    pub fn version(&self, neutered: bool) -> u32 {
        if neutered { self.public } else { self.private }
    }

    /**
        Returns whether the version marks a private key, a public key,
        or None if it does not belong to this network.
    */
    pub fn is_private_version(&self, version: u32) -> Option<bool> {
        if version == self.private {
            Some(true)
        } else if version == self.public {
            Some(false)
        } else {
            None
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::MAINNET
    }
}
