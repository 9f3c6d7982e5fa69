/*
    This module implements hierarchical deterministic keys under
    the BIP 32 layout, over ed25519 keys as proposed by SLIP-10.

    Xprv and Xpub are the private and neutered tree positions,
    Node is either of them when the kind is only known at runtime.
*/

pub mod ckd;
pub mod error;
pub mod extended_keys;
pub mod node;
pub mod path;

pub use ckd::{ChildOptions, HARDENED_OFFSET, MAX_CKD_PUB_ATTEMPTS};
pub use error::HDWError;
pub use extended_keys::{ExtendedKey, Xprv, Xpub, EXTENDED_KEY_SIZE};
pub use node::Node;
pub use path::Path;
