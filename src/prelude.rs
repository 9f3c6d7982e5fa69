/*
    This module contains the default imports for the library.

    Import the library using:
        use ed25519_hdkey::prelude::*;
    to quickly import the essential parts of the library.
*/

pub use crate::{

    key::{
        PubKey,
        PrivKey,
        Key,
        Signature
    },

    hdwallet::{
        ChildOptions,
        ExtendedKey,
        Node,
        Xprv, Xpub,
        HDWError,
        Path,
        HARDENED_OFFSET
    },

    encoding::{
        Base58,
        Base58Error,
        Network
    },

    random_seed

};
