/*
    Text encodings used to move extended keys around
*/

pub mod base58;
pub mod network;

pub use base58::{Base58, Base58Error};
pub use network::Network;
