/*
    Library to derive hierarchical deterministic ed25519 keys.

    A seed creates a master key, child keys are derived from it by
    index or by path string, and every key can be exported to and
    imported from the Base58Check extended key format.

    BLAKE2b is the domain hash. It fingerprints public keys,
    checksums extended keys and drives ed25519 signing.

    References:
        - BIP 32 (https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki)
            for the tree layout and the extended key format

        - SLIP-10 (https://github.com/satoshilabs/slips/blob/master/slip-0010.md)
            for derivation over ed25519
*/

//Outward facing modules
pub mod key;
pub mod hdwallet;
pub mod encoding;
pub mod prelude;

//Modules for internal use
pub mod hash;
mod entropy;

pub use entropy::random_seed;

pub type Result<T> = std::result::Result<T, hdwallet::HDWError>;
