use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::hdwallet::{
    extended_keys::{MAX_SEED_LEN, MIN_SEED_LEN},
    HDWError
};

/**
    Generates a random seed of size bytes using OsRng.
    Size must be a valid master seed length.
*/
pub fn random_seed(size: usize) -> Result<Zeroizing<Vec<u8>>, HDWError> {
    if size < MIN_SEED_LEN || size > MAX_SEED_LEN {
        return Err(HDWError::InvalidSeedLength(size))
    }

    let mut seed = Zeroizing::new(vec![0u8; size]);
    match OsRng.try_fill_bytes(&mut seed) {
        Ok(()) => Ok(seed),
        Err(e) => Err(HDWError::Entropy(e.to_string()))
    }
}
