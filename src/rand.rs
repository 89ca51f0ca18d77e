//! The single place where we gather randomness.
//!
//! Unlike the record layer, the key-agreement core never reaches for a global
//! RNG: every operation draws from the RNG carried in the
//! [`Config`](crate::config::Config), which keeps measurement runs
//! reproducible under a seeded generator.

use rand_core::{CryptoRng, CryptoRngCore, RngCore};

/// Random material was unavailable.
#[derive(Debug)]
pub struct GetRandomFailed;

/// Fill the whole slice with random material.
pub fn fill_random(rng: &mut dyn CryptoRngCore, bytes: &mut [u8]) -> Result<(), GetRandomFailed> {
    rng.try_fill_bytes(bytes).map_err(|_| GetRandomFailed)
}

/// Make a Vec<u8> of the given size containing random material.
pub fn random_vec(rng: &mut dyn CryptoRngCore, len: usize) -> Result<Vec<u8>, GetRandomFailed> {
    let mut v = vec![0; len];
    fill_random(rng, &mut v)?;
    Ok(v)
}

/// Adapts a `&mut dyn CryptoRngCore` to the `Sized` RNG bounds of the
/// `rsa` and `num-bigint` sampling APIs.
pub(crate) struct RngAdapter<'a>(pub(crate) &'a mut dyn CryptoRngCore);

impl RngCore for RngAdapter<'_> {
    fn next_u32(&mut self) -> u32 {
        self.0.as_rngcore().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.as_rngcore().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.as_rngcore().fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.0.as_rngcore().try_fill_bytes(dest)
    }
}

impl CryptoRng for RngAdapter<'_> {}
