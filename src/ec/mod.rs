//! Elliptic-curve Diffie-Hellman over the named groups a scanner meets in
//! the wild.
//!
//! Three families hide behind one [`Curve`] trait: prime-field
//! short-Weierstrass curves, the GF(2^163) binary curves, and the Montgomery
//! x-only curves (X25519/X448).  All arithmetic is arbitrary-precision and
//! variable-time: this library *sends* invalid and small-subgroup points on
//! purpose, so the per-curve constant-time crates are the wrong tool here.

pub mod binary;
pub mod montgomery;
pub mod weierstrass;

use crate::error::Error;
use crate::msgs::enums::NamedGroup;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed};
use rand_core::CryptoRngCore;

/// A public key: an affine point.  Montgomery curves expose only the
/// x-coordinate; `y` is absent for them and must stay absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcPublicKey {
    /// Affine x-coordinate.
    pub x: BigUint,
    /// Affine y-coordinate; None on x-only curves.
    pub y: Option<BigUint>,
}

impl EcPublicKey {
    /// Build a key from coordinates.
    pub fn new(x: BigUint, y: Option<BigUint>) -> Self {
        Self { x, y }
    }
}

/// A private key: an opaque scalar.
#[derive(Debug, Clone)]
pub struct EcPrivateKey {
    /// The scalar bytes, in the curve's native encoding.
    pub d: Vec<u8>,
}

/// One named group's worth of ECDH operations.
///
/// No code outside the registry branches on curve identity; everything the
/// key-agreement state machines need lives behind these four methods.
pub trait Curve: Send + Sync {
    /// Generate a fresh key pair.  A generated public key always round-trips
    /// through `marshal`/`unmarshal`.
    fn generate_key(
        &self,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<(EcPrivateKey, EcPublicKey), Error>;

    /// Serialize a point.  Weierstrass curves honor `compressed` (SEC 1
    /// 0x02/0x03 prefix); Montgomery curves ignore it and emit x only.
    fn marshal(&self, key: &EcPublicKey, compressed: bool) -> Vec<u8>;

    /// Parse a point, enforcing `0 <= x < field modulus` and (for
    /// Weierstrass) the curve equation.  Returns None on any violation.
    fn unmarshal(&self, data: &[u8]) -> Option<EcPublicKey>;

    /// Run the Diffie-Hellman step and return the shared bytes.
    fn shared_secret(&self, privkey: &EcPrivateKey, peer: &EcPublicKey)
        -> Result<Vec<u8>, Error>;
}

/// Map an IANA group identifier to its implementation.  Unknown ids return
/// None and callers escalate to a handshake failure.
pub fn curve_for_group(group: NamedGroup) -> Option<&'static dyn Curve> {
    Some(match group {
        NamedGroup::sect163k1 => &*binary::SECT163K1,
        NamedGroup::sect163r1 => &*binary::SECT163R1,
        NamedGroup::sect163r2 => &*binary::SECT163R2,
        NamedGroup::secp160k1 => &*weierstrass::SECP160K1,
        NamedGroup::secp160r1 => &*weierstrass::SECP160R1,
        NamedGroup::secp160r2 => &*weierstrass::SECP160R2,
        NamedGroup::secp192k1 => &*weierstrass::SECP192K1,
        NamedGroup::secp192r1 => &*weierstrass::SECP192R1,
        NamedGroup::secp224k1 => &*weierstrass::SECP224K1,
        NamedGroup::secp224r1 => &*weierstrass::SECP224R1,
        NamedGroup::secp256k1 => &*weierstrass::SECP256K1,
        NamedGroup::secp256r1 => &*weierstrass::SECP256R1,
        NamedGroup::secp384r1 => &*weierstrass::SECP384R1,
        NamedGroup::secp521r1 => &*weierstrass::SECP521R1,
        NamedGroup::brainpoolP256r1 => &*weierstrass::BRAINPOOLP256R1,
        NamedGroup::brainpoolP384r1 => &*weierstrass::BRAINPOOLP384R1,
        NamedGroup::brainpoolP512r1 => &*weierstrass::BRAINPOOLP512R1,
        NamedGroup::X25519 => &*montgomery::X25519,
        NamedGroup::X448 => &*montgomery::X448,
        _ => return None,
    })
}

/// All groups the registry can serve, in id order.
pub const ALL_GROUPS: &[NamedGroup] = &[
    NamedGroup::sect163k1,
    NamedGroup::sect163r1,
    NamedGroup::sect163r2,
    NamedGroup::secp160k1,
    NamedGroup::secp160r1,
    NamedGroup::secp160r2,
    NamedGroup::secp192k1,
    NamedGroup::secp192r1,
    NamedGroup::secp224k1,
    NamedGroup::secp224r1,
    NamedGroup::secp256k1,
    NamedGroup::secp256r1,
    NamedGroup::secp384r1,
    NamedGroup::secp521r1,
    NamedGroup::brainpoolP256r1,
    NamedGroup::brainpoolP384r1,
    NamedGroup::brainpoolP512r1,
    NamedGroup::X25519,
    NamedGroup::X448,
];

/// a^-1 mod m, when it exists.
pub(crate) fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    let a = BigInt::from(a.clone());
    let m = BigInt::from(m.clone());
    let e = a.extended_gcd(&m);
    if !e.gcd.is_one() {
        return None;
    }
    let x = e.x.mod_floor(&m);
    debug_assert!(!x.is_negative());
    x.to_biguint()
}

/// (a - b) mod p for unsigned operands.
pub(crate) fn mod_sub(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    let a = a % p;
    let b = b % p;
    if a >= b {
        a - b
    } else {
        p - b + a
    }
}
