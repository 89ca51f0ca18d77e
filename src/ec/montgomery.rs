//! X25519 and X448 (RFC 7748), rendered over `BigUint`.
//!
//! The dedicated crates clamp, validate and reject exactly the inputs this
//! library needs to be able to emit — twist x-coordinates, low-order points
//! — so the ladder is spelled out here instead.  Wire format is the RFC 7748
//! little-endian x-coordinate; there is no y and no compression flag.

use super::{mod_sub, Curve, EcPrivateKey, EcPublicKey};
use crate::error::Error;
use crate::rand;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use rand_core::CryptoRngCore;
use std::fmt;

/// One x-only Montgomery curve.
pub struct MontgomeryCurve {
    name: &'static str,
    p: BigUint,
    a24: BigUint,
    base_u: BigUint,
    bits: u64,
    byte_len: usize,
    clamp_low_and: u8,
    clamp_high_and: u8,
    clamp_high_or: u8,
}

impl fmt::Debug for MontgomeryCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MontgomeryCurve")
            .field("name", &self.name)
            .finish()
    }
}

impl MontgomeryCurve {
    /// The RFC 7748 name of this curve.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn decode_scalar(&self, bytes: &[u8]) -> BigUint {
        let mut k = bytes.to_vec();
        k.resize(self.byte_len, 0);
        k[0] &= self.clamp_low_and;
        k[self.byte_len - 1] &= self.clamp_high_and;
        k[self.byte_len - 1] |= self.clamp_high_or;
        BigUint::from_bytes_le(&k)
    }

    fn encode_u(&self, u: &BigUint) -> Vec<u8> {
        let mut out = u.to_bytes_le();
        out.resize(self.byte_len, 0);
        out
    }

    /// The RFC 7748 Montgomery ladder; variable time by design.
    fn ladder(&self, k: &BigUint, u: &BigUint) -> BigUint {
        let p = &self.p;
        let x1 = u % p;
        let mut x2 = BigUint::one();
        let mut z2 = BigUint::zero();
        let mut x3 = x1.clone();
        let mut z3 = BigUint::one();
        let mut swap = false;

        for t in (0..self.bits).rev() {
            let k_t = k.bit(t);
            if k_t != swap {
                std::mem::swap(&mut x2, &mut x3);
                std::mem::swap(&mut z2, &mut z3);
            }
            swap = k_t;

            let a = (&x2 + &z2) % p;
            let aa = &a * &a % p;
            let b = mod_sub(&x2, &z2, p);
            let bb = &b * &b % p;
            let e = mod_sub(&aa, &bb, p);
            let c = (&x3 + &z3) % p;
            let d = mod_sub(&x3, &z3, p);
            let da = d * &a % p;
            let cb = c * &b % p;

            let t1 = (&da + &cb) % p;
            x3 = &t1 * &t1 % p;
            let t2 = mod_sub(&da, &cb, p);
            z3 = &x1 * (&t2 * &t2 % p) % p;
            x2 = &aa * &bb % p;
            z2 = &e * ((&aa + &(&self.a24 * &e % p)) % p) % p;
        }
        if swap {
            std::mem::swap(&mut x2, &mut x3);
            std::mem::swap(&mut z2, &mut z3);
        }

        // z2 = 0 happens exactly for the low-order inputs; the conventional
        // all-zero output falls out of 0^(p-2) = 0.
        x2 * z2.modpow(&(p - BigUint::from(2u32)), p) % p
    }
}

impl Curve for MontgomeryCurve {
    fn generate_key(
        &self,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<(EcPrivateKey, EcPublicKey), Error> {
        let d = rand::random_vec(rng, self.byte_len)?;
        let u = self.ladder(&self.decode_scalar(&d), &self.base_u);
        Ok((EcPrivateKey { d }, EcPublicKey::new(u, None)))
    }

    fn marshal(&self, key: &EcPublicKey, _compressed: bool) -> Vec<u8> {
        self.encode_u(&key.x)
    }

    fn unmarshal(&self, data: &[u8]) -> Option<EcPublicKey> {
        if data.len() != self.byte_len {
            return None;
        }
        let mut bytes = data.to_vec();
        if self.bits % 8 != 0 {
            // RFC 7748: the unused high bit is masked off before use.
            bytes[self.byte_len - 1] &= (1u8 << (self.bits % 8)) - 1;
        }
        let x = BigUint::from_bytes_le(&bytes);
        if x >= self.p {
            return None;
        }
        Some(EcPublicKey::new(x, None))
    }

    fn shared_secret(
        &self,
        privkey: &EcPrivateKey,
        peer: &EcPublicKey,
    ) -> Result<Vec<u8>, Error> {
        let k = self.decode_scalar(&privkey.d);
        let u = self.ladder(&k, &peer.x);
        Ok(self.encode_u(&u))
    }
}

/// The curve25519 x-only Diffie-Hellman function.
pub static X25519: Lazy<MontgomeryCurve> = Lazy::new(|| MontgomeryCurve {
    name: "x25519",
    p: (BigUint::one() << 255u32) - BigUint::from(19u32),
    a24: BigUint::from(121665u32),
    base_u: BigUint::from(9u32),
    bits: 255,
    byte_len: 32,
    clamp_low_and: 248,
    clamp_high_and: 127,
    clamp_high_or: 64,
});

/// The curve448 x-only Diffie-Hellman function.
pub static X448: Lazy<MontgomeryCurve> = Lazy::new(|| MontgomeryCurve {
    name: "x448",
    p: (BigUint::one() << 448u32) - (BigUint::one() << 224u32) - BigUint::one(),
    a24: BigUint::from(39081u32),
    base_u: BigUint::from(5u32),
    bits: 448,
    byte_len: 56,
    clamp_low_and: 252,
    clamp_high_and: 255,
    clamp_high_or: 128,
});
