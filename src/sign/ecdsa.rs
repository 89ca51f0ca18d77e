//! ECDSA over the registry's prime curves, plus the ASN.1 `{r, s}`
//! signature encoding shared with DSS.

use crate::ec::mod_inverse;
use crate::ec::weierstrass::PrimeCurve;
use crate::error::Error;
use crate::rand::RngAdapter;
use der::{asn1::UintRef, Decode, Encode, Sequence};
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;

/// DER SEQUENCE of two INTEGERs, as both ECDSA and DSA signatures are
/// encoded on the wire.
#[derive(Sequence)]
struct Asn1Signature<'a> {
    r: UintRef<'a>,
    s: UintRef<'a>,
}

/// Encode `{r, s}` as a DER SEQUENCE.
pub(crate) fn encode_signature(r: &BigUint, s: &BigUint) -> Result<Vec<u8>, Error> {
    let r_bytes = r.to_bytes_be();
    let s_bytes = s.to_bytes_be();
    let sig = Asn1Signature {
        r: UintRef::new(&r_bytes).map_err(|e| Error::Crypto(e.to_string()))?,
        s: UintRef::new(&s_bytes).map_err(|e| Error::Crypto(e.to_string()))?,
    };
    sig.to_der().map_err(|e| Error::Crypto(e.to_string()))
}

/// Parse a DER `{r, s}` SEQUENCE.  Non-positive values survive parsing as
/// zero and are rejected by the callers, mirroring the checks TLS requires.
pub(crate) fn parse_signature(der: &[u8]) -> Result<(BigUint, BigUint), Error> {
    let sig = Asn1Signature::from_der(der)
        .map_err(|_| Error::InvalidSignature("malformed DER signature".to_string()))?;
    Ok((
        BigUint::from_bytes_be(sig.r.as_bytes()),
        BigUint::from_bytes_be(sig.s.as_bytes()),
    ))
}

/// An ECDSA public key: a curve and an affine point.
#[allow(missing_docs)]
#[derive(Debug, Clone)]
pub struct EcdsaPublicKey {
    pub curve: &'static PrimeCurve,
    pub x: BigUint,
    pub y: BigUint,
}

/// An ECDSA signing key.
#[derive(Clone)]
pub struct EcdsaKeyPair {
    curve: &'static PrimeCurve,
    d: BigUint,
    public: EcdsaPublicKey,
}

impl std::fmt::Debug for EcdsaKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcdsaKeyPair")
            .field("curve", &self.curve)
            .finish()
    }
}

/// FIPS 186-4: use the leftmost min(bits(n), bits(digest)) bits of the
/// digest as the signing input.
fn truncated_digest(digest: &[u8], n: &BigUint) -> BigUint {
    let mut z = BigUint::from_bytes_be(digest);
    let digest_bits = digest.len() as u64 * 8;
    if digest_bits > n.bits() {
        z >>= digest_bits - n.bits();
    }
    z
}

impl EcdsaKeyPair {
    /// Generate a fresh key pair on `curve`.
    pub fn generate(
        curve: &'static PrimeCurve,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<Self, Error> {
        let n = curve.order().clone();
        let d = RngAdapter(rng).gen_biguint_range(&BigUint::one(), &n);
        let (x, y) = curve
            .scalar_base_mult(&d)
            .ok_or_else(|| Error::Crypto("scalar multiplication returned infinity".to_string()))?;
        Ok(Self {
            curve,
            d,
            public: EcdsaPublicKey { curve, x, y },
        })
    }

    /// The public half of this key pair.
    pub fn public_key(&self) -> &EcdsaPublicKey {
        &self.public
    }

    /// Sign `digest`, returning the raw `(r, s)` pair.
    pub fn sign(
        &self,
        rng: &mut dyn CryptoRngCore,
        digest: &[u8],
    ) -> Result<(BigUint, BigUint), Error> {
        let n = self.curve.order();
        let z = truncated_digest(digest, n);
        loop {
            let k = RngAdapter(rng).gen_biguint_range(&BigUint::one(), n);
            let (px, _) = match self.curve.scalar_base_mult(&k) {
                Some(pt) => pt,
                None => continue,
            };
            let r = px % n;
            if r.is_zero() {
                continue;
            }
            let k_inv = match mod_inverse(&k, n) {
                Some(inv) => inv,
                None => continue,
            };
            let s = k_inv * (&z + &r * &self.d) % n;
            if s.is_zero() {
                continue;
            }
            return Ok((r, s));
        }
    }
}

impl EcdsaPublicKey {
    /// Verify an `(r, s)` signature over `digest`.
    pub fn verify(&self, digest: &[u8], r: &BigUint, s: &BigUint) -> bool {
        let n = self.curve.order();
        if r.is_zero() || r >= n || s.is_zero() || s >= n {
            return false;
        }
        if !self.curve.is_on_curve(&self.x, &self.y) {
            return false;
        }
        let z = truncated_digest(digest, n);
        let w = match mod_inverse(s, n) {
            Some(w) => w,
            None => return false,
        };
        let u1 = &z * &w % n;
        let u2 = r * &w % n;

        let p1 = self.curve.scalar_base_mult(&u1);
        let p2 = self.curve.scalar_mult(&self.x, &self.y, &u2);
        let sum = match (p1, p2) {
            (Some(a), Some(b)) => self.curve.add_affine(&a, &b),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        };
        match sum {
            Some((x, _)) => &x % n == *r,
            None => false,
        }
    }
}
