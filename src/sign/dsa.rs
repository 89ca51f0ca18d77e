//! DSS (DSA) verification for the DHE_DSS cipher suites.  Signing is never
//! needed: this library only ever plays the client against DSS servers.

use crate::ec::mod_inverse;
use num_bigint::BigUint;
use num_traits::Zero;

/// A DSA public key as carried in a DSS server certificate.
#[allow(missing_docs)]
#[derive(Debug, Clone)]
pub struct DsaPublicKey {
    pub p: BigUint,
    pub q: BigUint,
    pub g: BigUint,
    pub y: BigUint,
}

impl DsaPublicKey {
    /// Verify an `(r, s)` signature over `digest` (FIPS 186-4 section 4.7).
    /// Callers have already rejected non-positive r and s.
    pub fn verify(&self, digest: &[u8], r: &BigUint, s: &BigUint) -> bool {
        if r.is_zero() || r >= &self.q || s.is_zero() || s >= &self.q {
            return false;
        }
        let w = match mod_inverse(s, &self.q) {
            Some(w) => w,
            None => return false,
        };

        // Leftmost min(bits(q), bits(digest)) bits of the digest.
        let mut z = BigUint::from_bytes_be(digest);
        let digest_bits = digest.len() as u64 * 8;
        if digest_bits > self.q.bits() {
            z >>= digest_bits - self.q.bits();
        }

        let u1 = &z * &w % &self.q;
        let u2 = r * &w % &self.q;
        let v = self.g.modpow(&u1, &self.p) * self.y.modpow(&u2, &self.p) % &self.p % &self.q;
        v == *r
    }
}
