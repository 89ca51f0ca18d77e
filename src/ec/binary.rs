//! Short-Weierstrass curves over GF(2^163): y² + xy = x³ + ax² + b.
//!
//! Field elements are bit-polynomials stored in a `BigUint`; addition is
//! xor, multiplication is shift-and-xor with reduction by the field
//! polynomial.  Only the three sect163 groups still seen on old servers are
//! wired up.

use super::{Curve, EcPrivateKey, EcPublicKey};
use crate::error::Error;
use crate::rand::RngAdapter;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use rand_core::CryptoRngCore;
use std::fmt;

type Point = Option<(BigUint, BigUint)>;

/// One GF(2^m) short-Weierstrass curve.
pub struct BinaryCurve {
    name: &'static str,
    m: u64,
    poly: BigUint,
    a: BigUint,
    b: BigUint,
    gx: BigUint,
    gy: BigUint,
    n: BigUint,
    byte_len: usize,
}

impl fmt::Debug for BinaryCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryCurve").field("name", &self.name).finish()
    }
}

fn hex(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 16).expect("curve constant is valid hex")
}

impl BinaryCurve {
    fn new(
        name: &'static str,
        m: u64,
        poly_terms: &[u64],
        a: &str,
        b: &str,
        gx: &str,
        gy: &str,
        n: &str,
    ) -> Self {
        let mut poly = BigUint::one() << m;
        for term in poly_terms {
            poly |= BigUint::one() << *term;
        }
        poly |= BigUint::one();
        Self {
            name,
            m,
            poly,
            a: hex(a),
            b: hex(b),
            gx: hex(gx),
            gy: hex(gy),
            n: hex(n),
            byte_len: ((m + 7) / 8) as usize,
        }
    }

    /// The SEC name of this curve.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn reduce(&self, mut x: BigUint) -> BigUint {
        while x.bits() > self.m {
            let shift = x.bits() - 1 - self.m;
            x ^= &self.poly << shift;
        }
        x
    }

    fn fmul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let mut acc = BigUint::zero();
        for i in 0..b.bits() {
            if b.bit(i) {
                acc ^= a << i;
            }
        }
        self.reduce(acc)
    }

    fn fsqr(&self, a: &BigUint) -> BigUint {
        self.fmul(a, a)
    }

    // Extended Euclid over GF(2)[x].
    fn finv(&self, a: &BigUint) -> Option<BigUint> {
        if a.is_zero() {
            return None;
        }
        let mut u = self.reduce(a.clone());
        let mut v = self.poly.clone();
        let mut g1 = BigUint::one();
        let mut g2 = BigUint::zero();
        while !u.is_one() {
            if u.is_zero() {
                return None;
            }
            let mut j = u.bits() as i64 - v.bits() as i64;
            if j < 0 {
                std::mem::swap(&mut u, &mut v);
                std::mem::swap(&mut g1, &mut g2);
                j = -j;
            }
            u ^= &v << (j as u64);
            g1 ^= &g2 << (j as u64);
        }
        Some(self.reduce(g1))
    }

    pub(crate) fn is_on_curve(&self, x: &BigUint, y: &BigUint) -> bool {
        if x.bits() > self.m || y.bits() > self.m {
            return false;
        }
        // y² + xy == x³ + ax² + b
        let lhs = &self.fsqr(y) ^ &self.fmul(x, y);
        let x2 = self.fsqr(x);
        let rhs = &(&self.fmul(&x2, x) ^ &self.fmul(&self.a, &x2)) ^ &self.b;
        lhs == rhs
    }

    fn double(&self, x1: &BigUint, y1: &BigUint) -> Point {
        if x1.is_zero() {
            return None;
        }
        // λ = x + y/x; x3 = λ² + λ + a; y3 = x² + (λ+1)·x3
        let lambda = x1 ^ &self.fmul(y1, &self.finv(x1)?);
        let x3 = &(&self.fsqr(&lambda) ^ &lambda) ^ &self.a;
        let y3 = &self.fsqr(x1) ^ &self.fmul(&(&lambda ^ &BigUint::one()), &x3);
        Some((x3, y3))
    }

    fn add(&self, p1: &Point, p2: &Point) -> Point {
        let (x1, y1) = match p1 {
            Some(pt) => pt,
            None => return p2.clone(),
        };
        let (x2, y2) = match p2 {
            Some(pt) => pt,
            None => return p1.clone(),
        };

        if x1 == x2 {
            // -(x, y) = (x, x + y)
            if *y2 == (x1 ^ y1) {
                return None;
            }
            return self.double(x1, y1);
        }

        let lambda = self.fmul(&(y1 ^ y2), &self.finv(&(x1 ^ x2))?);
        let x3 = &(&(&(&self.fsqr(&lambda) ^ &lambda) ^ x1) ^ x2) ^ &self.a;
        let y3 = &(&self.fmul(&lambda, &(x1 ^ &x3)) ^ &x3) ^ y1;
        Some((x3, y3))
    }

    fn scalar_mult(&self, x: &BigUint, y: &BigUint, k: &BigUint) -> Point {
        let mut acc: Point = None;
        let base: Point = Some((x.clone(), y.clone()));
        for i in (0..k.bits()).rev() {
            acc = self.add(&acc, &acc);
            if k.bit(i) {
                acc = self.add(&acc, &base);
            }
        }
        acc
    }

    fn pad(&self, v: &BigUint) -> Vec<u8> {
        let bytes = v.to_bytes_be();
        let mut out = vec![0u8; self.byte_len - bytes.len().min(self.byte_len)];
        out.extend_from_slice(&bytes);
        out
    }

    /// Solve z² + z = beta by half-trace; m is odd for all our fields.
    fn half_trace(&self, beta: &BigUint) -> BigUint {
        let mut h = beta.clone();
        for _ in 0..(self.m - 1) / 2 {
            h = &self.fsqr(&self.fsqr(&h)) ^ beta;
        }
        h
    }

    /// Recover y from x and the SEC 1 parity bit ỹ.
    fn y_for_x(&self, x: &BigUint, y_bit: bool) -> Option<BigUint> {
        if x.is_zero() {
            // y = sqrt(b): squaring is a bijection, sqrt is m-1 squarings.
            let mut y = self.b.clone();
            for _ in 0..self.m - 1 {
                y = self.fsqr(&y);
            }
            return Some(y);
        }
        let beta = &(x ^ &self.a) ^ &self.fmul(&self.b, &self.finv(&self.fsqr(x))?);
        let mut z = self.half_trace(&beta);
        if (&self.fsqr(&z) ^ &z) != beta {
            return None;
        }
        if z.bit(0) != y_bit {
            z ^= BigUint::one();
        }
        Some(self.fmul(x, &z))
    }
}

impl Curve for BinaryCurve {
    fn generate_key(
        &self,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<(EcPrivateKey, EcPublicKey), Error> {
        let d = RngAdapter(rng).gen_biguint_range(&BigUint::one(), &self.n);
        let (x, y) = self
            .scalar_mult(&self.gx, &self.gy, &d)
            .ok_or_else(|| Error::Crypto("scalar multiplication returned infinity".to_string()))?;
        Ok((
            EcPrivateKey { d: d.to_bytes_be() },
            EcPublicKey::new(x, Some(y)),
        ))
    }

    fn marshal(&self, key: &EcPublicKey, compressed: bool) -> Vec<u8> {
        let y = key.y.clone().unwrap_or_default();
        if compressed {
            let y_bit = if key.x.is_zero() {
                false
            } else {
                match self.finv(&key.x) {
                    Some(x_inv) => self.fmul(&y, &x_inv).bit(0),
                    None => false,
                }
            };
            let mut out = Vec::with_capacity(1 + self.byte_len);
            out.push(if y_bit { 0x03 } else { 0x02 });
            out.extend_from_slice(&self.pad(&key.x));
            out
        } else {
            let mut out = Vec::with_capacity(1 + 2 * self.byte_len);
            out.push(0x04);
            out.extend_from_slice(&self.pad(&key.x));
            out.extend_from_slice(&self.pad(&y));
            out
        }
    }

    fn unmarshal(&self, data: &[u8]) -> Option<EcPublicKey> {
        match data.split_first()? {
            (0x04, rest) if rest.len() == 2 * self.byte_len => {
                let x = BigUint::from_bytes_be(&rest[..self.byte_len]);
                let y = BigUint::from_bytes_be(&rest[self.byte_len..]);
                if !self.is_on_curve(&x, &y) {
                    return None;
                }
                Some(EcPublicKey::new(x, Some(y)))
            }
            (tag @ (0x02 | 0x03), rest) if rest.len() == self.byte_len => {
                let x = BigUint::from_bytes_be(rest);
                if x.bits() > self.m {
                    return None;
                }
                let y = self.y_for_x(&x, *tag == 0x03)?;
                Some(EcPublicKey::new(x, Some(y)))
            }
            _ => None,
        }
    }

    fn shared_secret(
        &self,
        privkey: &EcPrivateKey,
        peer: &EcPublicKey,
    ) -> Result<Vec<u8>, Error> {
        let y = peer
            .y
            .as_ref()
            .ok_or_else(|| Error::Crypto("peer point is missing its y-coordinate".to_string()))?;
        let d = BigUint::from_bytes_be(&privkey.d);
        let (x, _) = self
            .scalar_mult(&peer.x, y, &d)
            .ok_or_else(|| Error::Crypto("shared secret is the point at infinity".to_string()))?;
        Ok(x.to_bytes_be())
    }
}

macro_rules! binary_curve {
    ($static_name:ident, $name:literal, $a:literal, $b:literal,
     $gx:literal, $gy:literal, $n:literal) => {
        #[doc = concat!("The ", $name, " curve.")]
        pub static $static_name: Lazy<BinaryCurve> = Lazy::new(|| {
            // All three sect163 curves share f(x) = x^163 + x^7 + x^6 + x^3 + 1.
            BinaryCurve::new($name, 163, &[7, 6, 3], $a, $b, $gx, $gy, $n)
        });
    };
}

// Parameters from SEC 2 v1, verbatim.

binary_curve!(
    SECT163K1,
    "sect163k1",
    "1",
    "1",
    "02FE13C0537BBC11ACAA07D793DE4E6D5E5C94EEE8",
    "0289070FB05D38FF58321F2E800536D538CCDAA3D9",
    "04000000000000000000020108A2E0CC0D99F8A5EF"
);

binary_curve!(
    SECT163R1,
    "sect163r1",
    "07B6882CAAEFA84F9554FF8428BD88E246D2782AE2",
    "0713612DCDDCB40AAB946BDA29CA91F73AF958AFD9",
    "0369979697AB43897789566789567F787A7876A654",
    "00435EDB42EFAFB2989D51FEFCE3C80988F41FF883",
    "03FFFFFFFFFFFFFFFFFFFF48AAB689C29CA710279B"
);

binary_curve!(
    SECT163R2,
    "sect163r2",
    "1",
    "020A601907B8C953CA1481EB10512F78744A3205FD",
    "03F0EBA16286A2D57EA0991168D4994637E8343E36",
    "00D51FBC6C71A0094FA2CDD545B11C5C0C797324F1",
    "040000000000000000000292FE77E70C12A4234C33"
);
