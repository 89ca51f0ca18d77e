//! Short-Weierstrass curves over prime fields: y² = x³ + ax + b (mod p).
//!
//! One generic affine implementation driven by a parameter table.  Scalar
//! multiplication is plain double-and-add over `BigUint`; see the module
//! notes in [`crate::ec`] for why this is deliberate.

use super::{mod_inverse, mod_sub, Curve, EcPrivateKey, EcPublicKey};
use crate::error::Error;
use crate::rand::RngAdapter;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use rand_core::CryptoRngCore;
use std::fmt;

/// An affine point; None is the point at infinity.
type Point = Option<(BigUint, BigUint)>;

/// One prime-field short-Weierstrass curve, fully described by its domain
/// parameters.
pub struct PrimeCurve {
    name: &'static str,
    p: BigUint,
    a: BigUint,
    b: BigUint,
    gx: BigUint,
    gy: BigUint,
    n: BigUint,
    byte_len: usize,
}

impl fmt::Debug for PrimeCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimeCurve").field("name", &self.name).finish()
    }
}

fn hex(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 16).expect("curve constant is valid hex")
}

impl PrimeCurve {
    fn new(
        name: &'static str,
        p: &str,
        a: &str,
        b: &str,
        gx: &str,
        gy: &str,
        n: &str,
    ) -> Self {
        let p = hex(p);
        let byte_len = ((p.bits() + 7) / 8) as usize;
        Self {
            name,
            p,
            a: hex(a),
            b: hex(b),
            gx: hex(gx),
            gy: hex(gy),
            n: hex(n),
            byte_len,
        }
    }

    /// The SEC/RFC name of this curve.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn order(&self) -> &BigUint {
        &self.n
    }

    pub(crate) fn is_on_curve(&self, x: &BigUint, y: &BigUint) -> bool {
        if x >= &self.p || y >= &self.p {
            return false;
        }
        let lhs = (y * y) % &self.p;
        let rhs = (x * x * x + &self.a * x + &self.b) % &self.p;
        lhs == rhs
    }

    fn double(&self, x1: &BigUint, y1: &BigUint) -> Point {
        if y1.is_zero() {
            return None;
        }
        let p = &self.p;
        let num = (BigUint::from(3u32) * x1 * x1 + &self.a) % p;
        let den = mod_inverse(&((BigUint::from(2u32) * y1) % p), p)?;
        let lambda = num * den % p;
        let x3 = mod_sub(&(&lambda * &lambda), &(x1 + x1), p);
        let y3 = mod_sub(&(lambda * mod_sub(x1, &x3, p)), y1, p);
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

        let p = &self.p;
        if x1 == x2 {
            if (y1 + y2) % p == BigUint::zero() {
                return None;
            }
            return self.double(x1, y1);
        }

        let lambda = mod_sub(y2, y1, p) * mod_inverse(&mod_sub(x2, x1, p), p)? % p;
        let x3 = mod_sub(&mod_sub(&(&lambda * &lambda), x1, p), x2, p);
        let y3 = mod_sub(&(lambda * mod_sub(x1, &x3, p)), y1, p);
        Some((x3, y3))
    }

    pub(crate) fn scalar_mult(&self, x: &BigUint, y: &BigUint, k: &BigUint) -> Point {
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

    pub(crate) fn scalar_base_mult(&self, k: &BigUint) -> Point {
        self.scalar_mult(&self.gx, &self.gy, k)
    }

    pub(crate) fn add_affine(
        &self,
        a: &(BigUint, BigUint),
        b: &(BigUint, BigUint),
    ) -> Point {
        self.add(&Some(a.clone()), &Some(b.clone()))
    }

    fn pad(&self, v: &BigUint) -> Vec<u8> {
        let bytes = v.to_bytes_be();
        let mut out = vec![0u8; self.byte_len - bytes.len().min(self.byte_len)];
        out.extend_from_slice(&bytes);
        out
    }

    /// Solve y² = x³ + ax + b for y, if a root exists.
    fn y_for_x(&self, x: &BigUint) -> Option<BigUint> {
        let rhs = (x * x * x + &self.a * x + &self.b) % &self.p;
        mod_sqrt(&rhs, &self.p)
    }
}

impl Curve for PrimeCurve {
    fn generate_key(
        &self,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<(EcPrivateKey, EcPublicKey), Error> {
        let d = RngAdapter(rng).gen_biguint_range(&BigUint::one(), &self.n);
        let (x, y) = self
            .scalar_base_mult(&d)
            .ok_or_else(|| Error::Crypto("scalar multiplication returned infinity".to_string()))?;
        Ok((
            EcPrivateKey { d: d.to_bytes_be() },
            EcPublicKey::new(x, Some(y)),
        ))
    }

    fn marshal(&self, key: &EcPublicKey, compressed: bool) -> Vec<u8> {
        let y = key.y.clone().unwrap_or_default();
        if compressed {
            let mut out = Vec::with_capacity(1 + self.byte_len);
            out.push(if y.bit(0) { 0x03 } else { 0x02 });
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
                if x >= self.p {
                    return None;
                }
                let mut y = self.y_for_x(&x)?;
                if y.bit(0) != (*tag == 0x03) {
                    y = mod_sub(&BigUint::zero(), &y, &self.p);
                }
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

/// Tonelli-Shanks square root mod an odd prime.
fn mod_sqrt(n: &BigUint, p: &BigUint) -> Option<BigUint> {
    if n.is_zero() {
        return Some(BigUint::zero());
    }
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let p_minus_1 = p - &one;
    let half = &p_minus_1 / &two;
    if n.modpow(&half, p) != one {
        return None;
    }
    if p % 4u32 == BigUint::from(3u32) {
        return Some(n.modpow(&((p + &one) >> 2), p));
    }

    // p ≡ 1 (mod 4): full Tonelli-Shanks.
    let mut q = p_minus_1.clone();
    let mut s = 0u64;
    while !q.bit(0) {
        q >>= 1;
        s += 1;
    }
    let mut z = two;
    while z.modpow(&half, p) != p_minus_1 {
        z += 1u32;
    }

    let mut m = s;
    let mut c = z.modpow(&q, p);
    let mut t = n.modpow(&q, p);
    let mut r = n.modpow(&((&q + &one) >> 1), p);
    while t != one {
        let mut i = 0u64;
        let mut t2 = t.clone();
        while t2 != one {
            t2 = &t2 * &t2 % p;
            i += 1;
        }
        let b = c.modpow(&(BigUint::one() << (m - i - 1)), p);
        r = r * &b % p;
        c = &b * &b % p;
        t = t * &c % p;
        m = i;
    }
    Some(r)
}

macro_rules! prime_curve {
    ($static_name:ident, $name:literal, $p:literal, $a:literal, $b:literal,
     $gx:literal, $gy:literal, $n:literal) => {
        #[doc = concat!("The ", $name, " curve.")]
        pub static $static_name: Lazy<PrimeCurve> =
            Lazy::new(|| PrimeCurve::new($name, $p, $a, $b, $gx, $gy, $n));
    };
}

// Parameters from SEC 2 v2 and RFC 5639, verbatim.

prime_curve!(
    SECP160K1,
    "secp160k1",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFAC73",
    "0",
    "7",
    "3B4C382CE37AA192A4019E763036F4F5DD4D7EBB",
    "938CF935318FDCED6BC28286531733C3F03C4FEE",
    "0100000000000000000001B8FA16DFAB9ACA16B6B3"
);

prime_curve!(
    SECP160R1,
    "secp160r1",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF7FFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF7FFFFFFC",
    "1C97BEFC54BD7A8B65ACF89F81D4D4ADC565FA45",
    "4A96B5688EF573284664698968C38BB913CBFC82",
    "23A628553168947D59DCC912042351377AC5FB32",
    "0100000000000000000001F4C8F927AED3CA752257"
);

prime_curve!(
    SECP160R2,
    "secp160r2",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFAC73",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFAC70",
    "B4E134D3FB59EB8BAB57274904664D5AF50388BA",
    "52DCB034293A117E1F4FF11B30F7199D3144CE6D",
    "FEAFFEF2E331F296E071FA0DF9982CFEA7D43F2E",
    "0100000000000000000000351EE786A818F3A1A16B"
);

prime_curve!(
    SECP192K1,
    "secp192k1",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFEE37",
    "0",
    "3",
    "DB4FF10EC057E9AE26B07D0280B7F4341DA5D1B1EAE06C7D",
    "9B2F2F6D9C5628A7844163D015BE86344082AA88D95E2F9D",
    "FFFFFFFFFFFFFFFFFFFFFFFE26F2FC170F69466A74DEFD8D"
);

prime_curve!(
    SECP192R1,
    "secp192r1",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFFFFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFFFFFFFFFC",
    "64210519E59C80E70FA7E9AB72243049FEB8DEECC146B9B1",
    "188DA80EB03090F67CBF20EB43A18800F4FF0AFD82FF1012",
    "07192B95FFC8DA78631011ED6B24CDD573F977A11E794811",
    "FFFFFFFFFFFFFFFFFFFFFFFF99DEF836146BC9B1B4D22831"
);

prime_curve!(
    SECP224K1,
    "secp224k1",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFE56D",
    "0",
    "5",
    "A1455B334DF099DF30FC28A169A467E9E47075A90F7E650EB6B7A45C",
    "7E089FED7FBA344282CAFBD6F7E319F7C0B0BD59E2CA4BDB556D61A5",
    "010000000000000000000000000001DCE8D2EC6184CAF0A971769FB1F7"
);

prime_curve!(
    SECP224R1,
    "secp224r1",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF000000000000000000000001",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFE",
    "B4050A850C04B3ABF54132565044B0B7D7BFD8BA270B39432355FFB4",
    "B70E0CBD6BB4BF7F321390B94A03C1D356C21122343280D6115C1D21",
    "BD376388B5F723FB4C22DFE6CD4375A05A07476444D5819985007E34",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFF16A2E0B8F03E13DD29455C5C2A3D"
);

prime_curve!(
    SECP256K1,
    "secp256k1",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F",
    "0",
    "7",
    "79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798",
    "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141"
);

prime_curve!(
    SECP256R1,
    "secp256r1",
    "FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF",
    "FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFC",
    "5AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604B",
    "6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296",
    "4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5",
    "FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551"
);

prime_curve!(
    SECP384R1,
    "secp384r1",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFF0000000000000000FFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFF0000000000000000FFFFFFFC",
    "B3312FA7E23EE7E4988E056BE3F82D19181D9C6EFE8141120314088F5013875AC656398D8A2ED19D2A85C8EDD3EC2AEF",
    "AA87CA22BE8B05378EB1C71EF320AD746E1D3B628BA79B9859F741E082542A385502F25DBF55296C3A545E3872760AB7",
    "3617DE4A96262C6F5D9E98BF9292DC29F8F41DBD289A147CE9DA3113B5F0B8C00A60B1CE1D7E819D7A431D7C90EA0E5F",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFC7634D81F4372DDF581A0DB248B0A77AECEC196ACCC52973"
);

prime_curve!(
    SECP521R1,
    "secp521r1",
    "01FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "01FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFC",
    "0051953EB9618E1C9A1F929A21A0B68540EEA2DA725B99B315F3B8B489918EF109E156193951EC7E937B1652C0BD3BB1BF073573DF883D2C34F1EF451FD46B503F00",
    "00C6858E06B70404E9CD9E3ECB662395B4429C648139053FB521F828AF606B4D3DBAA14B5E77EFE75928FE1DC127A2FFA8DE3348B3C1856A429BF97E7E31C2E5BD66",
    "011839296A789A3BC0045C8A5FB42C7D1BD998F54449579B446817AFBD17273E662C97EE72995EF42640C550B9013FAD0761353C7086A272C24088BE94769FD16650",
    "01FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFA51868783BF2F966B7FCC0148F709A5D03BB5C9B8899C47AEBB6FB71E91386409"
);

prime_curve!(
    BRAINPOOLP256R1,
    "brainpoolP256r1",
    "A9FB57DBA1EEA9BC3E660A909D838D726E3BF623D52620282013481D1F6E5377",
    "7D5A0975FC2C3057EEF67530417AFFE7FB8055C126DC5C6CE94A4B44F330B5D9",
    "26DC5C6CE94A4B44F330B5D9BBD77CBF958416295CF7E1CE6BCCDC18FF8C07B6",
    "8BD2AEB9CB7E57CB2C4B482FFC81B7AFB9DE27E1E3BD23C23A4453BD9ACE3262",
    "547EF835C3DAC4FD97F8461A14611DC9C27745132DED8E545C1D54C72F046997",
    "A9FB57DBA1EEA9BC3E660A909D838D718C397AA3B561A6F7901E0E82974856A7"
);

prime_curve!(
    BRAINPOOLP384R1,
    "brainpoolP384r1",
    "8CB91E82A3386D280F5D6F7E50E641DF152F7109ED5456B412B1DA197FB71123ACD3A729901D1A71874700133107EC53",
    "7BC382C63D8C150C3C72080ACE05AFA0C2BEA28E4FB22787139165EFBA91F90F8AA5814A503AD4EB04A8C7DD22CE2826",
    "04A8C7DD22CE28268B39B55416F0447C2FB77DE107DCD2A62E880EA53EEB62D57CB4390295DBC9943AB78696FA504C11",
    "1D1C64F068CF45FFA2A63A81B7C13F6B8847A3E77EF14FE3DB7FCAFE0CBD10E8E826E03436D646AAEF87B2E247D4AF1E",
    "8ABE1D7520F9C2A45CB1EB8E95CFD55262B70B29FEEC5864E19C054FF99129280E4646217791811142820341263C5315",
    "8CB91E82A3386D280F5D6F7E50E641DF152F7109ED5456B31F166E6CAC0425A7CF3AB6AF6B7FC3103B883202E9046565"
);

prime_curve!(
    BRAINPOOLP512R1,
    "brainpoolP512r1",
    "AADD9DB8DBE9C48B3FD4E6AE33C9FC07CB308DB3B3C9D20ED6639CCA703308717D4D9B009BC66842AECDA12AE6A380E62881FF2F2D82C68528AA6056583A48F3",
    "7830A3318B603B89E2327145AC234CC594CBDD8D3DF91610A83441CAEA9863BC2DED5D5AA8253AA10A2EF1C98B9AC8B57F1117A72BF2C7B9E7C1AC4D77FC94CA",
    "3DF91610A83441CAEA9863BC2DED5D5AA8253AA10A2EF1C98B9AC8B57F1117A72BF2C7B9E7C1AC4D77FC94CADC083E67984050B75EBAE5DD2809BD638016F723",
    "81AEE4BDD82ED9645A21322E9C4C6A9385ED9F70B5D916C1B43B62EEF4D0098EFF3B1F78E2D0D48D50D1687B93B97D5F7C6D5047406A5E688B352209BCB9F822",
    "7DDE385D566332ECC0EABFA9CF7822FDF209F70024A57B1AA000C55B881F8111B2DCDE494A5F485E5BCA4BD88A2763AED1CA2B2FA8F0540678CD1E0F3AD80892",
    "AADD9DB8DBE9C48B3FD4E6AE33C9FC07CB308DB3B3C9D20ED6639CCA70330870553E5C414CA92619418661197FAC10471DB1D381085DDADDB58796829CA90069"
);
