//! Ephemeral finite-field Diffie-Hellman.
//!
//! The server always offers the 2048-bit MODP group with 256-bit prime
//! order subgroup from RFC 5114 section 2.3.  The client-side research
//! knob in `Config::kex_config` can replace the exponent with degenerate
//! values (0, 1, p-1) or an element of small order; see the table in the
//! crate docs.
//!
//! Pre-master secrets are minimal big-endian with no padding to |p|.  Some
//! stacks left-pad; interop with those is knowingly out of scope.

use crate::config::Config;
use crate::error::Error;
use crate::key::{Certificate, PeerCertificate};
use crate::msgs::codec::{Codec, PayloadU16, Reader};
use crate::msgs::handshake::{
    ClientDhParams, ClientHello, ClientKeyExchange, ServerDhParams, ServerHello,
    ServerKeyExchange,
};
use crate::rand::RngAdapter;
use crate::sign::ParameterAuth;
use log::debug;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use once_cell::sync::Lazy;

struct DhGroup {
    p: BigUint,
    g: BigUint,
    q: BigUint,
}

// 2048-bit MODP group with 256-bit prime order subgroup (RFC 5114,
// section 2.3).
static RFC5114_GROUP: Lazy<DhGroup> = Lazy::new(|| {
    let hex = |s: &str| BigUint::parse_bytes(s.as_bytes(), 16).expect("group constant is valid hex");
    DhGroup {
        p: hex(
            "87A8E61DB4B6663CFFBBD19C651959998CEEF608660DD0F25D2CEED4435E3B00\
             E00DF8F1D61957D4FAF7DF4561B2AA3016C3D91134096FAA3BF4296D830E9A7C\
             209E0C6497517ABD5A8A9D306BCF67ED91F9E6725B4758C022E0B1EF4275BF7B\
             6C5BFC11D45F9088B941F54EB1E59BB8BC39A0BF12307F5C4FDB70C581B23F76\
             B63ACAE1CAA6B7902D52526735488A0EF13C6D9A51BFA4AB3AD8347796524D8E\
             F6A167B5A41825D967E144E5140564251CCACB83E6B486F6B3CA3F7971506026\
             C0B857F689962856DED4010ABD0BE621C3A3960A54E710C375F26375D7014103\
             A4B54330C198AF126116D2276E11715F693877FAD7EF09CADB094AE91E1A1597",
        ),
        g: hex(
            "3FB32C9B73134D0B2E77506660EDBD484CA7B18F21EF205407F4793A1A0BA125\
             10DBC15077BE463FFF4FED4AAC0BB555BE3A6C1B0C6B47B1BC3773BF7E8C6F62\
             901228F8C28CBB18A55AE31341000A650196F931C77A57F2DDF463E5E9EC144B\
             777DE62AAAB8A8628AC376D282D6ED3864E67982428EBC831D14348F6F2F9193\
             B5045AF2767164E1DFC967C1FB3F2E55A4BD1BFFE83B9C80D052B985D182EA0A\
             DB2A3B7313D3FE14C8484B1E052588B9B7D2BBD2DF016199ECD06E1557CD0915\
             B3353BBB64E0EC377FD028370DF92B52C7891428CDC67EB6184B523D1DB246C3\
             2F63078490F00EF8D647D148D47954515E2327CFEF98C582664B4C0F6CC41659",
        ),
        q: hex("8CF83642A709A097B447997640129DA299B1A47D1EB3750BA308B0FE64F5FBD3"),
    }
});

/// State for ephemeral finite-field Diffie-Hellman.  The public `y_*` and
/// `x_ours` fields are observability only: they record the negotiated
/// values for scan output and never feed back into the handshake.
pub struct DheKeyAgreement {
    pub(crate) auth: ParameterAuth,
    p: Option<BigUint>,
    g: Option<BigUint>,
    y_theirs: Option<BigUint>,
    /// Our public value.
    pub y_ours: Option<BigUint>,
    /// Our secret exponent (zero when a degenerate value was sent).
    pub x_ours: Option<BigUint>,
    /// The server's public value, whichever side we are.
    pub y_server: Option<BigUint>,
    /// The client's public value, whichever side we are.
    pub y_client: Option<BigUint>,
    pub(crate) verify_error: Option<Error>,
}

impl DheKeyAgreement {
    pub(crate) fn new(auth: ParameterAuth) -> Self {
        Self {
            auth,
            p: None,
            g: None,
            y_theirs: None,
            y_ours: None,
            x_ours: None,
            y_server: None,
            y_client: None,
            verify_error: None,
        }
    }

    pub(crate) fn generate_server_key_exchange(
        &mut self,
        config: &Config,
        cert: &Certificate,
        client_hello: &ClientHello,
        hello: &ServerHello,
    ) -> Result<Option<ServerKeyExchange>, Error> {
        let group = &*RFC5114_GROUP;

        let x = {
            let mut rng = config.rand();
            RngAdapter(rng.as_mut()).gen_biguint_below(&group.q)
        };
        let y = group.g.modpow(&x, &group.p);

        let params = ServerDhParams {
            dh_p: PayloadU16::new(group.p.to_bytes_be()),
            dh_g: PayloadU16::new(group.g.to_bytes_be()),
            dh_ys: PayloadU16::new(y.to_bytes_be()),
        }
        .get_encoding();

        self.p = Some(group.p.clone());
        self.g = Some(group.g.clone());
        self.x_ours = Some(x);
        self.y_ours = Some(y.clone());
        self.y_server = Some(y);

        self.auth
            .sign_parameters(config, cert, client_hello, hello, params)
            .map(Some)
    }

    pub(crate) fn process_client_key_exchange(
        &mut self,
        _config: &Config,
        _cert: &Certificate,
        ckx: &ClientKeyExchange,
    ) -> Result<Vec<u8>, Error> {
        let mut rd = Reader::init(&ckx.ciphertext);
        let params = ClientDhParams::read(&mut rd).ok_or(Error::InvalidClientKeyExchange)?;
        if rd.any_left() {
            return Err(Error::InvalidClientKeyExchange);
        }

        let p = self
            .p
            .as_ref()
            .ok_or_else(|| Error::General("DHE server state is missing its group".to_string()))?;
        let x = self.x_ours.as_ref().ok_or_else(|| {
            Error::General("DHE server state is missing its exponent".to_string())
        })?;

        let y_theirs = BigUint::from_bytes_be(&params.dh_yc.0);
        self.y_client = Some(y_theirs.clone());
        if y_theirs.is_zero() || &y_theirs >= p {
            return Err(Error::InvalidClientKeyExchange);
        }

        Ok(y_theirs.modpow(x, p).to_bytes_be())
    }

    pub(crate) fn process_server_key_exchange(
        &mut self,
        config: &Config,
        client_hello: &ClientHello,
        server_hello: &ServerHello,
        cert: &PeerCertificate,
        skx: &mut ServerKeyExchange,
    ) -> Result<(), Error> {
        // Parse and validate into locals before touching any state, so a
        // malformed message leaves the agreement untouched.
        let mut rd = Reader::init(&skx.key);
        let params = ServerDhParams::read(&mut rd).ok_or(Error::InvalidServerKeyExchange)?;

        let p = BigUint::from_bytes_be(&params.dh_p.0);
        let g = BigUint::from_bytes_be(&params.dh_g.0);
        let y_theirs = BigUint::from_bytes_be(&params.dh_ys.0);
        if y_theirs.is_zero() || y_theirs >= p {
            return Err(Error::InvalidServerKeyExchange);
        }

        let params_len = skx.key.len() - rd.left();
        let (server_dh_params, sig) = skx.key.split_at(params_len);

        let result = self.auth.verify_parameters(
            config,
            client_hello,
            server_hello,
            cert,
            server_dh_params,
            sig,
        );

        self.p = Some(p);
        self.g = Some(g);
        self.y_server = Some(y_theirs.clone());
        self.y_theirs = Some(y_theirs);

        match result {
            Ok(digest) => {
                skx.digest = digest;
                self.verify_error = None;
            }
            Err(err) => self.verify_error = Some(err),
        }

        if config.insecure_skip_verify {
            return Ok(());
        }
        match &self.verify_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    pub(crate) fn generate_client_key_exchange(
        &mut self,
        config: &Config,
        _client_hello: &ClientHello,
        _cert: &PeerCertificate,
    ) -> Result<(Vec<u8>, ClientKeyExchange), Error> {
        let (p, g, y_theirs) = match (&self.p, &self.g, &self.y_theirs) {
            (Some(p), Some(g), Some(y)) => (p, g, y),
            _ => return Err(Error::MissingServerKeyExchange),
        };

        let mut x_ours = BigUint::zero();
        let (y_ours, pre_master_secret) = match config.kex_config.as_str() {
            "0" => degenerate(BigUint::zero()),
            "1" => degenerate(BigUint::one()),
            "pm1" => degenerate(p - BigUint::one()),
            "g3" => degenerate(small_order_element(config, p, 3)?),
            "g5" => degenerate(small_order_element(config, p, 5)?),
            "g7" => degenerate(small_order_element(config, p, 7)?),
            "" => {
                let x = {
                    let mut rng = config.rand();
                    RngAdapter(rng.as_mut()).gen_biguint_below(p)
                };
                let y = g.modpow(&x, p);
                let pms = y_theirs.modpow(&x, p).to_bytes_be();
                x_ours = x;
                (y, pms)
            }
            other => {
                return Err(Error::InvalidConfig(format!(
                    "unrecognized tls-kex-config option {:?}",
                    other
                )))
            }
        };

        if !x_ours.is_zero() {
            debug!("DHE client exponent has {} bits", x_ours.bits());
        } else {
            debug!("DHE client sending degenerate public value");
        }

        let y_bytes = y_ours.to_bytes_be();
        let ckx = ClientKeyExchange {
            ciphertext: ClientDhParams {
                dh_yc: PayloadU16::new(y_bytes),
            }
            .get_encoding(),
        };

        self.y_client = Some(y_ours.clone());
        self.y_ours = Some(y_ours);
        self.x_ours = Some(x_ours);

        Ok((pre_master_secret, ckx))
    }
}

/// A fixed public value doubling as the pre-master secret the server will
/// derive from it.
fn degenerate(y: BigUint) -> (BigUint, Vec<u8>) {
    let pms = y.to_bytes_be();
    (y, pms)
}

/// Construct an element of order dividing `k` by raising random elements to
/// (p-1)/k until the result isn't the identity.
fn small_order_element(config: &Config, p: &BigUint, k: u32) -> Result<BigUint, Error> {
    let one = BigUint::one();
    let p_minus_1 = p - &one;
    let k = BigUint::from(k);
    if !(&p_minus_1 % &k).is_zero() {
        return Err(Error::General(format!("order not divisible by {}", k)));
    }

    let exp = &p_minus_1 / &k;
    let mut rng = config.rand();
    loop {
        let h = RngAdapter(rng.as_mut()).gen_biguint_below(p);
        let gen = h.modpow(&exp, p);
        if gen != one {
            return Ok(gen);
        }
    }
}
