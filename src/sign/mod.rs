//! Authentication of ServerKeyExchange parameters.
//!
//! The signed message is always `client_random ‖ server_random ‖ params`
//! (no length prefixes), hashed per version and signature type, then signed
//! with the certificate key.  Anonymous suites skip all of it.

pub mod dsa;
pub mod ecdsa;
pub mod hash;

use crate::config::Config;
use crate::error::Error;
use crate::key::{Certificate, PeerCertificate, PeerPublicKey, SigningKey};
use crate::msgs::codec::{decode_u16, Codec};
use crate::msgs::enums::{
    is_supported_signature_and_hash, HashAlgorithm, ProtocolVersion, SignatureAlgorithm,
    SignatureAndHash,
};
use crate::msgs::handshake::{ClientHello, ServerHello, ServerKeyExchange};
use hash::{hash_for_server_key_exchange, KxHash};
use md5::Md5;
use num_traits::Zero;
use rsa::Pkcs1v15Sign;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};

/// Pick the TLS 1.2 hash for signing a ServerKeyExchange: the first entry
/// in the client's advertised list whose signature matches `sig_type` and
/// which the server also supports.  A client that sent no list is assumed
/// to support SHA-1 (RFC 5246 section 7.4.1.4.1).
pub fn pick_tls12_hash_for_signature(
    sig_type: SignatureAlgorithm,
    client_list: &[SignatureAndHash],
    server_list: &[SignatureAndHash],
) -> Result<HashAlgorithm, Error> {
    if client_list.is_empty() {
        return Ok(HashAlgorithm::SHA1);
    }

    for sig_and_hash in client_list {
        if sig_and_hash.sign != sig_type {
            continue;
        }
        if is_supported_signature_and_hash(*sig_and_hash, server_list) {
            return Ok(sig_and_hash.hash);
        }
    }

    Err(Error::PeerIncompatible(
        "client doesn't support any common hash functions".to_string(),
    ))
}

fn pkcs1v15_sign_scheme(hash: KxHash) -> Pkcs1v15Sign {
    match hash {
        KxHash::Md5 => Pkcs1v15Sign::new::<Md5>(),
        KxHash::Sha1 => Pkcs1v15Sign::new::<Sha1>(),
        KxHash::Sha224 => Pkcs1v15Sign::new::<Sha224>(),
        KxHash::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        KxHash::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        KxHash::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
        // TLS 1.0/1.1 RSA signatures go over the raw 36-byte MD5‖SHA1
        // value with no DigestInfo.
        KxHash::Md5Sha1 => Pkcs1v15Sign::new_unprefixed(),
    }
}

/// How the ServerKeyExchange parameters are authenticated: not at all
/// (anonymous suites) or by a signature from the certificate key.
#[derive(Debug)]
pub(crate) enum ParameterAuth {
    Unsigned,
    Signed(SignedKeyAgreement),
}

/// The signing state for one handshake.  `raw` and `valid` are retained so
/// the driver can log what was on the wire and whether it checked out.
#[derive(Debug)]
pub(crate) struct SignedKeyAgreement {
    pub(crate) version: ProtocolVersion,
    pub(crate) sig_type: SignatureAlgorithm,
    pub(crate) sig_and_hash: SignatureAndHash,
    pub(crate) raw: Vec<u8>,
    pub(crate) valid: bool,
}

impl ParameterAuth {
    pub(crate) fn unsigned() -> Self {
        Self::Unsigned
    }

    pub(crate) fn signed(version: ProtocolVersion, sig_type: SignatureAlgorithm) -> Self {
        Self::Signed(SignedKeyAgreement {
            version,
            sig_type,
            sig_and_hash: SignatureAndHash {
                hash: HashAlgorithm::NONE,
                sign: SignatureAlgorithm::Anonymous,
            },
            raw: Vec::new(),
            valid: false,
        })
    }

    /// Wrap `params` into a ServerKeyExchange, signing when required.
    pub(crate) fn sign_parameters(
        &mut self,
        config: &Config,
        cert: &Certificate,
        client_hello: &ClientHello,
        hello: &ServerHello,
        params: Vec<u8>,
    ) -> Result<ServerKeyExchange, Error> {
        match self {
            Self::Unsigned => Ok(ServerKeyExchange {
                key: params,
                digest: Vec::new(),
            }),
            Self::Signed(ka) => ka.sign_parameters(config, cert, client_hello, hello, params),
        }
    }

    /// Check the signature suffix of a received ServerKeyExchange against
    /// `params`.  Returns the digest that was signed, for logging.
    pub(crate) fn verify_parameters(
        &mut self,
        config: &Config,
        client_hello: &ClientHello,
        server_hello: &ServerHello,
        cert: &PeerCertificate,
        params: &[u8],
        sig: &[u8],
    ) -> Result<Vec<u8>, Error> {
        match self {
            Self::Unsigned => Ok(Vec::new()),
            Self::Signed(ka) => {
                ka.verify_parameters(config, client_hello, server_hello, cert, params, sig)
            }
        }
    }
}

impl SignedKeyAgreement {
    fn sign_parameters(
        &mut self,
        config: &Config,
        cert: &Certificate,
        client_hello: &ClientHello,
        hello: &ServerHello,
        params: Vec<u8>,
    ) -> Result<ServerKeyExchange, Error> {
        let mut hash_id = HashAlgorithm::NONE;
        if self.version.is_at_least_tls12() {
            hash_id = pick_tls12_hash_for_signature(
                self.sig_type,
                &client_hello.signature_and_hashes,
                config.signature_and_hashes_for_server(),
            )?;
            self.sig_and_hash.hash = hash_id;
        }
        self.sig_and_hash.sign = self.sig_type;

        let (digest, hash_used) = hash_for_server_key_exchange(
            self.sig_type,
            hash_id,
            self.version,
            &[&client_hello.random.0, &hello.random.0, &params],
        )?;

        let sig = match self.sig_type {
            SignatureAlgorithm::ECDSA => {
                let keypair = match &cert.private_key {
                    SigningKey::Ecdsa(keypair) => keypair,
                    _ => {
                        return Err(Error::General(
                            "ECDHE ECDSA requires an ECDSA server private key".to_string(),
                        ))
                    }
                };
                let mut rng = config.rand();
                let (r, s) = keypair.sign(rng.as_mut(), &digest)?;
                ecdsa::encode_signature(&r, &s)?
            }
            SignatureAlgorithm::RSA => {
                let key = match &cert.private_key {
                    SigningKey::Rsa(key) => key,
                    _ => {
                        return Err(Error::General(
                            "ECDHE RSA requires a RSA server private key".to_string(),
                        ))
                    }
                };
                key.sign(pkcs1v15_sign_scheme(hash_used), &digest)
                    .map_err(|e| Error::Crypto(format!("failed to sign parameters: {}", e)))?
            }
            _ => {
                return Err(Error::General(
                    "unknown ServerKeyExchange signature algorithm".to_string(),
                ))
            }
        };

        let mut key = params;
        if self.version.is_at_least_tls12() {
            key.push(self.sig_and_hash.hash.get_u8());
            key.push(self.sig_type.get_u8());
        }
        (sig.len() as u16).encode(&mut key);
        key.extend_from_slice(&sig);

        self.raw = sig;
        self.valid = true; // we (the server) signed

        Ok(ServerKeyExchange { key, digest })
    }

    fn verify_parameters(
        &mut self,
        config: &Config,
        client_hello: &ClientHello,
        server_hello: &ServerHello,
        cert: &PeerCertificate,
        params: &[u8],
        sig: &[u8],
    ) -> Result<Vec<u8>, Error> {
        if sig.len() < 2 {
            return Err(Error::InvalidServerKeyExchange);
        }

        let mut sig = sig;
        let mut hash_id = HashAlgorithm::NONE;
        if self.version.is_at_least_tls12() {
            hash_id = HashAlgorithm::from(sig[0]);
            self.sig_and_hash = SignatureAndHash {
                hash: hash_id,
                sign: SignatureAlgorithm::from(sig[1]),
            };
            if self.sig_and_hash.sign != self.sig_type {
                return Err(Error::InvalidServerKeyExchange);
            }
            sig = &sig[2..];
            if sig.len() < 2 {
                return Err(Error::InvalidServerKeyExchange);
            }

            let offered = SignatureAndHash {
                hash: hash_id,
                sign: self.sig_type,
            };
            if !is_supported_signature_and_hash(
                offered,
                config.signature_and_hashes_for_client(),
            ) {
                return Err(Error::PeerIncompatible(
                    "unsupported hash function for ServerKeyExchange".to_string(),
                ));
            }
        }

        let sig_len = decode_u16(sig).ok_or(Error::InvalidServerKeyExchange)? as usize;
        if sig_len + 2 != sig.len() {
            return Err(Error::InvalidServerKeyExchange);
        }
        let sig = &sig[2..];
        self.raw = sig.to_vec();

        let (digest, hash_used) = hash_for_server_key_exchange(
            self.sig_type,
            hash_id,
            self.version,
            &[&client_hello.random.0, &server_hello.random.0, params],
        )?;

        match self.sig_type {
            SignatureAlgorithm::ECDSA => {
                let augmented = match &cert.public_key {
                    PeerPublicKey::Ecdsa(augmented) => augmented,
                    _ => {
                        return Err(Error::General(
                            "ECDHE ECDSA requires an ECDSA server public key".to_string(),
                        ))
                    }
                };
                let (r, s) = ecdsa::parse_signature(sig)?;
                if r.is_zero() || s.is_zero() {
                    return Err(Error::InvalidSignature(
                        "ECDSA signature contained zero or negative values".to_string(),
                    ));
                }
                if !augmented.key.verify(&digest, &r, &s) {
                    return Err(Error::InvalidSignature(
                        "ECDSA verification failure".to_string(),
                    ));
                }
            }
            SignatureAlgorithm::RSA => {
                let key = match &cert.public_key {
                    PeerPublicKey::Rsa(key) => key,
                    _ => {
                        return Err(Error::General(
                            "ECDHE RSA requires a RSA server public key".to_string(),
                        ))
                    }
                };
                key.verify(pkcs1v15_sign_scheme(hash_used), &digest, sig)
                    .map_err(|_| {
                        Error::InvalidSignature("RSA verification failure".to_string())
                    })?;
            }
            SignatureAlgorithm::DSA => {
                let key = match &cert.public_key {
                    PeerPublicKey::Dss(key) => key,
                    _ => {
                        return Err(Error::General(
                            "DSS ciphers require a DSA server public key".to_string(),
                        ))
                    }
                };
                let (r, s) = ecdsa::parse_signature(sig)?;
                if r.is_zero() || s.is_zero() {
                    return Err(Error::InvalidSignature(
                        "DSA signature contained zero or negative values".to_string(),
                    ));
                }
                if !key.verify(&digest, &r, &s) {
                    return Err(Error::InvalidSignature(
                        "DSA verification failure".to_string(),
                    ));
                }
            }
            _ => {
                return Err(Error::General(
                    "unknown ServerKeyExchange signature algorithm".to_string(),
                ))
            }
        }

        self.valid = true;
        Ok(digest)
    }
}
