//! The three key-agreement state machines and their shared four-operation
//! surface.
//!
//! A [`KeyAgreement`] is built when the handshake driver settles on a
//! cipher suite, driven through the role-appropriate operations, and
//! dropped once the pre-master secret has been fed to the PRF:
//!
//! - server: `generate_server_key_exchange` → `process_client_key_exchange`
//! - client: `process_server_key_exchange` → `generate_client_key_exchange`
//!
//! The variants share this shape and nothing else; RSA transport, finite
//! field DH and ECDH have too little in common for a deeper abstraction.
//! State objects are single-handshake, single-thread affairs.

pub mod dhe;
pub mod ecdhe;
mod payloads;
pub mod rsa;

use crate::config::Config;
use crate::error::Error;
use crate::key::{Certificate, PeerCertificate};
use crate::msgs::enums::{ProtocolVersion, SignatureAlgorithm, SignatureAndHash};
use crate::msgs::handshake::{
    ClientHello, ClientKeyExchange, ServerHello, ServerKeyExchange,
};
use crate::sign::ParameterAuth;

use self::dhe::DheKeyAgreement;
use self::ecdhe::EcdheKeyAgreement;
use self::rsa::RsaKeyAgreement;

/// One handshake's worth of key agreement.
pub enum KeyAgreement {
    /// RSA key transport, plain or export-grade ephemeral.
    Rsa(RsaKeyAgreement),
    /// Ephemeral finite-field Diffie-Hellman.
    Dhe(DheKeyAgreement),
    /// Ephemeral elliptic-curve Diffie-Hellman.
    Ecdhe(EcdheKeyAgreement),
}

impl KeyAgreement {
    /// Plain RSA key transport (no ServerKeyExchange).
    pub fn rsa(version: ProtocolVersion) -> Self {
        Self::Rsa(RsaKeyAgreement::new(ParameterAuth::unsigned(), version, false))
    }

    /// Export-RSA: an ephemeral 512-bit key signed by the certificate key.
    pub fn rsa_export(version: ProtocolVersion) -> Self {
        Self::Rsa(RsaKeyAgreement::new(
            ParameterAuth::signed(version, SignatureAlgorithm::RSA),
            version,
            true,
        ))
    }

    /// Ephemeral finite-field DH with parameters signed by `sig_type`
    /// (RSA for DHE_RSA, DSA for DHE_DSS).
    pub fn dhe(version: ProtocolVersion, sig_type: SignatureAlgorithm) -> Self {
        Self::Dhe(DheKeyAgreement::new(ParameterAuth::signed(version, sig_type)))
    }

    /// Anonymous finite-field DH.
    pub fn dhe_anon(_version: ProtocolVersion) -> Self {
        Self::Dhe(DheKeyAgreement::new(ParameterAuth::unsigned()))
    }

    /// Ephemeral ECDH with parameters signed by `sig_type`
    /// (RSA for ECDHE_RSA, ECDSA for ECDHE_ECDSA).
    pub fn ecdhe(version: ProtocolVersion, sig_type: SignatureAlgorithm) -> Self {
        Self::Ecdhe(EcdheKeyAgreement::new(ParameterAuth::signed(version, sig_type)))
    }

    /// Anonymous ECDH.
    pub fn ecdhe_anon(_version: ProtocolVersion) -> Self {
        Self::Ecdhe(EcdheKeyAgreement::new(ParameterAuth::unsigned()))
    }

    /// Server side, step one: produce the ServerKeyExchange, or None when
    /// the variant doesn't send one (plain RSA).
    pub fn generate_server_key_exchange(
        &mut self,
        config: &Config,
        cert: &Certificate,
        client_hello: &ClientHello,
        hello: &ServerHello,
    ) -> Result<Option<ServerKeyExchange>, Error> {
        match self {
            Self::Rsa(ka) => ka.generate_server_key_exchange(config, cert, client_hello, hello),
            Self::Dhe(ka) => ka.generate_server_key_exchange(config, cert, client_hello, hello),
            Self::Ecdhe(ka) => ka.generate_server_key_exchange(config, cert, client_hello, hello),
        }
    }

    /// Server side, step two: consume the ClientKeyExchange and derive the
    /// pre-master secret.
    pub fn process_client_key_exchange(
        &mut self,
        config: &Config,
        cert: &Certificate,
        ckx: &ClientKeyExchange,
    ) -> Result<Vec<u8>, Error> {
        match self {
            Self::Rsa(ka) => ka.process_client_key_exchange(config, cert, ckx),
            Self::Dhe(ka) => ka.process_client_key_exchange(config, cert, ckx),
            Self::Ecdhe(ka) => ka.process_client_key_exchange(config, cert, ckx),
        }
    }

    /// Client side, step one: consume the ServerKeyExchange.
    ///
    /// Signature-verification failures are stored on the state rather than
    /// returned when `config.insecure_skip_verify` is set; `skx.digest` is
    /// populated for logging either way.
    pub fn process_server_key_exchange(
        &mut self,
        config: &Config,
        client_hello: &ClientHello,
        server_hello: &ServerHello,
        cert: &PeerCertificate,
        skx: &mut ServerKeyExchange,
    ) -> Result<(), Error> {
        match self {
            Self::Rsa(ka) => {
                ka.process_server_key_exchange(config, client_hello, server_hello, cert, skx)
            }
            Self::Dhe(ka) => {
                ka.process_server_key_exchange(config, client_hello, server_hello, cert, skx)
            }
            Self::Ecdhe(ka) => {
                ka.process_server_key_exchange(config, client_hello, server_hello, cert, skx)
            }
        }
    }

    /// Client side, step two: produce the ClientKeyExchange and the
    /// pre-master secret.
    pub fn generate_client_key_exchange(
        &mut self,
        config: &Config,
        client_hello: &ClientHello,
        cert: &PeerCertificate,
    ) -> Result<(Vec<u8>, ClientKeyExchange), Error> {
        match self {
            Self::Rsa(ka) => ka.generate_client_key_exchange(config, client_hello, cert),
            Self::Dhe(ka) => ka.generate_client_key_exchange(config, client_hello, cert),
            Self::Ecdhe(ka) => ka.generate_client_key_exchange(config, client_hello, cert),
        }
    }

    /// The stored outcome of ServerKeyExchange verification, if it failed.
    /// Meaningful after `process_server_key_exchange` under
    /// `insecure_skip_verify`.
    pub fn verify_error(&self) -> Option<&Error> {
        match self {
            Self::Rsa(ka) => ka.verify_error.as_ref(),
            Self::Dhe(ka) => ka.verify_error.as_ref(),
            Self::Ecdhe(ka) => ka.verify_error.as_ref(),
        }
    }

    /// The raw ServerKeyExchange signature with its status: the bytes seen
    /// or produced, whether they verified (or were produced by us), and
    /// the signature/hash pair in effect.  None for anonymous suites and
    /// before any signed message has been handled.
    pub fn signature_details(&self) -> Option<(&[u8], bool, SignatureAndHash)> {
        let auth = match self {
            Self::Rsa(ka) => &ka.auth,
            Self::Dhe(ka) => &ka.auth,
            Self::Ecdhe(ka) => &ka.auth,
        };
        match auth {
            ParameterAuth::Unsigned => None,
            ParameterAuth::Signed(signed) => {
                Some((&signed.raw, signed.valid, signed.sig_and_hash))
            }
        }
    }
}
