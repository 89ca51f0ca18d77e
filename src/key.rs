//! Key material the handshake driver hands to the key-agreement core.
//!
//! Certificate parsing and chain validation happen elsewhere; by the time
//! these types are built the keys are already decoded.

use crate::sign::dsa::DsaPublicKey;
use crate::sign::ecdsa::{EcdsaKeyPair, EcdsaPublicKey};

/// The server's signing key, from its certificate.
#[derive(Debug, Clone)]
pub enum SigningKey {
    Rsa(rsa::RsaPrivateKey),
    Ecdsa(EcdsaKeyPair),
}

/// The server-side certificate: just the private key, as far as this core
/// is concerned.
#[derive(Debug, Clone)]
pub struct Certificate {
    pub private_key: SigningKey,
}

impl Certificate {
    pub fn new(private_key: SigningKey) -> Self {
        Self { private_key }
    }
}

/// An ECDSA public key carrying both the decoded point and the raw
/// SubjectPublicKeyInfo bytes it was decoded from.  Scan output wants the
/// original bytes; signature verification wants the point.
#[derive(Debug, Clone)]
pub struct AugmentedEcdsa {
    pub raw: Vec<u8>,
    pub key: EcdsaPublicKey,
}

/// The peer's public key, from its certificate.
#[derive(Debug, Clone)]
pub enum PeerPublicKey {
    Rsa(rsa::RsaPublicKey),
    Ecdsa(AugmentedEcdsa),
    Dss(DsaPublicKey),
}

/// The client-side view of the server certificate.
#[derive(Debug, Clone)]
pub struct PeerCertificate {
    pub public_key: PeerPublicKey,
}

impl PeerCertificate {
    pub fn new(public_key: PeerPublicKey) -> Self {
        Self { public_key }
    }
}
