//! The configuration bag a handshake driver hands to every operation.

use crate::msgs::enums::{HashAlgorithm, NamedGroup, SignatureAlgorithm, SignatureAndHash};
use rand::rngs::OsRng;
use rand_core::CryptoRngCore;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

/// Groups offered/accepted when the user configures none.  Scans that want
/// the long tail set `curve_preferences` explicitly.
static DEFAULT_CURVE_PREFERENCES: &[NamedGroup] = &[
    NamedGroup::secp256r1,
    NamedGroup::secp384r1,
    NamedGroup::secp521r1,
    NamedGroup::X25519,
];

macro_rules! sig_hash {
    ($sign:ident, $hash:ident) => {
        SignatureAndHash {
            hash: HashAlgorithm::$hash,
            sign: SignatureAlgorithm::$sign,
        }
    };
}

static DEFAULT_SIGNATURE_AND_HASHES: &[SignatureAndHash] = &[
    sig_hash!(RSA, SHA256),
    sig_hash!(ECDSA, SHA256),
    sig_hash!(RSA, SHA384),
    sig_hash!(ECDSA, SHA384),
    sig_hash!(RSA, SHA1),
    sig_hash!(ECDSA, SHA1),
    sig_hash!(DSA, SHA1),
];

/// Shared configuration for the key-agreement operations.
///
/// The RNG lives here so a whole scan run can be replayed from a seed.
/// `Config` is meant to be built once and shared read-only across
/// handshakes; the RNG is behind a lock for exactly that reason.
pub struct Config {
    rng: Mutex<Box<dyn CryptoRngCore + Send>>,

    /// Server-side curve preference order; client-side offered curves.
    /// Empty means the built-in default list.
    pub curve_preferences: Vec<NamedGroup>,

    /// Acceptable signature/hash pairs, both for choosing a server signing
    /// hash and for vetting what a server picked.  Empty means the built-in
    /// default list.
    pub signature_and_hashes: Vec<SignatureAndHash>,

    /// Research knob controlling deliberate client misbehavior; see the
    /// `kx` module docs for the recognized values.  Unknown tokens are
    /// fatal at ClientKeyExchange generation time.
    pub kex_config: String,

    /// When set, export-RSA handshakes reuse this key instead of minting a
    /// fresh 512-bit key per handshake.  Reuse is intentional: it keeps
    /// large measurement runs cheap.
    pub export_rsa_key: Option<rsa::RsaPrivateKey>,

    /// Record ServerKeyExchange signature failures instead of failing the
    /// handshake.  The failure stays available via
    /// [`KeyAgreement::verify_error`](crate::kx::KeyAgreement::verify_error).
    pub insecure_skip_verify: bool,
}

impl Config {
    /// A config with the operating system RNG and all defaults.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(Box::new(OsRng)),
            curve_preferences: Vec::new(),
            signature_and_hashes: Vec::new(),
            kex_config: String::new(),
            export_rsa_key: None,
            insecure_skip_verify: false,
        }
    }

    /// Replace the RNG, e.g. with a seeded generator for reproducible runs.
    pub fn set_rng(&mut self, rng: impl CryptoRngCore + Send + 'static) {
        self.rng = Mutex::new(Box::new(rng));
    }

    pub(crate) fn rand(&self) -> MutexGuard<'_, Box<dyn CryptoRngCore + Send>> {
        self.rng.lock().expect("rng lock poisoned")
    }

    /// The configured curve preferences, or the default list.
    pub fn curve_preferences(&self) -> &[NamedGroup] {
        if self.curve_preferences.is_empty() {
            DEFAULT_CURVE_PREFERENCES
        } else {
            &self.curve_preferences
        }
    }

    /// Signature/hash pairs the server is willing to sign with.
    pub fn signature_and_hashes_for_server(&self) -> &[SignatureAndHash] {
        if self.signature_and_hashes.is_empty() {
            DEFAULT_SIGNATURE_AND_HASHES
        } else {
            &self.signature_and_hashes
        }
    }

    /// Signature/hash pairs the client will accept from a server.
    pub fn signature_and_hashes_for_client(&self) -> &[SignatureAndHash] {
        if self.signature_and_hashes.is_empty() {
            DEFAULT_SIGNATURE_AND_HASHES
        } else {
            &self.signature_and_hashes
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("curve_preferences", &self.curve_preferences)
            .field("signature_and_hashes", &self.signature_and_hashes)
            .field("kex_config", &self.kex_config)
            .field("export_rsa_key", &self.export_rsa_key.is_some())
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_serves_defaults() {
        let config = Config::new();
        assert_eq!(config.curve_preferences(), DEFAULT_CURVE_PREFERENCES);
        assert_eq!(
            config.signature_and_hashes_for_server(),
            DEFAULT_SIGNATURE_AND_HASHES
        );
    }

    #[test]
    fn explicit_lists_win() {
        let config = Config {
            curve_preferences: vec![NamedGroup::sect163k1],
            ..Config::new()
        };
        assert_eq!(config.curve_preferences(), &[NamedGroup::sect163k1]);
    }
}
