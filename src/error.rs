use std::{error::Error as StdError, fmt};

/// This library reports key-agreement protocol errors using this type.
///
/// Signature-verification failures deserve a special note: the client-side
/// `process_server_key_exchange` operations *store* the verification outcome
/// on the key-agreement state and only return it when
/// [`Config::insecure_skip_verify`](crate::config::Config) is false, so that a
/// measurement run can finish handshakes against misbehaving servers and still
/// record the failure.
#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// The peer sent a syntactically invalid ClientKeyExchange message.
    InvalidClientKeyExchange,

    /// The peer sent a syntactically invalid ServerKeyExchange message.
    InvalidServerKeyExchange,

    /// A ServerKeyExchange message was required but never processed.
    MissingServerKeyExchange,

    /// The peer doesn't support a parameter we require.
    /// The parameter gives a hint as to what it is.
    PeerIncompatible(String),

    /// The peer deviated from the standard TLS protocol.
    /// The parameter gives a hint where.
    PeerMisbehaved(String),

    /// A signature over the ServerKeyExchange parameters failed to verify.
    InvalidSignature(String),

    /// The supplied configuration is unusable, e.g. an unrecognized
    /// `tls-kex-config` option.
    InvalidConfig(String),

    /// An operation in the underlying crypto library failed.
    Crypto(String),

    /// We failed to acquire random bytes from the configured source.
    FailedToGetRandomBytes,

    /// A catch-all error for unlikely errors.
    General(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidClientKeyExchange => {
                write!(f, "tls: invalid ClientKeyExchange message")
            }
            Error::InvalidServerKeyExchange => {
                write!(f, "tls: invalid ServerKeyExchange message")
            }
            Error::MissingServerKeyExchange => {
                write!(f, "tls: missing ServerKeyExchange message")
            }
            Error::PeerIncompatible(ref why) => write!(f, "tls: {}", why),
            Error::PeerMisbehaved(ref why) => write!(f, "tls: {}", why),
            Error::InvalidSignature(ref why) => write!(f, "tls: {}", why),
            Error::InvalidConfig(ref why) => write!(f, "tls: {}", why),
            Error::Crypto(ref why) => write!(f, "crypto error: {}", why),
            Error::FailedToGetRandomBytes => write!(f, "failed to get random bytes"),
            Error::General(ref err) => write!(f, "unexpected error: {}", err),
        }
    }
}

impl StdError for Error {}

impl From<crate::rand::GetRandomFailed> for Error {
    fn from(_: crate::rand::GetRandomFailed) -> Self {
        Self::FailedToGetRandomBytes
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn smoke() {
        let all = vec![
            Error::InvalidClientKeyExchange,
            Error::InvalidServerKeyExchange,
            Error::MissingServerKeyExchange,
            Error::PeerIncompatible("no supported elliptic curves offered".to_string()),
            Error::PeerMisbehaved("server selected unsupported curve".to_string()),
            Error::InvalidSignature("ECDSA verification failure".to_string()),
            Error::InvalidConfig("unrecognized tls-kex-config option".to_string()),
            Error::Crypto("rsa".to_string()),
            Error::FailedToGetRandomBytes,
            Error::General("undocumented error".to_string()),
        ];

        for err in all {
            println!("{:?}:", err);
            println!("  fmt '{}'", err);
        }
    }

    #[test]
    fn rand_error_mapping() {
        use crate::rand;
        let err: Error = rand::GetRandomFailed.into();
        assert_eq!(err, Error::FailedToGetRandomBytes);
    }
}
