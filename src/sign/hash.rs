//! The hash functions a ServerKeyExchange signature can be computed over.
//!
//! TLS 1.2 picks one of the registry hashes; TLS 1.0/1.1 hard-wire SHA-1 for
//! ECDSA/DSS and the 36-byte MD5‖SHA1 concatenation for RSA.

use crate::error::Error;
use crate::msgs::enums::{HashAlgorithm, ProtocolVersion, SignatureAlgorithm};
use digest::Digest;
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};

/// Which hash actually ends up under the signature.  `Md5Sha1` exists only
/// below TLS 1.2 and signs without a DigestInfo prefix.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KxHash {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Md5Sha1,
}

fn digest_of<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut d = D::new();
    for part in parts {
        d.update(part);
    }
    d.finalize().to_vec()
}

/// TLS 1.0's hybrid hash: MD5(parts) ‖ SHA1(parts).
pub fn md5_sha1_hash(parts: &[&[u8]]) -> Vec<u8> {
    let mut out = digest_of::<Md5>(parts);
    out.extend_from_slice(&digest_of::<Sha1>(parts));
    out
}

/// Hash the given slices and say which hash function was used.  `hash_id`
/// only matters for TLS >= 1.2, where it precisely identifies the function;
/// below that the signature type decides.
pub fn hash_for_server_key_exchange(
    sig_type: SignatureAlgorithm,
    hash_id: HashAlgorithm,
    version: ProtocolVersion,
    parts: &[&[u8]],
) -> Result<(Vec<u8>, KxHash), Error> {
    if version.is_at_least_tls12() {
        let (digest, hash) = match hash_id {
            HashAlgorithm::SHA512 => (digest_of::<Sha512>(parts), KxHash::Sha512),
            HashAlgorithm::SHA384 => (digest_of::<Sha384>(parts), KxHash::Sha384),
            HashAlgorithm::SHA256 => (digest_of::<Sha256>(parts), KxHash::Sha256),
            HashAlgorithm::SHA224 => (digest_of::<Sha224>(parts), KxHash::Sha224),
            HashAlgorithm::SHA1 => (digest_of::<Sha1>(parts), KxHash::Sha1),
            HashAlgorithm::MD5 => (digest_of::<Md5>(parts), KxHash::Md5),
            _ => {
                return Err(Error::PeerMisbehaved(
                    "unknown hash function used by peer".to_string(),
                ))
            }
        };
        return Ok((digest, hash));
    }

    if sig_type == SignatureAlgorithm::ECDSA || sig_type == SignatureAlgorithm::DSA {
        return Ok((digest_of::<Sha1>(parts), KxHash::Sha1));
    }
    Ok((md5_sha1_hash(parts), KxHash::Md5Sha1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_sha1_is_36_bytes_and_a_concatenation() {
        let parts: &[&[u8]] = &[b"hello ", b"world"];
        let joint = md5_sha1_hash(parts);
        assert_eq!(joint.len(), 36);
        assert_eq!(&joint[..16], digest_of::<Md5>(parts).as_slice());
        assert_eq!(&joint[16..], digest_of::<Sha1>(parts).as_slice());
    }

    #[test]
    fn split_parts_hash_like_joined_bytes() {
        let (split, _) = hash_for_server_key_exchange(
            SignatureAlgorithm::RSA,
            HashAlgorithm::SHA256,
            ProtocolVersion::TLSv1_2,
            &[b"ab", b"cd"],
        )
        .unwrap();
        let (joined, _) = hash_for_server_key_exchange(
            SignatureAlgorithm::RSA,
            HashAlgorithm::SHA256,
            ProtocolVersion::TLSv1_2,
            &[b"abcd"],
        )
        .unwrap();
        assert_eq!(split, joined);
    }

    #[test]
    fn pre_tls12_picks_by_signature_type() {
        let parts: &[&[u8]] = &[b"params"];
        let (_, hash) = hash_for_server_key_exchange(
            SignatureAlgorithm::ECDSA,
            HashAlgorithm::NONE,
            ProtocolVersion::TLSv1_1,
            parts,
        )
        .unwrap();
        assert_eq!(hash, KxHash::Sha1);

        let (digest, hash) = hash_for_server_key_exchange(
            SignatureAlgorithm::RSA,
            HashAlgorithm::NONE,
            ProtocolVersion::TLSv1_0,
            parts,
        )
        .unwrap();
        assert_eq!(hash, KxHash::Md5Sha1);
        assert_eq!(digest.len(), 36);
    }

    #[test]
    fn tls12_rejects_unknown_hash_id() {
        assert!(hash_for_server_key_exchange(
            SignatureAlgorithm::RSA,
            HashAlgorithm::Unknown(0x77),
            ProtocolVersion::TLSv1_2,
            &[b"x"],
        )
        .is_err());
    }
}
