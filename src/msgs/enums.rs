use crate::msgs::codec::{Codec, Reader};

enum_builder! {
    /// The `ProtocolVersion` TLS protocol enum.  Values in this enum are
    /// taken from the various RFCs covering TLS, and are listed by IANA.
    @U16
    EnumName: ProtocolVersion;
    EnumVal {
        SSLv3 => 0x0300,
        TLSv1_0 => 0x0301,
        TLSv1_1 => 0x0302,
        TLSv1_2 => 0x0303
    }
}

impl ProtocolVersion {
    /// SSL 3.0 omits the explicit length prefix on the encrypted
    /// pre-master secret; everything later carries it.
    pub fn is_ssl3(&self) -> bool {
        *self == Self::SSLv3
    }

    /// TLS 1.2 introduced the explicit signature_algorithms negotiation
    /// and per-signature hash selection.
    pub fn is_at_least_tls12(&self) -> bool {
        self.get_u16() >= Self::TLSv1_2.get_u16()
    }
}

enum_builder! {
    /// The `HashAlgorithm` TLS protocol enum.  Values in this enum are
    /// taken from RFC 5246.
    @U8
    EnumName: HashAlgorithm;
    EnumVal {
        NONE => 0x00,
        MD5 => 0x01,
        SHA1 => 0x02,
        SHA224 => 0x03,
        SHA256 => 0x04,
        SHA384 => 0x05,
        SHA512 => 0x06
    }
}

enum_builder! {
    /// The `SignatureAlgorithm` TLS protocol enum.  Values in this enum are
    /// taken from RFC 5246.
    @U8
    EnumName: SignatureAlgorithm;
    EnumVal {
        Anonymous => 0x00,
        RSA => 0x01,
        DSA => 0x02,
        ECDSA => 0x03
    }
}

enum_builder! {
    /// The `NamedGroup` TLS protocol enum (formerly `NamedCurve`).  Values
    /// in this enum are taken from RFC 4492 and RFC 8422, and are listed by
    /// IANA.  The deprecated 160-bit and binary-field groups are kept on
    /// purpose: scanning old servers is the whole point.
    @U16
    EnumName: NamedGroup;
    EnumVal {
        sect163k1 => 0x0001,
        sect163r1 => 0x0002,
        sect163r2 => 0x0003,
        secp160k1 => 0x000f,
        secp160r1 => 0x0010,
        secp160r2 => 0x0011,
        secp192k1 => 0x0012,
        secp192r1 => 0x0013,
        secp224k1 => 0x0014,
        secp224r1 => 0x0015,
        secp256k1 => 0x0016,
        secp256r1 => 0x0017,
        secp384r1 => 0x0018,
        secp521r1 => 0x0019,
        brainpoolP256r1 => 0x001a,
        brainpoolP384r1 => 0x001b,
        brainpoolP512r1 => 0x001c,
        X25519 => 0x001d,
        X448 => 0x001e
    }
}

enum_builder! {
    /// The `ECCurveType` TLS protocol enum.  Values in this enum are taken
    /// from RFC 4492.
    @U8
    EnumName: ECCurveType;
    EnumVal {
        ExplicitPrime => 0x01,
        ExplicitChar2 => 0x02,
        NamedCurve => 0x03
    }
}

/// The two-octet TLS 1.2 `SignatureAndHashAlgorithm` encoding (RFC 5246
/// section 7.4.1.4.1): hash octet first, signature octet second.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SignatureAndHash {
    pub hash: HashAlgorithm,
    pub sign: SignatureAlgorithm,
}

impl Codec for SignatureAndHash {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.hash.encode(bytes);
        self.sign.encode(bytes);
    }

    fn read(r: &mut Reader) -> Option<Self> {
        let hash = HashAlgorithm::read(r)?;
        let sign = SignatureAlgorithm::read(r)?;
        Some(Self { hash, sign })
    }
}

/// Whether `sig_hash` is present in `supported`.
pub fn is_supported_signature_and_hash(
    sig_hash: SignatureAndHash,
    supported: &[SignatureAndHash],
) -> bool {
    supported.contains(&sig_hash)
}
