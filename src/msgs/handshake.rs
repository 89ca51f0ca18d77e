use crate::msgs::codec::{hex, Codec, PayloadU16, PayloadU8, Reader};
use crate::msgs::enums::{
    ECCurveType, NamedGroup, ProtocolVersion, SignatureAndHash,
};
use std::fmt;

/// A random value, as exchanged in ClientHello and ServerHello.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Random(pub [u8; 32]);

impl fmt::Debug for Random {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hex(f, &self.0)
    }
}

impl From<[u8; 32]> for Random {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// The slice of a ClientHello the key-agreement core reads.  Parsing the
/// full message is the handshake driver's job; we only consume the fields
/// that steer negotiation.
#[derive(Debug, Clone)]
pub struct ClientHello {
    pub version: ProtocolVersion,
    pub random: Random,
    /// Curves from the supported_groups extension, client preference order.
    pub supported_curves: Vec<NamedGroup>,
    /// Pairs from the signature_algorithms extension, client preference
    /// order.  Empty when the client sent no such extension.
    pub signature_and_hashes: Vec<SignatureAndHash>,
}

/// The slice of a ServerHello the key-agreement core reads.
#[derive(Debug, Clone)]
pub struct ServerHello {
    pub version: ProtocolVersion,
    pub random: Random,
}

/// A ServerKeyExchange message body.  `key` is the raw wire payload
/// (parameters followed by the signature blob); `digest` is filled in
/// during signing/verification so the driver can log what was signed.
#[derive(Debug, Clone, Default)]
pub struct ServerKeyExchange {
    pub key: Vec<u8>,
    pub digest: Vec<u8>,
}

/// A ClientKeyExchange message body.
#[derive(Debug, Clone, Default)]
pub struct ClientKeyExchange {
    pub ciphertext: Vec<u8>,
}

/// ServerECDHParams (RFC 4492 section 5.4): we only ever emit or accept the
/// named_curve form.
#[derive(Debug)]
pub struct ServerEcdhParams {
    pub curve_type: ECCurveType,
    pub named_group: NamedGroup,
    pub public: PayloadU8,
}

impl ServerEcdhParams {
    pub fn new(group: NamedGroup, pubkey: Vec<u8>) -> Self {
        Self {
            curve_type: ECCurveType::NamedCurve,
            named_group: group,
            public: PayloadU8::new(pubkey),
        }
    }
}

impl Codec for ServerEcdhParams {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.curve_type.encode(bytes);
        self.named_group.encode(bytes);
        self.public.encode(bytes);
    }

    fn read(r: &mut Reader) -> Option<Self> {
        let curve_type = ECCurveType::read(r)?;
        let named_group = NamedGroup::read(r)?;
        let public = PayloadU8::read(r)?;
        Some(Self {
            curve_type,
            named_group,
            public,
        })
    }
}

/// ClientECDHParams: a single u8-length-prefixed EC point.
#[derive(Debug)]
pub struct ClientEcdhParams {
    pub public: PayloadU8,
}

impl Codec for ClientEcdhParams {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.public.encode(bytes);
    }

    fn read(r: &mut Reader) -> Option<Self> {
        let public = PayloadU8::read(r)?;
        Some(Self { public })
    }
}

/// ServerDHParams (RFC 5246 section 7.4.3): p, g and Ys as opaque
/// u16-length-prefixed big-endian integers.
#[derive(Debug)]
pub struct ServerDhParams {
    pub dh_p: PayloadU16,
    pub dh_g: PayloadU16,
    pub dh_ys: PayloadU16,
}

impl Codec for ServerDhParams {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.dh_p.encode(bytes);
        self.dh_g.encode(bytes);
        self.dh_ys.encode(bytes);
    }

    fn read(r: &mut Reader) -> Option<Self> {
        let dh_p = PayloadU16::read(r)?;
        let dh_g = PayloadU16::read(r)?;
        let dh_ys = PayloadU16::read(r)?;
        Some(Self { dh_p, dh_g, dh_ys })
    }
}

/// ClientDiffieHellmanPublic, explicit flavour.
#[derive(Debug)]
pub struct ClientDhParams {
    pub dh_yc: PayloadU16,
}

impl Codec for ClientDhParams {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.dh_yc.encode(bytes);
    }

    fn read(r: &mut Reader) -> Option<Self> {
        let dh_yc = PayloadU16::read(r)?;
        Some(Self { dh_yc })
    }
}

/// ServerRSAParams, sent for the export-RSA cipher suites: an ephemeral
/// modulus and exponent, both u16-length-prefixed.
#[derive(Debug)]
pub struct ServerRsaParams {
    pub modulus: PayloadU16,
    pub exponent: PayloadU16,
}

impl Codec for ServerRsaParams {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.modulus.encode(bytes);
        self.exponent.encode(bytes);
    }

    fn read(r: &mut Reader) -> Option<Self> {
        let modulus = PayloadU16::read(r)?;
        let exponent = PayloadU16::read(r)?;
        Some(Self { modulus, exponent })
    }
}
