//! Static small-subgroup and twist payloads for instrumented ECDHE
//! misbehavior.
//!
//! Each entry is pure data: the `tls-kex-config` token that selects it, the
//! group to force, and the affine coordinates to put on the wire.  The
//! ECDHE state machine never branches on which payload is active, so new
//! probes are a table row, not code.

use crate::ec::EcPublicKey;
use crate::msgs::enums::NamedGroup;
use num_bigint::BigUint;

pub(crate) struct SubgroupPayload {
    pub(crate) option: &'static str,
    pub(crate) group: NamedGroup,
    x: &'static str,
    y: Option<&'static str>,
    #[allow(dead_code)]
    pub(crate) description: &'static str,
}

impl SubgroupPayload {
    pub(crate) fn public_key(&self) -> EcPublicKey {
        EcPublicKey::new(dec(self.x), self.y.map(dec))
    }
}

fn dec(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 10).expect("payload constant is valid decimal")
}

pub(crate) static SUBGROUP_PAYLOADS: &[SubgroupPayload] = &[
    SubgroupPayload {
        option: "X25519_INVALID_S2",
        group: NamedGroup::X25519,
        x: "0",
        y: None,
        description: "curve25519 point of order 2",
    },
    SubgroupPayload {
        option: "X25519_INVALID_S4",
        group: NamedGroup::X25519,
        x: "1",
        y: None,
        description: "curve25519 point of order 4",
    },
    SubgroupPayload {
        option: "X25519_INVALID_S8",
        group: NamedGroup::X25519,
        x: "39382357235489614581723060781553021112529911719440698176882885853963445705823",
        y: None,
        description: "curve25519 point of order 8",
    },
    SubgroupPayload {
        option: "X25519_TWIST_S4",
        group: NamedGroup::X25519,
        x: "40037414119260815170158213804056845813451397265373646178320500467079007173856",
        y: None,
        description: "curve25519 twist point of order 4",
    },
    SubgroupPayload {
        option: "256_ECP_INVALID_S5",
        group: NamedGroup::secp256r1,
        x: "86765160823711241075790919525606906052464424178558764461827806608937748883041",
        y: Some(
            "62096069626295534024197897036720226401219594482857127378802405572766226928611",
        ),
        description: "NIST P-256 generator of subgroup of order 5 on the curve with B-1",
    },
    SubgroupPayload {
        option: "256_ECP_TWIST_S5",
        group: NamedGroup::secp256r1,
        x: "65000580346672419638629453770715906531917592959616632823634978442784087859381",
        y: Some(
            "101434952638835666830672287755036482040135206184891409299575619037815517987306",
        ),
        description: "NIST P-256 generator of subgroup of order 5 on the twist",
    },
    SubgroupPayload {
        option: "256_ECP_TWIST_S5_SHARED",
        group: NamedGroup::secp256r1,
        x: "75610932410248387784210576211184530780201393864652054865721797292564276389325",
        y: Some(
            "17016988387429062713000967549338170748423683329322284176365945285736516510233",
        ),
        description: "x-coordinate valid on both NIST P-256 and its twist",
    },
    SubgroupPayload {
        option: "224_ECP_INVALID_S13",
        group: NamedGroup::secp224r1,
        x: "1234919426772886915432358412587735557527373236174597031415308881584",
        y: Some("218592750580712164156183367176268299828628545379017213517316023994"),
        description: "NIST P-224 generator of subgroup of order 13 on the curve with B-1",
    },
    SubgroupPayload {
        option: "224_ECP_TWIST_S11",
        group: NamedGroup::secp224r1,
        x: "21219928721835262216070635629075256199931199995500865785214182108232",
        y: Some("2486431965114139990348241493232938533843075669604960787364227498903"),
        description: "NIST P-224 generator of subgroup of order 11 on the twist",
    },
];

pub(crate) fn payload_for_option(option: &str) -> Option<&'static SubgroupPayload> {
    SUBGROUP_PAYLOADS.iter().find(|p| p.option == option)
}
