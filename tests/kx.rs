//! End-to-end exercises of the three key agreements, both roles driven in
//! one process with seeded RNGs.

use num_bigint::BigUint;
use num_traits::One;
use rand::{rngs::StdRng, SeedableRng};
use tls_kx_core::config::Config;
use tls_kx_core::ec::weierstrass::SECP256R1;
use tls_kx_core::key::{
    AugmentedEcdsa, Certificate, PeerCertificate, PeerPublicKey, SigningKey,
};
use tls_kx_core::kx::KeyAgreement;
use tls_kx_core::msgs::enums::{
    HashAlgorithm, NamedGroup, ProtocolVersion, SignatureAlgorithm, SignatureAndHash,
};
use tls_kx_core::msgs::handshake::{ClientHello, Random, ServerHello};
use tls_kx_core::sign::ecdsa::EcdsaKeyPair;
use tls_kx_core::sign::pick_tls12_hash_for_signature;
use tls_kx_core::Error;

const RFC5114_P: &str = "87A8E61DB4B6663CFFBBD19C651959998CEEF608660DD0F25D2CEED4435E3B00\
                         E00DF8F1D61957D4FAF7DF4561B2AA3016C3D91134096FAA3BF4296D830E9A7C\
                         209E0C6497517ABD5A8A9D306BCF67ED91F9E6725B4758C022E0B1EF4275BF7B\
                         6C5BFC11D45F9088B941F54EB1E59BB8BC39A0BF12307F5C4FDB70C581B23F76\
                         B63ACAE1CAA6B7902D52526735488A0EF13C6D9A51BFA4AB3AD8347796524D8E\
                         F6A167B5A41825D967E144E5140564251CCACB83E6B486F6B3CA3F7971506026\
                         C0B857F689962856DED4010ABD0BE621C3A3960A54E710C375F26375D7014103\
                         A4B54330C198AF126116D2276E11715F693877FAD7EF09CADB094AE91E1A1597";

fn test_config(seed: u64) -> Config {
    let mut config = Config::new();
    config.set_rng(StdRng::seed_from_u64(seed));
    config
}

fn hellos(
    version: ProtocolVersion,
    curves: &[NamedGroup],
    sig_hashes: &[SignatureAndHash],
) -> (ClientHello, ServerHello) {
    (
        ClientHello {
            version,
            random: Random([0x11; 32]),
            supported_curves: curves.to_vec(),
            signature_and_hashes: sig_hashes.to_vec(),
        },
        ServerHello {
            version,
            random: Random([0x22; 32]),
        },
    )
}

fn sh(sign: SignatureAlgorithm, hash: HashAlgorithm) -> SignatureAndHash {
    SignatureAndHash { hash, sign }
}

// RSA keygen dominates the suite's runtime, so every test shares one
// signing identity.
fn rsa_identity() -> (Certificate, PeerCertificate) {
    static IDENTITY: once_cell::sync::Lazy<(Certificate, PeerCertificate)> =
        once_cell::sync::Lazy::new(|| {
            let mut rng = StdRng::seed_from_u64(0xce27);
            let private = rsa::RsaPrivateKey::new(&mut rng, 1024).expect("RSA keygen");
            let public = private.to_public_key();
            (
                Certificate::new(SigningKey::Rsa(private)),
                PeerCertificate::new(PeerPublicKey::Rsa(public)),
            )
        });
    IDENTITY.clone()
}

fn ecdsa_identity(seed: u64) -> (Certificate, PeerCertificate) {
    let mut rng = StdRng::seed_from_u64(seed);
    let keypair = EcdsaKeyPair::generate(&SECP256R1, &mut rng).expect("ECDSA keygen");
    let public = keypair.public_key().clone();
    (
        Certificate::new(SigningKey::Ecdsa(keypair)),
        PeerCertificate::new(PeerPublicKey::Ecdsa(AugmentedEcdsa {
            raw: Vec::new(),
            key: public,
        })),
    )
}

#[test]
fn ecdhe_rsa_sha256_on_p256() {
    let mut server_config = test_config(1);
    server_config.curve_preferences = vec![NamedGroup::secp256r1];
    let client_config = test_config(2);

    let (cert, peer_cert) = rsa_identity();
    let (client_hello, server_hello) = hellos(
        ProtocolVersion::TLSv1_2,
        &[NamedGroup::secp256r1, NamedGroup::X25519],
        &[sh(SignatureAlgorithm::RSA, HashAlgorithm::SHA256)],
    );

    let mut server_ka = KeyAgreement::ecdhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);
    let mut client_ka = KeyAgreement::ecdhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);

    let mut skx = server_ka
        .generate_server_key_exchange(&server_config, &cert, &client_hello, &server_hello)
        .unwrap()
        .expect("ECDHE always sends a ServerKeyExchange");

    // ServerECDHParams: named_curve, P-256, a 65-byte uncompressed point.
    assert_eq!(skx.key[0], 3);
    assert_eq!(&skx.key[1..3], &[0x00, 0x17]);
    assert_eq!(skx.key[3], 65);
    assert_eq!(skx.key[4], 0x04);
    // Signed blob: SHA-256 + RSA, then a 128-byte signature.
    assert_eq!(skx.key[69], HashAlgorithm::SHA256.get_u8());
    assert_eq!(skx.key[70], SignatureAlgorithm::RSA.get_u8());
    assert_eq!(&skx.key[71..73], &[0x00, 0x80]);
    assert_eq!(skx.key.len(), 69 + 2 + 2 + 128);

    client_ka
        .process_server_key_exchange(
            &client_config,
            &client_hello,
            &server_hello,
            &peer_cert,
            &mut skx,
        )
        .unwrap();
    assert!(client_ka.verify_error().is_none());
    assert_eq!(skx.digest.len(), 32);

    let (raw, valid, pair) = client_ka.signature_details().unwrap();
    assert_eq!(raw.len(), 128);
    assert!(valid);
    assert_eq!(pair.hash, HashAlgorithm::SHA256);
    assert_eq!(pair.sign, SignatureAlgorithm::RSA);

    let (client_pms, ckx) = client_ka
        .generate_client_key_exchange(&client_config, &client_hello, &peer_cert)
        .unwrap();
    assert_eq!(ckx.ciphertext.len(), 1 + 65);

    let server_pms = server_ka
        .process_client_key_exchange(&server_config, &cert, &ckx)
        .unwrap();
    assert_eq!(client_pms, server_pms);
}

#[test]
fn ecdhe_ecdsa_handshake() {
    let mut server_config = test_config(4);
    server_config.curve_preferences = vec![NamedGroup::secp256r1];
    let client_config = test_config(5);

    let (cert, peer_cert) = ecdsa_identity(6);
    let (client_hello, server_hello) = hellos(
        ProtocolVersion::TLSv1_2,
        &[NamedGroup::secp256r1],
        &[sh(SignatureAlgorithm::ECDSA, HashAlgorithm::SHA256)],
    );

    let mut server_ka = KeyAgreement::ecdhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::ECDSA);
    let mut client_ka = KeyAgreement::ecdhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::ECDSA);

    let mut skx = server_ka
        .generate_server_key_exchange(&server_config, &cert, &client_hello, &server_hello)
        .unwrap()
        .unwrap();
    client_ka
        .process_server_key_exchange(
            &client_config,
            &client_hello,
            &server_hello,
            &peer_cert,
            &mut skx,
        )
        .unwrap();

    let (client_pms, ckx) = client_ka
        .generate_client_key_exchange(&client_config, &client_hello, &peer_cert)
        .unwrap();
    let server_pms = server_ka
        .process_client_key_exchange(&server_config, &cert, &ckx)
        .unwrap();
    assert_eq!(client_pms, server_pms);
}

#[test]
fn dhe_uses_rfc5114_group_and_g3_sends_order_3_element() {
    let server_config = test_config(7);
    let mut client_config = test_config(8);
    client_config.kex_config = "g3".to_string();

    let (cert, peer_cert) = rsa_identity();
    let (client_hello, server_hello) = hellos(
        ProtocolVersion::TLSv1_2,
        &[],
        &[sh(SignatureAlgorithm::RSA, HashAlgorithm::SHA256)],
    );

    let mut server_ka = KeyAgreement::dhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);
    let mut client_ka = KeyAgreement::dhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);

    let mut skx = server_ka
        .generate_server_key_exchange(&server_config, &cert, &client_hello, &server_hello)
        .unwrap()
        .unwrap();

    // The wire starts with the literal RFC 5114 prime.
    let p = BigUint::parse_bytes(RFC5114_P.as_bytes(), 16).unwrap();
    assert_eq!(&skx.key[..2], &[0x01, 0x00]);
    assert_eq!(&skx.key[2..258], p.to_bytes_be().as_slice());

    client_ka
        .process_server_key_exchange(
            &client_config,
            &client_hello,
            &server_hello,
            &peer_cert,
            &mut skx,
        )
        .unwrap();

    let (client_pms, ckx) = client_ka
        .generate_client_key_exchange(&client_config, &client_hello, &peer_cert)
        .unwrap();

    // The client public value must have order 3: y != 1, y^3 == 1 (mod p).
    let y = BigUint::from_bytes_be(&ckx.ciphertext[2..]);
    assert_ne!(y, BigUint::one());
    assert!(y.modpow(&BigUint::from(3u32), &p).is_one());
    assert_eq!(client_pms, y.to_bytes_be());

    // The server happily computes its side of the rigged agreement.
    let server_pms = server_ka
        .process_client_key_exchange(&server_config, &cert, &ckx)
        .unwrap();
    assert!(!server_pms.is_empty());
}

#[test]
fn dhe_default_exponent_agrees_on_both_sides() {
    let server_config = test_config(10);
    let client_config = test_config(11);
    let (cert, peer_cert) = rsa_identity();
    let (client_hello, server_hello) = hellos(
        ProtocolVersion::TLSv1_2,
        &[],
        &[sh(SignatureAlgorithm::RSA, HashAlgorithm::SHA256)],
    );

    let mut server_ka = KeyAgreement::dhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);
    let mut client_ka = KeyAgreement::dhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);

    let mut skx = server_ka
        .generate_server_key_exchange(&server_config, &cert, &client_hello, &server_hello)
        .unwrap()
        .unwrap();
    client_ka
        .process_server_key_exchange(
            &client_config,
            &client_hello,
            &server_hello,
            &peer_cert,
            &mut skx,
        )
        .unwrap();
    let (client_pms, ckx) = client_ka
        .generate_client_key_exchange(&client_config, &client_hello, &peer_cert)
        .unwrap();
    let server_pms = server_ka
        .process_client_key_exchange(&server_config, &cert, &ckx)
        .unwrap();
    assert_eq!(client_pms, server_pms);
}

#[test]
fn export_rsa_roundtrip_with_version_bytes() {
    let server_config = test_config(13);
    let client_config = test_config(14);
    let (cert, peer_cert) = rsa_identity();
    let (client_hello, server_hello) = hellos(ProtocolVersion::TLSv1_0, &[], &[]);

    let mut server_ka = KeyAgreement::rsa_export(ProtocolVersion::TLSv1_0);
    let mut client_ka = KeyAgreement::rsa_export(ProtocolVersion::TLSv1_0);

    let mut skx = server_ka
        .generate_server_key_exchange(&server_config, &cert, &client_hello, &server_hello)
        .unwrap()
        .expect("export RSA sends a ServerKeyExchange");

    // 512-bit modulus on the wire.
    assert_eq!(&skx.key[..2], &[0x00, 0x40]);

    client_ka
        .process_server_key_exchange(
            &client_config,
            &client_hello,
            &server_hello,
            &peer_cert,
            &mut skx,
        )
        .unwrap();
    // TLS 1.0 signature: MD5‖SHA1, 36 bytes, logged via skx.digest.
    assert_eq!(skx.digest.len(), 36);

    let (client_pms, ckx) = client_ka
        .generate_client_key_exchange(&client_config, &client_hello, &peer_cert)
        .unwrap();
    assert_eq!(client_pms.len(), 48);
    assert_eq!(&client_pms[..2], &[0x03, 0x01]);
    // u16 length prefix plus the 64-byte ciphertext under the ephemeral key.
    assert_eq!(ckx.ciphertext.len(), 2 + 64);

    let server_pms = server_ka
        .process_client_key_exchange(&server_config, &cert, &ckx)
        .unwrap();
    assert_eq!(client_pms, server_pms);
}

#[test]
fn plain_rsa_decryption_failure_yields_random_secret() {
    let server_config = test_config(16);
    let (cert, _) = rsa_identity();

    let mut server_ka = KeyAgreement::rsa(ProtocolVersion::TLSv1_2);
    // 128 bytes of garbage with a correct length prefix.
    let ckx = tls_kx_core::msgs::handshake::ClientKeyExchange {
        ciphertext: {
            let mut c = vec![0x00, 0x80];
            c.extend_from_slice(&[0xab; 128]);
            c
        },
    };

    let pms = server_ka
        .process_client_key_exchange(&server_config, &cert, &ckx)
        .unwrap();
    assert_eq!(pms.len(), 48);
    assert_eq!(&pms[..2], &[0x00, 0x00]);
    assert_ne!(&pms[2..], &[0u8; 46]);

    // A second run with a different RNG state gives a different fallback.
    let mut server_ka2 = KeyAgreement::rsa(ProtocolVersion::TLSv1_2);
    let server_config2 = test_config(18);
    let pms2 = server_ka2
        .process_client_key_exchange(&server_config2, &cert, &ckx)
        .unwrap();
    assert_ne!(pms, pms2);
}

#[test]
fn plain_rsa_agrees_and_ssl3_omits_length_prefix() {
    let server_config = test_config(19);
    let client_config = test_config(20);
    let (cert, peer_cert) = rsa_identity();
    let (client_hello, _server_hello) = hellos(ProtocolVersion::SSLv3, &[], &[]);

    let mut server_ka = KeyAgreement::rsa(ProtocolVersion::SSLv3);
    let mut client_ka = KeyAgreement::rsa(ProtocolVersion::SSLv3);

    let (client_pms, ckx) = client_ka
        .generate_client_key_exchange(&client_config, &client_hello, &peer_cert)
        .unwrap();
    // SSL 3.0: no length prefix, just the 128-byte ciphertext.
    assert_eq!(ckx.ciphertext.len(), 128);
    assert_eq!(&client_pms[..2], &[0x03, 0x00]);

    let server_pms = server_ka
        .process_client_key_exchange(&server_config, &cert, &ckx)
        .unwrap();
    assert_eq!(client_pms, server_pms);
}

#[test]
fn x25519_invalid_s2_payload() {
    let mut server_config = test_config(22);
    server_config.curve_preferences = vec![NamedGroup::X25519];
    let mut client_config = test_config(23);
    client_config.kex_config = "X25519_INVALID_S2".to_string();

    let (cert, peer_cert) = rsa_identity();
    let (client_hello, server_hello) = hellos(
        ProtocolVersion::TLSv1_2,
        &[NamedGroup::X25519],
        &[sh(SignatureAlgorithm::RSA, HashAlgorithm::SHA256)],
    );

    let mut server_ka = KeyAgreement::ecdhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);
    let mut client_ka = KeyAgreement::ecdhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);

    let mut skx = server_ka
        .generate_server_key_exchange(&server_config, &cert, &client_hello, &server_hello)
        .unwrap()
        .unwrap();
    client_ka
        .process_server_key_exchange(
            &client_config,
            &client_hello,
            &server_hello,
            &peer_cert,
            &mut skx,
        )
        .unwrap();

    let (client_pms, ckx) = client_ka
        .generate_client_key_exchange(&client_config, &client_hello, &peer_cert)
        .unwrap();

    // The literal one-byte zero, and an all-zero 32-byte point on the wire.
    assert_eq!(client_pms, vec![0x00]);
    assert_eq!(ckx.ciphertext[0], 32);
    assert_eq!(&ckx.ciphertext[1..], &[0u8; 32]);

    // The server's ladder lands on the conventional all-zero output.
    let server_pms = server_ka
        .process_client_key_exchange(&server_config, &cert, &ckx)
        .unwrap();
    assert_eq!(server_pms, vec![0u8; 32]);
}

#[test]
fn compressed_client_point_still_agrees() {
    let mut server_config = test_config(25);
    server_config.curve_preferences = vec![NamedGroup::secp256r1];
    let mut client_config = test_config(26);
    client_config.kex_config = "COMPRESS".to_string();

    let (cert, peer_cert) = rsa_identity();
    let (client_hello, server_hello) = hellos(
        ProtocolVersion::TLSv1_2,
        &[NamedGroup::secp256r1],
        &[sh(SignatureAlgorithm::RSA, HashAlgorithm::SHA256)],
    );

    let mut server_ka = KeyAgreement::ecdhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);
    let mut client_ka = KeyAgreement::ecdhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);

    let mut skx = server_ka
        .generate_server_key_exchange(&server_config, &cert, &client_hello, &server_hello)
        .unwrap()
        .unwrap();
    client_ka
        .process_server_key_exchange(
            &client_config,
            &client_hello,
            &server_hello,
            &peer_cert,
            &mut skx,
        )
        .unwrap();

    let (client_pms, ckx) = client_ka
        .generate_client_key_exchange(&client_config, &client_hello, &peer_cert)
        .unwrap();
    assert_eq!(ckx.ciphertext.len(), 1 + 33);
    assert!(ckx.ciphertext[1] == 0x02 || ckx.ciphertext[1] == 0x03);

    let server_pms = server_ka
        .process_client_key_exchange(&server_config, &cert, &ckx)
        .unwrap();
    assert_eq!(client_pms, server_pms);
}

#[test]
fn unknown_kex_config_option_is_fatal() {
    let mut server_config = test_config(28);
    server_config.curve_preferences = vec![NamedGroup::secp256r1];
    let mut client_config = test_config(29);
    client_config.kex_config = "COMPRESS,NO_SUCH_OPTION".to_string();

    let (cert, peer_cert) = rsa_identity();
    let (client_hello, server_hello) = hellos(
        ProtocolVersion::TLSv1_2,
        &[NamedGroup::secp256r1],
        &[sh(SignatureAlgorithm::RSA, HashAlgorithm::SHA256)],
    );

    let mut server_ka = KeyAgreement::ecdhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);
    let mut client_ka = KeyAgreement::ecdhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);

    let mut skx = server_ka
        .generate_server_key_exchange(&server_config, &cert, &client_hello, &server_hello)
        .unwrap()
        .unwrap();
    client_ka
        .process_server_key_exchange(
            &client_config,
            &client_hello,
            &server_hello,
            &peer_cert,
            &mut skx,
        )
        .unwrap();

    let err = client_ka
        .generate_client_key_exchange(&client_config, &client_hello, &peer_cert)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn hash_picker_returns_sha256_for_mixed_lists() {
    let picked = pick_tls12_hash_for_signature(
        SignatureAlgorithm::RSA,
        &[
            sh(SignatureAlgorithm::RSA, HashAlgorithm::SHA1),
            sh(SignatureAlgorithm::RSA, HashAlgorithm::SHA256),
        ],
        &[
            sh(SignatureAlgorithm::RSA, HashAlgorithm::SHA256),
            sh(SignatureAlgorithm::RSA, HashAlgorithm::SHA384),
        ],
    )
    .unwrap();
    assert_eq!(picked, HashAlgorithm::SHA256);
}

#[test]
fn malformed_dhe_skx_leaves_no_partial_state() {
    let client_config = test_config(31);
    let (_, peer_cert) = rsa_identity();
    let (client_hello, server_hello) = hellos(
        ProtocolVersion::TLSv1_2,
        &[],
        &[sh(SignatureAlgorithm::RSA, HashAlgorithm::SHA256)],
    );

    let mut client_ka = KeyAgreement::dhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);

    // p of length 1, then a truncated g length.
    let mut skx = tls_kx_core::msgs::handshake::ServerKeyExchange {
        key: vec![0x00, 0x01, 0x07, 0x00, 0x05, 0x01],
        digest: Vec::new(),
    };
    let err = client_ka
        .process_server_key_exchange(
            &client_config,
            &client_hello,
            &server_hello,
            &peer_cert,
            &mut skx,
        )
        .unwrap_err();
    assert_eq!(err, Error::InvalidServerKeyExchange);
    assert!(skx.digest.is_empty());

    // Nothing was committed: the client still has no group to speak with.
    let err = client_ka
        .generate_client_key_exchange(&client_config, &client_hello, &peer_cert)
        .unwrap_err();
    assert_eq!(err, Error::MissingServerKeyExchange);
}

#[test]
fn tampered_signature_is_stored_under_insecure_skip_verify() {
    let mut server_config = test_config(33);
    server_config.curve_preferences = vec![NamedGroup::secp256r1];

    let (cert, peer_cert) = rsa_identity();
    let (client_hello, server_hello) = hellos(
        ProtocolVersion::TLSv1_2,
        &[NamedGroup::secp256r1],
        &[sh(SignatureAlgorithm::RSA, HashAlgorithm::SHA256)],
    );

    let mut server_ka = KeyAgreement::ecdhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);
    let mut skx = server_ka
        .generate_server_key_exchange(&server_config, &cert, &client_hello, &server_hello)
        .unwrap()
        .unwrap();
    let last = skx.key.len() - 1;
    skx.key[last] ^= 0xff;

    // Strict client: the failure surfaces.
    let strict_config = test_config(35);
    let mut strict_ka = KeyAgreement::ecdhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);
    let err = strict_ka
        .process_server_key_exchange(
            &strict_config,
            &client_hello,
            &server_hello,
            &peer_cert,
            &mut skx.clone(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidSignature(_)));

    // Research client: the handshake continues and the failure is recorded.
    let mut lax_config = test_config(36);
    lax_config.insecure_skip_verify = true;
    let mut lax_ka = KeyAgreement::ecdhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);
    lax_ka
        .process_server_key_exchange(
            &lax_config,
            &client_hello,
            &server_hello,
            &peer_cert,
            &mut skx,
        )
        .unwrap();
    assert!(matches!(
        lax_ka.verify_error(),
        Some(Error::InvalidSignature(_))
    ));
    let (pms, _) = lax_ka
        .generate_client_key_exchange(&lax_config, &client_hello, &peer_cert)
        .unwrap();
    assert!(!pms.is_empty());
}

#[test]
fn anonymous_dhe_needs_no_signature() {
    let server_config = test_config(37);
    let client_config = test_config(38);
    let (cert, peer_cert) = rsa_identity();
    let (client_hello, server_hello) = hellos(ProtocolVersion::TLSv1_2, &[], &[]);

    let mut server_ka = KeyAgreement::dhe_anon(ProtocolVersion::TLSv1_2);
    let mut client_ka = KeyAgreement::dhe_anon(ProtocolVersion::TLSv1_2);

    let mut skx = server_ka
        .generate_server_key_exchange(&server_config, &cert, &client_hello, &server_hello)
        .unwrap()
        .unwrap();
    // Parameters only, no signature blob.
    assert_eq!(
        skx.key.len(),
        2 + 256 + 2 + 256 + 2 + {
            let y_len = ((skx.key[516] as usize) << 8) | skx.key[517] as usize;
            y_len
        }
    );

    client_ka
        .process_server_key_exchange(
            &client_config,
            &client_hello,
            &server_hello,
            &peer_cert,
            &mut skx,
        )
        .unwrap();
    let (client_pms, ckx) = client_ka
        .generate_client_key_exchange(&client_config, &client_hello, &peer_cert)
        .unwrap();
    let server_pms = server_ka
        .process_client_key_exchange(&server_config, &cert, &ckx)
        .unwrap();
    assert_eq!(client_pms, server_pms);
}

#[test]
fn dh_public_values_outside_range_are_rejected() {
    let server_config = test_config(40);
    let (cert, _) = rsa_identity();
    let (client_hello, server_hello) = hellos(ProtocolVersion::TLSv1_2, &[], &[]);

    let mut server_ka = KeyAgreement::dhe_anon(ProtocolVersion::TLSv1_2);
    server_ka
        .generate_server_key_exchange(&server_config, &cert, &client_hello, &server_hello)
        .unwrap();

    let p = BigUint::parse_bytes(RFC5114_P.as_bytes(), 16).unwrap();
    for bad in [BigUint::default(), p.clone(), &p + BigUint::one()] {
        let bytes = bad.to_bytes_be();
        let mut ciphertext = vec![(bytes.len() >> 8) as u8, bytes.len() as u8];
        ciphertext.extend_from_slice(&bytes);
        let ckx = tls_kx_core::msgs::handshake::ClientKeyExchange { ciphertext };
        let err = server_ka
            .process_client_key_exchange(&server_config, &cert, &ckx)
            .unwrap_err();
        assert_eq!(err, Error::InvalidClientKeyExchange, "y = {}", bad);
    }
}

#[test]
fn dhe_client_rejects_out_of_range_server_value() {
    let client_config = test_config(44);
    let (_, peer_cert) = rsa_identity();
    let (client_hello, server_hello) = hellos(ProtocolVersion::TLSv1_2, &[], &[]);

    let p = BigUint::parse_bytes(RFC5114_P.as_bytes(), 16).unwrap();
    for bad in [BigUint::default(), p.clone(), &p + BigUint::one()] {
        let mut key = Vec::new();
        for value in [&p, &BigUint::from(2u32), &bad] {
            let bytes = value.to_bytes_be();
            key.push((bytes.len() >> 8) as u8);
            key.push(bytes.len() as u8);
            key.extend_from_slice(&bytes);
        }
        let mut skx = tls_kx_core::msgs::handshake::ServerKeyExchange {
            key,
            digest: Vec::new(),
        };

        // Anonymous DH so only the range check can object.
        let mut client_ka = KeyAgreement::dhe_anon(ProtocolVersion::TLSv1_2);
        let err = client_ka
            .process_server_key_exchange(
                &client_config,
                &client_hello,
                &server_hello,
                &peer_cert,
                &mut skx,
            )
            .unwrap_err();
        assert_eq!(err, Error::InvalidServerKeyExchange, "y = {}", bad);
    }
}

#[test]
fn no_curve_overlap_fails_cleanly() {
    let mut server_config = test_config(42);
    server_config.curve_preferences = vec![NamedGroup::secp256r1];
    let (cert, _) = rsa_identity();
    let (client_hello, server_hello) = hellos(
        ProtocolVersion::TLSv1_2,
        &[NamedGroup::X448],
        &[sh(SignatureAlgorithm::RSA, HashAlgorithm::SHA256)],
    );

    let mut server_ka = KeyAgreement::ecdhe(ProtocolVersion::TLSv1_2, SignatureAlgorithm::RSA);
    let err = server_ka
        .generate_server_key_exchange(&server_config, &cert, &client_hello, &server_hello)
        .unwrap_err();
    assert_eq!(
        err,
        Error::PeerIncompatible("no supported elliptic curves offered".to_string())
    );
}
