//! RSA key transport: the client encrypts the pre-master secret to the
//! server's key.  In export mode the server instead signs and sends an
//! ephemeral 512-bit key, which does the encrypting.

use crate::config::Config;
use crate::error::Error;
use crate::key::{Certificate, PeerCertificate, PeerPublicKey, SigningKey};
use crate::msgs::codec::{Codec, PayloadU16, Reader};
use crate::msgs::enums::ProtocolVersion;
use crate::msgs::handshake::{
    ClientHello, ClientKeyExchange, ServerHello, ServerKeyExchange, ServerRsaParams,
};
use crate::rand::{fill_random, RngAdapter};
use crate::sign::ParameterAuth;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};

/// State for RSA key transport.  `ephemeral` selects export mode, where
/// the server signs and sends a throwaway 512-bit key.
pub struct RsaKeyAgreement {
    pub(crate) auth: ParameterAuth,
    pub(crate) version: ProtocolVersion,
    /// Observability: the version the client advertised in its hello.
    pub client_version: ProtocolVersion,
    pub(crate) ephemeral: bool,
    private_key: Option<RsaPrivateKey>,
    public_key: Option<RsaPublicKey>,
    pub(crate) verify_error: Option<Error>,
}

impl RsaKeyAgreement {
    pub(crate) fn new(auth: ParameterAuth, version: ProtocolVersion, ephemeral: bool) -> Self {
        Self {
            auth,
            version,
            client_version: version,
            ephemeral,
            private_key: None,
            public_key: None,
            verify_error: None,
        }
    }

    pub(crate) fn generate_server_key_exchange(
        &mut self,
        config: &Config,
        cert: &Certificate,
        client_hello: &ClientHello,
        hello: &ServerHello,
    ) -> Result<Option<ServerKeyExchange>, Error> {
        self.client_version = client_hello.version;
        if !self.ephemeral {
            // Plain RSA transport sends no ServerKeyExchange.
            return Ok(None);
        }

        let key = match &config.export_rsa_key {
            Some(key) => key.clone(),
            None => {
                let mut rng = config.rand();
                RsaPrivateKey::new(&mut RngAdapter(rng.as_mut()), 512)
                    .map_err(|e| Error::Crypto(format!("ephemeral RSA keygen: {}", e)))?
            }
        };

        let params = ServerRsaParams {
            modulus: PayloadU16::new(key.n().to_bytes_be()),
            exponent: PayloadU16::new(key.e().to_bytes_be()),
        }
        .get_encoding();
        self.private_key = Some(key);

        self.auth
            .sign_parameters(config, cert, client_hello, hello, params)
            .map(Some)
    }

    pub(crate) fn process_client_key_exchange(
        &mut self,
        config: &Config,
        cert: &Certificate,
        ckx: &ClientKeyExchange,
    ) -> Result<Vec<u8>, Error> {
        let mut pre_master_secret = vec![0u8; 48];
        {
            let mut rng = config.rand();
            fill_random(rng.as_mut(), &mut pre_master_secret[2..])?;
        }

        if ckx.ciphertext.len() < 2 {
            return Err(Error::InvalidClientKeyExchange);
        }

        let mut ciphertext = ckx.ciphertext.as_slice();
        if !self.version.is_ssl3() {
            let len = (usize::from(ciphertext[0]) << 8) | usize::from(ciphertext[1]);
            if len != ciphertext.len() - 2 {
                return Err(Error::InvalidClientKeyExchange);
            }
            ciphertext = &ciphertext[2..];
        }

        let key = match (&self.private_key, &cert.private_key) {
            (Some(key), _) => key,
            (None, SigningKey::Rsa(key)) => key,
            _ => {
                return Err(Error::General(
                    "RSA key exchange requires an RSA server private key".to_string(),
                ))
            }
        };

        if ciphertext.len() != key.size() {
            return Err(Error::InvalidClientKeyExchange);
        }

        // Bleichenbacher countermeasure: a padding failure silently leaves
        // the random secret in place, so the attacker can't tell success
        // from failure.  The version bytes inside the plaintext are never
        // checked; see RFC 4346 section 7.4.7.1.
        if let Ok(plaintext) = key.decrypt(Pkcs1v15Encrypt, ciphertext) {
            if plaintext.len() == pre_master_secret.len() {
                pre_master_secret.copy_from_slice(&plaintext);
            }
        }

        Ok(pre_master_secret)
    }

    pub(crate) fn process_server_key_exchange(
        &mut self,
        config: &Config,
        client_hello: &ClientHello,
        server_hello: &ServerHello,
        cert: &PeerCertificate,
        skx: &mut ServerKeyExchange,
    ) -> Result<(), Error> {
        if !self.ephemeral {
            // A ServerKeyExchange in plain RSA mode is the driver's problem.
            return Ok(());
        }

        let mut rd = Reader::init(&skx.key);
        let params = ServerRsaParams::read(&mut rd).ok_or(Error::InvalidServerKeyExchange)?;
        if params.exponent.0.len() > 4 {
            return Err(Error::InvalidServerKeyExchange);
        }

        let public_key = RsaPublicKey::new(
            BigUint::from_bytes_be(&params.modulus.0),
            BigUint::from_bytes_be(&params.exponent.0),
        )
        .map_err(|_| Error::InvalidServerKeyExchange)?;

        let params_len = skx.key.len() - rd.left();
        let (server_rsa_params, sig) = skx.key.split_at(params_len);

        let result = self.auth.verify_parameters(
            config,
            client_hello,
            server_hello,
            cert,
            server_rsa_params,
            sig,
        );

        self.public_key = Some(public_key);
        match result {
            Ok(digest) => {
                skx.digest = digest;
                self.verify_error = None;
            }
            Err(err) => self.verify_error = Some(err),
        }

        if config.insecure_skip_verify {
            return Ok(());
        }
        match &self.verify_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    pub(crate) fn generate_client_key_exchange(
        &mut self,
        config: &Config,
        client_hello: &ClientHello,
        cert: &PeerCertificate,
    ) -> Result<(Vec<u8>, ClientKeyExchange), Error> {
        let mut pre_master_secret = vec![0u8; 48];
        pre_master_secret[0] = (client_hello.version.get_u16() >> 8) as u8;
        pre_master_secret[1] = client_hello.version.get_u16() as u8;

        let encrypted = {
            let mut rng = config.rand();
            fill_random(rng.as_mut(), &mut pre_master_secret[2..])?;

            let public_key = match (&self.public_key, &cert.public_key) {
                (Some(key), _) => key,
                (None, PeerPublicKey::Rsa(key)) => key,
                _ => return Err(Error::InvalidClientKeyExchange),
            };
            public_key
                .encrypt(
                    &mut RngAdapter(rng.as_mut()),
                    Pkcs1v15Encrypt,
                    &pre_master_secret,
                )
                .map_err(|e| Error::Crypto(format!("RSA encryption: {}", e)))?
        };

        let ciphertext = if self.version.is_ssl3() {
            encrypted
        } else {
            let mut body = Vec::with_capacity(2 + encrypted.len());
            (encrypted.len() as u16).encode(&mut body);
            body.extend_from_slice(&encrypted);
            body
        };

        Ok((pre_master_secret, ClientKeyExchange { ciphertext }))
    }
}
