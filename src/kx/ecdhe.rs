//! Ephemeral elliptic-curve Diffie-Hellman over the registry curves.
//!
//! The client side honors the comma-separated research options in
//! `Config::kex_config`: `COMPRESS` switches the point encoding, and the
//! static payload options replace the whole exchange with a fixed
//! small-subgroup or twist point (in which case the pre-master secret is
//! the payload's x-coordinate and no private key exists at all).

use super::payloads::payload_for_option;
use crate::config::Config;
use crate::ec::{curve_for_group, Curve, EcPrivateKey, EcPublicKey};
use crate::error::Error;
use crate::key::{Certificate, PeerCertificate};
use crate::msgs::codec::{decode_u16, Codec, PayloadU8, Reader};
use crate::msgs::enums::{ECCurveType, NamedGroup};
use crate::msgs::handshake::{
    ClientEcdhParams, ClientHello, ClientKeyExchange, ServerEcdhParams, ServerHello,
    ServerKeyExchange,
};
use crate::sign::ParameterAuth;
use log::debug;
use num_bigint::BigUint;

/// State for ephemeral elliptic-curve Diffie-Hellman.  The public fields
/// are observability only: they record the negotiated parameters for scan
/// output and never feed back into the handshake.
pub struct EcdheKeyAgreement {
    pub(crate) auth: ParameterAuth,
    curve: Option<&'static dyn Curve>,
    curve_id: Option<NamedGroup>,
    private_key: Option<EcPrivateKey>,
    server_public_key: Option<EcPublicKey>,
    client_public_key: Option<EcPublicKey>,
    /// x-coordinate of the client's point.
    pub client_x: Option<BigUint>,
    /// y-coordinate of the client's point, absent on x-only curves.
    pub client_y: Option<BigUint>,
    /// The client's private scalar, when one was generated.
    pub client_priv_bytes: Option<Vec<u8>>,
    /// The server's private scalar, when we are the server.
    pub server_priv_bytes: Option<Vec<u8>>,
    pub(crate) verify_error: Option<Error>,
}

impl EcdheKeyAgreement {
    pub(crate) fn new(auth: ParameterAuth) -> Self {
        Self {
            auth,
            curve: None,
            curve_id: None,
            private_key: None,
            server_public_key: None,
            client_public_key: None,
            client_x: None,
            client_y: None,
            client_priv_bytes: None,
            server_priv_bytes: None,
            verify_error: None,
        }
    }

    /// The group negotiated for this handshake, once known.
    pub fn curve_id(&self) -> Option<NamedGroup> {
        self.curve_id
    }

    pub(crate) fn generate_server_key_exchange(
        &mut self,
        config: &Config,
        cert: &Certificate,
        client_hello: &ClientHello,
        hello: &ServerHello,
    ) -> Result<Option<ServerKeyExchange>, Error> {
        // Server preference wins: walk our list in order, take the first
        // group the client also offered.
        let mut curve_id = None;
        'candidates: for candidate in config.curve_preferences() {
            for offered in &client_hello.supported_curves {
                if candidate == offered {
                    curve_id = Some(*candidate);
                    break 'candidates;
                }
            }
        }

        let curve_id = curve_id.ok_or_else(|| {
            Error::PeerIncompatible("no supported elliptic curves offered".to_string())
        })?;
        let curve = curve_for_group(curve_id).ok_or_else(|| {
            Error::InvalidConfig("curve preferences include an unsupported curve".to_string())
        })?;
        debug!("ECDHE curve is {:?}", curve_id);

        let (private_key, public_key) = {
            let mut rng = config.rand();
            curve.generate_key(rng.as_mut())?
        };
        let ecdh_public = curve.marshal(&public_key, false);

        self.curve_id = Some(curve_id);
        self.curve = Some(curve);
        self.server_priv_bytes = Some(private_key.d.clone());
        self.private_key = Some(private_key);

        let params = ServerEcdhParams::new(curve_id, ecdh_public).get_encoding();
        self.auth
            .sign_parameters(config, cert, client_hello, hello, params)
            .map(Some)
    }

    pub(crate) fn process_client_key_exchange(
        &mut self,
        _config: &Config,
        _cert: &Certificate,
        ckx: &ClientKeyExchange,
    ) -> Result<Vec<u8>, Error> {
        let mut rd = Reader::init(&ckx.ciphertext);
        let params = ClientEcdhParams::read(&mut rd).ok_or(Error::InvalidClientKeyExchange)?;
        if rd.any_left() {
            return Err(Error::InvalidClientKeyExchange);
        }

        let curve = self
            .curve
            .ok_or_else(|| Error::General("ECDHE server state is missing its curve".to_string()))?;
        let private_key = self.private_key.as_ref().ok_or_else(|| {
            Error::General("ECDHE server state is missing its private key".to_string())
        })?;

        let public_key = curve
            .unmarshal(&params.public.0)
            .ok_or(Error::InvalidClientKeyExchange)?;
        self.client_x = Some(public_key.x.clone());
        self.client_y = public_key.y.clone();

        curve.shared_secret(private_key, &public_key)
    }

    pub(crate) fn process_server_key_exchange(
        &mut self,
        config: &Config,
        client_hello: &ClientHello,
        server_hello: &ServerHello,
        cert: &PeerCertificate,
        skx: &mut ServerKeyExchange,
    ) -> Result<(), Error> {
        // Parse into locals first; state is committed only after the whole
        // message has been validated.
        if skx.key.len() < 4 {
            return Err(Error::InvalidServerKeyExchange);
        }
        if ECCurveType::from(skx.key[0]) != ECCurveType::NamedCurve {
            return Err(Error::PeerMisbehaved(
                "server selected unsupported curve".to_string(),
            ));
        }
        let curve_id = NamedGroup::from(
            decode_u16(&skx.key[1..3]).expect("length checked above"),
        );
        let curve = curve_for_group(curve_id).ok_or_else(|| {
            Error::PeerMisbehaved("server selected unsupported curve".to_string())
        })?;

        let public_len = usize::from(skx.key[3]);
        if public_len + 4 > skx.key.len() {
            return Err(Error::InvalidServerKeyExchange);
        }
        let server_public_key = curve
            .unmarshal(&skx.key[4..4 + public_len])
            .ok_or(Error::InvalidServerKeyExchange)?;

        let (server_ecdh_params, sig) = skx.key.split_at(4 + public_len);
        let result = self.auth.verify_parameters(
            config,
            client_hello,
            server_hello,
            cert,
            server_ecdh_params,
            sig,
        );

        debug!("ECDHE curve is {:?}", curve_id);
        self.curve_id = Some(curve_id);
        self.curve = Some(curve);
        self.server_public_key = Some(server_public_key);

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
        _client_hello: &ClientHello,
        _cert: &PeerCertificate,
    ) -> Result<(Vec<u8>, ClientKeyExchange), Error> {
        if self.curve.is_none() {
            return Err(Error::MissingServerKeyExchange);
        }

        let mut compress = false;
        let mut payload = None;
        for option in config.kex_config.split(',') {
            match option {
                "COMPRESS" => compress = true,
                "" => {}
                other => match payload_for_option(other) {
                    Some(found) => payload = Some(found),
                    None => {
                        return Err(Error::InvalidConfig(format!(
                            "unrecognized tls-kex-config option {:?}",
                            other
                        )))
                    }
                },
            }
        }

        let pre_master_secret;
        if let Some(payload) = payload {
            // A static payload bypasses ECDH entirely: the pre-master
            // secret is what a server stuck in the small subgroup would
            // derive, i.e. the payload's x-coordinate.
            let curve = curve_for_group(payload.group).ok_or_else(|| {
                Error::General("payload names an unregistered curve".to_string())
            })?;
            let public_key = payload.public_key();
            pre_master_secret = public_key.x.to_bytes_be();

            self.curve_id = Some(payload.group);
            self.curve = Some(curve);
            self.private_key = None;
            self.client_priv_bytes = None;
            self.client_public_key = Some(public_key);
        } else {
            let curve = self.curve.expect("checked above");
            let server_public_key = self
                .server_public_key
                .as_ref()
                .ok_or(Error::MissingServerKeyExchange)?;

            let (private_key, public_key) = {
                let mut rng = config.rand();
                curve.generate_key(rng.as_mut())?
            };
            pre_master_secret = curve.shared_secret(&private_key, server_public_key)?;

            self.client_priv_bytes = Some(private_key.d.clone());
            self.private_key = Some(private_key);
            self.client_public_key = Some(public_key);
        }

        let curve = self.curve.expect("set above");
        let client_public_key = self.client_public_key.as_ref().expect("set above");
        self.client_x = Some(client_public_key.x.clone());
        self.client_y = client_public_key.y.clone();

        let ciphertext = ClientEcdhParams {
            public: PayloadU8::new(curve.marshal(client_public_key, compress)),
        }
        .get_encoding();

        Ok((pre_master_secret, ClientKeyExchange { ciphertext }))
    }
}
