// Key-file loading. Weave key files are RSA JWKs; PKCS#8 DER is accepted as
// well because that is what most tooling exports.

use crate::error::{Result, WeaveError};
use crate::utils::decode_field;
use crate::wallet::Wallet;
use ring::rsa::{KeyPairComponents, PublicKeyComponents};
use ring::signature::RsaKeyPair;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
struct RsaJwk {
    kty: String,
    n: String,
    e: String,
    d: String,
    p: String,
    q: String,
    dp: String,
    dq: String,
    qi: String,
}

impl Wallet {
    /// Load an unencrypted RSA JWK as found in a weave key file.
    pub fn from_jwk_str(jwk: &str) -> Result<Wallet> {
        let key: RsaJwk = serde_json::from_str(jwk)
            .map_err(|e| WeaveError::Wallet(format!("Key file is not an RSA JWK: {e}")))?;
        if key.kty != "RSA" {
            return Err(WeaveError::Wallet(format!(
                "Unsupported key type `{}`, expected RSA",
                key.kty
            )));
        }

        let n = jwk_component("n", &key.n)?;
        let e = jwk_component("e", &key.e)?;
        let d = jwk_component("d", &key.d)?;
        let p = jwk_component("p", &key.p)?;
        let q = jwk_component("q", &key.q)?;
        let dp = jwk_component("dp", &key.dp)?;
        let dq = jwk_component("dq", &key.dq)?;
        let qi = jwk_component("qi", &key.qi)?;

        let components = KeyPairComponents {
            public_key: PublicKeyComponents {
                n: n.as_slice(),
                e: e.as_slice(),
            },
            d: d.as_slice(),
            p: p.as_slice(),
            q: q.as_slice(),
            dP: dp.as_slice(),
            dQ: dq.as_slice(),
            qInv: qi.as_slice(),
        };
        let key_pair = RsaKeyPair::from_components(&components)
            .map_err(|e| WeaveError::Crypto(format!("RSA key rejected: {e}")))?;
        Wallet::from_key_pair(key_pair)
    }

    /// Load a DER encoded PKCS#8 RSA private key.
    pub fn from_pkcs8(der: &[u8]) -> Result<Wallet> {
        let key_pair = RsaKeyPair::from_pkcs8(der)
            .map_err(|e| WeaveError::Crypto(format!("RSA key rejected: {e}")))?;
        Wallet::from_key_pair(key_pair)
    }

    /// JSON files are read as JWKs, everything else as PKCS#8 DER.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Wallet> {
        let path = path.as_ref();
        let bytes = Zeroizing::new(fs::read(path).map_err(|e| {
            WeaveError::Io(format!("Failed to read key file {}: {e}", path.display()))
        })?);
        log::info!("Loading wallet from {}", path.display());

        let looks_like_json = bytes
            .iter()
            .find(|b| !b.is_ascii_whitespace())
            .is_some_and(|b| *b == b'{');
        if looks_like_json {
            let text = std::str::from_utf8(&bytes)
                .map_err(|e| WeaveError::Wallet(format!("Key file is not UTF-8: {e}")))?;
            Wallet::from_jwk_str(text)
        } else {
            Wallet::from_pkcs8(&bytes)
        }
    }
}

fn jwk_component(name: &str, value: &str) -> Result<Zeroizing<Vec<u8>>> {
    // Some exporters pad, the weave never does
    let decoded = decode_field(name, value.trim_end_matches('='))
        .map_err(|e| WeaveError::Wallet(e.to_string()))?;
    if decoded.is_empty() {
        return Err(WeaveError::Wallet(format!("JWK component `{name}` is empty")));
    }
    Ok(Zeroizing::new(decoded))
}
