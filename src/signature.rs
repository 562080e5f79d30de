//! Signature methods (RFC 5849 §3.4).

use std::fmt;
use std::str::FromStr;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha1::Sha1;

use crate::encoding::{percent_encode, StringEncoding};
use crate::{SignError, SignResult};

/// The signature methods this crate can produce.
///
/// `PlainText` sends the signing key as is. It offers no protection of its
/// own and must only travel over an already confidential transport such as
/// TLS; nothing here checks that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SignatureMethod {
    PlainText,
    #[default]
    HmacSha1,
}

impl SignatureMethod {
    /// Value of `oauth_signature_method`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SignatureMethod::PlainText => "PLAINTEXT",
            SignatureMethod::HmacSha1 => "HMAC-SHA1",
        }
    }

    /// Sign `base_string` with `signing_key`.
    ///
    /// The result is not percent-encoded.
    pub fn sign(
        &self,
        base_string: &str,
        signing_key: &str,
        encoding: StringEncoding,
    ) -> SignResult<String> {
        match self {
            SignatureMethod::PlainText => Ok(signing_key.to_string()),
            SignatureMethod::HmacSha1 => {
                let key = encoding.encode(signing_key)?;
                let content = encoding.encode(base_string)?;
                Ok(base64_hmac_sha1(&key, &content))
            }
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureMethod {
    type Err = SignError;

    fn from_str(s: &str) -> SignResult<Self> {
        match s {
            "PLAINTEXT" => Ok(SignatureMethod::PlainText),
            "HMAC-SHA1" => Ok(SignatureMethod::HmacSha1),
            _ => Err(SignError::UnsupportedSignatureMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for SignatureMethod {
    type Error = SignError;

    fn try_from(value: String) -> SignResult<Self> {
        value.parse()
    }
}

/// `encode(client_secret)&encode(token_secret)`; an absent token secret
/// counts as the empty string.
pub fn signing_key(
    client_secret: &str,
    token_secret: Option<&str>,
    encoding: StringEncoding,
) -> SignResult<String> {
    Ok(format!(
        "{}&{}",
        percent_encode(client_secret, encoding)?,
        percent_encode(token_secret.unwrap_or_default(), encoding)?
    ))
}

/// Base64 encoded HMAC with SHA1 hash.
fn base64_hmac_sha1(key: &[u8], content: &[u8]) -> String {
    let mut h = Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts keys of any length");
    h.update(content);

    BASE64_STANDARD.encode(h.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const UTF8: StringEncoding = StringEncoding::Utf8;

    const TWITTER_BASE: &str = "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json\
        &include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26oauth_nonce%3DkYjz\
        VBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26oauth_signature_method%3DHMAC-SHA1%26oauth_timesta\
        mp%3D1318622958%26oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26oauth_v\
        ersion%3D1.0%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520\
        OAuth%2520request%2521";

    #[test]
    fn signing_key_without_token() {
        assert_eq!(signing_key("secret", None, UTF8).unwrap(), "secret&");
    }

    #[test]
    fn signing_key_encodes_both_halves() {
        assert_eq!(
            signing_key("a&b", Some("c d"), UTF8).unwrap(),
            "a%26b&c%20d"
        );
    }

    #[test]
    fn plaintext_returns_signing_key() {
        let key = signing_key("kd94hf93k423kf44", Some("pfkkdhi9sl3r4s00"), UTF8).unwrap();
        assert_eq!(
            SignatureMethod::PlainText
                .sign("ignored", &key, UTF8)
                .unwrap(),
            "kd94hf93k423kf44&pfkkdhi9sl3r4s00"
        );
    }

    #[test]
    fn hmac_sha1_twitter_vector() {
        // https://developer.twitter.com/en/docs/authentication/oauth-1-0a/creating-a-signature
        let key = signing_key(
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            Some("LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE"),
            UTF8,
        )
        .unwrap();
        assert_eq!(
            SignatureMethod::HmacSha1
                .sign(TWITTER_BASE, &key, UTF8)
                .unwrap(),
            "hCtSmYh+iHYCEqBWrE7C7hYmtUk="
        );
    }

    #[test]
    fn hmac_sha1_depends_on_every_input() {
        let sign = |base: &str, cs: &str, ts: &str| {
            let key = signing_key(cs, Some(ts), UTF8).unwrap();
            SignatureMethod::HmacSha1.sign(base, &key, UTF8).unwrap()
        };
        let reference = sign("GET&a&b", "cs", "ts");
        assert_eq!(reference, sign("GET&a&b", "cs", "ts"));
        assert_ne!(reference, sign("GET&a&c", "cs", "ts"));
        assert_ne!(reference, sign("GET&a&b", "cx", "ts"));
        assert_ne!(reference, sign("GET&a&b", "cs", "tx"));
    }

    #[test]
    fn protocol_names() {
        assert_eq!(SignatureMethod::default(), SignatureMethod::HmacSha1);
        assert_eq!(SignatureMethod::PlainText.to_string(), "PLAINTEXT");
        assert_eq!(
            "HMAC-SHA1".parse::<SignatureMethod>(),
            Ok(SignatureMethod::HmacSha1)
        );
        assert_eq!(
            "RSA-SHA1".parse::<SignatureMethod>(),
            Err(SignError::UnsupportedSignatureMethod("RSA-SHA1".to_string()))
        );
    }
}
