use http::Method;
use url::Url;

use crate::{CredentialManager, OAuthParameters, SignResult};

/// Binds a [`CredentialManager`] to the per-request OAuth options of one
/// outgoing request.
#[derive(Debug, Clone)]
pub struct Signer<'a> {
    manager: &'a CredentialManager,
    parameters: OAuthParameters<'a>,
}

impl<'a> Signer<'a> {
    pub fn new(manager: &'a CredentialManager, parameters: OAuthParameters<'a>) -> Self {
        Signer {
            manager,
            parameters,
        }
    }

    /// Produce the `Authorization` header value.
    ///
    /// `url` keeps its query string; `form_body` is the urlencoded body, or
    /// an empty string when the body is not form encoded. Both are signed
    /// byte for byte as they go on the wire.
    pub fn generate_signature(
        self,
        method: &Method,
        url: &Url,
        form_body: &str,
    ) -> SignResult<String> {
        self.manager
            .credentials()
            .sign_form(method, url, form_body.as_bytes(), &self.parameters)?
            .authorization_header()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{StringEncoding, NO_PARAMETERS};

    #[test]
    fn matches_manager_header() {
        let manager = CredentialManager::new(
            "https://api.twitter.com/1.1/",
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
        )
        .unwrap();
        manager
            .generate_access_token(
                "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
                "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
                NO_PARAMETERS,
            )
            .unwrap();
        let params = OAuthParameters::new()
            .nonce("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg")
            .timestamp(1_318_622_958u64);
        let url = manager.resolve("statuses/update.json").unwrap();

        let header = Signer::new(&manager, params.clone())
            .generate_signature(
                &Method::POST,
                &url,
                "include_entities=true&status=Hello+Ladies+%2B+Gentlemen%2C+a+signed+OAuth+request%21",
            )
            .unwrap();
        let expected = manager
            .authorization_header_with(
                &Method::POST,
                "statuses/update.json",
                [
                    ("include_entities", "true"),
                    ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
                ],
                &params,
            )
            .unwrap();
        assert_eq!(header, expected);
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
    }

    #[test]
    fn latin1_manager_signs_utf8_body() {
        let params = OAuthParameters::new().nonce("abc123").timestamp(1_234_567_890u64);
        let latin1 = CredentialManager::new("http://example.com/", "abcd", "secret")
            .unwrap()
            .with_encoding(StringEncoding::Latin1);
        let utf8 = CredentialManager::new("http://example.com/", "abcd", "secret").unwrap();
        let url = latin1.resolve("/resource").unwrap();

        let header = Signer::new(&latin1, params.clone())
            .generate_signature(&Method::POST, &url, "n=%C3%A9")
            .unwrap();
        let expected = utf8
            .authorization_header_with(&Method::POST, "/resource", [("n", "é")], &params)
            .unwrap();
        assert_eq!(header, expected);
    }
}
