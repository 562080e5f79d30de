use std::collections::BTreeMap;
use std::fmt;

use crate::{SignError, SignResult};

/// Which leg of the OAuth flow issued a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Temporary credentials, only good for the verifier exchange.
    RequestToken,
    /// Long-lived credentials for protected resources.
    AccessToken,
}

/// Token credentials: `oauth_token` and its secret.
///
/// A token never changes once built. Renewal means building a new one and
/// handing it to the [`CredentialManager`](crate::CredentialManager).
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    key: String,
    secret: String,
    extra_parameters: BTreeMap<String, String>,
}

impl Token {
    /// Build an access token. Empty strings are accepted here; use
    /// [`Token::try_new`] when they are not.
    pub fn new<K, S>(key: K, secret: S) -> Self
    where
        K: Into<String>,
        S: Into<String>,
    {
        Self::with_kind(TokenKind::AccessToken, key, secret)
    }

    /// Build an access token, failing on an empty key or secret.
    pub fn try_new<K, S>(key: K, secret: S) -> SignResult<Self>
    where
        K: Into<String>,
        S: Into<String>,
    {
        let token = Self::new(key, secret);
        token.validate()?;
        Ok(token)
    }

    /// Build a request token.
    pub fn request<K, S>(key: K, secret: S) -> Self
    where
        K: Into<String>,
        S: Into<String>,
    {
        Self::with_kind(TokenKind::RequestToken, key, secret)
    }

    fn with_kind<K, S>(kind: TokenKind, key: K, secret: S) -> Self
    where
        K: Into<String>,
        S: Into<String>,
    {
        Token {
            kind,
            key: key.into(),
            secret: secret.into(),
            extra_parameters: BTreeMap::new(),
        }
    }

    /// Attach provider-specific protocol parameters such as
    /// `oauth_session_handle`. They are signed and sent with every request.
    pub fn extra_parameters<I, K, V>(self, extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Token {
            extra_parameters: extra
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..self
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra_parameters
    }

    /// Check that both key and secret are present.
    pub fn validate(&self) -> SignResult<()> {
        if self.key.is_empty() {
            return Err(SignError::InvalidToken("token key is empty".to_string()));
        }
        if self.secret.is_empty() {
            return Err(SignError::InvalidToken(format!(
                "secret of token {} is empty",
                self.key
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("extra_parameters", &self.extra_parameters)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_empty_values() {
        let token = Token::new("", "");
        assert_eq!(token.kind(), TokenKind::AccessToken);
        assert_eq!(token.key(), "");
        assert!(token.validate().is_err());
    }

    #[test]
    fn try_new_rejects_empty_values() {
        assert!(matches!(
            Token::try_new("", "secret"),
            Err(SignError::InvalidToken(_))
        ));
        assert!(matches!(
            Token::try_new("key", ""),
            Err(SignError::InvalidToken(_))
        ));
        let token = Token::try_new("key", "secret").unwrap();
        assert_eq!(token.secret(), "secret");
    }

    #[test]
    fn request_token_kind() {
        let token = Token::request("req", "");
        assert_eq!(token.kind(), TokenKind::RequestToken);
        assert!(token.extra().is_empty());
    }

    #[test]
    fn extra_parameters_are_kept() {
        let token = Token::new("key", "secret")
            .extra_parameters(vec![("oauth_session_handle", "handle")]);
        assert_eq!(
            token.extra().get("oauth_session_handle").map(String::as_str),
            Some("handle")
        );
    }

    #[test]
    fn debug_hides_secret() {
        let printed = format!("{:?}", Token::new("visible", "hidden"));
        assert!(printed.contains("visible"));
        assert!(!printed.contains("hidden"));
    }
}
