use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use http::Method;
use log::debug;
use serde::Deserialize;
use url::Url;

use crate::canonical::{
    encode_parameters, form_parameters, join_encoded, normalize_url, query_parameters,
    signature_base_string,
};
use crate::encoding::StringEncoding;
use crate::header::render_authorization;
use crate::signature::{signing_key, SignatureMethod};
use crate::{
    OAuthParameters, SignError, SignResult, Token, TokenKind, OAUTH_CALLBACK_KEY,
    OAUTH_CONSUMER_KEY, OAUTH_NONCE_KEY, OAUTH_SIGNATURE_KEY, OAUTH_SIGNATURE_METHOD_KEY,
    OAUTH_TIMESTAMP_KEY, OAUTH_TOKEN_KEY, OAUTH_VERIFIER_KEY, OAUTH_VERSION,
    OAUTH_VERSION_KEY,
};

/// Options a [`CredentialManager`] signs with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Defaults to HMAC-SHA1.
    pub signature_method: SignatureMethod,
    /// Sent in the header, never signed.
    pub realm: Option<String>,
    /// Defaults to UTF-8.
    pub encoding: StringEncoding,
}

/// Owns the client credentials and the current token of one account.
///
/// The manager can be shared between threads. Every signing call works on a
/// [`Credentials`] snapshot taken once at its start, so replacing or
/// clearing the token never affects a signature already in progress.
pub struct CredentialManager {
    base_endpoint: Url,
    client_key: String,
    client_secret: String,
    state: RwLock<State>,
}

struct State {
    config: ManagerConfig,
    token: Option<Arc<Token>>,
}

impl CredentialManager {
    /// Create a manager signing with HMAC-SHA1 over UTF-8.
    ///
    /// # Errors
    ///
    /// Fails when either client credential is empty or `base_endpoint` is
    /// not an absolute URL.
    pub fn new<B, K, S>(base_endpoint: B, client_key: K, client_secret: S) -> SignResult<Self>
    where
        B: AsRef<str>,
        K: Into<String>,
        S: Into<String>,
    {
        Self::with_config(
            base_endpoint,
            client_key,
            client_secret,
            ManagerConfig::default(),
        )
    }

    pub fn with_config<B, K, S>(
        base_endpoint: B,
        client_key: K,
        client_secret: S,
        config: ManagerConfig,
    ) -> SignResult<Self>
    where
        B: AsRef<str>,
        K: Into<String>,
        S: Into<String>,
    {
        let client_key = client_key.into();
        let client_secret = client_secret.into();
        if client_key.is_empty() {
            return Err(SignError::MissingClientCredential("client_key"));
        }
        if client_secret.is_empty() {
            return Err(SignError::MissingClientCredential("client_secret"));
        }
        let base_endpoint = Url::parse(base_endpoint.as_ref()).map_err(|err| {
            SignError::InvalidUrl(format!("{}: {}", base_endpoint.as_ref(), err))
        })?;

        Ok(CredentialManager {
            base_endpoint,
            client_key,
            client_secret,
            state: RwLock::new(State {
                config,
                token: None,
            }),
        })
    }

    pub fn with_realm<T: Into<String>>(self, realm: T) -> Self {
        self.set_realm(Some(realm.into()));
        self
    }

    pub fn with_signature_method(self, signature_method: SignatureMethod) -> Self {
        self.set_signature_method(signature_method);
        self
    }

    pub fn with_encoding(self, encoding: StringEncoding) -> Self {
        self.state.write().expect("lock poisoned").config.encoding = encoding;
        self
    }

    pub fn base_endpoint(&self) -> &Url {
        &self.base_endpoint
    }

    pub fn client_key(&self) -> &str {
        &self.client_key
    }

    pub fn realm(&self) -> Option<String> {
        self.state.read().expect("lock poisoned").config.realm.clone()
    }

    pub fn set_realm(&self, realm: Option<String>) {
        self.state.write().expect("lock poisoned").config.realm = realm;
    }

    pub fn signature_method(&self) -> SignatureMethod {
        self.state.read().expect("lock poisoned").config.signature_method
    }

    pub fn set_signature_method(&self, signature_method: SignatureMethod) {
        self.state
            .write()
            .expect("lock poisoned")
            .config
            .signature_method = signature_method;
    }

    pub fn encoding(&self) -> StringEncoding {
        self.state.read().expect("lock poisoned").config.encoding
    }

    // ------------------------------------------------------------------------
    // Token lifecycle

    /// Replace the current token with an access token.
    ///
    /// # Errors
    ///
    /// [`SignError::InvalidToken`] for request tokens and for tokens with an
    /// empty key or secret.
    pub fn set_access_token(&self, token: Token) -> SignResult<()> {
        if token.kind() != TokenKind::AccessToken {
            return Err(SignError::InvalidToken(format!(
                "{} is a request token",
                token.key()
            )));
        }
        token.validate()?;
        self.replace_token(Some(token));
        Ok(())
    }

    /// Hold a request token while exchanging the verifier for an access
    /// token. Some providers issue request tokens without a secret.
    pub fn set_request_token(&self, token: Token) -> SignResult<()> {
        if token.kind() != TokenKind::RequestToken {
            return Err(SignError::InvalidToken(format!(
                "{} is an access token",
                token.key()
            )));
        }
        if token.key().is_empty() {
            return Err(SignError::InvalidToken("token key is empty".to_string()));
        }
        self.replace_token(Some(token));
        Ok(())
    }

    /// Build an access token and make it current.
    pub fn generate_access_token<K, S, I, EK, EV>(
        &self,
        key: K,
        secret: S,
        extra: I,
    ) -> SignResult<()>
    where
        K: Into<String>,
        S: Into<String>,
        I: IntoIterator<Item = (EK, EV)>,
        EK: Into<String>,
        EV: Into<String>,
    {
        self.set_access_token(Token::new(key, secret).extra_parameters(extra))
    }

    /// Forget the current token. Later requests are signed with the client
    /// secret alone and carry no `oauth_token`.
    pub fn clear_access_token(&self) {
        self.replace_token(None);
    }

    pub fn current_token(&self) -> Option<Arc<Token>> {
        self.state.read().expect("lock poisoned").token.clone()
    }

    /// Whether an access token is held.
    pub fn is_authenticated(&self) -> bool {
        self.current_token()
            .map_or(false, |token| token.kind() == TokenKind::AccessToken)
    }

    fn replace_token(&self, token: Option<Token>) {
        match token {
            Some(ref token) => {
                debug!("oauth token replaced by {} ({:?})", token.key(), token.kind())
            }
            None => debug!("oauth token cleared"),
        }
        self.state.write().expect("lock poisoned").token = token.map(Arc::new);
    }

    // ------------------------------------------------------------------------
    // Signing

    /// Consistent copy of everything a signature depends on.
    pub fn credentials(&self) -> Credentials {
        let state = self.state.read().expect("lock poisoned");
        Credentials {
            client_key: self.client_key.clone(),
            client_secret: self.client_secret.clone(),
            current_token: state.token.clone(),
            realm: state.config.realm.clone(),
            signature_method: state.config.signature_method,
            encoding: state.config.encoding,
        }
    }

    /// Resolve `path` against the base endpoint. Absolute URLs are kept.
    pub fn resolve(&self, path: &str) -> SignResult<Url> {
        self.base_endpoint
            .join(path)
            .map_err(|err| SignError::InvalidUrl(format!("{}: {}", path, err)))
    }

    /// `Authorization` header value for a request with generated nonce and
    /// timestamp.
    ///
    /// `params` are the form body parameters; the query string of `path` is
    /// picked up on its own.
    pub fn authorization_header<I, K, V>(
        &self,
        method: &Method,
        path: &str,
        params: I,
    ) -> SignResult<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.authorization_header_with(method, path, params, &OAuthParameters::new())
    }

    pub fn authorization_header_with<I, K, V>(
        &self,
        method: &Method,
        path: &str,
        params: I,
        options: &OAuthParameters<'_>,
    ) -> SignResult<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.sign(method, path, params, options)?.authorization_header()
    }

    /// Signed protocol parameters, `oauth_signature` included, for
    /// transports that put them into the form body.
    pub fn signed_parameters<I, K, V>(
        &self,
        method: &Method,
        path: &str,
        params: I,
        options: &OAuthParameters<'_>,
    ) -> SignResult<BTreeMap<String, String>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Ok(self.sign(method, path, params, options)?.into_parameters())
    }

    /// Protocol parameters before signing, with fresh nonce and timestamp.
    pub fn oauth_parameters(&self) -> SignResult<BTreeMap<String, String>> {
        self.credentials().oauth_parameters(&OAuthParameters::new())
    }

    pub fn sign<I, K, V>(
        &self,
        method: &Method,
        path: &str,
        params: I,
        options: &OAuthParameters<'_>,
    ) -> SignResult<SignedRequest>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = self.resolve(path)?;
        self.credentials().sign(method, &url, params, options)
    }
}

impl fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialManager")
            .field("base_endpoint", &self.base_endpoint.as_str())
            .field("client_key", &self.client_key)
            .field("credentials", &self.credentials())
            .finish()
    }
}

/// Snapshot of a [`CredentialManager`].
#[derive(Clone)]
pub struct Credentials {
    client_key: String,
    client_secret: String,
    current_token: Option<Arc<Token>>,
    realm: Option<String>,
    signature_method: SignatureMethod,
    encoding: StringEncoding,
}

impl Credentials {
    pub fn client_key(&self) -> &str {
        &self.client_key
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.current_token.as_deref()
    }

    pub fn realm(&self) -> Option<&str> {
        self.realm.as_deref()
    }

    pub fn signature_method(&self) -> SignatureMethod {
        self.signature_method
    }

    pub fn encoding(&self) -> StringEncoding {
        self.encoding
    }

    /// Protocol parameters for one request, without `oauth_signature`.
    pub fn oauth_parameters(
        &self,
        options: &OAuthParameters<'_>,
    ) -> SignResult<BTreeMap<String, String>> {
        let mut params = BTreeMap::new();
        if let Some(token) = self.current_token() {
            params.extend(
                token
                    .extra()
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string())),
            );
            params.insert(OAUTH_TOKEN_KEY.to_string(), token.key().to_string());
        }
        params.insert(OAUTH_CONSUMER_KEY.to_string(), self.client_key.clone());
        params.insert(
            OAUTH_SIGNATURE_METHOD_KEY.to_string(),
            self.signature_method.as_str().to_string(),
        );
        params.insert(
            OAUTH_TIMESTAMP_KEY.to_string(),
            options.timestamp_or_now()?.to_string(),
        );
        params.insert(OAUTH_NONCE_KEY.to_string(), options.nonce_or_generate());
        params.insert(OAUTH_VERSION_KEY.to_string(), OAUTH_VERSION.to_string());
        if let Some(callback) = options.callback_value() {
            params.insert(OAUTH_CALLBACK_KEY.to_string(), callback.to_string());
        }
        if let Some(verifier) = options.verifier_value() {
            params.insert(OAUTH_VERIFIER_KEY.to_string(), verifier.to_string());
        }
        params.remove(OAUTH_SIGNATURE_KEY);
        Ok(params)
    }

    /// Base string over the protocol parameters, the query of `url` and the
    /// request parameters.
    pub fn signature_base_string<I, K, V>(
        &self,
        method: &Method,
        url: &Url,
        params: I,
        oauth_parameters: &BTreeMap<String, String>,
    ) -> SignResult<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let encoded = encode_parameters(params, self.encoding)?;
        self.encoded_base_string(method, url, encoded, oauth_parameters)
    }

    fn encoded_base_string(
        &self,
        method: &Method,
        url: &Url,
        mut encoded: Vec<(String, String)>,
        oauth_parameters: &BTreeMap<String, String>,
    ) -> SignResult<String> {
        let normalized_url = normalize_url(url)?;
        encoded.extend(query_parameters(url));
        encoded.extend(encode_parameters(oauth_parameters, self.encoding)?);
        let normalized = join_encoded(encoded);

        debug!(
            "signing {} {} with {}",
            method, normalized_url, self.signature_method
        );
        signature_base_string(method.as_str(), &normalized_url, &normalized, self.encoding)
    }

    pub fn signing_key(&self) -> SignResult<String> {
        signing_key(
            &self.client_secret,
            self.current_token().map(Token::secret),
            self.encoding,
        )
    }

    /// Compute the signature for a request to `url`.
    pub fn sign<I, K, V>(
        &self,
        method: &Method,
        url: &Url,
        params: I,
        options: &OAuthParameters<'_>,
    ) -> SignResult<SignedRequest>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let encoded = encode_parameters(params, self.encoding)?;
        self.sign_encoded(method, url, encoded, options)
    }

    /// Sign a request whose body is the urlencoded `form_body`.
    ///
    /// Body and query bytes are signed as sent, without going through the
    /// configured encoding.
    pub fn sign_form(
        &self,
        method: &Method,
        url: &Url,
        form_body: &[u8],
        options: &OAuthParameters<'_>,
    ) -> SignResult<SignedRequest> {
        self.sign_encoded(method, url, form_parameters(form_body), options)
    }

    fn sign_encoded(
        &self,
        method: &Method,
        url: &Url,
        encoded: Vec<(String, String)>,
        options: &OAuthParameters<'_>,
    ) -> SignResult<SignedRequest> {
        let mut parameters = self.oauth_parameters(options)?;
        let base_string = self.encoded_base_string(method, url, encoded, &parameters)?;
        let signature = self
            .signature_method
            .sign(&base_string, &self.signing_key()?, self.encoding)?;
        parameters.insert(OAUTH_SIGNATURE_KEY.to_string(), signature);

        Ok(SignedRequest {
            base_string,
            parameters,
            realm: self.realm.clone(),
            encoding: self.encoding,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_key", &self.client_key)
            .field("client_secret", &"<redacted>")
            .field("current_token", &self.current_token)
            .field("realm", &self.realm)
            .field("signature_method", &self.signature_method)
            .field("encoding", &self.encoding)
            .finish()
    }
}

/// Result of signing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    base_string: String,
    parameters: BTreeMap<String, String>,
    realm: Option<String>,
    encoding: StringEncoding,
}

impl SignedRequest {
    pub fn base_string(&self) -> &str {
        &self.base_string
    }

    pub fn signature(&self) -> &str {
        self.parameters
            .get(OAUTH_SIGNATURE_KEY)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Protocol parameters including `oauth_signature`.
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn into_parameters(self) -> BTreeMap<String, String> {
        self.parameters
    }

    pub fn authorization_header(&self) -> SignResult<String> {
        render_authorization(self.realm.as_deref(), &self.parameters, self.encoding)
    }
}
