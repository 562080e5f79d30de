use std::{collections::BTreeMap, future::Future};

use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;

use crate::{
    Error, Result, Token, TokenReaderError, TokenReaderResult, OAUTH_KEY_PREFIX,
    OAUTH_TOKEN_KEY,
};

const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";

/// Response fields that describe the response itself and must not be sent
/// back as protocol parameters.
const RESPONSE_ONLY_KEYS: &[&str] = &[
    "oauth_callback_confirmed",
    "oauth_expires_in",
    "oauth_authorization_expires_in",
];

/// Represents response of token acquisition.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    /// OAuth Token
    pub oauth_token: String,
    /// OAuth Token Secret
    pub oauth_token_secret: String,
    /// Other contents
    #[serde(flatten)]
    pub remain: BTreeMap<String, String>,
}

impl TokenResponse {
    /// Temporary credentials from the request-token step.
    pub fn into_request_token(self) -> Token {
        let extra = protocol_extras(&self.remain);
        Token::request(self.oauth_token, self.oauth_token_secret).extra_parameters(extra)
    }

    /// Token credentials from the access-token step.
    ///
    /// Provider specific `oauth_*` fields such as `oauth_session_handle`
    /// become extra parameters of the token; fields like `user_id` stay in
    /// [`TokenResponse::remain`] only.
    pub fn into_access_token(self) -> Token {
        let extra = protocol_extras(&self.remain);
        Token::new(self.oauth_token, self.oauth_token_secret).extra_parameters(extra)
    }
}

fn protocol_extras(remain: &BTreeMap<String, String>) -> Vec<(String, String)> {
    remain
        .iter()
        .filter(|(k, _)| k.starts_with(OAUTH_KEY_PREFIX) && !RESPONSE_ONLY_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Add parse_oauth_token feature to reqwest::Response.
// this trait is sealed
#[async_trait(?Send)]
pub trait TokenReader: private::Sealed {
    async fn parse_oauth_token(self) -> Result<TokenResponse>;
}

#[async_trait(?Send)]
impl TokenReader for Response {
    async fn parse_oauth_token(self) -> Result<TokenResponse> {
        let text = self.text().await?;
        Ok(read_oauth_token(text)?)
    }
}

/// Add parse_oauth_token feature to Future of reqwest::Response.
// this trait is also sealed
#[async_trait(?Send)]
pub trait TokenReaderFuture: private::SealedWrapper {
    async fn parse_oauth_token(self) -> Result<TokenResponse>;
}

#[async_trait(?Send)]
impl<T, E> TokenReaderFuture for T
where
    T: Future<Output = std::result::Result<Response, E>>,
    E: Into<Error> + 'static,
{
    async fn parse_oauth_token(self) -> Result<TokenResponse> {
        match self.await {
            Ok(resp) => Ok(resp.parse_oauth_token().await?),
            Err(err) => Err(err.into()),
        }
    }
}

/// Parse an `application/x-www-form-urlencoded` token response.
pub fn read_oauth_token(text: String) -> TokenReaderResult<TokenResponse> {
    let mut destructured = url::form_urlencoded::parse(text.as_bytes())
        .into_owned()
        .collect::<BTreeMap<String, String>>();
    let oauth_token = destructured.remove(OAUTH_TOKEN_KEY);
    let oauth_token_secret = destructured.remove(OAUTH_TOKEN_SECRET_KEY);
    match (oauth_token, oauth_token_secret) {
        (Some(t), Some(s)) => Ok(TokenResponse {
            oauth_token: t,
            oauth_token_secret: s,
            remain: destructured,
        }),
        (None, _) => Err(TokenReaderError::TokenKeyNotFound(OAUTH_TOKEN_KEY, text)),
        (_, _) => Err(TokenReaderError::TokenKeyNotFound(
            OAUTH_TOKEN_SECRET_KEY,
            text,
        )),
    }
}

mod private {
    use std::future::Future;

    use reqwest::Response;

    use crate::Error;

    pub trait Sealed {}
    impl Sealed for Response {}
    pub trait SealedWrapper {}
    impl<T, E> SealedWrapper for T
    where
        T: Future<Output = Result<Response, E>>,
        E: Into<Error>,
    {
    }
}
