/*!
reqwest-oauth1-manager: OAuth 1.0a request signing around a shared credential manager.

Repository is here: https://github.com/karno/reqwest-oauth1

# Overview

A [`CredentialManager`] owns the client (consumer) key and secret of one
account together with its current token, and turns `{method, path,
parameters}` into a signed `Authorization` header value following
[RFC 5849](https://tools.ietf.org/html/rfc5849). HMAC-SHA1 and PLAINTEXT
signatures are supported.

Signing itself never touches the network. A thin
[reqwest](https://crates.io/crates/reqwest) layer is provided for
convenience; any other transport can use
[`CredentialManager::authorization_header`] or
[`CredentialManager::signed_parameters`] directly.

# How to use

## Basic usecase 1 - signing a request

```rust,no_run
use reqwest_oauth1_manager::{CredentialManager, NO_PARAMETERS};
use http::Method;

# fn run() -> Result<(), reqwest_oauth1_manager::SignError> {
let manager = CredentialManager::new(
    "https://api.twitter.com/1.1/",
    "[CONSUMER_KEY]",
    "[CONSUMER_SECRET]",
)?;
manager.generate_access_token("[ACCESS_TOKEN]", "[TOKEN_SECRET]", NO_PARAMETERS)?;

let header = manager.authorization_header(
    &Method::POST,
    "statuses/update.json",
    [("status", "Hello, Twitter!")],
)?;
println!("Authorization: {}", header);
# Ok(())
# }
```

## Basic usecase 2 - Acquiring OAuth token & secret

```rust,no_run
use std::io;
use reqwest_oauth1_manager::{
    CredentialManager, OAuthClientProvider, OAuthParameters, TokenReaderFuture,
};

# async fn run() -> reqwest_oauth1_manager::Result<()> {
let manager = CredentialManager::new(
    "https://api.twitter.com/",
    "[CONSUMER_KEY]",
    "[CONSUMER_SECRET]",
)?;

// step 1: acquire request token & token secret
let resp = reqwest::Client::new()
    .oauth1_with_params(&manager, OAuthParameters::new().callback("oob"))
    .post("https://api.twitter.com/oauth/request_token")
    .send()
    .parse_oauth_token()
    .await?;
manager.set_request_token(resp.clone().into_request_token())?;

// step 2. acquire user pin
println!(
    "please access to: https://api.twitter.com/oauth/authorize?oauth_token={}",
    resp.oauth_token
);
println!("input pin: ");
let mut user_input = String::new();
io::stdin().read_line(&mut user_input).ok();
let pin = user_input.trim();

// step 3. acquire access token
let resp = reqwest::Client::new()
    .oauth1_with_params(&manager, OAuthParameters::new().verifier(pin))
    .post("https://api.twitter.com/oauth/access_token")
    .send()
    .parse_oauth_token()
    .await?;
manager.set_access_token(resp.into_access_token())?;
# Ok(())
# }
```
*/
mod canonical;
mod client;
mod encoding;
mod error;
mod header;
mod manager;
mod parameters;
mod request;
mod signature;
mod signer;
mod token;
mod token_reader;

// exposed to external program
pub use canonical::{
    form_parameters, normalize_parameters, normalize_url, query_parameters, signature_base_string,
};
pub use client::{Client, OAuthClientProvider};
pub use encoding::{percent_encode, StringEncoding};
pub use error::{Error, Result, SignError, SignResult, TokenReaderError, TokenReaderResult};
pub use header::render_authorization;
pub use manager::{CredentialManager, Credentials, ManagerConfig, SignedRequest};
pub use parameters::OAuthParameters;
pub use request::RequestBuilder;
pub use signature::{signing_key, SignatureMethod};
pub use signer::Signer;
pub use token::{Token, TokenKind};
pub use token_reader::{read_oauth_token, TokenReader, TokenReaderFuture, TokenResponse};

/// An empty parameter list for requests without query or body parameters.
pub const NO_PARAMETERS: [(&str, &str); 0] = [];

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";
/// Represents `realm`.
pub const REALM_KEY: &str = "realm";

// crate-private constant variables
pub(crate) const OAUTH_KEY_PREFIX: &str = "oauth_";
pub(crate) const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
pub(crate) const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
pub(crate) const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
pub(crate) const OAUTH_TOKEN_KEY: &str = "oauth_token";
pub(crate) const OAUTH_VERSION: &str = "1.0";
