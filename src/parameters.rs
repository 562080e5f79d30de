use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::{SignError, SignResult};

const NONCE_LENGTH: usize = 32;

/// Per-request protocol parameters.
///
/// Everything is optional: a missing nonce or timestamp is generated at
/// signing time. Fixing them is mostly useful for reproducible signatures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthParameters<'a> {
    callback: Option<Cow<'a, str>>,
    nonce: Option<Cow<'a, str>>,
    timestamp: Option<u64>,
    verifier: Option<Cow<'a, str>>,
}

impl<'a> OAuthParameters<'a> {
    pub fn new() -> Self {
        Default::default()
    }

    /// set the oauth_callback value
    pub fn callback<T>(self, callback: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            callback: Some(callback.into()),
            ..self
        }
    }

    /// set the oauth_nonce value
    pub fn nonce<T>(self, nonce: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    /// set the oauth_timestamp value
    pub fn timestamp<T>(self, timestamp: T) -> Self
    where
        T: Into<u64>,
    {
        OAuthParameters {
            timestamp: Some(timestamp.into()),
            ..self
        }
    }

    /// set the oauth_verifier value
    pub fn verifier<T>(self, verifier: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            verifier: Some(verifier.into()),
            ..self
        }
    }

    pub(crate) fn callback_value(&self) -> Option<&str> {
        self.callback.as_deref()
    }

    pub(crate) fn verifier_value(&self) -> Option<&str> {
        self.verifier.as_deref()
    }

    pub(crate) fn nonce_or_generate(&self) -> String {
        match self.nonce {
            Some(ref nonce) => nonce.to_string(),
            None => generate_nonce(),
        }
    }

    pub(crate) fn timestamp_or_now(&self) -> SignResult<u64> {
        match self.timestamp {
            Some(timestamp) => Ok(timestamp),
            None => generate_timestamp(),
        }
    }
}

/// Random alphanumeric nonce.
fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

/// Seconds since the Unix epoch.
fn generate_timestamp() -> SignResult<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .map_err(|err| SignError::Clock(err.to_string()))
}
