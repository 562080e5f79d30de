// ----------------------------------------------------------------------------
// This source code contains derived artifacts from seanmonstar's `reqwest`.
// for further information(including license information),
// please visit their repository: https://github.com/seanmonstar/reqwest .
// ----------------------------------------------------------------------------
use reqwest::{Client as ReqwestClient, IntoUrl, Method};

use crate::{CredentialManager, OAuthParameters, Signer};

use super::request::RequestBuilder;

pub trait OAuthClientProvider {
    fn oauth1(self, manager: &CredentialManager) -> Client<Signer<'_>>
    where
        Self: Sized,
    {
        self.oauth1_with_params(manager, OAuthParameters::new())
    }

    fn oauth1_with_params<'a>(
        self,
        manager: &'a CredentialManager,
        params: OAuthParameters<'a>,
    ) -> Client<Signer<'a>>
    where
        Self: Sized;
}

#[derive(Debug)]
pub struct Client<TSigner> {
    inner: ReqwestClient,
    signer: TSigner,
}

impl OAuthClientProvider for ReqwestClient {
    fn oauth1_with_params<'a>(
        self,
        manager: &'a CredentialManager,
        parameters: OAuthParameters<'a>,
    ) -> Client<Signer<'a>>
    where
        Self: Sized,
    {
        Client {
            inner: self,
            signer: Signer::new(manager, parameters),
        }
    }
}

impl From<ReqwestClient> for Client<()> {
    fn from(client: ReqwestClient) -> Self {
        Client::new_with_client(client)
    }
}

impl Default for Client<()> {
    fn default() -> Self {
        Client::new()
    }
}

impl Client<()> {
    /// Constructs a new `Client`.
    ///
    /// This method calls reqwest::Client::new() internally.
    pub fn new() -> Self {
        Client::new_with_client(ReqwestClient::new())
    }

    /// Constructs a new `Client` with specifying inner `reqwest::Client`.
    pub fn new_with_client(client: ReqwestClient) -> Self {
        Client {
            inner: client,
            signer: (),
        }
    }
}

impl<T> Client<T>
where
    T: Clone,
{
    /// Convenience method to make a `GET` request to a URL.
    pub fn get<U: IntoUrl + Clone>(&self, url: U) -> RequestBuilder<T> {
        self.request(Method::GET, url)
    }

    /// Convenience method to make a `POST` request to a URL.
    pub fn post<U: IntoUrl + Clone>(&self, url: U) -> RequestBuilder<T> {
        self.request(Method::POST, url)
    }

    /// Convenience method to make a `PUT` request to a URL.
    pub fn put<U: IntoUrl + Clone>(&self, url: U) -> RequestBuilder<T> {
        self.request(Method::PUT, url)
    }

    /// Convenience method to make a `PATCH` request to a URL.
    pub fn patch<U: IntoUrl + Clone>(&self, url: U) -> RequestBuilder<T> {
        self.request(Method::PATCH, url)
    }

    /// Convenience method to make a `DELETE` request to a URL.
    pub fn delete<U: IntoUrl + Clone>(&self, url: U) -> RequestBuilder<T> {
        self.request(Method::DELETE, url)
    }

    /// Convenience method to make a `HEAD` request to a URL.
    pub fn head<U: IntoUrl + Clone>(&self, url: U) -> RequestBuilder<T> {
        self.request(Method::HEAD, url)
    }

    /// Start building a `Request` with the `Method` and `Url`.
    ///
    /// Returns a `RequestBuilder<T>`, which will allow setting headers and
    /// request body before sending.
    ///
    /// An unparsable `url` is reported by reqwest once the request is built.
    pub fn request<U: IntoUrl + Clone>(&self, method: Method, url: U) -> RequestBuilder<T> {
        let cloned_url = url.clone().into_url().ok();
        RequestBuilder::new(
            self.inner.request(method.clone(), url),
            method,
            cloned_url,
            self.signer.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use http::header::AUTHORIZATION;

    use crate::{CredentialManager, OAuthClientProvider};

    #[test]
    fn unsigned_client_adds_no_header() {
        let req = crate::Client::new()
            .get("http://example.com/resource")
            .into_inner()
            .build()
            .unwrap();
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn every_verb_is_signed() {
        let manager = CredentialManager::new("http://example.com/", "abcd", "secret").unwrap();
        let client = reqwest::Client::new().oauth1(&manager);
        for builder in vec![
            client.get("http://example.com/a"),
            client.post("http://example.com/a"),
            client.put("http://example.com/a"),
            client.patch("http://example.com/a"),
            client.delete("http://example.com/a"),
            client.head("http://example.com/a"),
        ] {
            let req = builder.generate_signature().unwrap().build().unwrap();
            let header = req.headers().get(AUTHORIZATION).unwrap().to_str().unwrap();
            assert!(header.starts_with("OAuth oauth_consumer_key=\"abcd\""));
        }
    }
}
