//! The HTTP transport collaborator.
//!
//! The core never performs network I/O itself; a signed [`Request`] is
//! handed to a [`Connector`], which may be backed by any HTTP client.
//! [`ReqwestConnector`] is the bundled implementation.

use async_trait::async_trait;
use http::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use http::StatusCode;
use reqwest::Client as ReqwestClient;
use url::form_urlencoded;

use crate::error::{Error, Result};
use crate::request::{Request, Transmission};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// A provider response as seen by the core: status, headers, body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Transport collaborator contract. `prepare` receives the fully signed
/// request; `execute` performs the exchange; `response` is valid once
/// `execute` has completed.
#[async_trait]
pub trait Connector {
    fn prepare(&mut self, request: &Request) -> Result<()>;

    async fn execute(&mut self) -> Result<()>;

    fn response(&self) -> Option<&HttpResponse>;
}

/// [`Connector`] over a `reqwest::Client`.
#[derive(Debug, Default)]
pub struct ReqwestConnector {
    client: ReqwestClient,
    realm: Option<String>,
    prepared: Option<reqwest::RequestBuilder>,
    response: Option<HttpResponse>,
}

impl ReqwestConnector {
    pub fn new() -> Self {
        Self::with_client(ReqwestClient::new())
    }

    pub fn with_client(client: ReqwestClient) -> Self {
        ReqwestConnector {
            client,
            realm: None,
            prepared: None,
            response: None,
        }
    }

    /// Include a `realm` in the produced Authorization header. The realm
    /// is presentation only and never signed.
    pub fn realm<T: Into<String>>(mut self, realm: T) -> Self {
        self.realm = Some(realm.into());
        self
    }

    fn oauth_form_pairs(request: &Request) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for parameter in request.oauth_parameters().iter() {
            serializer.append_pair(parameter.name().get(), parameter.first_value().get());
        }
        serializer.finish()
    }
}

#[async_trait]
impl Connector for ReqwestConnector {
    fn prepare(&mut self, request: &Request) -> Result<()> {
        let mut url = request.url().clone();
        if request.transmission() == Transmission::QueryString {
            for parameter in request.oauth_parameters().iter() {
                url.query_pairs_mut()
                    .append_pair(parameter.name().get(), parameter.first_value().get());
            }
        }

        let mut builder = self.client.request(request.method().clone(), url);
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        match request.transmission() {
            Transmission::AuthorizationHeader => {
                builder = builder.header(
                    AUTHORIZATION,
                    request.authorization_header(self.realm.as_deref()),
                );
                if !request.body().is_empty() {
                    builder = builder.body(request.body().to_string());
                }
            }
            Transmission::FormEncodedBody => {
                // Transmission::FormEncodedBody is POST-only, enforced by
                // Request::set_transmission
                let oauth = Self::oauth_form_pairs(request);
                let body = if request.body().is_empty() {
                    oauth
                } else {
                    format!("{}&{}", request.body(), oauth)
                };
                builder = builder.header(CONTENT_TYPE, FORM_URLENCODED).body(body);
            }
            Transmission::QueryString => {
                if !request.body().is_empty() {
                    builder = builder.body(request.body().to_string());
                }
            }
        }

        self.prepared = Some(builder);
        self.response = None;
        Ok(())
    }

    async fn execute(&mut self) -> Result<()> {
        let builder = self.prepared.take().ok_or(Error::NotPrepared)?;
        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        self.response = Some(HttpResponse {
            status,
            headers,
            body,
        });
        Ok(())
    }

    fn response(&self) -> Option<&HttpResponse> {
        self.response.as_ref()
    }
}
