//! Parsing of token-issuance responses in the three-legged flow.

use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use http::StatusCode;
use reqwest::Response;
use serde::Deserialize;
use url::form_urlencoded;

use crate::connector::HttpResponse;
use crate::credentials::{Access, Temporary};
use crate::error::{Error, ResponseError, ResponseResult, Result};
use crate::{OAUTH_CALLBACK_CONFIRMED_KEY, OAUTH_TOKEN_KEY, OAUTH_TOKEN_SECRET_KEY};

/// A token-issuance response body: `oauth_token`, `oauth_token_secret`
/// and whatever else the provider sent.
#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    pub oauth_token: String,
    pub oauth_token_secret: String,
    #[serde(flatten)]
    pub remain: HashMap<String, String>,
}

impl TokenResponse {
    /// Parse a connector response, expecting a 200 with an urlencoded
    /// body carrying both token parameters.
    pub fn from_http_response(response: &HttpResponse) -> ResponseResult<TokenResponse> {
        if response.status != StatusCode::OK {
            return Err(ResponseError::UnexpectedStatus(response.status.as_u16()));
        }
        read_token_response(&response.body)
    }

    /// The Temporary-Credentials stage additionally requires
    /// `oauth_callback_confirmed=true`.
    pub fn require_callback_confirmed(&self) -> ResponseResult<()> {
        match self.remain.get(OAUTH_CALLBACK_CONFIRMED_KEY).map(String::as_str) {
            Some("true") => Ok(()),
            _ => Err(ResponseError::MissingParameter(
                OAUTH_CALLBACK_CONFIRMED_KEY,
                format!("{:?}", self.remain),
            )),
        }
    }

    pub fn into_temporary(self) -> Temporary {
        Temporary::new(self.oauth_token, self.oauth_token_secret)
    }

    pub fn into_access(self) -> Access {
        Access::new(self.oauth_token, self.oauth_token_secret)
    }
}

/// Add token parsing to `reqwest::Response` directly, for callers that
/// drive reqwest without a connector.
// this trait is sealed
#[async_trait(?Send)]
pub trait TokenReader: private::Sealed {
    async fn parse_token_response(self) -> Result<TokenResponse>;
}

#[async_trait(?Send)]
impl TokenReader for Response {
    async fn parse_token_response(self) -> Result<TokenResponse> {
        let status = self.status();
        if status != StatusCode::OK {
            return Err(ResponseError::UnexpectedStatus(status.as_u16()).into());
        }
        let text = self.text().await?;
        Ok(read_token_response(&text)?)
    }
}

/// The same, lifted over a pending `reqwest` future.
// this trait is also sealed
#[async_trait(?Send)]
pub trait TokenReaderFuture: private::SealedWrapper {
    async fn parse_token_response(self) -> Result<TokenResponse>;
}

#[async_trait(?Send)]
impl<T, E> TokenReaderFuture for T
where
    T: Future<Output = std::result::Result<Response, E>>,
    E: Into<Error> + 'static,
{
    async fn parse_token_response(self) -> Result<TokenResponse> {
        match self.await {
            Ok(resp) => resp.parse_token_response().await,
            Err(err) => Err(err.into()),
        }
    }
}

fn read_token_response(text: &str) -> ResponseResult<TokenResponse> {
    let mut destructured: HashMap<String, String> = form_urlencoded::parse(text.as_bytes())
        .into_owned()
        .collect();
    let oauth_token = destructured.remove(OAUTH_TOKEN_KEY);
    let oauth_token_secret = destructured.remove(OAUTH_TOKEN_SECRET_KEY);
    match (oauth_token, oauth_token_secret) {
        (Some(token), Some(secret)) => Ok(TokenResponse {
            oauth_token: token,
            oauth_token_secret: secret,
            remain: destructured,
        }),
        (None, _) => Err(ResponseError::MissingParameter(
            OAUTH_TOKEN_KEY,
            text.to_string(),
        )),
        (_, _) => Err(ResponseError::MissingParameter(
            OAUTH_TOKEN_SECRET_KEY,
            text.to_string(),
        )),
    }
}

mod private {
    use std::future::Future;

    use reqwest::Response;

    use crate::error::Error;

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
