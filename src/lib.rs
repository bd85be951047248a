/*!
oauth1-client: OAuth 1.0 (RFC 5849) request signing for Rust.

# Overview

This library implements the client side of [OAuth 1.0](https://tools.ietf.org/html/rfc5849):
it constructs signed HTTP requests across the three-legged authorization flow
(temporary credentials, resource owner authorization, token credentials) and
signs subsequent requests to protected resources.

The core is the parameter normalization pipeline: parameters are collected
from the URL query string, the `Authorization` header, a form-encoded entity
body and the protocol (`oauth_*`) parameters, percent-encoded per RFC 3986,
sorted by byte value, assembled into the signature base string and signed
with HMAC-SHA1. Transport is delegated to a [`Connector`]; the bundled
[`ReqwestConnector`] drives [reqwest](https://crates.io/crates/reqwest).

# How to use

## Basic usecase 1 - signing a protected-resource request

```no_run
use http::Method;
use oauth1_client::{
    Access, Consumer, HmacSha1Signer, OAuthClient, ReqwestConnector, Request,
};

# #[tokio::main]
# async fn main() -> Result<(), oauth1_client::Error> {
let consumer = Consumer::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]");
let access = Access::new("[ACCESS_TOKEN]", "[TOKEN_SECRET]");

let mut signer = HmacSha1Signer::with_consumer(consumer.clone());
signer.set_token_credential(&access);

let mut request = Request::protected_resource(
    Method::GET,
    "https://photos.example.net/photos?file=vacation.jpg&size=original",
)?;
request.set_oauth_parameter("oauth_consumer_key", consumer.key())?;
request.set_oauth_parameter("oauth_token", "[ACCESS_TOKEN]")?;

let mut client = OAuthClient::new(ReqwestConnector::new(), request, signer);
client.execute().await?;

let response = client.response().unwrap();
println!("{}: {}", response.status, response.body);
# Ok(())
# }
```

## Basic usecase 2 - acquiring temporary credentials

```no_run
use oauth1_client::{
    Consumer, HmacSha1Signer, OAuthClient, ReqwestConnector, Request, TokenResponse,
};

# #[tokio::main]
# async fn main() -> Result<(), oauth1_client::Error> {
let consumer = Consumer::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]");

// step 1: request temporary credentials
let mut request = Request::temporary_credentials("https://provider.example.net/initiate")?;
request.set_oauth_parameter("oauth_consumer_key", consumer.key())?;
request.set_oauth_parameter("oauth_callback", "oob")?;

let mut client = OAuthClient::new(
    ReqwestConnector::new(),
    request,
    HmacSha1Signer::with_consumer(consumer),
);
client.execute().await?;

let token = TokenResponse::from_http_response(client.response().unwrap())?;
token.require_callback_confirmed()?;
let temporary = token.into_temporary();

// step 2: direct the resource owner to the authorization endpoint,
// then exchange the temporary credentials plus oauth_verifier for
// token credentials with Request::token_credentials.
# let _ = temporary;
# Ok(())
# }
```
*/
mod client;
mod collection;
mod connector;
mod credentials;
mod error;
mod parameter;
mod request;
mod signer;
mod token_reader;

// exposed to external program
pub use client::OAuthClient;
pub use collection::ParameterCollection;
pub use connector::{Connector, HttpResponse, ReqwestConnector};
pub use credentials::{Access, Consumer, Temporary, TokenCredential};
pub use error::{
    Error, ParameterError, ParameterResult, RequestError, RequestResult, ResponseError,
    ResponseResult, Result, SignError, SignResult,
};
pub use parameter::{percent_decode, percent_encode, Encoding, Parameter, Value};
pub use request::{Request, RequestKind, Transmission};
pub use signer::{HmacSha1Signer, HMAC_SHA1};
pub use token_reader::{TokenReader, TokenReaderFuture, TokenResponse};

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_callback_confirmed`.
pub const OAUTH_CALLBACK_CONFIRMED_KEY: &str = "oauth_callback_confirmed";
/// Represents `oauth_consumer_key`.
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_signature`.
pub const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
/// Represents `oauth_signature_method`.
pub const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_token`.
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";
/// Represents `oauth_token_secret`.
pub const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";
/// Represents `realm`.
pub const REALM_KEY: &str = "realm";
