//! The logical HTTP request being signed.
//!
//! A [`Request`] owns the protocol (`oauth_*`) parameters and derives
//! three further parameter collections at signing time: the URL query
//! string, the `Authorization` header, and the form-encoded entity body.

use std::time::{SystemTime, UNIX_EPOCH};

use http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use rand::RngCore;
use serde::Serialize;
use url::Url;

use crate::collection::ParameterCollection;
use crate::error::{ParameterResult, RequestError, RequestResult};
use crate::parameter::Value;
use crate::{
    OAUTH_CALLBACK_KEY, OAUTH_CONSUMER_KEY, OAUTH_NONCE_KEY, OAUTH_SIGNATURE_KEY,
    OAUTH_SIGNATURE_METHOD_KEY, OAUTH_TIMESTAMP_KEY, OAUTH_TOKEN_KEY, OAUTH_VERIFIER_KEY,
    OAUTH_VERSION_KEY,
};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// The stage of the three-legged flow a request belongs to. Each kind
/// carries its own required protocol parameters; there is no inheritance
/// chain behind this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Stage 1: obtain temporary credentials. Requires `oauth_callback`.
    TemporaryCredentials,
    /// Stage 3: exchange for token credentials. Requires `oauth_verifier`.
    TokenCredentials,
    /// Access a protected resource with token credentials.
    ProtectedResource,
}

/// How the protocol parameters travel to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transmission {
    AuthorizationHeader,
    FormEncodedBody,
    QueryString,
}

#[derive(Debug, Clone)]
pub struct Request {
    kind: RequestKind,
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: String,
    oauth_parameters: ParameterCollection,
    required: Vec<String>,
    optional: Vec<String>,
    transmission: Transmission,
}

impl Request {
    /// Build a request for the given flow stage. Fails with
    /// [`RequestError::MalformedUrl`] unless the URL has an http(s)
    /// scheme and a host.
    pub fn new(kind: RequestKind, method: Method, url: &str) -> RequestResult<Self> {
        let parsed =
            Url::parse(url).map_err(|_| RequestError::MalformedUrl(url.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => {}
            _ => return Err(RequestError::MalformedUrl(url.to_string())),
        }
        if parsed.host_str().is_none() {
            return Err(RequestError::MalformedUrl(url.to_string()));
        }

        let mut required = vec![
            OAUTH_CONSUMER_KEY.to_string(),
            OAUTH_SIGNATURE_METHOD_KEY.to_string(),
        ];
        match kind {
            RequestKind::TemporaryCredentials => required.push(OAUTH_CALLBACK_KEY.to_string()),
            RequestKind::TokenCredentials => required.push(OAUTH_VERIFIER_KEY.to_string()),
            RequestKind::ProtectedResource => {}
        }

        Ok(Request {
            kind,
            method,
            url: parsed,
            headers: HeaderMap::new(),
            body: String::new(),
            oauth_parameters: ParameterCollection::new(),
            required,
            optional: vec![OAUTH_TOKEN_KEY.to_string(), OAUTH_VERSION_KEY.to_string()],
            transmission: Transmission::AuthorizationHeader,
        })
    }

    pub fn temporary_credentials(url: &str) -> RequestResult<Self> {
        Request::new(RequestKind::TemporaryCredentials, Method::POST, url)
    }

    pub fn token_credentials(url: &str) -> RequestResult<Self> {
        Request::new(RequestKind::TokenCredentials, Method::POST, url)
    }

    pub fn protected_resource(method: Method, url: &str) -> RequestResult<Self> {
        Request::new(RequestKind::ProtectedResource, method, url)
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Set the entity body and its content type. Only
    /// `application/x-www-form-urlencoded` bodies participate in signing.
    pub fn set_body(&mut self, body: impl Into<String>, content_type: &str) {
        self.body = body.into();
        if let Ok(value) = HeaderValue::from_str(content_type) {
            self.headers.insert(CONTENT_TYPE, value);
        }
    }

    /// Serialize `form` as an urlencoded entity body.
    pub fn set_form<T: Serialize + ?Sized>(&mut self, form: &T) -> RequestResult<()> {
        let body = serde_urlencoded::to_string(form)
            .map_err(|e| RequestError::Form(e.to_string()))?;
        self.set_body(body, FORM_URLENCODED);
        Ok(())
    }

    pub fn transmission(&self) -> Transmission {
        self.transmission
    }

    /// Choose how protocol parameters are transmitted. A form-encoded
    /// body is only defined for POST requests.
    pub fn set_transmission(&mut self, transmission: Transmission) -> RequestResult<()> {
        if transmission == Transmission::FormEncodedBody && self.method != Method::POST {
            return Err(RequestError::UnsupportedTransmission(
                "form-encoded body",
                self.method.to_string(),
            ));
        }
        self.transmission = transmission;
        Ok(())
    }

    /// Set a protocol parameter. Attempts to set `oauth_signature` are
    /// silently dropped; the signature is attached only through
    /// [`Request::attach_signature`] and never participates in the base
    /// string.
    pub fn set_oauth_parameter<V: Into<Value>>(
        &mut self,
        name: &str,
        value: V,
    ) -> ParameterResult<()> {
        if name == OAUTH_SIGNATURE_KEY {
            return Ok(());
        }
        self.oauth_parameters.reset(name, value)
    }

    pub fn set_oauth_parameters<'a, I, V>(&mut self, parameters: I) -> ParameterResult<()>
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Into<Value>,
    {
        for (name, value) in parameters {
            self.set_oauth_parameter(name, value)?;
        }
        Ok(())
    }

    /// Attach a generated signature. The only path that sets
    /// `oauth_signature`.
    pub fn attach_signature(&mut self, signature: &str) {
        let _ = self.oauth_parameters.reset(OAUTH_SIGNATURE_KEY, signature);
    }

    pub fn oauth_parameters(&self) -> &ParameterCollection {
        &self.oauth_parameters
    }

    pub fn add_required_oauth_parameters(&mut self, names: &[&str]) {
        for name in names {
            if !self.required.iter().any(|n| n == name) {
                self.required.push((*name).to_string());
            }
        }
    }

    pub fn add_optional_oauth_parameters(&mut self, names: &[&str]) {
        for name in names {
            if !self.optional.iter().any(|n| n == name) {
                self.optional.push((*name).to_string());
            }
        }
    }

    pub fn required_parameter_names(&self) -> &[String] {
        &self.required
    }

    pub fn optional_parameter_names(&self) -> &[String] {
        &self.optional
    }

    pub fn has_required_parameters(&self) -> bool {
        self.missing_parameters().is_empty()
    }

    /// Required protocol-parameter names not yet present.
    pub fn missing_parameters(&self) -> Vec<String> {
        self.required
            .iter()
            .filter(|name| !self.oauth_parameters.exists(name))
            .cloned()
            .collect()
    }

    /// The base string URI per RFC 5849 section 3.4.1.2: lowercased
    /// scheme and host, the port only when it is not the scheme default,
    /// the path verbatim, no query or fragment.
    pub fn base_string_uri(&self) -> String {
        let scheme = self.url.scheme();
        let host = self.url.host_str().unwrap_or_default();
        let path = match self.url.path() {
            "" => "/",
            path => path,
        };
        // Url::port() is None when the port matches the scheme default
        match self.url.port() {
            Some(port) => format!("{}://{}:{}{}", scheme, host, port, path),
            None => format!("{}://{}{}", scheme, host, path),
        }
    }

    /// Merge the four parameter sources in order: URL query,
    /// `Authorization` header (minus `realm`), form-encoded entity body,
    /// protocol parameters. Later sources append values, never remove.
    /// The result never contains `oauth_signature`.
    pub fn parameters(&self) -> ParameterCollection {
        let query = self
            .url
            .query()
            .map(ParameterCollection::from_query_string);
        let header = self
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(ParameterCollection::from_authorization_header);
        let content_type = self
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let body = ParameterCollection::from_entity_body(&self.body, content_type);

        let mut merged = ParameterCollection::merge(vec![
            query.as_ref(),
            header.as_ref(),
            Some(&body),
            Some(&self.oauth_parameters),
        ]);
        merged.remove(OAUTH_SIGNATURE_KEY);
        merged
    }

    /// Fill in `oauth_nonce` and `oauth_timestamp` where absent, leaving
    /// externally supplied values alone.
    pub fn ensure_nonce_and_timestamp(&mut self) {
        if !self.oauth_parameters.exists(OAUTH_NONCE_KEY) {
            let _ = self.oauth_parameters.reset(OAUTH_NONCE_KEY, generate_nonce());
        }
        if !self.oauth_parameters.exists(OAUTH_TIMESTAMP_KEY) {
            let _ = self
                .oauth_parameters
                .reset(OAUTH_TIMESTAMP_KEY, generate_timestamp());
        }
    }

    /// Override the timestamp, e.g. to accommodate provider clock skew.
    pub fn set_timestamp(&mut self, timestamp: u64) {
        let _ = self.oauth_parameters.reset(OAUTH_TIMESTAMP_KEY, timestamp);
    }

    /// Drop the nonce, timestamp and signature so the request can be
    /// prepared again.
    pub fn regenerate_protocol(&mut self) {
        self.oauth_parameters.remove(OAUTH_NONCE_KEY);
        self.oauth_parameters.remove(OAUTH_TIMESTAMP_KEY);
        self.oauth_parameters.remove(OAUTH_SIGNATURE_KEY);
    }

    /// Render the protocol parameters (including an attached signature)
    /// as an `Authorization: OAuth ...` header value. The optional realm
    /// comes first and never participates in signing.
    pub fn authorization_header(&self, realm: Option<&str>) -> String {
        let mut pairs = Vec::new();
        if let Some(realm) = realm {
            pairs.push(format!(
                "{}=\"{}\"",
                crate::REALM_KEY,
                crate::parameter::percent_encode(realm)
            ));
        }
        for parameter in self.oauth_parameters.iter() {
            pairs.push(format!(
                "{}=\"{}\"",
                parameter.name().percent_encoded(),
                parameter.first_value().percent_encoded()
            ));
        }
        let header = format!("OAuth {}", pairs.join(", "));
        log::debug!("authorization header: {}", header);
        header
    }
}

/// 128 bits from a thread-local CSPRNG, hex encoded. Unique per request
/// and safe to call from concurrent request builders.
fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn generate_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_request(url: &str) -> Request {
        Request::new(RequestKind::ProtectedResource, Method::GET, url).unwrap()
    }

    #[test]
    fn base_string_uri_drops_default_port_and_query() {
        let request = mock_request("http://EXAMPLE.COM:80/r%20v/X?id=123");
        assert_eq!(request.base_string_uri(), "http://example.com/r%20v/X");
    }

    #[test]
    fn base_string_uri_keeps_non_default_ports() {
        let request = mock_request("http://www.example.net:8080/?q=1");
        assert_eq!(request.base_string_uri(), "http://www.example.net:8080/");

        // 443 is only the default for https, 80 only for http
        let request = mock_request("https://example.com:443/resource");
        assert_eq!(request.base_string_uri(), "https://example.com/resource");
        let request = mock_request("https://example.com:80/resource");
        assert_eq!(request.base_string_uri(), "https://example.com:80/resource");
        let request = mock_request("http://example.com:443/resource");
        assert_eq!(request.base_string_uri(), "http://example.com:443/resource");
    }

    #[test]
    fn urls_without_scheme_or_host_are_rejected() {
        for url in &["example.com/request", "ftp://example.com/x", "mailto:me@example.com"] {
            match Request::new(RequestKind::ProtectedResource, Method::GET, url) {
                Err(RequestError::MalformedUrl(_)) => {}
                other => panic!("expected MalformedUrl, got {:?}", other),
            }
        }
    }

    #[test]
    fn required_parameters_default_and_report_missing() {
        let mut request = mock_request("http://example.com/");
        assert!(!request.has_required_parameters());
        assert_eq!(
            request.missing_parameters(),
            vec!["oauth_consumer_key", "oauth_signature_method"]
        );

        request
            .set_oauth_parameter("oauth_consumer_key", "dpf43f3p2l4k3l03")
            .unwrap();
        request
            .set_oauth_parameter("oauth_signature_method", "HMAC-SHA1")
            .unwrap();
        assert!(request.has_required_parameters());

        // unknown parameters do not disturb the check
        request
            .set_oauth_parameter("oauth_nonexistent_value", "foo")
            .unwrap();
        assert!(request.has_required_parameters());
    }

    #[test]
    fn request_kinds_extend_the_required_set() {
        let request = Request::temporary_credentials("https://example.com/initiate").unwrap();
        assert!(request.missing_parameters().contains(&"oauth_callback".to_string()));

        let request = Request::token_credentials("https://example.com/token").unwrap();
        assert!(request.missing_parameters().contains(&"oauth_verifier".to_string()));
    }

    #[test]
    fn signature_cannot_be_set_through_the_generic_path() {
        let mut request = mock_request("http://example.com/");
        request.set_oauth_parameter("oauth_signature", "forged").unwrap();
        assert!(!request.oauth_parameters().exists("oauth_signature"));

        request.attach_signature("r6/TJjbCOr97/+UU0NsvSne7s5g=");
        assert!(request.oauth_parameters().exists("oauth_signature"));
        // and even then it never reaches the merged set
        assert!(!request.parameters().exists("oauth_signature"));
    }

    #[test]
    fn parameters_merge_all_four_sources() {
        let mut request =
            Request::new(RequestKind::ProtectedResource, Method::POST, "http://example.com/?a=1&b=2")
                .unwrap();
        request.set_body("a=3&b=4", FORM_URLENCODED);
        request
            .set_oauth_parameter("oauth_consumer_key", "dpf43f3p2l4k3l03")
            .unwrap();
        request
            .set_oauth_parameter("oauth_signature_method", "HMAC-SHA1")
            .unwrap();

        let merged = request.parameters();
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.get("a").unwrap().normalized(), "a=1&a=3");
        assert_eq!(
            merged.normalized(),
            "a=1&a=3&b=2&b=4&oauth_consumer_key=dpf43f3p2l4k3l03&oauth_signature_method=HMAC-SHA1"
        );
    }

    #[test]
    fn authorization_header_parameters_are_signed_without_realm() {
        let mut request = mock_request("http://example.com/resource");
        request.headers_mut().insert(
            AUTHORIZATION,
            HeaderValue::from_static(
                "OAuth realm=\"Example\", oauth_consumer_key=\"0685bd9184jfhq22\"",
            ),
        );
        let merged = request.parameters();
        assert!(!merged.exists("realm"));
        assert_eq!(
            merged.get("oauth_consumer_key").unwrap().first_value().get(),
            "0685bd9184jfhq22"
        );
    }

    #[test]
    fn non_form_bodies_do_not_participate() {
        let mut request =
            Request::new(RequestKind::ProtectedResource, Method::POST, "http://example.com/")
                .unwrap();
        request.set_body("a=1", "text/plain");
        assert!(request.parameters().is_empty());
    }

    #[test]
    fn nonce_and_timestamp_fill_only_when_absent() {
        let mut request = mock_request("http://example.com/");
        request.set_timestamp(137131201);
        request.set_oauth_parameter("oauth_nonce", "7d8f3e4a").unwrap();
        request.ensure_nonce_and_timestamp();

        let parameters = request.oauth_parameters();
        assert_eq!(parameters.get("oauth_nonce").unwrap().first_value().get(), "7d8f3e4a");
        assert_eq!(
            parameters.get("oauth_timestamp").unwrap().first_value().get(),
            "137131201"
        );
    }

    #[test]
    fn generated_nonces_are_hex_and_unique() {
        let first = generate_nonce();
        let second = generate_nonce();
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[test]
    fn regenerate_clears_per_request_parameters() {
        let mut request = mock_request("http://example.com/");
        request.ensure_nonce_and_timestamp();
        request.attach_signature("sig");
        request.regenerate_protocol();

        let parameters = request.oauth_parameters();
        assert!(!parameters.exists("oauth_nonce"));
        assert!(!parameters.exists("oauth_timestamp"));
        assert!(!parameters.exists("oauth_signature"));
    }

    #[test]
    fn form_body_transmission_requires_post() {
        let mut request = mock_request("http://example.com/");
        match request.set_transmission(Transmission::FormEncodedBody) {
            Err(RequestError::UnsupportedTransmission(_, method)) => assert_eq!(method, "GET"),
            other => panic!("expected UnsupportedTransmission, got {:?}", other),
        }

        let mut request =
            Request::new(RequestKind::ProtectedResource, Method::POST, "http://example.com/")
                .unwrap();
        request.set_transmission(Transmission::FormEncodedBody).unwrap();
        assert_eq!(request.transmission(), Transmission::FormEncodedBody);
    }

    #[test]
    fn rendered_authorization_header_quotes_and_encodes() {
        let mut request = mock_request("http://example.com/");
        request.set_oauth_parameter("oauth_consumer_key", "9djdj82h48djs9d2").unwrap();
        request.attach_signature("r6/TJjbCOr97/+UU0NsvSne7s5g=");

        let header = request.authorization_header(Some("Example"));
        assert!(header.starts_with("OAuth realm=\"Example\", "));
        assert!(header.contains("oauth_consumer_key=\"9djdj82h48djs9d2\""));
        assert!(header.contains("oauth_signature=\"r6%2FTJjbCOr97%2F%2BUU0NsvSne7s5g%3D\""));
    }

    #[test]
    fn set_form_serializes_pairs() {
        let mut request =
            Request::new(RequestKind::ProtectedResource, Method::POST, "http://example.com/")
                .unwrap();
        request.set_form(&[("status", "Hello Ladies + Gentlemen!")]).unwrap();
        assert_eq!(request.body(), "status=Hello+Ladies+%2B+Gentlemen%21");
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            FORM_URLENCODED
        );
    }
}
