//! Signature base string construction and the HMAC-SHA1 signer,
//! per [RFC 5849 section 3.4](https://tools.ietf.org/html/rfc5849#section-3.4).

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::credentials::{Consumer, TokenCredential};
use crate::error::{SignError, SignResult};
use crate::parameter::percent_encode;
use crate::request::Request;
use crate::OAUTH_SIGNATURE_METHOD_KEY;

/// The `oauth_signature_method` name this signer announces.
pub const HMAC_SHA1: &str = "HMAC-SHA1";

/// Computes `HMAC-SHA1` signatures over the request base string.
#[derive(Debug, Clone, Default)]
pub struct HmacSha1Signer {
    consumer: Option<Consumer>,
    token_secret: Option<String>,
}

impl HmacSha1Signer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_consumer(consumer: Consumer) -> Self {
        HmacSha1Signer {
            consumer: Some(consumer),
            token_secret: None,
        }
    }

    pub fn set_consumer_credential(&mut self, consumer: Consumer) {
        self.consumer = Some(consumer);
    }

    /// Supply temporary or access credentials; only the shared secret
    /// participates in the signing key.
    pub fn set_token_credential<T: TokenCredential>(&mut self, credential: &T) {
        self.token_secret = Some(credential.secret().to_string());
    }

    pub fn signature_method(&self) -> &'static str {
        HMAC_SHA1
    }

    /// `VERB&percent(base-string-URI)&percent(normalized-parameters)`.
    ///
    /// Sets `oauth_signature_method` on the request first: the method
    /// name is itself a protocol parameter and must participate in
    /// normalization. The two `&` separators stay literal.
    pub fn base_string(&self, request: &mut Request) -> String {
        let _ = request.set_oauth_parameter(OAUTH_SIGNATURE_METHOD_KEY, HMAC_SHA1);

        let base = format!(
            "{}&{}&{}",
            request.method().as_str().to_uppercase(),
            percent_encode(&request.base_string_uri()),
            percent_encode(&request.parameters().normalized()),
        );
        log::debug!("signature base string: {}", base);
        base
    }

    /// Generate the base64-encoded HMAC-SHA1 signature for `request`.
    ///
    /// Fails before any cryptographic work when required protocol
    /// parameters are missing or no consumer credential is present. The
    /// only side effect is the signature-method parameter set while
    /// building the base string.
    pub fn generate_signature(&self, request: &mut Request) -> SignResult<String> {
        let base = self.base_string(request);

        if !request.has_required_parameters() {
            return Err(SignError::MissingRequiredParameters(
                request.missing_parameters(),
            ));
        }
        let consumer = self.consumer.as_ref().ok_or(SignError::MissingCredential)?;

        let key = format!(
            "{}&{}",
            percent_encode(consumer.secret()),
            percent_encode(self.token_secret.as_deref().unwrap_or_default()),
        );
        let mut mac =
            Hmac::<Sha1>::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
        mac.update(base.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}
