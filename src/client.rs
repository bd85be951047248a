//! Orchestration of one signed exchange with the service provider.

use crate::connector::{Connector, HttpResponse};
use crate::error::Result;
use crate::request::Request;
use crate::signer::HmacSha1Signer;
use crate::OAUTH_VERSION_KEY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unprepared,
    Prepared,
    Executed,
}

/// Drives a [`Request`] through `unprepared -> prepared -> executed`.
///
/// `prepare` generates the per-request protocol parameters, signs, and
/// hands the request to the connector; `execute` delegates the network
/// exchange. Redirection and retries are left entirely to the caller and
/// the connector.
#[derive(Debug)]
pub struct OAuthClient<C: Connector> {
    connector: C,
    request: Request,
    signer: HmacSha1Signer,
    state: State,
}

impl<C: Connector> OAuthClient<C> {
    pub fn new(connector: C, mut request: Request, signer: HmacSha1Signer) -> Self {
        // oauth_version is optional and fixed at "1.0" when present
        let _ = request.set_oauth_parameter(OAUTH_VERSION_KEY, "1.0");
        OAuthClient {
            connector,
            request,
            signer,
            state: State::Unprepared,
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    /// Generate nonce and timestamp where absent, sign, attach the
    /// signature, and hand the request to the connector. Call
    /// [`OAuthClient::reset`] before preparing the same request again.
    pub fn prepare(&mut self) -> Result<()> {
        self.request.ensure_nonce_and_timestamp();
        let signature = self.signer.generate_signature(&mut self.request)?;
        self.request.attach_signature(&signature);
        self.connector.prepare(&self.request)?;
        self.state = State::Prepared;
        Ok(())
    }

    /// Execute the exchange, preparing first when not yet done.
    pub async fn execute(&mut self) -> Result<()> {
        if self.state == State::Unprepared {
            self.prepare()?;
        }
        self.connector.execute().await?;
        self.state = State::Executed;
        Ok(())
    }

    /// The connector's response; `None` until executed.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self.state {
            State::Executed => self.connector.response(),
            _ => None,
        }
    }

    /// Return to the unprepared state, dropping the per-request nonce,
    /// timestamp and signature so the request can be reused.
    pub fn reset(&mut self) {
        self.request.regenerate_protocol();
        self.state = State::Unprepared;
    }
}
