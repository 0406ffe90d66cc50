use std::time::Duration;

use bytes::Bytes;
use cidhaul_core::Cid;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::http::{HttpClient, HttpResponse};

/// Configuration for gateway retrieval.
///
/// The defaults encode a patience-over-failure policy: freshly
/// published content may still be propagating through the
/// peer-to-peer network, so attempts are spaced by a long fixed delay
/// rather than an exponential transient-blip backoff, for a bounded
/// total wait of roughly thirteen minutes per identifier.
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// Ordered gateway base URLs; attempts rotate through the list so
    /// an unresponsive gateway is routed around without burning the
    /// whole attempt budget on it. Default: the ipfs.io gateway.
    pub gateways: Vec<String>,

    /// Total number of requests issued before giving up. Default: 40.
    pub max_attempts: u32,

    /// Fixed delay between attempts. Default: 20 seconds.
    pub retry_delay: Duration,

    /// A 200 response qualifies only when the body is strictly larger
    /// than this, guarding against gateways that return a small
    /// "not found" placeholder with a success status. Default: 1000.
    pub min_body_len: usize,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            gateways: vec!["https://ipfs.io/ipfs".to_string()],
            max_attempts: 40,
            retry_delay: Duration::from_secs(20),
            min_body_len: 1000,
        }
    }
}

impl GatewayOptions {
    /// The well-known public gateways, in fallback order.
    pub fn public_gateways() -> Vec<String> {
        [
            "https://ipfs.io/ipfs",
            "https://gateway.pinata.cloud/ipfs",
            "https://cloudflare-ipfs.com/ipfs",
            "https://dweb.link/ipfs",
            "https://gateway.ipfs.io/ipfs",
        ]
        .map(String::from)
        .to_vec()
    }

    pub fn gateways(mut self, gateways: Vec<String>) -> Self {
        self.gateways = gateways;
        self
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn min_body_len(mut self, min_body_len: usize) -> Self {
        self.min_body_len = min_body_len;
        self
    }
}

/// Retrieves single identifiers through an ordered set of gateways.
pub struct GatewayFetcher<C: HttpClient> {
    client: C,
    options: GatewayOptions,
}

impl<C: HttpClient> GatewayFetcher<C> {
    /// Create a fetcher. An empty gateway list is a configuration
    /// error and is rejected before any work begins.
    pub fn new(client: C, options: GatewayOptions) -> Result<Self, FetchError> {
        if options.gateways.is_empty() {
            return Err(FetchError::NoGateways);
        }
        Ok(Self { client, options })
    }

    pub fn options(&self) -> &GatewayOptions {
        &self.options
    }

    fn url_for(&self, attempt: u32, cid: &Cid) -> String {
        let gateways = &self.options.gateways;
        let base = &gateways[attempt as usize % gateways.len()];
        format!("{}/{}", base.trim_end_matches('/'), cid)
    }

    /// Fetch the content behind one identifier.
    ///
    /// Transport errors and non-qualifying responses are treated
    /// identically: each counts as one failed attempt, followed by
    /// the fixed delay. Exhausting every attempt returns a definitive
    /// [`FetchError::Exhausted`]; the caller decides whether the
    /// batch continues.
    pub async fn fetch(&self, cid: &Cid) -> Result<Bytes, FetchError> {
        for attempt in 0..self.options.max_attempts {
            if attempt > 0 {
                tokio::time::sleep(self.options.retry_delay).await;
            }
            let url = self.url_for(attempt, cid);
            match self.client.get(&url).await {
                Ok(HttpResponse { status: 200, body })
                    if body.len() > self.options.min_body_len =>
                {
                    debug!(cid = %cid, bytes = body.len(), attempt, "gateway hit");
                    return Ok(body);
                }
                Ok(response) => {
                    debug!(
                        cid = %cid,
                        url = %url,
                        status = response.status,
                        bytes = response.body.len(),
                        "non-qualifying response"
                    );
                }
                Err(err) => {
                    debug!(cid = %cid, url = %url, error = %err, "request failed");
                }
            }
        }
        warn!(
            cid = %cid,
            attempts = self.options.max_attempts,
            "exhausted all gateway attempts"
        );
        Err(FetchError::Exhausted {
            cid: cid.clone(),
            attempts: self.options.max_attempts,
        })
    }
}
