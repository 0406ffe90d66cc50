use std::future::Future;
use std::time::Duration;

use bytes::Bytes;

use crate::error::FetchError;

/// A minimal HTTP response: status code plus the fully buffered body.
///
/// Gateway payloads are classified by magic bytes and rewritten to
/// disk whole, so there is nothing to gain from streaming them.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

/// Asynchronous HTTP client abstraction.
///
/// The gateway fetcher only issues GET requests and inspects status
/// and body length, so the trait surface stays minimal.
/// Implementations handle their own timeout configuration and
/// redirect following.
pub trait HttpClient: Send + Sync {
    /// Error type for HTTP operations.
    type Error: std::error::Error + Send + 'static;

    /// Issue a GET request and buffer the full response body.
    ///
    /// An HTTP error status is not an `Err`: the fetcher judges
    /// responses by status and size, and a transport failure and a
    /// bad response are retried identically anyway.
    fn get(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;
}

/// Some gateways serve placeholder pages to unknown clients; a
/// browser-like User-Agent keeps them honest.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux aarch64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Production HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a client with the standard per-request timeout and
    /// User-Agent.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    type Error = reqwest::Error;

    async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(HttpResponse { status, body })
    }
}
