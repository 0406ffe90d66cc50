//! Gateway retrieval for content-addressed assets.
//!
//! Policy and transport are split: [`GatewayFetcher`] owns the retry
//! and fallback policy, while the [`HttpClient`] trait keeps the
//! transport swappable — [`ReqwestClient`] in production, in-memory
//! mocks in tests.

mod error;
mod gateway;
mod http;

pub use error::FetchError;
pub use gateway::{GatewayFetcher, GatewayOptions};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
