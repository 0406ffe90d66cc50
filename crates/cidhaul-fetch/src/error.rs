//! Error types for cidhaul-fetch.

use cidhaul_core::Cid;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Every configured attempt was spent without a qualifying
    /// response. This is definitive for one identifier; the caller
    /// decides whether the batch continues.
    #[error("no gateway produced {cid} after {attempts} attempts")]
    Exhausted { cid: Cid, attempts: u32 },

    #[error("no gateways configured")]
    NoGateways,

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}
