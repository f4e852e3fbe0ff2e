use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// A required API key is absent. Checked before any outbound call is
    /// issued, so an operation failing with this variant made zero requests.
    #[error("{0} API key not configured")]
    Configuration(&'static str),

    /// Transport failure reaching an upstream service, including timeouts.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status code.
    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),

    /// A 200 body carrying the ratings service's logical not-found signal
    /// (`Response: "False"`). Absorbed during enrichment, never surfaced
    /// from a detail lookup.
    #[error("ratings lookup rejected: {0}")]
    NotFound(String),

    /// Response body present but not decodable into the expected shape.
    #[error("failed to decode upstream response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
