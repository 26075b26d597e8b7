//! Structured error types for the Folio engine.
//!
//! The layout/override/selection core is total — nothing in it raises
//! for ordinary input. Errors exist only at the edges: parsing template
//! JSON, talking to the remote services, and decoding an export payload.

use thiserror::Error;

/// The unified error type returned by fallible Folio API functions.
#[derive(Debug, Error)]
pub enum FolioError {
    /// JSON input failed to parse as a template or service payload.
    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request to the template or render service failed in transit.
    #[error("service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The render service answered without a usable PDF payload. Carries
    /// the server's message when it sent one.
    #[error("PDF export unavailable: {0}")]
    Export(String),

    /// The `pdfBase64` payload was not valid base64.
    #[error("invalid PDF payload: {0}")]
    Decode(#[from] base64::DecodeError),
}
