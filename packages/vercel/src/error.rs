// ABOUTME: Error type for Vercel API operations

use thiserror::Error;

/// Vercel operation errors
#[derive(Error, Debug)]
pub enum VercelError {
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx answer from the Vercel API. Carries the upstream status so
    /// callers can pass it through.
    #[error("Vercel API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type VercelResult<T> = Result<T, VercelError>;

impl VercelError {
    /// The upstream HTTP status, when the error came from a Vercel response.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            VercelError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
