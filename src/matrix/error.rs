use thiserror::Error;

/// Failures talking to the homeserver
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("homeserver returned {status}: {errcode} ({error})")]
    Api {
        status: u16,
        errcode: String,
        error: String,
    },

    #[error("invalid homeserver URL: {0}")]
    InvalidUrl(String),
}

impl MatrixError {
    /// True when the homeserver reported the resource as absent
    pub fn is_not_found(&self) -> bool {
        match self {
            MatrixError::Api { status, errcode, .. } => errcode == "M_NOT_FOUND" || *status == 404,
            _ => false,
        }
    }
}
