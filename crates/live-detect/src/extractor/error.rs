use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("{}", describe_http_error(.0))]
    HttpError(#[from] reqwest::Error),
    #[error("unresolvable channel reference: {0}")]
    UnresolvableChannel(String),
    #[error("other: {0}")]
    Other(String),
}

impl ExtractorError {
    /// Whether the underlying request ran past its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExtractorError::HttpError(e) if e.is_timeout())
    }
}

fn describe_http_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("http timeout: {e}")
    } else if let Some(status) = e.status() {
        format!("http status {status}: {e}")
    } else {
        format!("http error: {e}")
    }
}
