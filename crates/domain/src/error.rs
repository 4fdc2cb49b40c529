/// Shared error type used across all Concierge crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    /// A collaborator (completion service, escalation gateway) answered with
    /// an error status or an unusable body.
    #[error("{service}: {message}")]
    Upstream {
        service: String,
        status: Option<u16>,
        message: String,
    },

    /// Every retry attempt against `service` failed with a transient error.
    #[error("{service}: gave up after {attempts} attempts")]
    RetriesExhausted { service: String, attempts: u32 },

    #[error("config: {0}")]
    Config(String),

    #[error("auth: {0}")]
    Auth(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether a retry could plausibly succeed.
    ///
    /// Timeouts, transport failures, 429 and 5xx answers are transient.
    /// Client errors, malformed bodies and exhausted retries are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Timeout(_) | Error::Http(_) => true,
            Error::Upstream {
                status: Some(status),
                ..
            } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_and_server_errors_are_transient() {
        assert!(Error::Timeout("slow".into()).is_transient());
        assert!(Error::Http("reset".into()).is_transient());
        let upstream = Error::Upstream {
            service: "completion".into(),
            status: Some(503),
            message: "unavailable".into(),
        };
        assert!(upstream.is_transient());
        let throttled = Error::Upstream {
            service: "completion".into(),
            status: Some(429),
            message: "slow down".into(),
        };
        assert!(throttled.is_transient());
    }

    #[test]
    fn client_errors_are_fatal() {
        let bad_request = Error::Upstream {
            service: "completion".into(),
            status: Some(400),
            message: "bad".into(),
        };
        assert!(!bad_request.is_transient());
        let exhausted = Error::RetriesExhausted {
            service: "completion".into(),
            attempts: 3,
        };
        assert!(!exhausted.is_transient());
        assert!(!Error::Config("x".into()).is_transient());
    }
}
