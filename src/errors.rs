/// All error types that can occur when talking to a strip controller.
///
/// Every variant carries the device host so failure reports stay actionable
/// when several devices are registered.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The device did not answer within the allotted time.
    #[error("timeout communicating with device at {host}")]
    Timeout { host: String },

    /// The HTTP transport failed below the protocol level (connection
    /// refused, reset, DNS, ...).
    #[error("error communicating with device at {host}: {source}")]
    Transport {
        host: String,
        source: reqwest::Error,
    },

    /// The device answered with a status other than 200.
    #[error("device at {host} returned status {status}")]
    UnexpectedStatus { host: String, status: u16 },

    /// The response body could not be decoded as the expected JSON shape.
    #[error("invalid response from device at {host}: {source}")]
    InvalidBody {
        host: String,
        source: reqwest::Error,
    },

    /// The info response carried no usable device identity.
    #[error("device at {host} reported no identity")]
    MissingIdentity { host: String },
}

impl Error {
    /// Create a new timeout error
    pub fn timeout(host: &str) -> Self {
        Error::Timeout {
            host: host.to_string(),
        }
    }

    /// Create a new unexpected-status error
    pub fn unexpected_status(host: &str, status: u16) -> Self {
        Error::UnexpectedStatus {
            host: host.to_string(),
            status,
        }
    }

    /// Create a new missing-identity error
    pub fn missing_identity(host: &str) -> Self {
        Error::MissingIdentity {
            host: host.to_string(),
        }
    }

    /// Classify a reqwest failure into the taxonomy above.
    pub(crate) fn from_reqwest(host: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::timeout(host)
        } else if err.is_decode() {
            Error::InvalidBody {
                host: host.to_string(),
                source: err,
            }
        } else {
            Error::Transport {
                host: host.to_string(),
                source: err,
            }
        }
    }

    /// True when the device was unreachable (timeout or transport failure).
    ///
    /// Unreachable devices are retried on the next scheduled cycle.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Error::Timeout { .. } | Error::Transport { .. })
    }

    /// True when the device answered but violated the protocol.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Error::UnexpectedStatus { .. } | Error::InvalidBody { .. } | Error::MissingIdentity { .. }
        )
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

/// Classified outcome of a failed setup-time validation.
///
/// Validation failures block the device from being registered; the two
/// variants map to the two messages a configuration UI can act on.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The address could not be reached, or whatever answered does not look
    /// like a strip controller.
    #[error("cannot connect: {0}")]
    CannotConnect(#[source] Error),

    /// A failure that fixing the address or retrying will not help.
    #[error("unexpected error: {0}")]
    Unknown(#[source] Error),
}

impl SetupError {
    /// The underlying communication error.
    pub fn inner(&self) -> &Error {
        match self {
            SetupError::CannotConnect(err) | SetupError::Unknown(err) => err,
        }
    }

    pub(crate) fn classify(err: Error) -> Self {
        match err {
            Error::InvalidBody { .. } => SetupError::Unknown(err),
            _ => SetupError::CannotConnect(err),
        }
    }
}
