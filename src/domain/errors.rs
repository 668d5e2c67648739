/// Failure talking to one of the remote services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced a response.
    #[error("HTTP error calling {endpoint}: {message}")]
    Transport { endpoint: String, message: String },
    /// The service answered with a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The response body did not have the expected shape.
    #[error("failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

/// Failure copying text to the system clipboard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    /// No clipboard could be opened (headless session, missing display server).
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("could not write to the clipboard: {0}")]
    Write(String),
}

/// Failure of the quote or posting operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("package details have not been filled in")]
    MissingPackage,
    #[error("freight has not been calculated")]
    MissingFreight,
    #[error("the pricing service returned no offers")]
    NoOffers,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl WizardError {
    /// True for errors raised before any request was sent.
    pub fn is_precondition(&self) -> bool {
        matches!(self, WizardError::MissingPackage | WizardError::MissingFreight)
    }
}

/// Result of a quote or posting operation.
pub type WizardResult<T> = Result<T, WizardError>;
