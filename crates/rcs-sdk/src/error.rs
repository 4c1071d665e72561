use thiserror::Error;

/// Errors returned by repositories and the SDK client.
///
/// HTTP failures are classified by status code. Each HTTP variant carries the
/// status and the raw response body.
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("bad request ({status}): {body}")]
    BadRequest { status: u16, body: String },

    #[error("unauthorized ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    #[error("forbidden ({status}): {body}")]
    Forbidden { status: u16, body: String },

    #[error("not found ({status}): {body}")]
    NotFound { status: u16, body: String },

    #[error("conflict ({status}): {body}")]
    Conflict { status: u16, body: String },

    #[error("gone ({status}): {body}")]
    Gone { status: u16, body: String },

    #[error("internal server error ({status}): {body}")]
    InternalServerError { status: u16, body: String },

    /// A status that is neither success nor a client or server error.
    #[error("unexpected status ({status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("no class metadata registered for key {0:?}")]
    UnknownMetadata(String),

    /// The entity has no value for its identifier attribute.
    #[error("entity of {0:?} has no identifier value")]
    MissingEntityId(String),

    /// The response body does not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("mapping error: {0}")]
    Mapping(#[from] rcs_mapping::MappingError),

    #[error("diff error: {0}")]
    Diff(#[from] rcs_diff::DiffError),

    #[error("auth error: {0}")]
    Auth(#[from] rcs_auth::AuthError),

    #[error("type error: {0}")]
    Type(#[from] rcs_types::TypeError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;

impl SdkError {
    /// Classify a non-success HTTP response.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 => Self::BadRequest { status, body },
            401 => Self::Unauthorized { status, body },
            403 => Self::Forbidden { status, body },
            404 => Self::NotFound { status, body },
            409 => Self::Conflict { status, body },
            410 => Self::Gone { status, body },
            402..=499 => Self::BadRequest { status, body },
            500..=599 => Self::InternalServerError { status, body },
            _ => Self::UnexpectedStatus { status, body },
        }
    }

    /// The HTTP status, for errors that come from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { status, .. }
            | Self::Unauthorized { status, .. }
            | Self::Forbidden { status, .. }
            | Self::NotFound { status, .. }
            | Self::Conflict { status, .. }
            | Self::Gone { status, .. }
            | Self::InternalServerError { status, .. }
            | Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The raw response body, for errors that come from a response.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::BadRequest { body, .. }
            | Self::Unauthorized { body, .. }
            | Self::Forbidden { body, .. }
            | Self::NotFound { body, .. }
            | Self::Conflict { body, .. }
            | Self::Gone { body, .. }
            | Self::InternalServerError { body, .. }
            | Self::UnexpectedStatus { body, .. } => Some(body),
            _ => None,
        }
    }
}
