use crate::models::FailureKind;
use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::internal(err)
    }
}

impl From<ReadingError> for AppError {
    fn from(err: ReadingError) -> Self {
        let status = match err.kind() {
            FailureKind::MappingUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            FailureKind::NoMapping => StatusCode::NOT_FOUND,
            FailureKind::InvalidRange => StatusCode::UNPROCESSABLE_ENTITY,
            FailureKind::FetchFailed => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Errors from loading or resolving the hizb mapping document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MappingError {
    #[error("failed to read mapping file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("mapping file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("mapping document is neither keyed by hizb number nor a list of hizb records")]
    UnrecognizedShape,
    #[error("no verse mapping for hizb {0}")]
    NoMapping(u8),
    #[error("hizb {hizb}: invalid surah number {key:?}")]
    InvalidSurah { hizb: u8, key: String },
    #[error("hizb {hizb}, surah {surah}: invalid verse range {range}")]
    InvalidRange { hizb: u8, surah: u16, range: String },
}

/// Errors from the remote verse source. Each carries the surah it was for.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("request for surah {surah} failed: {message}")]
    Transport { surah: u16, message: String },
    #[error("verse api returned status {status} for surah {surah}")]
    Status { surah: u16, status: u16 },
    #[error("unexpected response body for surah {surah}: {message}")]
    Body { surah: u16, message: String },
}

impl FetchError {
    pub fn surah(&self) -> u16 {
        match self {
            Self::Transport { surah, .. } | Self::Status { surah, .. } | Self::Body { surah, .. } => {
                *surah
            }
        }
    }
}

/// Everything that can stop a hizb from opening in the reading pane.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReadingError {
    #[error("hizb mapping is not loaded: {0}")]
    MappingUnavailable(String),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ReadingError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MappingUnavailable(_) => FailureKind::MappingUnavailable,
            Self::Mapping(MappingError::InvalidSurah { .. } | MappingError::InvalidRange { .. }) => {
                FailureKind::InvalidRange
            }
            Self::Mapping(MappingError::NoMapping(_)) => FailureKind::NoMapping,
            Self::Mapping(_) => FailureKind::MappingUnavailable,
            Self::Fetch(_) => FailureKind::FetchFailed,
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
