use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for integrity operations
pub type Result<T> = std::result::Result<T, IntegrityError>;

/// Errors that can occur while loading references, hashing, or evaluating
#[derive(Error, Debug)]
pub enum IntegrityError {
    /// The requested binary image could not be resolved to exactly one image
    #[error("image not found: {image}")]
    ImageNotFound {
        /// Description of the image reference that failed to resolve
        image: String,
    },

    /// A file to be hashed does not exist
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// A file exists but could not be read
    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        /// Path being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// One or more requested checks have no reference value loaded
    #[error("insufficient reference data: missing {}", missing.join(", "))]
    InsufficientReferenceData {
        /// Canonical names of the missing reference keys
        missing: Vec<String>,
    },

    /// An evaluation was requested with an empty check list
    #[error("no checks requested")]
    NoChecksRequested,

    /// The host platform did not report an application identity
    #[error("bundle identity unavailable")]
    BundleIdentityUnavailable,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Server answered with a non-success status
    #[error("unexpected HTTP status {code} from {url}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        code: u16,
    },

    /// Request timed out
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Reference body could not be used as a value
    #[error("invalid reference value: {0}")]
    InvalidReference(String),

    /// Unknown or malformed reference key
    #[error("invalid reference key: {0}")]
    InvalidKey(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl IntegrityError {
    /// Build a file error from an I/O error, keeping "not found" distinct.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::FileRead { path, source }
        }
    }

    /// Returns true if the error means a measurement could not be taken.
    ///
    /// These are operational failures and never evidence of tampering.
    #[must_use]
    pub const fn is_operational(&self) -> bool {
        matches!(
            self,
            Self::ImageNotFound { .. }
                | Self::FileNotFound { .. }
                | Self::FileRead { .. }
                | Self::BundleIdentityUnavailable
        )
    }

    /// Returns true if the error comes from fetching reference values
    #[must_use]
    pub const fn is_reference_error(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Status { .. }
                | Self::Timeout(_)
                | Self::InvalidUrl(_)
                | Self::InvalidReference(_)
        )
    }

    /// Returns the HTTP status code if this is a status error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}
