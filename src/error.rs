//! Error type shared by every conversion in the crate.

use thiserror::Error;

/// Represents errors that can occur while converting or rendering X.509 structures.
///
/// Every fallible conversion in the crate returns this type; a value is either
/// fully built or an error is returned, never a partially populated value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CertificationError {
    /// The text is neither a dotted identifier nor a registered name.
    #[error("Invalid object identifier: {0}")]
    InvalidObjectIdentifier(String),

    /// The dotted form was requested from an identifier that holds none.
    #[error("Object identifier is undefined")]
    UndefinedObjectIdentifier,

    /// No registry entry carries this id.
    #[error("Unknown object identifier id: {0}")]
    UnknownNid(i32),

    /// The identifier or its name is already present in the registry.
    #[error("Object identifier already registered: {0}")]
    AlreadyRegistered(String),

    /// A native extension record was handed to the wrong typed extension.
    #[error("Extension mismatch: expected {expected}, found {found}")]
    ExtensionMismatch { expected: String, found: String },

    /// A value that must be set before conversion is still undefined.
    #[error("Undefined value: {0}")]
    UndefinedValue(String),

    /// The native structure uses a form this crate does not model.
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// Error due to invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),
}

impl From<der::Error> for CertificationError {
    /// Converts a `der::Error` into a `CertificationError`.
    fn from(err: der::Error) -> Self {
        CertificationError::DecodingError(err.to_string())
    }
}

impl CertificationError {
    /// Maps a `der::Error` raised while building native structures.
    pub(crate) fn encoding(err: der::Error) -> Self {
        CertificationError::EncodingError(err.to_string())
    }
}

impl From<pem::PemError> for CertificationError {
    fn from(err: pem::PemError) -> Self {
        CertificationError::DecodingError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CertificationError>;
