//! Application error types.
//!
//! Defines `AppError` for all error conditions in the sync pipelines, the
//! GitLab client and the UML factory. User-cancellation and empty-result
//! conditions are not errors: the pipelines report those as normal result
//! messages. `AppError` covers transport failures, non-2xx API responses,
//! malformed documents and factory preconditions.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("File content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Non-2xx response from the GitLab API. No retry, no backoff; the
    /// failing call carries the status and response text to the caller.
    #[error("API returned status {status}: {text}")]
    Api { status: u16, text: String },

    #[error("No GitLab group found for namespace: {0}")]
    GroupNotFound(String),

    #[error("Project document is not a JSON object")]
    InvalidDocument,

    #[error("Project document has no element of type {0}")]
    MissingSection(&'static str),

    #[error("Geen \"Stereotype\" met de naam \"{0}\" gevonden!")]
    StereotypeNotFound(String),

    #[error("Twee of meer \"Stereotypen\" met de naam \"{0}\" gevonden!")]
    AmbiguousStereotype(String),

    #[error("Geen \"UMLClass\" met de naam \"{0}\" gevonden!")]
    ClassNotFound(String),

    #[error("Element \"{0}\" is geen <<Objecttype>>!")]
    NotAnObjecttype(String),

    /// The project was never retrieved from a repository, so a store has no
    /// destination. Fail fast instead of guessing.
    #[error("Project is niet aan een repository gekoppeld; eerst Model Data ophalen!")]
    NoBoundRepository,
}

impl AppError {
    /// HTTP status of an `Api` error, if that is what this is.
    pub fn api_status(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
