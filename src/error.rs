//! Error types shared by the form, mail, and configuration layers.
//!
//! Validation problems are user-facing: their `Display` text is shown verbatim
//! next to the offending control, so the wording matters more than the shape.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a submission is rejected before anything is serialized or sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Submission is disabled in example mode. Press Ctrl+E to clear the example first.")]
    ExampleMode,
    #[error("Club Name is required.")]
    MissingClubName,
    #[error("Please enter the club's name or unique identifier.")]
    MissingIdentifier,
    #[error("Please select at least one section to update.")]
    NoSectionSelected,
    #[error("Date must use the YYYY-MM-DD format.")]
    InvalidDate,
    #[error("Unsupported picture type. Accepted types: jpg, jpeg, png.")]
    UnsupportedImageType,
    #[error("File size exceeds the maximum limit of 30 MB. Please upload a smaller file.")]
    ImageTooLarge { size: u64 },
    #[error("Could not read {}: {reason}", path.display())]
    ImageUnreadable { path: PathBuf, reason: String },
}

/// Failures while composing or transmitting an email. Every variant renders
/// with the same prefix so the UI can show it unchanged.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Failed to send email: invalid address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("Failed to send email: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),
    #[error("Failed to send email: {0}")]
    Compose(#[from] lettre::error::Error),
    #[error("Failed to send email: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

/// Problems locating or parsing the on-disk configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate home directory")]
    NoHomeDir,
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
