use std::sync::Arc;

use aws_sdk_s3::error::DisplayErrorContext;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building a [`Resolver`](crate::Resolver) or looking up a toggle.
///
/// Configuration errors are returned from construction and must be handled by the caller.
/// Lookup errors never reach callers of [`Resolver::is_enabled`](crate::Resolver::is_enabled);
/// they are only observable through [`Resolver::try_is_enabled`](crate::Resolver::try_is_enabled)
/// and the log.
#[derive(thiserror::Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// No options were supplied.
    #[error("missing options")]
    MissingOptions,

    /// Options were supplied but contain no configuration.
    #[error("empty configuration")]
    EmptyConfiguration,

    /// A backend is configured but `aws.region` is absent or null.
    #[error("missing region")]
    MissingRegion,

    /// The S3 block is present but `bucket` is absent or null.
    #[error("missing bucket")]
    MissingBucket,

    /// The DynamoDB block is present but `tableName` is absent or null.
    #[error("missing table name")]
    MissingTableName,

    /// Options could not be deserialized.
    #[error("invalid options")]
    // serde_json::Error is not clonable, so we're wrapping it in an Arc.
    InvalidOptions(#[source] Arc<serde_json::Error>),

    /// The backend has no record for the requested toggle.
    #[error("toggle record not found")]
    ToggleNotFound,

    /// The object body is not valid UTF-8.
    #[error("toggle record is not valid UTF-8")]
    InvalidUtf8(#[source] std::str::Utf8Error),

    /// The object body is not a valid JSON toggle record.
    #[error("failed to parse toggle record")]
    InvalidRecord(#[source] Arc<serde_json::Error>),

    /// A record attribute has an unexpected type.
    #[error("attribute {name:?} has unexpected type")]
    InvalidAttribute {
        /// Attribute name.
        name: String,
    },

    /// The backend request failed (network, authorization, missing bucket or table, ...).
    ///
    /// The message includes the whole source chain, so transport and credential failures show
    /// their cause.
    #[error("backend request failed: {}", DisplayErrorContext(.0.as_ref()))]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Returns `true` if this error is raised by configuration validation.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Error::MissingOptions
                | Error::EmptyConfiguration
                | Error::MissingRegion
                | Error::MissingBucket
                | Error::MissingTableName
                | Error::InvalidOptions(_)
        )
    }

    /// Wrap an arbitrary backend failure.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Backend(Arc::new(err))
    }
}
