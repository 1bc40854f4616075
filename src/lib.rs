//! Feature toggles stored in AWS S3 or AWS DynamoDB.
//!
//! # Overview
//!
//! A [`Resolver`] answers one question: is the toggle with a given name enabled? Each toggle is a
//! small record with an `isEnabled` flag, stored either as a JSON object in an S3 bucket (the
//! object key is the toggle name) or as an item in a DynamoDB table (the partition key is the
//! toggle name).
//!
//! Resolvers are created from [`Options`], which are validated up-front: a missing region, bucket
//! or table name is reported as an [`Error`] before the resolver exists. Every lookup fetches the
//! record from the backend; there is no cache, no retry and no local fallback.
//!
//! ```no_run
//! # async fn run() -> cloud_feature_toggles::Result<()> {
//! use cloud_feature_toggles::Options;
//!
//! let resolver = Options::from_json_str(
//!     r#"{ "aws": { "region": "eu-west-1", "s3": { "bucket": "feature-toggles" } } }"#,
//! )?
//! .to_resolver()
//! .await?;
//!
//! let enabled = resolver.is_enabled("new-checkout").await;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Configuration errors are returned by [`Resolver::new`]. Lookups are best-effort:
//! [`Resolver::is_enabled`] never fails, and any backend error, missing record or malformed
//! payload resolves to `false`. [`Resolver::try_is_enabled`] returns the underlying error, which
//! is useful for debugging.
//!
//! # Logging
//!
//! The crate uses the [`log`](https://docs.rs/log/latest/log/) crate. Failed lookups are reported
//! as warnings prefixed with `[cloud-feature-toggles]` under the `cloud_feature_toggles` target.
//!
//! # Custom backends
//!
//! The [`ObjectStore`] and [`KeyValueStore`] traits abstract the two backends. Use
//! [`Resolver::with_object_store`] or [`Resolver::with_key_value_store`] to plug in another
//! implementation.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

mod aws;
mod backend;
mod config;
mod dynamodb;
mod error;
mod resolver;
mod s3;

pub use backend::{KeyValueStore, ObjectStore, ToggleRecord};
pub use config::{
    validate_options, AwsConnection, AwsOptions, BackendConfig, DynamoDbOptions, Options,
    S3Options,
};
pub use dynamodb::DynamoDbKeyValueStore;
pub use error::{Error, Result};
pub use resolver::Resolver;
pub use s3::S3ObjectStore;
