use std::sync::Arc;

use crate::{
    backend::{KeyValueStore, ObjectStore, ToggleRecord},
    config::BackendConfig,
    dynamodb::DynamoDbKeyValueStore,
    s3::S3ObjectStore,
    Error, Options, Result,
};

const LOG_TARGET: &str = "cloud_feature_toggles";
const LOG_PREFIX: &str = "[cloud-feature-toggles]";

/// Resolves feature toggles against the configured backend.
///
/// A resolver is immutable once built. It is `Send + Sync` and may be shared (e.g., in an
/// [`Arc`]) between any number of concurrent lookups.
///
/// # Examples
/// ```no_run
/// # async fn run() -> cloud_feature_toggles::Result<()> {
/// # use cloud_feature_toggles::{Options, Resolver};
/// let resolver = Resolver::new(Options::new().region("eu-west-1").s3_bucket("toggles")).await?;
///
/// if resolver.is_enabled("new-checkout").await {
///     // ...
/// }
/// # Ok(())
/// # }
/// ```
pub struct Resolver {
    backend: Backend,
}

/// Backend selected at construction.
enum Backend {
    None,
    ObjectStore {
        store: Arc<dyn ObjectStore>,
        bucket: String,
    },
    KeyValueStore {
        store: Arc<dyn KeyValueStore>,
        table: String,
    },
}

impl Backend {
    /// Human-readable origin used in warnings.
    fn origin(&self) -> &'static str {
        match self {
            Backend::None => "no backend",
            Backend::ObjectStore { .. } => "AWS S3",
            Backend::KeyValueStore { .. } => "AWS DynamoDB",
        }
    }
}

impl Resolver {
    /// Validate `options` and bind the selected backend client.
    ///
    /// No request is issued to the backend. AWS credentials are resolved lazily by the SDK on the
    /// first lookup.
    ///
    /// # Errors
    ///
    /// Returns the configuration error reported by [`Options::validate`].
    pub async fn new(options: Options) -> Result<Self> {
        let config = options.validate()?;

        log::debug!(target: LOG_TARGET, backend = config.kind(); "creating toggle resolver");

        let backend = match config {
            BackendConfig::None => Backend::None,
            BackendConfig::ObjectStore { connection, bucket } => Backend::ObjectStore {
                store: Arc::new(S3ObjectStore::connect(&connection).await),
                bucket,
            },
            BackendConfig::KeyValueStore {
                connection,
                table_name,
                partition_key,
            } => Backend::KeyValueStore {
                store: Arc::new(DynamoDbKeyValueStore::connect(&connection, partition_key).await),
                table: table_name,
            },
        };

        Ok(Resolver { backend })
    }

    /// A resolver without backend. Every toggle is disabled.
    pub fn disabled() -> Self {
        Resolver {
            backend: Backend::None,
        }
    }

    /// A resolver reading toggles from `bucket` of a custom [`ObjectStore`].
    pub fn with_object_store(store: impl ObjectStore + 'static, bucket: impl Into<String>) -> Self {
        Resolver {
            backend: Backend::ObjectStore {
                store: Arc::new(store),
                bucket: bucket.into(),
            },
        }
    }

    /// A resolver reading toggles from `table` of a custom [`KeyValueStore`].
    pub fn with_key_value_store(
        store: impl KeyValueStore + 'static,
        table: impl Into<String>,
    ) -> Self {
        Resolver {
            backend: Backend::KeyValueStore {
                store: Arc::new(store),
                table: table.into(),
            },
        }
    }

    /// Returns `true` if `toggle_name` is enabled.
    ///
    /// This never fails: any backend, decoding or not-found error is logged as a warning and the
    /// toggle is reported as disabled. Use [`Resolver::try_is_enabled`] to inspect the error.
    pub async fn is_enabled(&self, toggle_name: &str) -> bool {
        match self.try_is_enabled(toggle_name).await {
            Ok(enabled) => {
                log::trace!(target: LOG_TARGET, toggle = toggle_name, enabled; "resolved toggle");
                enabled
            }
            Err(err) => {
                log::warn!(target: LOG_TARGET, toggle = toggle_name;
                    "{} Error in retrieving config from {} - {}", LOG_PREFIX, self.backend.origin(), err);
                log::warn!(target: LOG_TARGET, toggle = toggle_name;
                    "{} Default to return false", LOG_PREFIX);
                false
            }
        }
    }

    /// Look up `toggle_name`, returning the error instead of defaulting to `false`.
    ///
    /// A record without an `isEnabled` flag resolves to `Ok(false)`. Without a backend, always
    /// returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// - [`Error::ToggleNotFound`] if the backend has no record for `toggle_name`.
    /// - [`Error::InvalidUtf8`], [`Error::InvalidRecord`] or [`Error::InvalidAttribute`] if the
    ///   record is malformed.
    /// - [`Error::Backend`] if the request failed.
    pub async fn try_is_enabled(&self, toggle_name: &str) -> Result<bool> {
        let record = match &self.backend {
            Backend::None => return Ok(false),
            Backend::ObjectStore { store, bucket } => {
                let body = store.get_object(bucket, toggle_name).await?;
                ToggleRecord::from_slice(&body)?
            }
            Backend::KeyValueStore { store, table } => store
                .get_item(table, toggle_name)
                .await?
                .ok_or(Error::ToggleNotFound)?,
        };

        Ok(record.is_enabled())
    }
}
