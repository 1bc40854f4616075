use serde::{Deserialize, Serialize};

use crate::{Error, Resolver, Result};

/// Options for [`Resolver`].
///
/// Options can be deserialized from JSON (keys are camelCase) or assembled with the builder
/// methods.
///
/// # Examples
/// ```
/// # use cloud_feature_toggles::Options;
/// let options = Options::new()
///     .region("eu-west-1")
///     .s3_bucket("feature-toggles");
///
/// let from_json = Options::from_json_str(
///     r#"{ "aws": { "region": "eu-west-1", "s3": { "bucket": "feature-toggles" } } }"#,
/// )
/// .unwrap();
///
/// assert_eq!(options, from_json);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// AWS backend configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsOptions>,
    /// Keys not recognized by this crate. Options holding only such keys are not empty; they
    /// select no backend.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// The `aws` block of [`Options`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsOptions {
    /// AWS region of the backend. Required when a backend block is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Override the service endpoint, e.g. for S3/DynamoDB-compatible services or a local
    /// emulator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// Object-store backend. Takes precedence over [`AwsOptions::dynamo_db`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Options>,
    /// Key-value-store backend.
    #[serde(default, alias = "dynamodb", skip_serializing_if = "Option::is_none")]
    pub dynamo_db: Option<DynamoDbOptions>,
}

/// The `aws.s3` block of [`Options`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Options {
    /// Bucket holding one JSON object per toggle, keyed by toggle name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

/// The `aws.dynamoDb` block of [`Options`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamoDbOptions {
    /// Table holding one item per toggle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Name of the partition key attribute.
    ///
    /// Defaults to [`DynamoDbOptions::DEFAULT_PARTITION_KEY`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<String>,
}

impl DynamoDbOptions {
    /// Default value for [`DynamoDbOptions::partition_key`].
    pub const DEFAULT_PARTITION_KEY: &'static str = "id";
}

/// Where and how to reach AWS for the selected backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsConnection {
    /// AWS region. Applied to the backend client only, never to process-wide configuration.
    pub region: String,
    /// Optional endpoint override.
    pub endpoint_url: Option<String>,
}

/// Validated backend selection.
///
/// Produced once by [`Options::validate`]; the resolver never re-inspects [`Options`] afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// No backend configured. Every lookup resolves to `false`.
    None,
    /// Toggles are JSON objects in an S3 bucket.
    ObjectStore {
        /// Connection settings.
        connection: AwsConnection,
        /// Bucket name.
        bucket: String,
    },
    /// Toggles are items in a DynamoDB table.
    KeyValueStore {
        /// Connection settings.
        connection: AwsConnection,
        /// Table name.
        table_name: String,
        /// Partition key attribute name.
        partition_key: String,
    },
}

impl BackendConfig {
    /// Short backend name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BackendConfig::None => "none",
            BackendConfig::ObjectStore { .. } => "s3",
            BackendConfig::KeyValueStore { .. } => "dynamodb",
        }
    }
}

impl Options {
    /// Create empty options. At least an `aws` block must be added before validation succeeds.
    pub fn new() -> Self {
        Options::default()
    }

    /// Parse options from a JSON value.
    ///
    /// `null` is rejected with [`Error::MissingOptions`]. Unknown keys are kept in
    /// [`Options::other`].
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        if value.is_null() {
            return Err(Error::MissingOptions);
        }
        serde_json::from_value(value).map_err(|err| Error::InvalidOptions(err.into()))
    }

    /// Parse options from a JSON string. See [`Options::from_json_value`].
    pub fn from_json_str(s: &str) -> Result<Self> {
        let value = serde_json::from_str(s).map_err(|err| Error::InvalidOptions(err.into()))?;
        Options::from_json_value(value)
    }

    /// Set the AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.aws_mut().region = Some(region.into());
        self
    }

    /// Override the AWS service endpoint. Clients should use the default endpoint in most cases.
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.aws_mut().endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Read toggles from the given S3 bucket.
    pub fn s3_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.aws_mut().s3 = Some(S3Options {
            bucket: Some(bucket.into()),
        });
        self
    }

    /// Read toggles from the given DynamoDB table.
    pub fn dynamo_db_table(mut self, table_name: impl Into<String>) -> Self {
        self.aws_mut()
            .dynamo_db
            .get_or_insert_with(DynamoDbOptions::default)
            .table_name = Some(table_name.into());
        self
    }

    /// Override the DynamoDB partition key attribute name.
    pub fn partition_key(mut self, partition_key: impl Into<String>) -> Self {
        self.aws_mut()
            .dynamo_db
            .get_or_insert_with(DynamoDbOptions::default)
            .partition_key = Some(partition_key.into());
        self
    }

    fn aws_mut(&mut self) -> &mut AwsOptions {
        self.aws.get_or_insert_with(AwsOptions::default)
    }

    /// Returns `true` if no configuration has been provided.
    pub fn is_empty(&self) -> bool {
        self.aws.is_none() && self.other.is_empty()
    }

    /// Validate options and select the backend.
    ///
    /// Performs no I/O.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyConfiguration`] if options are empty. Options with unrecognized keys only
    ///   are not empty and select [`BackendConfig::None`].
    /// - [`Error::MissingRegion`] if the `aws` block has no region.
    /// - [`Error::MissingBucket`] if the `s3` block has no bucket.
    /// - [`Error::MissingTableName`] if the `dynamoDb` block has no table name.
    ///
    /// If both backend blocks are present, S3 wins and the `dynamoDb` block is not validated.
    pub fn validate(&self) -> Result<BackendConfig> {
        let Some(aws) = &self.aws else {
            if self.is_empty() {
                return Err(Error::EmptyConfiguration);
            }
            return Ok(BackendConfig::None);
        };

        let connection = AwsConnection {
            region: required(&aws.region, Error::MissingRegion)?,
            endpoint_url: aws.endpoint_url.clone(),
        };

        if let Some(s3) = &aws.s3 {
            return Ok(BackendConfig::ObjectStore {
                connection,
                bucket: required(&s3.bucket, Error::MissingBucket)?,
            });
        }

        if let Some(dynamo_db) = &aws.dynamo_db {
            return Ok(BackendConfig::KeyValueStore {
                connection,
                table_name: required(&dynamo_db.table_name, Error::MissingTableName)?,
                partition_key: dynamo_db
                    .partition_key
                    .clone()
                    .filter(|key| !key.trim().is_empty())
                    .unwrap_or_else(|| DynamoDbOptions::DEFAULT_PARTITION_KEY.to_owned()),
            });
        }

        Ok(BackendConfig::None)
    }

    /// Create a new [`Resolver`] using these options.
    ///
    /// ```no_run
    /// # async fn run() -> cloud_feature_toggles::Result<()> {
    /// # use cloud_feature_toggles::Options;
    /// let resolver = Options::new()
    ///     .region("us-east-1")
    ///     .dynamo_db_table("feature-toggles")
    ///     .to_resolver()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn to_resolver(self) -> Result<Resolver> {
        Resolver::new(self).await
    }
}

/// Validate possibly absent options. See [`Options::validate`].
///
/// # Errors
///
/// Returns [`Error::MissingOptions`] if `options` is `None`.
pub fn validate_options(options: Option<&Options>) -> Result<BackendConfig> {
    options.ok_or(Error::MissingOptions)?.validate()
}

/// Null (and blank) values count as missing.
fn required(value: &Option<String>, missing: Error) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.clone()),
        _ => Err(missing),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{validate_options, AwsConnection, BackendConfig, Options};
    use crate::Error;

    fn connection(region: &str) -> AwsConnection {
        AwsConnection {
            region: region.to_owned(),
            endpoint_url: None,
        }
    }

    #[test]
    fn missing_options() {
        assert!(matches!(validate_options(None), Err(Error::MissingOptions)));
        assert!(matches!(
            Options::from_json_value(serde_json::Value::Null),
            Err(Error::MissingOptions)
        ));
    }

    #[test]
    fn empty_configuration() {
        assert!(matches!(
            Options::new().validate(),
            Err(Error::EmptyConfiguration)
        ));

        let options = Options::from_json_value(json!({})).unwrap();
        assert!(options.is_empty());
        assert!(matches!(
            options.validate(),
            Err(Error::EmptyConfiguration)
        ));
    }

    #[test]
    fn missing_region() {
        for value in [
            json!({ "aws": {} }),
            json!({ "aws": { "region": null, "s3": { "bucket": "toggles" } } }),
            json!({ "aws": { "region": "", "dynamoDb": { "tableName": "toggles" } } }),
        ] {
            let options = Options::from_json_value(value.clone()).unwrap();
            assert!(
                matches!(options.validate(), Err(Error::MissingRegion)),
                "{value}"
            );
        }
    }

    #[test]
    fn missing_bucket() {
        for value in [
            json!({ "aws": { "region": "eu-west-1", "s3": {} } }),
            json!({ "aws": { "region": "eu-west-1", "s3": { "bucket": null } } }),
        ] {
            let options = Options::from_json_value(value.clone()).unwrap();
            assert!(
                matches!(options.validate(), Err(Error::MissingBucket)),
                "{value}"
            );
        }
    }

    #[test]
    fn missing_table_name() {
        for value in [
            json!({ "aws": { "region": "eu-west-1", "dynamoDb": {} } }),
            json!({ "aws": { "region": "eu-west-1", "dynamoDb": { "tableName": null } } }),
        ] {
            let options = Options::from_json_value(value.clone()).unwrap();
            assert!(
                matches!(options.validate(), Err(Error::MissingTableName)),
                "{value}"
            );
        }
    }

    #[test]
    fn unknown_keys_select_none() {
        let options = Options::from_json_str(r#"{"other": 1}"#).unwrap();
        assert!(!options.is_empty());
        assert_eq!(options.validate().unwrap(), BackendConfig::None);
    }

    #[test]
    fn region_without_backend_selects_none() {
        let options = Options::new().region("eu-west-1");
        assert_eq!(options.validate().unwrap(), BackendConfig::None);
    }

    #[test]
    fn selects_object_store() {
        let options = Options::new().region("eu-west-1").s3_bucket("toggles");
        assert_eq!(
            options.validate().unwrap(),
            BackendConfig::ObjectStore {
                connection: connection("eu-west-1"),
                bucket: "toggles".to_owned(),
            }
        );
    }

    #[test]
    fn selects_key_value_store_with_default_partition_key() {
        let options = Options::from_json_str(
            r#"{ "aws": { "region": "us-east-1", "dynamoDb": { "tableName": "toggles" } } }"#,
        )
        .unwrap();
        assert_eq!(
            options.validate().unwrap(),
            BackendConfig::KeyValueStore {
                connection: connection("us-east-1"),
                table_name: "toggles".to_owned(),
                partition_key: "id".to_owned(),
            }
        );
    }

    #[test]
    fn key_value_store_honors_partition_key_and_endpoint() {
        let options = Options::new()
            .region("us-east-1")
            .endpoint_url("http://localhost:8000")
            .dynamo_db_table("toggles")
            .partition_key("name");
        assert_eq!(
            options.validate().unwrap(),
            BackendConfig::KeyValueStore {
                connection: AwsConnection {
                    region: "us-east-1".to_owned(),
                    endpoint_url: Some("http://localhost:8000".to_owned()),
                },
                table_name: "toggles".to_owned(),
                partition_key: "name".to_owned(),
            }
        );
    }

    #[test]
    fn object_store_takes_precedence() {
        let options = Options::from_json_value(json!({
            "aws": {
                "region": "eu-west-1",
                "s3": { "bucket": "toggles" },
                // Not validated: S3 wins.
                "dynamoDb": {}
            }
        }))
        .unwrap();
        assert_eq!(options.validate().unwrap().kind(), "s3");
    }

    #[test]
    fn lowercase_dynamodb_alias() {
        let options = Options::from_json_value(json!({
            "aws": { "region": "eu-west-1", "dynamodb": { "tableName": "toggles" } }
        }))
        .unwrap();
        assert_eq!(options.validate().unwrap().kind(), "dynamodb");
    }

    #[test]
    fn rejects_malformed_options() {
        assert!(matches!(
            Options::from_json_value(json!({ "aws": { "region": 42 } })),
            Err(Error::InvalidOptions(_))
        ));
        assert!(matches!(
            Options::from_json_str("{"),
            Err(Error::InvalidOptions(_))
        ));
    }
}
