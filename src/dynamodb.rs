use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::{operation::get_item::GetItemOutput, types::AttributeValue, Client};

use crate::{
    aws::load_sdk_config,
    backend::{KeyValueStore, ToggleRecord},
    config::AwsConnection,
    Error, Result,
};

/// Attribute holding the toggle flag.
const IS_ENABLED: &str = "isEnabled";

/// [`KeyValueStore`] backed by AWS DynamoDB.
///
/// Items are looked up by a string partition key (`id` unless configured otherwise) and must
/// carry a boolean `isEnabled` attribute.
#[derive(Debug, Clone)]
pub struct DynamoDbKeyValueStore {
    // Client wraps an Arc so it's cheap to clone.
    client: Client,
    partition_key: String,
}

impl DynamoDbKeyValueStore {
    /// Wrap an existing DynamoDB client.
    pub fn new(client: Client, partition_key: impl Into<String>) -> Self {
        DynamoDbKeyValueStore {
            client,
            partition_key: partition_key.into(),
        }
    }

    /// Build a DynamoDB client for `connection`.
    pub async fn connect(connection: &AwsConnection, partition_key: impl Into<String>) -> Self {
        let sdk_config = load_sdk_config(connection).await;
        DynamoDbKeyValueStore::new(Client::new(&sdk_config), partition_key)
    }
}

#[async_trait]
impl KeyValueStore for DynamoDbKeyValueStore {
    async fn get_item(&self, table: &str, key: &str) -> Result<Option<ToggleRecord>> {
        let GetItemOutput { item, .. } = self
            .client
            .get_item()
            .table_name(table)
            .key(self.partition_key.as_str(), AttributeValue::S(key.to_owned()))
            .send()
            .await
            // Keep the whole SdkError so the log shows the underlying cause.
            .map_err(Error::backend)?;

        item.map(|item| record_from_item(&item)).transpose()
    }
}

fn record_from_item(item: &HashMap<String, AttributeValue>) -> Result<ToggleRecord> {
    let is_enabled = match item.get(IS_ENABLED) {
        None | Some(AttributeValue::Null(_)) => None,
        Some(AttributeValue::Bool(value)) => Some(*value),
        Some(_) => {
            return Err(Error::InvalidAttribute {
                name: IS_ENABLED.to_owned(),
            })
        }
    };

    Ok(ToggleRecord { is_enabled })
}
