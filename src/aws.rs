use aws_config::{BehaviorVersion, Region, SdkConfig};

use crate::config::AwsConnection;

/// Load AWS SDK configuration for a single backend client.
///
/// Credentials come from the default provider chain (environment, profile, instance metadata).
/// The region is applied to the returned config only; nothing process-wide is modified, so
/// resolvers for different regions can coexist.
pub(crate) async fn load_sdk_config(connection: &AwsConnection) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(connection.region.clone()));
    if let Some(endpoint_url) = &connection.endpoint_url {
        loader = loader.endpoint_url(endpoint_url.as_str());
    }
    loader.load().await
}
