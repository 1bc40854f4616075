use async_trait::async_trait;
use aws_sdk_s3::{
    config::http::HttpResponse, error::SdkError, operation::get_object::GetObjectError, Client,
};

use crate::{aws::load_sdk_config, backend::ObjectStore, config::AwsConnection, Error, Result};

/// [`ObjectStore`] backed by AWS S3.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    // Client wraps an Arc so it's cheap to clone.
    client: Client,
}

impl S3ObjectStore {
    /// Wrap an existing S3 client.
    pub fn new(client: Client) -> Self {
        S3ObjectStore { client }
    }

    /// Build an S3 client for `connection`.
    ///
    /// Path-style addressing is used when an endpoint override is set, as most S3-compatible
    /// services don't support virtual-hosted buckets.
    pub async fn connect(connection: &AwsConnection) -> Self {
        let sdk_config = load_sdk_config(connection).await;
        let config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(connection.endpoint_url.is_some())
            .build();
        S3ObjectStore::new(Client::from_conf(config))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(get_object_error)?;

        let body = response
            .body
            .collect()
            .await
            .map_err(Error::backend)?
            .into_bytes();

        Ok(body.to_vec())
    }
}

/// `NoSuchKey` is a missing toggle. Anything else keeps the whole `SdkError` so the log shows the
/// underlying cause (dispatch, timeout, credentials, ...).
fn get_object_error(err: SdkError<GetObjectError, HttpResponse>) -> Error {
    if err
        .as_service_error()
        .is_some_and(GetObjectError::is_no_such_key)
    {
        Error::ToggleNotFound
    } else {
        Error::backend(err)
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::{
        config::http::HttpResponse,
        error::SdkError,
        operation::get_object::{GetObjectError, GetObjectOutput},
        primitives::ByteStream,
        types::error::NoSuchKey,
    };
    use aws_smithy_mocks::{mock, mock_client};
    use aws_smithy_runtime_api::client::result::ConnectorError;

    use super::{get_object_error, S3ObjectStore};
    use crate::{backend::ObjectStore, Error, Resolver};

    #[tokio::test]
    async fn collects_object_body() {
        let get_object = mock!(aws_sdk_s3::Client::get_object)
            .match_requests(|req| req.bucket() == Some("toggles") && req.key() == Some("featureX"))
            .then_output(|| {
                GetObjectOutput::builder()
                    .body(ByteStream::from_static(br#"{"isEnabled": true}"#))
                    .build()
            });
        let store = S3ObjectStore::new(mock_client!(aws_sdk_s3, [&get_object]));

        let body = store.get_object("toggles", "featureX").await.unwrap();

        assert_eq!(body, br#"{"isEnabled": true}"#);
        assert_eq!(get_object.num_calls(), 1);
    }

    #[tokio::test]
    async fn no_such_key_is_toggle_not_found() {
        let get_object = mock!(aws_sdk_s3::Client::get_object)
            .then_error(|| GetObjectError::NoSuchKey(NoSuchKey::builder().build()));
        let store = S3ObjectStore::new(mock_client!(aws_sdk_s3, [&get_object]));

        assert!(matches!(
            store.get_object("toggles", "missing").await,
            Err(Error::ToggleNotFound)
        ));
    }

    #[tokio::test]
    async fn resolves_through_s3_client() {
        let get_object = mock!(aws_sdk_s3::Client::get_object)
            .match_requests(|req| req.key() == Some("featureX"))
            .then_output(|| {
                GetObjectOutput::builder()
                    .body(ByteStream::from_static(br#"{"isEnabled": true}"#))
                    .build()
            });
        let resolver = Resolver::with_object_store(
            S3ObjectStore::new(mock_client!(aws_sdk_s3, [&get_object])),
            "toggles",
        );

        assert!(resolver.is_enabled("featureX").await);
    }

    #[test]
    fn dispatch_failure_keeps_cause() {
        let err: SdkError<GetObjectError, HttpResponse> =
            SdkError::dispatch_failure(ConnectorError::io(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "tcp connect to 127.0.0.1:1 refused",
            ))));

        let err = get_object_error(err);

        assert!(matches!(err, Error::Backend(_)));
        let message = err.to_string();
        assert!(message.contains("tcp connect to 127.0.0.1:1 refused"), "{message}");
    }
}
