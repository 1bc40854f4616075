//! Look up a toggle using options from the environment.
//!
//! ```sh
//! AWS_REGION=eu-west-1 TOGGLES_BUCKET=feature-toggles cargo run --example simple -- new-checkout
//! AWS_REGION=eu-west-1 TOGGLES_TABLE=feature-toggles cargo run --example simple -- new-checkout
//! ```
use cloud_feature_toggles::Options;

#[tokio::main]
pub async fn main() -> cloud_feature_toggles::Result<()> {
    // Configure env_logger to see lookup warnings.
    env_logger::Builder::from_env(env_logger::Env::new().default_filter_or("cloud_feature_toggles"))
        .init();

    let toggle = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "a-boolean-toggle".to_owned());

    let mut options = Options::new();
    if let Ok(region) = std::env::var("AWS_REGION") {
        options = options.region(region);
    }
    if let Ok(endpoint_url) = std::env::var("AWS_ENDPOINT_URL") {
        options = options.endpoint_url(endpoint_url);
    }
    if let Ok(bucket) = std::env::var("TOGGLES_BUCKET") {
        options = options.s3_bucket(bucket);
    } else if let Ok(table) = std::env::var("TOGGLES_TABLE") {
        options = options.dynamo_db_table(table);
    }

    let resolver = options.to_resolver().await?;

    println!("{}: {}", toggle, resolver.is_enabled(&toggle).await);

    Ok(())
}
