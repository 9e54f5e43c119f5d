use s3_storage::{HealthIndicator, StorageConfig, StorageFactory, StorageService, StoreOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let storage_config = StorageConfig::aws()
        .with_option("bucket", "my-bucket-1234")
        .with_option("region", "us-east-1")
        .with_option("access_key_id", "the_access_key_id")
        .with_option("secret_access_key", "the_secret_access_key")
        .with_option("session_token", "session_token_if_needed");
    let storage = StorageFactory::from_config(storage_config)?;

    println!("{}", storage.health.health().await);

    let mut content: &[u8] = b"hello from s3-storage";
    let url = storage
        .service
        .store(
            "demo/hello.txt",
            &mut content,
            StoreOptions::default()
                .with_content_type("text/plain")
                .with_ttl_seconds(300),
        )
        .await?;
    println!("stored {}", url);

    storage
        .service
        .visit("demo/", &mut |url: s3_storage::Url| println!("found {}", url))
        .await?;

    Ok(())
}
