use s3_storage::{HealthIndicator, StorageConfig, StorageFactory, StorageService, StoreOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let root = std::env::temp_dir().join("s3-storage-demo");
    std::fs::create_dir_all(&root)?;

    let storage_config = StorageConfig::local()
        .with_option("bucket", "demo")
        .with_option("path", root.to_string_lossy());
    let storage = StorageFactory::from_config(storage_config)?;

    let mut content: &[u8] = b"hello from the local filesystem";
    let url = storage
        .service
        .store("docs/hello.txt", &mut content, StoreOptions::default())
        .await?;

    let mut out = Vec::new();
    storage.service.get(&url, &mut out).await?;
    println!("{} -> {}", url, String::from_utf8_lossy(&out));

    println!("{}", storage.health.health().await.to_json()?);

    Ok(())
}
