// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.
//
// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use std::sync::Arc;

use super::client::BucketClient;
use super::config::StorageConfig;
use super::error::StorageResult;
use super::object_store::ObjectStoreClient;
use super::s3::S3StorageService;
use super::service::StorageService;
use crate::health::{HealthIndicator, S3HealthIndicator};

/// Storage service and health indicator sharing one backend client
#[derive(Clone)]
pub struct Storage {
    pub service: Arc<dyn StorageService>,
    pub health: Arc<dyn HealthIndicator>,
}

/// Factory for creating storage components
pub struct StorageFactory;

impl StorageFactory {
    /// Create the storage service and health indicator for a configuration.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The 'bucket' option is missing
    /// * Backend options are missing or invalid
    /// * The 'public_url' option is not a valid URL
    pub fn from_config(config: StorageConfig) -> StorageResult<Storage> {
        let public_url = config.public_url().to_string();
        let client: Arc<dyn BucketClient> = Arc::new(ObjectStoreClient::new(config)?);

        Ok(Storage {
            service: Arc::new(S3StorageService::new(Arc::clone(&client), &public_url)?),
            health: Arc::new(S3HealthIndicator::new(client)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::Status;
    use crate::storage::error::StorageError;
    use crate::storage::service::StoreOptions;
    use url::Url;

    #[tokio::test]
    async fn test_from_config_memory() {
        let config = StorageConfig::memory().with_option("bucket", "test");
        let storage = StorageFactory::from_config(config).unwrap();

        let mut content: &[u8] = b"hello";
        let url = storage
            .service
            .store("a/b.txt", &mut content, StoreOptions::default())
            .await
            .unwrap();
        assert_eq!(url.as_str(), "https://s3.amazonaws.com/test/a/b.txt");

        let mut os: Vec<u8> = Vec::new();
        storage.service.get(&url, &mut os).await.unwrap();
        assert_eq!(os, b"hello");

        let health = storage.health.health().await;
        assert_eq!(health.status, Status::Up);
        assert_eq!(health.bucket, "test");
    }

    #[test]
    fn test_from_config_public_url() {
        let config = StorageConfig::memory()
            .with_option("bucket", "test")
            .with_option("public_url", "http://localhost:9000");
        let storage = StorageFactory::from_config(config).unwrap();

        assert!(storage
            .service
            .contains(&Url::parse("http://localhost:9000/test/a.txt").unwrap()));
        assert!(!storage
            .service
            .contains(&Url::parse("https://s3.amazonaws.com/test/a.txt").unwrap()));
    }

    #[test]
    fn test_from_config_invalid_public_url() {
        let config = StorageConfig::memory()
            .with_option("bucket", "test")
            .with_option("public_url", "::");

        assert!(matches!(
            StorageFactory::from_config(config),
            Err(StorageError::ConfigError(_))
        ));
    }

    #[test]
    fn test_from_config_missing_bucket() {
        assert!(matches!(
            StorageFactory::from_config(StorageConfig::memory()),
            Err(StorageError::ConfigError(_))
        ));
    }
}
