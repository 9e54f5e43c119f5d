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

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::{Health, HealthIndicator};
use crate::storage::BucketClient;

/// Health indicator that asks the backend for the bucket location
#[derive(Clone)]
pub struct S3HealthIndicator {
    client: Arc<dyn BucketClient>,
}

impl S3HealthIndicator {
    pub fn new(client: Arc<dyn BucketClient>) -> Self {
        Self { client }
    }

    pub fn bucket(&self) -> &str {
        self.client.bucket()
    }
}

#[async_trait]
impl HealthIndicator for S3HealthIndicator {
    async fn health(&self) -> Health {
        let start = Instant::now();
        let result = self.client.bucket_location().await;
        let latency_millis = start.elapsed().as_millis() as u64;

        match result {
            Ok(location) => {
                debug!(bucket = %self.bucket(), location = %location, latency_ms = latency_millis, "Bucket is up");
                Health::up(self.bucket(), location, latency_millis)
            }
            Err(e) => {
                warn!(bucket = %self.bucket(), latency_ms = latency_millis, error = %e, "Bucket is down");
                Health::down(self.bucket(), e.to_string(), latency_millis)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::Status;
    use crate::storage::client::fake::RecordingClient;
    use crate::storage::{ObjectStoreClient, StorageConfig};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_up() {
        let health = S3HealthIndicator::new(Arc::new(RecordingClient::new("foo")));

        let result = health.health().await;
        assert_eq!(result.status, Status::Up);
        assert_eq!(result.bucket, "foo");
        assert_eq!(result.location.as_deref(), Some("us-east-1"));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_down() {
        let health = S3HealthIndicator::new(Arc::new(RecordingClient::failing("foo")));

        let result = health.health().await;
        assert_eq!(result.status, Status::Down);
        assert_eq!(result.bucket, "foo");
        assert!(result.location.is_none());
        assert!(result.error.unwrap().contains("backend unavailable"));
    }

    #[tokio::test]
    async fn test_up_with_local_backend() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::local()
            .with_option("bucket", "foo")
            .with_option("path", temp_dir.path().to_str().unwrap());
        let health = S3HealthIndicator::new(Arc::new(ObjectStoreClient::new(config).unwrap()));

        let result = health.health().await;
        assert!(result.is_up());
        assert_eq!(result.location.as_deref(), Some("local"));
    }
}
