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

use super::client::{object_key, BucketClient, ObjectContent, ObjectMetadata};
use super::config::{StorageConfig, StorageType};
use super::error::{StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use futures::future;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use object_store::{
    aws::AmazonS3Builder, local::LocalFileSystem, memory::InMemory, Attribute, Attributes,
    ClientOptions, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
};
use std::fmt::{Debug, Formatter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// `BucketClient` backed by any `object_store` implementation
pub struct ObjectStoreClient {
    pub config: StorageConfig,
    pub store: Arc<dyn ObjectStore>,
    bucket: String,
    location: String,
}

impl ObjectStoreClient {
    /// Create a client for the bucket described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigError` if:
    /// * The 'bucket' option is missing
    /// * Required backend options are missing or invalid
    /// * The object store cannot be built
    pub fn new(config: StorageConfig) -> StorageResult<Self> {
        let bucket = config.bucket()?.to_string();
        let (store, location) = Self::build_store(&config, &bucket)?;

        info!(
            bucket = %bucket,
            backend = config.storage_type_str(),
            location = %location,
            "Object storage client initialized"
        );

        Ok(Self {
            config,
            store: Arc::from(store),
            bucket,
            location,
        })
    }

    /// Build the appropriate object store based on configuration.
    ///
    /// # Returns
    ///
    /// A tuple of the object store and the location reported by health checks.
    fn build_store(
        config: &StorageConfig,
        bucket: &str,
    ) -> StorageResult<(Box<dyn ObjectStore>, String)> {
        match config.storage_type {
            StorageType::Aws => Self::build_aws_store(config, bucket),
            StorageType::Local => Self::build_local_store(config),
            StorageType::Memory => Ok((Box::new(InMemory::new()), "memory".to_string())),
        }
    }

    /// Filesystem store whose root directory stands in for the bucket.
    fn build_local_store(config: &StorageConfig) -> StorageResult<(Box<dyn ObjectStore>, String)> {
        let root = config
            .get_option("path")
            .map(PathBuf::from)
            .ok_or_else(|| StorageError::ConfigError("local storage requires 'path' option".into()))?;

        let root = root
            .canonicalize()
            .ok()
            .filter(|dir| dir.is_dir())
            .ok_or_else(|| {
                StorageError::ConfigError(format!(
                    "local storage root {} is not an existing directory",
                    root.display()
                ))
            })?;

        let store = LocalFileSystem::new_with_prefix(&root).map_err(|e| {
            StorageError::ConfigError(format!("Cannot open {} as a bucket: {}", root.display(), e))
        })?;
        Ok((Box::new(store), "local".to_string()))
    }

    /// HTTP client settings from the `timeout`, `connect_timeout`,
    /// `pool_idle_timeout` and `pool_max_idle_per_host` options.
    ///
    /// Values that do not parse keep the client default.
    fn build_connection_options(config: &StorageConfig) -> ClientOptions {
        let mut client_options = ClientOptions::default();

        match timeout_option(config, "timeout") {
            Some(Timeout::Disabled) => client_options = client_options.with_timeout_disabled(),
            Some(Timeout::After(d)) => client_options = client_options.with_timeout(d),
            None => {}
        }
        match timeout_option(config, "connect_timeout") {
            Some(Timeout::Disabled) => {
                client_options = client_options.with_connect_timeout_disabled()
            }
            Some(Timeout::After(d)) => client_options = client_options.with_connect_timeout(d),
            None => {}
        }
        if let Some(Timeout::After(d)) = timeout_option(config, "pool_idle_timeout") {
            client_options = client_options.with_pool_idle_timeout(d);
        }
        if let Some(max_idle) = config
            .get_option("pool_max_idle_per_host")
            .and_then(|v| v.parse::<usize>().ok())
        {
            client_options = client_options.with_pool_max_idle_per_host(max_idle);
        }
        client_options
    }

    /// Build an AWS S3 store.
    ///
    /// # Returns
    ///
    /// A tuple of the S3 store and its region.
    fn build_aws_store(
        config: &StorageConfig,
        bucket: &str,
    ) -> StorageResult<(Box<dyn ObjectStore>, String)> {
        let mut builder = AmazonS3Builder::new()
            .with_client_options(Self::build_connection_options(config))
            .with_bucket_name(bucket);
        let mut region = "us-east-1".to_string();

        for (key, value) in &config.options {
            match key.as_str() {
                "region" => {
                    region = value.clone();
                    builder = builder.with_region(value);
                }
                "access_key_id" => builder = builder.with_access_key_id(value),
                "secret_access_key" => builder = builder.with_secret_access_key(value),
                "session_token" | "token" => builder = builder.with_token(value),
                "endpoint" => builder = builder.with_endpoint(value),
                "allow_http" => {
                    if value.to_lowercase() == "true" {
                        builder = builder.with_allow_http(true);
                    }
                }
                // Consumed elsewhere
                "bucket"
                | "public_url"
                | "timeout"
                | "connect_timeout"
                | "pool_idle_timeout"
                | "pool_max_idle_per_host" => (),
                _ => {
                    warn!("Unknown AWS S3 option: {}", key);
                }
            }
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to create S3 store: {}", e)))?;

        Ok((Box::new(store), region))
    }

    /// LocalFileSystem rejects puts that carry attributes.
    fn supports_attributes(&self) -> bool {
        self.config.storage_type != StorageType::Local
    }

    fn attributes(&self, key: &str, metadata: ObjectMetadata) -> Attributes {
        let mut attributes = Attributes::new();
        if !self.supports_attributes() {
            if metadata != ObjectMetadata::default() {
                debug!(key = %key, ?metadata, "Backend does not keep object metadata, dropping it");
            }
            return attributes;
        }
        if let Some(content_type) = metadata.content_type {
            attributes.insert(Attribute::ContentType, content_type.into());
        }
        if let Some(cache_control) = metadata.cache_control {
            attributes.insert(Attribute::CacheControl, cache_control.into());
        }
        if let Some(content_encoding) = metadata.content_encoding {
            attributes.insert(Attribute::ContentEncoding, content_encoding.into());
        }
        attributes
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Timeout {
    Disabled,
    After(Duration),
}

/// Parse a timeout given in seconds; "0" and "disabled" turn it off.
fn timeout_option(config: &StorageConfig, key: &str) -> Option<Timeout> {
    let value = config.get_option(key)?.trim();
    if value == "disabled" {
        return Some(Timeout::Disabled);
    }
    match value.parse::<u64>() {
        Ok(0) => Some(Timeout::Disabled),
        Ok(secs) => Some(Timeout::After(Duration::from_secs(secs))),
        Err(_) => {
            warn!(option = key, value, "Ignoring unparseable timeout");
            None
        }
    }
}

#[async_trait]
impl BucketClient for ObjectStoreClient {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        metadata: ObjectMetadata,
    ) -> object_store::Result<()> {
        let opts = PutOptions {
            attributes: self.attributes(key, metadata),
            ..Default::default()
        };
        self.store
            .put_opts(&object_key(key)?, PutPayload::from(body), opts)
            .await?;
        Ok(())
    }

    async fn get_object(&self, key: &str) -> object_store::Result<ObjectContent> {
        let result = self.store.get(&object_key(key)?).await?;
        Ok(result.into_stream())
    }

    fn list_objects(&self, prefix: &str) -> BoxStream<'static, object_store::Result<String>> {
        // object_store lists whole path segments, so list from the deepest
        // complete segment and narrow down to the raw string prefix.
        let root = match prefix.rsplit_once('/') {
            Some((dir, _)) => match object_key(dir) {
                Ok(dir) => Some(dir),
                // No stored key lives under a directory that is not a valid key
                Err(_) => return stream::empty().boxed(),
            },
            None => None,
        };
        let prefix = prefix.to_string();

        self.store
            .list(root.as_ref())
            .map_ok(|meta| String::from(meta.location))
            .try_filter(move |key| future::ready(key.starts_with(&prefix)))
            .boxed()
    }

    async fn bucket_location(&self) -> object_store::Result<String> {
        self.store.list_with_delimiter(None).await?;
        Ok(self.location.clone())
    }
}

impl Debug for ObjectStoreClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ObjectStoreClient(backend={}, bucket={}, location={})",
            self.config.storage_type_str(),
            self.bucket,
            self.location
        )
    }
}
