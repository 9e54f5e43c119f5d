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

//! `StorageService` that addresses objects with S3-style canonical URLs.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error};
use url::{Position, Url};

use super::client::{object_key, BucketClient, ObjectMetadata};
use super::error::{BoxError, StorageError, StorageResult};
use super::service::{StorageService, StoreOptions};

/// Storage service for one bucket, addressing objects as
/// `<public_url>/<bucket>/<path>`.
#[derive(Clone)]
pub struct S3StorageService {
    client: Arc<dyn BucketClient>,
    base_url: Url,
}

impl S3StorageService {
    /// Create a service on top of `client`.
    ///
    /// # Arguments
    ///
    /// * `client` - Backend client bound to the bucket
    /// * `public_url` - `<scheme>://<host>` part of the canonical URLs
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigError` if `public_url` is not a valid
    /// hierarchical URL.
    pub fn new(client: Arc<dyn BucketClient>, public_url: &str) -> StorageResult<Self> {
        let mut base_url = Url::parse(public_url)?;
        base_url.set_query(None);
        base_url.set_fragment(None);
        base_url
            .path_segments_mut()
            .map_err(|_| {
                StorageError::ConfigError(format!("public_url cannot hold paths: {}", public_url))
            })?
            .pop_if_empty()
            .push(client.bucket());

        Ok(Self { client, base_url })
    }

    pub fn bucket(&self) -> &str {
        self.client.bucket()
    }

    /// `<scheme>://<host>/<bucket>`, the prefix shared by every canonical URL.
    pub fn url_prefix(&self) -> &str {
        self.base_url.as_str()
    }

    /// Canonical URL of the object stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` if `path` is not a storable key,
    /// e.g. one with `.` or `..` segments that URLs would normalize away.
    pub fn to_url(&self, path: &str) -> StorageResult<Url> {
        to_url(&self.base_url, self.bucket(), path)
    }

    /// Path of the object addressed by `url`, the inverse of [`Self::to_url`].
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ForeignUrl` if `url` is not under [`Self::url_prefix`].
    pub fn path_of(&self, url: &Url) -> StorageResult<String> {
        let encoded = url[..Position::AfterPath]
            .strip_prefix(self.url_prefix())
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| StorageError::ForeignUrl {
                bucket: self.bucket().to_string(),
                url: url.to_string(),
            })?;

        urlencoding::decode(encoded)
            .map(|path| path.into_owned())
            .map_err(|e| StorageError::ForeignUrl {
                bucket: self.bucket().to_string(),
                url: format!("{} ({})", url, e),
            })
    }

    /// Lazily list the canonical URLs of all objects whose path starts with `path`.
    pub fn urls(&self, path: &str) -> BoxStream<'static, StorageResult<Url>> {
        let base_url = self.base_url.clone();
        let bucket = self.bucket().to_string();
        let prefix = path.to_string();

        self.client
            .list_objects(path)
            .map(move |key| {
                let key = key.map_err(|e| StorageError::ListError {
                    bucket: bucket.clone(),
                    path: prefix.clone(),
                    source: Box::new(e),
                })?;
                to_url(&base_url, &bucket, &key)
            })
            .boxed()
    }

    fn store_error(&self, path: &str, e: impl Into<BoxError>) -> StorageError {
        let source = e.into();
        error!(bucket = %self.bucket(), path = %path, error = %source, "Store failed");
        StorageError::StoreError {
            bucket: self.bucket().to_string(),
            path: path.to_string(),
            source,
        }
    }

    fn get_error(&self, path: &str, e: impl Into<BoxError>) -> StorageError {
        let source = e.into();
        error!(bucket = %self.bucket(), path = %path, error = %source, "Get failed");
        StorageError::GetError {
            bucket: self.bucket().to_string(),
            path: path.to_string(),
            source,
        }
    }
}

fn to_url(base_url: &Url, bucket: &str, path: &str) -> StorageResult<Url> {
    object_key(path).map_err(|e| StorageError::InvalidKey {
        bucket: bucket.to_string(),
        path: path.to_string(),
        source: Box::new(e),
    })?;

    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| StorageError::ConfigError(format!("Cannot append a path to {}", base_url)))?
        .extend(path.split('/'));
    Ok(url)
}

#[async_trait]
impl StorageService for S3StorageService {
    fn contains(&self, url: &Url) -> bool {
        url.as_str().starts_with(self.url_prefix())
    }

    async fn store(
        &self,
        path: &str,
        content: &mut (dyn AsyncRead + Unpin + Send),
        options: StoreOptions,
    ) -> StorageResult<Url> {
        object_key(path).map_err(|e| self.store_error(path, e))?;
        let url = self.to_url(path)?;

        let mut body = Vec::new();
        content
            .read_to_end(&mut body)
            .await
            .map_err(|e| self.store_error(path, e))?;
        let size = body.len();

        let metadata = ObjectMetadata {
            cache_control: options.cache_control(),
            content_type: options.content_type,
            content_encoding: options.content_encoding,
        };
        self.client
            .put_object(path, Bytes::from(body), metadata)
            .await
            .map_err(|e| self.store_error(path, e))?;

        debug!(bucket = %self.bucket(), path = %path, size, "Object stored");
        Ok(url)
    }

    async fn get(
        &self,
        url: &Url,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> StorageResult<()> {
        let path = self.path_of(url)?;

        // Dropping `content` on any return path releases the response.
        let mut content = self
            .client
            .get_object(&path)
            .await
            .map_err(|e| self.get_error(&path, e))?;

        let mut size = 0usize;
        while let Some(chunk) = content.next().await {
            let chunk = chunk.map_err(|e| self.get_error(&path, e))?;
            sink.write_all(&chunk)
                .await
                .map_err(|e| self.get_error(&path, e))?;
            size += chunk.len();
        }
        sink.flush().await.map_err(|e| self.get_error(&path, e))?;

        debug!(bucket = %self.bucket(), path = %path, size, "Object copied to sink");
        Ok(())
    }

    async fn visit(&self, path: &str, visitor: &mut (dyn FnMut(Url) + Send)) -> StorageResult<()> {
        let mut urls = self.urls(path);
        let mut count = 0usize;
        while let Some(url) = urls.next().await {
            visitor(url?);
            count += 1;
        }

        debug!(bucket = %self.bucket(), path = %path, count, "Objects visited");
        Ok(())
    }
}

impl Debug for S3StorageService {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "S3StorageService(url_prefix={})", self.url_prefix())
    }
}
