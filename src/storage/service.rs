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
use tokio::io::{AsyncRead, AsyncWrite};
use url::Url;

use super::error::StorageResult;

/// Optional headers applied to an object by [`StorageService::store`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Stored verbatim as the object's content type
    pub content_type: Option<String>,

    /// Cache lifetime, sent as `max-age=<ttl>, must-revalidate`
    pub ttl_seconds: Option<u32>,

    /// Stored verbatim as the object's content encoding
    pub content_encoding: Option<String>,
}

impl StoreOptions {
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_ttl_seconds(mut self, ttl_seconds: u32) -> Self {
        self.ttl_seconds = Some(ttl_seconds);
        self
    }

    pub fn with_content_encoding(mut self, content_encoding: impl Into<String>) -> Self {
        self.content_encoding = Some(content_encoding.into());
        self
    }

    /// Cache-Control header value for `ttl_seconds`, if set.
    pub fn cache_control(&self) -> Option<String> {
        self.ttl_seconds
            .map(|ttl| format!("max-age={}, must-revalidate", ttl))
    }
}

/// Path-keyed access to the objects of a single bucket.
///
/// Objects are addressed externally by canonical URLs of the form
/// `<scheme>://<host>/<bucket>/<path>`. Implementations hold no mutable
/// state and can be shared across tasks.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Whether `url` points into this service's bucket.
    ///
    /// A pure prefix test on the URL string; it never contacts the backend
    /// and says nothing about whether the object exists.
    fn contains(&self, url: &Url) -> bool;

    /// Upload all of `content` under `path` and return its canonical URL.
    ///
    /// An existing object at `path` is replaced.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::StoreError` if reading `content` or the upload fails.
    async fn store(
        &self,
        path: &str,
        content: &mut (dyn AsyncRead + Unpin + Send),
        options: StoreOptions,
    ) -> StorageResult<Url>;

    /// Copy the object addressed by `url` into `sink`.
    ///
    /// # Errors
    ///
    /// * `StorageError::ForeignUrl` if `url` is not in this bucket
    /// * `StorageError::GetError` if the object is missing, the download
    ///   fails or `sink` rejects a write
    async fn get(&self, url: &Url, sink: &mut (dyn AsyncWrite + Unpin + Send))
        -> StorageResult<()>;

    /// Call `visitor` with the canonical URL of every object whose path
    /// starts with `path`, in backend order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ListError` if the listing fails. URLs already
    /// handed to `visitor` stay visited.
    async fn visit(&self, path: &str, visitor: &mut (dyn FnMut(Url) + Send)) -> StorageResult<()>;
}
