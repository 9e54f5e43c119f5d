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
use bytes::Bytes;
use futures::stream::BoxStream;
use object_store::path::Path as ObjectPath;
use std::fmt::{Debug, Formatter, Result as FmtResult};

/// Object body as returned by the backend. Dropping it releases the response.
pub type ObjectContent = BoxStream<'static, object_store::Result<Bytes>>;

/// Headers sent along with an uploaded object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub content_encoding: Option<String>,
}

/// Bucket-scoped operations the storage service needs from a blob backend.
///
/// Keys are relative to the bucket. Every method maps to one logical backend
/// request; retrying is left to the underlying client's own configuration.
#[async_trait]
pub trait BucketClient: Send + Sync {
    /// Name of the bucket this client is bound to.
    fn bucket(&self) -> &str;

    /// Upload `body` under `key` in a single request, replacing any previous object.
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        metadata: ObjectMetadata,
    ) -> object_store::Result<()>;

    /// Open the content of the object stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `object_store::Error::NotFound` if no object exists at `key`.
    async fn get_object(&self, key: &str) -> object_store::Result<ObjectContent>;

    /// Keys of all objects starting with `prefix`, nested keys included.
    ///
    /// The stream is lazy and follows continuation tokens until the listing
    /// is exhausted. Order is whatever the backend returns.
    fn list_objects(&self, prefix: &str) -> BoxStream<'static, object_store::Result<String>>;

    /// Cheap request proving the bucket is reachable, answering with the
    /// location the client was configured for. The backend does not confirm
    /// that location.
    async fn bucket_location(&self) -> object_store::Result<String>;
}

impl Debug for dyn BucketClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "BucketClient(bucket={})", self.bucket())
    }
}

/// Backend location of `key`, taken verbatim so the stored key, the listed
/// key and the canonical URL all name the same object.
///
/// # Errors
///
/// Returns `object_store::Error::InvalidPath` for keys that cannot be stored
/// verbatim: empty keys, leading or trailing `/`, empty segments, `.` or `..`
/// segments and ASCII control characters.
pub(crate) fn object_key(key: &str) -> object_store::Result<ObjectPath> {
    let path = ObjectPath::parse(key)?;
    if key.is_empty() || path.as_ref() != key {
        return Err(object_store::path::Error::EmptySegment {
            path: key.to_string(),
        }
        .into());
    }
    Ok(path)
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-process `BucketClient` that records requests and can be told to fail.

    use super::*;
    use futures::stream::{self, StreamExt};
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Request captured by [`RecordingClient::put_object`].
    #[derive(Debug, Clone)]
    pub(crate) struct PutRequest {
        pub key: String,
        pub body: Bytes,
        pub metadata: ObjectMetadata,
    }

    #[derive(Default)]
    pub(crate) struct RecordingClient {
        bucket: String,
        objects: Mutex<BTreeMap<String, Bytes>>,
        listing: Mutex<Option<Vec<String>>>,
        pub puts: Mutex<Vec<PutRequest>>,
        pub gets: Mutex<Vec<String>>,
        pub fail: bool,
        pub location: Option<String>,
    }

    impl RecordingClient {
        pub fn new(bucket: &str) -> Self {
            Self {
                bucket: bucket.to_string(),
                location: Some("us-east-1".to_string()),
                ..Default::default()
            }
        }

        pub fn failing(bucket: &str) -> Self {
            Self {
                fail: true,
                ..Self::new(bucket)
            }
        }

        pub fn with_object(self, key: &str, body: &'static [u8]) -> Self {
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), Bytes::from_static(body));
            self
        }

        /// Keys returned by `list_objects` as-is, ignoring the prefix.
        pub fn with_listing(self, keys: &[&str]) -> Self {
            *self.listing.lock().unwrap() = Some(keys.iter().map(|k| k.to_string()).collect());
            self
        }

        pub fn last_put(&self) -> PutRequest {
            self.puts.lock().unwrap().last().cloned().unwrap()
        }

        fn backend_error() -> object_store::Error {
            object_store::Error::Generic {
                store: "Recording",
                source: "backend unavailable".into(),
            }
        }
    }

    #[async_trait]
    impl BucketClient for RecordingClient {
        fn bucket(&self) -> &str {
            &self.bucket
        }

        async fn put_object(
            &self,
            key: &str,
            body: Bytes,
            metadata: ObjectMetadata,
        ) -> object_store::Result<()> {
            self.puts.lock().unwrap().push(PutRequest {
                key: key.to_string(),
                body: body.clone(),
                metadata,
            });
            if self.fail {
                return Err(Self::backend_error());
            }
            self.objects.lock().unwrap().insert(key.to_string(), body);
            Ok(())
        }

        async fn get_object(&self, key: &str) -> object_store::Result<ObjectContent> {
            self.gets.lock().unwrap().push(key.to_string());
            if self.fail {
                return Err(Self::backend_error());
            }
            match self.objects.lock().unwrap().get(key) {
                Some(body) => {
                    let chunks: Vec<object_store::Result<Bytes>> = body
                        .chunks(4)
                        .map(|c| Ok(Bytes::copy_from_slice(c)))
                        .collect();
                    Ok(stream::iter(chunks).boxed())
                }
                None => Err(object_store::Error::NotFound {
                    path: key.to_string(),
                    source: "no such key".into(),
                }),
            }
        }

        fn list_objects(&self, prefix: &str) -> BoxStream<'static, object_store::Result<String>> {
            if self.fail {
                return stream::iter(vec![Err(Self::backend_error())]).boxed();
            }
            let keys: Vec<String> = match self.listing.lock().unwrap().clone() {
                Some(keys) => keys,
                None => self
                    .objects
                    .lock()
                    .unwrap()
                    .keys()
                    .filter(|k| k.starts_with(prefix))
                    .cloned()
                    .collect(),
            };
            stream::iter(keys.into_iter().map(Ok)).boxed()
        }

        async fn bucket_location(&self) -> object_store::Result<String> {
            if self.fail {
                return Err(Self::backend_error());
            }
            Ok(self.location.clone().unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::RecordingClient;
    use super::*;
    use futures::TryStreamExt;

    #[test]
    fn test_object_metadata_default_is_empty() {
        let metadata = ObjectMetadata::default();
        assert!(metadata.content_type.is_none());
        assert!(metadata.cache_control.is_none());
        assert!(metadata.content_encoding.is_none());
    }

    #[test]
    fn test_object_key_is_verbatim() {
        for key in ["a/b/c/d/file.txt", "docs/100%.txt", "a#b.txt", "x[1].txt", "a b/é.txt"] {
            assert_eq!(object_key(key).unwrap().as_ref(), key);
        }
    }

    #[test]
    fn test_object_key_rejects_keys_that_cannot_round_trip() {
        for key in ["", "/a.txt", "a/b/", "a//b.txt", "a/./b.txt", "../b.txt", "a/\u{7}.txt"] {
            match object_key(key) {
                Err(object_store::Error::InvalidPath { .. }) => {}
                other => panic!("Expected InvalidPath for {:?}, got {:?}", key, other),
            }
        }
    }

    #[test]
    fn test_bucket_client_debug() {
        let client: &dyn BucketClient = &RecordingClient::new("test");
        let debug_str = format!("{:?}", client);
        assert_eq!(debug_str, "BucketClient(bucket=test)");
    }

    #[tokio::test]
    async fn test_fake_round_trip() {
        let client = RecordingClient::new("test");
        client
            .put_object("a/b.txt", Bytes::from_static(b"hello"), ObjectMetadata::default())
            .await
            .unwrap();

        let chunks: Vec<Bytes> = client
            .get_object("a/b.txt")
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(chunks.concat(), b"hello".to_vec());

        let keys: Vec<String> = client.list_objects("a/").try_collect().await.unwrap();
        assert_eq!(keys, vec!["a/b.txt".to_string()]);
    }
}
