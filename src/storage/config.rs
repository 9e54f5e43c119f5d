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

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::error::{StorageError, StorageResult};

/// Scheme and host of canonical object URLs unless `public_url` overrides it.
pub const DEFAULT_PUBLIC_URL: &str = "https://s3.amazonaws.com";

/// Backend holding the bucket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// AWS S3 or an S3-compatible service
    #[serde(alias = "s3")]
    Aws,
    /// Local filesystem, rooted at the `path` option
    Local,
    /// In-process memory
    Memory,
}

impl StorageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Aws => "aws",
            StorageType::Local => "local",
            StorageType::Memory => "memory",
        }
    }

    /// Whether the backend talks to a remote service through an HTTP client.
    fn is_remote(&self) -> bool {
        matches!(self, StorageType::Aws)
    }
}

impl FromStr for StorageType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" | "s3" => Ok(StorageType::Aws),
            "local" | "file" => Ok(StorageType::Local),
            "memory" => Ok(StorageType::Memory),
            other => Err(StorageError::ConfigError(format!(
                "Unknown storage type '{}' (expected aws, s3, local or memory)",
                other
            ))),
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where objects of a storage service live.
///
/// Backend-specific options live in a flat map and are applied to the
/// `object_store` builders as-is.
///
/// # Examples
///
/// ```
/// use s3_storage::storage::{StorageConfig, StorageType};
///
/// let s3 = StorageConfig::aws()
///     .with_option("bucket", "assets")
///     .with_option("region", "eu-west-1");
/// assert_eq!(s3.bucket().unwrap(), "assets");
///
/// let dev: StorageConfig = "local".parse::<StorageType>().unwrap().into();
/// let dev = dev.with_option("bucket", "assets").with_option("path", "/tmp/assets");
/// assert_eq!(dev.storage_type, StorageType::Local);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(rename = "type")]
    pub storage_type: StorageType,

    /// All backends:
    /// - bucket: Bucket name (required)
    /// - public_url: `<scheme>://<host>` of canonical URLs (default `https://s3.amazonaws.com`).
    ///   Objects keep the bucket as first path segment whatever host is used.
    ///
    /// AWS S3:
    /// - region (default "us-east-1"), access_key_id, secret_access_key
    /// - session_token or token: credentials of a temporary session
    /// - endpoint: S3-compatible service URL, with allow_http = "true" for plain HTTP
    ///
    /// Local:
    /// - path: Root directory, must exist
    ///
    /// HTTP client (seconds, "0" or "disabled" to turn a timeout off):
    /// - timeout, connect_timeout, pool_idle_timeout, pool_max_idle_per_host
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl StorageConfig {
    /// Configuration for `storage_type`, with HTTP client defaults for remote backends.
    pub fn new(storage_type: StorageType) -> Self {
        let options = if storage_type.is_remote() {
            Self::default_options()
        } else {
            HashMap::new()
        };
        Self {
            storage_type,
            options,
        }
    }

    pub fn aws() -> Self {
        Self::new(StorageType::Aws)
    }

    pub fn local() -> Self {
        Self::new(StorageType::Local)
    }

    pub fn memory() -> Self {
        Self::new(StorageType::Memory)
    }

    /// Request timeouts and connection pool settings used unless overridden.
    pub fn default_options() -> HashMap<String, String> {
        HashMap::from(
            [
                ("timeout", "30"),
                ("connect_timeout", "5"),
                ("pool_idle_timeout", "15"),
                ("pool_max_idle_per_host", "5"),
            ]
            .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    /// Set `key`, replacing any previous value.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Merge `options` over the current ones.
    pub fn with_options<K, V>(mut self, options: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.options
            .extend(options.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn get_option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Name of the bucket, required for every backend.
    pub fn bucket(&self) -> StorageResult<&str> {
        match self.get_option("bucket") {
            Some(bucket) if !bucket.trim().is_empty() => Ok(bucket),
            _ => Err(StorageError::ConfigError(format!(
                "{} storage requires 'bucket' option",
                self.storage_type
            ))),
        }
    }

    /// `<scheme>://<host>` part of canonical object URLs.
    pub fn public_url(&self) -> &str {
        self.get_option("public_url").unwrap_or(DEFAULT_PUBLIC_URL)
    }

    pub fn storage_type_str(&self) -> &str {
        self.storage_type.as_str()
    }
}

impl From<StorageType> for StorageConfig {
    fn from(storage_type: StorageType) -> Self {
        Self::new(storage_type)
    }
}
