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

use thiserror::Error;

/// Boxed cause carried by the backend-facing error variants
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unable to store to s3://{bucket}/{path}")]
    StoreError {
        bucket: String,
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("Unable to get s3://{bucket}/{path}")]
    GetError {
        bucket: String,
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("Unable to list s3://{bucket}/{path}")]
    ListError {
        bucket: String,
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("Invalid object key s3://{bucket}/{path}")]
    InvalidKey {
        bucket: String,
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("URL {url} does not belong to bucket {bucket}")]
    ForeignUrl { bucket: String, url: String },
}

impl From<url::ParseError> for StorageError {
    fn from(e: url::ParseError) -> Self {
        StorageError::ConfigError(format!("Invalid URL: {}", e))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
