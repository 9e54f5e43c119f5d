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

//! # s3-storage
//!
//! A small object storage layer: store, fetch and enumerate the objects of a
//! single bucket by path, and address them with canonical URLs of the form
//! `https://s3.amazonaws.com/<bucket>/<path>`.
//!
//! Backends are provided by the `object_store` crate (AWS S3 and compatible
//! services, the local filesystem, memory). A health indicator reports
//! whether the bucket is reachable and how long it took to answer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use s3_storage::{HealthIndicator, StorageConfig, StorageFactory, StorageService, StoreOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let config = StorageConfig::aws()
//!     .with_option("bucket", "my-bucket")
//!     .with_option("region", "us-east-1");
//!
//! let storage = StorageFactory::from_config(config)?;
//!
//! let mut content: &[u8] = b"hello";
//! let url = storage
//!     .service
//!     .store(
//!         "document/hello.txt",
//!         &mut content,
//!         StoreOptions::default()
//!             .with_content_type("text/plain")
//!             .with_ttl_seconds(3600),
//!     )
//!     .await?;
//!
//! let mut out = Vec::new();
//! storage.service.get(&url, &mut out).await?;
//!
//! println!("{}", storage.health.health().await);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`storage`] - Storage service, backend client and configuration
//! - [`health`] - Backend health reporting

pub mod health;
pub mod storage;

// Re-export commonly used types
pub use health::{Health, HealthIndicator, Status};
pub use storage::{
    StorageConfig, StorageError, StorageFactory, StorageResult, StorageService, StoreOptions,
};
pub use url::Url;
