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

//! Object storage abstraction
//!
//! [`StorageService`] stores, retrieves and enumerates the objects of one
//! bucket, addressing them by canonical URLs. [`S3StorageService`] implements
//! it on top of a [`BucketClient`], which [`ObjectStoreClient`] provides for
//! AWS S3, the local filesystem and memory through the `object_store` crate.

pub mod client;
pub mod config;
pub mod error;
pub mod factory;
pub mod object_store;
pub mod s3;
pub mod service;

// Public exports
pub use client::{BucketClient, ObjectContent, ObjectMetadata};
pub use config::{StorageConfig, StorageType, DEFAULT_PUBLIC_URL};
pub use error::{StorageError, StorageResult};
pub use factory::{Storage, StorageFactory};
pub use self::object_store::ObjectStoreClient;
pub use s3::S3StorageService;
pub use service::{StorageService, StoreOptions};
