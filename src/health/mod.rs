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

//! Backend liveness reporting
//!
//! A [`HealthIndicator`] probes the storage backend with a single cheap
//! request and reports the outcome as a [`Health`] value. Probing never
//! fails: backend errors are folded into a `DOWN` status.

pub mod s3;

pub use s3::S3HealthIndicator;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Liveness of a backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Up,
    Down,
}

/// Outcome of one health probe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Health {
    pub status: Status,

    /// Bucket that was probed
    pub bucket: String,

    /// Wall-clock time spent on the probe
    pub latency_millis: u64,

    /// Where the bucket lives, reported when the probe succeeds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Why the probe failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Health {
    pub fn up(bucket: impl Into<String>, location: impl Into<String>, latency_millis: u64) -> Self {
        Self {
            status: Status::Up,
            bucket: bucket.into(),
            latency_millis,
            location: Some(location.into()),
            error: None,
        }
    }

    pub fn down(bucket: impl Into<String>, error: impl Into<String>, latency_millis: u64) -> Self {
        Self {
            status: Status::Down,
            bucket: bucket.into(),
            latency_millis,
            location: None,
            error: Some(error.into()),
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == Status::Up
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, JsonError> {
        serde_json::to_string_pretty(self)
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Status::Up => write!(f, "UP"),
            Status::Down => write!(f, "DOWN"),
        }
    }
}

impl Display for Health {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} bucket={} latency={}ms",
            self.status, self.bucket, self.latency_millis
        )?;
        if let Some(location) = &self.location {
            write!(f, " location={}", location)?;
        }
        if let Some(error) = &self.error {
            write!(f, " error={}", error)?;
        }
        Ok(())
    }
}

/// Reports the health of a storage backend.
#[async_trait]
pub trait HealthIndicator: Send + Sync {
    /// Probe the backend once. Never fails and never retries.
    async fn health(&self) -> Health;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_up() {
        let health = Health::up("foo", "us-east-1", 12);

        assert!(health.is_up());
        assert_eq!(health.location.as_deref(), Some("us-east-1"));
        assert!(health.error.is_none());
        assert_eq!(health.to_string(), "UP bucket=foo latency=12ms location=us-east-1");
    }

    #[test]
    fn test_health_down() {
        let health = Health::down("foo", "connection refused", 3);

        assert!(!health.is_up());
        assert!(health.location.is_none());
        assert_eq!(
            health.to_string(),
            "DOWN bucket=foo latency=3ms error=connection refused"
        );
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&Status::Up).unwrap(), "\"UP\"");
        assert_eq!(serde_json::to_string(&Status::Down).unwrap(), "\"DOWN\"");
    }

    #[test]
    fn test_health_json_skips_missing_details() {
        let json = Health::up("foo", "eu-west-1", 7).to_json().unwrap();

        assert!(json.contains("\"status\": \"UP\""));
        assert!(json.contains("\"location\": \"eu-west-1\""));
        assert!(json.contains("\"latency_millis\": 7"));
        assert!(!json.contains("error"));
    }

    #[test]
    fn test_health_json_round_trip() {
        let health = Health::down("foo", "boom", 1);
        let parsed: Health = serde_json::from_str(&health.to_json().unwrap()).unwrap();
        assert_eq!(parsed, health);
    }
}
