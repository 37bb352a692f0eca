use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables of [`PasteService`](crate::PasteService).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Lifetime of a `name → hash` cache entry populated by a read.
    pub cache_ttl_secs: u64,
    /// Deadline for a whole create or read, across all backend calls.
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: paste_cache::DEFAULT_TTL.as_secs(),
            request_timeout_secs: 10,
        }
    }
}

impl ServiceConfig {
    /// Largest accepted `cache_ttl_secs` (one day).
    pub const MAX_CACHE_TTL_SECS: u64 = 24 * 60 * 60;
    /// Largest accepted `request_timeout_secs` (one hour).
    pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 60 * 60;

    /// Cache entry lifetime, capped at [`Self::MAX_CACHE_TTL_SECS`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs.min(Self::MAX_CACHE_TTL_SECS))
    }

    /// Per-request deadline, between one second and
    /// [`Self::MAX_REQUEST_TIMEOUT_SECS`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .clamp(1, Self::MAX_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Reject values outside the supported ranges.
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_ttl_secs > Self::MAX_CACHE_TTL_SECS {
            return Err(format!(
                "cache_ttl_secs = {} exceeds the maximum of {}",
                self.cache_ttl_secs,
                Self::MAX_CACHE_TTL_SECS
            ));
        }
        if self.request_timeout_secs > Self::MAX_REQUEST_TIMEOUT_SECS {
            return Err(format!(
                "request_timeout_secs = {} exceeds the maximum of {}",
                self.request_timeout_secs,
                Self::MAX_REQUEST_TIMEOUT_SECS
            ));
        }
        Ok(())
    }
}
