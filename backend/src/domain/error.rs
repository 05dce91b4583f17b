//! Classified failures of the weather lookup.
//!
//! These errors are transport agnostic. The HTTP adapter decides which status
//! code each kind maps to; the domain only records what failed and where.

use super::ports::{WeatherCacheError, WeatherSourceError, define_port_error};

/// Step of the lookup at which a failure happened, used as log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupStage {
    /// Input validation or key derivation.
    Input,
    /// Reading the cache.
    CacheRead,
    /// Calling the provider.
    UpstreamFetch,
    /// Converting the provider payload.
    Transform,
    /// Writing the cache.
    CacheWrite,
    /// Removing a cache entry.
    CacheDelete,
}

impl LookupStage {
    /// Stable snake_case label for logs and metrics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::CacheRead => "cache_read",
            Self::UpstreamFetch => "upstream_fetch",
            Self::Transform => "transform",
            Self::CacheWrite => "cache_write",
            Self::CacheDelete => "cache_delete",
        }
    }
}

impl std::fmt::Display for LookupStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

define_port_error! {
    /// Failure kinds returned by the lookup.
    pub enum WeatherLookupError {
        /// The caller supplied an unusable city.
        InvalidInput { message: String } => "{message}",
        /// The provider could not be reached.
        UpstreamUnreachable { message: String } => "Connection Error: {message}",
        /// The provider answered with a non-success status.
        UpstreamHttp { status_code: u16, message: String } =>
            "API Error: {status_code} - {message}",
        /// The provider request could not be issued.
        UpstreamClient { detail: String } => "Internal error: {detail}",
        /// The provider payload lacks the fields the summary needs.
        MalformedUpstreamData { message: String } =>
            "malformed upstream data: {message}",
        /// The cache store failed during a read, write or delete.
        CacheUnavailable { stage: LookupStage, message: String } =>
            "cache unavailable during {stage}: {message}",
    }
}

impl WeatherLookupError {
    /// Step at which the failure happened.
    pub fn stage(&self) -> LookupStage {
        match self {
            Self::InvalidInput { .. } => LookupStage::Input,
            Self::UpstreamUnreachable { .. }
            | Self::UpstreamHttp { .. }
            | Self::UpstreamClient { .. } => LookupStage::UpstreamFetch,
            Self::MalformedUpstreamData { .. } => LookupStage::Transform,
            Self::CacheUnavailable { stage, .. } => *stage,
        }
    }

    /// Whether the failure is the caller's fault rather than the service's.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Wrap a cache adapter failure observed at `stage`.
    pub fn from_cache(stage: LookupStage, error: &WeatherCacheError) -> Self {
        Self::cache_unavailable(stage, error.to_string())
    }
}

impl From<WeatherSourceError> for WeatherLookupError {
    fn from(value: WeatherSourceError) -> Self {
        match value {
            WeatherSourceError::Http {
                status_code,
                message,
            } => Self::UpstreamHttp {
                status_code,
                message,
            },
            WeatherSourceError::Unreachable { message } => Self::UpstreamUnreachable { message },
            WeatherSourceError::Client { detail } => Self::UpstreamClient { detail },
            WeatherSourceError::Decode { message } => Self::MalformedUpstreamData { message },
        }
    }
}
