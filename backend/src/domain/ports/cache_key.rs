//! Canonical cache key for weather records.
//!
//! Every lookup derives its key from the raw city string, so two requests
//! differing only in case or surrounding whitespace share one cache entry.
use thiserror::Error;

/// Namespace prepended to every weather cache key.
pub const WEATHER_CACHE_KEY_PREFIX: &str = "weather:";

/// Cache key addressing one city's raw weather payload.
///
/// ## Invariants
/// - Always starts with [`WEATHER_CACHE_KEY_PREFIX`].
/// - The city part is trimmed and ASCII-lowercased; non-ASCII letters are
///   kept as-is.
///
/// # Examples
/// ```
/// use weather_gateway::domain::ports::WeatherCacheKey;
///
/// let key = WeatherCacheKey::for_city("  Paris ").expect("city is not blank");
/// assert_eq!(key.as_str(), "weather:paris");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeatherCacheKey(String);

impl WeatherCacheKey {
    /// Derive the key for a raw city string.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherCacheKeyError::Empty`] when the city is blank after
    /// trimming.
    pub fn for_city(raw: &str) -> Result<Self, WeatherCacheKeyError> {
        let city = raw.trim();
        if city.is_empty() {
            return Err(WeatherCacheKeyError::Empty);
        }
        Ok(Self(format!(
            "{WEATHER_CACHE_KEY_PREFIX}{}",
            city.to_ascii_lowercase()
        )))
    }

    /// Borrow the full key, prefix included.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Borrow the normalised city portion without the namespace prefix.
    pub fn city_part(&self) -> &str {
        self.0
            .strip_prefix(WEATHER_CACHE_KEY_PREFIX)
            .unwrap_or(self.0.as_str())
    }
}

impl std::fmt::Display for WeatherCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for WeatherCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Errors returned when deriving a [`WeatherCacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherCacheKeyError {
    /// City is empty after trimming whitespace.
    #[error("city must not be blank")]
    Empty,
}
