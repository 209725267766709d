//! Nominatim geocoding client
//!
//! Community provider backed by the [Nominatim](https://nominatim.openstreetmap.org)
//! API (OpenStreetMap). Implements rate limiting (max 1 request/second per
//! Nominatim usage policy) and result caching to minimize API calls.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::value_objects::GeoPoint;
use moka::future::Cache;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::client::GeocodeClient;
use crate::error::GeocodingError;

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cache TTL in hours (0 to disable)
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Country code filter (e.g., "de" for Germany)
    #[serde(default = "default_country_filter")]
    pub country_filter: String,
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    5
}

const fn default_cache_ttl_hours() -> u64 {
    24
}

fn default_country_filter() -> String {
    "de".to_string()
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_hours: default_cache_ttl_hours(),
            country_filter: default_country_filter(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing(base_url: String) -> Self {
        Self {
            base_url,
            timeout_secs: 5,
            cache_ttl_hours: 0,
            ..Default::default()
        }
    }
}

/// Nominatim-based geocoding client with rate limiting and caching
#[derive(Debug)]
pub struct NominatimClient {
    client: Client,
    config: NominatimConfig,
    cache: Cache<String, (f64, f64)>,
    last_request: Arc<Mutex<Instant>>,
}

impl NominatimClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Kiezbote/1.0 (delivery estimation)")
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        let cache_ttl = if config.cache_ttl_hours > 0 {
            Duration::from_secs(config.cache_ttl_hours * 3600)
        } else {
            Duration::from_secs(1) // Minimal TTL when "disabled"
        };

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(cache_ttl)
            .build();

        // Backdate so the first request is never rate limited
        let now = Instant::now();
        let last_request = now.checked_sub(Duration::from_secs(2)).unwrap_or(now);

        Ok(Self {
            client,
            config,
            cache,
            last_request: Arc::new(Mutex::new(last_request)),
        })
    }

    /// Enforce Nominatim's rate limit (max 1 request per second)
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < Duration::from_millis(1100) {
            let wait = Duration::from_millis(1100).saturating_sub(elapsed);
            debug!(?wait, "Rate limiting geocoding request");
            tokio::time::sleep(wait).await;
        }
        *last = Instant::now();
    }
}

#[async_trait]
impl GeocodeClient for NominatimClient {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    fn is_configured(&self) -> bool {
        // Keyless community service; available whenever a base URL exists
        !self.config.base_url.is_empty()
    }

    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodingError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodingError::AddressNotFound(
                "Address must not be empty".to_string(),
            ));
        }

        // Check cache first
        let cache_key = address.to_lowercase();
        if let Some((lat, lon)) = self.cache.get(&cache_key).await {
            debug!(%address, "Geocoding cache hit");
            return GeoPoint::new(lat, lon).map_err(|e| GeocodingError::ParseError(e.to_string()));
        }

        self.rate_limit().await;

        let url = format!("{}/search", self.config.base_url);
        let mut params = vec![
            ("q", address.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", "1".to_string()),
            ("accept-language", "de,en".to_string()),
        ];

        if !self.config.country_filter.is_empty() {
            params.push(("countrycodes", self.config.country_filter.clone()));
        }

        debug!(%address, "Geocoding via Nominatim");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(GeocodingError::RequestFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let result = results
            .first()
            .ok_or_else(|| GeocodingError::AddressNotFound(address.to_string()))?;

        let lat: f64 = result
            .lat
            .parse()
            .map_err(|_| GeocodingError::ParseError("Invalid latitude".to_string()))?;
        let lon: f64 = result
            .lon
            .parse()
            .map_err(|_| GeocodingError::ParseError("Invalid longitude".to_string()))?;

        // Cache the result
        self.cache.insert(cache_key, (lat, lon)).await;
        debug!(%address, %lat, %lon, "Geocoded address");

        GeoPoint::new(lat, lon).map_err(|e| GeocodingError::ParseError(e.to_string()))
    }
}

/// Raw Nominatim API response
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
}
