//! PositionStack geocoding client
//!
//! Key-based primary provider. An absent or placeholder access key makes
//! the client unconfigured; callers skip it instead of treating that as an
//! error.

use std::time::Duration;

use async_trait::async_trait;
use domain::value_objects::GeoPoint;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::client::GeocodeClient;
use crate::error::GeocodingError;

/// Placeholder value shipped in config templates; treated as "no key"
const PLACEHOLDER_KEY: &str = "YOUR_ACCESS_KEY";

/// Configuration for the PositionStack geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionStackConfig {
    /// Base URL for the PositionStack API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API access key; None or the placeholder disables the provider
    #[serde(default)]
    pub access_key: Option<String>,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.positionstack.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    5
}

impl Default for PositionStackConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl PositionStackConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing(base_url: String) -> Self {
        Self {
            base_url,
            access_key: Some("test-key".to_string()),
            timeout_secs: 5,
        }
    }

    /// Whether a usable access key is present
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.access_key
            .as_deref()
            .is_some_and(|key| !key.is_empty() && key != PLACEHOLDER_KEY)
    }
}

/// PositionStack HTTP client
#[derive(Debug)]
pub struct PositionStackClient {
    client: Client,
    config: PositionStackConfig,
}

impl PositionStackClient {
    /// Create a new PositionStack client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: PositionStackConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl GeocodeClient for PositionStackClient {
    fn name(&self) -> &'static str {
        "positionstack"
    }

    fn is_configured(&self) -> bool {
        self.config.has_credentials()
    }

    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodingError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodingError::AddressNotFound(
                "Address must not be empty".to_string(),
            ));
        }
        if !self.config.has_credentials() {
            return Err(GeocodingError::MissingCredentials("positionstack"));
        }
        let key = self.config.access_key.as_deref().unwrap_or_default();

        let url = format!("{}/v1/forward", self.config.base_url);
        let params = [
            ("access_key", key.to_string()),
            ("query", address.to_string()),
            ("limit", "1".to_string()),
        ];

        debug!(%address, "Geocoding via PositionStack");

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

        let body: ForwardResponse = response
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let hit = body
            .data
            .first()
            .ok_or_else(|| GeocodingError::AddressNotFound(address.to_string()))?;

        let point = GeoPoint::new(hit.latitude, hit.longitude)
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;
        debug!(%address, %point, "Geocoded address");
        Ok(point)
    }
}

/// Raw PositionStack forward-geocoding response
#[derive(Debug, Deserialize)]
struct ForwardResponse {
    #[serde(default)]
    data: Vec<ForwardHit>,
}

#[derive(Debug, Deserialize)]
struct ForwardHit {
    latitude: f64,
    longitude: f64,
}
