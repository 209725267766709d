//! Shop identifier value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a shop, as issued by the external shop data source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShopId(String);

impl ShopId {
    /// Create a shop id from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ShopId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
