//! Space feed settings.

use serde::{Deserialize, Serialize};

/// Open Notify's current-position endpoint.
pub const DEFAULT_ISS_URL: &str = "http://api.open-notify.org/iss-now.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceConfig {
    pub iss_url: String,
    /// How long a fetched position is served before refetching.
    pub cache_ttl_secs: u64,
    pub timeout_secs: u64,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            iss_url: DEFAULT_ISS_URL.to_string(),
            cache_ttl_secs: 60,
            timeout_secs: 10,
        }
    }
}
