//! Live ISS position with last-known fallback.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::SpaceConfig;
use crate::error::SpaceError;

/// Where the ISS is, as far as we know.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// When the feed reported this position.
    pub timestamp: DateTime<Utc>,
    /// True when the live feed failed and this is an older (or zero) value.
    pub stale: bool,
}

impl IssPosition {
    fn unknown() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            timestamp: DateTime::<Utc>::default(),
            stale: true,
        }
    }
}

#[derive(Deserialize)]
struct OpenNotifyResponse {
    message: String,
    timestamp: i64,
    iss_position: OpenNotifyPosition,
}

/// Coordinates arrive as decimal strings.
#[derive(Deserialize)]
struct OpenNotifyPosition {
    latitude: String,
    longitude: String,
}

/// Parse an Open Notify `iss-now` payload.
pub fn parse_position(body: &str) -> Result<IssPosition, SpaceError> {
    let raw: OpenNotifyResponse = serde_json::from_str(body).map_err(|e| SpaceError::Decode(e.to_string()))?;
    if raw.message != "success" {
        return Err(SpaceError::Decode(format!("message was {:?}", raw.message)));
    }

    let coordinate = |value: &str, limit: f64| -> Result<f64, SpaceError> {
        let parsed: f64 = value
            .trim()
            .parse()
            .map_err(|_| SpaceError::Decode(format!("bad coordinate {:?}", value)))?;
        if parsed.abs() > limit {
            return Err(SpaceError::Decode(format!("coordinate {} out of range", parsed)));
        }
        Ok(parsed)
    };

    Ok(IssPosition {
        latitude: coordinate(&raw.iss_position.latitude, 90.0)?,
        longitude: coordinate(&raw.iss_position.longitude, 180.0)?,
        timestamp: DateTime::from_timestamp(raw.timestamp, 0)
            .ok_or_else(|| SpaceError::Decode(format!("bad timestamp {}", raw.timestamp)))?,
        stale: false,
    })
}

/// Polls the ISS feed on demand and remembers the last good answer.
pub struct IssTracker {
    client: reqwest::Client,
    url: String,
    ttl: Duration,
    last: RwLock<Option<(Instant, IssPosition)>>,
}

impl IssTracker {
    pub fn new(config: &SpaceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            url: config.iss_url.clone(),
            ttl: Duration::from_secs(config.cache_ttl_secs),
            last: RwLock::new(None),
        }
    }

    /// Fetch the current position from the feed.
    pub async fn fetch(&self) -> Result<IssPosition, SpaceError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(SpaceError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        parse_position(&body)
    }

    /// Current position: cached while fresh, refetched otherwise. Never fails;
    /// on feed errors the last known position (or zero) comes back marked stale.
    pub async fn snapshot(&self) -> IssPosition {
        if let Some((at, position)) = self.last.read().await.as_ref() {
            if at.elapsed() < self.ttl {
                return position.clone();
            }
        }

        match self.fetch().await {
            Ok(position) => {
                debug!(lat = position.latitude, lon = position.longitude, "ISS position updated");
                *self.last.write().await = Some((Instant::now(), position.clone()));
                position
            }
            Err(e) => {
                warn!(error = %e, "ISS feed unavailable, serving last known position");
                self.last
                    .read()
                    .await
                    .as_ref()
                    .map(|(_, position)| IssPosition { stale: true, ..position.clone() })
                    .unwrap_or_else(IssPosition::unknown)
            }
        }
    }

    #[cfg(test)]
    async fn remember(&self, at: Instant, position: IssPosition) {
        *self.last.write().await = Some((at, position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"message": "success", "timestamp": 1700000000,
        "iss_position": {"latitude": "-12.3456", "longitude": "145.0021"}}"#;

    fn offline() -> IssTracker {
        IssTracker::new(&SpaceConfig {
            iss_url: "http://127.0.0.1:9/iss-now.json".to_string(),
            cache_ttl_secs: 60,
            timeout_secs: 1,
        })
    }

    #[test]
    fn test_parse_position() {
        let position = parse_position(SAMPLE).unwrap();
        assert_eq!(position.latitude, -12.3456);
        assert_eq!(position.longitude, 145.0021);
        assert_eq!(position.timestamp.timestamp(), 1_700_000_000);
        assert!(!position.stale);
    }

    #[test]
    fn test_parse_rejects_bad_payloads() {
        assert!(parse_position("not json").is_err());
        let failed = SAMPLE.replace("success", "failure");
        assert!(parse_position(&failed).is_err());
        let out_of_range = SAMPLE.replace("-12.3456", "-95.0");
        assert!(parse_position(&out_of_range).is_err());
    }

    #[tokio::test]
    async fn test_offline_without_history_is_zero_and_stale() {
        let position = offline().snapshot().await;
        assert!(position.stale);
        assert_eq!(position.latitude, 0.0);
    }

    #[tokio::test]
    async fn test_fresh_cache_served_without_fetch() {
        let tracker = offline();
        let known = parse_position(SAMPLE).unwrap();
        tracker.remember(Instant::now(), known.clone()).await;
        assert_eq!(tracker.snapshot().await, known);
    }

    #[tokio::test]
    async fn test_expired_cache_falls_back_stale() {
        let tracker = IssTracker::new(&SpaceConfig {
            iss_url: "http://127.0.0.1:9/iss-now.json".to_string(),
            cache_ttl_secs: 0,
            timeout_secs: 1,
        });
        let known = parse_position(SAMPLE).unwrap();
        tracker.remember(Instant::now(), known.clone()).await;

        let position = tracker.snapshot().await;
        assert!(position.stale);
        assert_eq!(position.latitude, known.latitude);
    }
}
