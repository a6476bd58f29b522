use crate::config::ReceiverConfig;

use serde::Deserialize;

/// Dedup key shared by every aircraft that reports no flight code.
pub const UNAVAILABLE_FLIGHT: &str = "Unavailable";

/// One aircraft entry from the receiver's `aircraft.json` document. Every
/// field is optional; transponders routinely omit position or identity.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct AircraftRecord {
    #[serde(default)]
    pub flight: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "numeric_or_none")]
    pub alt_baro: Option<f64>,
}

impl AircraftRecord {
    #[must_use]
    pub fn flight_code(&self) -> &str {
        self.flight.as_deref().unwrap_or(UNAVAILABLE_FLIGHT)
    }
}

#[derive(Debug, Deserialize)]
pub struct AircraftFeed {
    pub aircraft: Vec<AircraftRecord>,
}

// dump1090 reports `alt_baro: "ground"` for taxiing aircraft. Any
// non-numeric altitude is treated as absent rather than failing the
// whole document.
fn numeric_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

#[derive(Debug)]
pub enum FeedError {
    Http(Box<ureq::Error>),
    Decode(std::io::Error),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Http(error) => write!(f, "Failed to fetch aircraft feed: {error}"),
            FeedError::Decode(error) => write!(f, "Failed to decode aircraft feed: {error}"),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Http(error) => Some(error),
            FeedError::Decode(error) => Some(error),
        }
    }
}

pub trait AircraftSource {
    fn fetch(&self) -> Result<Vec<AircraftRecord>, FeedError>;
}

/// HTTP client for the receiver's JSON feed. One GET per cycle, no retry.
pub struct FeedClient {
    agent: ureq::Agent,
    url: String,
}

impl FeedClient {
    #[must_use]
    pub fn new(config: &ReceiverConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build();
        FeedClient {
            agent,
            url: config.url.clone(),
        }
    }
}

impl AircraftSource for FeedClient {
    fn fetch(&self) -> Result<Vec<AircraftRecord>, FeedError> {
        let response = self
            .agent
            .get(&self.url)
            .call()
            .map_err(|error| FeedError::Http(Box::new(error)))?;
        let feed: AircraftFeed = response.into_json().map_err(FeedError::Decode)?;
        Ok(feed.aircraft)
    }
}
