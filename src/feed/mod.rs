//! Activity feed - simulated geotagged conservation and threat events.
//!
//! The simulator owns a bounded, insertion-ordered buffer of
//! [`ActivityEvent`] records. Display layers only ever receive copies.
//!
//! Pipeline: [`FeedCatalog`] tables → [`EventGenerator`] → [`FeedSimulator`]
//! buffer → (optionally) [`LiveFeed`] timer + broadcast channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod clock;
pub mod generator;
pub mod live;
pub mod simulator;
pub mod stats;

pub use catalog::{FeedCatalog, ForestLocation};
pub use clock::{Clock, FixedClock, SystemClock};
pub use generator::{EventGenerator, EventSource};
pub use live::LiveFeed;
pub use simulator::FeedSimulator;
pub use stats::ActivityStats;

/// Kind of activity reported by the simulated sensor network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityType {
    Poaching,
    AnimalMovement,
    IllegalLogging,
    VehicleIntrusion,
    FireDetection,
    ConservationPatrol,
}

impl ActivityType {
    /// All types in table order. Uniform picks index into this slice.
    pub const ALL: [ActivityType; 6] = [
        ActivityType::Poaching,
        ActivityType::AnimalMovement,
        ActivityType::IllegalLogging,
        ActivityType::VehicleIntrusion,
        ActivityType::FireDetection,
        ActivityType::ConservationPatrol,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Poaching => "poaching",
            ActivityType::AnimalMovement => "animal-movement",
            ActivityType::IllegalLogging => "illegal-logging",
            ActivityType::VehicleIntrusion => "vehicle-intrusion",
            ActivityType::FireDetection => "fire-detection",
            ActivityType::ConservationPatrol => "conservation-patrol",
        }
    }

    /// Threat types whose severity is never `Low`
    pub fn is_escalated(&self) -> bool {
        matches!(self, ActivityType::Poaching | ActivityType::FireDetection)
    }
}

impl std::str::FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown activity type '{}'", s))
    }
}

/// Alert severity attached to each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];
}

/// A single synthetic feed record. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// `<source>_<sequence>_<unix millis>`, unique across the process
    pub id: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub latitude: f64,
    pub longitude: f64,
    /// Place name of the catalog entry the coordinates were jittered from
    pub location: String,
    pub severity: Severity,
    /// Serialized as RFC 3339 / ISO-8601
    pub timestamp: DateTime<Utc>,
    pub description: String,
    /// Integer percentage in [70, 99]
    pub confidence: u8,
}
