// Catalog - fixed location and phrase tables feeding the generator
//
// Tables are validated once at construction so generation can index into
// them without a failure path.

use std::collections::HashMap;

use crate::error::FeedError;
use crate::feed::ActivityType;

/// Named forest location with base coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct ForestLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl ForestLocation {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }
}

const DEFAULT_LOCATIONS: [(&str, f64, f64); 15] = [
    ("Sundarbans, West Bengal", 21.9497, 88.4297),
    ("Jim Corbett, Uttarakhand", 29.5951, 78.7718),
    ("Kaziranga, Assam", 26.5774, 93.1717),
    ("Bandipur, Karnataka", 11.6854, 76.6847),
    ("Ranthambore, Rajasthan", 26.0173, 76.5026),
    ("Periyar, Kerala", 9.5009, 77.2378),
    ("Gir Forest, Gujarat", 21.1249, 70.7947),
    ("Tadoba, Maharashtra", 20.2133, 79.3270),
    ("Bandhavgarh, Madhya Pradesh", 23.7117, 81.0318),
    ("Nagarhole, Karnataka", 12.0262, 76.1090),
    ("Mudumalai, Tamil Nadu", 11.5744, 76.5390),
    ("Silent Valley, Kerala", 11.0933, 76.4497),
    ("Simlipal, Odisha", 21.8631, 86.2269),
    ("Pench, Madhya Pradesh", 21.6425, 79.2955),
    ("Sariska, Rajasthan", 27.3048, 76.3908),
];

fn phrases_for(activity_type: ActivityType) -> &'static [&'static str] {
    match activity_type {
        ActivityType::Poaching => &[
            "Suspicious human activity detected near wildlife corridor",
            "Unauthorized weapons detected by thermal imaging",
            "Unusual movement patterns suggesting hunting activity",
        ],
        ActivityType::AnimalMovement => &[
            "Tiger family moving through protected zone",
            "Elephant herd migration detected",
            "Leopard spotted in new territory",
        ],
        ActivityType::IllegalLogging => &[
            "Chainsaw sounds detected in restricted area",
            "Unauthorized tree cutting activity",
            "Illegal timber transport vehicles spotted",
        ],
        ActivityType::VehicleIntrusion => &[
            "Unauthorized vehicle entered protected zone",
            "Motorcycle activity in core area",
            "Suspicious vehicle movement at night",
        ],
        ActivityType::FireDetection => &[
            "Smoke detected in forest area",
            "Temperature anomaly suggesting fire",
            "Potential wildfire risk identified",
        ],
        ActivityType::ConservationPatrol => &[
            "Ranger patrol completed successfully",
            "Camera trap maintenance completed",
            "Wildlife monitoring checkpoint active",
        ],
    }
}

/// Location table plus per-type description phrases.
#[derive(Debug, Clone)]
pub struct FeedCatalog {
    locations: Vec<ForestLocation>,
    phrases: HashMap<ActivityType, Vec<String>>,
}

impl FeedCatalog {
    /// Build a catalog, rejecting empty tables.
    ///
    /// # Errors
    /// `FeedError::Configuration` when the location table is empty or any of
    /// the six activity types has no phrases.
    pub fn new(
        locations: Vec<ForestLocation>,
        phrases: HashMap<ActivityType, Vec<String>>,
    ) -> Result<Self, FeedError> {
        if locations.is_empty() {
            return Err(FeedError::Configuration {
                reason: "location table is empty".to_string(),
            });
        }

        for activity_type in ActivityType::ALL {
            let empty = phrases
                .get(&activity_type)
                .map(|list| list.is_empty())
                .unwrap_or(true);
            if empty {
                return Err(FeedError::Configuration {
                    reason: format!("no descriptions for '{}'", activity_type.as_str()),
                });
            }
        }

        Ok(Self { locations, phrases })
    }

    /// Built-in phrase table, three descriptions per activity type
    pub fn default_phrases() -> HashMap<ActivityType, Vec<String>> {
        ActivityType::ALL
            .iter()
            .map(|t| {
                let list = phrases_for(*t).iter().map(|p| p.to_string()).collect();
                (*t, list)
            })
            .collect()
    }

    pub fn locations(&self) -> &[ForestLocation] {
        &self.locations
    }

    /// Phrases for a type. Never empty after construction.
    pub fn phrases(&self, activity_type: ActivityType) -> &[String] {
        self.phrases
            .get(&activity_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for FeedCatalog {
    /// The 15 Indian reserves and three phrases per activity type
    fn default() -> Self {
        let locations = DEFAULT_LOCATIONS
            .iter()
            .map(|(name, lat, lng)| ForestLocation::new(*name, *lat, *lng))
            .collect();
        Self {
            locations,
            phrases: Self::default_phrases(),
        }
    }
}
