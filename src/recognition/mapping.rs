// SpeciesMapping - ordered keyword table from generic labels to wildlife
//
// Matching is substring containment on the lower-cased label and the first
// entry that matches wins, so table order is part of the contract
// ("snow leopard" hits `leopard` before `lion` would ever be considered).

use crate::recognition::ClassificationResult;

pub const UNKNOWN_BEHAVIOR: &str = "Unknown behavior";
pub const UNKNOWN_LOCATION: &str = "Location to be determined";

/// Domain record attached to a keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesProfile {
    pub species: String,
    pub behavior: String,
    pub location: String,
}

impl SpeciesProfile {
    pub fn new(
        species: impl Into<String>,
        behavior: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            species: species.into(),
            behavior: behavior.into(),
            location: location.into(),
        }
    }
}

const DEFAULT_TABLE: [(&str, &str, &str, &str); 10] = [
    ("tiger", "Bengal Tiger", "Hunting patrol", "Sundarbans National Park"),
    ("elephant", "Asian Elephant", "Feeding", "Kaziranga National Park"),
    ("leopard", "Snow Leopard", "Territory marking", "Hemis National Park"),
    ("rhinoceros", "Indian Rhinoceros", "Grazing", "Kaziranga National Park"),
    ("lion", "Asiatic Lion", "Resting", "Gir National Park"),
    ("bear", "Sloth Bear", "Foraging", "Daroji Bear Sanctuary"),
    ("deer", "Spotted Deer", "Grazing", "Bandhavgarh National Park"),
    ("monkey", "Langur", "Social grooming", "Western Ghats"),
    ("bird", "Peacock", "Displaying", "Ranthambore National Park"),
    ("snake", "King Cobra", "Basking", "Western Ghats"),
];

/// Ordered list of (keyword, profile) pairs. Not a map: order matters.
#[derive(Debug, Clone)]
pub struct SpeciesMapping {
    entries: Vec<(String, SpeciesProfile)>,
}

impl SpeciesMapping {
    /// Keywords are stored lower-cased
    pub fn new(entries: Vec<(String, SpeciesProfile)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(keyword, profile)| (keyword.to_lowercase(), profile))
                .collect(),
        }
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// First profile whose keyword is contained in `label`
    pub fn lookup(&self, label: &str) -> Option<&SpeciesProfile> {
        let lower = label.to_lowercase();
        self.entries
            .iter()
            .find(|(keyword, _)| lower.contains(keyword.as_str()))
            .map(|(_, profile)| profile)
    }

    /// Map a raw top-1 prediction to a wildlife record.
    ///
    /// Unmatched labels keep the raw label inside the species string.
    pub fn map_label(&self, label: &str, probability: f64) -> ClassificationResult {
        let confidence = to_percentage(probability);
        match self.lookup(label) {
            Some(profile) => ClassificationResult {
                species: profile.species.clone(),
                confidence,
                behavior: profile.behavior.clone(),
                location: profile.location.clone(),
            },
            None => ClassificationResult {
                species: format!("Unidentified Species ({})", label),
                confidence,
                behavior: UNKNOWN_BEHAVIOR.to_string(),
                location: UNKNOWN_LOCATION.to_string(),
            },
        }
    }
}

impl Default for SpeciesMapping {
    fn default() -> Self {
        Self::new(
            DEFAULT_TABLE
                .iter()
                .map(|(keyword, species, behavior, location)| {
                    (
                        keyword.to_string(),
                        SpeciesProfile::new(*species, *behavior, *location),
                    )
                })
                .collect(),
        )
    }
}

/// round(p * 100) clamped to [0, 100]; NaN maps to 0
fn to_percentage(probability: f64) -> u8 {
    if probability.is_nan() {
        return 0;
    }
    (probability * 100.0).round().clamp(0.0, 100.0) as u8
}
