//! Dashboard counters derived from a set of feed events.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::feed::{ActivityEvent, ActivityType, Severity};

/// Aggregate counts over a slice of events.
///
/// `by_type` and `by_severity` always contain every variant, zero-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityStats {
    pub total: usize,
    pub by_type: BTreeMap<ActivityType, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
    pub poaching: usize,
    pub movement: usize,
    /// High + medium severity
    pub threats: usize,
    /// High severity only
    pub active_alerts: usize,
}

impl ActivityStats {
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a ActivityEvent>,
    {
        let mut by_type: BTreeMap<ActivityType, usize> =
            ActivityType::ALL.iter().map(|t| (*t, 0)).collect();
        let mut by_severity: BTreeMap<Severity, usize> =
            Severity::ALL.iter().map(|s| (*s, 0)).collect();
        let mut total = 0;

        for event in events {
            total += 1;
            *by_type.entry(event.activity_type).or_insert(0) += 1;
            *by_severity.entry(event.severity).or_insert(0) += 1;
        }

        let high = by_severity[&Severity::High];
        let medium = by_severity[&Severity::Medium];

        Self {
            total,
            poaching: by_type[&ActivityType::Poaching],
            movement: by_type[&ActivityType::AnimalMovement],
            threats: high + medium,
            active_alerts: high,
            by_type,
            by_severity,
        }
    }
}
