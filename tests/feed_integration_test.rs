//! Integration tests for the activity feed
//!
//! Covers the lifecycle a dashboard goes through:
//! - Seed an initial view, then tick live on a timer
//! - Read snapshots and stats while the timer runs
//! - Stop the timer and confirm the buffer no longer changes

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use vanrakshak_core::config::{AppConfig, FeedConfig, TickMode};
use vanrakshak_core::feed::{
    ActivityType, FeedCatalog, FeedSimulator, FixedClock, ForestLocation, LiveFeed, Severity,
};
use vanrakshak_core::FeedError;

fn simulator(config: FeedConfig, seed: u64) -> FeedSimulator {
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 5, 12, 0, 0).unwrap());
    FeedSimulator::new(
        config,
        FeedCatalog::default(),
        Box::new(StdRng::seed_from_u64(seed)),
        Arc::new(clock),
    )
    .unwrap()
}

#[test]
fn test_seed_then_tick_respects_cap() {
    let config = FeedConfig {
        retention_cap: 20,
        tick_mode: TickMode::Bursty,
        ..FeedConfig::default()
    };
    let mut sim = simulator(config, 11);

    let seeded = sim.seed(15);
    assert_eq!(seeded.len(), 15);

    let mut ids: HashSet<String> = seeded.iter().map(|e| e.id.clone()).collect();
    for _ in 0..30 {
        for event in sim.tick() {
            assert!(ids.insert(event.id.clone()), "duplicate id {}", event.id);
        }
        assert!(sim.len() <= 20);
    }

    let snapshot = sim.snapshot();
    assert_eq!(snapshot.len(), 20);
    assert!(snapshot.iter().all(|e| e.id.starts_with("tick_")));
}

#[test]
fn test_stats_match_snapshot() {
    let mut sim = simulator(FeedConfig::default(), 12);
    sim.seed(80);

    let stats = sim.stats();
    let snapshot = sim.snapshot();
    assert_eq!(stats.total, snapshot.len());
    assert_eq!(
        stats.poaching,
        snapshot
            .iter()
            .filter(|e| e.activity_type == ActivityType::Poaching)
            .count()
    );
    assert_eq!(
        stats.active_alerts,
        snapshot.iter().filter(|e| e.severity == Severity::High).count()
    );
    assert_eq!(stats.by_type.values().sum::<usize>(), stats.total);
}

#[test]
fn test_custom_catalog_locations_are_used() {
    let catalog = FeedCatalog::new(
        vec![ForestLocation::new("Test Reserve", 10.0, 20.0)],
        FeedCatalog::default_phrases(),
    )
    .unwrap();
    let mut sim = FeedSimulator::new(
        FeedConfig::default(),
        catalog,
        Box::new(StdRng::seed_from_u64(13)),
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())),
    )
    .unwrap();

    for event in sim.seed(40) {
        assert_eq!(event.location, "Test Reserve");
        assert!((event.latitude - 10.0).abs() <= 0.05);
        assert!((event.longitude - 20.0).abs() <= 0.05);
    }
}

#[test]
fn test_config_file_drives_simulator() {
    let path = std::env::temp_dir().join("vanrakshak_feed_config_test.json");
    std::fs::write(
        &path,
        r#"{"feed": {"retention_cap": 5, "tick_mode": "bursty", "max_burst": 2}}"#,
    )
    .unwrap();

    let config = AppConfig::load_from_file(&path);
    let mut sim = simulator(config.feed, 14);
    for _ in 0..20 {
        let batch = sim.tick();
        assert!((1..=2).contains(&batch.len()));
    }
    assert_eq!(sim.len(), 5);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_invalid_cap_leaves_buffer_untouched() {
    let mut sim = simulator(FeedConfig::default(), 15);
    sim.seed(10);

    let err = sim.set_retention_cap(0).unwrap_err();
    assert!(matches!(err, FeedError::InvalidArgument { .. }));
    assert_eq!(sim.len(), 10);
    assert_eq!(sim.retention_cap(), 100);
}

#[tokio::test(start_paused = true)]
async fn test_live_feed_lifecycle() {
    let config = FeedConfig {
        tick_interval_ms: 1000,
        ..FeedConfig::default()
    };
    let mut sim = simulator(config, 16);
    sim.seed(5);
    let shared = Arc::new(Mutex::new(sim));

    let live = LiveFeed::spawn(Arc::clone(&shared)).unwrap();
    let mut events = live.subscribe();

    tokio::time::sleep(Duration::from_millis(4500)).await;
    let mut received = 0;
    while events.try_recv().is_ok() {
        received += 1;
    }
    assert_eq!(received, 4);
    assert_eq!(shared.lock().unwrap().len(), 9);

    live.stop();
    assert!(!live.is_running());
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(shared.lock().unwrap().len(), 9);
}
