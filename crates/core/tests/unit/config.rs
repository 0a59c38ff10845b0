//! # Configuration Tests.
//!
//! Default geometry, JSON deserialization with partial overrides, field
//! and variant aliases, and the prefetch kill-switch.

use dbpsim_core::Config;
use dbpsim_core::config::{CacheConfig, DeadBlockPolicy, Prefetcher};

/// The built-in geometry: split 64 KiB 4-way L1s over a 1 MiB 16-way L2,
/// 64-byte blocks everywhere, trace policy at L1 and reference counts at
/// L2, tag-correlating prefetch at every level.
#[test]
fn default_geometry_matches_baseline() {
    let config = Config::default();

    for l1 in [&config.l1_i, &config.l1_d] {
        assert_eq!(l1.size_kb, 64);
        assert_eq!(l1.block_bytes, 64);
        assert_eq!(l1.ways, 4);
        assert_eq!(l1.dbp, DeadBlockPolicy::Trace);
        assert_eq!(l1.prefetcher, Prefetcher::TagCorrelating);
    }

    assert_eq!(config.l2.size_kb, 1024);
    assert_eq!(config.l2.block_bytes, 64);
    assert_eq!(config.l2.ways, 16);
    assert_eq!(config.l2.dbp, DeadBlockPolicy::RefCount);
    assert_eq!(config.l2.prefetcher, Prefetcher::TagCorrelating);
}

/// An empty JSON object deserializes to the same baseline as `default()`.
#[test]
fn empty_json_yields_defaults() {
    let config: Config = serde_json::from_str("{}").expect("valid json");

    assert_eq!(config.l1_i.size_kb, 64);
    assert_eq!(config.l1_d.ways, 4);
    assert_eq!(config.l2.size_kb, 1024);
    assert_eq!(config.l2.dbp, DeadBlockPolicy::RefCount);
}

/// Overriding one field of one level leaves every other field and every
/// other level at its default.
#[test]
fn partial_override_keeps_sibling_defaults() {
    let json = r#"{ "l1_d": { "size_kb": 32, "ways": 8 } }"#;
    let config: Config = serde_json::from_str(json).expect("valid json");

    assert_eq!(config.l1_d.size_kb, 32);
    assert_eq!(config.l1_d.ways, 8);
    assert_eq!(config.l1_d.block_bytes, 64);
    assert_eq!(config.l1_d.dbp, DeadBlockPolicy::Trace);

    assert_eq!(config.l1_i.size_kb, 64);
    assert_eq!(config.l1_i.ways, 4);
    assert_eq!(config.l2.ways, 16);
}

/// `l1i` and `l1d` are accepted for the underscored field names.
#[test]
fn level_name_aliases_are_accepted() {
    let json = r#"{ "l1i": { "size_kb": 16 }, "l1d": { "size_kb": 32 } }"#;
    let config: Config = serde_json::from_str(json).expect("valid json");

    assert_eq!(config.l1_i.size_kb, 16);
    assert_eq!(config.l1_d.size_kb, 32);
}

/// `Refcount` and `TCP` are accepted for the canonical variant names.
#[test]
fn policy_aliases_are_accepted() {
    let json = r#"{
        "l1_d": { "prefetcher": "TCP" },
        "l2":   { "dbp": "Refcount" }
    }"#;
    let config: Config = serde_json::from_str(json).expect("valid json");

    assert_eq!(config.l1_d.prefetcher, Prefetcher::TagCorrelating);
    assert_eq!(config.l2.dbp, DeadBlockPolicy::RefCount);
}

/// The canonical variant names parse as themselves.
#[test]
fn canonical_policy_names_parse() {
    let json = r#"{ "l1_i": { "dbp": "RefCount", "prefetcher": "None" } }"#;
    let config: Config = serde_json::from_str(json).expect("valid json");

    assert_eq!(config.l1_i.dbp, DeadBlockPolicy::RefCount);
    assert_eq!(config.l1_i.prefetcher, Prefetcher::None);
}

/// An unrecognized policy name is a deserialization error, not a silent
/// fallback.
#[test]
fn unknown_policy_name_is_rejected() {
    let json = r#"{ "l2": { "dbp": "Oracle" } }"#;
    assert!(serde_json::from_str::<Config>(json).is_err());
}

/// A bare level object deserializes to the baseline L1 shape.
#[test]
fn bare_level_object_is_the_l1_shape() {
    let level: CacheConfig = serde_json::from_str("{}").expect("valid json");

    assert_eq!(level.size_kb, 64);
    assert_eq!(level.block_bytes, 64);
    assert_eq!(level.ways, 4);
    assert_eq!(level.dbp, DeadBlockPolicy::Trace);
    assert_eq!(level.prefetcher, Prefetcher::TagCorrelating);
}

/// `disable_prefetch` clears every level's prefetcher and touches nothing
/// else.
#[test]
fn disable_prefetch_clears_every_level() {
    let mut config = Config::default();
    config.disable_prefetch();

    assert_eq!(config.l1_i.prefetcher, Prefetcher::None);
    assert_eq!(config.l1_d.prefetcher, Prefetcher::None);
    assert_eq!(config.l2.prefetcher, Prefetcher::None);
    assert_eq!(config.l2.ways, 16, "geometry untouched");
    assert_eq!(config.l2.dbp, DeadBlockPolicy::RefCount);
}
