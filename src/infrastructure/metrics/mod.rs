//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - Push attempts by event kind and outcome
//! - Live presence sessions
//! - Sessions evicted after a failed push
//! - Room cache lookups by result

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Push attempts by kind ("post", "comment", "msg") and outcome
/// ("delivered", "absent", "failed")
pub static PUSHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pushes_total", "Push attempts to audience members").namespace("presence"),
        &["kind", "outcome"],
    )
    .expect("Failed to create PUSHES_TOTAL metric")
});

/// Users with a registered session
pub static PRESENCE_SESSIONS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("sessions", "Users currently present").namespace("presence"),
    )
    .expect("Failed to create PRESENCE_SESSIONS metric")
});

/// Sessions removed because a push found the connection closed
pub static PRESENCE_EVICTIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("evictions_total", "Sessions evicted after a closed-connection push")
            .namespace("presence"),
    )
    .expect("Failed to create PRESENCE_EVICTIONS_TOTAL metric")
});

/// Room cache lookups by result ("hit", "load", "miss")
pub static ROOM_CACHE_LOOKUPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("room_cache_lookups_total", "Room registry lookups").namespace("presence"),
        &["result"],
    )
    .expect("Failed to create ROOM_CACHE_LOOKUPS_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(PUSHES_TOTAL.clone()))
        .expect("Failed to register PUSHES_TOTAL");
    registry
        .register(Box::new(PRESENCE_SESSIONS.clone()))
        .expect("Failed to register PRESENCE_SESSIONS");
    registry
        .register(Box::new(PRESENCE_EVICTIONS_TOTAL.clone()))
        .expect("Failed to register PRESENCE_EVICTIONS_TOTAL");
    registry
        .register(Box::new(ROOM_CACHE_LOOKUPS_TOTAL.clone()))
        .expect("Failed to register ROOM_CACHE_LOOKUPS_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

pub fn record_push(kind: &str, outcome: &str) {
    PUSHES_TOTAL.with_label_values(&[kind, outcome]).inc();
}

pub fn set_presence_sessions(count: usize) {
    PRESENCE_SESSIONS.set(count as i64);
}

pub fn record_eviction() {
    PRESENCE_EVICTIONS_TOTAL.inc();
}

pub fn record_room_lookup(result: &str) {
    ROOM_CACHE_LOOKUPS_TOTAL.with_label_values(&[result]).inc();
}
