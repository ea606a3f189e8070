//! Process-global observability runtime settings.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::config::ServerConfig;

const DEFAULT_SLOW_REQUEST_THRESHOLD_MS: u64 = 1_000;

static SLOW_REQUEST_THRESHOLD_MS: AtomicU64 = AtomicU64::new(DEFAULT_SLOW_REQUEST_THRESHOLD_MS);
static JOINS_INCOMING_TRACES: AtomicBool = AtomicBool::new(false);

pub(super) fn apply_runtime_config(config: &ServerConfig) {
    let observability = &config.observability;

    let threshold_ms =
        u64::try_from(observability.slow_request_threshold.as_millis()).unwrap_or(u64::MAX);

    SLOW_REQUEST_THRESHOLD_MS.store(threshold_ms, Ordering::Relaxed);
    JOINS_INCOMING_TRACES.store(observability.joins_incoming_traces(), Ordering::Relaxed);
}

pub(super) fn slow_request_threshold_ms() -> u64 {
    SLOW_REQUEST_THRESHOLD_MS.load(Ordering::Relaxed)
}

pub(super) fn joins_incoming_traces() -> bool {
    JOINS_INCOMING_TRACES.load(Ordering::Relaxed)
}
