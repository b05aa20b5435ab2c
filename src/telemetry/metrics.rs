//! Metric instruments for questline.
//!
//! Uses the OTel Meter API with the globally registered `MeterProvider`;
//! with none registered the instruments are no-ops.

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("questline")
}

/// Counter: remote calls issued.
/// Labels: `call`, `result` ("ok" | "error").
pub fn remote_calls() -> Counter<u64> {
    meter()
        .u64_counter("questline.remote.calls")
        .with_description("Number of remote calls issued")
        .build()
}

/// Counter: failures recorded into a cache's error slot.
/// Labels: `domain`, `code`.
pub fn cache_failures() -> Counter<u64> {
    meter()
        .u64_counter("questline.cache.failures")
        .with_description("Number of failures recorded by domain caches")
        .build()
}

/// Counter: level-ups observed by the client.
pub fn level_ups() -> Counter<u64> {
    meter()
        .u64_counter("questline.character.level_ups")
        .with_description("Number of level-ups observed")
        .build()
}

/// Histogram: workflow duration in milliseconds.
/// Labels: `workflow`.
pub fn workflow_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("questline.workflow.duration_ms")
        .with_description("Cascade workflow duration in milliseconds")
        .with_unit("ms")
        .build()
}

pub fn record_remote_call(call: &'static str, ok: bool) {
    let result = if ok { "ok" } else { "error" };
    remote_calls().add(
        1,
        &[KeyValue::new("call", call), KeyValue::new("result", result)],
    );
}

pub fn record_cache_failure(domain: &str, code: &str) {
    cache_failures().add(
        1,
        &[
            KeyValue::new("domain", domain.to_string()),
            KeyValue::new("code", code.to_string()),
        ],
    );
}

pub fn record_level_up(level: i32) {
    level_ups().add(1, &[KeyValue::new("level", i64::from(level))]);
}

pub fn record_workflow_duration(workflow: &'static str, ms: f64) {
    workflow_duration_ms().record(ms, &[KeyValue::new("workflow", workflow)]);
}
