//! Collector 벤치마크
//!
//! 응답 문서 → 이벤트 변환 및 직렬화 성능 측정

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use std::hint::black_box;
use wlsbeat::collector::coerce::{coerce_int, coerce_text, scale_bytes_to_megabytes};
use wlsbeat::event::{build, Coercion, Event, EventBuilder, FieldSpec, MetricFamily};

const JVM_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("srv_heapFreeCurrent", "/heapFreeCurrent", Coercion::Megabytes),
    FieldSpec::new("srv_heapSizeCurrent", "/heapSizeCurrent", Coercion::Megabytes),
    FieldSpec::new("srv_heapSizeMax", "/heapSizeMax", Coercion::Megabytes),
    FieldSpec::new("srv_jvmProcessorLoad", "/processCpuLoad", Coercion::Float),
];

const THREAD_POOL_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "th_pendingUserRequestCount",
        "/pendingUserRequestCount",
        Coercion::Int,
    ),
    FieldSpec::new(
        "th_executeThreadTotalCount",
        "/executeThreadTotalCount",
        Coercion::Int,
    ),
    FieldSpec::new("th_stuckThreadCount", "/stuckThreadCount", Coercion::Int),
    FieldSpec::new("th_hoggingThreadCount", "/hoggingThreadCount", Coercion::Int),
    FieldSpec::new("th_throughput", "/throughput", Coercion::Float),
    FieldSpec::new("th_state", "/healthState/state", Coercion::String),
    FieldSpec::new("th_symptoms", "/healthState/symptoms", Coercion::Text),
];

fn jvm_document() -> Value {
    json!({
        "heapSizeCurrent": 536_870_912_i64,
        "heapFreeCurrent": 201_326_592_i64,
        "heapSizeMax": 1_073_741_824_i64,
        "processCpuLoad": 0.07
    })
}

fn thread_pool_document() -> Value {
    json!({
        "pendingUserRequestCount": 0,
        "executeThreadTotalCount": 24,
        "stuckThreadCount": 0,
        "hoggingThreadCount": 1,
        "throughput": 12.5,
        "healthState": {
            "state": "warn",
            "symptoms": [
                {"severity": "HEALTH_WARN", "info": "hogging threads", "type": "THREAD_POOL"}
            ]
        }
    })
}

fn benchmark_coercion(c: &mut Criterion) {
    let mut group = c.benchmark_group("coerce");

    let bytes = json!(1_073_741_824_i64);
    group.bench_function("megabytes", |b| {
        b.iter(|| scale_bytes_to_megabytes(black_box(Some(&bytes))))
    });

    let counter = json!(42.0);
    group.bench_function("int_from_float", |b| {
        b.iter(|| coerce_int(black_box(Some(&counter))))
    });

    let symptoms = json!([{"severity": "HEALTH_WARN", "info": "stuck threads"}]);
    group.bench_function("text_from_array", |b| {
        b.iter(|| coerce_text(black_box(Some(&symptoms))))
    });

    group.finish();
}

fn benchmark_build_event(c: &mut Criterion) {
    let jvm = jvm_document();
    let pool = thread_pool_document();

    let mut group = c.benchmark_group("build_event");

    group.bench_with_input(BenchmarkId::new("server", "jvm"), &jvm, |b, doc| {
        b.iter(|| build(MetricFamily::ServerStatus, "managed1", doc, JVM_FIELDS))
    });

    group.bench_with_input(
        BenchmarkId::new("thread_pool", "runtime"),
        &pool,
        |b, doc| b.iter(|| build(MetricFamily::ThreadStatus, "managed1", doc, THREAD_POOL_FIELDS)),
    );

    group.finish();
}

fn benchmark_serialize_event(c: &mut Criterion) {
    let event: Event = EventBuilder::new(MetricFamily::ThreadStatus, "managed1")
        .extract(&thread_pool_document(), THREAD_POOL_FIELDS)
        .build()
        .into();

    c.bench_function("serialize_event", |b| {
        b.iter(|| serde_json::to_string(black_box(&event)))
    });
}

criterion_group!(
    benches,
    benchmark_coercion,
    benchmark_build_event,
    benchmark_serialize_event
);
criterion_main!(benches);
