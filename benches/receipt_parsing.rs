//! Receipt Parsing Benchmarks
//!
//! Text-side hot path of an upload: parse OCR text, categorize, flag.
//! OCR itself is excluded (it shells out to Tesseract).
//!
//! Run with: `cargo bench --bench receipt_parsing`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use smallbiz_engine::categories::categorize_purchase;
use smallbiz_engine::ocr::{cleanup_text, text_quality_score, OcrStatus};
use smallbiz_engine::parser::parse_receipt;
use smallbiz_engine::receipt::{compute_flags, normalize_receipt};

const FUEL: &str = "SHELL OIL 57442\n1200 MARKET ST\nDATE 01/27/2026 14:02\n\
PUMP 04 UNLEADED\n12.402 GAL @ 3.299\nFUEL TOTAL $40.91\nTAX 0.00\nTOTAL $40.91\n\
VISA ************4821\nAUTH 004512";

const HARDWARE: &str = "THE HOME DEPOT\n#0611 SAN JOSE\n(408) 555-0134\n\
1x 2X4-8FT STUD 797860 3.98\n2x DECK SCREW 1LB 084622 9.97\nSUBTOTAL 23.92\n\
SALES TAX 9.375% 2.24\nTOTAL 26.16\nCASH 30.00\nCHANGE 3.84\n01-27-26 11:14 AM";

/// Noisy multi-pass output with pass headers and OCR junk
fn noisy_receipt() -> String {
    let mut text = String::from(HARDWARE);
    text.push_str("\n\n----- VENDOR PASS (TOP STRIP) -----\nTHE H0ME DEP0T\n");
    text.push_str("\n----- TOTALS PASS (RIGHT STRIP MIXED) -----\n");
    for i in 0..40 {
        text.push_str(&format!("IT3M {:02} ~~ {}.{:02}\n", i, i * 3, i % 100));
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_receipt");
    group.measurement_time(Duration::from_secs(10));

    let noisy = noisy_receipt();
    for (name, text) in [("fuel", FUEL), ("hardware", HARDWARE), ("noisy", noisy.as_str())] {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| parse_receipt(black_box(text)))
        });
    }

    group.finish();
}

fn bench_text_side_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_pipeline");

    group.bench_function("parse_categorize_flag", |b| {
        b.iter(|| {
            let mut parsed = parse_receipt(black_box(HARDWARE));
            let suggestion = categorize_purchase(
                parsed.vendor.as_deref(),
                Some(HARDWARE),
                None,
                Some("construction"),
            );
            parsed.category = suggestion.category;
            let normalized = normalize_receipt(&parsed);
            compute_flags(OcrStatus::Success, &normalized, &parsed.flags)
        })
    });

    group.finish();
}

fn bench_quality(c: &mut Criterion) {
    let mut group = c.benchmark_group("ocr_quality");
    let noisy = noisy_receipt();

    group.bench_function("text_quality_score", |b| {
        b.iter(|| text_quality_score(black_box(&noisy)))
    });
    group.bench_function("cleanup_text", |b| b.iter(|| cleanup_text(black_box(&noisy))));

    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_text_side_pipeline,
    bench_quality
);
criterion_main!(benches);
