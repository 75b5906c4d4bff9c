use commentprep_core::PipelineBuilder;
use commentprep_formats::Record;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use serde_json::json;

const COMMENTS: [&str; 4] = [
    "Loving the new Photoshop v25.1! 🔥 http://a.co/x",
    "lightroom keeps crashing when I export, please fix 😡",
    "Premiere Pro y After Effects funcionan muy bien juntos",
    "ok",
];

fn make_records(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| Record::new(json!({"id": i, "text": COMMENTS[i % COMMENTS.len()]}), i + 1))
        .collect()
}

fn bench_enrich(c: &mut Criterion) {
    let records = make_records(10_000);

    let mut group = c.benchmark_group("enrich");
    group.throughput(Throughput::Elements(records.len() as u64));
    group.sample_size(20);

    group.bench_function("10k_single_thread", |b| {
        let pipeline = PipelineBuilder::new().num_threads(1).build().unwrap();
        b.iter(|| black_box(pipeline.enrich(&records).unwrap()));
    });

    group.bench_function("10k_all_threads", |b| {
        let pipeline = PipelineBuilder::new().build().unwrap();
        b.iter(|| black_box(pipeline.enrich(&records).unwrap()));
    });

    group.finish();
}

fn bench_derive(c: &mut Criterion) {
    let pipeline = PipelineBuilder::new().build().unwrap();

    c.bench_function("derive_single_comment", |b| {
        b.iter(|| black_box(pipeline.derive(Some(black_box(COMMENTS[0])))));
    });
}

criterion_group!(benches, bench_enrich, bench_derive);
criterion_main!(benches);
