use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rask_log_router::render::{LineFormat, escape_message};
use rask_log_router::router::FixedAllowlist;
use rask_log_router::{
    CaptureConsole, FieldSet, FieldSetBuilder, LogLevel, LogRecord, LogRouter, PanicTerminator,
    WriterOutput,
};
use std::sync::Arc;

fn bench_router() -> LogRouter {
    LogRouter::builder()
        .console(Arc::new(CaptureConsole::new()))
        .terminator(Arc::new(PanicTerminator))
        .allowlist(Arc::new(FixedAllowlist(Some("svc".to_string()))))
        .format(LineFormat::new("bench", 1))
        .build()
}

fn benchmark_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    group.bench_function("domain_handler", |b| {
        let router = bench_router();
        router
            .add_handler("svc", LogLevel::Warning, |record: &LogRecord<'_>| {
                std::hint::black_box(record.message_bytes());
            })
            .unwrap();
        b.iter(|| router.log("svc", LogLevel::Warning, std::hint::black_box("request handled")));
    });

    group.bench_function("filtered_debug", |b| {
        let router = bench_router();
        b.iter(|| router.log("quiet", LogLevel::Debug, std::hint::black_box("dropped")));
    });

    group.bench_function("structured_writer", |b| {
        let router = bench_router();
        router.set_writer(
            Some(Arc::new(|_: LogLevel, fields: &FieldSet<'_>| {
                std::hint::black_box(fields.len());
                WriterOutput::Handled
            })),
            None,
        );
        b.iter(|| {
            router.log_structured(
                FieldSetBuilder::new("svc", LogLevel::Message)
                    .field("MESSAGE_ID", "06d4df59e6c24647bfe69d2c27ef0b4e")
                    .message(format_args!("request {} handled", std::hint::black_box(42))),
            );
        });
    });

    group.finish();
}

fn benchmark_rendering(c: &mut Criterion) {
    let format = LineFormat::new("bench", 1);
    let message = b"connect() failed (111: Connection refused) \x9e\x9f while connecting to upstream";

    c.bench_function("escape_message", |b| {
        b.iter(|| escape_message(std::hint::black_box(message)));
    });

    c.bench_function("render_line", |b| {
        b.iter(|| format.render("svc", LogLevel::Warning, std::hint::black_box(message)));
    });
}

criterion_group!(benches, benchmark_dispatch, benchmark_rendering);
criterion_main!(benches);
