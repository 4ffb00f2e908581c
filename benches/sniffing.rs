use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sniffrs::{prescan, EncodingSniffer, SniffOptions};

/// A head with a late charset declaration followed by `body_len` bytes of body text.
fn document(charset: &str, body: &[u8], body_len: usize) -> Vec<u8> {
    let mut html = Vec::with_capacity(body_len + 1024);
    html.extend_from_slice(b"<!DOCTYPE html><html lang=ru><head>");
    html.extend_from_slice(b"<!-- generated <meta charset=big5> -->");
    for i in 0..8 {
        html.extend_from_slice(
            format!("<link rel=stylesheet href=\"/static/{i}.css\" media=all>").as_bytes(),
        );
    }
    html.extend_from_slice(
        format!("<meta http-equiv=\"Content-Type\" content=\"text/html; charset={charset}\">")
            .as_bytes(),
    );
    html.extend_from_slice(b"</head><body><p>");
    while html.len() < body_len {
        html.extend_from_slice(body);
    }
    html.extend_from_slice(b"</p></body></html>");
    html
}

fn legacy_body() -> Vec<u8> {
    let (bytes, _, _) = encoding_rs::WINDOWS_1251
        .encode("Широкая электрификация южных губерний даст мощный толчок подъёму сельского хозяйства. ");
    bytes.into_owned()
}

fn bench_prescan(c: &mut Criterion) {
    let mut group = c.benchmark_group("prescan");
    let body = legacy_body();

    for size in [1024, 10 * 1024] {
        let html = document("windows-1251", &body, size);
        let prefix = &html[..html.len().min(size)];

        group.throughput(Throughput::Bytes(prefix.len() as u64));
        group.bench_with_input(BenchmarkId::new("declared", size), prefix, |b, prefix| {
            b.iter(|| std::hint::black_box(prescan(std::hint::black_box(prefix))));
        });
    }

    let undeclared = body.repeat(10 * 1024 / body.len());
    group.throughput(Throughput::Bytes(undeclared.len() as u64));
    group.bench_function("undeclared", |b| {
        b.iter(|| std::hint::black_box(prescan(std::hint::black_box(&undeclared))));
    });

    group.finish();
}

fn bench_to_canonical(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_canonical");
    let body = legacy_body();
    let sniffer = EncodingSniffer::new(SniffOptions::default());

    let cases = [
        ("meta", document("windows-1251", &body, 64 * 1024)),
        ("utf8_passthrough", document("utf-8", "Привет, мир. ".as_bytes(), 64 * 1024)),
        ("statistical", body.repeat(64 * 1024 / body.len())),
    ];

    for (name, html) in &cases {
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("doc", name), html, |b, html| {
            b.iter(|| {
                std::hint::black_box(
                    sniffer
                        .to_canonical(std::hint::black_box(html), None, None)
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_prescan, bench_to_canonical);
criterion_main!(benches);
