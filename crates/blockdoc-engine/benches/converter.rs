use std::sync::Arc;

use blockdoc_engine::{Converter, SchemaRegistry, wire};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn generate_document(sections: usize) -> String {
    let mut blocks = Vec::new();
    for i in 0..sections {
        blocks.push(format!(
            r#"{{"type":"header","data":{{"text":"Section {i}","level":2}}}}"#
        ));
        blocks.push(
            r#"{"type":"paragraph","data":{"text":"Some <b>bold</b> & <i>italic</i> text"}}"#
                .to_string(),
        );
        blocks.push(format!(
            r#"{{"type":"process","data":{{"name":"Process {i}","frequency":"monthly","steps":[{{"title":"One"}},{{"title":"Two"}}]}}}}"#
        ));
        blocks.push(
            r#"{"type":"controlMatrix","data":{"controls":["C-1 | Dual control | Preventive | High","note"]}}"#
                .to_string(),
        );
    }
    format!(r#"{{"id":"bench","version":1,"blocks":[{}]}}"#, blocks.join(","))
}

fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");
    group.sample_size(20);

    let registry = Arc::new(SchemaRegistry::standard());
    let converter = Converter::escaping(registry.clone());
    let input = generate_document(100);
    let document = wire::deserialize(&registry, &input).unwrap().document;

    group.bench_function("deserialize", |b| {
        b.iter(|| {
            let loaded = wire::deserialize(&registry, black_box(&input)).unwrap();
            black_box(loaded);
        });
    });

    group.bench_function("to_html", |b| {
        b.iter(|| {
            let html = converter.to_html(black_box(&document));
            black_box(html);
        });
    });

    group.bench_function("serialize", |b| {
        b.iter(|| {
            let text = wire::serialize(black_box(&document)).unwrap();
            black_box(text);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_conversion);
criterion_main!(benches);
