use std::fs::File;
use std::io::Cursor;

use criterion::{criterion_group, criterion_main, Criterion};
use yeast_yaml::{
    close_parser, next_token, open_parser, open_source_buffer, open_source_fd,
    open_source_fd_mmap, Production, TokenCode, YeastParser,
};

fn large_yaml_document() -> String {
    let mut doc = String::new();
    for i in 0..4000 {
        doc.push_str(&format!(
            "item{i}:\n  name: entry number {i}\n  tags: [a, b, c]\n  enabled: true\n"
        ));
    }
    doc
}

fn drain(mut parser: YeastParser) {
    loop {
        let token = next_token(&mut parser).unwrap();
        if token.code == TokenCode::Done {
            break;
        }
    }
    close_parser(parser).unwrap();
}

pub fn tokenize(c: &mut Criterion) {
    let input = large_yaml_document();
    let mmap_path = std::env::temp_dir().join("yeast-yaml-bench-input.yml");
    std::fs::write(&mmap_path, &input).unwrap();

    c.bench_function("tokenize buffer source", |b| {
        b.iter(|| {
            let source = open_source_buffer(input.clone().into_bytes());
            let parser =
                open_parser(source, true, Production::simple("document-stream")).unwrap();
            drain(parser);
        })
    });

    c.bench_function("tokenize stream-read source", |b| {
        b.iter(|| {
            let source = open_source_fd(Cursor::new(input.clone().into_bytes()));
            let parser =
                open_parser(source, true, Production::simple("document-stream")).unwrap();
            drain(parser);
        })
    });

    c.bench_function("tokenize mmap source", |b| {
        b.iter(|| {
            let file = File::open(&mmap_path).unwrap();
            let source = open_source_fd_mmap(file).unwrap();
            let parser =
                open_parser(source, true, Production::simple("document-stream")).unwrap();
            drain(parser);
        })
    });
}

criterion_group!(benches, tokenize);
criterion_main!(benches);
