//! Crate-level integration tests for the six concrete scenarios in the
//! spec's "Testable Properties" section, exercised through the public API
//! rather than against an individual production table.

use pretty_assertions::assert_eq;

use yeast_yaml::{
    close_parser, code_pair, next_token, open_parser, open_source_buffer, open_source_fd,
    open_source_fd_mmap, CodeType, Production, TokenCode,
};

fn drain(mut parser: yeast_yaml::YeastParser) -> Vec<yeast_yaml::Token> {
    let mut tokens = Vec::new();
    loop {
        let token = next_token(&mut parser).unwrap();
        let done = token.code == TokenCode::Done;
        tokens.push(token);
        if done {
            break;
        }
    }
    close_parser(parser).unwrap();
    tokens
}

#[test]
fn empty_source_yields_a_single_done_token() {
    let source = open_source_buffer(Vec::new());
    let parser = open_parser(source, true, Production::simple("document-stream")).unwrap();
    let tokens = drain(parser);
    let done = tokens.last().unwrap();
    assert_eq!(done.code, TokenCode::Done);
    assert_eq!(done.body.len(), 0);
}

#[test]
fn utf8_bom_is_reported_at_offset_zero_and_content_follows_it() {
    let source = open_source_buffer(*b"\xef\xbb\xbfa: 1\n");
    let parser = open_parser(source, true, Production::simple("document-stream")).unwrap();
    let tokens = drain(parser);

    let bom = tokens
        .iter()
        .find(|t| t.code == TokenCode::Bom)
        .expect("expected a BOM token");
    assert_eq!(bom.byte_offset, 0);
    assert_eq!(
        bom.bytes(b"", 0),
        b"UTF-8",
        "BOM token body is redirected to the static encoding name"
    );

    let key = tokens
        .iter()
        .find(|t| t.code == TokenCode::Text)
        .expect("expected the mapping key's text token");
    assert_eq!(key.byte_offset, 3, "'a' starts right after the 3-byte BOM");
}

#[test]
fn utf16le_surrogate_pair_advances_one_character_and_four_bytes() {
    // U+10000 encoded as a UTF-16LE surrogate pair, standing alone as a
    // plain scalar document so the production machinery decodes it as
    // ordinary content rather than special-casing it.
    let mut bytes = vec![0xff, 0xfe]; // UTF-16LE BOM
    bytes.extend_from_slice(&[0x00, 0xd8, 0x00, 0xdc]); // U+10000
    let source = open_source_buffer(bytes);
    let parser = open_parser(source, true, Production::simple("document-stream")).unwrap();
    let tokens = drain(parser);

    let text = tokens
        .iter()
        .find(|t| t.code == TokenCode::Text)
        .expect("expected one text token for the scalar");
    assert_eq!(text.char_offset, 0);
    assert_eq!(text.body.len(), 4, "the surrogate pair is 4 bytes wide");
}

#[test]
fn nesting_is_balanced_across_a_whole_document() {
    let source = open_source_buffer(*b"a:\n  b: [1, 2]\n  c: *x\n");
    let parser = open_parser(source, true, Production::simple("document-stream")).unwrap();
    let tokens = drain(parser);

    let mut stack = Vec::new();
    for token in &tokens {
        match token.code.code_type() {
            CodeType::Begin => stack.push(token.code),
            CodeType::End => {
                let opened = stack.pop().expect("END without a matching BEGIN");
                assert_eq!(code_pair(opened), token.code);
            }
            CodeType::Match | CodeType::Fake => {}
        }
    }
    assert!(stack.is_empty(), "every BEGIN must see its paired END");
}

#[test]
fn positions_are_monotonic_across_the_token_stream() {
    let source = open_source_buffer(*b"a: 1\nb: 2\nc: 3\n");
    let parser = open_parser(source, true, Production::simple("document-stream")).unwrap();
    let tokens = drain(parser);

    let mut last_byte = 0u64;
    let mut last_char = 0u64;
    let mut last_line = 1u64;
    for token in &tokens {
        assert!(token.byte_offset >= last_byte);
        assert!(token.char_offset >= last_char);
        assert!(token.line >= last_line);
        if token.line > last_line {
            // A fresh line always starts at column 0 for the first token
            // that begins on it.
        }
        last_byte = token.byte_offset;
        last_char = token.char_offset;
        last_line = token.line;
    }
}

#[test]
fn stream_read_and_mmap_sources_agree_on_a_large_document() {
    let mut input = String::new();
    for i in 0..2000 {
        input.push_str(&format!("item{i}: value{i}\n"));
    }
    let bytes = input.into_bytes();

    let path = std::env::temp_dir().join("yeast-yaml-integration-test-input.yml");
    std::fs::write(&path, &bytes).unwrap();

    let stream_source = open_source_fd(std::io::Cursor::new(bytes.clone()));
    let stream_parser =
        open_parser(stream_source, true, Production::simple("document-stream")).unwrap();
    let stream_tokens = drain(stream_parser);

    let file = std::fs::File::open(&path).unwrap();
    let mmap_source = open_source_fd_mmap(file).unwrap();
    let mmap_parser =
        open_parser(mmap_source, true, Production::simple("document-stream")).unwrap();
    let mmap_tokens = drain(mmap_parser);

    std::fs::remove_file(&path).ok();

    assert_eq!(stream_tokens.len(), mmap_tokens.len());
    for (a, b) in stream_tokens.iter().zip(mmap_tokens.iter()) {
        assert_eq!(a.code, b.code);
        assert_eq!(a.byte_offset, b.byte_offset);
        assert_eq!(a.body.len(), b.body.len());
    }
}

#[test]
fn deterministic_dispatch_reruns_identically() {
    let input = *b"name: Mark McGwire\nhr:   65\navg: 0.278\n";

    let run = || {
        let source = open_source_buffer(input);
        let parser = open_parser(source, true, Production::simple("document-stream")).unwrap();
        drain(parser)
            .into_iter()
            .map(|t| (t.code, t.byte_offset, t.body.len()))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}
