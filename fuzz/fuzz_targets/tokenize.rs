#![no_main]

use libfuzzer_sys::fuzz_target;
use yeast_yaml::{close_parser, next_token, open_parser, open_source_buffer, Production, TokenCode};

fuzz_target!(|data: &[u8]| fuzz_target(data));

fn fuzz_target(data: &[u8]) {
    let source = open_source_buffer(data.to_vec());
    let Ok(mut parser) = open_parser(source, true, Production::simple("document-stream")) else {
        return;
    };

    // Bound the number of tokens drained per input. Recovery (reserved
    // directives, an unterminated verbatim tag, a dead-end production)
    // always makes progress and terminates in DONE on its own; this cap
    // just keeps one adversarial fuzz case from running forever if that
    // invariant is ever violated by a new production.
    for _ in 0..1_000_000 {
        match next_token(&mut parser) {
            Ok(token) if token.code == TokenCode::Done => break,
            Ok(_) => continue,
            Err(_) => return,
        }
    }
    let _ = close_parser(parser);
}
