//! Shared test harness for exercising a single production table in
//! isolation, used by the `#[cfg(test)]` modules throughout `productions/`.

use crate::char_engine::CharEngine;
use crate::decode::Encoding;
use crate::emitter::TokenEmitter;
use crate::frame::FrameStack;
use crate::machine::{Parser, StateTable, StepOutcome};
use crate::registry::{Production, Registry};
use crate::source::Source;
use crate::token::Token;

/// Run `entry` to completion over `bytes`, registering every `(name,
/// table)` pair in `tables` (so a production under test can `Call` its
/// dependencies), and return every token it emitted.
pub(crate) fn run_production(
    bytes: &[u8],
    encoding: Encoding,
    entry: &'static str,
    tables: &[(&'static str, StateTable)],
) -> Vec<Token> {
    let mut registry = Registry::new();
    for (name, table) in tables {
        registry.register(&Production::simple(name), table);
    }
    run_production_with_registry(bytes, encoding, Production::simple(entry), &registry)
}

/// As [`run_production`], but with an already-built [`Registry`] and an
/// arbitrary (possibly parameterized) entry [`Production`].
pub(crate) fn run_production_with_registry(
    bytes: &[u8],
    encoding: Encoding,
    entry: Production,
    registry: &Registry,
) -> Vec<Token> {
    let mut source = Source::from_buffer(bytes.to_vec());
    let mut chars = CharEngine::new(encoding);
    chars.next_char(&mut source).unwrap();
    let emitter = TokenEmitter::new(encoding, chars.curr());
    let frames = FrameStack::new(*chars.prev(), *chars.curr());
    let mut parser = Parser::start(source, chars, emitter, frames, registry, entry).unwrap();

    let mut tokens = Vec::new();
    let mut cursor = 0;
    loop {
        match parser.step().unwrap() {
            StepOutcome::Token => {
                while let Some(token) = parser.emitter.token_at(cursor) {
                    tokens.push(token);
                    cursor += 1;
                }
            }
            StepOutcome::Done => {
                while let Some(token) = parser.emitter.token_at(cursor) {
                    tokens.push(token);
                    cursor += 1;
                }
                break;
            }
            StepOutcome::Unexpected => panic!(
                "production {:?} got stuck; tokens so far: {:?}",
                entry, tokens
            ),
        }
    }
    tokens
}
