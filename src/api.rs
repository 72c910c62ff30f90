//! The public entry points (component I, Token Delivery, plus the
//! `open_source_*`/`open_parser`/`close_parser` surface from §6).
//!
//! Everything below this line is a thin, allocation-free wrapper around
//! the runtime in [`crate::machine`]: `open_parser` runs encoding
//! detection once and builds the four collaborating pieces (byte source,
//! character engine, token emitter, frame stack); `next_token` drives
//! [`machine::Parser::step`] until a token is ready to hand back, mirroring
//! the cursor-drain loop every production's own tests already use via
//! `crate::testutil::run_production`.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use crate::char_engine::CharEngine;
use crate::emitter::TokenEmitter;
use crate::frame::FrameStack;
use crate::machine::{self, StepOutcome};
use crate::registry::{Production, Registry};
use crate::source::Source;
use crate::token::{CodeType, Token, TokenCode};
use crate::{ParserError, SourceError};

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(crate::productions::build_registry)
}

/// Wrap an in-memory byte buffer as a source. `more` never has anything
/// to add; `close` is a no-op.
pub fn open_source_buffer(bytes: impl Into<Vec<u8>>) -> Source {
    Source::from_buffer(bytes)
}

/// Wrap a UTF-8 string's bytes as a source, equivalent to
/// `open_source_buffer` over its owned byte representation.
pub fn open_source_string(s: impl Into<String>) -> Source {
    Source::from_buffer(s.into().into_bytes())
}

/// Wrap an already-open file, reading it incrementally as the parser
/// consumes it (the *FILE-read* variant).
pub fn open_source_file(file: File) -> Source {
    Source::from_file(file)
}

/// Wrap an arbitrary reader — standard input, a socket, a pipe — reading
/// it incrementally (the *fd-read* variant).
pub fn open_source_fd(reader: impl Read + Send + 'static) -> Source {
    Source::from_reader(reader)
}

/// Memory-map an already-open file in full (the *fd-mmap* variant).
pub fn open_source_fd_mmap(file: File) -> Result<Source, ParserError> {
    Ok(Source::from_mmap(file)?)
}

/// Choose between *fd-mmap* and *fd-read* for an already-open file: a
/// non-empty regular file is mapped, everything else (pipes, sockets,
/// empty files — `memmap2` refuses to map a zero-length file) falls back
/// to incremental reads.
pub fn open_source_fd_auto(file: File) -> Result<Source, ParserError> {
    let mappable = file
        .metadata()
        .map(|metadata| metadata.is_file() && metadata.len() > 0)
        .unwrap_or(false);
    if mappable {
        open_source_fd_mmap(file)
    } else {
        Ok(open_source_fd(file))
    }
}

/// As [`open_source_fd_auto`], but takes a path rather than an open
/// file. The path `"-"` means standard input, read incrementally.
pub fn open_source_path_auto(path: impl AsRef<Path>) -> Result<Source, ParserError> {
    let path = path.as_ref();
    if path == Path::new("-") {
        return Ok(open_source_fd(std::io::stdin()));
    }
    let file = File::open(path).map_err(SourceError::Io)?;
    open_source_fd_auto(file)
}

/// Which of the four token-code shapes `code` is.
pub fn code_type(code: TokenCode) -> CodeType {
    code.code_type()
}

/// A running tokenizer: a byte source plus everything `next_token` needs
/// to keep driving it, including the delivery cursor into the emitter's
/// token stack.
pub struct YeastParser {
    inner: machine::Parser<'static>,
    cursor: usize,
    to_close: bool,
    done: bool,
}

/// Open a parser over `source`, running the requested `production` from
/// its entry state.
///
/// `to_close` records whether `close_parser` should also close `source`:
/// set it when the caller is handing over ownership of the underlying
/// file or descriptor (matching the `owned` flag in §6), clear it when
/// the caller will keep using the source after the parser is done with
/// it (for example a buffer the caller still holds).
///
/// Runs encoding detection (§4.A) once, before the character engine takes
/// its first lookahead character, so a BOM — if present — is left intact
/// in the source window for the `stream` production to tokenize in the
/// ordinary way.
pub fn open_parser(
    mut source: Source,
    to_close: bool,
    production: Production,
) -> Result<YeastParser, ParserError> {
    let encoding = crate::source::detect_encoding(&mut source)?;
    let mut chars = CharEngine::new(encoding);
    chars.next_char(&mut source)?;
    let emitter = TokenEmitter::new(encoding, chars.curr());
    let frames = FrameStack::new(*chars.prev(), *chars.curr());
    let inner = machine::Parser::start(source, chars, emitter, frames, registry(), production)?;
    Ok(YeastParser {
        inner,
        cursor: 0,
        to_close,
        done: false,
    })
}

/// Deliver the next token, running the machine as far as it needs to go
/// to produce one (§4.I).
///
/// Once a [`TokenCode::Done`] token has been delivered, every subsequent
/// call returns a copy of the same terminal token rather than stepping
/// the (now finished) machine again — repeated polling past the end of
/// input is defined behavior, not an error.
pub fn next_token(parser: &mut YeastParser) -> Result<Token, ParserError> {
    loop {
        if let Some(token) = parser.inner.emitter.token_at(parser.cursor) {
            parser.cursor += 1;
            if token.code == TokenCode::Done {
                parser.done = true;
            }
            return Ok(token);
        }
        if parser.done {
            return Ok(parser.inner.emitter.current());
        }
        match parser.inner.step()? {
            StepOutcome::Token => continue,
            StepOutcome::Done => {
                parser.done = true;
                continue;
            }
            StepOutcome::Unexpected => {
                // The active production hit a dead end with no caller left
                // to resume (every `Action::Call` frame has already been
                // unwound by `Parser::step`). This is in-band, not a fatal
                // out-of-band error: surface it as a single `ERROR` token
                // and end the stream, rather than raising `ParserError`.
                let pos = *parser.inner.chars.curr();
                parser
                    .inner
                    .emitter
                    .fake_token(TokenCode::Error, "production reached a dead end", &pos);
                parser.inner.emitter.empty_token(TokenCode::Done, &pos);
                parser.done = true;
                continue;
            }
        }
    }
}

/// Release `parser`'s resources, closing the underlying source if it was
/// opened with `to_close` set.
pub fn close_parser(parser: YeastParser) -> Result<(), ParserError> {
    let YeastParser {
        mut inner,
        to_close,
        ..
    } = parser;
    if to_close {
        inner.source.close()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Encoding;

    #[test]
    fn empty_source_yields_a_single_done_token() {
        let source = open_source_buffer(Vec::new());
        let mut parser = open_parser(source, true, Production::simple("document-stream")).unwrap();
        let token = next_token(&mut parser).unwrap();
        assert_eq!(token.code, TokenCode::BeginStream);
        let mut saw_done = false;
        for _ in 0..32 {
            let token = next_token(&mut parser).unwrap();
            if token.code == TokenCode::Done {
                saw_done = true;
                assert_eq!(token.body.len(), 0);
                break;
            }
        }
        assert!(saw_done, "expected a DONE token before giving up");
        close_parser(parser).unwrap();
    }

    #[test]
    fn repeated_calls_after_done_stay_idempotent() {
        let source = open_source_buffer(Vec::new());
        let mut parser = open_parser(source, true, Production::simple("document-stream")).unwrap();
        let mut last = next_token(&mut parser).unwrap();
        while last.code != TokenCode::Done {
            last = next_token(&mut parser).unwrap();
        }
        let again = next_token(&mut parser).unwrap();
        assert_eq!(again.code, TokenCode::Done);
        close_parser(parser).unwrap();
    }

    #[test]
    fn utf8_bom_is_detected_and_tokenized() {
        let source = open_source_buffer(*b"\xef\xbb\xbfa: 1\n");
        let mut parser = open_parser(source, true, Production::simple("document-stream")).unwrap();
        let mut codes = Vec::new();
        loop {
            let token = next_token(&mut parser).unwrap();
            let done = token.code == TokenCode::Done;
            codes.push((token.code, token.byte_offset));
            if done {
                break;
            }
        }
        assert_eq!(codes[0].0, TokenCode::BeginStream);
        let bom = codes.iter().find(|(code, _)| *code == TokenCode::Bom).unwrap();
        assert_eq!(bom.1, 0);
        close_parser(parser).unwrap();
    }

    #[test]
    fn code_type_matches_instance_method() {
        assert_eq!(code_type(TokenCode::BeginStream), TokenCode::BeginStream.code_type());
        assert_eq!(code_type(TokenCode::Text), CodeType::Match);
    }

    #[test]
    fn open_source_path_auto_reads_standard_input_marker() {
        // "-" must resolve without touching the filesystem at all.
        let result = open_source_path_auto("-");
        assert!(result.is_ok());
    }

    #[test]
    fn open_parser_detects_non_utf8_encodings() {
        let source = open_source_buffer(*b"\xff\xfea\x00: \x00b\x00\n\x00");
        let mut parser = open_parser(source, true, Production::simple("document-stream")).unwrap();
        let token = next_token(&mut parser).unwrap();
        assert_eq!(token.encoding, Encoding::Utf16Le);
        close_parser(parser).unwrap();
    }
}
