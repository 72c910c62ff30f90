//! The character engine (component D): one-character lookahead over the
//! byte source, with position tracking and start-of-line propagation.
//!
//! Positions are stored as absolute byte/char offsets rather than window
//! pointers: when the byte source's window relocates, every offset
//! already held by a [`Character`], [`crate::Token`], or
//! [`crate::Frame`] still addresses the same logical input, because it
//! was never tied to a memory address in the first place. There is
//! therefore no pointer-walking rebase step; `ensure_lookahead` below is
//! the only adjustment a window relocation ever requires.

use crate::classify::{classify, BREAK, END_OF_INPUT, INVALID, START_OF_LINE};
use crate::decode::decode;
use crate::{DecodeError, Encoding, ParserError, SourceError};
use crate::source::Source;

/// Sentinel for "not yet decoded".
pub const NO_CODE: i32 = -1;
/// Sentinel for "end of input reached".
pub const EOF_CODE: i32 = -2;
/// Sentinel for "malformed byte sequence at this position".
pub const INVALID_CODE: i32 = -3;

/// How many bytes ahead of the current position trigger a `more` request
/// (6 being the historic maximum UTF-8 sequence width).
const LOOKAHEAD_MARGIN: usize = 6;
/// Size of each `more` request once the margin is breached.
const REFILL_REQUEST: usize = 8 * 1024;

/// A decoded character together with its position and classification — a
/// token-shaped record extended with a class mask.
#[derive(Copy, Clone, Debug)]
pub struct Character {
    /// Absolute byte offset where this character begins.
    pub byte_offset: u64,
    /// 0-based character offset where this character begins.
    pub char_offset: u64,
    /// 1-based line number.
    pub line: u64,
    /// 0-based column within `line`.
    pub line_char: u64,
    /// Absolute byte offset where this character begins (alias of
    /// `byte_offset`, kept as a distinct field so it lines up with
    /// `end` below).
    pub begin: u64,
    /// Absolute byte offset just past this character.
    pub end: u64,
    /// The decoded code point, or one of [`NO_CODE`], [`EOF_CODE`],
    /// [`INVALID_CODE`].
    pub code: i32,
    /// Class bitmask for `code`, including [`crate::classify::START_OF_LINE`]
    /// when applicable. Empty for the sentinel codes.
    pub mask: u64,
}

impl Default for Character {
    fn default() -> Self {
        Character {
            byte_offset: 0,
            char_offset: 0,
            line: 1,
            line_char: 0,
            begin: 0,
            end: 0,
            code: NO_CODE,
            mask: START_OF_LINE,
        }
    }
}

/// One-character lookahead over a [`Source`], component D.
pub struct CharEngine {
    pub(crate) encoding: Encoding,
    pub(crate) curr: Character,
    pub(crate) prev: Character,
    eof: bool,
}

impl CharEngine {
    /// Create an engine positioned just before the first character, not
    /// yet decoded (`curr.code == NO_CODE`). Call [`CharEngine::next_char`]
    /// once to prime `curr`.
    pub fn new(encoding: Encoding) -> Self {
        CharEngine {
            encoding,
            curr: Character::default(),
            prev: Character::default(),
            eof: false,
        }
    }

    /// The current lookahead character.
    pub fn curr(&self) -> &Character {
        &self.curr
    }

    /// The character preceding the current one.
    pub fn prev(&self) -> &Character {
        &self.prev
    }

    /// Advance past `curr`, decoding the next character.
    ///
    /// Advances position tracking, requests more bytes if the lookahead
    /// margin is breached, then decodes one code point. Returns an error only
    /// when the source itself fails (I/O, allocation); malformed encoding
    /// is reported through `curr.code == INVALID_CODE`, not through the
    /// `Result`, so recovery-by-production can see it.
    pub fn next_char(&mut self, source: &mut Source) -> Result<(), ParserError> {
        if self.curr.code == EOF_CODE {
            return Ok(());
        }
        self.prev = self.curr;

        let consumed = self.curr.end - self.curr.begin;
        self.curr.byte_offset += consumed;
        self.curr.char_offset += u64::from(self.curr.code != NO_CODE);
        if self.curr.code != NO_CODE {
            self.curr.line_char += 1;
        }
        self.curr.begin = self.curr.end;

        self.ensure_lookahead(source)?;

        if self.curr.begin >= source.end_offset() && self.eof {
            self.curr.end = self.curr.begin;
            self.curr.code = EOF_CODE;
            self.curr.mask = END_OF_INPUT;
        } else {
            let window_start = self.curr.begin - source.byte_offset();
            let bytes = source.window();
            let mut begin = window_start as usize;
            match decode(self.encoding, bytes, &mut begin) {
                Ok(code_point) => {
                    self.curr.end = source.byte_offset() + begin as u64;
                    self.curr.code = code_point as i32;
                    self.curr.mask = classify(code_point);
                }
                Err(DecodeError::Incomplete) => {
                    // `ensure_lookahead` should have made this unreachable
                    // outside of a truncated stream at EOF; treat it the
                    // same as a malformed sequence so the machine can
                    // recover instead of looping.
                    self.curr.end = source.byte_offset() + bytes.len() as u64;
                    self.curr.code = INVALID_CODE;
                    self.curr.mask = INVALID;
                }
                Err(DecodeError::InvalidByteSequence) => {
                    self.curr.end = source.byte_offset() + begin as u64;
                    self.curr.code = INVALID_CODE;
                    self.curr.mask = INVALID;
                }
            }
        }

        let at_stream_start = self.prev.code == NO_CODE;
        let after_break = self.prev.code != NO_CODE && self.prev.mask & BREAK != 0;
        if at_stream_start || after_break {
            self.curr.mask |= START_OF_LINE;
        }
        Ok(())
    }

    /// Retract to the previous character (used by productions that peek
    /// one character beyond what they end up consuming).
    pub fn prev_char(&mut self) {
        self.curr = self.prev;
    }

    /// Restore both the lookahead and the preceding character from a
    /// [`crate::frame::FrameStack`] checkpoint (`reset_state`).
    pub fn restore(&mut self, prev: Character, curr: Character) {
        self.prev = prev;
        self.curr = curr;
    }

    /// Mark the upcoming character as starting a new line; called by
    /// productions right after consuming a break token.
    pub fn next_line(&mut self) {
        self.curr.mask |= START_OF_LINE;
        self.curr.line_char = 0;
        self.curr.line += 1;
    }

    fn ensure_lookahead(&mut self, source: &mut Source) -> Result<(), SourceError> {
        if self.eof {
            return Ok(());
        }
        let remaining = source.end_offset().saturating_sub(self.curr.begin);
        if remaining >= LOOKAHEAD_MARGIN as u64 {
            return Ok(());
        }
        let appended = source.more(REFILL_REQUEST)?;
        if appended == 0 {
            self.eof = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_stream_advances_one_char_at_a_time() {
        let mut source = Source::from_buffer(*b"ab");
        let mut engine = CharEngine::new(Encoding::Utf8);
        engine.next_char(&mut source).unwrap();
        assert_eq!(engine.curr().code, 'a' as i32);
        assert_eq!(engine.curr().byte_offset, 0);
        engine.next_char(&mut source).unwrap();
        assert_eq!(engine.curr().code, 'b' as i32);
        assert_eq!(engine.curr().byte_offset, 1);
        engine.next_char(&mut source).unwrap();
        assert_eq!(engine.curr().code, EOF_CODE);
    }

    #[test]
    fn utf16_surrogate_pair_advances_offsets_by_the_full_pair() {
        let mut source = Source::from_buffer(vec![0x00, 0xd8, 0x00, 0xdc]);
        let mut engine = CharEngine::new(Encoding::Utf16Le);
        engine.next_char(&mut source).unwrap();
        assert_eq!(engine.curr().code, 0x10000);
        assert_eq!(engine.curr().char_offset, 0);
        engine.next_char(&mut source).unwrap();
        assert_eq!(engine.curr().byte_offset, 4);
    }

    #[test]
    fn start_of_line_propagates_after_a_break() {
        let mut source = Source::from_buffer(*b"a\nb");
        let mut engine = CharEngine::new(Encoding::Utf8);
        engine.next_char(&mut source).unwrap(); // 'a', start of stream
        assert_ne!(engine.curr().mask & START_OF_LINE, 0);
        engine.next_char(&mut source).unwrap(); // '\n'
        assert_eq!(engine.curr().mask & START_OF_LINE, 0);
        engine.next_char(&mut source).unwrap(); // 'b'
        assert_ne!(engine.curr().mask & START_OF_LINE, 0);
    }

    #[test]
    fn invalid_byte_sequence_does_not_stall() {
        let mut source = Source::from_buffer(vec![0xff]);
        let mut engine = CharEngine::new(Encoding::Utf8);
        engine.next_char(&mut source).unwrap();
        assert_eq!(engine.curr().code, INVALID_CODE);
        engine.next_char(&mut source).unwrap();
        assert_eq!(engine.curr().code, EOF_CODE);
    }
}
