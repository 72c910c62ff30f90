//! The token emitter (component E): the protocol between the machine
//! runtime and the caller for opening, closing, and delivering tokens.
//!
//! The emitter owns the code stack (the LIFO stack of currently open
//! `MATCH`-code contexts, §3) and the token stack (every completed token,
//! append-only except when a backtrack truncates it). It always keeps one
//! "current" token open, accumulating characters as the machine runtime
//! advances the character engine; `begin_token`/`end_token`/`empty_token`/
//! `fake_token` each either emit the current token (pushing it onto the
//! token stack) or, for an empty close, relabel it in place.

use crate::char_engine::Character;
use crate::token::{CodeType, Token, TokenBody, TokenCode};
use crate::Encoding;

/// Result of an emitter operation: whether a token became ready for
/// delivery.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Emission {
    /// One or more tokens are now on the token stack, ready to be drained.
    Token,
    /// No token was produced.
    Done,
}

pub struct TokenEmitter {
    tokens: Vec<Token>,
    codes: Vec<TokenCode>,
    current: Token,
    encoding: Encoding,
}

impl TokenEmitter {
    /// Start with an empty current token anchored at `start`, no open
    /// codes, and an empty token stack.
    pub fn new(encoding: Encoding, start: &Character) -> Self {
        TokenEmitter {
            tokens: Vec::new(),
            codes: Vec::new(),
            current: Token::empty_at(start, encoding, TokenCode::Done),
            encoding,
        }
    }

    /// Depth of the code stack (used by `push_state`/`set_state`
    /// snapshots).
    pub fn codes_depth(&self) -> usize {
        self.codes.len()
    }

    /// Depth of the token stack (used by `push_state`/`set_state`
    /// snapshots).
    pub fn tokens_depth(&self) -> usize {
        self.tokens.len()
    }

    /// Truncate the code stack back to a previously captured depth
    /// (`reset_state`).
    pub fn truncate_codes(&mut self, depth: usize) {
        self.codes.truncate(depth);
    }

    /// Truncate the token stack back to a previously captured depth
    /// (`reset_state`).
    pub fn truncate_tokens(&mut self, depth: usize) {
        self.tokens.truncate(depth);
    }

    /// Grow the current token's end to `new_end` as the character engine
    /// consumes another character (§4.D step 3).
    pub fn grow_current(&mut self, new_end: u64) {
        if let TokenBody::Source { end, .. } = &mut self.current.body {
            *end = new_end;
        }
    }

    fn flush_current_if_nonempty(&mut self) {
        if !self.current.body.is_empty() {
            self.tokens.push(self.current);
        }
    }

    fn reopen_current(&mut self, pos: &Character) {
        let inherited = *self.codes.last().unwrap_or(&TokenCode::Unparsed);
        self.current = Token::empty_at(pos, self.encoding, inherited);
    }

    /// Open a new token context. `code` must be a `Match` code or
    /// [`TokenCode::Bom`]. If a token is already open with matched
    /// characters, it is emitted first.
    pub fn begin_token(&mut self, code: TokenCode, pos: &Character) -> Emission {
        debug_assert!(code.code_type() == CodeType::Match || code == TokenCode::Bom);
        let emission = if self.current.body.is_empty() {
            Emission::Done
        } else {
            self.flush_current_if_nonempty();
            Emission::Token
        };
        self.codes.push(code);
        self.current = Token::empty_at(pos, self.encoding, code);
        emission
    }

    /// Close a token context. `code` must equal the top of the code stack
    /// or be [`TokenCode::Unparsed`] (a recovery override). If `code` is
    /// [`TokenCode::Bom`], `bom_name` redirects the token's body to the
    /// static encoding name and its encoding to UTF-8, per the §4.E BOM
    /// rewrite.
    pub fn end_token(
        &mut self,
        code: TokenCode,
        pos: &Character,
        bom_name: Option<&'static str>,
    ) -> Emission {
        let top = self
            .codes
            .pop()
            .expect("end_token called without a matching begin_token");
        debug_assert!(code == top || code == TokenCode::Unparsed);

        if let Some(name) = bom_name {
            self.current.body = TokenBody::Static(name);
            self.current.encoding = Encoding::Utf8;
        }

        if self.current.body.is_empty() {
            // Nested-inheritance semantics (§4.E Open Question resolved
            // in SPEC_FULL.md): relabel with the new stack top instead of
            // dropping the token.
            self.current.code = *self.codes.last().unwrap_or(&TokenCode::Unparsed);
            Emission::Done
        } else {
            self.current.code = code;
            self.tokens.push(self.current);
            self.reopen_current(pos);
            Emission::Token
        }
    }

    /// Emit a zero-length synthetic token, e.g. for `BEGIN`/`END` grouping
    /// codes or [`TokenCode::Done`].
    pub fn empty_token(&mut self, code: TokenCode, pos: &Character) -> Emission {
        self.flush_current_if_nonempty();
        self.tokens.push(Token::empty_at(pos, self.encoding, code));
        self.reopen_current(pos);
        Emission::Token
    }

    /// Emit a `FAKE` token whose bytes point at a static UTF-8 message
    /// string (a BOM name or an error message).
    pub fn fake_token(&mut self, code: TokenCode, text: &'static str, pos: &Character) -> Emission {
        self.flush_current_if_nonempty();
        self.tokens.push(Token {
            byte_offset: pos.byte_offset,
            char_offset: pos.char_offset,
            line: pos.line,
            line_char: pos.line_char,
            body: TokenBody::Static(text),
            encoding: Encoding::Utf8,
            code,
        });
        self.reopen_current(pos);
        Emission::Token
    }

    /// Read the token at `index` without affecting delivery state (used by
    /// the token-delivery cursor).
    pub fn token_at(&self, index: usize) -> Option<Token> {
        self.tokens.get(index).copied()
    }

    /// The current (not-yet-emitted) token.
    pub fn current(&self) -> Token {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_at(byte_offset: u64) -> Character {
        Character {
            byte_offset,
            begin: byte_offset,
            end: byte_offset,
            ..Character::default()
        }
    }

    #[test]
    fn begin_then_end_with_content_emits_one_token() {
        let start = char_at(0);
        let mut emitter = TokenEmitter::new(Encoding::Utf8, &start);
        emitter.begin_token(TokenCode::Text, &start);
        emitter.grow_current(3);
        let emission = emitter.end_token(TokenCode::Text, &char_at(3), None);
        assert_eq!(emission, Emission::Token);
        assert_eq!(emitter.tokens_depth(), 1);
        let token = emitter.token_at(0).unwrap();
        assert_eq!(token.code, TokenCode::Text);
        assert_eq!(token.body.len(), 3);
    }

    #[test]
    fn closing_empty_token_relabels_instead_of_emitting() {
        let start = char_at(0);
        let mut emitter = TokenEmitter::new(Encoding::Utf8, &start);
        emitter.begin_token(TokenCode::White, &start);
        // No characters consumed: the current token stays empty, so the
        // close should relabel it rather than push it onto the stack.
        let emission = emitter.end_token(TokenCode::Unparsed, &start, None);
        assert_eq!(emission, Emission::Done);
        assert_eq!(emitter.tokens_depth(), 0);
    }

    #[test]
    fn bom_rewrite_redirects_body_to_static_name() {
        let start = char_at(0);
        let mut emitter = TokenEmitter::new(Encoding::Utf8, &start);
        emitter.begin_token(TokenCode::Bom, &start);
        emitter.grow_current(3);
        let emission = emitter.end_token(TokenCode::Bom, &char_at(3), Some("UTF-8"));
        assert_eq!(emission, Emission::Token);
        let token = emitter.token_at(0).unwrap();
        assert_eq!(token.body, TokenBody::Static("UTF-8"));
        assert_eq!(token.encoding, Encoding::Utf8);
    }

    #[test]
    fn fake_token_does_not_disturb_the_code_stack() {
        let start = char_at(0);
        let mut emitter = TokenEmitter::new(Encoding::Utf8, &start);
        emitter.begin_token(TokenCode::Text, &start);
        emitter.fake_token(TokenCode::Error, "Unexpected '\\x09'", &start);
        assert_eq!(emitter.codes_depth(), 1);
        assert_eq!(emitter.tokens_depth(), 1);
    }
}
