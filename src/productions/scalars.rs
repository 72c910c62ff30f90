//! Scalar content productions: plain, single-quoted, and double-quoted.
//!
//! Block scalars (literal `|`, folded `>`) are handled by the
//! block-collection productions instead of here, since their header
//! parsing (chomping/indentation indicators) and indentation-driven body
//! loop share more machinery with the block-collection productions than
//! with these single-line content scanners.
//!
//! **Simplifications** (recorded in `DESIGN.md`):
//! - Plain and quoted scalars here are scanned as a single physical line
//!   each. Real YAML plain/quoted scalars may fold across multiple lines;
//!   the donor's hand-written scanner devotes a large fraction of
//!   `scanner.rs` to exactly that folding logic. Reproducing it faithfully
//!   as hand-authored state tables was judged out of proportion to the
//!   rest of this crate's scope, so multi-line folding is left as a
//!   follow-on — the token vocabulary (`LineFold` already exists on
//!   `TokenCode`) is ready for it.
//! - A double-quoted escape is tokenized as the backslash plus exactly one
//!   designator character (covering every single-character escape:
//!   `\n \t \\ \" \0 \a \b \e \f \r \v \_ \N \L \P`). The three
//!   additional-hex-digit escapes (`\xNN`, `\uNNNN`, `\UNNNNNNNN`) are not
//!   special-cased: their hex digits fall through and re-enter the
//!   ordinary text run on the next dispatch.

use crate::classify::{
    BACKSLASH, BLANK, BREAK, COLON, DOUBLE_QUOTE, END_OF_INPUT, FLOW_INDICATOR, POUND,
    SINGLE_QUOTE,
};
use crate::frame::Choice;
use crate::machine::{Action, Guard, StateDef, Transition};
use crate::token::TokenCode;

/// Plain scalar content: everything up to (not including) a line break,
/// end of input, a comment, or an unescaped `: `/`:<EOF>` mapping-value
/// separator. Does not consume or emit the surrounding `BeginScalar`/
/// `EndScalar` pair; callers (the node dispatcher) wrap this.
pub static PLAIN: &[StateDef] = &[
    // 0: open the text span; the first content character is already the
    // lookahead, nothing consumed yet.
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::Text)],
        transitions: &[Transition {
            classes: 0,
            target: 1,
        }],
    },
    // 1: decide what to do with the current (not yet consumed) character.
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition {
                classes: COLON,
                target: 2,
            },
            Transition {
                classes: BREAK | END_OF_INPUT | POUND,
                target: 5,
            },
            Transition {
                classes: FLOW_INDICATOR,
                target: 5,
            },
            Transition {
                classes: 0,
                target: 3,
            },
        ],
    },
    // 2: saw a colon; peek one character ahead to see if it's a mapping
    // value indicator (colon followed by blank/break/EOF) or just content.
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[
            Transition {
                classes: BLANK | BREAK | END_OF_INPUT,
                target: 4,
            },
            Transition {
                classes: 0,
                target: 3,
            },
        ],
    },
    // 3: consume the current character as plain content and loop.
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[Transition {
            classes: 0,
            target: 1,
        }],
    },
    // 4: the colon was a separator; retract over it (and the blank/break
    // peeked past it) and stop.
    StateDef {
        guard: Guard::None,
        actions: &[Action::PrevChar],
        transitions: &[Transition {
            classes: 0,
            target: 5,
        }],
    },
    // 5: close the text span.
    StateDef {
        guard: Guard::None,
        actions: &[Action::EndToken(TokenCode::Text), Action::Success],
        transitions: &[],
    },
];

/// Single-quoted scalar body, including the opening and closing `'`
/// indicators. `''` inside the scalar is the sole escape (a literal
/// quote) and stays inside the surrounding `Text` span rather than being
/// split out — YAML defines it as a doubling rule, not an escape
/// sequence, so there is no separate quote-detail to mark.
pub static SINGLE_QUOTED: &[StateDef] = &[
    // 0: opening quote.
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
        ],
        transitions: &[Transition {
            classes: 0,
            target: 1,
        }],
    },
    // 1: open the text span.
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::Text)],
        transitions: &[Transition {
            classes: 0,
            target: 2,
        }],
    },
    // 2: dispatch on the current (unconsumed) character.
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition {
                classes: SINGLE_QUOTE,
                target: 3,
            },
            Transition {
                classes: END_OF_INPUT,
                target: 7,
            },
            Transition {
                classes: 0,
                target: 4,
            },
        ],
    },
    // 3: saw a quote; peek ahead for a doubled quote (escaped literal).
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[
            Transition {
                classes: SINGLE_QUOTE,
                target: 4,
            },
            Transition {
                classes: 0,
                target: 5,
            },
        ],
    },
    // 4: consume the current character as content (ordinary character, or
    // the second half of a doubled quote) and loop.
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[Transition {
            classes: 0,
            target: 2,
        }],
    },
    // 5: not doubled — retract over the peeked quote and close the text
    // span without it.
    StateDef {
        guard: Guard::None,
        actions: &[Action::PrevChar, Action::EndToken(TokenCode::Text)],
        transitions: &[Transition {
            classes: 0,
            target: 6,
        }],
    },
    // 6: closing quote.
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
            Action::Success,
        ],
        transitions: &[],
    },
    // 7: unterminated at end of input — close the text span, then fall
    // into the (now no-op) closing-quote state to keep nesting balanced.
    StateDef {
        guard: Guard::None,
        actions: &[Action::EndToken(TokenCode::Text)],
        transitions: &[Transition {
            classes: 0,
            target: 6,
        }],
    },
];

/// Double-quoted scalar body, including the opening and closing `"`
/// indicators. Each `\x` escape is wrapped in `BeginQuote`/`EndQuote` as
/// `Meta` text (the escape is not decoded, per the no-scalar-
/// materialization Non-goal), and also brackets the `escape`/`escaped`
/// choice scopes: `escape` spans the whole backslash-plus-designator
/// sequence, `escaped` the designator character alone, nested inside it.
pub static DOUBLE_QUOTED: &[StateDef] = &[
    // 0: opening quote.
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
        ],
        transitions: &[Transition {
            classes: 0,
            target: 1,
        }],
    },
    // 1: outer dispatch (no text span currently open).
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition {
                classes: DOUBLE_QUOTE | END_OF_INPUT,
                target: 5,
            },
            Transition {
                classes: BACKSLASH,
                target: 2,
            },
            Transition {
                classes: 0,
                target: 3,
            },
        ],
    },
    // 2: backslash; open the escape choice scope, a quote span, and
    // consume the backslash itself.
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginChoice(Choice::Escape),
            Action::EmptyToken(TokenCode::BeginQuote),
            Action::NextChar,
        ],
        transitions: &[Transition {
            classes: 0,
            target: 9,
        }],
    },
    // 3: open the text span and consume the first content character.
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::Text), Action::NextChar],
        transitions: &[Transition {
            classes: 0,
            target: 4,
        }],
    },
    // 4: inner dispatch (a text span is currently open).
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition {
                classes: DOUBLE_QUOTE | END_OF_INPUT,
                target: 7,
            },
            Transition {
                classes: BACKSLASH,
                target: 8,
            },
            Transition {
                classes: 0,
                target: 6,
            },
        ],
    },
    // 5: closing quote (or EOF, nothing to consume then).
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
            Action::Success,
        ],
        transitions: &[],
    },
    // 6: consume one more content character and loop.
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[Transition {
            classes: 0,
            target: 4,
        }],
    },
    // 7: close the text span on a closing quote or EOF, resume the outer
    // dispatch so the quote/EOF is handled uniformly by state 1/5.
    StateDef {
        guard: Guard::None,
        actions: &[Action::EndToken(TokenCode::Text)],
        transitions: &[Transition {
            classes: 0,
            target: 1,
        }],
    },
    // 8: close the text span on a backslash, resume the outer dispatch so
    // the escape is handled by state 2.
    StateDef {
        guard: Guard::None,
        actions: &[Action::EndToken(TokenCode::Text)],
        transitions: &[Transition {
            classes: 0,
            target: 1,
        }],
    },
    // 9: the escape designator character (e.g. `n`, `t`, `x`, `u`, `"`).
    // The designator itself is matched inside its own nested `escaped`
    // choice scope, committed as soon as it's consumed; the outer
    // `escape` scope opened in state 2 is committed once the whole
    // sequence (backslash plus designator) is behind us.
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginChoice(Choice::Escaped),
            Action::BeginToken(TokenCode::Meta),
            Action::NextChar,
            Action::EndToken(TokenCode::Meta),
            Action::Commit(Choice::Escaped),
            Action::EndChoice,
            Action::EmptyToken(TokenCode::EndQuote),
            Action::Commit(Choice::Escape),
            Action::EndChoice,
        ],
        transitions: &[Transition {
            classes: 0,
            target: 1,
        }],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Encoding;
    use crate::testutil::run_production;
    use crate::token::Token;

    fn text_bytes(tokens: &[Token], source: &[u8]) -> String {
        tokens
            .iter()
            .filter(|t| t.code == TokenCode::Text)
            .map(|t| {
                let crate::token::TokenBody::Source { begin, end } = t.body else {
                    panic!("expected source body")
                };
                std::str::from_utf8(&source[begin as usize..end as usize])
                    .unwrap()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn plain_scalar_stops_before_mapping_colon() {
        let input = b"foo: bar";
        let tokens = run_production(input, Encoding::Utf8, "plain-scalar", &[("plain-scalar", PLAIN)]);
        assert_eq!(text_bytes(&tokens, input), "foo");
    }

    #[test]
    fn plain_scalar_keeps_colon_without_trailing_space() {
        let input = b"http://x";
        let tokens = run_production(input, Encoding::Utf8, "plain-scalar", &[("plain-scalar", PLAIN)]);
        assert_eq!(text_bytes(&tokens, input), "http://x");
    }

    #[test]
    fn plain_scalar_stops_at_comment() {
        let input = b"foo #c";
        let tokens = run_production(input, Encoding::Utf8, "plain-scalar", &[("plain-scalar", PLAIN)]);
        assert_eq!(text_bytes(&tokens, input), "foo ");
    }

    #[test]
    fn single_quoted_doubling_is_kept_as_content() {
        let input = b"'a''b'";
        let tokens = run_production(
            input,
            Encoding::Utf8,
            "single-quoted",
            &[("single-quoted", SINGLE_QUOTED)],
        );
        assert_eq!(tokens.first().unwrap().code, TokenCode::Indicator);
        assert_eq!(tokens.last().unwrap().code, TokenCode::Indicator);
        assert_eq!(text_bytes(&tokens, input), "a''b");
    }

    #[test]
    fn single_quoted_stops_at_the_real_closing_quote() {
        let input = b"'hi'";
        let tokens = run_production(
            input,
            Encoding::Utf8,
            "single-quoted",
            &[("single-quoted", SINGLE_QUOTED)],
        );
        assert_eq!(text_bytes(&tokens, input), "hi");
        assert_eq!(
            tokens.iter().filter(|t| t.code == TokenCode::Indicator).count(),
            2
        );
    }

    #[test]
    fn double_quoted_escape_is_wrapped_in_quote_markers() {
        let input = br#""a\nb""#;
        let tokens = run_production(
            input,
            Encoding::Utf8,
            "double-quoted",
            &[("double-quoted", DOUBLE_QUOTED)],
        );
        assert!(tokens.iter().any(|t| t.code == TokenCode::BeginQuote));
        assert!(tokens.iter().any(|t| t.code == TokenCode::EndQuote));
        assert_eq!(text_bytes(&tokens, input), "ab");
    }

    #[test]
    fn double_quoted_escape_commits_its_choice_scopes_cleanly() {
        // A well-formed escape must not trip the "commit outside matching
        // choice scope" fake error `Commit` raises when its scope isn't
        // the innermost open one — i.e. `escape`/`escaped` nest correctly.
        let input = br#""\n""#;
        let tokens = run_production(
            input,
            Encoding::Utf8,
            "double-quoted",
            &[("double-quoted", DOUBLE_QUOTED)],
        );
        assert!(!tokens.iter().any(|t| t.code == TokenCode::Error));
    }

    #[test]
    fn double_quoted_without_escapes_is_one_text_run() {
        let input = br#""hello""#;
        let tokens = run_production(
            input,
            Encoding::Utf8,
            "double-quoted",
            &[("double-quoted", DOUBLE_QUOTED)],
        );
        assert_eq!(text_bytes(&tokens, input), "hello");
    }
}
