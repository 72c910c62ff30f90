//! Line breaks, blank runs, comments, and document boundary markers — the
//! low-level character classes that every higher-level production is built
//! from.

use crate::classify::{
    BLANK, BREAK, CR, DASH, DOT, END_OF_INPUT, LF, POUND, START_OF_LINE,
};
use crate::machine::{Action, Guard, StateDef, Transition};
use crate::token::TokenCode;

/// One line break, emitted as a generic [`TokenCode::Break`]. Productions
/// that need the literal/folded distinction (block scalars) consume their
/// breaks inline with [`TokenCode::LineFeed`]/[`TokenCode::LineFold`]
/// instead of calling this production — see `scalars.rs`.
///
/// CRLF is the one two-character break: state 0 dispatches on the
/// lookahead *before* consuming anything, so a bare CR only merges with an
/// immediately following LF (state 1), while a bare LF (or NEL/LS/PS)
/// consumes exactly one character (state 3). Two consecutive bare `\n`
/// characters therefore yield two separate `Break` tokens, one per blank
/// line, instead of being collapsed into one.
pub static BREAK_TABLE: &[StateDef] = &[
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition {
                classes: CR,
                target: 1,
            },
            Transition {
                classes: BREAK,
                target: 3,
            },
        ],
    },
    // Saw CR; consume it and check whether an LF immediately follows.
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::Break), Action::NextChar],
        transitions: &[
            Transition {
                classes: LF,
                target: 2,
            },
            Transition {
                classes: 0,
                target: 4,
            },
        ],
    },
    // The LF half of a CRLF pair; consume it into the same token.
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[Transition {
            classes: 0,
            target: 4,
        }],
    },
    // A lone LF/NEL/LS/PS break: consume exactly one character.
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::Break), Action::NextChar],
        transitions: &[Transition {
            classes: 0,
            target: 4,
        }],
    },
    StateDef {
        guard: Guard::None,
        actions: &[Action::EndToken(TokenCode::Break), Action::NextLine, Action::Success],
        transitions: &[],
    },
];

/// A run of blank (space/tab) characters, classified as [`TokenCode::Indent`]
/// if it begins a line and [`TokenCode::White`] otherwise.
pub static WHITE: &[StateDef] = &[
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition {
                classes: START_OF_LINE,
                target: 1,
            },
            Transition {
                classes: 0,
                target: 3,
            },
        ],
    },
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::Indent), Action::NextChar],
        transitions: &[Transition {
            classes: BLANK,
            target: 1,
        }, Transition {
            classes: 0,
            target: 2,
        }],
    },
    StateDef {
        guard: Guard::None,
        actions: &[Action::EndToken(TokenCode::Indent), Action::Success],
        transitions: &[],
    },
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::White), Action::NextChar],
        transitions: &[Transition {
            classes: BLANK,
            target: 3,
        }, Transition {
            classes: 0,
            target: 4,
        }],
    },
    StateDef {
        guard: Guard::None,
        actions: &[Action::EndToken(TokenCode::White), Action::Success],
        transitions: &[],
    },
];

/// `# ...` up to (not including) the next line break or end of input,
/// wrapped in `BeginComment`/`EndComment`.
pub static COMMENT: &[StateDef] = &[
    StateDef {
        guard: Guard::None,
        actions: &[Action::EmptyToken(TokenCode::BeginComment)],
        transitions: &[Transition {
            classes: POUND,
            target: 1,
        }],
    },
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::Text), Action::NextChar],
        transitions: &[
            Transition {
                classes: BREAK | END_OF_INPUT,
                target: 2,
            },
            Transition {
                classes: 0,
                target: 1,
            },
        ],
    },
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EndToken(TokenCode::Text),
            Action::EmptyToken(TokenCode::EndComment),
            Action::Success,
        ],
        transitions: &[],
    },
];

/// `---` or `...`, only meaningful at the start of a line; the caller is
/// expected to have already checked [`crate::classify::START_OF_LINE`]
/// before invoking this production (both markers are also valid plain
/// scalar content when not at column 0, which this production does not
/// attempt to disambiguate on its own).
pub static DOCUMENT_MARKER: &[StateDef] = &[
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition {
                classes: DASH,
                target: 1,
            },
            Transition {
                classes: DOT,
                target: 4,
            },
        ],
    },
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::DocumentStart), Action::NextChar],
        transitions: &[Transition {
            classes: DASH,
            target: 2,
        }],
    },
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[Transition {
            classes: DASH,
            target: 3,
        }],
    },
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::NextChar,
            Action::EndToken(TokenCode::DocumentStart),
            Action::Success,
        ],
        transitions: &[],
    },
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::DocumentEnd), Action::NextChar],
        transitions: &[Transition {
            classes: DOT,
            target: 5,
        }],
    },
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[Transition {
            classes: DOT,
            target: 6,
        }],
    },
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::NextChar,
            Action::EndToken(TokenCode::DocumentEnd),
            Action::Success,
        ],
        transitions: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Encoding;
    use crate::testutil::run_production;

    #[test]
    fn break_consumes_a_single_lf() {
        let tokens = run_production(b"\na", Encoding::Utf8, "break", &[("break", BREAK_TABLE)]);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].code, TokenCode::Break);
        assert_eq!(tokens[0].body.len(), 1);
    }

    #[test]
    fn break_collapses_crlf_into_one_token() {
        let tokens = run_production(b"\r\na", Encoding::Utf8, "break", &[("break", BREAK_TABLE)]);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].body.len(), 2);
    }

    #[test]
    fn white_at_start_of_line_is_indent() {
        let tokens = run_production(b"  a", Encoding::Utf8, "white", &[("white", WHITE)]);
        assert_eq!(tokens[0].code, TokenCode::Indent);
        assert_eq!(tokens[0].body.len(), 2);
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let tokens = run_production(
            b"# hi\n",
            Encoding::Utf8,
            "comment",
            &[("comment", COMMENT)],
        );
        assert_eq!(tokens[0].code, TokenCode::BeginComment);
        assert!(tokens.iter().any(|t| t.code == TokenCode::Text));
        assert_eq!(tokens.last().unwrap().code, TokenCode::EndComment);
    }

    #[test]
    fn document_start_marker_is_recognized() {
        let tokens = run_production(
            b"---\n",
            Encoding::Utf8,
            "document-marker",
            &[("document-marker", DOCUMENT_MARKER)],
        );
        assert_eq!(tokens[0].code, TokenCode::DocumentStart);
        assert_eq!(tokens[0].body.len(), 3);
    }

    #[test]
    fn document_end_marker_is_recognized() {
        let tokens = run_production(
            b"...\n",
            Encoding::Utf8,
            "document-marker",
            &[("document-marker", DOCUMENT_MARKER)],
        );
        assert_eq!(tokens[0].code, TokenCode::DocumentEnd);
    }
}
