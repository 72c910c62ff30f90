//! Node dispatch, flow/block collections, properties (anchors and tags),
//! aliases, block scalars, directives, and the top-level document-stream
//! loop.
//!
//! **Simplifications** (recorded in `DESIGN.md`, consistent with the ones
//! already noted in `scalars.rs`):
//! - Block sequence/mapping continuation, and block-scalar body
//!   continuation, are decided by local character class alone (another
//!   `-` entry marker, another plausible mapping key, another body line
//!   that doesn't start with `-`/`.`) rather than by comparing the new
//!   line's indentation column against the collection's `n`. A full
//!   column comparison needs either unbounded transition conditions or a
//!   counter/guard combination that can gracefully fall through to
//!   "stop, not an error" on mismatch; the existing `Guard` model can only
//!   express "stop = dead end", which is wrong for ordinary loop
//!   termination. `n` is still threaded through every [`Action::Call`]
//!   here (`NParam::Increment` / `NParam::Reset`), so the data a correct
//!   column check would need is already flowing through the machine — the
//!   comparison itself is the follow-on.
//! - A block scalar's header modifiers (chomping indicator, explicit
//!   indentation indicator) are captured as one opaque `Meta` run rather
//!   than parsed field-by-field.
//! - A document's directives are limited to at most one line before the
//!   document body; YAML technically allows any number.
//! - `node` in block context distinguishes a bare scalar from a mapping
//!   key by speculatively tokenizing the scalar, then checking whether a
//!   `:` immediately follows (`NODE_BLOCK` states 10-15 below). On a
//!   mismatch it rolls back via [`Action::ResetState`] and re-enters as
//!   `block-mapping`, using [`crate::frame::FrameStack`]'s checkpoint
//!   stack directly (`scalars.rs`'s double-quoted escape handling does not
//!   use this machinery at all; see that module's doc comment).
//! - `TAG`'s verbatim form (`!<tag:value>`) captures everything between
//!   `<` and `>` as one opaque `Meta` run, same as a handle+suffix tag's
//!   suffix; it does not separately validate that the interior is a
//!   well-formed URI. A missing closing `>` is flagged with a `FakeError`
//!   recovery token rather than silently accepted (`TAG` state 16).
//! - `DIRECTIVE` recognizes the two built-in directive names, `YAML` and
//!   `TAG`, by a short literal-match trie (new single-letter classify bits
//!   exist only to support this); any other name is treated as a reserved
//!   directive, flagged with a `FakeError` recovery token, and its
//!   parameters are tokenized as `Unparsed` rather than `Text`.

use crate::classify::{
    A_LETTER, AMPERSAND, ASTERISK, BANG, BLANK, BREAK, COLON, COMMA, DASH, DOT, DOUBLE_QUOTE,
    END_OF_INPUT, G_LETTER, GT, L_LETTER, LANGLE, LBRACE, LBRACKET, M_LETTER, PERCENT, PIPE,
    POUND, RBRACE, RBRACKET, SINGLE_QUOTE, T_LETTER, WORD, Y_LETTER,
};
use crate::machine::{Action, CallSpec, Guard, NParam, StateDef, Transition};
use crate::token::TokenCode;

/// `&name`. A no-op success if the current character isn't `&`.
pub static ANCHOR: &[StateDef] = &[
    // 0: dispatch
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: AMPERSAND, target: 1 },
            Transition { classes: 0, target: 4 },
        ],
    },
    // 1: consume '&'
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
        ],
        transitions: &[Transition { classes: 0, target: 2 }],
    },
    // 2: open name run
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::Meta)],
        transitions: &[Transition { classes: 0, target: 3 }],
    },
    // 3: dispatch on name run
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: WORD, target: 5 },
            Transition { classes: 0, target: 6 },
        ],
    },
    // 4: no anchor present
    StateDef {
        guard: Guard::None,
        actions: &[Action::Success],
        transitions: &[],
    },
    // 5: consume one name character
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[Transition { classes: 0, target: 3 }],
    },
    // 6: close name run
    StateDef {
        guard: Guard::None,
        actions: &[Action::EndToken(TokenCode::Meta), Action::Success],
        transitions: &[],
    },
];

/// `!`, `!!`, `!handle!suffix`, or the verbatim `!<tag:value>` form. A
/// no-op success if the current character isn't `!`.
pub static TAG: &[StateDef] = &[
    // 0: dispatch
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: BANG, target: 1 },
            Transition { classes: 0, target: 15 },
        ],
    },
    // 1: consume first '!'
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
        ],
        transitions: &[Transition { classes: 0, target: 2 }],
    },
    // 2: dispatch on what follows the first '!': verbatim, secondary
    // handle, or straight into a primary-handle/non-specific suffix run.
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: LANGLE, target: 3 },
            Transition { classes: BANG, target: 14 },
            Transition { classes: 0, target: 8 },
        ],
    },
    // 3: consume '<'
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
        ],
        transitions: &[Transition { classes: 0, target: 4 }],
    },
    // 4: open the verbatim body run
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::Meta)],
        transitions: &[Transition { classes: 0, target: 5 }],
    },
    // 5: dispatch on the verbatim body
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: GT, target: 6 },
            Transition { classes: END_OF_INPUT, target: 6 },
            Transition { classes: 0, target: 7 },
        ],
    },
    // 6: close the verbatim body run
    StateDef {
        guard: Guard::None,
        actions: &[Action::EndToken(TokenCode::Meta)],
        transitions: &[Transition { classes: 0, target: 9 }],
    },
    // 7: consume one verbatim body character
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[Transition { classes: 0, target: 5 }],
    },
    // 8: open name run (primary-handle-plus-suffix or non-specific tag)
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::Meta)],
        transitions: &[Transition { classes: 0, target: 11 }],
    },
    // 9: dispatch on the closing '>'; a missing/truncated terminator is
    // flagged with a recovery token (state 16) rather than silently
    // accepted as a complete verbatim tag.
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: GT, target: 10 },
            Transition { classes: 0, target: 16 },
        ],
    },
    // 10: consume '>'
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
    // 11: dispatch on the name run
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: WORD, target: 12 },
            Transition { classes: 0, target: 13 },
        ],
    },
    // 12: consume one name character
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[Transition { classes: 0, target: 11 }],
    },
    // 13: close name run
    StateDef {
        guard: Guard::None,
        actions: &[Action::EndToken(TokenCode::Meta)],
        transitions: &[Transition { classes: 0, target: 15 }],
    },
    // 14: consume second '!' (secondary handle), then fall into the
    // suffix name run at 8
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
        ],
        transitions: &[Transition { classes: 0, target: 8 }],
    },
    // 15: success (with or without a tag present)
    StateDef {
        guard: Guard::None,
        actions: &[Action::Success],
        transitions: &[],
    },
    // 16: the verbatim body ran into a break or end of input before a
    // closing '>' — flag it and still succeed, same as the rest of this
    // production's recovery stance.
    StateDef {
        guard: Guard::None,
        actions: &[Action::FakeError("unterminated verbatim tag, expected '>'")],
        transitions: &[Transition { classes: 0, target: 15 }],
    },
];

/// Optional anchor and/or tag, in either order, wrapped in
/// `BeginProperties`/`EndProperties`. A no-op success if neither is
/// present.
pub static PROPERTIES: &[StateDef] = &[
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: AMPERSAND, target: 1 },
            Transition { classes: BANG, target: 2 },
            Transition { classes: 0, target: 3 },
        ],
    },
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginProperties),
            Action::Call(CallSpec { name: "anchor", n: NParam::Same, c: None, t: None }),
            Action::Call(CallSpec { name: "tag", n: NParam::Same, c: None, t: None }),
            Action::EmptyToken(TokenCode::EndProperties),
            Action::Success,
        ],
        transitions: &[],
    },
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginProperties),
            Action::Call(CallSpec { name: "tag", n: NParam::Same, c: None, t: None }),
            Action::Call(CallSpec { name: "anchor", n: NParam::Same, c: None, t: None }),
            Action::EmptyToken(TokenCode::EndProperties),
            Action::Success,
        ],
        transitions: &[],
    },
    StateDef {
        guard: Guard::None,
        actions: &[Action::Success],
        transitions: &[],
    },
];

/// `*name`. A full node by itself: wraps `BeginNode`/`BeginContent` around
/// the alias indicator and its target name, so callers treat it exactly
/// like any other node-content alternative.
pub static ALIAS: &[StateDef] = &[
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
        ],
        transitions: &[Transition { classes: 0, target: 1 }],
    },
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::Meta)],
        transitions: &[Transition { classes: 0, target: 2 }],
    },
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: WORD, target: 3 },
            Transition { classes: 0, target: 4 },
        ],
    },
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[Transition { classes: 0, target: 2 }],
    },
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EndToken(TokenCode::Meta),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
            Action::Success,
        ],
        transitions: &[],
    },
];

/// Block-context node: properties, then dispatch on the leading
/// character. A bare scalar-looking run is speculatively tokenized as a
/// standalone scalar and, if a `:` turns out to follow it, rolled back
/// and re-entered as `block-mapping` instead (see the module doc comment).
pub static NODE_BLOCK: &[StateDef] = &[
    // 0: properties
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "properties", n: NParam::Same, c: None, t: None })],
        transitions: &[Transition { classes: 0, target: 1 }],
    },
    // 1: dispatch on content's leading character
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: LBRACE, target: 2 },
            Transition { classes: LBRACKET, target: 3 },
            Transition { classes: SINGLE_QUOTE, target: 4 },
            Transition { classes: DOUBLE_QUOTE, target: 5 },
            Transition { classes: ASTERISK, target: 6 },
            Transition { classes: PIPE, target: 7 },
            Transition { classes: GT, target: 8 },
            Transition { classes: DASH, target: 9 },
            Transition { classes: 0, target: 10 },
        ],
    },
    // 2: flow mapping
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::Call(CallSpec { name: "flow-mapping", n: NParam::Reset, c: None, t: None }),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
            Action::Success,
        ],
        transitions: &[],
    },
    // 3: flow sequence
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::Call(CallSpec { name: "flow-sequence", n: NParam::Reset, c: None, t: None }),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
            Action::Success,
        ],
        transitions: &[],
    },
    // 4: single-quoted scalar
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::EmptyToken(TokenCode::BeginScalar),
            Action::Call(CallSpec { name: "single-quoted", n: NParam::Same, c: None, t: None }),
            Action::EmptyToken(TokenCode::EndScalar),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
            Action::Success,
        ],
        transitions: &[],
    },
    // 5: double-quoted scalar
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::EmptyToken(TokenCode::BeginScalar),
            Action::Call(CallSpec { name: "double-quoted-scalar", n: NParam::Same, c: None, t: None }),
            Action::EmptyToken(TokenCode::EndScalar),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
            Action::Success,
        ],
        transitions: &[],
    },
    // 6: alias (wraps its own node markers)
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::Call(CallSpec { name: "alias", n: NParam::Same, c: None, t: None }),
            Action::Success,
        ],
        transitions: &[],
    },
    // 7: literal block scalar
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::Call(CallSpec { name: "block-scalar-literal", n: NParam::Increment, c: None, t: None }),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
            Action::Success,
        ],
        transitions: &[],
    },
    // 8: folded block scalar
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::Call(CallSpec { name: "block-scalar-folded", n: NParam::Increment, c: None, t: None }),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
            Action::Success,
        ],
        transitions: &[],
    },
    // 9: nested block sequence
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::Call(CallSpec { name: "block-sequence", n: NParam::Increment, c: None, t: None }),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
            Action::Success,
        ],
        transitions: &[],
    },
    // 10: tentatively a standalone scalar
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::PushState,
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::EmptyToken(TokenCode::BeginScalar),
        ],
        transitions: &[Transition { classes: 0, target: 11 }],
    },
    // 11: consume the tentative scalar
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "plain-scalar", n: NParam::Same, c: None, t: None })],
        transitions: &[Transition { classes: 0, target: 12 }],
    },
    // 12: was it actually a mapping key?
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: COLON, target: 13 },
            Transition { classes: 0, target: 15 },
        ],
    },
    // 13: yes — undo the speculative scalar wrapping
    StateDef {
        guard: Guard::None,
        actions: &[Action::ResetState],
        transitions: &[Transition { classes: 0, target: 14 }],
    },
    // 14: re-enter as a block mapping
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::Call(CallSpec { name: "block-mapping", n: NParam::Increment, c: None, t: None }),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
            Action::Success,
        ],
        transitions: &[],
    },
    // 15: no — it is a confirmed standalone scalar
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::PopState,
            Action::EmptyToken(TokenCode::EndScalar),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
            Action::Success,
        ],
        transitions: &[],
    },
];

/// Flow-context node: like [`NODE_BLOCK`] minus the block-only forms
/// (block scalars, block sequence entries, and the mapping-key
/// speculation dance — a flow mapping decides key-vs-value at its own
/// level via the `:` it scans for between elements).
pub static NODE_FLOW: &[StateDef] = &[
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "properties", n: NParam::Same, c: None, t: None })],
        transitions: &[Transition { classes: 0, target: 1 }],
    },
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: LBRACE, target: 2 },
            Transition { classes: LBRACKET, target: 3 },
            Transition { classes: SINGLE_QUOTE, target: 4 },
            Transition { classes: DOUBLE_QUOTE, target: 5 },
            Transition { classes: ASTERISK, target: 6 },
            Transition { classes: 0, target: 7 },
        ],
    },
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::Call(CallSpec { name: "flow-mapping", n: NParam::Reset, c: None, t: None }),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
            Action::Success,
        ],
        transitions: &[],
    },
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::Call(CallSpec { name: "flow-sequence", n: NParam::Reset, c: None, t: None }),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
            Action::Success,
        ],
        transitions: &[],
    },
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::EmptyToken(TokenCode::BeginScalar),
            Action::Call(CallSpec { name: "single-quoted", n: NParam::Same, c: None, t: None }),
            Action::EmptyToken(TokenCode::EndScalar),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
            Action::Success,
        ],
        transitions: &[],
    },
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::EmptyToken(TokenCode::BeginScalar),
            Action::Call(CallSpec { name: "double-quoted-scalar", n: NParam::Same, c: None, t: None }),
            Action::EmptyToken(TokenCode::EndScalar),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
            Action::Success,
        ],
        transitions: &[],
    },
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::Call(CallSpec { name: "alias", n: NParam::Same, c: None, t: None }),
            Action::Success,
        ],
        transitions: &[],
    },
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::EmptyToken(TokenCode::BeginScalar),
            Action::Call(CallSpec { name: "plain-scalar", n: NParam::Same, c: None, t: None }),
            Action::EmptyToken(TokenCode::EndScalar),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
            Action::Success,
        ],
        transitions: &[],
    },
];

/// `[a, b, c]`.
pub static FLOW_SEQUENCE: &[StateDef] = &[
    // 0: consume '['
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
        ],
        transitions: &[Transition { classes: 0, target: 1 }],
    },
    // 1
    StateDef {
        guard: Guard::None,
        actions: &[Action::EmptyToken(TokenCode::BeginSequence)],
        transitions: &[Transition { classes: 0, target: 2 }],
    },
    // 2: dispatch — end, or another element
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: RBRACKET, target: 6 },
            Transition { classes: 0, target: 3 },
        ],
    },
    // 3: element
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "node", n: NParam::Reset, c: Some("flow"), t: None })],
        transitions: &[Transition { classes: 0, target: 4 }],
    },
    // 4: dispatch — comma or end
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: COMMA, target: 5 },
            Transition { classes: 0, target: 6 },
        ],
    },
    // 5: consume comma, loop
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
        ],
        transitions: &[Transition { classes: 0, target: 2 }],
    },
    // 6: close
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::EndSequence),
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
            Action::Success,
        ],
        transitions: &[],
    },
];

/// `{a: 1, b: 2}`.
pub static FLOW_MAPPING: &[StateDef] = &[
    // 0: consume '{'
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
        ],
        transitions: &[Transition { classes: 0, target: 1 }],
    },
    // 1
    StateDef {
        guard: Guard::None,
        actions: &[Action::EmptyToken(TokenCode::BeginMapping)],
        transitions: &[Transition { classes: 0, target: 2 }],
    },
    // 2: dispatch — end, or another pair
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: RBRACE, target: 10 },
            Transition { classes: 0, target: 3 },
        ],
    },
    // 3
    StateDef {
        guard: Guard::None,
        actions: &[Action::EmptyToken(TokenCode::BeginPair)],
        transitions: &[Transition { classes: 0, target: 4 }],
    },
    // 4: key
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "node", n: NParam::Reset, c: Some("flow"), t: None })],
        transitions: &[Transition { classes: 0, target: 5 }],
    },
    // 5: dispatch — value follows, or key-only pair
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: COLON, target: 6 },
            Transition { classes: 0, target: 8 },
        ],
    },
    // 6: consume ':'
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
        ],
        transitions: &[Transition { classes: 0, target: 7 }],
    },
    // 7: value
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "node", n: NParam::Reset, c: Some("flow"), t: None })],
        transitions: &[Transition { classes: 0, target: 8 }],
    },
    // 8: close pair, dispatch — comma or end
    StateDef {
        guard: Guard::None,
        actions: &[Action::EmptyToken(TokenCode::EndPair)],
        transitions: &[
            Transition { classes: COMMA, target: 9 },
            Transition { classes: 0, target: 10 },
        ],
    },
    // 9: consume comma, loop
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
        ],
        transitions: &[Transition { classes: 0, target: 2 }],
    },
    // 10: close
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::EndMapping),
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
            Action::Success,
        ],
        transitions: &[],
    },
];

/// One-or-more `key: value` pairs at the same nesting depth.
pub static BLOCK_MAPPING: &[StateDef] = &[
    // 0
    StateDef {
        guard: Guard::None,
        actions: &[Action::EmptyToken(TokenCode::BeginMapping)],
        transitions: &[Transition { classes: 0, target: 1 }],
    },
    // 1: loop head
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: END_OF_INPUT, target: 12 },
            Transition { classes: 0, target: 2 },
        ],
    },
    // 2: checkpoint before attempting another pair
    StateDef {
        guard: Guard::None,
        actions: &[Action::PushState],
        transitions: &[Transition { classes: 0, target: 3 }],
    },
    // 3: open the tentative key
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginPair),
            Action::EmptyToken(TokenCode::BeginNode),
            Action::EmptyToken(TokenCode::BeginContent),
            Action::EmptyToken(TokenCode::BeginScalar),
        ],
        transitions: &[Transition { classes: 0, target: 4 }],
    },
    // 4: consume the tentative key
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "plain-scalar", n: NParam::Same, c: None, t: None })],
        transitions: &[Transition { classes: 0, target: 5 }],
    },
    // 5: was it really a key?
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: COLON, target: 6 },
            Transition { classes: 0, target: 13 },
        ],
    },
    // 6: yes — close the key node
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::PopState,
            Action::EmptyToken(TokenCode::EndScalar),
            Action::EmptyToken(TokenCode::EndContent),
            Action::EmptyToken(TokenCode::EndNode),
        ],
        transitions: &[Transition { classes: 0, target: 7 }],
    },
    // 7: consume ':'
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
        ],
        transitions: &[Transition { classes: 0, target: 8 }],
    },
    // 8: dispatch — separating blank, or value right away
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: BLANK, target: 9 },
            Transition { classes: 0, target: 10 },
        ],
    },
    // 9: skip the separating blank
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "white", n: NParam::Same, c: None, t: None })],
        transitions: &[Transition { classes: 0, target: 10 }],
    },
    // 10: the value
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "node", n: NParam::Increment, c: Some("block"), t: None })],
        transitions: &[Transition { classes: 0, target: 11 }],
    },
    // 11: close the pair, loop for another
    StateDef {
        guard: Guard::None,
        actions: &[Action::EmptyToken(TokenCode::EndPair)],
        transitions: &[Transition { classes: 0, target: 1 }],
    },
    // 12: close the mapping
    StateDef {
        guard: Guard::None,
        actions: &[Action::EmptyToken(TokenCode::EndMapping), Action::Success],
        transitions: &[],
    },
    // 13: not a pair — roll back this attempt, close the mapping
    StateDef {
        guard: Guard::None,
        actions: &[Action::ResetState],
        transitions: &[Transition { classes: 0, target: 12 }],
    },
];

/// Zero-or-more `- entry` lines at the same nesting depth.
pub static BLOCK_SEQUENCE: &[StateDef] = &[
    StateDef {
        guard: Guard::None,
        actions: &[Action::EmptyToken(TokenCode::BeginSequence)],
        transitions: &[Transition { classes: 0, target: 1 }],
    },
    // 1: loop head
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: DASH, target: 2 },
            Transition { classes: 0, target: 6 },
        ],
    },
    // 2: consume '-'
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
        ],
        transitions: &[Transition { classes: 0, target: 3 }],
    },
    // 3: dispatch — separating blank, or entry right away
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: BLANK, target: 4 },
            Transition { classes: 0, target: 5 },
        ],
    },
    // 4: skip the separating blank
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "white", n: NParam::Same, c: None, t: None })],
        transitions: &[Transition { classes: 0, target: 5 }],
    },
    // 5: the entry
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "node", n: NParam::Increment, c: Some("block"), t: None })],
        transitions: &[Transition { classes: 0, target: 1 }],
    },
    // 6: close
    StateDef {
        guard: Guard::None,
        actions: &[Action::EmptyToken(TokenCode::EndSequence), Action::Success],
        transitions: &[],
    },
];

/// `%directive-name rest-of-line`.
///
/// The directive name is matched against the two directives YAML 1.2
/// defines (`YAML`, `TAG`) by a short literal trie (states 2-13); any other
/// name is a reserved directive, which this production still tokenizes —
/// the grammar lets a future YAML revision define more of them — but flags
/// with a [`Action::FakeError`] recovery token and tokenizes its parameters
/// as [`TokenCode::Unparsed`] rather than [`TokenCode::Text`], per the
/// spec's "reserved directives (skipped with a recovery token)" note.
pub static DIRECTIVE: &[StateDef] = &[
    // 0: begin
    StateDef {
        guard: Guard::None,
        actions: &[Action::EmptyToken(TokenCode::BeginDirective)],
        transitions: &[Transition { classes: 0, target: 1 }],
    },
    // 1: consume '%'
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(TokenCode::Indicator),
            Action::NextChar,
            Action::EndToken(TokenCode::Indicator),
        ],
        transitions: &[Transition { classes: 0, target: 2 }],
    },
    // 2: open directive name; dispatch on its first character
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::Meta)],
        transitions: &[
            Transition { classes: Y_LETTER, target: 3 },
            Transition { classes: T_LETTER, target: 8 },
            Transition { classes: WORD, target: 12 },
            Transition { classes: 0, target: 13 },
        ],
    },
    // 3: consume 'Y', expect 'A'
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[
            Transition { classes: A_LETTER, target: 4 },
            Transition { classes: WORD, target: 12 },
            Transition { classes: 0, target: 13 },
        ],
    },
    // 4: consume 'A', expect 'M'
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[
            Transition { classes: M_LETTER, target: 5 },
            Transition { classes: WORD, target: 12 },
            Transition { classes: 0, target: 13 },
        ],
    },
    // 5: consume 'M', expect 'L'
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[
            Transition { classes: L_LETTER, target: 6 },
            Transition { classes: WORD, target: 12 },
            Transition { classes: 0, target: 13 },
        ],
    },
    // 6: consume 'L'; a further word character means "YAMLx", not "YAML"
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[
            Transition { classes: WORD, target: 12 },
            Transition { classes: 0, target: 7 },
        ],
    },
    // 7: recognized "YAML" exactly
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[Transition { classes: 0, target: 17 }],
    },
    // 8: consume 'T', expect 'A'
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[
            Transition { classes: A_LETTER, target: 9 },
            Transition { classes: WORD, target: 12 },
            Transition { classes: 0, target: 13 },
        ],
    },
    // 9: consume 'A', expect 'G'
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[
            Transition { classes: G_LETTER, target: 10 },
            Transition { classes: WORD, target: 12 },
            Transition { classes: 0, target: 13 },
        ],
    },
    // 10: consume 'G'; a further word character means "TAGx", not "TAG"
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[
            Transition { classes: WORD, target: 12 },
            Transition { classes: 0, target: 11 },
        ],
    },
    // 11: recognized "TAG" exactly
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[Transition { classes: 0, target: 17 }],
    },
    // 12: reserved-name continuation — consume whatever word character
    // broke (or never started) the "YAML"/"TAG" match, then keep consuming
    // the rest of the name.
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[
            Transition { classes: WORD, target: 12 },
            Transition { classes: 0, target: 13 },
        ],
    },
    // 13: close a reserved (unrecognized) directive name and flag it
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EndToken(TokenCode::Meta),
            Action::FakeError("reserved directive"),
        ],
        transitions: &[Transition { classes: 0, target: 14 }],
    },
    // 14: dispatch — reserved-directive parameters follow, or nothing more
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: BREAK | END_OF_INPUT, target: 24 },
            Transition { classes: 0, target: 15 },
        ],
    },
    // 15: open the reserved parameters run as a recovery (`Unparsed`) span
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::Unparsed), Action::NextChar],
        transitions: &[Transition { classes: 0, target: 16 }],
    },
    // 16: dispatch within the reserved parameters run
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: BREAK | END_OF_INPUT, target: 19 },
            Transition { classes: 0, target: 20 },
        ],
    },
    // 17: close a recognized ("YAML"/"TAG") directive name
    StateDef {
        guard: Guard::None,
        actions: &[Action::EndToken(TokenCode::Meta)],
        transitions: &[Transition { classes: 0, target: 18 }],
    },
    // 18: dispatch — recognized-directive parameters follow, or nothing
    // more
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: BREAK | END_OF_INPUT, target: 24 },
            Transition { classes: 0, target: 21 },
        ],
    },
    // 19: close the reserved parameters run
    StateDef {
        guard: Guard::None,
        actions: &[Action::EndToken(TokenCode::Unparsed)],
        transitions: &[Transition { classes: 0, target: 24 }],
    },
    // 20: consume one reserved-parameter character
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[Transition { classes: 0, target: 16 }],
    },
    // 21: open the recognized-directive parameters run
    StateDef {
        guard: Guard::None,
        actions: &[Action::BeginToken(TokenCode::Text), Action::NextChar],
        transitions: &[Transition { classes: 0, target: 22 }],
    },
    // 22: dispatch within the recognized-directive parameters run
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: BREAK | END_OF_INPUT, target: 23 },
            Transition { classes: 0, target: 25 },
        ],
    },
    // 23: close the recognized parameters run
    StateDef {
        guard: Guard::None,
        actions: &[Action::EndToken(TokenCode::Text)],
        transitions: &[Transition { classes: 0, target: 24 }],
    },
    // 24: close the directive
    StateDef {
        guard: Guard::None,
        actions: &[Action::EmptyToken(TokenCode::EndDirective), Action::Success],
        transitions: &[],
    },
    // 25: consume one recognized-parameter character
    StateDef {
        guard: Guard::None,
        actions: &[Action::NextChar],
        transitions: &[Transition { classes: 0, target: 22 }],
    },
];

/// Shared body shape for the two block scalar styles; `body_code` is the
/// only thing that differs between literal (`LineFeed`) and folded
/// (`LineFold`).
macro_rules! block_scalar_table {
    ($body_code:expr) => {
        &[
            // 0: consume '|' or '>'
            StateDef {
                guard: Guard::None,
                actions: &[
                    Action::BeginToken(TokenCode::Indicator),
                    Action::NextChar,
                    Action::EndToken(TokenCode::Indicator),
                ],
                transitions: &[Transition { classes: 0, target: 1 }],
            },
            // 1: open header modifiers run
            StateDef {
                guard: Guard::None,
                actions: &[Action::BeginToken(TokenCode::Meta)],
                transitions: &[Transition { classes: 0, target: 2 }],
            },
            // 2: dispatch within header modifiers
            StateDef {
                guard: Guard::None,
                actions: &[],
                transitions: &[
                    Transition { classes: BREAK | END_OF_INPUT, target: 3 },
                    Transition { classes: 0, target: 12 },
                ],
            },
            // 3: close header modifiers run
            StateDef {
                guard: Guard::None,
                actions: &[Action::EndToken(TokenCode::Meta)],
                transitions: &[Transition { classes: 0, target: 4 }],
            },
            // 4: dispatch — a body follows, or the scalar is empty
            StateDef {
                guard: Guard::None,
                actions: &[],
                transitions: &[
                    Transition { classes: END_OF_INPUT, target: 10 },
                    Transition { classes: 0, target: 5 },
                ],
            },
            // 5: consume the header line's break
            StateDef {
                guard: Guard::None,
                actions: &[Action::Call(CallSpec { name: "break", n: NParam::Same, c: None, t: None })],
                transitions: &[Transition { classes: 0, target: 6 }],
            },
            // 6: body loop head (always reached right after a break)
            StateDef {
                guard: Guard::None,
                actions: &[],
                transitions: &[
                    Transition { classes: DASH | DOT | END_OF_INPUT, target: 10 },
                    Transition { classes: 0, target: 7 },
                ],
            },
            // 7: open a body line's text
            StateDef {
                guard: Guard::None,
                actions: &[Action::BeginToken(TokenCode::Text)],
                transitions: &[Transition { classes: 0, target: 8 }],
            },
            // 8: dispatch within a body line
            StateDef {
                guard: Guard::None,
                actions: &[],
                transitions: &[
                    Transition { classes: BREAK | END_OF_INPUT, target: 9 },
                    Transition { classes: 0, target: 13 },
                ],
            },
            // 9: close the body line's text
            StateDef {
                guard: Guard::None,
                actions: &[Action::EndToken(TokenCode::Text)],
                transitions: &[
                    Transition { classes: END_OF_INPUT, target: 10 },
                    Transition { classes: 0, target: 11 },
                ],
            },
            // 10: done
            StateDef {
                guard: Guard::None,
                actions: &[Action::Success],
                transitions: &[],
            },
            // 11: consume the body line's break, loop
            StateDef {
                guard: Guard::None,
                actions: &[
                    Action::BeginToken($body_code),
                    Action::NextChar,
                    Action::EndToken($body_code),
                ],
                transitions: &[Transition { classes: 0, target: 6 }],
            },
            // 12: consume one header modifier character
            StateDef {
                guard: Guard::None,
                actions: &[Action::NextChar],
                transitions: &[Transition { classes: 0, target: 2 }],
            },
            // 13: consume one body line character
            StateDef {
                guard: Guard::None,
                actions: &[Action::NextChar],
                transitions: &[Transition { classes: 0, target: 8 }],
            },
        ]
    };
}

pub static BLOCK_SCALAR_LITERAL: &[StateDef] = block_scalar_table!(TokenCode::LineFeed);
pub static BLOCK_SCALAR_FOLDED: &[StateDef] = block_scalar_table!(TokenCode::LineFold);

/// Optional directive, optional `---` marker, a document node, optional
/// `...` marker, repeated until end of input, terminated by a `Done`
/// token.
pub static DOCUMENT_STREAM: &[StateDef] = &[
    // 0: BOM detection, then open the stream
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginStream),
            Action::Call(CallSpec { name: "stream", n: NParam::Same, c: None, t: None }),
        ],
        transitions: &[Transition { classes: 0, target: 1 }],
    },
    // 1: document loop head — skip blank lines and comments first
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: END_OF_INPUT, target: 15 },
            Transition { classes: BLANK, target: 2 },
            Transition { classes: POUND, target: 3 },
            Transition { classes: BREAK, target: 4 },
            Transition { classes: 0, target: 5 },
        ],
    },
    // 2: skip blanks
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "white", n: NParam::Same, c: None, t: None })],
        transitions: &[Transition { classes: 0, target: 1 }],
    },
    // 3: skip a comment
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "comment", n: NParam::Same, c: None, t: None })],
        transitions: &[Transition { classes: 0, target: 1 }],
    },
    // 4: skip a blank line
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "break", n: NParam::Same, c: None, t: None })],
        transitions: &[Transition { classes: 0, target: 1 }],
    },
    // 5: dispatch — an optional directive line
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: PERCENT, target: 6 },
            Transition { classes: 0, target: 8 },
        ],
    },
    // 6: the directive
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "directive", n: NParam::Same, c: None, t: None })],
        transitions: &[Transition { classes: 0, target: 7 }],
    },
    // 7: consume the directive's trailing line break, if any
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: BREAK, target: 16 },
            Transition { classes: 0, target: 8 },
        ],
    },
    // 8: dispatch — an optional '---' marker
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: DASH, target: 9 },
            Transition { classes: 0, target: 11 },
        ],
    },
    // 9: the '---' marker
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "document-marker", n: NParam::Same, c: None, t: None })],
        transitions: &[Transition { classes: 0, target: 10 }],
    },
    // 10: consume the marker's trailing line break, if any
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: BREAK, target: 17 },
            Transition { classes: 0, target: 11 },
        ],
    },
    // 11: the document's node
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::BeginDocument),
            Action::Call(CallSpec { name: "node", n: NParam::Literal(0), c: Some("block"), t: None }),
        ],
        transitions: &[Transition { classes: 0, target: 12 }],
    },
    // 12: dispatch — an optional '...' marker
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition { classes: DOT, target: 13 },
            Transition { classes: 0, target: 14 },
        ],
    },
    // 13: the '...' marker
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "document-marker", n: NParam::Same, c: None, t: None })],
        transitions: &[Transition { classes: 0, target: 14 }],
    },
    // 14: close the document, loop for the next one
    StateDef {
        guard: Guard::None,
        actions: &[Action::EmptyToken(TokenCode::EndDocument)],
        transitions: &[Transition { classes: 0, target: 1 }],
    },
    // 15: close the stream
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::EmptyToken(TokenCode::EndStream),
            Action::EmptyToken(TokenCode::Done),
            Action::Success,
        ],
        transitions: &[],
    },
    // 16: consume the directive's line break
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "break", n: NParam::Same, c: None, t: None })],
        transitions: &[Transition { classes: 0, target: 8 }],
    },
    // 17: consume the '---' marker's line break
    StateDef {
        guard: Guard::None,
        actions: &[Action::Call(CallSpec { name: "break", n: NParam::Same, c: None, t: None })],
        transitions: &[Transition { classes: 0, target: 11 }],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Encoding;
    use crate::productions::build_registry;
    use crate::registry::Production;
    use crate::testutil::run_production_with_registry;

    fn text_runs(tokens: &[crate::token::Token], bytes: &[u8]) -> Vec<String> {
        tokens
            .iter()
            .filter(|t| t.code == TokenCode::Text)
            .map(|t| String::from_utf8(t.bytes(bytes, 0).to_vec()).unwrap())
            .collect()
    }

    #[test]
    fn flow_sequence_of_plain_scalars() {
        let registry = build_registry();
        let bytes = b"[a, b, c]";
        let tokens = run_production_with_registry(
            bytes,
            Encoding::Utf8,
            Production::simple("flow-sequence"),
            &registry,
        );
        assert!(tokens.iter().any(|t| t.code == TokenCode::BeginSequence));
        assert!(tokens.iter().any(|t| t.code == TokenCode::EndSequence));
        assert_eq!(text_runs(&tokens, bytes), vec!["a", "b", "c"]);
    }

    #[test]
    fn flow_mapping_of_pairs() {
        let registry = build_registry();
        let bytes = b"{a: 1, b: 2}";
        let tokens = run_production_with_registry(
            bytes,
            Encoding::Utf8,
            Production::simple("flow-mapping"),
            &registry,
        );
        assert_eq!(
            tokens.iter().filter(|t| t.code == TokenCode::BeginPair).count(),
            2
        );
        assert_eq!(text_runs(&tokens, bytes), vec!["a", "1", "b", "2"]);
    }

    #[test]
    fn block_mapping_of_two_pairs() {
        let registry = build_registry();
        let bytes = b"a: 1\nb: 2\n";
        let tokens = run_production_with_registry(
            bytes,
            Encoding::Utf8,
            Production::contextual("node", "block"),
            &registry,
        );
        assert!(tokens.iter().any(|t| t.code == TokenCode::BeginMapping));
        assert_eq!(text_runs(&tokens, bytes), vec!["a", "1", "b", "2"]);
    }

    #[test]
    fn block_sequence_of_scalars() {
        let registry = build_registry();
        let bytes = b"- a\n- b\n";
        let tokens = run_production_with_registry(
            bytes,
            Encoding::Utf8,
            Production::contextual("node", "block"),
            &registry,
        );
        assert!(tokens.iter().any(|t| t.code == TokenCode::BeginSequence));
        assert_eq!(text_runs(&tokens, bytes), vec!["a", "b"]);
    }

    #[test]
    fn bare_scalar_is_not_mistaken_for_a_mapping() {
        let registry = build_registry();
        let bytes = b"hello";
        let tokens = run_production_with_registry(
            bytes,
            Encoding::Utf8,
            Production::contextual("node", "block"),
            &registry,
        );
        assert!(!tokens.iter().any(|t| t.code == TokenCode::BeginMapping));
        assert_eq!(text_runs(&tokens, bytes), vec!["hello"]);
    }

    #[test]
    fn literal_block_scalar_keeps_line_breaks() {
        let registry = build_registry();
        let bytes = b"|\n  one\n  two\n";
        let tokens = run_production_with_registry(
            bytes,
            Encoding::Utf8,
            Production::simple("block-scalar-literal"),
            &registry,
        );
        assert!(tokens.iter().any(|t| t.code == TokenCode::LineFeed));
        assert_eq!(text_runs(&tokens, bytes), vec!["  one", "  two"]);
    }

    #[test]
    fn alias_is_a_complete_node() {
        let registry = build_registry();
        let bytes = b"*a";
        let tokens = run_production_with_registry(
            bytes,
            Encoding::Utf8,
            Production::simple("alias"),
            &registry,
        );
        assert_eq!(tokens[0].code, TokenCode::BeginNode);
        assert!(tokens.iter().any(|t| t.code == TokenCode::Indicator));
        assert_eq!(tokens.last().unwrap().code, TokenCode::EndNode);
    }

    #[test]
    fn verbatim_tag_captures_the_uri_between_angle_brackets() {
        use crate::testutil::run_production;

        let bytes = b"!<tag:example.com,2000:app/foo> ";
        let tokens = run_production(bytes, Encoding::Utf8, "tag", &[("tag", TAG)]);
        assert!(tokens.iter().any(|t| t.code == TokenCode::Meta));
        let meta = tokens.iter().find(|t| t.code == TokenCode::Meta).unwrap();
        assert_eq!(meta.bytes(bytes, 0), b"tag:example.com,2000:app/foo");
        assert_eq!(
            tokens.iter().filter(|t| t.code == TokenCode::Indicator).count(),
            3,
            "'!', '<', and '>' are each one Indicator token"
        );
    }

    #[test]
    fn yaml_directive_name_is_recognized_without_an_error_token() {
        use crate::testutil::run_production;

        let bytes = b"%YAML 1.2\n";
        let tokens = run_production(bytes, Encoding::Utf8, "directive", &[("directive", DIRECTIVE)]);
        assert!(!tokens.iter().any(|t| t.code == TokenCode::Error));
        let meta = tokens.iter().find(|t| t.code == TokenCode::Meta).unwrap();
        assert_eq!(meta.bytes(bytes, 0), b"YAML");
        // The separating blank before the parameters is bundled into the
        // start of the `Text` run, same as the reserved-directive path.
        assert_eq!(text_runs(&tokens, bytes), vec![" 1.2"]);
    }

    #[test]
    fn tag_directive_name_is_recognized_without_an_error_token() {
        use crate::testutil::run_production;

        let bytes = b"%TAG !e! tag:example.com,2000:app/\n";
        let tokens = run_production(bytes, Encoding::Utf8, "directive", &[("directive", DIRECTIVE)]);
        assert!(!tokens.iter().any(|t| t.code == TokenCode::Error));
        let meta = tokens.iter().find(|t| t.code == TokenCode::Meta).unwrap();
        assert_eq!(meta.bytes(bytes, 0), b"TAG");
    }

    #[test]
    fn reserved_directive_is_flagged_and_skipped_as_unparsed() {
        use crate::testutil::run_production;

        let bytes = b"%FOO bar baz\n";
        let tokens = run_production(bytes, Encoding::Utf8, "directive", &[("directive", DIRECTIVE)]);
        assert!(tokens.iter().any(|t| t.code == TokenCode::Error));
        let meta = tokens.iter().find(|t| t.code == TokenCode::Meta).unwrap();
        assert_eq!(meta.bytes(bytes, 0), b"FOO");
        assert!(tokens.iter().any(|t| t.code == TokenCode::Unparsed));
        assert!(!tokens.iter().any(|t| t.code == TokenCode::Text));
        assert_eq!(tokens.last().unwrap().code, TokenCode::EndDirective);
    }

    #[test]
    fn a_name_that_merely_starts_with_yaml_is_still_reserved() {
        use crate::testutil::run_production;

        let bytes = b"%YAMLISH x\n";
        let tokens = run_production(bytes, Encoding::Utf8, "directive", &[("directive", DIRECTIVE)]);
        assert!(tokens.iter().any(|t| t.code == TokenCode::Error));
        let meta = tokens.iter().find(|t| t.code == TokenCode::Meta).unwrap();
        assert_eq!(meta.bytes(bytes, 0), b"YAMLISH");
    }

    #[test]
    fn verbatim_tag_missing_closing_angle_bracket_is_flagged_and_still_succeeds() {
        use crate::testutil::run_production;

        let bytes = b"!<tag:example.com,2000:app/foo";
        let tokens = run_production(bytes, Encoding::Utf8, "tag", &[("tag", TAG)]);
        assert!(tokens.iter().any(|t| t.code == TokenCode::Error));
        let meta = tokens.iter().find(|t| t.code == TokenCode::Meta).unwrap();
        assert_eq!(meta.bytes(bytes, 0), b"tag:example.com,2000:app/foo");
    }

    #[test]
    fn document_stream_emits_done_at_eof() {
        let registry = build_registry();
        let bytes = b"a: 1\n";
        let tokens = run_production_with_registry(
            bytes,
            Encoding::Utf8,
            Production::simple("document-stream"),
            &registry,
        );
        assert_eq!(tokens.last().unwrap().code, TokenCode::Done);
        assert!(tokens.iter().any(|t| t.code == TokenCode::BeginDocument));
    }
}
