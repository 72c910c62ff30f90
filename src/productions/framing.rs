//! Stream framing: the byte-order mark and the stream-end `DONE` token.

use crate::classify::BOM;
use crate::machine::{Action, Guard, StateDef, Transition};

/// `stream ::= bom? ...`
///
/// State 0 looks at the lookahead character: if it carries the `BOM`
/// class, open a `Bom` `MATCH` span, consume it, and close it with the
/// BOM-name rewrite (state 1). Otherwise fall straight through to state 2,
/// which just succeeds — framing leaves the rest of the stream for
/// whichever production Token Delivery dispatches to next.
pub static STREAM: &[StateDef] = &[
    StateDef {
        guard: Guard::None,
        actions: &[],
        transitions: &[
            Transition {
                classes: BOM,
                target: 1,
            },
            Transition {
                classes: 0,
                target: 2,
            },
        ],
    },
    StateDef {
        guard: Guard::None,
        actions: &[
            Action::BeginToken(crate::token::TokenCode::Bom),
            Action::NextChar,
            Action::EndTokenBom,
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
