//! The machine runtime (component G): the generic driver that steps a
//! production's state table forward, one [`Action`] at a time, yielding
//! control back to Token Delivery whenever a token becomes ready, the
//! production fails, or it terminates.
//!
//! States are intentionally atomic (at most one yielding action each), so
//! that a saved `(state, action_cursor)` pair is always enough to resume —
//! there is no hidden machine-local stack beyond what [`crate::FrameStack`]
//! already provides. Recursive grammar productions (a mapping's value is a
//! node, a node may itself be a mapping) are handled by [`Action::Call`]:
//! the runtime keeps a small call stack of `(table, production, state)`
//! triples and inlines the callee's steps into the same `step` loop, so a
//! production never needs to know whether it is running at top level or
//! nested inside another.

use crate::char_engine::CharEngine;
use crate::emitter::{Emission, TokenEmitter};
use crate::frame::{Choice, FrameStack};
use crate::registry::{Production, Registry};
use crate::source::Source;
use crate::token::TokenCode;
use crate::ParserError;

/// A guard evaluated before a state's actions run. If the guard fails the
/// state is a dead end for the *active* production: the runtime unwinds
/// one call frame and resumes the caller if there is one, or reports
/// [`StepOutcome::Unexpected`] at the top level. Either way the character
/// engine and emitter are left untouched by the failing state itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Guard {
    /// Always passes.
    None,
    /// `curr_char` is marked as starting a new line.
    StartOfLine,
    /// The production's indentation counter is less than its `n`
    /// parameter.
    CounterLessThanN,
    /// The production's indentation counter is less than or equal to its
    /// `n` parameter.
    CounterLessEqualN,
    /// The production's indentation counter is greater than or equal to
    /// its `n` parameter — used by block scalar bodies to decide whether
    /// another line is indented enough to still belong to them.
    CounterAtLeastN,
}

/// How a nested production's indentation parameter `n` is derived from the
/// calling production's, per [`Action::Call`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NParam {
    /// Inherit the caller's `n` unchanged.
    Same,
    /// The caller's `n`, plus one (entering a more-indented nested block).
    Increment,
    /// Reset to zero (entering a flow context, where indentation stops
    /// mattering).
    Reset,
    /// A literal value.
    Literal(i64),
}

/// Which production to invoke, and how to derive its parameters from the
/// calling production's — the data carried by [`Action::Call`].
#[derive(Copy, Clone, Debug)]
pub struct CallSpec {
    /// Name of the production to invoke.
    pub name: &'static str,
    /// How to derive the callee's `n` from the caller's.
    pub n: NParam,
    /// Context parameter for the callee, if it is context-parameterized.
    pub c: Option<&'static str>,
    /// Chomping parameter for the callee, if it is chomping-parameterized.
    pub t: Option<&'static str>,
}

/// One action a state performs on entry.
#[derive(Copy, Clone, Debug)]
pub enum Action {
    /// No-op; used for states whose only job is to dispatch transitions.
    Nop,
    /// Open a new `MATCH`-code content span (`begin_token`). `code` must
    /// be a `Match` code or [`TokenCode::Bom`].
    BeginToken(TokenCode),
    /// Close the innermost `MATCH`-code content span (`end_token`).
    EndToken(TokenCode),
    /// Close the innermost content span with the BOM body rewrite.
    EndTokenBom,
    /// Emit a zero-length token: a `BEGIN`/`END` region marker, a
    /// structural indicator, or [`TokenCode::Done`].
    EmptyToken(TokenCode),
    /// Emit a synthetic `ERROR` token carrying a static message, then keep
    /// going — an in-band recovery marker, not a dead end. Unlike
    /// [`Action::Failure`], this does not touch the call stack; pair it
    /// with a recovery-coded span (see `Unparsed` uses in
    /// `productions::collections::DIRECTIVE`) so the rest of the line is
    /// still accounted for instead of silently dropped.
    FakeError(&'static str),
    /// Advance the character engine by one character.
    NextChar,
    /// Retract the character engine by one character.
    PrevChar,
    /// Mark the next character as starting a new line.
    NextLine,
    /// Reset the production's indentation counter to zero.
    ResetCounter,
    /// Increment the production's indentation counter by one.
    IncrementCounter,
    /// Set the production's indentation counter to the lookahead
    /// character's column (`line_char`).
    SetCounterToColumn,
    /// Open a named choice scope.
    BeginChoice(Choice),
    /// Leave the innermost choice scope without committing.
    EndChoice,
    /// Commit to `choice`; if it is not the innermost open scope, emit an
    /// `ERROR` fake token first.
    Commit(Choice),
    /// Push a backtracking checkpoint.
    PushState,
    /// Replace the checkpoint with the live position, keeping the scope
    /// open.
    SetState,
    /// Discard the checkpoint, keeping progress.
    PopState,
    /// Discard progress, restoring the checkpoint.
    ResetState,
    /// Fail immediately if the indentation counter is not positive.
    NonPositiveNError,
    /// Invoke another production's table, inlined into this `step` call;
    /// resumes the caller's next action once the callee reaches
    /// [`Action::Success`].
    Call(CallSpec),
    /// The production failed to match; backtrack or recover.
    Failure,
    /// The production matched completely.
    Success,
}

/// A single outgoing edge: fire when `curr_char.mask & classes != 0`. A
/// `classes == 0` entry is the unconditional default and must be last.
#[derive(Copy, Clone, Debug)]
pub struct Transition {
    /// Class bitmask tested against the lookahead character.
    pub classes: u64,
    /// State to enter if this transition fires.
    pub target: i32,
}

/// One row of a production's state table.
#[derive(Copy, Clone, Debug)]
pub struct StateDef {
    /// Guard evaluated before `actions` run.
    pub guard: Guard,
    /// Actions executed in order on entering this state.
    pub actions: &'static [Action],
    /// Outgoing edges, tested in order once `actions` complete. Ignored
    /// for states whose last action is [`Action::Success`] or
    /// [`Action::Failure`].
    pub transitions: &'static [Transition],
}

/// A production's compiled state table: `states[0]` is always the entry
/// state.
pub type StateTable = &'static [StateDef];

/// What happened after driving a production until it either yields a
/// token, terminates, or gets stuck.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A token was produced; the caller should drain it before resuming.
    Token,
    /// The top-level production matched completely (its call stack, if
    /// any, has already been unwound).
    Done,
    /// The top-level production hit a dead end — a failed guard, an
    /// unmatched action, or no outgoing transition — with nothing left on
    /// its call stack to resume. Token Delivery treats this as an in-band
    /// recoverable condition (see `api::next_token`), not a fatal error.
    Unexpected,
}

/// Resumable position within a production: which state, and how far into
/// that state's action list.
#[derive(Copy, Clone, Debug, Default)]
pub struct MachineState {
    pub(crate) state: i32,
    pub(crate) action_cursor: usize,
    pub(crate) counter: i64,
}

impl MachineState {
    /// Start at the entry state of a production.
    pub fn start() -> Self {
        MachineState {
            state: 0,
            action_cursor: 0,
            counter: 0,
        }
    }
}

struct CallFrame {
    table: StateTable,
    production: Production,
    state: MachineState,
}

/// Everything a running production needs: the byte source, character
/// engine, token emitter, and frame stack, plus the active production's
/// table/state and a call stack of its callers.
pub struct Parser<'p> {
    pub(crate) source: Source,
    pub(crate) chars: CharEngine,
    pub(crate) emitter: TokenEmitter,
    pub(crate) frames: FrameStack,
    pub(crate) registry: &'p Registry,
    active_table: StateTable,
    active_production: Production,
    active_state: MachineState,
    call_stack: Vec<CallFrame>,
}

impl<'p> Parser<'p> {
    /// Start a parser running `production` from its entry state.
    pub fn start(
        source: Source,
        chars: CharEngine,
        emitter: TokenEmitter,
        frames: FrameStack,
        registry: &'p Registry,
        production: Production,
    ) -> Result<Self, ParserError> {
        let table = registry
            .lookup(&production)
            .ok_or(ParserError::UnknownProduction {
                name: production.name,
                n: production.n,
                c: production.c,
                t: production.t,
            })?;
        Ok(Parser {
            source,
            chars,
            emitter,
            frames,
            registry,
            active_table: table,
            active_production: production,
            active_state: MachineState::start(),
            call_stack: Vec::new(),
        })
    }

    fn guard_holds(&self, guard: Guard) -> bool {
        match guard {
            Guard::None => true,
            Guard::StartOfLine => self.chars.curr().mask & crate::classify::START_OF_LINE != 0,
            Guard::CounterLessThanN => self
                .active_production
                .n
                .is_some_and(|n| self.active_state.counter < n),
            Guard::CounterLessEqualN => self
                .active_production
                .n
                .is_some_and(|n| self.active_state.counter <= n),
            Guard::CounterAtLeastN => self
                .active_production
                .n
                .is_some_and(|n| self.active_state.counter >= n),
        }
    }

    /// Drive the active production's table forward until a token is
    /// ready, the top-level production terminates, or it gets stuck. This
    /// is "running the machine once" from the caller's point of view:
    /// internally it may pass through many non-yielding states and
    /// descend into/return from any number of nested productions via
    /// [`Action::Call`].
    pub fn step(&mut self) -> Result<StepOutcome, ParserError> {
        'outer: loop {
            let def = *self
                .active_table
                .get(self.active_state.state as usize)
                .ok_or(ParserError::Invariant("machine state index out of range"))?;

            if self.active_state.action_cursor == 0 && !self.guard_holds(def.guard) {
                if self.unwind_call_stack() {
                    continue 'outer;
                }
                return Ok(StepOutcome::Unexpected);
            }

            while self.active_state.action_cursor < def.actions.len() {
                let action = def.actions[self.active_state.action_cursor];
                self.active_state.action_cursor += 1;
                match self.apply(action)? {
                    ActionResult::Continue => {}
                    ActionResult::Token => return Ok(StepOutcome::Token),
                    ActionResult::Done => {
                        if let Some(frame) = self.call_stack.pop() {
                            self.active_table = frame.table;
                            self.active_production = frame.production;
                            self.active_state = frame.state;
                            // Resume the caller exactly where it left off;
                            // its guard already held when it was entered.
                            continue 'outer;
                        }
                        return Ok(StepOutcome::Done);
                    }
                    ActionResult::Unexpected => {
                        if self.unwind_call_stack() {
                            continue 'outer;
                        }
                        return Ok(StepOutcome::Unexpected);
                    }
                }
            }

            let mask = self.chars.curr().mask;
            let mut next = None;
            for transition in def.transitions {
                if transition.classes == 0 || mask & transition.classes != 0 {
                    next = Some(transition.target);
                    break;
                }
            }
            match next {
                Some(target) => {
                    self.active_state.state = target;
                    self.active_state.action_cursor = 0;
                }
                None => {
                    if self.unwind_call_stack() {
                        continue 'outer;
                    }
                    return Ok(StepOutcome::Unexpected);
                }
            }
        }
    }

    /// Pop one call frame and resume the caller exactly where it left off,
    /// symmetric to how [`ActionResult::Done`] already unwinds on success.
    /// Returns `false` (leaving `self` untouched) at the top of the call
    /// stack, where the caller has nowhere left to resume and must report
    /// [`StepOutcome::Unexpected`] itself.
    fn unwind_call_stack(&mut self) -> bool {
        let Some(frame) = self.call_stack.pop() else {
            return false;
        };
        self.active_table = frame.table;
        self.active_production = frame.production;
        self.active_state = frame.state;
        true
    }

    fn resolve_call(&self, spec: &CallSpec) -> Result<Production, ParserError> {
        let n = match spec.n {
            NParam::Same => self.active_production.n,
            NParam::Increment => self.active_production.n.map(|n| n + 1),
            NParam::Reset => Some(0),
            NParam::Literal(v) => Some(v),
        };
        Ok(Production {
            name: spec.name,
            n,
            c: spec.c,
            t: spec.t,
        })
    }

    fn apply(&mut self, action: Action) -> Result<ActionResult, ParserError> {
        use Action::*;
        let pos = *self.chars.curr();
        match action {
            Nop => {}
            BeginToken(code) => {
                if self.emitter.begin_token(code, &pos) == Emission::Token {
                    return Ok(ActionResult::Token);
                }
            }
            EndToken(code) => {
                if self.emitter.end_token(code, &pos, None) == Emission::Token {
                    return Ok(ActionResult::Token);
                }
            }
            EndTokenBom => {
                let name = crate::decode::encoding_name(self.chars.encoding);
                if self.emitter.end_token(TokenCode::Bom, &pos, Some(name)) == Emission::Token {
                    return Ok(ActionResult::Token);
                }
            }
            EmptyToken(code) => {
                if self.emitter.empty_token(code, &pos) == Emission::Token {
                    return Ok(ActionResult::Token);
                }
            }
            FakeError(message) => {
                self.emitter.fake_token(TokenCode::Error, message, &pos);
                return Ok(ActionResult::Token);
            }
            NextChar => {
                self.chars.next_char(&mut self.source)?;
                self.emitter.grow_current(self.chars.prev().end);
            }
            PrevChar => {
                self.chars.prev_char();
                // The retracted character had already been grown into the
                // current token by its `NextChar`; un-grow it so a
                // peek-then-back-off (e.g. a colon that turns out to be a
                // mapping separator) excludes it again.
                self.emitter.grow_current(self.chars.curr().begin);
            }
            NextLine => self.chars.next_line(),
            ResetCounter => self.active_state.counter = 0,
            IncrementCounter => self.active_state.counter += 1,
            SetCounterToColumn => self.active_state.counter = self.chars.curr().line_char as i64,
            BeginChoice(choice) => self.frames.begin_choice(choice),
            EndChoice => self.frames.end_choice(),
            Commit(choice) => {
                if !self.frames.in_choice_scope(choice) {
                    self.emitter.fake_token(
                        TokenCode::Error,
                        "commit outside matching choice scope",
                        &pos,
                    );
                }
            }
            PushState => self
                .frames
                .push_state(self.emitter.tokens_depth(), self.emitter.codes_depth()),
            SetState => self
                .frames
                .set_state(self.emitter.tokens_depth(), self.emitter.codes_depth())?,
            PopState => self.frames.pop_state()?,
            ResetState => {
                let (tokens_depth, codes_depth, prev, curr) = self.frames.reset_state()?;
                self.emitter.truncate_tokens(tokens_depth);
                self.emitter.truncate_codes(codes_depth);
                self.chars.restore(prev, curr);
            }
            NonPositiveNError => {
                if self.active_state.counter <= 0 {
                    return Ok(ActionResult::Unexpected);
                }
            }
            Call(spec) => {
                let production = self.resolve_call(&spec)?;
                let table = self.registry.lookup(&production).ok_or(
                    ParserError::UnknownProduction {
                        name: production.name,
                        n: production.n,
                        c: production.c,
                        t: production.t,
                    },
                )?;
                self.call_stack.push(CallFrame {
                    table: self.active_table,
                    production: self.active_production,
                    state: self.active_state,
                });
                self.active_table = table;
                self.active_production = production;
                self.active_state = MachineState::start();
            }
            Failure => return Ok(ActionResult::Unexpected),
            Success => return Ok(ActionResult::Done),
        }
        self.frames.sync(*self.chars.prev(), *self.chars.curr());
        Ok(ActionResult::Continue)
    }
}

enum ActionResult {
    Continue,
    Token,
    Done,
    Unexpected,
}
