//! The frame stack (component F): backtracking snapshots of the character
//! engine plus the depths of the token and code stacks at the moment of
//! the snapshot.
//!
//! A push/checkpoint pair is modeled, per the Design Note in §9, as two
//! adjacent entries in one `Vec<Frame>`: `frames[len - 2]` is the
//! checkpoint and `frames[len - 1]` is the live frame, so `top[-1]` is a
//! plain index computation rather than a second stack.

use crate::char_engine::Character;
use crate::ParserError;

/// A backtracking snapshot: character engine position plus stack depths.
///
/// `tokens_depth`/`codes_depth` are `-1` on the live (not-yet-saved) frame
/// at the top of the stack, matching the spec's sentinel.
#[derive(Copy, Clone, Debug)]
pub struct Frame {
    /// The character immediately preceding `curr_char` at snapshot time.
    pub prev_char: Character,
    /// The lookahead character at snapshot time.
    pub curr_char: Character,
    /// Token stack depth at snapshot time, or `-1` for the live frame.
    pub tokens_depth: i64,
    /// Code stack depth at snapshot time, or `-1` for the live frame.
    pub codes_depth: i64,
}

impl Frame {
    fn live(prev_char: Character, curr_char: Character) -> Self {
        Frame {
            prev_char,
            curr_char,
            tokens_depth: -1,
            codes_depth: -1,
        }
    }
}

/// The two named choice points machines can commit to, per §4.F.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Choice {
    /// Whether an escape sequence is being attempted.
    Escape,
    /// Whether the character following an escape indicator is itself
    /// being matched.
    Escaped,
}

/// The frame stack plus the small stack of currently open choice scopes.
pub struct FrameStack {
    frames: Vec<Frame>,
    choices: Vec<Choice>,
}

impl FrameStack {
    /// Start with a single live frame at the given initial character
    /// position and no open checkpoints.
    pub fn new(prev_char: Character, curr_char: Character) -> Self {
        FrameStack {
            frames: vec![Frame::live(prev_char, curr_char)],
            choices: Vec::new(),
        }
    }

    /// The live (topmost) frame.
    pub fn live(&self) -> &Frame {
        self.frames.last().expect("frame stack is never empty")
    }

    fn live_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("frame stack is never empty")
    }

    /// Update the live frame's character position (called by the
    /// character engine after each advance).
    pub fn sync(&mut self, prev_char: Character, curr_char: Character) {
        let live = self.live_mut();
        live.prev_char = prev_char;
        live.curr_char = curr_char;
    }

    /// Duplicate the top frame, capturing the current token/code stack
    /// depths into the checkpoint left behind.
    pub fn push_state(&mut self, tokens_depth: usize, codes_depth: usize) {
        let live = *self.live();
        let mut checkpoint = live;
        checkpoint.tokens_depth = tokens_depth as i64;
        checkpoint.codes_depth = codes_depth as i64;
        *self.live_mut() = checkpoint;
        self.frames
            .push(Frame::live(checkpoint.prev_char, checkpoint.curr_char));
    }

    /// Replace the checkpoint with a snapshot of the live frame, committing
    /// progress without leaving the current scope.
    pub fn set_state(&mut self, tokens_depth: usize, codes_depth: usize) -> Result<(), ParserError> {
        let checkpoint_index = self.checkpoint_index()?;
        let live = *self.live();
        let mut checkpoint = live;
        checkpoint.tokens_depth = tokens_depth as i64;
        checkpoint.codes_depth = codes_depth as i64;
        self.frames[checkpoint_index] = checkpoint;
        Ok(())
    }

    /// Discard the checkpoint, keeping all progress made since
    /// `push_state`.
    pub fn pop_state(&mut self) -> Result<(), ParserError> {
        self.checkpoint_index()?;
        let live = self.frames.pop().expect("checked non-empty above");
        *self.live_mut() = Frame::live(live.prev_char, live.curr_char);
        Ok(())
    }

    /// Discard live progress: restore the character position to the
    /// checkpoint's and report the token/code stack depths to truncate
    /// back to.
    pub fn reset_state(&mut self) -> Result<(usize, usize, Character, Character), ParserError> {
        let checkpoint_index = self.checkpoint_index()?;
        let checkpoint = self.frames[checkpoint_index];
        self.frames.pop();
        *self.live_mut() = Frame::live(checkpoint.prev_char, checkpoint.curr_char);
        Ok((
            checkpoint.tokens_depth as usize,
            checkpoint.codes_depth as usize,
            checkpoint.prev_char,
            checkpoint.curr_char,
        ))
    }

    /// True iff the live character position equals the checkpoint's —
    /// used by machines to detect an unproductive repetition.
    pub fn is_same_state(&self) -> Result<bool, ParserError> {
        let checkpoint_index = self.checkpoint_index()?;
        Ok(self.frames[checkpoint_index].curr_char.byte_offset == self.live().curr_char.byte_offset)
    }

    /// How many checkpoints are currently open (nesting depth).
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    fn checkpoint_index(&self) -> Result<usize, ParserError> {
        if self.frames.len() < 2 {
            return Err(ParserError::Invariant(
                "frame operation requires an open push_state scope",
            ));
        }
        Ok(self.frames.len() - 2)
    }

    /// Enter a named choice scope.
    pub fn begin_choice(&mut self, choice: Choice) {
        self.choices.push(choice);
    }

    /// Leave the innermost open choice scope.
    pub fn end_choice(&mut self) {
        self.choices.pop();
    }

    /// Whether `choice` is the innermost open choice scope. `commit`
    /// actions use this to decide whether to emit the `ERROR` fake token
    /// described in §4.F ("`commit(choice)` emits an ERROR fake token if
    /// executed outside the matching scope").
    pub fn in_choice_scope(&self, choice: Choice) -> bool {
        self.choices.last() == Some(&choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::char_engine::Character;

    fn char_at(byte_offset: u64) -> Character {
        Character {
            byte_offset,
            ..Character::default()
        }
    }

    #[test]
    fn push_then_pop_keeps_progress() {
        let mut stack = FrameStack::new(char_at(0), char_at(0));
        stack.push_state(0, 0);
        stack.sync(char_at(0), char_at(5));
        stack.pop_state().unwrap();
        assert_eq!(stack.live().curr_char.byte_offset, 5);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn push_then_reset_restores_position() {
        let mut stack = FrameStack::new(char_at(0), char_at(0));
        stack.push_state(3, 1);
        stack.sync(char_at(0), char_at(5));
        let (tokens_depth, codes_depth, _, curr) = stack.reset_state().unwrap();
        assert_eq!(curr.byte_offset, 0);
        assert_eq!(tokens_depth, 3);
        assert_eq!(codes_depth, 1);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn is_same_state_detects_no_progress() {
        let mut stack = FrameStack::new(char_at(0), char_at(0));
        stack.push_state(0, 0);
        assert!(stack.is_same_state().unwrap());
        stack.sync(char_at(0), char_at(1));
        assert!(!stack.is_same_state().unwrap());
    }

    #[test]
    fn operations_without_a_checkpoint_fail() {
        let stack = FrameStack::new(char_at(0), char_at(0));
        assert!(stack.is_same_state().is_err());
    }

    #[test]
    fn commit_outside_scope_is_detectable() {
        let mut stack = FrameStack::new(char_at(0), char_at(0));
        assert!(!stack.in_choice_scope(Choice::Escape));
        stack.begin_choice(Choice::Escape);
        assert!(stack.in_choice_scope(Choice::Escape));
        assert!(!stack.in_choice_scope(Choice::Escaped));
        stack.end_choice();
        assert!(!stack.in_choice_scope(Choice::Escape));
    }

    #[test]
    fn nested_push_tracks_depth() {
        let mut stack = FrameStack::new(char_at(0), char_at(0));
        stack.push_state(0, 0);
        stack.push_state(1, 1);
        assert_eq!(stack.depth(), 2);
        stack.pop_state().unwrap();
        assert_eq!(stack.depth(), 1);
        stack.pop_state().unwrap();
        assert_eq!(stack.depth(), 0);
    }
}
