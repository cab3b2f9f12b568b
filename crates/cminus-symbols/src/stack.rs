//! The scope stack
//!
//! Mirrors the traversal's current lexical nesting. The analyzer runs
//! two separate passes over the same tree, so the nesting cannot live in
//! call-stack recursion alone; the stack persists in the analysis
//! context and is pushed/popped in lockstep with scope entry and exit.

use cminus_ast::ScopeId;
use crate::ScopeStackError;

/// Maximum lexical nesting depth. A deliberate, documented limit;
/// exceeding it is a fatal internal error, not a user diagnostic.
pub const MAX_SCOPE_DEPTH: usize = 64;

/// One stack frame: the scope plus its next free storage slot.
///
/// The location counter is scope-local and only ever advances; the
/// checker pass re-enters scopes without inserting, so it never touches
/// the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeFrame {
    pub scope: ScopeId,
    pub next_location: u32,
}

/// Bounded stack of [`ScopeFrame`]s
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scope: ScopeId, next_location: u32) -> Result<(), ScopeStackError> {
        if self.frames.len() >= MAX_SCOPE_DEPTH {
            return Err(ScopeStackError::Overflow {
                max_depth: MAX_SCOPE_DEPTH,
            });
        }
        self.frames.push(ScopeFrame {
            scope,
            next_location,
        });
        Ok(())
    }

    pub fn pop(&mut self) -> Result<ScopeFrame, ScopeStackError> {
        self.frames.pop().ok_or(ScopeStackError::Underflow)
    }

    /// The current frame, if any
    pub fn top(&self) -> Option<&ScopeFrame> {
        self.frames.last()
    }

    /// The current frame for mutation; the caller advances
    /// `next_location` when a declaration consumes a slot
    pub fn top_mut(&mut self) -> Option<&mut ScopeFrame> {
        self.frames.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
