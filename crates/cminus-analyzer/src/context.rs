//! Shared analysis state
//!
//! Both passes thread one [`AnalysisContext`] by mutable reference
//! instead of relying on process-wide statics, so a second analysis can
//! run in the same process with a fresh context.

use cminus_ast::{ExpType, ScopeId, SymbolId};
use cminus_symbols::{ScopeStack, ScopeStackError, SymbolKind, SymbolTable};
use crate::{Analysis, Reporter};

/// Storage locations consumed by the built-in functions in the global scope
const BUILTIN_COUNT: u32 = 2;

/// State shared by the builder and checker passes: the symbol table, the
/// scope stack, the function whose body is being visited, and the
/// diagnostic sink.
#[derive(Debug)]
pub struct AnalysisContext {
    pub table: SymbolTable,
    pub stack: ScopeStack,
    pub reporter: Reporter,
    /// Symbol entry of the function declaration being visited, used for
    /// return-type checks and parameter registration
    pub current_function: Option<SymbolId>,
    global: ScopeId,
    fatal: Option<ScopeStackError>,
}

impl AnalysisContext {
    /// Create a context with the global scope seeded with the built-in
    /// functions and pushed onto the scope stack.
    ///
    /// The built-in contract is shared with code generation and must not
    /// change: `input()` returns an integer and takes no parameters,
    /// `output(int)` returns void and takes exactly one scalar integer.
    pub fn new() -> Self {
        let mut table = SymbolTable::new();
        let global = table.add_scope(None, "global");

        let _ = table.insert(
            global,
            "input",
            ExpType::Integer,
            false,
            SymbolKind::Function,
            0,
            0,
        );
        if let Ok(output) = table.insert(
            global,
            "output",
            ExpType::Void,
            false,
            SymbolKind::Function,
            0,
            1,
        ) {
            table.add_param(output, "value", ExpType::Integer, false);
        }

        let mut ctx = Self {
            table,
            stack: ScopeStack::new(),
            reporter: Reporter::new(),
            current_function: None,
            global,
            fatal: None,
        };
        ctx.push_scope(global, BUILTIN_COUNT);
        ctx
    }

    pub fn global(&self) -> ScopeId {
        self.global
    }

    /// The scope at the top of the stack (the global scope if the stack
    /// is somehow empty)
    pub fn current_scope(&self) -> ScopeId {
        self.stack.top().map_or(self.global, |frame| frame.scope)
    }

    /// Push a scope, recording a fatal error instead of panicking when
    /// the nesting limit is exceeded
    pub fn push_scope(&mut self, scope: ScopeId, next_location: u32) {
        if self.fatal.is_some() {
            return;
        }
        if let Err(e) = self.stack.push(scope, next_location) {
            self.fatal = Some(e);
        }
    }

    pub fn pop_scope(&mut self) {
        if self.fatal.is_some() {
            return;
        }
        if let Err(e) = self.stack.pop() {
            self.fatal = Some(e);
        }
    }

    /// Consume the next storage slot of the current scope
    pub fn alloc_location(&mut self) -> u32 {
        match self.stack.top_mut() {
            Some(frame) => {
                let location = frame.next_location;
                frame.next_location += 1;
                location
            }
            None => 0,
        }
    }

    /// The fatal internal error, if one occurred
    pub fn fatal(&self) -> Option<ScopeStackError> {
        self.fatal
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal.is_some()
    }

    /// Tear down the context into the analysis result
    pub fn finish(self) -> Analysis {
        Analysis {
            table: self.table,
            global: self.global,
            had_error: self.reporter.had_error(),
            diagnostics: self.reporter.into_diagnostics(),
        }
    }
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_scope_seeded_with_builtins() {
        let ctx = AnalysisContext::new();
        let global = ctx.global();

        let input = ctx.table.lookup(global, "input").expect("input missing");
        let output = ctx.table.lookup(global, "output").expect("output missing");

        let input = ctx.table.entry(input);
        assert_eq!(input.kind, SymbolKind::Function);
        assert_eq!(input.ty, ExpType::Integer);
        assert_eq!(input.param_count(), 0);
        assert_eq!(input.location, 0);

        let output = ctx.table.entry(output);
        assert_eq!(output.kind, SymbolKind::Function);
        assert_eq!(output.ty, ExpType::Void);
        assert_eq!(output.param_count(), 1);
        assert_eq!(output.params[0].ty, ExpType::Integer);
        assert!(!output.params[0].is_array);
        assert_eq!(output.location, 1);
    }

    #[test]
    fn location_allocation_continues_after_builtins() {
        let mut ctx = AnalysisContext::new();
        assert_eq!(ctx.alloc_location(), BUILTIN_COUNT);
        assert_eq!(ctx.alloc_location(), BUILTIN_COUNT + 1);
    }

    #[test]
    fn pop_below_global_is_fatal() {
        let mut ctx = AnalysisContext::new();
        ctx.pop_scope();
        assert!(!ctx.is_fatal());
        ctx.pop_scope();
        assert_eq!(ctx.fatal(), Some(ScopeStackError::Underflow));
    }
}
