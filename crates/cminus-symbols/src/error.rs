//! Error types for symbol table operations

use thiserror::Error;

/// Errors from symbol table operations.
///
/// These are signals to the analysis passes, not user-facing
/// diagnostics; the passes decide which diagnostic (if any) to emit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// The name is already declared in the same scope
    #[error("duplicate name in scope: {name}")]
    DuplicateName { name: String },

    /// The name was not found in the scope or any enclosing scope
    #[error("undeclared name: {name}")]
    UndeclaredName { name: String },
}

/// Scope stack depth violations.
///
/// Nesting beyond [`crate::MAX_SCOPE_DEPTH`] is an implementation
/// limit; both variants are fatal internal errors rather than user
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScopeStackError {
    #[error("scope stack overflow: nesting deeper than {max_depth} scopes")]
    Overflow { max_depth: usize },

    #[error("scope stack underflow: pop on an empty stack")]
    Underflow,
}
