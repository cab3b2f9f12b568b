//! C-Minus Semantic Analyzer
//!
//! Two strictly ordered passes over a parsed syntax tree: the builder
//! pass constructs the scope tree and symbol table, then the checker
//! pass re-enters those scopes and performs bottom-up type inference
//! and validation. Semantic errors are accumulated as diagnostics and
//! never abort a pass; scope-stack exhaustion is the only fatal error.

mod builder;
mod checker;
mod context;
mod diagnostics;

pub use builder::*;
pub use checker::*;
pub use context::*;
pub use diagnostics::*;

use cminus_ast::{Node, ScopeId};
use cminus_symbols::{ScopeStackError, SymbolTable};

/// Result of a completed analysis.
///
/// `had_error` gates downstream stages: code generation must not run
/// when it is set.
#[derive(Debug)]
pub struct Analysis {
    pub table: SymbolTable,
    /// The global scope, root of the scope tree
    pub global: ScopeId,
    pub diagnostics: Vec<Diagnostic>,
    pub had_error: bool,
}

/// Run both analysis passes over the tree.
///
/// The tree is annotated in place: the builder pass stores scope
/// back-references on function and block nodes, the checker pass stores
/// inferred types and array flags on expressions.
pub fn analyze(root: &mut Node) -> Result<Analysis, ScopeStackError> {
    let mut ctx = AnalysisContext::new();
    build_symbol_table(root, &mut ctx)?;
    check_types(root, &mut ctx)?;
    Ok(ctx.finish())
}
