//! Symbol-table builder pass
//!
//! Preorder traversal that declares every name, opens a scope for every
//! function and every free-standing compound statement, and records a
//! reference line for every name use. Scope annotations written here are
//! replayed by the checker pass, which re-enters exactly the scopes this
//! pass created.

use std::mem;

use cminus_ast::{traverse, Decl, Expr, Node, NodeKind, Stmt, SymbolId, Visitor};
use cminus_symbols::{ScopeStackError, SymbolKind};
use crate::AnalysisContext;

/// How the next compound statement relates to the scope stack.
///
/// A function body shares its function's scope (parameters and body
/// locals live together), so the compound node directly under a
/// global function declaration must not open a scope of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeEntry {
    NewScope,
    ReuseEnclosing,
}

struct SymtabBuilder<'a> {
    ctx: &'a mut AnalysisContext,
    next_body: ScopeEntry,
    /// Saved `current_function` values, one frame per Function node
    /// being visited, restored on the node's postorder
    enclosing_functions: Vec<Option<SymbolId>>,
}

impl Visitor for SymtabBuilder<'_> {
    fn pre(&mut self, node: &mut Node) {
        if self.ctx.is_fatal() {
            return;
        }
        let line = node.line;
        match &node.kind {
            NodeKind::Decl(Decl::Function {
                name, return_ty, ..
            }) => {
                let name = name.clone();
                let return_ty = *return_ty;
                self.enclosing_functions.push(self.ctx.current_function);

                let enclosing = self.ctx.current_scope();
                if self.ctx.table.scope(enclosing).parent.is_some() {
                    // Not inserted and no scope opened; the body is then
                    // treated as an ordinary compound block.
                    self.ctx.reporter.declaration_error(
                        line,
                        "Functions can only be declared in global scope.",
                    );
                    self.ctx.current_function = None;
                    return;
                }

                let location = self.ctx.alloc_location();
                let inserted = self.ctx.table.insert(
                    enclosing,
                    &name,
                    return_ty,
                    false,
                    SymbolKind::Function,
                    line,
                    location,
                );
                if inserted.is_err() {
                    self.ctx.reporter.redeclared(line, &name);
                }
                self.ctx.current_function = inserted.ok();

                // A colliding declaration still gets a scope of its own
                // so its parameters and locals stay out of the enclosing
                // scope instead of colliding there too.
                let scope = self.ctx.table.add_scope(Some(enclosing), &name);
                self.ctx.push_scope(scope, 0);
                node.scope = Some(scope);
                self.next_body = ScopeEntry::ReuseEnclosing;
            }

            NodeKind::Decl(Decl::Var { name, ty, is_array }) => {
                let (name, ty, is_array) = (name.clone(), *ty, *is_array);
                let scope = self.ctx.current_scope();
                let location = self.ctx.alloc_location();
                if self
                    .ctx
                    .table
                    .insert(scope, &name, ty, is_array, SymbolKind::Variable, line, location)
                    .is_err()
                {
                    self.ctx.reporter.redeclared(line, &name);
                }
            }

            NodeKind::Decl(Decl::Param { name, ty, is_array }) => {
                let (name, ty, is_array) = (name.clone(), *ty, *is_array);
                let scope = self.ctx.current_scope();
                let location = self.ctx.alloc_location();
                match self
                    .ctx
                    .table
                    .insert(scope, &name, ty, is_array, SymbolKind::Variable, line, location)
                {
                    Ok(_) => {
                        if let Some(func) = self.ctx.current_function {
                            self.ctx.table.add_param(func, &name, ty, is_array);
                        }
                    }
                    Err(_) => self.ctx.reporter.redeclared(line, &name),
                }
            }

            NodeKind::Decl(Decl::VoidParam) => {}

            NodeKind::Stmt(Stmt::Compound { .. }) => {
                match mem::replace(&mut self.next_body, ScopeEntry::NewScope) {
                    ScopeEntry::ReuseEnclosing => {}
                    ScopeEntry::NewScope => {
                        let parent = self.ctx.current_scope();
                        let scope = self.ctx.table.add_scope(Some(parent), "compound");
                        self.ctx.push_scope(scope, 0);
                        node.scope = Some(scope);
                    }
                }
            }

            NodeKind::Expr(Expr::Var { name, .. }) | NodeKind::Expr(Expr::Call { name, .. }) => {
                // Undeclared names are the checker's to report; a miss
                // here simply records no line.
                let name = name.clone();
                let scope = self.ctx.current_scope();
                let _ = self.ctx.table.add_reference_line(scope, &name, line);
            }

            _ => {}
        }
    }

    fn post(&mut self, node: &mut Node) {
        if self.ctx.is_fatal() {
            return;
        }
        if node.scope.is_some() {
            self.ctx.pop_scope();
        }
        if matches!(node.kind, NodeKind::Decl(Decl::Function { .. })) {
            self.ctx.current_function = self.enclosing_functions.pop().flatten();
        }
    }
}

/// Run the builder pass, filling `ctx.table` and annotating scope-opening
/// nodes with their scope id
pub fn build_symbol_table(root: &mut Node, ctx: &mut AnalysisContext) -> Result<(), ScopeStackError> {
    let mut builder = SymtabBuilder {
        ctx: &mut *ctx,
        next_body: ScopeEntry::NewScope,
        enclosing_functions: Vec::new(),
    };
    traverse(root, &mut builder);
    match ctx.fatal() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
