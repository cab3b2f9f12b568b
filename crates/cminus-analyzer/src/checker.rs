//! Type-checker pass
//!
//! Bottom-up inference over the tree the builder pass annotated. Scopes
//! are re-entered by following the scope annotations, expression types
//! flow upward through `ty`/`is_array`, and every rule that sees an
//! already-invalid operand stays silent so one mistake is reported once.

use cminus_ast::{traverse, Decl, Expr, ExpType, Node, NodeKind, Stmt, SymbolId, Visitor};
use cminus_symbols::{ScopeStackError, SymbolKind};
use crate::AnalysisContext;

struct TypeChecker<'a> {
    ctx: &'a mut AnalysisContext,
    /// Saved `current_function` values, one frame per Function node
    /// being visited, restored on the node's postorder
    enclosing_functions: Vec<Option<SymbolId>>,
}

/// Inferred type and array flag of a checked expression; nodes the
/// checker has not typed read as invalid
fn expr_info(node: &Node) -> (ExpType, bool) {
    (node.ty.unwrap_or(ExpType::Invalid), node.is_array)
}

impl Visitor for TypeChecker<'_> {
    fn pre(&mut self, node: &mut Node) {
        if self.ctx.is_fatal() {
            return;
        }
        match &node.kind {
            NodeKind::Decl(Decl::Function { name, .. }) => {
                let name = name.clone();
                self.enclosing_functions.push(self.ctx.current_function);
                // A function without a scope annotation was rejected by
                // the builder; its body is walked with no current
                // function, so its returns are not checked against a
                // same-named declaration elsewhere.
                self.ctx.current_function = match node.scope {
                    Some(scope) => {
                        self.ctx.push_scope(scope, 0);
                        self.ctx
                            .table
                            .lookup(self.ctx.global(), &name)
                            .filter(|&id| self.ctx.table.entry(id).kind == SymbolKind::Function)
                    }
                    None => None,
                };
            }
            NodeKind::Stmt(Stmt::Compound { .. }) => {
                if let Some(scope) = node.scope {
                    self.ctx.push_scope(scope, 0);
                }
            }
            _ => {}
        }
    }

    fn post(&mut self, node: &mut Node) {
        if self.ctx.is_fatal() {
            return;
        }
        match &node.kind {
            NodeKind::Expr(_) => self.check_expr(node),
            NodeKind::Stmt(_) => self.check_stmt(node),
            NodeKind::Decl(_) => self.check_decl(node),
        }
        if node.scope.is_some() {
            self.ctx.pop_scope();
        }
        if matches!(node.kind, NodeKind::Decl(Decl::Function { .. })) {
            self.ctx.current_function = self.enclosing_functions.pop().flatten();
        }
    }
}

impl TypeChecker<'_> {
    fn check_expr(&mut self, node: &mut Node) {
        let line = node.line;
        let (ty, is_array) = match &node.kind {
            NodeKind::Expr(Expr::Constant(_)) => (ExpType::Integer, false),

            NodeKind::Expr(Expr::Var { name, index }) => {
                self.check_var(name.clone(), index.as_deref(), line)
            }

            NodeKind::Expr(Expr::Binary { left, right, .. }) => {
                let (lt, la) = expr_info(left);
                let (rt, ra) = expr_info(right);
                if lt == ExpType::Invalid || rt == ExpType::Invalid {
                    (ExpType::Invalid, false)
                } else if la || ra {
                    self.ctx
                        .reporter
                        .type_error(line, "operations between array names are not possible.");
                    (ExpType::Invalid, false)
                } else if lt != ExpType::Integer || rt != ExpType::Integer {
                    self.ctx.reporter.type_error(line, "invalid operand type");
                    (ExpType::Invalid, false)
                } else {
                    (ExpType::Integer, false)
                }
            }

            NodeKind::Expr(Expr::Assign { target, value }) => {
                let (lt, la) = expr_info(target);
                let (rt, ra) = expr_info(value);
                if lt == ExpType::Invalid || rt == ExpType::Invalid {
                    (ExpType::Invalid, false)
                } else if lt != ExpType::Integer || rt != ExpType::Integer {
                    self.ctx
                        .reporter
                        .type_error(line, "assignment can only be done between integers.");
                    (ExpType::Invalid, false)
                } else if la != ra {
                    self.ctx.reporter.type_error(
                        line,
                        "assignment between int array and int is not possible.",
                    );
                    (ExpType::Invalid, false)
                } else {
                    (lt, la)
                }
            }

            NodeKind::Expr(Expr::Call { name, args }) => {
                self.check_call(name.clone(), args.as_deref(), line)
            }

            _ => return,
        };
        node.ty = Some(ty);
        node.is_array = is_array;
    }

    fn check_var(&mut self, name: String, index: Option<&Node>, line: u32) -> (ExpType, bool) {
        let scope = self.ctx.current_scope();
        let Some(id) = self.ctx.table.lookup(scope, &name) else {
            self.ctx.reporter.undeclared(line, &name);
            return (ExpType::Invalid, false);
        };
        let entry = self.ctx.table.entry(id);
        let (ty, is_array) = (entry.ty, entry.is_array);

        match index {
            None => (ty, is_array),
            Some(index) => {
                if !is_array {
                    self.ctx.reporter.type_error(
                        line,
                        format!("'{}' is not an array and cannot be indexed.", name),
                    );
                    return (ExpType::Invalid, false);
                }
                let (it, ia) = expr_info(index);
                if it == ExpType::Invalid {
                    return (ty, false);
                }
                if it != ExpType::Integer || ia {
                    self.ctx
                        .reporter
                        .type_error(index.line, "array index must be a non-array integer.");
                    return (ExpType::Invalid, false);
                }
                (ty, false)
            }
        }
    }

    fn check_call(&mut self, name: String, args: Option<&Node>, line: u32) -> (ExpType, bool) {
        let scope = self.ctx.current_scope();
        let Some(id) = self.ctx.table.lookup(scope, &name) else {
            self.ctx.reporter.undeclared(line, &name);
            return (ExpType::Invalid, false);
        };

        let entry = self.ctx.table.entry(id);
        if entry.kind != SymbolKind::Function {
            self.ctx
                .reporter
                .type_error(line, format!("'{}' is not a function.", name));
            return (ExpType::Invalid, false);
        }
        let return_ty = entry.ty;
        let params = entry.params.clone();

        let arg_count = args.map_or(0, |head| head.iter_siblings().count());
        if arg_count != params.len() {
            self.ctx.reporter.argument_count_error(
                line,
                format!(
                    "'{}' expects {} argument(s) but {} were given.",
                    name,
                    params.len(),
                    arg_count
                ),
            );
            return (return_ty, false);
        }

        if let Some(head) = args {
            for (i, (arg, param)) in head.iter_siblings().zip(params.iter()).enumerate() {
                let (at, _) = expr_info(arg);
                if at == ExpType::Invalid {
                    continue;
                }
                if at != param.ty {
                    self.ctx.reporter.type_error(
                        arg.line,
                        format!("argument {} of '{}' has the wrong type.", i + 1, name),
                    );
                }
            }
        }
        (return_ty, false)
    }

    fn check_stmt(&mut self, node: &mut Node) {
        let line = node.line;
        match &node.kind {
            NodeKind::Stmt(Stmt::If { condition, .. })
            | NodeKind::Stmt(Stmt::While { condition, .. }) => {
                match condition.as_deref() {
                    None => {
                        self.ctx
                            .reporter
                            .type_error(line, "condition expression is missing.");
                    }
                    Some(cond) => {
                        let (ct, ca) = expr_info(cond);
                        if ct != ExpType::Invalid {
                            if ca {
                                self.ctx
                                    .reporter
                                    .type_error(cond.line, "condition cannot be an array.");
                            } else if ct != ExpType::Integer {
                                self.ctx
                                    .reporter
                                    .type_error(cond.line, "condition must be an integer.");
                            }
                        }
                    }
                }
            }

            NodeKind::Stmt(Stmt::Return { value }) => {
                let Some(func) = self.ctx.current_function else {
                    return;
                };
                let entry = self.ctx.table.entry(func);
                let (return_ty, return_is_array) = (entry.ty, entry.is_array);

                match value.as_deref() {
                    Some(value) => {
                        if return_ty == ExpType::Void {
                            self.ctx.reporter.type_error(
                                line,
                                "cannot return a value from a void function.",
                            );
                            return;
                        }
                        let (vt, va) = expr_info(value);
                        if vt == ExpType::Invalid {
                            return;
                        }
                        if vt != return_ty || va != return_is_array {
                            self.ctx.reporter.type_error(
                                line,
                                "return value does not match the function's return type.",
                            );
                        }
                    }
                    None => {
                        if return_ty != ExpType::Void {
                            self.ctx
                                .reporter
                                .type_error(line, "function must return a value.");
                        }
                    }
                }
            }

            NodeKind::Stmt(Stmt::Compound { .. }) => {}
            _ => {}
        }
    }

    fn check_decl(&mut self, node: &mut Node) {
        let line = node.line;
        match &node.kind {
            NodeKind::Decl(Decl::Var { ty, .. }) => {
                if *ty != ExpType::Integer {
                    self.ctx
                        .reporter
                        .declaration_error(line, "variables cannot be declared with void type.");
                }
            }
            NodeKind::Decl(Decl::Param { ty, .. }) => {
                if *ty != ExpType::Integer {
                    self.ctx
                        .reporter
                        .declaration_error(line, "parameters cannot be declared with void type.");
                }
            }
            NodeKind::Decl(Decl::Function { .. }) => {
                if let Some(func) = self.ctx.current_function {
                    let entry = self.ctx.table.entry(func);
                    node.ty = Some(entry.ty);
                    node.is_array = entry.is_array;
                }
            }
            NodeKind::Decl(Decl::VoidParam) => {}
            _ => {}
        }
    }
}

/// Run the checker pass over a tree the builder pass has annotated
pub fn check_types(root: &mut Node, ctx: &mut AnalysisContext) -> Result<(), ScopeStackError> {
    let mut checker = TypeChecker {
        ctx: &mut *ctx,
        enclosing_functions: Vec::new(),
    };
    traverse(root, &mut checker);
    match ctx.fatal() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
