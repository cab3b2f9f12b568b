//! Diagnostic table dumps
//!
//! Formatted text listings of the symbol table and of function
//! signatures, matching the column layout downstream tooling expects.
//! Diagnostic output only; nothing reads these tables back.

use std::fmt::Write;
use cminus_ast::{ExpType, ScopeId};
use crate::{SymbolKind, SymbolTable};

/// Human-readable type label for one entry
pub fn type_label(ty: ExpType, kind: SymbolKind, is_array: bool) -> &'static str {
    if kind == SymbolKind::Function {
        return "Function";
    }
    match (ty, is_array) {
        (ExpType::Integer, true) => "Integer Array",
        (ExpType::Integer, false) => "Integer",
        (ExpType::Void, _) => "Void",
        (ExpType::Invalid, _) => "Invalid Type",
    }
}

/// Render the symbol table: one row per entry with its name, type label,
/// owning scope, storage location, and reference lines.
pub fn render_symbol_table(table: &SymbolTable, root: ScopeId) -> String {
    let mut out = String::new();
    out.push_str("\n< Symbol Table >\n");
    out.push_str("Variable Name  Variable Type  Scope Name  Location   Line Numbers\n");
    out.push_str("-------------  -------------  ----------  --------   ------------\n");

    for scope_id in table.scope_preorder(root) {
        let scope = table.scope(scope_id);
        for entry in table.scope_entries(scope_id) {
            let _ = write!(
                out,
                "{:<14} {:<14} {:<11} {:<8} ",
                entry.name,
                type_label(entry.ty, entry.kind, entry.is_array),
                scope.name,
                entry.location,
            );
            for line in &entry.lines {
                let _ = write!(out, "{:>4} ", line);
            }
            out.push('\n');
        }
    }
    out
}

/// Render the function table: one block per function with its return
/// type and parameter list (or a `Void` row for parameterless
/// functions).
pub fn render_function_table(table: &SymbolTable, root: ScopeId) -> String {
    let mut out = String::new();
    out.push_str("\n< Function Table >\n");
    out.push_str("Function Name  Scope Name  Return Type  Parameter Name   Parameter Type\n");
    out.push_str("-------------  ----------  -----------  --------------   --------------\n");

    for scope_id in table.scope_preorder(root) {
        let scope = table.scope(scope_id);
        for entry in table.scope_entries(scope_id) {
            if entry.kind != SymbolKind::Function {
                continue;
            }
            let _ = write!(
                out,
                "{:<14} {:<11} {:<11} ",
                entry.name,
                scope.name,
                type_label(entry.ty, SymbolKind::Variable, entry.is_array),
            );
            if entry.params.is_empty() {
                let _ = writeln!(out, "{:<17} Void", " ");
            } else {
                out.push('\n');
                for param in &entry.params {
                    let _ = writeln!(
                        out,
                        "{:<38}  {:<16} {}",
                        " ",
                        param.name,
                        type_label(param.ty, SymbolKind::Variable, param.is_array),
                    );
                }
            }
        }
    }
    out
}
