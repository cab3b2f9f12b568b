//! Semantic diagnostics
//!
//! Every user-facing semantic error is a (line, kind, message) record.
//! Diagnostics are accumulated so one run reports as many independent
//! problems as possible; the rendered line format is part of the
//! external contract with downstream tooling.

use serde::Serialize;
use std::fmt;

/// Category of a semantic diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// Operand/condition/assignment/return type or array mismatch
    Type,
    /// Name used but not declared in any enclosing scope
    Undeclared,
    /// Name declared twice in the same scope
    Redeclared,
    /// Illegal declaration shape (nested function, void variable)
    Declaration,
    /// Call arity mismatch
    ArgumentCount,
}

/// One reported semantic error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub line: u32,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::Type => {
                write!(f, "Type error at line {}: {}", self.line, self.message)
            }
            DiagnosticKind::Undeclared => {
                write!(f, "Undeclared error at line {}: {}", self.line, self.message)
            }
            DiagnosticKind::Redeclared => {
                write!(f, "Redeclared error at line {}: {}", self.line, self.message)
            }
            DiagnosticKind::Declaration => {
                write!(f, "declaration error at line {}: {}", self.line, self.message)
            }
            DiagnosticKind::ArgumentCount => {
                write!(f, "Argument count error at line {}: {}", self.line, self.message)
            }
        }
    }
}

/// Accumulating sink for diagnostics.
///
/// Sets the error flag on the first diagnostic and keeps collecting;
/// passes never abort on a user-facing error.
#[derive(Debug, Default)]
pub struct Reporter {
    diagnostics: Vec<Diagnostic>,
    had_error: bool,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&mut self, line: u32, kind: DiagnosticKind, message: String) {
        self.had_error = true;
        self.diagnostics.push(Diagnostic {
            line,
            kind,
            message,
        });
    }

    pub fn type_error(&mut self, line: u32, message: impl Into<String>) {
        self.emit(line, DiagnosticKind::Type, message.into());
    }

    pub fn undeclared(&mut self, line: u32, name: &str) {
        self.emit(line, DiagnosticKind::Undeclared, format!("'{}' undeclared", name));
    }

    pub fn redeclared(&mut self, line: u32, name: &str) {
        self.emit(line, DiagnosticKind::Redeclared, format!("'{}' redeclared", name));
    }

    pub fn declaration_error(&mut self, line: u32, message: impl Into<String>) {
        self.emit(line, DiagnosticKind::Declaration, message.into());
    }

    pub fn argument_count_error(&mut self, line: u32, message: impl Into<String>) {
        self.emit(line, DiagnosticKind::ArgumentCount, message.into());
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_line_format() {
        let mut reporter = Reporter::new();
        reporter.type_error(12, "invalid operand type");
        reporter.undeclared(3, "x");
        reporter.redeclared(7, "f");
        reporter.declaration_error(9, "Functions can only be declared in global scope.");
        reporter.argument_count_error(15, "'f' expects 2 argument(s) but 3 were given.");

        let rendered: Vec<String> = reporter
            .diagnostics()
            .iter()
            .map(|d| d.to_string())
            .collect();

        assert_eq!(rendered[0], "Type error at line 12: invalid operand type");
        assert_eq!(rendered[1], "Undeclared error at line 3: 'x' undeclared");
        assert_eq!(rendered[2], "Redeclared error at line 7: 'f' redeclared");
        assert_eq!(
            rendered[3],
            "declaration error at line 9: Functions can only be declared in global scope."
        );
        assert_eq!(
            rendered[4],
            "Argument count error at line 15: 'f' expects 2 argument(s) but 3 were given."
        );
    }

    #[test]
    fn error_flag_set_on_first_diagnostic() {
        let mut reporter = Reporter::new();
        assert!(!reporter.had_error());
        reporter.undeclared(1, "y");
        assert!(reporter.had_error());
    }
}
