//! Expression types and analysis handles

use serde::{Deserialize, Serialize};
use std::fmt;

/// The C-Minus expression type lattice: `int`, `void`, and a sentinel
/// for expressions whose type could not be determined.
///
/// `Invalid` is assigned when a check fails and propagates silently, so a
/// single root cause never produces a cascade of follow-up errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpType {
    Integer,
    Void,
    Invalid,
}

impl fmt::Display for ExpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpType::Integer => write!(f, "int"),
            ExpType::Void => write!(f, "void"),
            ExpType::Invalid => write!(f, "invalid"),
        }
    }
}

/// Binary operators of the C-Minus expression grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Plus,
    Minus,
    Times,
    Over,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Handle to a scope in the analysis scope tree.
///
/// Scopes are arena-allocated by the symbol table; nodes that introduce a
/// scope carry a `ScopeId` back-reference so the checker pass can re-enter
/// the scopes the builder pass created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

/// Handle to a symbol entry in the analysis symbol table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);
