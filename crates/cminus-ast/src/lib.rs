//! C-Minus AST - Core types for the abstract syntax tree
//!
//! This crate defines all AST node types, the expression type lattice,
//! the analysis annotations attached to nodes, and the generic
//! preorder/postorder traversal engine shared by the analysis passes.

mod node;
mod traverse;
mod types;

pub use node::*;
pub use traverse::*;
pub use types::*;
