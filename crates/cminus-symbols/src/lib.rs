//! C-Minus symbol tables
//!
//! Scope-aware symbol storage for the semantic analyzer: a tree of
//! lexical scopes each holding a fixed-bucket chained hash table, plus
//! the bounded scope stack the analysis passes use to track the current
//! lexical nesting across traversals.

mod dump;
mod error;
mod stack;
mod table;

pub use dump::*;
pub use error::*;
pub use stack::*;
pub use table::*;
