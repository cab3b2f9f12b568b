//! C-Minus semantic analysis
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use cminus_analyzer as analyzer;
pub use cminus_ast as ast;
pub use cminus_symbols as symbols;
