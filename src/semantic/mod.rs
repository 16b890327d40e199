//! Semantic analysis.
//!
//! - `types`: interned type values and literal inference
//! - `scope`: the lexical scope tree and symbols
//! - `analyzer`: the tree walk that resolves names, checks types and
//!   tracks initialization and ownership state

pub mod analyzer;
pub mod scope;
pub mod types;

#[cfg(test)]
mod tests;
