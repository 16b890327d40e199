//! Parser module for building the Abstract Syntax Tree.
//!
//! A recursive-descent parser over the filtered token stream:
//!
//! - Statements are dispatched on their leading keyword or shape
//! - Expressions are parsed one precedence level at a time, with the
//!   operator table in `lookups`
//! - Type annotations are parsed in `types`
//! - Syntax errors are recorded and recovered from at statement
//!   boundaries, so one pass reports every independent problem

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
