//! Error types and diagnostics for the front end.
//!
//! - `errors` holds the error taxonomy shared by the parser and the
//!   semantic analyzer, with suggestions for the most common mistakes.
//! - `diagnostics` holds the severity-tagged messages handed to callers.

pub mod diagnostics;
pub mod errors;
