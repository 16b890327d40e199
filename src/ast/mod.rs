/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program, top-level items and functions
/// - expressions: Definitions for the expression variants
/// - statements: Definitions for the statement variants
/// - printer: Indented text rendering of a Program
pub mod ast;
pub mod expressions;
pub mod printer;
pub mod statements;
