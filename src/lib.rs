#![allow(clippy::module_inception)]

use std::fmt::Display;

use tracing::debug;

use crate::{
    ast::ast::Program,
    errors::diagnostics::{Diagnostic, Diagnostics},
    parser::parser::parse_source,
    semantic::{
        analyzer::{AnalyzerOptions, SemanticAnalyzer},
        scope::ScopeTree,
    },
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod semantic;

extern crate regex;

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// A zero-width span at `position`.
    pub fn at(position: Position) -> Self {
        Span {
            start: position,
            end: position,
        }
    }

    /// Joins two spans, keeping the start of `self` and the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Returns the text of a 1-based line, without its line terminator.
pub fn line_text(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth((line - 1) as usize)
        .map(|text| text.strip_suffix('\r').unwrap_or(text))
}

/// Renders a diagnostic with the offending source line and a caret under
/// the start of its range.
///
/// ```text
/// error: Variable redeclared: x
/// -> main.ipl
///    |
/// 20 | int x = 4;
///    | ----^
/// ```
pub fn render_diagnostic(diagnostic: &Diagnostic, source: &str, file: &str) -> String {
    let mut output = format!("{}\n", diagnostic);

    let Some(range) = diagnostic.range else {
        return output;
    };

    let Some(text) = line_text(source, range.start.line) else {
        return output;
    };

    let line_string = range.start.line.to_string();
    let padding = line_string.len() + 2;

    let (trimmed, removed_whitespace) = remove_starting_whitespace(text);
    let arrows = (range.start.column as usize)
        .saturating_sub(removed_whitespace)
        .max(1);

    output.push_str(&format!("-> {}\n", file));
    output.push_str(&format!("{:>padding$}\n", "|"));
    output.push_str(&format!("{} | {}\n", line_string, trimmed.trim_end()));
    output.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    if let Some(suggestion) = &diagnostic.suggestion {
        output.push_str(&format!("{:>padding$} help: {}\n", "=", suggestion));
    }

    output
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let start = string
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();

    (&string[start..], start)
}

/// Options for a full front-end run over one source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontEnd {
    /// Emit informational diagnostics while analyzing.
    pub verbose: bool,
    /// Run semantic analysis even when the parser reported a syntax error.
    pub analyze_on_syntax_error: bool,
}

#[derive(Debug)]
pub struct FrontEndOutput {
    pub program: Program,
    pub had_syntax_error: bool,
    /// `None` when analysis was skipped because of syntax errors.
    pub analysis: Option<bool>,
    pub diagnostics: Diagnostics,
    pub scopes: Option<ScopeTree>,
}

impl FrontEndOutput {
    /// True when parsing succeeded and analysis ran and succeeded.
    pub fn succeeded(&self) -> bool {
        !self.had_syntax_error && self.analysis == Some(true)
    }
}

/// Parses and analyzes `source`, collecting every diagnostic along the way.
pub fn check_source(source: &str, options: FrontEnd) -> FrontEndOutput {
    let (parser, program) = parse_source(source);
    let had_syntax_error = parser.had_error();

    let mut diagnostics = Diagnostics::new();
    diagnostics.extend(parser.diagnostics().iter().cloned());

    if had_syntax_error && !options.analyze_on_syntax_error {
        debug!("skipping semantic analysis after syntax errors");
        return FrontEndOutput {
            program,
            had_syntax_error,
            analysis: None,
            diagnostics,
            scopes: None,
        };
    }

    let mut analyzer = SemanticAnalyzer::new(AnalyzerOptions {
        verbose: options.verbose,
    });
    let success = analyzer.analyze(&program, &mut diagnostics);

    FrontEndOutput {
        program,
        had_syntax_error,
        analysis: Some(success),
        diagnostics,
        scopes: Some(analyzer.into_scopes()),
    }
}
