use std::fmt::Display;

use thiserror::Error;

use crate::Span;

use super::diagnostics::{Diagnostic, Severity};

/// A syntax error raised while parsing, carried through `?` until the
/// enclosing statement loop records it and recovers.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
        }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_error_name(&self) -> &str {
        self.internal_error.name()
    }

    pub fn get_tip(&self) -> ErrorTip {
        self.internal_error.tip()
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        self.internal_error.into_diagnostic(Some(self.span))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.internal_error, self.span)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Syntax
    #[error("Unrecognised character: {token}")]
    UnrecognisedToken { token: String },
    #[error("Unexpected token: {token}")]
    UnexpectedToken { token: String },
    #[error("Unexpected token '{token}': {message}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("Expected '{expected}' but found '{found}'")]
    ExpectedToken { expected: String, found: String },
    #[error("Invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    // Semantic
    #[error("Function redeclared: {function}")]
    FunctionRedeclared { function: String },
    #[error("Parameter redeclared: {parameter}")]
    ParameterRedeclared { parameter: String },
    #[error("Variable redeclared: {variable}")]
    VariableRedeclared { variable: String },
    #[error("Assignment to undefined identifier: {variable}")]
    AssignmentToUndefined { variable: String },
    #[error("Use of undefined identifier: {variable}")]
    UndefinedIdentifier { variable: String },
    #[error("Call to undefined function: {function}")]
    UndefinedFunction { function: String },
    #[error("Call target is not a named function")]
    NotCallable,
    #[error("Type mismatch in declaration of '{variable}': expected {expected}, found {received}")]
    DeclarationTypeMismatch {
        variable: String,
        expected: String,
        received: String,
    },
    #[error("Type mismatch in assignment to '{variable}': expected {expected}, found {received}")]
    AssignmentTypeMismatch {
        variable: String,
        expected: String,
        received: String,
    },
    #[error("Type mismatch in binary operation '{operator}': {left} and {right}")]
    BinaryTypeMismatch {
        operator: String,
        left: String,
        right: String,
    },
    #[error("Condition of '{statement}' must be bool, found {received}")]
    NonBooleanCondition { statement: String, received: String },
    #[error("Function '{function}' may be missing a return statement")]
    MissingReturn { function: String },
    #[error("Use of moved value: {variable}")]
    UseOfMovedValue { variable: String },
    #[error("Assignment to constant: {variable}")]
    AssignmentToConstant { variable: String },

    // Warnings
    #[error("Variable '{variable}' may be used before initialization")]
    PossiblyUninitialized { variable: String },
    #[error("Function '{function}' expects {expected} argument(s), found {received}")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
}

impl ErrorImpl {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::UnexpectedEndOfInput => "UnexpectedEndOfInput",
            ErrorImpl::FunctionRedeclared { .. } => "FunctionRedeclared",
            ErrorImpl::ParameterRedeclared { .. } => "ParameterRedeclared",
            ErrorImpl::VariableRedeclared { .. } => "VariableRedeclared",
            ErrorImpl::AssignmentToUndefined { .. } => "AssignmentToUndefined",
            ErrorImpl::UndefinedIdentifier { .. } => "UndefinedIdentifier",
            ErrorImpl::UndefinedFunction { .. } => "UndefinedFunction",
            ErrorImpl::NotCallable => "NotCallable",
            ErrorImpl::DeclarationTypeMismatch { .. } => "DeclarationTypeMismatch",
            ErrorImpl::AssignmentTypeMismatch { .. } => "AssignmentTypeMismatch",
            ErrorImpl::BinaryTypeMismatch { .. } => "BinaryTypeMismatch",
            ErrorImpl::NonBooleanCondition { .. } => "NonBooleanCondition",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
            ErrorImpl::UseOfMovedValue { .. } => "UseOfMovedValue",
            ErrorImpl::AssignmentToConstant { .. } => "AssignmentToConstant",
            ErrorImpl::PossiblyUninitialized { .. } => "PossiblyUninitialized",
            ErrorImpl::ArgumentCountMismatch { .. } => "ArgumentCountMismatch",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ErrorImpl::PossiblyUninitialized { .. } | ErrorImpl::ArgumentCountMismatch { .. } => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    pub fn tip(&self) -> ErrorTip {
        match self {
            ErrorImpl::UnexpectedToken { token } if token == "}" || token == "EOF" => {
                ErrorTip::Suggestion(String::from("did you miss a semicolon?"))
            }
            ErrorImpl::ExpectedToken { expected, .. } if expected == ";" => {
                ErrorTip::Suggestion(String::from("did you miss a semicolon?"))
            }
            ErrorImpl::ExpectedToken { expected, .. } if expected == ")" || expected == "}" => {
                ErrorTip::Suggestion(format!("unterminated construct, add a closing `{}`", expected))
            }
            ErrorImpl::InvalidAssignmentTarget => ErrorTip::Suggestion(String::from(
                "only a plain identifier can appear on the left of `=`",
            )),
            ErrorImpl::UnrecognisedToken { token } => {
                ErrorTip::Suggestion(format!("remove the stray `{}`", token))
            }
            ErrorImpl::AssignmentToUndefined { variable } => {
                ErrorTip::Suggestion(format!("declare `{}` before assigning to it", variable))
            }
            ErrorImpl::UndefinedFunction { function } => {
                ErrorTip::Suggestion(format!("`{}` is not declared as a function in scope", function))
            }
            ErrorImpl::DeclarationTypeMismatch { expected, .. }
            | ErrorImpl::AssignmentTypeMismatch { expected, .. } => {
                ErrorTip::Suggestion(format!("use a value of type `{}` or declare it `any`", expected))
            }
            ErrorImpl::MissingReturn { .. } => {
                ErrorTip::Suggestion(String::from("end the function body with a `return`"))
            }
            ErrorImpl::UseOfMovedValue { variable } => ErrorTip::Suggestion(format!(
                "`{}` was moved earlier, reassign it before reading",
                variable
            )),
            ErrorImpl::AssignmentToConstant { variable } => {
                ErrorTip::Suggestion(format!("declare `{}` with `let` to make it mutable", variable))
            }
            _ => ErrorTip::None,
        }
    }

    pub fn into_diagnostic(self, range: Option<Span>) -> Diagnostic {
        let mut diagnostic = Diagnostic::new(self.severity(), self.to_string()).with_code(self.name());
        diagnostic.range = range;
        if let ErrorTip::Suggestion(suggestion) = self.tip() {
            diagnostic.suggestion = Some(suggestion);
        }
        diagnostic
    }
}
