//! Error types for CODEOWNERS file parsing.
//!
//! This module defines error types that capture parse and pattern
//! compilation failures along with their source locations.

use super::ast::CodeownersFile;
use super::span::Span;
use thiserror::Error;

/// An error that occurred while parsing or compiling a CODEOWNERS line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A line could not be parsed.
    #[error("line {line}: {message}")]
    InvalidLine {
        /// The line number where the error occurred (1-based).
        line: usize,
        /// Description of the error.
        message: String,
        /// Location in the source.
        span: Span,
    },

    /// An owner token is neither `@login`, `@org/team` nor an email.
    #[error("line {line}, column {column}: invalid owner '{owner}' (expected @user, @org/team, or email)")]
    InvalidOwner {
        /// The line number (1-based).
        line: usize,
        /// The column number (1-based).
        column: usize,
        /// The offending token.
        owner: String,
        /// Location of the token.
        span: Span,
    },

    /// A pattern could not be compiled into a matcher.
    #[error("line {line}: invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The line number (1-based).
        line: usize,
        /// The pattern text.
        pattern: String,
        /// Why compilation failed.
        message: String,
        /// Location of the pattern.
        span: Span,
    },
}

impl ParseError {
    /// Creates an invalid line error.
    pub fn invalid_line(message: impl Into<String>, span: Span) -> Self {
        Self::InvalidLine {
            line: span.line,
            message: message.into(),
            span,
        }
    }

    /// Creates an invalid owner error.
    pub fn invalid_owner(owner: impl Into<String>, span: Span) -> Self {
        Self::InvalidOwner {
            line: span.line,
            column: span.column,
            owner: owner.into(),
            span,
        }
    }

    /// Creates an invalid pattern error.
    pub fn invalid_pattern(
        pattern: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::InvalidPattern {
            line: span.line,
            pattern: pattern.into(),
            message: message.into(),
            span,
        }
    }

    /// Returns the span associated with this error.
    pub fn span(&self) -> &Span {
        match self {
            ParseError::InvalidLine { span, .. } => span,
            ParseError::InvalidOwner { span, .. } => span,
            ParseError::InvalidPattern { span, .. } => span,
        }
    }

    /// Returns the line number where this error occurred.
    pub fn line(&self) -> usize {
        match self {
            ParseError::InvalidLine { line, .. } => *line,
            ParseError::InvalidOwner { line, .. } => *line,
            ParseError::InvalidPattern { line, .. } => *line,
        }
    }
}

/// The result of parsing a CODEOWNERS file.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The parsed AST (may be partial if there were errors in lenient mode).
    pub ast: CodeownersFile,
    /// Any errors encountered during parsing.
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Creates a successful parse result with no errors.
    pub fn ok(ast: CodeownersFile) -> Self {
        Self {
            ast,
            errors: Vec::new(),
        }
    }

    /// Creates a parse result with errors.
    pub fn with_errors(ast: CodeownersFile, errors: Vec<ParseError>) -> Self {
        Self { ast, errors }
    }

    /// Returns true if parsing succeeded without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if there were parse errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
