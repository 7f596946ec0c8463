//! Parser module for CODEOWNERS files.
//!
//! This module parses GitHub CODEOWNERS files into an AST with span
//! metadata. Owner tokens are classified into [`OwnerToken`] values here,
//! once, so later stages never re-inspect raw owner strings.
//!
//! # Example
//!
//! ```rust
//! use codeowners_review_core::parse::{parse_codeowners, OwnerToken};
//!
//! let input = r#"
//! ## CODEOWNERS file
//! *.rs @rustacean
//! /docs/ @acme/docs-team
//! "#;
//!
//! let result = parse_codeowners(input);
//! assert!(result.is_ok());
//! let rules = result.ast.extract_rules();
//! assert_eq!(rules[1].owners, &[OwnerToken::team("acme", "docs-team")]);
//! ```

mod ast;
mod error;
mod lexer;
mod parser;
pub mod span;

// Re-export public types
pub use ast::{CodeownersFile, Line, LineKind, OwnerToken, Pattern, RuleLine};
pub use error::{ParseError, ParseResult};
pub use parser::{
    ParserConfig, parse_codeowners, parse_codeowners_strict, parse_codeowners_with_config,
};
pub use span::Span;

// Re-export lexer utilities that may be useful for custom parsing
pub use lexer::{OwnerKind, classify_owner, make_owner};
