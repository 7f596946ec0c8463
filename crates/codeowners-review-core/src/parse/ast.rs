//! AST data structures for CODEOWNERS files.
//!
//! This module defines the abstract syntax tree nodes that represent
//! parsed CODEOWNERS file content.

use super::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Represents a pattern in a CODEOWNERS rule.
///
/// Patterns follow a subset of gitignore syntax for matching file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// The raw pattern text (e.g., "*.rs", "/src/**", "docs/").
    pub text: String,
    /// Location of the pattern in the source file.
    pub span: Span,
}

impl Pattern {
    /// Creates a new pattern with the given text and span.
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// An owner named on a CODEOWNERS rule.
///
/// The shape is decided once, at parse time; nothing downstream looks for a
/// `/` in a string to tell teams from accounts.
///
/// The derived ordering (accounts before teams, then by name) is the order
/// used for the reviewer universe when computing recommendations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OwnerToken {
    /// An individual account (`@login`) or an email address.
    Account {
        /// The login without the leading '@', or the raw email address.
        login: String,
    },
    /// A team reference (`@org/team-slug`).
    Team {
        /// The organization name.
        org: String,
        /// The team slug within the organization.
        slug: String,
    },
}

impl OwnerToken {
    /// Creates an account owner.
    pub fn account(login: impl Into<String>) -> Self {
        Self::Account {
            login: login.into(),
        }
    }

    /// Creates a team owner.
    pub fn team(org: impl Into<String>, slug: impl Into<String>) -> Self {
        Self::Team {
            org: org.into(),
            slug: slug.into(),
        }
    }

    /// Returns true if this owner is a team.
    pub fn is_team(&self) -> bool {
        matches!(self, OwnerToken::Team { .. })
    }

    /// Returns the `org/slug` key used by team membership lookups.
    ///
    /// Returns `None` for accounts.
    pub fn team_key(&self) -> Option<String> {
        match self {
            OwnerToken::Team { org, slug } => Some(format!("{}/{}", org, slug)),
            OwnerToken::Account { .. } => None,
        }
    }
}

impl Display for OwnerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Email owners are written as-is.
            OwnerToken::Account { login } if login.contains('@') => f.write_str(login),
            OwnerToken::Account { login } => write!(f, "@{}", login),
            OwnerToken::Team { org, slug } => write!(f, "@{}/{}", org, slug),
        }
    }
}

/// Represents the kind of line in a CODEOWNERS file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// A blank line (may contain only whitespace).
    Blank,
    /// A comment line (starts with '#').
    Comment {
        /// The comment content (without the leading '#').
        content: String,
    },
    /// A rule line with a pattern and zero or more owners.
    Rule {
        /// The file path pattern.
        pattern: Pattern,
        /// The owners for files matching the pattern.
        owners: Vec<OwnerToken>,
    },
    /// An invalid line that couldn't be parsed.
    Invalid {
        /// The raw line content.
        raw: String,
        /// Description of what went wrong.
        error: String,
    },
}

/// Represents a single line in a CODEOWNERS file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The kind/content of this line.
    pub kind: LineKind,
    /// Location of the entire line in the source file.
    pub span: Span,
}

impl Line {
    /// Creates a new line with the given kind and span.
    pub fn new(kind: LineKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Creates a blank line.
    pub fn blank(span: Span) -> Self {
        Self::new(LineKind::Blank, span)
    }

    /// Creates a comment line.
    pub fn comment(content: impl Into<String>, span: Span) -> Self {
        Self::new(
            LineKind::Comment {
                content: content.into(),
            },
            span,
        )
    }

    /// Creates a rule line.
    pub fn rule(pattern: Pattern, owners: Vec<OwnerToken>, span: Span) -> Self {
        Self::new(LineKind::Rule { pattern, owners }, span)
    }

    /// Creates an invalid line.
    pub fn invalid(raw: impl Into<String>, error: impl Into<String>, span: Span) -> Self {
        Self::new(
            LineKind::Invalid {
                raw: raw.into(),
                error: error.into(),
            },
            span,
        )
    }

    /// Returns true if this is a rule line.
    pub fn is_rule(&self) -> bool {
        matches!(self.kind, LineKind::Rule { .. })
    }

    /// Returns true if this is a comment line.
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, LineKind::Comment { .. })
    }

    /// Returns true if this is a blank line.
    pub fn is_blank(&self) -> bool {
        matches!(self.kind, LineKind::Blank)
    }

    /// Returns true if this is an invalid line.
    pub fn is_invalid(&self) -> bool {
        matches!(self.kind, LineKind::Invalid { .. })
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LineKind::Blank => Ok(()),
            LineKind::Comment { content } => write!(f, "#{}", content),
            LineKind::Rule { pattern, owners } => {
                write!(f, "{}", pattern)?;
                for owner in owners {
                    write!(f, " {}", owner)?;
                }
                Ok(())
            }
            LineKind::Invalid { raw, .. } => f.write_str(raw),
        }
    }
}

/// A rule line borrowed out of a [`CodeownersFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleLine<'a> {
    /// The 1-based line number of the rule.
    pub line: usize,
    /// The rule pattern.
    pub pattern: &'a Pattern,
    /// The rule owners, possibly empty.
    pub owners: &'a [OwnerToken],
}

/// The complete AST for a CODEOWNERS file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeownersFile {
    /// All lines in the file, in order.
    pub lines: Vec<Line>,
}

impl CodeownersFile {
    /// Creates a new CODEOWNERS file AST from the given lines.
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Returns an iterator over all rule lines.
    pub fn rules(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter().filter(|line| line.is_rule())
    }

    /// Returns an iterator over all invalid lines.
    pub fn invalid_lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter().filter(|line| line.is_invalid())
    }

    /// Returns true if there are any invalid lines.
    pub fn has_errors(&self) -> bool {
        self.lines.iter().any(|line| line.is_invalid())
    }

    /// Extracts all rules in declaration order.
    pub fn extract_rules(&self) -> Vec<RuleLine<'_>> {
        self.lines
            .iter()
            .filter_map(|line| match &line.kind {
                LineKind::Rule { pattern, owners } => Some(RuleLine {
                    line: line.span.line,
                    pattern,
                    owners: owners.as_slice(),
                }),
                _ => None,
            })
            .collect()
    }
}

impl Display for CodeownersFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, line) in self.lines.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line)?;
        }
        if !self.lines.is_empty() {
            writeln!(f)?;
        }
        Ok(())
    }
}
