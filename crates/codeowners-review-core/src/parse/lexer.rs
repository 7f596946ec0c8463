//! Lexer and token parsers for CODEOWNERS files.
//!
//! This module contains nom-based parsers for individual tokens
//! like patterns, owners, and comments.

use nom::{
    IResult, Parser,
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::rest,
};

use super::ast::OwnerToken;

/// Characters that can appear in a pattern or owner token.
///
/// A `#` only starts a comment at the start of a token, so `\#notes.md` and
/// `a#b` stay whole.
fn is_token_char(c: char) -> bool {
    !c.is_whitespace()
}

/// Parses a complete comment line (optional whitespace + # + content).
pub fn parse_comment_line(input: &str) -> IResult<&str, &str> {
    (space0, char('#'), rest)
        .map(|(_, _, content)| content)
        .parse(input)
}

/// Checks if a line is blank (empty or only whitespace).
pub fn is_blank_line(input: &str) -> bool {
    input.trim().is_empty()
}

/// Result of parsing a rule line's components.
#[derive(Debug, Clone)]
pub struct RuleComponents<'a> {
    /// The pattern text.
    pub pattern: &'a str,
    /// Byte offset of pattern start within the line.
    pub pattern_offset: usize,
    /// List of owner texts, possibly empty.
    pub owners: Vec<&'a str>,
    /// Byte offsets of each owner start within the line.
    pub owner_offsets: Vec<usize>,
}

/// Parses the components of a rule line (pattern + zero or more owners).
///
/// Parsing stops at the end of the line or at a `#` following whitespace,
/// which starts a trailing comment. The raw text and offsets are returned without constructing AST
/// nodes so the caller can attach spans.
pub fn parse_rule_components(input: &str) -> IResult<&str, RuleComponents<'_>> {
    let (after_ws, leading_ws) = space0(input)?;
    let pattern_offset = leading_ws.len();

    let (after_pattern, pattern) = take_while1(is_token_char)(after_ws)?;

    let mut owners = Vec::new();
    let mut owner_offsets = Vec::new();
    let mut current = after_pattern;
    let mut current_offset = pattern_offset + pattern.len();

    loop {
        let (after_ws, ws) = space0(current)?;
        current_offset += ws.len();

        if after_ws.is_empty() || after_ws.starts_with('#') {
            current = after_ws;
            break;
        }

        let (after_owner, owner) = take_while1(is_token_char)(after_ws)?;
        owner_offsets.push(current_offset);
        owners.push(owner);
        current_offset += owner.len();
        current = after_owner;
    }

    Ok((
        current,
        RuleComponents {
            pattern,
            pattern_offset,
            owners,
            owner_offsets,
        },
    ))
}

/// Classifies an owner string into its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerKind<'a> {
    /// A GitHub user (@username).
    User(&'a str),
    /// A GitHub team (@org/team).
    Team { org: &'a str, team: &'a str },
    /// An email address.
    Email(&'a str),
    /// Unknown/invalid format.
    Unknown(&'a str),
}

/// Classifies an owner text string into its type.
pub fn classify_owner(text: &str) -> OwnerKind<'_> {
    if let Some(stripped) = text.strip_prefix('@') {
        if let Some((org, team)) = stripped.split_once('/') {
            if !org.is_empty() && !team.is_empty() && !team.contains('/') {
                return OwnerKind::Team { org, team };
            }
            return OwnerKind::Unknown(text);
        }
        if !stripped.is_empty() {
            return OwnerKind::User(stripped);
        }
        return OwnerKind::Unknown(text);
    }

    match text.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            OwnerKind::Email(text)
        }
        _ => OwnerKind::Unknown(text),
    }
}

/// Builds an [`OwnerToken`] from owner text.
///
/// Returns `None` when the text is not a recognizable owner.
pub fn make_owner(text: &str) -> Option<OwnerToken> {
    match classify_owner(text) {
        OwnerKind::User(login) => Some(OwnerToken::account(login)),
        OwnerKind::Team { org, team } => Some(OwnerToken::team(org, team)),
        OwnerKind::Email(email) => Some(OwnerToken::account(email)),
        OwnerKind::Unknown(_) => None,
    }
}
