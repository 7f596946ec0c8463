//! Line and file-level parsers for CODEOWNERS files.
//!
//! This module combines the lexer components to parse complete lines
//! and entire CODEOWNERS files.

use super::ast::{CodeownersFile, Line, OwnerToken, Pattern};
use super::error::{ParseError, ParseResult};
use super::lexer::{is_blank_line, make_owner, parse_comment_line, parse_rule_components};
use super::span::Span;
use log::{debug, trace};

/// Configuration options for the parser.
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// If true, parsing stops at the first error (strict mode).
    /// If false, errors are collected and parsing continues (lenient mode).
    pub strict: bool,
}

impl ParserConfig {
    /// Creates a new parser config with default settings (lenient mode).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a strict mode parser config.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Creates a lenient mode parser config.
    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

/// Parses a single line of a CODEOWNERS file.
///
/// An owner token that is not `@login`, `@org/team` or an email keeps its
/// rule: it is reported as a diagnostic and kept as an account named by the
/// raw token, so the rule still governs its files.
fn parse_line(
    line_text: &str,
    line_num: usize,
    line_offset: usize,
) -> Result<(Line, Vec<ParseError>), ParseError> {
    let line_span = Span::new(line_offset, line_num, 1, line_text.len());

    if is_blank_line(line_text) {
        return Ok((Line::blank(line_span), Vec::new()));
    }

    if let Ok((_, comment_content)) = parse_comment_line(line_text) {
        return Ok((Line::comment(comment_content, line_span), Vec::new()));
    }

    let (_, components) = parse_rule_components(line_text)
        .map_err(|_| ParseError::invalid_line("could not parse line", line_span))?;

    let pattern_span = Span::new(
        line_offset + components.pattern_offset,
        line_num,
        components.pattern_offset + 1,
        components.pattern.len(),
    );
    let pattern = Pattern::new(components.pattern, pattern_span);

    let mut diagnostics = Vec::new();
    let owners = components
        .owners
        .iter()
        .zip(components.owner_offsets.iter())
        .map(|(owner_text, &offset)| {
            make_owner(owner_text).unwrap_or_else(|| {
                let owner_span =
                    Span::new(line_offset + offset, line_num, offset + 1, owner_text.len());
                diagnostics.push(ParseError::invalid_owner(*owner_text, owner_span));
                OwnerToken::account(owner_text.strip_prefix('@').unwrap_or(*owner_text))
            })
        })
        .collect();

    Ok((Line::rule(pattern, owners, line_span), diagnostics))
}

/// Parses a CODEOWNERS file with the given configuration.
pub fn parse_codeowners_with_config(input: &str, config: &ParserConfig) -> ParseResult {
    debug!(
        "Parsing CODEOWNERS file ({} bytes, strict={})",
        input.len(),
        config.strict
    );
    let mut lines = Vec::new();
    let mut errors = Vec::new();
    let mut offset = 0;
    let mut remaining = input;

    for (line_idx, line_text) in input.lines().enumerate() {
        let line_num = line_idx + 1;

        match parse_line(line_text, line_num, offset) {
            Ok((line, diagnostics)) if diagnostics.is_empty() => {
                trace!("Line {}: parsed successfully", line_num);
                lines.push(line);
            }
            Ok((line, mut diagnostics)) => {
                debug!(
                    "Line {}: kept with {} invalid owners",
                    line_num,
                    diagnostics.len()
                );
                if config.strict {
                    debug!("Strict mode: stopping at first error");
                    diagnostics.truncate(1);
                    return ParseResult::with_errors(CodeownersFile::new(lines), diagnostics);
                }
                lines.push(line);
                errors.extend(diagnostics);
            }
            Err(error) => {
                debug!("Line {}: parse error - {}", line_num, error);
                if config.strict {
                    debug!("Strict mode: stopping at first error");
                    return ParseResult::with_errors(CodeownersFile::new(lines), vec![error]);
                }
                let line_span = Span::new(offset, line_num, 1, line_text.len());
                lines.push(Line::invalid(line_text, error.to_string(), line_span));
                errors.push(error);
            }
        }

        // `lines()` drops the terminator, so recover its width (LF or CRLF)
        // from the original input to keep offsets exact.
        let after_content = &remaining[line_text.len()..];
        let ending = if after_content.starts_with("\r\n") {
            2
        } else if after_content.starts_with('\n') {
            1
        } else {
            0
        };
        let consumed = line_text.len() + ending;
        offset += consumed;
        remaining = &remaining[consumed..];
    }

    let ast = CodeownersFile::new(lines);

    debug!(
        "Parsing complete: {} lines, {} errors",
        ast.lines.len(),
        errors.len()
    );
    ParseResult::with_errors(ast, errors)
}

/// Parses a CODEOWNERS file using default (lenient) configuration.
pub fn parse_codeowners(input: &str) -> ParseResult {
    parse_codeowners_with_config(input, &ParserConfig::default())
}

/// Parses a CODEOWNERS file in strict mode, stopping at first error.
pub fn parse_codeowners_strict(input: &str) -> ParseResult {
    parse_codeowners_with_config(input, &ParserConfig::strict())
}
