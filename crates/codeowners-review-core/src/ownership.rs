//! Ownership resolution for changed files.
//!
//! Rules are compiled from a parsed CODEOWNERS file in declaration order.
//! Each changed file belongs to the last rule whose pattern matches it,
//! so later lines override earlier ones.

use crate::matching::{self, Pattern};
use crate::parse::{CodeownersFile, OwnerToken, ParseError};
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeSet;

/// A compiled CODEOWNERS rule.
#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    /// The raw pattern text.
    pub pattern: String,
    /// The owners named on the rule, possibly none.
    pub owners: Vec<OwnerToken>,
    /// The 1-based line the rule was declared on.
    pub line: usize,
    #[serde(skip)]
    matcher: Pattern,
}

impl Rule {
    /// Compiles a rule from its pattern, owners and declaration line.
    pub fn new(
        pattern: impl Into<String>,
        owners: Vec<OwnerToken>,
        line: usize,
    ) -> Result<Self, matching::PatternError> {
        let pattern = pattern.into();
        let matcher = Pattern::new(&pattern)?;
        Ok(Self {
            pattern,
            owners,
            line,
            matcher,
        })
    }

    /// Returns true if this rule's pattern matches the path.
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }

    /// Returns true if the rule names no owners.
    pub fn is_unowned(&self) -> bool {
        self.owners.is_empty()
    }
}

// The matcher is derived from `pattern`, so it is left out of equality.
impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.owners == other.owners && self.line == other.line
    }
}

impl Eq for Rule {}

/// Rules compiled from a CODEOWNERS file along with per-line failures.
///
/// Rules whose pattern fails to compile are left out of `rules`; the caller
/// decides whether that aborts the evaluation.
#[derive(Debug, Clone, Default)]
pub struct CompiledRules {
    /// Successfully compiled rules, in declaration order.
    pub rules: Vec<Rule>,
    /// One error per rule that failed to compile.
    pub errors: Vec<ParseError>,
}

impl CompiledRules {
    /// Returns true if every rule compiled.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Compiles every rule line of a parsed CODEOWNERS file.
pub fn compile_rules(file: &CodeownersFile) -> CompiledRules {
    let mut compiled = CompiledRules::default();

    for rule in file.extract_rules() {
        match Rule::new(rule.pattern.text.as_str(), rule.owners.to_vec(), rule.line) {
            Ok(r) => compiled.rules.push(r),
            Err(e) => {
                debug!("Line {}: pattern failed to compile - {}", rule.line, e);
                compiled.errors.push(ParseError::invalid_pattern(
                    rule.pattern.text.as_str(),
                    e.to_string(),
                    rule.pattern.span,
                ));
            }
        }
    }

    compiled
}

/// The files governed by one rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleCoverage<'a> {
    /// The governing rule.
    pub rule: &'a Rule,
    /// Normalized paths of the files it governs, in input order.
    pub files: Vec<String>,
}

/// The outcome of assigning changed files to rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ownership<'a> {
    /// Rules that govern at least one file, in declaration order.
    pub coverage: Vec<RuleCoverage<'a>>,
    /// Files no owned rule governs, in input order.
    pub unowned: Vec<String>,
}

impl Ownership<'_> {
    /// Returns every team named on a covering rule.
    ///
    /// These are the teams whose member lists a snapshot needs.
    pub fn team_owners(&self) -> BTreeSet<OwnerToken> {
        self.coverage
            .iter()
            .flat_map(|c| c.rule.owners.iter())
            .filter(|owner| owner.is_team())
            .cloned()
            .collect()
    }
}

/// Assigns each changed file to the last rule that matches it.
///
/// `rules` must be in declaration order. A file whose governing rule names
/// no owners is reported as unowned, the same as a file no rule matches.
pub fn resolve_ownership<'a, S: AsRef<str>>(rules: &'a [Rule], files: &[S]) -> Ownership<'a> {
    let mut per_rule: Vec<Vec<String>> = vec![Vec::new(); rules.len()];
    let mut unowned = Vec::new();

    for file in files {
        let path = matching::normalize_path(file.as_ref()).into_owned();
        match rules.iter().rposition(|rule| rule.matches(&path)) {
            Some(idx) if rules[idx].is_unowned() => {
                warn!(
                    "File {} matched pattern {} (line {}) which has no owners",
                    path, rules[idx].pattern, rules[idx].line
                );
                unowned.push(path);
            }
            Some(idx) => {
                debug!(
                    "File: {} matched pattern: {} (line {})",
                    path, rules[idx].pattern, rules[idx].line
                );
                per_rule[idx].push(path);
            }
            None => {
                warn!("No CODEOWNERS entry found for: {}", path);
                unowned.push(path);
            }
        }
    }

    let coverage = rules
        .iter()
        .zip(per_rule)
        .filter(|(_, files)| !files.is_empty())
        .map(|(rule, files)| RuleCoverage { rule, files })
        .collect();

    Ownership { coverage, unowned }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_codeowners;

    fn rules_from(input: &str) -> Vec<Rule> {
        let parsed = parse_codeowners(input);
        assert!(parsed.is_ok(), "{:?}", parsed.errors);
        let compiled = compile_rules(&parsed.ast);
        assert!(compiled.is_ok(), "{:?}", compiled.errors);
        compiled.rules
    }

    #[test]
    fn compile_keeps_declaration_lines() {
        let rules = rules_from("# header\n*.rs @rust\n\n/docs/ @acme/docs\n");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].line, 2);
        assert_eq!(rules[1].line, 4);
        assert_eq!(rules[1].owners, vec![OwnerToken::team("acme", "docs")]);
    }

    #[test]
    fn compile_reports_bad_pattern_with_line() {
        let parsed = parse_codeowners("*.rs @rust\n/a/***/b @x\n*.md @docs\n");
        let compiled = compile_rules(&parsed.ast);
        assert_eq!(compiled.rules.len(), 2);
        assert_eq!(compiled.errors.len(), 1);
        assert_eq!(compiled.errors[0].line(), 2);
        assert!(matches!(
            &compiled.errors[0],
            ParseError::InvalidPattern { pattern, .. } if pattern == "/a/***/b"
        ));
    }

    #[test]
    fn later_rules_override_earlier_ones() {
        let rules = rules_from("* @everyone\n*.rs @rust\n/src/special.rs @special\n");
        let ownership = resolve_ownership(
            &rules,
            &["README.md", "src/lib.rs", "src/special.rs", "src/main.rs"],
        );

        assert!(ownership.unowned.is_empty());
        assert_eq!(ownership.coverage.len(), 3);
        assert_eq!(ownership.coverage[0].rule.line, 1);
        assert_eq!(ownership.coverage[0].files, vec!["README.md"]);
        assert_eq!(ownership.coverage[1].rule.line, 2);
        assert_eq!(ownership.coverage[1].files, vec!["src/lib.rs", "src/main.rs"]);
        assert_eq!(ownership.coverage[2].rule.line, 3);
        assert_eq!(ownership.coverage[2].files, vec!["src/special.rs"]);
    }

    #[test]
    fn each_file_goes_to_highest_matching_line() {
        let rules = rules_from("*.rs @a\n/src/ @b\n/src/*.rs @c\n/docs/ @d\n");
        let files = ["src/x.rs", "src/y/z.rs", "lib/w.rs", "docs/a.md", "Makefile"];
        let ownership = resolve_ownership(&rules, &files);

        for file in files {
            let expected = rules.iter().rev().find(|r| r.matches(file)).map(|r| r.line);
            let actual = ownership
                .coverage
                .iter()
                .find(|c| c.files.iter().any(|f| f == file))
                .map(|c| c.rule.line);
            assert_eq!(actual, expected, "{}", file);
        }
        assert_eq!(ownership.unowned, vec!["Makefile"]);
    }

    #[test]
    fn rules_with_no_files_are_omitted() {
        let rules = rules_from("*.rs @rust\n*.md @docs\n");
        let ownership = resolve_ownership(&rules, &["main.rs"]);
        assert_eq!(ownership.coverage.len(), 1);
        assert_eq!(ownership.coverage[0].rule.pattern, "*.rs");
    }

    #[test]
    fn unowned_rule_clears_ownership() {
        let rules = rules_from("* @everyone\n/vendor/\n");
        let ownership = resolve_ownership(&rules, &["vendor/lib.c", "main.c"]);
        assert_eq!(ownership.unowned, vec!["vendor/lib.c"]);
        assert_eq!(ownership.coverage.len(), 1);
        assert_eq!(ownership.coverage[0].files, vec!["main.c"]);
    }

    #[test]
    fn windows_paths_are_normalized() {
        let rules = rules_from("/src/ @dev\n");
        let ownership = resolve_ownership(&rules, &["src\\main.rs"]);
        assert_eq!(ownership.coverage[0].files, vec!["src/main.rs"]);
    }

    #[test]
    fn team_owners_collects_teams_only() {
        let rules = rules_from("*.rs @alice @acme/rust\n*.md @acme/docs @bob\n*.txt @acme/other\n");
        let ownership = resolve_ownership(&rules, &["a.rs", "b.md"]);
        let teams: Vec<_> = ownership.team_owners().into_iter().collect();
        assert_eq!(
            teams,
            vec![OwnerToken::team("acme", "docs"), OwnerToken::team("acme", "rust")]
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let rules = rules_from("* @a\n*.rs @b\n/src/ @c\n");
        let files = ["src/a.rs", "b.rs", "c.txt", "src/d.md"];
        assert_eq!(
            resolve_ownership(&rules, &files),
            resolve_ownership(&rules, &files)
        );
    }
}
