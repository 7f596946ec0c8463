//! Output formatting for the CLI.
//!
//! This module provides human-readable and JSON output formatters for
//! review evaluations.

use codeowners_review_core::parse::ParseError;
use codeowners_review_core::review::{aggregate_statuses, filter_for};
use codeowners_review_core::{
    Evaluation, OwnerReviewStatus, OwnerToken, ReviewState, RuleEvaluation,
};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::io::Write;

/// JSON output format.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// The state of the change as a whole.
    pub overall: ReviewState,
    /// True when no rule needs further review.
    pub approved: bool,
    /// One entry per rule governing changed files.
    pub rules: Vec<JsonRule>,
    /// Changed files with no owner.
    pub unowned: Vec<String>,
    /// Minimum reviewer groups for the outstanding rules.
    pub recommendations: Vec<Vec<String>>,
    /// Problems found in the CODEOWNERS file.
    pub issues: Vec<JsonIssue>,
}

impl JsonOutput {
    /// Builds the JSON output for an evaluation.
    pub fn new(evaluation: &Evaluation, issues: &[ParseError]) -> Self {
        Self {
            overall: evaluation.overall,
            approved: evaluation.is_approved(),
            rules: evaluation.rules.iter().map(JsonRule::from).collect(),
            unowned: evaluation.unowned.clone(),
            recommendations: evaluation
                .recommendations
                .iter()
                .map(|group| group.iter().map(OwnerToken::to_string).collect())
                .collect(),
            issues: issues.iter().map(JsonIssue::from).collect(),
        }
    }

    /// Writes the JSON output to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

/// A single rule in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonRule {
    /// The rule's pattern.
    pub pattern: String,
    /// Line the rule is declared on.
    pub line: usize,
    /// Owners named on the rule.
    pub owners: Vec<String>,
    /// Changed files the rule governs.
    pub files: Vec<String>,
    /// The rule's overall state.
    pub state: ReviewState,
    /// The state of each owner named on the rule.
    pub owner_states: Vec<JsonOwnerState>,
    /// Per-owner statuses.
    pub statuses: Vec<JsonStatus>,
}

/// The aggregated state of one owner in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonOwnerState {
    /// The owner.
    pub owner: String,
    /// The owner's state across its statuses.
    pub state: ReviewState,
}

impl From<&RuleEvaluation> for JsonRule {
    fn from(evaluation: &RuleEvaluation) -> Self {
        Self {
            pattern: evaluation.rule.pattern.clone(),
            line: evaluation.rule.line,
            owners: evaluation.rule.owners.iter().map(OwnerToken::to_string).collect(),
            files: evaluation.files.clone(),
            state: evaluation.state,
            owner_states: evaluation
                .rule
                .owners
                .iter()
                .map(|owner| JsonOwnerState {
                    owner: owner.to_string(),
                    state: owner_statuses(evaluation, owner).0,
                })
                .collect(),
            statuses: evaluation.statuses.iter().map(JsonStatus::from).collect(),
        }
    }
}

/// A single owner status in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonStatus {
    /// The owner.
    pub owner: String,
    /// The owner's state.
    pub state: ReviewState,
    /// The account that acted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// The team the status counts for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_behalf_of: Option<String>,
}

impl From<&OwnerReviewStatus> for JsonStatus {
    fn from(status: &OwnerReviewStatus) -> Self {
        Self {
            owner: status.owner.to_string(),
            state: status.state,
            actor: status.actor.clone(),
            on_behalf_of: status.on_behalf_of.as_ref().map(OwnerToken::to_string),
        }
    }
}

/// A CODEOWNERS problem in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonIssue {
    /// Line number where the issue occurred.
    pub line: usize,
    /// Column number where the issue occurred.
    pub column: usize,
    /// Human-readable message.
    pub message: String,
}

impl From<&ParseError> for JsonIssue {
    fn from(error: &ParseError) -> Self {
        let span = error.span();
        Self {
            line: span.line,
            column: span.column,
            message: error.to_string(),
        }
    }
}

/// Collects the statuses counting for one owner of a rule and their state.
fn owner_statuses(
    evaluation: &RuleEvaluation,
    owner: &OwnerToken,
) -> (ReviewState, Vec<OwnerReviewStatus>) {
    let statuses: Vec<OwnerReviewStatus> = evaluation
        .statuses_for(owner)
        .into_iter()
        .cloned()
        .collect();
    (aggregate_statuses(&statuses), statuses)
}

fn actor_name(status: &OwnerReviewStatus) -> String {
    match &status.actor {
        Some(actor) => format!("@{}", actor),
        None => "-".to_string(),
    }
}

/// Output formatter for human-readable console output.
pub struct HumanOutput<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> HumanOutput<W> {
    /// Creates a new human output formatter.
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    fn paint(&self, text: String, style: fn(String) -> ColoredString) -> String {
        if self.use_colors {
            style(text).to_string()
        } else {
            text
        }
    }

    fn state_label(&self, state: ReviewState) -> String {
        let label = format!("[{}]", state.as_str());
        let style: fn(String) -> ColoredString = match state {
            ReviewState::Approved => |s| s.green().bold(),
            ReviewState::ChangesRequested => |s| s.red().bold(),
            ReviewState::Pending | ReviewState::Unknown => |s| s.yellow().bold(),
            ReviewState::Commented | ReviewState::Dismissed => |s| s.blue().bold(),
        };
        self.paint(label, style)
    }

    /// Writes a section header.
    pub fn write_header(&mut self, title: &str) -> std::io::Result<()> {
        let header = self.paint(format!("==> {}", title), |s| s.cyan().bold());
        writeln!(self.writer, "\n{}", header)
    }

    /// Writes one rule and the state of each of its owners.
    ///
    /// Approvals and change requests are listed by name; other states are
    /// collapsed into counts.
    pub fn write_rule(&mut self, evaluation: &RuleEvaluation) -> std::io::Result<()> {
        let label = self.state_label(evaluation.state);
        writeln!(
            self.writer,
            "  {} {} (line {}) - {} file(s)",
            label,
            evaluation.rule.pattern,
            evaluation.rule.line,
            evaluation.files.len()
        )?;

        for owner in &evaluation.rule.owners {
            let (state, statuses) = owner_statuses(evaluation, owner);

            let mut parts: Vec<String> = Vec::new();
            for named in [ReviewState::ChangesRequested, ReviewState::Approved] {
                parts.extend(
                    filter_for(&statuses, named)
                        .into_iter()
                        .map(|s| format!("{} {}", actor_name(s), s.state.icon())),
                );
            }
            for collapsed in [
                ReviewState::Commented,
                ReviewState::Dismissed,
                ReviewState::Pending,
                ReviewState::Unknown,
            ] {
                let group = filter_for(&statuses, collapsed);
                if group.is_empty() {
                    continue;
                }
                let names: Vec<String> = group.iter().map(|s| actor_name(s)).collect();
                parts.push(format!(
                    "+{} {} ({})",
                    group.len(),
                    collapsed.to_string().to_lowercase(),
                    names.join(", ")
                ));
            }

            let mut line = format!("      {} {} {}", state.icon(), owner, state);
            if !parts.is_empty() {
                line.push_str(": ");
                line.push_str(&parts.join(", "));
            }
            writeln!(self.writer, "{}", line)?;
        }
        Ok(())
    }

    /// Writes problems found in the CODEOWNERS file.
    pub fn write_issues(&mut self, issues: &[ParseError]) -> std::io::Result<()> {
        if issues.is_empty() {
            return Ok(());
        }
        self.write_header("CODEOWNERS issues")?;
        let label = self.paint("[WARN]".to_string(), |s| s.yellow().bold());
        for issue in issues {
            writeln!(self.writer, "  {} {}", label, issue)?;
        }
        Ok(())
    }

    /// Writes the full evaluation.
    pub fn write_evaluation(
        &mut self,
        evaluation: &Evaluation,
        issues: &[ParseError],
    ) -> std::io::Result<()> {
        self.write_issues(issues)?;

        if !evaluation.rules.is_empty() {
            self.write_header("Rules")?;
            for rule in &evaluation.rules {
                self.write_rule(rule)?;
            }
        }

        if !evaluation.unowned.is_empty() {
            self.write_header("Unowned files")?;
            for file in &evaluation.unowned {
                writeln!(self.writer, "  {}", file)?;
            }
        }

        if !evaluation.recommendations.is_empty() {
            self.write_header("Recommended reviewers")?;
            for (i, group) in evaluation.recommendations.iter().enumerate() {
                let names: Vec<String> = group.iter().map(OwnerToken::to_string).collect();
                writeln!(self.writer, "  {}. {}", i + 1, names.join(", "))?;
            }
        }

        self.write_summary(evaluation)
    }

    /// Writes a one-line summary.
    pub fn write_summary(&mut self, evaluation: &Evaluation) -> std::io::Result<()> {
        writeln!(self.writer)?;

        let outstanding = evaluation.outstanding().count();
        let message = if outstanding == 0 {
            self.paint("✓ All code owners have approved".to_string(), |s| {
                s.green().bold()
            })
        } else {
            self.paint(
                format!(
                    "✗ {} of {} rule(s) awaiting review (overall: {})",
                    outstanding,
                    evaluation.rules.len(),
                    evaluation.overall
                ),
                |s| s.red().bold(),
            )
        };
        writeln!(self.writer, "{}", message)
    }

    /// Writes a startup error.
    pub fn write_error(&mut self, message: &str) -> std::io::Result<()> {
        let label = self.paint("Error:".to_string(), |s| s.red().bold());
        writeln!(self.writer, "{} {}", label, message)
    }
}
