//! The review evaluation pipeline.
//!
//! Ownership groups files under rules, the resolver turns each rule's owners
//! into statuses, the aggregator reduces them, and the solver recommends the
//! smallest reviewer groups for whatever is still outstanding.

use crate::ownership::{Ownership, Rule, resolve_ownership};
use crate::parse::OwnerToken;
use crate::review::{
    OwnerReviewStatus, ReviewSnapshot, ReviewState, UnreviewedAccountPolicy, aggregate_statuses,
    overall_state, resolve_owner,
};
use crate::solver::minimum_hitting_sets;
use log::debug;
use serde::Serialize;

/// Configuration for review evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationConfig {
    /// Handling of named accounts with no review and no request.
    pub unreviewed_accounts: UnreviewedAccountPolicy,
}

impl EvaluationConfig {
    /// Creates a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the policy for unreviewed accounts.
    pub fn with_unreviewed_accounts(mut self, policy: UnreviewedAccountPolicy) -> Self {
        self.unreviewed_accounts = policy;
        self
    }
}

/// The review status of one rule that governs changed files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleEvaluation {
    /// The governing rule.
    pub rule: Rule,
    /// The changed files it governs.
    pub files: Vec<String>,
    /// Statuses of the rule's owners.
    pub statuses: Vec<OwnerReviewStatus>,
    /// The rule's overall state.
    pub state: ReviewState,
}

impl RuleEvaluation {
    /// Returns true once the rule's owners have approved.
    pub fn is_satisfied(&self) -> bool {
        self.state.is_approved()
    }

    /// Returns the statuses reported for an owner named on the rule.
    ///
    /// A team gets its own status or the statuses of members reviewing on
    /// its behalf; an account only gets statuses reported for itself.
    pub fn statuses_for(&self, owner: &OwnerToken) -> Vec<&OwnerReviewStatus> {
        self.statuses
            .iter()
            .filter(|s| match &s.on_behalf_of {
                Some(team) => team == owner,
                None => &s.owner == owner,
            })
            .collect()
    }
}

/// The complete result of evaluating a change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// One entry per rule that governs at least one changed file.
    pub rules: Vec<RuleEvaluation>,
    /// Changed files with no owner.
    pub unowned: Vec<String>,
    /// The state of the change as a whole.
    pub overall: ReviewState,
    /// Every smallest group of owners whose approval would satisfy the
    /// outstanding rules.
    pub recommendations: Vec<Vec<OwnerToken>>,
}

impl Evaluation {
    /// Returns the rules that still need approval.
    pub fn outstanding(&self) -> impl Iterator<Item = &RuleEvaluation> {
        self.rules.iter().filter(|r| !r.is_satisfied())
    }

    /// Returns true when no rule needs further approval.
    pub fn is_approved(&self) -> bool {
        self.outstanding().next().is_none()
    }
}

/// Resolves and aggregates the statuses of every covering rule.
pub fn evaluate_rules(
    ownership: &Ownership<'_>,
    snapshot: &ReviewSnapshot,
    config: &EvaluationConfig,
) -> Vec<RuleEvaluation> {
    ownership
        .coverage
        .iter()
        .map(|coverage| {
            let statuses: Vec<OwnerReviewStatus> = coverage
                .rule
                .owners
                .iter()
                .flat_map(|owner| resolve_owner(owner, snapshot, config))
                .collect();
            let state = aggregate_statuses(&statuses);
            debug!(
                "Rule {} (line {}): {} across {} files",
                coverage.rule.pattern,
                coverage.rule.line,
                state,
                coverage.files.len()
            );
            RuleEvaluation {
                rule: coverage.rule.clone(),
                files: coverage.files.clone(),
                statuses,
                state,
            }
        })
        .collect()
}

/// Computes the minimum reviewer groups for the rules not yet approved.
pub fn recommend_reviewers(evaluations: &[RuleEvaluation]) -> Vec<Vec<OwnerToken>> {
    let outstanding: Vec<Vec<OwnerToken>> = evaluations
        .iter()
        .filter(|e| !e.is_satisfied() && !e.rule.owners.is_empty())
        .map(|e| e.rule.owners.clone())
        .collect();
    minimum_hitting_sets(&outstanding)
}

/// Evaluates the review status of a change end to end.
pub fn evaluate<S: AsRef<str>>(
    rules: &[Rule],
    files: &[S],
    snapshot: &ReviewSnapshot,
    config: &EvaluationConfig,
) -> Evaluation {
    let ownership = resolve_ownership(rules, files);
    let evaluations = evaluate_rules(&ownership, snapshot, config);
    let overall = overall_state(evaluations.iter().map(|e| e.state));
    let recommendations = recommend_reviewers(&evaluations);

    Evaluation {
        rules: evaluations,
        unowned: ownership.unowned,
        overall,
        recommendations,
    }
}
