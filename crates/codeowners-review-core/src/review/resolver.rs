//! Resolution of one owner token to its review statuses.

use super::{OwnerReviewStatus, ReviewSnapshot, ReviewState};
use crate::evaluate::EvaluationConfig;
use crate::parse::OwnerToken;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// What to report for a directly named account that has neither reviewed
/// nor been asked to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnreviewedAccountPolicy {
    /// Report the account as pending.
    #[default]
    Pending,
    /// Leave the account out of the rule's statuses.
    Omit,
}

/// Resolves an owner token against a review snapshot.
///
/// Accounts resolve to their latest review, then to Pending if a review was
/// requested, then according to `config.unreviewed_accounts`.
///
/// Teams resolve to the latest review submitted on the team's behalf, then
/// to Pending if the team was requested. Otherwise the team is expanded once
/// to its direct members and every member with a review or a pending request
/// is reported on behalf of the team. An expansion that yields nothing
/// falls back to a team-level Pending.
pub fn resolve_owner(
    owner: &OwnerToken,
    snapshot: &ReviewSnapshot,
    config: &EvaluationConfig,
) -> Vec<OwnerReviewStatus> {
    match owner {
        OwnerToken::Account { login } => {
            match account_state(login, snapshot) {
                Some(state) => vec![OwnerReviewStatus::for_account(login, state)],
                None => match config.unreviewed_accounts {
                    UnreviewedAccountPolicy::Pending => {
                        warn!("No review or request found for {} - assuming Pending", owner);
                        vec![OwnerReviewStatus::for_account(login, ReviewState::Pending)]
                    }
                    UnreviewedAccountPolicy::Omit => {
                        debug!("No review or request found for {} - omitted", owner);
                        Vec::new()
                    }
                },
            }
        }
        OwnerToken::Team { org, slug } => resolve_team(owner, org, slug, snapshot),
    }
}

fn account_state(login: &str, snapshot: &ReviewSnapshot) -> Option<ReviewState> {
    snapshot.user_state(login).or_else(|| {
        snapshot
            .is_user_pending(login)
            .then_some(ReviewState::Pending)
    })
}

fn resolve_team(
    team: &OwnerToken,
    org: &str,
    slug: &str,
    snapshot: &ReviewSnapshot,
) -> Vec<OwnerReviewStatus> {
    if let Some(review) = snapshot.team_latest.get(slug) {
        debug!("Team {} reviewed: {}", team, review.state);
        return vec![OwnerReviewStatus::for_team(
            team,
            review.state,
            review.by_user.clone(),
        )];
    }

    if snapshot.is_team_pending(slug) {
        return vec![OwnerReviewStatus::for_team(team, ReviewState::Pending, None)];
    }

    let key = format!("{}/{}", org, slug);
    let members: Vec<OwnerReviewStatus> = snapshot
        .members_of(&key)
        .iter()
        .filter_map(|login| {
            account_state(login, snapshot).map(|state| OwnerReviewStatus {
                owner: OwnerToken::account(login.as_str()),
                state,
                actor: Some(login.clone()),
                on_behalf_of: Some(team.clone()),
            })
        })
        .collect();

    if members.is_empty() {
        warn!("No review activity found for team {} - assuming Pending", team);
        return vec![OwnerReviewStatus::for_team(team, ReviewState::Pending, None)];
    }

    members
}
