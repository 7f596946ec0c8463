//! Review states and per-owner review status.
//!
//! - [`snapshot`]: the materialized review data supplied by a collaborator
//! - [`resolver`]: turns one owner token into one or more statuses
//! - [`aggregate`]: reduces statuses to an overall state

pub mod aggregate;
pub mod resolver;
pub mod snapshot;

pub use aggregate::{aggregate_states, aggregate_statuses, filter_for, overall_state};
pub use resolver::{UnreviewedAccountPolicy, resolve_owner};
pub use snapshot::{ReviewEvent, ReviewLog, ReviewSnapshot, TeamReview, UserReview};

use crate::parse::OwnerToken;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The review state of an owner, a rule, or a whole change.
///
/// Variants are declared in precedence order, so the derived `Ord` is the
/// precedence: the minimum of a group is its aggregated state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum ReviewState {
    /// An owner asked for changes.
    ChangesRequested,
    /// An owner approved.
    Approved,
    /// An owner left comments only.
    Commented,
    /// An owner's review was dismissed.
    Dismissed,
    /// Review is requested or still outstanding.
    Pending,
    /// A platform state this engine does not recognize.
    Unknown,
}

impl ReviewState {
    /// Every state, in precedence order.
    pub const ALL: [ReviewState; 6] = [
        ReviewState::ChangesRequested,
        ReviewState::Approved,
        ReviewState::Commented,
        ReviewState::Dismissed,
        ReviewState::Pending,
        ReviewState::Unknown,
    ];

    /// Returns the precedence number; lower wins when aggregating.
    pub fn precedence(self) -> u8 {
        match self {
            ReviewState::ChangesRequested => 0,
            ReviewState::Approved => 1,
            ReviewState::Commented => 2,
            ReviewState::Dismissed => 3,
            ReviewState::Pending => 4,
            ReviewState::Unknown => 5,
        }
    }

    /// Maps a platform review state name to a [`ReviewState`].
    ///
    /// Matching is case-insensitive. Unrecognized names map to
    /// [`ReviewState::Unknown`] with a warning.
    pub fn from_platform(state: &str) -> Self {
        match state.to_ascii_uppercase().as_str() {
            "APPROVED" => ReviewState::Approved,
            "CHANGES_REQUESTED" => ReviewState::ChangesRequested,
            "COMMENTED" => ReviewState::Commented,
            "DISMISSED" => ReviewState::Dismissed,
            "PENDING" => ReviewState::Pending,
            "UNKNOWN" => ReviewState::Unknown,
            other => {
                warn!("Unknown review state: {} - mapping to Unknown", other);
                ReviewState::Unknown
            }
        }
    }

    /// Returns true for [`ReviewState::Approved`].
    pub fn is_approved(self) -> bool {
        self == ReviewState::Approved
    }

    /// Returns the platform name of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewState::ChangesRequested => "CHANGES_REQUESTED",
            ReviewState::Approved => "APPROVED",
            ReviewState::Commented => "COMMENTED",
            ReviewState::Dismissed => "DISMISSED",
            ReviewState::Pending => "PENDING",
            ReviewState::Unknown => "UNKNOWN",
        }
    }

    /// Returns the icon reporting tools show next to the state.
    pub fn icon(self) -> &'static str {
        match self {
            ReviewState::Approved => "✅",
            ReviewState::ChangesRequested => "❌",
            ReviewState::Commented => "💬",
            ReviewState::Dismissed => "🚫",
            ReviewState::Pending => "⏳",
            ReviewState::Unknown => "❓",
        }
    }
}

impl From<String> for ReviewState {
    fn from(state: String) -> Self {
        Self::from_platform(&state)
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReviewState::ChangesRequested => "Changes Requested",
            ReviewState::Approved => "Approved",
            ReviewState::Commented => "Commented",
            ReviewState::Dismissed => "Dismissed",
            ReviewState::Pending => "Pending",
            ReviewState::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// The review status attributed to one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerReviewStatus {
    /// The owner named on the rule.
    pub owner: OwnerToken,
    /// The owner's current state.
    pub state: ReviewState,
    /// The account that acted, when one is known.
    pub actor: Option<String>,
    /// The team the status counts for, when resolved through a team.
    pub on_behalf_of: Option<OwnerToken>,
}

impl OwnerReviewStatus {
    /// Creates a status for an account acting for itself.
    pub fn for_account(login: &str, state: ReviewState) -> Self {
        Self {
            owner: OwnerToken::account(login),
            state,
            actor: Some(login.to_string()),
            on_behalf_of: None,
        }
    }

    /// Creates a status for a team, optionally attributed to an actor.
    pub fn for_team(team: &OwnerToken, state: ReviewState, actor: Option<String>) -> Self {
        Self {
            owner: team.clone(),
            state,
            actor,
            on_behalf_of: Some(team.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_precedence() {
        for pair in ReviewState::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].precedence() < pair[1].precedence());
        }
    }

    #[test]
    fn from_platform_is_case_insensitive() {
        assert_eq!(ReviewState::from_platform("APPROVED"), ReviewState::Approved);
        assert_eq!(
            ReviewState::from_platform("changes_requested"),
            ReviewState::ChangesRequested
        );
        assert_eq!(ReviewState::from_platform("Dismissed"), ReviewState::Dismissed);
    }

    #[test]
    fn unrecognized_platform_state_is_unknown() {
        assert_eq!(ReviewState::from_platform("SUPERSEDED"), ReviewState::Unknown);
        assert_eq!(ReviewState::from_platform(""), ReviewState::Unknown);
    }

    #[test]
    fn serde_uses_platform_names() {
        let json = serde_json::to_string(&ReviewState::ChangesRequested).unwrap();
        assert_eq!(json, r#""CHANGES_REQUESTED""#);

        let parsed: ReviewState = serde_json::from_str(r#""commented""#).unwrap();
        assert_eq!(parsed, ReviewState::Commented);

        let unknown: ReviewState = serde_json::from_str(r#""LGTM""#).unwrap();
        assert_eq!(unknown, ReviewState::Unknown);
    }

    #[test]
    fn as_str_round_trips() {
        for state in ReviewState::ALL {
            assert_eq!(ReviewState::from_platform(state.as_str()), state);
        }
    }

    #[test]
    fn display_labels() {
        assert_eq!(ReviewState::ChangesRequested.to_string(), "Changes Requested");
        assert_eq!(ReviewState::Pending.to_string(), "Pending");
        assert_eq!(ReviewState::Approved.icon(), "✅");
    }

    #[test]
    fn team_status_is_on_behalf_of_team() {
        let team = OwnerToken::team("acme", "core");
        let status =
            OwnerReviewStatus::for_team(&team, ReviewState::Approved, Some("amy".into()));
        assert_eq!(status.owner, team);
        assert_eq!(status.on_behalf_of, Some(team));
        assert_eq!(status.actor.as_deref(), Some("amy"));
    }
}
