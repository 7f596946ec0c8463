//! Reduction of review statuses to a single state.

use super::{OwnerReviewStatus, ReviewState};

/// Reduces a group of states to the one with the lowest precedence.
///
/// An empty group is [`ReviewState::Pending`].
pub fn aggregate_states<I>(states: I) -> ReviewState
where
    I: IntoIterator<Item = ReviewState>,
{
    states.into_iter().min().unwrap_or(ReviewState::Pending)
}

/// Reduces the statuses of one rule to its overall state.
pub fn aggregate_statuses(statuses: &[OwnerReviewStatus]) -> ReviewState {
    aggregate_states(statuses.iter().map(|s| s.state))
}

/// Reduces per-rule states to a state for the whole change.
///
/// Changes requested anywhere wins, then anything still pending. The change
/// is approved only when every rule is.
pub fn overall_state<I>(states: I) -> ReviewState
where
    I: IntoIterator<Item = ReviewState>,
{
    let states: Vec<ReviewState> = states.into_iter().collect();
    if states.is_empty() {
        return ReviewState::Pending;
    }

    let any = |wanted: ReviewState| states.contains(&wanted);
    if any(ReviewState::ChangesRequested) {
        ReviewState::ChangesRequested
    } else if any(ReviewState::Pending) {
        ReviewState::Pending
    } else if any(ReviewState::Commented) {
        ReviewState::Commented
    } else if any(ReviewState::Dismissed) {
        ReviewState::Dismissed
    } else if states.iter().all(|s| s.is_approved()) {
        ReviewState::Approved
    } else {
        ReviewState::Unknown
    }
}

/// Returns the statuses in the given state.
pub fn filter_for(statuses: &[OwnerReviewStatus], state: ReviewState) -> Vec<&OwnerReviewStatus> {
    statuses.iter().filter(|s| s.state == state).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReviewState::*;

    #[test]
    fn single_group_precedence() {
        assert_eq!(aggregate_states([ChangesRequested, Approved]), ChangesRequested);
        assert_eq!(aggregate_states([Approved, Commented]), Approved);
        assert_eq!(aggregate_states([Unknown, Dismissed, Pending]), Dismissed);
        assert_eq!(aggregate_states([]), Pending);
    }

    #[test]
    fn single_group_is_order_independent() {
        assert_eq!(
            aggregate_states([Pending, Commented, Approved]),
            aggregate_states([Approved, Pending, Commented])
        );
    }

    #[test]
    fn aggregate_statuses_uses_states() {
        let statuses = vec![
            OwnerReviewStatus::for_account("amy", Commented),
            OwnerReviewStatus::for_account("bob", Approved),
        ];
        assert_eq!(aggregate_statuses(&statuses), Approved);
        assert_eq!(aggregate_statuses(&[]), Pending);
    }

    #[test]
    fn cross_rule_reduction() {
        assert_eq!(overall_state([Approved, ChangesRequested, Pending]), ChangesRequested);
        assert_eq!(overall_state([Approved, Pending, Commented]), Pending);
        assert_eq!(overall_state([Approved, Commented]), Commented);
        assert_eq!(overall_state([Dismissed, Approved]), Dismissed);
        assert_eq!(overall_state([Approved, Approved]), Approved);
        assert_eq!(overall_state([Approved, Unknown]), Unknown);
        assert_eq!(overall_state([]), Pending);
    }

    #[test]
    fn filter_for_selects_matching_state() {
        let statuses = vec![
            OwnerReviewStatus::for_account("amy", Approved),
            OwnerReviewStatus::for_account("bob", Pending),
            OwnerReviewStatus::for_account("cat", Approved),
        ];
        let approved = filter_for(&statuses, Approved);
        assert_eq!(approved.len(), 2);
        assert_eq!(approved[1].actor.as_deref(), Some("cat"));
        assert!(filter_for(&statuses, Dismissed).is_empty());
    }
}
