//! First-committed arbitration over subscriber outcomes
//!
//! Outcomes are given in subscriber registration order. Completion order
//! never matters.

use oicp_core::RemoteCommandOutcome;

/// The arbitrated outcome of a remote command
///
/// First outcome that is not `Unspecified`; `Error` when every subscriber
/// stayed unspecified or there were none.
pub fn arbitrate(outcomes: &[RemoteCommandOutcome]) -> RemoteCommandOutcome {
    outcomes
        .iter()
        .copied()
        .find(|outcome| *outcome != RemoteCommandOutcome::Unspecified)
        .unwrap_or(RemoteCommandOutcome::Error)
}

/// First answer offered, where `None` means "no opinion"
pub fn first_committed<T>(answers: impl IntoIterator<Item = Option<T>>) -> Option<T> {
    answers.into_iter().flatten().next()
}
