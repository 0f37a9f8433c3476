//! Persisting a single match selection.

use crate::client::repository::{MatchRepository, RepositoryResult};
use crate::client::round_state::Submission;

/// Send one selection to the repository. Sending the same result twice is harmless, the last
/// write wins.
pub async fn submit<R>(repository: &R, submission: &Submission) -> RepositoryResult<()>
where
    R: MatchRepository + ?Sized,
{
    let outcome = repository
        .submit_result(submission.match_id, submission.result)
        .await;
    match &outcome {
        Ok(()) => log::info!(
            "Stored result of match {}: winner {}, second place {:?}",
            submission.match_id,
            submission.result.winner_id,
            submission.result.second_place_id
        ),
        Err(e) => log::warn!("Failed to store result of match {}: {e}", submission.match_id),
    }
    outcome
}
