//! The match repository as seen by the client, and its errors.

use crate::models::{
    GameMatch, MatchId, MatchResult, RankingEntry, RoundNumber, TiebreakerPairing,
    TournamentError, TournamentId, TournamentInfo,
};
use futures::future::BoxFuture;
use thiserror::Error;

/// Convenient result alias returning [`RepositoryError`] failures.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failures while talking to the match repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent or no response arrived.
    #[error("failed to send request to `{path}`")]
    Send {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The repository answered with a non-success status.
    #[error("unexpected response status {status} for `{path}`{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        path: String,
        status: u16,
        message: Option<String>,
    },
    /// Response payload could not be parsed.
    #[error("failed to decode response for `{path}`")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The in-process repository rejected the request.
    #[error(transparent)]
    Local(#[from] TournamentError),
}

/// Endpoints of the match repository consumed by the round client.
pub trait MatchRepository: Send + Sync {
    fn fetch_tournament(&self, tournament: TournamentId) -> BoxFuture<'static, RepositoryResult<TournamentInfo>>;
    /// `GET /api/tournaments/{id}/matches?round_number={n}`
    fn fetch_matches(
        &self,
        tournament: TournamentId,
        round: RoundNumber,
    ) -> BoxFuture<'static, RepositoryResult<Vec<GameMatch>>>;
    /// `PUT /api/matches/{id}`
    fn submit_result(&self, match_id: MatchId, result: MatchResult) -> BoxFuture<'static, RepositoryResult<()>>;
    /// `GET /api/tournaments/{id}/tiebreakers/check`
    fn check_tiebreakers(&self, tournament: TournamentId) -> BoxFuture<'static, RepositoryResult<Vec<TiebreakerPairing>>>;
    /// `POST /api/tournaments/{id}/tiebreakers`
    fn create_tiebreakers(&self, tournament: TournamentId) -> BoxFuture<'static, RepositoryResult<Vec<GameMatch>>>;
    /// `POST /api/next-round/{id}`. `None` when the round was created but its matches were not
    /// part of the answer.
    fn create_next_round(
        &self,
        tournament: TournamentId,
    ) -> BoxFuture<'static, RepositoryResult<Option<Vec<GameMatch>>>>;
    /// `GET /api/tournaments/{id}/rankings`
    fn fetch_rankings(&self, tournament: TournamentId) -> BoxFuture<'static, RepositoryResult<Vec<RankingEntry>>>;
}
