//! Round-by-round progression of a tournament as driven by the client.
//!
//! After every displayed match has a winner the orchestrator decides between finishing the
//! tournament, inserting tiebreakers after the group phase, or requesting the next regular round.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::client::repository::{MatchRepository, RepositoryError, RepositoryResult};
use crate::client::round_state::{RoundState, SelectionError, SubmissionStatus};
use crate::client::submitter;
use crate::models::{GameMatch, MatchId, PlayerId, RoundNumber, TournamentId};

/// Shown when advancing with undecided matches.
pub const INCOMPLETE_MESSAGE: &str = "Not all winners have been selected";

/// What a successful [`RoundOrchestrator::advance`] led to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Advance {
    /// Tiebreaker matches replaced the displayed set; the round number is unchanged.
    Tiebreaker { matches: Vec<GameMatch> },
    /// The next regular round is displayed.
    NextRound {
        round: RoundNumber,
        matches: Vec<GameMatch>,
    },
    /// No further round exists. Show the rankings next.
    Finished,
}

#[derive(Debug, Error)]
pub enum AdvanceError {
    #[error("an advance is already in progress")]
    AlreadyAdvancing,
    #[error("the tournament is already finished")]
    Finished,
    #[error("Not all winners have been selected (missing: {missing:?})")]
    IncompleteSelection { missing: Vec<MatchId> },
    #[error("Error checking for tiebreakers")]
    TiebreakerCheck(#[source] RepositoryError),
    #[error("Error creating tiebreaker matches")]
    TiebreakerCreate(#[source] RepositoryError),
    #[error("Error creating next round matches")]
    NextRound(#[source] RepositoryError),
}

/// Clears the in-flight flag when an advance ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the round state of one tournament and talks to the repository on its behalf.
///
/// The state lock is never held across an `.await`, so selections can be recorded while an
/// advance is waiting for the repository.
pub struct RoundOrchestrator<R> {
    repository: R,
    tournament_id: TournamentId,
    state: Mutex<RoundState>,
    advancing: AtomicBool,
}

impl<R: MatchRepository> RoundOrchestrator<R> {
    /// Fetch the matches of `round` and start from there.
    pub async fn open(repository: R, tournament_id: TournamentId, round: RoundNumber) -> RepositoryResult<Self> {
        let matches = repository.fetch_matches(tournament_id, round).await?;
        log::info!(
            "Opened tournament {tournament_id} at round {round} ({} matches)",
            matches.len()
        );
        Ok(Self::new(repository, tournament_id, RoundState::new(round, matches)))
    }

    pub fn new(repository: R, tournament_id: TournamentId, state: RoundState) -> Self {
        Self {
            repository,
            tournament_id,
            state: Mutex::new(state),
            advancing: AtomicBool::new(false),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn tournament_id(&self) -> TournamentId {
        self.tournament_id
    }

    fn lock(&self) -> MutexGuard<'_, RoundState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A copy of the current round state.
    pub fn state(&self) -> RoundState {
        self.lock().clone()
    }

    /// Fetch the displayed round again, dropping local selections that were never persisted.
    pub async fn reload(&self) -> RepositoryResult<()> {
        let (round, is_tiebreaker) = {
            let state = self.lock();
            (state.round(), state.is_tiebreaker())
        };
        if is_tiebreaker {
            // tiebreakers are not served by the matches endpoint
            return Ok(());
        }
        let matches = self.repository.fetch_matches(self.tournament_id, round).await?;
        self.lock().load_round(round, matches);
        Ok(())
    }

    /// Select the winner (and second place) of a displayed match and persist it.
    ///
    /// The selection is kept locally even if persisting fails; the returned status tells whether
    /// it was stored. If the match set changed in the meantime the answer is discarded and
    /// `Ok(None)` is returned.
    pub async fn record_result(
        &self,
        match_id: MatchId,
        winner_id: PlayerId,
        second_place_id: Option<PlayerId>,
    ) -> Result<Option<SubmissionStatus>, SelectionError> {
        let submission = self
            .lock()
            .record_selection(match_id, winner_id, second_place_id)?;
        let outcome = submitter::submit(&self.repository, &submission)
            .await
            .map_err(|e| e.to_string());

        let mut state = self.lock();
        if !state.settle(&submission, outcome) {
            log::debug!("Discarded stale answer for match {match_id}");
            return Ok(None);
        }
        Ok(state.submission_status(match_id).cloned())
    }

    /// Move the tournament forward from the displayed match set.
    ///
    /// Tiebreakers are only looked for on round 1 while the regular group matches are shown.
    /// Once a tiebreaker set has been played the next advance goes straight to the next round,
    /// so ties are checked at most once per tournament.
    pub async fn advance(&self) -> Result<Advance, AdvanceError> {
        if self.advancing.swap(true, Ordering::AcqRel) {
            return Err(AdvanceError::AlreadyAdvancing);
        }
        let _in_flight = InFlight(&self.advancing);

        let (round, is_tiebreaker) = {
            let mut state = self.lock();
            if state.is_finished() {
                return Err(AdvanceError::Finished);
            }
            let missing = state.missing_winners();
            if !missing.is_empty() {
                state.set_error(INCOMPLETE_MESSAGE);
                return Err(AdvanceError::IncompleteSelection { missing });
            }
            if state.is_final() {
                state.mark_finished();
                log::info!("Tournament {} finished after round {}", self.tournament_id, state.round());
                return Ok(Advance::Finished);
            }
            (state.round(), state.is_tiebreaker())
        };

        if round == 1 && !is_tiebreaker {
            let pairings = self
                .repository
                .check_tiebreakers(self.tournament_id)
                .await
                .map_err(|e| self.fail(AdvanceError::TiebreakerCheck(e)))?;
            if !pairings.is_empty() {
                let matches = self
                    .repository
                    .create_tiebreakers(self.tournament_id)
                    .await
                    .map_err(|e| self.fail(AdvanceError::TiebreakerCreate(e)))?;
                if !matches.is_empty() {
                    log::info!(
                        "Tournament {}: {} tiebreaker matches",
                        self.tournament_id,
                        matches.len()
                    );
                    self.lock().load_tiebreakers(matches.clone());
                    return Ok(Advance::Tiebreaker { matches });
                }
                log::warn!(
                    "Tournament {}: {} ties reported but no tiebreaker matches created",
                    self.tournament_id,
                    pairings.len()
                );
            }
        }

        let next = round + 1;
        let created = self
            .repository
            .create_next_round(self.tournament_id)
            .await
            .map_err(|e| self.fail(AdvanceError::NextRound(e)))?;
        let matches = match created {
            Some(matches) => matches,
            None => self
                .repository
                .fetch_matches(self.tournament_id, next)
                .await
                .map_err(|e| self.fail(AdvanceError::NextRound(e)))?,
        };

        let mut state = self.lock();
        if matches.is_empty() {
            state.mark_finished();
            log::info!("Tournament {} finished after round {round}", self.tournament_id);
            return Ok(Advance::Finished);
        }
        log::info!(
            "Tournament {}: round {next} with {} matches",
            self.tournament_id,
            matches.len()
        );
        state.load_round(next, matches.clone());
        Ok(Advance::NextRound { round: next, matches })
    }

    fn fail(&self, error: AdvanceError) -> AdvanceError {
        match std::error::Error::source(&error) {
            Some(source) => log::error!("{error}: {source}"),
            None => log::error!("{error}"),
        }
        self.lock().set_error(error.to_string());
        error
    }
}
