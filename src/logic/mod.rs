//! Tournament business logic: setup, group play, tiebreakers, knockout, rankings.

mod group_play;
mod knockout;
mod rankings;
mod setup;

pub use group_play::{
    advancing_field, check_tiebreakers, create_tiebreaker_matches, group_standings, Standing,
    SECOND_PLACE_POINTS, WIN_POINTS,
};
pub use knockout::{create_next_round, seat_bracket};
pub use rankings::compute_rankings;
pub use setup::{auto_group_count, create_tournament};

use crate::models::{GameMatch, MatchId, MatchResult, Tournament, TournamentError};

/// Sequential match ids, shared by every tournament of a registry.
#[derive(Clone, Debug)]
pub struct MatchIds {
    next: MatchId,
}

impl MatchIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> MatchId {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for MatchIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Record the result of a match (regular or tiebreaker). Repeating the same result is a no-op.
///
/// Only the open set takes results: the current round's matches, or its tiebreakers once
/// those exist. Earlier rounds and finished tournaments are closed.
pub fn set_match_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    result: &MatchResult,
) -> Result<GameMatch, TournamentError> {
    if tournament.find_match(match_id).is_none() {
        return Err(TournamentError::MatchNotFound(match_id));
    }
    if tournament.finished {
        return Err(TournamentError::TournamentFinished);
    }
    let current = tournament
        .rounds
        .last_mut()
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    let open = if current.tiebreakers.is_empty() {
        &mut current.matches
    } else {
        &mut current.tiebreakers
    };
    let game = open
        .iter_mut()
        .find(|m| m.match_id == match_id)
        .ok_or(TournamentError::MatchClosed(match_id))?;
    game.set_result(result)?;
    Ok(game.clone())
}
