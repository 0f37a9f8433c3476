//! Knockout stage: seeding the bracket and generating the next round.

use crate::logic::group_play::advancing_field;
use crate::logic::MatchIds;
use crate::models::{GameMatch, KnockoutFormat, Player, Round, Tournament, TournamentError};

/// Seat a seeded field into the first knockout round (field[0] is the top seed).
///
/// Seeds are laid out in standard bracket order (1 v 8, 4 v 5, 2 v 7, 3 v 6) with the seeds
/// a short field lacks left out, then paired like any later round.
pub fn seat_bracket(field: &[Player], match_ids: &mut MatchIds) -> Vec<GameMatch> {
    let size = field.len().next_power_of_two();
    let ordered: Vec<Player> = bracket_order(size)
        .into_iter()
        .filter_map(|seed| field.get(seed).cloned())
        .collect();
    pair_up(&ordered, match_ids)
}

/// Seed positions (0-based) in bracket order for a bracket of `size` (a power of two).
fn bracket_order(size: usize) -> Vec<usize> {
    let mut order = vec![0];
    while order.len() < size {
        let n = order.len() * 2;
        order = order.iter().flat_map(|&s| [s, n - 1 - s]).collect();
    }
    order
}

/// Pair neighbours of an ordered field. An odd player out joins the last pairing as a third
/// participant, so nobody advances without playing.
///
/// A field of 2 or 3 gives the single final match; any larger field plays at least two.
fn pair_up(field: &[Player], match_ids: &mut MatchIds) -> Vec<GameMatch> {
    let pairs = field.chunks_exact(2);
    let odd = pairs.remainder().first().cloned();
    let mut matches: Vec<GameMatch> = pairs
        .map(|pair| GameMatch::new(match_ids.next_id(), None, pair[0].clone(), pair[1].clone()))
        .collect();
    if let (Some(last), Some(odd)) = (matches.last_mut(), odd) {
        last.player3 = Some(odd);
    }
    matches
}

/// Winners of a decided round, in match order.
fn survivors(round: &Round) -> Result<Vec<Player>, TournamentError> {
    round
        .matches
        .iter()
        .map(|m| {
            m.winner_id
                .and_then(|id| m.participant(id))
                .cloned()
                .ok_or(TournamentError::IncompleteResults)
        })
        .collect()
}

/// Generate the next round and return its matches.
///
/// 1. Every match (and tiebreaker) of the current round needs a winner.
/// 2. After the group phase: seed the advancing players into a bracket, or finish the
///    tournament if there is no knockout stage.
/// 3. Otherwise pair the winners of the current round.
/// 4. A field of one (or none) finishes the tournament; the returned list is then empty.
pub fn create_next_round(
    tournament: &mut Tournament,
    match_ids: &mut MatchIds,
) -> Result<Vec<GameMatch>, TournamentError> {
    if tournament.finished {
        return Err(TournamentError::TournamentFinished);
    }
    let current = tournament
        .current_round()
        .ok_or(TournamentError::RoundNotFound {
            tournament: tournament.id,
            round: 1,
        })?;
    if !current.is_decided() {
        return Err(TournamentError::IncompleteResults);
    }
    let number = current.number + 1;
    let after_groups = current.number == 1 && tournament.has_group_phase();

    if after_groups && tournament.knockout_format == KnockoutFormat::NoKnockout {
        log::info!("Tournament {} finished after the group phase", tournament.id);
        tournament.finished = true;
        return Ok(Vec::new());
    }

    let field = if after_groups {
        advancing_field(tournament)
    } else {
        survivors(current)?
    };
    if field.len() < 2 {
        log::info!(
            "Tournament {} finished in round {} ({} player(s) left)",
            tournament.id,
            current.number,
            field.len()
        );
        tournament.finished = true;
        return Ok(Vec::new());
    }

    let matches = if after_groups {
        seat_bracket(&field, match_ids)
    } else {
        pair_up(&field, match_ids)
    };
    log::info!(
        "Tournament {}: round {} with {} matches for {} players",
        tournament.id,
        number,
        matches.len(),
        field.len()
    );
    tournament.rounds.push(Round::new(number, matches.clone()));
    Ok(matches)
}
