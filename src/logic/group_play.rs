//! Group stage: standings, tiebreaker detection and advancement.

use crate::logic::MatchIds;
use crate::models::{
    GameMatch, Group, Player, PlayerId, TiebreakerPairing, Tournament, TournamentError,
};

/// Points for winning a match.
pub const WIN_POINTS: u32 = 2;
/// Points for second place in a three-player match (half a win).
pub const SECOND_PLACE_POINTS: u32 = 1;

/// A player's position within a group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Standing {
    pub player: Player,
    /// From the group matches.
    pub points: u32,
    /// From tiebreaker matches; only used to order players with equal `points`.
    pub tiebreak_points: u32,
}

fn points_in<'a>(matches: impl Iterator<Item = &'a GameMatch>, player_id: PlayerId) -> u32 {
    matches
        .map(|m| {
            if m.winner_id == Some(player_id) {
                WIN_POINTS
            } else if m.second_place_id == Some(player_id) {
                SECOND_PLACE_POINTS
            } else {
                0
            }
        })
        .sum()
}

/// Standings of one group after round 1, best first. Equal points are ordered by tiebreaker
/// points, then by seeding order.
pub fn group_standings(tournament: &Tournament, group: &Group) -> Vec<Standing> {
    let Some(round) = tournament.round(1) else {
        return Vec::new();
    };
    let in_group = |m: &&GameMatch| m.group_number == Some(group.number);
    let mut standings: Vec<Standing> = group
        .players
        .iter()
        .map(|p| Standing {
            player: p.clone(),
            points: points_in(round.matches.iter().filter(in_group), p.player_id),
            tiebreak_points: points_in(round.tiebreakers.iter().filter(in_group), p.player_id),
        })
        .collect();
    // stable: seeding order survives full ties
    standings.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.tiebreak_points.cmp(&a.tiebreak_points))
    });
    standings
}

/// Players sharing the score at the advancement cut, if the cut splits them.
fn tied_at_cut(standings: &[Standing], advancing: usize) -> Option<Vec<Player>> {
    if advancing == 0 || standings.len() <= advancing {
        return None;
    }
    let cut = standings[advancing - 1].points;
    if standings[advancing].points != cut {
        return None;
    }
    Some(
        standings
            .iter()
            .filter(|s| s.points == cut)
            .map(|s| s.player.clone())
            .collect(),
    )
}

/// Split tied players into tiebreaker pairings: an odd count yields one three-player match
/// from the last three, the rest play in pairs.
fn pairings_for(mut tied: Vec<Player>, group_number: u32) -> Vec<TiebreakerPairing> {
    let mut pairings = Vec::new();
    if tied.len() % 2 == 1 && tied.len() >= 3 {
        let mut trio = tied.split_off(tied.len() - 3).into_iter();
        if let (Some(player1), Some(player2), Some(player3)) = (trio.next(), trio.next(), trio.next()) {
            pairings.push(TiebreakerPairing {
                group_number: Some(group_number),
                player1,
                player2,
                player3: Some(player3),
            });
        }
    }
    for pair in tied.chunks_exact(2) {
        pairings.push(TiebreakerPairing {
            group_number: Some(group_number),
            player1: pair[0].clone(),
            player2: pair[1].clone(),
            player3: None,
        });
    }
    pairings
}

/// Tiebreakers needed before the knockout stage can be seeded.
///
/// Empty when the tournament has no group phase, is past round 1, or already played its
/// tiebreakers (tiebreakers are never nested).
pub fn check_tiebreakers(tournament: &Tournament) -> Result<Vec<TiebreakerPairing>, TournamentError> {
    if !tournament.has_group_phase() {
        return Ok(Vec::new());
    }
    let round = tournament.round(1).ok_or(TournamentError::RoundNotFound {
        tournament: tournament.id,
        round: 1,
    })?;
    if tournament.rounds.len() > 1 || !round.tiebreakers.is_empty() {
        return Ok(Vec::new());
    }
    if !round.matches.iter().all(GameMatch::is_decided) {
        return Err(TournamentError::IncompleteResults);
    }

    let advancing = tournament.advancing_players as usize;
    let pairings: Vec<TiebreakerPairing> = tournament
        .groups
        .iter()
        .filter_map(|g| {
            tied_at_cut(&group_standings(tournament, g), advancing).map(|tied| (g.number, tied))
        })
        .flat_map(|(number, tied)| pairings_for(tied, number))
        .collect();
    if !pairings.is_empty() {
        log::info!(
            "Tournament {}: {} tiebreaker(s) pending",
            tournament.id,
            pairings.len()
        );
    }
    Ok(pairings)
}

/// Create the tiebreaker matches for round 1 and return them. Once created they are returned
/// again instead of being regenerated.
pub fn create_tiebreaker_matches(
    tournament: &mut Tournament,
    match_ids: &mut MatchIds,
) -> Result<Vec<GameMatch>, TournamentError> {
    if !tournament.has_group_phase() || tournament.rounds.len() != 1 {
        return Err(TournamentError::NoTiebreakerPhase);
    }
    let id = tournament.id;
    if let Some(existing) = tournament.round(1).map(|r| r.tiebreakers.clone()) {
        if !existing.is_empty() {
            return Ok(existing);
        }
    }
    let matches: Vec<GameMatch> = check_tiebreakers(tournament)?
        .into_iter()
        .map(|p| {
            let m = GameMatch::new(match_ids.next_id(), p.group_number, p.player1, p.player2);
            match p.player3 {
                Some(third) => m.with_third(third),
                None => m,
            }
        })
        .collect();
    let round = tournament
        .round_mut(1)
        .ok_or(TournamentError::RoundNotFound { tournament: id, round: 1 })?;
    round.tiebreakers = matches.clone();
    log::info!("Tournament {}: created {} tiebreaker match(es)", id, matches.len());
    Ok(matches)
}

/// The knockout field after the group phase, best seed first: every group's winner (groups in
/// order), then every runner-up, and so on down to `advancing_players` per group.
pub fn advancing_field(tournament: &Tournament) -> Vec<Player> {
    let standings: Vec<Vec<Standing>> = tournament
        .groups
        .iter()
        .map(|g| group_standings(tournament, g))
        .collect();
    (0..tournament.advancing_players as usize)
        .flat_map(|place| standings.iter().filter_map(move |s| s.get(place)))
        .map(|s| s.player.clone())
        .collect()
}
