//! Setup: create a tournament, deal players into groups, generate round 1.

use crate::logic::knockout::seat_bracket;
use crate::logic::MatchIds;
use crate::models::{
    GameMatch, Group, GroupCount, GroupStageFormat, KnockoutFormat, NewTournament, Player, Round,
    Tournament, TournamentError, TournamentId,
};
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

/// Number of groups picked for `"Auto"`: up to 6 players play in one group, up to 12 in two,
/// up to 18 in three, anything above in four.
pub fn auto_group_count(players: usize) -> u32 {
    match players {
        0..=6 => 1,
        7..=12 => 2,
        13..=18 => 3,
        _ => 4,
    }
}

/// Create a tournament with its first round.
///
/// 1. Validate name, player count, formats and group count.
/// 2. Shuffle the players.
/// 3. With a group stage: deal them round-robin into groups and pair everyone inside each group
///    (twice for double round robin).
/// 4. Without one: round 1 is the first knockout round.
pub fn create_tournament<R: Rng + ?Sized>(
    id: TournamentId,
    request: &NewTournament,
    mut players: Vec<Player>,
    date: NaiveDate,
    match_ids: &mut MatchIds,
    rng: &mut R,
) -> Result<Tournament, TournamentError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyName);
    }
    if players.len() < 2 {
        return Err(TournamentError::NotEnoughPlayers);
    }
    if request.knock_out_stage_format_id == KnockoutFormat::DoubleElimination {
        return Err(TournamentError::UnsupportedFormat("Double elimination"));
    }
    if request.advancing_players == 0 {
        return Err(TournamentError::NoAdvancingPlayers);
    }

    players.shuffle(rng);

    let mut tournament = Tournament {
        id,
        name: name.to_string(),
        date,
        group_stage_format: request.group_stage_format_id,
        knockout_format: request.knock_out_stage_format_id,
        group_count: request.num_groups,
        advancing_players: request.advancing_players,
        players,
        groups: Vec::new(),
        rounds: Vec::new(),
        finished: false,
    };

    let first_round = if request.group_stage_format_id.has_groups() {
        let group_count = match request.num_groups {
            GroupCount::Auto => auto_group_count(tournament.players.len()),
            GroupCount::Fixed(n) => n,
        };
        if tournament.players.len() < group_count as usize * 2 {
            return Err(TournamentError::TooManyGroups {
                players: tournament.players.len(),
                groups: group_count,
            });
        }
        tournament.groups = deal_groups(&tournament.players, group_count);
        let legs = match request.group_stage_format_id {
            GroupStageFormat::DoubleRoundRobin => 2,
            _ => 1,
        };
        let matches = tournament
            .groups
            .iter()
            .flat_map(|g| group_matches(g, legs, match_ids))
            .collect();
        Round::new(1, matches)
    } else {
        Round::new(1, seat_bracket(&tournament.players, match_ids))
    };

    log::info!(
        "Created tournament {} '{}' with {} players, {} groups, {} matches in round 1",
        tournament.id,
        tournament.name,
        tournament.players.len(),
        tournament.groups.len(),
        first_round.matches.len()
    );
    tournament.rounds.push(first_round);
    Ok(tournament)
}

/// Deal players (already shuffled) into `count` groups: player i goes to group i % count.
fn deal_groups(players: &[Player], count: u32) -> Vec<Group> {
    let mut groups: Vec<Group> = (1..=count)
        .map(|number| Group {
            number,
            name: format!("Group {number}"),
            players: Vec::new(),
        })
        .collect();
    for (i, player) in players.iter().enumerate() {
        groups[i % count as usize].players.push(player.clone());
    }
    groups
}

/// Every pairing inside a group; the second leg swaps player order.
fn group_matches(group: &Group, legs: u32, match_ids: &mut MatchIds) -> Vec<GameMatch> {
    let p = &group.players;
    let mut matches = Vec::new();
    for leg in 0..legs {
        for i in 0..p.len() {
            for j in (i + 1)..p.len() {
                let (a, b) = if leg == 0 { (i, j) } else { (j, i) };
                matches.push(GameMatch::new(
                    match_ids.next_id(),
                    Some(group.number),
                    p[a].clone(),
                    p[b].clone(),
                ));
            }
        }
    }
    matches
}
