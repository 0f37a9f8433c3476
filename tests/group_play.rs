//! Integration tests for the group phase: creation, standings, tiebreakers and advancement.

use dart_tournament_rounds::logic::{auto_group_count, group_standings, WIN_POINTS};
use dart_tournament_rounds::models::{GroupCount, GroupStageFormat, KnockoutFormat, NewTournament};
use dart_tournament_rounds::{GameMatch, MatchResult, PlayerId, Registry, TournamentError, TournamentId};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn registry_with_players(n: usize) -> (Registry, Vec<PlayerId>) {
    let mut registry = Registry::new();
    let ids = (0..n)
        .map(|i| registry.add_player(&format!("P{i}")).unwrap().player_id)
        .collect();
    (registry, ids)
}

fn create(registry: &mut Registry, request: &NewTournament) -> Result<TournamentId, TournamentError> {
    registry.create_tournament_with_rng(request, &mut StdRng::seed_from_u64(7))
}

fn decide_round(registry: &mut Registry, id: TournamentId, pick: impl Fn(usize, &GameMatch) -> MatchResult) {
    let matches = registry.round(id, None).unwrap().matches.clone();
    for (i, m) in matches.iter().enumerate() {
        registry.set_match_result(m.match_id, &pick(i, m)).unwrap();
    }
}

#[test]
fn auto_group_count_follows_player_count() {
    assert_eq!(auto_group_count(2), 1);
    assert_eq!(auto_group_count(6), 1);
    assert_eq!(auto_group_count(7), 2);
    assert_eq!(auto_group_count(12), 2);
    assert_eq!(auto_group_count(18), 3);
    assert_eq!(auto_group_count(19), 4);
}

#[test]
fn create_requires_at_least_2_players() {
    let (mut registry, ids) = registry_with_players(1);
    assert_eq!(
        create(&mut registry, &NewTournament::new("Solo", ids)),
        Err(TournamentError::NotEnoughPlayers)
    );
}

#[test]
fn create_rejects_groups_with_fewer_than_2_players() {
    let (mut registry, ids) = registry_with_players(3);
    let mut request = NewTournament::new("Thin", ids);
    request.num_groups = GroupCount::Fixed(2);
    assert_eq!(
        create(&mut registry, &request),
        Err(TournamentError::TooManyGroups { players: 3, groups: 2 })
    );
}

#[test]
fn create_rejects_duplicate_names_and_double_elimination() {
    let (mut registry, ids) = registry_with_players(4);
    create(&mut registry, &NewTournament::new("Cup", ids.clone())).unwrap();
    assert_eq!(
        create(&mut registry, &NewTournament::new(" cup ", ids.clone())),
        Err(TournamentError::DuplicateTournamentName)
    );

    let mut request = NewTournament::new("Other", ids);
    request.knock_out_stage_format_id = KnockoutFormat::DoubleElimination;
    assert!(matches!(
        create(&mut registry, &request),
        Err(TournamentError::UnsupportedFormat(_))
    ));
}

#[test]
fn round_robin_pairs_everyone_inside_each_group() {
    let (mut registry, ids) = registry_with_players(8);
    let id = create(&mut registry, &NewTournament::new("Eight", ids.clone())).unwrap();
    let tournament = registry.tournament(id).unwrap();
    assert_eq!(tournament.groups.len(), 2);
    let round = tournament.round(1).unwrap();
    // two groups of four: 6 pairings each
    assert_eq!(round.matches.len(), 12);
    for group in &tournament.groups {
        assert_eq!(group.players.len(), 4);
        for m in round.matches.iter().filter(|m| m.group_number == Some(group.number)) {
            assert!(group.players.contains(&m.player1));
            assert!(group.players.contains(&m.player2));
        }
    }

    let mut request = NewTournament::new("Twice", ids);
    request.group_stage_format_id = GroupStageFormat::DoubleRoundRobin;
    request.num_groups = GroupCount::Fixed(1);
    let id = create(&mut registry, &request).unwrap();
    assert_eq!(registry.matches(id, Some(1)).unwrap().len(), 56);
}

#[test]
fn result_must_name_participants() {
    let (mut registry, ids) = registry_with_players(3);
    let id = create(&mut registry, &NewTournament::new("Three", ids)).unwrap();
    let m = registry.matches(id, Some(1)).unwrap()[0].clone();
    let outsider = registry
        .tournament(id)
        .unwrap()
        .players
        .iter()
        .map(|p| p.player_id)
        .find(|&p| !m.has_participant(p))
        .unwrap();

    assert_eq!(
        registry.set_match_result(m.match_id, &MatchResult::new(outsider, None)),
        Err(TournamentError::NotAParticipant { match_id: m.match_id, player_id: outsider })
    );
    let winner = m.player1.player_id;
    assert_eq!(
        registry.set_match_result(m.match_id, &MatchResult::new(winner, Some(winner))),
        Err(TournamentError::SecondPlaceIsWinner(m.match_id))
    );
    assert_eq!(
        registry.set_match_result(999, &MatchResult::new(winner, None)),
        Err(TournamentError::MatchNotFound(999))
    );
}

#[test]
fn clear_standings_need_no_tiebreaker() {
    let (mut registry, ids) = registry_with_players(4);
    let id = create(&mut registry, &NewTournament::new("Clear", ids)).unwrap();
    // first-seeded player of every pairing wins: points 6, 4, 2, 0
    decide_round(&mut registry, id, |_, m| MatchResult::new(m.player1.player_id, None));

    let tournament = registry.tournament(id).unwrap();
    let standings = group_standings(tournament, &tournament.groups[0]);
    let points: Vec<u32> = standings.iter().map(|s| s.points).collect();
    assert_eq!(points, vec![3 * WIN_POINTS, 2 * WIN_POINTS, WIN_POINTS, 0]);
    let top_two: Vec<_> = standings[..2].iter().map(|s| s.player.clone()).collect();

    assert!(registry.check_tiebreakers(id).unwrap().is_empty());
    let next = registry.next_round(id).unwrap();
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].player1, top_two[0]);
    assert_eq!(next[0].player2, top_two[1]);
    assert_eq!(next[0].group_number, None);
}

#[test]
fn three_way_tie_gets_one_three_player_tiebreaker() {
    let (mut registry, ids) = registry_with_players(3);
    let mut request = NewTournament::new("Cycle", ids);
    request.advancing_players = 2;
    let id = create(&mut registry, &request).unwrap();
    // pairings (0,1), (0,2), (1,2): 0 beats 1, 2 beats 0, 1 beats 2
    decide_round(&mut registry, id, |i, m| {
        let winner = if i == 1 { &m.player2 } else { &m.player1 };
        MatchResult::new(winner.player_id, None)
    });

    let pairings = registry.check_tiebreakers(id).unwrap();
    assert_eq!(pairings.len(), 1);
    assert!(pairings[0].player3.is_some());
    assert_eq!(pairings[0].group_number, Some(1));

    let tiebreakers = registry.create_tiebreakers(id).unwrap();
    assert_eq!(tiebreakers.len(), 1);
    let tiebreaker = tiebreakers[0].clone();
    // created once, returned again, never nested
    assert_eq!(registry.create_tiebreakers(id).unwrap(), tiebreakers);
    assert!(registry.check_tiebreakers(id).unwrap().is_empty());
    assert_eq!(registry.next_round(id), Err(TournamentError::IncompleteResults));
    // group results are settled once tiebreakers exist
    let group_match = registry.matches(id, Some(1)).unwrap()[0].clone();
    assert_eq!(
        registry.set_match_result(group_match.match_id, &MatchResult::new(group_match.player2.player_id, None)),
        Err(TournamentError::MatchClosed(group_match.match_id))
    );

    let third = tiebreaker.player3.clone().unwrap();
    registry
        .set_match_result(
            tiebreaker.match_id,
            &MatchResult::new(third.player_id, Some(tiebreaker.player1.player_id)),
        )
        .unwrap();
    let next = registry.next_round(id).unwrap();
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].player1, third);
    assert_eq!(next[0].player2, tiebreaker.player1);
}

#[test]
fn tie_above_the_cut_is_not_a_tiebreaker() {
    let (mut registry, ids) = registry_with_players(3);
    let mut request = NewTournament::new("All through", ids);
    request.advancing_players = 3;
    let id = create(&mut registry, &request).unwrap();
    decide_round(&mut registry, id, |i, m| {
        let winner = if i == 1 { &m.player2 } else { &m.player1 };
        MatchResult::new(winner.player_id, None)
    });
    assert!(registry.check_tiebreakers(id).unwrap().is_empty());
    assert_eq!(
        registry.create_tiebreakers(id).unwrap(),
        Vec::<GameMatch>::new()
    );
}

#[test]
fn check_requires_decided_group_matches() {
    let (mut registry, ids) = registry_with_players(4);
    let id = create(&mut registry, &NewTournament::new("Open", ids)).unwrap();
    assert_eq!(registry.check_tiebreakers(id), Err(TournamentError::IncompleteResults));
    assert_eq!(registry.next_round(id), Err(TournamentError::IncompleteResults));
}

#[test]
fn three_group_winners_meet_in_one_final() {
    let (mut registry, ids) = registry_with_players(6);
    let mut request = NewTournament::new("Three groups", ids);
    request.num_groups = GroupCount::Fixed(3);
    request.advancing_players = 1;
    let id = create(&mut registry, &request).unwrap();
    assert_eq!(registry.matches(id, Some(1)).unwrap().len(), 3);
    decide_round(&mut registry, id, |_, m| MatchResult::new(m.player1.player_id, None));

    let winners: Vec<_> = registry
        .matches(id, Some(1))
        .unwrap()
        .iter()
        .map(|m| m.player1.clone())
        .collect();
    let next = registry.next_round(id).unwrap();
    assert_eq!(next.len(), 1);
    let finalists: Vec<_> = next[0].participants().cloned().collect();
    assert_eq!(finalists.len(), 3);
    for winner in &winners {
        assert!(finalists.contains(winner));
    }
}

#[test]
fn results_close_once_the_next_round_exists() {
    let (mut registry, ids) = registry_with_players(4);
    let id = create(&mut registry, &NewTournament::new("Closed", ids)).unwrap();
    decide_round(&mut registry, id, |_, m| MatchResult::new(m.player1.player_id, None));
    let group_match = registry.matches(id, Some(1)).unwrap()[0].clone();

    let final_match = registry.next_round(id).unwrap()[0].clone();
    assert_eq!(
        registry.set_match_result(group_match.match_id, &MatchResult::new(group_match.player2.player_id, None)),
        Err(TournamentError::MatchClosed(group_match.match_id))
    );

    let result = MatchResult::new(final_match.player1.player_id, None);
    registry.set_match_result(final_match.match_id, &result).unwrap();
    assert!(registry.next_round(id).unwrap().is_empty());
    assert_eq!(
        registry.set_match_result(final_match.match_id, &result),
        Err(TournamentError::TournamentFinished)
    );
}

#[test]
fn no_knockout_finishes_after_the_groups() {
    let (mut registry, ids) = registry_with_players(4);
    let mut request = NewTournament::new("Groups only", ids);
    request.knock_out_stage_format_id = KnockoutFormat::NoKnockout;
    let id = create(&mut registry, &request).unwrap();
    decide_round(&mut registry, id, |_, m| MatchResult::new(m.player1.player_id, None));

    assert!(registry.next_round(id).unwrap().is_empty());
    assert!(registry.tournament(id).unwrap().finished);
    assert_eq!(registry.next_round(id), Err(TournamentError::TournamentFinished));
}

#[test]
fn enrolled_player_cannot_be_removed() {
    let (mut registry, ids) = registry_with_players(2);
    create(&mut registry, &NewTournament::new("Pair", ids.clone())).unwrap();
    assert_eq!(registry.remove_player(ids[0]), Err(TournamentError::PlayerEnrolled(ids[0])));
    let loner = registry.add_player("Loner").unwrap();
    registry.remove_player(loner.player_id).unwrap();
    assert_eq!(
        registry.player(loner.player_id),
        Err(TournamentError::PlayerNotFound(loner.player_id))
    );
}
