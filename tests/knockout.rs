//! Integration tests for the knockout stage and the final rankings.

use dart_tournament_rounds::models::{GroupStageFormat, NewTournament};
use dart_tournament_rounds::{MatchResult, Player, Registry, TournamentId};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn knockout_tournament(n: usize) -> (Registry, TournamentId, Vec<Player>) {
    let mut registry = Registry::new();
    let ids = (0..n)
        .map(|i| registry.add_player(&format!("P{i}")).unwrap().player_id)
        .collect();
    let mut request = NewTournament::new("Knockout", ids);
    request.group_stage_format_id = GroupStageFormat::NoGroupStage;
    let id = registry
        .create_tournament_with_rng(&request, &mut StdRng::seed_from_u64(3))
        .unwrap();
    // seeding order after the draw
    let seeds = registry.tournament(id).unwrap().players.clone();
    (registry, id, seeds)
}

/// Let player1 win every match of the current round.
fn favourites_win(registry: &mut Registry, id: TournamentId) {
    let matches = registry.round(id, None).unwrap().matches.clone();
    for m in matches {
        registry
            .set_match_result(m.match_id, &MatchResult::new(m.player1.player_id, None))
            .unwrap();
    }
}

#[test]
fn odd_field_closes_with_a_three_player_match() {
    let (registry, id, seeds) = knockout_tournament(5);
    let round = registry.round(id, Some(1)).unwrap();
    // bracket order 1, 4, 5, 2, 3: the odd seed joins the last pairing
    assert_eq!(round.matches.len(), 2);
    assert_eq!(round.matches[0].player1, seeds[0]);
    assert_eq!(round.matches[0].player2, seeds[3]);
    assert_eq!(round.matches[0].player3, None);
    assert_eq!(round.matches[1].player1, seeds[4]);
    assert_eq!(round.matches[1].player2, seeds[1]);
    assert_eq!(round.matches[1].player3, Some(seeds[2].clone()));
    for seed in &seeds {
        assert!(round.matches.iter().any(|m| m.has_participant(seed.player_id)));
    }
}

#[test]
fn later_rounds_pair_match_winners() {
    let (mut registry, id, seeds) = knockout_tournament(5);
    favourites_win(&mut registry, id);

    let final_round = registry.next_round(id).unwrap();
    assert_eq!(final_round.len(), 1);
    assert_eq!(final_round[0].player1, seeds[0]);
    assert_eq!(final_round[0].player2, seeds[4]);
    assert_eq!(final_round[0].player3, None);

    favourites_win(&mut registry, id);
    assert!(registry.next_round(id).unwrap().is_empty());
    assert!(registry.tournament(id).unwrap().finished);
}

#[test]
fn three_players_meet_in_one_final() {
    let (mut registry, id, seeds) = knockout_tournament(3);
    let m = registry.matches(id, Some(1)).unwrap()[0].clone();
    assert_eq!(registry.matches(id, Some(1)).unwrap().len(), 1);
    assert_eq!(m.player3, Some(seeds[2].clone()));

    registry
        .set_match_result(m.match_id, &MatchResult::new(seeds[2].player_id, Some(seeds[0].player_id)))
        .unwrap();
    assert!(registry.next_round(id).unwrap().is_empty());
    assert_eq!(registry.rankings(id).unwrap()[0].player_id, seeds[2].player_id);
}

#[test]
fn only_the_final_round_has_a_single_match() {
    for n in 2..=17 {
        let (mut registry, id, _) = knockout_tournament(n);
        loop {
            let matches = registry.round(id, None).unwrap().matches.len();
            favourites_win(&mut registry, id);
            let next = registry.next_round(id).unwrap();
            if matches == 1 {
                assert!(next.is_empty(), "{n} players: single match before the final");
                break;
            }
            assert!(!next.is_empty(), "{n} players: finished after {matches} matches");
        }
        // everyone played at least once
        let rankings = registry.rankings(id).unwrap();
        assert!(rankings.iter().all(|r| r.highest_round >= 1), "{n} players");
    }
}

#[test]
fn rankings_order_by_highest_round_then_wins() {
    let (mut registry, id, seeds) = knockout_tournament(4);
    favourites_win(&mut registry, id);
    registry.next_round(id).unwrap();
    favourites_win(&mut registry, id);
    registry.next_round(id).unwrap();

    let rankings = registry.rankings(id).unwrap();
    let order: Vec<_> = rankings.iter().map(|r| r.player_id).collect();
    // 1 v 4 and 2 v 3, then 1 v 2
    assert_eq!(
        order,
        vec![
            seeds[0].player_id,
            seeds[1].player_id,
            seeds[2].player_id,
            seeds[3].player_id
        ]
    );
    assert_eq!(rankings[0].matches_won, 2);
    assert_eq!(rankings[0].highest_round, 2);
    assert_eq!(rankings[1].matches_won, 1);
    assert_eq!(rankings[1].highest_round, 2);
    assert_eq!(rankings[2].highest_round, 1);
}

#[test]
fn two_players_play_a_single_final() {
    let (mut registry, id, seeds) = knockout_tournament(2);
    let round = registry.round(id, Some(1)).unwrap();
    assert_eq!(round.matches.len(), 1);
    assert_eq!(round.matches[0].player3, None);

    let m = round.matches[0].clone();
    registry
        .set_match_result(m.match_id, &MatchResult::new(seeds[1].player_id, None))
        .unwrap();
    assert!(registry.next_round(id).unwrap().is_empty());
    let rankings = registry.rankings(id).unwrap();
    assert_eq!(rankings[0].player_id, seeds[1].player_id);
}
