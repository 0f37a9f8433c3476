//! Final rankings over all rounds.

use crate::models::{RankingEntry, Tournament};

/// Rank every enrolled player by highest round reached, then matches won (tiebreakers count).
/// Players level on both keep their seeding order.
pub fn compute_rankings(tournament: &Tournament) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = tournament
        .players
        .iter()
        .map(|p| {
            let highest_round = tournament
                .rounds
                .iter()
                .filter(|r| r.all_matches().any(|m| m.has_participant(p.player_id)))
                .map(|r| r.number)
                .max()
                .unwrap_or(0);
            let matches_won = tournament
                .rounds
                .iter()
                .flat_map(|r| r.all_matches())
                .filter(|m| m.winner_id == Some(p.player_id))
                .count() as u32;
            RankingEntry {
                player_id: p.player_id,
                name: p.name.clone(),
                highest_round,
                matches_won,
            }
        })
        .collect();
    entries.sort_by(|a, b| {
        b.highest_round
            .cmp(&a.highest_round)
            .then(b.matches_won.cmp(&a.matches_won))
    });
    entries
}
