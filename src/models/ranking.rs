//! Final standings as served by the rankings endpoint.

use crate::models::player::PlayerId;
use crate::models::tournament::RoundNumber;
use serde::{Deserialize, Serialize};

/// One row of `GET /api/tournaments/{id}/rankings`. Rows arrive already ordered.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub player_id: PlayerId,
    pub name: String,
    /// Highest round the player appeared in (0 if none).
    #[serde(default)]
    pub highest_round: RoundNumber,
    pub matches_won: u32,
}
