//! Match (game) between two or three players, and tiebreaker pairings.

use crate::models::player::{Player, PlayerId};
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};

/// Unique identifier for a match.
pub type MatchId = u64;

/// A single match: two players, or three in some tiebreakers.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub match_id: MatchId,
    /// Present only during the group phase.
    #[serde(default)]
    pub group_number: Option<u32>,
    pub player1: Player,
    pub player2: Player,
    #[serde(default)]
    pub player3: Option<Player>,
    /// None if not yet played.
    #[serde(default)]
    pub winner_id: Option<PlayerId>,
    /// Only meaningful for three-player matches.
    #[serde(default)]
    pub second_place_id: Option<PlayerId>,
}

impl GameMatch {
    pub fn new(match_id: MatchId, group_number: Option<u32>, player1: Player, player2: Player) -> Self {
        Self {
            match_id,
            group_number,
            player1,
            player2,
            player3: None,
            winner_id: None,
            second_place_id: None,
        }
    }

    /// Add a third participant.
    pub fn with_third(mut self, player3: Player) -> Self {
        self.player3 = Some(player3);
        self
    }

    pub fn participants(&self) -> impl Iterator<Item = &Player> {
        [Some(&self.player1), Some(&self.player2), self.player3.as_ref()]
            .into_iter()
            .flatten()
    }

    pub fn has_participant(&self, player_id: PlayerId) -> bool {
        self.participants().any(|p| p.player_id == player_id)
    }

    pub fn is_decided(&self) -> bool {
        self.winner_id.is_some()
    }

    /// The participant with the given id, if any.
    pub fn participant(&self, player_id: PlayerId) -> Option<&Player> {
        self.participants().find(|p| p.player_id == player_id)
    }

    /// Record a result. Last write wins; a missing second place clears the previous one.
    pub fn set_result(&mut self, result: &MatchResult) -> Result<(), TournamentError> {
        result.validate_for(self)?;
        self.winner_id = Some(result.winner_id);
        self.second_place_id = result.second_place_id;
        Ok(())
    }
}

/// Result of one match, as sent with `PUT /api/matches/{id}`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner_id: PlayerId,
    #[serde(default)]
    pub second_place_id: Option<PlayerId>,
}

impl MatchResult {
    pub fn new(winner_id: PlayerId, second_place_id: Option<PlayerId>) -> Self {
        Self {
            winner_id,
            second_place_id,
        }
    }

    /// Winner must take part in the match; second place must be a different participant.
    pub fn validate_for(&self, game: &GameMatch) -> Result<(), TournamentError> {
        if !game.has_participant(self.winner_id) {
            return Err(TournamentError::NotAParticipant {
                match_id: game.match_id,
                player_id: self.winner_id,
            });
        }
        if let Some(second) = self.second_place_id {
            if second == self.winner_id {
                return Err(TournamentError::SecondPlaceIsWinner(game.match_id));
            }
            if !game.has_participant(second) {
                return Err(TournamentError::NotAParticipant {
                    match_id: game.match_id,
                    player_id: second,
                });
            }
        }
        Ok(())
    }
}

/// Players that must play a tiebreaker before group advancement is decided.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TiebreakerPairing {
    #[serde(default)]
    pub group_number: Option<u32>,
    pub player1: Player,
    pub player2: Player,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player3: Option<Player>,
}
