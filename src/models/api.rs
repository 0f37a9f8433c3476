//! Request and response bodies shared by the service and the client.

use crate::models::game::{GameMatch, TiebreakerPairing};
use crate::models::player::PlayerId;
use crate::models::tournament::{GroupCount, GroupStageFormat, KnockoutFormat, RoundNumber, TournamentId};
use serde::{Deserialize, Serialize};

/// Body of every non-success response: `{"error": "..."}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of `POST /api/create-tournament`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewTournament {
    pub name: String,
    /// Ids of the enrolled players.
    pub players: Vec<PlayerId>,
    #[serde(default)]
    pub group_stage_format_id: GroupStageFormat,
    #[serde(default)]
    pub knock_out_stage_format_id: KnockoutFormat,
    #[serde(default)]
    pub num_groups: GroupCount,
    #[serde(default = "default_advancing_players")]
    pub advancing_players: u32,
}

fn default_advancing_players() -> u32 {
    2
}

impl NewTournament {
    pub fn new(name: impl Into<String>, players: Vec<PlayerId>) -> Self {
        Self {
            name: name.into(),
            players,
            group_stage_format_id: GroupStageFormat::default(),
            knock_out_stage_format_id: KnockoutFormat::default(),
            num_groups: GroupCount::default(),
            advancing_players: default_advancing_players(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentCreated {
    pub message: String,
    pub tournament_id: TournamentId,
}

/// Body of `POST /api/players` and `PUT /api/players/{id}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerName {
    pub name: String,
}

/// `{format_id, format_name}` entry of the format listings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormatEntry {
    pub format_id: u32,
    pub format_name: String,
}

/// Response of `GET /api/tournaments/{id}/tiebreakers/check`; empty means none pending.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TiebreakerCheck {
    pub tiebreakers: Vec<TiebreakerPairing>,
}

/// Response of `POST /api/tournaments/{id}/tiebreakers`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TiebreakerMatches {
    pub tiebreakers: Vec<GameMatch>,
}

/// Response of `POST /api/next-round/{id}`.
///
/// An empty `matches` list means the tournament is over. Services that answer with a message
/// only leave `matches` out; the new round then has to be fetched separately.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NextRound {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub matches: Option<Vec<GameMatch>>,
}

/// Response of `GET /api/tournaments/{id}/rounds/{n}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundMatches {
    pub round_number: RoundNumber,
    pub matches: Vec<GameMatch>,
    #[serde(default)]
    pub tiebreakers: Vec<GameMatch>,
}

/// Query string of `GET /api/tournaments/{id}/matches`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct RoundQuery {
    #[serde(default)]
    pub round_number: Option<RoundNumber>,
}
