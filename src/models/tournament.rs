//! Tournament, its groups and rounds, formats and errors.

use crate::models::game::{GameMatch, MatchId};
use crate::models::player::{Player, PlayerId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a tournament.
pub type TournamentId = u64;

/// Round numbers start at 1 (the group phase, or the first knockout round).
pub type RoundNumber = u32;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    #[error("Tournament not found")]
    TournamentNotFound(TournamentId),
    #[error("Player not found")]
    PlayerNotFound(PlayerId),
    #[error("Match not found")]
    MatchNotFound(MatchId),
    #[error("No matches found for round {round}")]
    RoundNotFound { tournament: TournamentId, round: RoundNumber },
    #[error("Player {player_id} does not take part in match {match_id}")]
    NotAParticipant { match_id: MatchId, player_id: PlayerId },
    #[error("Second place of match {0} must differ from the winner")]
    SecondPlaceIsWinner(MatchId),
    /// Not all matches of the current round have a winner.
    #[error("Not all matches have a result")]
    IncompleteResults,
    #[error("Need at least 2 players to create a tournament")]
    NotEnoughPlayers,
    #[error("Each group needs at least 2 players ({players} players for {groups} groups)")]
    TooManyGroups { players: usize, groups: u32 },
    #[error("At least one player per group must advance")]
    NoAdvancingPlayers,
    #[error("Unknown format id {0}")]
    UnknownFormat(u32),
    #[error("{0} is not supported")]
    UnsupportedFormat(&'static str),
    #[error("Invalid number of groups: {0}")]
    InvalidGroupCount(String),
    #[error("A tournament name is required")]
    EmptyName,
    #[error("A player with this name already exists")]
    DuplicatePlayerName,
    #[error("A tournament with this name already exists")]
    DuplicateTournamentName,
    #[error("Player is enrolled in a tournament")]
    PlayerEnrolled(PlayerId),
    #[error("Tiebreakers can only be created after the group phase")]
    NoTiebreakerPhase,
    #[error("Tournament is already finished")]
    TournamentFinished,
    /// The match belongs to a set whose results have already been used.
    #[error("Match {0} is no longer open for results")]
    MatchClosed(MatchId),
}

impl TournamentError {
    /// Whether the error means a missing resource (HTTP 404) rather than a rejected request.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TournamentError::TournamentNotFound(_)
                | TournamentError::PlayerNotFound(_)
                | TournamentError::MatchNotFound(_)
                | TournamentError::RoundNotFound { .. }
        )
    }
}

/// Group stage format, transmitted as its numeric id.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum GroupStageFormat {
    #[default]
    SingleRoundRobin,
    DoubleRoundRobin,
    NoGroupStage,
}

impl GroupStageFormat {
    pub const ALL: [GroupStageFormat; 3] = [
        GroupStageFormat::SingleRoundRobin,
        GroupStageFormat::DoubleRoundRobin,
        GroupStageFormat::NoGroupStage,
    ];

    pub fn id(self) -> u32 {
        match self {
            GroupStageFormat::SingleRoundRobin => 1,
            GroupStageFormat::DoubleRoundRobin => 2,
            GroupStageFormat::NoGroupStage => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GroupStageFormat::SingleRoundRobin => "Single Round Robin",
            GroupStageFormat::DoubleRoundRobin => "Double Round Robin",
            GroupStageFormat::NoGroupStage => "No Group Stage",
        }
    }

    pub fn has_groups(self) -> bool {
        self != GroupStageFormat::NoGroupStage
    }
}

impl TryFrom<u32> for GroupStageFormat {
    type Error = TournamentError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|f| f.id() == id)
            .ok_or(TournamentError::UnknownFormat(id))
    }
}

impl From<GroupStageFormat> for u32 {
    fn from(format: GroupStageFormat) -> Self {
        format.id()
    }
}

/// Knockout stage format, transmitted as its numeric id.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum KnockoutFormat {
    #[default]
    SingleElimination,
    DoubleElimination,
    NoKnockout,
}

impl KnockoutFormat {
    pub const ALL: [KnockoutFormat; 3] = [
        KnockoutFormat::SingleElimination,
        KnockoutFormat::DoubleElimination,
        KnockoutFormat::NoKnockout,
    ];

    pub fn id(self) -> u32 {
        match self {
            KnockoutFormat::SingleElimination => 1,
            KnockoutFormat::DoubleElimination => 2,
            KnockoutFormat::NoKnockout => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            KnockoutFormat::SingleElimination => "Single Elimination",
            KnockoutFormat::DoubleElimination => "Double Elimination",
            KnockoutFormat::NoKnockout => "No Knock-Out Stage",
        }
    }
}

impl TryFrom<u32> for KnockoutFormat {
    type Error = TournamentError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|f| f.id() == id)
            .ok_or(TournamentError::UnknownFormat(id))
    }
}

impl From<KnockoutFormat> for u32 {
    fn from(format: KnockoutFormat) -> Self {
        format.id()
    }
}

/// Number of groups: `"Auto"` (derived from the player count) or a fixed count.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGroupCount", into = "RawGroupCount")]
pub enum GroupCount {
    #[default]
    Auto,
    Fixed(u32),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawGroupCount {
    Count(u32),
    Label(String),
}

impl TryFrom<RawGroupCount> for GroupCount {
    type Error = TournamentError;

    fn try_from(raw: RawGroupCount) -> Result<Self, Self::Error> {
        match raw {
            RawGroupCount::Count(0) => Err(TournamentError::InvalidGroupCount("0".to_string())),
            RawGroupCount::Count(n) => Ok(GroupCount::Fixed(n)),
            RawGroupCount::Label(label) if label.trim().eq_ignore_ascii_case("auto") => {
                Ok(GroupCount::Auto)
            }
            RawGroupCount::Label(label) => match label.trim().parse::<u32>() {
                Ok(n) if n > 0 => Ok(GroupCount::Fixed(n)),
                _ => Err(TournamentError::InvalidGroupCount(label)),
            },
        }
    }
}

impl From<GroupCount> for RawGroupCount {
    fn from(count: GroupCount) -> Self {
        match count {
            GroupCount::Auto => RawGroupCount::Label("Auto".to_string()),
            GroupCount::Fixed(n) => RawGroupCount::Count(n),
        }
    }
}

/// A group of the group phase.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Group {
    pub number: u32,
    pub name: String,
    /// In seeding order (the order players were dealt into the group).
    pub players: Vec<Player>,
}

/// One generation of matches.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Round {
    pub number: RoundNumber,
    pub matches: Vec<GameMatch>,
    /// Tiebreakers inserted after the group phase; only ever present on round 1.
    pub tiebreakers: Vec<GameMatch>,
}

impl Round {
    pub fn new(number: RoundNumber, matches: Vec<GameMatch>) -> Self {
        Self {
            number,
            matches,
            tiebreakers: Vec::new(),
        }
    }

    /// Regular matches followed by tiebreakers.
    pub fn all_matches(&self) -> impl Iterator<Item = &GameMatch> {
        self.matches.iter().chain(self.tiebreakers.iter())
    }

    pub fn is_decided(&self) -> bool {
        self.all_matches().all(GameMatch::is_decided)
    }
}

/// Full tournament state: enrolled players, groups, rounds.
#[derive(Clone, Debug)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub date: NaiveDate,
    pub group_stage_format: GroupStageFormat,
    pub knockout_format: KnockoutFormat,
    pub group_count: GroupCount,
    /// Players advancing from each group into the knockout stage.
    pub advancing_players: u32,
    /// Enrolled players in seeding order.
    pub players: Vec<Player>,
    /// Empty when there is no group stage.
    pub groups: Vec<Group>,
    pub rounds: Vec<Round>,
    /// Set once no further round can be generated.
    pub finished: bool,
}

impl Tournament {
    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn round(&self, number: RoundNumber) -> Option<&Round> {
        self.rounds.iter().find(|r| r.number == number)
    }

    pub fn round_mut(&mut self, number: RoundNumber) -> Option<&mut Round> {
        self.rounds.iter_mut().find(|r| r.number == number)
    }

    pub fn has_group_phase(&self) -> bool {
        self.group_stage_format.has_groups() && !self.groups.is_empty()
    }

    /// A match (regular or tiebreaker) in any round.
    pub fn find_match(&self, match_id: MatchId) -> Option<&GameMatch> {
        self.rounds
            .iter()
            .flat_map(Round::all_matches)
            .find(|m| m.match_id == match_id)
    }

    pub fn is_enrolled(&self, player_id: PlayerId) -> bool {
        self.players.iter().any(|p| p.player_id == player_id)
    }

    pub fn info(&self) -> TournamentInfo {
        TournamentInfo {
            tournament_id: self.id,
            name: self.name.clone(),
            group_stage_format_id: self.group_stage_format,
            knock_out_stage_format_id: self.knockout_format,
            date: self.date,
            advancing_players: self.advancing_players,
            num_groups: self.groups.len(),
            players: self.players.clone(),
            current_round: self.current_round().map(|r| r.number),
            finished: self.finished,
        }
    }
}

/// Summary of a tournament as served by `GET /api/tournaments/{id}`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentInfo {
    pub tournament_id: TournamentId,
    pub name: String,
    pub group_stage_format_id: GroupStageFormat,
    pub knock_out_stage_format_id: KnockoutFormat,
    pub date: NaiveDate,
    pub advancing_players: u32,
    #[serde(default)]
    pub num_groups: usize,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub current_round: Option<RoundNumber>,
    #[serde(default)]
    pub finished: bool,
}
