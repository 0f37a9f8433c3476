//! Data structures for the dart tournament: players, matches, tournaments, rankings.

mod api;
mod game;
mod player;
mod ranking;
mod tournament;

pub use api::{
    ErrorBody, FormatEntry, NewTournament, NextRound, PlayerName, RoundMatches, RoundQuery,
    TiebreakerCheck, TiebreakerMatches, TournamentCreated,
};
pub use game::{GameMatch, MatchId, MatchResult, TiebreakerPairing};
pub use player::{Player, PlayerId};
pub use ranking::RankingEntry;
pub use tournament::{
    Group, GroupCount, GroupStageFormat, KnockoutFormat, Round, RoundNumber, Tournament,
    TournamentError, TournamentId, TournamentInfo,
};
