//! Dart tournament rounds: an in-memory match repository with its tournament logic, and the
//! client that drives a tournament round by round against it.

pub mod client;
pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use client::{
    Advance, AdvanceError, HttpRepository, LocalRepository, MatchRepository, RankingsPresenter,
    RepositoryError, RoundOrchestrator, RoundState, SubmissionStatus,
};
pub use config::{ClientConfig, ServerConfig};
pub use models::{
    GameMatch, MatchId, MatchResult, Player, PlayerId, RankingEntry, RoundNumber, Tournament,
    TournamentError, TournamentId,
};
pub use store::Registry;
