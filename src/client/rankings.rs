//! Final standings of a finished tournament.

use std::fmt;

use crate::client::repository::MatchRepository;
use crate::models::{PlayerId, RankingEntry, TournamentId};

/// Shown when the rankings could not be fetched.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching player rankings.";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RankedPlayer {
    /// 1-based position in the order served by the repository.
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub matches_won: u32,
}

/// Rankings in the order the repository returned them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Rankings {
    entries: Vec<RankedPlayer>,
}

impl Rankings {
    pub fn new(entries: Vec<RankingEntry>) -> Self {
        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| RankedPlayer {
                rank: i + 1,
                player_id: entry.player_id,
                name: entry.name,
                matches_won: entry.matches_won,
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[RankedPlayer] {
        &self.entries
    }

    pub fn winner(&self) -> Option<&RankedPlayer> {
        self.entries.first()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Rankings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .entries
            .iter()
            .map(|e| e.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Player".len());
        writeln!(f, "{:>4}  {:<width$}  {:>11}", "Rank", "Player", "Matches won")?;
        for entry in &self.entries {
            writeln!(
                f,
                "{:>4}  {:<width$}  {:>11}",
                entry.rank, entry.name, entry.matches_won
            )?;
        }
        Ok(())
    }
}

/// The rankings view: fetched once when opened.
#[derive(Clone, Debug)]
pub struct RankingsPresenter {
    tournament_id: TournamentId,
    rankings: Option<Rankings>,
    error: Option<String>,
}

impl RankingsPresenter {
    pub async fn open<R>(repository: &R, tournament_id: TournamentId) -> Self
    where
        R: MatchRepository + ?Sized,
    {
        match repository.fetch_rankings(tournament_id).await {
            Ok(entries) => Self {
                tournament_id,
                rankings: Some(Rankings::new(entries)),
                error: None,
            },
            Err(e) => {
                log::error!("Error fetching player rankings for tournament {tournament_id}: {e}");
                Self {
                    tournament_id,
                    rankings: None,
                    error: Some(FETCH_ERROR_MESSAGE.to_string()),
                }
            }
        }
    }

    pub fn tournament_id(&self) -> TournamentId {
        self.tournament_id
    }

    pub fn rankings(&self) -> Option<&Rankings> {
        self.rankings.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl fmt::Display for RankingsPresenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.rankings, &self.error) {
            (_, Some(error)) => writeln!(f, "{error}"),
            (Some(rankings), None) => {
                if let Some(winner) = rankings.winner() {
                    writeln!(f, "Winner: {}", winner.name)?;
                }
                write!(f, "{rankings}")
            }
            (None, None) => Ok(()),
        }
    }
}
