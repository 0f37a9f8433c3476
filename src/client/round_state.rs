//! Client-held snapshot of the displayed match set and the user's selections.

use std::collections::HashMap;

use thiserror::Error;

use crate::models::{GameMatch, MatchId, MatchResult, PlayerId, RoundNumber};

/// Persistence status of a match selection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmissionStatus {
    /// Sent (or about to be), no answer yet.
    Pending,
    /// The repository stored the result.
    Confirmed,
    /// The repository did not store the result; the local selection is kept.
    Failed(String),
}

/// Why a selection was refused before anything was sent.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SelectionError {
    #[error("match {0} is not part of the displayed round")]
    UnknownMatch(MatchId),
    #[error("player {player_id} does not take part in match {match_id}")]
    NotAParticipant { match_id: MatchId, player_id: PlayerId },
    #[error("second place of match {0} must differ from the winner")]
    SecondPlaceIsWinner(MatchId),
}

/// A selection waiting to be persisted. The ticket tells a late answer apart from the
/// answer to a newer selection for the same match.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Submission {
    pub ticket: u64,
    pub match_id: MatchId,
    pub result: MatchResult,
}

#[derive(Clone, Debug)]
struct Tracked {
    ticket: u64,
    status: SubmissionStatus,
}

/// True iff any match carries a group number.
pub fn has_group_phase(matches: &[GameMatch]) -> bool {
    matches.iter().any(|m| m.group_number.is_some())
}

/// True iff any match has a third player.
pub fn has_player3(matches: &[GameMatch]) -> bool {
    matches.iter().any(|m| m.player3.is_some())
}

/// The round view model. The match set is always replaced as a whole; replacing it drops every
/// selection made for the previous set.
#[derive(Clone, Debug, Default)]
pub struct RoundState {
    matches: Vec<GameMatch>,
    winners: HashMap<MatchId, PlayerId>,
    second_places: HashMap<MatchId, PlayerId>,
    submissions: HashMap<MatchId, Tracked>,
    next_ticket: u64,
    round: RoundNumber,
    has_group_phase: bool,
    has_player3: bool,
    is_tiebreaker: bool,
    finished: bool,
    error: Option<String>,
}

impl RoundState {
    /// State for a regular round.
    pub fn new(round: RoundNumber, matches: Vec<GameMatch>) -> Self {
        let mut state = Self::default();
        state.load_round(round, matches);
        state
    }

    /// Show a regular round. Results already persisted on the fetched matches become
    /// confirmed selections.
    pub fn load_round(&mut self, round: RoundNumber, matches: Vec<GameMatch>) {
        self.round = round;
        self.is_tiebreaker = false;
        self.replace_matches(matches);
    }

    /// Show a tiebreaker set. The round number does not change.
    pub fn load_tiebreakers(&mut self, matches: Vec<GameMatch>) {
        self.is_tiebreaker = true;
        self.replace_matches(matches);
    }

    fn replace_matches(&mut self, matches: Vec<GameMatch>) {
        self.has_group_phase = has_group_phase(&matches);
        self.has_player3 = has_player3(&matches);
        self.winners.clear();
        self.second_places.clear();
        self.submissions.clear();
        self.error = None;
        for m in &matches {
            if let Some(winner) = m.winner_id {
                self.winners.insert(m.match_id, winner);
                self.submissions.insert(
                    m.match_id,
                    Tracked {
                        ticket: 0,
                        status: SubmissionStatus::Confirmed,
                    },
                );
            }
            if let Some(second) = m.second_place_id {
                self.second_places.insert(m.match_id, second);
            }
        }
        self.matches = matches;
    }

    /// Select a winner (and optionally a second place) for a displayed match.
    ///
    /// The selection is applied immediately and marked pending; the returned submission is what
    /// has to be persisted. `None` as second place clears an earlier one.
    pub fn record_selection(
        &mut self,
        match_id: MatchId,
        winner_id: PlayerId,
        second_place_id: Option<PlayerId>,
    ) -> Result<Submission, SelectionError> {
        let game = self
            .matches
            .iter()
            .find(|m| m.match_id == match_id)
            .ok_or(SelectionError::UnknownMatch(match_id))?;
        for player_id in std::iter::once(winner_id).chain(second_place_id) {
            if !game.has_participant(player_id) {
                return Err(SelectionError::NotAParticipant { match_id, player_id });
            }
        }
        if second_place_id == Some(winner_id) {
            return Err(SelectionError::SecondPlaceIsWinner(match_id));
        }

        self.winners.insert(match_id, winner_id);
        match second_place_id {
            Some(second) => self.second_places.insert(match_id, second),
            None => self.second_places.remove(&match_id),
        };
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.submissions.insert(
            match_id,
            Tracked {
                ticket,
                status: SubmissionStatus::Pending,
            },
        );
        Ok(Submission {
            ticket,
            match_id,
            result: MatchResult::new(winner_id, second_place_id),
        })
    }

    /// Apply the answer to a submission. Answers for a replaced match set or superseded by a
    /// newer selection are ignored; returns whether the answer was applied.
    pub fn settle(&mut self, submission: &Submission, outcome: Result<(), String>) -> bool {
        match self.submissions.get_mut(&submission.match_id) {
            Some(tracked) if tracked.ticket == submission.ticket => {
                tracked.status = match outcome {
                    Ok(()) => SubmissionStatus::Confirmed,
                    Err(reason) => SubmissionStatus::Failed(reason),
                };
                true
            }
            _ => false,
        }
    }

    pub fn matches(&self) -> &[GameMatch] {
        &self.matches
    }

    pub fn round(&self) -> RoundNumber {
        self.round
    }

    pub fn winner(&self, match_id: MatchId) -> Option<PlayerId> {
        self.winners.get(&match_id).copied()
    }

    pub fn second_place(&self, match_id: MatchId) -> Option<PlayerId> {
        self.second_places.get(&match_id).copied()
    }

    pub fn submission_status(&self, match_id: MatchId) -> Option<&SubmissionStatus> {
        self.submissions.get(&match_id).map(|t| &t.status)
    }

    pub fn has_group_phase(&self) -> bool {
        self.has_group_phase
    }

    pub fn has_player3(&self) -> bool {
        self.has_player3
    }

    pub fn is_tiebreaker(&self) -> bool {
        self.is_tiebreaker
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn mark_finished(&mut self) {
        self.finished = true;
        self.error = None;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Displayed matches without a winner selection, in display order.
    pub fn missing_winners(&self) -> Vec<MatchId> {
        self.matches
            .iter()
            .filter(|m| !self.winners.contains_key(&m.match_id))
            .map(|m| m.match_id)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_winners().is_empty()
    }

    /// Whether the next advance ends the tournament: a single match that is not a tiebreaker.
    pub fn is_final(&self) -> bool {
        self.matches.len() == 1 && !self.is_tiebreaker
    }

    /// Caption of the match table.
    pub fn heading(&self) -> String {
        if self.is_tiebreaker {
            "Tiebreaker matches".to_string()
        } else if self.round == 1 && self.has_group_phase {
            "Group stage matches".to_string()
        } else {
            format!("Round {} matches", self.round)
        }
    }

    /// Label of the advance control.
    pub fn finish_label(&self) -> &'static str {
        if self.is_final() {
            "Finish tournament"
        } else {
            "Next round"
        }
    }
}
