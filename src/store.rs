//! In-memory match repository: players and tournaments by id.

use crate::logic::{self, MatchIds};
use crate::models::{
    GameMatch, MatchId, MatchResult, NewTournament, Player, PlayerId, RankingEntry, Round,
    RoundNumber, TiebreakerPairing, Tournament, TournamentError, TournamentId,
};
use std::collections::BTreeMap;

/// All players and tournaments. Ids are sequential and never reused.
#[derive(Debug)]
pub struct Registry {
    players: BTreeMap<PlayerId, Player>,
    tournaments: BTreeMap<TournamentId, Tournament>,
    next_player_id: PlayerId,
    next_tournament_id: TournamentId,
    match_ids: MatchIds,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            players: BTreeMap::new(),
            tournaments: BTreeMap::new(),
            next_player_id: 1,
            next_tournament_id: 1,
            match_ids: MatchIds::new(),
        }
    }

    pub fn players(&self) -> Vec<Player> {
        self.players.values().cloned().collect()
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, TournamentError> {
        self.players.get(&id).ok_or(TournamentError::PlayerNotFound(id))
    }

    fn check_player_name(&self, name: &str, except: Option<PlayerId>) -> Result<(), TournamentError> {
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        let is_duplicate = self
            .players
            .values()
            .any(|p| Some(p.player_id) != except && p.name.eq_ignore_ascii_case(name));
        if is_duplicate {
            return Err(TournamentError::DuplicatePlayerName);
        }
        Ok(())
    }

    /// Add a player. Names are unique (case-insensitive).
    pub fn add_player(&mut self, name: &str) -> Result<Player, TournamentError> {
        let name = name.trim();
        self.check_player_name(name, None)?;
        let player = Player::new(self.next_player_id, name);
        self.next_player_id += 1;
        self.players.insert(player.player_id, player.clone());
        Ok(player)
    }

    /// Rename a player. Matches already generated keep the old name.
    pub fn rename_player(&mut self, id: PlayerId, name: &str) -> Result<Player, TournamentError> {
        let name = name.trim();
        self.player(id)?;
        self.check_player_name(name, Some(id))?;
        let player = self
            .players
            .get_mut(&id)
            .ok_or(TournamentError::PlayerNotFound(id))?;
        player.name = name.to_string();
        Ok(player.clone())
    }

    /// Remove a player that is not enrolled in any tournament.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<(), TournamentError> {
        self.player(id)?;
        if self.tournaments.values().any(|t| t.is_enrolled(id)) {
            return Err(TournamentError::PlayerEnrolled(id));
        }
        self.players.remove(&id);
        Ok(())
    }

    /// Create a tournament with a random draw.
    pub fn create_tournament(&mut self, request: &NewTournament) -> Result<TournamentId, TournamentError> {
        self.create_tournament_with_rng(request, &mut rand::thread_rng())
    }

    pub fn create_tournament_with_rng<R: rand::Rng + ?Sized>(
        &mut self,
        request: &NewTournament,
        rng: &mut R,
    ) -> Result<TournamentId, TournamentError> {
        if self
            .tournaments
            .values()
            .any(|t| t.name.eq_ignore_ascii_case(request.name.trim()))
        {
            return Err(TournamentError::DuplicateTournamentName);
        }
        let mut players = Vec::with_capacity(request.players.len());
        for &id in &request.players {
            let player = self.player(id)?.clone();
            if !players.contains(&player) {
                players.push(player);
            }
        }
        let id = self.next_tournament_id;
        let date = chrono::Local::now().date_naive();
        let tournament =
            logic::create_tournament(id, request, players, date, &mut self.match_ids, rng)?;
        self.next_tournament_id += 1;
        self.tournaments.insert(id, tournament);
        Ok(id)
    }

    pub fn tournament(&self, id: TournamentId) -> Result<&Tournament, TournamentError> {
        self.tournaments
            .get(&id)
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    pub fn tournaments(&self) -> impl Iterator<Item = &Tournament> {
        self.tournaments.values()
    }

    pub fn remove_tournament(&mut self, id: TournamentId) -> Result<(), TournamentError> {
        self.tournaments
            .remove(&id)
            .map(|_| ())
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    /// A round of a tournament; `None` means the latest one.
    pub fn round(&self, id: TournamentId, number: Option<RoundNumber>) -> Result<&Round, TournamentError> {
        let tournament = self.tournament(id)?;
        let round = match number {
            Some(n) => tournament.round(n),
            None => tournament.current_round(),
        };
        round.ok_or(TournamentError::RoundNotFound {
            tournament: id,
            round: number.unwrap_or(1),
        })
    }

    /// Regular matches of a round (tiebreakers are served separately).
    pub fn matches(&self, id: TournamentId, number: Option<RoundNumber>) -> Result<Vec<GameMatch>, TournamentError> {
        let round = self.round(id, number)?;
        if round.matches.is_empty() {
            return Err(TournamentError::RoundNotFound {
                tournament: id,
                round: round.number,
            });
        }
        Ok(round.matches.clone())
    }

    /// Record a match result in whichever tournament owns the match.
    pub fn set_match_result(&mut self, match_id: MatchId, result: &MatchResult) -> Result<GameMatch, TournamentError> {
        let tournament = self
            .tournaments
            .values_mut()
            .find(|t| t.find_match(match_id).is_some())
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        logic::set_match_result(tournament, match_id, result)
    }

    pub fn check_tiebreakers(&self, id: TournamentId) -> Result<Vec<TiebreakerPairing>, TournamentError> {
        logic::check_tiebreakers(self.tournament(id)?)
    }

    pub fn create_tiebreakers(&mut self, id: TournamentId) -> Result<Vec<GameMatch>, TournamentError> {
        let tournament = self
            .tournaments
            .get_mut(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        logic::create_tiebreaker_matches(tournament, &mut self.match_ids)
    }

    pub fn next_round(&mut self, id: TournamentId) -> Result<Vec<GameMatch>, TournamentError> {
        let tournament = self
            .tournaments
            .get_mut(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        logic::create_next_round(tournament, &mut self.match_ids)
    }

    pub fn rankings(&self, id: TournamentId) -> Result<Vec<RankingEntry>, TournamentError> {
        Ok(logic::compute_rankings(self.tournament(id)?))
    }
}
