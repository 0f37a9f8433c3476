//! In-process implementation of [`MatchRepository`] backed by a [`Registry`].

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::{self, BoxFuture, FutureExt};

use crate::client::repository::{MatchRepository, RepositoryResult};
use crate::models::{
    GameMatch, MatchId, MatchResult, RankingEntry, RoundNumber, TiebreakerPairing, TournamentId,
    TournamentInfo,
};
use crate::store::Registry;

/// Shares a registry with whoever else holds it (the web server, or a test).
#[derive(Clone, Default)]
pub struct LocalRepository {
    registry: Arc<RwLock<Registry>>,
}

impl LocalRepository {
    pub fn new(registry: Arc<RwLock<Registry>>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<RwLock<Registry>> {
        &self.registry
    }

    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MatchRepository for LocalRepository {
    fn fetch_tournament(&self, tournament: TournamentId) -> BoxFuture<'static, RepositoryResult<TournamentInfo>> {
        let result = self.read().tournament(tournament).map(|t| t.info());
        future::ready(result.map_err(Into::into)).boxed()
    }

    fn fetch_matches(
        &self,
        tournament: TournamentId,
        round: RoundNumber,
    ) -> BoxFuture<'static, RepositoryResult<Vec<GameMatch>>> {
        let result = self.read().matches(tournament, Some(round));
        future::ready(result.map_err(Into::into)).boxed()
    }

    fn submit_result(&self, match_id: MatchId, result: MatchResult) -> BoxFuture<'static, RepositoryResult<()>> {
        let result = self.write().set_match_result(match_id, &result).map(|_| ());
        future::ready(result.map_err(Into::into)).boxed()
    }

    fn check_tiebreakers(&self, tournament: TournamentId) -> BoxFuture<'static, RepositoryResult<Vec<TiebreakerPairing>>> {
        let result = self.read().check_tiebreakers(tournament);
        future::ready(result.map_err(Into::into)).boxed()
    }

    fn create_tiebreakers(&self, tournament: TournamentId) -> BoxFuture<'static, RepositoryResult<Vec<GameMatch>>> {
        let result = self.write().create_tiebreakers(tournament);
        future::ready(result.map_err(Into::into)).boxed()
    }

    fn create_next_round(
        &self,
        tournament: TournamentId,
    ) -> BoxFuture<'static, RepositoryResult<Option<Vec<GameMatch>>>> {
        let result = self.write().next_round(tournament);
        future::ready(result.map(Some).map_err(Into::into)).boxed()
    }

    fn fetch_rankings(&self, tournament: TournamentId) -> BoxFuture<'static, RepositoryResult<Vec<RankingEntry>>> {
        let result = self.read().rankings(tournament);
        future::ready(result.map_err(Into::into)).boxed()
    }
}
