//! REST implementation of [`MatchRepository`].

use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::client::repository::{MatchRepository, RepositoryError, RepositoryResult};
use crate::models::{
    ErrorBody, GameMatch, MatchId, MatchResult, NextRound, RankingEntry, RoundNumber,
    TiebreakerCheck, TiebreakerMatches, TiebreakerPairing, TournamentId, TournamentInfo,
};

/// Talks to the match repository service over HTTP/JSON.
#[derive(Clone)]
pub struct HttpRepository {
    client: Client,
    base_url: Arc<str>,
}

impl HttpRepository {
    /// `base_url` is the service root, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: &str) -> RepositoryResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| RepositoryError::ClientBuilder { source })?;
        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    /// Send a request and check the status; non-success bodies are read as `{"error": ...}`.
    async fn send(builder: RequestBuilder, path: &str) -> RepositoryResult<reqwest::Response> {
        log::debug!("-> {path}");
        let response = builder.send().await.map_err(|source| RepositoryError::Send {
            path: path.to_string(),
            source,
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.json::<ErrorBody>().await.ok().map(|b| b.error);
        Err(RepositoryError::Status {
            path: path.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder, path: String) -> RepositoryResult<T> {
        let response = Self::send(builder, &path).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| RepositoryError::Decode { path, source })
    }
}

impl MatchRepository for HttpRepository {
    fn fetch_tournament(&self, tournament: TournamentId) -> BoxFuture<'static, RepositoryResult<TournamentInfo>> {
        let path = format!("/api/tournaments/{tournament}");
        let builder = self.request(Method::GET, &path);
        Box::pin(Self::send_json(builder, path))
    }

    fn fetch_matches(
        &self,
        tournament: TournamentId,
        round: RoundNumber,
    ) -> BoxFuture<'static, RepositoryResult<Vec<GameMatch>>> {
        let path = format!("/api/tournaments/{tournament}/matches");
        let builder = self
            .request(Method::GET, &path)
            .query(&[("round_number", round)]);
        Box::pin(Self::send_json(builder, path))
    }

    fn submit_result(&self, match_id: MatchId, result: MatchResult) -> BoxFuture<'static, RepositoryResult<()>> {
        let path = format!("/api/matches/{match_id}");
        let builder = self.request(Method::PUT, &path).json(&result);
        Box::pin(async move { Self::send(builder, &path).await.map(|_| ()) })
    }

    fn check_tiebreakers(&self, tournament: TournamentId) -> BoxFuture<'static, RepositoryResult<Vec<TiebreakerPairing>>> {
        let path = format!("/api/tournaments/{tournament}/tiebreakers/check");
        let builder = self.request(Method::GET, &path);
        Box::pin(async move {
            let body: TiebreakerCheck = Self::send_json(builder, path).await?;
            Ok(body.tiebreakers)
        })
    }

    fn create_tiebreakers(&self, tournament: TournamentId) -> BoxFuture<'static, RepositoryResult<Vec<GameMatch>>> {
        let path = format!("/api/tournaments/{tournament}/tiebreakers");
        let builder = self.request(Method::POST, &path);
        Box::pin(async move {
            let body: TiebreakerMatches = Self::send_json(builder, path).await?;
            Ok(body.tiebreakers)
        })
    }

    fn create_next_round(
        &self,
        tournament: TournamentId,
    ) -> BoxFuture<'static, RepositoryResult<Option<Vec<GameMatch>>>> {
        let path = format!("/api/next-round/{tournament}");
        let builder = self.request(Method::POST, &path);
        Box::pin(async move {
            let body: NextRound = Self::send_json(builder, path).await?;
            if body.matches.is_none() {
                log::debug!("Next round answer without matches: {:?}", body.message);
            }
            Ok(body.matches)
        })
    }

    fn fetch_rankings(&self, tournament: TournamentId) -> BoxFuture<'static, RepositoryResult<Vec<RankingEntry>>> {
        let path = format!("/api/tournaments/{tournament}/rankings");
        let builder = self.request(Method::GET, &path);
        Box::pin(Self::send_json(builder, path))
    }
}
