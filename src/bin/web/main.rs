//! Match repository service: players, tournaments, rounds and results over REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use dart_tournament_rounds::models::{
    FormatEntry, GroupStageFormat, KnockoutFormat, MatchResult, NewTournament, NextRound,
    PlayerName, RoundMatches, RoundQuery, TiebreakerCheck, TiebreakerMatches, TournamentCreated,
    TournamentInfo,
};
use dart_tournament_rounds::{MatchId, PlayerId, Registry, RoundNumber, ServerConfig, TournamentError, TournamentId};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(test)]
mod tests;

/// In-memory state: every player and tournament.
type AppState = Data<RwLock<Registry>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

fn error_body(message: impl Into<String>) -> serde_json::Value {
    serde_json::json!({ "error": message.into() })
}

/// 404 for missing resources, 400 for rejected requests.
fn error_response(e: &TournamentError) -> HttpResponse {
    if e.is_not_found() {
        HttpResponse::NotFound().json(error_body(e.to_string()))
    } else {
        HttpResponse::BadRequest().json(error_body(e.to_string()))
    }
}

fn message(text: &str) -> serde_json::Value {
    serde_json::json!({ "message": text })
}

fn read(state: &AppState) -> Result<RwLockReadGuard<'_, Registry>, HttpResponse> {
    state
        .read()
        .map_err(|_| HttpResponse::InternalServerError().body("lock error"))
}

fn write(state: &AppState) -> Result<RwLockWriteGuard<'_, Registry>, HttpResponse> {
    state
        .write()
        .map_err(|_| HttpResponse::InternalServerError().body("lock error"))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "dart-tournament-rounds",
    })
}

#[get("/api/group-stage-formats")]
async fn api_group_stage_formats() -> HttpResponse {
    let formats: Vec<FormatEntry> = GroupStageFormat::ALL
        .into_iter()
        .map(|f| FormatEntry {
            format_id: f.id(),
            format_name: f.name().to_string(),
        })
        .collect();
    HttpResponse::Ok().json(formats)
}

#[get("/api/knock-out-stage-formats")]
async fn api_knockout_formats() -> HttpResponse {
    let formats: Vec<FormatEntry> = KnockoutFormat::ALL
        .into_iter()
        .map(|f| FormatEntry {
            format_id: f.id(),
            format_name: f.name().to_string(),
        })
        .collect();
    HttpResponse::Ok().json(formats)
}

#[get("/api/players")]
async fn api_list_players(state: AppState) -> HttpResponse {
    let g = match read(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    HttpResponse::Ok().json(g.players())
}

#[post("/api/players")]
async fn api_add_player(state: AppState, body: Json<PlayerName>) -> HttpResponse {
    let mut g = match write(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.add_player(&body.name) {
        Ok(player) => {
            log::info!("Added player {} ({})", player.player_id, player.name);
            HttpResponse::Created().json(player)
        }
        Err(e) => error_response(&e),
    }
}

#[get("/api/players/{id}")]
async fn api_get_player(state: AppState, path: Path<PlayerId>) -> HttpResponse {
    let g = match read(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.player(path.into_inner()) {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => error_response(&e),
    }
}

#[put("/api/players/{id}")]
async fn api_rename_player(state: AppState, path: Path<PlayerId>, body: Json<PlayerName>) -> HttpResponse {
    let mut g = match write(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.rename_player(path.into_inner(), &body.name) {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/players/{id}")]
async fn api_remove_player(state: AppState, path: Path<PlayerId>) -> HttpResponse {
    let mut g = match write(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.remove_player(path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

#[post("/api/create-tournament")]
async fn api_create_tournament(state: AppState, body: Json<NewTournament>) -> HttpResponse {
    let mut g = match write(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.create_tournament(&body) {
        Ok(tournament_id) => {
            log::info!("Created tournament {tournament_id} ({})", body.name.trim());
            HttpResponse::Created().json(TournamentCreated {
                message: "Tournament created".to_string(),
                tournament_id,
            })
        }
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    let g = match read(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    let tournaments: Vec<TournamentInfo> = g.tournaments().map(|t| t.info()).collect();
    HttpResponse::Ok().json(tournaments)
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentId>) -> HttpResponse {
    let g = match read(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.tournament(path.into_inner()) {
        Ok(t) => HttpResponse::Ok().json(t.info()),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentId>) -> HttpResponse {
    let mut g = match write(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.remove_tournament(path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

/// Matches of `round_number`, or of the latest round when the query is absent.
#[get("/api/tournaments/{id}/matches")]
async fn api_get_matches(state: AppState, path: Path<TournamentId>, query: Query<RoundQuery>) -> HttpResponse {
    let g = match read(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.matches(path.into_inner(), query.round_number) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/rounds/{round}/matches")]
async fn api_get_round_matches(state: AppState, path: Path<(TournamentId, RoundNumber)>) -> HttpResponse {
    let (id, round) = path.into_inner();
    let g = match read(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.matches(id, Some(round)) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

/// A round with its tiebreakers.
#[get("/api/tournaments/{id}/rounds/{round}")]
async fn api_get_round(state: AppState, path: Path<(TournamentId, RoundNumber)>) -> HttpResponse {
    let (id, round) = path.into_inner();
    let g = match read(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.round(id, Some(round)) {
        Ok(r) => HttpResponse::Ok().json(RoundMatches {
            round_number: r.number,
            matches: r.matches.clone(),
            tiebreakers: r.tiebreakers.clone(),
        }),
        Err(e) => error_response(&e),
    }
}

#[put("/api/matches/{id}")]
async fn api_set_match_result(state: AppState, path: Path<MatchId>, body: Json<MatchResult>) -> HttpResponse {
    let match_id = path.into_inner();
    let mut g = match write(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.set_match_result(match_id, &body) {
        Ok(_) => {
            log::debug!("Match {match_id}: winner {}", body.winner_id);
            HttpResponse::Ok().json(message("Match result updated"))
        }
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/tiebreakers/check")]
async fn api_check_tiebreakers(state: AppState, path: Path<TournamentId>) -> HttpResponse {
    let g = match read(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.check_tiebreakers(path.into_inner()) {
        Ok(tiebreakers) => HttpResponse::Ok().json(TiebreakerCheck { tiebreakers }),
        Err(e) => error_response(&e),
    }
}

#[post("/api/tournaments/{id}/tiebreakers")]
async fn api_create_tiebreakers(state: AppState, path: Path<TournamentId>) -> HttpResponse {
    let id = path.into_inner();
    let mut g = match write(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.create_tiebreakers(id) {
        Ok(tiebreakers) => {
            log::info!("Tournament {id}: {} tiebreaker matches", tiebreakers.len());
            HttpResponse::Created().json(TiebreakerMatches { tiebreakers })
        }
        Err(e) => error_response(&e),
    }
}

/// Generate the next round. An empty match list means the tournament is over.
#[post("/api/next-round/{id}")]
async fn api_next_round(state: AppState, path: Path<TournamentId>) -> HttpResponse {
    let mut g = match write(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.next_round(path.into_inner()) {
        Ok(matches) => HttpResponse::Ok().json(NextRound {
            message: None,
            matches: Some(matches),
        }),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/rankings")]
async fn api_rankings(state: AppState, path: Path<TournamentId>) -> HttpResponse {
    let g = match read(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.rankings(path.into_inner()) {
        Ok(rankings) => HttpResponse::Ok().json(rankings),
        Err(e) => error_response(&e),
    }
}

/// Every endpoint; shared by `main` and the endpoint tests.
fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_group_stage_formats)
        .service(api_knockout_formats)
        .service(api_list_players)
        .service(api_add_player)
        .service(api_get_player)
        .service(api_rename_player)
        .service(api_remove_player)
        .service(api_create_tournament)
        .service(api_list_tournaments)
        .service(api_get_tournament)
        .service(api_delete_tournament)
        .service(api_get_matches)
        .service(api_get_round_matches)
        .service(api_get_round)
        .service(api_set_match_result)
        .service(api_check_tiebreakers)
        .service(api_create_tiebreakers)
        .service(api_next_round)
        .service(api_rankings);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(RwLock::new(Registry::new()));

    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
