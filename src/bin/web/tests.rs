use super::routes;
use actix_web::http::StatusCode;
use actix_web::{test, web::Data, App};
use dart_tournament_rounds::models::{GroupStageFormat, NewTournament, NextRound, TournamentCreated};
use dart_tournament_rounds::{GameMatch, RankingEntry, Registry};
use std::sync::RwLock;

fn state_with_players(names: &[&str]) -> Data<RwLock<Registry>> {
    let mut registry = Registry::new();
    for name in names {
        registry.add_player(name).unwrap();
    }
    Data::new(RwLock::new(registry))
}

#[actix_web::test]
async fn health_reports_ok() {
    let app = test::init_service(App::new().configure(routes)).await;
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ok"], true);
}

#[actix_web::test]
async fn formats_are_listed_with_their_ids() {
    let app = test::init_service(App::new().configure(routes)).await;

    let req = test::TestRequest::get().uri("/api/group-stage-formats").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["format_id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let req = test::TestRequest::get().uri("/api/knock-out-stage-formats").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["format_id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 4]);
}

#[actix_web::test]
async fn duplicate_player_name_is_rejected() {
    let state = state_with_players(&["Anna"]);
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/players")
        .set_json(serde_json::json!({ "name": "Bert" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/players")
        .set_json(serde_json::json!({ "name": "anna" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[actix_web::test]
async fn unknown_tournament_is_not_found() {
    let app = test::init_service(
        App::new()
            .app_data(Data::new(RwLock::new(Registry::new())))
            .configure(routes),
    )
    .await;
    let req = test::TestRequest::get().uri("/api/tournaments/42").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Tournament not found");
}

#[actix_web::test]
async fn create_tournament_accepts_auto_group_count() {
    let state = state_with_players(&["A", "B", "C", "D"]);
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/create-tournament")
        .set_json(serde_json::json!({
            "name": "Friday darts",
            "players": [1, 2, 3, 4],
            "group_stage_format_id": 1,
            "knock_out_stage_format_id": 1,
            "num_groups": "Auto",
            "advancing_players": 2
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: TournamentCreated = test::read_body_json(resp).await;

    let uri = format!("/api/tournaments/{}/matches?round_number=1", created.tournament_id);
    let req = test::TestRequest::get().uri(&uri).to_request();
    let matches: Vec<GameMatch> = test::call_and_read_body_json(&app, req).await;
    // one group of four: every pairing once
    assert_eq!(matches.len(), 6);
    assert!(matches.iter().all(|m| m.group_number == Some(1)));
}

#[actix_web::test]
async fn double_elimination_is_rejected() {
    let state = state_with_players(&["A", "B"]);
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes)).await;
    let req = test::TestRequest::post()
        .uri("/api/create-tournament")
        .set_json(serde_json::json!({
            "name": "Double",
            "players": [1, 2],
            "knock_out_stage_format_id": 2
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn final_match_then_rankings() {
    let state = state_with_players(&["Anna", "Bert"]);
    let tournament_id = {
        let mut registry = state.write().unwrap();
        let mut request = NewTournament::new("Final", vec![1, 2]);
        request.group_stage_format_id = GroupStageFormat::NoGroupStage;
        registry.create_tournament(&request).unwrap()
    };
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes)).await;

    let uri = format!("/api/tournaments/{tournament_id}/matches?round_number=1");
    let req = test::TestRequest::get().uri(&uri).to_request();
    let matches: Vec<GameMatch> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(matches.len(), 1);
    let final_match = &matches[0];
    let winner = final_match.player2.player_id;

    let req = test::TestRequest::put()
        .uri(&format!("/api/matches/{}", final_match.match_id))
        .set_json(serde_json::json!({ "winner_id": winner, "second_place_id": null }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("/api/next-round/{tournament_id}"))
        .to_request();
    let next: NextRound = test::call_and_read_body_json(&app, req).await;
    assert_eq!(next.matches, Some(Vec::new()));

    let req = test::TestRequest::get()
        .uri(&format!("/api/tournaments/{tournament_id}/rankings"))
        .to_request();
    let rankings: Vec<RankingEntry> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rankings.len(), 2);
    assert_eq!(rankings[0].player_id, winner);
    assert_eq!(rankings[0].matches_won, 1);
}

#[actix_web::test]
async fn result_for_outsider_is_rejected() {
    let state = state_with_players(&["Anna", "Bert", "Carl"]);
    let match_id = {
        let mut registry = state.write().unwrap();
        let mut request = NewTournament::new("Outsider", vec![1, 2]);
        request.group_stage_format_id = GroupStageFormat::NoGroupStage;
        let id = registry.create_tournament(&request).unwrap();
        registry.matches(id, Some(1)).unwrap()[0].match_id
    };
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes)).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/matches/{match_id}"))
        .set_json(serde_json::json!({ "winner_id": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/api/matches/999")
        .set_json(serde_json::json!({ "winner_id": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
