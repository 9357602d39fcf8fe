//! Integration tests for the HTTP API.
//!
//! Drives the router directly with an in-memory store; no network or
//! database needed.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use dp_server::api::{AppState, create_router, request_id::REQUEST_ID_HEADER};
use draw_poker::game::FixedResolver;
use draw_poker::{
    GameEngine, GameManager, InMemorySessionStore, SessionConfig, Winner,
    constants::DEFAULT_OPPONENT_NAMES,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot` method

fn create_test_app_with(engine: GameEngine) -> axum::Router {
    let manager = GameManager::new(
        Arc::new(InMemorySessionStore::new()),
        engine,
        SessionConfig::default(),
    );
    create_router(AppState {
        game_manager: Arc::new(manager),
    })
}

fn create_test_app() -> axum::Router {
    create_test_app_with(GameEngine::with_rng_seed(42))
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create_game(app: &axum::Router) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/games")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

fn game_uri(game: &Value, suffix: &str) -> String {
    format!("/api/v1/games/{}{}", game["gameId"].as_str().unwrap(), suffix)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_app();
    create_game(&app).await;

    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], true);
    assert_eq!(body["sessions"]["active_count"], 1);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = create_test_app();
    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "integration-42")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "integration-42");
}

#[tokio::test]
async fn test_game_handlers_receive_request_id() {
    let app = create_test_app();
    let game = create_game(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri(game_uri(&game, "/bet"))
        .header(header::CONTENT_TYPE, "application/json")
        .header(REQUEST_ID_HEADER, "bet-7")
        .body(Body::from(json!({"action": "call"}).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "bet-7");

    let request = Request::builder()
        .method("POST")
        .uri(game_uri(&game, "/draw"))
        .header(header::CONTENT_TYPE, "application/json")
        .header(REQUEST_ID_HEADER, "draw-8")
        .body(Body::from(json!({"discardIndices": [1]}).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "draw-8");
}

// ============================================================================
// Game Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_create_game_returns_fresh_view() {
    let app = create_test_app();
    let game = create_game(&app).await;

    assert_eq!(game["phase"], "betting");
    assert_eq!(game["pot"], 0);
    assert_eq!(game["currentBet"], 10);
    assert_eq!(game["playerChips"], 1000);
    assert_eq!(game["playerHand"].as_array().unwrap().len(), 5);
    assert_eq!(game["canCall"], true);
    assert_eq!(game["canRaise"], true);
    assert_eq!(game["canFold"], true);
    assert!(game["winner"].is_null());
    assert!(game["winningHand"].is_null());

    let opponents = game["opponents"].as_array().unwrap();
    assert_eq!(opponents.len(), 3);
    for opponent in opponents {
        assert_eq!(opponent["status"], "active");
        assert_eq!(opponent["cardCount"], 5);
        let chips = opponent["chips"].as_u64().unwrap();
        assert!((800..=1200).contains(&chips));
    }
}

#[tokio::test]
async fn test_get_game_returns_same_state() {
    let app = create_test_app();
    let game = create_game(&app).await;

    let (status, body) = send(&app, get(&game_uri(&game, ""))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gameId"], game["gameId"]);
    assert_eq!(body["playerHand"], game["playerHand"]);
}

#[tokio::test]
async fn test_call_then_draw_finishes_game() {
    let engine = GameEngine::with_rng_seed(7)
        .with_resolver(Arc::new(FixedResolver::new(Winner::Seat, "Full House")));
    let app = create_test_app_with(engine);
    let game = create_game(&app).await;

    let (status, called) = send(
        &app,
        post_json(&game_uri(&game, "/bet"), json!({"action": "call"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(called["phase"], "drawing");
    assert_eq!(called["pot"], 10);
    assert_eq!(called["playerChips"], 990);
    assert_eq!(called["canCall"], false);

    let (status, drawn) = send(
        &app,
        post_json(&game_uri(&game, "/draw"), json!({"discardIndices": [0, 2]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(drawn["phase"], "finished");
    assert_eq!(drawn["winner"], "player");
    assert_eq!(drawn["winningHand"], "Full House");
    assert_eq!(drawn["playerHand"][1], called["playerHand"][1]);
    assert_eq!(drawn["playerHand"][3], called["playerHand"][3]);
    assert_eq!(drawn["playerHand"][4], called["playerHand"][4]);
}

#[tokio::test]
async fn test_raise_keeps_betting_open() {
    let app = create_test_app();
    let game = create_game(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            &game_uri(&game, "/bet"),
            json!({"action": "raise", "amount": 50}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "betting");
    assert_eq!(body["pot"], 50);
    assert_eq!(body["currentBet"], 50);
    assert_eq!(body["playerChips"], 950);
}

#[tokio::test]
async fn test_fold_hands_game_to_an_opponent() {
    let app = create_test_app();
    let game = create_game(&app).await;

    let (status, body) = send(
        &app,
        post_json(&game_uri(&game, "/bet"), json!({"action": "fold"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "finished");
    let winner = body["winner"].as_str().unwrap();
    assert!(DEFAULT_OPPONENT_NAMES.contains(&winner));
    assert!(body["winningHand"].is_string());
}

// ============================================================================
// Error Mapping Tests
// ============================================================================

#[tokio::test]
async fn test_malformed_game_id_is_bad_request() {
    let app = create_test_app();

    let (status, body) = send(&app, get("/api/v1/games/not-a-uuid")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid game id"));
}

#[tokio::test]
async fn test_unknown_game_is_not_found() {
    let app = create_test_app();
    let uri = format!("/api/v1/games/{}", uuid::Uuid::new_v4());

    let (status, body) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Game not found");

    let (status, _) = send(&app, post_json(&format!("{uri}/bet"), json!({"action": "call"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_bet_bodies_are_rejected() {
    let app = create_test_app();
    let game = create_game(&app).await;
    let uri = game_uri(&game, "/bet");

    for body in [
        json!({"action": "raise"}),
        json!({"action": "raise", "amount": 0}),
        json!({"action": "check"}),
        json!({"amount": 20}),
    ] {
        let (status, response) = send(&app, post_json(&uri, body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {body}");
        assert!(response["error"].is_string());
    }

    let malformed = Request::builder()
        .method("POST")
        .uri(&uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing above touched the game
    let (_, current) = send(&app, get(&game_uri(&game, ""))).await;
    assert_eq!(current["pot"], 0);
    assert_eq!(current["playerChips"], 1000);
}

#[tokio::test]
async fn test_raise_beyond_chips_is_bad_request() {
    let app = create_test_app();
    let game = create_game(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            &game_uri(&game, "/bet"),
            json!({"action": "raise", "amount": 5000}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_wrong_phase_is_bad_request() {
    let app = create_test_app();
    let game = create_game(&app).await;

    let (status, _) = send(
        &app,
        post_json(&game_uri(&game, "/draw"), json!({"discardIndices": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    send(&app, post_json(&game_uri(&game, "/bet"), json!({"action": "fold"}))).await;

    let (status, _) = send(
        &app,
        post_json(&game_uri(&game, "/bet"), json!({"action": "call"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_discards_are_rejected() {
    let app = create_test_app();
    let game = create_game(&app).await;
    send(&app, post_json(&game_uri(&game, "/bet"), json!({"action": "call"}))).await;
    let uri = game_uri(&game, "/draw");

    for body in [
        json!({"discardIndices": [5]}),
        json!({"discardIndices": [-1]}),
        json!({"discardIndices": [2, 2]}),
        json!({"discardIndices": [0, 1, 2, 3, 4, 0]}),
        json!({}),
    ] {
        let (status, _) = send(&app, post_json(&uri, body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {body}");
    }

    let (_, current) = send(&app, get(&game_uri(&game, ""))).await;
    assert_eq!(current["phase"], "drawing");
}
