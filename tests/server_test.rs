//! HTTP flow against a live server with a scripted move generator.

mod common;

use chess_core::Side;
use common::{spawn_server, ScriptedGenerator};
use serde_json::json;
use server::events::{GameEvent, AI_FAILED_MESSAGE};

#[tokio::test]
async fn test_health() {
    let server = spawn_server(ScriptedGenerator::new(&[])).await;
    let body = server.get_json("/health").await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_human_move_then_ai_reply() {
    let server = spawn_server(ScriptedGenerator::new(&["e5"])).await;

    let (status, body) = server
        .post_json("/api/game/move", json!({ "from": "e2", "to": "e4" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["accepted"], true);
    assert_eq!(body["game"]["moves"], json!(["e4"]));

    let game = server.wait_for_ai().await;
    assert_eq!(game["moves"], json!(["e4", "e5"]));
    assert_eq!(game["turn"], "w");
    assert_eq!(game["status"]["displayMessage"], "Turno de las Blancas");
}

#[tokio::test]
async fn test_illegal_move_snaps_back() {
    let server = spawn_server(ScriptedGenerator::new(&[])).await;
    let before = server.get_json("/api/game").await;

    let (status, body) = server
        .post_json("/api/game/move", json!({ "from": "e2", "to": "e5" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["accepted"], false);
    assert_eq!(body["game"], before);

    let (status, body) = server
        .post_json("/api/game/move", json!({ "from": "z9", "to": "e4" }))
        .await;
    assert_eq!(status, 400);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_malformed_ai_token() {
    let server = spawn_server(ScriptedGenerator::new(&["e4 e5 extra"])).await;
    let mut events = server.state.subscribe();

    server
        .post_json("/api/game/move", json!({ "from": "e2", "to": "e4" }))
        .await;
    let game = server.wait_for_ai().await;

    // Still black to move, position as the human left it.
    assert_eq!(game["moves"], json!(["e4"]));
    assert_eq!(game["turn"], "b");
    assert_eq!(game["isAiThinking"], false);

    let mut message = None;
    while let Ok(event) = events.recv().await {
        if let GameEvent::AiError { message: m } = event {
            message = Some(m);
            break;
        }
    }
    assert_eq!(message.unwrap(), "La IA propuso un movimiento inválido: e4 e5 extra");
}

#[tokio::test]
async fn test_transport_failure_needs_reset() {
    let server = spawn_server(ScriptedGenerator::failing()).await;
    let mut events = server.state.subscribe();

    server
        .post_json("/api/game/move", json!({ "from": "d2", "to": "d4" }))
        .await;
    let game = server.wait_for_ai().await;
    assert_eq!(game["turn"], "b");

    loop {
        if let GameEvent::AiError { message } = events.recv().await.unwrap() {
            assert_eq!(message, AI_FAILED_MESSAGE);
            break;
        }
    }

    // The human cannot move for black; only a reset recovers.
    let (_, body) = server
        .post_json("/api/game/move", json!({ "from": "d7", "to": "d5" }))
        .await;
    assert_eq!(body["accepted"], false);

    let (status, game) = server.post_json("/api/game/reset", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(game["moves"], json!([]));
    assert_eq!(game["turn"], "w");
    assert_eq!(server.state.session().turn(), Side::White);
}

#[tokio::test]
async fn test_flip_and_new_game() {
    let server = spawn_server(ScriptedGenerator::new(&[])).await;

    let (_, game) = server.post_json("/api/game/flip", json!({})).await;
    assert_eq!(game["orientation"], "black");

    let (_, game) = server
        .post_json("/api/game/new", json!({ "mode": "human-vs-human" }))
        .await;
    assert_eq!(game["orientation"], "white");
    assert_eq!(game["players"], json!({ "w": "human", "b": "human" }));
    assert_eq!(game["mode"], "human-vs-human");

    // Both sides are human now: black moves through the API too.
    for (from, to) in [("e2", "e4"), ("e7", "e5")] {
        let (_, body) = server
            .post_json("/api/game/move", json!({ "from": from, "to": to }))
            .await;
        assert_eq!(body["accepted"], true);
    }
}

#[tokio::test]
async fn test_tap_to_move() {
    let server = spawn_server(ScriptedGenerator::new(&["Nf6"])).await;

    let (_, body) = server.post_json("/api/game/tap", json!({ "square": "g1" })).await;
    assert_eq!(body["selected"], "g1");
    assert_eq!(body["moved"], false);

    let (_, body) = server.post_json("/api/game/tap", json!({ "square": "f3" })).await;
    assert_eq!(body["moved"], true);
    assert!(body["selected"].is_null());

    let game = server.wait_for_ai().await;
    assert_eq!(game["moves"], json!(["Nf3", "Nf6"]));
}

#[tokio::test]
async fn test_dpad_moves_pawn() {
    let server = spawn_server(ScriptedGenerator::new(&[])).await;

    // Focus starts on e2.
    let (_, body) = server.post_json("/api/game/key", json!({ "key": "Enter" })).await;
    assert_eq!(body["selected"], "e2");
    for _ in 0..2 {
        server.post_json("/api/game/key", json!({ "key": "ArrowUp" })).await;
    }
    let (_, body) = server.post_json("/api/game/key", json!({ "key": "Select" })).await;
    assert_eq!(body["focus"], "e4");
    assert_eq!(body["moved"], true);
    assert_eq!(body["game"]["moves"], json!(["e4"]));
}

#[tokio::test]
async fn test_pgn_export() {
    let server = spawn_server(ScriptedGenerator::new(&[])).await;
    server
        .post_json("/api/game/new", json!({ "mode": "human-vs-human" }))
        .await;
    for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
        server
            .post_json("/api/game/move", json!({ "from": from, "to": to }))
            .await;
    }

    let resp = server.client.get(server.url("/api/game/pgn")).send().await.unwrap();
    assert!(resp.headers()["content-type"].to_str().unwrap().starts_with("text/plain"));
    let pgn = resp.text().await.unwrap();
    assert!(pgn.contains("[Result \"0-1\"]"));
    assert!(pgn.contains("1. f3 e5 2. g4 Qh4# 0-1"));
}

#[tokio::test]
async fn test_layout_for_tv() {
    let server = spawn_server(ScriptedGenerator::new(&[])).await;
    let (status, body) = server
        .post_json(
            "/api/layout",
            json!({
                "userAgent": "Mozilla/5.0 (Linux; Android 9; BRAVIA 4K GB Build/PTT1) GoogleTV",
                "viewport": { "width": 1920, "height": 1080 }
            }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["device"]["isTv"], true);
    assert_eq!(body["layout"]["input"], "directional-pad");
    assert_eq!(body["layout"]["boardPx"], 960);
}
