#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chess_core::{GameSession, MoveInput};
use reqwest::Client;
use serde_json::Value;
use server::ai::{AiError, AiSettings, MoveFuture, MoveGenerator};
use server::AppState;
use chess_core::GameMode;

/// Play coordinate moves like "e2e4" or "e7e8q", asserting each is accepted.
pub fn play(session: &mut GameSession, moves: &[&str]) {
    for mv in moves {
        let promotion = mv.get(4..5);
        let input = MoveInput::coordinates(&mv[0..2], &mv[2..4], promotion).unwrap();
        assert!(session.apply_move(input), "move {mv} was rejected");
    }
}

/// Move generator that replays canned answers, then reports an empty reply.
pub struct ScriptedGenerator {
    answers: Mutex<VecDeque<Result<String, AiError>>>,
}

impl ScriptedGenerator {
    pub fn new(answers: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.iter().map(|a| Ok(a.to_string())).collect()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(VecDeque::from([Err(AiError::Http {
                status: 500,
                body: "boom".into(),
            })])),
        })
    }
}

impl MoveGenerator for ScriptedGenerator {
    fn request_move<'a>(&'a self, _fen: &'a str) -> MoveFuture<'a> {
        Box::pin(async move {
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(AiError::EmptyResponse))
        })
    }
}

pub struct TestServer {
    pub base: String,
    pub state: AppState,
    pub client: Client,
}

impl TestServer {
    /// Build a URL for an API endpoint.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn get_json(&self, path: &str) -> Value {
        self.client
            .get(self.url(path))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    /// Poll the game until the AI is no longer thinking.
    pub async fn wait_for_ai(&self) -> Value {
        for _ in 0..200 {
            let game = self.get_json("/api/game").await;
            if game["isAiThinking"] == false {
                return game;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("AI turn never finished");
    }
}

/// Serve the app on an ephemeral port, human (white) against `generator`.
pub async fn spawn_server(generator: Arc<dyn MoveGenerator>) -> TestServer {
    let settings = AiSettings {
        delay: Duration::ZERO,
        max_attempts: 1,
    };
    let state = AppState::new(GameMode::HumanVsAi, generator, settings);
    let app = server::app(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    TestServer {
        base: format!("http://{addr}"),
        state,
        client: Client::new(),
    }
}
