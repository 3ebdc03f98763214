use std::time::Duration;

use chess_core::pgn::is_san_token;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ai::{AiError, MoveFuture, MoveGenerator};
use crate::config::Config;

const SYSTEM_INSTRUCTION: &str = "Eres un oponente de ajedrez de clase mundial, un gran maestro. \
Tu nombre es Gemini-Chess. Se te proporcionará la posición actual del tablero en formato FEN. \
Tu tarea es analizar la posición y responder únicamente con el mejor movimiento posible para el \
jugador actual en Notación Algebraica Estándar (SAN). No proporciones ninguna explicación, \
comentario ni ningún otro texto. Tu respuesta completa debe ser solo el movimiento. Por ejemplo: e4";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: std::borrow::Cow<'a, str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    thinking_config: ThinkingConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Default)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| c.content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Gemini `generateContent` client that asks for one SAN move per position.
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, AiError> {
        let client = Client::builder()
            .user_agent("Ajedrez/1.0")
            .timeout(Duration::from_secs(config.ai_timeout_secs))
            .build()?;
        if config.gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY not set - AI moves will fail");
        }
        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            temperature: config.ai_temperature,
        })
    }

    async fn generate(&self, fen: &str) -> Result<String, AiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AiError::NotConfigured("GEMINI_API_KEY"))?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.into(),
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: format!("FEN: {fen}").into(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                top_p: 0.9,
                top_k: 10,
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        };

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Http { status, body });
        }

        let parsed: GenerateResponse = resp.json().await?;
        extract_move(&parsed.text())
    }
}

impl MoveGenerator for GeminiClient {
    fn request_move<'a>(&'a self, fen: &'a str) -> MoveFuture<'a> {
        Box::pin(self.generate(fen))
    }
}

/// Trim the model's reply down to the move token.
/// Odd-looking tokens are passed on; the rules engine has the final say.
pub fn extract_move(text: &str) -> Result<String, AiError> {
    let token = text.trim();
    if token.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    if !is_san_token(token) && (token.contains(' ') || token.len() > 6) {
        warn!(token, "Model returned a suspicious move format, trying it anyway");
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use axum::{extract::Path, http::HeaderMap, routing::post, Json, Router};
    use serde_json::{json, Value};
    use tokio::sync::mpsc;

    use super::*;

    fn config(base_url: String, api_key: Option<&str>) -> Config {
        Config {
            host: "127.0.0.1".into(),
            port: 0,
            gemini_api_key: api_key.map(String::from),
            gemini_model: "test-model".into(),
            gemini_base_url: base_url,
            ai_temperature: 0.3,
            ai_timeout_secs: 5,
            ai_move_delay_ms: 0,
            ai_max_attempts: 1,
        }
    }

    /// Serves `reply` with `status` and forwards each request seen.
    async fn fake_gemini(
        status: u16,
        reply: Value,
    ) -> (String, mpsc::UnboundedReceiver<(String, Option<String>, Value)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Router::new().route(
            "/models/{call}",
            post(move |Path(call): Path<String>, headers: HeaderMap, Json(body): Json<Value>| {
                let tx = tx.clone();
                let reply = reply.clone();
                async move {
                    let key = headers
                        .get("x-goog-api-key")
                        .and_then(|v| v.to_str().ok())
                        .map(String::from);
                    let _ = tx.send((call, key, body));
                    (
                        axum::http::StatusCode::from_u16(status).unwrap(),
                        Json(reply),
                    )
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (format!("http://{addr}"), rx)
    }

    fn reply_with(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    #[test]
    fn test_extract_move_trims() {
        assert_eq!(extract_move("  Nf3\n").unwrap(), "Nf3");
        assert_eq!(extract_move("e4 e5 extra").unwrap(), "e4 e5 extra");
        assert!(matches!(extract_move("  \n"), Err(AiError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_request_shape_and_reply() {
        let (base, mut seen) = fake_gemini(200, reply_with(" e5\n")).await;
        let client = GeminiClient::new(&config(base, Some("secret"))).unwrap();

        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
        let token = client.request_move(fen).await.unwrap();
        assert_eq!(token, "e5");

        let (call, key, body) = seen.recv().await.unwrap();
        assert_eq!(call, "test-model:generateContent");
        assert_eq!(key.as_deref(), Some("secret"));
        assert_eq!(body["contents"][0]["parts"][0]["text"], format!("FEN: {fen}"));
        assert_eq!(body["generationConfig"]["topK"], 10);
        assert_eq!(body["generationConfig"]["thinkingConfig"]["thinkingBudget"], 0);
        let instruction = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
        assert!(instruction.contains("(SAN)"));
    }

    #[tokio::test]
    async fn test_http_error() {
        let (base, _seen) = fake_gemini(503, json!({ "error": "overloaded" })).await;
        let client = GeminiClient::new(&config(base, Some("secret"))).unwrap();
        let err = client.request_move("8/8/8/8/8/8/8/8 w - - 0 1").await.unwrap_err();
        assert!(matches!(err, AiError::Http { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_empty_candidates() {
        let (base, _seen) = fake_gemini(200, json!({ "candidates": [] })).await;
        let client = GeminiClient::new(&config(base, Some("secret"))).unwrap();
        let err = client.request_move("8/8/8/8/8/8/8/8 w - - 0 1").await.unwrap_err();
        assert!(matches!(err, AiError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let client = GeminiClient::new(&config("http://127.0.0.1:9".into(), None)).unwrap();
        let err = client.request_move("8/8/8/8/8/8/8/8 w - - 0 1").await.unwrap_err();
        assert!(matches!(err, AiError::NotConfigured(_)));
    }
}
