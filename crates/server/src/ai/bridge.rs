//! Runs the AI's turn against the shared session.
//!
//! A turn is claimed synchronously (the session raises its thinking flag), then
//! a task waits the pacing delay, asks the generator for a move and feeds the
//! answer back through the session. The flag is dropped by [`ThinkingGuard`]
//! whichever way the task ends, abort included.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chess_core::{AiMoveOutcome, AiTicket, GameError, PlayedMove};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::{AiError, MoveGenerator};
use crate::events::{GameEvent, AI_FAILED_MESSAGE};
use crate::state::{lock, SharedSession};

#[derive(Debug, Clone, Copy)]
pub struct AiSettings {
    /// Pause before the request so the reply does not feel instantaneous.
    pub delay: Duration,
    /// Requests per turn; 1 disables retry.
    pub max_attempts: u32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
            max_attempts: 1,
        }
    }
}

#[derive(Debug)]
pub enum AiTurnReport {
    Moved(PlayedMove),
    /// The generator answered, the rules engine refused the token.
    Rejected { token: String, error: GameError },
    Failed(AiError),
    /// Game reset while the request was out.
    Stale,
}

struct ThinkingGuard {
    session: SharedSession,
    epoch: u64,
}

impl Drop for ThinkingGuard {
    fn drop(&mut self) {
        lock(&self.session).finish_thinking(self.epoch);
    }
}

#[derive(Clone)]
pub struct AiBridge {
    session: SharedSession,
    generator: Arc<dyn MoveGenerator>,
    events: broadcast::Sender<GameEvent>,
    settings: AiSettings,
    inflight: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl AiBridge {
    pub fn new(
        session: SharedSession,
        generator: Arc<dyn MoveGenerator>,
        events: broadcast::Sender<GameEvent>,
        settings: AiSettings,
    ) -> Self {
        Self {
            session,
            generator,
            events,
            settings,
            inflight: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the AI's turn in the background if one is due.
    /// Returns whether a turn was started.
    pub fn schedule(&self) -> bool {
        let Some(ticket) = lock(&self.session).begin_ai_turn() else {
            return false;
        };
        info!(side = ?ticket.side, fen = %ticket.fen, "AI turn started");
        self.publish_snapshot();

        // Owned by the task so an abort before the first poll still clears the flag.
        let guard = self.guard(&ticket);
        let mut slot = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        let bridge = self.clone();
        *slot = Some(tokio::spawn(async move {
            if let AiTurnReport::Moved(_) = bridge.run(ticket, guard).await {
                // Only matters when both sides are AI-controlled.
                bridge.schedule();
            }
        }));
        true
    }

    /// Abort the in-flight turn, if any. Used on reset and new game.
    pub fn cancel(&self) {
        let handle = self
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    /// Claim and play the AI turn on the current task.
    pub async fn run_turn(&self) -> Option<AiTurnReport> {
        let ticket = lock(&self.session).begin_ai_turn()?;
        let guard = self.guard(&ticket);
        Some(self.run(ticket, guard).await)
    }

    fn guard(&self, ticket: &AiTicket) -> ThinkingGuard {
        ThinkingGuard {
            session: self.session.clone(),
            epoch: ticket.epoch,
        }
    }

    async fn run(&self, ticket: AiTicket, guard: ThinkingGuard) -> AiTurnReport {
        if !self.settings.delay.is_zero() {
            tokio::time::sleep(self.settings.delay).await;
        }
        let report = self.request_and_apply(&ticket).await;

        drop(guard);
        self.publish(&report);
        report
    }

    async fn request_and_apply(&self, ticket: &AiTicket) -> AiTurnReport {
        let mut attempt = 1;
        loop {
            let report = match self.generator.request_move(&ticket.fen).await {
                Ok(token) => {
                    let outcome = lock(&self.session).apply_ai_move(ticket, &token);
                    match outcome {
                        AiMoveOutcome::Applied(mv) => {
                            info!(san = %mv.san, "AI moved");
                            return AiTurnReport::Moved(mv);
                        }
                        AiMoveOutcome::Stale => {
                            info!("Discarding AI move for a finished game");
                            return AiTurnReport::Stale;
                        }
                        AiMoveOutcome::Rejected(e) => {
                            error!(token = %token, error = %e, "AI made an invalid move");
                            AiTurnReport::Rejected { token, error: e }
                        }
                    }
                }
                Err(e) => {
                    error!(error = %e, "Error getting AI move");
                    AiTurnReport::Failed(e)
                }
            };

            if attempt >= self.settings.max_attempts || !lock(&self.session).is_current(ticket) {
                return report;
            }
            attempt += 1;
            warn!(attempt, "Retrying AI move");
        }
    }

    fn publish_snapshot(&self) {
        let game = lock(&self.session).snapshot();
        let _ = self.events.send(GameEvent::Snapshot { game });
    }

    fn publish(&self, report: &AiTurnReport) {
        let message = match report {
            AiTurnReport::Stale => return,
            AiTurnReport::Moved(_) => None,
            AiTurnReport::Rejected { token, .. } => {
                Some(format!("La IA propuso un movimiento inválido: {token}"))
            }
            AiTurnReport::Failed(_) => Some(AI_FAILED_MESSAGE.to_string()),
        };
        self.publish_snapshot();
        if let Some(message) = message {
            let _ = self.events.send(GameEvent::AiError { message });
        }
    }
}
