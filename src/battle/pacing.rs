//! Paced battles: the enemy's response runs as a deferred task after a short
//! delay instead of inline with the player's action.
//!
//! The continuation is tied to the session id it was scheduled for. Resetting
//! or restarting aborts it, and a continuation that still fires for an old
//! session is discarded by `BattleRunner::resolve_ai_turn`.

use crate::battle::runner::{BattleInfo, BattleRunner, ExecutionResult};
use crate::combatant::Combatant;
use crate::errors::ArenaResult;
use crate::roster::Roster;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Default pause before the enemy responds.
pub const DEFAULT_AI_DELAY: Duration = Duration::from_millis(1000);

struct PendingTurn {
    session_id: u64,
    handle: JoinHandle<Option<ExecutionResult>>,
}

pub struct PacedBattle {
    runner: Arc<Mutex<BattleRunner>>,
    delay: Duration,
    pending: Option<PendingTurn>,
}

impl PacedBattle {
    pub fn new(runner: BattleRunner, delay: Duration) -> Self {
        Self {
            runner: Arc::new(Mutex::new(runner)),
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Shared handle to the underlying runner.
    pub fn runner(&self) -> Arc<Mutex<BattleRunner>> {
        Arc::clone(&self.runner)
    }

    pub fn has_pending_turn(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.handle.is_finished())
    }

    pub async fn start_battle(&mut self, roster: Roster) -> ArenaResult<ExecutionResult> {
        self.cancel_pending();
        self.runner.lock().await.start_battle(roster)
    }

    pub async fn start_battle_against(&mut self, roster: Roster, enemy_roster: Vec<Combatant>) -> ArenaResult<ExecutionResult> {
        self.cancel_pending();
        self.runner.lock().await.start_battle_against(roster, enemy_roster)
    }

    pub async fn player_attack(&mut self) -> ArenaResult<ExecutionResult> {
        let result = self.runner.lock().await.player_attack()?;
        self.schedule_if_needed(&result);
        Ok(result)
    }

    pub async fn switch_pokemon(&mut self, target: usize) -> ArenaResult<ExecutionResult> {
        let result = self.runner.lock().await.switch_pokemon(target)?;
        self.schedule_if_needed(&result);
        Ok(result)
    }

    pub async fn reset_battle(&mut self) {
        self.cancel_pending();
        self.runner.lock().await.reset_battle();
    }

    pub async fn battle_info(&self) -> Option<BattleInfo> {
        self.runner.lock().await.battle_info()
    }

    /// Waits for the scheduled enemy response, if any, and returns what it did.
    pub async fn settle(&mut self) -> Option<ExecutionResult> {
        let pending = self.pending.take()?;
        match pending.handle.await {
            Ok(result) => result,
            Err(err) => {
                if !err.is_cancelled() {
                    tracing::error!(session_id = pending.session_id, error = %err, "AI continuation failed");
                }
                None
            }
        }
    }

    fn schedule_if_needed(&mut self, result: &ExecutionResult) {
        if !result.awaiting_ai {
            return;
        }
        self.cancel_pending();

        let runner = Arc::clone(&self.runner);
        let delay = self.delay;
        let session_id = result.session_id;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut runner = runner.lock().await;
            match runner.resolve_ai_turn(session_id) {
                Ok(result) => result,
                Err(err) => {
                    tracing::warn!(session_id, error = %err, "AI continuation rejected");
                    None
                }
            }
        });

        tracing::debug!(session_id, delay_ms = delay.as_millis() as u64, "scheduled AI response");
        self.pending = Some(PendingTurn { session_id, handle });
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !pending.handle.is_finished() {
                tracing::debug!(session_id = pending.session_id, "cancelled pending AI response");
            }
            pending.handle.abort();
        }
    }
}

impl Drop for PacedBattle {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
