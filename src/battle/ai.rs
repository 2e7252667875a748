//! A module for defining AI behaviors for the enemy side.

use crate::battle::state::BattleSession;

/// What the enemy does when it gets its response turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyAction {
    Attack,
    /// Bring in the next roster entry at full health.
    SwitchToNext,
}

/// A trait for any system that can decide the enemy's response.
pub trait Behavior: Send + Sync {
    /// Inspects the session and decides on the enemy's next action.
    fn decide_action(&self, session: &BattleSession) -> EnemyAction;
}

/// Health below which the default AI retreats.
pub const DEFAULT_SWITCH_THRESHOLD: u8 = 30;

/// Switches out when the active enemy is below a health threshold and a next
/// roster entry exists; otherwise attacks. No lookahead.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdAI {
    switch_below: u8,
}

impl ThresholdAI {
    pub fn new() -> Self {
        Self {
            switch_below: DEFAULT_SWITCH_THRESHOLD,
        }
    }

    pub fn with_threshold(switch_below: u8) -> Self {
        Self { switch_below }
    }
}

impl Default for ThresholdAI {
    fn default() -> Self {
        Self::new()
    }
}

impl Behavior for ThresholdAI {
    fn decide_action(&self, session: &BattleSession) -> EnemyAction {
        if session.enemy_active.current_health() < self.switch_below && session.enemy_has_next() {
            EnemyAction::SwitchToNext
        } else {
            EnemyAction::Attack
        }
    }
}

/// Always attacks. Useful for exercising the player-faint path.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggressiveAI;

impl Behavior for AggressiveAI {
    fn decide_action(&self, _session: &BattleSession) -> EnemyAction {
        EnemyAction::Attack
    }
}
