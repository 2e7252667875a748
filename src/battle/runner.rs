use crate::battle::ai::{Behavior, ThresholdAI};
use crate::battle::engine::{execute_ai_turn, execute_player_attack, execute_player_switch, start_session};
use crate::battle::state::{BattleEvent, BattleRng, BattleSession, EventBus, Outcome};
use crate::combatant::Combatant;
use crate::enemy_pool::generate_enemy_roster;
use crate::errors::{ArenaResult, BattleStateError};
use crate::roster::Roster;
use schema::Category;
use serde::Serialize;

/// The externally observable mode of the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArenaPhase {
    /// No battle; the player picks a roster.
    Select,
    Battle,
    Terminal,
}

/// High-level interface over the battle state machine. Owns the session, the
/// random source and the enemy behavior.
pub struct BattleRunner {
    session: Option<BattleSession>,
    next_session_id: u64,
    rng: BattleRng,
    behavior: Box<dyn Behavior>,
}

/// Snapshot of the battle for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct BattleInfo {
    pub session_id: u64,
    pub phase: ArenaPhase,
    pub outcome: Outcome,
    pub awaiting_ai: bool,
    pub roster_name: String,
    pub player: SideInfo,
    pub enemy: SideInfo,
    pub log: Vec<String>,
}

/// One side of the field
#[derive(Debug, Clone, Serialize)]
pub struct SideInfo {
    pub active: CombatantInfo,
    pub active_index: usize,
    pub team: Vec<CombatantInfo>,
    pub fainted_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CombatantInfo {
    pub id: u32,
    pub name: String,
    pub categories: Vec<Category>,
    pub sprite: Option<String>,
    /// Only known for the combatant on the field.
    pub current_health: Option<u8>,
    pub is_fainted: bool,
    pub is_active: bool,
}

/// Result of one transition
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub session_id: u64,
    pub events: Vec<BattleEvent>,
    pub outcome: Outcome,
    pub awaiting_ai: bool,
}

impl ExecutionResult {
    fn from_session(session: &BattleSession, bus: EventBus) -> Self {
        Self {
            session_id: session.session_id,
            events: bus.into_events(),
            outcome: session.outcome,
            awaiting_ai: session.awaiting_ai,
        }
    }

    pub fn battle_ended(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn narration(&self) -> Vec<String> {
        self.events.iter().map(BattleEvent::format).collect()
    }
}

impl BattleRunner {
    pub fn new() -> Self {
        Self::with_rng(BattleRng::new_random())
    }

    pub fn with_rng(rng: BattleRng) -> Self {
        Self {
            session: None,
            next_session_id: 1,
            rng,
            behavior: Box::new(ThresholdAI::new()),
        }
    }

    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behavior = Box::new(behavior);
        self
    }

    pub fn phase(&self) -> ArenaPhase {
        match &self.session {
            None => ArenaPhase::Select,
            Some(session) if session.is_terminal() => ArenaPhase::Terminal,
            Some(_) => ArenaPhase::Battle,
        }
    }

    pub fn session(&self) -> Option<&BattleSession> {
        self.session.as_ref()
    }

    /// Session id whose AI response is still outstanding, if any.
    pub fn pending_ai_turn(&self) -> Option<u64> {
        self.session
            .as_ref()
            .filter(|s| s.awaiting_ai && !s.is_terminal())
            .map(|s| s.session_id)
    }

    /// Start a battle against a freshly drawn enemy roster. Replaces any
    /// session in progress.
    pub fn start_battle(&mut self, roster: Roster) -> ArenaResult<ExecutionResult> {
        let enemy_roster = generate_enemy_roster(&mut self.rng)?;
        self.start_battle_against(roster, enemy_roster)
    }

    /// Start a battle against a given enemy roster.
    pub fn start_battle_against(&mut self, roster: Roster, enemy_roster: Vec<Combatant>) -> ArenaResult<ExecutionResult> {
        let session_id = self.next_session_id;
        let session = start_session(session_id, roster, enemy_roster)?;
        self.next_session_id += 1;

        let result = ExecutionResult::from_session(&session, EventBus::new());
        self.session = Some(session);
        Ok(result)
    }

    pub fn player_attack(&mut self) -> ArenaResult<ExecutionResult> {
        let session = self.session.as_mut().ok_or(BattleStateError::NoActiveBattle)?;
        let mut bus = EventBus::new();
        execute_player_attack(session, &mut bus, &mut self.rng)?;
        Ok(ExecutionResult::from_session(session, bus))
    }

    pub fn switch_pokemon(&mut self, target: usize) -> ArenaResult<ExecutionResult> {
        let session = self.session.as_mut().ok_or(BattleStateError::NoActiveBattle)?;
        let mut bus = EventBus::new();
        execute_player_switch(session, target, &mut bus)?;
        Ok(ExecutionResult::from_session(session, bus))
    }

    /// Runs the enemy's deferred response for `session_id`. A continuation
    /// for a session that has since been reset or replaced is discarded and
    /// yields `None`.
    pub fn resolve_ai_turn(&mut self, session_id: u64) -> ArenaResult<Option<ExecutionResult>> {
        let session = match self.session.as_mut() {
            Some(session) if session.session_id == session_id => session,
            Some(session) => {
                tracing::warn!(
                    stale = session_id,
                    current = session.session_id,
                    "discarding AI continuation for a replaced session"
                );
                return Ok(None);
            }
            None => {
                tracing::warn!(stale = session_id, "discarding AI continuation after reset");
                return Ok(None);
            }
        };

        if !session.awaiting_ai {
            return Ok(None);
        }

        let mut bus = EventBus::new();
        execute_ai_turn(session, self.behavior.as_ref(), &mut bus, &mut self.rng);
        Ok(Some(ExecutionResult::from_session(session, bus)))
    }

    /// Back to roster selection, discarding the session.
    pub fn reset_battle(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(session_id = session.session_id, "battle reset");
        }
    }

    pub fn battle_info(&self) -> Option<BattleInfo> {
        let session = self.session.as_ref()?;

        let player_team: Vec<CombatantInfo> = session
            .player_roster
            .pokemon
            .iter()
            .enumerate()
            .map(|(i, combatant)| {
                let is_active = i == session.player_index;
                combatant_info(
                    combatant,
                    is_active.then(|| session.player_active.current_health()),
                    session.player_fainted.get(i).copied().unwrap_or(false),
                    is_active,
                )
            })
            .collect();

        let enemy_team: Vec<CombatantInfo> = session
            .enemy_roster
            .iter()
            .enumerate()
            .map(|(i, combatant)| {
                let is_active = i == session.enemy_index;
                combatant_info(
                    combatant,
                    is_active.then(|| session.enemy_active.current_health()),
                    session.enemy_fainted.get(i).copied().unwrap_or(false),
                    is_active,
                )
            })
            .collect();

        Some(BattleInfo {
            session_id: session.session_id,
            phase: self.phase(),
            outcome: session.outcome,
            awaiting_ai: session.awaiting_ai,
            roster_name: session.player_roster.name.clone(),
            player: SideInfo {
                active: player_team[session.player_index].clone(),
                active_index: session.player_index,
                fainted_count: session.player_fainted_count(),
                team: player_team,
            },
            enemy: SideInfo {
                active: enemy_team[session.enemy_index].clone(),
                active_index: session.enemy_index,
                fainted_count: session.enemy_fainted_count(),
                team: enemy_team,
            },
            log: session.narration(),
        })
    }
}

impl Default for BattleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BattleRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleRunner")
            .field("session", &self.session)
            .field("next_session_id", &self.next_session_id)
            .finish_non_exhaustive()
    }
}

fn combatant_info(combatant: &Combatant, current_health: Option<u8>, is_fainted: bool, is_active: bool) -> CombatantInfo {
    CombatantInfo {
        id: combatant.id,
        name: combatant.name.clone(),
        categories: combatant.categories.clone(),
        sprite: combatant.sprite.clone(),
        current_health,
        is_fainted,
        is_active,
    }
}
