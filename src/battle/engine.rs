//! Transition functions of the battle state machine.
//!
//! Every function takes the session plus an `EventBus` for the events it
//! produces. Events are also appended to the session log. Calls against a
//! terminal session return without touching it.

use crate::battle::ai::{Behavior, EnemyAction};
use crate::battle::damage::{resolve_damage, DamageRange};
use crate::battle::state::{BattleEvent, BattleRng, BattleSession, EventBus, Outcome, Side};
use crate::combatant::{ActiveCombatant, Combatant};
use crate::errors::{ActionError, ArenaResult, BattleStateError};
use crate::roster::Roster;

/// Builds a session with both first entries on the field at full health.
pub fn start_session(session_id: u64, roster: Roster, enemy_roster: Vec<Combatant>) -> ArenaResult<BattleSession> {
    roster.validate()?;
    for member in &enemy_roster {
        member.validate()?;
    }

    let enemy_first = enemy_roster.first().cloned().ok_or(BattleStateError::EnemyPoolTooSmall {
        available: 0,
        required: 1,
    })?;
    let player_first = roster.pokemon[0].clone();
    let player_fainted = vec![false; roster.pokemon.len()];
    let enemy_fainted = vec![false; enemy_roster.len()];

    tracing::debug!(
        session_id,
        roster = %roster.name,
        player = %player_first.name,
        enemy = %enemy_first.name,
        "battle session started"
    );

    Ok(BattleSession {
        session_id,
        player_roster: roster,
        player_index: 0,
        player_active: ActiveCombatant::activate(player_first),
        player_fainted,
        enemy_roster,
        enemy_index: 0,
        enemy_fainted,
        enemy_active: ActiveCombatant::activate(enemy_first),
        log: Vec::new(),
        outcome: Outcome::Undetermined,
        awaiting_ai: false,
    })
}

fn ensure_player_may_act(session: &BattleSession) -> Result<(), ActionError> {
    if session.awaiting_ai {
        return Err(ActionError::AwaitingOpponent);
    }
    Ok(())
}

/// The player attacks the enemy's active combatant.
pub fn execute_player_attack(
    session: &mut BattleSession,
    bus: &mut EventBus,
    rng: &mut BattleRng,
) -> Result<(), ActionError> {
    if session.is_terminal() {
        return Ok(());
    }
    ensure_player_may_act(session)?;

    let roll = resolve_damage(
        session.player_active.primary_category(),
        session.enemy_active.primary_category(),
        DamageRange::PLAYER,
        rng,
    );
    let fainted = session.enemy_active.take_damage(roll.damage);

    let event = BattleEvent::AttackLanded {
        side: Side::Player,
        attacker: session.player_active.name().to_string(),
        defender: session.enemy_active.name().to_string(),
        damage: roll.damage,
        effectiveness: roll.effectiveness(),
        remaining_health: session.enemy_active.current_health(),
    };
    session.record(bus, event);

    if fainted {
        let index = session.enemy_index;
        if let Some(flag) = session.enemy_fainted.get_mut(index) {
            *flag = true;
        }

        if session.enemy_has_next() {
            let fainted_name = session.enemy_active.name().to_string();
            advance_enemy(session);
            let event = BattleEvent::EnemyReplaced {
                fainted: fainted_name,
                replacement: session.enemy_active.name().to_string(),
            };
            session.record(bus, event);
        } else {
            finish(session, bus, Outcome::PlayerWin);
            return Ok(());
        }
    }

    session.awaiting_ai = true;
    Ok(())
}

/// The player swaps the active combatant for `target`, which comes in at full health.
pub fn execute_player_switch(
    session: &mut BattleSession,
    target: usize,
    bus: &mut EventBus,
) -> Result<(), ActionError> {
    if session.is_terminal() {
        return Ok(());
    }
    ensure_player_may_act(session)?;
    validate_switch_target(session, target)?;

    let from = session.player_active.name().to_string();
    activate_player(session, target);
    let event = BattleEvent::PlayerSwitched {
        from,
        to: session.player_active.name().to_string(),
    };
    session.record(bus, event);

    session.awaiting_ai = true;
    Ok(())
}

/// Checks a switch target against the roster: in range, not active, not fainted.
pub fn validate_switch_target(session: &BattleSession, target: usize) -> Result<(), ActionError> {
    if target >= session.player_roster.pokemon.len() {
        return Err(ActionError::InvalidPokemonIndex(target));
    }
    if target == session.player_index {
        return Err(ActionError::AlreadyActive(target));
    }
    if session.player_fainted.get(target).copied().unwrap_or(false) {
        return Err(ActionError::TargetFainted(target));
    }
    Ok(())
}

/// Resolves the enemy's response to the last player action. Runs at most once
/// per player action: without a pending response this does nothing.
pub fn execute_ai_turn(session: &mut BattleSession, behavior: &dyn Behavior, bus: &mut EventBus, rng: &mut BattleRng) {
    if session.is_terminal() || !session.awaiting_ai {
        return;
    }
    session.awaiting_ai = false;

    match behavior.decide_action(session) {
        EnemyAction::SwitchToNext if session.enemy_has_next() => {
            let from = session.enemy_active.name().to_string();
            advance_enemy(session);
            let event = BattleEvent::EnemySwitched {
                from,
                to: session.enemy_active.name().to_string(),
            };
            session.record(bus, event);
        }
        _ => enemy_attack(session, bus, rng),
    }
}

fn enemy_attack(session: &mut BattleSession, bus: &mut EventBus, rng: &mut BattleRng) {
    let roll = resolve_damage(
        session.enemy_active.primary_category(),
        session.player_active.primary_category(),
        DamageRange::ENEMY,
        rng,
    );
    let fainted = session.player_active.take_damage(roll.damage);

    let event = BattleEvent::AttackLanded {
        side: Side::Enemy,
        attacker: session.enemy_active.name().to_string(),
        defender: session.player_active.name().to_string(),
        damage: roll.damage,
        effectiveness: roll.effectiveness(),
        remaining_health: session.player_active.current_health(),
    };
    session.record(bus, event);

    if !fainted {
        return;
    }

    let index = session.player_index;
    if let Some(flag) = session.player_fainted.get_mut(index) {
        *flag = true;
    }

    match session.next_player_replacement() {
        Some(next) => {
            let fainted_name = session.player_active.name().to_string();
            activate_player(session, next);
            let event = BattleEvent::PlayerReplaced {
                fainted: fainted_name,
                replacement: session.player_active.name().to_string(),
            };
            session.record(bus, event);
        }
        None => finish(session, bus, Outcome::EnemyWin),
    }
}

fn advance_enemy(session: &mut BattleSession) {
    session.enemy_index += 1;
    let next = session.enemy_roster[session.enemy_index].clone();
    session.enemy_active = ActiveCombatant::activate(next);
}

fn activate_player(session: &mut BattleSession, index: usize) {
    session.player_index = index;
    let next = session.player_roster.pokemon[index].clone();
    session.player_active = ActiveCombatant::activate(next);
}

fn finish(session: &mut BattleSession, bus: &mut EventBus, outcome: Outcome) {
    session.outcome = outcome;
    session.awaiting_ai = false;
    session.record(bus, BattleEvent::BattleEnded { outcome });
    tracing::debug!(session_id = session.session_id, ?outcome, "battle ended");
}
