use crate::battle::damage::{DamageRange, Effectiveness};
use crate::combatant::{ActiveCombatant, Combatant};
use crate::roster::Roster;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Undetermined,
    PlayerWin,
    EnemyWin,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Undetermined)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    AttackLanded {
        side: Side,
        attacker: String,
        defender: String,
        damage: u32,
        effectiveness: Effectiveness,
        remaining_health: u8,
    },
    /// The enemy's active combatant fainted and the next one came in.
    EnemyReplaced {
        fainted: String,
        replacement: String,
    },
    /// The AI pulled a weakened combatant for the next one.
    EnemySwitched {
        from: String,
        to: String,
    },
    PlayerReplaced {
        fainted: String,
        replacement: String,
    },
    PlayerSwitched {
        from: String,
        to: String,
    },
    BattleEnded {
        outcome: Outcome,
    },
}

impl BattleEvent {
    /// The narration line shown in the battle log.
    pub fn format(&self) -> String {
        match self {
            BattleEvent::AttackLanded {
                side,
                damage,
                effectiveness,
                ..
            } => {
                let who = match side {
                    Side::Player => "You",
                    Side::Enemy => "Enemy",
                };
                match effectiveness.label() {
                    Some(label) => format!("{} attacked for {} damage! {}", who, damage, label),
                    None => format!("{} attacked for {} damage!", who, damage),
                }
            }
            BattleEvent::EnemyReplaced { fainted, replacement } => {
                format!("Enemy {} fainted! Enemy switched to {}!", fainted, replacement)
            }
            BattleEvent::EnemySwitched { to, .. } => format!("Enemy switched to {}!", to),
            BattleEvent::PlayerReplaced { fainted, replacement } => {
                format!("Your {} fainted! You switched to {}!", fainted, replacement)
            }
            BattleEvent::PlayerSwitched { to, .. } => format!("You switched to {}!", to),
            BattleEvent::BattleEnded { outcome } => match outcome {
                Outcome::PlayerWin => "You won the battle!".to_string(),
                Outcome::EnemyWin => "You lost the battle!".to_string(),
                Outcome::Undetermined => "The battle was interrupted.".to_string(),
            },
        }
    }
}

/// Events produced by a single transition, in order.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Narration lines for every event, in order.
    pub fn formatted(&self) -> Vec<String> {
        self.events.iter().map(BattleEvent::format).collect()
    }

    /// Print all events in debug format with a custom prefix message.
    pub fn print_debug_with_message(&self, message: &str) {
        println!("{}", message);
        for event in &self.events {
            println!("  {:?}", event);
        }
    }
}

/// Random source for a battle. Scripted rolls are consumed first, which lets
/// tests force exact damage while shuffles stay seeded.
#[derive(Debug, Clone)]
pub struct BattleRng {
    rng: StdRng,
    scripted: VecDeque<u32>,
}

impl BattleRng {
    pub fn new_random() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
            scripted: VecDeque::new(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            scripted: VecDeque::new(),
        }
    }

    /// Base rolls are taken from `rolls` in order before falling back to a
    /// fixed seed. Rolls outside the requested range are clamped into it.
    pub fn new_for_test(rolls: Vec<u32>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(0),
            scripted: rolls.into(),
        }
    }

    pub fn roll(&mut self, range: DamageRange, reason: &str) -> u32 {
        let value = match self.scripted.pop_front() {
            Some(forced) => range.clamp(forced),
            None => self.rng.random_range(range.min..=range.max),
        };
        tracing::trace!(value, reason, "consumed roll");
        value
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

impl Default for BattleRng {
    fn default() -> Self {
        Self::new_random()
    }
}

/// The full mutable state of one encounter.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleSession {
    pub session_id: u64,
    pub player_roster: Roster,
    pub player_index: usize,
    pub player_active: ActiveCombatant,
    /// Parallel to `player_roster.pokemon`.
    pub player_fainted: Vec<bool>,
    pub enemy_roster: Vec<Combatant>,
    pub enemy_index: usize,
    /// Parallel to `enemy_roster`. Entries the AI switched away from stay unfainted.
    pub enemy_fainted: Vec<bool>,
    pub enemy_active: ActiveCombatant,
    pub log: Vec<BattleEvent>,
    pub outcome: Outcome,
    /// Set after a player action that left the battle undetermined, until the
    /// opponent's response resolves.
    pub awaiting_ai: bool,
}

impl BattleSession {
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn enemy_has_next(&self) -> bool {
        self.enemy_index + 1 < self.enemy_roster.len()
    }

    /// First unfainted roster slot after the active one. Earlier slots are
    /// never brought back in.
    pub fn next_player_replacement(&self) -> Option<usize> {
        (self.player_index + 1..self.player_roster.pokemon.len())
            .find(|&i| !self.player_fainted.get(i).copied().unwrap_or(true))
    }

    pub fn player_fainted_count(&self) -> usize {
        self.player_fainted.iter().filter(|&&f| f).count()
    }

    pub fn enemy_fainted_count(&self) -> usize {
        self.enemy_fainted.iter().filter(|&&f| f).count()
    }

    /// Log lines for the presentation layer.
    pub fn narration(&self) -> Vec<String> {
        self.log.iter().map(BattleEvent::format).collect()
    }

    /// Appends to the session log and to the transition's bus.
    pub(crate) fn record(&mut self, bus: &mut EventBus, event: BattleEvent) {
        self.log.push(event.clone());
        bus.push(event);
    }
}
