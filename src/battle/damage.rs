//! Damage resolution: a uniform base roll scaled by the effectiveness of the
//! attacker's primary category against the defender's primary category.

use crate::battle::state::BattleRng;
use schema::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive range a side's base damage roll is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
}

impl DamageRange {
    /// Player attacks roll higher than enemy attacks.
    pub const PLAYER: DamageRange = DamageRange { min: 20, max: 50 };
    pub const ENEMY: DamageRange = DamageRange { min: 15, max: 40 };

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn clamp(&self, value: u32) -> u32 {
        value.clamp(self.min, self.max)
    }
}

/// The narration bucket a multiplier falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effectiveness {
    SuperEffective,
    Neutral,
    NotVeryEffective,
}

impl Effectiveness {
    pub fn from_multiplier(multiplier: f64) -> Self {
        if multiplier > 1.0 {
            Effectiveness::SuperEffective
        } else if multiplier < 1.0 {
            Effectiveness::NotVeryEffective
        } else {
            Effectiveness::Neutral
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            Effectiveness::SuperEffective => Some("Super effective!"),
            Effectiveness::NotVeryEffective => Some("Not very effective..."),
            Effectiveness::Neutral => None,
        }
    }
}

impl fmt::Display for Effectiveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label().unwrap_or(""))
    }
}

/// Result of one damage resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub base: u32,
    pub multiplier: f64,
    pub damage: u32,
}

impl DamageRoll {
    pub fn effectiveness(&self) -> Effectiveness {
        Effectiveness::from_multiplier(self.multiplier)
    }
}

/// Deterministic half of the resolver: `floor(base * effectiveness)`.
pub fn damage_for_roll(attacking: Category, defending: Category, base: u32) -> DamageRoll {
    let multiplier = Category::effectiveness(attacking, defending);
    let damage = (f64::from(base) * multiplier).floor().max(0.0) as u32;
    DamageRoll {
        base,
        multiplier,
        damage,
    }
}

/// Draws a base roll from `range` and scales it.
pub fn resolve_damage(attacking: Category, defending: Category, range: DamageRange, rng: &mut BattleRng) -> DamageRoll {
    let base = rng.roll(range, "base damage");
    let roll = damage_for_roll(attacking, defending, base);
    tracing::trace!(
        attacking = %attacking,
        defending = %defending,
        base,
        multiplier = roll.multiplier,
        damage = roll.damage,
        "resolved damage"
    );
    roll
}
