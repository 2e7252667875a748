use crate::errors::CombatantError;
use schema::{Category, CombatantTemplate, PokemonRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Health every combatant enters the field with. Health is a percentage.
pub const FULL_HEALTH: u8 = 100;

/// A roster entry: identity, one or two categories and a sprite reference.
/// Never mutated once built; battle-time health lives in `ActiveCombatant`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: u32,
    pub name: String,
    pub categories: Vec<Category>,
    pub sprite: Option<String>,
}

impl Combatant {
    pub fn new(id: u32, name: impl Into<String>, categories: Vec<Category>) -> Result<Self, CombatantError> {
        let combatant = Self {
            id,
            name: name.into(),
            categories,
            sprite: None,
        };
        combatant.validate()?;
        Ok(combatant)
    }

    /// Checks the category count. Deserialized combatants bypass `new`.
    pub fn validate(&self) -> Result<(), CombatantError> {
        match self.categories.len() {
            0 => Err(CombatantError::NoCategories(self.name.clone())),
            1 | 2 => Ok(()),
            count => Err(CombatantError::TooManyCategories {
                name: self.name.clone(),
                count,
            }),
        }
    }

    pub fn with_sprite(mut self, sprite: impl Into<String>) -> Self {
        self.sprite = Some(sprite.into());
        self
    }

    /// The only category used for damage: additional categories never
    /// take part in effectiveness lookups.
    pub fn primary_category(&self) -> Category {
        // validated combatants always carry at least one category
        self.categories.first().copied().unwrap_or(Category::Normal)
    }
}

impl TryFrom<&PokemonRecord> for Combatant {
    type Error = CombatantError;

    fn try_from(record: &PokemonRecord) -> Result<Self, Self::Error> {
        let categories = record
            .type_names()
            .into_iter()
            .map(|name| {
                Category::from_str(name).map_err(|_| CombatantError::UnknownCategory(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let combatant = Combatant::new(record.id, record.name.clone(), categories)?;
        Ok(match &record.sprites.front_default {
            Some(sprite) => combatant.with_sprite(sprite.clone()),
            None => combatant,
        })
    }
}

impl TryFrom<PokemonRecord> for Combatant {
    type Error = CombatantError;

    fn try_from(record: PokemonRecord) -> Result<Self, Self::Error> {
        Combatant::try_from(&record)
    }
}

impl From<&CombatantTemplate> for Combatant {
    fn from(template: &CombatantTemplate) -> Self {
        Self {
            id: template.id,
            name: template.name.clone(),
            categories: template.categories.clone(),
            sprite: Some(template.sprite.clone()),
        }
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let categories: Vec<String> = self.categories.iter().map(|c| c.to_string()).collect();
        write!(f, "#{} {} [{}]", self.id, self.name, categories.join("/"))
    }
}

/// A combatant on the field, with transient percentage health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCombatant {
    pub combatant: Combatant,
    current_health: u8,
}

impl ActiveCombatant {
    /// Put a combatant on the field at full health.
    pub fn activate(combatant: Combatant) -> Self {
        Self {
            combatant,
            current_health: FULL_HEALTH,
        }
    }

    pub fn current_health(&self) -> u8 {
        self.current_health
    }

    /// Subtracts damage, flooring at zero. Returns true if this hit fainted it.
    pub fn take_damage(&mut self, damage: u32) -> bool {
        let was_fainted = self.is_fainted();
        self.current_health = u32::from(self.current_health).saturating_sub(damage) as u8;
        !was_fainted && self.is_fainted()
    }

    pub fn is_fainted(&self) -> bool {
        self.current_health == 0
    }

    pub fn primary_category(&self) -> Category {
        self.combatant.primary_category()
    }

    pub fn name(&self) -> &str {
        &self.combatant.name
    }

    #[cfg(test)]
    pub(crate) fn set_health(&mut self, health: u8) {
        self.current_health = health.min(FULL_HEALTH);
    }
}

impl fmt::Display for ActiveCombatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%)", self.combatant, self.current_health)
    }
}
