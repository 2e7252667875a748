use crate::combatant::Combatant;
use crate::errors::{RosterError, RosterResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Every player roster, and every generated enemy roster, has exactly this many members.
pub const ROSTER_SIZE: usize = 5;

/// Roster identifier, derived from the creation timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RosterId(pub u64);

impl RosterId {
    pub fn from_timestamp(created_at: DateTime<Utc>) -> Self {
        Self(created_at.timestamp_millis().max(0) as u64)
    }
}

impl fmt::Display for RosterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A saved team of combatants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub id: RosterId,
    pub name: String,
    pub pokemon: Vec<Combatant>,
    pub created_at: DateTime<Utc>,
}

impl Roster {
    /// Create a roster stamped with the current time.
    pub fn new(name: impl Into<String>, pokemon: Vec<Combatant>) -> RosterResult<Self> {
        Self::new_at(name, pokemon, Utc::now())
    }

    pub fn new_at(name: impl Into<String>, pokemon: Vec<Combatant>, created_at: DateTime<Utc>) -> RosterResult<Self> {
        let roster = Self {
            id: RosterId::from_timestamp(created_at),
            name: name.into().trim().to_string(),
            pokemon,
            created_at,
        };
        roster.validate()?;
        Ok(roster)
    }

    /// Checks the invariants a roster must satisfy to be saved or battled with.
    /// Deserialized rosters bypass `new`, so callers re-check here.
    pub fn validate(&self) -> RosterResult<()> {
        if self.pokemon.is_empty() {
            return Err(RosterError::Empty);
        }
        if self.pokemon.len() != ROSTER_SIZE {
            return Err(RosterError::WrongSize {
                expected: ROSTER_SIZE,
                actual: self.pokemon.len(),
            });
        }
        let mut seen = HashSet::new();
        for member in &self.pokemon {
            member.validate()?;
            if !seen.insert(member.id) {
                return Err(RosterError::DuplicateMember(member.id));
            }
        }
        if self.name.trim().is_empty() {
            return Err(RosterError::MissingName);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pokemon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pokemon.is_empty()
    }
}

impl fmt::Display for Roster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.pokemon.iter().map(|p| p.name.as_str()).collect();
        write!(f, "{} ({})", self.name, names.join(", "))
    }
}

/// Incrementally assembles a roster, enforcing size and uniqueness as members are added.
#[derive(Debug, Clone, Default)]
pub struct RosterBuilder {
    members: Vec<Combatant>,
}

impl RosterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, combatant: Combatant) -> RosterResult<()> {
        if self.members.len() >= ROSTER_SIZE {
            return Err(RosterError::TeamFull(ROSTER_SIZE));
        }
        if self.contains(combatant.id) {
            return Err(RosterError::DuplicateMember(combatant.id));
        }
        self.members.push(combatant);
        Ok(())
    }

    pub fn remove(&mut self, id: u32) -> RosterResult<Combatant> {
        let position = self
            .members
            .iter()
            .position(|c| c.id == id)
            .ok_or(RosterError::NotAMember(id))?;
        Ok(self.members.remove(position))
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn contains(&self, id: u32) -> bool {
        self.members.iter().any(|c| c.id == id)
    }

    pub fn members(&self) -> &[Combatant] {
        &self.members
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= ROSTER_SIZE
    }

    /// Builds the roster and empties the builder. On failure the members are kept.
    pub fn build(&mut self, name: &str) -> RosterResult<Roster> {
        if self.members.len() != ROSTER_SIZE {
            return Err(RosterError::WrongSize {
                expected: ROSTER_SIZE,
                actual: self.members.len(),
            });
        }
        if name.trim().is_empty() {
            return Err(RosterError::MissingName);
        }
        let roster = Roster::new(name, self.members.clone())?;
        self.members.clear();
        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CombatantError;
    use pretty_assertions::assert_eq;
    use schema::Category;

    fn member(id: u32) -> Combatant {
        Combatant::new(id, format!("pokemon-{}", id), vec![Category::Normal]).unwrap()
    }

    #[test]
    fn builder_rejects_sixth_member_and_duplicates() {
        let mut builder = RosterBuilder::new();
        for id in 1..=5 {
            builder.add(member(id)).unwrap();
        }
        assert!(builder.is_full());
        assert_eq!(builder.add(member(6)), Err(RosterError::TeamFull(ROSTER_SIZE)));

        builder.remove(5).unwrap();
        assert_eq!(builder.add(member(1)), Err(RosterError::DuplicateMember(1)));
    }

    #[test]
    fn builder_requires_full_team_and_name() {
        let mut builder = RosterBuilder::new();
        builder.add(member(1)).unwrap();
        assert_eq!(
            builder.build("Starters").unwrap_err(),
            RosterError::WrongSize {
                expected: ROSTER_SIZE,
                actual: 1
            }
        );

        for id in 2..=5 {
            builder.add(member(id)).unwrap();
        }
        assert_eq!(builder.build("   ").unwrap_err(), RosterError::MissingName);
        assert_eq!(builder.members().len(), 5);

        let roster = builder.build("  Starters ").unwrap();
        assert_eq!(roster.name, "Starters");
        assert_eq!(roster.len(), ROSTER_SIZE);
        assert!(builder.members().is_empty());
    }

    #[test]
    fn removing_unknown_member_is_an_error() {
        let mut builder = RosterBuilder::new();
        assert_eq!(builder.remove(42).unwrap_err(), RosterError::NotAMember(42));
    }

    #[test]
    fn validate_catches_tampered_rosters() {
        let mut roster = Roster::new("Team", (1..=5).map(member).collect()).unwrap();
        roster.pokemon.pop();
        assert_eq!(
            roster.validate(),
            Err(RosterError::WrongSize {
                expected: ROSTER_SIZE,
                actual: 4
            })
        );
        roster.pokemon.clear();
        assert_eq!(roster.validate(), Err(RosterError::Empty));
    }

    #[test]
    fn validate_rechecks_member_categories() {
        let mut roster = Roster::new("Team", (1..=5).map(member).collect()).unwrap();
        roster.pokemon[2].categories.clear();
        assert_eq!(
            roster.validate(),
            Err(RosterError::InvalidMember(CombatantError::NoCategories("pokemon-3".to_string())))
        );
    }

    #[test]
    fn id_is_derived_from_creation_time() {
        let created_at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let roster = Roster::new_at("Team", (1..=5).map(member).collect(), created_at).unwrap();
        assert_eq!(roster.id, RosterId(1_700_000_000_123));
    }
}
