//! Saved-roster persistence.

use crate::errors::{StoreError, StoreResult};
use crate::roster::{Roster, RosterId};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Namespace every roster document is stored under.
pub const ROSTER_NAMESPACE: &str = "pokemon-teams";

pub trait RosterStore: Send + Sync {
    /// All saved rosters, in save order.
    fn load_rosters(&self) -> StoreResult<Vec<Roster>>;

    /// Saves a complete roster, replacing any roster with the same id.
    fn save_roster(&self, roster: &Roster) -> StoreResult<()>;

    /// Removes a roster. Unknown ids are ignored.
    fn delete_roster(&self, id: RosterId) -> StoreResult<()>;

    fn get_roster(&self, id: RosterId) -> StoreResult<Option<Roster>> {
        Ok(self.load_rosters()?.into_iter().find(|r| r.id == id))
    }
}

fn check_complete(roster: &Roster) -> StoreResult<()> {
    roster.validate().map_err(|source| StoreError::InvalidRoster { id: roster.id, source })
}

fn upsert(rosters: &mut Vec<Roster>, roster: &Roster) {
    match rosters.iter_mut().find(|r| r.id == roster.id) {
        Some(existing) => *existing = roster.clone(),
        None => rosters.push(roster.clone()),
    }
}

/// Stores every roster in one JSON document, `<dir>/pokemon-teams.json`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", ROSTER_NAMESPACE)),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoreResult<Vec<Roster>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let rosters: Vec<Roster> = serde_json::from_str(&text)?;
        Ok(rosters
            .into_iter()
            .filter(|roster| match roster.validate() {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(id = %roster.id, error = %err, "skipping invalid stored roster");
                    false
                }
            })
            .collect())
    }

    fn write(&self, rosters: &[Roster]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(rosters)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl RosterStore for JsonFileStore {
    fn load_rosters(&self) -> StoreResult<Vec<Roster>> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        self.read()
    }

    fn save_roster(&self, roster: &Roster) -> StoreResult<()> {
        check_complete(roster)?;
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;

        let mut rosters = self.read()?;
        upsert(&mut rosters, roster);
        self.write(&rosters)?;

        tracing::info!(id = %roster.id, name = %roster.name, path = %self.path.display(), "saved roster");
        Ok(())
    }

    fn delete_roster(&self, id: RosterId) -> StoreResult<()> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;

        let mut rosters = self.read()?;
        let before = rosters.len();
        rosters.retain(|r| r.id != id);
        if rosters.len() == before {
            tracing::debug!(%id, "delete of unknown roster ignored");
            return Ok(());
        }
        self.write(&rosters)?;

        tracing::info!(%id, "deleted roster");
        Ok(())
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rosters: Mutex<Vec<Roster>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RosterStore for MemoryStore {
    fn load_rosters(&self) -> StoreResult<Vec<Roster>> {
        Ok(self.rosters.lock().map_err(|_| StoreError::Poisoned)?.clone())
    }

    fn save_roster(&self, roster: &Roster) -> StoreResult<()> {
        check_complete(roster)?;
        let mut rosters = self.rosters.lock().map_err(|_| StoreError::Poisoned)?;
        upsert(&mut rosters, roster);
        Ok(())
    }

    fn delete_roster(&self, id: RosterId) -> StoreResult<()> {
        self.rosters.lock().map_err(|_| StoreError::Poisoned)?.retain(|r| r.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Combatant;
    use crate::errors::{CombatantError, RosterError};
    use chrono::DateTime;
    use pretty_assertions::assert_eq;
    use schema::Category;

    fn roster(name: &str, millis: i64) -> Roster {
        let members = (1..=5)
            .map(|id| Combatant::new(id, format!("member-{}", id), vec![Category::Water]).unwrap())
            .collect();
        Roster::new_at(name, members, DateTime::from_timestamp_millis(millis).unwrap()).unwrap()
    }

    #[test]
    fn file_store_round_trips_and_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.load_rosters().unwrap().is_empty());

        store.save_roster(&roster("First", 1_000)).unwrap();
        store.save_roster(&roster("Second", 2_000)).unwrap();

        let reopened = JsonFileStore::new(dir.path());
        let names: Vec<String> = reopened.load_rosters().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["First".to_string(), "Second".to_string()]);
        assert!(dir.path().join("pokemon-teams.json").exists());
    }

    #[test]
    fn saving_an_existing_id_replaces_it() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let mut team = roster("Draft", 5_000);
        store.save_roster(&team).unwrap();

        team.name = "Final".to_string();
        store.save_roster(&team).unwrap();

        let rosters = store.load_rosters().unwrap();
        assert_eq!(rosters.len(), 1);
        assert_eq!(rosters[0].name, "Final");
        assert_eq!(store.get_roster(RosterId(5_000)).unwrap().map(|r| r.name), Some("Final".to_string()));
    }

    #[test]
    fn delete_removes_and_ignores_unknown_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.save_roster(&roster("Keep", 1)).unwrap();
        store.save_roster(&roster("Drop", 2)).unwrap();

        store.delete_roster(RosterId(2)).unwrap();
        store.delete_roster(RosterId(999)).unwrap();

        let names: Vec<String> = store.load_rosters().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Keep".to_string()]);
    }

    #[test]
    fn incomplete_rosters_are_refused() {
        let store = MemoryStore::new();
        let mut team = roster("Short", 1);
        team.pokemon.pop();

        let err = store.save_roster(&team).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidRoster {
                source: RosterError::WrongSize { actual: 4, .. },
                ..
            }
        ));
        assert!(store.load_rosters().unwrap().is_empty());
    }

    #[test]
    fn invalid_stored_rosters_are_skipped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut short = roster("Short", 1);
        short.pokemon.pop();
        let mut untyped = roster("Untyped", 2);
        for member in &mut untyped.pokemon {
            member.categories.clear();
        }
        let document = serde_json::to_string(&vec![short, roster("Valid", 3), untyped]).unwrap();
        fs::write(dir.path().join("pokemon-teams.json"), document).unwrap();

        let store = JsonFileStore::new(dir.path());
        let names: Vec<String> = store.load_rosters().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Valid".to_string()]);
    }

    #[test]
    fn rosters_without_categories_are_refused() {
        let store = MemoryStore::new();
        let mut team = roster("Untyped", 1);
        team.pokemon[0].categories.clear();

        let err = store.save_roster(&team).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidRoster {
                source: RosterError::InvalidMember(CombatantError::NoCategories(_)),
                ..
            }
        ));
    }

    #[test]
    fn malformed_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pokemon-teams.json"), "{ not json").unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(matches!(store.load_rosters(), Err(StoreError::Serde(_))));
    }

    #[test]
    fn memory_store_upserts_and_deletes() {
        let store = MemoryStore::new();
        store.save_roster(&roster("A", 1)).unwrap();
        store.save_roster(&roster("B", 2)).unwrap();
        store.save_roster(&roster("A2", 1)).unwrap();
        store.delete_roster(RosterId(2)).unwrap();

        let rosters = store.load_rosters().unwrap();
        assert_eq!(rosters.len(), 1);
        assert_eq!(rosters[0].name, "A2");
    }
}
