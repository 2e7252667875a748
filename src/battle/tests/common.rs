use crate::battle::engine::start_session;
use crate::battle::state::{BattleRng, BattleSession};
use crate::combatant::Combatant;
use crate::enemy_pool::enemy_roster_from_names;
use crate::errors::ArenaResult;
use crate::roster::Roster;
use schema::Category;

/// A builder for test rosters with sensible defaults.
///
/// # Example
/// ```ignore
/// let roster = TestRosterBuilder::new()
///     .with_member("squirtle", Category::Water)
///     .build();
/// ```
pub struct TestRosterBuilder {
    name: String,
    members: Vec<Combatant>,
}

impl TestRosterBuilder {
    pub fn new() -> Self {
        Self {
            name: "Test Team".to_string(),
            members: Vec::new(),
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Adds a single-category member. Ids are assigned in insertion order.
    pub fn with_member(mut self, name: &str, category: Category) -> Self {
        let id = self.members.len() as u32 + 1;
        let combatant = match Combatant::new(id, name, vec![category]) {
            Ok(c) => c,
            Err(err) => panic!("Failed to build test combatant {}: {}", name, err),
        };
        self.members.push(combatant);
        self
    }

    pub fn build(self) -> Roster {
        match Roster::new(self.name, self.members) {
            Ok(roster) => roster,
            Err(err) => panic!("Failed to build test roster: {}", err),
        }
    }
}

/// Five distinct water-category combatants.
pub fn water_roster() -> Roster {
    TestRosterBuilder::new()
        .named("Tide")
        .with_member("squirtle", Category::Water)
        .with_member("psyduck", Category::Water)
        .with_member("poliwag", Category::Water)
        .with_member("horsea", Category::Water)
        .with_member("goldeen", Category::Water)
        .build()
}

/// A roster whose members differ in category, in roster order:
/// grass, fire, water, electric, normal.
pub fn mixed_roster() -> Roster {
    TestRosterBuilder::new()
        .named("Mixed")
        .with_member("bulbasaur", Category::Grass)
        .with_member("charmander", Category::Fire)
        .with_member("squirtle", Category::Water)
        .with_member("pikachu", Category::Electric)
        .with_member("eevee", Category::Normal)
        .build()
}

/// The fixed enemy draw used across the tests.
pub const FIXED_ENEMIES: [&str; 5] = ["charizard", "venusaur", "pikachu", "gengar", "rhydon"];

pub fn fixed_enemy_roster() -> Vec<Combatant> {
    match enemy_roster_from_names(&FIXED_ENEMIES) {
        Ok(roster) => roster,
        Err(err) => panic!("Failed to build fixed enemy roster: {}", err),
    }
}

/// A fresh session between `roster` and the fixed enemy draw.
pub fn create_test_session(roster: Roster) -> BattleSession {
    assert_ok(start_session(1, roster, fixed_enemy_roster()))
}

/// A `BattleRng` whose base rolls are all `roll`.
pub fn constant_rng(roll: u32) -> BattleRng {
    BattleRng::new_for_test(vec![roll; 200])
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: ArenaResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
