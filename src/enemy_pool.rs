use crate::battle::state::BattleRng;
use crate::combatant::Combatant;
use crate::errors::BattleStateError;
use crate::roster::ROSTER_SIZE;
use schema::CombatantTemplate;
use std::sync::LazyLock;

// Include the compiled candidate pool
include!(concat!(env!("OUT_DIR"), "/generated_data.rs"));

// Decoded once on first use. The build script validated the pool, so a
// decode failure here means the blob and the schema crate disagree.
static ENEMY_POOL: LazyLock<Vec<CombatantTemplate>> = LazyLock::new(|| {
    match postcard::from_bytes::<Vec<CombatantTemplate>>(ENEMY_POOL_BYTES) {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(error = %err, "compiled enemy pool failed to decode");
            Vec::new()
        }
    }
});

/// Every candidate the enemy roster may be drawn from, in authored order.
pub fn candidate_pool() -> &'static [CombatantTemplate] {
    &ENEMY_POOL
}

/// Look up a candidate by name (lowercase, as authored).
pub fn get_candidate(name: &str) -> Option<&'static CombatantTemplate> {
    let index = ENEMY_POOL_INDEX.get(name.to_ascii_lowercase().as_str())?;
    ENEMY_POOL.get(*index)
}

/// Draws `ROSTER_SIZE` distinct candidates at random, without replacement.
pub fn generate_enemy_roster(rng: &mut BattleRng) -> Result<Vec<Combatant>, BattleStateError> {
    let pool = candidate_pool();
    if pool.len() < ROSTER_SIZE {
        return Err(BattleStateError::EnemyPoolTooSmall {
            available: pool.len(),
            required: ROSTER_SIZE,
        });
    }

    let mut order: Vec<usize> = (0..pool.len()).collect();
    rng.shuffle(&mut order);

    let roster: Vec<Combatant> = order
        .into_iter()
        .take(ROSTER_SIZE)
        .map(|i| Combatant::from(&pool[i]))
        .collect();

    tracing::debug!(
        enemies = ?roster.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        "generated enemy roster"
    );
    Ok(roster)
}

/// Builds a fixed enemy roster from candidate names, in the given order.
pub fn enemy_roster_from_names(names: &[&str]) -> Result<Vec<Combatant>, BattleStateError> {
    names
        .iter()
        .map(|name| {
            get_candidate(name)
                .map(Combatant::from)
                .ok_or_else(|| BattleStateError::InconsistentState(format!("{} is not an enemy candidate", name)))
        })
        .collect()
}
