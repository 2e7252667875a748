// In: src/lib.rs

//! Pokedex Arena
//!
//! A Pokemon explorer backed by a public data service, a five-member team
//! builder with persistent saved teams, and a turn-based battle arena against
//! a randomly drawn enemy team. The enemy candidate pool is compiled into the
//! binary at build time.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod combatant;
pub mod config;
pub mod enemy_pool;
pub mod errors;
pub mod mcp_interface;
pub mod provider;
pub mod roster;
pub mod store;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    // Category chart
    Category,
    DamageRelations,
    // Provider records
    AbilityRecord,
    CombatantTemplate,
    PokemonPage,
    PokemonRecord,
    SearchResults,
    TypeRecord,
};

// --- From this crate's modules (`src/`) ---

// Battle state machine.
pub use battle::pacing::PacedBattle;
pub use battle::runner::{ArenaPhase, BattleInfo, BattleRunner, ExecutionResult};
pub use battle::state::{BattleEvent, BattleRng, BattleSession, Outcome};

// Combatants and rosters.
pub use combatant::{ActiveCombatant, Combatant};
pub use roster::{Roster, RosterBuilder, RosterId};

// Collaborators.
pub use config::ArenaConfig;
pub use provider::{InMemoryProvider, PokeApiClient, PokemonDataProvider};
pub use store::{JsonFileStore, MemoryStore, RosterStore};

// Crate-specific error and result types.
pub use errors::{
    ActionError, ArenaError, ArenaResult, BattleStateError, CombatantError, ProviderError, ProviderResult,
    RosterError, StoreError, StoreResult,
};
