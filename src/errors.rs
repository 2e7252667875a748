use crate::roster::RosterId;
use thiserror::Error;

/// Main error type for the Pokedex Arena battle core and its collaborators
#[derive(Debug, Error)]
pub enum ArenaError {
    /// Error related to roster construction or validation
    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),
    /// Error converting a provider record into a combatant
    #[error("Combatant error: {0}")]
    Combatant(#[from] CombatantError),
    /// Error related to invalid battle state
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// Error related to invalid player actions
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Error raised by the Pokemon data provider
    #[error("Data provider error: {0}")]
    Provider(#[from] ProviderError),
    /// Error raised by the roster persistence store
    #[error("Roster store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors related to roster construction and validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// The roster has no members at all
    #[error("Roster is empty")]
    Empty,
    /// The roster does not have exactly the required number of members
    #[error("Roster must have exactly {expected} Pokemon, found {actual}")]
    WrongSize { expected: usize, actual: usize },
    /// The same Pokemon appears twice
    #[error("Pokemon #{0} is already in the team")]
    DuplicateMember(u32),
    /// No more members can be added
    #[error("Team is full! Maximum {0} Pokemon allowed")]
    TeamFull(usize),
    /// The roster name is blank
    #[error("Please enter a team name")]
    MissingName,
    /// The requested Pokemon is not part of the team
    #[error("Pokemon #{0} is not in the team")]
    NotAMember(u32),
    /// A member fails its own checks
    #[error("Invalid team member: {0}")]
    InvalidMember(#[from] CombatantError),
}

/// Errors related to converting provider records into typed combatants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatantError {
    /// The record carries no categories
    #[error("{0} has no categories")]
    NoCategories(String),
    /// The record carries more categories than a combatant may have
    #[error("{name} has {count} categories, at most 2 are allowed")]
    TooManyCategories { name: String, count: usize },
    /// A category name is not part of the closed set
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    /// No battle has been started
    #[error("No battle is currently active")]
    NoActiveBattle,
    /// The enemy candidate pool cannot supply a full roster
    #[error("Enemy pool has {available} candidates, {required} are required")]
    EnemyPoolTooSmall { available: usize, required: usize },
    /// Battle state is in an inconsistent or corrupted state
    #[error("Inconsistent battle state: {0}")]
    InconsistentState(String),
}

/// Errors related to player actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The opponent's response to the previous action has not resolved yet
    #[error("Waiting for the opponent to respond")]
    AwaitingOpponent,
    /// Pokemon index is out of bounds
    #[error("Invalid Pokemon index: {0}")]
    InvalidPokemonIndex(usize),
    /// The target Pokemon is already on the field
    #[error("Pokemon {0} is already active")]
    AlreadyActive(usize),
    /// The target Pokemon has fainted
    #[error("Pokemon {0} has fainted")]
    TargetFainted(usize),
}

/// Errors raised by the Pokemon data provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request could not be sent or the body could not be read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The upstream service answered with a non-success status
    #[error("Upstream returned status {status} for {url}")]
    Status { status: u16, url: String },
    /// No Pokemon matches the identifier
    #[error("Pokemon not found: {0}")]
    NotFound(String),
    /// The query is too short or otherwise unusable
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    /// The response body is not the expected JSON shape
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors raised by the roster persistence store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored rosters are malformed: {0}")]
    Serde(#[from] serde_json::Error),
    /// Only complete rosters may be saved
    #[error("Refusing to save roster {id}: {source}")]
    InvalidRoster {
        id: RosterId,
        #[source]
        source: RosterError,
    },
    #[error("Roster store lock was poisoned")]
    Poisoned,
}

/// Type alias for Results using ArenaError
pub type ArenaResult<T> = Result<T, ArenaError>;

/// Type alias for Results using RosterError
pub type RosterResult<T> = Result<T, RosterError>;

/// Type alias for Results using ProviderError
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Type alias for Results using StoreError
pub type StoreResult<T> = Result<T, StoreError>;
