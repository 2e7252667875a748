//! Pokemon data provider: the external collaborator that supplies records for
//! browsing and for building rosters.

pub mod memory;
pub mod pokeapi;

use crate::combatant::Combatant;
use crate::errors::{ArenaResult, ProviderError, ProviderResult};
use async_trait::async_trait;
use schema::{AbilityPage, PokemonPage, PokemonRecord, SearchResults, TypeRecord};

pub use memory::InMemoryProvider;
pub use pokeapi::PokeApiClient;

/// Queries shorter than this are rejected.
pub const MIN_QUERY_LEN: usize = 2;
/// Search returns at most this many matches.
pub const SEARCH_RESULT_LIMIT: usize = 20;
/// Number of names scanned by a search.
pub const SEARCH_INDEX_LIMIT: u32 = 1000;

#[async_trait]
pub trait PokemonDataProvider: Send + Sync {
    /// A single record by numeric id or name.
    async fn fetch_pokemon(&self, id_or_name: &str) -> ProviderResult<PokemonRecord>;

    /// One page of the listing with every entry expanded.
    async fn fetch_page(&self, limit: u32, offset: u32) -> ProviderResult<PokemonPage>;

    /// Case-insensitive substring search over names.
    async fn search(&self, query: &str) -> ProviderResult<SearchResults>;

    /// Every category with its damage relations.
    async fn fetch_types(&self) -> ProviderResult<Vec<TypeRecord>>;

    async fn fetch_abilities(&self, limit: u32, offset: u32) -> ProviderResult<AbilityPage>;

    /// Fetches a record and converts it into a typed combatant.
    async fn fetch_combatant(&self, id_or_name: &str) -> ArenaResult<Combatant> {
        let record = self.fetch_pokemon(id_or_name).await?;
        Ok(Combatant::try_from(record)?)
    }
}

/// Trims and lowercases an id or name; blank identifiers are rejected.
pub fn normalize_identifier(id_or_name: &str) -> ProviderResult<String> {
    let normalized = id_or_name.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(ProviderError::InvalidQuery("Pokemon ID or name is required".to_string()));
    }
    Ok(normalized)
}

/// Checks a search query and returns it lowercased.
pub fn validate_query(query: &str) -> ProviderResult<String> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ProviderError::InvalidQuery("Search query is required".to_string()));
    }
    if query.chars().count() < MIN_QUERY_LEN {
        return Err(ProviderError::InvalidQuery(format!(
            "Search query must be at least {} characters long",
            MIN_QUERY_LEN
        )));
    }
    Ok(query.to_lowercase())
}

/// Names containing `query` (already lowercased), in listing order, capped
/// at `SEARCH_RESULT_LIMIT`.
pub fn matching_names<'a, I>(names: I, query: &str) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(query))
        .take(SEARCH_RESULT_LIMIT)
        .collect()
}
