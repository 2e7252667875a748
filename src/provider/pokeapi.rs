//! PokeAPI HTTP client.

use super::{matching_names, normalize_identifier, validate_query, PokemonDataProvider, SEARCH_INDEX_LIMIT};
use crate::config::ArenaConfig;
use crate::errors::{ProviderError, ProviderResult};
use async_trait::async_trait;
use futures::future::try_join_all;
use schema::{AbilityPage, AbilityRecord, PokemonPage, PokemonRecord, ResourceList, SearchResults, TypeRecord};
use serde::de::DeserializeOwned;

/// Client for the public Pokemon REST API.
///
/// Listings return unexpanded `{ name, url }` references; every entry is
/// fetched concurrently and the page is returned fully expanded.
pub struct PokeApiClient {
    /// Base URL without trailing slash
    base_url: String,

    /// HTTP client
    http_client: reqwest::Client,
}

impl PokeApiClient {
    pub fn new(config: &ArenaConfig) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("pokedex-arena/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: config.pokeapi_base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ProviderResult<T> {
        tracing::debug!("GET {}", url);

        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn expand<T: DeserializeOwned>(&self, list: &ResourceList) -> ProviderResult<Vec<T>> {
        try_join_all(list.results.iter().map(|entry| self.get_json::<T>(&entry.url))).await
    }
}

#[async_trait]
impl PokemonDataProvider for PokeApiClient {
    async fn fetch_pokemon(&self, id_or_name: &str) -> ProviderResult<PokemonRecord> {
        let identifier = normalize_identifier(id_or_name)?;
        let url = format!("{}/pokemon/{}", self.base_url, identifier);

        match self.get_json(&url).await {
            Err(ProviderError::Status { status: 404, .. }) => Err(ProviderError::NotFound(id_or_name.trim().to_string())),
            other => other,
        }
    }

    async fn fetch_page(&self, limit: u32, offset: u32) -> ProviderResult<PokemonPage> {
        let url = format!("{}/pokemon?limit={}&offset={}", self.base_url, limit, offset);
        let list: ResourceList = self.get_json(&url).await?;
        let results = self.expand(&list).await?;

        Ok(PokemonPage {
            count: list.count,
            next: list.next,
            previous: list.previous,
            results,
        })
    }

    async fn search(&self, query: &str) -> ProviderResult<SearchResults> {
        let needle = validate_query(query)?;
        let url = format!("{}/pokemon?limit={}", self.base_url, SEARCH_INDEX_LIMIT);
        let list: ResourceList = self.get_json(&url).await?;

        let names = matching_names(list.results.iter().map(|r| r.name.as_str()), &needle);
        let urls: Vec<&str> = list
            .results
            .iter()
            .filter(|r| names.contains(&r.name.as_str()))
            .map(|r| r.url.as_str())
            .collect();

        tracing::debug!(query = %needle, matches = urls.len(), "search matched");
        let results: Vec<PokemonRecord> = try_join_all(urls.into_iter().map(|url| self.get_json(url))).await?;

        Ok(SearchResults {
            query: query.trim().to_string(),
            count: results.len(),
            results,
        })
    }

    async fn fetch_types(&self) -> ProviderResult<Vec<TypeRecord>> {
        let url = format!("{}/type", self.base_url);
        let list: ResourceList = self.get_json(&url).await?;
        self.expand(&list).await
    }

    async fn fetch_abilities(&self, limit: u32, offset: u32) -> ProviderResult<AbilityPage> {
        let url = format!("{}/ability?limit={}&offset={}", self.base_url, limit, offset);
        let list: ResourceList = self.get_json(&url).await?;
        let results: Vec<AbilityRecord> = self.expand(&list).await?;

        Ok(AbilityPage {
            count: list.count,
            next: list.next,
            previous: list.previous,
            results,
        })
    }
}
