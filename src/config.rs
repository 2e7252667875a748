//! Runtime configuration read from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_STORAGE_DIR: &str = ".pokedex-arena";
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Configuration shared by the binaries.
#[derive(Clone, Debug)]
pub struct ArenaConfig {
    /// Base URL of the Pokemon data service, without a trailing slash.
    pub pokeapi_base_url: String,
    /// Directory holding the saved-roster document.
    pub storage_dir: PathBuf,
    /// Pause before the enemy responds to a player action.
    pub ai_delay: Duration,
    /// Default page size for listings.
    pub page_size: u32,
    pub http_timeout: Duration,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            pokeapi_base_url: DEFAULT_POKEAPI_BASE_URL.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            ai_delay: Duration::from_millis(1000),
            page_size: DEFAULT_PAGE_SIZE,
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl ArenaConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `POKEAPI_BASE_URL` - data service base URL (default: `https://pokeapi.co/api/v2`)
    /// - `ARENA_STORAGE_DIR` - saved-roster directory (default: `.pokedex-arena`)
    /// - `ARENA_AI_DELAY_MS` - enemy response delay in milliseconds (default: 1000)
    /// - `ARENA_PAGE_SIZE` - listing page size, 1 to 100 (default: 20)
    /// - `ARENA_HTTP_TIMEOUT_SECS` - request timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = read_env::<String>("POKEAPI_BASE_URL") {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                config.pokeapi_base_url = url.to_string();
            }
        }
        if let Some(dir) = read_env::<PathBuf>("ARENA_STORAGE_DIR") {
            config.storage_dir = dir;
        }
        if let Some(ms) = read_env::<u64>("ARENA_AI_DELAY_MS") {
            config.ai_delay = Duration::from_millis(ms);
        }
        if let Some(size) = read_env::<u32>("ARENA_PAGE_SIZE") {
            config.page_size = size.clamp(1, 100);
        }
        if let Some(secs) = read_env::<u64>("ARENA_HTTP_TIMEOUT_SECS") {
            config.http_timeout = Duration::from_secs(secs.max(1));
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
