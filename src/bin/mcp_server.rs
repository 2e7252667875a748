//! Pokedex Arena MCP Server
//!
//! A Model Context Protocol server (rmcp) that exposes the Pokemon explorer,
//! the team builder and the battle arena for LLM interaction.

use std::borrow::Cow;
use std::sync::Arc;

use pokedex_arena::battle::pacing::PacedBattle;
use pokedex_arena::battle::runner::BattleRunner;
use pokedex_arena::config::ArenaConfig;
use pokedex_arena::mcp_interface::*;
use pokedex_arena::provider::{PokeApiClient, PokemonDataProvider};
use pokedex_arena::roster::RosterBuilder;
use pokedex_arena::store::{JsonFileStore, RosterStore};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::io::{stdin, stdout};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct PokedexArenaService {
    tool_router: ToolRouter<PokedexArenaService>,
    provider: Arc<dyn PokemonDataProvider>,
    store: Arc<dyn RosterStore>,
    builder: Arc<Mutex<RosterBuilder>>,
    battle: Arc<Mutex<PacedBattle>>,
    page_size: u32,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StartBattleRequest {
    #[schemars(description = "Saved team number to battle with (see list_teams)")]
    pub team_choice: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SwitchPokemonRequest {
    #[schemars(description = "Team member number to switch to (1-5)")]
    pub pokemon_number: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PokemonRequest {
    #[schemars(description = "Pokemon id or name")]
    pub id_or_name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    #[schemars(description = "Part of a Pokemon name, at least 2 characters")]
    pub query: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListRequest {
    #[schemars(description = "Number of entries to skip")]
    pub offset: Option<u32>,
    #[schemars(description = "Page size (defaults to the configured page size)")]
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveTeamRequest {
    #[schemars(description = "Name for the team")]
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteTeamRequest {
    #[schemars(description = "Id of the saved team (shown by list_teams)")]
    pub team_id: u64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TypeMatchupsRequest {
    #[schemars(description = "Type name, e.g. 'fire'")]
    pub type_name: String,
}

fn tool_error(context: &str, message: String) -> McpError {
    McpError {
        code: ErrorCode(-32603),
        message: Cow::from(format!("{}: {}", context, message)),
        data: None,
    }
}

fn text_or_error(result: Result<String, String>) -> Result<CallToolResult, McpError> {
    let text = match result {
        Ok(text) => text,
        Err(e) => format!("Error: {}", e),
    };
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[tool_router]
impl PokedexArenaService {
    pub fn new(config: &ArenaConfig, provider: Arc<dyn PokemonDataProvider>, store: Arc<dyn RosterStore>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            provider,
            store,
            builder: Arc::new(Mutex::new(RosterBuilder::new())),
            battle: Arc::new(Mutex::new(PacedBattle::new(BattleRunner::new(), config.ai_delay))),
            page_size: config.page_size,
        }
    }

    #[tool(description = "List all saved Pokemon teams")]
    async fn list_teams(&self) -> Result<CallToolResult, McpError> {
        text_or_error(display_saved_teams(self.store.as_ref()))
    }

    #[tool(description = "Start a new battle with a saved team against a random enemy team")]
    async fn start_battle(
        &self,
        Parameters(request): Parameters<StartBattleRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut battle = self.battle.lock().await;
        match start_battle_with_team(&mut battle, self.store.as_ref(), request.team_choice as usize).await {
            Ok(intro_text) => Ok(CallToolResult::success(vec![Content::text(intro_text)])),
            Err(e) => Err(tool_error("Error starting battle", e)),
        }
    }

    #[tool(description = "Get the current battle state and status")]
    async fn get_battle_state(&self) -> Result<CallToolResult, McpError> {
        let battle = self.battle.lock().await;
        let text = get_battle_status_summary(&battle).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Attack with your active Pokemon; the enemy responds after a short pause")]
    async fn attack(&self) -> Result<CallToolResult, McpError> {
        let mut battle = self.battle.lock().await;
        text_or_error(execute_attack_action(&mut battle).await)
    }

    #[tool(description = "Switch to a different Pokemon on your team")]
    async fn switch_pokemon(
        &self,
        Parameters(request): Parameters<SwitchPokemonRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut battle = self.battle.lock().await;
        text_or_error(execute_switch_action(&mut battle, request.pokemon_number as usize).await)
    }

    #[tool(description = "Abandon the current battle and return to team selection")]
    async fn reset_battle(&self) -> Result<CallToolResult, McpError> {
        let mut battle = self.battle.lock().await;
        let text = execute_reset(&mut battle).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Look up detailed information about a Pokemon")]
    async fn lookup_pokemon(
        &self,
        Parameters(request): Parameters<PokemonRequest>,
    ) -> Result<CallToolResult, McpError> {
        text_or_error(handle_lookup_pokemon_command(self.provider.as_ref(), &request.id_or_name).await)
    }

    #[tool(description = "Search Pokemon by name")]
    async fn search_pokemon(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        text_or_error(handle_search_command(self.provider.as_ref(), &request.query).await)
    }

    #[tool(description = "Browse the Pokedex one page at a time")]
    async fn list_pokemon(
        &self,
        Parameters(request): Parameters<ListRequest>,
    ) -> Result<CallToolResult, McpError> {
        let limit = request.limit.unwrap_or(self.page_size).clamp(1, 100);
        let offset = request.offset.unwrap_or(0);
        text_or_error(handle_list_command(self.provider.as_ref(), limit, offset).await)
    }

    #[tool(description = "Browse Pokemon abilities one page at a time")]
    async fn list_abilities(
        &self,
        Parameters(request): Parameters<ListRequest>,
    ) -> Result<CallToolResult, McpError> {
        let limit = request.limit.unwrap_or(self.page_size).clamp(1, 100);
        let offset = request.offset.unwrap_or(0);
        text_or_error(handle_abilities_command(self.provider.as_ref(), limit, offset).await)
    }

    #[tool(description = "Show the strengths and weaknesses of a type")]
    async fn type_matchups(
        &self,
        Parameters(request): Parameters<TypeMatchupsRequest>,
    ) -> Result<CallToolResult, McpError> {
        text_or_error(handle_type_matchups_command(&request.type_name))
    }

    #[tool(description = "Show the team currently being built")]
    async fn show_team_builder(&self) -> Result<CallToolResult, McpError> {
        let builder = self.builder.lock().await;
        Ok(CallToolResult::success(vec![Content::text(display_team_builder(&builder))]))
    }

    #[tool(description = "Add a Pokemon to the team being built")]
    async fn add_to_team(
        &self,
        Parameters(request): Parameters<PokemonRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut builder = self.builder.lock().await;
        text_or_error(handle_add_to_team(&mut builder, self.provider.as_ref(), &request.id_or_name).await)
    }

    #[tool(description = "Remove a Pokemon from the team being built")]
    async fn remove_from_team(
        &self,
        Parameters(request): Parameters<PokemonRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut builder = self.builder.lock().await;
        text_or_error(handle_remove_from_team(&mut builder, &request.id_or_name))
    }

    #[tool(description = "Remove every Pokemon from the team being built")]
    async fn clear_team(&self) -> Result<CallToolResult, McpError> {
        let mut builder = self.builder.lock().await;
        Ok(CallToolResult::success(vec![Content::text(handle_clear_team(&mut builder))]))
    }

    #[tool(description = "Save the team being built (exactly 5 Pokemon)")]
    async fn save_team(
        &self,
        Parameters(request): Parameters<SaveTeamRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut builder = self.builder.lock().await;
        text_or_error(handle_save_team(&mut builder, self.store.as_ref(), &request.name))
    }

    #[tool(description = "Delete a saved team")]
    async fn delete_team(
        &self,
        Parameters(request): Parameters<DeleteTeamRequest>,
    ) -> Result<CallToolResult, McpError> {
        text_or_error(handle_delete_team(self.store.as_ref(), request.team_id))
    }
}

#[tool_handler]
impl ServerHandler for PokedexArenaService {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ArenaConfig::from_env();
    tracing::info!(base_url = %config.pokeapi_base_url, storage = %config.storage_dir.display(), "starting Pokedex Arena MCP server");

    let provider: Arc<dyn PokemonDataProvider> = Arc::new(PokeApiClient::new(&config)?);
    let store: Arc<dyn RosterStore> = Arc::new(JsonFileStore::new(&config.storage_dir));
    let service = PokedexArenaService::new(&config, provider, store);

    let server = service.serve((stdin(), stdout())).await?;
    let quit_reason = server.waiting().await?;

    tracing::info!(?quit_reason, "Pokedex Arena MCP server exiting");
    Ok(())
}
