//! Offline demo: builds a team from the built-in candidate pool, saves it and
//! plays one battle to the end, printing the narration.

use pokedex_arena::battle::pacing::PacedBattle;
use pokedex_arena::battle::runner::BattleRunner;
use pokedex_arena::battle::state::BattleRng;
use pokedex_arena::config::ArenaConfig;
use pokedex_arena::mcp_interface::*;
use pokedex_arena::provider::InMemoryProvider;
use pokedex_arena::roster::RosterBuilder;
use pokedex_arena::store::MemoryStore;

const DEMO_TEAM: [&str; 5] = ["blastoise", "venusaur", "pikachu", "gengar", "dragonite"];
const MAX_ACTIONS: usize = 50;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = ArenaConfig::from_env();
    let provider = InMemoryProvider::from_candidate_pool();
    let store = MemoryStore::new();

    println!("{}", handle_type_matchups_command("water")?);
    println!("{}", handle_search_command(&provider, "ar").await?);

    let mut builder = RosterBuilder::new();
    for name in DEMO_TEAM {
        handle_add_to_team(&mut builder, &provider, name).await?;
    }
    println!("{}", display_team_builder(&builder));
    println!("{}", handle_save_team(&mut builder, &store, "Demo Team")?);
    println!("{}", display_saved_teams(&store)?);

    let runner = match std::env::var("ARENA_SEED").ok().and_then(|s| s.parse().ok()) {
        Some(seed) => BattleRunner::with_rng(BattleRng::seeded(seed)),
        None => BattleRunner::new(),
    };
    let mut battle = PacedBattle::new(runner, config.ai_delay);
    println!("{}", start_battle_with_team(&mut battle, &store, 1).await?);

    for _ in 0..MAX_ACTIONS {
        let Some(info) = battle.battle_info().await else {
            break;
        };
        if info.outcome.is_terminal() {
            break;
        }
        // switch out of a low-health active Pokemon when a healthier one waits
        let weak = info.player.active.current_health.is_some_and(|h| h < 30);
        let fresh = info
            .player
            .team
            .iter()
            .position(|member| !member.is_active && !member.is_fainted);
        let text = match (weak, fresh) {
            (true, Some(index)) => execute_switch_action(&mut battle, index + 1).await?,
            _ => execute_attack_action(&mut battle).await?,
        };
        print!("{}", text);
    }

    println!("\n{}", get_battle_status_summary(&battle).await);
    Ok(())
}
