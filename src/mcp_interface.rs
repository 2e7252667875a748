//! Text-rendering command functions for the presentation layer.
//!
//! Every command returns the text shown to the user, or an error message.
//! The MCP server and the offline demo both drive the arena through here.

use crate::battle::pacing::PacedBattle;
use crate::battle::runner::{ArenaPhase, BattleInfo, CombatantInfo, ExecutionResult};
use crate::battle::state::Outcome;
use crate::combatant::Combatant;
use crate::provider::PokemonDataProvider;
use crate::roster::{RosterBuilder, RosterId, ROSTER_SIZE};
use crate::store::RosterStore;
use schema::{Category, PokemonRecord};
use std::str::FromStr;

fn categories_label(categories: &[Category]) -> String {
    categories.iter().map(|c| c.to_string()).collect::<Vec<_>>().join("/")
}

/// Returns formatted text listing the saved teams
pub fn display_saved_teams(store: &dyn RosterStore) -> Result<String, String> {
    let rosters = store.load_rosters().map_err(|e| e.to_string())?;
    if rosters.is_empty() {
        return Ok(format!(
            "No saved teams yet. Add {} Pokemon to the team builder and save it.\n",
            ROSTER_SIZE
        ));
    }

    let mut output = String::from("Saved Teams:\n");
    for (i, roster) in rosters.iter().enumerate() {
        output.push_str(&format!(
            "  {}. {} [id {}] - {}\n",
            i + 1,
            roster.name,
            roster.id,
            roster
                .pokemon
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    Ok(output)
}

/// Starts a battle with the saved team at `team_choice` (1-based)
pub async fn start_battle_with_team(
    paced: &mut PacedBattle,
    store: &dyn RosterStore,
    team_choice: usize,
) -> Result<String, String> {
    let rosters = store.load_rosters().map_err(|e| e.to_string())?;
    if rosters.is_empty() {
        return Err("No saved teams. Build and save a team first.".to_string());
    }
    if team_choice == 0 || team_choice > rosters.len() {
        return Err(format!("Invalid team choice. Please choose 1-{}", rosters.len()));
    }

    let roster = rosters[team_choice - 1].clone();
    let team_name = roster.name.clone();
    paced.start_battle(roster).await.map_err(|e| e.to_string())?;

    let info = paced
        .battle_info()
        .await
        .ok_or_else(|| "Battle failed to start".to_string())?;
    Ok(format!(
        "Battle started with team '{}'!\nEnemy sends out {}!\nGo, {}!\n\n{}",
        team_name,
        info.enemy.active.name,
        info.player.active.name,
        display_battle_status(&info)
    ))
}

fn health_bar(health: u8) -> String {
    let filled = (usize::from(health) + 9) / 10;
    format!("[{}{}] {:>3}%", "#".repeat(filled), "-".repeat(10 - filled), health)
}

fn display_active(label: &str, active: &CombatantInfo) -> String {
    format!(
        "{}: {} ({}) {}\n",
        label,
        active.name,
        categories_label(&active.categories),
        health_bar(active.current_health.unwrap_or(0))
    )
}

/// Displays both sides of the field and the player's team
pub fn display_battle_status(info: &BattleInfo) -> String {
    let mut output = String::new();
    output.push_str(&display_active("Enemy", &info.enemy.active));
    output.push_str(&format!(
        "       {} of {} remaining\n",
        info.enemy.team.len() - info.enemy.active_index,
        info.enemy.team.len()
    ));
    output.push_str(&display_active("You  ", &info.player.active));
    output.push_str(&display_team_status(info));
    output
}

/// Displays the player's team with switch numbers
pub fn display_team_status(info: &BattleInfo) -> String {
    let mut output = String::from("--- Your Team ---\n");
    for (i, member) in info.player.team.iter().enumerate() {
        let marker = if member.is_active {
            " (Active)"
        } else if member.is_fainted {
            " (Fainted)"
        } else {
            ""
        };
        output.push_str(&format!(
            " {}. {} ({}){}\n",
            i + 1,
            member.name,
            categories_label(&member.categories),
            marker
        ));
    }
    output
}

fn render_events(output: &mut String, result: &ExecutionResult) {
    for line in result.narration() {
        output.push_str(&line);
        output.push('\n');
    }
}

fn render_outcome(output: &mut String, outcome: Outcome) {
    if outcome.is_terminal() {
        output.push_str("\nThe battle is over. Reset or choose a team to battle again.\n");
    }
}

/// Internal helper: render the player's action, wait for the enemy's paced
/// response and render that too
async fn finish_player_action(paced: &mut PacedBattle, result: ExecutionResult) -> String {
    let mut output = String::new();
    render_events(&mut output, &result);

    let mut outcome = result.outcome;
    if result.awaiting_ai {
        if let Some(response) = paced.settle().await {
            render_events(&mut output, &response);
            outcome = response.outcome;
        }
    }
    render_outcome(&mut output, outcome);
    output
}

/// Attacks with the active Pokemon and returns the resulting narration
pub async fn execute_attack_action(paced: &mut PacedBattle) -> Result<String, String> {
    let result = paced.player_attack().await.map_err(|e| e.to_string())?;
    if result.events.is_empty() {
        return Ok("The battle is over. Reset to start a new one.\n".to_string());
    }
    Ok(finish_player_action(paced, result).await)
}

/// Switches to team member `pokemon_number` (1-based)
pub async fn execute_switch_action(paced: &mut PacedBattle, pokemon_number: usize) -> Result<String, String> {
    if pokemon_number == 0 || pokemon_number > ROSTER_SIZE {
        return Err(format!("Invalid Pokemon number. Use 1-{}.", ROSTER_SIZE));
    }
    let result = paced
        .switch_pokemon(pokemon_number - 1)
        .await
        .map_err(|e| format!("Invalid switch: {}", e))?;
    if result.events.is_empty() {
        return Ok("The battle is over. Reset to start a new one.\n".to_string());
    }
    Ok(finish_player_action(paced, result).await)
}

/// Abandons the current battle and returns to team selection
pub async fn execute_reset(paced: &mut PacedBattle) -> String {
    paced.reset_battle().await;
    "Battle reset. Choose a team to start a new battle.\n".to_string()
}

/// Gets the current battle status as a formatted string
pub async fn get_battle_status_summary(paced: &PacedBattle) -> String {
    let Some(info) = paced.battle_info().await else {
        return "No battle in progress. Choose a team to start one.\n".to_string();
    };

    let mut output = match (info.phase, info.outcome) {
        (ArenaPhase::Terminal, Outcome::PlayerWin) => "Battle Over - You Won!\n".to_string(),
        (ArenaPhase::Terminal, _) => "Battle Over - You Lost!\n".to_string(),
        _ if info.awaiting_ai => "Waiting for the enemy to respond...\n".to_string(),
        _ => "Battle in Progress\n".to_string(),
    };
    output.push_str(&display_battle_status(&info));

    if !info.log.is_empty() {
        output.push_str("--- Battle Log ---\n");
        let start = info.log.len().saturating_sub(10);
        for line in &info.log[start..] {
            output.push_str(&format!("  {}\n", line));
        }
    }
    output
}

/// Displays the team currently being built
pub fn display_team_builder(builder: &RosterBuilder) -> String {
    let mut output = format!("--- Team Builder ({}/{}) ---\n", builder.members().len(), ROSTER_SIZE);
    if builder.members().is_empty() {
        output.push_str("  (empty)\n");
    }
    for (i, member) in builder.members().iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, member));
    }
    output
}

/// Fetches a Pokemon and adds it to the team being built
pub async fn handle_add_to_team(
    builder: &mut RosterBuilder,
    provider: &dyn PokemonDataProvider,
    id_or_name: &str,
) -> Result<String, String> {
    if builder.is_full() {
        return Err(format!("Team is full! Maximum {} Pokemon allowed.", ROSTER_SIZE));
    }
    let combatant: Combatant = provider.fetch_combatant(id_or_name).await.map_err(|e| e.to_string())?;
    if builder.contains(combatant.id) {
        return Err("This Pokemon is already in your team!".to_string());
    }

    let name = combatant.name.clone();
    builder.add(combatant).map_err(|e| e.to_string())?;
    Ok(format!("Added {} to the team.\n{}", name, display_team_builder(builder)))
}

/// Removes a Pokemon (by id or name) from the team being built
pub fn handle_remove_from_team(builder: &mut RosterBuilder, id_or_name: &str) -> Result<String, String> {
    let needle = id_or_name.trim().to_ascii_lowercase();
    let id = builder
        .members()
        .iter()
        .find(|c| c.name == needle || c.id.to_string() == needle)
        .map(|c| c.id)
        .ok_or_else(|| format!("{} is not in the team.", id_or_name.trim()))?;

    let removed = builder.remove(id).map_err(|e| e.to_string())?;
    Ok(format!("Removed {} from the team.\n{}", removed.name, display_team_builder(builder)))
}

pub fn handle_clear_team(builder: &mut RosterBuilder) -> String {
    builder.clear();
    format!("Team cleared.\n{}", display_team_builder(builder))
}

/// Saves the team being built under `name`
pub fn handle_save_team(builder: &mut RosterBuilder, store: &dyn RosterStore, name: &str) -> Result<String, String> {
    let roster = builder.build(name).map_err(|e| e.to_string())?;
    store.save_roster(&roster).map_err(|e| e.to_string())?;
    Ok(format!("Team '{}' saved (id {}).\n", roster.name, roster.id))
}

pub fn handle_delete_team(store: &dyn RosterStore, id: u64) -> Result<String, String> {
    store.delete_roster(RosterId(id)).map_err(|e| e.to_string())?;
    Ok(format!("Team {} deleted.\n", id))
}

fn display_record(record: &PokemonRecord) -> String {
    let mut output = format!(
        "#{} {} ({})\n",
        record.id,
        record.name,
        record.type_names().join("/")
    );
    output.push_str(&format!(
        "  Height: {}  Weight: {}  Base XP: {}\n",
        record.height,
        record.weight,
        record
            .base_experience
            .map(|xp| xp.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    if !record.stats.is_empty() {
        let stats: Vec<String> = record
            .stats
            .iter()
            .map(|s| format!("{} {}", s.stat.name, s.base_stat))
            .collect();
        output.push_str(&format!("  Stats: {}\n", stats.join(", ")));
    }
    if !record.abilities.is_empty() {
        let abilities: Vec<String> = record
            .abilities
            .iter()
            .map(|a| {
                if a.is_hidden {
                    format!("{} (hidden)", a.ability.name)
                } else {
                    a.ability.name.clone()
                }
            })
            .collect();
        output.push_str(&format!("  Abilities: {}\n", abilities.join(", ")));
    }
    if let Some(sprite) = &record.sprites.front_default {
        output.push_str(&format!("  Sprite: {}\n", sprite));
    }
    output
}

/// Displays a single Pokemon by id or name
pub async fn handle_lookup_pokemon_command(provider: &dyn PokemonDataProvider, id_or_name: &str) -> Result<String, String> {
    let record = provider.fetch_pokemon(id_or_name).await.map_err(|e| e.to_string())?;
    Ok(display_record(&record))
}

pub async fn handle_search_command(provider: &dyn PokemonDataProvider, query: &str) -> Result<String, String> {
    let results = provider.search(query).await.map_err(|e| e.to_string())?;
    if results.results.is_empty() {
        return Ok(format!("No Pokemon match '{}'.\n", results.query));
    }

    let mut output = format!("{} result(s) for '{}':\n", results.count, results.query);
    for record in &results.results {
        output.push_str(&format!("  #{} {} ({})\n", record.id, record.name, record.type_names().join("/")));
    }
    Ok(output)
}

pub async fn handle_list_command(provider: &dyn PokemonDataProvider, limit: u32, offset: u32) -> Result<String, String> {
    let page = provider.fetch_page(limit, offset).await.map_err(|e| e.to_string())?;
    if page.results.is_empty() {
        return Ok(format!("No Pokemon at offset {} ({} total).\n", offset, page.count));
    }

    let first = u64::from(offset) + 1;
    let mut output = format!(
        "Pokemon {}-{} of {}:\n",
        first,
        first + page.results.len() as u64 - 1,
        page.count
    );
    for record in &page.results {
        output.push_str(&format!("  #{} {} ({})\n", record.id, record.name, record.type_names().join("/")));
    }
    if page.next.is_some() {
        output.push_str(&format!("Next page: offset {}\n", offset.saturating_add(limit)));
    }
    Ok(output)
}

/// Lists one page of abilities with their English short effect
pub async fn handle_abilities_command(provider: &dyn PokemonDataProvider, limit: u32, offset: u32) -> Result<String, String> {
    let page = provider.fetch_abilities(limit, offset).await.map_err(|e| e.to_string())?;
    if page.results.is_empty() {
        return Ok("No abilities on this page.\n".to_string());
    }

    let mut output = format!("Abilities ({} total):\n", page.count);
    for ability in &page.results {
        match ability.english_short_effect() {
            Some(effect) => output.push_str(&format!("  {} - {}\n", ability.name, effect)),
            None => output.push_str(&format!("  {}\n", ability.name)),
        }
    }
    Ok(output)
}

/// Shows how a category fares in attack and defense
pub fn handle_type_matchups_command(category_name: &str) -> Result<String, String> {
    let category = Category::from_str(category_name.trim()).map_err(|_| format!("Unknown type '{}'.", category_name.trim()))?;
    let relations = category.damage_relations();
    let line = |label: &str, list: &[Category]| {
        if list.is_empty() {
            format!("  {}: -\n", label)
        } else {
            format!("  {}: {}\n", label, categories_label(list))
        }
    };

    let mut output = format!("--- {} ---\n", category);
    output.push_str(&line("Super effective against", &relations.double_damage_to));
    output.push_str(&line("Not very effective against", &relations.half_damage_to));
    output.push_str(&line("Weak to", &relations.double_damage_from));
    output.push_str(&line("Resists", &relations.half_damage_from));
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::runner::BattleRunner;
    use crate::battle::state::BattleRng;
    use crate::provider::InMemoryProvider;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use schema::{AbilityRecord, EffectEntry, NamedResource};
    use std::time::Duration;

    #[test]
    fn type_matchups_render_the_chart() {
        let text = handle_type_matchups_command("Water").unwrap();
        assert!(text.contains("Super effective against: fire/ground/rock"));
        assert!(text.contains("Not very effective against: grass/dragon"));
        assert!(handle_type_matchups_command("shadow").is_err());
    }

    #[tokio::test]
    async fn list_pages_report_ranges_and_far_offsets() {
        let provider = InMemoryProvider::from_candidate_pool();

        let text = handle_list_command(&provider, 4, 4).await.unwrap();
        assert!(text.starts_with("Pokemon 5-8 of 10:\n"));
        assert!(text.ends_with("Next page: offset 8\n"));

        assert_eq!(
            handle_list_command(&provider, 20, u32::MAX).await.unwrap(),
            format!("No Pokemon at offset {} (10 total).\n", u32::MAX)
        );
    }

    #[tokio::test]
    async fn abilities_show_the_english_short_effect() {
        let ability = |id: u32, name: &str, effect: &str| AbilityRecord {
            id,
            name: name.to_string(),
            is_main_series: true,
            effect_entries: vec![EffectEntry {
                effect: effect.to_string(),
                short_effect: effect.to_string(),
                language: NamedResource {
                    name: "en".to_string(),
                    url: String::new(),
                },
            }],
        };
        let provider = InMemoryProvider::default().with_abilities(vec![
            ability(1, "stench", "May cause flinching."),
            ability(9, "static", "May paralyze on contact."),
        ]);

        let text = handle_abilities_command(&provider, 1, 1).await.unwrap();
        assert_eq!(text, "Abilities (2 total):\n  static - May paralyze on contact.\n");
        assert_eq!(
            handle_abilities_command(&provider, 5, 10).await.unwrap(),
            "No abilities on this page.\n"
        );
    }

    #[tokio::test]
    async fn team_builder_commands_enforce_the_rules() {
        let provider = InMemoryProvider::from_candidate_pool();
        let store = MemoryStore::new();
        let mut builder = RosterBuilder::new();

        for name in ["charizard", "blastoise", "venusaur", "pikachu"] {
            handle_add_to_team(&mut builder, &provider, name).await.unwrap();
        }
        assert_eq!(
            handle_add_to_team(&mut builder, &provider, "pikachu").await.unwrap_err(),
            "This Pokemon is already in your team!"
        );
        assert!(handle_save_team(&mut builder, &store, "Kanto").is_err());

        handle_add_to_team(&mut builder, &provider, "gengar").await.unwrap();
        assert_eq!(
            handle_add_to_team(&mut builder, &provider, "rhydon").await.unwrap_err(),
            "Team is full! Maximum 5 Pokemon allowed."
        );

        handle_save_team(&mut builder, &store, "Kanto").unwrap();
        let listing = display_saved_teams(&store).unwrap();
        assert!(listing.contains("1. Kanto"));
        assert!(builder.members().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn battle_commands_drive_a_paced_battle() {
        let provider = InMemoryProvider::from_candidate_pool();
        let store = MemoryStore::new();
        let mut builder = RosterBuilder::new();
        for name in ["blastoise", "gyarados", "venusaur", "pikachu", "dragonite"] {
            handle_add_to_team(&mut builder, &provider, name).await.unwrap();
        }
        handle_save_team(&mut builder, &store, "Team").unwrap();

        let mut paced = PacedBattle::new(BattleRunner::with_rng(BattleRng::seeded(4)), Duration::from_millis(500));
        assert!(start_battle_with_team(&mut paced, &store, 2).await.is_err());

        let text = start_battle_with_team(&mut paced, &store, 1).await.unwrap();
        assert!(text.contains("Go, blastoise!"));

        let text = execute_attack_action(&mut paced).await.unwrap();
        assert!(text.starts_with("You attacked for "));

        let summary = get_battle_status_summary(&paced).await;
        assert!(summary.contains("--- Battle Log ---"));

        assert!(execute_switch_action(&mut paced, 9).await.is_err());
        assert!(execute_reset(&mut paced).await.contains("Battle reset"));
        assert!(get_battle_status_summary(&paced).await.starts_with("No battle in progress"));
    }
}
