use super::{matching_names, normalize_identifier, validate_query, PokemonDataProvider};
use crate::enemy_pool::candidate_pool;
use crate::errors::{ProviderError, ProviderResult};
use async_trait::async_trait;
use schema::{
    AbilityPage, AbilityRecord, Category, CombatantTemplate, NamedResource, PokemonPage, PokemonRecord, SearchResults,
    Sprites, TypeDamageRelations, TypeRecord, TypeSlot,
};

/// Offline provider over a fixed record set. Types are derived from the
/// built-in effectiveness chart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    records: Vec<PokemonRecord>,
    abilities: Vec<AbilityRecord>,
}

impl InMemoryProvider {
    pub fn new(records: Vec<PokemonRecord>) -> Self {
        Self {
            records,
            abilities: Vec::new(),
        }
    }

    /// Records for every enemy candidate, so an offline session can still
    /// build a full roster.
    pub fn from_candidate_pool() -> Self {
        Self::new(candidate_pool().iter().map(record_from_template).collect())
    }

    pub fn with_abilities(mut self, abilities: Vec<AbilityRecord>) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A minimal record carrying a template's identity, categories and sprite.
pub fn record_from_template(template: &CombatantTemplate) -> PokemonRecord {
    PokemonRecord {
        id: template.id,
        name: template.name.clone(),
        height: 0,
        weight: 0,
        base_experience: None,
        sprites: Sprites {
            front_default: Some(template.sprite.clone()),
            ..Sprites::default()
        },
        types: template
            .categories
            .iter()
            .enumerate()
            .map(|(i, category)| TypeSlot {
                slot: i as u8 + 1,
                type_: named(*category),
            })
            .collect(),
        abilities: Vec::new(),
        stats: Vec::new(),
    }
}

fn named(category: Category) -> NamedResource {
    NamedResource {
        name: category.to_string(),
        url: String::new(),
    }
}

fn type_record(id: u32, category: Category) -> TypeRecord {
    let relations = category.damage_relations();
    let names = |list: Vec<Category>| list.into_iter().map(named).collect();
    TypeRecord {
        id,
        name: category.to_string(),
        damage_relations: TypeDamageRelations {
            double_damage_from: names(relations.double_damage_from),
            double_damage_to: names(relations.double_damage_to),
            half_damage_from: names(relations.half_damage_from),
            half_damage_to: names(relations.half_damage_to),
            no_damage_from: Vec::new(),
            no_damage_to: Vec::new(),
        },
    }
}

fn page_links(total: usize, limit: u32, offset: u32) -> (Option<String>, Option<String>) {
    let next = (offset as usize + limit as usize) < total;
    let next = next.then(|| format!("?limit={}&offset={}", limit, offset + limit));
    let previous = (offset > 0).then(|| format!("?limit={}&offset={}", limit, offset.saturating_sub(limit)));
    (next, previous)
}

#[async_trait]
impl PokemonDataProvider for InMemoryProvider {
    async fn fetch_pokemon(&self, id_or_name: &str) -> ProviderResult<PokemonRecord> {
        let identifier = normalize_identifier(id_or_name)?;
        let by_id = identifier.parse::<u32>().ok();

        self.records
            .iter()
            .find(|r| Some(r.id) == by_id || r.name == identifier)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id_or_name.trim().to_string()))
    }

    async fn fetch_page(&self, limit: u32, offset: u32) -> ProviderResult<PokemonPage> {
        let results: Vec<PokemonRecord> = self
            .records
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        let (next, previous) = page_links(self.records.len(), limit, offset);

        Ok(PokemonPage {
            count: self.records.len() as u32,
            next,
            previous,
            results,
        })
    }

    async fn search(&self, query: &str) -> ProviderResult<SearchResults> {
        let needle = validate_query(query)?;
        let names = matching_names(self.records.iter().map(|r| r.name.as_str()), &needle);
        let results: Vec<PokemonRecord> = self
            .records
            .iter()
            .filter(|r| names.contains(&r.name.as_str()))
            .cloned()
            .collect();

        Ok(SearchResults {
            query: query.trim().to_string(),
            count: results.len(),
            results,
        })
    }

    async fn fetch_types(&self) -> ProviderResult<Vec<TypeRecord>> {
        Ok(Category::all()
            .enumerate()
            .map(|(i, category)| type_record(i as u32 + 1, category))
            .collect())
    }

    async fn fetch_abilities(&self, limit: u32, offset: u32) -> ProviderResult<AbilityPage> {
        let results: Vec<AbilityRecord> = self
            .abilities
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        let (next, previous) = page_links(self.abilities.len(), limit, offset);

        Ok(AbilityPage {
            count: self.abilities.len() as u32,
            next,
            previous,
            results,
        })
    }
}
