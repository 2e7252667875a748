use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator};

/// Elemental category of a Pokemon. The set is closed: every type name the
/// data provider can return maps onto exactly one variant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

/// Every category a given category hits (or is hit by) for double or half damage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRelations {
    pub double_damage_to: Vec<Category>,
    pub half_damage_to: Vec<Category>,
    pub double_damage_from: Vec<Category>,
    pub half_damage_from: Vec<Category>,
}

impl Category {
    /// Damage multiplier for an attack of `attacking` category against a
    /// `defending` category.
    /// Returns: 2.0 = Super Effective, 1.0 = Normal, 0.5 = Not Very Effective.
    /// The chart is directional; `(a, b)` and `(b, a)` are looked up independently.
    pub fn effectiveness(attacking: Category, defending: Category) -> f64 {
        use Category::*;

        match (attacking, defending) {
            // Fire
            (Fire, Grass) | (Fire, Ice) | (Fire, Bug) | (Fire, Steel) => 2.0,
            (Fire, Water) | (Fire, Rock) | (Fire, Dragon) => 0.5,

            // Water
            (Water, Fire) | (Water, Ground) | (Water, Rock) => 2.0,
            (Water, Grass) | (Water, Dragon) => 0.5,

            // Electric
            (Electric, Water) | (Electric, Flying) => 2.0,
            (Electric, Grass) | (Electric, Ground) | (Electric, Dragon) => 0.5,

            // Grass
            (Grass, Water) | (Grass, Ground) | (Grass, Rock) => 2.0,
            (Grass, Fire)
            | (Grass, Grass)
            | (Grass, Poison)
            | (Grass, Flying)
            | (Grass, Bug)
            | (Grass, Dragon)
            | (Grass, Steel) => 0.5,

            // Ice
            (Ice, Grass) | (Ice, Ground) | (Ice, Flying) | (Ice, Dragon) => 2.0,
            (Ice, Fire) | (Ice, Water) | (Ice, Ice) | (Ice, Steel) => 0.5,

            // Fighting
            (Fighting, Normal)
            | (Fighting, Ice)
            | (Fighting, Rock)
            | (Fighting, Steel)
            | (Fighting, Dark) => 2.0,
            (Fighting, Flying)
            | (Fighting, Poison)
            | (Fighting, Psychic)
            | (Fighting, Bug)
            | (Fighting, Fairy) => 0.5,

            // Poison
            (Poison, Grass) | (Poison, Fairy) => 2.0,
            (Poison, Poison) | (Poison, Ground) | (Poison, Rock) | (Poison, Ghost) | (Poison, Steel) => 0.5,

            // Ground
            (Ground, Fire) | (Ground, Electric) | (Ground, Poison) | (Ground, Rock) | (Ground, Steel) => 2.0,
            (Ground, Grass) | (Ground, Bug) => 0.5,

            // Flying
            (Flying, Grass) | (Flying, Fighting) | (Flying, Bug) => 2.0,
            (Flying, Electric) | (Flying, Rock) | (Flying, Steel) => 0.5,

            // Psychic
            (Psychic, Fighting) | (Psychic, Poison) => 2.0,
            (Psychic, Dark) | (Psychic, Steel) => 0.5,

            // Bug
            (Bug, Grass) | (Bug, Psychic) | (Bug, Dark) => 2.0,
            (Bug, Fire)
            | (Bug, Fighting)
            | (Bug, Poison)
            | (Bug, Flying)
            | (Bug, Ghost)
            | (Bug, Steel)
            | (Bug, Fairy) => 0.5,

            // Rock
            (Rock, Fire) | (Rock, Ice) | (Rock, Flying) | (Rock, Bug) => 2.0,
            (Rock, Fighting) | (Rock, Ground) | (Rock, Steel) => 0.5,

            // Ghost
            (Ghost, Psychic) | (Ghost, Ghost) => 2.0,
            (Ghost, Dark) => 0.5,

            // Dragon
            (Dragon, Dragon) => 2.0,
            (Dragon, Steel) | (Dragon, Fairy) => 0.5,

            // Dark
            (Dark, Psychic) | (Dark, Ghost) => 2.0,
            (Dark, Fighting) | (Dark, Dark) | (Dark, Fairy) => 0.5,

            // Steel
            (Steel, Ice) | (Steel, Rock) | (Steel, Fairy) => 2.0,
            (Steel, Fire) | (Steel, Water) | (Steel, Electric) | (Steel, Steel) => 0.5,

            // Fairy
            (Fairy, Fighting) | (Fairy, Dragon) | (Fairy, Dark) => 2.0,
            (Fairy, Poison) | (Fairy, Steel) | (Fairy, Fire) => 0.5,

            // Normal has no entries; anything unlisted is neutral.
            _ => 1.0,
        }
    }

    /// All categories, in declaration order.
    pub fn all() -> impl Iterator<Item = Category> {
        Category::iter()
    }

    /// Summarises the chart rows and columns that involve this category.
    pub fn damage_relations(self) -> DamageRelations {
        let mut relations = DamageRelations::default();
        for other in Category::iter() {
            match Self::effectiveness(self, other) {
                m if m > 1.0 => relations.double_damage_to.push(other),
                m if m < 1.0 => relations.half_damage_to.push(other),
                _ => {}
            }
            match Self::effectiveness(other, self) {
                m if m > 1.0 => relations.double_damage_from.push(other),
                m if m < 1.0 => relations.half_damage_from.push(other),
                _ => {}
            }
        }
        relations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn every_pair_has_a_known_multiplier() {
        for attacking in Category::all() {
            for defending in Category::all() {
                let m = Category::effectiveness(attacking, defending);
                assert!(
                    m == 0.5 || m == 1.0 || m == 2.0,
                    "{} -> {} gave {}",
                    attacking,
                    defending,
                    m
                );
            }
        }
    }

    #[test]
    fn chart_is_directional() {
        assert_eq!(Category::effectiveness(Category::Fire, Category::Grass), 2.0);
        assert_eq!(Category::effectiveness(Category::Grass, Category::Fire), 0.5);
        // Electric is resisted by Ground, but Ground hits Electric for double.
        assert_eq!(Category::effectiveness(Category::Electric, Category::Ground), 0.5);
        assert_eq!(Category::effectiveness(Category::Ground, Category::Electric), 2.0);
        // Dark resists Ghost, yet Dark hits Ghost for double.
        assert_eq!(Category::effectiveness(Category::Ghost, Category::Dark), 0.5);
        assert_eq!(Category::effectiveness(Category::Dark, Category::Ghost), 2.0);
    }

    #[test]
    fn normal_attacks_are_always_neutral() {
        for defending in Category::all() {
            assert_eq!(Category::effectiveness(Category::Normal, defending), 1.0);
        }
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(Category::from_str("psychic").unwrap(), Category::Psychic);
        assert_eq!(Category::from_str("Fairy").unwrap(), Category::Fairy);
        assert!(Category::from_str("shadow").is_err());
        assert_eq!(Category::Steel.to_string(), "steel");
        assert_eq!(Category::Dragon.as_ref(), "dragon");
    }

    #[test]
    fn damage_relations_match_the_chart() {
        let water = Category::Water.damage_relations();
        assert_eq!(
            water.double_damage_to,
            vec![Category::Fire, Category::Ground, Category::Rock]
        );
        assert_eq!(water.half_damage_to, vec![Category::Grass, Category::Dragon]);
        assert!(water.double_damage_from.contains(&Category::Electric));
        assert!(water.double_damage_from.contains(&Category::Grass));
        assert!(water.half_damage_from.contains(&Category::Fire));
        assert!(water.half_damage_from.contains(&Category::Steel));
    }
}
