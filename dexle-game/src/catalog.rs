//! Immutable entity catalog loaded once per process.
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::constants::{DEFAULT_SUGGESTION_LIMIT, FALLBACK_CLASSIFICATION};

const BUNDLED_CATALOG: &str = include_str!("../assets/catalog.json");

/// One guessable catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "type1")]
    pub primary_category: String,
    #[serde(
        default,
        alias = "type2",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub secondary_category: Option<String>,
    #[serde(default, alias = "pokedex_number", deserialize_with = "null_as_zero_u32")]
    pub sequence_number: u32,
    #[serde(default = "default_classification", alias = "classfication")]
    pub classification: String,
    #[serde(default, alias = "height_m", deserialize_with = "null_as_zero_f64")]
    pub height: f64,
    #[serde(default, alias = "weight_kg", deserialize_with = "null_as_zero_f64")]
    pub mass: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<u8>,
    #[serde(default, alias = "is_legendary", deserialize_with = "flag")]
    pub legendary: bool,
}

fn default_classification() -> String {
    FALLBACK_CLASSIFICATION.to_string()
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

fn null_as_zero_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_zero_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `true`/`false` as well as the `0`/`1` integers older exports use.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(value)) => value,
        Some(Flag::Int(value)) => value != 0,
        None => false,
    })
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            name: String::new(),
            primary_category: String::new(),
            secondary_category: None,
            sequence_number: 0,
            classification: default_classification(),
            height: 0.0,
            mass: 0.0,
            generation: None,
            legendary: false,
        }
    }
}

impl Entity {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_categories(mut self, primary: impl Into<String>, secondary: Option<&str>) -> Self {
        self.primary_category = primary.into();
        self.secondary_category = secondary
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string);
        self
    }

    #[must_use]
    pub const fn with_sequence(mut self, sequence_number: u32) -> Self {
        self.sequence_number = sequence_number;
        self
    }

    #[must_use]
    pub fn with_classification(mut self, classification: impl Into<String>) -> Self {
        self.classification = classification.into();
        self
    }

    #[must_use]
    pub const fn with_measurements(mut self, height: f64, mass: f64) -> Self {
        self.height = height;
        self.mass = mass;
        self
    }

    /// Lookup key: trimmed and lowercased name.
    #[must_use]
    pub fn key(&self) -> String {
        name_key(&self.name)
    }

    #[must_use]
    pub fn same_name(&self, other: &str) -> bool {
        self.key() == name_key(other)
    }

    /// Categories joined the way they are shown to players, e.g. `Grass/Poison`.
    #[must_use]
    pub fn category_label(&self) -> String {
        match &self.secondary_category {
            Some(secondary) => format!("{}/{secondary}", self.primary_category),
            None => self.primary_category.clone(),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[must_use]
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Reasons a catalog cannot be used. All of them block gameplay.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains no entities")]
    Empty,
    #[error("catalog entity at position {position} has a blank name")]
    BlankName { position: usize },
    #[error("catalog lists '{name}' more than once")]
    DuplicateName { name: String },
}

/// Ordered, immutable list of entities with case-insensitive name lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entities: Vec<Entity>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from already-parsed entities.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, a name is blank, or a name repeats.
    pub fn from_entities(entities: Vec<Entity>) -> Result<Self, CatalogError> {
        if entities.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut by_name = HashMap::with_capacity(entities.len());
        for (position, entity) in entities.iter().enumerate() {
            let key = entity.key();
            if key.is_empty() {
                return Err(CatalogError::BlankName { position });
            }
            if by_name.insert(key, position).is_some() {
                return Err(CatalogError::DuplicateName {
                    name: entity.name.clone(),
                });
            }
        }
        Ok(Self { entities, by_name })
    }

    /// Load a catalog from a JSON array of entity records.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the entities fail validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entities: Vec<Entity> = serde_json::from_str(json)?;
        Self::from_entities(entities)
    }

    /// Catalog compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled asset fails validation.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    /// Case-insensitive exact lookup; surrounding whitespace is ignored.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Entity> {
        self.position_of(name).and_then(|idx| self.entities.get(idx))
    }

    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(&name_key(name)).copied()
    }

    /// Names containing `term` (case-insensitive), in catalog order.
    #[must_use]
    pub fn suggest(&self, term: &str, limit: Option<usize>) -> Vec<&Entity> {
        let needle = name_key(term);
        if needle.is_empty() {
            return Vec::new();
        }
        self.entities
            .iter()
            .filter(|entity| entity.key().contains(&needle))
            .take(limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
