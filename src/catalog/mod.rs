//! Static creature catalog.
//!
//! The catalog is parsed once at startup from an embedded TOML document and
//! is read-only afterwards. Selection state lives in [`selection`].

pub mod selection;

use std::collections::{BTreeMap, HashSet};

use bevy::prelude::*;
use serde::Deserialize;

pub use selection::{SelectCreature, Selection, SelectionPlugin};

/// Catalog bundled with the binary.
const EMBEDDED_CATALOG: &str = include_str!("../../assets/data/catalog.toml");

/// Faction a creature belongs to.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Terminid,
  Automaton,
  Illuminate,
}

impl Category {
  pub fn label(self) -> &'static str {
    match self {
      Category::Terminid => "Terminid",
      Category::Automaton => "Automaton",
      Category::Illuminate => "Illuminate",
    }
  }
}

/// Stats for a single body part. Missing fields render as "No data".
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PartStats {
  pub health: Option<u32>,
  pub weak_point: Option<String>,
  pub best_target: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Creature {
  pub id: String,
  pub name: String,
  pub category: Category,
  /// Logical model file name, resolved by [`crate::resolver::ModelResolver`].
  pub model: String,
  #[serde(default)]
  pub stats: BTreeMap<String, PartStats>,
}

impl Creature {
  pub fn part(&self, name: &str) -> Option<&PartStats> {
    self.stats.get(name)
  }
}

#[derive(Deserialize)]
struct CatalogFile {
  #[serde(default)]
  creature: Vec<Creature>,
}

/// Errors raised while parsing catalog data.
#[derive(Debug)]
pub enum CatalogError {
  Parse(toml::de::Error),
  Empty,
  DuplicateId(String),
}

impl std::fmt::Display for CatalogError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Parse(e) => write!(f, "catalog parse error: {}", e),
      Self::Empty => write!(f, "catalog contains no creatures"),
      Self::DuplicateId(id) => write!(f, "duplicate creature id: {}", id),
    }
  }
}

impl std::error::Error for CatalogError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Parse(e) => Some(e),
      _ => None,
    }
  }
}

/// Ordered, immutable list of creatures.
#[derive(Resource, Debug, Clone)]
pub struct Catalog {
  creatures: Vec<Creature>,
}

impl Catalog {
  /// Parses a catalog document. Ids must be unique and the list non-empty.
  pub fn from_toml(source: &str) -> Result<Self, CatalogError> {
    let file: CatalogFile = toml::from_str(source).map_err(CatalogError::Parse)?;
    Self::new(file.creature)
  }

  /// Catalog compiled into the binary.
  pub fn embedded() -> Result<Self, CatalogError> {
    Self::from_toml(EMBEDDED_CATALOG)
  }

  pub fn new(creatures: Vec<Creature>) -> Result<Self, CatalogError> {
    if creatures.is_empty() {
      return Err(CatalogError::Empty);
    }
    let mut seen = HashSet::new();
    for creature in &creatures {
      if !seen.insert(creature.id.as_str()) {
        return Err(CatalogError::DuplicateId(creature.id.clone()));
      }
    }
    log::debug!("catalog loaded with {} creatures", creatures.len());
    Ok(Self { creatures })
  }

  pub fn get(&self, id: &str) -> Option<&Creature> {
    self.creatures.iter().find(|c| c.id == id)
  }

  pub fn contains(&self, id: &str) -> bool {
    self.get(id).is_some()
  }

  /// First creature in catalog order. A catalog is never empty.
  pub fn first(&self) -> &Creature {
    &self.creatures[0]
  }

  pub fn iter(&self) -> impl Iterator<Item = &Creature> {
    self.creatures.iter()
  }

  /// Creature `step` positions away from `current`, wrapping at both ends.
  /// Unknown ids cycle from the start of the list.
  pub fn cycle(&self, current: &str, step: i32) -> &Creature {
    let len = self.creatures.len() as i64;
    let index = self
      .creatures
      .iter()
      .position(|c| c.id == current)
      .map_or(0, |i| i as i64);
    let next = (index + step as i64).rem_euclid(len) as usize;
    &self.creatures[next]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = r#"
[[creature]]
id = "hulk"
name = "Hulk"
category = "automaton"
model = "Hulk.glb"

[creature.stats.body]
health = 600
weak_point = "Rear heat sink"
best_target = "Back vent"

[[creature]]
id = "charger"
name = "Charger"
category = "terminid"
model = "Charger.glb"
"#;

  #[test]
  fn parses_creatures_in_order() {
    let catalog = Catalog::from_toml(SAMPLE).unwrap();
    assert_eq!(catalog.iter().count(), 2);
    assert_eq!(catalog.first().id, "hulk");

    let hulk = catalog.get("hulk").unwrap();
    assert_eq!(hulk.category, Category::Automaton);
    let body = hulk.part("body").unwrap();
    assert_eq!(body.health, Some(600));
    assert_eq!(body.best_target.as_deref(), Some("Back vent"));

    let charger = catalog.get("charger").unwrap();
    assert!(charger.stats.is_empty());
  }

  #[test]
  fn rejects_duplicate_ids() {
    let doubled = format!("{}\n{}", SAMPLE, SAMPLE);
    match Catalog::from_toml(&doubled) {
      Err(CatalogError::DuplicateId(id)) => assert_eq!(id, "hulk"),
      other => panic!("expected duplicate id error, got {:?}", other),
    }
  }

  #[test]
  fn rejects_empty_and_malformed_documents() {
    assert!(matches!(Catalog::from_toml(""), Err(CatalogError::Empty)));
    assert!(matches!(
      Catalog::from_toml("[[creature]]\nid = 3"),
      Err(CatalogError::Parse(_))
    ));
  }

  #[test]
  fn unknown_category_is_a_parse_error() {
    let source = SAMPLE.replace("automaton", "squid");
    assert!(matches!(
      Catalog::from_toml(&source),
      Err(CatalogError::Parse(_))
    ));
  }

  #[test]
  fn cycle_wraps_in_both_directions() {
    let catalog = Catalog::from_toml(SAMPLE).unwrap();
    assert_eq!(catalog.cycle("hulk", 1).id, "charger");
    assert_eq!(catalog.cycle("charger", 1).id, "hulk");
    assert_eq!(catalog.cycle("hulk", -1).id, "charger");
    assert_eq!(catalog.cycle("missing", 0).id, "hulk");
  }

  #[test]
  fn embedded_catalog_is_valid() {
    let catalog = Catalog::embedded().unwrap();
    assert!(catalog.contains("hulk"));
    assert_eq!(
      catalog.get("hulk").unwrap().part("body").unwrap().health,
      Some(600)
    );
  }
}
