//! Body-part stat overlay.

use bevy::prelude::*;

use crate::catalog::{Catalog, Creature, Selection};

const NO_DATA: &str = "No data";

/// Body part the user picked for the overlay, if any.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct PartSelection(pub Option<String>);

impl PartSelection {
  pub fn pick(&mut self, part: impl Into<String>) {
    self.0 = Some(part.into());
  }

  pub fn dismiss(&mut self) {
    self.0 = None;
  }

  pub fn part(&self) -> Option<&str> {
    self.0.as_deref()
  }
}

/// Human-readable name for a stats key. Unknown keys are shown as-is.
pub fn part_display_name(part: &str) -> &str {
  match part {
    "head" => "Head",
    "body" => "Body",
    "legs" => "Limbs",
    "mandibles" => "Mandibles",
    "thorax" => "Thorax",
    "abdomen" => "Abdomen",
    other => other,
  }
}

/// Text lines shown for one body part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatPanel {
  pub title: String,
  pub health: String,
  pub weak_point: String,
  pub best_target: String,
}

impl StatPanel {
  /// Panel for `part` of `creature`, or `None` when no part is picked or the
  /// creature has no stats for it.
  pub fn build(creature: &Creature, part: Option<&str>) -> Option<Self> {
    let part = part?;
    let stats = creature.part(part)?;
    Some(Self {
      title: part_display_name(part).to_string(),
      health: stats
        .health
        .map_or_else(|| NO_DATA.to_string(), |h| h.to_string()),
      weak_point: stats
        .weak_point
        .clone()
        .unwrap_or_else(|| NO_DATA.to_string()),
      best_target: stats
        .best_target
        .clone()
        .unwrap_or_else(|| NO_DATA.to_string()),
    })
  }
}

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
  fn build(&self, app: &mut App) {
    app.init_resource::<PartSelection>().add_systems(
      Update,
      clear_stale_part.run_if(resource_exists_and_changed::<Selection>),
    );
  }
}

/// Drops a picked part the newly selected creature does not have.
fn clear_stale_part(
  selection: Res<Selection>,
  catalog: Res<Catalog>,
  mut parts: ResMut<PartSelection>,
) {
  let Some(part) = parts.part() else {
    return;
  };
  let known = catalog
    .get(selection.id())
    .is_some_and(|c| c.part(part).is_some());
  if !known {
    debug!("Clearing part '{}' not present on '{}'", part, selection.id());
    parts.dismiss();
  }
}
