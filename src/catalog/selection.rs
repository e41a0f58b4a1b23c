//! Currently selected creature.

use bevy::ecs::message::{Message, MessageReader};
use bevy::prelude::*;

use super::Catalog;

/// Request to switch the viewer to another creature.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct SelectCreature(pub String);

/// Active creature id.
///
/// `revision` increases on every accepted selection, including re-selecting
/// the current id, so downstream systems can rebuild on change detection.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Selection {
  id: String,
  revision: u64,
}

impl Selection {
  /// Selects the first creature of the catalog.
  pub fn new(catalog: &Catalog) -> Self {
    Self {
      id: catalog.first().id.clone(),
      revision: 0,
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn revision(&self) -> u64 {
    self.revision
  }

  /// Switches to `id`. Ids missing from the catalog are ignored and return
  /// `false`.
  pub fn select(&mut self, catalog: &Catalog, id: &str) -> bool {
    if !catalog.contains(id) {
      return false;
    }
    self.id.clear();
    self.id.push_str(id);
    self.revision += 1;
    true
  }
}

pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_message::<SelectCreature>()
      .add_systems(PreStartup, init_selection)
      .add_systems(PreUpdate, apply_selection_requests);
  }
}

fn init_selection(mut commands: Commands, catalog: Res<Catalog>) {
  commands.insert_resource(Selection::new(&catalog));
}

/// Applies queued selection requests. Only the accepted ones touch
/// `Selection`, so rejected ids never trigger a viewer rebuild.
pub fn apply_selection_requests(
  mut requests: MessageReader<SelectCreature>,
  catalog: Res<Catalog>,
  selection: Option<ResMut<Selection>>,
) {
  let Some(mut selection) = selection else {
    requests.clear();
    return;
  };

  for SelectCreature(id) in requests.read() {
    if selection.bypass_change_detection().select(&catalog, id) {
      selection.set_changed();
      info!("Selected creature '{}'", id);
    } else {
      warn!("Ignoring selection of unknown creature '{}'", id);
    }
  }
}
