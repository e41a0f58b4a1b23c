//! Session ownership: at most one live session, replaced atomically.

use bevy::app::AppExit;
use bevy::ecs::message::MessageReader;
use bevy::gltf::Gltf;
use bevy::prelude::*;

use super::{Bounds, ViewerError, ViewerStatus, stage};
use crate::catalog::{Catalog, Selection};
use crate::config::ConfigLoaded;
use crate::resolver::ModelResolver;

/// Root entity of a session. Every entity the session spawns is a descendant,
/// so despawning the root releases the whole scene.
#[derive(Component, Debug)]
pub struct SessionRoot {
  pub generation: u64,
}

/// Entity holding the spawned glTF scene. Carries the generation of the
/// session that created it so late scene events can be discarded.
#[derive(Component, Debug)]
pub struct ModelRoot {
  pub generation: u64,
}

/// Marks a model whose scene finished spawning and still needs fitting.
#[derive(Component, Debug, Default)]
pub struct PendingFit;

/// Resources owned by the live session.
#[derive(Debug)]
pub struct Session {
  pub root: Entity,
  pub generation: u64,
  pub creature: String,
  /// Asset path being loaded, `None` when no model is bundled.
  pub asset: Option<String>,
  pub status: ViewerStatus,
  pub source: Option<Handle<Gltf>>,
  pub model: Option<Entity>,
  pub material: Option<Handle<StandardMaterial>>,
  /// Fitted model bounds in world space, set once the model is ready.
  pub bounds: Option<Bounds>,
}

impl Session {
  pub fn new(root: Entity, generation: u64, creature: impl Into<String>) -> Self {
    Self {
      root,
      generation,
      creature: creature.into(),
      asset: None,
      status: ViewerStatus::Empty,
      source: None,
      model: None,
      material: None,
      bounds: None,
    }
  }

  pub fn fail(&mut self, error: ViewerError) {
    warn!("Session {} failed: {}", self.generation, error);
    self.status = ViewerStatus::Failed(error);
  }
}

/// Single owning slot for the viewer session.
#[derive(Resource, Debug, Default)]
pub struct SessionSlot {
  current: Option<Session>,
  generation: u64,
}

impl SessionSlot {
  /// Reserves the generation for the next session.
  pub fn next_generation(&mut self) -> u64 {
    self.generation += 1;
    self.generation
  }

  /// Installs `session`, handing back the one it replaces.
  pub fn replace(&mut self, session: Session) -> Option<Session> {
    self.current.replace(session)
  }

  pub fn take(&mut self) -> Option<Session> {
    self.current.take()
  }

  pub fn current(&self) -> Option<&Session> {
    self.current.as_ref()
  }

  pub fn current_mut(&mut self) -> Option<&mut Session> {
    self.current.as_mut()
  }

  /// Whether `generation` belongs to the live session.
  pub fn is_current(&self, generation: u64) -> bool {
    self
      .current
      .as_ref()
      .is_some_and(|s| s.generation == generation)
  }

  pub fn status(&self) -> ViewerStatus {
    self
      .current
      .as_ref()
      .map_or(ViewerStatus::Empty, |s| s.status.clone())
  }
}

/// Despawns a session's entity tree. Dropping `session` releases its asset
/// handles.
pub fn teardown(commands: &mut Commands, session: Session) {
  debug!(
    "Tearing down session {} ({})",
    session.generation, session.creature
  );
  if let Ok(mut root) = commands.get_entity(session.root) {
    root.despawn();
  }
}

/// Destroys the current session and builds a fresh one for the selected
/// creature.
pub fn begin_session(
  mut commands: Commands,
  selection: Res<Selection>,
  catalog: Res<Catalog>,
  resolver: Res<ModelResolver>,
  config: Res<ConfigLoaded>,
  asset_server: Res<AssetServer>,
  mut materials: ResMut<Assets<StandardMaterial>>,
  mut slot: ResMut<SessionSlot>,
) {
  if let Some(previous) = slot.take() {
    teardown(&mut commands, previous);
  }

  let Some(creature) = catalog.get(selection.id()) else {
    error!("Selected creature '{}' is not in the catalog", selection.id());
    return;
  };

  let generation = slot.next_generation();
  let root = commands
    .spawn((
      SessionRoot { generation },
      Name::new(format!("session:{}", creature.id)),
      Transform::default(),
      Visibility::default(),
    ))
    .id();
  stage::spawn_stage(&mut commands, root, &config);

  let mut session = Session::new(root, generation, creature.id.clone());

  let Some(locator) = resolver.resolve(&creature.model) else {
    session.fail(ViewerError::ModelUnavailable);
    slot.replace(session);
    return;
  };
  session.asset = Some(locator.clone());

  match bevy::asset::AssetPath::try_parse(&locator) {
    Ok(path) => {
      info!("Session {}: loading '{}'", generation, locator);
      session.source = Some(asset_server.load::<Gltf>(path.into_owned()));
      session.material = Some(materials.add(stage::neutral_material()));
      session.status = ViewerStatus::Loading;
    }
    Err(e) => session.fail(ViewerError::LoadFailed {
      asset: locator,
      message: e.to_string(),
    }),
  }

  slot.replace(session);
}

/// Releases the session when the app shuts down.
pub fn teardown_on_exit(
  mut commands: Commands,
  mut exits: MessageReader<AppExit>,
  mut slot: ResMut<SessionSlot>,
) {
  if exits.read().next().is_none() {
    return;
  }
  if let Some(session) = slot.take() {
    teardown(&mut commands, session);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn replace_hands_back_previous_session() {
    let mut slot = SessionSlot::default();
    let first = slot.next_generation();
    assert!(slot.replace(Session::new(Entity::PLACEHOLDER, first, "hulk")).is_none());

    let second = slot.next_generation();
    assert!(second > first);
    let previous = slot
      .replace(Session::new(Entity::PLACEHOLDER, second, "charger"))
      .unwrap();
    assert_eq!(previous.generation, first);
    assert_eq!(slot.current().unwrap().creature, "charger");
  }

  #[test]
  fn stale_generations_are_not_current() {
    let mut slot = SessionSlot::default();
    let first = slot.next_generation();
    slot.replace(Session::new(Entity::PLACEHOLDER, first, "hulk"));
    let second = slot.next_generation();
    slot.replace(Session::new(Entity::PLACEHOLDER, second, "hulk"));

    assert!(!slot.is_current(first));
    assert!(slot.is_current(second));

    slot.take();
    assert!(!slot.is_current(second));
    assert_eq!(slot.status(), ViewerStatus::Empty);
  }

  #[test]
  fn failure_is_reported_through_status() {
    let mut slot = SessionSlot::default();
    let generation = slot.next_generation();
    let mut session = Session::new(Entity::PLACEHOLDER, generation, "charger");
    session.fail(ViewerError::ModelUnavailable);
    slot.replace(session);
    assert_eq!(
      slot.status(),
      ViewerStatus::Failed(ViewerError::ModelUnavailable)
    );
  }
}
