//! Asynchronous model loading.
//!
//! The glTF source is polled until it loads or fails. On success the default
//! scene is spawned under a `ModelRoot`; once Bevy reports the instance ready
//! the model is queued for fitting.

use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;

use super::session::{ModelRoot, PendingFit, SessionSlot};
use super::{ViewerError, ViewerStatus};
use crate::config::ConfigLoaded;

/// Checks the live session's model source and spawns its scene when loaded.
pub fn poll_model_load(
  mut commands: Commands,
  asset_server: Res<AssetServer>,
  gltfs: Res<Assets<Gltf>>,
  config: Res<ConfigLoaded>,
  mut slot: ResMut<SessionSlot>,
) {
  let Some(session) = slot.bypass_change_detection().current_mut() else {
    return;
  };
  if session.status != ViewerStatus::Loading || session.model.is_some() {
    return;
  }
  let Some(source) = session.source.as_ref() else {
    return;
  };
  let asset = session.asset.clone().unwrap_or_default();

  match asset_server.load_state(source) {
    LoadState::Loaded => {
      let Some(gltf) = gltfs.get(source) else {
        return;
      };
      let Some(scene) = gltf
        .default_scene
        .clone()
        .or_else(|| gltf.scenes.first().cloned())
      else {
        session.fail(ViewerError::LoadFailed {
          asset,
          message: "model contains no scenes".to_string(),
        });
        slot.set_changed();
        return;
      };

      let yaw = config.framing.model_yaw_degrees.to_radians();
      let model = commands
        .spawn((
          ModelRoot {
            generation: session.generation,
          },
          Name::new(format!("model:{}", session.creature)),
          SceneRoot(scene),
          Transform::from_rotation(Quat::from_rotation_y(yaw)),
          Visibility::default(),
          ChildOf(session.root),
        ))
        .id();
      session.model = Some(model);
      debug!("Session {}: spawning scene for '{}'", session.generation, asset);
    }
    LoadState::Failed(error) => {
      session.fail(ViewerError::LoadFailed {
        asset,
        message: error.to_string(),
      });
      slot.set_changed();
    }
    LoadState::Loading | LoadState::NotLoaded => {}
  }
}

/// Queues a spawned model for fitting, ignoring scenes that belong to a
/// session which has since been replaced.
pub fn queue_model_fit(
  ready: On<SceneInstanceReady>,
  mut commands: Commands,
  models: Query<&ModelRoot>,
  slot: Res<SessionSlot>,
) {
  let Ok(model) = models.get(ready.entity) else {
    return;
  };
  if !slot.is_current(model.generation) {
    debug!("Discarding scene of stale session {}", model.generation);
    return;
  }
  commands.entity(ready.entity).insert(PendingFit);
}
