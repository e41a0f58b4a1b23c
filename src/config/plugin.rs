#[cfg(not(target_family = "wasm"))]
use bevy::{asset::AssetEvent, ecs::message::MessageReader};
use bevy::{prelude::*, window::PrimaryWindow};
#[cfg(not(target_family = "wasm"))]
use bevy_common_assets::toml::TomlAssetPlugin;

#[cfg(not(target_family = "wasm"))]
use super::{CONFIG_ASSET_PATH, ViewerConfig};
use super::ConfigLoaded;
use crate::camera::OrbitController;

/// Keeps `ConfigLoaded` in sync with the config file and pushes changes into
/// the window and the live orbit controller.
///
/// `ConfigLoaded` itself is inserted by `main` before plugins build, so the
/// first session can read it during startup.
pub struct ConfigPlugin {
  pub hot_reload: bool,
}

impl Plugin for ConfigPlugin {
  fn build(&self, app: &mut App) {
    // Native: asset-based config with hot-reload
    #[cfg(not(target_family = "wasm"))]
    if self.hot_reload {
      app
        .add_plugins(TomlAssetPlugin::<ViewerConfig>::new(&["config.toml"]))
        .add_systems(Startup, watch_config_file)
        .add_systems(Update, watch_config_changes);
    }

    app.add_systems(
      Update,
      (
        update_window_on_config_change,
        update_orbit_on_config_change,
      ),
    );
  }
}

#[cfg(not(target_family = "wasm"))]
#[derive(Resource)]
struct ConfigHandle(Handle<ViewerConfig>);

#[cfg(not(target_family = "wasm"))]
fn watch_config_file(mut commands: Commands, asset_server: Res<AssetServer>) {
  let handle: Handle<ViewerConfig> = asset_server.load(CONFIG_ASSET_PATH);
  commands.insert_resource(ConfigHandle(handle));
}

#[cfg(not(target_family = "wasm"))]
fn watch_config_changes(
  mut commands: Commands,
  config_handle: Option<Res<ConfigHandle>>,
  mut messages: MessageReader<AssetEvent<ViewerConfig>>,
  configs: Res<Assets<ViewerConfig>>,
) {
  let Some(config_handle) = config_handle else {
    return;
  };
  for event in messages.read() {
    if let AssetEvent::Modified { id } = event {
      if config_handle.0.id() == *id {
        if let Some(config) = configs.get(&config_handle.0) {
          info!("Config reloaded!");
          commands.insert_resource(ConfigLoaded::from(config.clone()));
        }
      }
    }
  }
}

fn update_window_on_config_change(
  config: Res<ConfigLoaded>,
  mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
  if config.is_changed() {
    if let Ok(mut window) = windows.single_mut() {
      window
        .resolution
        .set(config.window.width as f32, config.window.height as f32);
      window.title.clone_from(&config.window.title);
    }
  }
}

/// Framing and scene colors apply to the next session; controller limits
/// apply immediately.
fn update_orbit_on_config_change(
  config: Res<ConfigLoaded>,
  mut controllers: Query<&mut OrbitController>,
) {
  if config.is_changed() {
    for mut controller in controllers.iter_mut() {
      controller.apply_config(&config.camera);
    }
  }
}
