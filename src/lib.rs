//! Creature model viewer.
//!
//! Pick a creature from a static catalog, inspect its 3D model with an orbit
//! camera and read per-body-part stats from an overlay.

pub mod camera;
pub mod catalog;
pub mod config;
pub mod input;
pub mod overlay;
pub mod platform;
pub mod resolver;
pub mod ui;
pub mod viewer;

use bevy::app::PluginGroupBuilder;
use bevy::prelude::*;

/// Directory, relative to the asset root, holding the bundled models.
pub const MODELS_DIR: &str = "models";

/// Viewer plugins that run without a window: selection, session lifecycle
/// and the stat overlay state.
pub struct ViewerCorePlugins;

impl PluginGroup for ViewerCorePlugins {
  fn build(self) -> PluginGroupBuilder {
    PluginGroupBuilder::start::<Self>()
      .add(catalog::SelectionPlugin)
      .add(viewer::ViewerPlugin)
      .add(overlay::OverlayPlugin)
  }
}

/// Everything the windowed app adds on top of [`ViewerCorePlugins`].
pub struct ViewerFrontendPlugins {
  pub hot_reload: bool,
}

impl PluginGroup for ViewerFrontendPlugins {
  fn build(self) -> PluginGroupBuilder {
    PluginGroupBuilder::start::<Self>()
      .add(config::ConfigPlugin {
        hot_reload: self.hot_reload,
      })
      .add(camera::CameraControlPlugin)
      .add(viewer::helpers::ViewerHelpersPlugin)
      .add(input::InputPlugin)
      .add(ui::UiPlugin)
      .add(FrontendOrderingPlugin)
  }
}

/// Camera input runs after the viewer has framed a freshly fitted model.
struct FrontendOrderingPlugin;

impl Plugin for FrontendOrderingPlugin {
  fn build(&self, app: &mut App) {
    app.configure_sets(Update, camera::OrbitCameraSet.after(viewer::ViewerSet));
  }
}
