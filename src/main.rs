use bevy::{
  log::LogPlugin,
  prelude::*,
  window::{Window, WindowResolution},
};
use creature_viewer::{
  MODELS_DIR, ViewerCorePlugins, ViewerFrontendPlugins,
  catalog::Catalog,
  config::{ConfigLoaded, ViewerConfig},
  platform,
  resolver::ModelResolver,
};

fn main() -> AppExit {
  let (platform, embedded) = platform::init();

  // WASM: config is embedded at compile time (no filesystem access)
  let config = match embedded {
    Some(assets) => ViewerConfig::from_toml(assets.viewer_config),
    #[cfg(not(target_family = "wasm"))]
    None => ViewerConfig::read(&platform.asset_root),
    #[cfg(target_family = "wasm")]
    None => ViewerConfig::embedded(),
  };
  let config = match config {
    Ok(config) => config,
    Err(e) => {
      eprintln!("creature-viewer: {}", e);
      return AppExit::error();
    }
  };

  let catalog = match Catalog::embedded() {
    Ok(catalog) => catalog,
    Err(e) => {
      eprintln!("creature-viewer: invalid catalog: {}", e);
      return AppExit::error();
    }
  };

  let mut app = App::new();

  app.add_plugins(
    DefaultPlugins
      .set(WindowPlugin {
        primary_window: Some(Window {
          resolution: WindowResolution::new(config.window.width, config.window.height),
          title: config.window.title.clone(),
          present_mode: platform.present_mode,
          mode: platform.window_mode,
          canvas: platform.canvas.clone(),
          fit_canvas_to_parent: platform.fit_canvas_to_parent,
          prevent_default_event_handling: platform.prevent_default_event_handling,
          ..default()
        }),
        ..default()
      })
      .set(AssetPlugin {
        file_path: platform.asset_root.clone(),
        ..default()
      })
      .set(LogPlugin {
        filter: "wgpu=error,naga=warn,creature_viewer=debug".to_string(),
        ..default()
      }),
  );

  app
    .insert_resource(ConfigLoaded::from(config))
    .insert_resource(catalog)
    .insert_resource(ModelResolver::bundled(MODELS_DIR))
    .add_plugins(ViewerCorePlugins)
    .add_plugins(ViewerFrontendPlugins {
      hot_reload: platform.hot_reload,
    });

  app.run()
}
