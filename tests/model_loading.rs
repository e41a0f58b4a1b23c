//! E2E tests for real model loading.
//!
//! Runs the viewer headless with the scene and glTF plugins, so bundled
//! models go through the asset server, the scene spawner and the
//! scene-ready observer exactly as in the app.
//!
//! Run: cargo test --test model_loading

use std::time::{Duration, Instant};

use bevy::gltf::{Gltf, GltfPlugin};
use bevy::prelude::*;
use bevy::scene::{SceneInstanceReady, ScenePlugin};
use creature_viewer::{
  ViewerCorePlugins,
  camera::OrbitController,
  catalog::{Catalog, SelectCreature},
  config::{ConfigLoaded, ViewerConfig},
  resolver::ModelResolver,
  viewer::{ModelRoot, PendingFit, SessionSlot, ViewerError, ViewerStatus},
};

const LOAD_TIMEOUT: Duration = Duration::from_secs(20);

fn test_app(catalog: Catalog, resolver: ModelResolver) -> App {
  let mut app = App::new();

  app.add_plugins(MinimalPlugins);
  // Asset paths are relative to the crate root so test fixtures resolve too
  app.add_plugins(bevy::asset::AssetPlugin {
    file_path: ".".to_string(),
    ..default()
  });
  app.add_plugins((ImagePlugin::default(), ScenePlugin, GltfPlugin::default()));

  // Normally registered by the mesh and PBR plugins, which need a renderer
  app
    .init_asset::<Mesh>()
    .init_asset::<StandardMaterial>()
    .register_type::<MeshMaterial3d<StandardMaterial>>();

  app
    .insert_resource(ConfigLoaded::from(
      ViewerConfig::embedded().expect("embedded config parses"),
    ))
    .insert_resource(catalog)
    .insert_resource(resolver)
    .add_plugins(ViewerCorePlugins);
  // `App::run` would do this; GltfPlugin registers its loader in `finish`
  app.finish();
  app.cleanup();
  app
}

fn bundled_app() -> App {
  test_app(
    Catalog::embedded().expect("embedded catalog parses"),
    ModelResolver::bundled("assets/models"),
  )
}

/// Updates until `done` holds or the timeout passes. Returns whether `done`
/// was reached.
fn run_until(app: &mut App, mut done: impl FnMut(&mut App) -> bool) -> bool {
  let deadline = Instant::now() + LOAD_TIMEOUT;
  loop {
    app.update();
    if done(app) {
      return true;
    }
    if Instant::now() > deadline {
      return false;
    }
    std::thread::sleep(Duration::from_millis(5));
  }
}

fn status(app: &App) -> ViewerStatus {
  app.world().resource::<SessionSlot>().status()
}

fn settled(app: &mut App) -> bool {
  matches!(status(app), ViewerStatus::Ready | ViewerStatus::Failed(_))
}

#[test]
fn bundled_model_loads_to_ready() {
  let mut app = bundled_app();
  app.update();
  app.world_mut().write_message(SelectCreature("hulk".to_string()));

  assert!(run_until(&mut app, settled), "hulk never finished loading");
  assert_eq!(status(&app), ViewerStatus::Ready);

  let slot = app.world().resource::<SessionSlot>();
  let session = slot.current().expect("session exists");
  assert_eq!(session.creature, "hulk");
  assert_eq!(session.asset.as_deref(), Some("assets/models/Hulk.glb"));
  let model = session.model.expect("scene spawned");
  let material = session.material.clone().expect("session material");
  let bounds = session.bounds.expect("bounds recorded");

  assert!(bounds.min.y.abs() < 1e-3, "model rests on the ground");
  assert!((bounds.max_dimension() - 5.0).abs() < 1e-3);
  assert!(bounds.center().x.abs() < 1e-3);
  assert!(bounds.center().z.abs() < 1e-3);
  assert!(app.world().get::<PendingFit>(model).is_none());

  // Every mesh of the scene now uses the session material
  let mut meshes = app
    .world_mut()
    .query_filtered::<&MeshMaterial3d<StandardMaterial>, With<Mesh3d>>();
  let handles: Vec<_> = meshes.iter(app.world()).map(|m| m.0.clone()).collect();
  assert!(!handles.is_empty());
  assert!(handles.iter().all(|h| *h == material));

  let mut cameras = app.world_mut().query::<&OrbitController>();
  let controller = cameras.single(app.world()).expect("one viewer camera");
  assert!((controller.target() - bounds.center()).length() < 1e-3);
  let expected = (bounds.size().length() * 1.5).max(5.0);
  assert!((controller.distance() - expected).abs() < 1e-2);
}

#[test]
fn model_without_scenes_fails() {
  let catalog = Catalog::from_toml(
    r#"
[[creature]]
id = "empty_shell"
name = "Empty Shell"
category = "illuminate"
model = "NoScene.gltf"
"#,
  )
  .unwrap();
  let mut app = test_app(catalog, ModelResolver::new("tests/fixtures", ["NoScene.gltf"]));

  assert!(run_until(&mut app, settled), "fixture never finished loading");
  assert_eq!(
    status(&app),
    ViewerStatus::Failed(ViewerError::LoadFailed {
      asset: "tests/fixtures/NoScene.gltf".to_string(),
      message: "model contains no scenes".to_string(),
    })
  );
  let slot = app.world().resource::<SessionSlot>();
  assert!(slot.current().unwrap().model.is_none());
}

/// Scene-ready notifications seen for one entity.
#[derive(Resource, Default)]
struct ReadySeen {
  watched: Option<Entity>,
  count: usize,
}

fn count_ready(ready: On<SceneInstanceReady>, mut seen: ResMut<ReadySeen>) {
  if seen.watched == Some(ready.entity) {
    seen.count += 1;
  }
}

#[test]
fn stale_scene_instance_is_not_fitted() {
  let mut app = bundled_app();
  app.init_resource::<ReadySeen>().add_observer(count_ready);
  app.update();

  let hulk: Handle<Gltf> = app
    .world()
    .resource::<AssetServer>()
    .load("assets/models/Hulk.glb");
  assert!(
    run_until(&mut app, |app| app.world().resource::<Assets<Gltf>>().contains(&hulk)),
    "hulk never loaded"
  );
  let scene = app.world().resource::<Assets<Gltf>>().get(&hulk).unwrap().scenes[0].clone();

  let stale = app
    .world()
    .resource::<SessionSlot>()
    .current()
    .unwrap()
    .generation;
  app.world_mut().write_message(SelectCreature("charger".to_string()));
  app.update();
  let live_root = app.world().resource::<SessionSlot>().current().unwrap().root;

  // A scene from the replaced session finishing after the switch
  let model = app
    .world_mut()
    .spawn((
      ModelRoot { generation: stale },
      SceneRoot(scene),
      Transform::default(),
      Visibility::default(),
      ChildOf(live_root),
    ))
    .id();
  app.world_mut().resource_mut::<ReadySeen>().watched = Some(model);

  assert!(
    run_until(&mut app, |app| app.world().resource::<ReadySeen>().count > 0),
    "stale scene never spawned"
  );
  for _ in 0..3 {
    app.update();
  }

  assert!(app.world().get::<PendingFit>(model).is_none());
  assert_eq!(
    status(&app),
    ViewerStatus::Failed(ViewerError::ModelUnavailable)
  );
  let slot = app.world().resource::<SessionSlot>();
  assert!(slot.current().unwrap().bounds.is_none());
  assert_eq!(
    app.world().get::<Transform>(model).unwrap().scale,
    Vec3::ONE,
    "stale model keeps its untouched transform"
  );
}
