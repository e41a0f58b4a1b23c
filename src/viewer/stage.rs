//! Fixed scene content every session starts with.

use bevy::prelude::*;

use crate::camera::{GestureTracker, OrbitController};
use crate::config::{ConfigLoaded, rgb};

/// Marker for a session's camera.
#[derive(Component, Debug)]
pub struct ViewerCamera;

/// Spawns camera and lights as children of the session `root`.
pub fn spawn_stage(commands: &mut Commands, root: Entity, config: &ConfigLoaded) {
  let camera = &config.camera;
  let scene = &config.scene;

  let controller = OrbitController::new(Vec3::from(camera.start_position), Vec3::ZERO, camera);
  commands.spawn((
    ViewerCamera,
    Name::new("viewer-camera"),
    Camera3d::default(),
    Camera {
      clear_color: ClearColorConfig::Custom(rgb(scene.background)),
      ..default()
    },
    Projection::Perspective(PerspectiveProjection {
      fov: camera.fov_degrees.to_radians(),
      near: camera.near,
      far: camera.far,
      ..default()
    }),
    controller.transform(),
    controller,
    GestureTracker::default(),
    // Sky/ground fill standing in for a hemisphere light
    AmbientLight {
      color: Color::WHITE,
      brightness: scene.ambient_brightness,
      ..default()
    },
    ChildOf(root),
  ));

  commands.spawn((
    Name::new("key-light"),
    DirectionalLight {
      illuminance: scene.key_light_illuminance,
      ..default()
    },
    light_transform(scene.key_light_direction),
    ChildOf(root),
  ));

  commands.spawn((
    Name::new("back-light"),
    DirectionalLight {
      illuminance: scene.back_light_illuminance,
      ..default()
    },
    light_transform(scene.back_light_direction),
    ChildOf(root),
  ));
}

/// Directional light shining from `from` towards the origin.
fn light_transform(from: [f32; 3]) -> Transform {
  Transform::from_translation(Vec3::from(from)).looking_at(Vec3::ZERO, Vec3::Y)
}

/// Uniform material applied to every mesh of a loaded model, so models from
/// different sources read the same under the fixed lights.
pub fn neutral_material() -> StandardMaterial {
  StandardMaterial {
    base_color: Color::srgb_u8(0xcc, 0xcc, 0xcc),
    emissive: Color::srgb_u8(0x33, 0x33, 0x33).to_linear(),
    perceptual_roughness: 1.0,
    metallic: 0.0,
    double_sided: true,
    cull_mode: None,
    ..default()
  }
}
