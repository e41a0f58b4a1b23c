//! Orbit camera input: mouse buttons, wheel and touch gestures.

pub mod gesture;
pub mod orbit;

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
pub use gesture::{Gesture, GestureTracker, pinch_zoom};
pub use orbit::OrbitController;

use crate::config::ConfigLoaded;

/// Pixels of scroll that count as one wheel line.
const PIXELS_PER_LINE: f32 = 100.0;
/// Dolly factor per pixel of middle-button drag.
const DRAG_DOLLY_RATE: f32 = 0.01;

/// Set when the pointer is over a UI panel this frame; camera input is
/// ignored while it is.
#[derive(Resource, Default, Debug)]
pub struct PointerOverUi(pub bool);

/// System set for camera input and damping, ordered before transforms are
/// propagated.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrbitCameraSet;

pub struct CameraControlPlugin;

impl Plugin for CameraControlPlugin {
  fn build(&self, app: &mut App) {
    app
      .init_resource::<PointerOverUi>()
      .add_systems(
        Update,
        (orbit_mouse_input, orbit_touch_input, apply_orbit)
          .chain()
          .in_set(OrbitCameraSet),
      );
  }
}

/// Left drag rotates, middle drag dollies, right drag pans, wheel zooms.
fn orbit_mouse_input(
  buttons: Res<ButtonInput<MouseButton>>,
  motion: Res<AccumulatedMouseMotion>,
  scroll: Res<AccumulatedMouseScroll>,
  over_ui: Res<PointerOverUi>,
  windows: Query<&Window, With<PrimaryWindow>>,
  mut controllers: Query<&mut OrbitController>,
) {
  if over_ui.0 {
    return;
  }
  let Ok(window) = windows.single() else {
    return;
  };
  let height = window.height();

  let lines = match scroll.unit {
    MouseScrollUnit::Line => scroll.delta.y,
    MouseScrollUnit::Pixel => scroll.delta.y / PIXELS_PER_LINE,
  };

  for mut controller in controllers.iter_mut() {
    if motion.delta != Vec2::ZERO {
      if buttons.pressed(MouseButton::Left) {
        controller.rotate(motion.delta, height);
      } else if buttons.pressed(MouseButton::Middle) {
        let zoom_speed = controller.zoom_speed;
        controller.dolly(1.0 + motion.delta.y * DRAG_DOLLY_RATE * zoom_speed);
      } else if buttons.pressed(MouseButton::Right) {
        controller.pan(motion.delta, height);
      }
    }
    if lines != 0.0 {
      controller.wheel(lines);
    }
  }
}

/// Feeds touch points through each camera's gesture tracker.
fn orbit_touch_input(
  touches: Res<Touches>,
  config: Res<ConfigLoaded>,
  over_ui: Res<PointerOverUi>,
  windows: Query<&Window, With<PrimaryWindow>>,
  mut controllers: Query<(&mut OrbitController, &mut GestureTracker)>,
) {
  let Ok(window) = windows.single() else {
    return;
  };
  let height = window.height();
  let points: Vec<Vec2> = touches.iter().map(|t| t.position()).collect();
  let orbit_delta = touches.iter().next().map_or(Vec2::ZERO, |t| t.delta());
  let lifted = touches.any_just_released() || touches.any_just_canceled();

  for (mut controller, mut tracker) in controllers.iter_mut() {
    if touches.any_just_pressed() {
      // Touches that begin on a panel belong to the UI
      if over_ui.0 && !tracker.is_touching() {
        continue;
      }
      tracker.touch_start(&points);
      continue;
    }
    if lifted {
      tracker.touch_end(&points);
      continue;
    }

    match tracker.touch_move(&points) {
      Gesture::None => {}
      Gesture::Orbit => controller.rotate(orbit_delta, height),
      Gesture::Pinch { spread, pan } => {
        controller.zoom_by(pinch_zoom(spread, config.camera.pinch_sensitivity));
        controller.pan(pan, height);
      }
    }
  }
}

/// Per-frame damped update written back to the camera transform.
fn apply_orbit(time: Res<Time>, mut cameras: Query<(&mut OrbitController, &mut Transform)>) {
  let dt = time.delta_secs();
  for (mut controller, mut transform) in cameras.iter_mut() {
    controller.update(dt);
    *transform = controller.transform();
  }
}
