//! Ground grid and model bounds, drawn with gizmos while a session is live.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use super::SessionSlot;
use crate::config::{ConfigLoaded, rgb};

/// Visual aids for the viewer. Kept apart from [`super::ViewerPlugin`]
/// because gizmos need the render stack.
pub struct ViewerHelpersPlugin;

impl Plugin for ViewerHelpersPlugin {
  fn build(&self, app: &mut App) {
    app.add_systems(
      PostUpdate,
      (draw_ground_grid, draw_model_bounds).run_if(session_live),
    );
  }
}

fn session_live(slot: Res<SessionSlot>) -> bool {
  slot.current().is_some()
}

/// Cell spacing for a square grid of `size` split into `divisions` cells.
pub fn grid_spacing(size: f32, divisions: u32) -> f32 {
  if divisions == 0 {
    size
  } else {
    size / divisions as f32
  }
}

fn draw_ground_grid(mut gizmos: Gizmos, config: Res<ConfigLoaded>) {
  let scene = &config.scene;
  let divisions = scene.grid_divisions.max(1);
  gizmos.grid(
    Isometry3d::from_rotation(Quat::from_rotation_x(FRAC_PI_2)),
    UVec2::splat(divisions),
    Vec2::splat(grid_spacing(scene.grid_size, divisions)),
    rgb(scene.grid_color),
  );
}

fn draw_model_bounds(mut gizmos: Gizmos, config: Res<ConfigLoaded>, slot: Res<SessionSlot>) {
  let Some(bounds) = slot.current().and_then(|s| s.bounds) else {
    return;
  };
  let size = bounds.size();
  if size == Vec3::ZERO {
    return;
  }
  gizmos.cuboid(
    Transform::from_translation(bounds.center()).with_scale(size),
    rgb(config.scene.bounds_color),
  );
}
