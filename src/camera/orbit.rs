//! Damped orbit camera around a target point.

use std::f32::consts::{FRAC_PI_2, TAU};

use bevy::prelude::*;

use crate::config::CameraConfig;

/// Keeps the camera off the poles so `looking_at` stays well defined.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;
/// Below this difference damped values snap to their goal.
const SNAP_EPSILON: f32 = 1e-4;
/// Zoom factor per wheel line, raised to the zoom speed.
const WHEEL_ZOOM_BASE: f32 = 0.95;

/// Orbit controller state. `goal_*` values are driven by input; the current
/// values chase them each frame by the damping factor.
#[derive(Component, Debug, Clone)]
pub struct OrbitController {
  target: Vec3,
  yaw: f32,
  pitch: f32,
  distance: f32,
  goal_target: Vec3,
  goal_yaw: f32,
  goal_pitch: f32,
  goal_distance: f32,
  pub min_distance: f32,
  pub max_distance: f32,
  pub damping: f32,
  pub rotate_speed: f32,
  pub zoom_speed: f32,
  pub pan_speed: f32,
  pub fov: f32,
}

impl OrbitController {
  /// Controller looking from `eye` at `target`, configured from `config`.
  pub fn new(eye: Vec3, target: Vec3, config: &CameraConfig) -> Self {
    let mut controller = Self {
      target,
      yaw: 0.0,
      pitch: 0.0,
      distance: 1.0,
      goal_target: target,
      goal_yaw: 0.0,
      goal_pitch: 0.0,
      goal_distance: 1.0,
      min_distance: 0.0,
      max_distance: f32::MAX,
      damping: 1.0,
      rotate_speed: 1.0,
      zoom_speed: 1.0,
      pan_speed: 1.0,
      fov: config.fov_degrees.to_radians(),
    };
    controller.apply_config(config);
    controller.snap_to(eye, target);
    controller
  }

  pub fn apply_config(&mut self, config: &CameraConfig) {
    self.min_distance = config.min_distance;
    self.max_distance = config.max_distance.max(config.min_distance);
    self.damping = config.damping.clamp(0.0, 1.0);
    self.rotate_speed = config.rotate_speed;
    self.zoom_speed = config.zoom_speed;
    self.pan_speed = config.pan_speed;
    self.fov = config.fov_degrees.to_radians();
    self.goal_distance = self.clamp_distance(self.goal_distance);
  }

  /// Places the camera at `eye` looking at `target` immediately, without
  /// damping. The distance is clamped to the zoom bounds.
  pub fn snap_to(&mut self, eye: Vec3, target: Vec3) {
    let offset = eye - target;
    let length = offset.length();
    let (yaw, pitch) = if length > f32::EPSILON {
      (
        offset.x.atan2(offset.z),
        (offset.y / length).clamp(-1.0, 1.0).asin(),
      )
    } else {
      (0.0, 0.0)
    };

    self.target = target;
    self.goal_target = target;
    self.yaw = yaw;
    self.goal_yaw = yaw;
    self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    self.goal_pitch = self.pitch;
    self.distance = self.clamp_distance(length);
    self.goal_distance = self.distance;
  }

  pub fn target(&self) -> Vec3 {
    self.target
  }

  pub fn distance(&self) -> f32 {
    self.distance
  }

  pub fn goal_distance(&self) -> f32 {
    self.goal_distance
  }

  /// Rotates by a pointer drag of `delta` pixels in a viewport `height`
  /// pixels tall. A full-height drag turns the camera by one revolution.
  pub fn rotate(&mut self, delta: Vec2, height: f32) {
    if height <= 0.0 {
      return;
    }
    self.goal_yaw -= TAU * delta.x / height * self.rotate_speed;
    self.goal_pitch = (self.goal_pitch + TAU * delta.y / height * self.rotate_speed)
      .clamp(-PITCH_LIMIT, PITCH_LIMIT);
  }

  /// Scales the goal distance by `factor` (below 1 moves closer).
  pub fn dolly(&mut self, factor: f32) {
    if factor > 0.0 {
      self.goal_distance = self.clamp_distance(self.goal_distance * factor);
    }
  }

  /// Dolly for `lines` wheel steps; positive values zoom in.
  pub fn wheel(&mut self, lines: f32) {
    self.dolly(WHEEL_ZOOM_BASE.powf(self.zoom_speed * lines));
  }

  /// Adds `delta` world units to the goal distance.
  pub fn zoom_by(&mut self, delta: f32) {
    self.goal_distance = self.clamp_distance(self.goal_distance + delta);
  }

  /// Moves the target in the view plane so the model follows the pointer.
  pub fn pan(&mut self, delta: Vec2, height: f32) {
    if height <= 0.0 {
      return;
    }
    let world_per_pixel = 2.0 * self.distance * (self.fov * 0.5).tan() / height;
    let (right, up) = self.view_axes();
    self.goal_target +=
      (-right * delta.x + up * delta.y) * world_per_pixel * self.pan_speed;
  }

  /// Advances damped values by `dt` seconds. The damping factor is defined per
  /// 60 Hz frame and rescaled for the actual frame time.
  pub fn update(&mut self, dt: f32) {
    let t = if self.damping >= 1.0 {
      1.0
    } else {
      1.0 - (1.0 - self.damping).powf(dt * 60.0)
    };

    self.yaw = approach(self.yaw, self.goal_yaw, t);
    self.pitch = approach(self.pitch, self.goal_pitch, t);
    self.distance = approach(self.distance, self.goal_distance, t);
    self.target = if self.target.distance(self.goal_target) < SNAP_EPSILON {
      self.goal_target
    } else {
      self.target.lerp(self.goal_target, t)
    };
  }

  pub fn eye(&self) -> Vec3 {
    self.target + orbit_offset(self.yaw, self.pitch, self.distance)
  }

  pub fn transform(&self) -> Transform {
    Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
  }

  fn view_axes(&self) -> (Vec3, Vec3) {
    let forward = -orbit_offset(self.yaw, self.pitch, 1.0);
    let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
    let up = right.cross(forward);
    (right, up)
  }

  fn clamp_distance(&self, distance: f32) -> f32 {
    distance.clamp(self.min_distance, self.max_distance)
  }
}

fn orbit_offset(yaw: f32, pitch: f32, distance: f32) -> Vec3 {
  Vec3::new(
    pitch.cos() * yaw.sin(),
    pitch.sin(),
    pitch.cos() * yaw.cos(),
  ) * distance
}

fn approach(current: f32, goal: f32, t: f32) -> f32 {
  if (goal - current).abs() < SNAP_EPSILON {
    goal
  } else {
    current + (goal - current) * t
  }
}
