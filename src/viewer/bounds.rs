//! Axis-aligned bounds and fit-to-view math.

use bevy::math::Affine3A;
use bevy::prelude::*;

use crate::config::FramingConfig;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
  pub min: Vec3,
  pub max: Vec3,
}

impl Bounds {
  pub fn from_point(point: Vec3) -> Self {
    Self {
      min: point,
      max: point,
    }
  }

  pub fn extend(&mut self, point: Vec3) {
    self.min = self.min.min(point);
    self.max = self.max.max(point);
  }

  pub fn union(self, other: Bounds) -> Bounds {
    Bounds {
      min: self.min.min(other.min),
      max: self.max.max(other.max),
    }
  }

  pub fn size(&self) -> Vec3 {
    self.max - self.min
  }

  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }

  pub fn max_dimension(&self) -> f32 {
    self.size().max_element()
  }

  pub fn corners(&self) -> [Vec3; 8] {
    let (a, b) = (self.min, self.max);
    [
      Vec3::new(a.x, a.y, a.z),
      Vec3::new(b.x, a.y, a.z),
      Vec3::new(a.x, b.y, a.z),
      Vec3::new(b.x, b.y, a.z),
      Vec3::new(a.x, a.y, b.z),
      Vec3::new(b.x, a.y, b.z),
      Vec3::new(a.x, b.y, b.z),
      Vec3::new(b.x, b.y, b.z),
    ]
  }

  /// Bounds of this box after an affine transform.
  pub fn transformed(&self, affine: &Affine3A) -> Bounds {
    let corners = self.corners().map(|c| affine.transform_point3(c));
    let mut bounds = Bounds::from_point(corners[0]);
    for corner in &corners[1..] {
      bounds.extend(*corner);
    }
    bounds
  }
}

/// Uniform scale and translation that rest a model on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundFit {
  pub scale: f32,
  pub translation: Vec3,
}

impl GroundFit {
  /// Fit for a model whose (already rotated) bounds are `bounds`: the largest
  /// dimension becomes `target_size`, X/Z are centred on the origin and the
  /// lowest point lands on Y = 0. Degenerate (zero-size) models keep scale 1.
  pub fn compute(bounds: &Bounds, target_size: f32) -> Self {
    let max_dimension = bounds.max_dimension();
    let scale = if max_dimension > 0.0 {
      target_size / max_dimension
    } else {
      1.0
    };
    let center = bounds.center();
    Self {
      scale,
      translation: Vec3::new(-center.x, -bounds.min.y, -center.z) * scale,
    }
  }

  pub fn identity() -> Self {
    Self {
      scale: 1.0,
      translation: Vec3::ZERO,
    }
  }
}

/// Camera placement for a fitted model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
  pub eye: Vec3,
  pub target: Vec3,
}

impl Framing {
  /// Looks at the centre of `bounds` from straight ahead, at
  /// `max(min_distance, diagonal * distance_factor)`.
  pub fn for_bounds(bounds: &Bounds, config: &FramingConfig) -> Self {
    let distance = framing_distance(bounds, config);
    let target = bounds.center();
    Self {
      eye: target + Vec3::Z * distance,
      target,
    }
  }
}

pub fn framing_distance(bounds: &Bounds, config: &FramingConfig) -> f32 {
  (bounds.size().length() * config.distance_factor).max(config.min_distance)
}

#[cfg(test)]
mod tests {
  use std::f32::consts::PI;

  use super::*;

  fn framing() -> FramingConfig {
    FramingConfig {
      target_size: 5.0,
      distance_factor: 1.5,
      min_distance: 5.0,
      model_yaw_degrees: 180.0,
    }
  }

  fn apply(fit: &GroundFit, bounds: &Bounds) -> Bounds {
    let affine = Affine3A::from_scale_rotation_translation(
      Vec3::splat(fit.scale),
      Quat::IDENTITY,
      fit.translation,
    );
    bounds.transformed(&affine)
  }

  #[test]
  fn fit_rests_on_ground_and_scales_to_target() {
    let bounds = Bounds {
      min: Vec3::new(3.0, -2.0, 1.0),
      max: Vec3::new(5.0, 18.0, 4.0),
    };
    let fit = GroundFit::compute(&bounds, 5.0);
    assert!((fit.scale - 0.25).abs() < 1e-6);

    let fitted = apply(&fit, &bounds);
    assert!(fitted.min.y.abs() < 1e-5);
    assert!((fitted.max_dimension() - 5.0).abs() < 1e-5);
    assert!(fitted.center().x.abs() < 1e-5);
    assert!(fitted.center().z.abs() < 1e-5);
  }

  #[test]
  fn zero_size_model_keeps_scale() {
    let bounds = Bounds::from_point(Vec3::new(1.0, 2.0, 3.0));
    let fit = GroundFit::compute(&bounds, 5.0);
    assert_eq!(fit.scale, 1.0);
    let fitted = apply(&fit, &bounds);
    assert_eq!(fitted.min, Vec3::ZERO);
  }

  #[test]
  fn framing_distance_has_floor() {
    let small = Bounds {
      min: Vec3::ZERO,
      max: Vec3::splat(1.0),
    };
    assert_eq!(framing_distance(&small, &framing()), 5.0);

    let large = Bounds {
      min: Vec3::ZERO,
      max: Vec3::new(5.0, 5.0, 0.0),
    };
    let expected = (50.0f32).sqrt() * 1.5;
    assert!((framing_distance(&large, &framing()) - expected).abs() < 1e-5);

    let view = Framing::for_bounds(&large, &framing());
    assert_eq!(view.target, Vec3::new(2.5, 2.5, 0.0));
    assert!((view.eye.z - expected).abs() < 1e-5);
  }

  #[test]
  fn rotated_bounds_stay_axis_aligned() {
    let bounds = Bounds {
      min: Vec3::new(0.0, 0.0, 0.0),
      max: Vec3::new(2.0, 1.0, 1.0),
    };
    let half_turn = Affine3A::from_rotation_y(PI);
    let rotated = bounds.transformed(&half_turn);
    assert!((rotated.min.x + 2.0).abs() < 1e-5);
    assert!(rotated.max.x.abs() < 1e-5);
    assert!((rotated.size() - bounds.size()).length() < 1e-5);
  }
}
