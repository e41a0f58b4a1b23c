//! Touch gesture tracking for the orbit camera.
//!
//! One finger orbits. Two fingers pinch to zoom and drag their midpoint to
//! pan. Spreading the fingers apart zooms in, pinching them together zooms
//! out.

use bevy::prelude::*;

/// What the current touch frame asks the camera to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
  None,
  Orbit,
  /// `spread` is the change in finger distance since the last move, in
  /// pixels; `pan` is the midpoint movement.
  Pinch { spread: f32, pan: Vec2 },
}

/// Per-camera touch state.
#[derive(Component, Debug, Clone, Default)]
pub struct GestureTracker {
  touching: bool,
  touch_start: Vec2,
  pinch_distance: f32,
  pinch_midpoint: Vec2,
}

impl GestureTracker {
  pub fn is_touching(&self) -> bool {
    self.touching
  }

  pub fn touch_start_point(&self) -> Vec2 {
    self.touch_start
  }

  /// Records the baseline for the fingers currently down.
  pub fn touch_start(&mut self, points: &[Vec2]) {
    match points {
      [] => self.touching = false,
      [single] => {
        self.touching = true;
        self.touch_start = *single;
      }
      [a, b, ..] => {
        self.touching = true;
        self.pinch_distance = a.distance(*b);
        self.pinch_midpoint = (*a + *b) * 0.5;
      }
    }
  }

  /// Interprets a move of the fingers currently down.
  pub fn touch_move(&mut self, points: &[Vec2]) -> Gesture {
    if !self.touching {
      return Gesture::None;
    }
    match points {
      [] => Gesture::None,
      [_] => Gesture::Orbit,
      [a, b, ..] => {
        let distance = a.distance(*b);
        let midpoint = (*a + *b) * 0.5;
        let gesture = Gesture::Pinch {
          spread: distance - self.pinch_distance,
          pan: midpoint - self.pinch_midpoint,
        };
        self.pinch_distance = distance;
        self.pinch_midpoint = midpoint;
        gesture
      }
    }
  }

  /// Called when fingers lift. Remaining fingers become the new baseline so
  /// the camera does not jump.
  pub fn touch_end(&mut self, remaining: &[Vec2]) {
    self.touch_start(remaining);
  }
}

/// Orbit distance change for a pinch `spread`. Positive spread (fingers
/// apart) shortens the distance.
pub fn pinch_zoom(spread: f32, sensitivity: f32) -> f32 {
  -spread * sensitivity
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn single_finger_records_start_and_orbits() {
    let mut tracker = GestureTracker::default();
    tracker.touch_start(&[Vec2::new(10.0, 20.0)]);
    assert!(tracker.is_touching());
    assert_eq!(tracker.touch_start_point(), Vec2::new(10.0, 20.0));
    assert_eq!(tracker.touch_move(&[Vec2::new(15.0, 20.0)]), Gesture::Orbit);
  }

  #[test]
  fn spread_and_pinch_have_opposite_zoom() {
    let mut tracker = GestureTracker::default();
    tracker.touch_start(&[Vec2::ZERO, Vec2::new(100.0, 0.0)]);

    let Gesture::Pinch { spread, .. } = tracker.touch_move(&[Vec2::ZERO, Vec2::new(150.0, 0.0)])
    else {
      panic!("expected pinch");
    };
    assert_eq!(spread, 50.0);
    assert!(pinch_zoom(spread, 0.01) < 0.0, "spreading zooms in");

    let Gesture::Pinch { spread, .. } = tracker.touch_move(&[Vec2::ZERO, Vec2::new(120.0, 0.0)])
    else {
      panic!("expected pinch");
    };
    assert_eq!(spread, -30.0, "delta is taken from the previous move");
    assert!(pinch_zoom(spread, 0.01) > 0.0, "pinching zooms out");
  }

  #[test]
  fn pinch_reports_midpoint_pan() {
    let mut tracker = GestureTracker::default();
    tracker.touch_start(&[Vec2::ZERO, Vec2::new(100.0, 0.0)]);
    let gesture = tracker.touch_move(&[Vec2::new(0.0, 10.0), Vec2::new(100.0, 10.0)]);
    assert_eq!(
      gesture,
      Gesture::Pinch {
        spread: 0.0,
        pan: Vec2::new(0.0, 10.0)
      }
    );
  }

  #[test]
  fn moves_without_touch_start_are_ignored() {
    let mut tracker = GestureTracker::default();
    assert_eq!(tracker.touch_move(&[Vec2::ZERO]), Gesture::None);

    tracker.touch_start(&[Vec2::ZERO]);
    tracker.touch_end(&[]);
    assert!(!tracker.is_touching());
    assert_eq!(tracker.touch_move(&[Vec2::ZERO]), Gesture::None);
  }

  #[test]
  fn lifting_one_of_two_fingers_rebaselines() {
    let mut tracker = GestureTracker::default();
    tracker.touch_start(&[Vec2::ZERO, Vec2::new(100.0, 0.0)]);
    tracker.touch_end(&[Vec2::new(100.0, 0.0)]);
    assert!(tracker.is_touching());
    assert_eq!(tracker.touch_start_point(), Vec2::new(100.0, 0.0));
    assert_eq!(tracker.touch_move(&[Vec2::new(110.0, 0.0)]), Gesture::Orbit);
  }
}
