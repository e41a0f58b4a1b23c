use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::actions::{CycleCreature, DismissOverlay, ResetViewAction, ViewerInput};

pub fn viewer_input_actions() -> impl Bundle {
  actions!(ViewerInput[
      (
          Action::<ResetViewAction>::new(),
          bindings![KeyCode::KeyR],
      ),
      (
          Action::<CycleCreature>::new(),
          Bindings::spawn((Bidirectional::left_right_arrow(),)),
      ),
      (
          Action::<DismissOverlay>::new(),
          bindings![KeyCode::Escape],
      ),
  ])
}
