//! Keyboard shortcuts: reset view, cycle creatures, dismiss the overlay.

pub mod actions;
mod bindings;

pub use actions::{CycleCreature, DismissOverlay, ResetViewAction, ViewerInput};
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
pub use bindings::viewer_input_actions;

use crate::catalog::{Catalog, SelectCreature, Selection};
use crate::overlay::PartSelection;
use crate::viewer::ResetView;

pub struct InputPlugin;

impl Plugin for InputPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(EnhancedInputPlugin)
      .add_input_context::<ViewerInput>()
      .add_systems(Startup, spawn_viewer_input)
      .add_systems(Update, handle_viewer_shortcuts);
  }
}

fn spawn_viewer_input(mut commands: Commands) {
  commands.spawn((ViewerInput, Name::new("viewer-input"), viewer_input_actions()));
}

/// Keys held down last frame, so each press fires once.
#[derive(Default)]
pub struct ShortcutState {
  reset_held: bool,
  dismiss_held: bool,
  cycle_held: bool,
}

/// Turns shortcut presses into viewer messages.
#[allow(clippy::too_many_arguments)]
pub fn handle_viewer_shortcuts(
  contexts: Query<&Actions<ViewerInput>>,
  reset_actions: Query<&ActionState, With<Action<ResetViewAction>>>,
  dismiss_actions: Query<&ActionState, With<Action<DismissOverlay>>>,
  cycle_actions: Query<(&Action<CycleCreature>, &ActionState)>,
  catalog: Res<Catalog>,
  selection: Res<Selection>,
  mut parts: ResMut<PartSelection>,
  mut reset: MessageWriter<ResetView>,
  mut select: MessageWriter<SelectCreature>,
  mut state: Local<ShortcutState>,
) {
  for actions in &contexts {
    for action_entity in actions.iter() {
      if let Ok(action_state) = reset_actions.get(action_entity) {
        let fired = matches!(action_state, ActionState::Fired);
        if fired && !state.reset_held {
          reset.write(ResetView);
        }
        state.reset_held = fired;
      }

      if let Ok(action_state) = dismiss_actions.get(action_entity) {
        let fired = matches!(action_state, ActionState::Fired);
        if fired && !state.dismiss_held && parts.part().is_some() {
          parts.dismiss();
        }
        state.dismiss_held = fired;
      }

      if let Ok((action, action_state)) = cycle_actions.get(action_entity) {
        let value = **action;
        let fired = matches!(action_state, ActionState::Fired) && value != 0.0;
        if fired && !state.cycle_held {
          let step = if value > 0.0 { 1 } else { -1 };
          let next = catalog.cycle(selection.id(), step);
          debug!("Cycling to creature '{}'", next.id);
          select.write(SelectCreature(next.id.clone()));
        }
        state.cycle_held = fired;
      }
    }
  }
}
