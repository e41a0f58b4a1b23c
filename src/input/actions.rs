use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

/// Input context for viewer-wide shortcuts.
#[derive(Component)]
pub struct ViewerInput;

#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct ResetViewAction;

/// Previous / next creature, -1.0 or 1.0.
#[derive(Debug, InputAction)]
#[action_output(f32)]
pub struct CycleCreature;

#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct DismissOverlay;
