//! Model viewer lifecycle.
//!
//! A session owns everything rendered for one selected creature: camera,
//! lights, the loaded model and its material. Selecting a creature destroys
//! the current session and builds a new one; sessions are never patched in
//! place.
//!
//! ```text
//! Empty -> Loading -> Ready
//!              \---> Failed
//! Empty -> Failed                (no model bundled)
//! ```

pub mod bounds;
pub mod fit;
pub mod helpers;
pub mod load;
pub mod session;
pub mod stage;

use bevy::ecs::message::Message;
use bevy::prelude::*;
pub use bounds::Bounds;
pub use session::{ModelRoot, PendingFit, Session, SessionRoot, SessionSlot};

use crate::catalog::Selection;

/// Current state of the viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewerStatus {
  /// No session has been built yet.
  #[default]
  Empty,
  Loading,
  Ready,
  Failed(ViewerError),
}

/// Recoverable viewer failures, shown inline in the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
  /// The selected creature has no bundled model.
  ModelUnavailable,
  /// Fetching, parsing or spawning the model failed.
  LoadFailed { asset: String, message: String },
}

impl std::fmt::Display for ViewerError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::ModelUnavailable => write!(f, "3D model missing"),
      Self::LoadFailed { asset, message } => {
        write!(f, "failed to load model: {}. Model path: {}", message, asset)
      }
    }
  }
}

impl std::error::Error for ViewerError {}

/// Request to reframe the camera on the current model.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ResetView;

/// Viewer lifecycle systems, in execution order.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewerSet;

/// Session lifecycle without any drawing or input, so it can run headless.
pub struct ViewerPlugin;

impl Plugin for ViewerPlugin {
  fn build(&self, app: &mut App) {
    app
      .init_resource::<SessionSlot>()
      .add_message::<ResetView>()
      .add_observer(load::queue_model_fit)
      .add_systems(
        Update,
        (
          session::begin_session.run_if(resource_changed::<Selection>),
          load::poll_model_load,
          fit::fit_loaded_models,
          fit::reset_view,
        )
          .chain()
          .in_set(ViewerSet),
      )
      .add_systems(Last, session::teardown_on_exit);
  }
}
