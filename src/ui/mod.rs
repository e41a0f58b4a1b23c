//! egui panels: creature selector, status line, part list and stat overlay.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy_egui::{
  EguiContexts, EguiGlobalSettings, EguiPlugin, EguiPrimaryContextPass, PrimaryEguiContext, egui,
};

use crate::camera::PointerOverUi;
use crate::catalog::{Catalog, SelectCreature, Selection};
use crate::overlay::{PartSelection, StatPanel, part_display_name};
use crate::viewer::{ResetView, SessionSlot, ViewerError, ViewerStatus};

const TITLE: &str = "Creature Viewer";
const LOADING_TEXT: &str = "Loading model...";
const MISSING_HINT: &str = "Model not found. Please add the model file.";

/// Status line shown under the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
  Loading,
  Error { message: String, hint: Option<&'static str> },
}

impl StatusLine {
  pub fn for_status(status: &ViewerStatus) -> Option<Self> {
    match status {
      ViewerStatus::Empty | ViewerStatus::Ready => None,
      ViewerStatus::Loading => Some(Self::Loading),
      ViewerStatus::Failed(error) => Some(Self::Error {
        message: error.to_string(),
        hint: matches!(error, ViewerError::ModelUnavailable).then_some(MISSING_HINT),
      }),
    }
  }
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
  fn build(&self, app: &mut App) {
    if !app.is_plugin_added::<EguiPlugin>() {
      app.add_plugins(EguiPlugin::default());
    }
    app
      .insert_resource(EguiGlobalSettings {
        auto_create_primary_context: false,
        ..default()
      })
      .add_systems(Startup, spawn_ui_camera)
      .add_systems(EguiPrimaryContextPass, draw_viewer_ui);
  }
}

/// egui draws through its own camera so session cameras can come and go.
fn spawn_ui_camera(mut commands: Commands) {
  commands.spawn((
    Name::new("ui-camera"),
    Camera2d,
    Camera {
      order: 1,
      clear_color: ClearColorConfig::None,
      ..default()
    },
    PrimaryEguiContext,
  ));
}

#[allow(clippy::too_many_arguments)]
fn draw_viewer_ui(
  mut contexts: EguiContexts,
  catalog: Res<Catalog>,
  selection: Res<Selection>,
  slot: Res<SessionSlot>,
  mut parts: ResMut<PartSelection>,
  mut over_ui: ResMut<PointerOverUi>,
  mut select: MessageWriter<SelectCreature>,
  mut reset: MessageWriter<ResetView>,
) {
  let Ok(ctx) = contexts.ctx_mut() else {
    return;
  };
  let Some(creature) = catalog.get(selection.id()) else {
    return;
  };

  egui::TopBottomPanel::top("viewer_header").show(ctx, |ui| {
    ui.horizontal(|ui| {
      ui.heading(TITLE);
      ui.separator();
      ui.label("Creature:");
      egui::ComboBox::from_id_salt("creature_select")
        .selected_text(creature.name.as_str())
        .show_ui(ui, |ui| {
          for entry in catalog.iter() {
            let label = format!("{} ({})", entry.name, entry.category.label());
            if ui
              .selectable_label(entry.id == creature.id, label)
              .clicked()
            {
              select.write(SelectCreature(entry.id.clone()));
            }
          }
        });
      if ui.button("Reset view").clicked() {
        reset.write(ResetView);
      }
    });

    match StatusLine::for_status(&slot.status()) {
      Some(StatusLine::Loading) => {
        ui.label(LOADING_TEXT);
      }
      Some(StatusLine::Error { message, hint }) => {
        ui.colored_label(egui::Color32::from_rgb(230, 90, 80), message);
        if let Some(hint) = hint {
          ui.label(hint);
        }
      }
      None => {}
    }
  });

  egui::SidePanel::left("part_list")
    .resizable(false)
    .default_width(140.0)
    .show(ctx, |ui| {
      ui.label("Body parts");
      ui.separator();
      for part in creature.stats.keys() {
        let picked = parts.part() == Some(part.as_str());
        if ui
          .selectable_label(picked, part_display_name(part))
          .clicked()
        {
          parts.pick(part.clone());
        }
      }
    });

  if let Some(panel) = StatPanel::build(creature, parts.part()) {
    let mut close = false;
    egui::Window::new(panel.title.as_str())
      .id(egui::Id::new("stat_overlay"))
      .anchor(egui::Align2::RIGHT_TOP, [-10.0, 60.0])
      .collapsible(false)
      .resizable(false)
      .show(ctx, |ui| {
        ui.label(format!("Health: {}", panel.health));
        ui.label(format!("Weak point: {}", panel.weak_point));
        ui.label(format!("Best target: {}", panel.best_target));
        ui.separator();
        close = ui.button("Close").clicked();
      });
    if close {
      parts.dismiss();
    }
  }

  over_ui.0 = ctx.is_pointer_over_area() || ctx.wants_pointer_input();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn loading_and_ready_lines() {
    assert_eq!(
      StatusLine::for_status(&ViewerStatus::Loading),
      Some(StatusLine::Loading)
    );
    assert_eq!(StatusLine::for_status(&ViewerStatus::Ready), None);
    assert_eq!(StatusLine::for_status(&ViewerStatus::Empty), None);
  }

  #[test]
  fn unavailable_model_carries_hint() {
    let line = StatusLine::for_status(&ViewerStatus::Failed(ViewerError::ModelUnavailable));
    assert_eq!(
      line,
      Some(StatusLine::Error {
        message: "3D model missing".to_string(),
        hint: Some(MISSING_HINT),
      })
    );
  }

  #[test]
  fn load_failure_names_asset_without_hint() {
    let error = ViewerError::LoadFailed {
      asset: "models/Hulk.glb".to_string(),
      message: "io error".to_string(),
    };
    let Some(StatusLine::Error { message, hint }) =
      StatusLine::for_status(&ViewerStatus::Failed(error))
    else {
      panic!("expected an error line");
    };
    assert!(message.contains("models/Hulk.glb"));
    assert_eq!(hint, None);
  }
}
