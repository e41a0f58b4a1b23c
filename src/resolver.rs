//! Maps logical model file names to loadable asset paths.

use bevy::prelude::*;

/// Model files bundled under the models directory.
const BUNDLED_MODELS: &[&str] = &[
  "Alpha_Commande.glb",
  "Hulk.glb",
  "Automaton_factory_strider.glb",
];

/// Build-time lookup table from model file name to asset path.
#[derive(Resource, Debug, Clone)]
pub struct ModelResolver {
  models_dir: String,
  files: Vec<String>,
}

impl ModelResolver {
  /// Resolver over the bundled model table.
  pub fn bundled(models_dir: impl Into<String>) -> Self {
    Self::new(models_dir, BUNDLED_MODELS.iter().copied())
  }

  pub fn new<'a>(models_dir: impl Into<String>, files: impl IntoIterator<Item = &'a str>) -> Self {
    let models_dir = models_dir.into().trim_end_matches('/').to_string();
    Self {
      models_dir,
      files: files.into_iter().map(str::to_string).collect(),
    }
  }

  /// Asset locator for `model`, or `None` when no such file is bundled.
  pub fn resolve(&self, model: &str) -> Option<String> {
    if !self.is_available(model) {
      log::debug!("no bundled model for '{}'", model);
      return None;
    }
    if self.models_dir.is_empty() {
      Some(model.to_string())
    } else {
      Some(format!("{}/{}", self.models_dir, model))
    }
  }

  pub fn is_available(&self, model: &str) -> bool {
    self.files.iter().any(|f| f == model)
  }
}
