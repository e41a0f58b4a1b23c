mod plugin;

use bevy::{asset::Asset, prelude::*, reflect::TypePath};
pub use plugin::ConfigPlugin;
use serde::{Deserialize, Deserializer, de};

/// Path of the viewer config, relative to the asset root.
pub const CONFIG_ASSET_PATH: &str = "config/viewer.config.toml";

const EMBEDDED_CONFIG: &str = include_str!("../../assets/config/viewer.config.toml");

#[derive(Asset, TypePath, Deserialize, Debug, Clone)]
pub struct ViewerConfig {
  pub window: WindowConfig,
  pub camera: CameraConfig,
  pub scene: SceneConfig,
  pub framing: FramingConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WindowConfig {
  pub width: u32,
  pub height: u32,
  pub title: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CameraConfig {
  pub fov_degrees: f32,
  pub near: f32,
  pub far: f32,
  pub start_position: [f32; 3],
  pub min_distance: f32,
  pub max_distance: f32,
  pub damping: f32,
  pub rotate_speed: f32,
  pub zoom_speed: f32,
  pub pan_speed: f32,
  pub pinch_sensitivity: f32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SceneConfig {
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub background: [f32; 3],
  pub grid_size: f32,
  pub grid_divisions: u32,
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub grid_color: [f32; 3],
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub bounds_color: [f32; 3],
  pub ambient_brightness: f32,
  pub key_light_illuminance: f32,
  pub key_light_direction: [f32; 3],
  pub back_light_illuminance: f32,
  pub back_light_direction: [f32; 3],
}

#[derive(Deserialize, Debug, Clone)]
pub struct FramingConfig {
  /// Largest model dimension after fitting.
  pub target_size: f32,
  /// Camera distance as a multiple of the fitted bounds diagonal.
  pub distance_factor: f32,
  /// Lower bound on the framed camera distance.
  pub min_distance: f32,
  pub model_yaw_degrees: f32,
}

fn deserialize_hex_color<'de, D>(deserializer: D) -> Result<[f32; 3], D::Error>
where
  D: Deserializer<'de>,
{
  let s: String = Deserialize::deserialize(deserializer)?;
  let s = s.trim_start_matches('#');
  if s.len() != 6 {
    return Err(de::Error::custom("hex color must be 6 characters"));
  }
  let r = u8::from_str_radix(&s[0..2], 16).map_err(de::Error::custom)?;
  let g = u8::from_str_radix(&s[2..4], 16).map_err(de::Error::custom)?;
  let b = u8::from_str_radix(&s[4..6], 16).map_err(de::Error::custom)?;
  Ok([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}

/// sRGB color from a deserialized `[r, g, b]` triple.
pub fn rgb(c: [f32; 3]) -> Color {
  Color::srgb(c[0], c[1], c[2])
}

/// Errors raised while reading the viewer config.
#[derive(Debug)]
pub enum ConfigError {
  Read(std::io::Error),
  Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Read(e) => write!(f, "failed to read config file: {}", e),
      Self::Parse(e) => write!(f, "failed to parse config: {}", e),
    }
  }
}

impl std::error::Error for ConfigError {}

impl ViewerConfig {
  pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
    toml::from_str(source).map_err(ConfigError::Parse)
  }

  /// Config compiled into the binary.
  pub fn embedded() -> Result<Self, ConfigError> {
    Self::from_toml(EMBEDDED_CONFIG)
  }

  /// Reads the config from `<asset_root>/config/viewer.config.toml`.
  #[cfg(not(target_family = "wasm"))]
  pub fn read(asset_root: &str) -> Result<Self, ConfigError> {
    let path = std::path::Path::new(asset_root).join(CONFIG_ASSET_PATH);
    let source = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
    Self::from_toml(&source)
  }
}

/// Live config, replaced wholesale on hot-reload.
#[derive(Resource, Debug, Clone)]
pub struct ConfigLoaded {
  pub window: WindowConfig,
  pub camera: CameraConfig,
  pub scene: SceneConfig,
  pub framing: FramingConfig,
}

impl From<ViewerConfig> for ConfigLoaded {
  fn from(config: ViewerConfig) -> Self {
    Self {
      window: config.window,
      camera: config.camera,
      scene: config.scene,
      framing: config.framing,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_config_parses() {
    let config = ViewerConfig::embedded().unwrap();
    assert_eq!(config.framing.target_size, 5.0);
    assert_eq!(config.camera.min_distance, 2.0);
    assert_eq!(config.camera.max_distance, 20.0);
    let bg = config.scene.background;
    assert!((bg[0] - 0x33 as f32 / 255.0).abs() < 1e-6);
    assert_eq!(config.scene.bounds_color, [0.0, 1.0, 0.0]);
  }

  #[test]
  fn rejects_short_hex_color() {
    let source = EMBEDDED_CONFIG.replace("\"#333333\"", "\"#333\"");
    match ViewerConfig::from_toml(&source) {
      Err(ConfigError::Parse(e)) => assert!(e.to_string().contains("6 characters")),
      other => panic!("expected parse error, got {:?}", other.map(|_| ())),
    }
  }
}
