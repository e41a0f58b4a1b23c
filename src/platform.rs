//! Platform-specific initialization and configuration.
//!
//! This module centralizes all platform differences so viewer logic can remain
//! platform-agnostic. The `init()` function returns platform-appropriate
//! configuration that `main` feeds into the window and asset plugins.

use bevy::window::{PresentMode, WindowMode};

/// Base path the deployed web build is served from.
#[cfg(target_family = "wasm")]
const DEPLOY_BASE: &str = "/creature-viewer";

/// Platform-specific configuration used by window and asset setup.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
  pub window_mode: WindowMode,
  /// Fifo (vsync) on WASM, AutoVsync on native.
  pub present_mode: PresentMode,
  /// Canvas selector for WASM, None on native.
  pub canvas: Option<String>,
  /// Whether to fit canvas to parent element (WASM only).
  pub fit_canvas_to_parent: bool,
  /// Whether to prevent default browser event handling (context menu, touch
  /// scrolling).
  pub prevent_default_event_handling: bool,
  /// Root the asset server reads from. Release web builds are prefixed with
  /// the deploy base path; every other build reads from `assets`.
  pub asset_root: String,
  /// Whether config hot-reload is enabled (native only).
  pub hot_reload: bool,
}

/// Embedded asset strings for WASM builds where filesystem access is
/// unavailable.
#[derive(Debug, Clone)]
pub struct EmbeddedAssets {
  /// Contents of viewer.config.toml
  pub viewer_config: &'static str,
}

/// Initialize platform-specific configuration.
///
/// Returns `PlatformConfig` for all platforms, and `EmbeddedAssets` only on
/// WASM.
pub fn init() -> (PlatformConfig, Option<EmbeddedAssets>) {
  #[cfg(target_family = "wasm")]
  console_error_panic_hook::set_once();

  let config = PlatformConfig {
    window_mode: WindowMode::Windowed,

    #[cfg(target_family = "wasm")]
    present_mode: PresentMode::Fifo,
    #[cfg(not(target_family = "wasm"))]
    present_mode: PresentMode::AutoVsync,

    #[cfg(target_family = "wasm")]
    canvas: Some("#viewer".to_string()),
    #[cfg(not(target_family = "wasm"))]
    canvas: None,

    #[cfg(target_family = "wasm")]
    fit_canvas_to_parent: true,
    #[cfg(not(target_family = "wasm"))]
    fit_canvas_to_parent: false,

    // Right-drag pans and two-finger drags pinch; the browser must not claim them
    #[cfg(target_family = "wasm")]
    prevent_default_event_handling: true,
    #[cfg(not(target_family = "wasm"))]
    prevent_default_event_handling: false,

    asset_root: asset_root(),

    #[cfg(target_family = "wasm")]
    hot_reload: false,
    #[cfg(not(target_family = "wasm"))]
    hot_reload: true,
  };

  #[cfg(target_family = "wasm")]
  let embedded = Some(EmbeddedAssets {
    viewer_config: include_str!("../assets/config/viewer.config.toml"),
  });
  #[cfg(not(target_family = "wasm"))]
  let embedded = None;

  (config, embedded)
}

#[cfg(target_family = "wasm")]
fn asset_root() -> String {
  if cfg!(debug_assertions) {
    "assets".to_string()
  } else {
    format!("{}/assets", DEPLOY_BASE)
  }
}

#[cfg(not(target_family = "wasm"))]
fn asset_root() -> String {
  "assets".to_string()
}
