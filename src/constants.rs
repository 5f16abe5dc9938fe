//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available —
//! no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // Catalog
  pub data_file: String,
  pub page_size: usize,
  pub default_image: String,

  // Gallery window
  pub window_width: usize,
  pub min_windowed_cols: u16,

  // Selection guard
  pub select_cooldown_ms: u64,
  pub settle_ms: u64,

  // Detail view
  pub length_unit: String,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_constants_parse() {
    let c = constants();
    assert!(c.page_size > 0);
    assert!(c.window_width > 0);
    assert!(!c.data_file.is_empty());
  }
}
