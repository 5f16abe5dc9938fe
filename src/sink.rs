//! The display sink: the controller's only view of the rendering target.
//! Three mutually exclusive regions and a fixed set of named slots inside
//! the detail region.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
  Start,
  Gallery,
  Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
  Poster,
  Title,
  Director,
  Actors,
  Synopsis,
  Genre,
  Audience,
  Length,
  Festival,
  Trailer,
  Release,
}

/// Where the controller writes what should be on screen. Implementations
/// are free to ignore slots they don't carry; a missing slot skips that
/// field, it never aborts a render.
pub trait DisplaySink {
  fn show(&mut self, region: Region);
  fn hide(&mut self, region: Region);
  fn set_field(&mut self, slot: Slot, text: &str);
  fn set_image(&mut self, slot: Slot, url: &str, alt: &str);
  fn set_slot_visible(&mut self, slot: Slot, visible: bool);
}

/// The production sink: a plain store of region/slot state that the
/// terminal layer reads back when drawing. Doubles as the recording sink
/// in tests.
#[derive(Debug, Default)]
pub struct ScreenModel {
  active: Option<Region>,
  fields: HashMap<Slot, String>,
  images: HashMap<Slot, (String, String)>,
  hidden: HashSet<Slot>,
}

impl ScreenModel {
  pub fn active(&self) -> Option<Region> {
    self.active
  }

  pub fn field(&self, slot: Slot) -> &str {
    self.fields.get(&slot).map(String::as_str).unwrap_or("")
  }

  /// `(url, alt)` of the last image written to the slot.
  pub fn image(&self, slot: Slot) -> Option<(&str, &str)> {
    self.images.get(&slot).map(|(url, alt)| (url.as_str(), alt.as_str()))
  }

  pub fn slot_visible(&self, slot: Slot) -> bool {
    !self.hidden.contains(&slot)
  }
}

impl DisplaySink for ScreenModel {
  fn show(&mut self, region: Region) {
    self.active = Some(region);
  }

  fn hide(&mut self, region: Region) {
    if self.active == Some(region) {
      self.active = None;
    }
  }

  fn set_field(&mut self, slot: Slot, text: &str) {
    self.fields.insert(slot, text.to_string());
  }

  fn set_image(&mut self, slot: Slot, url: &str, alt: &str) {
    self.images.insert(slot, (url.to_string(), alt.to_string()));
  }

  fn set_slot_visible(&mut self, slot: Slot, visible: bool) {
    if visible {
      self.hidden.remove(&slot);
    } else {
      self.hidden.insert(slot);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn regions_are_mutually_exclusive() {
    let mut model = ScreenModel::default();
    model.show(Region::Start);
    model.hide(Region::Start);
    model.show(Region::Gallery);
    assert_eq!(model.active(), Some(Region::Gallery));

    // Hiding a region that is not active leaves the active one alone.
    model.hide(Region::Detail);
    assert_eq!(model.active(), Some(Region::Gallery));
  }

  #[test]
  fn slots_default_to_visible_and_empty() {
    let model = ScreenModel::default();
    assert!(model.slot_visible(Slot::Length));
    assert_eq!(model.field(Slot::Title), "");
    assert!(model.image(Slot::Poster).is_none());
  }

  #[test]
  fn visibility_toggles_round_trip() {
    let mut model = ScreenModel::default();
    model.set_slot_visible(Slot::Festival, false);
    assert!(!model.slot_visible(Slot::Festival));
    model.set_slot_visible(Slot::Festival, true);
    assert!(model.slot_visible(Slot::Festival));
  }
}
