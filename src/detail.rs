//! Field derivation for the detail view, written through the display sink.

use crate::catalog::FilmRecord;
use crate::constants::constants;
use crate::sink::{DisplaySink, Slot};

/// Join a normalized tag list for display.
pub fn join_tags(tags: &[String]) -> String {
  tags.join(", ")
}

/// "N minutes" with the localized unit, or `None` when the runtime is unknown.
pub fn length_text(length: Option<u64>) -> Option<String> {
  length.map(|minutes| format!("{} {}", minutes, constants().length_unit))
}

/// The trailer URL, if one is present after whitespace trimming.
pub fn trailer_url(film: &FilmRecord) -> Option<&str> {
  film.video.as_deref().map(str::trim).filter(|url| !url.is_empty())
}

/// The poster source for a record, falling back to the configured default.
pub fn poster_url(film: &FilmRecord) -> &str {
  film.image.as_deref().map(str::trim).filter(|url| !url.is_empty()).unwrap_or(&constants().default_image)
}

/// Populate every detail slot from a film record.
///
/// Unconditional slots get their (possibly empty) text; conditional slots
/// are hidden when their value is absent. Each write is independent — a
/// sink lacking a slot simply skips that field.
pub fn render_detail(film: &FilmRecord, sink: &mut dyn DisplaySink) {
  let alt = if film.title.is_empty() { "Film poster" } else { &film.title };
  sink.set_image(Slot::Poster, poster_url(film), alt);

  sink.set_field(Slot::Title, &film.title);
  sink.set_field(Slot::Director, &film.director);
  sink.set_field(Slot::Actors, &film.actors);
  sink.set_field(Slot::Synopsis, &film.synopsis);
  sink.set_field(Slot::Genre, &join_tags(&film.genre));
  sink.set_field(Slot::Audience, &join_tags(&film.audience));

  match length_text(film.length) {
    Some(text) => {
      sink.set_field(Slot::Length, &text);
      sink.set_slot_visible(Slot::Length, true);
    }
    None => {
      sink.set_field(Slot::Length, "");
      sink.set_slot_visible(Slot::Length, false);
    }
  }

  match film.fest.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
    Some(fest) => {
      sink.set_field(Slot::Festival, fest);
      sink.set_slot_visible(Slot::Festival, true);
    }
    None => {
      sink.set_field(Slot::Festival, "");
      sink.set_slot_visible(Slot::Festival, false);
    }
  }

  match trailer_url(film) {
    Some(url) => {
      sink.set_field(Slot::Trailer, url);
      sink.set_slot_visible(Slot::Trailer, true);
    }
    None => {
      sink.set_field(Slot::Trailer, "");
      sink.set_slot_visible(Slot::Trailer, false);
    }
  }

  match film.release.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
    Some(tag) => {
      sink.set_field(Slot::Release, tag);
      sink.set_slot_visible(Slot::Release, true);
    }
    None => {
      sink.set_field(Slot::Release, "");
      sink.set_slot_visible(Slot::Release, false);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sink::{Region, ScreenModel};

  fn film(json: &str) -> FilmRecord {
    serde_json::from_str(json).unwrap()
  }

  /// A sink with no slots at all; every write is dropped.
  struct NullSink;

  impl DisplaySink for NullSink {
    fn show(&mut self, _region: Region) {}
    fn hide(&mut self, _region: Region) {}
    fn set_field(&mut self, _slot: Slot, _text: &str) {}
    fn set_image(&mut self, _slot: Slot, _url: &str, _alt: &str) {}
    fn set_slot_visible(&mut self, _slot: Slot, _visible: bool) {}
  }

  #[test]
  fn length_present_shows_value_with_unit() {
    let record = film(r#"{"_id": "a", "length": "95"}"#);
    let mut model = ScreenModel::default();
    render_detail(&record, &mut model);
    assert_eq!(model.field(Slot::Length), format!("95 {}", constants().length_unit));
    assert!(model.slot_visible(Slot::Length));
  }

  #[test]
  fn length_absent_renders_empty_and_hidden() {
    let record = film(r#"{"_id": "a", "title": "No runtime"}"#);
    let mut model = ScreenModel::default();
    render_detail(&record, &mut model);
    assert_eq!(model.field(Slot::Length), "");
    assert!(!model.slot_visible(Slot::Length));
  }

  #[test]
  fn festival_block_is_conditional() {
    let with = film(r#"{"_id": "a", "fest": "Harbour Film Week"}"#);
    let mut model = ScreenModel::default();
    render_detail(&with, &mut model);
    assert!(model.slot_visible(Slot::Festival));
    assert_eq!(model.field(Slot::Festival), "Harbour Film Week");

    let without = film(r#"{"_id": "b", "fest": "  "}"#);
    render_detail(&without, &mut model);
    assert!(!model.slot_visible(Slot::Festival));
  }

  #[test]
  fn trailer_requires_a_nonblank_url() {
    let blank = film(r#"{"_id": "a", "video": "   "}"#);
    let mut model = ScreenModel::default();
    render_detail(&blank, &mut model);
    assert!(!model.slot_visible(Slot::Trailer));

    let padded = film(r#"{"_id": "a", "video": " https://example.org/t.mp4 "}"#);
    render_detail(&padded, &mut model);
    assert!(model.slot_visible(Slot::Trailer));
    assert_eq!(model.field(Slot::Trailer), "https://example.org/t.mp4");
  }

  #[test]
  fn tag_lists_join_with_comma_space() {
    let record = film(r#"{"_id": "a", "genre": ["Drama", "Mystery"], "aud": "Adults"}"#);
    let mut model = ScreenModel::default();
    render_detail(&record, &mut model);
    assert_eq!(model.field(Slot::Genre), "Drama, Mystery");
    assert_eq!(model.field(Slot::Audience), "Adults");
  }

  #[test]
  fn render_completes_through_a_sink_that_ignores_every_slot() {
    let record = film(
      r#"{
        "_id": "a",
        "title": "Full Record",
        "director": "R. Doe",
        "actors": "A, B",
        "synopsis": "Everything set.",
        "genre": ["Drama"],
        "aud": "Adults",
        "length": "95",
        "fest": "Harbour Film Week",
        "video": "https://example.org/t.mp4",
        "release": "New"
      }"#,
    );
    let mut sink = NullSink;
    // Every field update is independent; a sink without the slot just skips it.
    render_detail(&record, &mut sink);
    render_detail(&film(r#"{"_id": "b"}"#), &mut sink);
  }

  #[test]
  fn missing_image_falls_back_to_default_poster() {
    let record = film(r#"{"_id": "a", "title": "Untitled Reel"}"#);
    let mut model = ScreenModel::default();
    render_detail(&record, &mut model);
    let (url, alt) = model.image(Slot::Poster).unwrap();
    assert_eq!(url, constants().default_image);
    assert_eq!(alt, "Untitled Reel");
  }
}
