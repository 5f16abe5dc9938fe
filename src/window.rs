//! The gallery's visible window: a contiguous index range over the
//! materialized item list, shifted one step at a time.

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliLayout {
  Auto,
  Windowed,
  Full,
}

impl CliLayout {
  /// A forced variant, or `None` when the terminal width decides.
  pub fn forced(self) -> Option<LayoutVariant> {
    match self {
      CliLayout::Auto => None,
      CliLayout::Windowed => Some(LayoutVariant::Windowed),
      CliLayout::Full => Some(LayoutVariant::FullList),
    }
  }
}

/// Which visibility variant is active. Wide terminals clip the gallery to a
/// fixed window; narrow ones show the whole materialized list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutVariant {
  Windowed,
  FullList,
}

/// Result of an advance attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
  /// Both bounds shifted by one.
  Shifted,
  /// The window already touches the last materialized item; the caller may
  /// append another page and retry.
  NeedsMore,
  /// Nothing to show at all.
  AtEnd,
}

/// Inclusive `[start, end]` range of fixed width over the materialized list.
/// The range never escapes `[0, len)`; a shorter-than-width list is covered
/// entirely.
#[derive(Debug, Clone)]
pub struct GalleryWindow {
  start: usize,
  width: usize,
}

impl GalleryWindow {
  pub fn new(width: usize) -> Self {
    assert!(width > 0, "window width must be positive");
    Self { start: 0, width }
  }

  /// The half-open visible range given the materialized length.
  pub fn visible_range(&self, len: usize) -> std::ops::Range<usize> {
    let start = self.start.min(len);
    start..(start + self.width).min(len)
  }

  /// Shift both bounds by +1 when the end is not yet the last index.
  pub fn advance(&mut self, len: usize) -> Advance {
    let Some(max_index) = len.checked_sub(1) else {
      return Advance::AtEnd;
    };
    let end = (self.start + self.width - 1).min(max_index);
    if end < max_index {
      self.start += 1;
      Advance::Shifted
    } else {
      Advance::NeedsMore
    }
  }

  /// Shift both bounds by -1, clamped at zero. Returns whether it moved.
  pub fn retreat(&mut self) -> bool {
    if self.start > 0 {
      self.start -= 1;
      true
    } else {
      false
    }
  }

  /// Pull the window back in range after the materialized length changed
  /// (variant switches re-render with current state; they never reset it).
  pub fn clamp(&mut self, len: usize) {
    if self.start + self.width > len {
      self.start = len.saturating_sub(self.width);
    }
  }

  /// Move the window the minimal distance needed to make `index` visible.
  pub fn scroll_to(&mut self, index: usize, len: usize) {
    if index < self.start {
      self.start = index;
    } else if index >= self.start + self.width {
      self.start = index + 1 - self.width;
    }
    self.clamp(len);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn advance_shifts_until_the_last_item_is_visible() {
    let mut w = GalleryWindow::new(5);
    // 8 items: windows [0,4] [1,5] [2,6] [3,7], then the end is reached.
    assert_eq!(w.advance(8), Advance::Shifted);
    assert_eq!(w.advance(8), Advance::Shifted);
    assert_eq!(w.advance(8), Advance::Shifted);
    assert_eq!(w.visible_range(8), 3..8);
    assert_eq!(w.advance(8), Advance::NeedsMore);
    assert_eq!(w.visible_range(8), 3..8);
  }

  #[test]
  fn advance_after_append_continues_shifting() {
    let mut w = GalleryWindow::new(5);
    assert_eq!(w.advance(5), Advance::NeedsMore);
    // Caller appends a page; the same shift now succeeds.
    assert_eq!(w.advance(7), Advance::Shifted);
    assert_eq!(w.visible_range(7), 1..6);
  }

  #[test]
  fn advance_on_empty_list_is_at_end() {
    let mut w = GalleryWindow::new(5);
    assert_eq!(w.advance(0), Advance::AtEnd);
    assert_eq!(w.visible_range(0), 0..0);
  }

  #[test]
  fn short_list_is_fully_visible_and_never_shifts() {
    let mut w = GalleryWindow::new(5);
    assert_eq!(w.visible_range(3), 0..3);
    assert_eq!(w.advance(3), Advance::NeedsMore);
    assert_eq!(w.visible_range(3), 0..3);
  }

  #[test]
  fn retreat_clamps_at_zero() {
    let mut w = GalleryWindow::new(5);
    assert!(!w.retreat());
    assert_eq!(w.advance(10), Advance::Shifted);
    assert!(w.retreat());
    assert!(!w.retreat());
    assert_eq!(w.visible_range(10), 0..5);
  }

  #[test]
  fn bounds_never_escape_the_materialized_range() {
    let mut w = GalleryWindow::new(5);
    for _ in 0..100 {
      w.advance(12);
    }
    let range = w.visible_range(12);
    assert_eq!(range, 7..12);
    for _ in 0..100 {
      w.retreat();
    }
    assert_eq!(w.visible_range(12), 0..5);
  }

  #[test]
  fn clamp_recovers_after_length_shrinks() {
    let mut w = GalleryWindow::new(5);
    for _ in 0..7 {
      w.advance(12);
    }
    w.clamp(6);
    assert_eq!(w.visible_range(6), 1..6);
  }

  #[test]
  fn scroll_to_makes_the_index_visible_in_both_directions() {
    let mut w = GalleryWindow::new(5);
    w.scroll_to(9, 12);
    assert!(w.visible_range(12).contains(&9));
    w.scroll_to(2, 12);
    assert!(w.visible_range(12).contains(&2));
    assert_eq!(w.visible_range(12), 2..7);
  }
}
