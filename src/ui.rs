use image::imageops::FilterType;
use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, Screen};
use crate::display::DisplayMode;
use crate::graphics::PosterWidget;
use crate::sink::Slot;
use crate::theme::Theme;
use crate::window::LayoutVariant;

// --- Helpers ---

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

/// Display width of a string, accounting for double-width characters.
fn display_width(s: &str) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncated title and pad width for a gallery row with right-aligned text.
/// Both budgets use display width so double-width text stays aligned.
fn row_layout(title: &str, right: &str, inner_w: usize) -> (String, usize) {
  let right_w = display_width(right);
  let title_max = inner_w.saturating_sub(right_w + 2);
  let title = truncate_str(title, title_max);
  let gap = inner_w.saturating_sub(display_width(&title) + right_w);
  (title, gap)
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, main_area, status_area, footer_area] =
    Layout::vertical([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1), Constraint::Length(1)])
      .areas(frame.area());

  render_header(frame, theme, header_area);
  match app.screen {
    Screen::Start => render_start(frame, app.theme(), main_area),
    Screen::Gallery => render_gallery(frame, app, main_area),
    Screen::Detail => render_detail_screen(frame, app, main_area),
  }
  render_status(frame, app, status_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(Span::styled(" ✦ marquee ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_start(frame: &mut Frame, theme: &Theme, area: Rect) {
  let text = vec![
    Line::from(""),
    Line::from(Span::styled("✦  Welcome to marquee", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled("Browse the film catalog. In the terminal.", Style::default().fg(theme.fg))),
    Line::from(""),
    Line::from(Span::styled("Press Enter to open the gallery.", Style::default().fg(theme.muted))),
  ];
  let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
    Block::bordered()
      .border_type(ratatui::widgets::BorderType::Rounded)
      .border_style(Style::default().fg(theme.border)),
  );
  frame.render_widget(paragraph, area);
}

fn render_gallery(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let range = app.visible_range();

  // Inner width: area minus 2 borders minus 2 chars for the cursor marker.
  let inner_w = area.width.saturating_sub(4) as usize;

  let items: Vec<ListItem> = range
    .clone()
    .filter_map(|i| app.catalog.get(i).map(|film| (i, film)))
    .map(|(i, film)| {
      let is_selected = i == app.selected;
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };

      let marker = if is_selected { "▶ " } else { "  " };
      let right = film.genre.join(", ");
      let line = if right.is_empty() {
        let title = truncate_str(&film.title, inner_w);
        Line::from(vec![Span::raw(marker), Span::styled(title, Style::default().fg(fg))])
      } else {
        let (title, gap) = row_layout(&film.title, &right, inner_w);
        Line::from(vec![
          Span::raw(marker),
          Span::styled(title, Style::default().fg(fg)),
          Span::raw(" ".repeat(gap)),
          Span::styled(right, Style::default().fg(theme.muted)),
        ])
      };

      ListItem::new(line).bg(bg)
    })
    .collect();

  let materialized = app.materialized_len();
  let total = app.catalog.len();
  let title = match app.variant {
    LayoutVariant::Windowed => {
      format!(" Gallery — {}–{} of {} ", range.start.saturating_add(1).min(materialized), range.end, total)
    }
    LayoutVariant::FullList => format!(" Gallery — {} of {} ", materialized, total),
  };

  let list = List::new(items).block(
    Block::bordered()
      .title(title)
      .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
      .border_type(ratatui::widgets::BorderType::Rounded)
      .border_style(Style::default().fg(theme.border)),
  );
  frame.render_widget(list, area);
}

fn render_detail_screen(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let [mut poster_area, info_area] =
    Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(area);

  // Keep roughly a 2:3 poster shape, centered vertically.
  poster_area = Rect { y: poster_area.y + 1, height: poster_area.height.saturating_sub(2), ..poster_area };
  let ideal_h = (poster_area.width as f32 * 3.0 / 4.0).round() as u16;
  if ideal_h < poster_area.height {
    let diff = poster_area.height - ideal_h;
    poster_area.y += diff / 2;
    poster_area.height = ideal_h;
  }

  if app.poster_image().is_some() {
    let id = app.detail_id.clone().unwrap_or_default();
    let needs_resize = match &app.cached_resized_poster {
      Some((cached_id, w, h, _)) => *cached_id != id || *w != poster_area.width || *h != poster_area.height,
      None => true,
    };
    if needs_resize && let Some(image) = app.poster_image() {
      let target_w = poster_area.width as u32;
      // Half-block cells carry two pixel rows each.
      let target_h = match app.display_mode {
        DisplayMode::Direct => (poster_area.height as u32) * 2,
        DisplayMode::Ascii => poster_area.height as u32,
      };
      let resized = image.resize(target_w.max(1), target_h.max(1), FilterType::Lanczos3);
      app.cached_resized_poster = Some((id, poster_area.width, poster_area.height, resized));
    }

    if let Some((_, _, _, ref resized)) = app.cached_resized_poster {
      let widget = PosterWidget { image: resized, display_mode: app.display_mode };
      frame.render_widget(widget, poster_area);
    }
  } else {
    let alt = app.model.image(Slot::Poster).map(|(_, alt)| alt).unwrap_or("Film poster");
    let placeholder = if app.poster_loading() {
      "Loading poster…"
    } else if app.poster_failed() {
      "Poster unavailable"
    } else {
      alt
    };
    let paragraph = Paragraph::new(placeholder).alignment(Alignment::Center).style(Style::default().fg(theme.muted));
    let centered = Rect { y: poster_area.y + poster_area.height / 2, height: 1, ..poster_area };
    frame.render_widget(paragraph, centered);
  }

  let title = format!(" {} ", app.model.field(Slot::Title));
  let mut title_spans = vec![Span::styled(title, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))];
  if app.model.slot_visible(Slot::Release) {
    title_spans.push(Span::styled(format!("[{}] ", app.model.field(Slot::Release)), Style::default().fg(theme.status)));
  }
  title_spans
    .push(Span::styled(format!("[{}] ", app.display_mode.label().to_lowercase()), Style::default().fg(theme.muted)));
  let info_block = Block::bordered()
    .title(Line::from(title_spans))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.border))
    .padding(Padding::horizontal(1));

  let inner_w = info_area.width.saturating_sub(4) as usize;
  let mut lines = vec![Line::from("")];
  let labelled = |label: &str, value: &str, theme: &Theme| {
    Line::from(vec![
      Span::styled(format!("{:<10}", label), Style::default().fg(theme.muted)),
      Span::styled(truncate_str(value, inner_w.saturating_sub(10)), Style::default().fg(theme.fg)),
    ])
  };

  let director = app.model.field(Slot::Director);
  if !director.is_empty() {
    lines.push(labelled("Director", director, theme));
  }
  let actors = app.model.field(Slot::Actors);
  if !actors.is_empty() {
    lines.push(labelled("Cast", actors, theme));
  }
  let genre = app.model.field(Slot::Genre);
  if !genre.is_empty() {
    lines.push(labelled("Genre", genre, theme));
  }
  let audience = app.model.field(Slot::Audience);
  if !audience.is_empty() {
    lines.push(labelled("Audience", audience, theme));
  }
  if app.model.slot_visible(Slot::Length) {
    lines.push(labelled("Length", app.model.field(Slot::Length), theme));
  }
  if app.model.slot_visible(Slot::Festival) {
    lines.push(labelled("Festival", app.model.field(Slot::Festival), theme));
  }

  let synopsis = app.model.field(Slot::Synopsis);
  if !synopsis.is_empty() {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(synopsis.to_string(), Style::default().fg(theme.fg))));
  }

  if app.model.slot_visible(Slot::Trailer) {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
      truncate_str(app.model.field(Slot::Trailer), inner_w),
      Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED),
    )));
  }

  let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(info_block);
  frame.render_widget(paragraph, info_area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if app.screen == Screen::Gallery && app.catalog.has_more_pages(app.page_cursor) {
    (" More films below — keep scrolling".to_string(), Style::default().fg(theme.muted))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys: Vec<(&str, &str)> = match app.screen {
    Screen::Start => vec![("Enter", "Gallery"), ("^t", "Theme"), ("Esc", "Quit")],
    Screen::Gallery => {
      let mut k = vec![("Enter", "Details"), ("j/k", "Navigate")];
      if app.variant == LayoutVariant::Windowed {
        k.push(("h/l", "Shift"));
      }
      if app.catalog.has_more_pages(app.page_cursor) {
        k.push(("m", "More"));
      }
      k.push(("^t", "Theme"));
      k.push(("Esc", "Quit"));
      k
    }
    Screen::Detail => vec![("Esc", "Back"), ("^t", "Theme")],
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncate_leaves_short_strings_alone() {
    assert_eq!(truncate_str("short", 10), "short");
    assert_eq!(truncate_str("exactly10!", 10), "exactly10!");
  }

  #[test]
  fn truncate_appends_ellipsis() {
    assert_eq!(truncate_str("a longer title", 8), "a longe…");
  }

  #[test]
  fn display_width_counts_wide_chars() {
    assert_eq!(display_width("abc"), 3);
    assert_eq!(display_width("日本"), 4);
  }

  #[test]
  fn gallery_rows_with_wide_genre_text_stay_aligned() {
    let (title, gap) = row_layout("The Lighthouse", "ドラマ, ミステリー", 40);
    assert_eq!(display_width(&title) + gap + display_width("ドラマ, ミステリー"), 40);

    let (title, gap) = row_layout("Film", "Drama", 30);
    assert_eq!(display_width(&title) + gap + display_width("Drama"), 30);
  }

  #[test]
  fn row_layout_truncates_the_title_before_the_right_column() {
    let (title, gap) = row_layout("a very long film title indeed", "Drama, Mystery", 30);
    assert!(display_width(&title) + gap + display_width("Drama, Mystery") <= 30);
    assert!(title.ends_with('…'));
  }
}
