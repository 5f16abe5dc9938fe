use ratatui::style::Color;

/// A named color palette. Cycled at runtime with Ctrl+T and persisted in prefs.
pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub status: Color,
  pub error: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub const THEMES: &[Theme] = &[
  Theme {
    name: "marquee",
    bg: Color::Rgb(24, 20, 28),
    fg: Color::Rgb(228, 222, 232),
    accent: Color::Rgb(255, 179, 71),
    muted: Color::Rgb(130, 122, 140),
    border: Color::Rgb(70, 62, 82),
    status: Color::Rgb(148, 199, 172),
    error: Color::Rgb(235, 120, 120),
    highlight_fg: Color::Rgb(24, 20, 28),
    highlight_bg: Color::Rgb(255, 179, 71),
    stripe_bg: Color::Rgb(32, 27, 38),
    key_fg: Color::Rgb(24, 20, 28),
    key_bg: Color::Rgb(130, 122, 140),
  },
  Theme {
    name: "matinee",
    bg: Color::Rgb(246, 242, 234),
    fg: Color::Rgb(52, 48, 44),
    accent: Color::Rgb(192, 84, 44),
    muted: Color::Rgb(150, 140, 128),
    border: Color::Rgb(205, 196, 182),
    status: Color::Rgb(88, 140, 100),
    error: Color::Rgb(180, 60, 60),
    highlight_fg: Color::Rgb(246, 242, 234),
    highlight_bg: Color::Rgb(192, 84, 44),
    stripe_bg: Color::Rgb(238, 232, 222),
    key_fg: Color::Rgb(246, 242, 234),
    key_bg: Color::Rgb(150, 140, 128),
  },
  Theme {
    name: "midnight",
    bg: Color::Rgb(13, 17, 23),
    fg: Color::Rgb(201, 209, 217),
    accent: Color::Rgb(88, 166, 255),
    muted: Color::Rgb(110, 118, 129),
    border: Color::Rgb(48, 54, 61),
    status: Color::Rgb(126, 231, 135),
    error: Color::Rgb(248, 81, 73),
    highlight_fg: Color::Rgb(13, 17, 23),
    highlight_bg: Color::Rgb(88, 166, 255),
    stripe_bg: Color::Rgb(22, 27, 34),
    key_fg: Color::Rgb(13, 17, 23),
    key_bg: Color::Rgb(110, 118, 129),
  },
];
