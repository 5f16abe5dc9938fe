//! The gallery controller: screen state machine, page cursor, visible
//! window, and the selection guard. All mutation happens on the single
//! event-processing task; async results arrive through oneshot receivers
//! polled in `check_pending`.

use std::time::{Duration, Instant};

use anyhow::Result;
use image::DynamicImage;
use reqwest::Client;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, seed_records};
use crate::config::Config;
use crate::constants::constants;
use crate::detail::{self, render_detail};
use crate::display::DisplayMode;
use crate::graphics;
use crate::sink::{DisplaySink, Region, ScreenModel, Slot};
use crate::theme::{THEMES, Theme};
use crate::window::{Advance, GalleryWindow, LayoutVariant};

// --- Screens ---

/// The three mutually exclusive view states. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  Start,
  Gallery,
  Detail,
}

impl Screen {
  fn region(self) -> Region {
    match self {
      Screen::Start => Region::Start,
      Screen::Gallery => Region::Gallery,
      Screen::Detail => Region::Detail,
    }
  }
}

// --- Selection guard ---

/// Drops select actions fired within the cooldown of the previous accepted
/// one, or while a prior selection is still settling. Nothing is queued and
/// nothing is reported; the action simply doesn't happen.
#[derive(Debug)]
pub struct Debounce {
  cooldown: Duration,
  settle: Duration,
  last_accepted: Option<Instant>,
  in_flight_until: Option<Instant>,
}

impl Debounce {
  pub fn new(cooldown: Duration, settle: Duration) -> Self {
    Self { cooldown, settle, last_accepted: None, in_flight_until: None }
  }

  /// Accept or drop an action at `now`. Accepting arms the in-flight flag
  /// for the settle duration.
  pub fn try_acquire(&mut self, now: Instant) -> bool {
    if let Some(last) = self.last_accepted
      && now.duration_since(last) < self.cooldown
    {
      return false;
    }
    if let Some(until) = self.in_flight_until
      && now < until
    {
      return false;
    }
    self.last_accepted = Some(now);
    self.in_flight_until = Some(now + self.settle);
    true
  }

  /// Clear the in-flight flag once its deadline has passed. Late calls
  /// clear a flag that may already be clear — idempotent either way.
  pub fn tick(&mut self, now: Instant) {
    if let Some(until) = self.in_flight_until
      && now >= until
    {
      self.in_flight_until = None;
    }
  }

  /// Release the in-flight flag early (the accepted action went nowhere).
  pub fn release(&mut self) {
    self.in_flight_until = None;
  }
}

// --- Poster fetch state ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum PosterAttempt {
  #[default]
  Primary,
  Fallback,
}

#[derive(Default)]
struct PosterState {
  rx: Option<oneshot::Receiver<Result<DynamicImage>>>,
  source: String,
  attempt: PosterAttempt,
  image: Option<DynamicImage>,
  failed: bool,
}

// --- App ---

pub struct App {
  pub screen: Screen,
  pub catalog: Catalog,
  /// The display sink the controller writes through; the terminal layer
  /// reads it back when drawing the detail view.
  pub model: ScreenModel,
  pub theme_index: usize,
  pub display_mode: DisplayMode,
  pub variant: LayoutVariant,
  forced_variant: Option<LayoutVariant>,
  /// Pages materialized so far; 0 until the gallery is first entered.
  pub page_cursor: usize,
  /// Absolute index of the cursor within the materialized list.
  pub selected: usize,
  window: GalleryWindow,
  debounce: Debounce,
  pub status_message: Option<String>,
  pub should_quit: bool,
  pub http_client: Client,
  data_file: String,
  config: Config,
  catalog_rx: Option<oneshot::Receiver<Catalog>>,
  poster: PosterState,
  pub detail_id: Option<String>,
  /// Last decoded poster keyed by source, so revisiting a film is instant.
  cached_poster: Option<(String, DynamicImage)>,
  pub cached_resized_poster: Option<(String, u16, u16, DynamicImage)>,
}

impl App {
  pub fn new(display_mode: DisplayMode, forced_variant: Option<LayoutVariant>, data_file: Option<String>) -> Self {
    let config = Config::load();
    let theme_index = config
      .theme_name
      .as_deref()
      .and_then(|name| THEMES.iter().position(|t| t.name == name))
      .unwrap_or(0);
    let data_file =
      data_file.or_else(|| config.data_file.clone()).unwrap_or_else(|| constants().data_file.clone());

    let mut model = ScreenModel::default();
    model.show(Region::Start);

    let c = constants();
    Self {
      screen: Screen::Start,
      catalog: Catalog::default(),
      model,
      theme_index,
      display_mode,
      variant: forced_variant.unwrap_or(LayoutVariant::Windowed),
      forced_variant,
      page_cursor: 0,
      selected: 0,
      window: GalleryWindow::new(c.window_width),
      debounce: Debounce::new(Duration::from_millis(c.select_cooldown_ms), Duration::from_millis(c.settle_ms)),
      status_message: None,
      should_quit: false,
      http_client: Client::new(),
      data_file,
      config,
      catalog_rx: None,
      poster: PosterState::default(),
      detail_id: None,
      cached_poster: None,
      cached_resized_poster: None,
    }
  }

  pub fn theme(&self) -> &'static Theme {
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.save_config();
  }

  fn save_config(&mut self) {
    self.config.theme_name = Some(self.theme().name.to_string());
    self.config.save();
  }

  // --- Async results ---

  /// Kick off the one-time catalog load. Safe to call again: the index is
  /// rebuilt from scratch when the result lands.
  pub fn trigger_catalog_load(&mut self) {
    let client = self.http_client.clone();
    let source = self.data_file.clone();
    self.status_message = Some("Loading film catalog…".to_string());

    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(Catalog::load(&client, &source).await);
    });
    self.catalog_rx = Some(rx);
  }

  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.catalog_rx.take() {
      match rx.try_recv() {
        Ok(catalog) => {
          info!(films = catalog.len(), pages = catalog.total_pages(), "film catalog ready");
          self.status_message = None;
          self.catalog = catalog;
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.catalog_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          warn!("catalog load task failed; using built-in seed");
          self.status_message = None;
          self.catalog = Catalog::new(seed_records(), constants().page_size);
        }
      }
    }

    if let Some(mut rx) = self.poster.rx.take() {
      match rx.try_recv() {
        Ok(Ok(image)) => {
          self.cached_poster = Some((self.poster.source.clone(), image.clone()));
          self.poster.image = Some(image);
        }
        Ok(Err(err)) => self.poster_fetch_failed(err),
        Err(oneshot::error::TryRecvError::Empty) => {
          self.poster.rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          debug!("poster fetch task dropped");
        }
      }
    }
  }

  /// Per-iteration upkeep; a stale deadline firing late only clears a flag
  /// that may already be clear.
  pub fn tick(&mut self, now: Instant) {
    self.debounce.tick(now);
  }

  // --- Screen transitions ---

  fn transition(&mut self, to: Screen) {
    if self.screen == to {
      return;
    }
    debug!(from = ?self.screen, to = ?to, "screen transition");
    self.model.hide(self.screen.region());
    self.model.show(to.region());
    self.screen = to;
  }

  /// `Start -> Gallery`, materializing the first page on first entry.
  pub fn enter_gallery(&mut self) {
    if self.screen != Screen::Start {
      return;
    }
    if !self.catalog.is_loaded() {
      self.status_message = Some("Catalog still loading…".to_string());
      return;
    }
    if self.page_cursor == 0 && self.catalog.total_pages() > 0 {
      self.page_cursor = 1;
      info!(films = self.catalog.page(1).len(), "materialized first page");
    }
    self.transition(Screen::Gallery);
  }

  /// `Detail -> Gallery`.
  pub fn back_to_gallery(&mut self) {
    if self.screen != Screen::Detail {
      return;
    }
    self.detail_id = None;
    self.poster = PosterState::default();
    self.transition(Screen::Gallery);
  }

  // --- Pagination & window ---

  /// Items appended to the gallery so far (the first `page_cursor` pages).
  pub fn materialized_len(&self) -> usize {
    (self.page_cursor * self.catalog.page_size()).min(self.catalog.len())
  }

  /// The index range currently marked visible.
  pub fn visible_range(&self) -> std::ops::Range<usize> {
    let len = self.materialized_len();
    match self.variant {
      LayoutVariant::Windowed => self.window.visible_range(len),
      LayoutVariant::FullList => 0..len,
    }
  }

  /// `Gallery -> Gallery`: append the next page and advance the cursor.
  /// No-op once every page is materialized.
  pub fn load_more(&mut self) -> bool {
    if !self.catalog.has_more_pages(self.page_cursor) {
      debug!(page = self.page_cursor, "load-more ignored; no more pages");
      return false;
    }
    self.page_cursor += 1;
    info!(page = self.page_cursor, of = self.catalog.total_pages(), "materialized next page");
    true
  }

  /// Shift the window forward, appending the next page first when the end
  /// of the materialized list is already visible. In the compact variant
  /// the whole list is visible, so advancing degenerates to load-more.
  pub fn advance_window(&mut self) -> bool {
    if self.variant == LayoutVariant::FullList {
      return self.load_more();
    }
    match self.window.advance(self.materialized_len()) {
      Advance::Shifted => true,
      Advance::NeedsMore => {
        if self.load_more() {
          matches!(self.window.advance(self.materialized_len()), Advance::Shifted)
        } else {
          false
        }
      }
      Advance::AtEnd => false,
    }
  }

  /// Shift the window back one step; no-op at the top or in the compact
  /// variant.
  pub fn retreat_window(&mut self) -> bool {
    if self.variant == LayoutVariant::FullList {
      return false;
    }
    self.window.retreat()
  }

  /// Window shift that drags the cursor along when it would fall outside.
  pub fn advance(&mut self) {
    if self.advance_window() {
      self.clamp_selection();
    }
  }

  pub fn retreat(&mut self) {
    if self.retreat_window() {
      self.clamp_selection();
    }
  }

  fn clamp_selection(&mut self) {
    let range = self.visible_range();
    if range.is_empty() {
      self.selected = 0;
    } else if self.selected < range.start {
      self.selected = range.start;
    } else if self.selected >= range.end {
      self.selected = range.end - 1;
    }
  }

  /// Move the cursor down, shifting the window (and loading more pages)
  /// at the bottom edge.
  pub fn cursor_down(&mut self) {
    if self.materialized_len() == 0 {
      return;
    }
    let range = self.visible_range();
    if self.selected + 1 < range.end {
      self.selected += 1;
    } else if self.advance_window() {
      self.selected = (self.selected + 1).min(self.materialized_len().saturating_sub(1));
    }
  }

  pub fn cursor_up(&mut self) {
    let range = self.visible_range();
    if self.selected > range.start {
      self.selected -= 1;
    } else if self.retreat_window() {
      self.selected = self.selected.saturating_sub(1);
    }
  }

  /// Re-evaluate the layout variant from the terminal width. A switch
  /// re-renders with current window state and never resets the page cursor.
  pub fn resize(&mut self, cols: u16) {
    let next = match self.forced_variant {
      Some(variant) => variant,
      None if cols >= constants().min_windowed_cols => LayoutVariant::Windowed,
      None => LayoutVariant::FullList,
    };
    if next != self.variant {
      info!(cols, variant = ?next, "layout variant switched");
      self.variant = next;
      let len = self.materialized_len();
      self.window.clamp(len);
      self.window.scroll_to(self.selected, len);
    }
  }

  // --- Selection ---

  pub fn select_current(&mut self, now: Instant) {
    let Some(film) = self.catalog.get(self.selected) else { return };
    let id = film.id.clone();
    self.select_film(&id, now);
  }

  /// `Gallery -> Detail` for the film with `id`. Dropped silently inside
  /// the cooldown/settle guard; unknown ids are a logged no-op.
  pub fn select_film(&mut self, id: &str, now: Instant) {
    if self.screen != Screen::Gallery {
      return;
    }
    if !self.debounce.try_acquire(now) {
      debug!(id, "select dropped by cooldown guard");
      return;
    }
    let Some(film) = self.catalog.by_id(id) else {
      warn!(id, "select ignored; unknown film id");
      self.debounce.release();
      return;
    };

    render_detail(film, &mut self.model);
    let poster = detail::poster_url(film).to_string();
    let film_id = film.id.clone();
    info!(id = %film_id, "film selected");

    self.detail_id = Some(film_id);
    self.transition(Screen::Detail);
    self.trigger_poster_fetch(poster, PosterAttempt::Primary);
  }

  // --- Poster fetch ---

  pub fn poster_image(&self) -> Option<&DynamicImage> {
    self.poster.image.as_ref()
  }

  pub fn poster_failed(&self) -> bool {
    self.poster.failed
  }

  pub fn poster_loading(&self) -> bool {
    self.poster.rx.is_some()
  }

  fn trigger_poster_fetch(&mut self, source: String, attempt: PosterAttempt) {
    self.cached_resized_poster = None;
    self.poster = PosterState { source: source.clone(), attempt, ..PosterState::default() };

    if let Some((cached_source, image)) = &self.cached_poster
      && *cached_source == source
    {
      self.poster.image = Some(image.clone());
      return;
    }

    let client = self.http_client.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(graphics::fetch_poster(&client, &source).await);
    });
    self.poster.rx = Some(rx);
  }

  fn poster_fetch_failed(&mut self, err: anyhow::Error) {
    let default_image = constants().default_image.as_str();
    if self.poster.attempt == PosterAttempt::Primary && self.poster.source != default_image {
      // The default poster is substituted exactly once; a second failure
      // keeps the placeholder instead of looping.
      warn!(source = %self.poster.source, err = %format!("{err:#}"), "poster fetch failed; trying default poster");
      let alt = self.model.field(Slot::Title).to_string();
      self.model.set_image(Slot::Poster, default_image, &alt);
      self.trigger_poster_fetch(default_image.to_string(), PosterAttempt::Fallback);
    } else {
      debug!(source = %self.poster.source, err = %format!("{err:#}"), "poster unavailable; keeping placeholder");
      self.poster.failed = true;
    }
  }
}
