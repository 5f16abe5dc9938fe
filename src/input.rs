use std::time::Instant;

use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::{App, Screen};

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: event::KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return;
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return;
  }

  match app.screen {
    Screen::Start => handle_start_key(app, key),
    Screen::Gallery => handle_gallery_key(app, key),
    Screen::Detail => handle_detail_key(app, key),
  }
}

fn handle_start_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter | KeyCode::Char(' ') => {
      app.enter_gallery();
    }
    KeyCode::Esc | KeyCode::Char('q') => {
      app.should_quit = true;
    }
    _ => {}
  }
}

fn handle_gallery_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter | KeyCode::Char(' ') => {
      app.select_current(Instant::now());
    }
    KeyCode::Down | KeyCode::Char('j') => {
      app.cursor_down();
    }
    KeyCode::Up | KeyCode::Char('k') => {
      app.cursor_up();
    }
    KeyCode::Right | KeyCode::Char('l') => {
      app.advance();
    }
    KeyCode::Left | KeyCode::Char('h') => {
      app.retreat();
    }
    KeyCode::Char('m') | KeyCode::PageDown => {
      app.load_more();
    }
    KeyCode::Esc | KeyCode::Char('q') => {
      app.should_quit = true;
    }
    _ => {}
  }
}

fn handle_detail_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => {
      app.back_to_gallery();
    }
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::{Catalog, FilmRecord};
  use crate::display::DisplayMode;
  use crate::window::LayoutVariant;
  use ratatui::crossterm::event::KeyEvent;

  fn films(n: usize) -> Vec<FilmRecord> {
    (1..=n)
      .map(|i| serde_json::from_str(&format!(r#"{{"_id": "f{i}", "title": "Film {i}"}}"#)).unwrap())
      .collect()
  }

  fn ready_app() -> App {
    let mut app = App::new(DisplayMode::Ascii, Some(LayoutVariant::Windowed), None);
    app.catalog = Catalog::new(films(7), 5);
    app
  }

  fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn enter_on_the_start_screen_opens_the_gallery() {
    let mut app = ready_app();
    handle_key_event(&mut app, press(KeyCode::Enter));
    assert_eq!(app.screen, Screen::Gallery);
  }

  #[test]
  fn escape_quits_from_the_start_screen() {
    let mut app = ready_app();
    handle_key_event(&mut app, press(KeyCode::Esc));
    assert!(app.should_quit);
  }

  #[test]
  fn vim_keys_move_the_gallery_cursor() {
    let mut app = ready_app();
    app.enter_gallery();
    handle_key_event(&mut app, press(KeyCode::Char('j')));
    assert_eq!(app.selected, 1);
    handle_key_event(&mut app, press(KeyCode::Char('k')));
    assert_eq!(app.selected, 0);
  }

  #[tokio::test]
  async fn escape_leaves_the_detail_screen_only() {
    let mut app = ready_app();
    app.enter_gallery();
    app.select_film("f2", Instant::now());
    assert_eq!(app.screen, Screen::Detail);

    handle_key_event(&mut app, press(KeyCode::Esc));
    assert_eq!(app.screen, Screen::Gallery);
    assert!(!app.should_quit);
  }

  #[test]
  fn ctrl_c_quits_from_any_screen() {
    let mut app = ready_app();
    handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
  }
}
