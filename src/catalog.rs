//! The film catalog: an ordered, read-only set of records loaded once per
//! session, with an id index and fixed-size paging on top.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

use crate::constants::constants;

// --- Film records ---

/// One entry of the films JSON file.
///
/// `genre` and `aud` may arrive as a bare string or a list of strings; both
/// are normalized to `Vec<String>` here so the render path never has to
/// sniff shapes. `length` likewise accepts a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
pub struct FilmRecord {
  #[serde(rename = "_id", default)]
  pub id: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub director: String,
  #[serde(default)]
  pub actors: String,
  #[serde(default)]
  pub synopsis: String,
  #[serde(default)]
  pub image: Option<String>,
  #[serde(default, deserialize_with = "text_or_list")]
  pub genre: Vec<String>,
  #[serde(rename = "aud", default, deserialize_with = "text_or_list")]
  pub audience: Vec<String>,
  #[serde(default, deserialize_with = "length_minutes")]
  pub length: Option<u64>,
  #[serde(default)]
  pub fest: Option<String>,
  #[serde(default)]
  pub video: Option<String>,
  #[serde(default)]
  pub release: Option<String>,
  /// Records with `show: false` are dropped from the catalog at load time.
  #[serde(default = "default_show")]
  pub show: bool,
}

fn default_show() -> bool {
  true
}

fn text_or_list<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum TextOrList {
    Text(String),
    List(Vec<String>),
  }

  Ok(match Option::<TextOrList>::deserialize(de)? {
    None => Vec::new(),
    Some(TextOrList::Text(s)) if s.trim().is_empty() => Vec::new(),
    Some(TextOrList::Text(s)) => vec![s],
    Some(TextOrList::List(list)) => list,
  })
}

fn length_minutes<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u64>, D::Error> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum NumberOrText {
    Number(u64),
    Text(String),
  }

  Ok(match Option::<NumberOrText>::deserialize(de)? {
    None => None,
    Some(NumberOrText::Number(n)) => Some(n),
    Some(NumberOrText::Text(s)) => s.trim().parse().ok(),
  })
}

// --- Catalog ---

/// Ordered film records plus an id index. Insertion order is display order.
/// Immutable after construction; reads are safe from anywhere.
#[derive(Debug)]
pub struct Catalog {
  films: Vec<FilmRecord>,
  by_id: HashMap<String, usize>,
  page_size: usize,
  loaded: bool,
}

/// The empty, not-yet-loaded catalog the app starts with.
impl Default for Catalog {
  fn default() -> Self {
    Self { films: Vec::new(), by_id: HashMap::new(), page_size: constants().page_size, loaded: false }
  }
}

impl Catalog {
  /// Build a catalog from raw records: hidden records and records without
  /// an id are dropped, duplicate ids keep the first occurrence.
  pub fn new(records: Vec<FilmRecord>, page_size: usize) -> Self {
    assert!(page_size > 0, "page size must be positive");

    let mut films = Vec::with_capacity(records.len());
    let mut by_id = HashMap::with_capacity(records.len());
    for record in records {
      if !record.show {
        continue;
      }
      if record.id.is_empty() {
        warn!(title = %record.title, "dropping film record without an id");
        continue;
      }
      if by_id.contains_key(&record.id) {
        warn!(id = %record.id, "dropping film record with duplicate id");
        continue;
      }
      by_id.insert(record.id.clone(), films.len());
      films.push(record);
    }

    Self { films, by_id, page_size, loaded: true }
  }

  /// Load the catalog from a path or URL. Never fails: any load problem
  /// (unreachable file, bad status, malformed JSON, empty array) falls back
  /// to the built-in seed set with a log line.
  pub async fn load(client: &Client, source: &str) -> Self {
    let records = match fetch_records(client, source).await {
      Ok(records) if records.is_empty() => {
        warn!(source, "film data file contained no records; using built-in seed");
        seed_records()
      }
      Ok(records) => {
        info!(source, count = records.len(), "loaded film catalog");
        records
      }
      Err(err) => {
        warn!(source, err = %format!("{err:#}"), "failed to load film data; using built-in seed");
        seed_records()
      }
    };

    let catalog = Self::new(records, constants().page_size);
    if catalog.is_empty() {
      // Every record was hidden or invalid; the catalog must not end up empty.
      warn!(source, "film data filtered down to nothing; using built-in seed");
      return Self::new(seed_records(), constants().page_size);
    }
    catalog
  }

  pub fn len(&self) -> usize {
    self.films.len()
  }

  pub fn is_empty(&self) -> bool {
    self.films.is_empty()
  }

  pub fn is_loaded(&self) -> bool {
    self.loaded
  }

  pub fn page_size(&self) -> usize {
    self.page_size
  }

  pub fn get(&self, index: usize) -> Option<&FilmRecord> {
    self.films.get(index)
  }

  /// O(1) lookup by id. `None` for unknown ids — not an error.
  pub fn by_id(&self, id: &str) -> Option<&FilmRecord> {
    self.by_id.get(id).map(|&i| &self.films[i])
  }

  /// 1-based page slice `[(p-1)*N, p*N)`. Out-of-range pages (including 0)
  /// return an empty slice.
  pub fn page(&self, page: usize) -> &[FilmRecord] {
    let Some(start) = page.checked_sub(1).map(|p| p * self.page_size) else {
      return &[];
    };
    if start >= self.films.len() {
      return &[];
    }
    let end = (start + self.page_size).min(self.films.len());
    &self.films[start..end]
  }

  /// `len.div_ceil(page_size)` — an empty catalog has zero pages.
  pub fn total_pages(&self) -> usize {
    self.films.len().div_ceil(self.page_size)
  }

  pub fn has_more_pages(&self, page: usize) -> bool {
    page < self.total_pages()
  }
}

async fn fetch_records(client: &Client, source: &str) -> Result<Vec<FilmRecord>> {
  if source.starts_with("http://") || source.starts_with("https://") {
    let response = client.get(source).send().await.with_context(|| format!("request to {source} failed"))?;
    if !response.status().is_success() {
      bail!("server returned {} for {source}", response.status());
    }
    response.json().await.context("film data was not a JSON array of records")
  } else {
    let raw =
      tokio::fs::read_to_string(source).await.with_context(|| format!("failed to read film data file {source}"))?;
    serde_json::from_str(&raw).context("film data was not a JSON array of records")
  }
}

/// The built-in seed set used whenever the configured data file is unusable.
pub fn seed_records() -> Vec<FilmRecord> {
  // Safety: the seed file is embedded at compile time; if it's malformed this is caught by tests.
  serde_json::from_str(include_str!("../seed_films.json")).expect("seed_films.json must be a valid film array")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn film(id: &str) -> FilmRecord {
    serde_json::from_str(&format!(r#"{{"_id": "{id}", "title": "Film {id}"}}"#)).unwrap()
  }

  fn catalog_of(n: usize, page_size: usize) -> Catalog {
    Catalog::new((1..=n).map(|i| film(&format!("f{i}"))).collect(), page_size)
  }

  // --- record parsing ---

  #[test]
  fn genre_accepts_string_or_list() {
    let one: FilmRecord = serde_json::from_str(r#"{"_id": "a", "genre": "Drama"}"#).unwrap();
    assert_eq!(one.genre, vec!["Drama"]);

    let many: FilmRecord = serde_json::from_str(r#"{"_id": "a", "genre": ["Drama", "Mystery"]}"#).unwrap();
    assert_eq!(many.genre, vec!["Drama", "Mystery"]);

    let absent: FilmRecord = serde_json::from_str(r#"{"_id": "a"}"#).unwrap();
    assert!(absent.genre.is_empty());

    let blank: FilmRecord = serde_json::from_str(r#"{"_id": "a", "genre": ""}"#).unwrap();
    assert!(blank.genre.is_empty());
  }

  #[test]
  fn length_accepts_number_or_numeric_string() {
    let text: FilmRecord = serde_json::from_str(r#"{"_id": "a", "length": "95"}"#).unwrap();
    assert_eq!(text.length, Some(95));

    let number: FilmRecord = serde_json::from_str(r#"{"_id": "a", "length": 110}"#).unwrap();
    assert_eq!(number.length, Some(110));

    let junk: FilmRecord = serde_json::from_str(r#"{"_id": "a", "length": "ninety"}"#).unwrap();
    assert_eq!(junk.length, None);

    let absent: FilmRecord = serde_json::from_str(r#"{"_id": "a"}"#).unwrap();
    assert_eq!(absent.length, None);
  }

  #[test]
  fn show_defaults_to_true() {
    let record: FilmRecord = serde_json::from_str(r#"{"_id": "a"}"#).unwrap();
    assert!(record.show);
  }

  // --- construction ---

  #[test]
  fn hidden_and_idless_records_are_dropped() {
    let records: Vec<FilmRecord> = serde_json::from_str(
      r#"[
        {"_id": "keep", "title": "Keep"},
        {"_id": "hide", "title": "Hide", "show": false},
        {"title": "No id"}
      ]"#,
    )
    .unwrap();
    let catalog = Catalog::new(records, 5);
    assert_eq!(catalog.len(), 1);
    assert!(catalog.by_id("keep").is_some());
    assert!(catalog.by_id("hide").is_none());
  }

  #[test]
  fn duplicate_ids_keep_first_occurrence() {
    let records: Vec<FilmRecord> = serde_json::from_str(
      r#"[
        {"_id": "dup", "title": "First"},
        {"_id": "dup", "title": "Second"}
      ]"#,
    )
    .unwrap();
    let catalog = Catalog::new(records, 5);
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.by_id("dup").unwrap().title, "First");
  }

  // --- paging ---

  #[test]
  fn seven_records_page_size_five() {
    let catalog = catalog_of(7, 5);
    assert_eq!(catalog.page(1).len(), 5);
    assert_eq!(catalog.page(1)[0].id, "f1");
    assert_eq!(catalog.page(2).len(), 2);
    assert_eq!(catalog.page(2)[1].id, "f7");
    assert_eq!(catalog.total_pages(), 2);
    assert!(catalog.has_more_pages(1));
    assert!(!catalog.has_more_pages(2));
    assert!(!catalog.has_more_pages(3));
  }

  #[test]
  fn out_of_range_pages_are_empty() {
    let catalog = catalog_of(7, 5);
    assert!(catalog.page(0).is_empty());
    assert!(catalog.page(3).is_empty());
    assert!(catalog.page(100).is_empty());
  }

  #[test]
  fn concatenated_pages_reproduce_the_catalog_in_order() {
    let catalog = catalog_of(23, 5);
    let mut seen = Vec::new();
    for p in 1..=catalog.total_pages() {
      assert!(catalog.page(p).len() <= 5);
      seen.extend(catalog.page(p).iter().map(|f| f.id.clone()));
    }
    let expected: Vec<String> = (1..=23).map(|i| format!("f{i}")).collect();
    assert_eq!(seen, expected);
  }

  #[test]
  fn empty_catalog_has_zero_pages() {
    let catalog = Catalog::new(Vec::new(), 5);
    assert_eq!(catalog.total_pages(), 0);
    assert!(!catalog.has_more_pages(0));
    assert!(catalog.page(1).is_empty());
  }

  // --- lookup ---

  #[test]
  fn by_id_returns_the_stored_record() {
    let catalog = catalog_of(7, 5);
    let from_page = &catalog.page(1)[2];
    let from_index = catalog.by_id("f3").unwrap();
    assert!(std::ptr::eq(from_page, from_index));
    assert!(catalog.by_id("nope").is_none());
  }

  // --- load fallback ---

  #[test]
  fn seed_set_parses_and_is_usable() {
    let catalog = Catalog::new(seed_records(), 5);
    assert!(!catalog.is_empty());
    // The archive print is marked show: false and must not surface.
    assert!(catalog.by_id("seed-archive").is_none());
    assert!(catalog.by_id("seed-lighthouse").is_some());
  }

  #[tokio::test]
  async fn load_falls_back_to_seed_when_file_is_missing() {
    let catalog = Catalog::load(&Client::new(), "no/such/films.json").await;
    assert!(catalog.is_loaded());
    assert!(!catalog.is_empty());
  }

  #[tokio::test]
  async fn load_falls_back_to_seed_on_malformed_json() {
    let dir = std::env::temp_dir().join("marquee-catalog-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("not-an-array.json");
    std::fs::write(&path, r#"{"films": []}"#).unwrap();

    let catalog = Catalog::load(&Client::new(), path.to_str().unwrap()).await;
    assert!(catalog.is_loaded());
    assert!(!catalog.is_empty());
  }
}
