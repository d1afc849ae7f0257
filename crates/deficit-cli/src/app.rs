//! Application state machine and key dispatcher.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use deficit_core::{
  Error,
  browse::{self, Filter},
  catalog::{Catalog, Substance, SubstanceId, SymptomEntry},
  history::{HistoryRecord, HistoryStore},
  scoring::{self, ScoreResult},
  selection::Selection,
  store::KeyValueStore,
};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};

use crate::commands::{EMPTY_SELECTION_HINT, NO_RESULT_HINT};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Pick symptoms.
  Symptoms,
  /// Ranked candidates for the current selection.
  Results,
  /// One substance in full.
  Detail,
  /// Saved sessions.
  History,
  /// The whole catalog, filterable.
  Browse,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S> {
  pub catalog: Catalog,
  pub history: HistoryStore<S>,

  pub screen: Screen,
  /// Where `Esc` on the detail screen returns to.
  pub detail_return: Screen,

  pub selection: Selection,
  pub results:   Vec<ScoreResult>,
  pub records:   Vec<HistoryRecord>,

  /// Fuzzy filter over symptom labels.
  pub symptom_filter: String,
  /// Search term for the browse screen.
  pub browse_term:    String,
  pub browse_filter:  Filter,
  /// Whether the user is typing into the current screen's filter.
  pub filter_active:  bool,

  pub symptom_cursor: usize,
  pub result_cursor:  usize,
  pub history_cursor: usize,
  pub browse_cursor:  usize,
  pub detail_scroll:  usize,

  /// Substance shown on the detail screen.
  pub detail: Option<SubstanceId>,

  pub dark: bool,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl<S: KeyValueStore> App<S> {
  pub fn new(catalog: Catalog, history: HistoryStore<S>) -> Self {
    let dark = history.theme();
    Self {
      catalog,
      history,
      screen: Screen::Symptoms,
      detail_return: Screen::Symptoms,
      selection: Selection::new(),
      results: Vec::new(),
      records: Vec::new(),
      symptom_filter: String::new(),
      browse_term: String::new(),
      browse_filter: Filter::All,
      filter_active: false,
      symptom_cursor: 0,
      result_cursor: 0,
      history_cursor: 0,
      browse_cursor: 0,
      detail_scroll: 0,
      detail: None,
      dark,
      status_msg: String::new(),
    }
  }

  // ── Derived views ─────────────────────────────────────────────────────────

  /// Symptom entries matching the current fuzzy filter.
  pub fn filtered_symptoms(&self) -> Vec<&SymptomEntry> {
    if self.symptom_filter.is_empty() {
      return self.catalog.symptoms().iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .catalog
      .symptoms()
      .iter()
      .filter(|e| {
        matcher.fuzzy_match(&e.label, &self.symptom_filter).is_some()
          || matcher.fuzzy_match(&e.id, &self.symptom_filter).is_some()
      })
      .collect()
  }

  /// Substances for the browse screen.
  pub fn browsed_substances(&self) -> Vec<&Substance> {
    browse::filter_substances(
      &self.catalog,
      self.browse_filter,
      &self.browse_term,
      |id| self.history.is_favorite(id),
    )
  }

  pub fn detail_substance(&self) -> Option<&Substance> {
    self
      .detail
      .as_ref()
      .and_then(|id| self.catalog.get_substance(id.as_str()).ok())
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    if self.filter_active {
      self.handle_filter_key(key);
      return true;
    }

    // Keys shared by every screen.
    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Char('t') => {
        self.toggle_theme();
        return true;
      }
      KeyCode::Char('H') => {
        self.open_history();
        return true;
      }
      KeyCode::Char('b') => {
        self.screen = Screen::Browse;
        self.browse_cursor = 0;
        return true;
      }
      _ => {}
    }

    match self.screen {
      Screen::Symptoms => self.handle_symptoms_key(key),
      Screen::Results => self.handle_results_key(key),
      Screen::Detail => self.handle_detail_key(key),
      Screen::History => self.handle_history_key(key),
      Screen::Browse => self.handle_browse_key(key),
    }
    true
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    let (text, cursor) = match self.screen {
      Screen::Browse => (&mut self.browse_term, &mut self.browse_cursor),
      _ => (&mut self.symptom_filter, &mut self.symptom_cursor),
    };
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        text.clear();
      }
      KeyCode::Enter => self.filter_active = false,
      KeyCode::Backspace => {
        text.pop();
      }
      KeyCode::Char(c) => text.push(c),
      _ => return,
    }
    *cursor = 0;
  }

  fn handle_symptoms_key(&mut self, key: KeyEvent) {
    let len = self.filtered_symptoms().len();
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => step_down(&mut self.symptom_cursor, len),
      KeyCode::Up | KeyCode::Char('k') => step_up(&mut self.symptom_cursor),
      KeyCode::Char(' ') => {
        let id = self
          .filtered_symptoms()
          .get(self.symptom_cursor)
          .map(|e| e.id.clone());
        if let Some(id) = id {
          self.selection.toggle(&id);
        }
      }
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.symptom_filter.clear();
        self.symptom_cursor = 0;
      }
      KeyCode::Char('c') => {
        self.selection.clear();
        self.status_msg = "Selection cleared.".into();
      }
      KeyCode::Enter => self.calculate(),
      _ => {}
    }
  }

  fn handle_results_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => {
        step_down(&mut self.result_cursor, self.results.len());
      }
      KeyCode::Up | KeyCode::Char('k') => step_up(&mut self.result_cursor),
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        let id = self
          .results
          .get(self.result_cursor)
          .map(|r| r.substance.id.clone());
        self.open_detail(id, Screen::Results);
      }
      KeyCode::Char('f') => {
        let id = self
          .results
          .get(self.result_cursor)
          .map(|r| r.substance.id.clone());
        self.toggle_favorite(id);
      }
      KeyCode::Char('s') => self.save_results(),
      KeyCode::Char('r') => self.restart(),
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::Symptoms;
      }
      _ => {}
    }
  }

  fn handle_detail_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => self.detail_scroll += 1,
      KeyCode::Up | KeyCode::Char('k') => step_up(&mut self.detail_scroll),
      KeyCode::Char('f') => self.toggle_favorite(self.detail.clone()),
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = self.detail_return;
        self.detail = None;
        self.detail_scroll = 0;
      }
      _ => {}
    }
  }

  fn handle_history_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => {
        step_down(&mut self.history_cursor, self.records.len());
      }
      KeyCode::Up | KeyCode::Char('k') => step_up(&mut self.history_cursor),
      KeyCode::Enter => {
        if let Some(record) = self.records.get(self.history_cursor) {
          self.selection = record.symptoms.clone();
          self.calculate();
        }
      }
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::Symptoms;
      }
      _ => {}
    }
  }

  fn handle_browse_key(&mut self, key: KeyEvent) {
    let len = self.browsed_substances().len();
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => step_down(&mut self.browse_cursor, len),
      KeyCode::Up | KeyCode::Char('k') => step_up(&mut self.browse_cursor),
      KeyCode::Tab => {
        self.browse_filter = self.browse_filter.next();
        self.browse_cursor = 0;
      }
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.browse_term.clear();
        self.browse_cursor = 0;
      }
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        let id = self.cursor_browsed_id();
        self.open_detail(id, Screen::Browse);
      }
      KeyCode::Char('f') => {
        let id = self.cursor_browsed_id();
        self.toggle_favorite(id);
        // The favorites view may have lost the row under the cursor.
        let len = self.browsed_substances().len();
        self.browse_cursor = self.browse_cursor.min(len.saturating_sub(1));
      }
      KeyCode::Esc => self.screen = Screen::Symptoms,
      _ => {}
    }
  }

  fn cursor_browsed_id(&self) -> Option<SubstanceId> {
    self
      .browsed_substances()
      .get(self.browse_cursor)
      .map(|s| s.id.clone())
  }

  // ── Actions ───────────────────────────────────────────────────────────────

  /// Score the current selection and show the results.
  pub fn calculate(&mut self) {
    match scoring::score(&self.catalog, &self.selection) {
      Ok(results) => {
        self.status_msg = if results.is_empty() {
          NO_RESULT_HINT.into()
        } else {
          String::new()
        };
        self.results = results;
        self.result_cursor = 0;
        self.screen = Screen::Results;
      }
      Err(Error::EmptySelection) => self.status_msg = EMPTY_SELECTION_HINT.into(),
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  fn save_results(&mut self) {
    self.status_msg = match self.history.save_session(&self.selection, &self.results) {
      Ok(_) => "Results saved.".into(),
      Err(e) => format!("Could not save results: {e}"),
    };
  }

  /// Drop the selection and results and go back to symptom picking.
  fn restart(&mut self) {
    self.selection.clear();
    self.results.clear();
    self.result_cursor = 0;
    self.symptom_cursor = 0;
    self.symptom_filter.clear();
    self.screen = Screen::Symptoms;
    self.status_msg.clear();
  }

  fn open_history(&mut self) {
    match self.history.load_history() {
      Ok(records) => {
        self.records = records;
        self.history_cursor = 0;
        self.screen = Screen::History;
        if self.records.is_empty() {
          self.status_msg = "No saved results.".into();
        }
      }
      Err(e) => self.status_msg = format!("Could not load history: {e}"),
    }
  }

  fn open_detail(&mut self, id: Option<SubstanceId>, from: Screen) {
    if let Some(id) = id {
      self.detail = Some(id);
      self.detail_scroll = 0;
      self.detail_return = from;
      self.screen = Screen::Detail;
    }
  }

  fn toggle_favorite(&mut self, id: Option<SubstanceId>) {
    let Some(id) = id else { return };
    self.status_msg = match self.history.toggle_favorite(id.as_str()) {
      Ok(true) => "Added to favorites.".into(),
      Ok(false) => "Removed from favorites.".into(),
      Err(e) => format!("Could not update favorites: {e}"),
    };
  }

  fn toggle_theme(&mut self) {
    let dark = !self.dark;
    match self.history.set_theme(dark) {
      Ok(()) => self.dark = dark,
      Err(e) => {
        // Still switch for this session.
        self.dark = dark;
        self.status_msg = format!("Could not save theme: {e}");
      }
    }
  }
}

fn step_down(cursor: &mut usize, len: usize) {
  if len > 0 && *cursor + 1 < len {
    *cursor += 1;
  }
}

fn step_up(cursor: &mut usize) { *cursor = cursor.saturating_sub(1); }

#[cfg(test)]
mod tests {
  use deficit_core::store::MemoryStore;

  use super::*;

  fn app() -> App<MemoryStore> {
    App::new(
      Catalog::builtin().unwrap(),
      HistoryStore::open(MemoryStore::new()),
    )
  }

  fn press(app: &mut App<MemoryStore>, code: KeyCode) -> bool {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
  }

  fn type_text(app: &mut App<MemoryStore>, text: &str) {
    for c in text.chars() {
      press(app, KeyCode::Char(c));
    }
  }

  #[test]
  fn scoring_nothing_shows_prompt() {
    let mut app = app();
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.screen, Screen::Symptoms);
    assert_eq!(app.status_msg, EMPTY_SELECTION_HINT);
  }

  #[test]
  fn select_and_score() {
    let mut app = app();
    // First symptom in catalog order is fatigue.
    press(&mut app, KeyCode::Char(' '));
    assert!(app.selection.contains("fatigue"));
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.screen, Screen::Results);
    assert_eq!(app.results.len(), 4);
    assert!(app.results.iter().all(|r| r.confidence == 1.0));
  }

  #[test]
  fn fuzzy_filter_narrows_symptoms() {
    let mut app = app();
    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "gums");
    press(&mut app, KeyCode::Enter);

    let ids: Vec<_> = app.filtered_symptoms().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids.first(), Some(&"bleeding-gums"));
    press(&mut app, KeyCode::Char(' '));
    assert!(app.selection.contains("bleeding-gums"));
  }

  #[test]
  fn save_then_replay_from_history() {
    let mut app = app();
    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('s'));
    assert_eq!(app.status_msg, "Results saved.");
    let first = app.results.clone();

    press(&mut app, KeyCode::Char('r'));
    assert!(app.selection.is_empty());

    press(&mut app, KeyCode::Char('H'));
    assert_eq!(app.screen, Screen::History);
    assert_eq!(app.records.len(), 1);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.screen, Screen::Results);
    assert_eq!(app.results, first);
  }

  #[test]
  fn favorite_from_detail_and_browse_favorites() {
    let mut app = app();
    press(&mut app, KeyCode::Char('b'));
    assert_eq!(app.screen, Screen::Browse);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.screen, Screen::Detail);
    assert_eq!(app.detail_substance().unwrap().id.as_str(), "vitamin-a");

    press(&mut app, KeyCode::Char('f'));
    assert!(app.history.is_favorite("vitamin-a"));
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.screen, Screen::Browse);

    // all → vitamins → minerals → favorites
    for _ in 0..3 {
      press(&mut app, KeyCode::Tab);
    }
    assert_eq!(app.browse_filter, Filter::Favorites);
    let shown: Vec<_> =
      app.browsed_substances().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(shown, ["vitamin-a"]);

    press(&mut app, KeyCode::Char('f'));
    assert!(app.browsed_substances().is_empty());
    assert_eq!(app.browse_cursor, 0);
  }

  #[test]
  fn theme_toggle_persists() {
    let mut app = app();
    assert!(!app.dark);
    press(&mut app, KeyCode::Char('t'));
    assert!(app.dark);
    assert!(app.history.theme());
  }

  #[test]
  fn q_quits_outside_filter_mode() {
    let mut app = app();
    press(&mut app, KeyCode::Char('/'));
    assert!(press(&mut app, KeyCode::Char('q')));
    assert_eq!(app.symptom_filter, "q");
    press(&mut app, KeyCode::Esc);
    assert!(!press(&mut app, KeyCode::Char('q')));
  }
}
