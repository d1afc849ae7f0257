//! TUI rendering. One pane per screen plus a shared header and status bar.

pub mod browse;
pub mod detail;
pub mod history;
pub mod results;
pub mod symptoms;

use chrono::Local;
use deficit_core::{scoring::ConfidenceBand, store::KeyValueStore};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Screen};

// ─── Palette ──────────────────────────────────────────────────────────────────

/// Colours for the light or dark theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
  pub bg:      Color,
  pub fg:      Color,
  pub dim:     Color,
  pub accent:  Color,
  pub cursor:  Color,
  pub bar:     Color,
  pub heading: Color,
}

impl Palette {
  pub fn for_theme(dark: bool) -> Self {
    if dark {
      Self {
        bg:      Color::Black,
        fg:      Color::White,
        dim:     Color::DarkGray,
        accent:  Color::Cyan,
        cursor:  Color::Blue,
        bar:     Color::DarkGray,
        heading: Color::LightCyan,
      }
    } else {
      Self {
        bg:      Color::Reset,
        fg:      Color::Reset,
        dim:     Color::Gray,
        accent:  Color::Blue,
        cursor:  Color::LightBlue,
        bar:     Color::Gray,
        heading: Color::Blue,
      }
    }
  }

  pub fn block(&self, title: String) -> Block<'static> {
    Block::default()
      .title(title)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(self.dim))
  }

  pub fn cursor_style(&self) -> Style {
    Style::default()
      .bg(self.cursor)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD)
  }

  pub fn heading_style(&self) -> Style {
    Style::default()
      .fg(self.heading)
      .add_modifier(Modifier::BOLD)
  }

  pub fn band_style(&self, band: ConfidenceBand) -> Style {
    let color = match band {
      ConfidenceBand::High => Color::Red,
      ConfidenceBand::Medium => Color::Yellow,
      ConfidenceBand::Low => Color::Green,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
  }
}

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &App<S>) {
  let palette = Palette::for_theme(app.dark);
  let area = f.area();
  f.render_widget(
    Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
    area,
  );

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app, &palette);
  match app.screen {
    Screen::Symptoms => symptoms::draw(f, rows[1], app, &palette),
    Screen::Results => results::draw(f, rows[1], app, &palette),
    Screen::Detail => detail::draw(f, rows[1], app, &palette),
    Screen::History => history::draw(f, rows[1], app, &palette),
    Screen::Browse => browse::draw(f, rows[1], app, &palette),
  }
  draw_status(f, rows[2], app, &palette);
}

/// The `/term_` line shown under a filterable list.
pub(crate) fn filter_line(
  text: &str,
  active: bool,
  palette: &Palette,
) -> Paragraph<'static> {
  let shown = if active {
    format!("/{text}_")
  } else {
    format!("/{text}")
  };
  Paragraph::new(shown).style(Style::default().fg(palette.accent))
}

/// Split off the last row of `area` for a filter line when one is showing.
pub(crate) fn split_filter_row(area: Rect, showing: bool) -> (Rect, Option<Rect>) {
  if !showing || area.height < 2 {
    return (area, None);
  }
  let list = Rect { height: area.height - 1, ..area };
  let filter = Rect {
    y: area.y + area.height - 1,
    height: 1,
    ..area
  };
  (list, Some(filter))
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<S: KeyValueStore>(
  f: &mut Frame,
  area: Rect,
  app: &App<S>,
  palette: &Palette,
) {
  let date = Local::now().format("%Y-%m-%d").to_string();
  let theme = if app.dark { "dark" } else { "light" };

  let left = Span::styled(
    format!(
      " deficit  {} selected  [H] history  [b] browse  [t] {theme}  [q] quit",
      app.selection.len()
    ),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::White));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(palette.bar));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S: KeyValueStore>(
  f: &mut Frame,
  area: Rect,
  app: &App<S>,
  palette: &Palette,
) {
  let (mode_label, hints) = match app.screen {
    _ if app.filter_active => ("SEARCH", "Type to filter  Esc cancel  Enter done"),
    Screen::Symptoms => (
      "SYMPTOMS",
      "↑↓/jk move  space toggle  / search  c clear  Enter score",
    ),
    Screen::Results => (
      "RESULTS",
      "Enter detail  f favorite  s save  r restart  Esc back",
    ),
    Screen::Detail => ("DETAIL", "↑↓/jk scroll  f favorite  Esc back"),
    Screen::History => ("HISTORY", "↑↓/jk move  Enter replay  Esc back"),
    Screen::Browse => (
      "BROWSE",
      "Tab filter  / search  Enter detail  f favorite  Esc back",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(palette.accent)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span =
    Span::styled(format!("  {status}"), Style::default().fg(palette.dim));

  f.render_widget(Paragraph::new(Line::from(vec![mode_span, hint_span])), area);
}
