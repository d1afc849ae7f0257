//! Saved sessions, newest first.

use chrono::Local;
use deficit_core::store::KeyValueStore;
use ratatui::{
  Frame,
  layout::Rect,
  style::Style,
  text::{Line, Span},
  widgets::{List, ListItem, ListState, Paragraph},
};

use super::Palette;
use crate::app::App;

pub fn draw<S: KeyValueStore>(
  f: &mut Frame,
  area: Rect,
  app: &App<S>,
  palette: &Palette,
) {
  let block = palette.block(format!(" History ({}) ", app.records.len()));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let dim = Style::default().fg(palette.dim);
  if app.records.is_empty() {
    f.render_widget(Paragraph::new("No saved results.").style(dim), inner);
    return;
  }

  let items: Vec<ListItem> = app
    .records
    .iter()
    .map(|record| {
      let date = record.date.with_timezone(&Local).format("%Y-%m-%d %H:%M");
      let names = record
        .results
        .iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
      ListItem::new(vec![
        Line::from(vec![
          Span::styled(format!("{date}  "), palette.heading_style()),
          Span::raw(record.summary()),
        ]),
        Line::styled(format!("   {names}"), dim),
      ])
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.history_cursor));
  f.render_stateful_widget(
    List::new(items).highlight_style(palette.cursor_style()),
    inner,
    &mut state,
  );
}
