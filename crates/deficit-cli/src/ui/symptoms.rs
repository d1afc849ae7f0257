//! Symptom picker.

use deficit_core::store::KeyValueStore;
use ratatui::{
  Frame,
  layout::Rect,
  style::Style,
  text::{Line, Span},
  widgets::{List, ListItem, ListState},
};

use super::{Palette, filter_line, split_filter_row};
use crate::app::App;

pub fn draw<S: KeyValueStore>(
  f: &mut Frame,
  area: Rect,
  app: &App<S>,
  palette: &Palette,
) {
  let filtered = app.filtered_symptoms();
  let total = app.catalog.symptoms().len();

  let title = if app.filter_active || !app.symptom_filter.is_empty() {
    format!(" Symptoms ({}/{}) ", filtered.len(), total)
  } else {
    format!(" Symptoms ({total}) ")
  };
  let block = palette.block(title);
  let inner = block.inner(area);
  f.render_widget(block, area);

  let showing_filter = app.filter_active || !app.symptom_filter.is_empty();
  let (list_area, filter_area) = split_filter_row(inner, showing_filter);
  if let Some(filter_area) = filter_area {
    f.render_widget(
      filter_line(&app.symptom_filter, app.filter_active, palette),
      filter_area,
    );
  }

  let items: Vec<ListItem> = filtered
    .iter()
    .map(|entry| {
      let checked = app.selection.contains(&entry.id);
      let mark = if checked { "[x] " } else { "[ ] " };
      let style = if checked {
        Style::default().fg(palette.accent)
      } else {
        Style::default()
      };
      ListItem::new(Line::from(vec![
        Span::styled(mark, style),
        Span::styled(entry.label.clone(), style),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select((!filtered.is_empty()).then_some(app.symptom_cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(palette.cursor_style()),
    list_area,
    &mut state,
  );
}
