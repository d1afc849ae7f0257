//! Catalog browser with category/favorites filter and name search.

use deficit_core::store::KeyValueStore;
use ratatui::{
  Frame,
  layout::Rect,
  style::Style,
  text::{Line, Span},
  widgets::{List, ListItem, ListState, Paragraph},
};

use super::{Palette, filter_line, split_filter_row};
use crate::app::App;

pub fn draw<S: KeyValueStore>(
  f: &mut Frame,
  area: Rect,
  app: &App<S>,
  palette: &Palette,
) {
  let shown = app.browsed_substances();
  let block = palette.block(format!(
    " Browse: {} ({}) [Tab] ",
    app.browse_filter.label(),
    shown.len()
  ));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let showing_filter = app.filter_active || !app.browse_term.is_empty();
  let (list_area, filter_area) = split_filter_row(inner, showing_filter);
  if let Some(filter_area) = filter_area {
    f.render_widget(
      filter_line(&app.browse_term, app.filter_active, palette),
      filter_area,
    );
  }

  let dim = Style::default().fg(palette.dim);
  if shown.is_empty() {
    f.render_widget(Paragraph::new("Nothing matches.").style(dim), list_area);
    return;
  }

  let items: Vec<ListItem> = shown
    .iter()
    .map(|s| {
      let heart = if app.history.is_favorite(s.id.as_str()) {
        " ♥"
      } else {
        ""
      };
      ListItem::new(Line::from(vec![
        Span::raw(format!("{} {}{heart}", s.icon, s.name)),
        Span::styled(format!("  {}  {}", s.scientific_name, s.category), dim),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.browse_cursor));
  f.render_stateful_widget(
    List::new(items).highlight_style(palette.cursor_style()),
    list_area,
    &mut state,
  );
}
