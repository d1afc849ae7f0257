//! Ranked result cards.

use deficit_core::{scoring, store::KeyValueStore};
use ratatui::{
  Frame,
  layout::Rect,
  style::Style,
  text::{Line, Span},
  widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use super::Palette;
use crate::{app::App, commands::NO_RESULT_HINT};

pub fn draw<S: KeyValueStore>(
  f: &mut Frame,
  area: Rect,
  app: &App<S>,
  palette: &Palette,
) {
  let block = palette.block(format!(
    " Results for {} symptom(s) ",
    app.selection.len()
  ));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if app.results.is_empty() {
    f.render_widget(
      Paragraph::new(NO_RESULT_HINT)
        .style(Style::default().fg(palette.dim))
        .wrap(Wrap { trim: true }),
      inner,
    );
    return;
  }

  let dim = Style::default().fg(palette.dim);
  let mut items: Vec<ListItem> = app
    .results
    .iter()
    .enumerate()
    .map(|(rank, r)| {
      let s = &r.substance;
      let heart = if app.history.is_favorite(s.id.as_str()) {
        " ♥"
      } else {
        ""
      };
      let band = r.band();
      ListItem::new(vec![
        Line::from(vec![
          Span::styled(
            format!("{}. {} {}", rank + 1, s.icon, s.name),
            palette.heading_style(),
          ),
          Span::styled(format!(" ({}){heart}", s.scientific_name), dim),
        ]),
        Line::from(vec![
          Span::raw("   likelihood: "),
          Span::styled(band.to_string(), palette.band_style(band)),
          Span::styled(
            format!(
              "  {} symptom(s), {:.0}%",
              r.support_count,
              r.confidence * 100.0
            ),
            dim,
          ),
        ]),
        Line::from(format!("   symptoms: {}", s.card_symptoms().join(", "))),
        Line::from(format!("   sources:  {}", s.card_sources().join(", "))),
        Line::from(format!("   daily:    {}", s.daily_requirement)),
        Line::from(""),
      ])
    })
    .collect();

  if let Some(text) = scoring::share_text(&app.results) {
    items.push(ListItem::new(Line::styled(text, dim)));
  }

  let mut state = ListState::default();
  state.select(Some(app.result_cursor));
  f.render_stateful_widget(
    List::new(items).highlight_style(palette.cursor_style()),
    inner,
    &mut state,
  );
}
