//! Full information for one substance.

use deficit_core::store::KeyValueStore;
use ratatui::{
  Frame,
  layout::Rect,
  style::Style,
  text::{Line, Span},
  widgets::{Paragraph, Wrap},
};

use super::Palette;
use crate::app::App;

pub fn draw<S: KeyValueStore>(
  f: &mut Frame,
  area: Rect,
  app: &App<S>,
  palette: &Palette,
) {
  let Some(s) = app.detail_substance() else {
    let block = palette.block(" Detail ".into());
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new("Nothing selected.").style(Style::default().fg(palette.dim)),
      inner,
    );
    return;
  };

  let heart = if app.history.is_favorite(s.id.as_str()) {
    " ♥"
  } else {
    ""
  };
  let block = palette.block(format!(" {} {}{heart} ", s.icon, s.name));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let dim = Style::default().fg(palette.dim);
  let severity = "●".repeat(s.severity as usize) + &"○".repeat(3 - s.severity as usize);

  let mut lines = vec![
    Line::from(vec![
      Span::styled(format!("{:<14}", "Scientific"), palette.heading_style()),
      Span::raw(s.scientific_name.clone()),
    ]),
    Line::from(vec![
      Span::styled(format!("{:<14}", "Category"), palette.heading_style()),
      Span::raw(s.category.to_string()),
    ]),
    Line::from(vec![
      Span::styled(format!("{:<14}", "Severity"), palette.heading_style()),
      Span::raw(severity),
    ]),
    Line::from(vec![
      Span::styled(format!("{:<14}", "Daily"), palette.heading_style()),
      Span::raw(s.daily_requirement.clone()),
    ]),
    Line::from(""),
    Line::styled("Deficiency symptoms", palette.heading_style()),
  ];
  lines.extend(s.detailed_symptoms.iter().map(|l| Line::from(format!("  • {l}"))));

  lines.push(Line::from(""));
  lines.push(Line::styled("Food sources", palette.heading_style()));
  lines.push(Line::from(format!("  {}", s.sources.join(", "))));

  lines.push(Line::from(""));
  lines.push(Line::styled("Most at risk", palette.heading_style()));
  lines.extend(s.risk_groups.iter().map(|g| Line::styled(format!("  • {g}"), dim)));

  let scroll = u16::try_from(app.detail_scroll).unwrap_or(u16::MAX);
  f.render_widget(
    Paragraph::new(lines)
      .wrap(Wrap { trim: false })
      .scroll((scroll, 0)),
    inner,
  );
}
